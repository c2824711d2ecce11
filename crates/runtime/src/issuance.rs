use lockstake_ledger::{InMemoryTokenLedger, MockTokenLedger};
use lockstake_primitives::{AccountId, Amount, LedgerError, TokenId, TokenLedger};

/// Supply creation for ledgers the runtime can seed at deployment.
pub trait TokenIssuance: TokenLedger {
    fn issue(&mut self, token: &TokenId, account: &AccountId, amount: Amount)
        -> Result<(), LedgerError>;
}

impl TokenIssuance for InMemoryTokenLedger {
    fn issue(
        &mut self,
        token: &TokenId,
        account: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.mint(token, account, amount)
    }
}

impl TokenIssuance for MockTokenLedger {
    fn issue(
        &mut self,
        token: &TokenId,
        account: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.mint(token, account, amount)
    }
}
