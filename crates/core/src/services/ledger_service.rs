use crate::errors::CoreError;
use crate::models::snapshot::PortfolioSnapshot;
use crate::models::transaction::Transaction;

/// Books transactions into a snapshot and keeps net worth in step.
///
/// Pure ledger logic. No I/O and no notifications.
pub struct LedgerService;

impl LedgerService {
    pub fn new() -> Self {
        Self
    }

    /// Prepend a transaction and move net worth by its amount.
    /// Validates first; on error the snapshot is untouched.
    pub fn add_transaction(
        &self,
        snapshot: &mut PortfolioSnapshot,
        tx: Transaction,
    ) -> Result<(), CoreError> {
        self.validate_transaction(snapshot, &tx)?;
        let net_worth = snapshot.net_worth.checked_add(&tx.amount)?;

        snapshot.net_worth = net_worth;
        snapshot.transactions.insert(0, tx);
        Ok(())
    }

    /// Transactions newest first, as stored.
    pub fn get_transactions<'a>(&self, snapshot: &'a PortfolioSnapshot) -> Vec<&'a Transaction> {
        snapshot.transactions.iter().collect()
    }

    /// Rules:
    /// - Id must be non-empty and unique within the snapshot
    /// - Currency must match the snapshot's net worth currency
    fn validate_transaction(
        &self,
        snapshot: &PortfolioSnapshot,
        tx: &Transaction,
    ) -> Result<(), CoreError> {
        if tx.id.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Transaction id must not be empty".into(),
            ));
        }

        if snapshot.transactions.iter().any(|t| t.id == tx.id) {
            return Err(CoreError::DuplicateId(tx.id.clone()));
        }

        if tx.amount.currency != snapshot.currency() {
            return Err(CoreError::ValidationError(format!(
                "Transaction {} is in {} but the portfolio is kept in {}",
                tx.id,
                tx.amount.currency,
                snapshot.currency()
            )));
        }

        Ok(())
    }
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}
