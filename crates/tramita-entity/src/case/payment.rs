//! Payment ledger attached to a case.
//!
//! All amounts are integer euro-cents so the ledger invariant
//! (`paid_amount` equals the sum of entry amounts) is exact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentEntry {
    /// Amount in euro-cents.
    pub amount: i64,
    /// Payment method (open tag: "cash", "card", "transfer", ...).
    pub method: String,
    /// Optional free-form note.
    #[serde(default)]
    pub note: Option<String>,
    /// When the payment was made.
    pub date: DateTime<Utc>,
}

/// The per-case payment ledger.
///
/// `paid_amount` is derived state: [`PaymentLedger::record`] is the only
/// mutation path, so it always equals the sum of `payments[].amount`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentLedger {
    /// Agreed total fee in euro-cents.
    pub total_fee: i64,
    /// Sum of all recorded payments in euro-cents.
    pub paid_amount: i64,
    /// Individual payment entries, oldest first.
    pub payments: Vec<PaymentEntry>,
}

impl PaymentLedger {
    /// Create an empty ledger with the given total fee.
    pub fn new(total_fee: i64) -> Self {
        Self {
            total_fee,
            paid_amount: 0,
            payments: Vec::new(),
        }
    }

    /// Record a payment and recompute the paid amount.
    pub fn record(&mut self, entry: PaymentEntry) {
        self.payments.push(entry);
        self.paid_amount = self.payments.iter().map(|p| p.amount).sum();
    }

    /// Remaining amount owed (never negative).
    pub fn outstanding(&self) -> i64 {
        (self.total_fee - self.paid_amount).max(0)
    }

    /// Whether the ledger is fully paid.
    pub fn is_settled(&self) -> bool {
        self.paid_amount >= self.total_fee
    }

    /// Check the ledger invariant: paid amount equals the entry sum.
    pub fn is_consistent(&self) -> bool {
        self.paid_amount == self.payments.iter().map(|p| p.amount).sum::<i64>()
    }
}

impl Default for PaymentLedger {
    fn default() -> Self {
        Self::new(0)
    }
}
