//! Payment records.
//!
//! Only `pending`, `paid` and `cancelled` are ever stored. "Overdue" is a
//! display status computed from the due date, see [`crate::core::payment`].

use crate::errors::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Persisted payment state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Not yet paid. Older records that stored "overdue" load as pending.
    #[serde(alias = "overdue")]
    Pending,
    /// Settled
    Paid,
    /// Waived or voided
    Cancelled,
}

impl PaymentStatus {
    /// Lowercase name used in storage
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status shown to the user, derived at read time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStatus {
    /// Pending and not yet past due
    Pending,
    /// Pending and past its due day
    Overdue,
    /// Settled
    Paid,
    /// Waived or voided
    Cancelled,
}

impl From<PaymentStatus> for DisplayStatus {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Pending => Self::Pending,
            PaymentStatus::Paid => Self::Paid,
            PaymentStatus::Cancelled => Self::Cancelled,
        }
    }
}

/// Money owed for a class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier
    pub id: String,
    /// Class this payment is for
    pub session_id: String,
    /// Amount owed, positive
    pub amount: f64,
    /// Day the payment is due
    pub due_date: NaiveDate,
    /// Day the payment was settled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<NaiveDate>,
    /// "cash", "card", "transfer", ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Stored state
    pub status: PaymentStatus,
}

impl Payment {
    /// Creates a pending payment.
    ///
    /// # Errors
    /// Returns [`Error::InvalidAmount`] unless `amount` is positive and finite.
    pub fn new(
        id: impl Into<String>,
        session_id: impl Into<String>,
        amount: f64,
        due_date: NaiveDate,
    ) -> Result<Self> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::InvalidAmount { amount });
        }
        Ok(Self {
            id: id.into(),
            session_id: session_id.into(),
            amount,
            due_date,
            paid_date: None,
            method: None,
            status: PaymentStatus::Pending,
        })
    }

    /// Settles the payment on `paid_on`.
    ///
    /// Returns `false` without touching the record if it was already paid.
    ///
    /// # Errors
    /// A cancelled payment cannot be paid.
    pub fn mark_paid(&mut self, paid_on: NaiveDate) -> Result<bool> {
        match self.status {
            PaymentStatus::Paid => Ok(false),
            PaymentStatus::Cancelled => Err(Error::InvalidTransition {
                from: self.status.to_string(),
                to: PaymentStatus::Paid.to_string(),
            }),
            PaymentStatus::Pending => {
                self.status = PaymentStatus::Paid;
                self.paid_date = Some(paid_on);
                Ok(true)
            }
        }
    }

    /// Voids the payment. Returns `false` if it was already cancelled.
    ///
    /// # Errors
    /// A paid payment cannot be cancelled.
    pub fn cancel(&mut self) -> Result<bool> {
        match self.status {
            PaymentStatus::Cancelled => Ok(false),
            PaymentStatus::Paid => Err(Error::InvalidTransition {
                from: self.status.to_string(),
                to: PaymentStatus::Cancelled.to_string(),
            }),
            PaymentStatus::Pending => {
                self.status = PaymentStatus::Cancelled;
                Ok(true)
            }
        }
    }
}
