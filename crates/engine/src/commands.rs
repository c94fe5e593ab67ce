//! Command structs for engine operations.
//!
//! These types group parameters for write operations (transactions,
//! transfers, recurring templates and partial updates), keeping call sites
//! readable and avoiding long argument lists.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{Frequency, TransactionKind};

/// Record an income or an expense on an account.
#[derive(Clone, Debug)]
pub struct TransactionCmd {
    pub account_id: Uuid,
    pub kind: TransactionKind,
    pub amount_minor: i64,
    pub category_id: Option<Uuid>,
    pub description: Option<String>,
    pub occurred_on: NaiveDate,
}

impl TransactionCmd {
    #[must_use]
    pub fn new(
        account_id: Uuid,
        kind: TransactionKind,
        amount_minor: i64,
        occurred_on: NaiveDate,
    ) -> Self {
        Self {
            account_id,
            kind,
            amount_minor,
            category_id: None,
            description: None,
            occurred_on,
        }
    }

    #[must_use]
    pub fn income(account_id: Uuid, amount_minor: i64, occurred_on: NaiveDate) -> Self {
        Self::new(account_id, TransactionKind::Income, amount_minor, occurred_on)
    }

    #[must_use]
    pub fn expense(account_id: Uuid, amount_minor: i64, occurred_on: NaiveDate) -> Self {
        Self::new(account_id, TransactionKind::Expense, amount_minor, occurred_on)
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Move money between two accounts of the same user.
#[derive(Clone, Debug)]
pub struct TransferCmd {
    pub from_account_id: Uuid,
    pub to_account_id: Uuid,
    pub amount_minor: i64,
    pub note: Option<String>,
    pub occurred_on: NaiveDate,
}

impl TransferCmd {
    #[must_use]
    pub fn new(
        from_account_id: Uuid,
        to_account_id: Uuid,
        amount_minor: i64,
        occurred_on: NaiveDate,
    ) -> Self {
        Self {
            from_account_id,
            to_account_id,
            amount_minor,
            note: None,
            occurred_on,
        }
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Create a recurring template.
#[derive(Clone, Debug)]
pub struct RecurringCmd {
    pub account_id: Uuid,
    pub kind: TransactionKind,
    pub amount_minor: i64,
    pub category_id: Option<Uuid>,
    pub description: Option<String>,
    pub frequency: Frequency,
    pub start_on: NaiveDate,
    pub end_on: Option<NaiveDate>,
}

impl RecurringCmd {
    #[must_use]
    pub fn new(
        account_id: Uuid,
        kind: TransactionKind,
        amount_minor: i64,
        frequency: Frequency,
        start_on: NaiveDate,
    ) -> Self {
        Self {
            account_id,
            kind,
            amount_minor,
            category_id: None,
            description: None,
            frequency,
            start_on,
            end_on: None,
        }
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn end_on(mut self, end_on: NaiveDate) -> Self {
        self.end_on = Some(end_on);
        self
    }
}

/// Partial update of a recurring template; `None` keeps the stored value.
#[derive(Clone, Debug, Default)]
pub struct RecurringUpdate {
    pub amount_minor: Option<i64>,
    pub category_id: Option<Option<Uuid>>,
    /// `Some("")` clears the description.
    pub description: Option<String>,
    pub end_on: Option<Option<NaiveDate>>,
}

#[derive(Clone, Debug, Default)]
pub struct GoalUpdate {
    pub name: Option<String>,
    pub target_minor: Option<i64>,
    pub deadline: Option<Option<NaiveDate>>,
}

#[derive(Clone, Debug, Default)]
pub struct PotUpdate {
    pub name: Option<String>,
    pub target_minor: Option<Option<i64>>,
}
