//! Transaction primitives.
//!
//! A `Transaction` is a dated income or expense recorded on one account. Its
//! `amount_minor` is always positive; the kind decides the sign applied to the
//! account balance.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Effect of `amount_minor` of this kind on an account balance.
    pub fn signed(self, amount_minor: i64) -> i64 {
        match self {
            Self::Income => amount_minor,
            Self::Expense => -amount_minor,
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub account_id: Uuid,
    pub category_id: Option<Uuid>,
    pub kind: TransactionKind,
    pub amount_minor: i64,
    pub description: Option<String>,
    pub occurred_on: NaiveDate,
    /// Recurring template this transaction was materialized from.
    pub recurring_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        account_id: Uuid,
        kind: TransactionKind,
        amount_minor: i64,
        category_id: Option<Uuid>,
        description: Option<String>,
        occurred_on: NaiveDate,
    ) -> ResultEngine<Self> {
        ensure_positive_amount(amount_minor)?;
        Ok(Self {
            id: Uuid::new_v4(),
            account_id,
            category_id,
            kind,
            amount_minor,
            description,
            occurred_on,
            recurring_id: None,
            created_at: Utc::now(),
        })
    }

    pub fn signed_amount(&self) -> i64 {
        self.kind.signed(self.amount_minor)
    }
}

pub(crate) fn ensure_positive_amount(amount_minor: i64) -> ResultEngine<()> {
    if amount_minor <= 0 {
        return Err(EngineError::InvalidAmount(
            "amount_minor must be > 0".to_string(),
        ));
    }
    Ok(())
}

pub const DEFAULT_PAGE_LIMIT: u64 = 50;
pub const MAX_PAGE_LIMIT: u64 = 200;

/// Effective page size for a requested `limit`.
pub fn page_limit(limit: Option<u64>) -> u64 {
    limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT)
}

/// Filters for listing transactions. Every field narrows the result.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub account_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub kind: Option<TransactionKind>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Partial update of a transaction; `None` keeps the stored value.
///
/// `description: Some("")` clears the description and
/// `category_id: Some(None)` removes the category.
#[derive(Clone, Debug, Default)]
pub struct TransactionUpdate {
    pub amount_minor: Option<i64>,
    pub category_id: Option<Option<Uuid>>,
    pub description: Option<String>,
    pub occurred_on: Option<NaiveDate>,
}

/// Income/expense totals of an account over a date range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub income: i64,
    pub expense: i64,
    pub transactions: u64,
}

impl Summary {
    pub fn net(&self) -> i64 {
        self.income - self.expense
    }

    pub(crate) fn add(&mut self, kind: TransactionKind, amount_minor: i64) {
        match kind {
            TransactionKind::Income => self.income += amount_minor,
            TransactionKind::Expense => self.expense += amount_minor,
        }
        self.transactions += 1;
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub account_id: Uuid,
    pub category_id: Option<Uuid>,
    pub kind: String,
    pub amount_minor: i64,
    pub description: Option<String>,
    pub occurred_on: Date,
    pub recurring_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Account,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id),
            account_id: ActiveValue::Set(tx.account_id),
            category_id: ActiveValue::Set(tx.category_id),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            amount_minor: ActiveValue::Set(tx.amount_minor),
            description: ActiveValue::Set(tx.description.clone()),
            occurred_on: ActiveValue::Set(tx.occurred_on),
            recurring_id: ActiveValue::Set(tx.recurring_id),
            created_at: ActiveValue::Set(tx.created_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            account_id: model.account_id,
            category_id: model.category_id,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            amount_minor: model.amount_minor,
            description: model.description,
            occurred_on: model.occurred_on,
            recurring_id: model.recurring_id,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    #[test]
    fn expense_reduces_balance() {
        let tx = Transaction::new(
            Uuid::new_v4(),
            TransactionKind::Expense,
            1250,
            None,
            None,
            day(),
        )
        .unwrap();
        assert_eq!(tx.signed_amount(), -1250);
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        let err = Transaction::new(
            Uuid::new_v4(),
            TransactionKind::Income,
            0,
            None,
            None,
            day(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidAmount("amount_minor must be > 0".to_string())
        );
    }

    #[test]
    fn summary_tracks_net() {
        let mut summary = Summary::default();
        summary.add(TransactionKind::Income, 5_000);
        summary.add(TransactionKind::Expense, 1_200);
        summary.add(TransactionKind::Expense, 300);
        assert_eq!(summary.net(), 3_500);
        assert_eq!(summary.transactions, 3);
    }

    #[test]
    fn page_limit_is_clamped() {
        assert_eq!(page_limit(None), DEFAULT_PAGE_LIMIT);
        assert_eq!(page_limit(Some(0)), 1);
        assert_eq!(page_limit(Some(1_000)), MAX_PAGE_LIMIT);
    }
}
