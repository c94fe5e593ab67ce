//! Category budgets.
//!
//! A budget allocates a percentage of an account to one expense category.
//! Percentages are basis points (`10_000` = 100%) and the budgets of one
//! account never add up to more than [`FULL_ALLOCATION_BP`].

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// 100% expressed in basis points.
pub const FULL_ALLOCATION_BP: i64 = 10_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Budget {
    pub id: Uuid,
    pub account_id: Uuid,
    pub category_id: Uuid,
    pub percentage_bp: i64,
    pub created_at: DateTime<Utc>,
}

impl Budget {
    pub fn new(account_id: Uuid, category_id: Uuid, percentage_bp: i64) -> ResultEngine<Self> {
        validate_percentage(percentage_bp)?;
        Ok(Self {
            id: Uuid::new_v4(),
            account_id,
            category_id,
            percentage_bp,
            created_at: Utc::now(),
        })
    }

    /// Amount of `balance` this budget may spend. Negative balances allocate nothing.
    pub fn allocated_amount(&self, balance: i64) -> i64 {
        if balance <= 0 {
            return 0;
        }
        let allocated = i128::from(balance) * i128::from(self.percentage_bp)
            / i128::from(FULL_ALLOCATION_BP);
        // percentage_bp <= FULL_ALLOCATION_BP, so the result fits back into i64.
        allocated as i64
    }
}

/// How much of an account is already split among budgets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Allocation {
    pub account_id: Uuid,
    pub allocated_bp: i64,
    pub remaining_bp: i64,
}

impl Allocation {
    pub fn new(account_id: Uuid, allocated_bp: i64) -> Self {
        Self {
            account_id,
            allocated_bp,
            remaining_bp: (FULL_ALLOCATION_BP - allocated_bp).max(0),
        }
    }
}

/// Spending of a budget over one calendar month.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BudgetStatus {
    pub budget_id: Uuid,
    pub category_id: Uuid,
    pub month_start: NaiveDate,
    pub month_end: NaiveDate,
    pub percentage_bp: i64,
    pub allocated: i64,
    pub spent: i64,
    pub remaining: i64,
    pub over_budget: bool,
}

impl BudgetStatus {
    pub fn new(
        budget: &Budget,
        (month_start, month_end): (NaiveDate, NaiveDate),
        balance: i64,
        spent: i64,
    ) -> Self {
        let allocated = budget.allocated_amount(balance);
        let remaining = allocated - spent;
        Self {
            budget_id: budget.id,
            category_id: budget.category_id,
            month_start,
            month_end,
            percentage_bp: budget.percentage_bp,
            allocated,
            spent,
            remaining,
            over_budget: remaining < 0,
        }
    }
}

pub(crate) fn validate_percentage(percentage_bp: i64) -> ResultEngine<()> {
    if !(1..=FULL_ALLOCATION_BP).contains(&percentage_bp) {
        return Err(EngineError::InvalidPercentage(format!(
            "percentage_bp must be between 1 and {FULL_ALLOCATION_BP}"
        )));
    }
    Ok(())
}

/// Reject a percentage that would push the account total over 100%.
///
/// `others_bp` is the sum of every other budget of the account.
pub(crate) fn ensure_within_allocation(others_bp: i64, percentage_bp: i64) -> ResultEngine<()> {
    let total = others_bp + percentage_bp;
    if total > FULL_ALLOCATION_BP {
        return Err(EngineError::BudgetExceeded(format!(
            "account budgets would total {total} bp, only {} bp left",
            (FULL_ALLOCATION_BP - others_bp).max(0)
        )));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub account_id: Uuid,
    pub category_id: Uuid,
    pub percentage_bp: i64,
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
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Category,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Budget> for ActiveModel {
    fn from(value: &Budget) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            account_id: ActiveValue::Set(value.account_id),
            category_id: ActiveValue::Set(value.category_id),
            percentage_bp: ActiveValue::Set(value.percentage_bp),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl From<Model> for Budget {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            account_id: model.account_id,
            category_id: model.category_id,
            percentage_bp: model.percentage_bp,
            created_at: model.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budget(percentage_bp: i64) -> Budget {
        Budget::new(Uuid::new_v4(), Uuid::new_v4(), percentage_bp).unwrap()
    }

    #[test]
    fn rejects_out_of_range_percentages() {
        assert!(Budget::new(Uuid::new_v4(), Uuid::new_v4(), 0).is_err());
        assert!(Budget::new(Uuid::new_v4(), Uuid::new_v4(), 10_001).is_err());
        assert!(Budget::new(Uuid::new_v4(), Uuid::new_v4(), 10_000).is_ok());
    }

    #[test]
    fn allocation_may_reach_but_not_exceed_full() {
        assert!(ensure_within_allocation(7_500, 2_500).is_ok());
        let err = ensure_within_allocation(7_500, 2_501).unwrap_err();
        assert_eq!(
            err,
            EngineError::BudgetExceeded(
                "account budgets would total 10001 bp, only 2500 bp left".to_string()
            )
        );
    }

    #[test]
    fn allocated_amount_floors_and_ignores_negative_balances() {
        assert_eq!(budget(2_500).allocated_amount(10_001), 2_500);
        assert_eq!(budget(3_333).allocated_amount(100), 33);
        assert_eq!(budget(5_000).allocated_amount(-400), 0);
    }

    #[test]
    fn status_flags_overspending() {
        let budget = budget(1_000);
        let month = (
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
        );
        let status = BudgetStatus::new(&budget, month, 50_000, 6_000);
        assert_eq!(status.allocated, 5_000);
        assert_eq!(status.remaining, -1_000);
        assert!(status.over_budget);
    }

    #[test]
    fn remaining_allocation_is_never_negative() {
        let account_id = Uuid::new_v4();
        assert_eq!(Allocation::new(account_id, 4_000).remaining_bp, 6_000);
        assert_eq!(Allocation::new(account_id, 10_000).remaining_bp, 0);
    }
}
