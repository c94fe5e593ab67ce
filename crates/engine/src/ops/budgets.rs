use chrono::NaiveDate;
use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Allocation, Budget, BudgetStatus, EngineError, ResultEngine, TransactionKind,
    budgets::{self, ensure_within_allocation, validate_percentage},
    transactions,
    util::month_bounds,
};

use super::{Engine, with_tx};

impl Engine {
    /// Allocate `percentage_bp` of an account to an expense category.
    pub async fn create_budget(
        &self,
        user_id: Uuid,
        account_id: Uuid,
        category_id: Uuid,
        percentage_bp: i64,
    ) -> ResultEngine<Budget> {
        let budget = Budget::new(account_id, category_id, percentage_bp)?;

        with_tx!(self, |db_tx| {
            self.require_account(&db_tx, user_id, account_id).await?;
            let category = self.require_category(&db_tx, user_id, category_id).await?;
            if category.kind != TransactionKind::Expense.as_str() {
                return Err(EngineError::InvalidCategory(format!(
                    "budgets need an expense category, '{}' is {}",
                    category.name, category.kind
                )));
            }

            let exists = budgets::Entity::find()
                .filter(budgets::Column::AccountId.eq(account_id))
                .filter(budgets::Column::CategoryId.eq(category_id))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(format!(
                    "budget for category '{}'",
                    category.name
                )));
            }

            let others = self.allocated_bp(&db_tx, account_id, None).await?;
            ensure_within_allocation(others, percentage_bp)?;

            let model: budgets::ActiveModel = (&budget).into();
            model.insert(&db_tx).await?;
            Ok(budget)
        })
    }

    /// Budgets of an account, oldest first.
    pub async fn budgets(&self, user_id: Uuid, account_id: Uuid) -> ResultEngine<Vec<Budget>> {
        with_tx!(self, |db_tx| {
            self.require_account(&db_tx, user_id, account_id).await?;
            let models = budgets::Entity::find()
                .filter(budgets::Column::AccountId.eq(account_id))
                .order_by_asc(budgets::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Budget::from).collect())
        })
    }

    pub async fn budget(&self, user_id: Uuid, budget_id: Uuid) -> ResultEngine<Budget> {
        with_tx!(self, |db_tx| {
            self.require_budget(&db_tx, user_id, budget_id)
                .await
                .map(Budget::from)
        })
    }

    /// Change the percentage of a budget. Its previous value does not count
    /// against the account total.
    pub async fn update_budget(
        &self,
        user_id: Uuid,
        budget_id: Uuid,
        percentage_bp: i64,
    ) -> ResultEngine<Budget> {
        validate_percentage(percentage_bp)?;

        with_tx!(self, |db_tx| {
            let model = self.require_budget(&db_tx, user_id, budget_id).await?;
            let others = self
                .allocated_bp(&db_tx, model.account_id, Some(budget_id))
                .await?;
            ensure_within_allocation(others, percentage_bp)?;

            let mut active: budgets::ActiveModel = model.into();
            active.percentage_bp = ActiveValue::Set(percentage_bp);
            let model = active.update(&db_tx).await?;
            Ok(Budget::from(model))
        })
    }

    pub async fn delete_budget(&self, user_id: Uuid, budget_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_budget(&db_tx, user_id, budget_id).await?;
            budgets::Entity::delete_by_id(budget_id).exec(&db_tx).await?;
            Ok(())
        })
    }

    pub async fn budget_allocation(
        &self,
        user_id: Uuid,
        account_id: Uuid,
    ) -> ResultEngine<Allocation> {
        with_tx!(self, |db_tx| {
            self.require_account(&db_tx, user_id, account_id).await?;
            let allocated = self.allocated_bp(&db_tx, account_id, None).await?;
            Ok(Allocation::new(account_id, allocated))
        })
    }

    /// Spending against a budget for the calendar month containing `month`.
    ///
    /// The allocated amount follows the current account balance.
    pub async fn budget_status(
        &self,
        user_id: Uuid,
        budget_id: Uuid,
        month: NaiveDate,
    ) -> ResultEngine<BudgetStatus> {
        let bounds = month_bounds(month)?;

        with_tx!(self, |db_tx| {
            let budget = Budget::from(self.require_budget(&db_tx, user_id, budget_id).await?);
            let account = self
                .require_account(&db_tx, user_id, budget.account_id)
                .await?;

            let spent = transactions::Entity::find()
                .filter(transactions::Column::AccountId.eq(budget.account_id))
                .filter(transactions::Column::CategoryId.eq(budget.category_id))
                .filter(transactions::Column::Kind.eq(TransactionKind::Expense.as_str()))
                .filter(transactions::Column::OccurredOn.gte(bounds.0))
                .filter(transactions::Column::OccurredOn.lte(bounds.1))
                .all(&db_tx)
                .await?
                .iter()
                .map(|model| model.amount_minor)
                .sum::<i64>();

            Ok(BudgetStatus::new(&budget, bounds, account.balance, spent))
        })
    }

    /// Sum of the account's budget percentages, optionally leaving one out.
    async fn allocated_bp(
        &self,
        db: &DatabaseTransaction,
        account_id: Uuid,
        except: Option<Uuid>,
    ) -> ResultEngine<i64> {
        let mut query = budgets::Entity::find().filter(budgets::Column::AccountId.eq(account_id));
        if let Some(budget_id) = except {
            query = query.filter(budgets::Column::Id.ne(budget_id));
        }
        let total = query
            .all(db)
            .await?
            .iter()
            .map(|model| model.percentage_bp)
            .sum();
        Ok(total)
    }
}
