use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveValue, Condition, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    Account, Currency, EngineError, ResultEngine, Summary, Transaction, TransactionKind, accounts,
    budgets, pots, recurring, transactions, transfers,
    util::{ensure_date_range, normalize_required_name},
};

use super::{Engine, with_tx};

const OPENING_BALANCE_DESCRIPTION: &str = "Opening balance";

impl Engine {
    /// Add a new account.
    ///
    /// The first account of a user becomes the default one. A non-zero
    /// `opening_balance_minor` is recorded as an income (or expense)
    /// transaction so the ledger explains the balance.
    pub async fn create_account(
        &self,
        user_id: Uuid,
        name: &str,
        currency: Option<Currency>,
        opening_balance_minor: i64,
    ) -> ResultEngine<Account> {
        let name = normalize_required_name(name, "account")?;
        let opening = opening_balance_minor
            .checked_abs()
            .ok_or_else(|| EngineError::InvalidAmount("opening balance overflows".to_string()))?;

        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            self.ensure_account_name_free(&db_tx, user_id, &name, None)
                .await?;

            let has_accounts = accounts::Entity::find()
                .filter(accounts::Column::UserId.eq(user_id))
                .one(&db_tx)
                .await?
                .is_some();

            let mut account = Account::new(user_id, name, currency.unwrap_or_default());
            account.is_default = !has_accounts;
            let model: accounts::ActiveModel = (&account).into();
            model.insert(&db_tx).await?;

            if opening != 0 {
                let kind = if opening_balance_minor > 0 {
                    TransactionKind::Income
                } else {
                    TransactionKind::Expense
                };
                let transaction = Transaction::new(
                    account.id,
                    kind,
                    opening,
                    None,
                    Some(OPENING_BALANCE_DESCRIPTION.to_string()),
                    Utc::now().date_naive(),
                )?;
                let tx_model: transactions::ActiveModel = (&transaction).into();
                tx_model.insert(&db_tx).await?;
                let stored = self
                    .apply_balance_delta(&db_tx, account.id, transaction.signed_amount())
                    .await?;
                account.balance = stored.balance;
            }

            Ok(account)
        })
    }

    /// Accounts of the user, oldest first.
    pub async fn accounts(&self, user_id: Uuid) -> ResultEngine<Vec<Account>> {
        with_tx!(self, |db_tx| {
            accounts::Entity::find()
                .filter(accounts::Column::UserId.eq(user_id))
                .order_by_asc(accounts::Column::CreatedAt)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Account::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    pub async fn account(&self, user_id: Uuid, account_id: Uuid) -> ResultEngine<Account> {
        with_tx!(self, |db_tx| {
            let model = self.require_account(&db_tx, user_id, account_id).await?;
            Account::try_from(model)
        })
    }

    pub async fn rename_account(
        &self,
        user_id: Uuid,
        account_id: Uuid,
        name: &str,
    ) -> ResultEngine<Account> {
        let name = normalize_required_name(name, "account")?;

        with_tx!(self, |db_tx| {
            let model = self.require_account(&db_tx, user_id, account_id).await?;
            self.ensure_account_name_free(&db_tx, user_id, &name, Some(account_id))
                .await?;

            let mut active: accounts::ActiveModel = model.into();
            active.name = ActiveValue::Set(name);
            let model = active.update(&db_tx).await?;
            Account::try_from(model)
        })
    }

    /// Make `account_id` the only default account of the user.
    pub async fn set_default_account(
        &self,
        user_id: Uuid,
        account_id: Uuid,
    ) -> ResultEngine<Account> {
        with_tx!(self, |db_tx| {
            self.require_account(&db_tx, user_id, account_id).await?;
            self.mark_default(&db_tx, user_id, account_id).await?;
            let model = self.require_account(&db_tx, user_id, account_id).await?;
            Account::try_from(model)
        })
    }

    /// Delete an account with its transactions, transfers, budgets, pots and
    /// recurring templates.
    ///
    /// When the default account goes away the oldest remaining one takes its
    /// place.
    pub async fn delete_account(&self, user_id: Uuid, account_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_account(&db_tx, user_id, account_id).await?;
            self.purge_account(&db_tx, account_id).await?;

            if model.is_default
                && let Some(next) = accounts::Entity::find()
                    .filter(accounts::Column::UserId.eq(user_id))
                    .order_by_asc(accounts::Column::CreatedAt)
                    .one(&db_tx)
                    .await?
            {
                self.mark_default(&db_tx, user_id, next.id).await?;
            }
            Ok(())
        })
    }

    /// Income and expense totals of an account between `from` and `to`
    /// (both inclusive, both optional).
    pub async fn account_summary(
        &self,
        user_id: Uuid,
        account_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> ResultEngine<Summary> {
        ensure_date_range(from, to)?;

        with_tx!(self, |db_tx| {
            self.require_account(&db_tx, user_id, account_id).await?;

            let mut query =
                transactions::Entity::find().filter(transactions::Column::AccountId.eq(account_id));
            if let Some(from) = from {
                query = query.filter(transactions::Column::OccurredOn.gte(from));
            }
            if let Some(to) = to {
                query = query.filter(transactions::Column::OccurredOn.lte(to));
            }

            let mut summary = Summary::default();
            for model in query.all(&db_tx).await? {
                let kind = TransactionKind::try_from(model.kind.as_str())?;
                summary.add(kind, model.amount_minor);
            }
            Ok(summary)
        })
    }

    /// Remove an account and every row hanging off it.
    pub(super) async fn purge_account(
        &self,
        db: &DatabaseTransaction,
        account_id: Uuid,
    ) -> ResultEngine<()> {
        transactions::Entity::delete_many()
            .filter(transactions::Column::AccountId.eq(account_id))
            .exec(db)
            .await?;
        transfers::Entity::delete_many()
            .filter(
                Condition::any()
                    .add(transfers::Column::FromAccountId.eq(account_id))
                    .add(transfers::Column::ToAccountId.eq(account_id)),
            )
            .exec(db)
            .await?;
        budgets::Entity::delete_many()
            .filter(budgets::Column::AccountId.eq(account_id))
            .exec(db)
            .await?;
        pots::Entity::delete_many()
            .filter(pots::Column::AccountId.eq(account_id))
            .exec(db)
            .await?;
        recurring::Entity::delete_many()
            .filter(recurring::Column::AccountId.eq(account_id))
            .exec(db)
            .await?;
        accounts::Entity::delete_by_id(account_id).exec(db).await?;
        Ok(())
    }

    async fn mark_default(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
        account_id: Uuid,
    ) -> ResultEngine<()> {
        accounts::Entity::update_many()
            .col_expr(accounts::Column::IsDefault, Expr::value(false))
            .filter(accounts::Column::UserId.eq(user_id))
            .exec(db)
            .await?;
        accounts::Entity::update_many()
            .col_expr(accounts::Column::IsDefault, Expr::value(true))
            .filter(accounts::Column::Id.eq(account_id))
            .exec(db)
            .await?;
        Ok(())
    }

    /// Account names are unique per user, ignoring case.
    async fn ensure_account_name_free(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
        name: &str,
        except: Option<Uuid>,
    ) -> ResultEngine<()> {
        let mut query = accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id))
            .filter(Expr::cust("LOWER(name)").eq(name.to_lowercase()));
        if let Some(account_id) = except {
            query = query.filter(accounts::Column::Id.ne(account_id));
        }
        if query.one(db).await?.is_some() {
            return Err(EngineError::ExistingKey(name.to_string()));
        }
        Ok(())
    }
}
