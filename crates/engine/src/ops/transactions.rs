use sea_orm::{QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, Transaction, TransactionCmd, TransactionListFilter,
    TransactionUpdate, accounts, page_limit, transactions,
    transactions::ensure_positive_amount,
    util::{ensure_date_range, normalize_optional_text},
};

use super::{Engine, with_tx};

impl Engine {
    /// Record an income or expense and move the account balance with it.
    ///
    /// Expenses may take an account below zero.
    pub async fn create_transaction(
        &self,
        user_id: Uuid,
        cmd: TransactionCmd,
    ) -> ResultEngine<Transaction> {
        let transaction = Transaction::new(
            cmd.account_id,
            cmd.kind,
            cmd.amount_minor,
            cmd.category_id,
            normalize_optional_text(cmd.description.as_deref()),
            cmd.occurred_on,
        )?;

        with_tx!(self, |db_tx| {
            self.require_account(&db_tx, user_id, transaction.account_id)
                .await?;
            self.require_category_of_kind(&db_tx, user_id, transaction.category_id, transaction.kind)
                .await?;

            let model: transactions::ActiveModel = (&transaction).into();
            model.insert(&db_tx).await?;
            self.apply_balance_delta(&db_tx, transaction.account_id, transaction.signed_amount())
                .await?;
            Ok(transaction)
        })
    }

    pub async fn transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction(&db_tx, user_id, transaction_id)
                .await?;
            Transaction::try_from(model)
        })
    }

    /// Transactions of the user matching `filter`, newest first.
    ///
    /// `limit` defaults to 50 and is capped at 200.
    pub async fn transactions(
        &self,
        user_id: Uuid,
        filter: &TransactionListFilter,
        limit: Option<u64>,
        offset: u64,
    ) -> ResultEngine<Vec<Transaction>> {
        ensure_date_range(filter.from, filter.to)?;
        let limit = page_limit(limit);

        with_tx!(self, |db_tx| {
            if let Some(account_id) = filter.account_id {
                self.require_account(&db_tx, user_id, account_id).await?;
            }

            let mut query = transactions::Entity::find()
                .inner_join(accounts::Entity)
                .filter(accounts::Column::UserId.eq(user_id));
            if let Some(account_id) = filter.account_id {
                query = query.filter(transactions::Column::AccountId.eq(account_id));
            }
            if let Some(category_id) = filter.category_id {
                query = query.filter(transactions::Column::CategoryId.eq(category_id));
            }
            if let Some(kind) = filter.kind {
                query = query.filter(transactions::Column::Kind.eq(kind.as_str()));
            }
            if let Some(from) = filter.from {
                query = query.filter(transactions::Column::OccurredOn.gte(from));
            }
            if let Some(to) = filter.to {
                query = query.filter(transactions::Column::OccurredOn.lte(to));
            }

            query
                .order_by_desc(transactions::Column::OccurredOn)
                .order_by_desc(transactions::Column::CreatedAt)
                .limit(limit)
                .offset(offset)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Transaction::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Edit a transaction; the account balance is corrected by the
    /// difference with the stored amount.
    pub async fn update_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
        update: TransactionUpdate,
    ) -> ResultEngine<Transaction> {
        if let Some(amount_minor) = update.amount_minor {
            ensure_positive_amount(amount_minor)?;
        }

        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction(&db_tx, user_id, transaction_id)
                .await?;
            let mut transaction = Transaction::try_from(model)?;
            let previous = transaction.signed_amount();

            if let Some(category_id) = update.category_id {
                self.require_category_of_kind(&db_tx, user_id, category_id, transaction.kind)
                    .await?;
                transaction.category_id = category_id;
            }
            if let Some(amount_minor) = update.amount_minor {
                transaction.amount_minor = amount_minor;
            }
            if let Some(description) = update.description.as_deref() {
                transaction.description = normalize_optional_text(Some(description));
            }
            if let Some(occurred_on) = update.occurred_on {
                transaction.occurred_on = occurred_on;
            }

            let active: transactions::ActiveModel = (&transaction).into();
            active.update(&db_tx).await?;

            let delta = transaction
                .signed_amount()
                .checked_sub(previous)
                .ok_or_else(|| EngineError::InvalidAmount("amount overflows".to_string()))?;
            self.apply_balance_delta(&db_tx, transaction.account_id, delta)
                .await?;
            Ok(transaction)
        })
    }

    /// Delete a transaction and revert its effect on the account balance.
    pub async fn delete_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction(&db_tx, user_id, transaction_id)
                .await?;
            let transaction = Transaction::try_from(model)?;

            transactions::Entity::delete_by_id(transaction_id)
                .exec(&db_tx)
                .await?;
            self.apply_balance_delta(&db_tx, transaction.account_id, -transaction.signed_amount())
                .await?;
            Ok(())
        })
    }
}
