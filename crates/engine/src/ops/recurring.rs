use chrono::NaiveDate;
use sea_orm::{QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{
    EngineError, Recurring, RecurringCmd, RecurringRunReport, RecurringUpdate, ResultEngine,
    accounts, recurring, transactions,
    transactions::ensure_positive_amount,
    util::normalize_optional_text,
};

use super::{Engine, with_tx};

impl Engine {
    /// Create a recurring template. The first occurrence is `start_on`.
    pub async fn create_recurring(
        &self,
        user_id: Uuid,
        cmd: RecurringCmd,
    ) -> ResultEngine<Recurring> {
        let template = Recurring::new(
            cmd.account_id,
            cmd.kind,
            cmd.amount_minor,
            cmd.category_id,
            normalize_optional_text(cmd.description.as_deref()),
            cmd.frequency,
            cmd.start_on,
            cmd.end_on,
        )?;

        with_tx!(self, |db_tx| {
            self.require_account(&db_tx, user_id, template.account_id)
                .await?;
            self.require_category_of_kind(&db_tx, user_id, template.category_id, template.kind)
                .await?;

            let model: recurring::ActiveModel = (&template).into();
            model.insert(&db_tx).await?;
            Ok(template)
        })
    }

    /// Templates of the user ordered by next run, optionally for one account.
    pub async fn recurring_templates(
        &self,
        user_id: Uuid,
        account_id: Option<Uuid>,
    ) -> ResultEngine<Vec<Recurring>> {
        with_tx!(self, |db_tx| {
            let mut query = recurring::Entity::find()
                .inner_join(accounts::Entity)
                .filter(accounts::Column::UserId.eq(user_id));
            if let Some(account_id) = account_id {
                self.require_account(&db_tx, user_id, account_id).await?;
                query = query.filter(recurring::Column::AccountId.eq(account_id));
            }
            query
                .order_by_asc(recurring::Column::NextRunOn)
                .order_by_asc(recurring::Column::CreatedAt)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Recurring::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    pub async fn recurring(&self, user_id: Uuid, recurring_id: Uuid) -> ResultEngine<Recurring> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_recurring(&db_tx, user_id, recurring_id)
                .await?;
            Recurring::try_from(model)
        })
    }

    pub async fn update_recurring(
        &self,
        user_id: Uuid,
        recurring_id: Uuid,
        update: RecurringUpdate,
    ) -> ResultEngine<Recurring> {
        if let Some(amount_minor) = update.amount_minor {
            ensure_positive_amount(amount_minor)?;
        }

        with_tx!(self, |db_tx| {
            let model = self
                .require_recurring(&db_tx, user_id, recurring_id)
                .await?;
            let mut template = Recurring::try_from(model)?;

            if let Some(category_id) = update.category_id {
                self.require_category_of_kind(&db_tx, user_id, category_id, template.kind)
                    .await?;
                template.category_id = category_id;
            }
            if let Some(amount_minor) = update.amount_minor {
                template.amount_minor = amount_minor;
            }
            if let Some(description) = update.description.as_deref() {
                template.description = normalize_optional_text(Some(description));
            }
            if let Some(end_on) = update.end_on {
                template.set_end_on(end_on)?;
            }

            let model: recurring::ActiveModel = (&template).into();
            model.update(&db_tx).await?;
            Ok(template)
        })
    }

    /// Stop a template from producing transactions until it is resumed.
    pub async fn pause_recurring(
        &self,
        user_id: Uuid,
        recurring_id: Uuid,
    ) -> ResultEngine<Recurring> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_recurring(&db_tx, user_id, recurring_id)
                .await?;
            let mut template = Recurring::try_from(model)?;
            template.active = false;

            let model: recurring::ActiveModel = (&template).into();
            model.update(&db_tx).await?;
            Ok(template)
        })
    }

    /// Reactivate a template. Occurrences missed while paused are skipped:
    /// the next run is the first occurrence on or after `today`.
    pub async fn resume_recurring(
        &self,
        user_id: Uuid,
        recurring_id: Uuid,
        today: NaiveDate,
    ) -> ResultEngine<Recurring> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_recurring(&db_tx, user_id, recurring_id)
                .await?;
            let mut template = Recurring::try_from(model)?;
            template.resume(today)?;

            let model: recurring::ActiveModel = (&template).into();
            model.update(&db_tx).await?;
            Ok(template)
        })
    }

    /// Delete a template. Transactions it already produced stay.
    pub async fn delete_recurring(&self, user_id: Uuid, recurring_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_recurring(&db_tx, user_id, recurring_id)
                .await?;
            transactions::Entity::update_many()
                .col_expr(
                    transactions::Column::RecurringId,
                    Expr::value(Option::<Uuid>::None),
                )
                .filter(transactions::Column::RecurringId.eq(recurring_id))
                .exec(&db_tx)
                .await?;
            recurring::Entity::delete_by_id(recurring_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Materialize every template due on or before `today`.
    ///
    /// Each template runs in its own DB transaction: a failing template is
    /// rolled back, logged and counted in [`RecurringRunReport::failed`]
    /// while the others go on.
    pub async fn run_due_recurring(&self, today: NaiveDate) -> ResultEngine<RecurringRunReport> {
        let due = recurring::Entity::find()
            .select_only()
            .column(recurring::Column::Id)
            .filter(recurring::Column::Active.eq(true))
            .filter(recurring::Column::NextRunOn.lte(today))
            .into_tuple::<Uuid>()
            .all(&self.database)
            .await?;
        Ok(self.run_templates(due, today).await)
    }

    /// Same as [`Engine::run_due_recurring`], restricted to one user's
    /// templates.
    pub async fn run_due_recurring_for_user(
        &self,
        user_id: Uuid,
        today: NaiveDate,
    ) -> ResultEngine<RecurringRunReport> {
        let due = recurring::Entity::find()
            .select_only()
            .column(recurring::Column::Id)
            .inner_join(accounts::Entity)
            .filter(accounts::Column::UserId.eq(user_id))
            .filter(recurring::Column::Active.eq(true))
            .filter(recurring::Column::NextRunOn.lte(today))
            .into_tuple::<Uuid>()
            .all(&self.database)
            .await?;
        Ok(self.run_templates(due, today).await)
    }

    async fn run_templates(&self, due: Vec<Uuid>, today: NaiveDate) -> RecurringRunReport {
        let mut report = RecurringRunReport {
            date: today,
            processed: 0,
            created: 0,
            failed: 0,
        };
        for recurring_id in due {
            match self.run_template(recurring_id, today).await {
                Ok(0) => {}
                Ok(created) => {
                    report.processed += 1;
                    report.created += created;
                }
                Err(err) => {
                    tracing::warn!(%recurring_id, %today, error = %err, "recurring run failed");
                    report.failed += 1;
                }
            }
        }
        tracing::info!(
            %today,
            processed = report.processed,
            created = report.created,
            failed = report.failed,
            "recurring run finished"
        );
        report
    }

    /// Materialize the due occurrences of one template. Returns how many
    /// transactions were created.
    async fn run_template(&self, recurring_id: Uuid, today: NaiveDate) -> ResultEngine<u64> {
        with_tx!(self, |db_tx| {
            let Some(model) = recurring::Entity::find_by_id(recurring_id)
                .one(&db_tx)
                .await?
            else {
                return Ok(0);
            };
            let mut template = Recurring::try_from(model)?;
            let dates = template.take_due(today)?;

            let mut created = 0u64;
            for date in dates {
                let transaction = template.materialize(date)?;
                let model: transactions::ActiveModel = (&transaction).into();
                model.insert(&db_tx).await?;
                self.apply_balance_delta(&db_tx, transaction.account_id, transaction.signed_amount())
                    .await
                    .map_err(|err| match err {
                        EngineError::KeyNotFound(_) => EngineError::KeyNotFound(format!(
                            "account of recurring transaction {recurring_id} not exists"
                        )),
                        other => other,
                    })?;
                created += 1;
            }

            let model: recurring::ActiveModel = (&template).into();
            model.update(&db_tx).await?;
            Ok(created)
        })
    }
}
