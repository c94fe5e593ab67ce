use sea_orm::{Condition, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, Transfer, TransferCmd, transfers, util::normalize_optional_text,
};

use super::{Engine, with_tx};

impl Engine {
    /// Move money between two accounts of the user.
    ///
    /// Both accounts must share a currency and the source must cover the
    /// amount.
    pub async fn create_transfer(&self, user_id: Uuid, cmd: TransferCmd) -> ResultEngine<Transfer> {
        let transfer = Transfer::new(
            user_id,
            cmd.from_account_id,
            cmd.to_account_id,
            cmd.amount_minor,
            normalize_optional_text(cmd.note.as_deref()),
            cmd.occurred_on,
        )?;

        with_tx!(self, |db_tx| {
            let from = self
                .require_account(&db_tx, user_id, transfer.from_account_id)
                .await?;
            let to = self
                .require_account(&db_tx, user_id, transfer.to_account_id)
                .await?;
            if from.currency != to.currency {
                return Err(EngineError::CurrencyMismatch(format!(
                    "cannot transfer from {} to {}",
                    from.currency, to.currency
                )));
            }
            if from.balance < transfer.amount_minor {
                return Err(EngineError::InsufficientFunds(format!(
                    "account '{}' holds only {}",
                    from.name, from.balance
                )));
            }

            let model: transfers::ActiveModel = (&transfer).into();
            model.insert(&db_tx).await?;
            self.apply_balance_delta(&db_tx, from.id, -transfer.amount_minor)
                .await?;
            self.apply_balance_delta(&db_tx, to.id, transfer.amount_minor)
                .await?;
            Ok(transfer)
        })
    }

    /// Transfers of the user, newest first, optionally only those touching
    /// one account.
    pub async fn transfers(
        &self,
        user_id: Uuid,
        account_id: Option<Uuid>,
    ) -> ResultEngine<Vec<Transfer>> {
        with_tx!(self, |db_tx| {
            let mut query = transfers::Entity::find().filter(transfers::Column::UserId.eq(user_id));
            if let Some(account_id) = account_id {
                self.require_account(&db_tx, user_id, account_id).await?;
                query = query.filter(
                    Condition::any()
                        .add(transfers::Column::FromAccountId.eq(account_id))
                        .add(transfers::Column::ToAccountId.eq(account_id)),
                );
            }
            let models = query
                .order_by_desc(transfers::Column::OccurredOn)
                .order_by_desc(transfers::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Transfer::from).collect())
        })
    }

    pub async fn transfer(&self, user_id: Uuid, transfer_id: Uuid) -> ResultEngine<Transfer> {
        with_tx!(self, |db_tx| {
            self.require_transfer(&db_tx, user_id, transfer_id)
                .await
                .map(Transfer::from)
        })
    }

    /// Delete a transfer and move the money back. The destination may end
    /// up negative.
    pub async fn delete_transfer(&self, user_id: Uuid, transfer_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let transfer = Transfer::from(self.require_transfer(&db_tx, user_id, transfer_id).await?);

            transfers::Entity::delete_by_id(transfer_id)
                .exec(&db_tx)
                .await?;
            self.apply_balance_delta(&db_tx, transfer.from_account_id, transfer.amount_minor)
                .await?;
            self.apply_balance_delta(&db_tx, transfer.to_account_id, -transfer.amount_minor)
                .await?;
            Ok(())
        })
    }
}
