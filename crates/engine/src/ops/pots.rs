use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{
    EngineError, Pot, PotUpdate, ResultEngine, pots, transactions::ensure_positive_amount,
    util::normalize_required_name,
};

use super::{Engine, with_tx};

impl Engine {
    pub async fn create_pot(
        &self,
        user_id: Uuid,
        account_id: Uuid,
        name: &str,
        target_minor: Option<i64>,
    ) -> ResultEngine<Pot> {
        let name = normalize_required_name(name, "pot")?;

        with_tx!(self, |db_tx| {
            self.require_account(&db_tx, user_id, account_id).await?;
            self.ensure_pot_name_free(&db_tx, account_id, &name, None)
                .await?;

            let pot = Pot::new(account_id, name, target_minor)?;
            let model: pots::ActiveModel = (&pot).into();
            model.insert(&db_tx).await?;
            Ok(pot)
        })
    }

    pub async fn pots(&self, user_id: Uuid, account_id: Uuid) -> ResultEngine<Vec<Pot>> {
        with_tx!(self, |db_tx| {
            self.require_account(&db_tx, user_id, account_id).await?;
            let models = pots::Entity::find()
                .filter(pots::Column::AccountId.eq(account_id))
                .order_by_asc(pots::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Pot::from).collect())
        })
    }

    pub async fn pot(&self, user_id: Uuid, pot_id: Uuid) -> ResultEngine<Pot> {
        with_tx!(self, |db_tx| {
            self.require_pot(&db_tx, user_id, pot_id).await.map(Pot::from)
        })
    }

    pub async fn update_pot(
        &self,
        user_id: Uuid,
        pot_id: Uuid,
        update: PotUpdate,
    ) -> ResultEngine<Pot> {
        let name = update
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "pot"))
            .transpose()?;
        if let Some(Some(target_minor)) = update.target_minor {
            ensure_positive_amount(target_minor)?;
        }

        with_tx!(self, |db_tx| {
            let mut pot = Pot::from(self.require_pot(&db_tx, user_id, pot_id).await?);
            if let Some(name) = name {
                self.ensure_pot_name_free(&db_tx, pot.account_id, &name, Some(pot_id))
                    .await?;
                pot.name = name;
            }
            if let Some(target_minor) = update.target_minor {
                pot.target_minor = target_minor;
            }

            let model: pots::ActiveModel = (&pot).into();
            model.update(&db_tx).await?;
            Ok(pot)
        })
    }

    /// Set money aside: the account balance shrinks by `amount_minor` and
    /// the pot grows by the same amount.
    pub async fn deposit_to_pot(
        &self,
        user_id: Uuid,
        pot_id: Uuid,
        amount_minor: i64,
    ) -> ResultEngine<Pot> {
        with_tx!(self, |db_tx| {
            let mut pot = Pot::from(self.require_pot(&db_tx, user_id, pot_id).await?);
            let account = self.require_account(&db_tx, user_id, pot.account_id).await?;
            pot.deposit(amount_minor)?;
            if account.balance < amount_minor {
                return Err(EngineError::InsufficientFunds(format!(
                    "account '{}' holds only {}",
                    account.name, account.balance
                )));
            }

            let model: pots::ActiveModel = (&pot).into();
            model.update(&db_tx).await?;
            self.apply_balance_delta(&db_tx, account.id, -amount_minor)
                .await?;
            Ok(pot)
        })
    }

    /// Put money from the pot back into its account.
    pub async fn withdraw_from_pot(
        &self,
        user_id: Uuid,
        pot_id: Uuid,
        amount_minor: i64,
    ) -> ResultEngine<Pot> {
        with_tx!(self, |db_tx| {
            let mut pot = Pot::from(self.require_pot(&db_tx, user_id, pot_id).await?);
            pot.withdraw(amount_minor)?;

            let model: pots::ActiveModel = (&pot).into();
            model.update(&db_tx).await?;
            self.apply_balance_delta(&db_tx, pot.account_id, amount_minor)
                .await?;
            Ok(pot)
        })
    }

    /// Delete a pot, returning whatever it holds to the account.
    pub async fn delete_pot(&self, user_id: Uuid, pot_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let pot = Pot::from(self.require_pot(&db_tx, user_id, pot_id).await?);
            pots::Entity::delete_by_id(pot_id).exec(&db_tx).await?;
            self.apply_balance_delta(&db_tx, pot.account_id, pot.current_minor)
                .await?;
            Ok(())
        })
    }

    /// Pot names are unique per account, ignoring case.
    async fn ensure_pot_name_free(
        &self,
        db: &DatabaseTransaction,
        account_id: Uuid,
        name: &str,
        except: Option<Uuid>,
    ) -> ResultEngine<()> {
        let mut query = pots::Entity::find()
            .filter(pots::Column::AccountId.eq(account_id))
            .filter(Expr::cust("LOWER(name)").eq(name.to_lowercase()));
        if let Some(pot_id) = except {
            query = query.filter(pots::Column::Id.ne(pot_id));
        }
        if query.one(db).await?.is_some() {
            return Err(EngineError::ExistingKey(name.to_string()));
        }
        Ok(())
    }
}
