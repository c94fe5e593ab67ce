//! Pots: money set aside inside an account.
//!
//! Depositing into a pot takes money out of the account balance; withdrawing
//! puts it back. Deleting a pot returns whatever it holds to the account.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, transactions::ensure_positive_amount, util::progress_bp};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pot {
    pub id: Uuid,
    pub account_id: Uuid,
    pub name: String,
    pub target_minor: Option<i64>,
    pub current_minor: i64,
    pub created_at: DateTime<Utc>,
}

impl Pot {
    pub fn new(account_id: Uuid, name: String, target_minor: Option<i64>) -> ResultEngine<Self> {
        if let Some(target) = target_minor {
            ensure_positive_amount(target)?;
        }
        Ok(Self {
            id: Uuid::new_v4(),
            account_id,
            name,
            target_minor,
            current_minor: 0,
            created_at: Utc::now(),
        })
    }

    pub fn progress_bp(&self) -> Option<i64> {
        self.target_minor
            .map(|target| progress_bp(self.current_minor, target))
    }

    pub fn deposit(&mut self, amount_minor: i64) -> ResultEngine<()> {
        ensure_positive_amount(amount_minor)?;
        self.current_minor = self
            .current_minor
            .checked_add(amount_minor)
            .ok_or_else(|| EngineError::InvalidAmount("deposit overflows".to_string()))?;
        Ok(())
    }

    pub fn withdraw(&mut self, amount_minor: i64) -> ResultEngine<()> {
        ensure_positive_amount(amount_minor)?;
        if amount_minor > self.current_minor {
            return Err(EngineError::InsufficientFunds(format!(
                "pot '{}' holds only {}",
                self.name, self.current_minor
            )));
        }
        self.current_minor -= amount_minor;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "pots")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub account_id: Uuid,
    pub name: String,
    pub target_minor: Option<i64>,
    pub current_minor: i64,
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

impl From<&Pot> for ActiveModel {
    fn from(value: &Pot) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            account_id: ActiveValue::Set(value.account_id),
            name: ActiveValue::Set(value.name.clone()),
            target_minor: ActiveValue::Set(value.target_minor),
            current_minor: ActiveValue::Set(value.current_minor),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl From<Model> for Pot {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            account_id: model.account_id,
            name: model.name,
            target_minor: model.target_minor,
            current_minor: model.current_minor,
            created_at: model.created_at,
        }
    }
}
