//! The module contains `Account` struct and its table.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{Currency, EngineError};

/// An account.
///
/// An account is a user-owned balance container: a bank account, a card, a
/// cash envelope. A user may own several accounts, exactly one of which is
/// marked as default once the first account exists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub currency: Currency,
    /// Balance in minor units. Money parked in pots is not part of it.
    pub balance: i64,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(user_id: Uuid, name: String, currency: Currency) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            currency,
            balance: 0,
            is_default: false,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub currency: String,
    pub balance: i64,
    pub is_default: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Account> for ActiveModel {
    fn from(value: &Account) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            user_id: ActiveValue::Set(value.user_id),
            name: ActiveValue::Set(value.name.clone()),
            currency: ActiveValue::Set(value.currency.code().to_string()),
            balance: ActiveValue::Set(value.balance),
            is_default: ActiveValue::Set(value.is_default),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for Account {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            currency: Currency::try_from(model.currency.as_str())?,
            balance: model.balance,
            is_default: model.is_default,
            created_at: model.created_at,
        })
    }
}
