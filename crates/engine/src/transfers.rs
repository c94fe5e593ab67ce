//! Transfers move money between two accounts of the same user.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, transactions::ensure_positive_amount};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub id: Uuid,
    pub user_id: Uuid,
    pub from_account_id: Uuid,
    pub to_account_id: Uuid,
    pub amount_minor: i64,
    pub note: Option<String>,
    pub occurred_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Transfer {
    pub fn new(
        user_id: Uuid,
        from_account_id: Uuid,
        to_account_id: Uuid,
        amount_minor: i64,
        note: Option<String>,
        occurred_on: NaiveDate,
    ) -> ResultEngine<Self> {
        ensure_positive_amount(amount_minor)?;
        if from_account_id == to_account_id {
            return Err(EngineError::InvalidTransfer(
                "source and destination accounts must differ".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            from_account_id,
            to_account_id,
            amount_minor,
            note,
            occurred_on,
            created_at: Utc::now(),
        })
    }

    pub fn involves(&self, account_id: Uuid) -> bool {
        self.from_account_id == account_id || self.to_account_id == account_id
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transfers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub from_account_id: Uuid,
    pub to_account_id: Uuid,
    pub amount_minor: i64,
    pub note: Option<String>,
    pub occurred_on: Date,
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

impl From<&Transfer> for ActiveModel {
    fn from(value: &Transfer) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            user_id: ActiveValue::Set(value.user_id),
            from_account_id: ActiveValue::Set(value.from_account_id),
            to_account_id: ActiveValue::Set(value.to_account_id),
            amount_minor: ActiveValue::Set(value.amount_minor),
            note: ActiveValue::Set(value.note.clone()),
            occurred_on: ActiveValue::Set(value.occurred_on),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl From<Model> for Transfer {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            from_account_id: model.from_account_id,
            to_account_id: model.to_account_id,
            amount_minor: model.amount_minor,
            note: model.note,
            occurred_on: model.occurred_on,
            created_at: model.created_at,
        }
    }
}
