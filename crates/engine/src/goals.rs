//! Savings goals.
//!
//! Goals are tracking-only: contributing to a goal does not touch any account.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, transactions::ensure_positive_amount, util::progress_bp};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub target_minor: i64,
    pub current_minor: i64,
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    pub fn new(
        user_id: Uuid,
        name: String,
        target_minor: i64,
        deadline: Option<NaiveDate>,
    ) -> ResultEngine<Self> {
        ensure_positive_amount(target_minor)?;
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            target_minor,
            current_minor: 0,
            deadline,
            created_at: Utc::now(),
        })
    }

    /// Progress towards the target, capped at 100% (`10_000` bp).
    pub fn progress_bp(&self) -> i64 {
        progress_bp(self.current_minor, self.target_minor)
    }

    pub fn completed(&self) -> bool {
        self.current_minor >= self.target_minor
    }

    /// Add (positive) or withdraw (negative) money from the goal.
    pub fn contribute(&mut self, amount_minor: i64) -> ResultEngine<()> {
        if amount_minor == 0 {
            return Err(EngineError::InvalidAmount(
                "contribution must not be 0".to_string(),
            ));
        }
        let current = self
            .current_minor
            .checked_add(amount_minor)
            .ok_or_else(|| EngineError::InvalidAmount("contribution overflows".to_string()))?;
        if current < 0 {
            return Err(EngineError::InsufficientFunds(format!(
                "goal '{}' holds only {}",
                self.name, self.current_minor
            )));
        }
        self.current_minor = current;
        Ok(())
    }

    pub fn set_target(&mut self, target_minor: i64) -> ResultEngine<()> {
        ensure_positive_amount(target_minor)?;
        self.target_minor = target_minor;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "goals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub target_minor: i64,
    pub current_minor: i64,
    pub deadline: Option<Date>,
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

impl From<&Goal> for ActiveModel {
    fn from(value: &Goal) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            user_id: ActiveValue::Set(value.user_id),
            name: ActiveValue::Set(value.name.clone()),
            target_minor: ActiveValue::Set(value.target_minor),
            current_minor: ActiveValue::Set(value.current_minor),
            deadline: ActiveValue::Set(value.deadline),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl From<Model> for Goal {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            target_minor: model.target_minor,
            current_minor: model.current_minor,
            deadline: model.deadline,
            created_at: model.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal() -> Goal {
        Goal::new(Uuid::new_v4(), "Bike".to_string(), 40_000, None).unwrap()
    }

    #[test]
    fn contributions_move_progress() {
        let mut goal = goal();
        goal.contribute(10_000).unwrap();
        assert_eq!(goal.progress_bp(), 2_500);
        assert!(!goal.completed());

        goal.contribute(35_000).unwrap();
        assert_eq!(goal.progress_bp(), 10_000);
        assert!(goal.completed());
    }

    #[test]
    fn withdrawing_more_than_saved_fails() {
        let mut goal = goal();
        goal.contribute(500).unwrap();
        let err = goal.contribute(-501).unwrap_err();
        assert!(matches!(err, EngineError::InsufficientFunds(_)));
        assert_eq!(goal.current_minor, 500);
    }

    #[test]
    fn zero_target_is_rejected() {
        assert!(Goal::new(Uuid::new_v4(), "x".to_string(), 0, None).is_err());
    }
}
