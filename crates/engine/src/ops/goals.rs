use chrono::NaiveDate;
use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Goal, GoalUpdate, ResultEngine, goals, util::normalize_required_name};

use super::{Engine, with_tx};

impl Engine {
    pub async fn create_goal(
        &self,
        user_id: Uuid,
        name: &str,
        target_minor: i64,
        deadline: Option<NaiveDate>,
    ) -> ResultEngine<Goal> {
        let name = normalize_required_name(name, "goal")?;
        let goal = Goal::new(user_id, name, target_minor, deadline)?;

        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            let model: goals::ActiveModel = (&goal).into();
            model.insert(&db_tx).await?;
            Ok(goal)
        })
    }

    /// Goals of the user, nearest deadline first; goals without a deadline
    /// come last.
    pub async fn goals(&self, user_id: Uuid) -> ResultEngine<Vec<Goal>> {
        let mut list: Vec<Goal> = with_tx!(self, |db_tx| {
            goals::Entity::find()
                .filter(goals::Column::UserId.eq(user_id))
                .order_by_asc(goals::Column::CreatedAt)
                .all(&db_tx)
                .await
                .map(|models| models.into_iter().map(Goal::from).collect())
        })?;
        list.sort_by_key(|goal| (goal.deadline.is_none(), goal.deadline));
        Ok(list)
    }

    pub async fn goal(&self, user_id: Uuid, goal_id: Uuid) -> ResultEngine<Goal> {
        with_tx!(self, |db_tx| {
            self.require_goal(&db_tx, user_id, goal_id)
                .await
                .map(Goal::from)
        })
    }

    pub async fn update_goal(
        &self,
        user_id: Uuid,
        goal_id: Uuid,
        update: GoalUpdate,
    ) -> ResultEngine<Goal> {
        let name = update
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "goal"))
            .transpose()?;

        with_tx!(self, |db_tx| {
            let mut goal = Goal::from(self.require_goal(&db_tx, user_id, goal_id).await?);
            if let Some(name) = name {
                goal.name = name;
            }
            if let Some(target_minor) = update.target_minor {
                goal.set_target(target_minor)?;
            }
            if let Some(deadline) = update.deadline {
                goal.deadline = deadline;
            }

            let model: goals::ActiveModel = (&goal).into();
            model.update(&db_tx).await?;
            Ok(goal)
        })
    }

    /// Add money to a goal, or take it out with a negative amount.
    ///
    /// Goals only track progress: no account balance moves.
    pub async fn contribute_to_goal(
        &self,
        user_id: Uuid,
        goal_id: Uuid,
        amount_minor: i64,
    ) -> ResultEngine<Goal> {
        with_tx!(self, |db_tx| {
            let mut goal = Goal::from(self.require_goal(&db_tx, user_id, goal_id).await?);
            goal.contribute(amount_minor)?;

            let model: goals::ActiveModel = (&goal).into();
            model.update(&db_tx).await?;
            Ok(goal)
        })
    }

    pub async fn delete_goal(&self, user_id: Uuid, goal_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_goal(&db_tx, user_id, goal_id).await?;
            goals::Entity::delete_by_id(goal_id).exec(&db_tx).await?;
            Ok(())
        })
    }
}
