use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, QuerySelect, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, TransactionKind, accounts, budgets, categories, goals, pots,
    recurring, transactions, transfers, users,
};

use super::Engine;

/// Generates a `require_*` method for an entity carrying its owner's
/// `user_id`.
macro_rules! impl_require_owned {
    ($require_fn:ident, $entity:path, $model:ty, $user_col:expr, $err_msg:literal) => {
        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            user_id: Uuid,
            target_id: Uuid,
        ) -> ResultEngine<$model> {
            <$entity>::find_by_id(target_id)
                .filter($user_col.eq(user_id))
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound($err_msg.to_string()))
        }
    };
}

/// Generates a `require_*` method for an entity hanging off an account; the
/// account decides who owns it.
macro_rules! impl_require_in_account {
    ($require_fn:ident, $entity:path, $model:ty, $err_msg:literal) => {
        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            user_id: Uuid,
            target_id: Uuid,
        ) -> ResultEngine<$model> {
            <$entity>::find_by_id(target_id)
                .inner_join(accounts::Entity)
                .filter(accounts::Column::UserId.eq(user_id))
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound($err_msg.to_string()))
        }
    };
}

impl Engine {
    pub(super) async fn require_user(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }

    impl_require_owned!(
        require_account,
        accounts::Entity,
        accounts::Model,
        accounts::Column::UserId,
        "account not exists"
    );

    impl_require_owned!(
        require_category,
        categories::Entity,
        categories::Model,
        categories::Column::UserId,
        "category not exists"
    );

    impl_require_owned!(
        require_goal,
        goals::Entity,
        goals::Model,
        goals::Column::UserId,
        "goal not exists"
    );

    impl_require_owned!(
        require_transfer,
        transfers::Entity,
        transfers::Model,
        transfers::Column::UserId,
        "transfer not exists"
    );

    impl_require_in_account!(
        require_budget,
        budgets::Entity,
        budgets::Model,
        "budget not exists"
    );

    impl_require_in_account!(
        require_transaction,
        transactions::Entity,
        transactions::Model,
        "transaction not exists"
    );

    impl_require_in_account!(require_pot, pots::Entity, pots::Model, "pot not exists");

    impl_require_in_account!(
        require_recurring,
        recurring::Entity,
        recurring::Model,
        "recurring transaction not exists"
    );

    /// Check that `category_id`, when present, is a category of the user
    /// with the given kind.
    pub(super) async fn require_category_of_kind(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
        category_id: Option<Uuid>,
        kind: TransactionKind,
    ) -> ResultEngine<()> {
        let Some(category_id) = category_id else {
            return Ok(());
        };
        let category = self.require_category(db, user_id, category_id).await?;
        if category.kind != kind.as_str() {
            return Err(EngineError::InvalidCategory(format!(
                "'{}' is an {} category, not {}",
                category.name,
                category.kind,
                kind.as_str()
            )));
        }
        Ok(())
    }

    /// Add `delta_minor` to an account balance and return the stored account.
    ///
    /// The account is re-read inside `db` so concurrent writes in the same
    /// transaction see each other.
    pub(super) async fn apply_balance_delta(
        &self,
        db: &DatabaseTransaction,
        account_id: Uuid,
        delta_minor: i64,
    ) -> ResultEngine<accounts::Model> {
        let model = accounts::Entity::find_by_id(account_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("account not exists".to_string()))?;
        if delta_minor == 0 {
            return Ok(model);
        }
        let balance = model
            .balance
            .checked_add(delta_minor)
            .ok_or_else(|| EngineError::InvalidAmount("account balance overflows".to_string()))?;
        let mut active: accounts::ActiveModel = model.into();
        active.balance = ActiveValue::Set(balance);
        active.update(db).await.map_err(Into::into)
    }

    /// Ids of every account the user owns.
    pub(super) async fn account_ids_of(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ResultEngine<Vec<Uuid>> {
        accounts::Entity::find()
            .select_only()
            .column(accounts::Column::Id)
            .filter(accounts::Column::UserId.eq(user_id))
            .into_tuple::<Uuid>()
            .all(db)
            .await
            .map_err(Into::into)
    }
}
