use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    Category, EngineError, ResultEngine, TransactionKind, budgets, categories, recurring,
    transactions, util::normalize_required_name,
};

use super::{Engine, with_tx};

impl Engine {
    pub async fn create_category(
        &self,
        user_id: Uuid,
        name: &str,
        kind: TransactionKind,
    ) -> ResultEngine<Category> {
        let name = normalize_required_name(name, "category")?;

        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            self.ensure_category_name_free(&db_tx, user_id, &name, kind, None)
                .await?;

            let category = Category::new(user_id, name, kind);
            let model: categories::ActiveModel = (&category).into();
            model.insert(&db_tx).await?;
            Ok(category)
        })
    }

    /// Categories of the user sorted by name, optionally of one kind only.
    pub async fn categories(
        &self,
        user_id: Uuid,
        kind: Option<TransactionKind>,
    ) -> ResultEngine<Vec<Category>> {
        with_tx!(self, |db_tx| {
            let mut query = categories::Entity::find()
                .filter(categories::Column::UserId.eq(user_id))
                .order_by_asc(categories::Column::Name);
            if let Some(kind) = kind {
                query = query.filter(categories::Column::Kind.eq(kind.as_str()));
            }
            query
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Category::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    pub async fn category(&self, user_id: Uuid, category_id: Uuid) -> ResultEngine<Category> {
        with_tx!(self, |db_tx| {
            let model = self.require_category(&db_tx, user_id, category_id).await?;
            Category::try_from(model)
        })
    }

    pub async fn rename_category(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        name: &str,
    ) -> ResultEngine<Category> {
        let name = normalize_required_name(name, "category")?;

        with_tx!(self, |db_tx| {
            let model = self.require_category(&db_tx, user_id, category_id).await?;
            let kind = TransactionKind::try_from(model.kind.as_str())?;
            self.ensure_category_name_free(&db_tx, user_id, &name, kind, Some(category_id))
                .await?;

            let mut active: categories::ActiveModel = model.into();
            active.name = ActiveValue::Set(name);
            let model = active.update(&db_tx).await?;
            Category::try_from(model)
        })
    }

    /// Delete a category.
    ///
    /// Refused while a budget points at it. Transactions and recurring
    /// templates keep existing without a category.
    pub async fn delete_category(&self, user_id: Uuid, category_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_category(&db_tx, user_id, category_id).await?;

            let budgeted = budgets::Entity::find()
                .filter(budgets::Column::CategoryId.eq(category_id))
                .one(&db_tx)
                .await?
                .is_some();
            if budgeted {
                return Err(EngineError::InUse(model.name));
            }

            transactions::Entity::update_many()
                .col_expr(
                    transactions::Column::CategoryId,
                    Expr::value(Option::<Uuid>::None),
                )
                .filter(transactions::Column::CategoryId.eq(category_id))
                .exec(&db_tx)
                .await?;
            recurring::Entity::update_many()
                .col_expr(
                    recurring::Column::CategoryId,
                    Expr::value(Option::<Uuid>::None),
                )
                .filter(recurring::Column::CategoryId.eq(category_id))
                .exec(&db_tx)
                .await?;
            categories::Entity::delete_by_id(category_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Category names are unique per user and kind, ignoring case.
    async fn ensure_category_name_free(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
        name: &str,
        kind: TransactionKind,
        except: Option<Uuid>,
    ) -> ResultEngine<()> {
        let mut query = categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .filter(categories::Column::Kind.eq(kind.as_str()))
            .filter(Expr::cust("LOWER(name)").eq(name.to_lowercase()));
        if let Some(category_id) = except {
            query = query.filter(categories::Column::Id.ne(category_id));
        }
        if query.one(db).await?.is_some() {
            return Err(EngineError::ExistingKey(name.to_string()));
        }
        Ok(())
    }
}
