use sea_orm::{
    ActiveValue, Condition, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, User, categories, goals, transfers, users,
    util::{registration_errors, validate_email, validate_password},
};

use super::{Engine, with_tx};

impl Engine {
    /// Create a user with a bcrypt-hashed password.
    ///
    /// Every field error is reported at once through
    /// [`EngineError::Validation`].
    pub async fn register(&self, username: &str, email: &str, password: &str) -> ResultEngine<User> {
        let username = username.trim();
        let email = email.trim().to_lowercase();
        let errors = registration_errors(username, &email, password);
        if !errors.is_empty() {
            return Err(EngineError::Validation(errors));
        }
        let password_hash = hash_password(password, self.bcrypt_cost).await?;

        with_tx!(self, |db_tx| {
            if self.find_by_username(&db_tx, username).await?.is_some() {
                return Err(EngineError::ExistingKey(username.to_string()));
            }
            self.ensure_email_free(&db_tx, &email, None).await?;

            let model = users::ActiveModel::new_user(username.to_string(), email, password_hash)
                .insert(&db_tx)
                .await?;
            Ok(User::from(model))
        })
    }

    /// Check a username (or email) and password pair.
    ///
    /// Unknown users and wrong passwords yield the same
    /// [`EngineError::InvalidCredentials`].
    pub async fn authenticate(&self, login: &str, password: &str) -> ResultEngine<User> {
        let login = login.trim().to_lowercase();
        let model = with_tx!(self, |db_tx| {
            users::Entity::find()
                .filter(
                    Condition::any()
                        .add(Expr::cust("LOWER(username)").eq(login.clone()))
                        .add(users::Column::Email.eq(login.clone())),
                )
                .one(&db_tx)
                .await
                .map_err(EngineError::from)
        })?;

        let Some(model) = model else {
            return Err(EngineError::InvalidCredentials);
        };
        if !verify_password(password, &model.password_hash).await? {
            return Err(EngineError::InvalidCredentials);
        }
        Ok(User::from(model))
    }

    pub async fn user(&self, user_id: Uuid) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await.map(User::from)
        })
    }

    pub async fn update_user(&self, user_id: Uuid, email: &str) -> ResultEngine<User> {
        let email = email.trim().to_lowercase();
        validate_email(&email).map_err(|err| EngineError::Validation(vec![err]))?;

        with_tx!(self, |db_tx| {
            let model = self.require_user(&db_tx, user_id).await?;
            self.ensure_email_free(&db_tx, &email, Some(user_id)).await?;

            let mut active: users::ActiveModel = model.into();
            active.email = ActiveValue::Set(email);
            let model = active.update(&db_tx).await?;
            Ok(User::from(model))
        })
    }

    /// Replace the password after checking the current one.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> ResultEngine<()> {
        validate_password(new_password).map_err(|err| EngineError::Validation(vec![err]))?;

        with_tx!(self, |db_tx| {
            let model = self.require_user(&db_tx, user_id).await?;
            if !verify_password(current_password, &model.password_hash).await? {
                return Err(EngineError::InvalidCredentials);
            }
            let password_hash = hash_password(new_password, self.bcrypt_cost).await?;

            let mut active: users::ActiveModel = model.into();
            active.password_hash = ActiveValue::Set(password_hash);
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Delete a user together with everything they own.
    pub async fn delete_user(&self, user_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;

            transfers::Entity::delete_many()
                .filter(transfers::Column::UserId.eq(user_id))
                .exec(&db_tx)
                .await?;
            for account_id in self.account_ids_of(&db_tx, user_id).await? {
                self.purge_account(&db_tx, account_id).await?;
            }
            categories::Entity::delete_many()
                .filter(categories::Column::UserId.eq(user_id))
                .exec(&db_tx)
                .await?;
            goals::Entity::delete_many()
                .filter(goals::Column::UserId.eq(user_id))
                .exec(&db_tx)
                .await?;
            users::Entity::delete_by_id(user_id).exec(&db_tx).await?;
            Ok(())
        })
    }

    async fn find_by_username(
        &self,
        db: &DatabaseTransaction,
        username: &str,
    ) -> ResultEngine<Option<users::Model>> {
        users::Entity::find()
            .filter(Expr::cust("LOWER(username)").eq(username.to_lowercase()))
            .one(db)
            .await
            .map_err(Into::into)
    }

    /// Emails are stored lowercased, so an exact match is case-insensitive.
    async fn ensure_email_free(
        &self,
        db: &DatabaseTransaction,
        email: &str,
        except: Option<Uuid>,
    ) -> ResultEngine<()> {
        let mut query = users::Entity::find().filter(users::Column::Email.eq(email));
        if let Some(user_id) = except {
            query = query.filter(users::Column::Id.ne(user_id));
        }
        if query.one(db).await?.is_some() {
            return Err(EngineError::ExistingKey(email.to_string()));
        }
        Ok(())
    }
}

// bcrypt is CPU-bound; keep it off the async workers.
async fn hash_password(password: &str, cost: u32) -> ResultEngine<String> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|err| EngineError::Password(err.to_string()))?
        .map_err(EngineError::from)
}

async fn verify_password(password: &str, hash: &str) -> ResultEngine<bool> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|err| EngineError::Password(err.to_string()))?
        .map_err(EngineError::from)
}
