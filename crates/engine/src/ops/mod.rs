use std::ops::RangeInclusive;

use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine};

mod access;
mod accounts;
mod budgets;
mod categories;
mod goals;
mod pots;
mod recurring;
mod transactions;
mod transfers;
mod users;

const BCRYPT_COSTS: RangeInclusive<u32> = 4..=31;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    bcrypt_cost: u32,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
pub struct EngineBuilder {
    database: DatabaseConnection,
    bcrypt_cost: u32,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Work factor used when hashing passwords. Must be in `4..=31`.
    pub fn bcrypt_cost(mut self, cost: u32) -> EngineBuilder {
        self.bcrypt_cost = cost;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        if !BCRYPT_COSTS.contains(&self.bcrypt_cost) {
            return Err(EngineError::Password(format!(
                "bcrypt cost must be between {} and {}",
                BCRYPT_COSTS.start(),
                BCRYPT_COSTS.end()
            )));
        }
        Ok(Engine {
            database: self.database,
            bcrypt_cost: self.bcrypt_cost,
        })
    }
}
