//! Business core of Fintrack.
//!
//! Every operation is an `async` method on [`Engine`] taking the id of the
//! calling user. Resources owned by somebody else behave exactly like missing
//! ones and surface as [`EngineError::KeyNotFound`].

pub use accounts::Account;
pub use budgets::{Allocation, Budget, BudgetStatus, FULL_ALLOCATION_BP};
pub use categories::Category;
pub use commands::{
    GoalUpdate, PotUpdate, RecurringCmd, RecurringUpdate, TransactionCmd, TransferCmd,
};
pub use currency::Currency;
pub use error::EngineError;
pub use goals::Goal;
pub use ops::{Engine, EngineBuilder};
pub use pots::Pot;
pub use recurring::{Frequency, Recurring, RecurringRunReport};
pub use transactions::{
    DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, Summary, Transaction, TransactionKind,
    TransactionListFilter, TransactionUpdate, page_limit,
};
pub use transfers::Transfer;
pub use users::User;
pub use util::{month_bounds, parse_month};

mod accounts;
mod budgets;
mod categories;
mod commands;
mod currency;
mod error;
mod goals;
mod ops;
mod pots;
mod recurring;
mod transactions;
mod transfers;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
