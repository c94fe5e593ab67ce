use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Eur,
    Usd,
    Gbp,
}

/// Envelope wrapping every response body, successful or not.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    pub errors: Option<Vec<String>>,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            errors: None,
            timestamp: Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            errors: (!errors.is_empty()).then_some(errors),
            timestamp: Utc::now(),
        }
    }
}

/// Body of endpoints that only acknowledge an action.
#[derive(Debug, Serialize, Deserialize)]
pub struct Deleted {
    pub id: Uuid,
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Register {
        pub username: String,
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Login {
        /// Username or email.
        pub login: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Token {
        pub access_token: String,
        pub token_type: String,
        /// Lifetime of the token in seconds.
        pub expires_in: u64,
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: Uuid,
        pub username: String,
        pub email: String,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserUpdate {
        pub email: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PasswordChange {
        pub current_password: String,
        pub new_password: String,
    }
}

pub mod account {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountNew {
        pub name: String,
        pub currency: Option<Currency>,
        /// Signed opening balance, recorded as an income or expense.
        pub opening_balance_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountUpdate {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountView {
        pub id: Uuid,
        pub name: String,
        pub currency: Currency,
        pub balance_minor: i64,
        pub is_default: bool,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryQuery {
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountSummary {
        pub account_id: Uuid,
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
        pub income_minor: i64,
        pub expense_minor: i64,
        pub net_minor: i64,
        pub transactions: u64,
    }
}

pub mod category {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum CategoryKind {
        Income,
        Expense,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        pub kind: CategoryKind,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryQuery {
        pub kind: Option<CategoryKind>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
        pub kind: CategoryKind,
        pub created_at: DateTime<Utc>,
    }
}

pub mod budget {
    use super::*;

    /// Percentages are expressed in basis points: `10_000` is 100%.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetNew {
        pub category_id: Uuid,
        pub percentage_bp: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetUpdate {
        pub percentage_bp: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetView {
        pub id: Uuid,
        pub account_id: Uuid,
        pub category_id: Uuid,
        pub percentage_bp: i64,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Allocation {
        pub account_id: Uuid,
        pub allocated_bp: i64,
        pub remaining_bp: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StatusQuery {
        /// Month in `YYYY-MM` form. Defaults to the current month.
        pub month: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetStatus {
        pub budget_id: Uuid,
        pub category_id: Uuid,
        pub month_start: NaiveDate,
        pub month_end: NaiveDate,
        pub percentage_bp: i64,
        pub allocated_minor: i64,
        pub spent_minor: i64,
        pub remaining_minor: i64,
        pub over_budget: bool,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Expense,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub account_id: Uuid,
        pub kind: TransactionKind,
        /// Must be > 0. The kind defines the effect on the balance.
        pub amount_minor: i64,
        pub category_id: Option<Uuid>,
        pub description: Option<String>,
        pub occurred_on: NaiveDate,
    }

    /// Every field is optional; absent fields are left untouched.
    ///
    /// An empty `description` clears it, and `"category_id": null`
    /// removes the category.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub amount_minor: Option<i64>,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            with = "::serde_with::rust::double_option"
        )]
        pub category_id: Option<Option<Uuid>>,
        pub description: Option<String>,
        pub occurred_on: Option<NaiveDate>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionQuery {
        pub account_id: Option<Uuid>,
        pub category_id: Option<Uuid>,
        pub kind: Option<TransactionKind>,
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
        pub limit: Option<u64>,
        pub offset: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub account_id: Uuid,
        pub category_id: Option<Uuid>,
        pub kind: TransactionKind,
        pub amount_minor: i64,
        pub description: Option<String>,
        pub occurred_on: NaiveDate,
        pub recurring_id: Option<Uuid>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionPage {
        pub transactions: Vec<TransactionView>,
        pub limit: u64,
        pub offset: u64,
    }
}

pub mod transfer {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferNew {
        pub from_account_id: Uuid,
        pub to_account_id: Uuid,
        pub amount_minor: i64,
        pub note: Option<String>,
        pub occurred_on: NaiveDate,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransferQuery {
        pub account_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferView {
        pub id: Uuid,
        pub from_account_id: Uuid,
        pub to_account_id: Uuid,
        pub amount_minor: i64,
        pub note: Option<String>,
        pub occurred_on: NaiveDate,
        pub created_at: DateTime<Utc>,
    }
}

pub mod goal {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalNew {
        pub name: String,
        pub target_minor: i64,
        pub deadline: Option<NaiveDate>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct GoalUpdate {
        pub name: Option<String>,
        pub target_minor: Option<i64>,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            with = "::serde_with::rust::double_option"
        )]
        pub deadline: Option<Option<NaiveDate>>,
    }

    /// Positive amounts add to the goal, negative amounts withdraw.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Contribution {
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalView {
        pub id: Uuid,
        pub name: String,
        pub target_minor: i64,
        pub current_minor: i64,
        pub deadline: Option<NaiveDate>,
        pub progress_bp: i64,
        pub completed: bool,
        pub created_at: DateTime<Utc>,
    }
}

pub mod pot {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PotNew {
        pub name: String,
        pub target_minor: Option<i64>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct PotUpdate {
        pub name: Option<String>,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            with = "::serde_with::rust::double_option"
        )]
        pub target_minor: Option<Option<i64>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PotMove {
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PotView {
        pub id: Uuid,
        pub account_id: Uuid,
        pub name: String,
        pub target_minor: Option<i64>,
        pub current_minor: i64,
        pub progress_bp: Option<i64>,
        pub created_at: DateTime<Utc>,
    }
}

pub mod recurring {
    use super::*;
    use crate::transaction::TransactionKind;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Frequency {
        Daily,
        Weekly,
        Monthly,
        Yearly,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecurringNew {
        pub account_id: Uuid,
        pub kind: TransactionKind,
        pub amount_minor: i64,
        pub category_id: Option<Uuid>,
        pub description: Option<String>,
        pub frequency: Frequency,
        pub start_on: NaiveDate,
        pub end_on: Option<NaiveDate>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct RecurringUpdate {
        pub amount_minor: Option<i64>,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            with = "::serde_with::rust::double_option"
        )]
        pub category_id: Option<Option<Uuid>>,
        pub description: Option<String>,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            with = "::serde_with::rust::double_option"
        )]
        pub end_on: Option<Option<NaiveDate>>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct RecurringQuery {
        pub account_id: Option<Uuid>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct RunRequest {
        /// Defaults to today (UTC).
        pub date: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecurringView {
        pub id: Uuid,
        pub account_id: Uuid,
        pub category_id: Option<Uuid>,
        pub kind: TransactionKind,
        pub amount_minor: i64,
        pub description: Option<String>,
        pub frequency: Frequency,
        pub start_on: NaiveDate,
        pub next_run_on: NaiveDate,
        pub end_on: Option<NaiveDate>,
        pub active: bool,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RunReport {
        pub date: NaiveDate,
        pub processed: u64,
        pub created: u64,
        pub failed: u64,
    }
}
