//! Conversions between engine types and their wire representation.

use api_types::{
    account::{AccountSummary, AccountView},
    budget::{Allocation, BudgetStatus, BudgetView},
    category::{CategoryKind, CategoryView},
    goal::GoalView,
    pot::PotView,
    recurring::{Frequency, RecurringView, RunReport},
    transaction::{TransactionKind, TransactionView},
    transfer::TransferView,
    user::UserView,
};
use chrono::NaiveDate;
use uuid::Uuid;

pub(crate) fn currency_from_api(currency: api_types::Currency) -> engine::Currency {
    match currency {
        api_types::Currency::Eur => engine::Currency::Eur,
        api_types::Currency::Usd => engine::Currency::Usd,
        api_types::Currency::Gbp => engine::Currency::Gbp,
    }
}

fn map_currency(currency: engine::Currency) -> api_types::Currency {
    match currency {
        engine::Currency::Eur => api_types::Currency::Eur,
        engine::Currency::Usd => api_types::Currency::Usd,
        engine::Currency::Gbp => api_types::Currency::Gbp,
    }
}

pub(crate) fn kind_from_api(kind: TransactionKind) -> engine::TransactionKind {
    match kind {
        TransactionKind::Income => engine::TransactionKind::Income,
        TransactionKind::Expense => engine::TransactionKind::Expense,
    }
}

fn map_kind(kind: engine::TransactionKind) -> TransactionKind {
    match kind {
        engine::TransactionKind::Income => TransactionKind::Income,
        engine::TransactionKind::Expense => TransactionKind::Expense,
    }
}

pub(crate) fn category_kind_from_api(kind: CategoryKind) -> engine::TransactionKind {
    match kind {
        CategoryKind::Income => engine::TransactionKind::Income,
        CategoryKind::Expense => engine::TransactionKind::Expense,
    }
}

fn map_category_kind(kind: engine::TransactionKind) -> CategoryKind {
    match kind {
        engine::TransactionKind::Income => CategoryKind::Income,
        engine::TransactionKind::Expense => CategoryKind::Expense,
    }
}

pub(crate) fn frequency_from_api(frequency: Frequency) -> engine::Frequency {
    match frequency {
        Frequency::Daily => engine::Frequency::Daily,
        Frequency::Weekly => engine::Frequency::Weekly,
        Frequency::Monthly => engine::Frequency::Monthly,
        Frequency::Yearly => engine::Frequency::Yearly,
    }
}

fn map_frequency(frequency: engine::Frequency) -> Frequency {
    match frequency {
        engine::Frequency::Daily => Frequency::Daily,
        engine::Frequency::Weekly => Frequency::Weekly,
        engine::Frequency::Monthly => Frequency::Monthly,
        engine::Frequency::Yearly => Frequency::Yearly,
    }
}

pub(crate) fn user(user: engine::User) -> UserView {
    UserView {
        id: user.id,
        username: user.username,
        email: user.email,
        created_at: user.created_at,
    }
}

pub(crate) fn account(account: engine::Account) -> AccountView {
    AccountView {
        id: account.id,
        name: account.name,
        currency: map_currency(account.currency),
        balance_minor: account.balance,
        is_default: account.is_default,
        created_at: account.created_at,
    }
}

pub(crate) fn summary(
    account_id: Uuid,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    summary: engine::Summary,
) -> AccountSummary {
    AccountSummary {
        account_id,
        from,
        to,
        income_minor: summary.income,
        expense_minor: summary.expense,
        net_minor: summary.net(),
        transactions: summary.transactions,
    }
}

pub(crate) fn category(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        kind: map_category_kind(category.kind),
        created_at: category.created_at,
    }
}

pub(crate) fn budget(budget: engine::Budget) -> BudgetView {
    BudgetView {
        id: budget.id,
        account_id: budget.account_id,
        category_id: budget.category_id,
        percentage_bp: budget.percentage_bp,
        created_at: budget.created_at,
    }
}

pub(crate) fn allocation(allocation: engine::Allocation) -> Allocation {
    Allocation {
        account_id: allocation.account_id,
        allocated_bp: allocation.allocated_bp,
        remaining_bp: allocation.remaining_bp,
    }
}

pub(crate) fn budget_status(status: engine::BudgetStatus) -> BudgetStatus {
    BudgetStatus {
        budget_id: status.budget_id,
        category_id: status.category_id,
        month_start: status.month_start,
        month_end: status.month_end,
        percentage_bp: status.percentage_bp,
        allocated_minor: status.allocated,
        spent_minor: status.spent,
        remaining_minor: status.remaining,
        over_budget: status.over_budget,
    }
}

pub(crate) fn transaction(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        account_id: tx.account_id,
        category_id: tx.category_id,
        kind: map_kind(tx.kind),
        amount_minor: tx.amount_minor,
        description: tx.description,
        occurred_on: tx.occurred_on,
        recurring_id: tx.recurring_id,
        created_at: tx.created_at,
    }
}

pub(crate) fn transfer(transfer: engine::Transfer) -> TransferView {
    TransferView {
        id: transfer.id,
        from_account_id: transfer.from_account_id,
        to_account_id: transfer.to_account_id,
        amount_minor: transfer.amount_minor,
        note: transfer.note,
        occurred_on: transfer.occurred_on,
        created_at: transfer.created_at,
    }
}

pub(crate) fn goal(goal: engine::Goal) -> GoalView {
    GoalView {
        progress_bp: goal.progress_bp(),
        completed: goal.completed(),
        id: goal.id,
        name: goal.name,
        target_minor: goal.target_minor,
        current_minor: goal.current_minor,
        deadline: goal.deadline,
        created_at: goal.created_at,
    }
}

pub(crate) fn pot(pot: engine::Pot) -> PotView {
    PotView {
        progress_bp: pot.progress_bp(),
        id: pot.id,
        account_id: pot.account_id,
        name: pot.name,
        target_minor: pot.target_minor,
        current_minor: pot.current_minor,
        created_at: pot.created_at,
    }
}

pub(crate) fn recurring(recurring: engine::Recurring) -> RecurringView {
    RecurringView {
        id: recurring.id,
        account_id: recurring.account_id,
        category_id: recurring.category_id,
        kind: map_kind(recurring.kind),
        amount_minor: recurring.amount_minor,
        description: recurring.description,
        frequency: map_frequency(recurring.frequency),
        start_on: recurring.start_on,
        next_run_on: recurring.next_run_on,
        end_on: recurring.end_on,
        active: recurring.active,
        created_at: recurring.created_at,
    }
}

pub(crate) fn run_report(report: engine::RecurringRunReport) -> RunReport {
    RunReport {
        date: report.date,
        processed: report.processed,
        created: report.created,
        failed: report.failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_round_trip() {
        for kind in [TransactionKind::Income, TransactionKind::Expense] {
            assert_eq!(map_kind(kind_from_api(kind)), kind);
        }
        assert_eq!(
            map_category_kind(category_kind_from_api(CategoryKind::Expense)),
            CategoryKind::Expense
        );
    }

    #[test]
    fn frequencies_keep_their_meaning() {
        assert_eq!(
            frequency_from_api(Frequency::Weekly),
            engine::Frequency::Weekly
        );
        assert_eq!(map_frequency(engine::Frequency::Yearly), Frequency::Yearly);
    }
}
