//! Recurring transaction templates and their date rules.
//!
//! A template materializes into a real [`Transaction`](crate::Transaction) on
//! every occurrence and then moves `next_run_on` forward:
//!
//! - `Daily`: the following day.
//! - `Weekly`: the first Monday strictly after the current date.
//! - `Monthly`: same day of the following month. The day is taken from
//!   `start_on` and clamped to the month length, so a template started on the
//!   31st runs on Feb 28 and is back on Mar 31.
//! - `Yearly`: same month and day of the following year (Feb 29 falls back to
//!   Feb 28 outside leap years).

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, Transaction, TransactionKind,
    transactions::ensure_positive_amount,
};

/// Upper bound of occurrences materialized for one template in a single run.
///
/// Anything left over is picked up by the next run.
pub const MAX_OCCURRENCES_PER_RUN: usize = 400;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Next occurrence after `date`.
    ///
    /// `anchor_day` is the preferred day of month for monthly and yearly
    /// schedules.
    pub fn advance(self, date: NaiveDate, anchor_day: u32) -> ResultEngine<NaiveDate> {
        let next = match self {
            Self::Daily => date.checked_add_days(Days::new(1)),
            Self::Weekly => {
                let ahead = 7 - u64::from(date.weekday().num_days_from_monday());
                date.checked_add_days(Days::new(ahead))
            }
            Self::Monthly => {
                let (year, month) = if date.month() == 12 {
                    (date.year() + 1, 1)
                } else {
                    (date.year(), date.month() + 1)
                };
                clamped_date(year, month, anchor_day)
            }
            Self::Yearly => clamped_date(date.year() + 1, date.month(), anchor_day),
        };
        next.ok_or_else(|| EngineError::InvalidDate(format!("no occurrence after {date}")))
    }
}

impl TryFrom<&str> for Frequency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            other => Err(EngineError::InvalidDate(format!(
                "invalid frequency: {other}"
            ))),
        }
    }
}

fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last_day = first
        .checked_add_months(chrono::Months::new(1))?
        .pred_opt()?
        .day();
    NaiveDate::from_ymd_opt(year, month, day.min(last_day))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recurring {
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

impl Recurring {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        account_id: Uuid,
        kind: TransactionKind,
        amount_minor: i64,
        category_id: Option<Uuid>,
        description: Option<String>,
        frequency: Frequency,
        start_on: NaiveDate,
        end_on: Option<NaiveDate>,
    ) -> ResultEngine<Self> {
        ensure_positive_amount(amount_minor)?;
        ensure_end_after_start(start_on, end_on)?;
        Ok(Self {
            id: Uuid::new_v4(),
            account_id,
            category_id,
            kind,
            amount_minor,
            description,
            frequency,
            start_on,
            next_run_on: start_on,
            end_on,
            active: true,
            created_at: Utc::now(),
        })
    }

    fn anchor_day(&self) -> u32 {
        self.start_on.day()
    }

    /// Move `next_run_on` to the following occurrence, deactivating the
    /// template once it runs past `end_on`.
    pub fn advance(&mut self) -> ResultEngine<()> {
        self.next_run_on = self.frequency.advance(self.next_run_on, self.anchor_day())?;
        if self.end_on.is_some_and(|end| self.next_run_on > end) {
            self.active = false;
        }
        Ok(())
    }

    /// Dates due on or before `today`, advancing the template past each of them.
    ///
    /// At most [`MAX_OCCURRENCES_PER_RUN`] dates are returned.
    pub fn take_due(&mut self, today: NaiveDate) -> ResultEngine<Vec<NaiveDate>> {
        let mut due = Vec::new();
        while self.active && self.next_run_on <= today && due.len() < MAX_OCCURRENCES_PER_RUN {
            due.push(self.next_run_on);
            self.advance()?;
        }
        Ok(due)
    }

    /// Reactivate a paused template without back-filling missed occurrences.
    pub fn resume(&mut self, today: NaiveDate) -> ResultEngine<()> {
        if self.active {
            return Ok(());
        }
        let mut next = self.next_run_on;
        while next < today {
            next = self.frequency.advance(next, self.anchor_day())?;
        }
        if self.end_on.is_some_and(|end| next > end) {
            return Err(EngineError::InvalidDate(
                "recurring transaction already ended".to_string(),
            ));
        }
        self.next_run_on = next;
        self.active = true;
        Ok(())
    }

    pub fn set_end_on(&mut self, end_on: Option<NaiveDate>) -> ResultEngine<()> {
        ensure_end_after_start(self.start_on, end_on)?;
        self.end_on = end_on;
        if end_on.is_some_and(|end| self.next_run_on > end) {
            self.active = false;
        }
        Ok(())
    }

    /// The transaction produced by the occurrence on `occurred_on`.
    pub fn materialize(&self, occurred_on: NaiveDate) -> ResultEngine<Transaction> {
        let mut tx = Transaction::new(
            self.account_id,
            self.kind,
            self.amount_minor,
            self.category_id,
            self.description.clone(),
            occurred_on,
        )?;
        tx.recurring_id = Some(self.id);
        Ok(tx)
    }
}

fn ensure_end_after_start(start_on: NaiveDate, end_on: Option<NaiveDate>) -> ResultEngine<()> {
    if end_on.is_some_and(|end| end < start_on) {
        return Err(EngineError::InvalidDate(
            "end_on must not be before start_on".to_string(),
        ));
    }
    Ok(())
}

/// Outcome of one batch run over due templates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecurringRunReport {
    pub date: NaiveDate,
    /// Templates that were due and materialized successfully.
    pub processed: u64,
    /// Transactions created.
    pub created: u64,
    /// Templates whose run failed and was rolled back.
    pub failed: u64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recurring")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub account_id: Uuid,
    pub category_id: Option<Uuid>,
    pub kind: String,
    pub amount_minor: i64,
    pub description: Option<String>,
    pub frequency: String,
    pub start_on: Date,
    pub next_run_on: Date,
    pub end_on: Option<Date>,
    pub active: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Account,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Recurring> for ActiveModel {
    fn from(value: &Recurring) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            account_id: ActiveValue::Set(value.account_id),
            category_id: ActiveValue::Set(value.category_id),
            kind: ActiveValue::Set(value.kind.as_str().to_string()),
            amount_minor: ActiveValue::Set(value.amount_minor),
            description: ActiveValue::Set(value.description.clone()),
            frequency: ActiveValue::Set(value.frequency.as_str().to_string()),
            start_on: ActiveValue::Set(value.start_on),
            next_run_on: ActiveValue::Set(value.next_run_on),
            end_on: ActiveValue::Set(value.end_on),
            active: ActiveValue::Set(value.active),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for Recurring {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            account_id: model.account_id,
            category_id: model.category_id,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            amount_minor: model.amount_minor,
            description: model.description,
            frequency: Frequency::try_from(model.frequency.as_str())?,
            start_on: model.start_on,
            next_run_on: model.next_run_on,
            end_on: model.end_on,
            active: model.active,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Weekday;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn template(frequency: Frequency, start_on: NaiveDate) -> Recurring {
        Recurring::new(
            Uuid::new_v4(),
            TransactionKind::Expense,
            999,
            None,
            Some("Rent".to_string()),
            frequency,
            start_on,
            None,
        )
        .unwrap()
    }

    #[test]
    fn daily_moves_one_day() {
        assert_eq!(
            Frequency::Daily.advance(date(2026, 12, 31), 31).unwrap(),
            date(2027, 1, 1)
        );
    }

    #[test]
    fn weekly_lands_on_next_monday() {
        // Wednesday -> Monday of the following week.
        let next = Frequency::Weekly.advance(date(2026, 10, 14), 14).unwrap();
        assert_eq!(next, date(2026, 10, 19));
        assert_eq!(next.weekday(), Weekday::Mon);

        // A Monday moves a full week.
        assert_eq!(
            Frequency::Weekly.advance(date(2026, 10, 19), 19).unwrap(),
            date(2026, 10, 26)
        );

        // Sunday -> the day after.
        assert_eq!(
            Frequency::Weekly.advance(date(2026, 10, 18), 18).unwrap(),
            date(2026, 10, 19)
        );
    }

    #[test]
    fn monthly_clamps_without_drifting() {
        let mut recurring = template(Frequency::Monthly, date(2026, 1, 31));
        recurring.advance().unwrap();
        assert_eq!(recurring.next_run_on, date(2026, 2, 28));
        recurring.advance().unwrap();
        assert_eq!(recurring.next_run_on, date(2026, 3, 31));
        recurring.advance().unwrap();
        assert_eq!(recurring.next_run_on, date(2026, 4, 30));
    }

    #[test]
    fn monthly_rolls_over_the_year() {
        assert_eq!(
            Frequency::Monthly.advance(date(2026, 12, 5), 5).unwrap(),
            date(2027, 1, 5)
        );
    }

    #[test]
    fn yearly_handles_leap_days() {
        let mut recurring = template(Frequency::Yearly, date(2024, 2, 29));
        recurring.advance().unwrap();
        assert_eq!(recurring.next_run_on, date(2025, 2, 28));
        recurring.advance().unwrap();
        recurring.advance().unwrap();
        assert_eq!(recurring.next_run_on, date(2027, 2, 28));
        recurring.advance().unwrap();
        assert_eq!(recurring.next_run_on, date(2028, 2, 29));
    }

    #[test]
    fn take_due_catches_up_and_stops_at_end() {
        let mut recurring = template(Frequency::Daily, date(2026, 3, 1));
        recurring.set_end_on(Some(date(2026, 3, 3))).unwrap();

        let due = recurring.take_due(date(2026, 3, 10)).unwrap();
        assert_eq!(due, vec![date(2026, 3, 1), date(2026, 3, 2), date(2026, 3, 3)]);
        assert!(!recurring.active);
        assert!(recurring.take_due(date(2026, 3, 10)).unwrap().is_empty());
    }

    #[test]
    fn nothing_is_due_before_start() {
        let mut recurring = template(Frequency::Monthly, date(2026, 5, 1));
        assert!(recurring.take_due(date(2026, 4, 30)).unwrap().is_empty());
        assert!(recurring.active);
    }

    #[test]
    fn resume_skips_missed_occurrences() {
        let mut recurring = template(Frequency::Weekly, date(2026, 1, 5));
        recurring.active = false;
        recurring.resume(date(2026, 2, 4)).unwrap();
        assert!(recurring.active);
        assert_eq!(recurring.next_run_on, date(2026, 2, 9));
    }

    #[test]
    fn resume_after_end_is_rejected() {
        let mut recurring = template(Frequency::Daily, date(2026, 1, 1));
        recurring.set_end_on(Some(date(2026, 1, 10))).unwrap();
        recurring.active = false;
        assert!(matches!(
            recurring.resume(date(2026, 2, 1)),
            Err(EngineError::InvalidDate(_))
        ));
    }

    #[test]
    fn end_before_start_is_rejected() {
        let err = Recurring::new(
            Uuid::new_v4(),
            TransactionKind::Income,
            100,
            None,
            None,
            Frequency::Daily,
            date(2026, 1, 10),
            Some(date(2026, 1, 9)),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidDate(_)));
    }

    #[test]
    fn materialized_transaction_points_back_to_template() {
        let recurring = template(Frequency::Daily, date(2026, 1, 1));
        let tx = recurring.materialize(date(2026, 1, 2)).unwrap();
        assert_eq!(tx.recurring_id, Some(recurring.id));
        assert_eq!(tx.amount_minor, 999);
        assert_eq!(tx.occurred_on, date(2026, 1, 2));
    }
}
