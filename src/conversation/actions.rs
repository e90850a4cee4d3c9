use chrono::{NaiveDate, NaiveTime};

use crate::keyboards::YearMonth;

const IGNORE: &str = "ignore";
const CONFIRM_DATETIME: &str = "confirm_datetime";
const CHANGE_DATE: &str = "change_date";
const NAV_PREFIX: &str = "nav:";
const DATE_PREFIX: &str = "date:";
const TIME_PREFIX: &str = "time:";

/// Действие, закодированное в callback_data inline-кнопки.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    Ignore,
    Navigate(YearMonth),
    Day(NaiveDate),
    Time(NaiveTime),
    ConfirmDateTime,
    ChangeDate,
}

impl CallbackAction {
    pub fn encode(&self) -> String {
        match self {
            CallbackAction::Ignore => IGNORE.to_string(),
            CallbackAction::Navigate(view) => {
                format!("{}{}-{}", NAV_PREFIX, view.year(), view.month())
            }
            CallbackAction::Day(date) => format!("{}{}", DATE_PREFIX, date.format("%Y-%m-%d")),
            CallbackAction::Time(time) => format!("{}{}", TIME_PREFIX, time.format("%H:%M")),
            CallbackAction::ConfirmDateTime => CONFIRM_DATETIME.to_string(),
            CallbackAction::ChangeDate => CHANGE_DATE.to_string(),
        }
    }

    pub fn parse(data: &str) -> Option<Self> {
        match data {
            IGNORE => return Some(CallbackAction::Ignore),
            CONFIRM_DATETIME => return Some(CallbackAction::ConfirmDateTime),
            CHANGE_DATE => return Some(CallbackAction::ChangeDate),
            _ => {}
        }

        if let Some(rest) = data.strip_prefix(NAV_PREFIX) {
            let (year, month) = rest.rsplit_once('-')?;
            let view = YearMonth::new(year.parse().ok()?, month.parse().ok()?)?;
            return Some(CallbackAction::Navigate(view));
        }
        if let Some(rest) = data.strip_prefix(DATE_PREFIX) {
            return NaiveDate::parse_from_str(rest, "%Y-%m-%d").ok().map(CallbackAction::Day);
        }
        if let Some(rest) = data.strip_prefix(TIME_PREFIX) {
            return NaiveTime::parse_from_str(rest, "%H:%M").ok().map(CallbackAction::Time);
        }
        None
    }
}
