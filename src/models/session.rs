use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::validators::Country;

/// Шаг анкеты. Переходы строго по порядку, без пропусков.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Name,
    Phone,
    Service,
    Master,
    Date(DateStep),
    Comment,
}

/// Подшаги выбора даты и времени.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStep {
    Day,
    Time,
    Confirm,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answers {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub country: Option<Country>,
    pub service: Option<String>,
    pub master: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub appointment: Option<NaiveDateTime>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub step: Step,
    pub answers: Answers,
}

impl Session {
    pub fn new() -> Self {
        Self { step: Step::Name, answers: Answers::default() }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
