use chrono::{Datelike, NaiveDate, NaiveTime};

use crate::conversation::actions::CallbackAction;
use crate::conversation::reply::{Button, InlineGrid};

pub const START_BUTTON: &str = "🚀 Начать оформление заявки";

const MONTH_NAMES: [&str; 12] = [
    "Январь", "Февраль", "Март", "Апрель", "Май", "Июнь",
    "Июль", "Август", "Сентябрь", "Октябрь", "Ноябрь", "Декабрь",
];
const WEEKDAYS: [&str; 7] = ["Пн", "Вт", "Ср", "Чт", "Пт", "Сб", "Вс"];

/// Слоты времени, по три в ряд
pub const TIME_SLOTS: [(u32, u32); 6] = [(10, 0), (11, 0), (12, 0), (13, 0), (14, 0), (15, 0)];
const SLOTS_PER_ROW: usize = 3;

const SERVICES: [&[&str]; 2] = [&["Стрижка", "Маникюр"], &["Массаж", "Окрашивание"]];
const MASTERS: [&[&str]; 2] = [&["Алина", "Мария"], &["Светлана"]];

const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

/// Month shown by the calendar. Always a valid month within years 1..=9999.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) || !(1..=12).contains(&month) {
            return None;
        }
        Some(Self { year, month })
    }

    /// Month arithmetic across year boundaries: month 0 is December of the
    /// previous year, month 13 is January of the next one.
    pub fn wrapping(year: i32, month: i64) -> Option<Self> {
        let total = i64::from(year) * 12 + (month - 1);
        let year = i32::try_from(total.div_euclid(12)).ok()?;
        let month = u32::try_from(total.rem_euclid(12) + 1).ok()?;
        Self::new(year, month)
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self { year: date.year(), month: date.month() }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn prev(&self) -> Option<Self> {
        Self::wrapping(self.year, i64::from(self.month) - 1)
    }

    pub fn next(&self) -> Option<Self> {
        Self::wrapping(self.year, i64::from(self.month) + 1)
    }

    pub fn title(&self) -> String {
        format!("{} {}", MONTH_NAMES[self.month as usize - 1], self.year)
    }

    fn first_day(&self) -> NaiveDate {
        // year/month are range-checked in the constructors
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }
}

fn nav_button(label: &str, target: Option<YearMonth>) -> Button {
    match target {
        Some(view) => Button::new(label, CallbackAction::Navigate(view)),
        None => Button::inert(" "),
    }
}

/// Календарь на месяц: заголовок, дни недели, недели, навигация.
pub fn build_calendar(view: YearMonth) -> InlineGrid {
    let mut keyboard: InlineGrid = Vec::new();

    keyboard.push(vec![Button::inert(view.title())]);
    keyboard.push(WEEKDAYS.iter().map(|day| Button::inert(*day)).collect());

    let first = view.first_day();
    let mut week: Vec<Button> = (0..first.weekday().num_days_from_monday())
        .map(|_| Button::inert(" "))
        .collect();

    for date in first.iter_days().take_while(|d| d.month() == view.month) {
        week.push(Button::new(date.day().to_string(), CallbackAction::Day(date)));
        if week.len() == WEEKDAYS.len() {
            keyboard.push(std::mem::take(&mut week));
        }
    }

    if !week.is_empty() {
        while week.len() < WEEKDAYS.len() {
            week.push(Button::inert(" "));
        }
        keyboard.push(week);
    }

    keyboard.push(vec![nav_button("⬅️", view.prev()), nav_button("➡️", view.next())]);

    keyboard
}

pub fn time_slots() -> impl Iterator<Item = NaiveTime> {
    TIME_SLOTS
        .iter()
        .filter_map(|(hour, minute)| NaiveTime::from_hms_opt(*hour, *minute, 0))
}

pub fn is_time_slot(time: NaiveTime) -> bool {
    time_slots().any(|slot| slot == time)
}

pub fn time_keyboard() -> InlineGrid {
    let buttons: Vec<Button> = time_slots()
        .map(|slot| Button::new(slot.format("%H:%M").to_string(), CallbackAction::Time(slot)))
        .collect();
    buttons.chunks(SLOTS_PER_ROW).map(|row| row.to_vec()).collect()
}

pub fn confirm_keyboard() -> InlineGrid {
    vec![
        vec![Button::new("✅ Подтвердить", CallbackAction::ConfirmDateTime)],
        vec![Button::new("🔁 Изменить дату", CallbackAction::ChangeDate)],
    ]
}

fn rows(options: &[&[&str]]) -> Vec<Vec<String>> {
    options
        .iter()
        .map(|row| row.iter().map(|s| s.to_string()).collect())
        .collect()
}

pub fn start_keyboard() -> Vec<Vec<String>> {
    vec![vec![START_BUTTON.to_string()]]
}

pub fn services_keyboard() -> Vec<Vec<String>> {
    rows(&SERVICES)
}

pub fn masters_keyboard() -> Vec<Vec<String>> {
    rows(&MASTERS)
}
