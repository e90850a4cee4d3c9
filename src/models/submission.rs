use serde::{Deserialize, Serialize};

use crate::models::Answers;

pub const DATE_TIME_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Завершённая заявка. Порядок полей совпадает с порядком колонок в CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub name: String,
    pub phone: String,
    pub country: String,
    pub service: String,
    pub master: String,
    pub date_time: String,
    pub comment: String,
}

impl Submission {
    /// Snapshot of the answers; `None` while any field is still missing.
    pub fn from_answers(answers: &Answers) -> Option<Self> {
        Some(Self {
            name: answers.name.clone()?,
            phone: answers.phone.clone()?,
            country: answers.country?.label().to_string(),
            service: answers.service.clone()?,
            master: answers.master.clone()?,
            date_time: answers.appointment?.format(DATE_TIME_FORMAT).to_string(),
            comment: answers.comment.clone()?,
        })
    }
}
