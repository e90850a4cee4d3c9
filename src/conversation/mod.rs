pub mod actions;
pub mod reply;

use chrono::NaiveDate;

use crate::keyboards::{
    build_calendar, confirm_keyboard, is_time_slot, masters_keyboard, services_keyboard,
    start_keyboard, time_keyboard, YearMonth, START_BUTTON,
};
use crate::models::{DateStep, Session, Step, Submission};
use crate::validators::{classify_country, validate_phone, PHONE_FORMAT_HINT};

pub use actions::CallbackAction;
pub use reply::{Button, Delivery, InlineGrid, Markup, Outgoing, Reply};

const GREETING: &str = "👋 Привет! Нажми кнопку ниже, чтобы начать оформление заявки:";
const NAME_PROMPT: &str = "Как вас зовут?";
const PHONE_PROMPT: &str = "📞 Укажите ваш номер телефона:";
const SERVICE_PROMPT: &str = "💅 Выберите услугу:";
const MASTER_PROMPT: &str = "✂️ Выберите мастера:";
const DATE_PROMPT: &str = "📅 Выберите дату:";
const NEW_DATE_PROMPT: &str = "📅 Выберите новую дату:";
const COMMENT_PROMPT: &str = "📝 Есть ли у вас пожелания или комментарии? (Если нет — напишите «-»)";
const CANCELLED: &str = "❌ Заявка отменена.";
const PAST_DATE_NOTICE: &str = "❌ Нельзя выбрать прошедшую дату";
const BROKEN_SESSION: &str = "⚠️ Что-то пошло не так. Начните заново: /start";

pub const USE_BUTTONS_HINT: &str = "⚠️ Пожалуйста, используйте кнопки выше.";

/// Входящее событие от пользователя.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Text(String),
    Action(CallbackAction),
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue(Session),
    Completed(Submission),
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub outcome: Outcome,
    pub replies: Vec<Reply>,
}

impl Transition {
    fn stay(session: Session, replies: Vec<Reply>) -> Self {
        Self { outcome: Outcome::Continue(session), replies }
    }

    fn advance(mut session: Session, next: Step, reply: Reply) -> Self {
        session.step = next;
        Self::stay(session, vec![reply])
    }

    fn cancelled(text: &str) -> Self {
        Self { outcome: Outcome::Cancelled, replies: vec![Reply::text(text).remove_keyboard()] }
    }
}

/// Fresh session waiting for the name, plus the greeting with the start button.
pub fn start() -> (Session, Reply) {
    (Session::new(), Reply::keyboard(GREETING, start_keyboard()))
}

fn calendar_for(today: NaiveDate) -> InlineGrid {
    build_calendar(YearMonth::from_date(today))
}

fn prompt(step: Step, today: NaiveDate) -> Reply {
    match step {
        Step::Name => Reply::text(NAME_PROMPT),
        Step::Phone => Reply::text(PHONE_PROMPT),
        Step::Service => Reply::keyboard(SERVICE_PROMPT, services_keyboard()),
        Step::Master => Reply::keyboard(MASTER_PROMPT, masters_keyboard()),
        Step::Date(_) => Reply::inline(DATE_PROMPT, calendar_for(today)),
        Step::Comment => Reply::text(COMMENT_PROMPT),
    }
}

pub fn transition(session: Session, input: Input, today: NaiveDate) -> Transition {
    match (session.step, input) {
        (_, Input::Cancel) => Transition::cancelled(CANCELLED),
        (Step::Date(_), Input::Text(_)) => {
            Transition::stay(session, vec![Reply::text(USE_BUTTONS_HINT)])
        }
        (step, Input::Text(text)) => on_text(session, step, text.trim(), today),
        (_, Input::Action(CallbackAction::Ignore)) => Transition::stay(session, Vec::new()),
        (Step::Date(sub), Input::Action(action)) => on_date_action(session, sub, action, today),
        (_, Input::Action(action)) => unexpected(session, action),
    }
}

fn on_text(mut session: Session, step: Step, text: &str, today: NaiveDate) -> Transition {
    // Повторное нажатие кнопки старта или пустой ввод - просто повторяем вопрос
    if text == START_BUTTON || text.is_empty() {
        return Transition::stay(session, vec![prompt(step, today)]);
    }

    let answers = &mut session.answers;
    let next = match step {
        Step::Name => {
            answers.name = Some(text.to_string());
            Step::Phone
        }
        Step::Phone => {
            if !validate_phone(text) {
                log::debug!("Rejected phone format {:?}", text);
                return Transition::stay(session, vec![Reply::text(PHONE_FORMAT_HINT)]);
            }
            answers.phone = Some(text.to_string());
            answers.country = Some(classify_country(text));
            Step::Service
        }
        Step::Service => {
            answers.service = Some(text.to_string());
            Step::Master
        }
        Step::Master => {
            answers.master = Some(text.to_string());
            Step::Date(DateStep::Day)
        }
        Step::Comment => {
            answers.comment = Some(text.to_string());
            return match Submission::from_answers(answers) {
                Some(record) => Transition { outcome: Outcome::Completed(record), replies: Vec::new() },
                None => {
                    log::error!("Session reached the comment step with missing answers: {:?}", answers);
                    Transition::cancelled(BROKEN_SESSION)
                }
            };
        }
        Step::Date(_) => return Transition::stay(session, vec![Reply::text(USE_BUTTONS_HINT)]),
    };

    Transition::advance(session, next, prompt(next, today))
}

fn on_date_action(
    mut session: Session,
    sub: DateStep,
    action: CallbackAction,
    today: NaiveDate,
) -> Transition {
    match (sub, action) {
        (DateStep::Day, CallbackAction::Navigate(view)) => {
            let reply = Reply::inline(DATE_PROMPT, build_calendar(view)).delivered(Delivery::EditMarkup);
            Transition::stay(session, vec![reply])
        }
        (DateStep::Day, CallbackAction::Day(date)) => {
            if date < today {
                return Transition::stay(session, vec![Reply::notice(PAST_DATE_NOTICE)]);
            }
            session.answers.date = Some(date);
            let reply = Reply::inline(
                format!(
                    "📅 Вы выбрали дату: {}\n⏰ Теперь выберите время:",
                    date.format("%d.%m.%Y")
                ),
                time_keyboard(),
            )
            .delivered(Delivery::Edit);
            Transition::advance(session, Step::Date(DateStep::Time), reply)
        }
        (DateStep::Time, CallbackAction::Time(time)) if is_time_slot(time) => {
            let Some(date) = session.answers.date else {
                return restart_date(session, today);
            };
            session.answers.time = Some(time);
            let reply = Reply::inline(
                format!(
                    "📋 Вы выбрали: {} в {}\nПодтвердите или измените:",
                    date.format("%d.%m.%Y"),
                    time.format("%H:%M")
                ),
                confirm_keyboard(),
            )
            .delivered(Delivery::Edit);
            Transition::advance(session, Step::Date(DateStep::Confirm), reply)
        }
        (DateStep::Confirm, CallbackAction::ConfirmDateTime) => {
            let (Some(date), Some(time)) = (session.answers.date, session.answers.time) else {
                return restart_date(session, today);
            };
            session.answers.appointment = Some(date.and_time(time));
            let reply = Reply::text(COMMENT_PROMPT).delivered(Delivery::Replace);
            Transition::advance(session, Step::Comment, reply)
        }
        (DateStep::Confirm, CallbackAction::ChangeDate) => restart_date(session, today),
        (_, action) => unexpected(session, action),
    }
}

/// Сбрасывает время и снова показывает календарь текущего месяца.
fn restart_date(mut session: Session, today: NaiveDate) -> Transition {
    session.answers.time = None;
    let reply = Reply::inline(NEW_DATE_PROMPT, calendar_for(today)).delivered(Delivery::Edit);
    Transition::advance(session, Step::Date(DateStep::Day), reply)
}

fn unexpected(session: Session, action: CallbackAction) -> Transition {
    log::warn!("Ignoring action {:?} at step {:?}", action, session.step);
    Transition::stay(session, vec![Reply::notice(USE_BUTTONS_HINT)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 10).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ten() -> NaiveTime {
        NaiveTime::from_hms_opt(10, 0, 0).unwrap()
    }

    fn text(s: &str) -> Input {
        Input::Text(s.to_string())
    }

    fn action(a: CallbackAction) -> Input {
        Input::Action(a)
    }

    fn step(session: Session, input: Input) -> (Session, Vec<Reply>) {
        let t = transition(session, input, today());
        match t.outcome {
            Outcome::Continue(session) => (session, t.replies),
            other => panic!("expected session to continue, got {:?}", other),
        }
    }

    fn session_at(target: Step) -> Session {
        let mut session = Session::new();
        let script: Vec<Input> = vec![
            text("John"),
            text("+380501234567"),
            text("Стрижка"),
            text("Алина"),
            action(CallbackAction::Day(date(2024, 2, 20))),
            action(CallbackAction::Time(ten())),
            action(CallbackAction::ConfirmDateTime),
        ];
        for input in script {
            if session.step == target {
                break;
            }
            session = step(session, input).0;
        }
        assert_eq!(session.step, target);
        session
    }

    #[test]
    fn start_greets_with_the_start_button() {
        let (session, reply) = start();
        assert_eq!(session.step, Step::Name);
        assert_eq!(reply.markup, Markup::Keyboard(vec![vec![START_BUTTON.to_string()]]));
    }

    #[test]
    fn start_button_reprompts_without_storing() {
        let (session, replies) = step(Session::new(), text(START_BUTTON));
        assert_eq!(session, Session::new());
        assert_eq!(replies, vec![Reply::text(NAME_PROMPT)]);

        let at_phone = session_at(Step::Phone);
        let (session, replies) = step(at_phone.clone(), text(START_BUTTON));
        assert_eq!(session, at_phone);
        assert_eq!(replies, vec![Reply::text(PHONE_PROMPT)]);
    }

    #[test]
    fn blank_text_reprompts() {
        let (session, replies) = step(Session::new(), text("   "));
        assert_eq!(session.step, Step::Name);
        assert_eq!(session.answers.name, None);
        assert_eq!(replies, vec![Reply::text(NAME_PROMPT)]);
    }

    #[test]
    fn name_is_trimmed_and_advances_to_phone() {
        let (session, replies) = step(Session::new(), text("  John "));
        assert_eq!(session.step, Step::Phone);
        assert_eq!(session.answers.name.as_deref(), Some("John"));
        assert_eq!(replies, vec![Reply::text(PHONE_PROMPT)]);
    }

    #[test]
    fn invalid_phone_stays_without_storing() {
        let at_phone = session_at(Step::Phone);
        let (session, replies) = step(at_phone.clone(), text("12345"));
        assert_eq!(session, at_phone);
        assert_eq!(replies, vec![Reply::text(PHONE_FORMAT_HINT)]);
    }

    #[test]
    fn valid_phone_stores_country_and_offers_services() {
        let (session, replies) = step(session_at(Step::Phone), text("+375291234567"));
        assert_eq!(session.step, Step::Service);
        assert_eq!(session.answers.phone.as_deref(), Some("+375291234567"));
        assert_eq!(session.answers.country, Some(crate::validators::Country::Belarus));
        assert_eq!(replies[0].markup, Markup::Keyboard(services_keyboard()));
    }

    #[test]
    fn master_opens_calendar_for_current_month() {
        let (session, replies) = step(session_at(Step::Master), text("Мария"));
        assert_eq!(session.step, Step::Date(DateStep::Day));
        assert_eq!(session.answers.master.as_deref(), Some("Мария"));
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].delivery, Delivery::Send);
        let grid = replies[0].inline_grid().unwrap();
        assert_eq!(grid[0][0].text, "Февраль 2024");
    }

    #[test]
    fn navigation_rerenders_without_touching_answers() {
        let at_day = session_at(Step::Date(DateStep::Day));
        let target = YearMonth::new(2024, 3).unwrap();
        let (session, replies) = step(at_day.clone(), action(CallbackAction::Navigate(target)));

        assert_eq!(session, at_day);
        assert_eq!(replies[0].delivery, Delivery::EditMarkup);
        assert_eq!(replies[0].inline_grid().unwrap(), &build_calendar(target));
    }

    #[test]
    fn past_day_is_refused() {
        let at_day = session_at(Step::Date(DateStep::Day));
        let (session, replies) = step(at_day.clone(), action(CallbackAction::Day(date(2024, 2, 9))));
        assert_eq!(session, at_day);
        assert_eq!(replies, vec![Reply::notice(PAST_DATE_NOTICE)]);
    }

    #[test]
    fn day_selection_offers_time_slots() {
        let (session, replies) =
            step(session_at(Step::Date(DateStep::Day)), action(CallbackAction::Day(today())));
        assert_eq!(session.step, Step::Date(DateStep::Time));
        assert_eq!(session.answers.date, Some(today()));
        assert_eq!(replies[0].delivery, Delivery::Edit);
        assert!(replies[0].text.contains("10.02.2024"));
        assert_eq!(replies[0].inline_grid().unwrap(), &time_keyboard());
    }

    #[test]
    fn time_selection_asks_for_confirmation() {
        let (session, replies) =
            step(session_at(Step::Date(DateStep::Time)), action(CallbackAction::Time(ten())));
        assert_eq!(session.step, Step::Date(DateStep::Confirm));
        assert_eq!(session.answers.time, Some(ten()));
        assert_eq!(replies[0].text, "📋 Вы выбрали: 20.02.2024 в 10:00\nПодтвердите или измените:");
        assert_eq!(replies[0].inline_grid().unwrap(), &confirm_keyboard());
    }

    #[test]
    fn time_outside_the_slot_list_is_unexpected() {
        let at_time = session_at(Step::Date(DateStep::Time));
        let late = NaiveTime::from_hms_opt(23, 0, 0).unwrap();
        let (session, replies) = step(at_time.clone(), action(CallbackAction::Time(late)));
        assert_eq!(session, at_time);
        assert_eq!(replies, vec![Reply::notice(USE_BUTTONS_HINT)]);
    }

    #[test]
    fn confirm_merges_date_and_time() {
        let (session, replies) =
            step(session_at(Step::Date(DateStep::Confirm)), action(CallbackAction::ConfirmDateTime));
        assert_eq!(session.step, Step::Comment);
        assert_eq!(session.answers.appointment, Some(date(2024, 2, 20).and_time(ten())));
        assert_eq!(replies, vec![Reply::text(COMMENT_PROMPT).delivered(Delivery::Replace)]);
    }

    #[test]
    fn change_date_discards_time_and_shows_current_month() {
        let (session, replies) =
            step(session_at(Step::Date(DateStep::Confirm)), action(CallbackAction::ChangeDate));
        assert_eq!(session.step, Step::Date(DateStep::Day));
        assert_eq!(session.answers.time, None);
        assert_eq!(replies[0].text, NEW_DATE_PROMPT);
        assert_eq!(replies[0].delivery, Delivery::Edit);
        assert_eq!(replies[0].inline_grid().unwrap()[0][0].text, "Февраль 2024");
    }

    #[test]
    fn out_of_order_actions_are_answered_with_a_hint() {
        let at_day = session_at(Step::Date(DateStep::Day));
        for stray in [
            CallbackAction::ConfirmDateTime,
            CallbackAction::ChangeDate,
            CallbackAction::Time(ten()),
        ] {
            let (session, replies) = step(at_day.clone(), action(stray));
            assert_eq!(session, at_day);
            assert_eq!(replies, vec![Reply::notice(USE_BUTTONS_HINT)]);
        }

        let at_confirm = session_at(Step::Date(DateStep::Confirm));
        let (session, _) = step(at_confirm.clone(), action(CallbackAction::Day(today())));
        assert_eq!(session, at_confirm);

        // старая кнопка календаря после выхода из выбора даты
        let at_comment = session_at(Step::Comment);
        let (session, replies) = step(at_comment.clone(), action(CallbackAction::Day(today())));
        assert_eq!(session, at_comment);
        assert_eq!(replies[0].delivery, Delivery::Notice);
    }

    #[test]
    fn ignore_action_is_silent() {
        let at_day = session_at(Step::Date(DateStep::Day));
        let (session, replies) = step(at_day.clone(), action(CallbackAction::Ignore));
        assert_eq!(session, at_day);
        assert!(replies.is_empty());
    }

    #[test]
    fn text_during_date_selection_points_to_buttons() {
        let at_time = session_at(Step::Date(DateStep::Time));
        let (session, replies) = step(at_time.clone(), text("завтра"));
        assert_eq!(session, at_time);
        assert_eq!(replies, vec![Reply::text(USE_BUTTONS_HINT)]);
    }

    #[test]
    fn cancel_is_reachable_from_every_step() {
        for target in [
            Step::Name,
            Step::Phone,
            Step::Service,
            Step::Master,
            Step::Date(DateStep::Day),
            Step::Date(DateStep::Time),
            Step::Date(DateStep::Confirm),
            Step::Comment,
        ] {
            let t = transition(session_at(target), Input::Cancel, today());
            assert_eq!(t.outcome, Outcome::Cancelled, "{target:?}");
            assert_eq!(t.replies, vec![Reply::text(CANCELLED).remove_keyboard()]);
        }
    }

    #[test]
    fn comment_completes_with_a_full_snapshot() {
        let t = transition(session_at(Step::Comment), text("-"), today());
        let record = match t.outcome {
            Outcome::Completed(record) => record,
            other => panic!("expected completion, got {:?}", other),
        };
        assert!(t.replies.is_empty());
        assert_eq!(
            record,
            Submission {
                name: "John".into(),
                phone: "+380501234567".into(),
                country: "🇺🇦 Украина".into(),
                service: "Стрижка".into(),
                master: "Алина".into(),
                date_time: "20.02.2024 10:00".into(),
                comment: "-".into(),
            }
        );
    }
}
