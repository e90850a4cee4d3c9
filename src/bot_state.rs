use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use teloxide::types::{ChatId, UserId};
use tokio::sync::RwLock;

use crate::conversation::{self, CallbackAction, Input, Outcome, Outgoing, Reply, Transition};
use crate::error::StorageError;
use crate::models::{Session, Step, Submission};
use crate::storage::{format_listing_entry, format_notification, RecordSink};

type Sessions = Arc<RwLock<HashMap<ChatId, Session>>>;

const RECENT_LIMIT: usize = 5;

const SUBMITTED: &str = "✅ Спасибо! Вы записаны. Мы свяжемся с вами для подтверждения.";
const SAVE_FAILED: &str = "⚠️ Извините, не удалось сохранить заявку. \
    Попробуйте отправить комментарий ещё раз чуть позже.";
const NO_ACTIVE_FORM: &str = "Чтобы оформить заявку, нажмите /start";
const NOTHING_TO_CANCEL: &str = "Нет активной заявки.";
const ACCESS_DENIED: &str = "🚫 У вас нет доступа к этой команде.";
const NO_REQUESTS: &str = "📭 Заявок пока нет.";
const READ_FAILED: &str = "⚠️ Не удалось прочитать заявки.";

/// Активные анкеты по чатам и журнал заявок.
#[derive(Clone)]
pub struct BotState {
    sessions: Sessions,
    sink: Arc<dyn RecordSink>,
    owner_id: UserId,
}

impl BotState {
    pub fn new(sink: Arc<dyn RecordSink>, owner_id: UserId) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            sink,
            owner_id,
        }
    }

    pub fn owner_chat(&self) -> ChatId {
        ChatId::from(self.owner_id)
    }

    #[cfg(test)]
    pub async fn session(&self, chat_id: ChatId) -> Option<Session> {
        self.sessions.read().await.get(&chat_id).cloned()
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Начинает анкету заново, даже если она уже была открыта.
    pub async fn start(&self, chat_id: ChatId) -> Vec<Outgoing> {
        let (session, greeting) = conversation::start();
        let previous = self.sessions.write().await.insert(chat_id, session);
        let active = self.active_sessions().await;
        if previous.is_some() {
            log::info!("🔄 Form restarted in chat {} ({} active)", chat_id, active);
        } else {
            log::info!("📝 Form started in chat {} ({} active)", chat_id, active);
        }
        vec![Outgoing::new(chat_id, greeting)]
    }

    pub async fn cancel(&self, chat_id: ChatId, today: NaiveDate) -> Vec<Outgoing> {
        self.dispatch(chat_id, Input::Cancel, today).await
    }

    pub async fn handle_text(&self, chat_id: ChatId, text: &str, today: NaiveDate) -> Vec<Outgoing> {
        self.dispatch(chat_id, Input::Text(text.to_string()), today).await
    }

    pub async fn handle_callback(
        &self,
        chat_id: ChatId,
        data: &str,
        today: NaiveDate,
    ) -> Vec<Outgoing> {
        match CallbackAction::parse(data) {
            Some(action) => self.dispatch(chat_id, Input::Action(action), today).await,
            None => {
                log::warn!("Unknown callback data {:?} from chat {}", data, chat_id);
                vec![Outgoing::new(chat_id, Reply::notice(conversation::USE_BUTTONS_HINT))]
            }
        }
    }

    /// Последние заявки; доступно только оператору.
    pub async fn list_requests(&self, requester: Option<UserId>) -> Vec<Reply> {
        if requester != Some(self.owner_id) {
            log::warn!("Rejected /requests from {:?}", requester);
            return vec![Reply::text(ACCESS_DENIED)];
        }

        let sink = Arc::clone(&self.sink);
        let result = tokio::task::spawn_blocking(move || sink.list_recent(RECENT_LIMIT))
            .await
            .unwrap_or_else(|e| Err(StorageError::Worker(e.to_string())));

        match result {
            Ok(records) if records.is_empty() => vec![Reply::text(NO_REQUESTS)],
            Ok(records) => records.iter().map(|r| Reply::text(format_listing_entry(r))).collect(),
            Err(e) => {
                log::error!("Error reading requests: {}", e);
                vec![Reply::text(READ_FAILED)]
            }
        }
    }

    async fn dispatch(&self, chat_id: ChatId, input: Input, today: NaiveDate) -> Vec<Outgoing> {
        let (replies, completed) = {
            let mut sessions = self.sessions.write().await;
            let Some(session) = sessions.remove(&chat_id) else {
                return Self::without_session(chat_id, &input);
            };

            let from = session.step;
            // копия нужна, чтобы вернуть анкету, если запись не удалась
            let before_completion = (from == Step::Comment).then(|| session.clone());
            let Transition { outcome, replies } = conversation::transition(session, input, today);

            let completed = match outcome {
                Outcome::Continue(next) => {
                    if next.step != from {
                        log::debug!("Chat {}: {:?} -> {:?}", chat_id, from, next.step);
                    }
                    sessions.insert(chat_id, next);
                    None
                }
                Outcome::Cancelled => {
                    log::info!("❌ Form cancelled in chat {}", chat_id);
                    None
                }
                Outcome::Completed(record) => Some((record, before_completion)),
            };
            (replies, completed)
        };

        let mut out: Vec<Outgoing> =
            replies.into_iter().map(|reply| Outgoing::new(chat_id, reply)).collect();
        if let Some((record, before_completion)) = completed {
            out.extend(self.complete(chat_id, record, before_completion).await);
        }
        out
    }

    fn without_session(chat_id: ChatId, input: &Input) -> Vec<Outgoing> {
        let reply = match input {
            Input::Text(_) => Reply::text(NO_ACTIVE_FORM),
            Input::Cancel => Reply::text(NOTHING_TO_CANCEL).remove_keyboard(),
            Input::Action(CallbackAction::Ignore) => return Vec::new(),
            Input::Action(action) => {
                log::warn!("Stale action {:?} from chat {} without a form", action, chat_id);
                Reply::notice(NO_ACTIVE_FORM)
            }
        };
        vec![Outgoing::new(chat_id, reply)]
    }

    async fn complete(
        &self,
        chat_id: ChatId,
        record: Submission,
        before_completion: Option<Session>,
    ) -> Vec<Outgoing> {
        let sink = Arc::clone(&self.sink);
        let row = record.clone();
        let result = tokio::task::spawn_blocking(move || sink.append(&row))
            .await
            .unwrap_or_else(|e| Err(StorageError::Worker(e.to_string())));

        match result {
            Ok(()) => {
                log::info!("✅ Request from chat {} saved", chat_id);
                vec![
                    Outgoing::new(chat_id, Reply::text(SUBMITTED).remove_keyboard()),
                    Outgoing::new(self.owner_chat(), Reply::text(format_notification(&record))),
                ]
            }
            Err(e) => {
                log::error!("Error saving request from chat {}: {}", chat_id, e);
                if let Some(session) = before_completion {
                    self.sessions.write().await.insert(chat_id, session);
                }
                vec![
                    Outgoing::new(chat_id, Reply::text(SAVE_FAILED)),
                    Outgoing::new(
                        self.owner_chat(),
                        Reply::text(format!(
                            "⚠️ Не удалось сохранить заявку: {}\n\n{}",
                            e,
                            format_notification(&record)
                        )),
                    ),
                ]
            }
        }
    }
}
