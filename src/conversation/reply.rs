use teloxide::types::ChatId;

use crate::conversation::actions::CallbackAction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub text: String,
    pub action: CallbackAction,
}

impl Button {
    pub fn new(text: impl Into<String>, action: CallbackAction) -> Self {
        Self { text: text.into(), action }
    }

    /// Неактивная кнопка (заголовки, пустые клетки)
    pub fn inert(text: impl Into<String>) -> Self {
        Self::new(text, CallbackAction::Ignore)
    }
}

pub type InlineGrid = Vec<Vec<Button>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
    None,
    Keyboard(Vec<Vec<String>>),
    RemoveKeyboard,
    Inline(InlineGrid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Send,
    /// Edit text and keyboard of the message that carried the callback.
    Edit,
    EditMarkup,
    /// Delete the callback message and send a new one.
    Replace,
    /// Short notice in the callback answer, no chat message.
    Notice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub markup: Markup,
    pub delivery: Delivery,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into(), markup: Markup::None, delivery: Delivery::Send }
    }

    pub fn keyboard(text: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self { text: text.into(), markup: Markup::Keyboard(rows), delivery: Delivery::Send }
    }

    pub fn inline(text: impl Into<String>, grid: InlineGrid) -> Self {
        Self { text: text.into(), markup: Markup::Inline(grid), delivery: Delivery::Send }
    }

    pub fn notice(text: impl Into<String>) -> Self {
        Self { text: text.into(), markup: Markup::None, delivery: Delivery::Notice }
    }

    pub fn remove_keyboard(mut self) -> Self {
        self.markup = Markup::RemoveKeyboard;
        self
    }

    pub fn delivered(mut self, delivery: Delivery) -> Self {
        self.delivery = delivery;
        self
    }

    #[cfg(test)]
    pub fn inline_grid(&self) -> Option<&InlineGrid> {
        match &self.markup {
            Markup::Inline(grid) => Some(grid),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outgoing {
    pub chat_id: ChatId,
    pub reply: Reply,
}

impl Outgoing {
    pub fn new(chat_id: ChatId, reply: Reply) -> Self {
        Self { chat_id, reply }
    }
}
