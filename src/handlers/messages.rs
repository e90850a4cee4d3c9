use std::error::Error;

use teloxide::prelude::*;

use crate::bot_state::BotState;
use crate::handlers::utils::{deliver_all, today};

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    state: BotState,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    if let Some(text) = msg.text() {
        // Неизвестные команды не считаются ответом на вопрос анкеты
        if text.starts_with('/') {
            return Ok(());
        }

        let outgoing = state.handle_text(msg.chat.id, text, today()).await;
        deliver_all(&bot, outgoing, None).await;
    }

    Ok(())
}
