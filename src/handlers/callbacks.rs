use std::error::Error;

use teloxide::prelude::*;

use crate::bot_state::BotState;
use crate::conversation::Delivery;
use crate::handlers::utils::{deliver_all, today};

pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    state: BotState,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let (Some(data), Some(message)) = (q.data.as_deref(), q.message.as_ref()) else {
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };

    let chat_id = message.chat().id;
    let message_id = message.id();
    let outgoing = state.handle_callback(chat_id, data, today()).await;

    // Подсказки уходят в ответ на callback, остальное - в чат
    let (notices, messages): (Vec<_>, Vec<_>) = outgoing
        .into_iter()
        .partition(|o| o.chat_id == chat_id && o.reply.delivery == Delivery::Notice);

    let mut answer = bot.answer_callback_query(q.id.clone());
    if let Some(notice) = notices.into_iter().next() {
        answer = answer.text(notice.reply.text);
    }
    if let Err(e) = answer.await {
        log::warn!("Could not answer callback query in chat {}: {}", chat_id, e);
    }

    deliver_all(&bot, messages, Some(message_id)).await;
    Ok(())
}
