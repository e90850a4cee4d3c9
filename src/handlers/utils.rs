use chrono::{Local, NaiveDate};
use teloxide::prelude::*;
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup, MessageId,
    ReplyMarkup,
};
use teloxide::RequestError;

use crate::conversation::{Delivery, InlineGrid, Markup, Outgoing};

/// Текущая дата по часам сервера
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn inline_keyboard(grid: &InlineGrid) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(grid.iter().map(|row| {
        row.iter()
            .map(|button| InlineKeyboardButton::callback(button.text.clone(), button.action.encode()))
            .collect::<Vec<_>>()
    }))
}

pub fn reply_markup(markup: &Markup) -> Option<ReplyMarkup> {
    match markup {
        Markup::None => None,
        Markup::Keyboard(rows) => Some(ReplyMarkup::Keyboard(
            KeyboardMarkup::new(rows.iter().map(|row| {
                row.iter()
                    .map(|text| KeyboardButton::new(text.clone()))
                    .collect::<Vec<_>>()
            }))
            .resize_keyboard()
            .one_time_keyboard(),
        )),
        Markup::RemoveKeyboard => Some(ReplyMarkup::kb_remove()),
        Markup::Inline(grid) => Some(ReplyMarkup::InlineKeyboard(inline_keyboard(grid))),
    }
}

async fn send(bot: &Bot, outgoing: Outgoing) -> Result<(), RequestError> {
    let Outgoing { chat_id, reply } = outgoing;
    let mut request = bot.send_message(chat_id, reply.text);
    if let Some(markup) = reply_markup(&reply.markup) {
        request = request.reply_markup(markup);
    }
    request.await?;
    Ok(())
}

/// Отправка одного ответа. `origin` - сообщение с нажатой inline-кнопкой.
pub async fn deliver(
    bot: &Bot,
    outgoing: Outgoing,
    origin: Option<MessageId>,
) -> Result<(), RequestError> {
    let chat_id = outgoing.chat_id;
    match (outgoing.reply.delivery, origin) {
        (Delivery::Edit, Some(message_id)) => {
            let mut request = bot.edit_message_text(chat_id, message_id, outgoing.reply.text.clone());
            if let Markup::Inline(grid) = &outgoing.reply.markup {
                request = request.reply_markup(inline_keyboard(grid));
            }
            request.await?;
        }
        (Delivery::EditMarkup, Some(message_id)) => {
            let mut request = bot.edit_message_reply_markup(chat_id, message_id);
            if let Markup::Inline(grid) = &outgoing.reply.markup {
                request = request.reply_markup(inline_keyboard(grid));
            }
            request.await?;
        }
        (Delivery::Replace, Some(message_id)) => {
            if let Err(e) = bot.delete_message(chat_id, message_id).await {
                log::warn!("Could not delete message {} in chat {}: {}", message_id.0, chat_id, e);
            }
            send(bot, outgoing).await?;
        }
        // без исходного сообщения всё отправляется новым сообщением
        _ => send(bot, outgoing).await?,
    }
    Ok(())
}

pub async fn deliver_all(bot: &Bot, outgoing: Vec<Outgoing>, origin: Option<MessageId>) {
    for message in outgoing {
        let chat_id = message.chat_id;
        if let Err(e) = deliver(bot, message, origin).await {
            log::error!("Error delivering message to chat {}: {}", chat_id, e);
        }
    }
}
