use std::error::Error;

use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::bot_state::BotState;
use crate::conversation::Outgoing;
use crate::handlers::utils::{deliver_all, today};
use crate::Command;

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: BotState,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let chat_id = msg.chat.id;
    match cmd {
        Command::Start => {
            let outgoing = state.start(chat_id).await;
            deliver_all(&bot, outgoing, None).await;
        }
        Command::Cancel => {
            let outgoing = state.cancel(chat_id, today()).await;
            deliver_all(&bot, outgoing, None).await;
        }
        Command::Requests => handle_requests(&bot, &msg, &state).await,
        Command::Help => {
            bot.send_message(chat_id, Command::descriptions().to_string())
                .await?;
        }
    }
    Ok(())
}

async fn handle_requests(bot: &Bot, msg: &Message, state: &BotState) {
    let requester = msg.from.as_ref().map(|user| user.id);
    let outgoing = state
        .list_requests(requester)
        .await
        .into_iter()
        .map(|reply| Outgoing::new(msg.chat.id, reply))
        .collect();
    deliver_all(bot, outgoing, None).await;
}
