use std::sync::Arc;

use secrecy::ExposeSecret;
use teloxide::{prelude::*, utils::command::BotCommands};

mod bot_state;
mod config;
mod conversation;
mod error;
mod handlers;
mod keyboards;
mod models;
mod storage;
mod validators;

use crate::bot_state::BotState;
use crate::config::Config;
use crate::handlers::{callback_handler, command_handler, message_handler};
use crate::storage::CsvRequestLog;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Доступные команды:")]
pub enum Command {
    #[command(description = "оформить заявку")]
    Start,
    #[command(description = "отменить заявку")]
    Cancel,
    #[command(description = "последние заявки (только для администратора)")]
    Requests,
    #[command(description = "показать помощь")]
    Help,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Загружаем .env и инициализируем логирование
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Starting client form bot...");

    let config = Config::from_env()?;

    let requests_log = CsvRequestLog::new(config.requests_path.clone());
    log::info!("✅ Requests are appended to {}", requests_log.path().display());

    let state = BotState::new(Arc::new(requests_log), config.owner_id);

    let bot = Bot::new(config.bot_token.expose_secret());
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        log::warn!("Could not register bot commands: {}", e);
    }

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(command_handler),
        )
        .branch(Update::filter_callback_query().endpoint(callback_handler))
        .branch(Update::filter_message().endpoint(message_handler));

    log::info!("🚀 Starting dispatcher...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
