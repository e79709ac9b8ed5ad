use crate::error::SendError;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::Recipient;
use tracing::info;

/// Delivers text messages to the configured chat.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), SendError>;
}

pub struct TelegramNotifier {
    bot: Bot,
    chat: Recipient,
}

impl TelegramNotifier {
    pub fn new(bot: Bot, chat_id: &str) -> Self {
        Self {
            bot,
            chat: parse_recipient(chat_id),
        }
    }
}

/// Numeric ids address a chat directly; anything else is a `@channel` name.
fn parse_recipient(chat_id: &str) -> Recipient {
    let chat_id = chat_id.trim();
    match chat_id.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) => Recipient::ChannelUsername(chat_id.to_string()),
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), SendError> {
        self.bot
            .send_message(self.chat.clone(), text)
            .await
            .map_err(|e| SendError(e.to_string()))?;
        info!("Message delivered to {:?}", self.chat);
        Ok(())
    }
}
