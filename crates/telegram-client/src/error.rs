use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The Bot API answered with `ok: false`.
    #[error("Telegram API error {code}: {description}")]
    Api {
        code: i32,
        description: String,
        retry_after: Option<u64>,
    },

    #[error("Telegram API returned ok without a result")]
    MissingResult,
}

impl TelegramError {
    /// True when Telegram will never accept messages for this chat as things
    /// stand (bot blocked, chat gone, user deactivated).
    pub fn is_permanent(&self) -> bool {
        matches!(self, TelegramError::Api { code: 400 | 403, .. })
    }
}

pub type Result<T> = std::result::Result<T, TelegramError>;
