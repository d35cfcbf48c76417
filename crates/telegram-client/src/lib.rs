//! `telegram-client`: the slice of the Telegram Bot API that GarajHub needs.
//!
//! Only outbound text messages are supported. Every call is a single HTTPS
//! request bounded by the client's timeout; retries are left to the caller.
//!
//! ```rust,ignore
//! use telegram_client::{ClientOptions, ParseMode, TelegramClient};
//!
//! let bot = TelegramClient::with_options("123:secret", ClientOptions::default())?;
//! bot.send_message(7903688837, "<b>hello</b>", Some(ParseMode::Html)).await?;
//! ```

pub mod client;
pub mod error;
pub mod types;


pub use client::{ClientOptions, TelegramClient};
pub use error::{Result, TelegramError};
pub use types::{ApiResponse, ParseMode, SendMessage, SentMessage};
