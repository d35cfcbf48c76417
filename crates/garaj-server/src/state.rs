use std::sync::Arc;

use garaj_core::config::Config;

use crate::auth::AdminGate;
use crate::broadcast::Broadcaster;
use crate::channel::ChannelClient;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub broadcaster: Broadcaster,
    pub admin: AdminGate,
}

impl AppState {
    /// Build state from config with an explicitly supplied channel, so tests
    /// and the CLI decide which client broadcasts go through.
    pub fn new(config: &Config, channel: Arc<dyn ChannelClient>) -> Self {
        let admin = match config.server.admin_token.as_deref() {
            Some(token) => AdminGate::with_token(token),
            None => AdminGate::open(),
        };
        Self {
            broadcaster: Broadcaster::from_config(config, channel),
            admin,
        }
    }
}
