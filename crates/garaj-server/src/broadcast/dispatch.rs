use std::sync::Arc;
use std::time::Duration;

use garaj_core::config::PacingConfig;
use garaj_core::message::broadcast_envelope;
use garaj_core::types::{DeliveryOutcome, Recipient};
use tracing::{debug, warn};

use crate::channel::ChannelClient;

/// Pause `delay` after every `batch_size` delivery attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub batch_size: usize,
    pub delay: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self::from(&PacingConfig::default())
    }
}

impl From<&PacingConfig> for Pacing {
    fn from(cfg: &PacingConfig) -> Self {
        Self {
            batch_size: cfg.batch_size.max(1),
            delay: cfg.delay(),
        }
    }
}

/// Sends one broadcast body to a list of recipients, one at a time.
pub struct Dispatcher {
    channel: Arc<dyn ChannelClient>,
    pacing: Pacing,
}

impl Dispatcher {
    pub fn new(channel: Arc<dyn ChannelClient>, pacing: Pacing) -> Self {
        Self { channel, pacing }
    }

    /// Attempt delivery to every recipient and return one outcome per
    /// recipient, in input order.
    ///
    /// A failed send is recorded and the loop moves on; nothing short of
    /// process shutdown stops it before the end of `recipients`. No pause
    /// follows the final attempt.
    pub async fn dispatch(&self, recipients: &[Recipient], body: &str) -> Vec<DeliveryOutcome> {
        let text = broadcast_envelope(body);
        let batch = self.pacing.batch_size.max(1);
        let mut outcomes = Vec::with_capacity(recipients.len());

        for (i, &recipient) in recipients.iter().enumerate() {
            let outcome = match self.channel.send(recipient, &text).await {
                Ok(()) => DeliveryOutcome::Delivered { recipient },
                Err(e) => {
                    warn!(%recipient, error = %e, "broadcast delivery failed");
                    DeliveryOutcome::Failed {
                        recipient,
                        reason: e.to_string(),
                    }
                }
            };
            outcomes.push(outcome);

            let attempted = i + 1;
            if attempted % batch == 0 && attempted < recipients.len() {
                debug!(
                    attempted,
                    delay_ms = self.pacing.delay.as_millis() as u64,
                    "pacing pause"
                );
                tokio::time::sleep(self.pacing.delay).await;
            }
        }

        outcomes
    }
}
