//! Admin broadcasts: validate, resolve the audience, then deliver in the
//! background and report to the operator.
//!
//! ```text
//! submit ──► BroadcastJob::new ──► audience::resolve_at ──► ack to caller
//!                                          │
//!                                          ▼ tokio::spawn (detached)
//!                              Dispatcher::dispatch ──► report::build_and_send
//! ```

pub mod dispatch;
pub mod report;

use std::path::PathBuf;
use std::sync::Arc;

use garaj_core::audience::{self, AudienceSelector};
use garaj_core::config::Config;
use garaj_core::report::DeliveryReport;
use garaj_core::types::{BroadcastJob, Recipient};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::channel::ChannelClient;
use dispatch::{Dispatcher, Pacing};

// ---------------------------------------------------------------------------
// Request / acknowledgment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct BroadcastRequest {
    pub message: String,
    /// Audience tag. The dashboard sends it as `user_type`.
    #[serde(default = "default_audience", alias = "user_type")]
    pub audience: String,
}

fn default_audience() -> String {
    AudienceSelector::All.as_str().to_string()
}

/// Returned as soon as the job is scheduled; says nothing about delivery.
#[derive(Debug, Clone, Serialize)]
pub struct BroadcastAck {
    pub accepted: bool,
    pub job_id: Uuid,
    pub audience: AudienceSelector,
    pub recipients: usize,
    pub message: &'static str,
}

// ---------------------------------------------------------------------------
// Broadcaster
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct Broadcaster {
    db_path: PathBuf,
    channel: Arc<dyn ChannelClient>,
    pacing: Pacing,
    operator: Recipient,
}

impl Broadcaster {
    pub fn new(
        db_path: PathBuf,
        channel: Arc<dyn ChannelClient>,
        pacing: Pacing,
        operator: Recipient,
    ) -> Self {
        Self {
            db_path,
            channel,
            pacing,
            operator,
        }
    }

    pub fn from_config(config: &Config, channel: Arc<dyn ChannelClient>) -> Self {
        Self::new(
            config.database.clone(),
            channel,
            Pacing::from(&config.pacing),
            Recipient(config.operator_chat_id),
        )
    }

    /// Validate `req`, resolve its audience and schedule delivery.
    ///
    /// Validation and store errors come back here and nothing is scheduled.
    /// Once `Ok` is returned the job runs on its own; its only output is the
    /// report sent to the operator.
    pub async fn submit(&self, req: BroadcastRequest) -> anyhow::Result<BroadcastAck> {
        let job = BroadcastJob::new(req.message, &req.audience)?;

        let db_path = self.db_path.clone();
        let selector = job.selector;
        let recipients =
            tokio::task::spawn_blocking(move || audience::resolve_at(&db_path, selector))
                .await
                .map_err(|e| anyhow::anyhow!("task join error: {e}"))??;

        let ack = BroadcastAck {
            accepted: true,
            job_id: job.id,
            audience: job.selector,
            recipients: recipients.len(),
            message: "Broadcast started in background",
        };
        info!(
            job_id = %job.id,
            audience = %job.selector,
            recipients = recipients.len(),
            "broadcast scheduled"
        );

        let runner = self.clone();
        // Detached on purpose: the handle is dropped and no result flows back.
        drop(tokio::spawn(async move {
            runner.run(job, recipients).await;
        }));

        Ok(ack)
    }

    /// Dispatch `job` to `recipients`, then report. Runs to the end.
    pub async fn run(&self, job: BroadcastJob, recipients: Vec<Recipient>) -> DeliveryReport {
        info!(job_id = %job.id, recipients = recipients.len(), "broadcast started");

        let outcomes = Dispatcher::new(self.channel.clone(), self.pacing)
            .dispatch(&recipients, &job.message)
            .await;
        let report =
            report::build_and_send(self.channel.as_ref(), self.operator, &outcomes, &job.message)
                .await;

        let elapsed_ms = (chrono::Utc::now() - job.submitted_at).num_milliseconds();
        info!(
            job_id = %job.id,
            sent = report.sent_count,
            failed = report.failed_count,
            elapsed_ms,
            "broadcast finished"
        );
        report
    }
}
