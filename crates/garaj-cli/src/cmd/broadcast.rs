use anyhow::Context;
use garaj_core::audience;
use garaj_core::config::Config;
use garaj_core::types::BroadcastJob;
use garaj_server::broadcast::Broadcaster;

use crate::output::{print_fields, print_json};

/// Send one broadcast from the terminal and wait for it to finish.
///
/// Unlike the HTTP trigger this runs in the foreground and prints the
/// delivery report; the operator still receives it through the bot.
pub fn run(
    config: Config,
    audience_tag: &str,
    message: String,
    dry_run: bool,
    json: bool,
) -> anyhow::Result<()> {
    let job = BroadcastJob::new(message, audience_tag)?;
    let recipients = audience::resolve_at(&config.database, job.selector).with_context(|| {
        format!(
            "failed to resolve audience from {}",
            config.database.display()
        )
    })?;

    if dry_run {
        if json {
            print_json(&serde_json::json!({
                "audience": job.selector,
                "recipients": recipients.len(),
            }))?;
        } else {
            print_fields(&[
                ("audience", job.selector.to_string()),
                ("recipients", recipients.len().to_string()),
            ]);
        }
        return Ok(());
    }

    let channel = garaj_server::channel::from_config(&config.telegram)?;
    let broadcaster = Broadcaster::from_config(&config, channel);

    let rt = tokio::runtime::Runtime::new()?;
    let report = rt.block_on(broadcaster.run(job, recipients));

    if json {
        print_json(&report)?;
    } else {
        print_fields(&[
            ("sent", report.sent_count.to_string()),
            ("failed", report.failed_count.to_string()),
            ("message", report.message_excerpt.clone()),
        ]);
    }
    Ok(())
}
