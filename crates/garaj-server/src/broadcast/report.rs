use garaj_core::report::DeliveryReport;
use garaj_core::types::{DeliveryOutcome, Recipient};
use tracing::{info, warn};

use crate::channel::ChannelClient;

/// Summarise `outcomes` and send the summary to `operator`.
///
/// The send is allowed to fail: the error is logged and dropped, and the
/// built report is returned either way.
pub async fn build_and_send(
    channel: &dyn ChannelClient,
    operator: Recipient,
    outcomes: &[DeliveryOutcome],
    message: &str,
) -> DeliveryReport {
    let report = DeliveryReport::from_outcomes(outcomes, message);
    match channel.send(operator, &report.render()).await {
        Ok(()) => info!(
            %operator,
            sent = report.sent_count,
            failed = report.failed_count,
            "delivery report sent"
        ),
        Err(e) => warn!(%operator, error = %e, "delivery report not delivered"),
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::fake::RecordingChannel;

    fn mixed() -> Vec<DeliveryOutcome> {
        vec![
            DeliveryOutcome::Delivered {
                recipient: Recipient(1),
            },
            DeliveryOutcome::Failed {
                recipient: Recipient(2),
                reason: "blocked".into(),
            },
        ]
    }

    #[tokio::test]
    async fn report_goes_to_operator() {
        let channel = RecordingChannel::default();
        let report = build_and_send(&channel, Recipient(99), &mixed(), "hello").await;

        assert_eq!(report.sent_count, 1);
        assert_eq!(report.failed_count, 1);
        let calls = channel.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, Recipient(99));
        assert_eq!(calls[0].1, report.render());
    }

    #[tokio::test]
    async fn failed_report_send_is_swallowed() {
        let channel = RecordingChannel::failing_for(&[99]);
        let report = build_and_send(&channel, Recipient(99), &mixed(), "hello").await;
        assert_eq!(report.total(), 2);
        assert_eq!(channel.call_count(), 1);
    }
}
