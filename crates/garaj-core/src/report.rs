use serde::{Deserialize, Serialize};

use crate::message::{escape_html, excerpt, EXCERPT_CHARS};
use crate::types::DeliveryOutcome;

/// Summary of one broadcast job, sent once to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub sent_count: usize,
    pub failed_count: usize,
    pub message_excerpt: String,
}

impl DeliveryReport {
    pub fn from_outcomes(outcomes: &[DeliveryOutcome], message: &str) -> Self {
        let sent_count = outcomes.iter().filter(|o| o.is_delivered()).count();
        Self {
            sent_count,
            failed_count: outcomes.len() - sent_count,
            message_excerpt: excerpt(message, EXCERPT_CHARS),
        }
    }

    pub fn total(&self) -> usize {
        self.sent_count + self.failed_count
    }

    /// Operator-facing text. The excerpt is escaped since a cut can leave an
    /// unbalanced tag that Telegram would refuse to parse.
    pub fn render(&self) -> String {
        format!(
            "📊 <b>Xabar yuborish hisoboti</b>\n\n\
             ✅ Yuborildi: {}\n\
             ❌ Yuborilmadi: {}\n\
             📝 Xabar: {}",
            self.sent_count,
            self.failed_count,
            escape_html(&self.message_excerpt)
        )
    }
}
