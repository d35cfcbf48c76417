//! Fixed message texts sent through the bot. Telegram renders them with the
//! HTML parse mode.

/// Maximum number of characters of the broadcast quoted in a report.
pub const EXCERPT_CHARS: usize = 100;

const ELLIPSIS: &str = "...";

/// Wrap an admin-authored body in the broadcast preamble and signature.
///
/// The body is passed through untouched so admins can use Telegram HTML tags.
pub fn broadcast_envelope(body: &str) -> String {
    format!("📢 <b>Admin xabari:</b>\n\n{body}\n\n<i>— GarajHub jamoasi</i>")
}

/// First `max_chars` characters of `text`, with `...` appended when the text
/// was cut. Counts `char`s, never splits a code point.
///
/// Unlike the old dashboard reports, a message that fits is quoted without a
/// trailing `...`.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}{ELLIPSIS}")
    } else {
        head
    }
}

/// Escape the characters Telegram's HTML mode treats as markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
