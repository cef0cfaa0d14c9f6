//! Log helpers that keep host-supplied text on a single, bounded line.

use std::borrow::Cow;
use std::fmt::Write;

const MAX_PREVIEW: usize = 120;

/// Material names, world names and rejection reasons as they appear in log
/// lines. Text that is already short and printable is borrowed unchanged;
/// otherwise control characters and backslashes are escaped and the result is
/// cut at `MAX_PREVIEW` characters with an ellipsis.
pub fn escape_log(s: &str) -> Cow<'_, str> {
    let clean = s.chars().count() <= MAX_PREVIEW && !s.chars().any(|c| c == '\\' || c.is_control());
    if clean {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len().min(MAX_PREVIEW) + 8);
    for ch in s.chars().take(MAX_PREVIEW) {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    if s.chars().nth(MAX_PREVIEW).is_some() {
        out.push('…');
    }
    Cow::Owned(out)
}

/// Short form of an optional actor for log lines; hoppers and droppers show as `automated`.
pub fn actor_label(actor: Option<&crate::item::ActorId>) -> String {
    match actor {
        Some(id) => {
            let full = id.to_string();
            full[..8].to_string()
        }
        None => "automated".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_control_characters() {
        assert_eq!(escape_log("Shop\nname\t\u{7}"), "Shop\\nname\\t\\x07");
    }

    #[test]
    fn clean_text_is_borrowed() {
        assert!(matches!(escape_log("DIAMOND_SWORD"), Cow::Borrowed("DIAMOND_SWORD")));
        assert!(matches!(escape_log("a\\b"), Cow::Owned(_)));
    }

    #[test]
    fn truncates_long_input() {
        let long = "x".repeat(500);
        let escaped = escape_log(&long);
        assert!(escaped.ends_with('…'));
        assert_eq!(escaped.chars().count(), MAX_PREVIEW + 1);
    }

    #[test]
    fn actor_label_is_short() {
        let id = crate::item::ActorId::new();
        assert_eq!(actor_label(Some(&id)).len(), 8);
        assert_eq!(actor_label(None), "automated");
    }
}
