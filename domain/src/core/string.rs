//! String utilities for the domain layer.

/// Clip model output for log fields, keeping UTF-8 boundaries intact.
///
/// Output longer than `max_len` bytes is cut and suffixed with the number
/// of bytes that were dropped.
pub fn clip_for_log(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (+{} bytes)", &s[..end], s.len() - end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_short_is_unchanged() {
        assert_eq!(clip_for_log("plan", 16), "plan");
    }

    #[test]
    fn test_clip_long_reports_dropped_bytes() {
        assert_eq!(clip_for_log("abcdefghij", 4), "abcd... (+6 bytes)");
    }

    #[test]
    fn test_clip_respects_char_boundary() {
        // "é" is two bytes; cutting at 1 must back off to 0
        assert_eq!(clip_for_log("éa", 1), "... (+3 bytes)");
    }
}
