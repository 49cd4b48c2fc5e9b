//! Minimal RFC 5545 content-line writer.

use chrono::{DateTime, Utc};

/// Maximum octets per physical content line, excluding the CRLF.
const MAX_LINE_OCTETS: usize = 75;

/// Escapes a TEXT property value.
///
/// Backslashes, semicolons and commas are backslash-escaped; line breaks
/// become a literal `\n`.
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(ch),
        }
    }
    out
}

/// Formats a timestamp as an iCalendar UTC DATE-TIME (`20251112T182000Z`).
pub fn format_utc(dt: DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Accumulates content lines, folding them at 75 octets.
#[derive(Debug, Default)]
pub struct IcsWriter {
    buf: String,
}

impl IcsWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a property whose value is already in wire form.
    pub fn raw(&mut self, name: &str, value: &str) -> &mut Self {
        let line = format!("{name}:{value}");
        self.push_folded(&line);
        self
    }

    /// Writes a TEXT property, escaping the value.
    pub fn text(&mut self, name: &str, value: &str) -> &mut Self {
        self.raw(name, &escape_text(value))
    }

    /// Writes a UTC DATE-TIME property.
    pub fn timestamp(&mut self, name: &str, value: DateTime<Utc>) -> &mut Self {
        self.raw(name, &format_utc(value))
    }

    pub fn begin(&mut self, component: &str) -> &mut Self {
        self.raw("BEGIN", component)
    }

    pub fn end(&mut self, component: &str) -> &mut Self {
        self.raw("END", component)
    }

    pub fn finish(self) -> String {
        self.buf
    }

    // Folds on char boundaries; a continuation line's leading space counts
    // toward its 75 octets.
    fn push_folded(&mut self, line: &str) {
        let mut used = 0;
        for ch in line.chars() {
            let len = ch.len_utf8();
            if used + len > MAX_LINE_OCTETS {
                self.buf.push_str("\r\n ");
                used = 1;
            }
            self.buf.push(ch);
            used += len;
        }
        self.buf.push_str("\r\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a, b; c"), "a\\, b\\; c");
        assert_eq!(escape_text("back\\slash"), "back\\\\slash");
        assert_eq!(escape_text("line\r\nbreak"), "line\\nbreak");
        assert_eq!(escape_text("Chiefs @ Bills"), "Chiefs @ Bills");
    }

    #[test]
    fn test_format_utc() {
        let dt = Utc.with_ymd_and_hms(2025, 1, 5, 9, 3, 7).unwrap();
        assert_eq!(format_utc(dt), "20250105T090307Z");
    }

    #[test]
    fn test_short_line_is_not_folded() {
        let mut writer = IcsWriter::new();
        writer.raw("VERSION", "2.0");
        assert_eq!(writer.finish(), "VERSION:2.0\r\n");
    }

    #[test]
    fn test_long_line_is_folded_within_limit() {
        let value = "x".repeat(200);
        let mut writer = IcsWriter::new();
        writer.text("DESCRIPTION", &value);
        let out = writer.finish();

        for physical in out.trim_end_matches("\r\n").split("\r\n") {
            assert!(physical.len() <= MAX_LINE_OCTETS, "line too long: {}", physical.len());
        }
        let unfolded = out.replace("\r\n ", "");
        assert_eq!(unfolded, format!("DESCRIPTION:{value}\r\n"));
    }

    #[test]
    fn test_fold_never_splits_multibyte_chars() {
        let value = "é".repeat(100);
        let mut writer = IcsWriter::new();
        writer.text("LOCATION", &value);
        let out = writer.finish();

        for physical in out.trim_end_matches("\r\n").split("\r\n") {
            assert!(physical.len() <= MAX_LINE_OCTETS);
        }
        assert_eq!(out.replace("\r\n ", ""), format!("LOCATION:{value}\r\n"));
    }
}
