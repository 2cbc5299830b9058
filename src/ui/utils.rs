use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Safely truncate string to a display width, appending "…" if truncated 🛡️
pub fn truncate(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let budget = max_width.saturating_sub(1);
    let mut used = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

/// Left-pad to a display width (format! pads by chars, not columns)
pub fn pad_to(s: &str, width: usize) -> String {
    let w = s.width();
    if w >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - w))
    }
}

/// `HH:MM:SS`
pub fn format_seconds(seconds: i64) -> String {
    let s = seconds.max(0);
    format!("{:02}:{:02}:{:02}", s / 3600, s / 60 % 60, s % 60)
}

/// Last path component, for compact rows
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_by_columns() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefgh", 5), "abcd…");
        assert_eq!(truncate("★★★★", 3), "★★…");
    }

    #[test]
    fn clock_format() {
        assert_eq!(format_seconds(0), "00:00:00");
        assert_eq!(format_seconds(125), "00:02:05");
        assert_eq!(format_seconds(3725), "01:02:05");
        assert_eq!(format_seconds(-4), "00:00:00");
    }

    #[test]
    fn file_name_and_pad() {
        assert_eq!(file_name("/music/a.mp3"), "a.mp3");
        assert_eq!(file_name("a.mp3"), "a.mp3");
        assert_eq!(pad_to("ab", 4), "ab  ");
    }
}
