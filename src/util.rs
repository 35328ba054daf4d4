/// Compact count: plain below 1000, then one decimal with a k/M/G suffix.
pub fn format_stat(n: usize) -> String {
    const UNITS: [(f64, &str); 3] = [(1e9, "G"), (1e6, "M"), (1e3, "k")];
    let value = n as f64;
    for (scale, suffix) in UNITS {
        if value >= scale {
            return format!("{:.1}{suffix}", value / scale);
        }
    }
    n.to_string()
}

/// First line of `message`, cut to at most `max` characters with a trailing "...".
pub fn truncate_message(message: &str, max: usize) -> String {
    let first = message.lines().next().unwrap_or_default();
    if first.chars().count() <= max {
        return first.to_string();
    }
    if max <= 3 {
        return first.chars().take(max).collect();
    }
    let mut out: String = first.chars().take(max - 3).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_stat_thresholds() {
        assert_eq!(format_stat(0), "0");
        assert_eq!(format_stat(999), "999");
        assert_eq!(format_stat(1000), "1.0k");
        assert_eq!(format_stat(1500), "1.5k");
        assert_eq!(format_stat(2_500_000), "2.5M");
        assert_eq!(format_stat(3_000_000_000), "3.0G");
    }

    #[test]
    fn truncate_keeps_first_line_only() {
        assert_eq!(truncate_message("subject\n\nbody text", 40), "subject");
        assert_eq!(truncate_message("", 10), "");
    }

    #[test]
    fn truncate_adds_ellipsis_within_limit() {
        let out = truncate_message("a rather long commit subject line", 12);
        assert_eq!(out, "a rather ...");
        assert_eq!(out.chars().count(), 12);
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate_message("héllo wörld", 11), "héllo wörld");
        assert_eq!(truncate_message("héllo wörld", 8), "héllo...");
    }
}
