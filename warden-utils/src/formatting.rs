/// Convert internal action identifiers to user-facing names.
pub fn action_display_name(action: &str) -> String {
    match action {
        "kick" => "Kick".to_owned(),
        "clear" => "Clear".to_owned(),
        "lockdown" => "Lockdown".to_owned(),
        "unlock" => "Unlock".to_owned(),
        "slowmode" => "Slowmode".to_owned(),
        "nick" => "Nickname".to_owned(),
        other => {
            let normalized = other.trim();
            if normalized.is_empty() {
                return "Unknown".to_owned();
            }

            normalized
                .split('_')
                .filter(|part| !part.is_empty())
                .map(|part| {
                    let mut chars = part.chars();
                    match chars.next() {
                        Some(first) => format!(
                            "{}{}",
                            first.to_uppercase(),
                            chars.as_str().to_ascii_lowercase()
                        ),
                        None => String::new(),
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
        }
    }
}

/// Format seconds into a compact human-readable duration (e.g. 59s, 1m, 1h 30m, 1d).
pub fn format_compact_duration(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    if days > 0 {
        return if hours > 0 {
            format!("{}d {}h", days, hours)
        } else {
            format!("{}d", days)
        };
    }

    let parts: Vec<String> = [(hours, 'h'), (minutes, 'm'), (seconds, 's')]
        .into_iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{}{}", value, unit))
        .collect();

    if parts.is_empty() {
        "0s".to_owned()
    } else {
        parts.join(" ")
    }
}

/// Break user mentions so relayed text can't ping anyone.
pub fn sanitize_mentions(raw: &str) -> String {
    raw.replace('@', "@\u{200B}")
}

/// Truncate to at most `max_chars` characters, appending an ellipsis when cut.
pub fn truncate_chars(raw: &str, max_chars: usize) -> String {
    if raw.chars().count() <= max_chars {
        return raw.to_owned();
    }

    let keep = max_chars.saturating_sub(1);
    let mut out: String = raw.chars().take(keep).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::{action_display_name, format_compact_duration, sanitize_mentions, truncate_chars};

    #[test]
    fn action_names_are_user_friendly() {
        assert_eq!(action_display_name("kick"), "Kick");
        assert_eq!(action_display_name("nick"), "Nickname");
        assert_eq!(action_display_name("custom_action"), "Custom Action");
        assert_eq!(action_display_name("  "), "Unknown");
    }

    #[test]
    fn compact_duration_formatting() {
        assert_eq!(format_compact_duration(0), "0s");
        assert_eq!(format_compact_duration(59), "59s");
        assert_eq!(format_compact_duration(60), "1m");
        assert_eq!(format_compact_duration(61), "1m 1s");
        assert_eq!(format_compact_duration(3600), "1h");
        assert_eq!(format_compact_duration(3670), "1h 1m 10s");
        assert_eq!(format_compact_duration(3605), "1h 5s");
        assert_eq!(format_compact_duration(90000), "1d 1h");
    }

    #[test]
    fn mentions_are_broken_up() {
        assert_eq!(sanitize_mentions("hi @everyone"), "hi @\u{200B}everyone");
        assert_eq!(sanitize_mentions("plain"), "plain");
    }

    #[test]
    fn truncation_counts_chars() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("abcdef", 4), "abc…");
        assert_eq!(truncate_chars("ééééé", 3), "éé…");
    }
}
