use std::time::{SystemTime, UNIX_EPOCH};

/// Return the current unix timestamp in seconds.
pub fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs())
}

/// Render a unix timestamp as a Discord timestamp markup (`<t:1700000000:R>`).
///
/// `style` is one of Discord's single-letter format flags; `R` renders a
/// relative time, `f` a short date-time.
pub fn discord_timestamp(unix_secs: u64, style: char) -> String {
    format!("<t:{}:{}>", unix_secs, style)
}

#[cfg(test)]
mod tests {
    use super::discord_timestamp;

    #[test]
    fn renders_discord_markup() {
        assert_eq!(discord_timestamp(1_700_000_000, 'R'), "<t:1700000000:R>");
        assert_eq!(discord_timestamp(0, 'f'), "<t:0:f>");
    }
}
