/// Parse a compact duration token like `30s`, `10m`, `2h`, `1d`, `1h 30m`, or plain seconds.
///
/// Zero-valued segments are rejected; callers that accept "off" handle it first.
pub fn parse_duration_seconds(raw: &str) -> Option<u64> {
    let compact: String = raw.chars().filter(|ch| !ch.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }

    let bytes = compact.as_bytes();
    let mut cursor = 0;
    let mut total_seconds = 0_u64;
    let mut saw_unit_segment = false;

    while cursor < bytes.len() {
        let number_start = cursor;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }

        if number_start == cursor {
            return None;
        }

        let number = compact[number_start..cursor].parse::<u64>().ok()?;
        if number == 0 {
            return None;
        }

        let saw_unit = cursor < bytes.len();
        let multiplier = if saw_unit {
            let unit = bytes[cursor] as char;
            cursor += 1;

            match unit.to_ascii_lowercase() {
                's' => 1_u64,
                'm' => 60_u64,
                'h' => 60_u64 * 60,
                'd' => 60_u64 * 60 * 24,
                _ => return None,
            }
        } else {
            1_u64
        };

        // A bare number may only appear alone, never after a unit segment.
        if !saw_unit && saw_unit_segment {
            return None;
        }
        saw_unit_segment = saw_unit_segment || saw_unit;

        let part_seconds = number.checked_mul(multiplier)?;
        total_seconds = total_seconds.checked_add(part_seconds)?;
    }

    Some(total_seconds)
}

/// Parse an on/off style toggle argument.
pub fn parse_toggle(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "enable" | "lock" => Some(true),
        "off" | "false" | "no" | "disable" | "unlock" => Some(false),
        _ => None,
    }
}
