use crate::normalize::ValueRange;
use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Nine random base-36 characters, the shape of every bet id.
pub fn random_bet_id(rng: &mut impl Rng) -> String {
    (0..9)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect()
}

/// Parse raw slider/text input into a reading clamped to `range`.
///
/// # Examples
/// ```
/// use lipid_lotto::normalize::ValueRange;
/// use lipid_lotto::utils::parse_reading;
/// assert_eq!(parse_reading(" 420 ", ValueRange::READING), Ok(420));
/// assert_eq!(parse_reading("9000", ValueRange::READING), Ok(600));
/// ```
pub fn parse_reading(input: &str, range: ValueRange) -> Result<i32, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Reading cannot be empty".to_string());
    }
    // range inputs can report fractional values while dragging
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(range.clamp(v.round() as i32)),
        _ => Err("Reading must be a valid number".to_string()),
    }
}

pub fn format_reading(value: i32) -> String {
    format!("{} mg/dL", value)
}

pub fn format_money(amount: u32) -> String {
    format!("${}", amount)
}

/// Render time left as `Dd HHh MMm SSs`. Anything already past, or not a
/// number, reads as zero.
pub fn format_countdown(remaining_ms: f64) -> String {
    let total_s = if remaining_ms.is_finite() && remaining_ms > 0.0 {
        (remaining_ms / 1000.0).floor() as u64
    } else {
        0
    };
    let days = total_s / 86_400;
    let hours = total_s % 86_400 / 3_600;
    let minutes = total_s % 3_600 / 60;
    let seconds = total_s % 60;
    format!("{}d {:02}h {:02}m {:02}s", days, hours, minutes, seconds)
}

/// Ellipsize `name` past `max` characters for the entry feed.
pub fn short_name(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        name.to_string()
    } else {
        let mut out: String = name.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bet_ids_are_nine_base36_chars() {
        let mut rng = rand::rng();
        for _ in 0..50 {
            let id = random_bet_id(&mut rng);
            assert_eq!(id.len(), 9);
            assert!(id.bytes().all(|b| BASE36.contains(&b)));
        }
    }

    #[test]
    fn parse_reading_rejects_junk() {
        let r = ValueRange::READING;
        assert!(parse_reading("", r).is_err());
        assert!(parse_reading("   ", r).is_err());
        assert!(parse_reading("lard", r).is_err());
        assert!(parse_reading("NaN", r).is_err());
        assert_eq!(parse_reading("385.6", r), Ok(386));
        assert_eq!(parse_reading("-4", r), Ok(100));
    }

    #[test]
    fn countdown_clamps_at_zero() {
        assert_eq!(format_countdown(0.0), "0d 00h 00m 00s");
        assert_eq!(format_countdown(-5_000.0), "0d 00h 00m 00s");
        assert_eq!(format_countdown(f64::NAN), "0d 00h 00m 00s");
        assert_eq!(format_countdown(999.0), "0d 00h 00m 00s");
    }

    #[test]
    fn countdown_spans_days() {
        use crate::config::COUNTDOWN_OFFSET_MS;
        assert_eq!(format_countdown(COUNTDOWN_OFFSET_MS), "3d 14h 15m 00s");
        assert_eq!(format_countdown(COUNTDOWN_OFFSET_MS - 1_000.0), "3d 14h 14m 59s");
        assert_eq!(format_countdown(61_000.0), "0d 00h 01m 01s");
        assert_eq!(format_countdown(12.0 * 86_400_000.0 + 3_600_000.0), "12d 01h 00m 00s");
    }

    #[test]
    fn formatting() {
        assert_eq!(format_reading(385), "385 mg/dL");
        assert_eq!(format_money(15), "$15");
        assert_eq!(short_name("BaconKing", 20), "BaconKing");
        assert_eq!(short_name("Random_Eater_42", 8), "Random_…");
    }
}
