//! Numeric and date formatting.

use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::labels::{Locale, free, not_set};

/// Group digits by thousands: `1234567` → `"1,234,567"`.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Point amount, `0 pt` when missing.
pub fn points(value: Option<i64>) -> String {
    format!("{} pt", group_thousands(value.unwrap_or(0)))
}

/// Signed point change: `+30 pt`, `-30 pt`, `0 pt`.
pub fn point_change(value: Option<i64>) -> String {
    match value.unwrap_or(0) {
        v if v > 0 => format!("+{} pt", group_thousands(v)),
        v => format!("{} pt", group_thousands(v)),
    }
}

/// Yen amount; missing or zero reads as free.
pub fn yen(value: Option<i64>, locale: Locale) -> String {
    match value {
        Some(v) if v != 0 => format!("¥{}", group_thousands(v)),
        _ => free(locale).to_string(),
    }
}

/// Resolve a UTC offset in minutes, falling back to UTC when out of range.
pub fn offset_from_minutes(minutes: i32) -> FixedOffset {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}

/// Local date and time, or the not-set label.
pub fn date_time(value: Option<DateTime<Utc>>, offset: FixedOffset, locale: Locale) -> String {
    let Some(value) = value else {
        return not_set(locale).to_string();
    };
    let local = value.with_timezone(&offset);
    match locale {
        Locale::En => local.format("%b %-d, %Y %H:%M").to_string(),
        Locale::Ja => local.format("%Y年%-m月%-d日 %H:%M").to_string(),
    }
}

/// Local date only, or the not-set label.
pub fn date(value: Option<DateTime<Utc>>, offset: FixedOffset, locale: Locale) -> String {
    let Some(value) = value else {
        return not_set(locale).to_string();
    };
    let local = value.with_timezone(&offset);
    match locale {
        Locale::En => local.format("%b %-d, %Y").to_string(),
        Locale::Ja => local.format("%Y年%-m月%-d日").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(-1234567), "-1,234,567");
        assert_eq!(group_thousands(i64::MIN), "-9,223,372,036,854,775,808");
    }

    #[test]
    fn test_points_and_fees() {
        assert_eq!(points(None), "0 pt");
        assert_eq!(points(Some(1500)), "1,500 pt");
        assert_eq!(point_change(Some(30)), "+30 pt");
        assert_eq!(point_change(Some(-30)), "-30 pt");
        assert_eq!(yen(Some(1500), Locale::En), "¥1,500");
        assert_eq!(yen(None, Locale::Ja), "無料");
    }

    // Le fuseau horaire décale la date affichée
    #[test]
    fn test_dates_respect_offset_and_locale() {
        let t = DateTime::from_timestamp(1_743_523_200, 0); // 2025-04-01T16:00:00Z
        let jst = offset_from_minutes(9 * 60);
        assert_eq!(date_time(t, jst, Locale::En), "Apr 2, 2025 01:00");
        assert_eq!(date(t, jst, Locale::Ja), "2025年4月2日");
        assert_eq!(date(t, offset_from_minutes(0), Locale::En), "Apr 1, 2025");
        assert_eq!(date_time(None, jst, Locale::En), "Not set");
    }

    #[test]
    fn test_out_of_range_offset_falls_back_to_utc() {
        assert_eq!(offset_from_minutes(i32::MAX), Utc.fix());
        assert_eq!(offset_from_minutes(48 * 60), Utc.fix());
    }
}
