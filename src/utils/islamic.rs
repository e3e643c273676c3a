//! Zakat, Hijri calendar and related display helpers.

use chrono::{DateTime, Datelike, Utc};

/// Zakat rate on wealth held at or above the nisab.
pub const ZAKAT_RATE: f64 = 0.025;

/// Nisab in grams of gold.
pub const NISAB_GOLD_GRAMS: f64 = 85.0;

/// Nisab threshold in currency for a given gold price.
pub fn nisab_value(gold_price_per_gram: f64) -> f64 {
    NISAB_GOLD_GRAMS * gold_price_per_gram
}

/// Zakat due on `wealth`: 2.5% at or above `nisab`, otherwise nothing.
pub fn calculate_zakat(wealth: f64, nisab: f64) -> f64 {
    if wealth >= nisab {
        wealth * ZAKAT_RATE
    } else {
        0.0
    }
}

pub const HIJRI_MONTHS: [&str; 12] = [
    "Muharram",
    "Safar",
    "Rabi al-Awwal",
    "Rabi al-Thani",
    "Jumada al-Awwal",
    "Jumada al-Thani",
    "Rajab",
    "Sha'ban",
    "Ramadan",
    "Shawwal",
    "Dhu al-Qi'dah",
    "Dhu al-Hijjah",
];

/// Approximate Hijri date, `"<day> <month> <year> AH"`.
///
/// The year follows the 33-year drift between the calendars; day and
/// month are carried over from the Gregorian date. Good enough for
/// display, not for religious observance.
pub fn hijri_date(date: DateTime<Utc>) -> String {
    let years_since_hijra = f64::from(date.year() - 622);
    let year = (years_since_hijra + years_since_hijra / 33.0).floor() as i64;
    let month = HIJRI_MONTHS[date.month0() as usize];
    format!("{} {} {} AH", date.day(), month, year)
}

const HARAM_TERMS: [&str; 5] = ["pork", "alcohol", "gambling", "interest", "riba"];

/// False when `item` mentions a prohibited term.
pub fn is_halal(item: &str) -> bool {
    let item = item.to_lowercase();
    !HARAM_TERMS.iter().any(|term| item.contains(term))
}

const ARABIC_DIGITS: [char; 10] = ['٠', '١', '٢', '٣', '٤', '٥', '٦', '٧', '٨', '٩'];

/// Replace ASCII digits with Eastern Arabic numerals.
pub fn format_arabic_number(num: impl ToString) -> String {
    num.to_string()
        .chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => ARABIC_DIGITS[d as usize],
            None => c,
        })
        .collect()
}

/// 12-hour clock time such as `1:30 PM`.
pub fn format_prayer_time(hour: u32, minute: u32) -> String {
    let period = if hour % 24 >= 12 { "PM" } else { "AM" };
    let display_hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{display_hour}:{minute:02} {period}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_calculate_zakat() {
        assert_eq!(calculate_zakat(10_000.0, 5_000.0), 250.0);
        assert_eq!(calculate_zakat(5_000.0, 5_000.0), 125.0);
        assert_eq!(calculate_zakat(1_000.0, 5_000.0), 0.0);
        assert_eq!(nisab_value(60.0), 5_100.0);
    }

    #[test]
    fn test_hijri_date() {
        let date = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let hijri = hijri_date(date);
        assert!(hijri.ends_with("AH"));
        assert!(hijri.starts_with("15 Muharram"));
        assert_eq!(hijri, "15 Muharram 1444 AH");
    }

    #[test]
    fn test_is_halal() {
        assert!(is_halal("Dates and honey"));
        assert!(!is_halal("Pork sausages"));
        assert!(!is_halal("Fixed INTEREST savings"));
    }

    #[test]
    fn test_format_arabic_number() {
        assert_eq!(format_arabic_number(2025), "٢٠٢٥");
        assert_eq!(format_arabic_number(-3.5), "-٣.٥");
    }

    #[test]
    fn test_format_prayer_time() {
        assert_eq!(format_prayer_time(13, 30), "1:30 PM");
        assert_eq!(format_prayer_time(5, 45), "5:45 AM");
        assert_eq!(format_prayer_time(0, 0), "12:00 AM");
        assert_eq!(format_prayer_time(12, 0), "12:00 PM");
    }
}
