use chrono::NaiveDate;

/// `Jan 5, 2025`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// `Sun, Jan 5, 2025` with an optional ` at <time>` suffix.
pub fn format_date_time(date: NaiveDate, time: Option<&str>) -> String {
    let day = date.format("%a, %b %-d, %Y").to_string();
    match time.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) => format!("{day} at {t}"),
        None => day,
    }
}

/// Formats integer cents as US dollars, e.g. `$1,234.50`.
pub fn format_currency(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}${}.{:02}", group_thousands(abs / 100), abs % 100)
}

/// Formats integer cents as a plain decimal, e.g. `1234.50`.
pub fn format_amount(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Parses a dollar amount typed by an admin into cents.
///
/// Accepts an optional leading `$`, thousands separators and at most two
/// decimals. Returns `None` for anything else, including negative values.
pub fn parse_amount_cents(input: &str) -> Option<i64> {
    let cleaned: String = input
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let (whole, frac) = match cleaned.split_once('.') {
        Some((w, f)) => (w, f),
        None => (cleaned.as_str(), ""),
    };

    if frac.len() > 2
        || !whole.chars().all(|c| c.is_ascii_digit())
        || !frac.chars().all(|c| c.is_ascii_digit())
        || (whole.is_empty() && frac.is_empty())
    {
        return None;
    }

    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let frac: i64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().ok()? * 10,
        _ => frac.parse().ok()?,
    };

    whole.checked_mul(100)?.checked_add(frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(0), "$0.00");
        assert_eq!(format_currency(5), "$0.05");
        assert_eq!(format_currency(123_450), "$1,234.50");
        assert_eq!(format_currency(100_000_000), "$1,000,000.00");
        assert_eq!(format_currency(-2_500), "-$25.00");
    }

    #[test]
    fn amount_has_no_currency_sign() {
        assert_eq!(format_amount(123_450), "1234.50");
        assert_eq!(format_amount(7), "0.07");
    }

    #[test]
    fn dates_render_like_the_site() {
        let d = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(format_date(d), "Jan 5, 2025");
        assert_eq!(format_date_time(d, None), "Sun, Jan 5, 2025");
        assert_eq!(
            format_date_time(d, Some("18:00")),
            "Sun, Jan 5, 2025 at 18:00"
        );
        assert_eq!(format_date_time(d, Some("  ")), "Sun, Jan 5, 2025");
    }

    #[test]
    fn parses_common_amount_inputs() {
        assert_eq!(parse_amount_cents("12"), Some(1_200));
        assert_eq!(parse_amount_cents("12.5"), Some(1_250));
        assert_eq!(parse_amount_cents(" $1,234.56 "), Some(123_456));
        assert_eq!(parse_amount_cents(".75"), Some(75));
        assert_eq!(parse_amount_cents("0"), Some(0));
    }

    #[test]
    fn rejects_malformed_amounts() {
        assert_eq!(parse_amount_cents(""), None);
        assert_eq!(parse_amount_cents("-5"), None);
        assert_eq!(parse_amount_cents("1.234"), None);
        assert_eq!(parse_amount_cents("abc"), None);
        assert_eq!(parse_amount_cents("."), None);
        assert_eq!(parse_amount_cents("1e3"), None);
    }
}
