use chrono::NaiveDate;

use super::error::{ParseError, RowError, UnrecognizedEncodingError};

/// Currency symbol accepted at the start of a price.
const CURRENCY_SYMBOL: char = '$';
/// Thousands separator, only valid between groups of three digits.
const THOUSANDS_SEPARATOR: char = ',';

/// Parse a currency-formatted price such as `"$1,234.50"`.
///
/// One leading `$` is removed. The integer part is either plain digits or
/// digit groups like `12,345,678`, where every `,` is followed by exactly
/// three digits and the first group has one to three. An optional `.` and
/// fractional digits may follow. Signs, exponents, `NaN` and `inf` are
/// rejected, so the result is always finite and non-negative.
pub fn parse_price(raw: &str) -> Result<f64, ParseError> {
    let err = || ParseError {
        raw: raw.to_string(),
    };

    let trimmed = raw.trim();
    let body = trimmed.strip_prefix(CURRENCY_SYMBOL).unwrap_or(trimmed);
    let (integer, fraction) = match body.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (body, None),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    let integer_ok = if integer.contains(THOUSANDS_SEPARATOR) {
        let mut groups = integer.split(THOUSANDS_SEPARATOR);
        let lead_ok = groups
            .next()
            .is_some_and(|g| (1..=3).contains(&g.len()) && all_digits(g));
        lead_ok && groups.all(|g| g.len() == 3 && all_digits(g))
    } else {
        all_digits(integer)
    };
    let fraction = fraction.unwrap_or("");
    if !integer_ok || !all_digits(fraction) || integer.len() + fraction.len() == 0 {
        return Err(err());
    }

    let mut digits = integer.replace(THOUSANDS_SEPARATOR, "");
    if digits.is_empty() {
        digits.push('0');
    }
    if !fraction.is_empty() {
        digits.push('.');
        digits.push_str(fraction);
    }
    let value: f64 = digits.parse().map_err(|_| err())?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(err())
    }
}

/// Parse an optional price: an empty cell is `None`.
pub fn parse_optional_price(raw: &str) -> Result<Option<f64>, ParseError> {
    if raw.trim().is_empty() {
        Ok(None)
    } else {
        parse_price(raw).map(Some)
    }
}

/// Map the calendar's `t` / `f` encoding to a boolean.
pub fn parse_available(raw: &str) -> Result<bool, UnrecognizedEncodingError> {
    match raw.trim() {
        "t" => Ok(true),
        "f" => Ok(false),
        other => Err(UnrecognizedEncodingError {
            raw: other.to_string(),
        }),
    }
}

/// Parse an ISO `YYYY-MM-DD` calendar date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, RowError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| RowError::Date {
        value: raw.to_string(),
    })
}

/// Parse `availability_365`, which must lie in `0..=365`.
pub fn parse_availability_365(raw: &str) -> Result<u16, RowError> {
    let out_of_range = || RowError::OutOfRange {
        column: "availability_365",
        value: raw.to_string(),
    };
    let days: u16 = raw.trim().parse().map_err(|_| out_of_range())?;
    if days <= 365 {
        Ok(days)
    } else {
        Err(out_of_range())
    }
}

/// Parse a coordinate and check it lies within `[-limit, limit]`.
pub fn parse_coordinate(raw: &str, column: &'static str, limit: f64) -> Result<f64, RowError> {
    let out_of_range = || RowError::OutOfRange {
        column,
        value: raw.to_string(),
    };
    let value: f64 = raw.trim().parse().map_err(|_| out_of_range())?;
    if value.is_finite() && value.abs() <= limit {
        Ok(value)
    } else {
        Err(out_of_range())
    }
}
