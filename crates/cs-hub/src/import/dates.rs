use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Best-effort date for a spreadsheet cell; `None` when nothing sensible can
/// be derived.
pub(crate) fn parse_cell_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    parse_iso(trimmed).or_else(|| parse_by_parts(trimmed))
}

/// `%Y` also accepts short years, so only `YYYY-...` cells are tried as ISO.
fn parse_iso(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    if bytes.len() < 5 || !bytes[..4].iter().all(u8::is_ascii_digit) || bytes[4] != b'-' {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}

/// Three numeric parts split on `/`, `.` or `-`.
///
/// A leading four-digit (or > 31) part is the year. Otherwise the last part
/// is the year and the first of the remaining parts above 12 is the day.
/// When both are <= 12 the cell is read day-first, so `03/04/05` is
/// 3 April 2005 even if the author meant March 4th.
fn parse_by_parts(value: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = value.split(['/', '.', '-']).map(str::trim).collect();
    let [first, second, third] = parts.as_slice() else {
        return None;
    };

    let a = numeric(first)?;
    let b = numeric(second)?;
    let c = numeric(third)?;

    let (year, month, day) = if first.len() == 4 || a > 31 {
        if b > 12 {
            (a, c, b)
        } else {
            (a, b, c)
        }
    } else {
        let year = expand_year(c, third.len());
        if a > 12 || b <= 12 {
            (year, b, a)
        } else {
            (year, a, b)
        }
    };

    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)
}

fn numeric(part: &str) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

fn expand_year(year: u32, digits: usize) -> u32 {
    if digits <= 2 {
        2000 + year
    } else {
        year
    }
}
