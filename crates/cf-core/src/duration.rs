//! ISO 8601 duration parsing (`PT4M13S`, `P1DT2H`, `P0D`).
//!
//! Video lengths arrive in ISO 8601 duration notation. Only fixed-length
//! units convert to seconds; a non-zero year or month component has no
//! fixed length and yields `None`, as does anything unparsable.

const DATE_UNITS: &[(char, Option<f64>)] = &[
    ('Y', None),
    ('M', None),
    ('W', Some(604_800.0)),
    ('D', Some(86_400.0)),
];

const TIME_UNITS: &[(char, Option<f64>)] = &[('H', Some(3_600.0)), ('M', Some(60.0)), ('S', Some(1.0))];

/// Convert an optional duration string to whole seconds.
///
/// Absent or malformed input maps to `None`; it never errors.
pub fn duration_seconds(raw: Option<&str>) -> Option<i64> {
    raw.and_then(iso8601_duration_seconds)
}

/// Parse an ISO 8601 duration into whole seconds, truncating fractions.
pub fn iso8601_duration_seconds(raw: &str) -> Option<i64> {
    let s = raw.trim();
    let (sign, rest) = match s.as_bytes().first()? {
        b'-' => (-1.0, &s[1..]),
        b'+' => (1.0, &s[1..]),
        _ => (1.0, s),
    };
    let rest = rest.strip_prefix('P')?;

    let (date_part, time_part) = match rest.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (rest, None),
    };

    let mut components = 0usize;
    let mut total = sum_components(date_part, DATE_UNITS, &mut components)?;
    if let Some(time) = time_part {
        if time.is_empty() {
            return None;
        }
        total += sum_components(time, TIME_UNITS, &mut components)?;
    }
    if components == 0 {
        return None;
    }

    let seconds = sign * total;
    if !seconds.is_finite() || seconds.abs() >= i64::MAX as f64 {
        return None;
    }
    Some(seconds as i64)
}

/// Sum `<number><unit>` components, enforcing unit order.
fn sum_components(part: &str, units: &[(char, Option<f64>)], count: &mut usize) -> Option<f64> {
    let mut total = 0.0;
    let mut next_unit = 0;
    let mut number = String::new();

    for ch in part.chars() {
        if ch.is_ascii_digit() || ch == '.' || ch == ',' {
            number.push(if ch == ',' { '.' } else { ch });
            continue;
        }

        let offset = units[next_unit..].iter().position(|(unit, _)| *unit == ch)?;
        let index = next_unit + offset;
        if number.is_empty() {
            return None;
        }
        let value: f64 = number.parse().ok()?;

        match units[index].1 {
            Some(factor) => total += value * factor,
            // calendar units only convert when they are zero
            None if value == 0.0 => {}
            None => return None,
        }

        number.clear();
        next_unit = index + 1;
        *count += 1;
    }

    if !number.is_empty() {
        return None;
    }
    Some(total)
}

#[cfg(test)]
#[path = "duration_test.rs"]
mod tests;
