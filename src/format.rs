//! Tick label formatting.
//!
//! Pure functions plus the constant lookup tables shared by the label
//! generator: nice time precisions with their date formats, and the
//! fractional positions of logarithmic sub-ticks.

use chrono::{Local, TimeZone};

use crate::data_types::{LabelFormat, Scale};

pub const SECOND: f64 = 1.0;
pub const MINUTE: f64 = 60.0;
pub const HOUR: f64 = 3600.0;
pub const DAY: f64 = 86400.0;
pub const MONTH: f64 = 2_592_000.0;
pub const YEAR: f64 = 31_536_000.0;

/// Nice durations for time-annotated axes, coarsest last, each paired with
/// the date format used at that precision.
pub const TIME_PRECS: [(f64, &str); 18] = [
    (SECOND, "%H:%M:%S"),
    (5.0 * SECOND, "%H:%M:%S"),
    (10.0 * SECOND, "%H:%M:%S"),
    (30.0 * SECOND, "%H:%M:%S"),
    (MINUTE, "%H:%M:%S"),
    (5.0 * MINUTE, "%H:%M:%S"),
    (10.0 * MINUTE, "%H:%M:%S"),
    (30.0 * MINUTE, "%H:%M"),
    (HOUR, "%H:%M"),
    (3.0 * HOUR, "%H:%M"),
    (6.0 * HOUR, "%H:%M"),
    (12.0 * HOUR, "%a %H:%M"),
    (DAY, "%a %d"),
    (7.0 * DAY, "%d/%m/%y"),
    (MONTH, "%b %y"),
    (YEAR, "%Y"),
    (5.0 * YEAR, "%Y"),
    (10.0 * YEAR, "%Y"),
];

/// Fallback when even the coarsest table entry yields too many labels.
pub const YEAR_FORMAT: &str = "%Y";

/// log10(2..=9): fractional decade positions of logarithmic sub-ticks.
pub const LOG_SUB_TICKS: [f64; 8] = [0.301, 0.477, 0.602, 0.699, 0.778, 0.845, 0.903, 0.954];

pub const US_DATE_FORMAT: &str = "%Y/%m/%d %H:%M:%S";
pub const FR_DATE_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Scientific representation with a two-decimal mantissa (x.xxEyy).
pub fn to_scientific(d: f64) -> String {
    let (a, e) = mantissa_exponent(d, 9.999_999_999);
    format!("{:.2}e{}", a, e)
}

/// Scientific representation with an integer mantissa (xEyy).
pub fn to_scientific_int(d: f64) -> String {
    let (a, e) = mantissa_exponent(d, 9.99999);
    format!("{}e{}", (a + 0.5).trunc() as i64, e)
}

fn mantissa_exponent(d: f64, carry_limit: f64) -> (f64, i32) {
    let mut a = d.abs();
    let mut e = 0;
    if a != 0.0 {
        if a < 1.0 {
            while a < 1.0 {
                a *= 10.0;
                e -= 1;
            }
        } else {
            while a >= 10.0 {
                a /= 10.0;
                e += 1;
            }
        }
    }
    // Formatting would carry 9.99x over to 10.0
    if a >= carry_limit {
        a /= 10.0;
        e += 1;
    }
    if d < 0.0 {
        a = -a;
    }
    (a, e)
}

/// Strip non-significant trailing zeros (and a then-dangling point).
pub fn suppress_zero(n: &str) -> String {
    if !n.contains('.') {
        return n.to_string();
    }
    let trimmed = n.trim_end_matches('0');
    trimmed.strip_suffix('.').unwrap_or(trimmed).to_string()
}

/// `%g`-style shortest representation with 6 significant digits.
fn format_general(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    let exp = v.abs().log10().floor() as i32;
    if exp < -4 || exp >= 6 {
        let mantissa = v / 10f64.powi(exp);
        let m = suppress_zero(&format!("{:.5}", mantissa));
        format!("{}e{}", m, exp)
    } else {
        let decimals = (5 - exp).max(0) as usize;
        suppress_zero(&format!("{:.*}", decimals, v))
    }
}

/// Seconds rendered as H:MM:SS (hours may exceed 24).
fn format_clock(vt: f64) -> String {
    let sec = vt.abs() as i64;
    let hh = sec / 3600;
    let mm = (sec % 3600) / 60;
    let ss = sec % 60;
    if vt < 0.0 {
        format!("-{:02}:{:02}:{:02}", hh, mm, ss)
    } else {
        format!("{:02}:{:02}:{:02}", hh, mm, ss)
    }
}

/// Seconds since epoch through a strftime-style format, local time.
pub fn format_time_value(vt: f64, date_format: &str) -> String {
    match Local.timestamp_opt(vt as i64, 0) {
        chrono::LocalResult::Single(dt) | chrono::LocalResult::Ambiguous(dt, _) => {
            dt.format(date_format).to_string()
        }
        chrono::LocalResult::None => format!("{:.2}", vt),
    }
}

/// Format a tick value.
///
/// `prec` is the tick step; in linear mode the value is first rounded to
/// the nearest multiple of it so the displayed text matches the true tick
/// grid (pass 0 to skip).
pub fn format_value(
    vt: f64,
    prec: f64,
    format: LabelFormat,
    scale: Scale,
    date_format: &str,
) -> String {
    if vt.is_nan() {
        return "NaN".to_string();
    }

    let mut vt = vt;
    if prec != 0.0 && scale == Scale::Linear {
        let negative = vt < 0.0;
        if negative {
            vt = -vt;
        }
        vt = (vt / prec + 0.5).floor() * prec;
        if negative {
            vt = -vt;
        }
    }

    match format {
        LabelFormat::Scientific => to_scientific(vt),
        LabelFormat::ScientificInt => to_scientific_int(vt),
        LabelFormat::DecInt => {
            let i = (vt.abs() + 0.5) as i64;
            if vt < 0.0 {
                format!("-{}", i)
            } else {
                format!("{}", i)
            }
        }
        LabelFormat::HexInt => {
            let i = (vt.abs() + 0.5) as i64;
            if vt < 0.0 {
                format!("-{:X}", i)
            } else {
                format!("{:X}", i)
            }
        }
        LabelFormat::BinInt => {
            let i = (vt.abs() + 0.5) as i64;
            if vt < 0.0 {
                format!("-{:b}", i)
            } else {
                format!("{:b}", i)
            }
        }
        LabelFormat::Clock => format_clock(vt),
        LabelFormat::Date => format_time_value(vt.abs(), date_format),
        LabelFormat::Auto => {
            if vt == 0.0 {
                "0".to_string()
            } else if vt.abs() <= 1.0e-4 {
                to_scientific(vt)
            } else {
                format_general(vt)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scientific_carries_near_ten() {
        assert_eq!(to_scientific(9.9999999999), "1.00e1");
        assert_eq!(to_scientific(0.00123), "1.23e-3");
        assert_eq!(to_scientific(-250.0), "-2.50e2");
    }

    #[test]
    fn general_strips_zeros() {
        assert_eq!(format_general(0.5), "0.5");
        assert_eq!(format_general(1500.0), "1500");
        assert_eq!(format_general(1.0e7), "1e7");
    }

    #[test]
    fn clock_wraps_past_midnight() {
        assert_eq!(format_clock(3661.0), "01:01:01");
        assert_eq!(format_clock(90000.0), "25:00:00");
        assert_eq!(format_clock(-61.0), "-00:01:01");
    }
}
