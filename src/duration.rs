/*!
 * Clock-style timestamp codec shared by every textual format.
 *
 * Timestamps look like `01:02:03,456` (SRT), `01:02:03.456` or `02:03.456`
 * (WebVTT) and `1:02:03.45` (SSA). The separator in front of the fractional
 * part and its number of digits vary per format, everything else is common.
 */

use chrono::TimeDelta;

use crate::errors::{Result, SubtitleError};

/// Largest number of fractional digits a timestamp may carry (milliseconds)
const MAX_FRACTION_DIGITS: usize = 3;

/// Separator and fractional precision of one format's timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampFormat {
    /// Text between seconds and the fractional part
    pub separator: &'static str,
    /// Number of fractional digits written
    pub fraction_digits: usize,
}

impl TimestampFormat {
    /// `HH:MM:SS,mmm`
    pub const SRT: Self = Self { separator: ",", fraction_digits: 3 };
    /// `HH:MM:SS.mmm`
    pub const WEBVTT: Self = Self { separator: ".", fraction_digits: 3 };
    /// `H:MM:SS.cc`, read back at millisecond precision
    pub const SSA: Self = Self { separator: ".", fraction_digits: 2 };

    /// Parses a timestamp in this format
    pub fn parse(&self, text: &str) -> Result<TimeDelta> {
        parse_duration(text, self.separator, self.fraction_digits)
    }

    /// Formats a duration in this format
    pub fn format(&self, duration: TimeDelta) -> String {
        format_duration(duration, self.separator, self.fraction_digits)
    }
}

/// Parses `[-][HH:]MM:SS[<separator>f]` into a signed duration.
///
/// A leading `-` negates the whole timestamp, matching [`format_duration`].
///
/// The fractional field may hold at most three digits. It is read at
/// `fraction_digits` precision and scaled to milliseconds, so `"12"` with
/// three digits means 120ms. Digits beyond `fraction_digits` are truncated.
pub fn parse_duration(text: &str, separator: &str, fraction_digits: usize) -> Result<TimeDelta> {
    if fraction_digits == 0 || fraction_digits > MAX_FRACTION_DIGITS {
        return Err(SubtitleError::InvalidFractionDigits {
            input: text.to_string(),
        });
    }

    let trimmed = text.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let (clock, milliseconds) = match body.rsplit_once(separator) {
        Some((clock, fraction)) if !separator.is_empty() => {
            let fraction = fraction.trim();
            if fraction.len() > MAX_FRACTION_DIGITS {
                return Err(SubtitleError::InvalidFractionDigits {
                    input: text.to_string(),
                });
            }
            let value = parse_component(fraction)?;
            (clock, scale_fraction(value, fraction.len(), fraction_digits))
        }
        _ => (body, 0),
    };

    let parts: Vec<&str> = clock.trim().split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [minutes, seconds] => (None, *minutes, *seconds),
        [hours, minutes, seconds] => (Some(*hours), *minutes, *seconds),
        _ => {
            return Err(SubtitleError::InvalidComponentCount {
                input: text.to_string(),
            })
        }
    };

    let seconds = parse_component(seconds)?;
    let minutes = parse_component(minutes)?;
    let hours = match hours {
        Some(hours) => parse_component(hours)?,
        None => 0,
    };

    let total_ms = hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + milliseconds;
    Ok(TimeDelta::milliseconds(if negative { -total_ms } else { total_ms }))
}

/// Formats a duration as `HH:MM:SS<separator>f`.
///
/// The fraction is floored to `fraction_digits` digits, never rounded.
/// Negative durations get a leading `-`.
pub fn format_duration(duration: TimeDelta, separator: &str, fraction_digits: usize) -> String {
    let digits = fraction_digits.clamp(1, MAX_FRACTION_DIGITS);
    let total_ms = duration.num_milliseconds();
    let sign = if total_ms < 0 { "-" } else { "" };
    let total_ms = total_ms.unsigned_abs();

    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let seconds = (total_ms % 60_000) / 1_000;
    let fraction = (total_ms % 1_000) / 10u64.pow((MAX_FRACTION_DIGITS - digits) as u32);

    format!(
        "{}{:02}:{:02}:{:02}{}{:0width$}",
        sign,
        hours,
        minutes,
        seconds,
        separator,
        fraction,
        width = digits
    )
}

fn parse_component(text: &str) -> Result<i64> {
    let trimmed = text.trim();
    // Unsigned: the only sign allowed is the leading one on the whole timestamp.
    // u32 keeps hours * 3_600_000 well inside i64
    trimmed
        .parse::<u32>()
        .map(i64::from)
        .map_err(|source| SubtitleError::InvalidNumber {
            value: trimmed.to_string(),
            source,
        })
}

/// Scales a fractional field of `len` digits read at `precision` digits to milliseconds
fn scale_fraction(value: i64, len: usize, precision: usize) -> i64 {
    let units = if len <= precision {
        value * 10i64.pow((precision - len) as u32)
    } else {
        value / 10i64.pow((len - precision) as u32)
    };
    units * 10i64.pow((MAX_FRACTION_DIGITS - precision) as u32)
}
