//! Conversions between keypad digits, total seconds and the clock display
//!
//! Digits are read as `HHMMSS` after left-padding with zeros to six
//! characters. Minute and second fields are never clamped to 59: `"0199"`
//! displays as `00h 01m 99s` and counts as 159 seconds.

use crate::state::InputDigits;

/// Width of the `HHMMSS` field layout
const FIELD_WIDTH: usize = 6;

/// Split padded digits into raw hour, minute and second fields
fn fields(digits: &InputDigits) -> (String, String, String) {
    let padded = format!("{:0>width$}", digits.as_str(), width = FIELD_WIDTH);
    (
        padded[0..2].to_string(),
        padded[2..4].to_string(),
        padded[4..6].to_string(),
    )
}

/// Read a field known to hold only ASCII digits
fn field_value(field: &str) -> u64 {
    field
        .bytes()
        .fold(0, |acc, b| acc * 10 + u64::from(b - b'0'))
}

/// Total seconds represented by the digits: `hh*3600 + mm*60 + ss`
pub fn parse_seconds(digits: &InputDigits) -> u64 {
    let (hours, minutes, seconds) = fields(digits);
    field_value(&hours) * 3600 + field_value(&minutes) * 60 + field_value(&seconds)
}

/// Echo the digits as `HHh MMm SSs` without any arithmetic
pub fn format_digits_as_clock(digits: &InputDigits) -> String {
    let (hours, minutes, seconds) = fields(digits);
    format!("{}h {}m {}s", hours, minutes, seconds)
}

/// Render a second count as `HHh MMm SSs`
pub fn format_seconds_as_clock(total: u64) -> String {
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{:02}h {:02}m {:02}s", hours, minutes, seconds)
}
