//! Bounded keypad digit buffer

use serde::Serialize;

use crate::{
    codec,
    error::{CountdownError, Result},
};

/// Maximum number of digits the keypad accepts (`HHMMSS`)
pub const MAX_DIGITS: usize = 6;

/// A single decimal digit pressed on the keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Digit(u8);

impl Digit {
    /// ASCII character of the digit
    pub fn as_char(self) -> char {
        char::from(b'0' + self.0)
    }
}

impl TryFrom<char> for Digit {
    type Error = CountdownError;

    fn try_from(c: char) -> Result<Self> {
        c.to_digit(10)
            .map(|d| Digit(d as u8))
            .ok_or(CountdownError::InvalidDigit(c))
    }
}

/// Raw digits entered so far, at most [`MAX_DIGITS`] long
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InputDigits(String);

impl InputDigits {
    /// Create an empty digit buffer
    pub fn new() -> Self {
        Self(String::new())
    }

    /// Append a digit; returns false when the buffer is already full
    pub fn push(&mut self, digit: Digit) -> bool {
        if self.is_full() {
            return false;
        }
        self.0.push(digit.as_char());
        true
    }

    /// Drop the last digit; returns false when the buffer is empty
    pub fn pop(&mut self) -> bool {
        self.0.pop().is_some()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.0.len() >= MAX_DIGITS
    }

    /// Duration the digits describe, in seconds
    pub fn total_seconds(&self) -> u64 {
        codec::parse_seconds(self)
    }

    /// The digits echoed as `HHh MMm SSs`
    pub fn to_clock(&self) -> String {
        codec::format_digits_as_clock(self)
    }
}

impl TryFrom<&str> for InputDigits {
    type Error = CountdownError;

    fn try_from(s: &str) -> Result<Self> {
        if s.len() > MAX_DIGITS {
            return Err(CountdownError::TooManyDigits {
                len: s.len(),
                max: MAX_DIGITS,
            });
        }
        let mut digits = InputDigits::new();
        for c in s.chars() {
            digits.push(Digit::try_from(c)?);
        }
        Ok(digits)
    }
}
