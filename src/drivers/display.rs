//! What the counter shows, independent of the panel that shows it

use crate::config::{MAX_COUNT, MAX_DISPLAY_CM};
use crate::error::Error;

pub const COUNT_LABEL: &str = "Count: ";
pub const DISTANCE_LABEL: &str = "Distance(cm): ";
pub const TRIGGER_LABEL: &str = "Trig Dist: ";

/// Columns reserved for the count, `99,999` at most
pub const COUNT_WIDTH: usize = 6;
/// Columns reserved for a distance, `999` at most
pub const DISTANCE_WIDTH: usize = 3;

pub trait DisplaySink {
    /// Static text that never changes after boot
    fn show_labels(&mut self) -> Result<(), Error>;
    fn show_count(&mut self, count: u32) -> Result<(), Error>;
    fn show_distance(&mut self, cm: u16) -> Result<(), Error>;
    fn show_trigger_distance(&mut self, cm: u16) -> Result<(), Error>;
}

/// Count, left aligned and space padded, with a thousands separator from 1,000 up
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CountField(pub u32);

impl CountField {
    pub fn text(&self) -> [u8; COUNT_WIDTH] {
        let mut digits = [0u8; 5];
        let mut n = self.0.min(MAX_COUNT);
        let mut len = 0;
        loop {
            digits[len] = b'0' + (n % 10) as u8;
            n /= 10;
            len += 1;
            if n == 0 {
                break;
            }
        }

        let mut out = [b' '; COUNT_WIDTH];
        let mut pos = 0;
        for idx in (0..len).rev() {
            out[pos] = digits[idx];
            pos += 1;
            if idx == 3 {
                out[pos] = b',';
                pos += 1;
            }
        }
        out
    }
}

/// Distance, right aligned in three columns
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DistanceField(pub u16);

impl DistanceField {
    pub fn text(&self) -> [u8; DISTANCE_WIDTH] {
        let mut out = [b' '; DISTANCE_WIDTH];
        let mut n = self.0.min(MAX_DISPLAY_CM);
        let mut pos = DISTANCE_WIDTH;
        loop {
            pos -= 1;
            out[pos] = b'0' + (n % 10) as u8;
            n /= 10;
            if n == 0 {
                break;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(value: u32) -> String {
        String::from_utf8(CountField(value).text().to_vec()).unwrap()
    }

    fn distance(value: u16) -> String {
        String::from_utf8(DistanceField(value).text().to_vec()).unwrap()
    }

    #[test]
    fn count_digit_grouping() {
        let cases = [
            (0, "0     "),
            (9, "9     "),
            (10, "10    "),
            (99, "99    "),
            (100, "100   "),
            (999, "999   "),
            (1000, "1,000 "),
            (9999, "9,999 "),
            (10000, "10,000"),
            (99999, "99,999"),
        ];
        for (value, expected) in cases {
            assert_eq!(count(value), expected, "count {}", value);
        }
    }

    #[test]
    fn count_clamps_to_five_digits() {
        assert_eq!(count(123_456), "99,999");
    }

    #[test]
    fn distance_is_right_aligned() {
        assert_eq!(distance(0), "  0");
        assert_eq!(distance(7), "  7");
        assert_eq!(distance(42), " 42");
        assert_eq!(distance(105), "105");
        assert_eq!(distance(4000), "999");
    }
}
