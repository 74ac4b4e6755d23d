//! Nanosecond durations as they travel through Nomad's JSON.

use std::fmt;

use facet::Facet;
use serde::{Deserialize, Deserializer};

const NANOSECOND: u64 = 1;
const MICROSECOND: u64 = 1_000 * NANOSECOND;
const MILLISECOND: u64 = 1_000 * MICROSECOND;
const SECOND: u64 = 1_000 * MILLISECOND;

/// A signed span of time counted in nanoseconds.
///
/// Renders the way Nomad's job specification expects duration strings:
/// `72h0m0s`, `1m30s`, `1.5s`, `500ms`, `0s`.
#[derive(Facet, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration {
    nanos: i64,
}

impl Duration {
    /// The empty duration.
    pub const ZERO: Duration = Duration { nanos: 0 };

    /// Creates a duration from a nanosecond count.
    pub const fn from_nanos(nanos: i64) -> Self {
        Self { nanos }
    }

    /// Creates a duration from whole milliseconds.
    pub const fn from_millis(millis: i64) -> Self {
        Self::from_nanos(millis * MILLISECOND as i64)
    }

    /// Creates a duration from whole seconds.
    pub const fn from_secs(secs: i64) -> Self {
        Self::from_nanos(secs * SECOND as i64)
    }

    /// Creates a duration from whole minutes.
    pub const fn from_mins(mins: i64) -> Self {
        Self::from_secs(mins * 60)
    }

    /// Creates a duration from whole hours.
    pub const fn from_hours(hours: i64) -> Self {
        Self::from_mins(hours * 60)
    }

    /// The nanosecond count.
    pub const fn as_nanos(&self) -> i64 {
        self.nanos
    }

    /// Whether this is the empty duration.
    pub const fn is_zero(&self) -> bool {
        self.nanos == 0
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.nanos < 0 { "-" } else { "" };
        let u = self.nanos.unsigned_abs();

        if u == 0 {
            return f.write_str("0s");
        }

        if u < SECOND {
            let (unit, precision) = if u < MICROSECOND {
                ("ns", 0)
            } else if u < MILLISECOND {
                ("µs", 3)
            } else {
                ("ms", 6)
            };
            let (whole, frac) = split_fraction(u, precision);
            return write!(f, "{sign}{whole}{frac}{unit}");
        }

        let (secs, frac) = split_fraction(u, 9);
        let mut out = format!("{}{frac}s", secs % 60);
        let mins = secs / 60;
        if mins > 0 {
            out = format!("{}m{out}", mins % 60);
            let hours = mins / 60;
            if hours > 0 {
                out = format!("{hours}h{out}");
            }
        }
        write!(f, "{sign}{out}")
    }
}

/// Splits `v / 10^precision` into its integer part and a `.digits` suffix
/// with trailing zeros dropped (empty when the fraction is zero).
fn split_fraction(mut v: u64, precision: u32) -> (u64, String) {
    let mut digits = Vec::with_capacity(precision as usize);
    let mut significant = false;
    for _ in 0..precision {
        let digit = (v % 10) as u8;
        significant = significant || digit != 0;
        if significant {
            digits.push(char::from(b'0' + digit));
        }
        v /= 10;
    }

    if digits.is_empty() {
        return (v, String::new());
    }

    let mut frac = String::with_capacity(digits.len() + 1);
    frac.push('.');
    frac.extend(digits.iter().rev());
    (v, frac)
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        i64::deserialize(deserializer).map(Duration::from_nanos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_units() {
        assert_eq!(Duration::ZERO.to_string(), "0s");
        assert_eq!(Duration::from_secs(10).to_string(), "10s");
        assert_eq!(Duration::from_mins(10).to_string(), "10m0s");
        assert_eq!(Duration::from_secs(90).to_string(), "1m30s");
        assert_eq!(Duration::from_hours(72).to_string(), "72h0m0s");
        assert_eq!(Duration::from_hours(1).to_string(), "1h0m0s");
    }

    #[test]
    fn fractions_drop_trailing_zeros() {
        assert_eq!(Duration::from_millis(1500).to_string(), "1.5s");
        assert_eq!(Duration::from_millis(500).to_string(), "500ms");
        assert_eq!(Duration::from_nanos(1_500).to_string(), "1.5µs");
        assert_eq!(Duration::from_nanos(100).to_string(), "100ns");
        assert_eq!(Duration::from_nanos(61_000_000_001).to_string(), "1m1.000000001s");
    }

    #[test]
    fn negative_durations_keep_their_sign() {
        assert_eq!(Duration::from_secs(-5).to_string(), "-5s");
        assert_eq!(Duration::from_millis(-250).to_string(), "-250ms");
    }

    #[test]
    fn decodes_from_nanosecond_integers() {
        let d: Duration = serde_json::from_str("10000000000").unwrap();
        assert_eq!(d, Duration::from_secs(10));
    }
}
