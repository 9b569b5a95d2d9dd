//! Exact resource quantities.
//!
//! A [`Quantity`] is a nonnegative amount of cpu, memory or accelerator
//! capacity, stored as an exact count of milli-units in an `i64`. The
//! textual grammar is shared between workload requests and node capacity
//! strings: a decimal number followed by an optional SI-milli suffix (`m`)
//! or one of the binary memory suffixes (`Ki`, `Mi`, `Gi`, `Ti`). A bare
//! number is a unit-less whole amount.
//!
//! Comparison and addition happen on the normalized milli scale, so
//! `1024Mi` and `1Gi` are equal and no floating point is involved.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors produced while parsing a quantity string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuantityError {
    #[error("invalid quantity {0:?}")]
    Invalid(String),

    #[error("negative quantity {0:?}")]
    Negative(String),

    #[error("quantity {0:?} is out of range")]
    OutOfRange(String),

    #[error("quantity {0:?} is finer than milli precision")]
    TooPrecise(String),
}

/// Milli-unit multipliers for each recognized suffix.
const KIB: i128 = 1024;
const SUFFIXES: &[(&str, i128)] = &[
    ("m", 1),
    ("Ki", KIB * 1000),
    ("Mi", KIB * KIB * 1000),
    ("Gi", KIB * KIB * KIB * 1000),
    ("Ti", KIB * KIB * KIB * KIB * 1000),
];

/// An exact nonnegative resource amount on a fixed milli scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity {
    millis: i64,
}

impl Quantity {
    /// A zero amount.
    pub const ZERO: Quantity = Quantity { millis: 0 };

    /// A whole, unit-less amount (e.g. 2 cores, 5 accelerators).
    pub fn from_whole(value: i64) -> Quantity {
        Quantity {
            millis: value.saturating_mul(1000),
        }
    }

    /// An amount expressed directly in milli-units.
    pub fn from_millis(millis: i64) -> Quantity {
        Quantity { millis }
    }

    /// A whole number of GiB.
    pub fn gibi(value: i64) -> Quantity {
        Quantity {
            millis: value.saturating_mul(KIB as i64 * KIB as i64 * KIB as i64 * 1000),
        }
    }

    pub fn millis(&self) -> i64 {
        self.millis
    }

    pub fn is_zero(&self) -> bool {
        self.millis == 0
    }

    /// Saturating sum, used when accumulating requests on a node.
    pub fn saturating_add(self, other: Quantity) -> Quantity {
        Quantity {
            millis: self.millis.saturating_add(other.millis),
        }
    }

    /// Saturating difference, clamped at zero.
    pub fn saturating_sub(self, other: Quantity) -> Quantity {
        Quantity {
            millis: self.millis.saturating_sub(other.millis).max(0),
        }
    }

    /// The fraction `self / total` as an `f64`, for scoring only.
    /// Returns `None` when `total` is zero.
    pub fn fraction_of(&self, total: Quantity) -> Option<f64> {
        if total.millis == 0 {
            return None;
        }
        Some(self.millis as f64 / total.millis as f64)
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(QuantityError::Invalid(s.to_string()));
        }
        if s.starts_with('-') {
            return Err(QuantityError::Negative(s.to_string()));
        }

        // Split the mantissa (digits and at most one dot) from the suffix.
        let split = s
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .unwrap_or(s.len());
        let (mantissa, suffix) = s.split_at(split);

        let scale = if suffix.is_empty() {
            1000
        } else {
            SUFFIXES
                .iter()
                .find(|(name, _)| *name == suffix)
                .map(|(_, scale)| *scale)
                .ok_or_else(|| QuantityError::Invalid(s.to_string()))?
        };

        let (int_part, frac_part) = match mantissa.split_once('.') {
            Some((i, f)) => (i, f),
            None => (mantissa, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(QuantityError::Invalid(s.to_string()));
        }
        if frac_part.contains('.') {
            return Err(QuantityError::Invalid(s.to_string()));
        }

        let int_val: i128 = if int_part.is_empty() {
            0
        } else {
            int_part
                .parse()
                .map_err(|_| QuantityError::Invalid(s.to_string()))?
        };

        let mut millis = int_val
            .checked_mul(scale)
            .ok_or_else(|| QuantityError::OutOfRange(s.to_string()))?;

        if !frac_part.is_empty() {
            let frac_val: i128 = frac_part
                .parse()
                .map_err(|_| QuantityError::Invalid(s.to_string()))?;
            let denom = 10i128
                .checked_pow(frac_part.len() as u32)
                .ok_or_else(|| QuantityError::TooPrecise(s.to_string()))?;
            let scaled = frac_val
                .checked_mul(scale)
                .ok_or_else(|| QuantityError::OutOfRange(s.to_string()))?;
            if scaled % denom != 0 {
                return Err(QuantityError::TooPrecise(s.to_string()));
            }
            millis = millis
                .checked_add(scaled / denom)
                .ok_or_else(|| QuantityError::OutOfRange(s.to_string()))?;
        }

        i64::try_from(millis)
            .map(Quantity::from_millis)
            .map_err(|_| QuantityError::OutOfRange(s.to_string()))
    }
}

impl fmt::Display for Quantity {
    /// Canonical shortest rendering: whole number when integral, the
    /// largest evenly-dividing binary suffix when one applies, otherwise
    /// the milli form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.millis == 0 {
            return write!(f, "0");
        }
        if self.millis % 1000 != 0 {
            return write!(f, "{}m", self.millis);
        }
        let whole = self.millis / 1000;
        for (name, scale) in SUFFIXES.iter().rev() {
            let per_unit = (scale / 1000) as i64;
            if per_unit > 1 && whole % per_unit == 0 {
                return write!(f, "{}{}", whole / per_unit, name);
            }
        }
        write!(f, "{whole}")
    }
}
