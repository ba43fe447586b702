use anyhow::anyhow;
use derive_more::Display;
use std::fmt::{Debug, Display};

/// A type of value that we can create ranges of, where a range has a min and
/// max.
pub trait Rangeable: Copy + Debug + Display + PartialOrd {}

impl Rangeable for f64 {}

/// A range between two numeric values, inclusive on both ends.
#[derive(Copy, Clone, Debug, Display, PartialEq)]
#[display(fmt = "[{}, {}]", min, max)]
pub struct NumRange<T: Rangeable> {
    pub min: T,
    pub max: T,
}

impl<T: Rangeable> NumRange<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// Create a [RangeValue] in this range, which is convenient for chaining
    /// operations on a single value.
    pub fn value(self, value: T) -> RangeValue<T> {
        RangeValue { value, range: self }
    }

    /// Check if a value is in this range. Ranges are inclusive on both ends.
    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }

    /// Checks if the value is in this range. If it isn't, return an error.
    pub fn ensure_contains(&self, value: T) -> anyhow::Result<()> {
        if self.contains(value) {
            Ok(())
        } else {
            Err(anyhow!("value {} is not in range {}", value, self))
        }
    }

    /// Force a value into this range. If it's outside the range, return the
    /// bound (lower or upper) that's closest to the value.
    pub fn clamp(&self, value: T) -> T {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }
}

/// An alternative interface for [NumRange] that makes it easy to chain
/// operations on a single value.
///
/// ```
/// use biomap::NumRange;
///
/// let range: NumRange<f64> = NumRange::new(0.1, 1.0);
/// let value = range.value(0.5).apply(|x| x * 4.0).clamp().inner();
/// assert_eq!(value, 1.0);
/// ```
#[derive(Copy, Clone, Debug)]
pub struct RangeValue<T: Rangeable> {
    value: T,
    range: NumRange<T>,
}

impl<T: Rangeable> RangeValue<T> {
    /// Get the value from this struct
    pub fn inner(self) -> T {
        self.value
    }

    /// Force the value into this range. If it falls outside the range, it
    /// will be set to the nearer of the two bounds.
    pub fn clamp(self) -> Self {
        Self {
            value: self.range.clamp(self.value),
            range: self.range,
        }
    }

    /// Apply the given mapping function to this value. The value will be
    /// replaced with the output of the function.
    pub fn apply(self, f: impl FnOnce(T) -> T) -> Self {
        Self {
            value: f(self.value),
            range: self.range,
        }
    }
}
