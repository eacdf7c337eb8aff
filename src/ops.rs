use std::{
    fmt::{Debug, Formatter},
    ops::Sub,
};

#[must_use]
#[derive(Copy, Clone, PartialEq)]
pub struct RangeInclusive<T: Copy> {
    pub min: T,
    pub max: T,
}

impl<T: Copy + Debug> Debug for RangeInclusive<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}..={:?}", self.min, self.max)
    }
}

impl<T: Copy> RangeInclusive<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: Copy + PartialOrd> RangeInclusive<T> {
    #[must_use]
    pub fn contains(self, other: T) -> bool {
        (self.min <= other) && (other <= self.max)
    }

    #[must_use]
    pub fn is_ordered(self) -> bool {
        self.min <= self.max
    }

    /// Bring the value into the range.
    #[must_use]
    pub fn clamp(self, value: T) -> T {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Distance from the value to the range, zero when the value is inside.
    #[must_use]
    pub fn excess(self, value: T) -> T
    where
        T: Sub<Output = T> + Default,
    {
        if value < self.min {
            self.min - value
        } else if value > self.max {
            value - self.max
        } else {
            T::default()
        }
    }
}

impl RangeInclusive<f64> {
    #[must_use]
    pub fn width(self) -> f64 {
        self.max - self.min
    }

    #[must_use]
    pub fn midpoint(self) -> f64 {
        0.5 * (self.min + self.max)
    }
}
