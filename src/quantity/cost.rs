use std::fmt::{Debug, Display, Formatter};

use crate::quantity::Quantity;

/// Money in the tariff currency.
///
/// Positive is spent, negative is earned.
pub type Cost = Quantity<0, 0, 1>;

impl Cost {
    pub const ONE_CENT: Self = Self(0.01);
}

impl Display for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

impl Debug for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}
