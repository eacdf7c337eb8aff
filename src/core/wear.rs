//! Nonlinear wear cost of operating a resource away from its comfortable midpoint.

use serde::{Deserialize, Serialize};

use crate::{ops::RangeInclusive, prelude::*};

/// Shape of a wear cost curve.
///
/// Inside the [`Domain`] the curve is a quadratic bowl with the minimum at the midpoint.
/// Beyond the domain bounds, an exponential tail takes over and grows without bound.
#[must_use]
#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WearCurve {
    /// Average cost per unit moved, over a uniform sweep of the domain.
    pub cost_average: f64,

    /// Share of the bowl which does not depend on the operating point, `0..=1`.
    pub constant_coefficient: f64,

    /// Weight of the out-of-range exponential tail.
    pub exponential_coefficient: f64,

    /// Length scale of the exponential tail, in the domain units.
    pub activation: f64,
}

/// Comfortable operating range of a resource.
pub type Domain = RangeInclusive<f64>;

impl WearCurve {
    /// Scaling factor which makes the mean of the curve over the domain equal to [`Self::cost_average`].
    ///
    /// The mean of the quadratic bowl over `-0.5..=0.5` is `c + (1 - c) / 12`, and the exponential tail
    /// inside the domain contributes approximately `2 × e × activation / width`.
    #[must_use]
    pub fn normalization_coefficient(&self, domain: Domain) -> f64 {
        12.0 / (1.0
            + 11.0 * self.constant_coefficient
            + 24.0 * self.exponential_coefficient * self.activation / domain.width())
    }

    /// Wear cost per unit moved at the operating point `x`.
    ///
    /// Both exponent branches give `-width / (2 × activation)` at the midpoint, so the curve is continuous
    /// there. The derivative of the tail switches sign at the midpoint, which leaves a kink.
    #[must_use]
    pub fn cost_rate(&self, x: f64, domain: Domain, normalization_coefficient: f64) -> f64 {
        let offset = (x - domain.midpoint()) / domain.width();
        let constant = self.constant_coefficient;
        let quadratic = (1.0 - self.constant_coefficient) * offset * offset;
        let exponent = if offset < 0.0 {
            (domain.min - x) / self.activation
        } else {
            (x - domain.max) / self.activation
        };
        let exponential = self.exponential_coefficient * exponent.exp();
        normalization_coefficient * self.cost_average * (constant + quadratic + exponential)
    }

    /// Attach the curve to the domain and cache the normalization coefficient.
    pub fn bind(self, domain: Domain) -> Result<BoundWearCurve> {
        ensure!(
            domain.min.is_finite() && domain.max.is_finite(),
            "wear domain bounds must be finite, got {}..={}",
            domain.min,
            domain.max,
        );
        ensure!(
            domain.width() > 0.0,
            "wear domain must not be degenerate, got {}..={}",
            domain.min,
            domain.max,
        );
        ensure!(
            self.activation.is_finite() && self.activation > 0.0,
            "wear activation must be positive, got {}",
            self.activation,
        );
        ensure!(
            self.cost_average.is_finite()
                && self.constant_coefficient.is_finite()
                && self.exponential_coefficient.is_finite(),
            "wear coefficients must be finite: {self:?}",
        );
        let normalization_coefficient = self.normalization_coefficient(domain);
        ensure!(
            normalization_coefficient.is_finite(),
            "wear curve cannot be normalized: {self:?} over {domain:?}",
        );
        Ok(BoundWearCurve { curve: self, domain, normalization_coefficient })
    }
}

/// Wear curve attached to its domain with the pre-computed normalization.
#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct BoundWearCurve {
    curve: WearCurve,
    domain: Domain,
    normalization_coefficient: f64,
}

impl BoundWearCurve {
    #[must_use]
    pub fn cost_rate(&self, x: f64) -> f64 {
        self.curve.cost_rate(x, self.domain, self.normalization_coefficient)
    }

    pub const fn domain(&self) -> Domain {
        self.domain
    }

    #[must_use]
    pub const fn normalization_coefficient(&self) -> f64 {
        self.normalization_coefficient
    }
}
