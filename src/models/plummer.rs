//! Plummer sphere
//!
//! Density and enclosed mass of a Plummer model with total mass `M` and
//! softening (scale) length `a`:
//!
//! ```text
//! ρ(r)   = 3M / (4π a³) · (1 + r²/a²)^(-5/2)
//! M(<r)  = M r³ / (r² + a²)^(3/2)
//! ```

use std::f64::consts::PI;

use super::ModelError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlummerModel {
    /// Softening length `a`
    pub softening: f64,

    /// Total mass `M`
    pub total_mass: f64,
}

impl PlummerModel {
    /// # Errors
    ///
    /// `InvalidParameter` unless both parameters are finite and positive.
    pub fn new(softening: f64, total_mass: f64) -> Result<Self, ModelError> {
        if !(softening.is_finite() && softening > 0.0) {
            return Err(ModelError::InvalidParameter { name: "softening", value: softening });
        }
        if !(total_mass.is_finite() && total_mass > 0.0) {
            return Err(ModelError::InvalidParameter { name: "total_mass", value: total_mass });
        }
        Ok(Self { softening, total_mass })
    }

    /// Central density `ρ(0)`
    pub fn central_density(&self) -> f64 {
        3.0 * self.total_mass / (4.0 * PI * self.softening.powi(3))
    }

    pub fn density(&self, r: f64) -> f64 {
        let x2 = (r / self.softening).powi(2);
        self.central_density() * (1.0 + x2).powf(-2.5)
    }

    /// Mass inside radius `r`
    pub fn enclosed_mass(&self, r: f64) -> f64 {
        let r2 = r * r;
        self.total_mass * r2 * r / (r2 + self.softening * self.softening).powf(1.5)
    }

    /// Radius enclosing the mass fraction `q` (0 < q < 1)
    ///
    /// Inverse of [`enclosed_mass`](Self::enclosed_mass); used to build
    /// particle realisations with a known profile.
    pub fn radius_of_mass_fraction(&self, q: f64) -> f64 {
        self.softening / (q.powf(-2.0 / 3.0) - 1.0).sqrt()
    }

    /// `(r, ρ(r))` for every radius
    pub fn sample(&self, radii: &[f64]) -> Vec<(f64, f64)> {
        radii.iter().map(|&r| (r, self.density(r))).collect()
    }
}

// =================================================================================================
// Tests
// =================================================================================================
