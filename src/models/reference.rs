//! Tabulated reference solutions
//!
//! The Strömgren comparisons plot the simulated neutral fraction, species
//! abundances and temperature against the TT1D one-dimensional
//! radiative-transfer result. The reference is read from a CSV table:
//!
//! ```csv
//! quantity,radius,value
//! neutral_fraction,0.0,1.2e-5
//! neutral_fraction,0.05,3.4e-5
//! temperature,0.0,2.1e4
//! HeII,0.0,0.9
//! ```
//!
//! Quantities are `neutral_fraction` (or `xHI`), `temperature` (or `T`) and
//! the species names `HI`, `HII`, `HeI`, `HeII`, `HeIII`. Rows of a quantity
//! may appear in any order; each curve is sorted by radius.

use std::path::Path;

use serde::Deserialize;

use super::{ModelError, Species};

/// A reference curve `value(radius)`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReferenceCurve {
    pub radii: Vec<f64>,
    pub values: Vec<f64>,
}

impl ReferenceCurve {
    pub fn len(&self) -> usize {
        self.radii.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.radii.iter().copied().zip(self.values.iter().copied())
    }

    fn push(&mut self, radius: f64, value: f64) {
        self.radii.push(radius);
        self.values.push(value);
    }

    fn sort(&mut self) {
        let mut pairs: Vec<(f64, f64)> = self.points().collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        (self.radii, self.values) = pairs.into_iter().unzip();
    }
}

/// One reference curve per [`Species`], abundance `n_s / n_H` against radius
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpeciesCurves {
    pub hi: ReferenceCurve,
    pub hii: ReferenceCurve,
    pub hei: ReferenceCurve,
    pub heii: ReferenceCurve,
    pub heiii: ReferenceCurve,
}

impl SpeciesCurves {
    pub fn curve(&self, species: Species) -> &ReferenceCurve {
        match species {
            Species::HI => &self.hi,
            Species::HII => &self.hii,
            Species::HeI => &self.hei,
            Species::HeII => &self.heii,
            Species::HeIII => &self.heiii,
        }
    }

    fn curve_mut(&mut self, species: Species) -> &mut ReferenceCurve {
        match species {
            Species::HI => &mut self.hi,
            Species::HII => &mut self.hii,
            Species::HeI => &mut self.hei,
            Species::HeII => &mut self.heii,
            Species::HeIII => &mut self.heiii,
        }
    }
}

/// TT1D neutral fraction, species and temperature profiles
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReferenceSolution {
    pub neutral_fraction: ReferenceCurve,
    pub temperature: ReferenceCurve,
    pub species: SpeciesCurves,
}

#[derive(Debug, Deserialize)]
struct ReferenceRow {
    quantity: String,
    radius: f64,
    value: f64,
}

impl ReferenceSolution {
    /// Read a reference table from `path`
    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        let file = std::fs::File::open(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Read a reference table from any reader
    ///
    /// # Errors
    ///
    /// - malformed CSV or non-numeric cells
    /// - an unknown `quantity`
    /// - a non-finite radius or value
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, ModelError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);

        let mut solution = Self::default();
        for (index, row) in csv_reader.deserialize::<ReferenceRow>().enumerate() {
            let row = row?;
            if !row.radius.is_finite() || !row.value.is_finite() {
                return Err(ModelError::InvalidReference {
                    row: index,
                    reason: "radius and value must be finite".to_string(),
                });
            }

            let curve = match row.quantity.as_str() {
                "neutral_fraction" | "xHI" => &mut solution.neutral_fraction,
                "temperature" | "T" => &mut solution.temperature,
                other => match Species::ALL.into_iter().find(|s| s.label() == other) {
                    Some(species) => solution.species.curve_mut(species),
                    None => {
                        return Err(ModelError::InvalidReference {
                            row: index,
                            reason: format!("unknown quantity '{other}'"),
                        })
                    }
                },
            };
            curve.push(row.radius, row.value);
        }

        solution.neutral_fraction.sort();
        solution.temperature.sort();
        for species in Species::ALL {
            solution.species.curve_mut(species).sort();
        }
        Ok(solution)
    }
}

// =================================================================================================
// Tests
// =================================================================================================
