//! Snapshot data types
//!
//! A [`Snapshot`] is what a reader hands back: metadata plus one
//! [`ParticleSet`] per particle family present in the file. Everything is read
//! once and never mutated afterwards.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use super::error::SnapshotError;

/// Seconds per year (Julian)
const YEAR_IN_S: f64 = 3.15576e7;

// =================================================================================================
// Particle families
// =================================================================================================

/// Particle family, following the `PartTypeN` numbering of SWIFT/Gadget files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    /// `PartType0`
    Gas,

    /// `PartType1`
    DarkMatter,

    /// `PartType4`
    Stars,
}

impl ParticleKind {
    /// Parse a family name as written in CSV snapshots
    ///
    /// Accepts `gas`, `dark_matter`/`dm`, `stars`/`star` and the
    /// `PartType0`/`PartType1`/`PartType4` group names.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "gas" | "parttype0" => Some(Self::Gas),
            "dark_matter" | "dm" | "parttype1" => Some(Self::DarkMatter),
            "stars" | "star" | "parttype4" => Some(Self::Stars),
            _ => None,
        }
    }

    /// HDF5 group holding this family
    pub fn group_name(&self) -> &'static str {
        match self {
            Self::Gas => "PartType0",
            Self::DarkMatter => "PartType1",
            Self::Stars => "PartType4",
        }
    }
}

// =================================================================================================
// Ionization data
// =================================================================================================

/// One value per particle for each hydrogen/helium ionization state
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesFields {
    pub hi: Array1<f64>,
    pub hii: Array1<f64>,
    pub hei: Array1<f64>,
    pub heii: Array1<f64>,
    pub heiii: Array1<f64>,
}

impl SpeciesFields {
    pub fn len(&self) -> usize {
        self.hi.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hi.is_empty()
    }

    fn check_len(&self, expected: usize, field: &'static str) -> Result<(), SnapshotError> {
        for array in [&self.hi, &self.hii, &self.hei, &self.heii, &self.heiii] {
            check_field_len(field, array.len(), expected)?;
        }
        Ok(())
    }
}

/// Ionization state as stored by the radiative-transfer scheme
#[derive(Debug, Clone, PartialEq)]
pub enum IonizationData {
    /// Ion mass fractions stored directly
    IonMassFractions(SpeciesFields),

    /// Element mass fractions plus species abundances `n_i / n_H`
    ElementAbundances {
        hydrogen_mass_fraction: Array1<f64>,
        helium_mass_fraction: Array1<f64>,
        electron_abundance: Option<Array1<f64>>,
        abundances: SpeciesFields,
    },
}

impl IonizationData {
    fn check_len(&self, expected: usize) -> Result<(), SnapshotError> {
        match self {
            Self::IonMassFractions(fields) => fields.check_len(expected, "ion mass fractions"),
            Self::ElementAbundances {
                hydrogen_mass_fraction,
                helium_mass_fraction,
                electron_abundance,
                abundances,
            } => {
                check_field_len("hydrogen mass fraction", hydrogen_mass_fraction.len(), expected)?;
                check_field_len("helium mass fraction", helium_mass_fraction.len(), expected)?;
                if let Some(electrons) = electron_abundance {
                    check_field_len("electron abundance", electrons.len(), expected)?;
                }
                abundances.check_len(expected, "species abundances")
            }
        }
    }
}

fn check_field_len(field: &'static str, actual: usize, expected: usize) -> Result<(), SnapshotError> {
    if actual != expected {
        return Err(SnapshotError::FieldLength { field, actual, expected });
    }
    Ok(())
}

// =================================================================================================
// Particle set
// =================================================================================================

/// Positions and per-particle fields of one particle family
///
/// Positions are an `N × D` array with `D` = 2 or 3. Every field has length
/// `N`; this is checked when the set is built.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSet {
    kind: ParticleKind,
    positions: Array2<f64>,
    masses: Array1<f64>,
    internal_energies: Option<Array1<f64>>,
    ionization: Option<IonizationData>,
}

impl ParticleSet {
    /// Create a set from positions and masses
    ///
    /// # Errors
    ///
    /// - positions that are neither 2-D nor 3-D
    /// - a mass array whose length differs from the number of positions
    pub fn new(
        kind: ParticleKind,
        positions: Array2<f64>,
        masses: Array1<f64>,
    ) -> Result<Self, SnapshotError> {
        let dimension = positions.ncols();
        if dimension != 2 && dimension != 3 {
            return Err(SnapshotError::Dimension(dimension));
        }
        check_field_len("masses", masses.len(), positions.nrows())?;

        Ok(Self {
            kind,
            positions,
            masses,
            internal_energies: None,
            ionization: None,
        })
    }

    /// Attach specific internal energies (internal units)
    pub fn with_internal_energies(mut self, energies: Array1<f64>) -> Result<Self, SnapshotError> {
        check_field_len("internal energies", energies.len(), self.len())?;
        self.internal_energies = Some(energies);
        Ok(self)
    }

    /// Attach ionization state
    pub fn with_ionization(mut self, ionization: IonizationData) -> Result<Self, SnapshotError> {
        ionization.check_len(self.len())?;
        self.ionization = Some(ionization);
        Ok(self)
    }

    pub fn kind(&self) -> ParticleKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.positions.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.nrows() == 0
    }

    /// Spatial dimension (2 or 3)
    pub fn dimension(&self) -> usize {
        self.positions.ncols()
    }

    pub fn positions(&self) -> ArrayView2<'_, f64> {
        self.positions.view()
    }

    /// Position of particle `index`
    pub fn position(&self, index: usize) -> Option<Vec<f64>> {
        (index < self.len()).then(|| self.positions.row(index).to_vec())
    }

    pub fn masses(&self) -> ArrayView1<'_, f64> {
        self.masses.view()
    }

    pub fn internal_energies(&self) -> Option<ArrayView1<'_, f64>> {
        self.internal_energies.as_ref().map(|e| e.view())
    }

    pub fn ionization(&self) -> Option<&IonizationData> {
        self.ionization.as_ref()
    }
}

// =================================================================================================
// Metadata
// =================================================================================================

/// Internal unit system, expressed in cgs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitSystem {
    pub length_cgs: f64,
    pub mass_cgs: f64,
    pub time_cgs: f64,
}

impl Default for UnitSystem {
    /// kpc, 10¹⁰ M☉ and kpc / (km/s), the usual galactic units
    fn default() -> Self {
        Self {
            length_cgs: 3.085678e21,
            mass_cgs: 1.98848e43,
            time_cgs: 3.085678e16,
        }
    }
}

impl UnitSystem {
    pub fn cgs() -> Self {
        Self {
            length_cgs: 1.0,
            mass_cgs: 1.0,
            time_cgs: 1.0,
        }
    }

    /// Factor converting a specific energy (velocity²) to erg/g
    pub fn specific_energy_cgs(&self) -> f64 {
        let velocity = self.length_cgs / self.time_cgs;
        velocity * velocity
    }

    /// Short name of the length unit, or `"U_L"` when it is not a common one
    pub fn length_label(&self) -> &'static str {
        const KNOWN: [(f64, &str); 6] = [
            (1.0, "cm"),
            (1.0e5, "km"),
            (3.085678e18, "pc"),
            (3.085678e21, "kpc"),
            (3.085678e24, "Mpc"),
            (1.495978707e13, "AU"),
        ];

        KNOWN
            .iter()
            .find(|(cgs, _)| ((self.length_cgs - cgs) / cgs).abs() < 1e-3)
            .map(|(_, name)| *name)
            .unwrap_or("U_L")
    }
}

/// Scalar metadata of a snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotMetadata {
    /// Simulation time (internal units)
    pub time: f64,

    pub units: UnitSystem,

    /// Box size per axis (internal units); empty when unknown
    pub boxsize: Vec<f64>,

    /// Radiative-transfer scheme name, e.g. `"SPH M1closure"`
    pub rt_scheme: Option<String>,

    /// Adiabatic index γ of the hydro scheme
    pub adiabatic_index: Option<f64>,
}

impl Default for SnapshotMetadata {
    fn default() -> Self {
        Self {
            time: 0.0,
            units: UnitSystem::default(),
            boxsize: Vec::new(),
            rt_scheme: None,
            adiabatic_index: None,
        }
    }
}

impl SnapshotMetadata {
    pub fn time_seconds(&self) -> f64 {
        self.time * self.units.time_cgs
    }

    pub fn time_myr(&self) -> f64 {
        self.time_seconds() / (1.0e6 * YEAR_IN_S)
    }

    pub fn time_gyr(&self) -> f64 {
        self.time_seconds() / (1.0e9 * YEAR_IN_S)
    }
}

// =================================================================================================
// Snapshot
// =================================================================================================

/// One saved simulation state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub metadata: SnapshotMetadata,
    pub gas: Option<ParticleSet>,
    pub dark_matter: Option<ParticleSet>,
    pub stars: Option<ParticleSet>,
}

impl Snapshot {
    pub fn particles(&self, kind: ParticleKind) -> Option<&ParticleSet> {
        match kind {
            ParticleKind::Gas => self.gas.as_ref(),
            ParticleKind::DarkMatter => self.dark_matter.as_ref(),
            ParticleKind::Stars => self.stars.as_ref(),
        }
    }

    /// Like [`particles`](Self::particles), but a missing family is an error
    pub fn require(&self, kind: ParticleKind) -> Result<&ParticleSet, SnapshotError> {
        self.particles(kind)
            .ok_or(SnapshotError::MissingParticles(kind))
    }

    pub(crate) fn insert(&mut self, set: ParticleSet) {
        match set.kind() {
            ParticleKind::Gas => self.gas = Some(set),
            ParticleKind::DarkMatter => self.dark_matter = Some(set),
            ParticleKind::Stars => self.stars = Some(set),
        }
    }

    /// The massive, collisionless family used for gravity profiles
    ///
    /// Dark matter when present, gas otherwise.
    pub fn gravity_particles(&self) -> Result<&ParticleSet, SnapshotError> {
        self.dark_matter
            .as_ref()
            .or(self.gas.as_ref())
            .ok_or(SnapshotError::MissingParticles(ParticleKind::DarkMatter))
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, Array2};

    #[test]
    fn test_particle_kind_parse() {
        assert_eq!(ParticleKind::parse("gas"), Some(ParticleKind::Gas));
        assert_eq!(ParticleKind::parse("PartType4"), Some(ParticleKind::Stars));
        assert_eq!(ParticleKind::parse(" Dark_Matter "), Some(ParticleKind::DarkMatter));
        assert_eq!(ParticleKind::parse("black_hole"), None);
    }

    #[test]
    fn test_particle_set_rejects_bad_dimension() {
        let positions = Array2::<f64>::zeros((4, 1));
        let err = ParticleSet::new(ParticleKind::Gas, positions, Array1::zeros(4)).unwrap_err();
        assert!(matches!(err, SnapshotError::Dimension(1)));
    }

    #[test]
    fn test_particle_set_rejects_field_length_mismatch() {
        let positions = Array2::<f64>::zeros((4, 3));
        let err = ParticleSet::new(ParticleKind::Gas, positions.clone(), Array1::zeros(3))
            .unwrap_err();
        assert!(matches!(err, SnapshotError::FieldLength { actual: 3, expected: 4, .. }));

        let set = ParticleSet::new(ParticleKind::Gas, positions, Array1::zeros(4)).unwrap();
        assert!(set.with_internal_energies(Array1::zeros(5)).is_err());
    }

    #[test]
    fn test_particle_set_accessors() {
        let set = ParticleSet::new(
            ParticleKind::Stars,
            array![[0.5, 0.5, 0.5]],
            array![1.0],
        )
        .unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(set.dimension(), 3);
        assert_eq!(set.position(0), Some(vec![0.5, 0.5, 0.5]));
        assert_eq!(set.position(1), None);
        assert!(set.internal_energies().is_none());
    }

    #[test]
    fn test_time_conversions() {
        let metadata = SnapshotMetadata {
            time: 1.0,
            units: UnitSystem { time_cgs: 1.0e9 * YEAR_IN_S, ..UnitSystem::cgs() },
            ..Default::default()
        };
        assert_relative_eq!(metadata.time_gyr(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(metadata.time_myr(), 1000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_length_label() {
        assert_eq!(UnitSystem::default().length_label(), "kpc");
        assert_eq!(UnitSystem::cgs().length_label(), "cm");
        let odd = UnitSystem { length_cgs: 42.0, ..UnitSystem::cgs() };
        assert_eq!(odd.length_label(), "U_L");
    }

    #[test]
    fn test_gravity_particles_prefers_dark_matter() {
        let mut snapshot = Snapshot::default();
        assert!(snapshot.gravity_particles().is_err());

        let gas = ParticleSet::new(ParticleKind::Gas, array![[1.0, 0.0]], array![1.0]).unwrap();
        snapshot.insert(gas);
        assert_eq!(snapshot.gravity_particles().unwrap().kind(), ParticleKind::Gas);

        let dm = ParticleSet::new(ParticleKind::DarkMatter, array![[1.0, 0.0]], array![2.0]).unwrap();
        snapshot.insert(dm);
        assert_eq!(snapshot.gravity_particles().unwrap().kind(), ParticleKind::DarkMatter);
    }
}
