//! SWIFT HDF5 snapshot reader (feature `hdf5`)
//!
//! Reads the subset of a SWIFT snapshot the profile analyses need:
//!
//! | Location | Content |
//! |----------|---------|
//! | `Header` attrs `Time`, `BoxSize` | time, box size |
//! | `Units` attrs `Unit length/mass/time in cgs (U_L/U_M/U_t)` | unit system |
//! | `SubgridScheme` attr `RT Scheme` | radiative-transfer scheme |
//! | `HydroScheme` attr `Adiabatic index` | γ |
//! | `PartType{0,1,4}/Coordinates`, `Masses` | positions, masses |
//! | `PartType0/InternalEnergies` | specific internal energy |
//! | `PartType0/IonMassFractions` (N×5) | HI, HII, HeI, HeII, HeIII |
//! | `PartType0/RtElementMassFractions` (N×2) | hydrogen, helium |
//! | `PartType0/RtSpeciesAbundances` (N×6) | e, HI, HII, HeI, HeII, HeIII |

use std::path::Path;

use hdf5::types::{FixedAscii, FixedUnicode, VarLenAscii, VarLenUnicode};
use hdf5::{Attribute, Group};
use ndarray::{s, Array1, Array2};

use super::data::{IonizationData, ParticleKind, ParticleSet, Snapshot, SnapshotMetadata, SpeciesFields};
use super::error::SnapshotError;
use super::SnapshotReader;

/// Reader for SWIFT `.hdf5` snapshots
#[derive(Debug, Clone, Copy, Default)]
pub struct Hdf5SnapshotReader;

impl SnapshotReader for Hdf5SnapshotReader {
    fn read(&self, path: &Path) -> Result<Snapshot, SnapshotError> {
        let file = hdf5::File::open(path)?;
        let members = file.member_names()?;

        let mut snapshot = Snapshot {
            metadata: read_metadata(&file, &members)?,
            ..Default::default()
        };

        for kind in [ParticleKind::Gas, ParticleKind::DarkMatter, ParticleKind::Stars] {
            if members.iter().any(|m| m == kind.group_name()) {
                let group = file.group(kind.group_name())?;
                let set = read_particles(&group, kind)?;
                log::debug!("Read {} {:?} particles from {}", set.len(), kind, path.display());
                snapshot.insert(set);
            }
        }

        Ok(snapshot)
    }
}

fn first_value(attr: &Attribute) -> Result<f64, SnapshotError> {
    let values = attr.read_raw::<f64>()?;
    values.first().copied().ok_or_else(|| SnapshotError::Metadata {
        key: attr.name(),
        value: "empty attribute".to_string(),
    })
}

/// SWIFT writes fixed-length strings; other writers use variable length
fn read_string(attr: &Attribute) -> Result<String, SnapshotError> {
    if let Ok(s) = attr.read_scalar::<VarLenUnicode>() {
        return Ok(s.as_str().to_string());
    }
    if let Ok(s) = attr.read_scalar::<VarLenAscii>() {
        return Ok(s.as_str().to_string());
    }
    if let Ok(s) = attr.read_scalar::<FixedAscii<1024>>() {
        return Ok(s.as_str().to_string());
    }
    let s = attr.read_scalar::<FixedUnicode<1024>>()?;
    Ok(s.as_str().to_string())
}

fn optional_attr(group: &Group, name: &str) -> Result<Option<Attribute>, SnapshotError> {
    if group.attr_names()?.iter().any(|a| a == name) {
        Ok(Some(group.attr(name)?))
    } else {
        Ok(None)
    }
}

fn read_metadata(file: &hdf5::File, members: &[String]) -> Result<SnapshotMetadata, SnapshotError> {
    let has = |name: &str| members.iter().any(|m| m == name);
    let mut metadata = SnapshotMetadata::default();

    let header = file.group("Header")?;
    if let Some(attr) = optional_attr(&header, "Time")? {
        metadata.time = first_value(&attr)?;
    }
    if let Some(attr) = optional_attr(&header, "BoxSize")? {
        metadata.boxsize = attr.read_raw::<f64>()?;
    }

    if has("Units") {
        let units = file.group("Units")?;
        if let Some(attr) = optional_attr(&units, "Unit length in cgs (U_L)")? {
            metadata.units.length_cgs = first_value(&attr)?;
        }
        if let Some(attr) = optional_attr(&units, "Unit mass in cgs (U_M)")? {
            metadata.units.mass_cgs = first_value(&attr)?;
        }
        if let Some(attr) = optional_attr(&units, "Unit time in cgs (U_t)")? {
            metadata.units.time_cgs = first_value(&attr)?;
        }
    }

    if has("SubgridScheme") {
        let subgrid = file.group("SubgridScheme")?;
        if let Some(attr) = optional_attr(&subgrid, "RT Scheme")? {
            metadata.rt_scheme = Some(read_string(&attr)?.trim().to_string());
        }
    }

    if has("HydroScheme") {
        let hydro = file.group("HydroScheme")?;
        if let Some(attr) = optional_attr(&hydro, "Adiabatic index")? {
            metadata.adiabatic_index = Some(first_value(&attr)?);
        }
    }

    Ok(metadata)
}

fn species_from_columns(table: &Array2<f64>, first: usize) -> Result<SpeciesFields, SnapshotError> {
    if table.ncols() < first + 5 {
        return Err(SnapshotError::IncompleteIonization(format!(
            "expected at least {} species columns, found {}",
            first + 5,
            table.ncols()
        )));
    }
    let column = |c: usize| table.column(first + c).to_owned();
    Ok(SpeciesFields {
        hi: column(0),
        hii: column(1),
        hei: column(2),
        heii: column(3),
        heiii: column(4),
    })
}

fn read_ionization(group: &Group, members: &[String]) -> Result<Option<IonizationData>, SnapshotError> {
    let has = |name: &str| members.iter().any(|m| m == name);

    if has("IonMassFractions") {
        let table = group.dataset("IonMassFractions")?.read_2d::<f64>()?;
        return Ok(Some(IonizationData::IonMassFractions(species_from_columns(&table, 0)?)));
    }

    if has("RtElementMassFractions") && has("RtSpeciesAbundances") {
        let elements = group.dataset("RtElementMassFractions")?.read_2d::<f64>()?;
        let abundances = group.dataset("RtSpeciesAbundances")?.read_2d::<f64>()?;
        if elements.ncols() < 2 {
            return Err(SnapshotError::IncompleteIonization(
                "RtElementMassFractions needs hydrogen and helium columns".into(),
            ));
        }

        return Ok(Some(IonizationData::ElementAbundances {
            hydrogen_mass_fraction: elements.column(0).to_owned(),
            helium_mass_fraction: elements.column(1).to_owned(),
            electron_abundance: Some(abundances.slice(s![.., 0]).to_owned()),
            abundances: species_from_columns(&abundances, 1)?,
        }));
    }

    Ok(None)
}

fn read_particles(group: &Group, kind: ParticleKind) -> Result<ParticleSet, SnapshotError> {
    let members = group.member_names()?;
    let has = |name: &str| members.iter().any(|m| m == name);

    let positions = group.dataset("Coordinates")?.read_2d::<f64>()?;
    let masses: Array1<f64> = if has("Masses") {
        group.dataset("Masses")?.read_1d::<f64>()?
    } else {
        return Err(SnapshotError::MissingColumn(format!("{}/Masses", kind.group_name())));
    };

    let mut set = ParticleSet::new(kind, positions, masses)?;

    if has("InternalEnergies") {
        set = set.with_internal_energies(group.dataset("InternalEnergies")?.read_1d::<f64>()?)?;
    }
    if let Some(ionization) = read_ionization(group, &members)? {
        set = set.with_ionization(ionization)?;
    }

    Ok(set)
}
