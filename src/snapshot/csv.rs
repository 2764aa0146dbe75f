//! Plain-text snapshot reader
//!
//! A CSV snapshot is a particle table preceded by `# key: value` metadata
//! comments, the same layout the profile exporter writes.
//!
//! ```csv
//! # time: 0.25
//! # boxsize: 1.0,1.0,1.0
//! # unit_length_cgs: 3.08567758e21
//! # rt_scheme: SPH M1closure
//! # adiabatic_index: 1.6666667
//! type,x,y,z,mass,internal_energy,mass_fraction_H,mass_fraction_He,abundance_HI,...
//! gas,0.51,0.49,0.50,1e-6,12.5,0.76,0.24,0.999,...
//! stars,0.5,0.5,0.5,1e-3,,,,,...
//! ```
//!
//! # Columns
//!
//! | Column | Required | Meaning |
//! |--------|----------|---------|
//! | `type` | yes | `gas`, `dark_matter`, `stars` (or `PartType0/1/4`) |
//! | `x`, `y` | yes | coordinates |
//! | `z` | no | third coordinate; its presence makes the snapshot 3-D |
//! | `mass` | yes | particle mass |
//! | `internal_energy` | no | specific internal energy |
//! | `imf_HI` … `imf_HeIII` | no | ion mass fractions |
//! | `mass_fraction_H`, `mass_fraction_He` | no | element mass fractions |
//! | `abundance_e` … `abundance_HeIII` | no | species abundances `n_i / n_H` |
//!
//! Cells of optional columns may be left empty for families that do not
//! carry the field; the field is then absent from that family.
//!
//! # Metadata keys
//!
//! `time`, `boxsize` (comma-separated), `unit_length_cgs`, `unit_mass_cgs`,
//! `unit_time_cgs`, `rt_scheme`, `adiabatic_index`. Unknown keys are ignored.

use std::collections::HashMap;
use std::path::Path;

use ndarray::{Array1, Array2};

use super::data::{IonizationData, ParticleKind, ParticleSet, Snapshot, SnapshotMetadata, SpeciesFields};
use super::error::SnapshotError;
use super::SnapshotReader;

const SPECIES: [&str; 5] = ["HI", "HII", "HeI", "HeII", "HeIII"];

/// Reader for `.csv` snapshots
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvSnapshotReader;

impl SnapshotReader for CsvSnapshotReader {
    fn read(&self, path: &Path) -> Result<Snapshot, SnapshotError> {
        let text = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse_csv_snapshot(&text)
    }
}

// =============================================================================
// Metadata
// =============================================================================

fn parse_metadata_value(key: &str, value: &str) -> Result<f64, SnapshotError> {
    value.trim().parse::<f64>().map_err(|_| SnapshotError::Metadata {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn apply_metadata(
    metadata: &mut SnapshotMetadata,
    key: &str,
    value: &str,
) -> Result<(), SnapshotError> {
    match key {
        "time" => metadata.time = parse_metadata_value(key, value)?,
        "boxsize" => {
            metadata.boxsize = value
                .split(',')
                .map(|v| parse_metadata_value(key, v))
                .collect::<Result<Vec<_>, _>>()?;
        }
        "unit_length_cgs" => metadata.units.length_cgs = parse_metadata_value(key, value)?,
        "unit_mass_cgs" => metadata.units.mass_cgs = parse_metadata_value(key, value)?,
        "unit_time_cgs" => metadata.units.time_cgs = parse_metadata_value(key, value)?,
        "rt_scheme" => metadata.rt_scheme = Some(value.to_string()),
        "adiabatic_index" => metadata.adiabatic_index = Some(parse_metadata_value(key, value)?),
        other => log::debug!("Ignoring unknown snapshot metadata '{}'", other),
    }
    Ok(())
}

/// Split leading `# key: value` lines from the particle table
fn split_header(text: &str) -> Result<(SnapshotMetadata, &str), SnapshotError> {
    let mut metadata = SnapshotMetadata::default();
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            offset += line.len();
            continue;
        }
        let Some(comment) = trimmed.strip_prefix('#') else {
            break;
        };
        if let Some((key, value)) = comment.split_once(':') {
            apply_metadata(&mut metadata, key.trim(), value.trim())?;
        }
        offset += line.len();
    }

    Ok((metadata, &text[offset..]))
}

// =============================================================================
// Particle table
// =============================================================================

/// Column indices of the particle table
struct Layout {
    kind: usize,
    coordinates: Vec<usize>,
    mass: usize,
    internal_energy: Option<usize>,
    imf: [Option<usize>; 5],
    hydrogen: Option<usize>,
    helium: Option<usize>,
    electrons: Option<usize>,
    abundances: [Option<usize>; 5],
}

impl Layout {
    fn from_headers(headers: &[String]) -> Result<Self, SnapshotError> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require = |name: &str| find(name).ok_or_else(|| SnapshotError::MissingColumn(name.to_string()));

        let mut coordinates = vec![require("x")?, require("y")?];
        if let Some(z) = find("z") {
            coordinates.push(z);
        }

        Ok(Self {
            kind: require("type")?,
            coordinates,
            mass: require("mass")?,
            internal_energy: find("internal_energy"),
            imf: SPECIES.map(|s| find(&format!("imf_{s}"))),
            hydrogen: find("mass_fraction_H"),
            helium: find("mass_fraction_He"),
            electrons: find("abundance_e"),
            abundances: SPECIES.map(|s| find(&format!("abundance_{s}"))),
        })
    }
}

/// Rows of one particle family, in file order
#[derive(Default)]
struct FamilyRows {
    positions: Vec<f64>,
    masses: Vec<f64>,
    internal_energy: Vec<Option<f64>>,
    imf: [Vec<Option<f64>>; 5],
    hydrogen: Vec<Option<f64>>,
    helium: Vec<Option<f64>>,
    electrons: Vec<Option<f64>>,
    abundances: [Vec<Option<f64>>; 5],
}

struct Row<'a> {
    index: usize,
    record: &'a csv::StringRecord,
    headers: &'a [String],
}

impl Row<'_> {
    fn cell(&self, column: usize) -> &str {
        self.record.get(column).unwrap_or("")
    }

    fn number(&self, column: usize) -> Result<f64, SnapshotError> {
        let cell = self.cell(column);
        cell.parse::<f64>().map_err(|_| SnapshotError::Parse {
            row: self.index,
            column: self.headers[column].clone(),
            value: cell.to_string(),
        })
    }

    fn optional(&self, column: Option<usize>) -> Result<Option<f64>, SnapshotError> {
        match column {
            Some(c) if !self.cell(c).is_empty() => self.number(c).map(Some),
            _ => Ok(None),
        }
    }
}

/// `Some(values)` only if every row of the family filled the column
fn complete(column: &[Option<f64>]) -> Option<Array1<f64>> {
    column.iter().copied().collect::<Option<Vec<f64>>>().map(Array1::from)
}

fn species(columns: &[Vec<Option<f64>>; 5]) -> Option<SpeciesFields> {
    let [hi, hii, hei, heii, heiii] = columns;
    Some(SpeciesFields {
        hi: complete(hi)?,
        hii: complete(hii)?,
        hei: complete(hei)?,
        heii: complete(heii)?,
        heiii: complete(heiii)?,
    })
}

impl FamilyRows {
    fn push(&mut self, row: &Row<'_>, layout: &Layout) -> Result<(), SnapshotError> {
        for &column in &layout.coordinates {
            self.positions.push(row.number(column)?);
        }
        self.masses.push(row.number(layout.mass)?);
        self.internal_energy.push(row.optional(layout.internal_energy)?);
        for (values, column) in self.imf.iter_mut().zip(layout.imf) {
            values.push(row.optional(column)?);
        }
        self.hydrogen.push(row.optional(layout.hydrogen)?);
        self.helium.push(row.optional(layout.helium)?);
        self.electrons.push(row.optional(layout.electrons)?);
        for (values, column) in self.abundances.iter_mut().zip(layout.abundances) {
            values.push(row.optional(column)?);
        }
        Ok(())
    }

    fn ionization(&self) -> Result<Option<IonizationData>, SnapshotError> {
        let any_imf = self.imf.iter().any(|c| c.iter().any(Option::is_some));
        if any_imf {
            return species(&self.imf)
                .map(|fields| Some(IonizationData::IonMassFractions(fields)))
                .ok_or_else(|| {
                    SnapshotError::IncompleteIonization("every imf_* column must be filled".into())
                });
        }

        let any_abundance = self.abundances.iter().any(|c| c.iter().any(Option::is_some));
        if !any_abundance {
            return Ok(None);
        }

        let incomplete = || {
            SnapshotError::IncompleteIonization(
                "abundances need mass_fraction_H, mass_fraction_He and every abundance_* column"
                    .into(),
            )
        };

        Ok(Some(IonizationData::ElementAbundances {
            hydrogen_mass_fraction: complete(&self.hydrogen).ok_or_else(incomplete)?,
            helium_mass_fraction: complete(&self.helium).ok_or_else(incomplete)?,
            electron_abundance: complete(&self.electrons),
            abundances: species(&self.abundances).ok_or_else(incomplete)?,
        }))
    }

    fn into_set(self, kind: ParticleKind, dimension: usize) -> Result<ParticleSet, SnapshotError> {
        let ionization = self.ionization()?;
        let energies = complete(&self.internal_energy);
        let n = self.masses.len();

        let positions = Array2::from_shape_vec((n, dimension), self.positions)
            .map_err(|_| SnapshotError::FieldLength { field: "positions", actual: n, expected: n })?;

        let mut set = ParticleSet::new(kind, positions, Array1::from(self.masses))?;
        if let Some(energies) = energies {
            set = set.with_internal_energies(energies)?;
        }
        if let Some(ionization) = ionization {
            set = set.with_ionization(ionization)?;
        }
        Ok(set)
    }
}

/// Parse the full text of a CSV snapshot
pub fn parse_csv_snapshot(text: &str) -> Result<Snapshot, SnapshotError> {
    let (metadata, table) = split_header(text)?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(table.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let layout = Layout::from_headers(&headers)?;

    // Families in order of first appearance, so insertion is deterministic
    let mut order: Vec<ParticleKind> = Vec::new();
    let mut families: HashMap<ParticleKind, FamilyRows> = HashMap::new();

    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let row = Row { index, record: &record, headers: &headers };

        let kind = ParticleKind::parse(row.cell(layout.kind)).ok_or_else(|| {
            SnapshotError::UnknownParticleKind {
                row: index,
                value: row.cell(layout.kind).to_string(),
            }
        })?;

        if !families.contains_key(&kind) {
            order.push(kind);
        }
        families.entry(kind).or_default().push(&row, &layout)?;
    }

    let mut snapshot = Snapshot { metadata, ..Default::default() };
    for kind in order {
        if let Some(rows) = families.remove(&kind) {
            let set = rows.into_set(kind, layout.coordinates.len())?;
            log::debug!("Read {} {:?} particles", set.len(), kind);
            snapshot.insert(set);
        }
    }

    Ok(snapshot)
}

// =================================================================================================
// Tests
// =================================================================================================
