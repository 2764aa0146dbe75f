//! Deterministic synthetic snapshots written as CSV files
//!
//! Particle realisations are built from quantiles rather than random draws,
//! so every test sees the same particles.

#![allow(dead_code)]

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use ndarray::{Array1, Array2};
use radprof_rs::models::PlummerModel;

/// Golden angle, spreads consecutive particles evenly over the sphere
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// `n` unit vectors on a Fibonacci sphere
fn directions(n: usize) -> impl Iterator<Item = [f64; 3]> {
    (0..n).map(move |i| {
        let z = 1.0 - 2.0 * (i as f64 + 0.5) / n as f64;
        let rho = (1.0 - z * z).sqrt();
        let phi = GOLDEN_ANGLE * i as f64;
        [rho * phi.cos(), rho * phi.sin(), z]
    })
}

/// Equal-mass Plummer realisation centred on `[center; 3]`
///
/// Particle `i` sits at the radius enclosing the mass fraction
/// `(i + 0.5) / n`, so the enclosed mass follows the model to within one
/// particle at every radius.
pub fn plummer_particles(model: &PlummerModel, n: usize, center: f64) -> (Array2<f64>, Array1<f64>) {
    let mut positions = Array2::zeros((n, 3));

    for (i, direction) in directions(n).enumerate() {
        let r = model.radius_of_mass_fraction((i as f64 + 0.5) / n as f64);
        for axis in 0..3 {
            positions[[i, axis]] = center + r * direction[axis];
        }
    }

    let masses = Array1::from_elem(n, model.total_mass / n as f64);
    (positions, masses)
}

/// Write a dark-matter-only Plummer snapshot
pub fn write_plummer_snapshot(
    dir: &Path,
    name: &str,
    model: &PlummerModel,
    n: usize,
    shift: f64,
    time: f64,
) -> PathBuf {
    let (positions, masses) = plummer_particles(model, n, shift);

    let mut text = String::new();
    writeln!(text, "# time: {}", time).unwrap();
    writeln!(text, "# boxsize: {b},{b},{b}", b = 2.0 * shift).unwrap();
    writeln!(text, "type,x,y,z,mass").unwrap();
    for (row, mass) in positions.rows().into_iter().zip(masses.iter()) {
        writeln!(text, "dark_matter,{},{},{},{}", row[0], row[1], row[2], mass).unwrap();
    }

    let path = dir.join(name);
    std::fs::write(&path, text).unwrap();
    path
}

/// Write a Strömgren sphere snapshot in cgs units
///
/// A star at the box centre and `per_axis³` gas particles on a regular grid.
/// Hydrogen is fully ionized inside `ionized_radius` and neutral outside;
/// helium stays neutral. With `abundances` the ionization state is written
/// as element mass fractions and abundances (SPH M1closure) instead of ion
/// mass fractions (GEAR M1closure).
pub fn write_stromgren_snapshot(
    dir: &Path,
    name: &str,
    per_axis: usize,
    ionized_radius: f64,
    abundances: bool,
) -> PathBuf {
    let boxsize = 1.0;
    let center = 0.5 * boxsize;
    let (x_h, y_he) = (0.76, 0.24);

    let mut text = String::new();
    writeln!(text, "# time: 3.15576e13").unwrap();
    writeln!(text, "# boxsize: {b},{b},{b}", b = boxsize).unwrap();
    writeln!(text, "# unit_length_cgs: 1.0").unwrap();
    writeln!(text, "# unit_mass_cgs: 1.0").unwrap();
    writeln!(text, "# unit_time_cgs: 1.0").unwrap();
    writeln!(text, "# adiabatic_index: 1.6666667").unwrap();
    if abundances {
        writeln!(text, "# rt_scheme: SPH M1closure").unwrap();
        writeln!(
            text,
            "type,x,y,z,mass,internal_energy,mass_fraction_H,mass_fraction_He,\
             abundance_HI,abundance_HII,abundance_HeI,abundance_HeII,abundance_HeIII"
        )
        .unwrap();
    } else {
        writeln!(text, "# rt_scheme: GEAR M1closure").unwrap();
        writeln!(
            text,
            "type,x,y,z,mass,internal_energy,imf_HI,imf_HII,imf_HeI,imf_HeII,imf_HeIII"
        )
        .unwrap();
    }

    let spacing = boxsize / per_axis as f64;
    for i in 0..per_axis {
        for j in 0..per_axis {
            for k in 0..per_axis {
                let [x, y, z] = [i, j, k].map(|n| (n as f64 + 0.5) * spacing);
                let r = ((x - center).powi(2) + (y - center).powi(2) + (z - center).powi(2)).sqrt();
                let ionized = r < ionized_radius;
                let u = if ionized { 2.0e12 } else { 5.0e9 };

                let fields = if abundances {
                    // n_He / n_H = Y / (4 X)
                    let he = y_he / (4.0 * x_h);
                    let (hi, hii) = if ionized { (0.0, 1.0) } else { (1.0, 0.0) };
                    format!("{},{},{},{},{},0,0", x_h, y_he, hi, hii, he)
                } else {
                    let (hi, hii) = if ionized { (0.0, x_h) } else { (x_h, 0.0) };
                    format!("{},{},{},0,0", hi, hii, y_he)
                };
                writeln!(text, "gas,{},{},{},1e-3,{},{}", x, y, z, u, fields).unwrap();
            }
        }
    }

    let empty_cells = if abundances { ",,,,,,," } else { ",,,,," };
    writeln!(text, "stars,{c},{c},{c},1.0,{}", empty_cells, c = center).unwrap();

    let path = dir.join(name);
    std::fs::write(&path, text).unwrap();
    path
}

/// Write a small TT1D-like reference table
pub fn write_reference_table(dir: &Path) -> PathBuf {
    let table = "\
quantity,radius,value
neutral_fraction,0.0,1e-5
neutral_fraction,0.2,1e-4
neutral_fraction,0.3,0.5
neutral_fraction,0.5,0.99
temperature,0.0,2e4
temperature,0.3,1e4
temperature,0.5,100
";
    let path = dir.join("TT1D.csv");
    std::fs::write(&path, table).unwrap();
    path
}

/// Write a small TT1D-like table with species curves and temperature
pub fn write_species_reference_table(dir: &Path) -> PathBuf {
    let table = "\
quantity,radius,value
HI,0.0,1e-5
HI,0.5,0.99
HII,0.0,0.99999
HII,0.5,0.01
HeI,0.0,1e-5
HeI,0.5,0.08
HeII,0.2,0.05
HeIII,0.1,0.02
temperature,0.0,2e4
temperature,0.5,100
";
    let path = dir.join("TT1D_HHe.csv");
    std::fs::write(&path, table).unwrap();
    path
}
