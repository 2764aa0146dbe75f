//! Common utilities for integration tests

pub mod snapshots;
pub mod test_helpers;

// Re-export commonly used items
pub use snapshots::{
    plummer_particles, write_plummer_snapshot, write_reference_table,
    write_species_reference_table, write_stromgren_snapshot,
};
pub use test_helpers::relative_error;
