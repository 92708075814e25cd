//! Data structures for MaxQuant post-processing.

mod abundance;
mod groups;
pub mod protein_groups;

pub use abundance::AbundanceMatrix;
pub use groups::GroupMap;
pub use protein_groups::{
    ProteinGroups, DEFAULT_INTENSITY_PREFIX, FLAG_COLUMNS, FLAG_SET, ID_COLUMN, ID_SEPARATOR,
};
