//! Join normalization
//!
//! [`left_join`] combines per-store result sets into flat join rows;
//! [`normalize`] folds those rows into deduplicated [`NormalizedStudentView`]s.

pub mod join;
pub mod normalizer;
pub mod view;

pub use join::left_join;
pub use normalizer::{normalize, NormalizeReport, Normalizer};
pub use view::{ClassEntry, ClassMap, NormalizedStudentView};
