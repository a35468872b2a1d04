//! Address handling: text normalization, the district enumeration and free-text district resolution.
mod district;
pub mod normalizer;
mod resolver;
pub mod tables;

pub use district::{District, UnknownDistrict, DISTRICT_COUNT};
pub use resolver::{DistrictMatch, DistrictResolver, MatchSource, ResolutionError};
