//! Core building blocks: the cube and histogram collaborators, configuration,
//! and the processing primitives (coordinate mapping, binning, type dispatch)
//! consumed by the high-level `api` module.
pub mod cube;
pub mod histogram;
pub mod params;
pub mod processing;
