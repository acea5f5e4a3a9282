//! # crn-emissions
//!
//! Chemical reactor network model of a gas-turbine combustor. A primary zone of parallel
//! perfectly stirred reactors feeds a dual-path (slow/fast mode) secondary zone; soot
//! microphysics and emission indices are evaluated along the way.
//!
//! | module | content |
//! |--------|---------|
//! | [`combustor`] | configuration, reactor network, evaluation entry point, result tables |
//! | [`gas_engine`] | thermochemistry seam and the lumped Jet-A1 reference engine |
//! | [`soot`] | nucleation, surface growth, condensation, coagulation, oxidation |
//! | [`errors`] | error types with the stage at which they occurred |
//! | [`utils`] | task files |
pub mod combustor;
pub mod errors;
pub mod gas_engine;
pub mod soot;
pub mod utils;
