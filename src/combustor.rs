//! # Combustor Chemical Reactor Network
//!
//! Emission indices (CO2, CO, H2O, NOx, soot in g/kg fuel) of a gas-turbine combustor from a
//! reactor network:
//!
//! - **primary zone**: N_PZ parallel PSRs spanning a normal distribution of local
//!   equivalence ratios ([`splitter`], [`psr_network`]), pooled by [`zone_mixer`]
//! - **secondary zone**: slow-mode and fast-mode paths marching along the liner while
//!   secondary and dilution air is injected, then a joint path to the exit
//!   ([`secondary_zone`])
//! - **emission indices** after every stage ([`emission_index`])
//!
//! Thermochemistry is delegated to a [`GasEngine`](crate::gas_engine::GasEngine); soot rates
//! come from [`crate::soot`].
//!
//! ## Example
//! ```no_run
//! use crn_emissions::combustor::config::Combustor;
//! use crn_emissions::combustor::evaluate::{EvaluationOptions, OperatingPoint, evaluate};
//! use crn_emissions::gas_engine::lumped::LumpedEngineProvider;
//!
//! let combustor = Combustor::jet_a1_default();
//! let op = OperatingPoint::take_off(&combustor.config, 710.0, 2.6e6);
//! let result = evaluate(&combustor, &op, &LumpedEngineProvider::default(), &EvaluationOptions::default()).unwrap();
//! result.pretty_print();
//! ```
pub mod config;
pub mod emission_index;
pub mod evaluate;
pub mod precursors;
pub mod psr_network;
pub mod results;
pub mod results_print;
pub mod secondary_zone;
pub mod splitter;
pub mod zone_mixer;
mod combustor_tests;
