//! Pools the primary zone reactors into one stream.
//!
//! Each reactor contributes the gas it holds, `mass_i = τ_i·ṁ_i`, with its enthalpy and
//! composition. Reactors are added in ascending index order. The mixed stream is the initial
//! condition of both secondary zone paths.
use crate::combustor::emission_index::{EmissionIndices, emission_indices};
use crate::combustor::precursors::precursor_concentrations;
use crate::combustor::results::PsrNode;
use crate::errors::{AtStage, CombustorError, Stage};
use crate::gas_engine::{GasEngine, GasState, StreamQuantity};
use crate::soot::{PahProperties, PrecursorConcentrations};

#[derive(Debug, Clone, PartialEq)]
pub struct MixedZone {
    pub state: GasState,
    /// kg/s
    pub mass_flow: f64,
    pub fuel_flow: f64,
    pub soot_mass_flow: f64,
    pub precursors: PrecursorConcentrations,
    pub emission_indices: EmissionIndices,
}

pub fn mix_primary_zone<E: GasEngine>(
    engine: &mut E,
    reactors: &[PsrNode],
    pah: &PahProperties,
) -> Result<MixedZone, CombustorError> {
    let quantities: Vec<StreamQuantity> = reactors
        .iter()
        .map(|r| r.state.quantity(r.residence_time * r.mass_flow))
        .collect();
    let mixed = StreamQuantity::mix_all(&quantities)
        .at_stage(Stage::ZoneMixer)?
        .ok_or_else(|| CombustorError::configuration("primary zone has no reactors to mix"))?;
    if !(mixed.mass > 0.0) {
        return Err(CombustorError::numerical(
            Stage::ZoneMixer,
            format!("mixed primary zone mass {} kg", mixed.mass),
        ));
    }
    let state = engine.state_from_quantity(&mixed).at_stage(Stage::ZoneMixer)?;

    let mass_flow: f64 = reactors.iter().map(|r| r.mass_flow).sum();
    let fuel_flow: f64 = reactors.iter().map(|r| r.fuel_flow).sum();
    let soot_mass_flow: f64 = reactors.iter().map(|r| r.soot_mass_flow).sum();
    let precursors = precursor_concentrations(&state, pah).at_stage(Stage::ZoneMixer)?;
    let emission_indices =
        emission_indices(&state, mass_flow, fuel_flow, soot_mass_flow).at_stage(Stage::ZoneMixer)?;
    Ok(MixedZone {
        state,
        mass_flow,
        fuel_flow,
        soot_mass_flow,
        precursors,
        emission_indices,
    })
}
