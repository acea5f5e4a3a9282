//! # Primary zone PSR network
//!
//! Each reactor of the split receives `air_i = w_i·ṁ_air,PZ` and `fuel_i = φ_i·FAR_st·air_i`,
//! so the air and fuel of all reactors add up to the primary zone totals. A reactor:
//!
//! 1. mixes air and liquid fuel enthalpies
//!    (`h_fuel = h_vapour(T_in) − Δh_vap − c_p,liq·(T_in − T_fuel)`)
//! 2. sets the composition from φ_i with the equivalence-ratio mixing rule
//! 3. equilibrates at constant enthalpy and pressure
//! 4. advances a constant-pressure reactor for `τ_i = V_i·ρ_i/ṁ_i` with `V_i = w_i·V_PZ`
//! 5. evaluates the soot rates and emission indices of the control volume; the soot mass flow
//!    is clipped to the carbon mass flow of the reactor
//!
//! Reactors are independent. With `parallel` set they are evaluated on the rayon pool, every
//! worker owning its own engine handle; results keep ascending index order.
use crate::combustor::config::Combustor;
use crate::combustor::emission_index::emission_indices;
use crate::combustor::precursors::precursor_concentrations;
use crate::combustor::results::PsrNode;
use crate::combustor::splitter::{PrimaryZoneSplit, SplitReactor};
use crate::errors::{AtStage, CombustorError, Stage};
use crate::gas_engine::{GasEngine, GasEngineProvider, GasState};
use crate::soot::{ControlVolume, bounded_soot_mass_flow, soot_rates};
use log::debug;
use rayon::prelude::*;

/// Inlet air and fuel at the operating point.
#[derive(Debug, Clone, PartialEq)]
pub struct InletConditions {
    /// K
    pub temperature: f64,
    /// Pa
    pub pressure: f64,
    /// combustor inlet air
    pub air: GasState,
    /// specific enthalpy of the injected liquid fuel, J/kg
    pub fuel_enthalpy: f64,
}

impl InletConditions {
    pub fn new<E: GasEngine>(
        engine: &mut E,
        combustor: &Combustor,
        temperature: f64,
        pressure: f64,
    ) -> Result<Self, CombustorError> {
        let species = engine.species().clone();
        let x_air = species
            .mole_fractions_from_map(&combustor.oxidizer.surrogate)
            .at_stage(Stage::EngineSetup)?;
        let air = engine
            .state_tp(temperature, pressure, &x_air)
            .at_stage(Stage::EngineSetup)?;
        let fuel = &combustor.fuel;
        let x_fuel = species
            .mole_fractions_from_map(&fuel.surrogate)
            .at_stage(Stage::EngineSetup)?;
        let vapour = engine
            .state_tp(temperature, fuel.pressure, &x_fuel)
            .at_stage(Stage::EngineSetup)?;
        let fuel_enthalpy = vapour.enthalpy_mass()
            - fuel.heat_of_vaporization
            - fuel.liquid_heat_capacity * (temperature - fuel.temperature);
        Ok(Self {
            temperature,
            pressure,
            air,
            fuel_enthalpy,
        })
    }
}

/// Everything a single reactor needs besides the engine.
#[derive(Debug, Clone, Copy)]
pub struct PrimaryZoneInputs<'a> {
    pub combustor: &'a Combustor,
    pub inlet: &'a InletConditions,
    /// primary zone air flow of one combustor, kg/s
    pub air_flow: f64,
    /// V_PZ, m³
    pub volume: f64,
}

pub fn evaluate_reactor<E: GasEngine>(
    engine: &mut E,
    inputs: &PrimaryZoneInputs,
    index: usize,
    reactor: &SplitReactor,
) -> Result<PsrNode, CombustorError> {
    let stage = Stage::PrimaryZoneReactor { index };
    let fuel = &inputs.combustor.fuel;
    let phi = reactor.equivalence_ratio;

    let air_flow = reactor.weight * inputs.air_flow;
    let fuel_flow = phi * fuel.stoichiometric_fuel_air_ratio * air_flow;
    let mass_flow = air_flow + fuel_flow;
    if !(mass_flow > 0.0) {
        return Err(CombustorError::numerical(
            stage,
            format!("reactor carries no flow (weight {})", reactor.weight),
        ));
    }
    let enthalpy =
        (air_flow * inputs.inlet.air.enthalpy_mass() + fuel_flow * inputs.inlet.fuel_enthalpy)
            / mass_flow;

    let x = engine
        .equivalence_ratio_mixture(phi, &fuel.surrogate, &inputs.combustor.oxidizer.surrogate)
        .at_stage(stage.clone())?;
    let y = engine.species().mole_to_mass(&x);
    let fresh = engine
        .state_hp(enthalpy, inputs.inlet.pressure, &y)
        .at_stage(stage.clone())?;
    let flame = engine.equilibrate_hp(&fresh).at_stage(stage.clone())?;

    let volume = reactor.weight * inputs.volume;
    let residence_time = volume * flame.density() / mass_flow;
    if !(residence_time >= 0.0) || !residence_time.is_finite() {
        return Err(CombustorError::numerical(
            stage,
            format!("residence time {} s", residence_time),
        ));
    }
    let state = engine
        .advance_const_pressure(&flame, residence_time)
        .at_stage(stage.clone())?;

    let precursors = precursor_concentrations(&state, &fuel.pah).at_stage(stage.clone())?;
    let cv = ControlVolume {
        volume,
        mass_flow,
        density: state.density(),
    };
    let soot = soot_rates(&fuel.pah, &fuel.soot, &precursors, &cv).at_stage(stage.clone())?;
    let soot_mass_flow = bounded_soot_mass_flow(&soot, mass_flow * state.carbon_mass_fraction());
    let emission_indices =
        emission_indices(&state, mass_flow, fuel_flow, soot_mass_flow).at_stage(stage)?;

    debug!(
        "PSR {}: phi = {:.3}, w = {:.4}, T = {:.1} K, tau = {:.3e} s",
        index,
        phi,
        reactor.weight,
        state.temperature(),
        residence_time
    );
    Ok(PsrNode {
        index,
        equivalence_ratio: phi,
        weight: reactor.weight,
        volume,
        residence_time,
        state,
        mass_flow,
        air_flow,
        fuel_flow,
        soot,
        soot_mass_flow,
        emission_indices,
    })
}

/// Evaluates every reactor of the split. `engine` is used for the serial path only.
pub fn evaluate_primary_zone<P: GasEngineProvider>(
    provider: &P,
    engine: &mut P::Engine,
    inputs: &PrimaryZoneInputs,
    split: &PrimaryZoneSplit,
    parallel: bool,
) -> Result<Vec<PsrNode>, CombustorError> {
    if !parallel {
        return split
            .reactors
            .iter()
            .enumerate()
            .map(|(i, reactor)| evaluate_reactor(engine, inputs, i, reactor))
            .collect();
    }
    let mechanism = inputs.combustor.fuel.kinetic_mechanism.as_str();
    split
        .reactors
        .par_iter()
        .enumerate()
        .map_init(
            || provider.create(mechanism),
            |worker_engine, (i, reactor)| match worker_engine {
                Ok(engine) => evaluate_reactor(engine, inputs, i, reactor),
                Err(e) => Err(e.clone()),
            },
        )
        .collect()
}
