//! # Combustor evaluation
//!
//! Entry point of the reactor network:
//!
//! ```text
//! splitter → PSR × N_PZ → zone mixer → { slow mode, fast mode } → joint mixing → exit EI
//! ```
//!
//! Operating point flows are totals over all combustor cans; one can carries
//! `1/number_of_combustors` of them. The mean primary zone equivalence ratio is
//! `φ̄ = F_SC·ṁ_fuel/(ṁ_air,PZ·FAR_st)`.
use crate::combustor::config::{Combustor, CombustorConfig};
use crate::combustor::emission_index::emission_indices;
use crate::combustor::psr_network::{InletConditions, PrimaryZoneInputs, evaluate_primary_zone};
use crate::combustor::results::{
    CombustorResult, EvaluationStatus, PathTrace, PrimaryZoneResult, SecondaryZoneResult,
};
use crate::combustor::secondary_zone::{
    AirSchedule, PathState, SecondaryZoneInputs, join_paths, march_path,
};
use crate::combustor::splitter::split_primary_zone;
use crate::combustor::zone_mixer::mix_primary_zone;
use crate::errors::{AtStage, CombustorError, FlowPath, Stage};
use crate::gas_engine::GasEngineProvider;
use log::{info, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatingPoint {
    /// combustor inlet temperature, K
    pub inlet_temperature: f64,
    /// combustor inlet pressure, Pa
    pub inlet_pressure: f64,
    /// air mass flow of all combustors, kg/s
    pub air_mass_flow: f64,
    pub fuel_to_air_ratio: f64,
}

impl OperatingPoint {
    /// Take-off air flow and fuel-air ratio of the design point at the given inlet state.
    pub fn take_off(config: &CombustorConfig, inlet_temperature: f64, inlet_pressure: f64) -> Self {
        Self {
            inlet_temperature,
            inlet_pressure,
            air_mass_flow: config.air_mass_flow_rate_take_off,
            fuel_to_air_ratio: config.fuel_to_air_ratio_take_off,
        }
    }

    pub fn validate(&self) -> Result<(), CombustorError> {
        let checks = [
            ("inlet temperature", self.inlet_temperature, false),
            ("inlet pressure", self.inlet_pressure, false),
            ("air mass flow", self.air_mass_flow, false),
            ("fuel-air ratio", self.fuel_to_air_ratio, true),
        ];
        for (name, value, zero_allowed) in checks {
            let ok = value.is_finite() && (value > 0.0 || (zero_allowed && value == 0.0));
            if !ok {
                return Err(CombustorError::configuration(format!(
                    "operating point {} = {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// What to do when the gas engine provider reports [`CombustorError::EngineUnavailable`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineUnavailablePolicy {
    /// propagate the error
    #[default]
    Fail,
    /// return a result with zero emission indices and
    /// [`EvaluationStatus::EngineUnavailable`]
    ZeroEmissions,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationOptions {
    /// evaluate the PSRs and the two secondary zone paths on the rayon pool
    pub parallel: bool,
    pub engine_unavailable: EngineUnavailablePolicy,
}

/// Soot leaving a path: the last step, or the share of the primary zone soot if the path
/// did not march.
fn outlet_soot(trace: &PathTrace, share: f64, primary_zone_soot: f64) -> f64 {
    trace
        .last()
        .map(|r| r.soot_mass_flow)
        .unwrap_or(share * primary_zone_soot)
}

/// Evaluates the reactor network of `combustor` at `operating_point`.
///
/// # Errors
/// * [`CombustorError::Configuration`] for invalid inputs (e.g. `N_PZ = 0` or `N_SZ = 0`)
/// * [`CombustorError::Kinetics`] / [`CombustorError::NumericalDomain`] with the stage at
///   which the evaluation failed
/// * [`CombustorError::EngineUnavailable`] unless the policy asks for zero emissions
pub fn evaluate<P: GasEngineProvider>(
    combustor: &Combustor,
    operating_point: &OperatingPoint,
    provider: &P,
    options: &EvaluationOptions,
) -> Result<CombustorResult, CombustorError> {
    let air_split = combustor.validate()?;
    operating_point.validate()?;
    let config = &combustor.config;
    let fuel = &combustor.fuel;
    let mechanism = fuel.kinetic_mechanism.as_str();

    let mut engine = match provider.create(mechanism) {
        Ok(engine) => engine,
        Err(CombustorError::EngineUnavailable { mechanism, reason })
            if options.engine_unavailable == EngineUnavailablePolicy::ZeroEmissions =>
        {
            warn!(
                "gas engine for '{}' unavailable ({}), returning zero emission indices",
                mechanism, reason
            );
            return Ok(CombustorResult::zero_emissions(reason));
        }
        Err(e) => return Err(e),
    };

    let cans = config.number_of_combustors as f64;
    let air_flow = operating_point.air_mass_flow / cans;
    let fuel_flow = operating_point.fuel_to_air_ratio * air_flow;
    let air_flow_pz = air_split.primary * air_flow;
    let mean_phi = config.f_sc * fuel_flow / (air_flow_pz * fuel.stoichiometric_fuel_air_ratio);
    let split = split_primary_zone(config.n_pz, mean_phi, config.s_pz)?;
    info!(
        "air split PZ/SA/DA = {:.3}/{:.3}/{:.3}, mean PZ phi = {:.3}, sigma = {:.3}",
        air_split.primary, air_split.secondary, air_split.dilution, mean_phi, split.sigma
    );

    // primary zone
    let inlet = InletConditions::new(
        &mut engine,
        combustor,
        operating_point.inlet_temperature,
        operating_point.inlet_pressure,
    )?;
    let pz_inputs = PrimaryZoneInputs {
        combustor,
        inlet: &inlet,
        air_flow: air_flow_pz,
        volume: config.volume_primary_zone(),
    };
    let reactors = evaluate_primary_zone(provider, &mut engine, &pz_inputs, &split, options.parallel)?;
    let mixed = mix_primary_zone(&mut engine, &reactors, &fuel.pah)?;
    info!(
        "primary zone: {} PSRs, T = {:.1} K, EI_CO2 = {:.1} g/kg",
        reactors.len(),
        mixed.state.temperature(),
        mixed.emission_indices.co2
    );

    // secondary zone
    let schedule = AirSchedule::new(combustor, &air_split, air_flow);
    let sz_inputs = SecondaryZoneInputs {
        combustor,
        schedule: &schedule,
        air: &inlet.air,
    };
    let n_join = config.join_step();
    let path_start = |share: f64| PathState {
        state: mixed.state.clone(),
        mass_flow: share * mixed.mass_flow,
        fuel_flow: share * mixed.fuel_flow,
    };
    let slow_start = path_start(config.f_sm);
    let fast_start = path_start(1.0 - config.f_sm);

    let ((slow, slow_trace), (fast, fast_trace)) = if options.parallel {
        let (slow, fast) = rayon::join(
            || -> Result<_, CombustorError> {
                let mut engine = provider.create(mechanism)?;
                march_path(&mut engine, &sz_inputs, FlowPath::SlowMode, slow_start, 0..n_join)
            },
            || -> Result<_, CombustorError> {
                let mut engine = provider.create(mechanism)?;
                march_path(&mut engine, &sz_inputs, FlowPath::FastMode, fast_start, 0..n_join)
            },
        );
        (slow?, fast?)
    } else {
        (
            march_path(&mut engine, &sz_inputs, FlowPath::SlowMode, slow_start, 0..n_join)?,
            march_path(&mut engine, &sz_inputs, FlowPath::FastMode, fast_start, 0..n_join)?,
        )
    };

    let joint_start = join_paths(&mut engine, &slow, &fast)?;
    let join_soot = outlet_soot(&slow_trace, config.f_sm, mixed.soot_mass_flow)
        + outlet_soot(&fast_trace, 1.0 - config.f_sm, mixed.soot_mass_flow);
    let (joint, joint_trace) = march_path(
        &mut engine,
        &sz_inputs,
        FlowPath::Joint,
        joint_start,
        n_join..config.n_sz,
    )?;
    let final_emission_indices = match joint_trace.last() {
        Some(record) => record.emission_indices,
        None => emission_indices(&joint.state, joint.mass_flow, joint.fuel_flow, join_soot)
            .at_stage(Stage::JointMixing)?,
    };
    info!(
        "combustor exit: T = {:.1} K, EI CO2 = {:.1}, CO = {:.3}, NOx = {:.3}, soot = {:.3e} g/kg",
        joint.state.temperature(),
        final_emission_indices.co2,
        final_emission_indices.co,
        final_emission_indices.nox,
        final_emission_indices.soot
    );

    Ok(CombustorResult {
        status: EvaluationStatus::Complete,
        primary_zone: PrimaryZoneResult {
            split,
            reactors,
            temperature: mixed.state.temperature(),
            mass_flow: mixed.mass_flow,
            fuel_flow: mixed.fuel_flow,
            final_emission_indices: mixed.emission_indices,
        },
        secondary_zone: SecondaryZoneResult {
            slow_mode: slow_trace,
            fast_mode: fast_trace,
            joint: joint_trace,
            exit_temperature: joint.state.temperature(),
            final_emission_indices,
        },
    })
}
