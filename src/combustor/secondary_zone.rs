//! # Secondary zone dual-path integrator
//!
//! The mixed primary zone stream is split into a slow-mode share `f_SM` and a fast-mode share
//! `1 − f_SM`. Both paths march the first `⌊joint_mixing_fraction·N_SZ⌋` segments of width
//! `dz = L_SZ/N_SZ` on their own, then join and march the rest as one stream.
//!
//! ## Air injection (kg/s per m of length)
//!
//! | Air | Rate | Window |
//! |-----|------|--------|
//! | secondary, slow | `β_SA,SM = f_SA·ṁ_air·f_SM/(l_SA,SM·L_SZ)` | `z/L_SZ ≤ l_SA,SM` |
//! | secondary, fast | `β_SA,FM = f_SA·ṁ_air·(1−f_SM)/(l_SA,FM·L_SZ)` | `z/L_SZ ≤ l_SA,FM` |
//! | dilution | `β_DA = f_DA·ṁ_air/((l_DA,end−l_DA,start)·L_SZ)` | `l_DA,start ≤ z/L_SZ ≤ l_DA,end` |
//!
//! Secondary air takes precedence over dilution air. Before the join each path gets its flow
//! share of the dilution air; the joint stream receives both secondary air rates while their
//! windows are open and the full dilution rate.
//!
//! ## One step
//! `τ = dz·A·ρ/ṁ`; the gas held in the segment (`ṁ·τ`) is mixed adiabatically with the air
//! increment (`ṁ_air·τ`), the mixture is advanced in a constant-pressure reactor for τ, and
//! `ṁ += ṁ_air`.
use crate::combustor::config::{AirSplit, Combustor};
use crate::combustor::emission_index::{emission_indices, local_equivalence_ratio};
use crate::combustor::precursors::precursor_concentrations;
use crate::combustor::results::{PathTrace, ZoneTraceRecord};
use crate::errors::{AtStage, CombustorError, FlowPath, Stage};
use crate::gas_engine::{GasEngine, GasState};
use crate::soot::{ControlVolume, bounded_soot_mass_flow, soot_rates};
use log::debug;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirSchedule {
    pub secondary_slow: f64,
    pub secondary_fast: f64,
    pub dilution: f64,
    pub l_sa_sm: f64,
    pub l_sa_fm: f64,
    pub l_da_start: f64,
    pub l_da_end: f64,
    pub f_sm: f64,
}

impl AirSchedule {
    /// `air_flow` is the air mass flow of one combustor, kg/s.
    pub fn new(combustor: &Combustor, split: &AirSplit, air_flow: f64) -> Self {
        let c = &combustor.config;
        let l_sz = c.length_secondary_zone();
        let rate = |air: f64, window: f64| {
            if window > 0.0 { air / (window * l_sz) } else { 0.0 }
        };
        Self {
            secondary_slow: rate(split.secondary * air_flow * c.f_sm, c.l_sa_sm),
            secondary_fast: rate(split.secondary * air_flow * (1.0 - c.f_sm), c.l_sa_fm),
            dilution: rate(split.dilution * air_flow, c.l_da_end - c.l_da_start),
            l_sa_sm: c.l_sa_sm,
            l_sa_fm: c.l_sa_fm,
            l_da_start: c.l_da_start,
            l_da_end: c.l_da_end,
            f_sm: c.f_sm,
        }
    }

    /// Air injection rate of `path` at `position = z/L_SZ`, kg/(s·m).
    pub fn injection_rate(&self, path: FlowPath, position: f64) -> f64 {
        let slow_open = position <= self.l_sa_sm;
        let fast_open = position <= self.l_sa_fm;
        let (secondary, dilution_share) = match path {
            FlowPath::SlowMode => (
                if slow_open { self.secondary_slow } else { 0.0 },
                self.f_sm,
            ),
            FlowPath::FastMode => (
                if fast_open { self.secondary_fast } else { 0.0 },
                1.0 - self.f_sm,
            ),
            FlowPath::Joint => (
                if slow_open { self.secondary_slow } else { 0.0 }
                    + if fast_open { self.secondary_fast } else { 0.0 },
                1.0,
            ),
        };
        if secondary > 0.0 {
            secondary
        } else if position >= self.l_da_start && position <= self.l_da_end {
            self.dilution * dilution_share
        } else {
            0.0
        }
    }
}

/// Stream carried by a path.
#[derive(Debug, Clone, PartialEq)]
pub struct PathState {
    pub state: GasState,
    /// kg/s
    pub mass_flow: f64,
    /// fuel that entered the path in the primary zone, kg/s
    pub fuel_flow: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct SecondaryZoneInputs<'a> {
    pub combustor: &'a Combustor,
    pub schedule: &'a AirSchedule,
    /// injected air
    pub air: &'a GasState,
}

/// Marches `path` over the segments in `steps`, starting from `start`.
///
/// A path without flow (`f_SM` of 0 or 1) is passed through unchanged with an empty trace.
pub fn march_path<E: GasEngine>(
    engine: &mut E,
    inputs: &SecondaryZoneInputs,
    path: FlowPath,
    start: PathState,
    steps: Range<usize>,
) -> Result<(PathState, PathTrace), CombustorError> {
    let config = &inputs.combustor.config;
    let fuel = &inputs.combustor.fuel;
    let dz = config.segment_length();
    let area = config.cross_section_area();
    let mut current = start;
    let mut trace = PathTrace {
        path,
        records: Vec::with_capacity(steps.len()),
        mass_flow: current.mass_flow,
        fuel_flow: current.fuel_flow,
    };
    if !(current.mass_flow > 0.0) {
        debug!("{} path carries no flow, skipped", path);
        return Ok((current, trace));
    }

    for step in steps {
        let position = (step + 1) as f64 / config.n_sz as f64;
        let stage = Stage::SecondaryZone {
            path,
            step,
            position,
        };
        let air_added = inputs.schedule.injection_rate(path, position) * dz;
        let residence_time = dz * area * current.state.density() / current.mass_flow;
        if !(residence_time > 0.0) || !residence_time.is_finite() {
            return Err(CombustorError::numerical(
                stage,
                format!("residence time {} s", residence_time),
            ));
        }

        let held = current.state.quantity(current.mass_flow * residence_time);
        let injected = inputs.air.quantity(air_added * residence_time);
        let mixed = held.mix(&injected).at_stage(stage.clone())?;
        let mixed = engine
            .state_from_quantity(&mixed)
            .at_stage(stage.clone())?;
        current.state = engine
            .advance_const_pressure(&mixed, residence_time)
            .at_stage(stage.clone())?;
        current.mass_flow += air_added;

        let precursors =
            precursor_concentrations(&current.state, &fuel.pah).at_stage(stage.clone())?;
        let cv = ControlVolume {
            volume: dz * area,
            mass_flow: current.mass_flow,
            density: current.state.density(),
        };
        let soot = soot_rates(&fuel.pah, &fuel.soot, &precursors, &cv).at_stage(stage.clone())?;
        let soot_mass_flow = bounded_soot_mass_flow(
            &soot,
            current.mass_flow * current.state.carbon_mass_fraction(),
        );
        let emission_indices = emission_indices(
            &current.state,
            current.mass_flow,
            current.fuel_flow,
            soot_mass_flow,
        )
        .at_stage(stage)?;

        trace.records.push(ZoneTraceRecord {
            step,
            position,
            equivalence_ratio: local_equivalence_ratio(
                current.mass_flow,
                current.fuel_flow,
                fuel.stoichiometric_fuel_air_ratio,
            ),
            temperature: current.state.temperature(),
            mass_flow: current.mass_flow,
            air_added,
            residence_time,
            soot_mass_flow,
            emission_indices,
        });
    }
    trace.mass_flow = current.mass_flow;
    if let Some(last) = trace.last() {
        debug!(
            "{} path: z/L_SZ = {:.3}, T = {:.1} K, mdot = {:.4} kg/s",
            path, last.position, last.temperature, last.mass_flow
        );
    }
    Ok((current, trace))
}

/// Flow-weighted adiabatic mixing of the slow and fast mode streams.
pub fn join_paths<E: GasEngine>(
    engine: &mut E,
    slow: &PathState,
    fast: &PathState,
) -> Result<PathState, CombustorError> {
    let mass_flow = slow.mass_flow + fast.mass_flow;
    if !(mass_flow > 0.0) {
        return Err(CombustorError::numerical(
            Stage::JointMixing,
            "no flow reaches the joint mixing station",
        ));
    }
    let mixed = slow
        .state
        .quantity(slow.mass_flow)
        .mix(&fast.state.quantity(fast.mass_flow))
        .at_stage(Stage::JointMixing)?;
    let state = engine
        .state_from_quantity(&mixed)
        .at_stage(Stage::JointMixing)?;
    Ok(PathState {
        state,
        mass_flow,
        fuel_flow: slow.fuel_flow + fast.fuel_flow,
    })
}
