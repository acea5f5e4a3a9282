//! Typed records produced by one evaluation.
use crate::combustor::emission_index::EmissionIndices;
use crate::combustor::splitter::PrimaryZoneSplit;
use crate::errors::FlowPath;
use crate::gas_engine::GasState;
use crate::soot::SootRates;

/// One primary zone reactor after evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct PsrNode {
    pub index: usize,
    pub equivalence_ratio: f64,
    pub weight: f64,
    /// m³
    pub volume: f64,
    /// s
    pub residence_time: f64,
    pub state: GasState,
    /// kg/s
    pub mass_flow: f64,
    pub air_flow: f64,
    pub fuel_flow: f64,
    pub soot: SootRates,
    /// net soot mass flow clipped at zero, kg/s
    pub soot_mass_flow: f64,
    pub emission_indices: EmissionIndices,
}

/// One marching step of a secondary zone path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneTraceRecord {
    pub step: usize,
    /// z/L_SZ at the end of the step
    pub position: f64,
    pub equivalence_ratio: f64,
    /// K
    pub temperature: f64,
    /// kg/s
    pub mass_flow: f64,
    pub air_added: f64,
    pub residence_time: f64,
    pub soot_mass_flow: f64,
    pub emission_indices: EmissionIndices,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathTrace {
    pub path: FlowPath,
    pub records: Vec<ZoneTraceRecord>,
    /// outlet mass flow, kg/s
    pub mass_flow: f64,
    pub fuel_flow: f64,
}

impl PathTrace {
    pub fn empty(path: FlowPath) -> Self {
        Self {
            path,
            records: Vec::new(),
            mass_flow: 0.0,
            fuel_flow: 0.0,
        }
    }

    pub fn last(&self) -> Option<&ZoneTraceRecord> {
        self.records.last()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryZoneResult {
    pub split: PrimaryZoneSplit,
    pub reactors: Vec<PsrNode>,
    /// temperature of the mixed primary zone stream, K
    pub temperature: f64,
    pub mass_flow: f64,
    pub fuel_flow: f64,
    pub final_emission_indices: EmissionIndices,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SecondaryZoneResult {
    pub slow_mode: PathTrace,
    pub fast_mode: PathTrace,
    pub joint: PathTrace,
    /// combustor exit temperature, K
    pub exit_temperature: f64,
    pub final_emission_indices: EmissionIndices,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationStatus {
    Complete,
    /// the gas engine could not be created and the caller asked for zero emissions instead
    EngineUnavailable { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CombustorResult {
    pub status: EvaluationStatus,
    pub primary_zone: PrimaryZoneResult,
    pub secondary_zone: SecondaryZoneResult,
}

impl CombustorResult {
    /// Zero emission indices and empty traces.
    pub fn zero_emissions(reason: String) -> Self {
        Self {
            status: EvaluationStatus::EngineUnavailable { reason },
            primary_zone: PrimaryZoneResult {
                split: PrimaryZoneSplit {
                    mean_equivalence_ratio: 0.0,
                    sigma: 0.0,
                    reactors: Vec::new(),
                },
                reactors: Vec::new(),
                temperature: 0.0,
                mass_flow: 0.0,
                fuel_flow: 0.0,
                final_emission_indices: EmissionIndices::default(),
            },
            secondary_zone: SecondaryZoneResult {
                slow_mode: PathTrace::empty(FlowPath::SlowMode),
                fast_mode: PathTrace::empty(FlowPath::FastMode),
                joint: PathTrace::empty(FlowPath::Joint),
                exit_temperature: 0.0,
                final_emission_indices: EmissionIndices::default(),
            },
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == EvaluationStatus::Complete
    }

    /// Emission indices at the combustor exit.
    pub fn final_emission_indices(&self) -> EmissionIndices {
        self.secondary_zone.final_emission_indices
    }

    /// `T_max − T_min` over the primary zone reactors, K.
    pub fn psr_temperature_spread(&self) -> f64 {
        let temperatures = self
            .primary_zone
            .reactors
            .iter()
            .map(|r| r.state.temperature());
        let (min, max) = temperatures.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| {
            (lo.min(t), hi.max(t))
        });
        if max >= min { max - min } else { 0.0 }
    }

    pub fn paths(&self) -> [&PathTrace; 3] {
        [
            &self.secondary_zone.slow_mode,
            &self.secondary_zone.fast_mode,
            &self.secondary_zone.joint,
        ]
    }
}
