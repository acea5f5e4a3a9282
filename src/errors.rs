//! # Error types
//!
//! Every stage of the reactor network returns `Result<_, CombustorError>`. Failures of the
//! external gas engine are reported as [`KineticsError`] and wrapped together with the
//! [`Stage`] at which they happened, so a failed evaluation always tells which reactor or
//! which marching step broke.
use crate::soot::SootError;
use std::fmt;
use thiserror::Error;

/// Secondary-zone flow path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowPath {
    SlowMode,
    FastMode,
    Joint,
}

impl fmt::Display for FlowPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FlowPath::SlowMode => "slow mode",
            FlowPath::FastMode => "fast mode",
            FlowPath::Joint => "joint",
        };
        write!(f, "{}", s)
    }
}

/// Location inside the evaluation pipeline where an error was raised.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    EngineSetup,
    PrimaryZoneReactor { index: usize },
    ZoneMixer,
    SecondaryZone { path: FlowPath, step: usize, position: f64 },
    JointMixing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::EngineSetup => write!(f, "gas engine setup"),
            Stage::PrimaryZoneReactor { index } => write!(f, "primary zone PSR #{}", index),
            Stage::ZoneMixer => write!(f, "primary zone mixer"),
            Stage::SecondaryZone {
                path,
                step,
                position,
            } => write!(
                f,
                "secondary zone ({}) step {} at z/L_SZ = {:.4}",
                path, step, position
            ),
            Stage::JointMixing => write!(f, "joint mixing"),
        }
    }
}

/// Failures reported by a gas-phase thermochemistry engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KineticsError {
    #[error("{operation} did not converge after {iterations} iterations (residual {residual:.3e})")]
    NonConvergence {
        operation: &'static str,
        iterations: usize,
        residual: f64,
    },
    #[error("species '{0}' is not part of the active mechanism")]
    MissingSpecies(String),
    #[error("invalid mechanism: {0}")]
    InvalidMechanism(String),
    #[error("invalid gas state: {0}")]
    InvalidState(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CombustorError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("kinetics engine failed in {stage}: {source}")]
    Kinetics {
        stage: Stage,
        #[source]
        source: KineticsError,
    },
    #[error("numerical domain error in {stage}: {message}")]
    NumericalDomain { stage: Stage, message: String },
    #[error("gas engine unavailable for mechanism '{mechanism}': {reason}")]
    EngineUnavailable { mechanism: String, reason: String },
    #[error("task file error: {0}")]
    TaskFile(String),
}

impl CombustorError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        CombustorError::Configuration(msg.into())
    }

    pub fn numerical(stage: Stage, msg: impl Into<String>) -> Self {
        CombustorError::NumericalDomain {
            stage,
            message: msg.into(),
        }
    }
}

/// Attaches the pipeline stage to lower-level errors.
pub trait AtStage<T> {
    fn at_stage(self, stage: Stage) -> Result<T, CombustorError>;
}

impl<T> AtStage<T> for Result<T, KineticsError> {
    fn at_stage(self, stage: Stage) -> Result<T, CombustorError> {
        self.map_err(|source| CombustorError::Kinetics { stage, source })
    }
}

impl<T> AtStage<T> for Result<T, SootError> {
    fn at_stage(self, stage: Stage) -> Result<T, CombustorError> {
        self.map_err(|e| CombustorError::NumericalDomain {
            stage,
            message: e.to_string(),
        })
    }
}
