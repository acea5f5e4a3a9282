//! Statistical split of the primary zone into N_PZ reactors.
//!
//! The local equivalence ratio is assumed normally distributed around φ̄ with σ = φ̄·S_PZ.
//! The reactors sit on an even grid over [φ̄ − 2σ, φ̄ + 2σ] and carry the pdf mass of their
//! grid cell, normalized to one.
use crate::errors::CombustorError;
use serde::Serialize;
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SplitReactor {
    pub equivalence_ratio: f64,
    /// share of the primary zone air and volume
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrimaryZoneSplit {
    pub mean_equivalence_ratio: f64,
    pub sigma: f64,
    pub reactors: Vec<SplitReactor>,
}

impl PrimaryZoneSplit {
    pub fn weight_sum(&self) -> f64 {
        self.reactors.iter().map(|r| r.weight).sum()
    }
}

fn gaussian_pdf(x: f64, mean: f64, sigma: f64) -> f64 {
    (-0.5 * ((x - mean) / sigma).powi(2)).exp() / (sigma * (2.0 * PI).sqrt())
}

/// # Errors
/// [`CombustorError::Configuration`] for `n_pz = 0`, negative or non-finite `s_pz`/`mean`, and
/// for distributions whose lower 2σ bound is a negative equivalence ratio.
///
/// σ = 0 (or a single reactor) is a valid degenerate split: every reactor runs at φ̄ with
/// equal weight.
pub fn split_primary_zone(
    n_pz: usize,
    mean_equivalence_ratio: f64,
    s_pz: f64,
) -> Result<PrimaryZoneSplit, CombustorError> {
    if n_pz == 0 {
        return Err(CombustorError::configuration(
            "cannot split the primary zone into zero reactors",
        ));
    }
    if !(mean_equivalence_ratio >= 0.0) || !mean_equivalence_ratio.is_finite() {
        return Err(CombustorError::configuration(format!(
            "mean primary zone equivalence ratio {}",
            mean_equivalence_ratio
        )));
    }
    if !(s_pz >= 0.0) || !s_pz.is_finite() {
        return Err(CombustorError::configuration(format!("S_PZ = {}", s_pz)));
    }
    let sigma = mean_equivalence_ratio * s_pz;

    if sigma == 0.0 || n_pz == 1 {
        let weight = 1.0 / n_pz as f64;
        return Ok(PrimaryZoneSplit {
            mean_equivalence_ratio,
            sigma,
            reactors: vec![
                SplitReactor {
                    equivalence_ratio: mean_equivalence_ratio,
                    weight,
                };
                n_pz
            ],
        });
    }

    let lower = mean_equivalence_ratio - 2.0 * sigma;
    let upper = mean_equivalence_ratio + 2.0 * sigma;
    if lower < 0.0 {
        return Err(CombustorError::configuration(format!(
            "S_PZ = {} puts the lower 2σ bound at φ = {:.4}",
            s_pz, lower
        )));
    }
    let step = (upper - lower) / (n_pz - 1) as f64;
    let mut reactors: Vec<SplitReactor> = (0..n_pz)
        .map(|i| {
            let phi = lower + i as f64 * step;
            SplitReactor {
                equivalence_ratio: phi,
                weight: gaussian_pdf(phi, mean_equivalence_ratio, sigma) * step.abs(),
            }
        })
        .collect();
    let total: f64 = reactors.iter().map(|r| r.weight).sum();
    reactors.iter_mut().for_each(|r| r.weight /= total);

    Ok(PrimaryZoneSplit {
        mean_equivalence_ratio,
        sigma,
        reactors,
    })
}
