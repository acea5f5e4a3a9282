//! Emission indices in g per kg of fuel.
//!
//! `EI_k = Y_k·1000·ṁ_total/ṁ_fuel` for CO2, CO and H2O, `EI_NOx` uses `Y_NO + Y_NO2` and
//! `EI_soot = ṁ_soot·1000/ṁ_fuel`. NO and NO2 missing from the mechanism count as zero.
//! A stage without fuel has all indices zero.
use crate::errors::KineticsError;
use crate::gas_engine::GasState;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EmissionIndices {
    pub co2: f64,
    pub co: f64,
    pub h2o: f64,
    pub nox: f64,
    pub soot: f64,
}

impl EmissionIndices {
    pub fn all_non_negative(&self) -> bool {
        [self.co2, self.co, self.h2o, self.nox, self.soot]
            .iter()
            .all(|v| *v >= 0.0)
    }
}

fn required(state: &GasState, name: &str) -> Result<f64, KineticsError> {
    state
        .mass_fraction(name)
        .map(|y| y.max(0.0))
        .ok_or_else(|| KineticsError::MissingSpecies(name.to_string()))
}

/// # Arguments
/// * `state` - gas state of the stage
/// * `mass_flow` - total mass flow through the stage, kg/s
/// * `fuel_flow` - fuel mass flow that entered the stage, kg/s
/// * `soot_mass_flow` - net soot mass flow, kg/s (negative values are clipped)
pub fn emission_indices(
    state: &GasState,
    mass_flow: f64,
    fuel_flow: f64,
    soot_mass_flow: f64,
) -> Result<EmissionIndices, KineticsError> {
    let co2 = required(state, "CO2")?;
    let co = required(state, "CO")?;
    let h2o = required(state, "H2O")?;
    if !(fuel_flow > 0.0) {
        return Ok(EmissionIndices::default());
    }
    let nox = ["NO", "NO2"]
        .iter()
        .filter_map(|s| state.mass_fraction(s))
        .map(|y| y.max(0.0))
        .sum::<f64>();
    let scale = 1000.0 * mass_flow / fuel_flow;
    Ok(EmissionIndices {
        co2: co2 * scale,
        co: co * scale,
        h2o: h2o * scale,
        nox: nox * scale,
        soot: soot_mass_flow.max(0.0) * 1000.0 / fuel_flow,
    })
}

/// Local equivalence ratio of a stream carrying `fuel_flow` of its `mass_flow` as fuel.
pub fn local_equivalence_ratio(mass_flow: f64, fuel_flow: f64, stoichiometric_far: f64) -> f64 {
    let air_flow = mass_flow - fuel_flow;
    if !(fuel_flow > 0.0) || !(air_flow > 0.0) {
        return 0.0;
    }
    fuel_flow / air_flow / stoichiometric_far
}
