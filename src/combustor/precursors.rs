use crate::errors::KineticsError;
use crate::gas_engine::GasState;
use crate::soot::{PahProperties, PrecursorConcentrations};

fn concentration(state: &GasState, name: &str) -> Result<f64, KineticsError> {
    state
        .concentration(name)
        .ok_or_else(|| KineticsError::MissingSpecies(name.to_string()))
}

/// Molar concentrations (kmol/m³) of the soot precursors and oxidizers in `state`.
///
/// Every PAH species and C2H2, OH, O2, O must be part of the mechanism.
pub fn precursor_concentrations(
    state: &GasState,
    pah: &PahProperties,
) -> Result<PrecursorConcentrations, KineticsError> {
    let pah_concentrations = pah
        .species
        .iter()
        .map(|s| concentration(state, s))
        .collect::<Result<Vec<f64>, _>>()?;
    Ok(PrecursorConcentrations {
        temperature: state.temperature(),
        pah: pah_concentrations,
        c2h2: concentration(state, "C2H2")?,
        oh: concentration(state, "OH")?,
        o2: concentration(state, "O2")?,
        o: concentration(state, "O")?,
    })
}
