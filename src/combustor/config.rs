//! # Combustor, fuel and oxidizer data
//!
//! Input records of one evaluation. All three are plain serde structs so they can be read
//! from a task file (see [`crate::utils::task_file`]); presets reproduce the Jet-A1 / air
//! validation case.
//!
//! ## Air split
//! The take-off design point fixes how the combustor air is distributed:
//!
//! | Fraction | Expression |
//! |----------|------------|
//! | primary zone | `f_PZ = FAR_TO/(φ_PZ,des·FAR_st)` |
//! | secondary air | `f_SA = FAR_TO/(φ_SZ,des·FAR_st) − f_PZ` |
//! | dilution air | `f_DA = 1 − f_PZ − f_SA` |
use crate::errors::CombustorError;
use crate::gas_engine::lumped::LUMPED_JET_A1;
use crate::soot::{PahProperties, SootModelFactors};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::f64::consts::PI;

/// Geometry, zone parameters and the take-off design point of one combustor can.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombustorConfig {
    /// m
    pub diameter: f64,
    /// total length, m
    pub length: f64,
    /// primary zone length L_PZ, m
    pub length_primary_zone: f64,
    /// number of PSRs in the primary zone
    pub n_pz: usize,
    /// number of secondary zone segments
    pub n_sz: usize,
    pub design_equivalence_ratio_pz: f64,
    /// mixing parameter, σ = φ̄·S_PZ
    pub s_pz: f64,
    /// fuel scaler of the primary zone
    pub f_sc: f64,
    /// slow-mode share of the primary zone flow
    pub f_sm: f64,
    /// end of secondary air injection (fraction of L_SZ), slow mode
    pub l_sa_sm: f64,
    /// end of secondary air injection (fraction of L_SZ), fast mode
    pub l_sa_fm: f64,
    pub l_da_start: f64,
    pub l_da_end: f64,
    /// fraction of the N_SZ segments marched before the two paths join
    pub joint_mixing_fraction: f64,
    pub design_equivalence_ratio_sz: f64,
    /// kg/s, all combustors
    pub air_mass_flow_rate_take_off: f64,
    pub fuel_to_air_ratio_take_off: f64,
    pub number_of_combustors: usize,
}

impl Default for CombustorConfig {
    fn default() -> Self {
        Self {
            diameter: 0.15,
            length: 0.35,
            length_primary_zone: 0.08,
            n_pz: 21,
            n_sz: 500,
            design_equivalence_ratio_pz: 1.71,
            s_pz: 0.39,
            f_sc: 1.0,
            f_sm: 0.6,
            l_sa_sm: 0.55,
            l_sa_fm: 0.3,
            l_da_start: 0.7,
            l_da_end: 1.0,
            joint_mixing_fraction: 0.6,
            design_equivalence_ratio_sz: 0.61,
            air_mass_flow_rate_take_off: 40.0,
            fuel_to_air_ratio_take_off: 0.025,
            number_of_combustors: 12,
        }
    }
}

fn positive(name: &str, value: f64) -> Result<(), CombustorError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CombustorError::configuration(format!(
            "{} must be positive and finite, got {}",
            name, value
        )))
    }
}

fn fraction(name: &str, value: f64) -> Result<(), CombustorError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(CombustorError::configuration(format!(
            "{} must lie in [0, 1], got {}",
            name, value
        )))
    }
}

impl CombustorConfig {
    /// L_SZ, m
    pub fn length_secondary_zone(&self) -> f64 {
        self.length - self.length_primary_zone
    }

    /// m²
    pub fn cross_section_area(&self) -> f64 {
        0.25 * PI * self.diameter.powi(2)
    }

    /// m³
    pub fn volume_primary_zone(&self) -> f64 {
        self.cross_section_area() * self.length_primary_zone
    }

    /// dz, m
    pub fn segment_length(&self) -> f64 {
        self.length_secondary_zone() / self.n_sz as f64
    }

    /// Number of segments marched separately by the slow and fast mode paths.
    pub fn join_step(&self) -> usize {
        ((self.joint_mixing_fraction * self.n_sz as f64).floor() as usize).min(self.n_sz)
    }

    pub fn validate(&self) -> Result<(), CombustorError> {
        if self.n_pz == 0 {
            return Err(CombustorError::configuration(
                "N_PZ must be at least 1 (no primary zone reactors)",
            ));
        }
        if self.n_sz == 0 {
            return Err(CombustorError::configuration(
                "N_SZ must be at least 1 (no secondary zone segments)",
            ));
        }
        if self.number_of_combustors == 0 {
            return Err(CombustorError::configuration(
                "number_of_combustors must be at least 1",
            ));
        }
        positive("diameter", self.diameter)?;
        positive("length_primary_zone", self.length_primary_zone)?;
        positive("secondary zone length (length - length_primary_zone)", self.length_secondary_zone())?;
        positive("design_equivalence_ratio_pz", self.design_equivalence_ratio_pz)?;
        positive("design_equivalence_ratio_sz", self.design_equivalence_ratio_sz)?;
        positive("f_sc", self.f_sc)?;
        positive("air_mass_flow_rate_take_off", self.air_mass_flow_rate_take_off)?;
        positive("fuel_to_air_ratio_take_off", self.fuel_to_air_ratio_take_off)?;
        if !(self.s_pz >= 0.0) || !self.s_pz.is_finite() {
            return Err(CombustorError::configuration(format!(
                "S_PZ must be non-negative, got {}",
                self.s_pz
            )));
        }
        fraction("f_sm", self.f_sm)?;
        fraction("l_sa_sm", self.l_sa_sm)?;
        fraction("l_sa_fm", self.l_sa_fm)?;
        fraction("l_da_start", self.l_da_start)?;
        fraction("l_da_end", self.l_da_end)?;
        fraction("joint_mixing_fraction", self.joint_mixing_fraction)?;
        if !(self.l_da_start < self.l_da_end) {
            return Err(CombustorError::configuration(format!(
                "dilution window [{}, {}] is empty",
                self.l_da_start, self.l_da_end
            )));
        }
        Ok(())
    }
}

/// Air fractions of the primary zone, secondary air and dilution air.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AirSplit {
    pub primary: f64,
    pub secondary: f64,
    pub dilution: f64,
}

impl AirSplit {
    /// # Errors
    /// [`CombustorError::Configuration`] if any fraction falls outside [0, 1], i.e. the design
    /// equivalence ratios are inconsistent with the take-off fuel-air ratio.
    pub fn new(config: &CombustorConfig, stoichiometric_far: f64) -> Result<Self, CombustorError> {
        positive("stoichiometric_fuel_air_ratio", stoichiometric_far)?;
        let far_to = config.fuel_to_air_ratio_take_off;
        let primary = far_to / (config.design_equivalence_ratio_pz * stoichiometric_far);
        let secondary = far_to / (config.design_equivalence_ratio_sz * stoichiometric_far) - primary;
        let split = Self {
            primary,
            secondary,
            dilution: 1.0 - primary - secondary,
        };
        fraction("primary zone air fraction", split.primary)?;
        fraction("secondary air fraction", split.secondary)?;
        fraction("dilution air fraction", split.dilution)?;
        Ok(split)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelSpec {
    pub name: String,
    /// passed through to the gas engine provider
    pub kinetic_mechanism: String,
    pub stoichiometric_fuel_air_ratio: f64,
    /// J/kg
    pub heat_of_vaporization: f64,
    /// liquid fuel temperature, K
    pub temperature: f64,
    /// Pa
    pub pressure: f64,
    /// J/(kg·K)
    pub liquid_heat_capacity: f64,
    /// surrogate mole fractions
    pub surrogate: BTreeMap<String, f64>,
    pub soot: SootModelFactors,
    pub pah: PahProperties,
}

impl FuelSpec {
    /// Three-component Jet-A1 surrogate on the lumped mechanism, PAH set A1..A4.
    pub fn jet_a1() -> Self {
        let species = ["A1", "A2", "A3", "A4"];
        let molar_masses = [78.114, 128.174, 178.234, 202.256];
        let carbons = [6.0, 10.0, 14.0, 16.0];
        // radius of a peri-condensed PAH from its carbon count
        let radii = carbons
            .iter()
            .map(|n_c: &f64| 0.5 * 2.416e-10 * (2.0 * n_c / 3.0).sqrt())
            .collect();
        let l = species.len();
        Self {
            name: "Jet-A1".to_string(),
            kinetic_mechanism: LUMPED_JET_A1.to_string(),
            stoichiometric_fuel_air_ratio: 0.068,
            heat_of_vaporization: 360.0e3,
            temperature: 300.0,
            pressure: 101_325.0,
            liquid_heat_capacity: 2000.0,
            surrogate: BTreeMap::from([
                ("NC12H26".to_string(), 0.6),
                ("C9H12".to_string(), 0.2),
                ("C9H18".to_string(), 0.2),
            ]),
            soot: SootModelFactors::default(),
            pah: PahProperties {
                species: species.iter().map(|s| s.to_string()).collect(),
                molar_masses: molar_masses.to_vec(),
                radii,
                reduced_masses: DMatrix::from_fn(l, l, |i, j| {
                    molar_masses[i] * molar_masses[j] / (molar_masses[i] + molar_masses[j])
                }),
                carbon_counts: DMatrix::from_fn(l, l, |i, j| carbons[i] + carbons[j]),
            },
        }
    }

    pub fn validate(&self) -> Result<(), CombustorError> {
        positive("stoichiometric_fuel_air_ratio", self.stoichiometric_fuel_air_ratio)?;
        positive("fuel temperature", self.temperature)?;
        positive("fuel pressure", self.pressure)?;
        if !(self.heat_of_vaporization >= 0.0) || !(self.liquid_heat_capacity >= 0.0) {
            return Err(CombustorError::configuration(format!(
                "heat of vaporization {} and liquid heat capacity {} must be non-negative",
                self.heat_of_vaporization, self.liquid_heat_capacity
            )));
        }
        check_surrogate("fuel", &self.surrogate)?;
        self.pah
            .check(None)
            .map_err(|e| CombustorError::configuration(e.to_string()))?;
        if self.pah.is_empty() {
            return Err(CombustorError::configuration("no PAH species given"));
        }
        if self.soot.pah_count != self.pah.len() {
            return Err(CombustorError::configuration(format!(
                "soot model calibrated for {} PAH species, {} given",
                self.soot.pah_count,
                self.pah.len()
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OxidizerSpec {
    /// surrogate mole fractions
    pub surrogate: BTreeMap<String, f64>,
}

impl OxidizerSpec {
    pub fn air() -> Self {
        Self {
            surrogate: BTreeMap::from([("O2".to_string(), 0.21), ("N2".to_string(), 0.79)]),
        }
    }

    pub fn validate(&self) -> Result<(), CombustorError> {
        check_surrogate("oxidizer", &self.surrogate)
    }
}

fn check_surrogate(what: &str, surrogate: &BTreeMap<String, f64>) -> Result<(), CombustorError> {
    if let Some((name, x)) = surrogate.iter().find(|(_, x)| !(**x >= 0.0) || !x.is_finite()) {
        return Err(CombustorError::configuration(format!(
            "{} mole fraction of {} is {}",
            what, name, x
        )));
    }
    if !(surrogate.values().sum::<f64>() > 0.0) {
        return Err(CombustorError::configuration(format!(
            "{} surrogate is empty",
            what
        )));
    }
    Ok(())
}

/// Everything that describes the combustor itself, independent of the operating point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combustor {
    pub config: CombustorConfig,
    pub fuel: FuelSpec,
    pub oxidizer: OxidizerSpec,
}

impl Combustor {
    pub fn jet_a1_default() -> Self {
        Self {
            config: CombustorConfig::default(),
            fuel: FuelSpec::jet_a1(),
            oxidizer: OxidizerSpec::air(),
        }
    }

    pub fn validate(&self) -> Result<AirSplit, CombustorError> {
        self.config.validate()?;
        self.fuel.validate()?;
        self.oxidizer.validate()?;
        AirSplit::new(&self.config, self.fuel.stoichiometric_fuel_air_ratio)
    }
}
