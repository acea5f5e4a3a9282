//! # Soot Microphysics Module
//!
//! Stateless rate laws for soot formation and destruction in a control volume. All functions
//! take instantaneous molar concentrations (kmol/m³) of the soot precursors and the local
//! temperature and return volumetric rates; there is no internal iteration and no state.
//!
//! ## Rate laws
//!
//! | Process | Expression |
//! |---------|------------|
//! | nucleation (PAH i + PAH j) | `½^(i=j)·γ_ij·ε·(r_i+r_j)²·√(8πk_BT/μ_ij)·n_i·n_j` |
//! | mean diameter | `dp = (6·M_nuc/(π·ρ_s·N_nuc))^(1/3)` |
//! | surface area | `A_s = π·dp²·N_nuc` |
//! | acetylene growth | `2·W_C·k_G(T)·[C2H2]·A_s`, `k_G = A·exp(E_A/(R_u·T))` |
//! | PAH condensation | `Σ γ_i·ε·(r_i+dp/2)²·√(8πk_BT/μ_i,s)·n_i·N_nuc·c_i·W_C/N_A` |
//! | coagulation | `−C_a·√(24·R_u·T/(ρ_s·N_A))·dp^½·N_nuc²` |
//! | oxidation by X | `−¼·W_C·η_X·[X]·√(8·R_u·T/(π·W_X))·exp(−E_X/(R_u·T))·A_s` |
//!
//! The processes are coupled only through `dp` and `A_s`. The net mass rate weights the
//! groups with the fuel-specific factors of [`SootModelFactors`] and subtracts the convective
//! outflow of the control volume `mdot/(ρ·V)·M_mech`.
use crate::gas_engine::{R_U, W_CARBON};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use thiserror::Error;

mod soot_tests;

/// Avogadro number, 1/kmol
pub const N_A: f64 = 6.02214076e26;
/// Boltzmann constant, J/K
pub const K_B: f64 = R_U / N_A;
/// Soot material density, kg/m³
pub const RHO_SOOT: f64 = 2000.0;
/// van der Waals enhancement of the free-molecular collision kernel
pub const VDW_ENHANCEMENT: f64 = 2.2;
/// Scale of the PAH sticking coefficient γ = C_N·M⁴ (M in kg/kmol)
pub const STICKING_COEFFICIENT_SCALE: f64 = 1.5e-11;
/// Free-molecular coagulation constant
pub const COAGULATION_CONSTANT: f64 = 9.0;
/// Pre-exponential factor of acetylene surface growth, m/s
pub const ACETYLENE_GROWTH_PRE_EXPONENTIAL: f64 = 1.0e4;
/// Activation energy of acetylene surface growth, J/kmol. Negative: enters as `exp(E_A/(R_u·T))`
pub const ACETYLENE_GROWTH_ACTIVATION_ENERGY: f64 = -1.006e8;

/// Empirical constants of one oxidation channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OxidationConstants {
    /// collision efficiency η
    pub efficiency: f64,
    /// activation energy, J/kmol
    pub activation_energy: f64,
    /// molar mass of the oxidizer, kg/kmol
    pub molar_mass: f64,
}

pub const OXIDATION_OH: OxidationConstants = OxidationConstants {
    efficiency: 0.13,
    activation_energy: 0.0,
    molar_mass: 17.007,
};
pub const OXIDATION_O2: OxidationConstants = OxidationConstants {
    efficiency: 10.0,
    activation_energy: 1.636e8,
    molar_mass: 31.998,
};
pub const OXIDATION_O: OxidationConstants = OxidationConstants {
    efficiency: 0.5,
    activation_energy: 0.0,
    molar_mass: 15.999,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SootError {
    #[error("nucleated particle number is zero: mean particle diameter is undefined")]
    ZeroNucleation,
    #[error("PAH data mismatch: {0}")]
    DimensionMismatch(String),
    #[error("non-physical soot model input: {0}")]
    NonPhysical(String),
}

/// Properties of the L PAH species taking part in nucleation and condensation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PahProperties {
    /// species names as known to the gas engine
    pub species: Vec<String>,
    /// kg/kmol
    pub molar_masses: Vec<f64>,
    /// m
    pub radii: Vec<f64>,
    /// pairwise reduced masses, kg/kmol
    #[serde(with = "crate::utils::square_matrix")]
    pub reduced_masses: DMatrix<f64>,
    /// pairwise carbon count of the nucleated dimer
    #[serde(with = "crate::utils::square_matrix")]
    pub carbon_counts: DMatrix<f64>,
}

impl PahProperties {
    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// Checks the vectors and matrices against the number of species and, if given, the
    /// length of a concentration vector.
    pub fn check(&self, n_concentrations: Option<usize>) -> Result<(), SootError> {
        let l = self.len();
        if self.molar_masses.len() != l || self.radii.len() != l {
            return Err(SootError::DimensionMismatch(format!(
                "{} species, {} molar masses, {} radii",
                l,
                self.molar_masses.len(),
                self.radii.len()
            )));
        }
        for (name, m) in [
            ("reduced mass", &self.reduced_masses),
            ("carbon count", &self.carbon_counts),
        ] {
            if m.nrows() != l || m.ncols() != l {
                return Err(SootError::DimensionMismatch(format!(
                    "{} matrix is {}x{}, expected {}x{}",
                    name,
                    m.nrows(),
                    m.ncols(),
                    l,
                    l
                )));
            }
        }
        if let Some(n) = n_concentrations {
            if n != l {
                return Err(SootError::DimensionMismatch(format!(
                    "{} PAH concentrations for {} species",
                    n, l
                )));
            }
        }
        Ok(())
    }

    /// Carbon atoms of a single PAH molecule (half of the dimer diagonal).
    pub fn carbon_atoms(&self, i: usize) -> f64 {
        0.5 * self.carbon_counts[(i, i)]
    }
}

/// Fuel-specific weighting of the rate groups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SootModelFactors {
    /// L, number of PAH species the factors were calibrated for
    pub pah_count: usize,
    pub nuc_fac: f64,
    pub sg_fac: f64,
    pub ox_fac: f64,
    /// scaling of the convective outflow correction, kg/m³
    pub m_mech: f64,
}

impl Default for SootModelFactors {
    fn default() -> Self {
        Self {
            pah_count: 4,
            nuc_fac: 1.0,
            sg_fac: 1.0,
            ox_fac: 1.0,
            m_mech: 1.0e-6,
        }
    }
}

/// Instantaneous precursor concentrations, kmol/m³.
#[derive(Debug, Clone, PartialEq)]
pub struct PrecursorConcentrations {
    pub temperature: f64,
    pub pah: Vec<f64>,
    pub c2h2: f64,
    pub oh: f64,
    pub o2: f64,
    pub o: f64,
}

/// Control volume the rates are integrated over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlVolume {
    /// m³
    pub volume: f64,
    /// kg/s
    pub mass_flow: f64,
    /// kg/m³
    pub density: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NucleationRates {
    /// particles/(m³·s)
    pub number: f64,
    /// kg/(m³·s)
    pub mass: f64,
}

/// Every intermediate of one soot evaluation. Mass rates in kg/(m³·s).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SootRates {
    pub nucleation: NucleationRates,
    /// m
    pub particle_diameter: f64,
    pub surface_area: f64,
    pub acetylene_growth: f64,
    pub pah_growth: f64,
    /// particles/(m³·s), ≤ 0
    pub coagulation: f64,
    pub oxidation_oh: f64,
    pub oxidation_o2: f64,
    pub oxidation_o: f64,
    pub outflow: f64,
    pub net_mass_rate: f64,
    /// kg/s
    pub net_mass_flow: f64,
}

/// Sticking coefficient of a PAH pair, γ_ij = C_N·M_i²·M_j², bounded by one.
pub fn sticking_coefficient(molar_mass_i: f64, molar_mass_j: f64) -> f64 {
    (STICKING_COEFFICIENT_SCALE * molar_mass_i.powi(2) * molar_mass_j.powi(2)).min(1.0)
}

fn free_molecular_kernel(radius_sum: f64, reduced_mass: f64, temperature: f64) -> f64 {
    radius_sum.powi(2) * (8.0 * PI * K_B * temperature / reduced_mass).sqrt()
}

fn check_temperature(temperature: f64) -> Result<(), SootError> {
    if temperature.is_finite() && temperature > 0.0 {
        Ok(())
    } else {
        Err(SootError::NonPhysical(format!(
            "temperature {} K",
            temperature
        )))
    }
}

/// PAH dimerization: number and carbon-mass nucleation rates.
pub fn nucleation(
    pah: &PahProperties,
    concentrations: &[f64],
    temperature: f64,
) -> Result<NucleationRates, SootError> {
    pah.check(Some(concentrations.len()))?;
    check_temperature(temperature)?;
    if let Some(c) = concentrations.iter().find(|c| !(**c >= 0.0)) {
        return Err(SootError::NonPhysical(format!("PAH concentration {}", c)));
    }
    let l = pah.len();
    let mut rates = NucleationRates::default();
    for i in 0..l {
        for j in i..l {
            let n_i = concentrations[i] * N_A;
            let n_j = concentrations[j] * N_A;
            let mu = pah.reduced_masses[(i, j)] / N_A;
            let gamma = sticking_coefficient(pah.molar_masses[i], pah.molar_masses[j]);
            let symmetry = if i == j { 0.5 } else { 1.0 };
            let rate = symmetry
                * gamma
                * VDW_ENHANCEMENT
                * free_molecular_kernel(pah.radii[i] + pah.radii[j], mu, temperature)
                * n_i
                * n_j;
            rates.number += rate;
            rates.mass += rate * pah.carbon_counts[(i, j)] * W_CARBON / N_A;
        }
    }
    Ok(rates)
}

/// Mean diameter of the nucleated particles.
///
/// # Errors
/// [`SootError::ZeroNucleation`] when no particles are nucleated: the diameter is 0/0.
pub fn mean_particle_diameter(mass_nucleation: f64, number_nucleation: f64) -> Result<f64, SootError> {
    if !(number_nucleation > 0.0) {
        return Err(SootError::ZeroNucleation);
    }
    if !(mass_nucleation >= 0.0) {
        return Err(SootError::NonPhysical(format!(
            "nucleated mass {}",
            mass_nucleation
        )));
    }
    Ok((6.0 * mass_nucleation / (PI * RHO_SOOT * number_nucleation)).cbrt())
}

pub fn surface_area(diameter: f64, number: f64) -> f64 {
    PI * diameter.powi(2) * number
}

/// Rate constant of acetylene surface growth `k_G = A·exp(E_A/(R_u·T))`, m/s.
pub fn acetylene_growth_constant(temperature: f64) -> f64 {
    ACETYLENE_GROWTH_PRE_EXPONENTIAL
        * (ACETYLENE_GROWTH_ACTIVATION_ENERGY / (R_U * temperature)).exp()
}

pub fn acetylene_surface_growth(c2h2: f64, temperature: f64, surface_area: f64) -> f64 {
    2.0 * W_CARBON * acetylene_growth_constant(temperature) * c2h2 * surface_area
}

/// Condensation of PAH molecules on the nucleated particles.
pub fn pah_condensation(
    pah: &PahProperties,
    concentrations: &[f64],
    temperature: f64,
    diameter: f64,
    number: f64,
) -> f64 {
    let particle_mass = RHO_SOOT * PI * diameter.powi(3) / 6.0;
    let mut rate = 0.0;
    for i in 0..pah.len() {
        let molecule_mass = pah.molar_masses[i] / N_A;
        let mu = molecule_mass * particle_mass / (molecule_mass + particle_mass);
        let gamma = sticking_coefficient(pah.molar_masses[i], pah.molar_masses[i]);
        let collisions = gamma
            * VDW_ENHANCEMENT
            * free_molecular_kernel(pah.radii[i] + 0.5 * diameter, mu, temperature)
            * concentrations[i]
            * N_A
            * number;
        rate += collisions * pah.carbon_atoms(i) * W_CARBON / N_A;
    }
    rate
}

/// Free-molecular coagulation, particles/(m³·s). Conserves mass, so it only enters the
/// number balance.
pub fn coagulation(temperature: f64, diameter: f64, number: f64) -> f64 {
    -COAGULATION_CONSTANT
        * (24.0 * R_U * temperature / (RHO_SOOT * N_A)).sqrt()
        * diameter.sqrt()
        * number.powi(2)
}

pub fn oxidation(
    constants: &OxidationConstants,
    concentration: f64,
    temperature: f64,
    surface_area: f64,
) -> f64 {
    -0.25
        * W_CARBON
        * constants.efficiency
        * concentration
        * (8.0 * R_U * temperature / (PI * constants.molar_mass)).sqrt()
        * (-constants.activation_energy / (R_U * temperature)).exp()
        * surface_area
}

/// Evaluates every rate law once and assembles the net soot mass rate of the control volume.
///
/// # Errors
/// * [`SootError::ZeroNucleation`] if no PAH pair collides (e.g. all PAH concentrations zero)
/// * [`SootError::DimensionMismatch`] if PAH data and concentrations disagree
/// * [`SootError::NonPhysical`] for non-positive temperature, volume or density
pub fn soot_rates(
    pah: &PahProperties,
    factors: &SootModelFactors,
    precursors: &PrecursorConcentrations,
    cv: &ControlVolume,
) -> Result<SootRates, SootError> {
    if !(cv.volume > 0.0) || !(cv.density > 0.0) || !(cv.mass_flow >= 0.0) {
        return Err(SootError::NonPhysical(format!(
            "control volume V = {} m3, rho = {} kg/m3, mdot = {} kg/s",
            cv.volume, cv.density, cv.mass_flow
        )));
    }
    let t = precursors.temperature;
    let nucleation = nucleation(pah, &precursors.pah, t)?;
    let dp = mean_particle_diameter(nucleation.mass, nucleation.number)?;
    let a_s = surface_area(dp, nucleation.number);

    let acetylene_growth = acetylene_surface_growth(precursors.c2h2, t, a_s);
    let pah_growth = pah_condensation(pah, &precursors.pah, t, dp, nucleation.number);
    let coagulation = coagulation(t, dp, nucleation.number);
    let oxidation_oh = oxidation(&OXIDATION_OH, precursors.oh, t, a_s);
    let oxidation_o2 = oxidation(&OXIDATION_O2, precursors.o2, t, a_s);
    let oxidation_o = oxidation(&OXIDATION_O, precursors.o, t, a_s);
    let outflow = -cv.mass_flow / (cv.density * cv.volume) * factors.m_mech;

    let net_mass_rate = factors.nuc_fac * nucleation.mass
        + factors.sg_fac * (acetylene_growth + pah_growth)
        + factors.ox_fac * (oxidation_oh + oxidation_o2 + oxidation_o)
        + outflow;

    Ok(SootRates {
        nucleation,
        particle_diameter: dp,
        surface_area: a_s,
        acetylene_growth,
        pah_growth,
        coagulation,
        oxidation_oh,
        oxidation_o2,
        oxidation_o,
        outflow,
        net_mass_rate,
        net_mass_flow: net_mass_rate * cv.volume,
    })
}

/// Soot mass flow leaving a control volume, kg/s: the net mass rate clipped to
/// `[0, carbon_mass_flow]`. Soot cannot carry more carbon than the gas brings in.
pub fn bounded_soot_mass_flow(rates: &SootRates, carbon_mass_flow: f64) -> f64 {
    rates
        .net_mass_flow
        .max(0.0)
        .min(carbon_mass_flow.max(0.0))
}
