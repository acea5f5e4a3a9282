//! # Gas Engine Interface
//!
//! The reactor network does not own any thermochemistry. Everything it needs from a gas-phase
//! engine (thermodynamic states, HP equilibrium, constant-pressure reactor relaxation) goes
//! through the [`GasEngine`] trait, and engines are created per unit of work by a
//! [`GasEngineProvider`].
//!
//! ## Ownership model
//!
//! Real engines keep mutable internal state (a gas object that is set, equilibrated and
//! integrated). Here that state never leaks: every method takes the input state by reference
//! and returns a new [`GasState`] value. A handle is `&mut self` so that it cannot be shared
//! by two concurrent evaluations; parallel PSR evaluation creates one handle per worker.
//!
//! ## Main structures
//!
//! - **`SpeciesSet`**: names, molar masses and element counts of the active mechanism
//! - **`GasState`**: immutable thermodynamic state (T, P, Y, X, ρ, h, W̄)
//! - **`StreamQuantity`**: mass + enthalpy + composition, the unit of stream mixing
//! - **`LumpedEquilibriumEngine`**: built-in reference engine, see [`lumped`]
use crate::errors::{CombustorError, KineticsError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

pub mod lumped;
pub mod species_data;

/// Universal gas constant in J/(kmol·K)
pub const R_U: f64 = 8314.462618;
/// Reference pressure of standard-state properties, Pa
pub const P_REF: f64 = 101_325.0;
/// Reference temperature of formation enthalpies, K
pub const T_REF: f64 = 298.15;

/// Atomic weights, kg/kmol
pub const W_CARBON: f64 = 12.011;
pub const W_HYDROGEN: f64 = 1.008;
pub const W_OXYGEN: f64 = 15.999;
pub const W_NITROGEN: f64 = 14.007;

/// Atom counts of one molecule (or element totals of a mixture).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementCounts {
    pub c: f64,
    pub h: f64,
    pub o: f64,
    pub n: f64,
}

impl ElementCounts {
    pub const fn new(c: f64, h: f64, o: f64, n: f64) -> Self {
        Self { c, h, o, n }
    }

    pub fn molar_mass(&self) -> f64 {
        self.c * W_CARBON + self.h * W_HYDROGEN + self.o * W_OXYGEN + self.n * W_NITROGEN
    }

    /// Oxygen atoms needed to burn C to CO2 and H to H2O, net of the oxygen already bound.
    pub fn oxygen_demand(&self) -> f64 {
        2.0 * self.c + 0.5 * self.h - self.o
    }

    /// `[C, H, O, N]`
    pub fn as_array(&self) -> [f64; 4] {
        [self.c, self.h, self.o, self.n]
    }

    pub fn scaled_add(&mut self, other: &ElementCounts, factor: f64) {
        self.c += factor * other.c;
        self.h += factor * other.h;
        self.o += factor * other.o;
        self.n += factor * other.n;
    }
}

/// Species of the active mechanism.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesSet {
    names: Vec<String>,
    molar_masses: Vec<f64>,
    elements: Vec<ElementCounts>,
    index: HashMap<String, usize>,
}

impl SpeciesSet {
    pub fn new(species: Vec<(String, ElementCounts)>) -> Result<Self, KineticsError> {
        let mut index = HashMap::new();
        for (i, (name, _)) in species.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(KineticsError::InvalidMechanism(format!(
                    "duplicate species '{}'",
                    name
                )));
            }
        }
        let molar_masses = species.iter().map(|(_, e)| e.molar_mass()).collect();
        let (names, elements) = species.into_iter().unzip();
        Ok(Self {
            names,
            molar_masses,
            elements,
            index,
        })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn molar_masses(&self) -> &[f64] {
        &self.molar_masses
    }

    pub fn elements(&self) -> &[ElementCounts] {
        &self.elements
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn require(&self, name: &str) -> Result<usize, KineticsError> {
        self.index_of(name)
            .ok_or_else(|| KineticsError::MissingSpecies(name.to_string()))
    }

    /// Dense mole-fraction vector from a (not necessarily normalized) name → fraction map.
    pub fn mole_fractions_from_map(
        &self,
        map: &BTreeMap<String, f64>,
    ) -> Result<Vec<f64>, KineticsError> {
        let mut x = vec![0.0; self.len()];
        for (name, value) in map {
            if !(*value >= 0.0) {
                return Err(KineticsError::InvalidState(format!(
                    "mole fraction of {} is {}",
                    name, value
                )));
            }
            x[self.require(name)?] += value;
        }
        normalize(&mut x)?;
        Ok(x)
    }

    pub fn mole_to_mass(&self, x: &[f64]) -> Vec<f64> {
        let w_mean: f64 = x.iter().zip(&self.molar_masses).map(|(x, w)| x * w).sum();
        x.iter()
            .zip(&self.molar_masses)
            .map(|(x, w)| x * w / w_mean)
            .collect()
    }

    pub fn mass_to_mole(&self, y: &[f64]) -> Vec<f64> {
        let inv_w: f64 = y.iter().zip(&self.molar_masses).map(|(y, w)| y / w).sum();
        y.iter()
            .zip(&self.molar_masses)
            .map(|(y, w)| y / w / inv_w)
            .collect()
    }

    /// Element totals of a mole-fraction vector (atoms per molecule of mixture).
    pub fn element_totals(&self, x: &[f64]) -> ElementCounts {
        let mut totals = ElementCounts::default();
        for (xi, e) in x.iter().zip(&self.elements) {
            totals.scaled_add(e, *xi);
        }
        totals
    }
}

/// Normalizes a vector of fractions to unit sum.
pub fn normalize(v: &mut [f64]) -> Result<(), KineticsError> {
    let sum: f64 = v.iter().sum();
    if !(sum > 0.0) || !sum.is_finite() {
        return Err(KineticsError::InvalidState(format!(
            "composition sums to {}",
            sum
        )));
    }
    v.iter_mut().for_each(|x| *x /= sum);
    Ok(())
}

/// Immutable thermodynamic state of an ideal-gas mixture.
///
/// Only gas engines construct states; the reactor network reads them.
#[derive(Debug, Clone, PartialEq)]
pub struct GasState {
    species: Arc<SpeciesSet>,
    temperature: f64,
    pressure: f64,
    mass_fractions: Vec<f64>,
    mole_fractions: Vec<f64>,
    density: f64,
    enthalpy_mass: f64,
    mean_molecular_weight: f64,
}

impl GasState {
    /// Builds a state from T, P, mass fractions and the specific enthalpy the engine computed
    /// for them. Density follows the ideal-gas law.
    pub fn new(
        species: Arc<SpeciesSet>,
        temperature: f64,
        pressure: f64,
        mass_fractions: Vec<f64>,
        enthalpy_mass: f64,
    ) -> Result<Self, KineticsError> {
        if mass_fractions.len() != species.len() {
            return Err(KineticsError::InvalidState(format!(
                "{} mass fractions for {} species",
                mass_fractions.len(),
                species.len()
            )));
        }
        if !(temperature > 0.0) || !(pressure > 0.0) {
            return Err(KineticsError::InvalidState(format!(
                "T = {} K, P = {} Pa",
                temperature, pressure
            )));
        }
        let inv_w: f64 = mass_fractions
            .iter()
            .zip(species.molar_masses())
            .map(|(y, w)| y / w)
            .sum();
        if !(inv_w > 0.0) {
            return Err(KineticsError::InvalidState("empty composition".to_string()));
        }
        let mean_molecular_weight = 1.0 / inv_w;
        let mole_fractions = species.mass_to_mole(&mass_fractions);
        let density = pressure * mean_molecular_weight / (R_U * temperature);
        Ok(Self {
            species,
            temperature,
            pressure,
            mass_fractions,
            mole_fractions,
            density,
            enthalpy_mass,
            mean_molecular_weight,
        })
    }

    pub fn species(&self) -> &Arc<SpeciesSet> {
        &self.species
    }
    /// K
    pub fn temperature(&self) -> f64 {
        self.temperature
    }
    /// Pa
    pub fn pressure(&self) -> f64 {
        self.pressure
    }
    /// kg/m³
    pub fn density(&self) -> f64 {
        self.density
    }
    /// J/kg
    pub fn enthalpy_mass(&self) -> f64 {
        self.enthalpy_mass
    }
    /// kg/kmol
    pub fn mean_molecular_weight(&self) -> f64 {
        self.mean_molecular_weight
    }
    pub fn mass_fractions(&self) -> &[f64] {
        &self.mass_fractions
    }
    pub fn mole_fractions(&self) -> &[f64] {
        &self.mole_fractions
    }

    pub fn mass_fraction(&self, name: &str) -> Option<f64> {
        self.species.index_of(name).map(|i| self.mass_fractions[i])
    }

    pub fn mole_fraction(&self, name: &str) -> Option<f64> {
        self.species.index_of(name).map(|i| self.mole_fractions[i])
    }

    /// Molar concentration, kmol/m³.
    pub fn concentration(&self, name: &str) -> Option<f64> {
        self.species
            .index_of(name)
            .map(|i| self.density * self.mass_fractions[i] / self.species.molar_masses()[i])
    }

    /// Mass fraction of carbon atoms, `Σ Y_k·c_k·W_C/W_k`.
    pub fn carbon_mass_fraction(&self) -> f64 {
        self.mass_fractions
            .iter()
            .zip(self.species.elements())
            .zip(self.species.molar_masses())
            .map(|((y, e), w)| y * e.c * W_CARBON / w)
            .sum()
    }

    /// The state as a mixable quantity of the given mass.
    pub fn quantity(&self, mass: f64) -> StreamQuantity {
        StreamQuantity {
            mass,
            enthalpy: self.enthalpy_mass,
            pressure: self.pressure,
            mass_fractions: self.mass_fractions.clone(),
        }
    }
}

/// Mass of gas with its specific enthalpy and composition. Mixing conserves mass, total
/// enthalpy and the mass of every species.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamQuantity {
    /// kg
    pub mass: f64,
    /// specific enthalpy, J/kg
    pub enthalpy: f64,
    /// Pa
    pub pressure: f64,
    pub mass_fractions: Vec<f64>,
}

impl StreamQuantity {
    /// J
    pub fn total_enthalpy(&self) -> f64 {
        self.mass * self.enthalpy
    }

    /// Adiabatic mixing of two quantities.
    ///
    /// # Errors
    /// [`KineticsError::InvalidState`] if the compositions belong to different species sets.
    pub fn mix(&self, other: &StreamQuantity) -> Result<StreamQuantity, KineticsError> {
        if self.mass_fractions.len() != other.mass_fractions.len() {
            return Err(KineticsError::InvalidState(format!(
                "mixing quantities of different mechanisms ({} and {} species)",
                self.mass_fractions.len(),
                other.mass_fractions.len()
            )));
        }
        let mass = self.mass + other.mass;
        if mass <= 0.0 {
            return Ok(StreamQuantity { mass, ..self.clone() });
        }
        let (a, b) = (self.mass / mass, other.mass / mass);
        Ok(StreamQuantity {
            mass,
            enthalpy: (self.total_enthalpy() + other.total_enthalpy()) / mass,
            pressure: a * self.pressure + b * other.pressure,
            mass_fractions: self
                .mass_fractions
                .iter()
                .zip(&other.mass_fractions)
                .map(|(ya, yb)| a * ya + b * yb)
                .collect(),
        })
    }

    /// Mixes a sequence of quantities in iteration order. `None` for an empty sequence.
    pub fn mix_all<'a, I>(quantities: I) -> Result<Option<StreamQuantity>, KineticsError>
    where
        I: IntoIterator<Item = &'a StreamQuantity>,
    {
        let mut iter = quantities.into_iter();
        let Some(first) = iter.next() else {
            return Ok(None);
        };
        iter.try_fold(first.clone(), |acc, q| acc.mix(q)).map(Some)
    }
}

/// Gas-phase thermochemistry as seen by the reactor network.
pub trait GasEngine {
    fn species(&self) -> &Arc<SpeciesSet>;

    /// State at given temperature, pressure and mole fractions.
    fn state_tp(
        &mut self,
        temperature: f64,
        pressure: f64,
        mole_fractions: &[f64],
    ) -> Result<GasState, KineticsError>;

    /// State with frozen composition at given specific enthalpy and pressure.
    fn state_hp(
        &mut self,
        enthalpy_mass: f64,
        pressure: f64,
        mass_fractions: &[f64],
    ) -> Result<GasState, KineticsError>;

    /// Chemical equilibrium at the enthalpy and pressure of `state` (adiabatic flame state).
    fn equilibrate_hp(&mut self, state: &GasState) -> Result<GasState, KineticsError>;

    /// Adiabatic constant-pressure reactor started from `state` and advanced by
    /// `residence_time` seconds.
    fn advance_const_pressure(
        &mut self,
        state: &GasState,
        residence_time: f64,
    ) -> Result<GasState, KineticsError>;

    /// Mole fractions of a fuel/oxidizer blend at equivalence ratio `phi`.
    ///
    /// The oxygen demand of the fuel (C → CO2, H → H2O, minus bound O) and the oxygen surplus
    /// of the oxidizer fix the mole ratio `n_fuel/n_ox = phi·surplus_ox/demand_fuel`.
    fn equivalence_ratio_mixture(
        &self,
        phi: f64,
        fuel: &BTreeMap<String, f64>,
        oxidizer: &BTreeMap<String, f64>,
    ) -> Result<Vec<f64>, KineticsError> {
        if !(phi >= 0.0) || !phi.is_finite() {
            return Err(KineticsError::InvalidState(format!(
                "equivalence ratio {}",
                phi
            )));
        }
        let species = self.species();
        let x_fuel = species.mole_fractions_from_map(fuel)?;
        let x_ox = species.mole_fractions_from_map(oxidizer)?;
        let demand = species.element_totals(&x_fuel).oxygen_demand();
        let surplus = -species.element_totals(&x_ox).oxygen_demand();
        if !(demand > 0.0) || !(surplus > 0.0) {
            return Err(KineticsError::InvalidState(format!(
                "fuel oxygen demand {} and oxidizer oxygen surplus {} must be positive",
                demand, surplus
            )));
        }
        let fuel_per_ox = phi * surplus / demand;
        let mut x: Vec<f64> = x_fuel
            .iter()
            .zip(&x_ox)
            .map(|(xf, xo)| fuel_per_ox * xf + xo)
            .collect();
        normalize(&mut x)?;
        Ok(x)
    }

    /// State of a mixed quantity: composition and enthalpy are kept, T follows.
    fn state_from_quantity(&mut self, quantity: &StreamQuantity) -> Result<GasState, KineticsError> {
        self.state_hp(quantity.enthalpy, quantity.pressure, &quantity.mass_fractions)
    }
}

/// Creates engine handles for a kinetic mechanism identifier.
pub trait GasEngineProvider: Sync {
    type Engine: GasEngine + Send;

    /// # Errors
    /// [`CombustorError::EngineUnavailable`] if no engine can be created at all, or
    /// [`CombustorError::Kinetics`] if the mechanism is invalid.
    fn create(&self, mechanism: &str) -> Result<Self::Engine, CombustorError>;
}
