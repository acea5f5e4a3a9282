//! # Lumped Equilibrium Engine
//!
//! A small reference implementation of [`GasEngine`] for a lumped Jet-A1/air species set.
//! It makes the reactor network runnable without an external kinetics package. It is not a
//! predictive kinetics engine.
//!
//! ## Thermochemistry
//! Ideal gas with constant heat capacities (see [`species_data`](super::species_data)):
//! `h = h_f + c_p·(T − T0)`, `s° = s0 + c_p·ln(T/T0)`.
//!
//! ## HP equilibrium
//! 1. Major products for the element budget:
//!    - `O > C`: CO2/CO/H2O/H2/O2 with the two dissociation equilibria
//!      `CO2 ⇌ CO + ½O2` and `H2O ⇌ H2 + ½O2`, solved by bisection on `ln n_O2`
//!      (covers lean mixtures and the water-gas shift region of rich mixtures)
//!    - `O ≤ C`: all oxygen as CO, carbon excess as C2H2, remaining hydrogen as H2
//! 2. Trace species from partial equilibria with the majors, in log form
//!    `ln x_p = ln K_p + Σν_r·ln x_r − Σν_q·ln x_q − Δn·ln(P/P0)`:
//!    O, H, OH, NO, NO2, C2H2 (`2CO + H2 → C2H2 + O2`) and aromatics
//!    (`(c/2)·C2H2 → CcHh + ((c−h)/2)·H2`). Their atoms are taken out of the major budget,
//!    so elements are conserved. Aromatics have their own, lower cap: once oxygen no longer
//!    binds the carbon their equilibrium levels are far above flame measurements.
//! 3. Temperature from the enthalpy balance by bisection.
//!
//! ## Constant-pressure reactor
//! Single time scale relaxation toward the HP equilibrium of the current state:
//! `Y(t) = Y_eq + (Y0 − Y_eq)·exp(−t/τ)`, `τ = τ0·exp(T_a/T_eq)·P0/P`, enthalpy fixed.
use super::species_data::{JET_A1_LUMPED, SpeciesRecord};
use super::{
    ElementCounts, GasEngine, GasEngineProvider, GasState, P_REF, R_U, SpeciesSet, T_REF,
    normalize,
};
use crate::errors::{AtStage, CombustorError, KineticsError, Stage};
use log::debug;
use std::sync::Arc;

/// Mechanism identifier served by [`LumpedEngineProvider`].
pub const LUMPED_JET_A1: &str = "lumped-jet-a1";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LumpedEngineSettings {
    /// τ0, s
    pub relaxation_pre_exponential: f64,
    /// T_a, K
    pub activation_temperature: f64,
    /// temperature bracket of the HP solve, K
    pub min_temperature: f64,
    pub max_temperature: f64,
    /// K
    pub temperature_tolerance: f64,
    pub max_iterations: usize,
    /// passes of the trace/major split
    pub trace_passes: usize,
    /// upper bound of a trace mole fraction
    pub trace_cap: f64,
    /// upper bound of an aromatic mole fraction
    pub aromatic_cap: f64,
    pub mole_fraction_floor: f64,
}

impl Default for LumpedEngineSettings {
    fn default() -> Self {
        Self {
            relaxation_pre_exponential: 1.0e-7,
            activation_temperature: 20_000.0,
            min_temperature: 200.0,
            max_temperature: 6000.0,
            temperature_tolerance: 1.0e-6,
            max_iterations: 200,
            trace_passes: 4,
            trace_cap: 1.0e-2,
            aromatic_cap: 1.0e-4,
            mole_fraction_floor: 1.0e-30,
        }
    }
}

impl LumpedEngineSettings {
    /// Chemical time scale of the constant-pressure reactor, s.
    pub fn relaxation_time(&self, temperature: f64, pressure: f64) -> f64 {
        self.relaxation_pre_exponential
            * (self.activation_temperature / temperature).exp()
            * (P_REF / pressure)
    }
}

/// `Σν_r·R → P + Σν_q·Q`
#[derive(Debug, Clone, PartialEq)]
struct PartialEquilibrium {
    product: usize,
    reactants: Vec<(usize, f64)>,
    coproducts: Vec<(usize, f64)>,
    aromatic: bool,
}

impl PartialEquilibrium {
    fn delta_moles(&self) -> f64 {
        1.0 + self.coproducts.iter().map(|(_, nu)| nu).sum::<f64>()
            - self.reactants.iter().map(|(_, nu)| nu).sum::<f64>()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct MajorSpecies {
    n2: usize,
    o2: usize,
    co2: usize,
    h2o: usize,
    co: usize,
    h2: usize,
    c2h2: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct LumpedEquilibriumEngine {
    species: Arc<SpeciesSet>,
    records: Vec<SpeciesRecord>,
    majors: MajorSpecies,
    traces: Vec<PartialEquilibrium>,
    settings: LumpedEngineSettings,
}

impl LumpedEquilibriumEngine {
    /// Builds an engine over a species table. N2, O2, CO2, H2O, CO and H2 are mandatory.
    pub fn new(
        records: &[SpeciesRecord],
        settings: LumpedEngineSettings,
    ) -> Result<Self, KineticsError> {
        let species = Arc::new(SpeciesSet::new(
            records
                .iter()
                .map(|r| (r.name.to_string(), r.elements))
                .collect(),
        )?);
        let majors = MajorSpecies {
            n2: species.require("N2")?,
            o2: species.require("O2")?,
            co2: species.require("CO2")?,
            h2o: species.require("H2O")?,
            co: species.require("CO")?,
            h2: species.require("H2")?,
            c2h2: species.index_of("C2H2"),
        };
        let traces = Self::trace_reactions(&species, &majors);
        debug!(
            "lumped engine: {} species, {} trace equilibria",
            species.len(),
            traces.len()
        );
        Ok(Self {
            species,
            records: records.to_vec(),
            majors,
            traces,
            settings,
        })
    }

    pub fn jet_a1() -> Result<Self, KineticsError> {
        Self::new(&JET_A1_LUMPED, LumpedEngineSettings::default())
    }

    pub fn settings(&self) -> &LumpedEngineSettings {
        &self.settings
    }

    fn trace_reactions(species: &SpeciesSet, m: &MajorSpecies) -> Vec<PartialEquilibrium> {
        let mut traces = Vec::new();
        let mut push = |name: &str, reactants: Vec<(usize, f64)>, coproducts: Vec<(usize, f64)>| {
            if let Some(product) = species.index_of(name) {
                traces.push(PartialEquilibrium {
                    product,
                    reactants,
                    coproducts,
                    aromatic: false,
                });
            }
        };
        push("O", vec![(m.o2, 0.5)], vec![]);
        push("H", vec![(m.h2, 0.5)], vec![]);
        push("OH", vec![(m.h2, 0.5), (m.o2, 0.5)], vec![]);
        push("NO", vec![(m.n2, 0.5), (m.o2, 0.5)], vec![]);
        push("NO2", vec![(m.n2, 0.5), (m.o2, 1.0)], vec![]);
        push("C2H2", vec![(m.co, 2.0), (m.h2, 1.0)], vec![(m.o2, 1.0)]);
        // aromatics after acetylene, they are formed from it
        if let Some(c2h2) = m.c2h2 {
            for (k, e) in species.elements().iter().enumerate() {
                let aromatic = e.c >= 6.0 && e.h > 0.0 && e.h <= e.c && e.o == 0.0 && e.n == 0.0;
                if aromatic {
                    let coproducts = if e.c > e.h {
                        vec![(m.h2, 0.5 * (e.c - e.h))]
                    } else {
                        vec![]
                    };
                    traces.push(PartialEquilibrium {
                        product: k,
                        reactants: vec![(c2h2, 0.5 * e.c)],
                        coproducts,
                        aromatic: true,
                    });
                }
            }
        }
        traces
    }

    /////////////////////////////THERMO/////////////////////////////////////////
    /// J/kmol
    fn enthalpy_molar(&self, k: usize, t: f64) -> f64 {
        let r = &self.records[k];
        r.enthalpy_formation() + r.heat_capacity() * (t - T_REF)
    }

    /// J/kmol
    fn gibbs_molar(&self, k: usize, t: f64) -> f64 {
        let r = &self.records[k];
        self.enthalpy_molar(k, t) - t * (r.entropy_standard() + r.heat_capacity() * (t / T_REF).ln())
    }

    fn ln_kp(&self, reaction: &PartialEquilibrium, t: f64) -> f64 {
        let dg = self.gibbs_molar(reaction.product, t)
            + reaction
                .coproducts
                .iter()
                .map(|(k, nu)| nu * self.gibbs_molar(*k, t))
                .sum::<f64>()
            - reaction
                .reactants
                .iter()
                .map(|(k, nu)| nu * self.gibbs_molar(*k, t))
                .sum::<f64>();
        -dg / (R_U * t)
    }

    /// ln K_p of `A → B + ½O2`
    fn ln_k_dissociation(&self, reactant: usize, product: usize, t: f64) -> f64 {
        let dg = self.gibbs_molar(product, t) + 0.5 * self.gibbs_molar(self.majors.o2, t)
            - self.gibbs_molar(reactant, t);
        -dg / (R_U * t)
    }

    /// Mixture enthalpy from mass fractions as `a + b·T`, J/kg.
    fn enthalpy_coefficients(&self, mass_fractions: &[f64]) -> (f64, f64) {
        let w = self.species.molar_masses();
        let mut a = 0.0;
        let mut b = 0.0;
        for (k, y) in mass_fractions.iter().enumerate() {
            let r = &self.records[k];
            a += y / w[k] * (r.enthalpy_formation() - r.heat_capacity() * T_REF);
            b += y / w[k] * r.heat_capacity();
        }
        (a, b)
    }

    /// Element atoms in kmol per kg of mixture.
    fn element_moles(&self, mass_fractions: &[f64]) -> ElementCounts {
        let w = self.species.molar_masses();
        let mut b = ElementCounts::default();
        for (k, (y, e)) in mass_fractions.iter().zip(self.species.elements()).enumerate() {
            b.scaled_add(e, y / w[k]);
        }
        b
    }

    ////////////////////////////EQUILIBRIUM/////////////////////////////////////
    /// Major products for an element budget, kmol per kg. The flag is set when C2H2 carries
    /// the carbon excess.
    fn major_products(
        &self,
        budget: &ElementCounts,
        t: f64,
        ln_p: f64,
    ) -> Result<(Vec<f64>, bool), KineticsError> {
        let m = self.majors;
        let mut n = vec![0.0; self.species.len()];
        n[m.n2] = 0.5 * budget.n;

        if budget.o <= budget.c {
            let excess = budget.c - budget.o;
            n[m.co] = budget.o;
            let mut h_left = budget.h;
            if excess > 0.0 {
                let c2h2 = m
                    .c2h2
                    .ok_or_else(|| KineticsError::MissingSpecies("C2H2".to_string()))?;
                n[c2h2] = 0.5 * excess;
                h_left -= excess;
            }
            if h_left < 0.0 {
                return Err(KineticsError::InvalidState(format!(
                    "not enough hydrogen to bind {:.3e} kmol/kg of excess carbon",
                    excess
                )));
            }
            n[m.h2] = 0.5 * h_left;
            return Ok((n, excess > 0.0));
        }

        let ln_k_co2 = self.ln_k_dissociation(m.co2, m.co, t);
        let ln_k_h2o = self.ln_k_dissociation(m.h2o, m.h2, t);
        let fixed = 0.5 * budget.n + budget.c + 0.5 * budget.h;
        // returns oxygen residual and (CO2, CO, H2O, H2)
        let split = |ln_o2: f64| {
            let o2 = ln_o2.exp();
            let ln_sqrt_o2 = 0.5 * ((o2 / (fixed + o2)).ln() + ln_p);
            let r_co = (ln_k_co2 - ln_sqrt_o2).exp();
            let r_h2 = (ln_k_h2o - ln_sqrt_o2).exp();
            let co2 = budget.c / (1.0 + r_co);
            let co = budget.c / (1.0 + 1.0 / r_co);
            let h2o = 0.5 * budget.h / (1.0 + r_h2);
            let h2 = 0.5 * budget.h / (1.0 + 1.0 / r_h2);
            let residual = 2.0 * co2 + co + h2o + 2.0 * o2 - budget.o;
            (residual, [co2, co, h2o, h2])
        };

        let lo = (1.0e-40 * budget.o).ln();
        let hi = if split(lo).0 < 0.0 {
            bisect(
                "oxygen balance of the major products",
                lo,
                (0.5 * budget.o).ln(),
                1.0e-12,
                self.settings.max_iterations,
                |ln_o2| Ok(split(ln_o2).0),
            )?
            .1
        } else {
            lo
        };
        let (_, [co2, co, h2o, h2]) = split(hi);
        n[m.o2] = hi.exp();
        n[m.co2] = co2;
        n[m.co] = co;
        n[m.h2o] = h2o;
        n[m.h2] = h2;
        Ok((n, false))
    }

    /// Trace species in kmol per kg from the partial equilibria with the current mixture.
    fn trace_products(
        &self,
        budget: &ElementCounts,
        moles: &[f64],
        c2h2_major: bool,
        t: f64,
        ln_p: f64,
    ) -> Vec<f64> {
        let floor = self.settings.mole_fraction_floor;
        let total: f64 = moles.iter().sum();
        let mut ln_x: Vec<f64> = moles.iter().map(|n| (n / total).max(floor).ln()).collect();
        let mut trace = vec![0.0; moles.len()];
        for reaction in &self.traces {
            if c2h2_major && Some(reaction.product) == self.majors.c2h2 {
                continue;
            }
            let ln_xp = self.ln_kp(reaction, t)
                + reaction
                    .reactants
                    .iter()
                    .map(|(k, nu)| nu * ln_x[*k])
                    .sum::<f64>()
                - reaction
                    .coproducts
                    .iter()
                    .map(|(k, nu)| nu * ln_x[*k])
                    .sum::<f64>()
                - reaction.delta_moles() * ln_p;
            let cap = if reaction.aromatic {
                self.settings.aromatic_cap
            } else {
                self.settings.trace_cap
            };
            let x = ln_xp.min(cap.ln()).exp();
            ln_x[reaction.product] = x.max(floor).ln();
            trace[reaction.product] = x * total;
        }

        // traces never take more than half of any element
        let elements = self.species.elements();
        for (e, available) in budget.as_array().iter().enumerate() {
            let used: f64 = trace
                .iter()
                .zip(elements)
                .map(|(n, el)| n * el.as_array()[e])
                .sum();
            let limit = 0.5 * available.max(0.0);
            if used > limit {
                let factor = limit / used;
                for (n, el) in trace.iter_mut().zip(elements) {
                    if el.as_array()[e] > 0.0 {
                        *n *= factor;
                    }
                }
            }
        }
        trace
    }

    /// Equilibrium mole fractions at fixed T and P for element totals `b` (kmol/kg).
    fn equilibrium_moles(
        &self,
        b: &ElementCounts,
        t: f64,
        pressure: f64,
    ) -> Result<Vec<f64>, KineticsError> {
        let ln_p = (pressure / P_REF).ln();
        let elements = self.species.elements();
        let mut trace = vec![0.0; self.species.len()];
        let mut pass = 0;
        loop {
            let mut budget = *b;
            for (n, e) in trace.iter().zip(elements) {
                budget.scaled_add(e, -n);
            }
            budget = ElementCounts::new(
                budget.c.max(0.0),
                budget.h.max(0.0),
                budget.o.max(0.0),
                budget.n.max(0.0),
            );
            let (mut moles, c2h2_major) = self.major_products(&budget, t, ln_p)?;
            for (n, tr) in moles.iter_mut().zip(&trace) {
                *n += tr;
            }
            pass += 1;
            if pass >= self.settings.trace_passes {
                return Ok(moles);
            }
            trace = self.trace_products(b, &moles, c2h2_major, t, ln_p);
        }
    }

    fn floored_mole_fractions(&self, moles: &[f64]) -> Result<Vec<f64>, KineticsError> {
        let mut x = moles.to_vec();
        normalize(&mut x)?;
        x.iter_mut()
            .for_each(|v| *v = v.max(self.settings.mole_fraction_floor));
        normalize(&mut x)?;
        Ok(x)
    }

    fn check_mass_fractions(&self, mass_fractions: &[f64]) -> Result<(), KineticsError> {
        if mass_fractions.len() != self.species.len() {
            return Err(KineticsError::InvalidState(format!(
                "{} mass fractions for {} species",
                mass_fractions.len(),
                self.species.len()
            )));
        }
        if let Some(y) = mass_fractions.iter().find(|y| !(**y >= 0.0)) {
            return Err(KineticsError::InvalidState(format!("mass fraction {}", y)));
        }
        Ok(())
    }
}

impl GasEngine for LumpedEquilibriumEngine {
    fn species(&self) -> &Arc<SpeciesSet> {
        &self.species
    }

    fn state_tp(
        &mut self,
        temperature: f64,
        pressure: f64,
        mole_fractions: &[f64],
    ) -> Result<GasState, KineticsError> {
        let mut x = mole_fractions.to_vec();
        normalize(&mut x)?;
        let y = self.species.mole_to_mass(&x);
        let (a, b) = self.enthalpy_coefficients(&y);
        GasState::new(
            self.species.clone(),
            temperature,
            pressure,
            y,
            a + b * temperature,
        )
    }

    fn state_hp(
        &mut self,
        enthalpy_mass: f64,
        pressure: f64,
        mass_fractions: &[f64],
    ) -> Result<GasState, KineticsError> {
        self.check_mass_fractions(mass_fractions)?;
        let (a, b) = self.enthalpy_coefficients(mass_fractions);
        let temperature = (enthalpy_mass - a) / b;
        if !(temperature > 0.0) || !temperature.is_finite() {
            return Err(KineticsError::InvalidState(format!(
                "enthalpy {:.6e} J/kg gives T = {} K",
                enthalpy_mass, temperature
            )));
        }
        GasState::new(
            self.species.clone(),
            temperature,
            pressure,
            mass_fractions.to_vec(),
            enthalpy_mass,
        )
    }

    fn equilibrate_hp(&mut self, state: &GasState) -> Result<GasState, KineticsError> {
        let b = self.element_moles(state.mass_fractions());
        let h_target = state.enthalpy_mass();
        let pressure = state.pressure();
        let residual = |t: f64| -> Result<f64, KineticsError> {
            let moles = self.equilibrium_moles(&b, t, pressure)?;
            let h: f64 = moles
                .iter()
                .enumerate()
                .map(|(k, n)| n * self.enthalpy_molar(k, t))
                .sum();
            Ok(h - h_target)
        };

        let (lo, hi) = (self.settings.min_temperature, self.settings.max_temperature);
        let (r_lo, r_hi) = (residual(lo)?, residual(hi)?);
        if r_lo > 0.0 || r_hi < 0.0 {
            return Err(KineticsError::NonConvergence {
                operation: "HP equilibrium (enthalpy outside temperature bracket)",
                iterations: 0,
                residual: if r_lo > 0.0 { r_lo } else { r_hi },
            });
        }
        let (lo, hi) = bisect(
            "HP equilibrium",
            lo,
            hi,
            self.settings.temperature_tolerance,
            self.settings.max_iterations,
            residual,
        )?;
        let t = 0.5 * (lo + hi);
        let x = self.floored_mole_fractions(&self.equilibrium_moles(&b, t, pressure)?)?;
        GasState::new(
            self.species.clone(),
            t,
            pressure,
            self.species.mole_to_mass(&x),
            h_target,
        )
    }

    fn advance_const_pressure(
        &mut self,
        state: &GasState,
        residence_time: f64,
    ) -> Result<GasState, KineticsError> {
        if !(residence_time >= 0.0) || !residence_time.is_finite() {
            return Err(KineticsError::InvalidState(format!(
                "residence time {} s",
                residence_time
            )));
        }
        let equilibrium = self.equilibrate_hp(state)?;
        let tau = self
            .settings
            .relaxation_time(equilibrium.temperature(), state.pressure());
        let decay = (-residence_time / tau).exp();
        let y: Vec<f64> = equilibrium
            .mass_fractions()
            .iter()
            .zip(state.mass_fractions())
            .map(|(y_eq, y0)| y_eq + (y0 - y_eq) * decay)
            .collect();
        self.state_hp(state.enthalpy_mass(), state.pressure(), &y)
    }
}

/// Bisection of an increasing function with `f(lo) < 0 ≤ f(hi)`; returns the final bracket.
///
/// Both equations of the engine need a bracket: the oxygen balance spans hundreds of
/// e-folds of `n_O2` between lean and rich budgets, and the enthalpy residual in T is
/// piecewise (regime switch at O = C, capped traces).
pub(crate) fn bisect<F>(
    operation: &'static str,
    mut lo: f64,
    mut hi: f64,
    tolerance: f64,
    max_iterations: usize,
    mut f: F,
) -> Result<(f64, f64), KineticsError>
where
    F: FnMut(f64) -> Result<f64, KineticsError>,
{
    let mut iterations = 0;
    while hi - lo > tolerance {
        if iterations >= max_iterations {
            return Err(KineticsError::NonConvergence {
                operation,
                iterations,
                residual: hi - lo,
            });
        }
        let mid = 0.5 * (lo + hi);
        if f(mid)? < 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
        iterations += 1;
    }
    Ok((lo, hi))
}

/// Serves [`LUMPED_JET_A1`].
#[derive(Debug, Clone, Default)]
pub struct LumpedEngineProvider {
    pub settings: LumpedEngineSettings,
}

impl GasEngineProvider for LumpedEngineProvider {
    type Engine = LumpedEquilibriumEngine;

    fn create(&self, mechanism: &str) -> Result<Self::Engine, CombustorError> {
        if mechanism != LUMPED_JET_A1 {
            return Err(CombustorError::Kinetics {
                stage: Stage::EngineSetup,
                source: KineticsError::InvalidMechanism(format!(
                    "'{}' is not known to the lumped engine (expected '{}')",
                    mechanism, LUMPED_JET_A1
                )),
            });
        }
        LumpedEquilibriumEngine::new(&JET_A1_LUMPED, self.settings).at_stage(Stage::EngineSetup)
    }
}
