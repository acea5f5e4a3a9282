//! Constant-c_p thermochemical data of the lumped Jet-A1/air species set.
//!
//! | column | unit |
//! |--------|------|
//! | `hf` formation enthalpy at 298.15 K | kJ/mol |
//! | `s0` standard entropy at 298.15 K, 1 atm | J/(mol·K) |
//! | `cp` mean heat capacity over 300–2500 K | J/(mol·K) |
use super::ElementCounts;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeciesRecord {
    pub name: &'static str,
    pub elements: ElementCounts,
    pub hf: f64,
    pub s0: f64,
    pub cp: f64,
}

impl SpeciesRecord {
    /// J/kmol
    pub fn enthalpy_formation(&self) -> f64 {
        self.hf * 1.0e6
    }
    /// J/(kmol·K)
    pub fn entropy_standard(&self) -> f64 {
        self.s0 * 1.0e3
    }
    /// J/(kmol·K)
    pub fn heat_capacity(&self) -> f64 {
        self.cp * 1.0e3
    }
}

const fn record(name: &'static str, c: f64, h: f64, o: f64, n: f64, hf: f64, s0: f64, cp: f64) -> SpeciesRecord {
    SpeciesRecord {
        name,
        elements: ElementCounts::new(c, h, o, n),
        hf,
        s0,
        cp,
    }
}

pub const JET_A1_LUMPED: [SpeciesRecord; 19] = [
    record("N2", 0.0, 0.0, 0.0, 2.0, 0.0, 191.6, 33.0),
    record("O2", 0.0, 0.0, 2.0, 0.0, 0.0, 205.2, 35.5),
    record("CO2", 1.0, 0.0, 2.0, 0.0, -393.5, 213.8, 54.0),
    record("H2O", 0.0, 2.0, 1.0, 0.0, -241.8, 188.8, 43.0),
    record("CO", 1.0, 0.0, 1.0, 0.0, -110.5, 197.7, 33.8),
    record("H2", 0.0, 2.0, 0.0, 0.0, 0.0, 130.7, 31.5),
    record("OH", 0.0, 1.0, 1.0, 0.0, 39.0, 183.7, 32.5),
    record("O", 0.0, 0.0, 1.0, 0.0, 249.2, 161.1, 20.9),
    record("H", 0.0, 1.0, 0.0, 0.0, 218.0, 114.7, 20.8),
    record("NO", 0.0, 0.0, 1.0, 1.0, 90.3, 210.8, 34.5),
    record("NO2", 0.0, 0.0, 2.0, 1.0, 33.1, 240.1, 52.0),
    record("C2H2", 2.0, 2.0, 0.0, 0.0, 226.7, 200.9, 65.0),
    record("A1", 6.0, 6.0, 0.0, 0.0, 82.9, 269.2, 160.0),
    record("A2", 10.0, 8.0, 0.0, 0.0, 150.6, 333.1, 245.0),
    record("A3", 14.0, 10.0, 0.0, 0.0, 207.5, 395.0, 330.0),
    record("A4", 16.0, 10.0, 0.0, 0.0, 225.7, 405.0, 360.0),
    record("NC12H26", 12.0, 26.0, 0.0, 0.0, -290.9, 622.5, 480.0),
    record("C9H12", 9.0, 12.0, 0.0, 0.0, 7.9, 400.7, 270.0),
    record("C9H18", 9.0, 18.0, 0.0, 0.0, -193.3, 453.0, 330.0),
];
