#[cfg(test)]
mod tests {
    use crate::gas_engine::{R_U, W_CARBON};
    use crate::soot::*;
    use approx::assert_relative_eq;
    use nalgebra::DMatrix;
    use std::f64::consts::PI;

    fn two_pah() -> PahProperties {
        let m = [78.114, 128.174];
        let c = [6.0, 10.0];
        PahProperties {
            species: vec!["A1".to_string(), "A2".to_string()],
            molar_masses: m.to_vec(),
            radii: vec![2.42e-10, 3.12e-10],
            reduced_masses: DMatrix::from_fn(2, 2, |i, j| m[i] * m[j] / (m[i] + m[j])),
            carbon_counts: DMatrix::from_fn(2, 2, |i, j| c[i] + c[j]),
        }
    }

    fn precursors(pah: Vec<f64>) -> PrecursorConcentrations {
        PrecursorConcentrations {
            temperature: 1800.0,
            pah,
            c2h2: 1e-4,
            oh: 1e-6,
            o2: 1e-5,
            o: 1e-7,
        }
    }

    const CV: ControlVolume = ControlVolume {
        volume: 1e-4,
        mass_flow: 0.1,
        density: 5.0,
    };

    #[test]
    fn zero_pah_gives_numerical_domain_error() {
        let pah = two_pah();
        let res = soot_rates(
            &pah,
            &SootModelFactors::default(),
            &precursors(vec![0.0, 0.0]),
            &CV,
        );
        assert_eq!(res, Err(SootError::ZeroNucleation));
    }

    #[test]
    fn diameter_guard_and_formula() {
        assert_eq!(mean_particle_diameter(1.0, 0.0), Err(SootError::ZeroNucleation));
        assert!(mean_particle_diameter(1.0, f64::NAN).is_err());
        let dp = mean_particle_diameter(2.0e-6, 1.0e15).unwrap();
        let expected = (6.0 * 2.0e-6 / (PI * RHO_SOOT * 1.0e15)).cbrt();
        assert_relative_eq!(dp, expected, max_relative = 1e-12);
        // the particle of diameter dp carries exactly the nucleated mass per particle
        let m_particle = RHO_SOOT * PI * dp.powi(3) / 6.0;
        assert_relative_eq!(m_particle * 1.0e15, 2.0e-6, max_relative = 1e-9);
    }

    #[test]
    fn nucleation_single_species_matches_kernel() {
        let mut pah = two_pah();
        pah.species.truncate(1);
        pah.molar_masses.truncate(1);
        pah.radii.truncate(1);
        pah.reduced_masses = DMatrix::from_element(1, 1, 78.114 / 2.0);
        pah.carbon_counts = DMatrix::from_element(1, 1, 12.0);
        let conc = 1e-8;
        let t = 1500.0;
        let rates = nucleation(&pah, &[conc], t).unwrap();

        let gamma = STICKING_COEFFICIENT_SCALE * 78.114_f64.powi(4);
        let mu = 78.114 / 2.0 / N_A;
        let kernel = (2.0 * 2.42e-10_f64).powi(2) * (8.0 * PI * K_B * t / mu).sqrt();
        let expected = 0.5 * gamma * VDW_ENHANCEMENT * kernel * (conc * N_A).powi(2);
        assert_relative_eq!(rates.number, expected, max_relative = 1e-10);
        assert_relative_eq!(rates.mass, expected * 12.0 * W_CARBON / N_A, max_relative = 1e-10);
    }

    #[test]
    fn sticking_coefficient_is_bounded() {
        assert!(sticking_coefficient(78.0, 78.0) < 1.0);
        assert_relative_eq!(sticking_coefficient(1.0e4, 1.0e4), 1.0);
    }

    #[test]
    fn dimension_mismatch_is_reported() {
        let pah = two_pah();
        let res = nucleation(&pah, &[1e-8], 1500.0);
        assert!(matches!(res, Err(SootError::DimensionMismatch(_))));
    }

    #[test]
    fn negative_concentration_is_rejected() {
        let pah = two_pah();
        let res = nucleation(&pah, &[1e-8, -1e-9], 1500.0);
        assert!(matches!(res, Err(SootError::NonPhysical(_))));
    }

    #[test]
    fn signs_of_rate_groups() {
        let pah = two_pah();
        let rates = soot_rates(
            &pah,
            &SootModelFactors::default(),
            &precursors(vec![1e-8, 1e-9]),
            &CV,
        )
        .unwrap();
        assert!(rates.nucleation.number > 0.0);
        assert!(rates.nucleation.mass > 0.0);
        assert!(rates.particle_diameter > 0.0);
        assert!(rates.acetylene_growth > 0.0);
        assert!(rates.pah_growth > 0.0);
        assert!(rates.coagulation < 0.0);
        assert!(rates.oxidation_oh < 0.0);
        assert!(rates.oxidation_o2 < 0.0);
        assert!(rates.oxidation_o < 0.0);
        assert!(rates.outflow < 0.0);
        assert_relative_eq!(rates.net_mass_flow, rates.net_mass_rate * CV.volume);
    }

    #[test]
    fn factors_weight_the_groups() {
        let pah = two_pah();
        let p = precursors(vec![1e-8, 1e-9]);
        let only_nucleation = SootModelFactors {
            pah_count: 2,
            nuc_fac: 1.0,
            sg_fac: 0.0,
            ox_fac: 0.0,
            m_mech: 0.0,
        };
        let rates = soot_rates(&pah, &only_nucleation, &p, &CV).unwrap();
        assert_relative_eq!(rates.net_mass_rate, rates.nucleation.mass, max_relative = 1e-12);

        let with_outflow = SootModelFactors {
            m_mech: 2.0e-3,
            ..only_nucleation
        };
        let rates2 = soot_rates(&pah, &with_outflow, &p, &CV).unwrap();
        let outflow = -CV.mass_flow / (CV.density * CV.volume) * 2.0e-3;
        assert_relative_eq!(rates2.outflow, outflow, max_relative = 1e-12);
        assert_relative_eq!(
            rates2.net_mass_rate,
            rates.nucleation.mass + outflow,
            max_relative = 1e-9
        );
    }

    #[test]
    fn oxidation_follows_arrhenius_form() {
        let t = 2000.0;
        let a_s = 3.0;
        let ox = oxidation(&OXIDATION_O2, 1e-3, t, a_s);
        let expected = -0.25
            * W_CARBON
            * OXIDATION_O2.efficiency
            * 1e-3
            * (8.0 * R_U * t / (PI * OXIDATION_O2.molar_mass)).sqrt()
            * (-OXIDATION_O2.activation_energy / (R_U * t)).exp()
            * a_s;
        assert_relative_eq!(ox, expected, max_relative = 1e-12);
        // OH has no activation barrier: rate scales with √T
        let r1 = oxidation(&OXIDATION_OH, 1e-6, 1000.0, 1.0);
        let r4 = oxidation(&OXIDATION_OH, 1e-6, 4000.0, 1.0);
        assert_relative_eq!(r4 / r1, 2.0, max_relative = 1e-12);
    }

    #[test]
    fn coagulation_scales_with_number_squared() {
        let c1 = coagulation(1800.0, 2e-9, 1e15);
        let c2 = coagulation(1800.0, 2e-9, 2e15);
        assert_relative_eq!(c2 / c1, 4.0, max_relative = 1e-12);
    }

    #[test]
    fn invalid_control_volume() {
        let pah = two_pah();
        let cv = ControlVolume {
            volume: 0.0,
            ..CV
        };
        let res = soot_rates(
            &pah,
            &SootModelFactors::default(),
            &precursors(vec![1e-8, 1e-9]),
            &cv,
        );
        assert!(matches!(res, Err(SootError::NonPhysical(_))));
    }

    #[test]
    fn acetylene_growth_constant_uses_signed_activation_energy() {
        assert!(ACETYLENE_GROWTH_ACTIVATION_ENERGY < 0.0);
        let t = 1800.0;
        let expected = ACETYLENE_GROWTH_PRE_EXPONENTIAL
            * (ACETYLENE_GROWTH_ACTIVATION_ENERGY / (R_U * t)).exp();
        assert_relative_eq!(acetylene_growth_constant(t), expected, max_relative = 1e-12);
        // barrier: faster when hotter, never above the pre-exponential factor
        assert!(acetylene_growth_constant(2200.0) > acetylene_growth_constant(1200.0));
        assert!(acetylene_growth_constant(6000.0) < ACETYLENE_GROWTH_PRE_EXPONENTIAL);
    }

    #[test]
    fn soot_mass_flow_is_bounded_by_carbon() {
        let pah = two_pah();
        let rates = soot_rates(
            &pah,
            &SootModelFactors::default(),
            &precursors(vec![1e-6, 1e-6]),
            &CV,
        )
        .unwrap();
        assert!(rates.net_mass_flow > 1e-12);
        let carbon = 0.5 * rates.net_mass_flow;
        assert_relative_eq!(bounded_soot_mass_flow(&rates, carbon), carbon);
        let ample = 10.0 * rates.net_mass_flow;
        assert_relative_eq!(bounded_soot_mass_flow(&rates, ample), rates.net_mass_flow);
        assert_eq!(bounded_soot_mass_flow(&rates, 0.0), 0.0);

        let consumed = SootRates {
            net_mass_flow: -1.0,
            ..rates
        };
        assert_eq!(bounded_soot_mass_flow(&consumed, ample), 0.0);
    }
}
