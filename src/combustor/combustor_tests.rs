#[cfg(test)]
mod tests {
    use crate::combustor::config::*;
    use crate::combustor::emission_index::{emission_indices, local_equivalence_ratio};
    use crate::combustor::evaluate::*;
    use crate::combustor::precursors::precursor_concentrations;
    use crate::combustor::psr_network::{InletConditions, PrimaryZoneInputs, evaluate_reactor};
    use crate::combustor::results::{CombustorResult, EvaluationStatus};
    use crate::combustor::secondary_zone::AirSchedule;
    use crate::combustor::splitter::split_primary_zone;
    use crate::combustor::zone_mixer::mix_primary_zone;
    use crate::errors::{AtStage, CombustorError, FlowPath, KineticsError, Stage};
    use crate::gas_engine::lumped::{LumpedEngineProvider, LumpedEquilibriumEngine};
    use crate::gas_engine::species_data::{JET_A1_LUMPED, SpeciesRecord};
    use crate::gas_engine::{ElementCounts, GasEngine, GasEngineProvider, GasState, SpeciesSet};
    use crate::soot::{ControlVolume, PrecursorConcentrations, soot_rates};
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn small_combustor() -> Combustor {
        let mut combustor = Combustor::jet_a1_default();
        combustor.config.n_pz = 5;
        combustor.config.n_sz = 20;
        combustor
    }

    fn take_off(combustor: &Combustor) -> OperatingPoint {
        OperatingPoint::take_off(&combustor.config, 710.0, 2.6e6)
    }

    fn run(combustor: &Combustor, op: &OperatingPoint) -> Result<CombustorResult, CombustorError> {
        evaluate(
            combustor,
            op,
            &LumpedEngineProvider::default(),
            &EvaluationOptions::default(),
        )
    }

    fn fuel_carbon_mass_fraction(combustor: &Combustor) -> f64 {
        let mut engine = LumpedEquilibriumEngine::jet_a1().unwrap();
        let x = engine
            .species()
            .mole_fractions_from_map(&combustor.fuel.surrogate)
            .unwrap();
        engine.state_tp(300.0, 101_325.0, &x).unwrap().carbon_mass_fraction()
    }

    /// Soot never carries more carbon than the fuel brought in, and rich reactors make some.
    fn assert_soot_bounded_by_carbon(combustor: &Combustor, result: &CombustorResult) {
        let ei_max = 1000.0 * fuel_carbon_mass_fraction(combustor) * (1.0 + 1e-6);
        for node in &result.primary_zone.reactors {
            let carbon_flow = node.mass_flow * node.state.carbon_mass_fraction();
            assert!(node.soot_mass_flow.is_finite(), "PSR {}", node.index);
            assert!(node.soot_mass_flow <= carbon_flow * (1.0 + 1e-12), "PSR {}", node.index);
            assert!(node.soot_mass_flow <= node.mass_flow, "PSR {}", node.index);
            assert!(node.emission_indices.soot <= ei_max, "PSR {}", node.index);
        }
        assert!(
            result
                .primary_zone
                .reactors
                .iter()
                .any(|node| node.equivalence_ratio > 1.0 && node.emission_indices.soot > 0.0)
        );
        for trace in result.paths() {
            for r in &trace.records {
                assert!(r.soot_mass_flow <= r.mass_flow, "{:?}", r);
                assert!(r.emission_indices.soot <= ei_max, "{:?}", r);
            }
        }
        for ei in [
            result.primary_zone.final_emission_indices.soot,
            result.final_emission_indices().soot,
        ] {
            assert!(ei.is_finite() && ei >= 0.0 && ei <= ei_max, "EI soot {}", ei);
        }
    }

    struct MissingEngineProvider;

    impl GasEngineProvider for MissingEngineProvider {
        type Engine = LumpedEquilibriumEngine;

        fn create(&self, mechanism: &str) -> Result<Self::Engine, CombustorError> {
            Err(CombustorError::EngineUnavailable {
                mechanism: mechanism.to_string(),
                reason: "no thermochemistry backend installed".to_string(),
            })
        }
    }

    ////////////////////////////////SPLITTER/////////////////////////////////////
    #[test]
    fn test_split_weights_sum_to_one() {
        for n_pz in [2, 5, 21, 100] {
            for s_pz in [0.05, 0.2, 0.39, 0.5] {
                let split = split_primary_zone(n_pz, 1.71, s_pz).unwrap();
                assert_eq!(split.reactors.len(), n_pz);
                assert_relative_eq!(split.weight_sum(), 1.0, epsilon = 1e-9);
                let first = split.reactors[0];
                let last = split.reactors[n_pz - 1];
                assert_relative_eq!(first.weight, last.weight, max_relative = 1e-9);
                assert_relative_eq!(first.equivalence_ratio, 1.71 * (1.0 - 2.0 * s_pz), epsilon = 1e-12);
                assert_relative_eq!(last.equivalence_ratio, 1.71 * (1.0 + 2.0 * s_pz), epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_split_peaks_at_mean() {
        let split = split_primary_zone(21, 1.71, 0.39).unwrap();
        let center = split.reactors[10];
        assert_relative_eq!(center.equivalence_ratio, 1.71, epsilon = 1e-12);
        assert!(split.reactors.iter().all(|r| r.weight <= center.weight));
        assert_relative_eq!(split.sigma, 1.71 * 0.39);
    }

    #[test]
    fn test_split_degenerate_sigma() {
        let split = split_primary_zone(7, 1.5, 0.0).unwrap();
        assert_eq!(split.sigma, 0.0);
        for r in &split.reactors {
            assert_eq!(r.equivalence_ratio, 1.5);
            assert_relative_eq!(r.weight, 1.0 / 7.0);
        }
        let single = split_primary_zone(1, 1.5, 0.39).unwrap();
        assert_eq!(single.reactors.len(), 1);
        assert_eq!(single.reactors[0].weight, 1.0);
        // no fuel: every reactor at phi = 0
        let no_fuel = split_primary_zone(5, 0.0, 0.39).unwrap();
        assert!(no_fuel.reactors.iter().all(|r| r.equivalence_ratio == 0.0));
    }

    #[test]
    fn test_split_errors() {
        assert!(matches!(
            split_primary_zone(0, 1.71, 0.39),
            Err(CombustorError::Configuration(_))
        ));
        assert!(matches!(
            split_primary_zone(5, 1.71, -0.1),
            Err(CombustorError::Configuration(_))
        ));
        assert!(matches!(
            split_primary_zone(5, f64::NAN, 0.39),
            Err(CombustorError::Configuration(_))
        ));
        // lower 2-sigma bound below zero
        assert!(matches!(
            split_primary_zone(5, 1.71, 0.6),
            Err(CombustorError::Configuration(_))
        ));
    }

    ////////////////////////////////CONFIG/////////////////////////////////////
    #[test]
    fn test_default_air_split() {
        let combustor = Combustor::jet_a1_default();
        let split = combustor.validate().unwrap();
        assert_relative_eq!(split.primary, 0.025 / (1.71 * 0.068), max_relative = 1e-12);
        assert_relative_eq!(
            split.primary + split.secondary,
            0.025 / (0.61 * 0.068),
            max_relative = 1e-12
        );
        assert_relative_eq!(split.primary + split.secondary + split.dilution, 1.0);
        assert_eq!(combustor.config.join_step(), 300);
        assert_relative_eq!(combustor.config.length_secondary_zone(), 0.27, epsilon = 1e-12);
    }

    #[test]
    fn test_config_validation_errors() {
        let base = Combustor::jet_a1_default();

        let mut c = base.clone();
        c.config.f_sm = 1.2;
        assert!(matches!(c.validate(), Err(CombustorError::Configuration(m)) if m.contains("f_sm")));

        let mut c = base.clone();
        c.config.length = 0.05;
        assert!(matches!(c.validate(), Err(CombustorError::Configuration(_))));

        let mut c = base.clone();
        c.config.l_da_start = 1.0;
        assert!(matches!(c.validate(), Err(CombustorError::Configuration(_))));

        // design point asks for more primary zone air than the combustor has
        let mut c = base.clone();
        c.config.design_equivalence_ratio_pz = 0.3;
        assert!(matches!(c.validate(), Err(CombustorError::Configuration(_))));

        let mut c = base.clone();
        c.fuel.soot.pah_count = 3;
        assert!(matches!(c.validate(), Err(CombustorError::Configuration(_))));

        let mut c = base;
        c.oxidizer.surrogate.clear();
        assert!(matches!(c.validate(), Err(CombustorError::Configuration(_))));
    }

    #[test]
    fn test_operating_point_validation() {
        let combustor = small_combustor();
        let mut op = take_off(&combustor);
        op.inlet_pressure = 0.0;
        assert!(matches!(run(&combustor, &op), Err(CombustorError::Configuration(_))));
        op.inlet_pressure = 2.6e6;
        op.fuel_to_air_ratio = -0.01;
        assert!(matches!(run(&combustor, &op), Err(CombustorError::Configuration(_))));
    }

    ////////////////////////////////AIR SCHEDULE/////////////////////////////////
    #[test]
    fn test_air_schedule_windows_and_precedence() {
        let combustor = Combustor::jet_a1_default();
        let split = combustor.validate().unwrap();
        let s = AirSchedule::new(&combustor, &split, 40.0 / 12.0);

        assert_eq!(s.injection_rate(FlowPath::SlowMode, 0.5), s.secondary_slow);
        assert_eq!(s.injection_rate(FlowPath::FastMode, 0.5), 0.0);
        assert_eq!(s.injection_rate(FlowPath::FastMode, 0.2), s.secondary_fast);
        assert_eq!(
            s.injection_rate(FlowPath::Joint, 0.2),
            s.secondary_slow + s.secondary_fast
        );
        assert_relative_eq!(s.injection_rate(FlowPath::SlowMode, 0.8), s.dilution * 0.6);
        assert_relative_eq!(s.injection_rate(FlowPath::FastMode, 0.8), s.dilution * 0.4);
        assert_eq!(s.injection_rate(FlowPath::Joint, 0.8), s.dilution);
        assert_eq!(s.injection_rate(FlowPath::Joint, 0.65), 0.0);

        // secondary air overlapping the dilution window wins
        let mut overlap = combustor.clone();
        overlap.config.l_sa_sm = 0.8;
        let s2 = AirSchedule::new(&overlap, &split, 40.0 / 12.0);
        assert_eq!(s2.injection_rate(FlowPath::SlowMode, 0.75), s2.secondary_slow);
    }

    #[test]
    fn test_secondary_air_totals() {
        let combustor = Combustor::jet_a1_default();
        let split = combustor.validate().unwrap();
        let air = 40.0 / 12.0;
        let s = AirSchedule::new(&combustor, &split, air);
        let n = combustor.config.n_sz;
        let dz = combustor.config.segment_length();
        let injected: f64 = (0..n)
            .map(|k| (k + 1) as f64 / n as f64)
            .filter(|z| *z <= combustor.config.l_sa_sm)
            .map(|z| s.injection_rate(FlowPath::SlowMode, z) * dz)
            .sum();
        assert_relative_eq!(injected, split.secondary * air * 0.6, max_relative = 0.01);
    }

    ////////////////////////////////EMISSION INDICES/////////////////////////////
    fn lean_flame(engine: &mut LumpedEquilibriumEngine) -> GasState {
        let combustor = Combustor::jet_a1_default();
        let x = engine
            .equivalence_ratio_mixture(0.6, &combustor.fuel.surrogate, &combustor.oxidizer.surrogate)
            .unwrap();
        let fresh = engine.state_tp(710.0, 2.6e6, &x).unwrap();
        engine.equilibrate_hp(&fresh).unwrap()
    }

    #[test]
    fn test_emission_index_formulas() {
        let mut engine = LumpedEquilibriumEngine::jet_a1().unwrap();
        let state = lean_flame(&mut engine);
        let ei = emission_indices(&state, 2.0, 0.05, 1.0e-6).unwrap();
        let scale = 1000.0 * 2.0 / 0.05;
        assert_relative_eq!(ei.co2, state.mass_fraction("CO2").unwrap() * scale, max_relative = 1e-12);
        assert_relative_eq!(ei.co, state.mass_fraction("CO").unwrap() * scale, max_relative = 1e-12);
        assert_relative_eq!(ei.h2o, state.mass_fraction("H2O").unwrap() * scale, max_relative = 1e-12);
        let y_nox = state.mass_fraction("NO").unwrap() + state.mass_fraction("NO2").unwrap();
        assert_relative_eq!(ei.nox, y_nox * scale, max_relative = 1e-12);
        assert_relative_eq!(ei.soot, 1.0e-6 * 1000.0 / 0.05, max_relative = 1e-12);

        // negative soot flow is clipped, no fuel means no emission index
        assert_eq!(emission_indices(&state, 2.0, 0.05, -1.0).unwrap().soot, 0.0);
        let none = emission_indices(&state, 2.0, 0.0, 1.0).unwrap();
        assert_eq!(none, Default::default());
    }

    #[test]
    fn test_missing_nox_species_count_as_zero() {
        let records: Vec<SpeciesRecord> = JET_A1_LUMPED
            .iter()
            .filter(|r| r.name != "NO" && r.name != "NO2")
            .copied()
            .collect();
        let mut engine = LumpedEquilibriumEngine::new(&records, Default::default()).unwrap();
        let state = lean_flame(&mut engine);
        let ei = emission_indices(&state, 2.0, 0.05, 0.0).unwrap();
        assert_eq!(ei.nox, 0.0);
        assert!(ei.co2 > 0.0);
    }

    #[test]
    fn test_missing_required_species() {
        let species = Arc::new(
            SpeciesSet::new(vec![
                ("N2".to_string(), ElementCounts::new(0.0, 0.0, 0.0, 2.0)),
                ("H2O".to_string(), ElementCounts::new(0.0, 2.0, 1.0, 0.0)),
            ])
            .unwrap(),
        );
        let state = GasState::new(species, 1500.0, 1.0e6, vec![0.9, 0.1], 0.0).unwrap();
        assert_eq!(
            emission_indices(&state, 1.0, 0.05, 0.0),
            Err(KineticsError::MissingSpecies("CO2".to_string()))
        );

        let mut engine = LumpedEquilibriumEngine::jet_a1().unwrap();
        let flame = lean_flame(&mut engine);
        let mut pah = Combustor::jet_a1_default().fuel.pah;
        pah.species[0] = "A5".to_string();
        assert_eq!(
            precursor_concentrations(&flame, &pah),
            Err(KineticsError::MissingSpecies("A5".to_string()))
        );
        assert!(precursor_concentrations(&flame, &Combustor::jet_a1_default().fuel.pah).is_ok());
    }

    #[test]
    fn test_zero_pah_reports_numerical_domain_with_stage() {
        let fuel = Combustor::jet_a1_default().fuel;
        let precursors = PrecursorConcentrations {
            temperature: 1600.0,
            pah: vec![0.0; fuel.pah.len()],
            c2h2: 1.0e-4,
            oh: 1.0e-7,
            o2: 1.0e-6,
            o: 1.0e-8,
        };
        let cv = ControlVolume {
            volume: 1.0e-4,
            mass_flow: 0.5,
            density: 6.0,
        };
        let stage = Stage::SecondaryZone {
            path: FlowPath::FastMode,
            step: 12,
            position: 0.026,
        };
        let res = soot_rates(&fuel.pah, &fuel.soot, &precursors, &cv).at_stage(stage.clone());
        match res {
            Err(CombustorError::NumericalDomain { stage: at, .. }) => assert_eq!(at, stage),
            other => panic!("expected a numerical domain error, got {:?}", other),
        }
    }

    #[test]
    fn test_local_equivalence_ratio() {
        assert_relative_eq!(local_equivalence_ratio(1.068, 0.068, 0.068), 1.0, max_relative = 1e-12);
        assert_eq!(local_equivalence_ratio(1.0, 0.0, 0.068), 0.0);
    }

    ////////////////////////////////PSR + MIXER/////////////////////////////////
    #[test]
    fn test_psr_flows_and_zone_mixer_conservation() {
        let combustor = small_combustor();
        let split_air = combustor.validate().unwrap();
        let mut engine = LumpedEquilibriumEngine::jet_a1().unwrap();
        let inlet = InletConditions::new(&mut engine, &combustor, 710.0, 2.6e6).unwrap();
        let air_flow_pz = split_air.primary * 40.0 / 12.0;
        let inputs = PrimaryZoneInputs {
            combustor: &combustor,
            inlet: &inlet,
            air_flow: air_flow_pz,
            volume: combustor.config.volume_primary_zone(),
        };
        let split = split_primary_zone(5, 1.71, 0.39).unwrap();
        let nodes: Vec<_> = split
            .reactors
            .iter()
            .enumerate()
            .map(|(i, r)| evaluate_reactor(&mut engine, &inputs, i, r).unwrap())
            .collect();

        let air: f64 = nodes.iter().map(|n| n.air_flow).sum();
        let fuel: f64 = nodes.iter().map(|n| n.fuel_flow).sum();
        assert_relative_eq!(air, air_flow_pz, max_relative = 1e-12);
        // symmetric split: the reactors carry the mean fuel-air ratio
        assert_relative_eq!(fuel, 1.71 * 0.068 * air_flow_pz, max_relative = 1e-9);
        let volume: f64 = nodes.iter().map(|n| n.volume).sum();
        assert_relative_eq!(volume, combustor.config.volume_primary_zone(), max_relative = 1e-12);
        for n in &nodes {
            assert_relative_eq!(
                n.volume,
                n.weight * combustor.config.volume_primary_zone(),
                max_relative = 1e-12
            );
            assert!(n.residence_time > 0.0 && n.residence_time.is_finite());
            assert!(n.emission_indices.all_non_negative());
        }

        let mixed = mix_primary_zone(&mut engine, &nodes, &combustor.fuel.pah).unwrap();
        let masses: Vec<f64> = nodes.iter().map(|n| n.residence_time * n.mass_flow).collect();
        let total_mass: f64 = masses.iter().sum();
        let enthalpy: f64 = nodes
            .iter()
            .zip(&masses)
            .map(|(n, m)| m * n.state.enthalpy_mass())
            .sum();
        assert_relative_eq!(mixed.state.enthalpy_mass(), enthalpy / total_mass, max_relative = 1e-9);
        assert_relative_eq!(mixed.mass_flow, air + fuel, max_relative = 1e-12);
        assert_relative_eq!(mixed.state.mass_fractions().iter().sum::<f64>(), 1.0, epsilon = 1e-9);
        assert!(mix_primary_zone(&mut engine, &[], &combustor.fuel.pah).is_err());
    }

    ////////////////////////////////EVALUATE/////////////////////////////////////
    #[test]
    fn test_evaluate_small_combustor() {
        let combustor = small_combustor();
        let result = run(&combustor, &take_off(&combustor)).unwrap();
        assert!(result.is_complete());
        assert_eq!(result.primary_zone.reactors.len(), 5);

        let n_join = combustor.config.join_step();
        assert_eq!(result.secondary_zone.slow_mode.records.len(), n_join);
        assert_eq!(result.secondary_zone.fast_mode.records.len(), n_join);
        assert_eq!(result.secondary_zone.joint.records.len(), combustor.config.n_sz - n_join);

        for trace in result.paths() {
            for r in &trace.records {
                assert!(r.emission_indices.all_non_negative(), "{:?}", r);
                assert!(r.temperature > 700.0);
            }
        }
        for node in &result.primary_zone.reactors {
            assert!(node.emission_indices.all_non_negative());
        }

        // mass balance at the join
        let slow = &result.secondary_zone.slow_mode;
        let fast = &result.secondary_zone.fast_mode;
        let first_joint = result.secondary_zone.joint.records[0];
        assert_relative_eq!(
            first_joint.mass_flow,
            slow.mass_flow + fast.mass_flow + first_joint.air_added,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            slow.mass_flow - slow.records.iter().map(|r| r.air_added).sum::<f64>(),
            0.6 * result.primary_zone.mass_flow,
            max_relative = 1e-9
        );

        let exit = result.final_emission_indices();
        assert!(exit.co2 > 2800.0 && exit.co2 < 3600.0, "EI CO2 {}", exit.co2);
        assert!(exit.co < result.primary_zone.final_emission_indices.co);
        assert!(result.secondary_zone.exit_temperature < result.primary_zone.temperature);
        assert_soot_bounded_by_carbon(&combustor, &result);
    }

    #[test]
    fn test_zero_fuel_gives_zero_emissions() {
        let combustor = small_combustor();
        let mut op = take_off(&combustor);
        op.fuel_to_air_ratio = 0.0;
        let result = run(&combustor, &op).unwrap();
        let ei = result.final_emission_indices();
        assert!(ei.co2.abs() < 1e-6);
        assert!(ei.co.abs() < 1e-6);
        assert!(ei.nox.abs() < 1e-6);
        assert!(ei.soot.abs() < 1e-6);
        assert_relative_eq!(result.secondary_zone.exit_temperature, 710.0, max_relative = 1e-3);
    }

    #[test]
    fn test_zero_reactors_or_segments_is_configuration_error() {
        let mut combustor = small_combustor();
        combustor.config.n_pz = 0;
        let op = take_off(&combustor);
        assert!(matches!(run(&combustor, &op), Err(CombustorError::Configuration(_))));

        let mut combustor = small_combustor();
        combustor.config.n_sz = 0;
        assert!(matches!(run(&combustor, &op), Err(CombustorError::Configuration(_))));
    }

    #[test]
    fn test_sigma_zero_collapses_psr_temperatures() {
        let mut combustor = small_combustor();
        combustor.config.s_pz = 0.0;
        let result = run(&combustor, &take_off(&combustor)).unwrap();
        assert!(result.psr_temperature_spread() < 1e-6);
    }

    #[test]
    fn test_temperature_spread_grows_with_mixing_parameter() {
        let spread = |s_pz: f64| {
            let mut combustor = small_combustor();
            combustor.config.s_pz = s_pz;
            run(&combustor, &take_off(&combustor))
                .unwrap()
                .psr_temperature_spread()
        };
        let (narrow, wide) = (spread(0.1), spread(0.3));
        assert!(narrow > 0.0);
        assert!(wide > narrow, "spread {} !> {}", wide, narrow);
    }

    #[test]
    fn test_engine_unavailable_policy() {
        let combustor = small_combustor();
        let op = take_off(&combustor);
        let res = evaluate(&combustor, &op, &MissingEngineProvider, &EvaluationOptions::default());
        assert!(matches!(res, Err(CombustorError::EngineUnavailable { .. })));

        let options = EvaluationOptions {
            engine_unavailable: EngineUnavailablePolicy::ZeroEmissions,
            ..Default::default()
        };
        let result = evaluate(&combustor, &op, &MissingEngineProvider, &options).unwrap();
        assert!(matches!(result.status, EvaluationStatus::EngineUnavailable { .. }));
        assert_eq!(result.final_emission_indices(), Default::default());
        assert!(result.primary_zone.reactors.is_empty());
    }

    #[test]
    fn test_unknown_mechanism_is_not_masked_by_policy() {
        let mut combustor = small_combustor();
        combustor.fuel.kinetic_mechanism = "gri30.yaml".to_string();
        let options = EvaluationOptions {
            engine_unavailable: EngineUnavailablePolicy::ZeroEmissions,
            ..Default::default()
        };
        let res = evaluate(
            &combustor,
            &take_off(&combustor),
            &LumpedEngineProvider::default(),
            &options,
        );
        assert!(matches!(res, Err(CombustorError::Kinetics { .. })));
    }

    #[test]
    fn test_parallel_matches_serial() {
        let combustor = small_combustor();
        let op = take_off(&combustor);
        let provider = LumpedEngineProvider::default();
        let serial = evaluate(&combustor, &op, &provider, &EvaluationOptions::default()).unwrap();
        let parallel = evaluate(
            &combustor,
            &op,
            &provider,
            &EvaluationOptions {
                parallel: true,
                ..Default::default()
            },
        )
        .unwrap();
        for (a, b) in serial
            .primary_zone
            .reactors
            .iter()
            .zip(&parallel.primary_zone.reactors)
        {
            assert_eq!(a.index, b.index);
            assert_relative_eq!(a.state.temperature(), b.state.temperature(), max_relative = 1e-12);
        }
        let (a, b) = (serial.final_emission_indices(), parallel.final_emission_indices());
        assert_relative_eq!(a.co2, b.co2, max_relative = 1e-9);
        assert_relative_eq!(a.nox, b.nox, max_relative = 1e-9);
    }

    #[test]
    fn test_take_off_emission_indices() {
        // N_PZ = 21, N_SZ = 500, Jet-A1, 710 K / 2.6 MPa against the ICAO databank 3.16 kg/kg
        let combustor = Combustor::jet_a1_default();
        let options = EvaluationOptions {
            parallel: true,
            ..Default::default()
        };
        let result = evaluate(
            &combustor,
            &take_off(&combustor),
            &LumpedEngineProvider::default(),
            &options,
        )
        .unwrap();
        let ei = result.final_emission_indices();
        assert_relative_eq!(ei.co2, 3160.0, max_relative = 0.1);
        assert!(ei.all_non_negative());
        assert_soot_bounded_by_carbon(&combustor, &result);

        // the richest reactors burn colder than their leaner neighbours
        let reactors = &result.primary_zone.reactors;
        let hottest = reactors
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.state.temperature().total_cmp(&b.state.temperature()))
            .map(|(i, _)| i)
            .unwrap();
        for pair in reactors[hottest..].windows(2) {
            assert!(
                pair[1].state.temperature() < pair[0].state.temperature(),
                "PSR {} at {:.1} K after PSR {} at {:.1} K",
                pair[1].index,
                pair[1].state.temperature(),
                pair[0].index,
                pair[0].state.temperature()
            );
        }
    }
}
