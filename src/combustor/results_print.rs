use crate::combustor::emission_index::EmissionIndices;
use crate::combustor::results::{CombustorResult, EvaluationStatus, PathTrace};
use prettytable::{Table, row};

/// Rows printed per secondary zone path.
const TRACE_ROWS: usize = 10;

fn ei_row(table: &mut Table, label: &str, ei: &EmissionIndices) {
    table.add_row(row![
        label,
        format!("{:.2}", ei.co2),
        format!("{:.4}", ei.co),
        format!("{:.2}", ei.h2o),
        format!("{:.4}", ei.nox),
        format!("{:.4e}", ei.soot)
    ]);
}

impl CombustorResult {
    pub fn pretty_print_primary_zone(&self) {
        let pz = &self.primary_zone;
        println!(
            "__________PRIMARY ZONE: mean phi = {:.4}, sigma = {:.4}__________",
            pz.split.mean_equivalence_ratio, pz.split.sigma
        );
        let mut table = Table::new();
        table.add_row(row![
            "PSR", "phi", "weight", "T, K", "tau, s", "EI CO2", "EI CO", "EI NOx", "EI soot"
        ]);
        for r in &pz.reactors {
            let ei = &r.emission_indices;
            table.add_row(row![
                r.index,
                format!("{:.4}", r.equivalence_ratio),
                format!("{:.5}", r.weight),
                format!("{:.1}", r.state.temperature()),
                format!("{:.3e}", r.residence_time),
                format!("{:.2}", ei.co2),
                format!("{:.4}", ei.co),
                format!("{:.4}", ei.nox),
                format!("{:.4e}", ei.soot)
            ]);
        }
        table.printstd();
    }

    pub fn pretty_print_path(trace: &PathTrace) {
        println!(
            "__________SECONDARY ZONE, {} ({} steps)__________",
            trace.path,
            trace.records.len()
        );
        if trace.records.is_empty() {
            return;
        }
        let mut table = Table::new();
        table.add_row(row![
            "step", "z/L_SZ", "phi", "T, K", "mdot, kg/s", "EI CO2", "EI CO", "EI NOx", "EI soot"
        ]);
        let stride = (trace.records.len() / TRACE_ROWS).max(1);
        let last = trace.records.len() - 1;
        for (i, r) in trace.records.iter().enumerate() {
            if i % stride != 0 && i != last {
                continue;
            }
            let ei = &r.emission_indices;
            table.add_row(row![
                r.step,
                format!("{:.3}", r.position),
                format!("{:.4}", r.equivalence_ratio),
                format!("{:.1}", r.temperature),
                format!("{:.4}", r.mass_flow),
                format!("{:.2}", ei.co2),
                format!("{:.4}", ei.co),
                format!("{:.4}", ei.nox),
                format!("{:.4e}", ei.soot)
            ]);
        }
        table.printstd();
    }

    pub fn pretty_print_emissions(&self) {
        println!("__________EMISSION INDICES, g/kg fuel__________");
        if let EvaluationStatus::EngineUnavailable { reason } = &self.status {
            println!("gas engine unavailable: {}", reason);
        }
        let mut table = Table::new();
        table.add_row(row!["stage", "CO2", "CO", "H2O", "NOx", "soot"]);
        ei_row(&mut table, "primary zone", &self.primary_zone.final_emission_indices);
        for trace in [&self.secondary_zone.slow_mode, &self.secondary_zone.fast_mode] {
            if let Some(r) = trace.last() {
                ei_row(&mut table, &trace.path.to_string(), &r.emission_indices);
            }
        }
        ei_row(&mut table, "combustor exit", &self.secondary_zone.final_emission_indices);
        table.printstd();
    }

    pub fn pretty_print(&self) {
        if !self.primary_zone.reactors.is_empty() {
            self.pretty_print_primary_zone();
        }
        for trace in self.paths() {
            Self::pretty_print_path(trace);
        }
        self.pretty_print_emissions();
    }
}
