use crn_emissions::combustor::config::Combustor;
use crn_emissions::combustor::evaluate::{EvaluationOptions, OperatingPoint, evaluate};
use crn_emissions::errors::CombustorError;
use crn_emissions::gas_engine::lumped::LumpedEngineProvider;
use crn_emissions::utils::task_file::load_combustor_from_file;
use log::{LevelFilter, error, info};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::process::ExitCode;

/// take-off combustor inlet state
const INLET_TEMPERATURE: f64 = 710.0;
const INLET_PRESSURE: f64 = 2.6e6;

fn run(task_file: Option<&str>) -> Result<(), CombustorError> {
    let combustor = match task_file {
        Some(file_name) => load_combustor_from_file(file_name)?,
        None => {
            info!("no task file given, evaluating the Jet-A1 take-off case");
            Combustor::jet_a1_default()
        }
    };
    let operating_point =
        OperatingPoint::take_off(&combustor.config, INLET_TEMPERATURE, INLET_PRESSURE);
    let options = EvaluationOptions {
        parallel: true,
        ..Default::default()
    };
    let result = evaluate(
        &combustor,
        &operating_point,
        &LumpedEngineProvider::default(),
        &options,
    )?;
    result.pretty_print();
    Ok(())
}

pub fn main() -> ExitCode {
    let _ = TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );
    let task_file = std::env::args().nth(1);
    match run(task_file.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
