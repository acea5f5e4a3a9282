use crate::combustor::config::{Combustor, CombustorConfig, FuelSpec, OxidizerSpec};
use crate::errors::CombustorError;
use log::{error, info, warn};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

pub const COMBUSTOR_HEADERS: [&str; 2] = ["COMBUSTOR", "COMBUSTOR_CONFIG"];
pub const FUEL_HEADERS: [&str; 2] = ["FUEL", "FUEL_SPEC"];
pub const OXIDIZER_HEADERS: [&str; 2] = ["OXIDIZER", "AIR"];

/// Loads a combustor task from a file.
///
/// The `COMBUSTOR` section is mandatory. Missing `FUEL`/`OXIDIZER` sections fall back to
/// the Jet-A1 and air presets with a warning.
pub fn load_combustor_from_file(file_name: &str) -> Result<Combustor, CombustorError> {
    let path = Path::new(file_name);
    if !path.exists() {
        return Err(CombustorError::TaskFile(format!(
            "File '{}' does not exist",
            file_name
        )));
    }
    let text = fs::read_to_string(path).map_err(|e| {
        CombustorError::TaskFile(format!("Failed to open file '{}': {}", file_name, e))
    })?;
    let combustor = parse_combustor_task(&text, file_name)?;
    info!("Loaded combustor task from file '{}'", file_name);
    Ok(combustor)
}

/// Parses the text of a task file. `origin` is only used in messages.
pub fn parse_combustor_task(text: &str, origin: &str) -> Result<Combustor, CombustorError> {
    let lines: Vec<String> = text.lines().map(|l| l.to_string()).collect();

    let config: CombustorConfig = parse_section(&lines, &COMBUSTOR_HEADERS, origin)?
        .ok_or_else(|| {
            CombustorError::TaskFile(format!(
                "No 'COMBUSTOR' header found in '{}'",
                origin
            ))
        })?;
    let fuel: FuelSpec = match parse_section(&lines, &FUEL_HEADERS, origin)? {
        Some(fuel) => fuel,
        None => {
            warn!("No 'FUEL' section in '{}', using Jet-A1 preset", origin);
            FuelSpec::jet_a1()
        }
    };
    let oxidizer: OxidizerSpec = match parse_section(&lines, &OXIDIZER_HEADERS, origin)? {
        Some(oxidizer) => oxidizer,
        None => {
            warn!("No 'OXIDIZER' section in '{}', using air preset", origin);
            OxidizerSpec::air()
        }
    };
    Ok(Combustor {
        config,
        fuel,
        oxidizer,
    })
}

/// Writes a task file that [`load_combustor_from_file`] reads back.
pub fn write_combustor_task(combustor: &Combustor, file_name: &str) -> Result<(), CombustorError> {
    let to_json = |value: serde_json::Result<String>| {
        value.map_err(|e| CombustorError::TaskFile(format!("serialization failed: {}", e)))
    };
    let text = format!(
        "COMBUSTOR\n{}\nFUEL\n{}\nOXIDIZER\n{}\n",
        to_json(serde_json::to_string_pretty(&combustor.config))?,
        to_json(serde_json::to_string_pretty(&combustor.fuel))?,
        to_json(serde_json::to_string_pretty(&combustor.oxidizer))?,
    );
    fs::write(file_name, text).map_err(|e| {
        CombustorError::TaskFile(format!("Failed to write file '{}': {}", file_name, e))
    })
}

fn is_header(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c.is_uppercase() || c == '_')
}

/// Returns the line range of the section body after one of `headers`, up to the next header
/// or the end of the document.
fn find_section(lines: &[String], headers: &[&str]) -> Option<(usize, usize)> {
    let start = lines.iter().position(|line| {
        let trimmed = line.trim().to_uppercase();
        headers.iter().any(|h| trimmed == *h)
    })? + 1;
    let end = (start..lines.len())
        .find(|&i| is_header(&lines[i]))
        .unwrap_or(lines.len());
    Some((start, end))
}

fn parse_section<T: DeserializeOwned>(
    lines: &[String],
    headers: &[&str],
    origin: &str,
) -> Result<Option<T>, CombustorError> {
    let Some((start, end)) = find_section(lines, headers) else {
        return Ok(None);
    };
    let section = lines[start..end].join("\n");
    match serde_json::from_str::<T>(&section) {
        Ok(data) => Ok(Some(data)),
        Err(e) => {
            let error_line = e.line();
            let error_column = e.column();
            // serde_json counts lines from 1 inside the section
            let actual_line = start + error_line.max(1) - 1;
            let error_msg = format!(
                "Error parsing section '{}' of '{}' at line {}, column {} (line {} in file): {}",
                headers[0],
                origin,
                error_line,
                error_column,
                actual_line + 1,
                e
            );
            error!("{}", error_msg);
            if actual_line < lines.len() {
                let problem_line = &lines[actual_line];
                error!("Problematic line: {}", problem_line);
                if error_column >= 1 && error_column <= problem_line.len() {
                    error!("{}", " ".repeat(error_column - 1) + "^");
                }
            }
            Err(CombustorError::TaskFile(error_msg))
        }
    }
}
