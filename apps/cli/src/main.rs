mod args;
mod config;

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use adoption_app::{AppConfig, AppError, AppState, UsageSample, WindowParams};
use adoption_core::AdoptionMetrics;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = args::parse_args().map_err(|err| {
        eprintln!("{err}");
        args::print_help();
        io::Error::new(io::ErrorKind::InvalidInput, "invalid arguments")
    })?;

    let config = config::load_or_create().map_err(io::Error::other)?;
    if config.created {
        eprintln!(
            "Created config at {} (default window {}).",
            config.paths.file.display(),
            config.config.default_window
        );
    }

    let app_state = AppState::new(AppConfig {
        default_window: config.config.default_window,
    });

    let output = run(&app_state, args)?;
    println!("{output}");
    Ok(())
}

fn run(app_state: &AppState, args: args::CliArgs) -> adoption_app::Result<String> {
    let raw = read_input(args.input.as_deref())?;

    if args.metrics {
        let metrics: AdoptionMetrics = serde_json::from_str(&raw)?;
        let assessment = app_state.services.adoption.assess(&metrics);
        return Ok(serde_json::to_string_pretty(&assessment)?);
    }

    let samples = parse_samples(&raw)?;
    let params = WindowParams {
        window: args.window,
        start: args.start,
        end: args.end,
    };
    match args.subject {
        Some(subject) => {
            let report = app_state
                .services
                .adoption
                .assess_samples(&subject, &samples, &params)?;
            Ok(serde_json::to_string_pretty(&report)?)
        }
        None => {
            let report = app_state.services.cohort.assess_cohort(&samples, &params)?;
            Ok(serde_json::to_string_pretty(&report)?)
        }
    }
}

fn read_input(path: Option<&Path>) -> adoption_app::Result<String> {
    match path {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn parse_samples(raw: &str) -> adoption_app::Result<Vec<UsageSample>> {
    let mut samples = Vec::new();
    for (index, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let sample: UsageSample = serde_json::from_str(line)
            .map_err(|err| AppError::InvalidInput(format!("line {}: {}", index + 1, err)))?;
        samples.push(sample);
    }
    Ok(samples)
}
