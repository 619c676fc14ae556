//! BetterRest CLI - Command-line interface for bedtime estimation
//!
//! Commands:
//! - calculate: Estimate the ideal bedtime for the given inputs
//! - model: Print the regression model coefficients
//! - doctor: Diagnose model and configuration health

use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{Local, NaiveTime};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use better_rest::estimator::BedtimeAlert;
use better_rest::form::{BedtimeForm, TriggerMode, DEFAULT_COFFEE_AMOUNT, DEFAULT_SLEEP_AMOUNT};
use better_rest::{
    BedtimeEstimator, ConfigError, EstimatorConfig, LinearSleepModel, ModelError, SleepInputs,
    APP_NAME, VERSION,
};

/// BetterRest - Find your ideal bedtime
#[derive(Parser)]
#[command(name = "betterrest")]
#[command(version = VERSION)]
#[command(about = "Estimate your ideal bedtime from wake time, sleep goal, and coffee", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the ideal bedtime
    Calculate {
        /// Desired wake-up time (HH:MM, 24-hour). Defaults to the configured wake time
        #[arg(short, long, value_parser = parse_wake_time)]
        wake: Option<NaiveTime>,

        /// Desired amount of sleep in hours (1 to 20, half-hour steps)
        #[arg(short, long, default_value_t = DEFAULT_SLEEP_AMOUNT)]
        sleep: f64,

        /// Daily coffee intake in cups
        #[arg(short, long, default_value_t = DEFAULT_COFFEE_AMOUNT)]
        coffee: u32,

        /// Load model coefficients from file
        #[arg(long)]
        model: Option<PathBuf>,

        /// Load estimator configuration from file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output the alert as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the regression model coefficients as JSON
    Model {
        /// Load model coefficients from file
        #[arg(long)]
        model: Option<PathBuf>,
    },

    /// Diagnose model and configuration health
    Doctor {
        /// Check model file
        #[arg(long)]
        model: Option<PathBuf>,

        /// Check config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_wake_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|e| format!("expected HH:MM: {e}"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliErrorRecord::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Calculate {
            wake,
            sleep,
            coffee,
            model,
            config,
            json,
        } => cmd_calculate(wake, sleep, coffee, model.as_deref(), config.as_deref(), json),

        Commands::Model { model } => cmd_model(model.as_deref()),

        Commands::Doctor {
            model,
            config,
            json,
        } => cmd_doctor(model.as_deref(), config.as_deref(), json),
    }
}

fn cmd_calculate(
    wake: Option<NaiveTime>,
    sleep: f64,
    coffee: u32,
    model_path: Option<&Path>,
    config_path: Option<&Path>,
    json: bool,
) -> Result<(), CliError> {
    let config = load_config(config_path)?;

    // A model that cannot be loaded is reported like any other failed prediction
    let alert = match load_model(model_path) {
        Ok(model) => {
            let estimator = BedtimeEstimator::with_config(model, config);
            let mut form =
                BedtimeForm::new(estimator, TriggerMode::OnCalculate, Local::now().date_naive())?;

            if let Some(time) = wake {
                form.set_wake_up(form.wake_up().date().and_time(time));
            }
            form.set_sleep_amount(sleep);
            form.set_coffee_amount(coffee);

            if form.sleep_amount() != sleep {
                warn!(requested = sleep, used = form.sleep_amount(), "sleep amount adjusted to stepper range");
            }
            if form.coffee_amount() != coffee {
                warn!(requested = coffee, used = form.coffee_amount(), "coffee amount adjusted to allowed range");
            }
            debug!(
                wake_up = %form.wake_up(),
                sleep = %form.sleep_label(),
                coffee = %form.coffee_label(),
                "calculating bedtime"
            );

            form.calculate()
        }
        Err(e) => {
            warn!(error = %e, "failed to load sleep model");
            BedtimeAlert::error()
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&alert)?);
    } else {
        println!("{}", alert.title);
        println!("{}", alert.message);
    }

    if alert.is_error() {
        Err(CliError::EstimationFailed)
    } else {
        Ok(())
    }
}

fn cmd_model(model_path: Option<&Path>) -> Result<(), CliError> {
    let model = load_model(model_path)?;
    println!("{}", model.to_json()?);
    Ok(())
}

fn cmd_doctor(
    model_path: Option<&Path>,
    config_path: Option<&Path>,
    json: bool,
) -> Result<(), CliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "version".to_string(),
        status: CheckStatus::Ok,
        message: format!("{} version {}", APP_NAME, VERSION),
    });

    let model = match load_model(model_path) {
        Ok(model) => {
            checks.push(DoctorCheck {
                name: "model".to_string(),
                status: CheckStatus::Ok,
                message: match model_path {
                    Some(path) => format!("Model loaded from {}", path.display()),
                    None => "Using built-in model".to_string(),
                },
            });
            Some(model)
        }
        Err(e) => {
            checks.push(DoctorCheck {
                name: "model".to_string(),
                status: CheckStatus::Error,
                message: format!("Cannot load model: {}", e),
            });
            None
        }
    };

    let config = match config_path {
        Some(path) if !path.exists() => {
            checks.push(DoctorCheck {
                name: "config".to_string(),
                status: CheckStatus::Warning,
                message: "Config file does not exist, using defaults".to_string(),
            });
            EstimatorConfig::default()
        }
        Some(path) => match EstimatorConfig::load(path) {
            Ok(config) => {
                checks.push(DoctorCheck {
                    name: "config".to_string(),
                    status: CheckStatus::Ok,
                    message: format!("Config loaded from {}", path.display()),
                });
                config
            }
            Err(e) => {
                checks.push(DoctorCheck {
                    name: "config".to_string(),
                    status: CheckStatus::Error,
                    message: format!("Invalid config: {}", e),
                });
                EstimatorConfig::default()
            }
        },
        None => EstimatorConfig::default(),
    };

    // Sample prediction at the configured default wake time
    if let Some(model) = model {
        let estimator = BedtimeEstimator::with_config(model, config);
        let sample = config
            .default_wake_time(Local::now().date_naive())
            .map(|wake_up| SleepInputs::new(wake_up, DEFAULT_SLEEP_AMOUNT, DEFAULT_COFFEE_AMOUNT));

        let check = match sample.map(|inputs| estimator.estimate(&inputs)) {
            Ok(Ok(bedtime)) => DoctorCheck {
                name: "prediction".to_string(),
                status: CheckStatus::Ok,
                message: format!("Sample bedtime {}", estimator.format(&bedtime)),
            },
            Ok(Err(e)) => DoctorCheck {
                name: "prediction".to_string(),
                status: CheckStatus::Error,
                message: e.to_string(),
            },
            Err(e) => DoctorCheck {
                name: "prediction".to_string(),
                status: CheckStatus::Error,
                message: e.to_string(),
            },
        };
        checks.push(check);
    }

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive mode)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        app: APP_NAME.to_string(),
        version: VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("BetterRest Doctor Report");
        println!("========================");
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(CliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Helper functions

fn load_model(path: Option<&Path>) -> Result<LinearSleepModel, ModelError> {
    match path {
        Some(path) => LinearSleepModel::load(path),
        None => Ok(LinearSleepModel::default()),
    }
}

fn load_config(path: Option<&Path>) -> Result<EstimatorConfig, ConfigError> {
    match path {
        Some(path) => EstimatorConfig::load(path),
        None => Ok(EstimatorConfig::default()),
    }
}

// Error types

#[derive(Debug)]
enum CliError {
    Model(ModelError),
    Config(ConfigError),
    Json(serde_json::Error),
    EstimationFailed,
    DoctorFailed,
}

impl From<ModelError> for CliError {
    fn from(e: ModelError) -> Self {
        CliError::Model(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliErrorRecord {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<CliError> for CliErrorRecord {
    fn from(e: CliError) -> Self {
        match e {
            CliError::Model(e) => CliErrorRecord {
                code: "MODEL_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'betterrest model' to see the expected coefficients".to_string()),
            },
            CliError::Config(e) => CliErrorRecord {
                code: "CONFIG_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check the config file fields and values".to_string()),
            },
            CliError::Json(e) => CliErrorRecord {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: None,
            },
            CliError::EstimationFailed => CliErrorRecord {
                code: "PREDICTION_FAILED".to_string(),
                message: "Bedtime could not be calculated".to_string(),
                hint: Some("Run with --verbose or 'betterrest doctor' for details".to_string()),
            },
            CliError::DoctorFailed => CliErrorRecord {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct DoctorReport {
    app: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
