use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{load_settings, HttpTransport, SubmissionController, SubmissionState};
use shared::domain::Field;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod input;
mod interactive;

#[derive(Parser, Debug)]
#[command(about = "Submit cell nucleus measurements for a malignant/benign prediction")]
struct Cli {
    /// Base URL of the prediction service (overrides predict.toml and APP__API_URL).
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fill the form from a file and/or arguments and submit it once.
    Predict {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = input::parse_assignment)]
        set: Vec<(Field, String)>,
    },
    /// Edit the form line by line and submit on demand.
    Interactive,
    /// List the measurement fields and their labels.
    Fields,
    /// Check whether the prediction service is up.
    Health,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings()?;
    if let Some(api_url) = cli.api_url {
        settings.api_url = api_url;
    }
    debug!(?settings, "loaded client settings");

    match cli.command {
        Command::Predict { input: input_file, set } => {
            let controller = SubmissionController::from_settings(&settings)?;
            if let Some(path) = input_file {
                for (field, value) in input::load_values(&path)? {
                    controller.set_field(field, value).await;
                }
            }
            for (field, value) in set {
                controller.set_field(field, value).await;
            }

            let state = controller.submit().await;
            Ok(render_outcome(&state))
        }
        Command::Interactive => {
            let controller = SubmissionController::from_settings(&settings)?;
            interactive::run(&controller).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Fields => {
            for field in Field::ALL {
                println!("{:<26} {}", field.name(), field.label());
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Health => {
            let transport = HttpTransport::new(&settings)?;
            let health = transport
                .health()
                .await
                .context("health check failed")?;
            println!("Service:       {}", transport.base_url());
            if let Some(status) = &health.status {
                println!("Status:        {status}");
            }
            println!("Message:       {}", health.message);
            if let Some(loaded) = health.model_loaded {
                println!("Model loaded:  {loaded}");
            }
            if let Some(loaded) = health.scaler_loaded {
                println!("Scaler loaded: {loaded}");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

pub(crate) fn render_outcome(state: &SubmissionState) -> ExitCode {
    match state {
        SubmissionState::Succeeded(label) => {
            println!("Prediction: {label}");
            println!("{}", label.advisory());
            ExitCode::SUCCESS
        }
        SubmissionState::Failed(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
        SubmissionState::Submitting => {
            eprintln!("A prediction request is already in progress.");
            ExitCode::FAILURE
        }
        SubmissionState::Idle => ExitCode::SUCCESS,
    }
}
