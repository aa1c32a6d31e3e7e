use anyhow::{Context, Result};
use std::process::ExitCode;
use tracing::{error, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use web3_devops::actions::ActionRegistry;
use web3_devops::cli::commands::{RunCommand, ValidateCommand};
use web3_devops::cli::output::*;
use web3_devops::cli::{Cli, Command};
use web3_devops::core::PipelineConfig;
use web3_devops::execution::{PipelineRunner, RunEvent};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    // Credentials for the toolchain (deployer keys, RPC tokens) may live in .env
    dotenvy::dotenv().ok();

    let cli = Cli::from_args();

    // Initialize logging; RUST_LOG takes precedence over --verbose
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(log_level.into()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    let success = match &cli.command {
        Command::Run(cmd) => run_pipeline(cmd).await?,
        Command::Validate(cmd) => validate_pipeline(cmd)?,
    };

    Ok(if success { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

async fn run_pipeline(cmd: &RunCommand) -> Result<bool> {
    let mut runner = match PipelineRunner::from_file(&cmd.pipeline, &cmd.runner_options()) {
        Ok(runner) => runner,
        Err(e) => {
            error!("Failed to load pipeline {}: {}", cmd.pipeline.display(), e);
            if !cmd.json {
                println!("{} {}", CROSS, style(e).red());
            }
            return Ok(false);
        }
    };

    if !cmd.json {
        println!(
            "{} Loaded pipeline: {}",
            INFO,
            style(&runner.definition().name).bold()
        );

        let progress = create_progress_bar(runner.definition().jobs.len());
        runner.add_event_handler(move |event| {
            progress.println(format_run_event(event));
            match event {
                RunEvent::JobStarted { job_name, .. } => progress.set_message(job_name.clone()),
                RunEvent::JobFinished { .. } => progress.inc(1),
                RunEvent::PipelineFinished { .. } => progress.finish_and_clear(),
                _ => {}
            }
        });
    }

    let report = runner.run().await;

    if cmd.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize run report")?;
        println!("{}", json);
    } else {
        println!();
        println!("{}", format_run_summary(&report));
        if report.is_success() {
            println!(
                "\n{} {} completed {}",
                CHECK,
                style(&report.pipeline_name).bold(),
                style("successfully").green()
            );
        } else {
            println!(
                "\n{} {} {}",
                CROSS,
                style(&report.pipeline_name).bold(),
                style("failed").red()
            );
        }
    }

    Ok(report.is_success())
}

fn validate_pipeline(cmd: &ValidateCommand) -> Result<bool> {
    if !cmd.json {
        println!("{} Validating pipeline...", INFO);
    }

    match PipelineConfig::from_file(&cmd.pipeline) {
        Ok(config) => {
            let text = format_validation(&config, &ActionRegistry::builtin(), cmd.json)
                .context("Failed to serialize pipeline configuration")?;
            println!("{}", text);
            Ok(true)
        }
        Err(e) if cmd.json => {
            error!("Validation failed: {}", e);
            Ok(false)
        }
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(e).red());
            Ok(false)
        }
    }
}
