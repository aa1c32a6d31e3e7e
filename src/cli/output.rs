//! CLI output formatting

use crate::{
    actions::ActionRegistry,
    core::{JobOutcome, PipelineConfig},
    execution::{RunEvent, RunReport},
};
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Lines of a failing tool's stderr shown inline
const ERROR_PREVIEW_LINES: usize = 5;

/// Create a progress bar with one tick per job
pub fn create_progress_bar(total: usize) -> ProgressBar {
    let progress = ProgressBar::new(total as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    progress.set_style(style);
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

/// Format a job outcome for display
pub fn format_outcome(outcome: JobOutcome) -> String {
    match outcome {
        JobOutcome::Succeeded => style("SUCCESS").green().to_string(),
        JobOutcome::Failed => style("FAILURE").red().to_string(),
        JobOutcome::NoOutput => style("NO OUTPUT").yellow().to_string(),
    }
}

/// Format a run event for display
pub fn format_run_event(event: &RunEvent) -> String {
    match event {
        RunEvent::PipelineStarted {
            run_id,
            pipeline_name,
            total_jobs,
        } => format!(
            "{} Starting pipeline {} ({} jobs, run {})",
            ROCKET,
            style(pipeline_name).bold(),
            total_jobs,
            style(&run_id.to_string()[..8]).dim()
        ),
        RunEvent::JobStarted {
            index,
            job_name,
            action_id,
        } => format!(
            "{} [{}] {} {}",
            SPINNER,
            index + 1,
            style(job_name).cyan(),
            style(action_id).dim()
        ),
        RunEvent::ParameterUnresolved { job_name, warning } => {
            format!("{} {}: {}", WARN, style(job_name).yellow(), style(warning).dim())
        }
        RunEvent::UnknownAction { job_name, action_id } => format!(
            "{} {}: unknown action {}",
            WARN,
            style(job_name).yellow(),
            style(action_id).bold()
        ),
        RunEvent::JobFinished { job_name, output } => match output {
            Some(output) if output.is_success() => match output.fields.get("address") {
                Some(address) => format!(
                    "{} {} {}",
                    CHECK,
                    style(job_name).green(),
                    style(format!("address: {}", address.as_str().unwrap_or_default())).dim()
                ),
                None => format!("{} {}", CHECK, style(job_name).green()),
            },
            Some(output) => format!(
                "{} {}: {}",
                CROSS,
                style(job_name).red(),
                style(format_output(output.error.as_deref().unwrap_or_default(), ERROR_PREVIEW_LINES)).dim()
            ),
            None => format!("{} {} {}", WARN, style(job_name).yellow(), format_outcome(JobOutcome::NoOutput)),
        },
        RunEvent::PipelineFinished { run_id, success } => {
            let status = if *success {
                format!("{} completed", style("successfully").green())
            } else {
                style("failed").red().to_string()
            };
            format!(
                "{} Pipeline ({}) {}",
                INFO,
                style(&run_id.to_string()[..8]).dim(),
                status
            )
        }
    }
}

/// Format the final per-job table of a run
pub fn format_run_summary(report: &RunReport) -> String {
    let summary = report.summary();
    let mut lines = vec![format!(
        "{} {} - {} succeeded, {} failed, {} without output",
        INFO,
        style(&report.pipeline_name).bold(),
        style(summary.succeeded).green(),
        style(summary.failed).red(),
        style(summary.no_output).yellow()
    )];

    for job in &report.jobs {
        lines.push(format!(
            "  {:<20} {:<24} {}",
            job.job_name,
            style(&job.action_id).dim(),
            format_outcome(job.outcome())
        ));
    }

    if let Ok(duration) = report.finished_at.signed_duration_since(report.started_at).to_std() {
        lines.push(format!("  Duration: {}", style(format_duration(duration)).dim()));
    }

    lines.join("\n")
}

/// Format a validated pipeline for display
pub fn format_pipeline_config(config: &PipelineConfig) -> String {
    let mut lines = vec![format!("  Name: {}", style(&config.name).bold())];
    if let Some(description) = &config.description {
        lines.push(format!("  Description: {}", style(description).dim()));
    }
    lines.push(format!("  Jobs: {}", style(config.jobs.len()).cyan()));
    for job in &config.jobs {
        lines.push(format!("    - {} ({})", job.name, style(&job.uses).dim()));
    }
    lines.join("\n")
}

/// Everything `validate` prints for a valid pipeline
///
/// With `json` set the result is the configuration as JSON and nothing else.
pub fn format_validation(
    config: &PipelineConfig,
    registry: &ActionRegistry,
    json: bool,
) -> Result<String, serde_json::Error> {
    if json {
        return serde_json::to_string_pretty(config);
    }

    let mut lines = vec![
        format!("{} Pipeline configuration is valid!", CHECK),
        format_pipeline_config(config),
    ];
    for job in config.jobs.iter().filter(|job| !registry.supports(&job.uses)) {
        lines.push(format!(
            "{} Job {} uses unknown action {} and will produce no output",
            WARN,
            style(&job.name).yellow(),
            style(&job.uses).bold()
        ));
    }
    Ok(lines.join("\n"))
}

/// Format multi-line output with truncation
pub fn format_output(output: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = output.lines().collect();

    if lines.len() <= max_lines {
        output.to_string()
    } else {
        let truncated = lines[..max_lines].join("\n");
        format!(
            "{}\n{}... ({} more lines)",
            truncated,
            style("[truncated]").dim(),
            lines.len() - max_lines
        )
    }
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{}.{:01}s", secs, duration.subsec_millis() / 100)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
