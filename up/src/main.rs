use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, info};

use progresscore::region::ProgressIndicators;
use progresscore::{get_course_passed_info, get_course_totals, render_passed};
use updateprogress::cli::{Cli, Command};
use updateprogress::config::Config;
use updateprogress::{UpdateOptions, load_progress_data, render_progress_file, update_document};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Priority: CLI --log-level > config file > WARN
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to WARN", s);
                tracing::Level::WARN
            }
        },
        None => tracing::Level::WARN,
    };

    // stdout carries rendered output, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .map_err(|e| eyre::eyre!("Failed to initialize tracing: {}", e))?;

    debug!("Logging initialized (level: {:?})", level);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!("updateprogress starting");

    let progress_or_default = |progress: Option<PathBuf>| progress.unwrap_or_else(|| config.progress_path.clone());

    match cli.command {
        Command::Update {
            progress,
            readme,
            dry_run,
        } => {
            let options = UpdateOptions {
                progress_path: progress_or_default(progress),
                readme_path: readme.unwrap_or_else(|| config.readme_path.clone()),
                section: config.section.clone(),
                dry_run,
            };
            let outcome = update_document(&options)?;
            if dry_run {
                print!("{}", outcome.document);
            } else if outcome.written {
                println!(
                    "{} Updated {} in {}",
                    "✓".green(),
                    outcome.progress_name.cyan(),
                    outcome.readme_path.display()
                );
            } else {
                println!(
                    "{} {} is already up to date",
                    "✓".green(),
                    outcome.readme_path.display()
                );
            }
        }
        Command::Render { progress } => {
            let (_, content) = render_progress_file(&progress_or_default(progress))?;
            println!("{}", content);
        }
        Command::Check { progress } => {
            let path = progress_or_default(progress);
            let data = load_progress_data(&path)?;
            progresscore::check_version(data.version).context(format!("Unsupported progress file: {}", path.display()))?;
            let requirements = data.requirements_or_default();
            let totals = get_course_totals(&data.exercises, &requirements);
            let evaluation = get_course_passed_info(&data.exercises, &requirements);

            let title = data.name.as_deref().unwrap_or(&data.progress_name);
            println!("Course: {}", title.cyan());
            println!(
                "  Points: {}/{}",
                progresscore::render::render_floating_point_number(totals.achieved_points),
                progresscore::render::render_floating_point_number(totals.total_points)
            );
            println!(
                "  Passed exercises: {}/{}",
                totals.passed_exercises, totals.exercises_with_submission
            );
            for row in &evaluation.requirements {
                let status = if row.passed {
                    row.status.green()
                } else {
                    row.status.red()
                };
                println!("  {} {} ({})", render_passed(Some(row.passed)), row.requirement, status);
            }
            if evaluation.passed {
                println!("{} All requirements met", "✓".green());
            } else {
                println!("{} Requirements not met", "✗".red());
            }
        }
        Command::Markers { id, section } => {
            let section = section.unwrap_or_else(|| config.section.clone());
            let indicators = ProgressIndicators::new(&id, &section);
            println!("{}", indicators.begin);
            println!("{}", indicators.end);
        }
    }

    Ok(())
}
