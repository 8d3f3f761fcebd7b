use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use release_devkit::analyzer::ReleaseDetermination;
use release_devkit::cli::orchestration::{run_batch, select_targets, BatchArgs, BatchOutcome};
use release_devkit::config;
use release_devkit::host::GitHubHost;
use release_devkit::ui;

#[derive(clap::Parser)]
#[command(
    name = "devkit",
    version,
    about = "Compute next release tags and changelogs from merged pull requests"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, help = "Project definitions file (overrides the configured one)")]
    projects: Option<String>,

    #[arg(short = 'p', long = "project", help = "Only this project (repeatable)")]
    project: Vec<String>,

    #[arg(short, long, help = "Only this branch")]
    branch: Option<String>,

    #[arg(long, help = "Print only the changelog markdown")]
    markdown: bool,

    #[arg(long, help = "Show configured projects and exit")]
    list: bool,

    #[arg(short, long, help = "Enable debug logging")]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "release_devkit=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = config::load_config(args.config.as_deref()).context("Error loading config")?;
    let projects_file = args
        .projects
        .clone()
        .unwrap_or_else(|| config.projects_file.clone());
    let projects = config::load_projects(&projects_file)?;

    if args.list {
        ui::display_available_projects(&projects);
        return Ok(());
    }

    let batch_args = BatchArgs {
        projects: args.project.clone(),
        branch: args.branch.clone(),
    };
    let targets = select_targets(&projects, &batch_args)?;

    let host = GitHubHost::with_api_url(config.token(), config.github.api_url.clone())?;
    let determination = ReleaseDetermination::from_config(host, &config);

    if !args.markdown {
        ui::display_status(&format!(
            "Computing {} release(s) for {}",
            targets.len(),
            config.github.organization
        ));
    }

    let entries = run_batch(&determination, &targets);
    let mut failures = 0;

    for entry in &entries {
        match &entry.outcome {
            BatchOutcome::Released(release) if args.markdown => ui::display_changelog(release),
            BatchOutcome::Released(release) => ui::display_release(release),
            BatchOutcome::Skipped(reason) => {
                if !args.markdown {
                    ui::display_skipped(&entry.project, &entry.branch, &reason.to_string());
                }
            }
            BatchOutcome::Failed(e) => {
                failures += 1;
                ui::display_error(&format!("{} {}: {}", entry.project, entry.branch, e));
            }
        }
    }

    if failures > 0 {
        std::process::exit(1);
    }

    if !args.markdown {
        ui::display_success(&format!("Processed {} project branch(es)", entries.len()));
    }

    Ok(())
}
