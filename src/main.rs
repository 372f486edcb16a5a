use anyhow::{Context, Result};
use tracing::{debug, error, Level};
use tracing_subscriber::FmtSubscriber;
use wasm_pipeline::cli::commands::{BuildCommand, BuildOverrides, PlanCommand};
use wasm_pipeline::cli::output::*;
use wasm_pipeline::cli::{Cli, Command};
use wasm_pipeline::core::config::BuildConfig;
use wasm_pipeline::execution::{ExecutionEngine, ExecutionEvent};
use wasm_pipeline::{FsAssetStager, ProcessRunner};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    let code = match &cli.command_or_default() {
        Command::Build(cmd) => run_build(&cli, cmd).await?,
        Command::Plan(cmd) => show_plan(&cli, cmd)?,
    };

    if code != 0 {
        std::process::exit(code);
    }

    Ok(())
}

/// Load the configuration file (if any) and apply command-line overrides
fn load_config(cli: &Cli, overrides: &BuildOverrides) -> Result<BuildConfig> {
    let mut config = match &cli.config {
        Some(path) => BuildConfig::from_file(path)
            .with_context(|| format!("Failed to load build config {}", path.display()))?,
        None => BuildConfig::default(),
    };

    overrides.apply(&mut config);
    config.validate().context("Invalid build configuration")?;
    debug!("Effective configuration: {:?}", config);

    Ok(config)
}

async fn run_build(cli: &Cli, cmd: &BuildCommand) -> Result<i32> {
    let mut config = load_config(cli, &cmd.overrides)?;
    config.extra_args.extend(cmd.extra_args.iter().cloned());

    let mut pipeline = config.to_pipeline();

    let mut engine = ExecutionEngine::new(ProcessRunner::new(), FsAssetStager::new());
    engine.add_event_handler(|event| {
        println!("{}", format_execution_event(event));

        if let ExecutionEvent::StepFailed { stderr, .. } = event {
            if let Some(summary) = format_stderr_summary(stderr, 20) {
                eprintln!("{}", summary);
            }
        }
    });

    let interrupt = async {
        if tokio::signal::ctrl_c().await.is_err() {
            // No signal handler available; never interrupt
            std::future::pending::<()>().await;
        }
    };

    let outcome = engine.execute_until(&mut pipeline, interrupt).await;

    if pipeline.has_failed() {
        println!(
            "\n{} {} {}",
            CROSS,
            style(&pipeline.name).bold(),
            style("failed").red()
        );
        if let Some(failure) = &outcome.failure {
            error!("{}", failure);
        }
    } else {
        println!(
            "\n{} {} built {}",
            CHECK,
            style(&pipeline.name).bold(),
            style("successfully").green()
        );
    }

    Ok(outcome.exit_code())
}

fn show_plan(cli: &Cli, cmd: &PlanCommand) -> Result<i32> {
    let config = load_config(cli, &cmd.overrides)?;
    let pipeline = config.to_pipeline();

    if cmd.json {
        let json = serde_json::to_string_pretty(&pipeline)?;
        println!("{}", json);
    } else {
        println!("{}", format_plan(&pipeline));
    }

    Ok(0)
}
