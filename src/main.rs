use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use idswarm_cli::agent::build_agents;
use idswarm_cli::cli::{Cli, Commands, ConfigCommands, command_label};
use idswarm_cli::config::{RuntimeConfig, load_settings, resolve_runtime_config};
use idswarm_cli::doctor::run_doctor;
use idswarm_cli::error::{categorize_error, format_cli_error};
use idswarm_cli::ingest::find_seed_attachment;
use idswarm_cli::intervene::InterventionGate;
use idswarm_cli::provider::ChatClient;
use idswarm_cli::telemetry::TelemetrySink;
use idswarm_cli::theme;
use idswarm_cli::transcript::{Message, Transcript};
use idswarm_cli::workflow::Workflow;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_filter)?;
    if let Err(err) = run_cli(cli).await {
        eprintln!("{}", format_cli_error(&err));
        tracing::error!(category = %categorize_error(&err).code(), error = %err, "command failed");
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing(log_filter: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {e}"))
}

async fn run_cli(cli: Cli) -> Result<()> {
    let settings = load_settings(&cli.config_path)?;
    let cfg = resolve_runtime_config(&cli, &settings)?;
    tracing::debug!(command = command_label(&cli.command), "resolved configuration");

    match &cli.command {
        Commands::Run { .. } => run_pipeline(cfg).await,
        Commands::Doctor => run_doctor(&cfg),
        Commands::Config { command } => match command {
            ConfigCommands::Show => show_config(&cfg),
        },
    }
}

async fn run_pipeline(cfg: RuntimeConfig) -> Result<()> {
    let client = Arc::new(ChatClient::from_env()?);
    let agents = build_agents(&cfg, client)?;
    let telemetry = TelemetrySink::new(&cfg, "run");
    let gate = cfg.intervention_enabled.then(InterventionGate::console);

    let mut seed = Message::user(cfg.seed_prompt.clone());
    if let Some(attachment) = find_seed_attachment(&cfg.input_dir)? {
        seed = seed.with_attachment(attachment);
    }

    theme::print_startup_banner(&cfg.role_order, cfg.rounds, cfg.intervention_enabled);
    theme::print_message(&seed);

    let mut transcript = Transcript::seeded(seed);
    let mut workflow = Workflow::new(cfg, agents, gate, telemetry)?;

    let summary = tokio::select! {
        result = workflow.run(&mut transcript) => result.context("pipeline run failed")?,
        _ = tokio::signal::ctrl_c() => {
            return Err(anyhow::anyhow!("run aborted by operator"));
        }
    };

    println!();
    println!(
        "Run complete: rounds={} turns={} fail_verdicts={} interventions={} messages={}",
        summary.rounds,
        summary.turns,
        summary.fail_verdicts,
        summary.interventions,
        transcript.len()
    );
    Ok(())
}

fn show_config(cfg: &RuntimeConfig) -> Result<()> {
    println!("config_path: {}", cfg.config_path);
    println!("role_order: {}", cfg.role_order.join(", "));
    println!("build_role: {}", cfg.build_role);
    println!("validation_role: {}", cfg.validation_role);
    println!("rounds: {}", cfg.rounds);
    println!(
        "intervention: enabled={} timeout_secs={}",
        cfg.intervention_enabled, cfg.intervention_timeout_secs
    );
    println!("max_recheck_targets: {}", cfg.max_recheck_targets);
    println!("input_dir: {}", cfg.input_dir.display());
    println!("seed_prompt: {}", cfg.seed_prompt);
    for role in &cfg.role_order {
        if let Some(resolved) = cfg.roles.get(role) {
            println!(
                "roles.{role}: model={} temperature={:?} max_tokens={:?}",
                resolved.model, resolved.temperature, resolved.max_tokens
            );
        }
    }
    println!(
        "telemetry: enabled={} path={}",
        cfg.telemetry_enabled, cfg.telemetry_path
    );
    Ok(())
}
