use anyhow::Result;

use crate::config::RuntimeConfig;
use crate::ingest::find_seed_attachment;
use crate::provider::{DEFAULT_API_BASE, env_present};

pub fn run_doctor(cfg: &RuntimeConfig) -> Result<()> {
    println!("Settings file: {}", cfg.config_path);

    println!("Provider environment check:");
    for key in ["OPENAI_API_KEY", "IDSWARM_API_BASE"] {
        let status = if env_present(key) { "set" } else { "missing" };
        println!("- {key}: {status}");
    }
    println!(
        "API base: {}",
        std::env::var("IDSWARM_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string())
    );

    println!(
        "Workflow: roles={} rounds={} build_role={} validation_role={} max_recheck_targets={}",
        cfg.role_order.join(","),
        cfg.rounds,
        cfg.build_role,
        cfg.validation_role,
        cfg.max_recheck_targets
    );
    println!(
        "Intervention: enabled={} timeout_secs={}",
        cfg.intervention_enabled, cfg.intervention_timeout_secs
    );

    for role in &cfg.role_order {
        if let Some(resolved) = cfg.roles.get(role) {
            println!(
                "- role {role}: model={} temperature={} max_tokens={} system_message_chars={}",
                resolved.model,
                resolved
                    .temperature
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "<default>".to_string()),
                resolved
                    .max_tokens
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "<default>".to_string()),
                resolved.system_message.len()
            );
        }
    }

    match find_seed_attachment(&cfg.input_dir)? {
        Some(attachment) => println!(
            "Input: {} will be attached ({})",
            attachment.path.display(),
            attachment.media_type
        ),
        None => println!(
            "Input: no accepted file under '{}'; the run will use a text-only seed",
            cfg.input_dir.display()
        ),
    }

    println!(
        "Telemetry: enabled={} path={}",
        cfg.telemetry_enabled, cfg.telemetry_path
    );

    Ok(())
}
