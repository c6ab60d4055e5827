use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cli::{Cli, Commands};

pub const DEFAULT_ROLE_ORDER: &[&str] = &["analyst", "researcher", "engineer", "qa", "pm"];
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_SEED_PROMPT: &str = "Create a synthetic user list with 10 unique users that \
     details multivalued access levels and entitlements for each user.";

/// Fully resolved, immutable configuration for one run. Built once from the
/// settings file plus CLI overrides; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub config_path: String,
    pub role_order: Vec<String>,
    pub build_role: String,
    pub validation_role: String,
    pub rounds: u32,
    pub intervention_enabled: bool,
    pub intervention_timeout_secs: u64,
    pub max_recheck_targets: usize,
    pub input_dir: PathBuf,
    pub seed_prompt: String,
    pub roles: HashMap<String, ResolvedRole>,
    pub telemetry_enabled: bool,
    pub telemetry_path: String,
}

/// Per-role model and behavior parameters after defaulting.
#[derive(Debug, Clone)]
pub struct ResolvedRole {
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub system_message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    #[serde(default)]
    pub workflow: WorkflowSection,
    #[serde(default)]
    pub telemetry: TelemetrySection,
    #[serde(default)]
    pub roles: HashMap<String, RoleSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkflowSection {
    pub role_order: Option<Vec<String>>,
    pub build_role: Option<String>,
    pub validation_role: Option<String>,
    pub rounds: Option<u32>,
    pub intervention_enabled: Option<bool>,
    pub intervention_timeout_secs: Option<u64>,
    pub max_recheck_targets: Option<usize>,
    pub input_dir: Option<String>,
    pub seed_prompt: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetrySection {
    pub enabled: Option<bool>,
    pub path: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoleSection {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub system_message: Option<String>,
}

/// Load the settings file. A missing file is fatal: the pipeline must not
/// start without explicit per-role configuration.
pub fn load_settings(config_path: &str) -> Result<SettingsFile> {
    let path = Path::new(config_path);
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file at '{}'", path.display()))?;
    toml::from_str::<SettingsFile>(&content).with_context(|| {
        format!(
            "invalid settings in '{}'. Check [workflow] and [roles.*] field names.",
            path.display()
        )
    })
}

pub fn resolve_runtime_config(cli: &Cli, settings: &SettingsFile) -> Result<RuntimeConfig> {
    let workflow = &settings.workflow;

    let role_order = workflow.role_order.clone().unwrap_or_else(|| {
        DEFAULT_ROLE_ORDER
            .iter()
            .map(|role| role.to_string())
            .collect()
    });
    if role_order.is_empty() {
        return Err(anyhow::anyhow!(
            "workflow.role_order cannot be empty. Remove the key to use the default order."
        ));
    }

    let build_role = workflow
        .build_role
        .clone()
        .unwrap_or_else(|| "engineer".to_string());
    let validation_role = workflow
        .validation_role
        .clone()
        .unwrap_or_else(|| "qa".to_string());

    for (label, role) in [("build_role", &build_role), ("validation_role", &validation_role)] {
        if !role_order.contains(role) {
            return Err(anyhow::anyhow!(
                "workflow.{} '{}' is not in role_order ({})",
                label,
                role,
                role_order.join(", ")
            ));
        }
    }

    let mut roles = HashMap::new();
    for role in &role_order {
        let section = settings.roles.get(role).ok_or_else(|| {
            anyhow::anyhow!(
                "missing [roles.{}] section in '{}'. Every role in role_order needs one.",
                role,
                cli.config_path
            )
        })?;
        roles.insert(
            role.clone(),
            ResolvedRole {
                model: cli
                    .model
                    .clone()
                    .or_else(|| section.model.clone())
                    .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                temperature: section.temperature,
                max_tokens: section.max_tokens,
                system_message: section.system_message.clone().unwrap_or_default(),
            },
        );
    }

    let (cli_rounds, cli_input_dir, cli_no_intervention, cli_timeout, cli_prompt) =
        match &cli.command {
            Commands::Run {
                prompt,
                rounds,
                input_dir,
                no_intervention,
                intervention_timeout_secs,
            } => (
                *rounds,
                input_dir.clone(),
                *no_intervention,
                *intervention_timeout_secs,
                (!prompt.is_empty()).then(|| prompt.join(" ")),
            ),
            _ => (None, None, false, None, None),
        };

    let intervention_enabled = if cli_no_intervention {
        false
    } else {
        workflow.intervention_enabled.unwrap_or(false)
    };

    Ok(RuntimeConfig {
        config_path: cli.config_path.clone(),
        role_order,
        build_role,
        validation_role,
        rounds: cli_rounds.or(workflow.rounds).unwrap_or(1).max(1),
        intervention_enabled,
        intervention_timeout_secs: cli_timeout
            .or(workflow.intervention_timeout_secs)
            .unwrap_or(30)
            .max(1),
        max_recheck_targets: workflow.max_recheck_targets.unwrap_or(8).max(1),
        input_dir: PathBuf::from(
            cli_input_dir
                .or_else(|| workflow.input_dir.clone())
                .unwrap_or_else(|| "input".to_string()),
        ),
        seed_prompt: cli_prompt
            .or_else(|| workflow.seed_prompt.clone())
            .unwrap_or_else(|| DEFAULT_SEED_PROMPT.to_string()),
        roles,
        telemetry_enabled: settings.telemetry.enabled.unwrap_or(true),
        telemetry_path: settings
            .telemetry
            .path
            .clone()
            .unwrap_or_else(|| ".idswarm/telemetry/events.jsonl".to_string()),
    })
}
