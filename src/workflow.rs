use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde_json::json;
use tracing::{info, warn};

use crate::agent::AgentHandle;
use crate::config::RuntimeConfig;
use crate::intervene::InterventionGate;
use crate::telemetry::TelemetrySink;
use crate::theme;
use crate::transcript::{Message, Transcript};
use crate::verdict::{VerdictStatus, parse_verdict};

/// Scripted nudge appended after the build role's turn. A fixed instruction,
/// not a model decision.
pub const BUILD_FOLLOW_UP: &str = "Generate the provisioning dataset now: produce CSV content \
     with one row per user and a multivalued entitlements column, and include it verbatim in \
     your reply.";

/// Fixed routing instruction appended before recheck turns on a FAIL verdict.
pub const REASSESS_INSTRUCTION: &str = "The validation verdict was FAIL. The flagged roles will \
     now re-assess their contributions and correct the dataset.";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub rounds: u32,
    pub turns: usize,
    pub fail_verdicts: usize,
    pub interventions: usize,
}

/// Drives the fixed role order for the configured number of rounds. Owns the
/// transcript for the duration of `run`; nothing else writes to it.
pub struct Workflow {
    cfg: RuntimeConfig,
    agents: HashMap<String, Arc<dyn AgentHandle>>,
    gate: Option<InterventionGate>,
    telemetry: TelemetrySink,
    console: bool,
}

impl Workflow {
    pub fn new(
        cfg: RuntimeConfig,
        agents: HashMap<String, Arc<dyn AgentHandle>>,
        gate: Option<InterventionGate>,
        telemetry: TelemetrySink,
    ) -> Result<Self> {
        for role in &cfg.role_order {
            if !agents.contains_key(role) {
                return Err(anyhow::anyhow!(
                    "no agent handle for configured role '{}'",
                    role
                ));
            }
        }
        Ok(Self {
            cfg,
            agents,
            gate,
            telemetry,
            console: true,
        })
    }

    /// Suppress console rendering; the transcript and telemetry still record
    /// every message.
    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    pub async fn run(&mut self, transcript: &mut Transcript) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let role_order = self.cfg.role_order.clone();
        let timeout = Duration::from_secs(self.cfg.intervention_timeout_secs);

        for round in 1..=self.cfg.rounds {
            info!(round, "round started");
            for role in &role_order {
                let reply = self.invoke(role, transcript).await?;
                // The verdict is parsed from the validator's own reply, not
                // from whatever happens to sit last after scripted appends.
                let validation_output =
                    (*role == self.cfg.validation_role).then(|| reply.content.clone());
                self.append(transcript, reply, &mut summary);

                if *role == self.cfg.build_role {
                    self.append(transcript, Message::user(BUILD_FOLLOW_UP), &mut summary);
                }

                if let Some(content) = validation_output {
                    self.handle_verdict(&content, transcript, &mut summary)
                        .await?;
                }

                if let Some(gate) = self.gate.as_mut() {
                    if let Some(message) = gate.await_intervention(timeout).await {
                        summary.interventions += 1;
                        self.telemetry
                            .emit("intervention.injected", json!({ "round": round }));
                        self.append(transcript, message, &mut summary);
                    }
                }
            }
            info!(round, "round completed");
        }

        summary.rounds = self.cfg.rounds;
        self.telemetry.emit(
            "run.completed",
            json!({
                "rounds": summary.rounds,
                "messages": transcript.len(),
                "fail_verdicts": summary.fail_verdicts,
                "interventions": summary.interventions,
            }),
        );
        Ok(summary)
    }

    /// Parse the validation reply and, on FAIL, route the recheck subset.
    /// Malformed output and unknown roles have already been absorbed by the
    /// parser; nothing here aborts the run except a real agent invocation
    /// failure.
    async fn handle_verdict(
        &mut self,
        content: &str,
        transcript: &mut Transcript,
        summary: &mut RunSummary,
    ) -> Result<()> {
        let verdict = parse_verdict(content, &self.cfg.role_order);

        self.telemetry.emit(
            "verdict.parsed",
            json!({
                "status": match verdict.status {
                    VerdictStatus::Pass => "pass",
                    VerdictStatus::Fail => "fail",
                },
                "recheck": verdict.recheck,
            }),
        );

        if verdict.status == VerdictStatus::Pass {
            return Ok(());
        }

        summary.fail_verdicts += 1;
        self.append(transcript, Message::user(REASSESS_INSTRUCTION), summary);

        let mut targets = verdict.recheck;
        if targets.len() > self.cfg.max_recheck_targets {
            warn!(
                requested = targets.len(),
                limit = self.cfg.max_recheck_targets,
                "recheck list exceeds configured bound; truncating"
            );
            targets.truncate(self.cfg.max_recheck_targets);
        }

        for target in targets {
            let reply = self.invoke(&target, transcript).await?;
            self.append(transcript, reply, summary);
        }
        Ok(())
    }

    async fn invoke(&self, role: &str, transcript: &Transcript) -> Result<Message> {
        let handle = self
            .agents
            .get(role)
            .ok_or_else(|| anyhow::anyhow!("no agent handle for role '{}'", role))?;
        handle.respond(transcript.messages()).await
    }

    fn append(&self, transcript: &mut Transcript, message: Message, summary: &mut RunSummary) {
        if self.console {
            theme::print_message(&message);
        }
        self.telemetry.emit(
            "turn.completed",
            json!({ "role": message.role, "chars": message.content.len() }),
        );
        summary.turns += 1;
        transcript.push(message);
    }
}
