use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::config::{ResolvedRole, RuntimeConfig};
use crate::provider::{ChatClient, ChatMessage};
use crate::transcript::Message;

/// Role-bound conversational capability. All roles share this one contract;
/// they differ only in configuration, not in type.
#[async_trait]
pub trait AgentHandle: Send + Sync {
    fn role(&self) -> &str;

    /// Produce the next message given the full conversation so far. The
    /// history is read-only; implementations append nothing themselves.
    async fn respond(&self, history: &[Message]) -> Result<Message>;
}

/// Agent handle backed by a chat-completions model. One per configured role,
/// sharing a single client.
pub struct LlmAgent {
    role: String,
    config: ResolvedRole,
    client: Arc<ChatClient>,
}

impl LlmAgent {
    pub fn new(role: impl Into<String>, config: ResolvedRole, client: Arc<ChatClient>) -> Self {
        Self {
            role: role.into(),
            config,
            client,
        }
    }

    fn render_history(&self, history: &[Message]) -> Vec<ChatMessage> {
        let mut chat = Vec::with_capacity(history.len() + 1);
        if !self.config.system_message.is_empty() {
            chat.push(ChatMessage::system(self.config.system_message.clone()));
        }
        for message in history {
            let mut rendered = message.content.clone();
            if let Some(attachment) = &message.attachment {
                rendered.push_str(&format!(
                    "\n[attached file: {} ({})]",
                    attachment.path.display(),
                    attachment.media_type
                ));
            }
            // The model only sees its own past turns as "assistant"; every
            // other participant is folded into prefixed user turns.
            if message.role == self.role {
                chat.push(ChatMessage::assistant(rendered));
            } else {
                chat.push(ChatMessage::user(format!("{}: {}", message.role, rendered)));
            }
        }
        chat
    }
}

#[async_trait]
impl AgentHandle for LlmAgent {
    fn role(&self) -> &str {
        &self.role
    }

    async fn respond(&self, history: &[Message]) -> Result<Message> {
        let chat = self.render_history(history);
        let content = self
            .client
            .complete(
                &self.config.model,
                self.config.temperature,
                self.config.max_tokens,
                &chat,
            )
            .await
            .with_context(|| format!("agent '{}' invocation failed", self.role))?;
        Ok(Message::agent(&self.role, content))
    }
}

/// Build one handle per role in the configured order. Role resolution has
/// already been validated by config loading.
pub fn build_agents(
    cfg: &RuntimeConfig,
    client: Arc<ChatClient>,
) -> Result<HashMap<String, Arc<dyn AgentHandle>>> {
    let mut agents = HashMap::<String, Arc<dyn AgentHandle>>::new();
    for role in &cfg.role_order {
        let resolved = cfg
            .roles
            .get(role)
            .ok_or_else(|| anyhow::anyhow!("missing resolved settings for role '{}'", role))?;
        agents.insert(
            role.clone(),
            Arc::new(LlmAgent::new(role.clone(), resolved.clone(), client.clone())),
        );
    }
    Ok(agents)
}
