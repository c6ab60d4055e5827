use std::time::Duration;

use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;

use crate::theme::{DIM, RESET};
use crate::transcript::Message;

/// Bounded-time window for an operator to inject a message between turns.
///
/// The wait is a cancellable `tokio::time::timeout` over a line channel, so a
/// process hosting multiple runs is never blocked by an idle operator. Expiry
/// is a silent no-op.
pub struct InterventionGate {
    lines: mpsc::Receiver<String>,
    prompt: Option<&'static str>,
}

impl InterventionGate {
    pub fn new(lines: mpsc::Receiver<String>) -> Self {
        Self {
            lines,
            prompt: None,
        }
    }

    /// Gate fed by stdin. The reader task outlives individual waits; lines
    /// typed outside a window are delivered at the next one.
    pub fn console() -> Self {
        let (tx, rx) = mpsc::channel(4);
        tokio::spawn(async move {
            let mut reader = tokio::io::BufReader::new(tokio::io::stdin()).lines();
            while let Ok(Some(line)) = reader.next_line().await {
                if tx.send(line).await.is_err() {
                    break;
                }
            }
        });
        let mut gate = Self::new(rx);
        gate.prompt = Some("intervene? (enter to skip)");
        gate
    }

    /// Wait up to `timeout` for operator input. Returns a "user" message if a
    /// non-empty line arrives, `None` on expiry, empty input, or a closed
    /// channel.
    pub async fn await_intervention(&mut self, timeout: Duration) -> Option<Message> {
        if let Some(prompt) = self.prompt {
            println!("{DIM}{prompt}{RESET}");
        }
        match tokio::time::timeout(timeout, self.lines.recv()).await {
            Ok(Some(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    None
                } else {
                    Some(Message::user(line))
                }
            }
            Ok(None) => None,
            Err(_) => None,
        }
    }
}
