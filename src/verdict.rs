/// Verdict extraction from validation-role output.
///
/// This is the only place model output is interpreted as control-flow data,
/// so parsing must never panic and must fail open: anything that does not
/// decode into the expected shape becomes a PASS verdict with a warning.
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictStatus {
    Pass,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub status: VerdictStatus,
    pub recheck: Vec<String>,
}

impl Verdict {
    /// The fail-open default used whenever validation output is malformed.
    pub fn pass() -> Self {
        Self {
            status: VerdictStatus::Pass,
            recheck: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawVerdict {
    #[serde(default)]
    validation_status: Option<String>,
    #[serde(default)]
    recheck: Vec<Value>,
}

/// Parse a verdict out of one message's text content. Roles not present in
/// `allowed_roles` are dropped with a warning, never an error.
pub fn parse_verdict(content: &str, allowed_roles: &[String]) -> Verdict {
    let raw = match decode(content) {
        Some(raw) => raw,
        None => {
            warn!("validation output was not a structured verdict; defaulting to PASS");
            return Verdict::pass();
        }
    };

    let status = match raw.validation_status.as_deref().map(str::trim) {
        Some(value) if value.eq_ignore_ascii_case("fail") => VerdictStatus::Fail,
        Some(value) if value.eq_ignore_ascii_case("pass") => VerdictStatus::Pass,
        Some(other) => {
            warn!(
                status = other,
                "unrecognized validation_status; defaulting to PASS"
            );
            VerdictStatus::Pass
        }
        None => VerdictStatus::Pass,
    };

    let mut recheck = Vec::new();
    for entry in raw.recheck {
        match entry.as_str() {
            Some(role) => {
                let role = role.trim().to_ascii_lowercase();
                if allowed_roles.contains(&role) {
                    recheck.push(role);
                } else {
                    warn!(role = %role, "recheck target is not a configured role; skipping");
                }
            }
            None => warn!(entry = %entry, "non-string recheck entry; skipping"),
        }
    }

    Verdict { status, recheck }
}

fn decode(content: &str) -> Option<RawVerdict> {
    let trimmed = content.trim();
    if let Ok(raw) = serde_json::from_str::<RawVerdict>(trimmed) {
        return Some(raw);
    }
    // Models often wrap the payload in a fenced code block; tolerate that one
    // indirection before falling back to the PASS default.
    fenced_block(trimmed).and_then(|block| serde_json::from_str::<RawVerdict>(block).ok())
}

fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let rest = &text[start + 3..];
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}
