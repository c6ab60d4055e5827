use anyhow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Config,
    Provider,
    Input,
    Internal,
}

impl ErrorCategory {
    pub fn code(self) -> &'static str {
        match self {
            ErrorCategory::Config => "CONFIG",
            ErrorCategory::Provider => "PROVIDER",
            ErrorCategory::Input => "INPUT",
            ErrorCategory::Internal => "INTERNAL",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            ErrorCategory::Config => {
                "Check the settings file (--config-path) for [workflow] and per-role [roles.*] sections."
            }
            ErrorCategory::Provider => {
                "Set OPENAI_API_KEY (and optionally IDSWARM_API_BASE), then run doctor to verify."
            }
            ErrorCategory::Input => "Run idswarm-cli --help and correct command arguments.",
            ErrorCategory::Internal => {
                "Retry with RUST_LOG=debug. If it persists, capture logs and open an issue."
            }
        }
    }
}

pub fn categorize_error(err: &anyhow::Error) -> ErrorCategory {
    let msg = format!("{err:#}").to_ascii_lowercase();

    if msg.contains("api_key") || msg.contains("chat completion") || msg.contains("provider") {
        return ErrorCategory::Provider;
    }

    if msg.contains("settings")
        || msg.contains("role_order")
        || msg.contains("[roles.")
        || msg.contains("workflow.")
    {
        return ErrorCategory::Config;
    }

    if msg.contains("invalid value") || msg.contains("unknown argument") || msg.contains("prompt") {
        return ErrorCategory::Input;
    }

    ErrorCategory::Internal
}

pub fn format_cli_error(err: &anyhow::Error) -> String {
    let category = categorize_error(err);
    format!("[{}] {:#}\nHint: {}", category.code(), err, category.hint())
}
