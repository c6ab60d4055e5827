use clap::{Parser, Subcommand};

const CLI_EXAMPLES: &str = "Examples:\n\
  idswarm-cli run\n\
  idswarm-cli run --rounds 2 --no-intervention\n\
  idswarm-cli run --input-dir ./drop \"Extract identity fields from the attached file\"\n\
  idswarm-cli --model gpt-4o-mini run\n\
  idswarm-cli doctor\n\
  idswarm-cli config show\n\
\n\
Intervention behavior:\n\
  - With intervention enabled, press enter within the timeout window to skip,\n\
    or type a message to inject it into the conversation after the current turn.\n\
  - Use --no-intervention for fully unattended runs.";

#[derive(Debug, Parser)]
#[command(name = "idswarm-cli")]
#[command(about = "Sequential multi-agent pipeline for identity dataset extraction")]
#[command(after_long_help = CLI_EXAMPLES)]
pub struct Cli {
    #[arg(long, env = "IDSWARM_CONFIG", default_value = ".idswarm/settings.toml")]
    pub config_path: String,

    /// Override the model for every role in this invocation.
    #[arg(long, env = "IDSWARM_MODEL")]
    pub model: Option<String>,

    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    pub log_filter: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "Run the agent pipeline over the configured role order")]
    Run {
        /// Optional seed prompt override (joined with spaces).
        prompt: Vec<String>,
        #[arg(long)]
        rounds: Option<u32>,
        #[arg(long)]
        input_dir: Option<String>,
        #[arg(long, default_value_t = false)]
        no_intervention: bool,
        #[arg(long)]
        intervention_timeout_secs: Option<u64>,
    },
    #[command(about = "Validate provider environment and workflow configuration")]
    Doctor,
    #[command(about = "Inspect resolved workflow and role configuration")]
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    #[command(about = "Show the resolved runtime configuration")]
    Show,
}

pub fn command_label(command: &Commands) -> &'static str {
    match command {
        Commands::Run { .. } => "run",
        Commands::Doctor => "doctor",
        Commands::Config { command } => match command {
            ConfigCommands::Show => "config.show",
        },
    }
}
