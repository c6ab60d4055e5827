/// ANSI color helpers and role-colored transcript rendering.
use crate::transcript::Message;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const CYAN: &str = "\x1b[36m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const MAGENTA: &str = "\x1b[35m";
pub const BLUE: &str = "\x1b[34m";
pub const WHITE: &str = "\x1b[37m";
pub const BOLD_CYAN: &str = "\x1b[1;36m";

/// Presentation color per role. Roles outside the known set render white,
/// like the operator.
pub fn role_color(role: &str) -> &'static str {
    match role {
        "analyst" => GREEN,
        "researcher" => CYAN,
        "engineer" => YELLOW,
        "qa" => MAGENTA,
        "architect" | "pm" => BLUE,
        _ => WHITE,
    }
}

/// Print one transcript message in role-colored form.
pub fn print_message(message: &Message) {
    let color = role_color(&message.role);
    println!("{color}{BOLD}{}{RESET}: {}", message.role, message.content);
    if let Some(attachment) = &message.attachment {
        println!(
            "{DIM}  attached: {} ({}){RESET}",
            attachment.path.display(),
            attachment.media_type
        );
    }
}

/// Print the run startup banner.
pub fn print_startup_banner(role_order: &[String], rounds: u32, intervention_enabled: bool) {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!(
        "  {BOLD_CYAN}idswarm-cli{RESET} {DIM}v{version}{RESET}  {DIM}·{RESET}  rounds={rounds}  {DIM}·{RESET}  intervention={}",
        if intervention_enabled { "on" } else { "off" }
    );
    let colored = role_order
        .iter()
        .map(|role| format!("{}{role}{RESET}", role_color(role)))
        .collect::<Vec<_>>()
        .join(&format!(" {DIM}→{RESET} "));
    println!("  {colored}");
    println!("  {DIM}{}{RESET}", "━".repeat(68));
    println!();
}
