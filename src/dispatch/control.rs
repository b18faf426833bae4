//! Control command policy.
//!
//! CONTROL payloads carry a command line. Commands with the `docker`
//! prefix get a simulated-success reply embedding the command and the
//! current time; everything else gets an unknown-command reply. Nothing
//! is ever executed. This endpoint only confirms reachability of the
//! control channel, and the stub is intentional, not a placeholder.

use chrono::{SecondsFormat, Utc};

/// Prefix selecting the simulated-success path.
const DOCKER_PREFIX: &str = "docker";

/// Produce the reply text for a control command. Pure; no side effects.
///
/// # Example
///
/// ```
/// use udp2docker::dispatch::simulate_command;
///
/// let reply = simulate_command("docker ps");
/// assert!(reply.contains("docker ps"));
/// assert!(simulate_command("reboot").contains("Unknown command"));
/// ```
pub fn simulate_command(command: &str) -> String {
    if command.starts_with(DOCKER_PREFIX) {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        format!("Simulated execution: {command}\nstatus: success\ntime: {now}")
    } else {
        format!("Unknown command: {command}")
    }
}
