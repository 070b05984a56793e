//! Audible completion alarm

use std::io::Write;
use tokio::process::Command;
use tracing::{debug, info};

/// Terminal bell, used when no alarm command is configured
const BELL: &[u8] = b"\x07";

/// Play the completion alarm.
///
/// Runs `command` (program followed by whitespace-separated arguments) when
/// given, otherwise rings the terminal bell.
pub async fn play_alarm(command: Option<&str>) -> Result<(), String> {
    let Some(command) = command.map(str::trim).filter(|c| !c.is_empty()) else {
        return ring_bell();
    };

    let mut parts = command.split_whitespace();
    let program = parts.next()
        .ok_or_else(|| "Alarm command is empty".to_string())?;

    info!("Playing alarm: {}", command);
    let output = Command::new(program)
        .args(parts)
        .output()
        .await
        .map_err(|e| format!("Failed to execute alarm command '{}': {}", program, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("Alarm command '{}' failed: {}", program, stderr.trim()));
    }

    debug!("Alarm command finished");
    Ok(())
}

fn ring_bell() -> Result<(), String> {
    let mut stdout = std::io::stdout();
    stdout.write_all(BELL)
        .and_then(|_| stdout.flush())
        .map_err(|e| format!("Failed to ring terminal bell: {}", e))?;
    debug!("Rang terminal bell");
    Ok(())
}
