use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};
use lazy_static::lazy_static;
use tokio::sync::Mutex;

lazy_static! {
    static ref COMMAND_COOLDOWNS: Mutex<HashMap<(i64, String), u64>> =
        Mutex::new(HashMap::new());

    // Track when we last warned a chat about a cooldown (to avoid message spam)
    // Key: (chat_id, command), Value: timestamp of last warning
    static ref COOLDOWN_WARNINGS: Mutex<HashMap<(i64, String), u64>> =
        Mutex::new(HashMap::new());
}

const COOLDOWN_SECONDS: u64 = 5;

pub fn get_cooldown_seconds() -> u64 {
    COOLDOWN_SECONDS
}

/// Check if a chat can execute a command (cooldown not active).
///
/// Returns Ok(()) if the cooldown has passed and records the new invocation.
/// Returns Err((remaining_seconds, should_send_warning)) while on cooldown;
/// the boolean is true only the first time within a cooldown period.
pub async fn check_cooldown(chat_id: i64, command: &str) -> Result<(), (u64, bool)> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let key = (chat_id, command.to_string());

    let mut cooldowns = COMMAND_COOLDOWNS.lock().await;
    if let Some(&last_time) = cooldowns.get(&key) {
        let elapsed = now.saturating_sub(last_time);
        if elapsed < COOLDOWN_SECONDS {
            let remaining = COOLDOWN_SECONDS - elapsed;

            let mut warnings = COOLDOWN_WARNINGS.lock().await;
            let should_warn = match warnings.get(&key) {
                // Only warn once per cooldown period
                Some(&last_warning) => last_warning < last_time,
                None => true,
            };
            if should_warn {
                warnings.insert(key, now);
            }
            return Err((remaining, should_warn));
        }
    }

    cooldowns.insert(key, now);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_invocation_passes() {
        // Unique chat id per test; the tables are process-global
        assert!(check_cooldown(-9_000_001, "/chart").await.is_ok());
    }

    #[tokio::test]
    async fn test_second_invocation_is_blocked() {
        assert!(check_cooldown(-9_000_002, "/chart").await.is_ok());
        let err = check_cooldown(-9_000_002, "/chart").await.unwrap_err();
        assert!(err.0 > 0 && err.0 <= COOLDOWN_SECONDS);
        // First violation should warn
        assert!(err.1);
    }

    #[tokio::test]
    async fn test_repeat_violation_does_not_warn_again() {
        assert!(check_cooldown(-9_000_003, "/chart").await.is_ok());
        let first = check_cooldown(-9_000_003, "/chart").await.unwrap_err();
        assert!(first.1);
        let second = check_cooldown(-9_000_003, "/chart").await.unwrap_err();
        assert!(!second.1);
    }

    #[tokio::test]
    async fn test_cooldowns_are_per_command() {
        assert!(check_cooldown(-9_000_004, "/chart").await.is_ok());
        assert!(check_cooldown(-9_000_004, "/watchlist").await.is_ok());
    }
}
