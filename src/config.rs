use crate::error::StartupError;
use crate::model::ChatId;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_ROSTER_PATH: &str = "drivers.csv";

/// Runtime configuration, read from the environment once at boot.
///
/// The token is a secret and is never hard-coded; everything else has a
/// working default.
#[derive(Clone, Debug)]
pub struct BotConfig {
    pub token: String,
    pub roster_path: PathBuf,
    /// Chat that receives critical-failure notifications, when configured.
    pub operator_chat: Option<ChatId>,
    pub request_window: time::Duration,
    pub idle_threshold: time::Duration,
    pub sweep_interval: Duration,
    pub reload_debounce: Duration,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, StartupError> {
        let token = env::var("BOT_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or(StartupError::MissingToken)?;

        let roster_path = env::var_os("ROSTER_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ROSTER_PATH));

        let operator_chat = match env::var("OPERATOR_CHAT_ID") {
            Ok(raw) => {
                let id = raw.trim().parse::<i64>().map_err(|_| StartupError::InvalidVar {
                    name: "OPERATOR_CHAT_ID",
                    value: raw.clone(),
                })?;
                Some(ChatId(id))
            }
            Err(_) => None,
        };

        Ok(Self {
            token,
            roster_path,
            operator_chat,
            request_window: time::Duration::seconds(60),
            idle_threshold: time::Duration::minutes(15),
            sweep_interval: Duration::from_secs(60),
            reload_debounce: Duration::from_millis(500),
        })
    }
}
