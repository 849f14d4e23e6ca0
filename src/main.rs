use autopartner_bot::config::BotConfig;
use autopartner_bot::monitor::spawn_idle_monitor;
use autopartner_bot::outbound::{Outbound, OutgoingMessage};
use autopartner_bot::roster::{spawn_watcher, RosterHandle};
use autopartner_bot::session::SessionStore;
use autopartner_bot::telegram::{run_polling, TelegramClient};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "startup failed");
            std::process::exit(1);
        }
    };

    let sessions = Arc::new(SessionStore::with_request_window(config.request_window));
    let roster = Arc::new(RosterHandle::new());
    match roster.reload_from(&config.roster_path) {
        Ok(_) => {}
        Err(err) if err.is_missing_source() => {
            error!(
                source = %config.roster_path.display(),
                "roster source not found, starting with an empty roster"
            );
        }
        Err(err) => {
            error!(error = %err, "initial roster load failed, starting with an empty roster");
        }
    }

    let client = match TelegramClient::new(&config.token) {
        Ok(client) => Arc::new(client),
        Err(err) => {
            error!(error = %err, "could not build the platform client");
            std::process::exit(1);
        }
    };

    let cancel = CancellationToken::new();

    let watcher = match spawn_watcher(
        config.roster_path.clone(),
        Arc::clone(&roster),
        config.reload_debounce,
        cancel.clone(),
    ) {
        Ok(pair) => Some(pair),
        Err(err) => {
            warn!(error = %err, "roster watcher unavailable, roster will not hot-reload");
            None
        }
    };

    let monitor = spawn_idle_monitor(
        Arc::clone(&sessions),
        Arc::clone(&client) as Arc<dyn Outbound>,
        config.sweep_interval,
        config.idle_threshold,
        cancel.clone(),
    );

    info!("bot started");
    let outcome = tokio::select! {
        result = run_polling(&client, &sessions, &roster, &cancel) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown requested");
            Ok(())
        }
    };

    cancel.cancel();
    let _ = monitor.await;
    if let Some((watcher, reload_task)) = watcher {
        drop(watcher);
        let _ = reload_task.await;
    }

    if let Err(err) = outcome {
        if let Some(operator) = config.operator_chat {
            let notice = OutgoingMessage::text(format!("Критическая ошибка: {err}"));
            if let Err(send_err) = client.send(operator, notice).await {
                error!(error = %send_err, "failed to notify the operator");
            }
        }
        std::process::exit(1);
    }
}
