use std::sync::Arc;

use kikoeru_control::api::HttpJobApi;
use kikoeru_control::config::ControlConfig;
use kikoeru_control::notify::LogNotifier;
use kikoeru_control::remote_config::RemoteConfig;
use kikoeru_control::tasks::TaskStore;
use kikoeru_control::watcher::WatcherControl;

/// One status pass against a running job-management API: fetches the
/// task collection, the watcher status, and the server config, and
/// logs a summary.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let mut config = ControlConfig::default();
    if let Ok(base) = std::env::var("KIKOERU_API_BASE") {
        config.api_base = base;
    }

    tracing::info!("Kikoeru Control v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("API base: {}", config.api_base);

    let api = Arc::new(HttpJobApi::new(&config.api_base));
    let notifier = Arc::new(LogNotifier);

    let tasks = TaskStore::new(api.clone(), notifier, config.reconcile_delay);
    tasks.fetch_tasks(None).await?;
    tracing::info!(
        "Tasks: {} pending, {} processing, {} finished",
        tasks.pending_tasks().await.len(),
        tasks.processing_tasks().await.len(),
        tasks.finished_tasks().await.len(),
    );

    let watcher = WatcherControl::new(api.clone());
    watcher.fetch_status().await;
    let status = watcher.status().await;
    if status.is_running {
        tracing::info!(
            "Watcher running on {} ({} pending files)",
            status.watch_path,
            status.pending_files.len(),
        );
    } else {
        tracing::info!("Watcher stopped");
    }

    let remote = RemoteConfig::new(api);
    if let Err(e) = remote.fetch().await {
        tracing::warn!("Server config unavailable: {e}");
    }

    Ok(())
}
