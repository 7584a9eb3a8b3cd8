use std::time::Duration;

use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use fluxpos_sync::config::SyncConfig;
use fluxpos_sync::domain::repository::ConnectivityProbe as _;
use fluxpos_sync::domain::types::TriggerEvent;
use fluxpos_sync::infra::connectivity::HttpConnectivityProbe;
use fluxpos_sync::infra::db::{DbCacheRepository, DbOutboxRepository};
use fluxpos_sync::infra::remote::HttpRemoteBackend;
use fluxpos_sync::state::SyncEngine;
use fluxpos_sync::trigger;
use fluxpos_sync_migration::Migrator;

#[tokio::main]
async fn main() {
    fluxpos_core::tracing::init_tracing();

    let config = SyncConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to open local store");
    Migrator::up(&db, None)
        .await
        .expect("failed to migrate local store");

    let client = reqwest::Client::new();
    let backend = HttpRemoteBackend::new(
        client.clone(),
        config.remote_base_url.clone(),
        config.remote_api_key.clone(),
    );
    let probe = HttpConnectivityProbe::new(client, &config.remote_base_url);

    let (triggers, trigger_rx) = trigger::channel(config.trigger_queue_depth);
    let engine = SyncEngine::new(
        DbOutboxRepository { db: db.clone() },
        DbCacheRepository { db },
        backend,
        probe.clone(),
        triggers.clone(),
        config.location_id,
        config.history_window,
    );

    // Scheduler: every trigger becomes one drain (+ reconcile) pass.
    let scheduler = tokio::spawn(async move { engine.run(trigger_rx).await });

    triggers.request(TriggerEvent::Startup);

    // Offline-to-online edge detection drives the `online` trigger.
    let poll = Duration::from_secs(config.connectivity_poll_secs);
    let watch_triggers = triggers.clone();
    tokio::spawn(async move {
        let mut was_online = true;
        loop {
            tokio::time::sleep(poll).await;
            let online = probe.is_online().await;
            if online && !was_online {
                info!("connectivity regained");
                watch_triggers.request(TriggerEvent::Online);
            }
            was_online = online;
        }
    });

    info!(location = %config.location_id, "sync service started");
    tokio::signal::ctrl_c()
        .await
        .expect("failed to listen for shutdown signal");
    info!("shutting down");
    drop(triggers);
    scheduler.abort();
}
