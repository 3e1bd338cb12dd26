use std::sync::Arc;

use anyhow::Context;

use stockledger_events::Subscription;
use stockledger_infra::{
    InMemoryProductStore, InventoryLedger, PostgresProductStore, ProductChange, ProductStore, Settings,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stockledger_observability::init_from_env();

    let settings = Settings::from_env().context("invalid configuration")?;

    let store: Arc<dyn ProductStore> = match settings.database_url.as_deref() {
        Some(url) => {
            let store = PostgresProductStore::connect(url)
                .await
                .context("failed to connect to postgres")?;
            store.ensure_schema().await.context("failed to apply schema")?;
            tracing::info!("using postgres product store");
            Arc::new(store)
        }
        None => {
            let store = InMemoryProductStore::new();
            spawn_change_log(store.subscribe());
            Arc::new(store)
        }
    };

    let ledger = InventoryLedger::with_config(store, &settings.ledger);
    let app = stockledger_api::app::build_app(ledger);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Log every catalog write published by the in-memory store.
fn spawn_change_log(changes: Subscription<ProductChange>) {
    std::thread::spawn(move || {
        while let Ok(change) = changes.recv() {
            tracing::info!(product_id = %change.product_id(), change = change.kind(), "catalog changed");
        }
    });
}
