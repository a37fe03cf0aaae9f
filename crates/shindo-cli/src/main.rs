mod config;
mod server;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use shindo_ai::{GeminiClient, Generator, ProductService, ProductSource, RakutenClient, YahooClient};
use shindo_feed::{JmaClient, Refresher, spawn_schedule};
use shindo_store::{FileKv, KvStore, SnapshotCache};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::{Cli, Command, ServeArgs, StoreArgs};
use server::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("shindo=info")),
        )
        .init();
    info!("shindo v{}", env!("CARGO_PKG_VERSION"));

    match Cli::parse().command {
        Command::Serve(args) => serve(args).await,
        Command::Refresh(args) => refresh(args).await,
    }
}

fn open_store(args: &StoreArgs) -> anyhow::Result<(Arc<dyn KvStore>, Refresher)> {
    let kv: Arc<dyn KvStore> = Arc::new(
        FileKv::open(&args.data_dir)
            .with_context(|| format!("opening data dir {}", args.data_dir.display()))?,
    );
    let feed = Arc::new(JmaClient::new(args.feed_url.clone()));
    let refresher = Refresher::new(feed, SnapshotCache::new(kv.clone()));
    Ok((kv, refresher))
}

async fn refresh(args: StoreArgs) -> anyhow::Result<()> {
    let (_, refresher) = open_store(&args)?;
    refresher
        .run_scheduled()
        .await
        .context("refreshing earthquake snapshot")
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let (kv, refresher) = open_store(&args.store)?;
    let refresher = Arc::new(refresher);

    let model: Option<Arc<dyn Generator>> = args
        .gemini_api_key
        .clone()
        .map(|key| {
            Arc::new(GeminiClient::new(key).with_model(args.gemini_model.clone()))
                as Arc<dyn Generator>
        });
    let products = match &model {
        Some(model) => {
            let mut sources: Vec<Arc<dyn ProductSource>> = Vec::new();
            if let Some(id) = args.rakuten_app_id.clone() {
                sources.push(Arc::new(RakutenClient::new(id)));
            }
            if let Some(id) = args.yahoo_app_id.clone() {
                sources.push(Arc::new(YahooClient::new(id)));
            }
            if sources.is_empty() {
                warn!("no shopping API credentials, every barcode lookup will be a 404");
            }
            let cache: Arc<dyn KvStore> = Arc::new(
                FileKv::open(args.store.data_dir.join("products"))
                    .context("opening product cache")?,
            );
            Some(Arc::new(ProductService::new(sources, model.clone(), cache)))
        }
        None => {
            warn!("GEMINI_API_KEY not set, product endpoints disabled");
            None
        }
    };

    if args.refresh_secs > 0 {
        spawn_schedule(refresher.clone(), Duration::from_secs(args.refresh_secs));
    }

    let app = server::router(AppState {
        refresher,
        dictionaries: kv,
        products,
        model,
    });
    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("binding {}", args.bind))?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app).await.context("server shutdown")?;
    Ok(())
}
