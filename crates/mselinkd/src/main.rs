//! mselinkd: streams media chunks from a WebSocket endpoint into a sink.
//!
//! Opens the media sink for the configured codec, connects to the stream
//! endpoint, requests the initialization segment, and feeds every chunk
//! through the buffer feeder until the stream ends or Ctrl-C.

use anyhow::{Context, Result};

use mselink_core::config::MselinkConfig;
use mselink_session::{event_channel, Session, StreamReceiver, WriterSink};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load config
    if let Err(e) = MselinkConfig::write_default_if_missing() {
        tracing::warn!(error = %e, "failed to write default config");
    }
    let config = MselinkConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load config, using defaults");
        MselinkConfig::default()
    });
    tracing::info!(
        url = %config.stream.url,
        codec = %config.media.codec,
        "mselinkd starting"
    );

    // ── Shutdown channel ─────────────────────────────────────────────────────
    let (shutdown_tx, _) = tokio::sync::broadcast::channel::<()>(1);

    {
        let shutdown = shutdown_tx.clone();
        tokio::spawn(async move {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("shutdown signal received");
            let _ = shutdown.send(());
        });
    }

    // ── Output sink ──────────────────────────────────────────────────────────
    if let Some(parent) = config.output.path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let output = tokio::fs::File::create(&config.output.path)
        .await
        .with_context(|| format!("failed to open output {}", config.output.path.display()))?;
    tracing::info!(path = %config.output.path.display(), "output sink ready");

    let (event_tx, event_rx) = event_channel();

    // Unsupported codec is fatal: no sink, no session.
    let sink = match WriterSink::new(&config.media.codec, output, event_tx.clone()) {
        Ok(sink) => sink,
        Err(e) => {
            tracing::error!(codec = %config.media.codec, error = %e, "cannot open media sink");
            anyhow::bail!("media sink unavailable, streaming cannot proceed");
        }
    };

    // ── Spawn tasks ──────────────────────────────────────────────────────────
    let receiver_task = tokio::spawn(StreamReceiver::new(config.stream.url.clone(), event_tx).run());

    let session_task = tokio::spawn(Session::new(sink, event_rx, shutdown_tx.subscribe()).run());

    // ── Wait for exit ────────────────────────────────────────────────────────
    let mut shutdown_rx = shutdown_tx.subscribe();

    tokio::select! {
        _ = shutdown_rx.recv() => tracing::info!("shutting down"),
        r = session_task => match r {
            Ok(Ok(stats)) => tracing::info!(
                appended = stats.appended,
                dropped = stats.dropped,
                "stream ended"
            ),
            Ok(Err(e)) => tracing::error!(error = %e, "session failed"),
            Err(e) => tracing::error!(error = %e, "session task exited abnormally"),
        },
    }

    receiver_task.abort();
    Ok(())
}
