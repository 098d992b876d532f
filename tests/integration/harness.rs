//! Test harness: scripted WebSocket server and session runner.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio_tungstenite::tungstenite::Message;

use mselink_session::{event_channel, FeederStats, Session, StreamReceiver, WriterSink};

/// One step in a scripted server session.
pub enum Step {
    /// Send one binary frame.
    Frame(Vec<u8>),
    /// Pause before the next step.
    Pause(Duration),
    /// Drop the connection without a close handshake.
    Abort,
}

/// Start a scripted server on an OS-assigned port and return its ws:// URL.
///
/// The server accepts one connection, sends nothing until the client's init
/// request arrives, plays the script, then closes cleanly (unless the script
/// says `Abort`).
pub async fn scripted_server(steps: Vec<Step>) -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        let Ok((stream, _)) = listener.accept().await else {
            return;
        };
        let Ok(ws) = tokio_tungstenite::accept_async(stream).await else {
            return;
        };
        let (mut tx, mut rx) = ws.split();

        loop {
            match rx.next().await {
                Some(Ok(Message::Text(text)))
                    if text.as_str() == mselink_core::control::INIT_SEGMENT_REQUEST =>
                {
                    break;
                }
                Some(Ok(_)) => continue,
                _ => return,
            }
        }

        for step in steps {
            match step {
                Step::Frame(bytes) => {
                    if tx.send(Message::Binary(bytes.into())).await.is_err() {
                        return;
                    }
                }
                Step::Pause(d) => tokio::time::sleep(d).await,
                Step::Abort => return,
            }
        }
        let _ = tx.send(Message::Close(None)).await;
    });

    Ok(format!("ws://{addr}/stream"))
}

/// Temp file path unique to this test process.
pub fn temp_output(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("mselink-test-{}-{}", name, std::process::id()))
}

/// Connect to `url`, stream to completion, and write appended chunks to
/// `path`. Returns the session's final stats.
pub async fn run_session_to_file(url: &str, path: &Path) -> Result<FeederStats> {
    let output = tokio::fs::File::create(path)
        .await
        .with_context(|| format!("failed to create {}", path.display()))?;

    let (event_tx, event_rx) = event_channel();
    let sink = WriterSink::new(mselink_core::codec::DEFAULT_CODEC, output, event_tx.clone())?;

    let (shutdown_tx, _) = broadcast::channel(1);
    let receiver = tokio::spawn(StreamReceiver::new(url.to_string(), event_tx).run());

    let stats = Session::new(sink, event_rx, shutdown_tx.subscribe())
        .run()
        .await?;
    receiver.await??;
    Ok(stats)
}
