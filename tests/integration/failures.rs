use std::time::Duration;

use tokio::sync::broadcast;

use mselink_session::{event_channel, Session, SinkError, StreamReceiver, WriterSink};

use crate::*;

/// Unsupported codec: no sink is ever constructed, so no append can happen.
#[tokio::test]
async fn unsupported_codec_never_creates_a_sink() {
    let (tx, _rx) = event_channel();
    let result = WriterSink::new("video/webm; codecs=\"vp09.00.10.08\"", tokio::io::sink(), tx);
    assert!(matches!(result, Err(SinkError::UnsupportedCodec(_))));
}

/// Nothing listening: connecting fails and the receiver reports it.
#[tokio::test]
async fn connection_refused_surfaces_as_error() {
    let (tx, _rx) = event_channel();
    let result = StreamReceiver::new("ws://127.0.0.1:1/stream", tx).run().await;
    assert!(result.is_err());
}

/// A refused connection must still end the session: the receiver posts the
/// close event on its error path too, so the actor terminates instead of
/// waiting on a channel that will never deliver.
#[tokio::test]
async fn refused_connection_still_ends_the_session() {
    let (event_tx, event_rx) = event_channel();
    let sink = WriterSink::new(
        mselink_core::codec::DEFAULT_CODEC,
        tokio::io::sink(),
        event_tx.clone(),
    )
    .unwrap();
    let (shutdown_tx, _) = broadcast::channel(1);

    let receiver = tokio::spawn(StreamReceiver::new("ws://127.0.0.1:1/stream", event_tx).run());

    let stats = tokio::time::timeout(
        Duration::from_secs(5),
        Session::new(sink, event_rx, shutdown_tx.subscribe()).run(),
    )
    .await
    .expect("session must terminate when the connection fails")
    .unwrap();

    assert_eq!(stats.appended, 0);
    assert!(receiver.await.unwrap().is_err());
}

/// The server drops the connection without a close handshake. The transport
/// error ends the session, but every chunk delivered before the abort is
/// still appended.
#[tokio::test]
async fn transport_abort_keeps_delivered_chunks() {
    let steps = vec![
        Step::Frame(b"head".to_vec()),
        Step::Pause(Duration::from_millis(10)),
        Step::Frame(b"tail".to_vec()),
        Step::Abort,
    ];
    let url = scripted_server(steps).await.unwrap();

    let path = temp_output("abort");
    let stats = run_session_to_file(&url, &path).await.unwrap();

    assert_eq!(&std::fs::read(&path).unwrap()[..], b"headtail");
    assert_eq!(stats.appended, 2);
    let _ = std::fs::remove_file(&path);
}
