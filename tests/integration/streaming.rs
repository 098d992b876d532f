use std::time::Duration;

use crate::*;

/// Paced delivery: every chunk appended immediately, in order.
#[tokio::test]
async fn chunks_reach_the_sink_in_arrival_order() {
    let frames: Vec<Vec<u8>> = vec![
        b"init-segment".to_vec(),
        b"frag-one".to_vec(),
        b"frag-two".to_vec(),
    ];
    let mut steps = Vec::new();
    for f in &frames {
        steps.push(Step::Frame(f.clone()));
        steps.push(Step::Pause(Duration::from_millis(5)));
    }
    let url = scripted_server(steps).await.unwrap();

    let path = temp_output("ordered");
    let stats = run_session_to_file(&url, &path).await.unwrap();

    let written = std::fs::read(&path).unwrap();
    assert_eq!(written, frames.concat(), "sink must see chunks verbatim, in order");
    assert_eq!(stats.appended, 3);
    assert_eq!(stats.dropped, 0);
    let _ = std::fs::remove_file(&path);
}

/// Burst delivery: frames arrive faster than appends complete, so most go
/// through the pending queue. Order must survive.
#[tokio::test]
async fn rapid_burst_is_queued_not_reordered() {
    let frames: Vec<Vec<u8>> = (0u8..64).map(|i| vec![i; 512]).collect();
    let steps = frames.iter().cloned().map(Step::Frame).collect();
    let url = scripted_server(steps).await.unwrap();

    let path = temp_output("burst");
    let stats = run_session_to_file(&url, &path).await.unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), frames.concat());
    assert_eq!(stats.appended, 64);
    assert_eq!(stats.dropped, 0);
    let _ = std::fs::remove_file(&path);
}

/// A server that closes right after the init request: clean end, nothing
/// appended.
#[tokio::test]
async fn empty_stream_closes_cleanly() {
    let url = scripted_server(Vec::new()).await.unwrap();

    let path = temp_output("empty");
    let stats = run_session_to_file(&url, &path).await.unwrap();

    assert_eq!(stats.appended, 0);
    assert_eq!(stats.submitted, 0);
    assert!(std::fs::read(&path).unwrap().is_empty());
    let _ = std::fs::remove_file(&path);
}

/// Chunk size is the server's business; big fragments append whole.
#[tokio::test]
async fn large_chunks_append_whole() {
    let frames = vec![vec![0xAB; 512 * 1024], vec![0xCD; 256 * 1024]];
    let steps = frames.iter().cloned().map(Step::Frame).collect();
    let url = scripted_server(steps).await.unwrap();

    let path = temp_output("large");
    let stats = run_session_to_file(&url, &path).await.unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), frames.concat());
    assert_eq!(stats.appended, 2);
    let _ = std::fs::remove_file(&path);
}
