// tests/aggregate_debounce.rs

mod common;
use crate::common::init_tracing;

use std::path::PathBuf;

use tokio::sync::mpsc;
use tokio::time::{Duration, Instant, sleep};
use tracing::Span;

use rewatch::watch::{ChangeBatch, gather, spawn_aggregator};

const WINDOW: Duration = Duration::from_millis(500);

fn p(name: &str) -> PathBuf {
    PathBuf::from(format!("/proj/{name}"))
}

#[tokio::test(start_paused = true)]
async fn burst_becomes_one_sorted_deduplicated_batch() {
    init_tracing();
    let (tx, mut rx) = mpsc::channel(16);

    for name in ["b.txt", "a.txt", "b.txt", "c.txt", "a.txt"] {
        tx.send(p(name)).await.unwrap();
    }
    let first = rx.recv().await.unwrap();

    let started = Instant::now();
    let batch = gather(first, &mut rx, WINDOW).await;

    assert_eq!(batch.files(), &[p("a.txt"), p("b.txt"), p("c.txt")]);
    // Queued paths arrive at once, so the batch closes one window later.
    assert!(started.elapsed() >= WINDOW);
    assert!(started.elapsed() < WINDOW * 2);
}

#[tokio::test(start_paused = true)]
async fn each_arrival_extends_the_window() {
    let (tx, rx) = mpsc::channel(16);
    let mut batches = spawn_aggregator(rx, WINDOW, Span::none());

    tokio::spawn(async move {
        for i in 0..5 {
            tx.send(p(&format!("f{i}.txt"))).await.unwrap();
            sleep(Duration::from_millis(400)).await;
        }
        // Keep the sender alive past the final window.
        sleep(Duration::from_secs(5)).await;
    });

    let batch = batches.recv().await.unwrap();
    assert_eq!(batch.len(), 5);

    let second = tokio::time::timeout(Duration::from_secs(3), batches.recv()).await;
    assert!(second.is_err(), "no further batch expected, got {second:?}");
}

#[tokio::test(start_paused = true)]
async fn gap_longer_than_window_splits_batches() {
    let (tx, rx) = mpsc::channel(16);
    let mut batches = spawn_aggregator(rx, WINDOW, Span::none());

    tokio::spawn(async move {
        tx.send(p("one.txt")).await.unwrap();
        sleep(Duration::from_millis(800)).await;
        tx.send(p("two.txt")).await.unwrap();
        sleep(Duration::from_secs(5)).await;
    });

    let first = batches.recv().await.unwrap();
    let second = batches.recv().await.unwrap();
    assert_eq!(first.files(), &[p("one.txt")]);
    assert_eq!(second.files(), &[p("two.txt")]);
}

#[tokio::test(start_paused = true)]
async fn closed_input_ends_the_batch_and_the_stage() {
    let (tx, rx) = mpsc::channel(16);
    let mut batches = spawn_aggregator(rx, Duration::from_secs(60), Span::none());

    tx.send(p("x.txt")).await.unwrap();
    tx.send(p("y.txt")).await.unwrap();
    drop(tx);

    let started = Instant::now();
    let batch = batches.recv().await.unwrap();
    assert_eq!(batch.into_files(), vec![p("x.txt"), p("y.txt")]);
    assert!(started.elapsed() < Duration::from_secs(60));
    assert!(batches.recv().await.is_none());
}

#[test]
fn batch_display_lists_files_in_order() {
    let batch = ChangeBatch::from(
        [p("b.txt"), p("a.txt")]
            .into_iter()
            .collect::<std::collections::BTreeSet<_>>(),
    );
    assert_eq!(batch.to_string(), "/proj/a.txt, /proj/b.txt");
    assert!(!batch.is_empty());
}
