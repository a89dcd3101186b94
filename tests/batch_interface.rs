use std::sync::Arc;
use std::time::Duration;

use kopeck::interface::{extract_parallel, BatchInterface, BatchOptions};
use kopeck::Extractor;

fn texts() -> Vec<String> {
    (1..=20).map(|n| format!("Заказ {n}: {n} руб. {n} коп. и ещё ${n}")).collect()
}

#[test]
fn parallel_results_keep_input_order() {
    let extractor = Extractor::builtin().unwrap();
    let texts = texts();
    let results = extract_parallel(&extractor, texts.as_slice(), 4);
    assert_eq!(results.len(), texts.len());
    for (n, result) in (1..=20u64).zip(results) {
        let matches = result.expect("tokenize ok");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].money.integer(), n);
        assert_eq!(matches[0].money.coins(), Some(n as u32));
        assert_eq!(matches[1].money.integer(), n);
    }
}

#[test]
fn parallel_handles_more_workers_than_texts() {
    let extractor = Extractor::builtin().unwrap();
    let results = extract_parallel(&extractor, &["7 евро"][..], 16);
    assert_eq!(results.len(), 1);
    let empty: Vec<String> = Vec::new();
    assert!(extract_parallel(&extractor, empty.as_slice(), 4).is_empty());
}

#[test]
fn background_batch_streams_every_row() {
    let interface = BatchInterface::new(Arc::new(Extractor::builtin().unwrap()));
    let handle = interface.start_batch(texts(), BatchOptions::default());
    let rows = handle.collect();
    assert_eq!(rows.len(), 20);
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row.index, i);
        assert_eq!(row.matches.as_ref().unwrap().len(), 2);
    }
}

#[test]
fn zero_timeout_skips_everything() {
    let interface = BatchInterface::new(Arc::new(Extractor::builtin().unwrap()));
    let options = BatchOptions { timeout: Some(Duration::ZERO) };
    let rows = interface.start_batch(texts(), options).collect();
    assert!(rows.is_empty());
}

#[test]
fn cancelled_batch_stops_early() {
    let interface = BatchInterface::new(Arc::new(Extractor::builtin().unwrap()));
    let many: Vec<String> = texts().into_iter().cycle().take(2_000).collect();
    let handle = interface.start_batch(many, BatchOptions::default());
    handle.cancel();
    let id = handle.id;
    let rows = handle.collect();
    assert!(rows.len() < 2_000);
    // finished batches are no longer registered
    assert!(!interface.cancel(id));
}

#[test]
fn run_sync_matches_background() {
    let interface = BatchInterface::new(Arc::new(Extractor::builtin().unwrap()));
    let sync = interface.run_sync(&texts());
    assert_eq!(sync.len(), 20);
    assert!(sync.iter().all(|r| r.as_ref().unwrap().len() == 2));
}
