use std::time::Instant;

use crate::model::{Dataset, Item};
use crate::search::search;

fn p95_ms(samples: &mut [f64]) -> f64 {
    samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let last = samples.len().saturating_sub(1);
    let idx = ((last as f64) * 0.95).round() as usize;
    samples[idx.min(last)]
}

#[test]
fn warm_query_p95_under_15ms() {
    let mut items: Vec<Item> = (0..10_000)
        .map(|i| {
            Item::new(
                &format!("Artefato {i:05}"),
                "Peça do acervo egípcio",
                &["museu", "acervo"],
                &format!("https://example.org/items/{i}"),
            )
        })
        .collect();

    items.push(Item::new(
        "Anúbis",
        "Deus dos mortos",
        &["chacal", "morte"],
        "https://example.org/anubis",
    ));
    let dataset = Dataset::from_items(items);

    for _ in 0..30 {
        let _ = search(&dataset, "chacal");
    }

    let mut batch_p95 = Vec::with_capacity(5);
    for _ in 0..5 {
        let mut samples = Vec::with_capacity(80);
        for _ in 0..80 {
            let start = Instant::now();
            let outcome = search(&dataset, "ANUBIS");
            samples.push(start.elapsed().as_secs_f64() * 1000.0);
            assert_eq!(outcome.matches().map(<[Item]>::len), Some(1));
        }
        batch_p95.push(p95_ms(&mut samples));
    }

    batch_p95.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median_p95 = batch_p95[batch_p95.len() / 2];

    assert!(
        median_p95 <= 15.0,
        "median batch p95 too high: {median_p95:.3}ms (budget 15.0ms); batches={batch_p95:?}",
    );
}
