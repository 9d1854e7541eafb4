use criterion::{criterion_group, criterion_main, Criterion};
use searchcore::{normalize, Document, InvertedIndex};

const LINES: &[&str] = &[
    "When in disgrace with fortune and men's eyes,",
    "I all alone beweep my outcast state,",
    "And trouble deaf heaven with my bootless cries,",
    "And look upon myself and curse my fate,",
    "Wishing me like to one more rich in hope,",
    "Featured like him, like him with friends possessed,",
    "Desiring this man's art and that man's scope,",
    "With what I most enjoy contented least;",
];

fn corpus() -> Vec<Document> {
    (0..154)
        .map(|id| {
            let lines = LINES.iter().cycle().skip(id as usize % LINES.len()).take(6).map(|l| l.to_string()).collect();
            Document::new(id, format!("Sonnet {id}"), lines)
        })
        .collect()
}

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize_sonnet", |b| b.iter(|| normalize(LINES)));
}

fn bench_search(c: &mut Criterion) {
    let index = InvertedIndex::build(corpus()).unwrap();
    c.bench_function("build_index", |b| b.iter(|| InvertedIndex::build(corpus()).unwrap()));
    c.bench_function("search_two_terms", |b| b.iter(|| index.search_ids("fortune eyes")));
}

criterion_group!(benches, bench_normalize, bench_search);
criterion_main!(benches);
