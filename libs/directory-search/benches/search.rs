//! Criterion benchmarks for directory search

use chrono::{Duration as Days, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use roster_models::enumerations::{APPLICATIONS, METHODS, POSITIONS};
use roster_models::{Country, Enumerations, Profile, ProfileDraft};
use roster_search::{LabelMatch, ProfileSearchEngine, SearchOptions, SearchQuery};
use std::sync::Arc;
use std::time::Duration;

fn custom_criterion() -> Criterion {
    Criterion::default()
        .sample_size(20)
        .warm_up_time(Duration::from_millis(100))
        .measurement_time(Duration::from_secs(1))
        .nresamples(1000)
        .noise_threshold(0.05)
}

fn directory(size: usize) -> Vec<Profile> {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (0..size)
        .map(|i| {
            let country = Country::new(i as i64 % 40, format!("C{:02}", i % 40), format!("Country {}", i % 40), i % 7 == 0);
            let draft = ProfileDraft {
                is_public: i % 10 != 0,
                first_name: format!("First{i}"),
                last_name: format!("Last{i}"),
                institution: format!("Institute {}", i % 50),
                position: POSITIONS[i % POSITIONS.len()].0.to_string(),
                methods: [METHODS[i % METHODS.len()].0.to_string()].into(),
                applications: [APPLICATIONS[i % APPLICATIONS.len()].0.to_string()].into(),
                keywords: "causal inference, fairness, robustness".into(),
                publish_date: Some(base + Days::minutes(i as i64)),
                ..Default::default()
            };
            Profile::from_draft(i as i64, draft, Some(country), base)
        })
        .collect()
}

fn bench_unfiltered(c: &mut Criterion) {
    let engine = ProfileSearchEngine::new(Arc::new(Enumerations::default()));
    let profiles = directory(5_000);
    let query = SearchQuery::default();

    c.bench_function("unfiltered_5k", |b| {
        b.iter(|| engine.search(black_box(&query), &profiles).len())
    });
}

fn bench_multi_token(c: &mut Criterion) {
    let engine = ProfileSearchEngine::new(Arc::new(Enumerations::default()));
    let profiles = directory(5_000);
    let query = SearchQuery::from_params(Some("learning institute professor"), Some("on"), None);

    c.bench_function("multi_token_5k", |b| {
        b.iter(|| engine.search(black_box(&query), &profiles).len())
    });
}

fn bench_compile(c: &mut Criterion) {
    let literal = ProfileSearchEngine::new(Arc::new(Enumerations::default()));
    let pattern = ProfileSearchEngine::with_options(
        Arc::new(Enumerations::default()),
        SearchOptions {
            label_match: LabelMatch::Pattern,
            ..Default::default()
        },
    );
    let query = SearchQuery::from_params(Some("deep learning vision"), None, Some("on"));

    c.bench_function("compile_literal", |b| b.iter(|| literal.compile(black_box(&query))));
    c.bench_function("compile_pattern", |b| b.iter(|| pattern.compile(black_box(&query))));
}

criterion_group! {
    name = benches;
    config = custom_criterion();
    targets =
        bench_unfiltered,
        bench_multi_token,
        bench_compile
}
criterion_main!(benches);
