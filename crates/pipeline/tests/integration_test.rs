//! Integration tests for the pipeline.
//!
//! These tests run the whole load -> train -> rank -> page -> evaluate path
//! over a CSV written to a temporary file.

use classifier::{Classifier, ClassifierConfig, roc_auc};
use data_loader::Dataset;
use pipeline::{EvaluationMode, Metrics, PageCursor, RecommendationEngine};
use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

const GENRES: [&str; 4] = ["Action", "Comedy", "Drama", "Horror"];

/// 120 movies; votes rise with popularity so the median split is learnable
fn write_catalog() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "title,overview,release_date,homepage,vote_average,popularity,genres,spoken_languages"
    )
    .unwrap();

    for i in 0..120 {
        let genre = GENRES[i % GENRES.len()];
        let popularity = (i * 37 % 120) as f32;
        let vote = 2.0 + popularity / 20.0;
        let genres = if i % 10 == 0 {
            // Every tenth row carries a broken list and loses its genres
            "\"[{'name': oops\"".to_string()
        } else {
            format!("\"[{{\"\"id\"\": {i}, \"\"name\"\": \"\"{genre}\"\"}}]\"")
        };
        writeln!(
            file,
            "Movie {i},Overview {i},2001-01-01,,{vote},{popularity},{genres},\"[{{\"\"name\"\": \"\"English\"\"}}]\""
        )
        .unwrap();
    }
    file.flush().unwrap();
    file
}

fn small_config() -> ClassifierConfig {
    ClassifierConfig {
        hidden_layers: vec![16, 8],
        dropout: 0.1,
        learning_rate: 0.01,
        epochs: 120,
        batch_size: 16,
        patience: 15,
        seed: Some(3),
        ..ClassifierConfig::default()
    }
}

fn build_engine() -> (RecommendationEngine, Arc<Dataset>) {
    let file = write_catalog();
    let dataset = Arc::new(Dataset::load(file.path()).unwrap());
    let (model, _) =
        Classifier::train(dataset.features().view(), dataset.labels(), &small_config()).unwrap();
    let engine = RecommendationEngine::new(dataset.clone(), Arc::new(model)).unwrap();
    (engine, dataset)
}

#[test]
fn test_load_degrades_malformed_rows() {
    let file = write_catalog();
    let dataset = Dataset::load(file.path()).unwrap();

    assert_eq!(dataset.len(), 120);
    assert_eq!(dataset.report().unparsed_genres, 12);
    assert_eq!(dataset.report().unparsed_languages, 0);
    assert!(dataset.get_record(0).unwrap().genres.is_empty());
    assert_eq!(dataset.vocabulary().as_slice(), &GENRES);
    assert_eq!(dataset.feature_width(), GENRES.len() + 2);
}

#[test]
fn test_reload_is_deterministic() {
    let file = write_catalog();
    let a = Dataset::load(file.path()).unwrap();
    let b = Dataset::load(file.path()).unwrap();

    assert_eq!(a.vocabulary(), b.vocabulary());
    assert_eq!(a.scale_params(), b.scale_params());
    assert_eq!(a.labels(), b.labels());
    assert_eq!(a.features(), b.features());
}

#[test]
fn test_trained_model_separates_labels() {
    let file = write_catalog();
    let dataset = Dataset::load(file.path()).unwrap();
    let (model, report) =
        Classifier::train(dataset.features().view(), dataset.labels(), &small_config()).unwrap();

    let scores = model.score(dataset.features().view()).unwrap();
    let auc = roc_auc(&scores, dataset.labels()).unwrap();
    assert!(auc >= 0.9, "AUC too low: {auc}");
    assert!(report.epochs_run <= 120);
}

#[test]
fn test_genre_pages_cover_ranked_list() {
    let (engine, dataset) = build_engine();
    let ranked = engine.rank("Drama").unwrap();

    // Drama rows are i % 4 == 2, minus the malformed i % 10 == 0 rows
    let expected: HashSet<usize> = (0..120).filter(|i| i % 4 == 2 && i % 10 != 0).collect();
    let got: HashSet<usize> = ranked.iter().map(|r| r.row).collect();
    assert_eq!(got, expected);
    assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    assert!(ranked.iter().all(|r| dataset.get_record(r.row).unwrap().has_genre("Drama")));

    let mut cursor = PageCursor::new(5);
    let mut paged = Vec::new();
    loop {
        let window = engine.window("Drama", &cursor).unwrap();
        if window.is_empty() {
            break;
        }
        assert!(window.rows.len() <= 5);
        paged.extend(window.rows);
        cursor.advance();
    }
    assert_eq!(paged, ranked);

    cursor.reset();
    assert_eq!(engine.window("Drama", &cursor).unwrap().rows, ranked[..5]);
}

#[test]
fn test_unknown_genre_and_far_offset() {
    let (engine, _) = build_engine();

    assert!(engine.rank("Western").unwrap().is_empty());
    let window = engine.window("Action", &PageCursor::at(1_000, 5)).unwrap();
    assert!(window.is_empty());
    assert_eq!(window.metrics, Metrics::default());
}

#[test]
fn test_evaluation_modes() {
    let (engine, dataset) = build_engine();
    let cursor = PageCursor::new(10);

    let sanity = engine.window("Comedy", &cursor).unwrap();
    let labels: Vec<u8> = sanity.rows.iter().map(|r| dataset.labels()[r.row]).collect();
    assert_eq!(sanity.metrics.accuracy, 1.0);
    if labels.contains(&1) {
        assert_eq!(sanity.metrics.f1, 1.0);
    }

    let real = engine
        .clone()
        .with_evaluation(EvaluationMode::ModelPredictions)
        .window("Comedy", &cursor)
        .unwrap();
    assert_eq!(real.rows, sanity.rows);
    for value in [real.metrics.accuracy, real.metrics.precision, real.metrics.recall, real.metrics.f1] {
        assert!((0.0..=1.0).contains(&value));
    }
}
