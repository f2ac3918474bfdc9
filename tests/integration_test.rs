// Integration tests for dedupx
use dedupx::config::PipelineConfig;
use dedupx::{EngineMode, Label, LabelContext, LabelOracle, RecordPair, Result};
use dedupx_engine::{Dedupe, Matcher, StaticDedupe};
use dedupx_storage::{read_settings, write_settings};
use std::collections::HashSet;
use std::path::Path;

const RESTAURANTS: &str = "\
name,address,city,cuisine,phone
\"Arnie Morton's of Chicago\",\"435 S. La Cienega Blvd.\",\"Los Angeles\",\"Steakhouses\",\"310-246-1501\"
\"Arnie Morton's of Chicago\",\"436 S. La Cienega Blvd.\",\"Los Angeles\",\"Steakhouses\",\"310-246-1501\"
\"Art's Delicatessen\",\"12224 Ventura Blvd.\",\"Studio City\",\"Delis\",\"818-762-1221\"
\"Hotel Bel-Air\",\"701 Stone Canyon Rd.\",\"Bel Air\",\"Californian\",\"310-472-1211\"
\"Cafe Bizou\",\"14016 Ventura Blvd.\",\"Sherman Oaks\",\"French Bistro\",  N/A
";

/// Labels a pair as a match when both records carry the same name.
struct SameNameOracle {
    asked: usize,
}

impl LabelOracle for SameNameOracle {
    fn label(&mut self, pair: &RecordPair, _context: &LabelContext) -> Result<Label> {
        self.asked += 1;
        if pair.0.get("name") == pair.1.get("name") {
            Ok(Label::Match)
        } else {
            Ok(Label::Distinct)
        }
    }
}

/// Fails the test if it is ever consulted.
struct UnreachableOracle;

impl LabelOracle for UnreachableOracle {
    fn label(&mut self, _pair: &RecordPair, _context: &LabelContext) -> Result<Label> {
        panic!("oracle must not be consulted when learned settings exist");
    }
}

fn config_in(dir: &Path, input: &str) -> PipelineConfig {
    let input_path = dir.join("input.csv");
    std::fs::write(&input_path, input).unwrap();

    PipelineConfig {
        input: input_path,
        output: dir.join("out").join("result.csv"),
        settings_path: dir.join("learned_settings"),
        training_path: dir.join("training.json"),
        ..Default::default()
    }
}

fn read_output(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let header = reader.headers().unwrap().iter().map(str::to_string).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect();
    (header, rows)
}

#[test]
fn test_near_duplicates_share_a_cluster() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), RESTAURANTS);

    let mut oracle = SameNameOracle { asked: 0 };
    let summary = dedupx::run(&config, &mut oracle).unwrap();

    assert_eq!(summary.mode, EngineMode::Trained);
    assert_eq!(oracle.asked, 10);
    assert_eq!(summary.clusters, 1);
    assert_eq!(summary.written.rows, 5);

    let (header, rows) = read_output(&config.output);
    assert_eq!(&header[..2], &["Cluster ID", "confidence_score"]);
    assert_eq!(&header[2..7], &["name", "address", "city", "cuisine", "phone"]);
    assert_eq!(
        &header[7..],
        &["canonical_name", "canonical_address", "canonical_city", "canonical_cuisine", "canonical_phone"]
    );
    assert_eq!(rows.len(), 5);

    // Rows 0 and 1 form the only cluster
    assert_eq!(rows[0][0], rows[1][0]);
    for row in &rows[..2] {
        let confidence: f64 = row[1].parse().unwrap();
        assert!(confidence > 0.0 && confidence <= 1.0, "confidence {}", confidence);
        assert_eq!(row[7], "arnie morton's of chicago");
    }

    // Rows 2-4 are singletons with fresh IDs and zero confidence
    let cluster_id: usize = rows[0][0].parse().unwrap();
    let mut seen = HashSet::new();
    for row in &rows[2..] {
        let id: usize = row[0].parse().unwrap();
        assert_ne!(id, cluster_id);
        assert!(seen.insert(id));
        assert_eq!(row[1], "0");
    }

    // Original values are written untouched, canonical values are normalized
    assert_eq!(rows[4][6], "  N/A");
    assert_eq!(rows[4][11], "");
    assert_eq!(rows[2][7], "art's delicatessen");
}

#[test]
fn test_training_artifacts_are_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), RESTAURANTS);

    dedupx::run(&config, &mut SameNameOracle { asked: 0 }).unwrap();

    assert!(config.settings_path.exists());
    let training: dedupx::TrainingData =
        serde_json::from_str(&std::fs::read_to_string(&config.training_path).unwrap()).unwrap();
    assert_eq!(training.matches.len(), 1);
    assert_eq!(training.distinct.len(), 9);
}

#[test]
fn test_static_rerun_skips_labeling_and_reproduces_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), RESTAURANTS);

    let first = dedupx::run(&config, &mut SameNameOracle { asked: 0 }).unwrap();
    let first_output = std::fs::read_to_string(&config.output).unwrap();

    let second = dedupx::run(&config, &mut UnreachableOracle).unwrap();
    let second_output = std::fs::read_to_string(&config.output).unwrap();

    assert_eq!(second.mode, EngineMode::Static);
    assert_eq!(first.threshold, second.threshold);
    assert_eq!(first.clusters, second.clusters);
    assert_eq!(first_output, second_output);
}

#[test]
fn test_settings_roundtrip_gives_same_threshold_and_clusters() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), RESTAURANTS);
    let dataset = dedupx::loader::load_dataset(&config.input).unwrap();

    let mut deduper = Dedupe::new(config.schema.clone()).unwrap();
    deduper.sample(&dataset, config.sample_size).unwrap();
    dedupx_engine::active_label(&mut deduper, &mut SameNameOracle { asked: 0 }).unwrap();
    let settings = deduper.train().unwrap().clone();

    write_settings(&config.settings_path, &settings).unwrap();
    let restored = StaticDedupe::new(read_settings(&config.settings_path).unwrap()).unwrap();

    let t1 = deduper.threshold(&dataset, 1.5).unwrap();
    let t2 = restored.threshold(&dataset, 1.5).unwrap();
    assert_eq!(t1, t2);
    assert_eq!(
        deduper.match_records(&dataset, t1).unwrap(),
        restored.match_records(&dataset, t2).unwrap()
    );
}

#[test]
fn test_finishing_early_still_trains() {
    struct FinishAfter {
        left: usize,
    }

    impl LabelOracle for FinishAfter {
        fn label(&mut self, pair: &RecordPair, _context: &LabelContext) -> Result<Label> {
            if self.left == 0 {
                return Ok(Label::Finished);
            }
            self.left -= 1;
            Ok(if pair.0.get("name") == pair.1.get("name") { Label::Match } else { Label::Distinct })
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), RESTAURANTS);

    // Seed one match so a short session has both classes
    let mut seed = dedupx::TrainingData::new();
    let dataset = dedupx::loader::load_dataset(&config.input).unwrap();
    seed.add(
        (dataset.record(0).unwrap().clone(), dataset.record(1).unwrap().clone()),
        Label::Match,
    );
    dedupx_storage::write_training(&config.training_path, &seed).unwrap();

    let summary = dedupx::run(&config, &mut FinishAfter { left: 2 }).unwrap();
    assert_eq!(summary.mode, EngineMode::Trained);
    assert_eq!(summary.written.rows, 5);

    let training = dedupx_storage::read_training(&config.training_path).unwrap();
    assert_eq!(training.len(), 3);
}

#[test]
fn test_missing_input_is_fatal_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path(), RESTAURANTS);
    config.input = dir.path().join("does-not-exist.csv");

    assert!(dedupx::run(&config, &mut UnreachableOracle).is_err());
    assert!(!config.output.exists());
}

#[test]
fn test_schema_field_missing_from_input_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let without_cuisine = "name,address,city\nFenix,8358 Sunset Blvd.,Hollywood\nSpago,1114 Horn Ave.,West Hollywood\n";
    let config = config_in(dir.path(), without_cuisine);

    let err = dedupx::run(&config, &mut UnreachableOracle).unwrap_err();
    assert!(err.to_string().contains("cuisine"), "unexpected error: {}", err);
}

#[test]
fn test_every_row_is_written_once() {
    let dir = tempfile::tempdir().unwrap();
    let mut input = String::from("name,address,city,cuisine\n");
    for i in 0..12 {
        let name = format!("Diner {}", i % 4);
        input.push_str(&format!("{},{} Main St.,Pasadena,American\n", name, 100 + i));
    }
    let config = config_in(dir.path(), &input);

    let summary = dedupx::run(&config, &mut SameNameOracle { asked: 0 }).unwrap();
    let (_, rows) = read_output(&config.output);

    assert_eq!(rows.len(), 12);
    assert_eq!(summary.written.rows, 12);
    assert_eq!(summary.written.clustered + summary.written.singletons, 12);

    // Singleton IDs never collide with cluster IDs or each other
    let singleton_ids: Vec<usize> = rows
        .iter()
        .filter(|r| r[1] == "0")
        .map(|r| r[0].parse().unwrap())
        .collect();
    let unique: HashSet<usize> = singleton_ids.iter().copied().collect();
    assert_eq!(unique.len(), singleton_ids.len());
    assert!(singleton_ids.iter().all(|&id| id >= summary.clusters));
}
