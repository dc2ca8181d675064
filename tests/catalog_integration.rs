use std::fs;
use std::path::Path;

use mapquiz::{
    CatalogLoadError, CatalogManifest, DatasetError, FeatureCatalog, FeatureKind, FlowError, Level,
    QuizFlow, UnknownLevel, build_questions, demo_catalog, load_dataset, matches,
};

fn write(path: impl AsRef<Path>, contents: &str) {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent directory should be created");
    }
    fs::write(path, contents).expect("file should be written");
}

fn sample_dataset(root: &Path) {
    write(
        root.join("stations/station_15.json"),
        r#"{"name": "Station 15", "answers": ["station15"], "point": [38.99977, -77.40212]}"#,
    );
    write(
        root.join("roads/sully_road.json"),
        r#"{
            "name": "Rt 28 (Sully Road)",
            "cordinates": [[[39.003, -77.442], [39.016, -77.4395]], [[39.029, -77.436], [39.04, -77.433]]],
            "answers": ["rt28", "route28", "sullyroad", "sullyrd"]
        }"#,
    );
    write(
        root.join("roads/church_road.json"),
        r#"{"name": "Church Road", "coordinates": [[[39.0105, -77.4275], [39.029, -77.397]]]}"#,
    );
    write(
        root.join("index.json"),
        r#"{
            "stations": ["data/stations/station_15.json"],
            "roads": ["data/roads/church_road.json", "data/roads/sully_road.json"],
            "questions": [
                {"level": 1},
                {"level": 2, "features": ["Rt 28 (Sully Road)"]}
            ]
        }"#,
    );
}

fn manifest(root: &Path) -> CatalogManifest {
    let raw = fs::read_to_string(root.join("index.json")).expect("manifest should be readable");
    serde_json::from_str(&raw).expect("manifest should parse")
}

#[test]
fn dataset_directory_builds_a_playable_flow() {
    let root = tempfile::tempdir().expect("temporary directory should be created");
    sample_dataset(root.path());

    let catalog = FeatureCatalog::from_directory(root.path()).expect("dataset should load");
    let questions =
        build_questions(&catalog, &manifest(root.path()).questions).expect("plan should resolve");
    let flow = QuizFlow::new(questions).expect("flow should be valid");

    assert_eq!(
        catalog.ids().collect::<Vec<_>>(),
        vec!["Station 15", "Church Road", "Rt 28 (Sully Road)"]
    );
    assert_eq!(flow.questions()[0].level, Level::Selection);
    assert_eq!(flow.questions()[0].catalog.len(), 3);
    assert_eq!(flow.questions()[1].level, Level::FreeText);
    assert_eq!(
        flow.questions()[1].catalog.ids().collect::<Vec<_>>(),
        vec!["Rt 28 (Sully Road)"]
    );
}

#[test]
fn loaded_records_accept_name_and_synonyms() {
    let root = tempfile::tempdir().expect("temporary directory should be created");
    sample_dataset(root.path());

    let catalog = FeatureCatalog::from_directory(root.path()).expect("dataset should load");
    let church = catalog.get("Church Road").expect("road should be present");
    let sully = catalog.get("Rt 28 (Sully Road)").expect("road should be present");

    assert_eq!(church.accepted_answers, vec!["Church Road".to_string()]);
    assert!(matches(sully, Some("Route 28"), Level::FreeText));
    assert!(matches(sully, Some("rt 28 (sully road)"), Level::FreeText));
    assert!(!matches(sully, Some("rt 28 (sully road)"), Level::Selection));
    assert!(!matches(sully, Some("Rt289"), Level::FreeText));
}

#[test]
fn manifest_lists_stations_before_roads() {
    let root = tempfile::tempdir().expect("temporary directory should be created");
    sample_dataset(root.path());

    let kinds: Vec<FeatureKind> = manifest(root.path())
        .leaves()
        .into_iter()
        .map(|leaf| leaf.kind)
        .collect();

    assert_eq!(
        kinds,
        vec![FeatureKind::Station, FeatureKind::Road, FeatureKind::Road]
    );
}

#[test]
fn plan_naming_missing_feature_is_rejected() {
    let catalog = demo_catalog().expect("demo data is valid");
    let manifest: CatalogManifest = serde_json::from_str(
        r#"{"questions": [{"level": 2, "features": ["Station 99"]}]}"#,
    )
    .expect("manifest should parse");

    let error = build_questions(&catalog, &manifest.questions).expect_err("unknown feature");

    assert!(matches!(error, FlowError::Catalog { index: 0, .. }));
    assert_eq!(error.to_string(), "question 0: no feature named Station 99 in the catalog");
}

#[test]
fn dataset_check_resolves_the_served_plan() {
    let root = tempfile::tempdir().expect("temporary directory should be created");
    sample_dataset(root.path());

    let dataset = load_dataset(root.path()).expect("dataset should check out");

    assert_eq!(dataset.catalog.len(), 3);
    assert!(dataset.manifest.is_some());
    assert_eq!(dataset.flow.questions().len(), 2);
    assert_eq!(dataset.flow.questions()[1].catalog.len(), 1);
}

#[test]
fn dataset_check_fails_on_missing_root() {
    let root = tempfile::tempdir().expect("temporary directory should be created");
    let missing = root.path().join("nonexistent");

    let error = load_dataset(&missing).expect_err("empty dataset should fail");

    assert!(matches!(
        error,
        DatasetError::Catalog(CatalogLoadError::NoFeatures { .. })
    ));
}

#[test]
fn dataset_check_fails_on_unreadable_manifest() {
    let root = tempfile::tempdir().expect("temporary directory should be created");
    sample_dataset(root.path());
    let mut bytes = vec![0xff, 0xfe];
    bytes.extend_from_slice(br#"{"questions": [{"level": 9}]}"#);
    fs::write(root.path().join("index.json"), bytes).expect("manifest should be written");

    let error = load_dataset(root.path()).expect_err("garbled manifest should fail");

    assert!(matches!(error, DatasetError::ManifestParse { .. }));
}

#[test]
fn dataset_check_reports_bad_levels() {
    let root = tempfile::tempdir().expect("temporary directory should be created");
    sample_dataset(root.path());
    write(root.path().join("index.json"), r#"{"questions": [{"level": 9}]}"#);

    let error = load_dataset(root.path()).expect_err("level 9 does not exist");

    assert!(matches!(
        error,
        DatasetError::Plan {
            source: FlowError::Level {
                index: 0,
                source: UnknownLevel(9)
            },
            ..
        }
    ));
}

#[test]
fn dataset_without_questions_uses_both_levels() {
    let root = tempfile::tempdir().expect("temporary directory should be created");
    sample_dataset(root.path());
    write(
        root.path().join("index.json"),
        r#"{"stations": ["data/stations/station_15.json"]}"#,
    );

    let dataset = load_dataset(root.path()).expect("default plan should resolve");
    let levels: Vec<Level> = dataset
        .flow
        .questions()
        .iter()
        .map(|question| question.level)
        .collect();

    assert_eq!(levels, vec![Level::Selection, Level::FreeText]);
    assert!(
        dataset
            .flow
            .questions()
            .iter()
            .all(|question| question.catalog.len() == 3)
    );
}

#[test]
fn dataset_without_manifest_uses_default_plan() {
    let root = tempfile::tempdir().expect("temporary directory should be created");
    sample_dataset(root.path());
    fs::remove_file(root.path().join("index.json")).expect("manifest should be removed");

    let dataset = load_dataset(root.path()).expect("missing manifest is allowed");

    assert!(dataset.manifest.is_none());
    assert_eq!(dataset.flow.questions().len(), 2);
}
