use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::feature::{Feature, FeatureId, FeatureKind, Geometry, LatLng};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RoadRecord {
    pub name: String,
    #[serde(alias = "coordinates")]
    pub cordinates: Vec<Vec<LatLng>>,
    #[serde(default)]
    pub answers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StationRecord {
    pub name: String,
    pub point: LatLng,
    #[serde(default)]
    pub answers: Vec<String>,
}

impl RoadRecord {
    pub fn into_feature(self) -> Feature {
        Feature {
            accepted_answers: answers_with_name(&self.name, self.answers),
            id: self.name,
            kind: FeatureKind::Road,
            geometry: Geometry::Paths(self.cordinates),
        }
    }
}

impl StationRecord {
    pub fn into_feature(self) -> Feature {
        Feature {
            accepted_answers: answers_with_name(&self.name, self.answers),
            id: self.name,
            kind: FeatureKind::Station,
            geometry: Geometry::Point(self.point),
        }
    }
}

fn answers_with_name(name: &str, answers: Vec<String>) -> Vec<String> {
    let mut accepted = vec![name.to_string()];
    accepted.extend(answers.into_iter().filter(|answer| answer != name));
    accepted
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureCatalog {
    features: Vec<Feature>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("feature {id} has no accepted answers")]
    EmptyAnswers { id: FeatureId },
    #[error("feature {id} has no geometry")]
    EmptyGeometry { id: FeatureId },
    #[error("feature {id} is defined more than once")]
    DuplicateFeature { id: FeatureId },
    #[error("no feature named {id} in the catalog")]
    UnknownFeature { id: FeatureId },
    #[error("feature selection must contain at least one id")]
    EmptySelection,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("failed to read dataset file at {path}: {source}")]
    ReadError {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse dataset file at {path}: {source}")]
    ParseError {
        path: String,
        source: serde_json::Error,
    },
    #[error("no station or road files found below {path}")]
    NoFeatures { path: String },
    #[error(transparent)]
    Invalid(#[from] CatalogError),
}

impl PartialEq for CatalogLoadError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::ReadError { path: left, .. }, Self::ReadError { path: right, .. }) => {
                left == right
            }
            (Self::ParseError { path: left, .. }, Self::ParseError { path: right, .. }) => {
                left == right
            }
            (Self::NoFeatures { path: left }, Self::NoFeatures { path: right }) => left == right,
            (Self::Invalid(left), Self::Invalid(right)) => left == right,
            _ => false,
        }
    }
}

impl Eq for CatalogLoadError {}

impl FeatureCatalog {
    pub fn new(features: Vec<Feature>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();

        for feature in &features {
            if feature.accepted_answers.is_empty() {
                return Err(CatalogError::EmptyAnswers {
                    id: feature.id.clone(),
                });
            }
            if feature.geometry.is_empty() {
                return Err(CatalogError::EmptyGeometry {
                    id: feature.id.clone(),
                });
            }
            if !seen.insert(feature.id.as_str()) {
                return Err(CatalogError::DuplicateFeature {
                    id: feature.id.clone(),
                });
            }
        }

        Ok(Self { features })
    }

    pub fn from_records(
        roads: Vec<RoadRecord>,
        stations: Vec<StationRecord>,
    ) -> Result<Self, CatalogError> {
        let features = stations
            .into_iter()
            .map(StationRecord::into_feature)
            .chain(roads.into_iter().map(RoadRecord::into_feature))
            .collect();

        Self::new(features)
    }

    pub fn from_directory(root: impl AsRef<Path>) -> Result<Self, CatalogLoadError> {
        let root = root.as_ref();
        let stations = read_records::<StationRecord>(&root.join("stations"))?;
        let roads = read_records::<RoadRecord>(&root.join("roads"))?;

        log::debug!(
            "loaded {} stations and {} roads from {}",
            stations.len(),
            roads.len(),
            root.display()
        );

        if stations.is_empty() && roads.is_empty() {
            return Err(CatalogLoadError::NoFeatures {
                path: root.display().to_string(),
            });
        }

        Ok(Self::from_records(roads, stations)?)
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Feature> {
        self.features.iter().find(|feature| feature.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(|feature| feature.id.as_str())
    }

    pub fn of_kind(&self, kind: FeatureKind) -> impl Iterator<Item = &Feature> {
        self.features
            .iter()
            .filter(move |feature| feature.kind == kind)
    }

    pub fn canonical_names(&self) -> Vec<String> {
        self.features
            .iter()
            .map(|feature| feature.canonical_name().to_string())
            .collect()
    }

    pub fn subset<S: AsRef<str>>(&self, ids: &[S]) -> Result<Self, CatalogError> {
        if ids.is_empty() {
            return Err(CatalogError::EmptySelection);
        }

        let features = ids
            .iter()
            .map(|id| {
                self.get(id.as_ref())
                    .cloned()
                    .ok_or_else(|| CatalogError::UnknownFeature {
                        id: id.as_ref().to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(features)
    }
}

fn read_records<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>, CatalogLoadError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let walker = fs::read_dir(dir).map_err(|source| CatalogLoadError::ReadError {
        path: dir.display().to_string(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|source| CatalogLoadError::ReadError {
            path: dir.display().to_string(),
            source,
        })?;
        let path = entry.path();

        if path.extension().and_then(|extension| extension.to_str()) == Some("json") {
            files.push(path);
        }
    }
    files.sort();

    files
        .iter()
        .map(|path| {
            let data = fs::read(path).map_err(|source| CatalogLoadError::ReadError {
                path: path.display().to_string(),
                source,
            })?;

            serde_json::from_slice(&data).map_err(|source| CatalogLoadError::ParseError {
                path: path.display().to_string(),
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn church_road() -> Feature {
        Feature::road(
            "Church Road",
            &["churchroad", "churchrd"],
            vec![vec![LatLng::new(39.02, -77.41), LatLng::new(39.03, -77.40)]],
        )
    }

    fn station_35() -> Feature {
        Feature::station("Station 35", &["station35"], LatLng::new(39.030, -77.433))
    }

    fn sample_catalog() -> FeatureCatalog {
        FeatureCatalog::new(vec![station_35(), church_road()]).expect("catalog is valid")
    }

    #[test]
    fn looks_up_features_by_id() {
        let catalog = sample_catalog();

        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains("Church Road"));
        assert!(!catalog.contains("churchrd"));
        assert_eq!(
            catalog.get("Station 35").map(|feature| feature.kind),
            Some(FeatureKind::Station)
        );
        assert_eq!(catalog.of_kind(FeatureKind::Road).count(), 1);
    }

    #[test]
    fn canonical_names_follow_catalog_order() {
        assert_eq!(
            sample_catalog().canonical_names(),
            vec!["Station 35".to_string(), "Church Road".to_string()]
        );
    }

    #[test]
    fn rejects_duplicate_ids() {
        let error = FeatureCatalog::new(vec![church_road(), church_road()])
            .expect_err("duplicate should be rejected");

        assert_eq!(
            error,
            CatalogError::DuplicateFeature {
                id: "Church Road".to_string()
            }
        );
    }

    #[test]
    fn rejects_features_without_answers_or_geometry() {
        let mut unanswerable = church_road();
        unanswerable.accepted_answers.clear();
        assert_eq!(
            FeatureCatalog::new(vec![unanswerable]),
            Err(CatalogError::EmptyAnswers {
                id: "Church Road".to_string()
            })
        );

        let mut invisible = church_road();
        invisible.geometry = Geometry::Paths(Vec::new());
        assert_eq!(
            FeatureCatalog::new(vec![invisible]),
            Err(CatalogError::EmptyGeometry {
                id: "Church Road".to_string()
            })
        );
    }

    #[test]
    fn subset_keeps_requested_order() {
        let catalog = sample_catalog();
        let subset = catalog
            .subset(&["Church Road", "Station 35"])
            .expect("both ids exist");

        assert_eq!(
            subset.ids().collect::<Vec<_>>(),
            vec!["Church Road", "Station 35"]
        );
    }

    #[test]
    fn subset_errors_on_unknown_or_empty_selection() {
        let catalog = sample_catalog();

        assert_eq!(
            catalog.subset(&["Nokes Blvd"]),
            Err(CatalogError::UnknownFeature {
                id: "Nokes Blvd".to_string()
            })
        );
        assert_eq!(
            catalog.subset::<&str>(&[]),
            Err(CatalogError::EmptySelection)
        );
    }

    #[test]
    fn road_record_accepts_both_coordinate_spellings() {
        let traced = r#"{ "name": "Nokes Blvd", "cordinates": [[[39.02, -77.42], [39.03, -77.41]]] }"#;
        let corrected = r#"{ "name": "Nokes Blvd", "coordinates": [[[39.02, -77.42]]], "answers": ["nokesblvd"] }"#;

        let first: RoadRecord = serde_json::from_str(traced).expect("traced file parses");
        let second: RoadRecord = serde_json::from_str(corrected).expect("alias parses");

        assert_eq!(first.into_feature().accepted_answers, vec!["Nokes Blvd"]);
        assert_eq!(
            second.into_feature().accepted_answers,
            vec!["Nokes Blvd", "nokesblvd"]
        );
    }

    #[test]
    fn record_answers_do_not_repeat_the_name() {
        let record = StationRecord {
            name: "Station 15".to_string(),
            point: LatLng::new(38.9998, -77.4021),
            answers: vec!["Station 15".to_string(), "station15".to_string()],
        };

        assert_eq!(
            record.into_feature().accepted_answers,
            vec!["Station 15", "station15"]
        );
    }

    #[test]
    fn loads_stations_and_roads_from_directory() {
        let root = tempfile::tempdir().expect("temporary directory should be created");
        fs::create_dir_all(root.path().join("roads")).expect("roads dir");
        fs::create_dir_all(root.path().join("stations")).expect("stations dir");

        write_json(
            root.path().join("roads").join("church_road.json"),
            &RoadRecord {
                name: "Church Road".to_string(),
                cordinates: vec![vec![LatLng::new(39.02, -77.41), LatLng::new(39.03, -77.40)]],
                answers: vec!["churchrd".to_string()],
            },
        );
        write_json(
            root.path().join("stations").join("station_35.json"),
            &StationRecord {
                name: "Station 35".to_string(),
                point: LatLng::new(39.030, -77.433),
                answers: vec!["station35".to_string()],
            },
        );
        fs::write(root.path().join("roads").join("README.txt"), "ignored").expect("write");

        let catalog = FeatureCatalog::from_directory(root.path()).expect("catalog should load");

        assert_eq!(
            catalog.ids().collect::<Vec<_>>(),
            vec!["Station 35", "Church Road"]
        );
    }

    #[test]
    fn reports_parse_errors_with_path() {
        let root = tempfile::tempdir().expect("temporary directory should be created");
        let roads = root.path().join("roads");
        fs::create_dir_all(&roads).expect("roads dir");
        let broken = roads.join("broken.json");
        fs::write(&broken, "{ not json").expect("write");

        let error = FeatureCatalog::from_directory(root.path()).expect_err("parse should fail");

        assert_eq!(
            error,
            CatalogLoadError::ParseError {
                path: broken.display().to_string(),
                source: serde_json::from_str::<RoadRecord>("{").expect_err("invalid"),
            }
        );
    }

    #[test]
    fn reports_duplicate_features_across_files() {
        let root = tempfile::tempdir().expect("temporary directory should be created");
        let roads = root.path().join("roads");
        fs::create_dir_all(&roads).expect("roads dir");
        let record = RoadRecord {
            name: "Church Road".to_string(),
            cordinates: vec![vec![LatLng::new(39.02, -77.41)]],
            answers: Vec::new(),
        };
        write_json(roads.join("a.json"), &record);
        write_json(roads.join("b.json"), &record);

        let error = FeatureCatalog::from_directory(root.path()).expect_err("duplicate");

        assert_eq!(
            error,
            CatalogLoadError::Invalid(CatalogError::DuplicateFeature {
                id: "Church Road".to_string()
            })
        );
    }

    #[test]
    fn missing_root_is_an_error() {
        let root = tempfile::tempdir().expect("temporary directory should be created");
        let missing = root.path().join("dataa");

        let error = FeatureCatalog::from_directory(&missing).expect_err("nothing to load");

        assert_eq!(
            error,
            CatalogLoadError::NoFeatures {
                path: missing.display().to_string()
            }
        );
    }

    fn write_json<T: serde::Serialize>(path: impl Into<PathBuf>, value: &T) {
        let serialized = serde_json::to_string(value).expect("record should serialize to JSON");
        fs::write(path.into(), serialized).expect("record should be written");
    }
}
