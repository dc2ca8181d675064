use std::fmt;

/// Identifier of a quiz feature. Features are keyed by their canonical name.
pub type FeatureId = String;

/// Geographic coordinate stored as `[lat, lng]` in data files.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for LatLng {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(point: LatLng) -> Self {
        [point.lat, point.lng]
    }
}

/// Kind of map feature the user is asked to identify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Road,
    Station,
}

/// Shape drawn on the map for a feature.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Geometry {
    /// One or more disconnected polylines making up a road.
    Paths(Vec<Vec<LatLng>>),
    /// A single marker position.
    Point(LatLng),
}

impl Geometry {
    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Paths(paths) => paths.iter().all(Vec::is_empty),
            Geometry::Point(_) => false,
        }
    }
}

/// A named road or station the user must identify.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Feature {
    pub id: FeatureId,
    pub kind: FeatureKind,
    /// The first entry is the canonical display name, the rest are accepted synonyms.
    pub accepted_answers: Vec<String>,
    pub geometry: Geometry,
}

impl Feature {
    pub fn road(name: impl Into<String>, synonyms: &[&str], paths: Vec<Vec<LatLng>>) -> Self {
        Self::with_answers(name.into(), FeatureKind::Road, synonyms, Geometry::Paths(paths))
    }

    pub fn station(name: impl Into<String>, synonyms: &[&str], point: LatLng) -> Self {
        Self::with_answers(name.into(), FeatureKind::Station, synonyms, Geometry::Point(point))
    }

    fn with_answers(name: String, kind: FeatureKind, synonyms: &[&str], geometry: Geometry) -> Self {
        let mut accepted_answers = vec![name.clone()];
        accepted_answers.extend(synonyms.iter().map(|synonym| synonym.to_string()));

        Self {
            id: name,
            kind,
            accepted_answers,
            geometry,
        }
    }

    /// Display name shown in the selection list and after submission.
    pub fn canonical_name(&self) -> &str {
        self.accepted_answers
            .first()
            .map(String::as_str)
            .unwrap_or(&self.id)
    }

    pub fn synonyms(&self) -> &[String] {
        self.accepted_answers.get(1..).unwrap_or_default()
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            FeatureKind::Road => "road",
            FeatureKind::Station => "station",
        };
        write!(f, "{} ({})", self.canonical_name(), kind)
    }
}
