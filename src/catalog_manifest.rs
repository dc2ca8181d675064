use crate::answer::Level;
use crate::feature::FeatureKind;

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct CatalogManifest {
    #[serde(default)]
    pub stations: Vec<String>,
    #[serde(default)]
    pub roads: Vec<String>,
    #[serde(default)]
    pub questions: Vec<QuestionPlan>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct QuestionPlan {
    pub level: u8,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CatalogLeaf {
    pub kind: FeatureKind,
    pub file: String,
}

pub fn default_plan() -> Vec<QuestionPlan> {
    [Level::Selection, Level::FreeText]
        .into_iter()
        .map(|level| QuestionPlan {
            level: level.number(),
            features: Vec::new(),
        })
        .collect()
}

impl CatalogManifest {
    pub fn question_plan(&self) -> Vec<QuestionPlan> {
        if self.questions.is_empty() {
            default_plan()
        } else {
            self.questions.clone()
        }
    }

    pub fn leaves(&self) -> Vec<CatalogLeaf> {
        let stations = self.stations.iter().map(|file| CatalogLeaf {
            kind: FeatureKind::Station,
            file: file.clone(),
        });
        let roads = self.roads.iter().map(|file| CatalogLeaf {
            kind: FeatureKind::Road,
            file: file.clone(),
        });

        stations.chain(roads).collect()
    }
}
