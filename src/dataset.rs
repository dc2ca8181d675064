use std::fs;
use std::io;
use std::path::Path;

use crate::catalog::{CatalogLoadError, FeatureCatalog};
use crate::catalog_manifest::{CatalogManifest, default_plan};
use crate::flow::{FlowError, QuizFlow, build_questions};

pub const MANIFEST_FILE: &str = "index.json";

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error(transparent)]
    Catalog(#[from] CatalogLoadError),
    #[error("failed to read manifest at {path}: {source}")]
    ManifestRead { path: String, source: io::Error },
    #[error("failed to parse manifest at {path}: {source}")]
    ManifestParse {
        path: String,
        source: serde_json::Error,
    },
    #[error("{path}: {source}")]
    Plan { path: String, source: FlowError },
}

/// A dataset directory resolved into the quiz the browser would run.
#[derive(Debug)]
pub struct Dataset {
    pub catalog: FeatureCatalog,
    /// `None` when the directory has no `index.json`.
    pub manifest: Option<CatalogManifest>,
    pub flow: QuizFlow,
}

pub fn load_dataset(root: impl AsRef<Path>) -> Result<Dataset, DatasetError> {
    let root = root.as_ref();
    let catalog = FeatureCatalog::from_directory(root)?;

    let manifest_path = root.join(MANIFEST_FILE);
    let manifest = read_manifest(&manifest_path)?;
    let plan = manifest
        .as_ref()
        .map(CatalogManifest::question_plan)
        .unwrap_or_else(default_plan);

    let flow = build_questions(&catalog, &plan)
        .and_then(QuizFlow::new)
        .map_err(|source| DatasetError::Plan {
            path: manifest_path.display().to_string(),
            source,
        })?;

    log::info!(
        "{}: {} features, {} questions",
        root.display(),
        catalog.len(),
        flow.questions().len()
    );

    Ok(Dataset {
        catalog,
        manifest,
        flow,
    })
}

fn read_manifest(path: &Path) -> Result<Option<CatalogManifest>, DatasetError> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(DatasetError::ManifestRead {
                path: path.display().to_string(),
                source,
            });
        }
    };

    serde_json::from_slice(&data)
        .map(Some)
        .map_err(|source| DatasetError::ManifestParse {
            path: path.display().to_string(),
            source,
        })
}
