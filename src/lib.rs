pub mod answer;
pub mod catalog;
pub mod catalog_manifest;
pub mod dataset;
pub mod demo;
pub mod feature;
pub mod flow;
pub mod map_host;
pub mod quiz;
pub mod render;
pub mod session;
pub mod viewport;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use answer::{Level, UnknownLevel, matches, normalize};
pub use catalog::{CatalogError, CatalogLoadError, FeatureCatalog, RoadRecord, StationRecord};
pub use catalog_manifest::{CatalogLeaf, CatalogManifest, QuestionPlan, default_plan};
pub use dataset::{Dataset, DatasetError, MANIFEST_FILE, load_dataset};
pub use demo::{demo_catalog, demo_flow, demo_questions};
pub use feature::{Feature, FeatureId, FeatureKind, Geometry, LatLng};
pub use flow::{FlowError, FlowPosition, Question, QuizFlow, build_questions};
pub use map_host::{
    EventSink, FeatureEvent, FeatureHandlers, MapHost, MarkerIcon, PolylineStyle, Viewport,
    ViewportCallback,
};
pub use quiz::{IgnoredReason, QuizPhase, QuizState, Transition};
pub use render::{
    Banner, BannerTone, FeatureRender, FeatureVisual, RenderState, Score, derive_render_state,
};
pub use session::{ModalView, QuizSession, SessionSnapshot};
pub use viewport::MapConfig;
