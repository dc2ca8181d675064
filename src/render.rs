use std::fmt;

use crate::answer::{Level, matches};
use crate::catalog::FeatureCatalog;
use crate::feature::{Feature, FeatureId, FeatureKind};
use crate::map_host::{MarkerIcon, PolylineStyle};
use crate::quiz::QuizState;

pub const STATION_GLYPH: &str = "fa-house-fire";

/// Visual state of a single feature, derived from the quiz state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureVisual {
    Unanswered,
    AnsweredPending,
    Hovered,
    Correct,
    Incorrect,
}

impl FeatureVisual {
    pub fn road_color(self) -> &'static str {
        match self {
            FeatureVisual::Unanswered => "black",
            FeatureVisual::AnsweredPending | FeatureVisual::Correct => "green",
            FeatureVisual::Hovered => "blue",
            FeatureVisual::Incorrect => "red",
        }
    }

    pub fn station_class(self) -> &'static str {
        match self {
            FeatureVisual::Unanswered => "text-black",
            FeatureVisual::AnsweredPending | FeatureVisual::Correct => "text-[#008000]",
            FeatureVisual::Hovered => "text-blue-700",
            FeatureVisual::Incorrect => "text-red-500",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
}

impl Score {
    pub fn is_perfect(self) -> bool {
        self.correct == self.total
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.correct, self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRender {
    pub id: FeatureId,
    pub kind: FeatureKind,
    pub visual: FeatureVisual,
    pub tooltip: Option<String>,
}

impl FeatureRender {
    pub fn polyline_style(&self) -> PolylineStyle {
        PolylineStyle {
            color: self.visual.road_color(),
            tooltip: self.tooltip.clone(),
        }
    }

    pub fn marker_icon(&self) -> MarkerIcon {
        MarkerIcon {
            glyph: STATION_GLYPH,
            class_name: self.visual.station_class(),
            tooltip: self.tooltip.clone(),
        }
    }
}

/// Everything the map and banner need for one repaint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderState {
    pub features: Vec<FeatureRender>,
    pub score: Score,
    pub submitted: bool,
}

impl RenderState {
    /// The score is only revealed after submission.
    pub fn visible_score(&self) -> Option<Score> {
        self.submitted.then_some(self.score)
    }

    pub fn visual(&self, id: &str) -> Option<FeatureVisual> {
        self.features
            .iter()
            .find(|feature| feature.id == id)
            .map(|feature| feature.visual)
    }
}

/// Applies the display precedence: submitted result, then hover, then answered.
///
/// An empty answer counts as unanswered.
pub fn visual_for(feature: &Feature, state: &QuizState) -> FeatureVisual {
    let answer = state.answer(&feature.id);

    if state.is_submitted() {
        if matches(feature, answer, state.level()) {
            FeatureVisual::Correct
        } else {
            FeatureVisual::Incorrect
        }
    } else if state.hovered_feature() == Some(feature.id.as_str()) {
        FeatureVisual::Hovered
    } else if answer.is_some_and(|value| !value.is_empty()) {
        FeatureVisual::AnsweredPending
    } else {
        FeatureVisual::Unanswered
    }
}

pub fn score(catalog: &FeatureCatalog, state: &QuizState) -> Score {
    let correct = catalog
        .features()
        .iter()
        .filter(|feature| matches(feature, state.answer(&feature.id), state.level()))
        .count();

    Score {
        correct,
        total: catalog.len(),
    }
}

fn tooltip_for(feature: &Feature, state: &QuizState) -> Option<String> {
    let answer = state
        .answer(&feature.id)
        .filter(|value| !value.is_empty());

    match (state.is_submitted(), answer) {
        (true, Some(answer)) if answer != feature.canonical_name() => {
            Some(format!("{} (you answered {})", feature.canonical_name(), answer))
        }
        (true, _) => Some(feature.canonical_name().to_string()),
        (false, answer) => answer.map(str::to_string),
    }
}

/// Derives the per-feature visuals and the aggregate score in one pass over the catalog.
pub fn derive_render_state(catalog: &FeatureCatalog, state: &QuizState) -> RenderState {
    let features = catalog
        .features()
        .iter()
        .map(|feature| FeatureRender {
            id: feature.id.clone(),
            kind: feature.kind,
            visual: visual_for(feature, state),
            tooltip: tooltip_for(feature, state),
        })
        .collect();

    RenderState {
        features,
        score: score(catalog, state),
        submitted: state.is_submitted(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerTone {
    Neutral,
    Success,
    Failure,
}

impl BannerTone {
    pub fn class_name(self) -> &'static str {
        match self {
            BannerTone::Neutral => "banner banner-neutral",
            BannerTone::Success => "banner banner-success",
            BannerTone::Failure => "banner banner-failure",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub text: String,
    pub tone: BannerTone,
}

/// Instructions while answering, the score once submitted.
pub fn banner(level: Level, render: &RenderState) -> Banner {
    match render.visible_score() {
        Some(score) => Banner {
            text: format!("You answered {score} correct"),
            tone: if score.is_perfect() {
                BannerTone::Success
            } else {
                BannerTone::Failure
            },
        },
        None => Banner {
            text: match level {
                Level::Selection => "Click each location and select the specific name.",
                Level::FreeText => "Click each location and type the specific name.",
            }
            .to_string(),
            tone: BannerTone::Neutral,
        },
    }
}
