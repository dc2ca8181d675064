use std::collections::BTreeMap;

use crate::answer::Level;
use crate::catalog::FeatureCatalog;
use crate::feature::FeatureId;

/// Lifecycle of one question instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// Collecting answers. Initial state and the target of [`QuizState::reset`].
    Active,
    /// Answers are locked and scored.
    Submitted,
}

/// Why a transition was refused. Refusals leave the state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    AlreadySubmitted,
    UnknownFeature,
    NotActiveFeature,
    AlreadySelected,
    NoActiveFeature,
    Unchanged,
    QuizFinished,
}

/// Outcome of a state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    Ignored(IgnoredReason),
}

impl Transition {
    pub fn is_applied(self) -> bool {
        self == Transition::Applied
    }
}

/// Answers and UI focus for the question currently on screen.
///
/// Only the transition methods mutate it, and illegal calls are no-ops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizState {
    level: Level,
    answers: BTreeMap<FeatureId, String>,
    submitted: bool,
    hovered: Option<FeatureId>,
    active: Option<FeatureId>,
}

impl QuizState {
    pub fn new(level: Level) -> Self {
        Self {
            level,
            answers: BTreeMap::new(),
            submitted: false,
            hovered: None,
            active: None,
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn phase(&self) -> QuizPhase {
        if self.submitted {
            QuizPhase::Submitted
        } else {
            QuizPhase::Active
        }
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn answer(&self, id: &str) -> Option<&str> {
        self.answers.get(id).map(String::as_str)
    }

    pub fn answers(&self) -> &BTreeMap<FeatureId, String> {
        &self.answers
    }

    pub fn has_answers(&self) -> bool {
        !self.answers.is_empty()
    }

    pub fn active_feature(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn hovered_feature(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// Opens the answer modal for `id`. Switching to another feature keeps the modal open.
    pub fn select_feature(&mut self, catalog: &FeatureCatalog, id: &str) -> Transition {
        if self.submitted {
            return self.ignore("select_feature", id, IgnoredReason::AlreadySubmitted);
        }
        if !catalog.contains(id) {
            return self.ignore("select_feature", id, IgnoredReason::UnknownFeature);
        }
        if self.active.as_deref() == Some(id) {
            return Transition::Ignored(IgnoredReason::AlreadySelected);
        }

        log::debug!("selected feature {id}");
        self.active = Some(id.to_string());
        Transition::Applied
    }

    /// Stores `value` for `id`, replacing any earlier answer. `id` must be the selected feature.
    pub fn record_answer(&mut self, id: &str, value: impl Into<String>) -> Transition {
        if self.submitted {
            return self.ignore("record_answer", id, IgnoredReason::AlreadySubmitted);
        }
        if self.active.as_deref() != Some(id) {
            return self.ignore("record_answer", id, IgnoredReason::NotActiveFeature);
        }

        let value = value.into();
        if self.answers.get(id) == Some(&value) {
            return Transition::Ignored(IgnoredReason::Unchanged);
        }

        log::debug!("recorded answer {value:?} for {id}");
        self.answers.insert(id.to_string(), value);
        Transition::Applied
    }

    /// Dismisses the answer modal. Recorded answers are kept.
    pub fn close_modal(&mut self) -> Transition {
        if self.active.is_none() {
            return Transition::Ignored(IgnoredReason::NoActiveFeature);
        }

        self.active = None;
        self.hovered = None;
        Transition::Applied
    }

    /// Locks the answers. Incomplete answer sets are allowed and score as incorrect.
    pub fn submit(&mut self) -> Transition {
        if self.submitted {
            return self.ignore("submit", "", IgnoredReason::AlreadySubmitted);
        }

        log::info!(
            "submitted level {} question with {} answers",
            self.level.number(),
            self.answers.len()
        );
        self.submitted = true;
        self.active = None;
        Transition::Applied
    }

    /// Returns to a fresh `Active` state. Legal from any state.
    pub fn reset(&mut self) {
        log::info!("reset level {} question", self.level.number());
        self.answers.clear();
        self.active = None;
        self.submitted = false;
    }

    /// Updates the hover highlight. Accepted in every phase.
    pub fn set_hovered(&mut self, catalog: &FeatureCatalog, id: Option<&str>) -> Transition {
        if let Some(id) = id {
            if !catalog.contains(id) {
                return self.ignore("set_hovered", id, IgnoredReason::UnknownFeature);
            }
        }
        if self.hovered.as_deref() == id {
            return Transition::Ignored(IgnoredReason::Unchanged);
        }

        self.hovered = id.map(str::to_string);
        Transition::Applied
    }

    fn ignore(&self, operation: &str, id: &str, reason: IgnoredReason) -> Transition {
        log::warn!("ignored {operation}({id}) in {:?} phase: {reason:?}", self.phase());
        Transition::Ignored(reason)
    }
}
