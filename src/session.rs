use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::answer::Level;
use crate::catalog::FeatureCatalog;
use crate::feature::Geometry;
use crate::flow::{FlowPosition, QuizFlow};
use crate::map_host::{EventSink, FeatureEvent, FeatureHandlers, MapHost};
use crate::quiz::{IgnoredReason, QuizState, Transition};
use crate::render::{Banner, RenderState, banner, derive_render_state};

pub const SELECT_PLACEHOLDER: &str = "Select location";

/// Contents of the answer modal for the selected feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalView {
    pub feature_id: String,
    pub level: Level,
    pub title: &'static str,
    /// Current answer, empty when none was recorded.
    pub value: String,
    /// Level 1 choice list. Empty for free-text questions.
    pub choices: Vec<String>,
}

/// Everything the page chrome needs besides the map itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub question_number: usize,
    pub finished: bool,
    pub level: Level,
    pub banner: Option<Banner>,
    pub submit_visible: bool,
    pub restart_question_visible: bool,
    pub next_visible: bool,
    pub restart_quiz_visible: bool,
    pub modal: Option<ModalView>,
}

/// Drives a quiz on a map host.
///
/// Owns the flow, the state of the question on screen and the host. Every
/// applied transition repaints the host from a fresh [`RenderState`], and
/// only this type toggles the host's gesture switches.
pub struct QuizSession<H: MapHost> {
    flow: QuizFlow,
    state: QuizState,
    host: H,
    sink: Option<EventSink>,
    gestures_enabled: bool,
    choice_rng: Option<StdRng>,
    choices: Vec<String>,
}

impl<H: MapHost> QuizSession<H> {
    pub fn new(flow: QuizFlow, host: H) -> Self {
        let level = flow
            .current()
            .map(|question| question.level)
            .unwrap_or(Level::Selection);

        let mut session = Self {
            flow,
            state: QuizState::new(level),
            host,
            sink: None,
            gestures_enabled: true,
            choice_rng: None,
            choices: Vec::new(),
        };
        session.start_question();
        session
    }

    /// Shuffles the level 1 choice list of every question with `rng`.
    pub fn with_shuffled_choices(mut self, rng: StdRng) -> Self {
        self.choice_rng = Some(rng);
        self.start_question();
        self
    }

    /// Routes pointer events from drawn features to `sink` and redraws with it attached.
    pub fn attach(&mut self, sink: EventSink) {
        self.sink = Some(sink);
        self.host.clear_features();
        self.repaint();
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn flow(&self) -> &QuizFlow {
        &self.flow
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn catalog(&self) -> Option<&FeatureCatalog> {
        self.flow.current().map(|question| &question.catalog)
    }

    pub fn gestures_enabled(&self) -> bool {
        self.gestures_enabled
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn render_state(&self) -> Option<RenderState> {
        self.catalog()
            .map(|catalog| derive_render_state(catalog, &self.state))
    }

    /// Applies a pointer event reported by the host.
    pub fn handle_event(&mut self, id: &str, event: FeatureEvent) {
        match event {
            FeatureEvent::PointerEnter => {
                self.hover(Some(id));
            }
            FeatureEvent::PointerLeave => {
                self.hover(None);
            }
            FeatureEvent::Click => {
                self.hover(Some(id));
                if !self.state.is_submitted() {
                    self.select_feature(id);
                }
            }
        }
    }

    fn hover(&mut self, id: Option<&str>) -> Transition {
        let Some(question) = self.flow.current() else {
            return Transition::Ignored(IgnoredReason::QuizFinished);
        };

        let outcome = self.state.set_hovered(&question.catalog, id);
        self.after(outcome)
    }

    pub fn select_feature(&mut self, id: &str) -> Transition {
        let Some(question) = self.flow.current() else {
            return Transition::Ignored(IgnoredReason::QuizFinished);
        };

        let outcome = self.state.select_feature(&question.catalog, id);
        if outcome.is_applied() {
            self.set_gestures(false);
        }
        self.after(outcome)
    }

    pub fn record_answer(&mut self, id: &str, value: impl Into<String>) -> Transition {
        let outcome = self.state.record_answer(id, value);
        self.after(outcome)
    }

    /// Closes the answer modal and gives the map its gestures back.
    pub fn close_modal(&mut self) -> Transition {
        let outcome = self.state.close_modal();
        if outcome.is_applied() {
            self.set_gestures(true);
        }
        self.after(outcome)
    }

    /// Locks the current question and tells the flow it may advance.
    pub fn submit(&mut self) -> Transition {
        if self.flow.current().is_none() {
            return Transition::Ignored(IgnoredReason::QuizFinished);
        }

        let outcome = self.state.submit();
        if outcome.is_applied() {
            self.set_gestures(true);
            self.flow.question_submitted();
        }
        self.after(outcome)
    }

    /// Clears the current question's answers.
    pub fn reset_question(&mut self) {
        self.state.reset();
        self.set_gestures(true);
        self.repaint();
    }

    pub fn advance(&mut self) -> bool {
        if !self.flow.advance() {
            return false;
        }

        self.start_question();
        true
    }

    /// Back to question 1 with every question's answers discarded.
    pub fn restart_quiz(&mut self) {
        self.flow.restart();
        self.start_question();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let render = self.render_state();
        let submitted = self.state.is_submitted();
        let modal = self.state.active_feature().map(|id| ModalView {
            feature_id: id.to_string(),
            level: self.state.level(),
            title: match self.state.level() {
                Level::Selection => "Select location",
                Level::FreeText => "Enter location",
            },
            value: self.state.answer(id).unwrap_or_default().to_string(),
            choices: match self.state.level() {
                Level::Selection => self.choices.clone(),
                Level::FreeText => Vec::new(),
            },
        });

        SessionSnapshot {
            question_number: self.flow.question_number(),
            finished: self.flow.position() == FlowPosition::Finished,
            level: self.state.level(),
            banner: render
                .as_ref()
                .map(|render| banner(self.state.level(), render)),
            submit_visible: render.is_some() && !submitted,
            restart_question_visible: render.is_some()
                && (submitted || self.state.has_answers()),
            next_visible: self.flow.can_advance(),
            restart_quiz_visible: self.flow.restart_visible(),
            modal,
        }
    }

    fn start_question(&mut self) {
        let level = self
            .flow
            .current()
            .map(|question| question.level)
            .unwrap_or(self.state.level());

        self.state = QuizState::new(level);
        self.choices = self
            .catalog()
            .map(FeatureCatalog::canonical_names)
            .unwrap_or_default();
        if let Some(rng) = self.choice_rng.as_mut() {
            self.choices.shuffle(rng);
        }

        self.set_gestures(true);
        self.host.clear_features();
        self.repaint();
    }

    fn set_gestures(&mut self, enabled: bool) {
        if self.gestures_enabled == enabled {
            return;
        }

        if enabled {
            self.host.enable_gestures();
        } else {
            self.host.disable_gestures();
        }
        self.gestures_enabled = enabled;
    }

    fn after(&mut self, outcome: Transition) -> Transition {
        if outcome.is_applied() {
            self.repaint();
        }
        outcome
    }

    fn repaint(&mut self) {
        let Some(question) = self.flow.current() else {
            return;
        };

        let render = derive_render_state(&question.catalog, &self.state);
        for (feature, view) in question.catalog.features().iter().zip(&render.features) {
            let handlers = FeatureHandlers::new(feature.id.clone(), self.sink.clone());
            match &feature.geometry {
                Geometry::Paths(paths) => {
                    self.host
                        .render_polyline(paths, &view.polyline_style(), &handlers)
                }
                Geometry::Point(point) => {
                    self.host
                        .render_marker(*point, &view.marker_icon(), &handlers)
                }
            }
        }
    }
}

/// Seeds the choice shuffler from the platform entropy source.
pub fn entropy_rng() -> StdRng {
    StdRng::from_entropy()
}
