use crate::answer::{Level, UnknownLevel};
use crate::catalog::{CatalogError, FeatureCatalog};
use crate::catalog_manifest::QuestionPlan;

/// One quiz question: the answering mode and the features to identify.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub level: Level,
    pub catalog: FeatureCatalog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowPosition {
    /// Zero-based index of the question on screen.
    Question(usize),
    /// Every question has been advanced past.
    Finished,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("a quiz needs at least one question")]
    NoQuestions,
    #[error("question {index} has no features")]
    EmptyQuestion { index: usize },
    #[error("question {index}: {source}")]
    Level { index: usize, source: UnknownLevel },
    #[error("question {index}: {source}")]
    Catalog { index: usize, source: CatalogError },
    #[error("invalid question catalog: {0}")]
    InvalidCatalog(#[from] CatalogError),
}

/// Linear sequencer over a fixed list of questions.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizFlow {
    questions: Vec<Question>,
    position: FlowPosition,
    next_enabled: bool,
    restart_visible: bool,
}

impl QuizFlow {
    pub fn new(questions: Vec<Question>) -> Result<Self, FlowError> {
        if questions.is_empty() {
            return Err(FlowError::NoQuestions);
        }
        if let Some(index) = questions
            .iter()
            .position(|question| question.catalog.is_empty())
        {
            return Err(FlowError::EmptyQuestion { index });
        }

        Ok(Self {
            questions,
            position: FlowPosition::Question(0),
            next_enabled: false,
            restart_visible: false,
        })
    }

    pub fn position(&self) -> FlowPosition {
        self.position
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current(&self) -> Option<&Question> {
        match self.position {
            FlowPosition::Question(index) => self.questions.get(index),
            FlowPosition::Finished => None,
        }
    }

    /// One-based number shown to the user. Keeps counting past the last question.
    pub fn question_number(&self) -> usize {
        match self.position {
            FlowPosition::Question(index) => index + 1,
            FlowPosition::Finished => self.questions.len() + 1,
        }
    }

    pub fn can_advance(&self) -> bool {
        self.next_enabled
    }

    pub fn restart_visible(&self) -> bool {
        self.restart_visible
    }

    /// Called once when the current question is submitted.
    pub fn question_submitted(&mut self) {
        if self.current().is_none() {
            return;
        }

        self.next_enabled = true;
        self.restart_visible = true;
    }

    /// Moves to the next question. Only allowed after the current one was submitted.
    pub fn advance(&mut self) -> bool {
        if !self.next_enabled {
            log::warn!("advance ignored: question {} not submitted", self.question_number());
            return false;
        }

        self.position = match self.position {
            FlowPosition::Question(index) if index + 1 < self.questions.len() => {
                FlowPosition::Question(index + 1)
            }
            _ => FlowPosition::Finished,
        };
        self.next_enabled = false;
        log::info!("advanced to question {}", self.question_number());
        true
    }

    /// Returns to the first question and hides the flow controls.
    pub fn restart(&mut self) {
        log::info!("restarting quiz");
        self.position = FlowPosition::Question(0);
        self.next_enabled = false;
        self.restart_visible = false;
    }
}

/// Resolves a manifest question plan against the loaded catalog.
pub fn build_questions(
    catalog: &FeatureCatalog,
    plans: &[QuestionPlan],
) -> Result<Vec<Question>, FlowError> {
    plans
        .iter()
        .enumerate()
        .map(|(index, plan)| {
            let level = Level::try_from(plan.level)
                .map_err(|source| FlowError::Level { index, source })?;
            let catalog = if plan.features.is_empty() {
                catalog.clone()
            } else {
                catalog
                    .subset(plan.features.as_slice())
                    .map_err(|source| FlowError::Catalog { index, source })?
            };

            Ok(Question { level, catalog })
        })
        .collect()
}
