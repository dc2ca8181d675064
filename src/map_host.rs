//! Capabilities the quiz needs from the map library.
//!
//! The quiz core never talks to a rendering library directly. A host draws
//! features, forwards pointer events through [`FeatureHandlers`] and owns the
//! pan/zoom gesture switches, which only [`crate::session::QuizSession`] toggles.

use std::fmt;
use std::rc::Rc;

use crate::feature::LatLng;

/// Pointer interaction on a drawn feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureEvent {
    PointerEnter,
    PointerLeave,
    Click,
}

/// Receives every pointer event the host observes, tagged with the feature id.
pub type EventSink = Rc<dyn Fn(&str, FeatureEvent)>;

/// Event callbacks attached to one drawn feature.
#[derive(Clone)]
pub struct FeatureHandlers {
    feature_id: String,
    sink: Option<EventSink>,
}

impl FeatureHandlers {
    pub fn new(feature_id: impl Into<String>, sink: Option<EventSink>) -> Self {
        Self {
            feature_id: feature_id.into(),
            sink,
        }
    }

    pub fn feature_id(&self) -> &str {
        &self.feature_id
    }

    pub fn fire(&self, event: FeatureEvent) {
        if let Some(sink) = &self.sink {
            sink(&self.feature_id, event);
        }
    }
}

impl fmt::Debug for FeatureHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureHandlers")
            .field("feature_id", &self.feature_id)
            .field("attached", &self.sink.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolylineStyle {
    /// CSS colour name.
    pub color: &'static str,
    pub tooltip: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerIcon {
    /// Font Awesome glyph class, e.g. `fa-house-fire`.
    pub glyph: &'static str,
    /// Colour utility class applied to the glyph.
    pub class_name: &'static str,
    pub tooltip: Option<String>,
}

impl MarkerIcon {
    pub fn html(&self) -> String {
        format!(
            r#"<i class="fa-solid {} fa-xl {}"></i>"#,
            self.glyph, self.class_name
        )
    }
}

/// Map viewport after a zoom or resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub zoom: f64,
    /// Width of the browser window in CSS pixels.
    pub width: f64,
}

pub type ViewportCallback = Box<dyn Fn(Viewport)>;

/// Rendering surface for quiz features.
///
/// `render_*` is called on every repaint. Hosts key drawn layers by
/// [`FeatureHandlers::feature_id`] and restyle existing layers in place.
pub trait MapHost {
    fn render_polyline(
        &mut self,
        paths: &[Vec<LatLng>],
        style: &PolylineStyle,
        handlers: &FeatureHandlers,
    );

    fn render_marker(&mut self, point: LatLng, icon: &MarkerIcon, handlers: &FeatureHandlers);

    /// Removes every drawn feature, used when the question changes.
    fn clear_features(&mut self);

    /// Disables dragging, scroll/touch/double-click zoom and the zoom control.
    fn disable_gestures(&mut self);

    fn enable_gestures(&mut self);

    fn on_viewport_change(&mut self, callback: ViewportCallback);
}
