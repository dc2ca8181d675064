#![cfg(target_arch = "wasm32")]

use crate::session::{SELECT_PLACEHOLDER, entropy_rng};
use crate::{
    CatalogManifest, EventSink, FeatureCatalog, FeatureEvent, FeatureHandlers, FeatureKind, LatLng,
    Level, MapConfig, MapHost, MarkerIcon, PolylineStyle, Question, QuizFlow, QuizSession,
    RoadRecord, SessionSnapshot, StationRecord, Viewport, ViewportCallback, build_questions,
    demo_questions,
};
use gloo_net::http::Request;
use leptos::{html, *};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

const MANIFEST_PATH: &str = "data/index.json";
const CONFIG_PATH: &str = "data/config.json";
const SELECT_VALUE: &str = "select_location";

struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        leptos::logging::console_log(&format!("[{}] {}", record.level(), record.args()));
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

pub fn init_logging() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Debug);
    }
}

#[wasm_bindgen(inline_js = r#"
export function createMap(container, optionsJson) {
    if (typeof L === 'undefined') {
        throw new Error('Leaflet not loaded');
    }

    const options = JSON.parse(optionsJson);
    const map = L.map(container, {
        center: options.center,
        zoom: options.zoom,
        minZoom: options.minZoom,
        maxBounds: options.maxBounds,
        maxBoundsViscosity: options.maxBoundsViscosity,
    });
    L.tileLayer(options.tileUrl, { attribution: options.attribution }).addTo(map);
    map.quizRenderer = L.canvas({ padding: 0.5, tolerance: 5 });
    return map;
}

function bindEvents(layer, onEnter, onLeave, onClick) {
    layer.on('mouseover', () => onEnter());
    layer.on('mouseout', () => onLeave());
    layer.on('click', () => onClick());
}

export function drawPolyline(map, pathsJson, color, onEnter, onLeave, onClick) {
    const layer = L.polyline(JSON.parse(pathsJson), { color, renderer: map.quizRenderer });
    bindEvents(layer, onEnter, onLeave, onClick);
    return layer.addTo(map);
}

export function restylePolyline(layer, color) {
    layer.setStyle({ color });
}

export function drawMarker(map, lat, lng, html, onEnter, onLeave, onClick) {
    const layer = L.marker([lat, lng], { icon: L.divIcon({ html, className: '' }) });
    bindEvents(layer, onEnter, onLeave, onClick);
    return layer.addTo(map);
}

export function restyleMarker(layer, html) {
    layer.setIcon(L.divIcon({ html, className: '' }));
}

export function setTooltip(layer, text) {
    layer.unbindTooltip();
    if (text) {
        layer.bindTooltip(text, { sticky: true });
    }
}

export function removeLayer(map, layer) {
    map.removeLayer(layer);
}

export function setGestures(map, enabled) {
    for (const handler of [map.dragging, map.doubleClickZoom, map.scrollWheelZoom, map.touchZoom]) {
        if (!handler) {
            continue;
        }
        if (enabled && !handler.enabled()) {
            handler.enable();
        } else if (!enabled && handler.enabled()) {
            handler.disable();
        }
    }

    if (enabled) {
        map.zoomControl.addTo(map);
    } else {
        map.zoomControl.remove();
    }
}

export function watchViewport(map, callback) {
    const report = () => callback(map.getZoom(), window.innerWidth);
    map.quizWatchers = map.quizWatchers || [];
    map.quizWatchers.push(report);
    map.on('zoomend', report);
    window.addEventListener('resize', report);
    report();
}

export function setZoom(map, zoom) {
    map.setZoom(zoom);
}

export function invalidateSize(map) {
    map.invalidateSize();
}

export function destroyMap(map) {
    for (const report of map.quizWatchers || []) {
        window.removeEventListener('resize', report);
    }
    map.remove();
}
"#)]
extern "C" {
    #[wasm_bindgen(js_name = createMap, catch)]
    fn create_map(container: &JsValue, options: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_name = drawPolyline)]
    fn draw_polyline(
        map: &JsValue,
        paths: &str,
        color: &str,
        on_enter: &js_sys::Function,
        on_leave: &js_sys::Function,
        on_click: &js_sys::Function,
    ) -> JsValue;

    #[wasm_bindgen(js_name = restylePolyline)]
    fn restyle_polyline(layer: &JsValue, color: &str);

    #[wasm_bindgen(js_name = drawMarker)]
    fn draw_marker(
        map: &JsValue,
        lat: f64,
        lng: f64,
        html: &str,
        on_enter: &js_sys::Function,
        on_leave: &js_sys::Function,
        on_click: &js_sys::Function,
    ) -> JsValue;

    #[wasm_bindgen(js_name = restyleMarker)]
    fn restyle_marker(layer: &JsValue, html: &str);

    #[wasm_bindgen(js_name = setTooltip)]
    fn set_tooltip(layer: &JsValue, text: Option<String>);

    #[wasm_bindgen(js_name = removeLayer)]
    fn remove_layer(map: &JsValue, layer: &JsValue);

    #[wasm_bindgen(js_name = setGestures)]
    fn set_gestures(map: &JsValue, enabled: bool);

    #[wasm_bindgen(js_name = watchViewport)]
    fn watch_viewport(map: &JsValue, callback: &js_sys::Function);

    #[wasm_bindgen(js_name = setZoom)]
    fn set_zoom(map: &JsValue, zoom: f64);

    #[wasm_bindgen(js_name = invalidateSize)]
    fn invalidate_size(map: &JsValue);

    #[wasm_bindgen(js_name = destroyMap)]
    fn destroy_map(map: &JsValue);
}

struct DrawnFeature {
    layer: JsValue,
    look: String,
    tooltip: Option<String>,
    _listeners: [Closure<dyn FnMut()>; 3],
}

impl DrawnFeature {
    fn update_tooltip(&mut self, tooltip: Option<&str>) {
        if self.tooltip.as_deref() != tooltip {
            self.tooltip = tooltip.map(str::to_string);
            set_tooltip(&self.layer, self.tooltip.clone());
        }
    }
}

pub struct LeafletHost {
    map: JsValue,
    drawn: HashMap<String, DrawnFeature>,
    viewport_listeners: Vec<Closure<dyn FnMut(f64, f64)>>,
}

impl LeafletHost {
    pub fn new(container: &JsValue, config: &MapConfig, width: f64) -> Result<Self, String> {
        let options = config.leaflet_options(width).to_string();
        let map = create_map(container, &options).map_err(|error| {
            error
                .as_string()
                .or_else(|| {
                    error
                        .dyn_ref::<js_sys::Error>()
                        .map(|error| String::from(error.message()))
                })
                .unwrap_or_else(|| "failed to create map".to_string())
        })?;

        Ok(Self {
            map,
            drawn: HashMap::new(),
            viewport_listeners: Vec::new(),
        })
    }

    pub fn map_handle(&self) -> JsValue {
        self.map.clone()
    }

    fn listeners(handlers: &FeatureHandlers) -> [Closure<dyn FnMut()>; 3] {
        [
            FeatureEvent::PointerEnter,
            FeatureEvent::PointerLeave,
            FeatureEvent::Click,
        ]
        .map(|event| {
            let handlers = handlers.clone();
            Closure::<dyn FnMut()>::new(move || handlers.fire(event))
        })
    }
}

impl MapHost for LeafletHost {
    fn render_polyline(
        &mut self,
        paths: &[Vec<LatLng>],
        style: &PolylineStyle,
        handlers: &FeatureHandlers,
    ) {
        if let Some(drawn) = self.drawn.get_mut(handlers.feature_id()) {
            if drawn.look != style.color {
                restyle_polyline(&drawn.layer, style.color);
                drawn.look = style.color.to_string();
            }
            drawn.update_tooltip(style.tooltip.as_deref());
            return;
        }

        let paths_json = match serde_json::to_string(paths) {
            Ok(json) => json,
            Err(error) => {
                log::error!("cannot draw {}: {error}", handlers.feature_id());
                return;
            }
        };
        let listeners = Self::listeners(handlers);
        let layer = draw_polyline(
            &self.map,
            &paths_json,
            style.color,
            listeners[0].as_ref().unchecked_ref(),
            listeners[1].as_ref().unchecked_ref(),
            listeners[2].as_ref().unchecked_ref(),
        );

        let mut drawn = DrawnFeature {
            layer,
            look: style.color.to_string(),
            tooltip: None,
            _listeners: listeners,
        };
        drawn.update_tooltip(style.tooltip.as_deref());
        self.drawn.insert(handlers.feature_id().to_string(), drawn);
    }

    fn render_marker(&mut self, point: LatLng, icon: &MarkerIcon, handlers: &FeatureHandlers) {
        let html = icon.html();

        if let Some(drawn) = self.drawn.get_mut(handlers.feature_id()) {
            if drawn.look != html {
                restyle_marker(&drawn.layer, &html);
                drawn.look = html;
            }
            drawn.update_tooltip(icon.tooltip.as_deref());
            return;
        }

        let listeners = Self::listeners(handlers);
        let layer = draw_marker(
            &self.map,
            point.lat,
            point.lng,
            &html,
            listeners[0].as_ref().unchecked_ref(),
            listeners[1].as_ref().unchecked_ref(),
            listeners[2].as_ref().unchecked_ref(),
        );

        let mut drawn = DrawnFeature {
            layer,
            look: html,
            tooltip: None,
            _listeners: listeners,
        };
        drawn.update_tooltip(icon.tooltip.as_deref());
        self.drawn.insert(handlers.feature_id().to_string(), drawn);
    }

    fn clear_features(&mut self) {
        for (_, drawn) in self.drawn.drain() {
            remove_layer(&self.map, &drawn.layer);
        }
    }

    fn disable_gestures(&mut self) {
        set_gestures(&self.map, false);
    }

    fn enable_gestures(&mut self) {
        set_gestures(&self.map, true);
    }

    fn on_viewport_change(&mut self, callback: ViewportCallback) {
        let listener = Closure::<dyn FnMut(f64, f64)>::new(move |zoom: f64, width: f64| {
            callback(Viewport { zoom, width })
        });
        watch_viewport(&self.map, listener.as_ref().unchecked_ref());
        self.viewport_listeners.push(listener);
    }
}

impl Drop for LeafletHost {
    fn drop(&mut self) {
        destroy_map(&self.map);
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum DataSource {
    Served,
    Bundled,
}

#[derive(Clone)]
struct LoadedQuiz {
    questions: Vec<Question>,
    config: MapConfig,
    source: DataSource,
}

async fn fetch_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, String> {
    Request::get(path)
        .send()
        .await
        .map_err(|error| error.to_string())?
        .json::<T>()
        .await
        .map_err(|error| format!("{path}: {error}"))
}

async fn fetch_catalog(manifest: &CatalogManifest) -> Result<FeatureCatalog, String> {
    let mut roads = Vec::new();
    let mut stations = Vec::new();

    for leaf in manifest.leaves() {
        match leaf.kind {
            FeatureKind::Road => roads.push(fetch_json::<RoadRecord>(&leaf.file).await?),
            FeatureKind::Station => {
                stations.push(fetch_json::<StationRecord>(&leaf.file).await?)
            }
        }
    }

    FeatureCatalog::from_records(roads, stations).map_err(|error| error.to_string())
}

async fn load_quiz() -> Result<LoadedQuiz, String> {
    let config = match fetch_json::<MapConfig>(CONFIG_PATH).await {
        Ok(config) => config,
        Err(error) => {
            log::info!("using default map settings ({error})");
            MapConfig::default()
        }
    };

    let manifest = match fetch_json::<CatalogManifest>(MANIFEST_PATH).await {
        Ok(manifest) => manifest,
        Err(error) => {
            log::warn!("no served dataset ({error}); using bundled features");
            return Ok(LoadedQuiz {
                questions: demo_questions().map_err(|error| error.to_string())?,
                config,
                source: DataSource::Bundled,
            });
        }
    };

    let catalog = fetch_catalog(&manifest).await?;
    let questions = build_questions(&catalog, &manifest.question_plan())
        .map_err(|error| error.to_string())?;
    log::info!(
        "loaded {} features and {} questions",
        catalog.len(),
        questions.len()
    );

    Ok(LoadedQuiz {
        questions,
        config,
        source: DataSource::Served,
    })
}

fn window_width() -> f64 {
    leptos::window()
        .inner_width()
        .ok()
        .and_then(|width| width.as_f64())
        .unwrap_or(1024.0)
}

type SharedSession = Rc<RefCell<Option<QuizSession<LeafletHost>>>>;

#[derive(Clone)]
struct SessionHandle {
    session: SharedSession,
    revision: RwSignal<u64>,
}

impl SessionHandle {
    fn update<R>(&self, action: impl FnOnce(&mut QuizSession<LeafletHost>) -> R) -> Option<R> {
        let result = match self.session.try_borrow_mut() {
            Ok(mut guard) => guard.as_mut().map(action),
            Err(_) => {
                log::debug!("session busy; dropping nested update");
                None
            }
        };
        self.revision.update(|revision| *revision += 1);
        result
    }

    fn snapshot(&self) -> Option<SessionSnapshot> {
        self.revision.track();
        self.session
            .try_borrow()
            .ok()
            .and_then(|guard| guard.as_ref().map(QuizSession::snapshot))
    }

    fn event_sink(&self) -> EventSink {
        let session: Weak<RefCell<Option<QuizSession<LeafletHost>>>> =
            Rc::downgrade(&self.session);
        let revision = self.revision;

        Rc::new(move |id: &str, event: FeatureEvent| {
            if let Some(session) = session.upgrade() {
                SessionHandle { session, revision }
                    .update(|session| session.handle_event(id, event));
            }
        })
    }
}

fn mount_session(
    container: &JsValue,
    loaded: &LoadedQuiz,
    handle: &SessionHandle,
    set_home_visible: WriteSignal<bool>,
) -> Result<JsValue, String> {
    let mut host = LeafletHost::new(container, &loaded.config, window_width())?;
    let config = loaded.config.clone();
    host.on_viewport_change(Box::new(move |viewport: Viewport| {
        set_home_visible.set(config.home_visible(viewport.width, viewport.zoom));
    }));
    let map = host.map_handle();

    let flow = QuizFlow::new(loaded.questions.clone()).map_err(|error| error.to_string())?;
    let session = QuizSession::new(flow, host).with_shuffled_choices(entropy_rng());
    *handle.session.borrow_mut() = Some(session);

    let sink = handle.event_sink();
    handle.update(|session| session.attach(sink));

    let resize_target = map.clone();
    request_animation_frame(move || invalidate_size(&resize_target));
    Ok(map)
}

#[derive(Clone, PartialEq, Eq)]
struct ModalKey {
    feature_id: String,
    level: Level,
    title: &'static str,
    choices: Vec<String>,
}

#[component]
fn AnswerModal(
    modal: ModalKey,
    #[prop(into)] value: Signal<String>,
    on_answer: Callback<String>,
    on_close: Callback<()>,
) -> impl IntoView {
    let control = match modal.level {
        Level::Selection => view! {
            <select
                class="answer-input"
                on:change=move |event| on_answer.call(event_target_value(&event))
            >
                <option value=SELECT_VALUE disabled=true selected=move || value.get().is_empty()>
                    {SELECT_PLACEHOLDER}
                </option>
                {modal
                    .choices
                    .iter()
                    .map(|choice| {
                        let label = choice.clone();
                        let current = choice.clone();
                        view! {
                            <option value=choice.clone() selected=move || value.get() == current>
                                {label}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>
        }
        .into_view(),
        Level::FreeText => view! {
            <input
                class="answer-input"
                type="text"
                autofocus=true
                prop:value=move || value.get()
                on:input=move |event| on_answer.call(event_target_value(&event))
            />
        }
        .into_view(),
    };

    view! {
        <div class="answer-modal" role="dialog" aria-modal="true" aria-label=modal.feature_id.clone()>
            <button
                class="modal-close"
                type="button"
                aria-label="Close"
                on:click=move |_| on_close.call(())
            >
                <i class="fa-solid fa-x fa-xl"></i>
            </button>
            <span class="modal-title">{modal.title}</span>
            <div class="modal-body">{control}</div>
        </div>
    }
}

fn command(handle: &SessionHandle, action: fn(&mut QuizSession<LeafletHost>)) -> Callback<()> {
    let handle = handle.clone();
    Callback::new(move |_: ()| {
        handle.update(action);
    })
}

#[component]
fn QuizPage(loaded: LoadedQuiz) -> impl IntoView {
    let handle = SessionHandle {
        session: Rc::new(RefCell::new(None)),
        revision: create_rw_signal(0),
    };
    let map_ref = create_node_ref::<html::Div>();
    let map_handle = store_value::<Option<JsValue>>(None);
    let (home_visible, set_home_visible) = create_signal(false);
    let (mount_error, set_mount_error) = create_signal::<Option<String>>(None);

    let snapshot = {
        let handle = handle.clone();
        create_memo(move |_| handle.snapshot())
    };
    let modal_key = create_memo(move |_| {
        snapshot.get().and_then(|snapshot| snapshot.modal).map(|modal| ModalKey {
            feature_id: modal.feature_id,
            level: modal.level,
            title: modal.title,
            choices: modal.choices,
        })
    });
    let modal_value = create_memo(move |_| {
        snapshot
            .get()
            .and_then(|snapshot| snapshot.modal)
            .map(|modal| modal.value)
            .unwrap_or_default()
    });
    let flag = move |pick: fn(&SessionSnapshot) -> bool| {
        snapshot.with(|snapshot| snapshot.as_ref().is_some_and(pick))
    };

    {
        let handle = handle.clone();
        let loaded = loaded.clone();
        create_effect(move |_| {
            let Some(element) = map_ref.get() else {
                return;
            };
            if map_handle.with_value(Option::is_some) {
                return;
            }

            let container: JsValue = (*element).clone().into();
            match mount_session(&container, &loaded, &handle, set_home_visible) {
                Ok(map) => map_handle.set_value(Some(map)),
                Err(message) => {
                    log::error!("map failed to start: {message}");
                    set_mount_error.set(Some(message));
                }
            }
        });
    }

    {
        let handle = handle.clone();
        on_cleanup(move || {
            if let Ok(mut session) = handle.session.try_borrow_mut() {
                session.take();
            }
        });
    }

    let submit = command(&handle, |session| {
        session.submit();
    });
    let restart_question = command(&handle, QuizSession::reset_question);
    let next_question = command(&handle, |session| {
        session.advance();
    });
    let restart_quiz = command(&handle, QuizSession::restart_quiz);
    let close_modal = command(&handle, |session| {
        session.close_modal();
    });
    let record_answer = {
        let handle = handle.clone();
        Callback::new(move |value: String| {
            handle.update(|session| {
                if let Some(id) = session.state().active_feature().map(str::to_string) {
                    session.record_answer(&id, value);
                }
            });
        })
    };

    let home_zoom = loaded.config.clone();
    let go_home = move |_: ev::MouseEvent| {
        if let Some(map) = map_handle.get_value() {
            set_zoom(&map, home_zoom.home_zoom(window_width()));
        }
    };

    let bundled = loaded.source == DataSource::Bundled;

    view! {
        <section class="quiz-shell">
            <div class="quiz-toolbar">
                <span class="question-label">
                    {move || {
                        snapshot
                            .get()
                            .map(|snapshot| format!("Question: {}", snapshot.question_number))
                            .unwrap_or_default()
                    }}
                </span>
                <Show when=move || flag(|snapshot| snapshot.next_visible)>
                    <button class="btn" type="button" on:click=move |_| next_question.call(())>
                        "Next Question"
                    </button>
                </Show>
                <Show when=move || flag(|snapshot| snapshot.restart_quiz_visible)>
                    <button class="btn" type="button" on:click=move |_| restart_quiz.call(())>
                        "Restart Quiz"
                    </button>
                </Show>
                {bundled.then(|| view! { <span class="pill">"Bundled dataset"</span> })}
            </div>

            {move || {
                mount_error
                    .get()
                    .map(|message| {
                        view! {
                            <section class="error-card">
                                <p class="eyebrow">"Map error"</p>
                                <p class="error-body">{message}</p>
                            </section>
                        }
                    })
            }}

            <Show when=move || flag(|snapshot| snapshot.finished)>
                <p class="lede">"More questions soon!"</p>
            </Show>

            <div
                class="question-panel"
                style=move || {
                    if flag(|snapshot| snapshot.finished) { "display:none" } else { "" }
                }
            >
                {move || {
                    snapshot
                        .get()
                        .and_then(|snapshot| snapshot.banner)
                        .map(|banner| {
                            view! { <p class=banner.tone.class_name()>{banner.text}</p> }
                        })
                }}
                <div class="question-actions">
                    <Show when=move || flag(|snapshot| snapshot.submit_visible)>
                        <button class="btn btn-primary" type="button" on:click=move |_| submit.call(())>
                            "Submit"
                        </button>
                    </Show>
                    <Show when=move || flag(|snapshot| snapshot.restart_question_visible)>
                        <button class="btn" type="button" on:click=move |_| restart_question.call(())>
                            "Restart Question"
                        </button>
                    </Show>
                </div>
                <div class="map-frame">
                    <div class="map-canvas" node_ref=map_ref></div>
                    <Show when=move || home_visible.get()>
                        <button
                            class="home-control"
                            type="button"
                            aria-label="Reset zoom"
                            on:click=go_home.clone()
                        >
                            <i class="fa-solid fa-home fa-2x"></i>
                        </button>
                    </Show>
                    {move || {
                        modal_key
                            .get()
                            .map(|modal| {
                                view! {
                                    <AnswerModal
                                        modal=modal
                                        value=modal_value
                                        on_answer=record_answer
                                        on_close=close_modal
                                    />
                                }
                            })
                    }}
                </div>
            </div>
        </section>
    }
}

#[component]
fn App() -> impl IntoView {
    let quiz = create_local_resource(|| (), |_| async { load_quiz().await });

    view! {
        <main class="page">
            <header class="page-header">
                <p class="eyebrow">"Sterling, VA"</p>
                <h1 class="headline">"Roads and Fire Stations"</h1>
            </header>
            {move || match quiz.get() {
                None => view! {
                    <section class="placeholder-card">
                        <p class="lede">"Loading map..."</p>
                    </section>
                }
                .into_view(),
                Some(Ok(loaded)) => view! { <QuizPage loaded=loaded /> }.into_view(),
                Some(Err(message)) => view! {
                    <section class="error-card">
                        <p class="eyebrow">"Dataset error"</p>
                        <p class="error-body">{message}</p>
                    </section>
                }
                .into_view(),
            }}
        </main>
    }
}

pub fn mount() {
    mount_to_body(|| view! { <App /> });
}
