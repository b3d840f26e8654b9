mod api;
mod components;

use components::{handlers, header, locale_toggle, preview_area, results, upload_section, utils};
use gloo_events::EventListener;
use gloo_file::{File as GlooFile, ObjectUrl};
use gloo_storage::{LocalStorage, Storage};
use gloo_timers::callback::Timeout;
use shared::{
    Algorithm, ApiConfig, CategoryTable, Locale, PipelineError, PredictionOutcome, RequestSequence,
    RequestTicket, TranslationProvider, Translator, ValidatedFile,
};
use std::collections::BTreeSet;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{ClipboardEvent, DragEvent};
use yew::prelude::*;

const CLIENT_CONFIG: &str = include_str!("../../config/client.yaml");
pub const LOCALE_STORAGE_KEY: &str = "lfme_locale";
pub const MODELS_STORAGE_KEY: &str = "lfme_models";

// Models
pub struct FileData {
    file: ValidatedFile<GlooFile>,
    preview_url: ObjectUrl,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PredictionMode {
    Single,
    Compare,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Toast {
    id: u64,
    kind: ToastKind,
    message: String,
}

// Yew msg components
pub enum Msg {
    // File operations
    FilesOffered(Vec<GlooFile>),
    ClearFile,

    // Prediction settings
    SetMode(PredictionMode),
    SelectAlgorithm(Algorithm),
    ToggleModel(Algorithm),
    SetSeed(String),

    // Analysis operations
    Analyze,
    PredictionFinished(RequestTicket, Result<PredictionOutcome, PipelineError>),

    // UI states
    Notify(ToastKind, &'static str),
    DismissToast(u64),
    SetDragging(bool),
    SetLocale(Locale),

    // Input events
    HandleDrop(DragEvent),
    HandlePaste(ClipboardEvent),
}

// Main component
pub struct Model {
    config: ApiConfig,
    categories: Rc<CategoryTable>,
    translator: Translator,
    selected: Option<FileData>,
    mode: PredictionMode,
    algorithm: Algorithm,
    models: BTreeSet<Algorithm>,
    seed: String,
    requests: RequestSequence,
    outcome: Option<PredictionOutcome>,
    toast: Option<Toast>,
    toast_timeout: Option<Timeout>,
    next_toast_id: u64,
    is_dragging: bool,
    paste_listener: Option<EventListener>,
}

impl Model {
    fn loading(&self) -> bool {
        self.requests.is_busy()
    }
}

fn load_config() -> ApiConfig {
    match ApiConfig::from_yaml(CLIENT_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}, falling back to defaults", e);
            ApiConfig::default()
        }
    }
}

fn load_translator() -> Translator {
    let translator = Translator::embedded().unwrap_or_else(|e| {
        log::error!("{}, showing raw keys", e);
        Translator::default()
    });
    let locale = LocalStorage::get::<Locale>(LOCALE_STORAGE_KEY).unwrap_or_default();
    translator.with_locale(locale)
}

fn load_models() -> BTreeSet<Algorithm> {
    LocalStorage::get::<BTreeSet<Algorithm>>(MODELS_STORAGE_KEY)
        .ok()
        .filter(|models| !models.is_empty())
        .unwrap_or_else(|| BTreeSet::from([Algorithm::LFME]))
}

// Yew component implementation
impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let config = load_config();
        log::info!("Prediction service at {}", config.base_url);

        let mut model = Self {
            config,
            categories: Rc::new(CategoryTable::pacs()),
            translator: load_translator(),
            selected: None,
            mode: PredictionMode::Compare,
            algorithm: Algorithm::default(),
            models: load_models(),
            seed: "0".to_string(),
            requests: RequestSequence::new(),
            outcome: None,
            toast: None,
            toast_timeout: None,
            next_toast_id: 0,
            is_dragging: false,
            paste_listener: None,
        };

        locale_toggle::apply_document_locale(
            model.translator.locale(),
            &model.translator.translate("pageTitle"),
        );

        let link = ctx.link().clone();
        if let Some(window) = web_sys::window() {
            let listener = EventListener::new(&window, "paste", move |event| {
                if let Some(clipboard_event) = event.dyn_ref::<ClipboardEvent>() {
                    link.send_message(Msg::HandlePaste(clipboard_event.clone()));
                }
            });
            model.paste_listener = Some(listener);
        }

        ctx.link()
            .send_message(Msg::Notify(ToastKind::Success, "toastMessages.loaded"));

        model
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            // File operations
            Msg::FilesOffered(files) => handlers::handle_files_offered(self, ctx, files),
            Msg::ClearFile => handlers::handle_clear_file(self),

            // Prediction settings
            Msg::SetMode(mode) => {
                self.mode = mode;
                true
            }
            Msg::SelectAlgorithm(algorithm) => {
                self.algorithm = algorithm;
                true
            }
            Msg::ToggleModel(algorithm) => handlers::handle_toggle_model(self, algorithm),
            Msg::SetSeed(seed) => {
                self.seed = seed;
                false
            }

            // Analysis operations
            Msg::Analyze => handlers::handle_analyze(self, ctx),
            Msg::PredictionFinished(ticket, result) => {
                handlers::handle_prediction_finished(self, ctx, ticket, result)
            }

            // UI states
            Msg::Notify(kind, key) => handlers::show_toast(self, ctx, kind, key),
            Msg::DismissToast(id) => handlers::handle_dismiss_toast(self, id),
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }
            Msg::SetLocale(locale) => handlers::handle_set_locale(self, locale),

            // Input events
            Msg::HandleDrop(event) => handlers::handle_drop(self, ctx, event),
            Msg::HandlePaste(event) => handlers::handle_paste(self, ctx, event),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let t = &self.translator;

        html! {
            <div class="container">
                { header::render_header(t, &self.categories) }
                { locale_toggle::render_locale_toggle(t.locale(), t.translate("languageSwitch"), ctx.link()) }

                <main class="main-content">
                    { upload_section::render_upload_section(self, ctx) }
                    { preview_area::render_preview_area(self, ctx) }
                    { results::render_results(self) }
                </main>

                { utils::render_toast(self) }

                <footer class="app-footer">
                    <p>{ t.translate("footerText") }</p>
                </footer>
            </div>
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
