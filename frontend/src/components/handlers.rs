use super::super::{FileData, Model, Msg, PredictionMode, Toast, ToastKind};
use super::super::{LOCALE_STORAGE_KEY, MODELS_STORAGE_KEY};
use super::locale_toggle::apply_document_locale;
use crate::api::send_prediction_request;
use gloo_file::{File as GlooFile, ObjectUrl};
use gloo_storage::{LocalStorage, Storage};
use gloo_timers::callback::Timeout;
use shared::{
    validate_first, Algorithm, FileMeta, Locale, ModelSelection, PipelineError,
    PredictionOutcome, PredictionRequest, RequestTicket, Seed, TranslationProvider,
};
use web_sys::{ClipboardEvent, DragEvent, FileList};
use yew::prelude::*;

const TOAST_DURATION_MS: u32 = 3000;

fn file_meta(file: &GlooFile) -> FileMeta {
    FileMeta::new(file.name(), file.raw_mime_type(), file.size())
}

pub fn handle_files_offered(model: &mut Model, ctx: &Context<Model>, files: Vec<GlooFile>) -> bool {
    let offered = files.into_iter().map(|file| {
        let meta = file_meta(&file);
        (file, meta)
    });

    match validate_first(offered) {
        Ok(validated) => {
            log::info!(
                "Selected {} ({}, {} bytes)",
                validated.name(),
                validated.meta().mime_type,
                validated.meta().size_bytes
            );

            // A new selection supersedes whatever is still in flight.
            model.requests.invalidate();
            model.outcome = None;

            let preview_url = ObjectUrl::from(validated.blob().clone());
            model.selected = Some(FileData {
                file: validated,
                preview_url,
            });

            show_toast(model, ctx, ToastKind::Success, "toastMessages.imageSelected")
        }
        Err(e) => report_error(model, ctx, e),
    }
}

pub fn handle_clear_file(model: &mut Model) -> bool {
    if model.selected.take().is_none() {
        return false;
    }
    model.requests.invalidate();
    model.outcome = None;
    true
}

pub fn handle_toggle_model(model: &mut Model, algorithm: Algorithm) -> bool {
    if !model.models.remove(&algorithm) {
        model.models.insert(algorithm);
    }

    if let Err(e) = LocalStorage::set(MODELS_STORAGE_KEY, &model.models) {
        log::warn!("Failed to persist model selection: {}", e);
    }
    true
}

pub fn handle_set_locale(model: &mut Model, locale: Locale) -> bool {
    if model.translator.locale() == locale {
        return false;
    }
    model.translator.set_locale(locale);
    apply_document_locale(locale, &model.translator.translate("pageTitle"));

    if let Err(e) = LocalStorage::set(LOCALE_STORAGE_KEY, locale) {
        log::warn!("Failed to persist locale: {}", e);
    }
    true
}

pub fn handle_analyze(model: &mut Model, ctx: &Context<Model>) -> bool {
    if model.selected.is_none() {
        return report_error(model, ctx, PipelineError::NoSelection);
    }

    let selection = match model.mode {
        PredictionMode::Single => None,
        PredictionMode::Compare => match ModelSelection::new(model.models.iter().copied()) {
            Ok(selection) => Some(selection),
            Err(e) => return report_error(model, ctx, e),
        },
    };

    let ticket = match model.requests.begin() {
        Ok(ticket) => ticket,
        Err(e) => return report_error(model, ctx, e),
    };

    model.outcome = None;
    let seed = Seed::from(model.seed.as_str());

    if let Some(file_data) = &model.selected {
        let request = match &selection {
            Some(models) => PredictionRequest::multi(&file_data.file, &seed, models),
            None => PredictionRequest::single(&file_data.file, model.algorithm, &seed),
        };
        send_prediction_request(
            ctx.link(),
            &model.config,
            model.categories.clone(),
            ticket,
            request,
        );
    }

    true
}

pub fn handle_prediction_finished(
    model: &mut Model,
    ctx: &Context<Model>,
    ticket: RequestTicket,
    result: Result<PredictionOutcome, PipelineError>,
) -> bool {
    if !model.requests.settle(ticket) {
        return false;
    }

    match result {
        Ok(outcome) => {
            log::info!("Request #{} finished", ticket.id());
            model.outcome = Some(outcome);
            show_toast(model, ctx, ToastKind::Success, "toastMessages.analysisComplete")
        }
        Err(e) => {
            log::error!("Request #{} failed: {}", ticket.id(), e);
            report_error(model, ctx, e)
        }
    }
}

pub fn report_error(model: &mut Model, ctx: &Context<Model>, error: PipelineError) -> bool {
    if !error.aborts_prediction() {
        log::warn!("{}", error);
    }
    show_toast(model, ctx, ToastKind::Error, error.toast_key())
}

pub fn show_toast(model: &mut Model, ctx: &Context<Model>, kind: ToastKind, key: &str) -> bool {
    model.next_toast_id += 1;
    let id = model.next_toast_id;
    model.toast = Some(Toast {
        id,
        kind,
        message: model.translator.translate(key),
    });

    let link = ctx.link().clone();
    // Replacing the previous timeout cancels it.
    model.toast_timeout = Some(Timeout::new(TOAST_DURATION_MS, move || {
        link.send_message(Msg::DismissToast(id));
    }));

    true
}

pub fn handle_dismiss_toast(model: &mut Model, id: u64) -> bool {
    match &model.toast {
        Some(toast) if toast.id == id => {
            model.toast = None;
            model.toast_timeout = None;
            true
        }
        _ => false,
    }
}

pub fn handle_drop(model: &mut Model, ctx: &Context<Model>, event: DragEvent) -> bool {
    event.prevent_default();
    model.is_dragging = false;

    if let Some(data_transfer) = event.data_transfer() {
        if let Some(file_list) = data_transfer.files() {
            process_file_list(ctx, file_list);
        }
    }

    true
}

pub fn handle_paste(_model: &mut Model, ctx: &Context<Model>, event: ClipboardEvent) -> bool {
    if let Some(data_transfer) = event.clipboard_data() {
        if let Some(file_list) = data_transfer.files() {
            if file_list.length() > 0 {
                event.prevent_default();
                process_file_list(ctx, file_list);
                return true;
            }
        }
    }
    false
}

pub fn process_file_list(ctx: &Context<Model>, file_list: FileList) {
    let files: Vec<GlooFile> = (0..file_list.length())
        .filter_map(|i| file_list.item(i))
        .map(GlooFile::from)
        .collect();

    if !files.is_empty() {
        ctx.link().send_message(Msg::FilesOffered(files));
    }
}
