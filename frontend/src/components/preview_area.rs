use super::super::{FileData, Model, Msg, PredictionMode};
use super::utils::{debounce, truncate_name};
use shared::intake::format_file_size;
use shared::{Algorithm, TranslationProvider};
use strum::IntoEnumIterator;
use web_sys::HtmlInputElement;
use yew::prelude::*;

pub fn render_preview_area(model: &Model, ctx: &Context<Model>) -> Html {
    let Some(file_data) = &model.selected else {
        return html! {};
    };

    let t = &model.translator;
    let link = ctx.link().clone();

    html! {
        <section id="preview-container" class="preview-section">
            <h2>{ t.translate("previewTitle") }</h2>
            <div class="preview-layout">
                <img id="actual-image-preview"
                    src={file_data.preview_url.to_string()}
                    alt={file_data.file.name().to_string()} />
                { render_file_info(model, file_data) }
            </div>

            { render_settings(model, ctx) }

            <div class="button-container">
                <button
                    id="clear-btn"
                    class="analyze-btn"
                    style="background-color: var(--clear-color);"
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.send_message(Msg::ClearFile)
                    })}
                    disabled={model.loading()}
                >
                    <i class="fa-solid fa-trash"></i>
                </button>
                <button
                    id="analyze-btn"
                    class="analyze-btn"
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.send_message(Msg::Analyze)
                    })}
                    disabled={model.loading()}
                >
                    { render_analyze_button_content(model, file_data) }
                </button>
            </div>
        </section>
    }
}

fn render_file_info(model: &Model, file_data: &FileData) -> Html {
    let t = &model.translator;
    let meta = file_data.file.meta();

    html! {
        <div class="image-info">
            <h3>{ t.translate("imageInfoTitle") }</h3>
            <p><span class="info-label">{ t.translate("fileNameLabel") }</span>{ format!(" {}", meta.name) }</p>
            <p><span class="info-label">{ t.translate("fileSizeLabel") }</span>{ format!(" {}", format_file_size(meta.size_bytes)) }</p>
            <p><span class="info-label">{ t.translate("fileTypeLabel") }</span>{ format!(" {}", meta.type_label()) }</p>
        </div>
    }
}

fn render_settings(model: &Model, ctx: &Context<Model>) -> Html {
    let t = &model.translator;
    let link = ctx.link();

    let handle_seed = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::SetSeed(input.value())
    });

    html! {
        <div class="comparison-settings">
            <h3>{ t.translate("comparisonSettingsTitle") }</h3>

            <div class="setting-row">
                <label>{ t.translate("testExcludeEnvLabel") }</label>
                <input
                    type="text"
                    id="seed-input"
                    value={model.seed.clone()}
                    onchange={handle_seed}
                />
            </div>

            <div class="setting-row processing-mode-selector">
                <span>{ t.translate("modeLabel") }</span>
                <label>
                    <input type="radio" name="prediction_mode"
                        value="single"
                        checked={model.mode == PredictionMode::Single}
                        onchange={link.callback(|_| Msg::SetMode(PredictionMode::Single))} />
                    <span class="radio-label-text">{ t.translate("singleMode") }</span>
                </label>
                <label>
                    <input type="radio" name="prediction_mode"
                        value="compare"
                        checked={model.mode == PredictionMode::Compare}
                        onchange={link.callback(|_| Msg::SetMode(PredictionMode::Compare))} />
                    <span class="radio-label-text">{ t.translate("compareMode") }</span>
                </label>
            </div>

            <div class="setting-row model-selector">
                <span>{ t.translate("modelsLabel") }</span>
                { for Algorithm::iter().map(|algorithm| render_model_choice(model, ctx, algorithm)) }
            </div>
        </div>
    }
}

fn render_model_choice(model: &Model, ctx: &Context<Model>, algorithm: Algorithm) -> Html {
    let link = ctx.link();

    match model.mode {
        PredictionMode::Single => html! {
            <label key={algorithm.to_string()}>
                <input type="radio" name="single_algorithm"
                    value={algorithm.to_string()}
                    checked={model.algorithm == algorithm}
                    onchange={link.callback(move |_| Msg::SelectAlgorithm(algorithm))} />
                <span class="radio-label-text">{ algorithm.to_string() }</span>
            </label>
        },
        PredictionMode::Compare => html! {
            <label key={algorithm.to_string()}>
                <input type="checkbox" name="models"
                    value={algorithm.to_string()}
                    checked={model.models.contains(&algorithm)}
                    onchange={link.callback(move |_| Msg::ToggleModel(algorithm))} />
                <span class="checkbox-label-text">{ algorithm.to_string() }</span>
            </label>
        },
    }
}

fn render_analyze_button_content(model: &Model, file_data: &FileData) -> Html {
    let t = &model.translator;

    if model.loading() {
        html! { <><i class="fa-solid fa-spinner fa-spin"></i>{ format!(" {}", t.translate("analyzing")) }</> }
    } else {
        let display_name = truncate_name(file_data.file.name(), 20);
        html! {
            <>
                <i class="fa-solid fa-magnifying-glass"></i>
                { format!(" {} \"{}\"", t.translate("uploadButton"), display_name) }
            </>
        }
    }
}
