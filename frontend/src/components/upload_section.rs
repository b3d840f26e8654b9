use super::super::Model;
use super::super::Msg;
use super::utils::debounce;
use gloo_file::File as GlooFile;
use shared::TranslationProvider;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, HtmlInputElement};
use yew::prelude::*;

pub fn render_upload_section(model: &Model, ctx: &Context<Model>) -> Html {
    let t = &model.translator;

    html! {
        <section class="upload-section">
            <h2>{ t.translate("uploadTitle") }</h2>
            <p class="section-description">{ t.translate("uploadDescription") }</p>
            { render_file_input_area(model, ctx) }
        </section>
    }
}

fn render_file_input_area(model: &Model, ctx: &Context<Model>) -> Html {
    let t = &model.translator;
    let link = ctx.link();

    let handle_change = link.batch_callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let files: Vec<GlooFile> = input
            .files()
            .and_then(|list| list.item(0))
            .map(GlooFile::from)
            .into_iter()
            .collect();

        input.set_value("");

        (!files.is_empty()).then_some(Msg::FilesOffered(files))
    });

    let handle_drag_over = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(true)
    });

    let handle_drag_leave = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(false)
    });

    let handle_drop = link.callback(Msg::HandleDrop);
    let trigger_file_input = Callback::from(|_| {
        let input = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id("file-input"));
        if let Some(input) = input {
            if let Ok(html_input) = input.dyn_into::<web_sys::HtmlElement>() {
                html_input.click();
            }
        }
    });

    html! {
        <>
            <input
                type="file"
                id="file-input"
                accept="image/*"
                style="display: none;"
                onchange={handle_change}
            />

            <div
                id="drop-zone"
                class={classes!("upload-area", model.is_dragging.then_some("drag-over"))}
                ondragover={handle_drag_over}
                ondragleave={handle_drag_leave}
                ondrop={handle_drop}
                onclick={debounce(300, {
                    let trigger_file_input = trigger_file_input.clone();
                    move || trigger_file_input.emit(())
                })}
            >
                <div class="upload-placeholder">
                    <i class="fa-solid fa-cloud-arrow-up"></i>
                    <p>{ t.translate("uploadPlaceholderText") }</p>
                    <p class="file-types">{ t.translate("fileTypes") }</p>
                </div>
            </div>
        </>
    }
}
