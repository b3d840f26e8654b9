use crate::{Model, Msg};
use gloo_file::File as GlooFile;
use gloo_net::http::Request;
use shared::{
    complete_prediction, ApiConfig, CategoryTable, PipelineError, PredictionRequest, RequestTicket,
};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::FormData;
use yew::html::Scope;

fn build_form_data(request: &PredictionRequest<'_, GlooFile>) -> Result<FormData, PipelineError> {
    let form_error = |e: wasm_bindgen::JsValue| PipelineError::HttpError {
        status: None,
        message: format!("Failed to build form data: {:?}", e),
    };

    let form_data = FormData::new().map_err(form_error)?;
    let file = request.file;
    form_data
        .append_with_blob_and_filename(
            shared::dispatch::FILE_FIELD,
            file.blob().as_ref(),
            file.name(),
        )
        .map_err(form_error)?;

    for (name, value) in &request.text_fields {
        form_data.append_with_str(name, value).map_err(form_error)?;
    }

    Ok(form_data)
}

/// Sends one prediction request and reports back with `Msg::PredictionFinished`.
pub fn send_prediction_request(
    link: &Scope<Model>,
    config: &ApiConfig,
    categories: Rc<CategoryTable>,
    ticket: RequestTicket,
    request: PredictionRequest<'_, GlooFile>,
) {
    let kind = request.kind;
    let url = config.url(request.endpoint());

    let form_data = match build_form_data(&request) {
        Ok(form_data) => form_data,
        Err(e) => {
            link.send_message(Msg::PredictionFinished(ticket, Err(e)));
            return;
        }
    };

    log::info!(
        "Request #{}: POST {} ({} fields)",
        ticket.id(),
        url,
        request.field_names().len()
    );

    spawn_local({
        let link = link.clone();

        async move {
            let result = match Request::post(&url).body(form_data) {
                Ok(request) => match request.send().await {
                    Ok(response) => {
                        let status = response.status();
                        match response.text().await {
                            Ok(body) => complete_prediction(kind, status, &body, &categories),
                            Err(e) => Err(PipelineError::HttpError {
                                status: Some(status),
                                message: format!("Failed to read response body: {}", e),
                            }),
                        }
                    }
                    Err(e) => Err(PipelineError::HttpError {
                        status: None,
                        message: e.to_string(),
                    }),
                },
                Err(e) => Err(PipelineError::HttpError {
                    status: None,
                    message: format!("Failed to build request: {}", e),
                }),
            };

            link.send_message(Msg::PredictionFinished(ticket, result));
        }
    });
}
