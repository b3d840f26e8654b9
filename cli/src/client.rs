use crate::CliError;
use reqwest::multipart::{Form, Part};
use shared::dispatch::FILE_FIELD;
use shared::intake::MAX_UPLOAD_BYTES;
use shared::{
    complete_prediction, validate, ApiConfig, CategoryTable, FileMeta, PipelineError,
    PipelineResult, PredictionOutcome, PredictionRequest, RequestSequence, ValidatedFile,
};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

pub fn mime_from_extension(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Applies the intake rules to an image on disk, reading its bytes only once it passes.
pub fn load_image(path: &Path) -> Result<ValidatedFile<Vec<u8>>, CliError> {
    let io_error = |source| CliError::Io {
        path: path.to_path_buf(),
        source,
    };

    let size = std::fs::metadata(path).map_err(io_error)?.len();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let checked = validate((), FileMeta::new(name, mime_from_extension(path), size))?;

    // The file may have grown since it was checked.
    let mut bytes = Vec::with_capacity(size as usize);
    File::open(path)
        .map_err(io_error)?
        .take(MAX_UPLOAD_BYTES + 1)
        .read_to_end(&mut bytes)
        .map_err(io_error)?;
    if bytes.len() as u64 > MAX_UPLOAD_BYTES {
        return Err(PipelineError::TooLarge {
            size: bytes.len() as u64,
            limit: MAX_UPLOAD_BYTES,
        }
        .into());
    }

    Ok(checked.with_blob(bytes))
}

fn transport_error(e: reqwest::Error) -> PipelineError {
    PipelineError::HttpError {
        status: e.status().map(|s| s.as_u16()),
        message: e.to_string(),
    }
}

pub struct PredictionClient {
    http: reqwest::Client,
    config: ApiConfig,
    categories: CategoryTable,
    requests: RequestSequence,
}

impl PredictionClient {
    pub fn new(config: ApiConfig, categories: CategoryTable) -> PipelineResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(transport_error)?;

        Ok(Self {
            http,
            config,
            categories,
            requests: RequestSequence::new(),
        })
    }

    pub async fn send(
        &mut self,
        request: &PredictionRequest<'_, Vec<u8>>,
    ) -> PipelineResult<PredictionOutcome> {
        let ticket = self.requests.begin()?;
        log::info!(
            "Request #{}: POST {} with {}",
            ticket.id(),
            self.config.url(request.endpoint()),
            request.field_names().join(", ")
        );

        let result = self.execute(request).await;
        self.requests.settle(ticket);

        match &result {
            Ok(_) => log::info!("Request #{} finished", ticket.id()),
            Err(e) => log::error!("Request #{} failed: {}", ticket.id(), e),
        }
        result
    }

    async fn execute(
        &self,
        request: &PredictionRequest<'_, Vec<u8>>,
    ) -> PipelineResult<PredictionOutcome> {
        let file = request.file;
        let part = Part::bytes(file.blob().clone())
            .file_name(file.name().to_string())
            .mime_str(&file.meta().mime_type)
            .map_err(transport_error)?;

        let mut form = Form::new().part(FILE_FIELD, part);
        for (name, value) in &request.text_fields {
            form = form.text(*name, value.clone());
        }

        let response = self
            .http
            .post(self.config.url(request.endpoint()))
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;

        complete_prediction(request.kind, status, &body, &self.categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_types_follow_the_extension() {
        assert_eq!(mime_from_extension(Path::new("a/dog.JPG")), "image/jpeg");
        assert_eq!(mime_from_extension(Path::new("dog.jpeg")), "image/jpeg");
        assert_eq!(mime_from_extension(Path::new("dog.webp")), "image/webp");
        assert_eq!(mime_from_extension(Path::new("notes.txt")), "application/octet-stream");
        assert_eq!(mime_from_extension(Path::new("README")), "application/octet-stream");
    }

    fn scratch_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("lfme-client-{}-{}", std::process::id(), name))
    }

    #[test]
    fn oversized_images_are_rejected_from_metadata() {
        let path = scratch_path("huge.png");
        let file = File::create(&path).unwrap();
        file.set_len(MAX_UPLOAD_BYTES + 1).unwrap();
        drop(file);

        let result = load_image(&path);
        std::fs::remove_file(&path).unwrap();

        match result {
            Err(CliError::Pipeline(PipelineError::TooLarge { size, limit })) => {
                assert_eq!(size, MAX_UPLOAD_BYTES + 1);
                assert_eq!(limit, MAX_UPLOAD_BYTES);
            }
            other => panic!("expected TooLarge, got {:?}", other),
        }
    }

    #[test]
    fn non_images_are_rejected_before_reading() {
        let path = scratch_path("notes.txt");
        std::fs::write(&path, b"plain text").unwrap();

        let result = load_image(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(
            result,
            Err(CliError::Pipeline(PipelineError::InvalidType { .. }))
        ));
    }

    #[test]
    fn accepted_images_carry_their_bytes() {
        let path = scratch_path("dog.PNG");
        std::fs::write(&path, [0x89, 0x50, 0x4e, 0x47]).unwrap();

        let result = load_image(&path);
        std::fs::remove_file(&path).unwrap();

        let file = result.unwrap();
        assert_eq!(file.blob(), &vec![0x89, 0x50, 0x4e, 0x47]);
        assert_eq!(file.meta().mime_type, "image/png");
        assert_eq!(file.meta().size_bytes, 4);
    }

    #[test]
    fn missing_files_are_io_errors() {
        let result = load_image(Path::new("no/such/dog.png"));
        assert!(matches!(result, Err(CliError::Io { .. })));
    }
}
