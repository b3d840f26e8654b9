use crate::error::{PipelineError, PipelineResult};
use serde::{Deserialize, Serialize};

pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// MIME types accepted by [`validate_strict`].
pub const STRICT_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "image/png"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

impl FileMeta {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes,
        }
    }

    /// `image/png` -> `PNG`
    pub fn type_label(&self) -> String {
        self.mime_type
            .split_once('/')
            .map(|(_, subtype)| subtype)
            .unwrap_or(&self.mime_type)
            .to_uppercase()
    }
}

/// A file that passed intake. Only [`validate`] builds one.
#[derive(Debug, Clone)]
pub struct ValidatedFile<B> {
    blob: B,
    meta: FileMeta,
}

impl<B> ValidatedFile<B> {
    pub fn blob(&self) -> &B {
        &self.blob
    }

    pub fn meta(&self) -> &FileMeta {
        &self.meta
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    /// Attaches the contents of a file that was validated from its metadata alone.
    pub fn with_blob<C>(self, blob: C) -> ValidatedFile<C> {
        ValidatedFile {
            blob,
            meta: self.meta,
        }
    }
}

pub fn validate<B>(blob: B, meta: FileMeta) -> PipelineResult<ValidatedFile<B>> {
    if !meta.mime_type.starts_with("image/") {
        return Err(PipelineError::InvalidType {
            mime: meta.mime_type,
        });
    }

    if meta.size_bytes > MAX_UPLOAD_BYTES {
        return Err(PipelineError::TooLarge {
            size: meta.size_bytes,
            limit: MAX_UPLOAD_BYTES,
        });
    }

    Ok(ValidatedFile { blob, meta })
}

/// Validates the first offered file and ignores the rest.
pub fn validate_first<B, I>(files: I) -> PipelineResult<ValidatedFile<B>>
where
    I: IntoIterator<Item = (B, FileMeta)>,
{
    let (blob, meta) = files
        .into_iter()
        .next()
        .ok_or(PipelineError::NoSelection)?;
    validate(blob, meta)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub message: String,
}

/// Utility check against the exact JPEG/PNG list. Not used on the upload path,
/// which accepts any `image/*` type.
pub fn validate_strict(meta: &FileMeta) -> ValidationReport {
    if !STRICT_MIME_TYPES.contains(&meta.mime_type.as_str()) {
        return ValidationReport {
            valid: false,
            message: "Unsupported file format".into(),
        };
    }

    if meta.size_bytes > MAX_UPLOAD_BYTES {
        return ValidationReport {
            valid: false,
            message: "File size exceeds the limit".into(),
        };
    }

    ValidationReport {
        valid: true,
        message: "File validation passed".into(),
    }
}

pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut exponent = 0;
    while value >= 1024.0 && exponent < UNITS.len() - 1 {
        value /= 1024.0;
        exponent += 1;
    }
    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');

    format!("{} {}", trimmed, UNITS[exponent])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(mime: &str, size: u64) -> FileMeta {
        FileMeta::new("photo", mime, size)
    }

    #[test]
    fn contents_attached_later_keep_the_validated_metadata() {
        let checked = validate((), meta("image/jpeg", 3)).unwrap();
        let file = checked.with_blob(vec![0xff, 0xd8, 0xff]);
        assert_eq!(file.blob(), &vec![0xff, 0xd8, 0xff]);
        assert_eq!(file.meta().mime_type, "image/jpeg");
        assert_eq!(file.name(), "photo");
    }

    #[test]
    fn exactly_ten_mebibytes_is_accepted() {
        let file = validate((), meta("image/png", MAX_UPLOAD_BYTES)).unwrap();
        assert_eq!(file.meta().size_bytes, 10_485_760);
    }

    #[test]
    fn one_byte_over_the_limit_is_rejected() {
        let err = validate((), meta("image/png", MAX_UPLOAD_BYTES + 1)).unwrap_err();
        assert_eq!(
            err,
            PipelineError::TooLarge {
                size: MAX_UPLOAD_BYTES + 1,
                limit: MAX_UPLOAD_BYTES
            }
        );
    }

    #[test]
    fn type_is_checked_before_size() {
        let err = validate((), meta("application/pdf", MAX_UPLOAD_BYTES * 2)).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidType { .. }));
    }

    #[test]
    fn gif_passes_lenient_but_not_strict() {
        let gif = meta("image/gif", 2048);
        assert!(validate((), gif.clone()).is_ok());

        let report = validate_strict(&gif);
        assert!(!report.valid);
        assert_eq!(report.message, "Unsupported file format");
    }

    #[test]
    fn strict_validator_accepts_the_jpeg_alias_and_checks_size() {
        assert!(validate_strict(&meta("image/jpg", 10)).valid);
        assert!(validate_strict(&meta("image/jpeg", MAX_UPLOAD_BYTES)).valid);

        let report = validate_strict(&meta("image/png", MAX_UPLOAD_BYTES + 1));
        assert!(!report.valid);
        assert_eq!(report.message, "File size exceeds the limit");
    }

    #[test]
    fn only_the_first_file_is_considered() {
        let files = vec![
            ("first", meta("image/png", 1)),
            ("second", meta("text/plain", 1)),
        ];
        let file = validate_first(files).unwrap();
        assert_eq!(*file.blob(), "first");

        let rejected = vec![("first", meta("text/plain", 1)), ("second", meta("image/png", 1))];
        assert!(matches!(
            validate_first(rejected),
            Err(PipelineError::InvalidType { .. })
        ));
    }

    #[test]
    fn nothing_offered_is_no_selection() {
        let files: Vec<((), FileMeta)> = Vec::new();
        assert!(matches!(validate_first(files), Err(PipelineError::NoSelection)));
    }

    #[test]
    fn file_sizes_are_human_readable() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(MAX_UPLOAD_BYTES), "10 MB");
        assert_eq!(format_file_size(1_300_000), "1.24 MB");
    }

    #[test]
    fn type_label_is_the_upper_cased_subtype() {
        assert_eq!(meta("image/png", 1).type_label(), "PNG");
        assert_eq!(meta("jpeg", 1).type_label(), "JPEG");
    }
}
