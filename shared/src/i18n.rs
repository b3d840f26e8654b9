use crate::category::Category;
use crate::error::{PipelineError, PipelineResult};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::HashMap;
use strum_macros::{EnumIter, EnumString};

const EMBEDDED_TRANSLATIONS: &str = include_str!("../../config/translations.yaml");

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

/// Key lookup used by everything that renders text.
pub trait TranslationProvider {
    fn translate(&self, key: &str) -> String;
    fn has_key(&self, key: &str) -> bool;

    fn category_label(&self, category: &Category) -> String {
        let key = category.translation_key();
        if self.has_key(&key) {
            self.translate(&key)
        } else {
            category.display_label.clone()
        }
    }

    fn domain_label(&self, domain: &str) -> String {
        let key = format!("domains.{}", domain);
        if self.has_key(&key) {
            self.translate(&key)
        } else {
            domain.to_string()
        }
    }
}

type Table = HashMap<String, String>;

/// Locale tables with English as the fallback locale.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    tables: HashMap<Locale, Table>,
    locale: Locale,
}

impl Translator {
    pub fn from_yaml(source: &str) -> PipelineResult<Self> {
        let root: HashMap<Locale, Value> = serde_yaml::from_str(source)
            .map_err(|e| PipelineError::Config(format!("invalid translations: {}", e)))?;

        let tables = root
            .into_iter()
            .map(|(locale, value)| {
                let mut table = Table::new();
                flatten_into(&mut table, String::new(), &value);
                (locale, table)
            })
            .collect();

        Ok(Self {
            tables,
            locale: Locale::default(),
        })
    }

    /// Tables shipped with the crate.
    pub fn embedded() -> PipelineResult<Self> {
        Self::from_yaml(EMBEDDED_TRANSLATIONS)
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    fn lookup(&self, locale: Locale, key: &str) -> Option<&String> {
        self.tables.get(&locale).and_then(|table| table.get(key))
    }
}

impl TranslationProvider for Translator {
    fn translate(&self, key: &str) -> String {
        self.lookup(self.locale, key)
            .or_else(|| self.lookup(Locale::En, key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    fn has_key(&self, key: &str) -> bool {
        self.lookup(self.locale, key).is_some() || self.lookup(Locale::En, key).is_some()
    }
}

fn flatten_into(table: &mut Table, prefix: String, value: &Value) {
    match value {
        Value::Mapping(map) => {
            for (key, child) in map {
                let Some(segment) = scalar_to_string(key) else {
                    continue;
                };
                let path = if prefix.is_empty() {
                    segment
                } else {
                    format!("{}.{}", prefix, segment)
                };
                flatten_into(table, path, child);
            }
        }
        other => {
            if let Some(text) = scalar_to_string(other) {
                table.insert(prefix, text);
            }
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::CategoryTable;

    const SAMPLE: &str = r#"
en:
  uploadButton: "Start Analysis"
  onlyEnglish: "fallback"
  categories:
    0: "dog"
zh:
  uploadButton: "开始分析"
  categories:
    0: "dog（狗）"
"#;

    #[test]
    fn nested_keys_are_dotted() {
        let translator = Translator::from_yaml(SAMPLE).unwrap();
        assert_eq!(translator.translate("categories.0"), "dog");
        assert!(translator.has_key("uploadButton"));
        assert!(!translator.has_key("categories"));
    }

    #[test]
    fn lookup_falls_back_to_english_then_to_the_key() {
        let translator = Translator::from_yaml(SAMPLE).unwrap().with_locale(Locale::Zh);
        assert_eq!(translator.translate("uploadButton"), "开始分析");
        assert_eq!(translator.translate("onlyEnglish"), "fallback");
        assert_eq!(translator.translate("missing.key"), "missing.key");
        assert!(!translator.has_key("missing.key"));
    }

    #[test]
    fn an_empty_translator_returns_raw_keys() {
        let translator = Translator::default();
        assert_eq!(translator.translate("toastMessages.loaded"), "toastMessages.loaded");
    }

    #[test]
    fn category_labels_follow_the_locale() {
        let table = CategoryTable::pacs();
        let mut translator = Translator::embedded().unwrap();
        let horse = table.get(4).unwrap();

        assert_eq!(translator.category_label(horse), "🐎 horse");
        translator.set_locale(Locale::Zh);
        assert_eq!(translator.category_label(horse), "🐎 horse（马）");
        assert_eq!(translator.category_label(&Category::placeholder(12)), "Class 12");
    }

    #[test]
    fn embedded_tables_cover_every_error_notice_and_domain() {
        use crate::category::PACS_DOMAINS;
        use crate::error::PipelineError;
        use strum::IntoEnumIterator;

        let errors = [
            PipelineError::InvalidType { mime: String::new() },
            PipelineError::TooLarge { size: 0, limit: 0 },
            PipelineError::HttpError { status: None, message: String::new() },
            PipelineError::MalformedResponse(String::new()),
            PipelineError::NoSelection,
            PipelineError::NoModelSelected,
            PipelineError::Busy,
            PipelineError::Config(String::new()),
        ];

        for locale in Locale::iter() {
            let translator = Translator::embedded().unwrap().with_locale(locale);
            for error in &errors {
                assert!(translator.has_key(error.toast_key()), "{} missing", error.toast_key());
            }
            for domain in PACS_DOMAINS {
                assert!(translator.domain_label(domain).starts_with(domain));
            }
        }
    }

    #[test]
    fn locales_parse_from_lowercase_codes() {
        use std::str::FromStr;
        assert_eq!(Locale::from_str("zh").unwrap(), Locale::Zh);
        assert_eq!(Locale::En.to_string(), "en");
    }
}
