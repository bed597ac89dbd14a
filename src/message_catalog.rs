//! Bilingual message tables keyed by dotted paths such as `main.search.results`.
//!
//! Templates carry `{name}` placeholders. Both tables must expose the same keys
//! with the same placeholder names; [`Catalogs::load_bundled`] refuses to load
//! tables that diverge.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    sync::{Arc, OnceLock},
};

use rust_embed::RustEmbed;
use serde_json::Value;

use crate::{locale::Locale, FALLBACK_LOCALE};

#[derive(RustEmbed)]
#[folder = "locales/"]
struct LocaleAssets;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("message table for {0} is not bundled")]
    Missing(Locale),
    #[error("message table for {locale} is not valid JSON: {reason}")]
    Parse { locale: Locale, reason: String },
    #[error("message table for {0} must be a JSON object")]
    NotAnObject(Locale),
    #[error("message {key} in {locale} must be a string")]
    NonStringLeaf { locale: Locale, key: String },
    #[error("message tables diverge: {}", format_issues(.0))]
    Parity(Vec<ParityIssue>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParityIssue {
    MissingKey {
        missing_in: Locale,
        key: String,
    },
    PlaceholderMismatch {
        key: String,
        zh_cn: BTreeSet<String>,
        en_us: BTreeSet<String>,
    },
}

impl fmt::Display for ParityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParityIssue::MissingKey { missing_in, key } => {
                write!(f, "{key} missing in {missing_in}")
            }
            ParityIssue::PlaceholderMismatch { key, zh_cn, en_us } => {
                write!(f, "{key} placeholders differ ({zh_cn:?} vs {en_us:?})")
            }
        }
    }
}

fn format_issues(issues: &[ParityIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// One locale's flattened table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    locale: Locale,
    messages: BTreeMap<String, String>,
}

impl Catalog {
    pub fn from_json(locale: Locale, raw: &str) -> Result<Self, CatalogError> {
        let parsed: Value = serde_json::from_str(raw).map_err(|error| CatalogError::Parse {
            locale,
            reason: error.to_string(),
        })?;
        let Value::Object(root) = parsed else {
            return Err(CatalogError::NotAnObject(locale));
        };

        let mut messages = BTreeMap::new();
        let mut pending: Vec<(String, Value)> = root.into_iter().collect();
        while let Some((key, value)) = pending.pop() {
            match value {
                Value::String(text) => {
                    messages.insert(key, text);
                }
                Value::Object(children) => {
                    pending.extend(
                        children
                            .into_iter()
                            .map(|(child, value)| (format!("{key}.{child}"), value)),
                    );
                }
                _ => return Err(CatalogError::NonStringLeaf { locale, key }),
            }
        }

        Ok(Self { locale, messages })
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.messages.keys().map(String::as_str)
    }
}

fn is_placeholder_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Byte ranges `(start, end)` of every well-formed `{name}` in `template`,
/// where `start..end` spans the braces.
fn placeholder_spans(template: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut open: Option<usize> = None;
    for (index, ch) in template.char_indices() {
        match ch {
            '{' => open = Some(index),
            '}' => {
                if let Some(start) = open.take() {
                    if index > start + 1 {
                        spans.push((start, index + 1));
                    }
                }
            }
            ch if is_placeholder_char(ch) => {}
            _ => open = None,
        }
    }
    spans
}

pub fn placeholders(template: &str) -> BTreeSet<String> {
    placeholder_spans(template)
        .into_iter()
        .map(|(start, end)| template[start + 1..end - 1].to_string())
        .collect()
}

/// Substitutes supplied placeholders in one pass. Unknown names are kept verbatim.
pub fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut cursor = 0;
    for (start, end) in placeholder_spans(template) {
        let name = &template[start + 1..end - 1];
        if let Some((_, value)) = args.iter().find(|(arg, _)| *arg == name) {
            rendered.push_str(&template[cursor..start]);
            rendered.push_str(value);
            cursor = end;
        }
    }
    rendered.push_str(&template[cursor..]);
    rendered
}

/// The zh-CN and en-US tables side by side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalogs {
    zh_cn: Catalog,
    en_us: Catalog,
}

impl Catalogs {
    /// Pairs two tables without checking parity.
    pub fn new(zh_cn: Catalog, en_us: Catalog) -> Self {
        Self { zh_cn, en_us }
    }

    /// Parses the embedded tables and rejects them if they diverge.
    pub fn load_bundled() -> Result<Self, CatalogError> {
        let catalogs = Self::new(
            bundled_catalog(Locale::ZhCn)?,
            bundled_catalog(Locale::EnUs)?,
        );
        let issues = catalogs.parity_issues();
        if !issues.is_empty() {
            return Err(CatalogError::Parity(issues));
        }
        Ok(catalogs)
    }

    /// Process-wide copy of the embedded tables, parsed on first use.
    pub fn bundled() -> Result<Arc<Self>, CatalogError> {
        static BUNDLED: OnceLock<Result<Arc<Catalogs>, CatalogError>> = OnceLock::new();
        BUNDLED
            .get_or_init(|| Self::load_bundled().map(Arc::new))
            .clone()
    }

    pub fn catalog(&self, locale: Locale) -> &Catalog {
        match locale {
            Locale::ZhCn => &self.zh_cn,
            Locale::EnUs => &self.en_us,
        }
    }

    /// Active table first, then the fallback locale.
    pub fn translate(&self, locale: Locale, key: &str) -> Option<&str> {
        self.catalog(locale)
            .get(key)
            .or_else(|| self.catalog(FALLBACK_LOCALE).get(key))
    }

    pub fn parity_issues(&self) -> Vec<ParityIssue> {
        let mut issues = Vec::new();
        for (key, zh_template) in &self.zh_cn.messages {
            match self.en_us.messages.get(key) {
                None => issues.push(ParityIssue::MissingKey {
                    missing_in: Locale::EnUs,
                    key: key.clone(),
                }),
                Some(en_template) => {
                    let zh_cn = placeholders(zh_template);
                    let en_us = placeholders(en_template);
                    if zh_cn != en_us {
                        issues.push(ParityIssue::PlaceholderMismatch {
                            key: key.clone(),
                            zh_cn,
                            en_us,
                        });
                    }
                }
            }
        }
        issues.extend(
            self.en_us
                .messages
                .keys()
                .filter(|key| !self.zh_cn.messages.contains_key(*key))
                .map(|key| ParityIssue::MissingKey {
                    missing_in: Locale::ZhCn,
                    key: key.clone(),
                }),
        );
        issues
    }
}

fn bundled_catalog(locale: Locale) -> Result<Catalog, CatalogError> {
    let file = LocaleAssets::get(&format!("{}.json", locale.tag()))
        .ok_or(CatalogError::Missing(locale))?;
    let raw = std::str::from_utf8(file.data.as_ref()).map_err(|error| CatalogError::Parse {
        locale,
        reason: error.to_string(),
    })?;
    Catalog::from_json(locale, raw)
}
