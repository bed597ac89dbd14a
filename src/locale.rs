use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::DEFAULT_LOCALE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Locale {
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "en-US")]
    EnUs,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale '{0}'")]
pub struct UnsupportedLocale(pub String);

/// Entry shown by a language switcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageOption {
    pub code: Locale,
    pub name: &'static str,
    pub native_name: &'static str,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::ZhCn, Locale::EnUs];

    pub const fn tag(self) -> &'static str {
        match self {
            Locale::ZhCn => "zh-CN",
            Locale::EnUs => "en-US",
        }
    }

    /// Exact membership check against the supported tags.
    pub fn from_tag(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|locale| locale.tag() == raw)
    }

    /// Maps an environment language tag such as `zh_TW.UTF-8` or `en-GB` onto a
    /// supported locale by its language family.
    pub fn from_language_prefix(raw: &str) -> Option<Self> {
        let lowered = raw.trim().to_ascii_lowercase();
        if lowered.starts_with("zh") {
            return Some(Locale::ZhCn);
        }
        if lowered.starts_with("en") {
            return Some(Locale::EnUs);
        }
        None
    }

    pub const fn english_name(self) -> &'static str {
        match self {
            Locale::ZhCn => "Chinese (Simplified)",
            Locale::EnUs => "English",
        }
    }

    pub const fn native_name(self) -> &'static str {
        match self {
            Locale::ZhCn => "中文",
            Locale::EnUs => "English",
        }
    }

    pub fn options() -> Vec<LanguageOption> {
        Self::ALL
            .into_iter()
            .map(|code| LanguageOption {
                code,
                name: code.english_name(),
                native_name: code.native_name(),
            })
            .collect()
    }
}

impl Default for Locale {
    fn default() -> Self {
        DEFAULT_LOCALE
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Locale {
    type Err = UnsupportedLocale;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::from_tag(raw).ok_or_else(|| UnsupportedLocale(raw.to_string()))
    }
}
