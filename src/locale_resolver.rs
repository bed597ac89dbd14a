use std::{env, sync::Arc};

use crate::{
    locale::Locale, preference_store::PreferenceStore, DEFAULT_LOCALE, LANGUAGE_STORAGE_KEY,
    LOCALE_OVERRIDE_ENV,
};

/// One step of the initial-locale chain.
pub trait LocaleSource: Send + Sync {
    fn name(&self) -> &'static str;

    fn resolve(&self) -> Option<Locale>;
}

/// The language the user picked last time, if it is still a supported tag.
pub struct PersistedPreference {
    store: Arc<dyn PreferenceStore>,
}

impl PersistedPreference {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store }
    }
}

impl LocaleSource for PersistedPreference {
    fn name(&self) -> &'static str {
        "persisted-preference"
    }

    fn resolve(&self) -> Option<Locale> {
        let saved = self.store.read(LANGUAGE_STORAGE_KEY)?;
        Locale::from_tag(&saved)
    }
}

/// The language reported by the environment, matched by language family.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportedLanguage {
    reported: Option<String>,
}

impl ReportedLanguage {
    pub fn new(reported: Option<String>) -> Self {
        Self { reported }
    }

    /// `LORA_LOCALE` wins over the operating system locale.
    pub fn detect() -> Self {
        Self::from_sources(env::var(LOCALE_OVERRIDE_ENV).ok(), sys_locale::get_locale)
    }

    /// A blank override counts as unset.
    fn from_sources<F>(override_tag: Option<String>, os_locale: F) -> Self
    where
        F: FnOnce() -> Option<String>,
    {
        let override_tag = override_tag
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        Self::new(override_tag.or_else(os_locale))
    }

    pub fn reported(&self) -> Option<&str> {
        self.reported.as_deref()
    }
}

impl LocaleSource for ReportedLanguage {
    fn name(&self) -> &'static str {
        "reported-language"
    }

    fn resolve(&self) -> Option<Locale> {
        Locale::from_language_prefix(self.reported.as_deref()?)
    }
}

/// Ordered list of sources terminated by a fixed default.
pub struct LocaleResolver {
    sources: Vec<Box<dyn LocaleSource>>,
    default: Locale,
}

impl LocaleResolver {
    pub fn new(default: Locale) -> Self {
        Self {
            sources: Vec::new(),
            default,
        }
    }

    /// Persisted preference, then reported language, then [`DEFAULT_LOCALE`].
    pub fn standard(store: Arc<dyn PreferenceStore>, reported: ReportedLanguage) -> Self {
        Self::new(DEFAULT_LOCALE)
            .with_source(PersistedPreference::new(store))
            .with_source(reported)
    }

    pub fn with_source(mut self, source: impl LocaleSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn resolve(&self) -> Locale {
        for source in &self.sources {
            if let Some(locale) = source.resolve() {
                tracing::debug!(source = source.name(), %locale, "resolved initial locale");
                return locale;
            }
        }

        tracing::debug!(locale = %self.default, "no locale source matched; using default");
        self.default
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::preference_store::MemoryStore;

    fn resolver(saved: Option<&str>, reported: Option<&str>) -> LocaleResolver {
        let store = match saved {
            Some(value) => MemoryStore::with_value(LANGUAGE_STORAGE_KEY, value),
            None => MemoryStore::new(),
        };
        LocaleResolver::standard(
            Arc::new(store),
            ReportedLanguage::new(reported.map(str::to_string)),
        )
    }

    #[test]
    fn persisted_preference_wins_over_reported_language() {
        for reported in [Some("zh-CN"), Some("fr-FR"), Some("en-GB"), None] {
            assert_eq!(resolver(Some("en-US"), reported).resolve(), Locale::EnUs);
        }
    }

    #[test]
    fn reported_chinese_prefix_resolves_to_zh_cn() {
        assert_eq!(resolver(None, Some("zh-TW")).resolve(), Locale::ZhCn);
        assert_eq!(resolver(None, Some("zh")).resolve(), Locale::ZhCn);
    }

    #[test]
    fn reported_english_prefix_resolves_to_en_us() {
        assert_eq!(resolver(None, Some("en-US")).resolve(), Locale::EnUs);
        assert_eq!(resolver(None, Some("en_AU.UTF-8")).resolve(), Locale::EnUs);
    }

    #[test]
    fn unrecognized_language_falls_back_to_default() {
        assert_eq!(resolver(None, Some("fr-FR")).resolve(), Locale::ZhCn);
        assert_eq!(resolver(None, None).resolve(), Locale::ZhCn);
    }

    #[test]
    fn invalid_persisted_value_falls_through_to_reported_language() {
        assert_eq!(resolver(Some("english"), Some("en-US")).resolve(), Locale::EnUs);
        assert_eq!(resolver(Some(""), Some("fr-FR")).resolve(), Locale::ZhCn);
    }

    #[test]
    fn locale_override_wins_over_os_locale() {
        let reported = ReportedLanguage::from_sources(Some("  en-GB ".to_string()), || {
            Some("zh-CN".to_string())
        });
        assert_eq!(reported.reported(), Some("en-GB"));
        assert_eq!(reported.resolve(), Some(Locale::EnUs));
    }

    #[test]
    fn blank_locale_override_falls_through_to_os_locale() {
        let reported =
            ReportedLanguage::from_sources(Some("   ".to_string()), || Some("zh-TW".to_string()));
        assert_eq!(reported.reported(), Some("zh-TW"));

        let reported = ReportedLanguage::from_sources(Some(String::new()), || None);
        assert_eq!(reported.reported(), None);
    }

    #[test]
    fn detect_reads_locale_override_from_env() {
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _env = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let previous = env::var(LOCALE_OVERRIDE_ENV).ok();

        env::set_var(LOCALE_OVERRIDE_ENV, " en-AU ");
        let detected = ReportedLanguage::detect();
        match previous {
            Some(value) => env::set_var(LOCALE_OVERRIDE_ENV, value),
            None => env::remove_var(LOCALE_OVERRIDE_ENV),
        }

        assert_eq!(detected.reported(), Some("en-AU"));
    }

    #[test]
    fn empty_resolver_returns_its_default() {
        assert_eq!(LocaleResolver::new(Locale::EnUs).resolve(), Locale::EnUs);
    }
}
