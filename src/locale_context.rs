use std::sync::Arc;

use crate::{
    desktop_config::DesktopConfig,
    locale::{LanguageOption, Locale},
    locale_bus::LocaleBus,
    locale_resolver::{LocaleResolver, ReportedLanguage},
    message_catalog::{interpolate, CatalogError, Catalogs},
    preference_store::{JsonFileStore, PreferenceStore},
    LANGUAGE_STORAGE_KEY,
};

/// Collaborators shared by every window of the process.
#[derive(Clone)]
pub struct LocaleServices {
    pub store: Arc<dyn PreferenceStore>,
    pub catalogs: Arc<Catalogs>,
    pub bus: LocaleBus,
    pub reported: ReportedLanguage,
}

impl LocaleServices {
    pub fn new(
        store: Arc<dyn PreferenceStore>,
        catalogs: Arc<Catalogs>,
        reported: ReportedLanguage,
    ) -> Self {
        Self {
            store,
            catalogs,
            bus: LocaleBus::default(),
            reported,
        }
    }

    /// File-backed store under the data root, bundled tables, OS language.
    pub fn from_config(config: &DesktopConfig) -> Result<Self, CatalogError> {
        let store = JsonFileStore::new(config.state_file());
        Ok(Self::new(
            Arc::new(store),
            Catalogs::bundled()?,
            ReportedLanguage::detect(),
        ))
    }

    pub fn resolver(&self) -> LocaleResolver {
        LocaleResolver::standard(self.store.clone(), self.reported.clone())
    }

    /// A fresh per-window context starting at the resolved initial locale.
    pub fn context(&self) -> LocaleContext {
        LocaleContext {
            active: self.resolver().resolve(),
            store: self.store.clone(),
            catalogs: self.catalogs.clone(),
            bus: self.bus.clone(),
        }
    }
}

/// The active locale of one window plus what it needs to render and persist.
#[derive(Clone)]
pub struct LocaleContext {
    active: Locale,
    store: Arc<dyn PreferenceStore>,
    catalogs: Arc<Catalogs>,
    bus: LocaleBus,
}

impl LocaleContext {
    pub fn locale(&self) -> Locale {
        self.active
    }

    pub fn bus(&self) -> &LocaleBus {
        &self.bus
    }

    pub fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }

    pub fn options(&self) -> Vec<LanguageOption> {
        Locale::options()
    }

    /// Missing keys render as the key itself.
    pub fn t(&self, key: &str) -> String {
        match self.catalogs.translate(self.active, key) {
            Some(text) => text.to_string(),
            None => {
                tracing::warn!(locale = %self.active, key, "missing message key");
                key.to_string()
            }
        }
    }

    pub fn t_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        interpolate(&self.t(key), args)
    }

    /// Sets the active locale. A failed write is logged and the in-process
    /// switch stands.
    pub(crate) fn apply(&mut self, locale: Locale, persist: bool) {
        self.active = locale;
        if !persist {
            return;
        }
        if let Err(error) = self.store.write(LANGUAGE_STORAGE_KEY, locale.tag()) {
            tracing::warn!(%locale, %error, "failed to persist language preference");
        }
    }
}
