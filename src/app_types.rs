use std::sync::Mutex;

use crate::{
    locale::{LanguageOption, Locale},
    locale_context::{LocaleContext, LocaleServices},
    window_surface::WindowSurface,
};

#[derive(Debug, PartialEq, Eq, serde::Serialize)]
pub struct BridgeResult {
    pub ok: bool,
    pub reason: Option<String>,
}

impl BridgeResult {
    pub fn ok() -> Self {
        Self {
            ok: true,
            reason: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            reason: Some(reason.into()),
        }
    }
}

pub fn surface_for_label(label: &str) -> Result<WindowSurface, BridgeResult> {
    WindowSurface::from_label(label)
        .ok_or_else(|| BridgeResult::failed(format!("Unknown window label '{label}'.")))
}

/// Host-side locale state shared by every webview of the desktop process.
pub struct DesktopLocaleState {
    services: LocaleServices,
    context: Mutex<LocaleContext>,
}

impl DesktopLocaleState {
    pub fn new(services: LocaleServices) -> Self {
        let context = services.context();
        Self {
            services,
            context: Mutex::new(context),
        }
    }

    pub fn services(&self) -> &LocaleServices {
        &self.services
    }

    pub fn language(&self) -> Locale {
        self.context
            .lock()
            .map(|context| context.locale())
            .unwrap_or_else(|poisoned| poisoned.into_inner().locale())
    }

    pub fn options(&self) -> Vec<LanguageOption> {
        Locale::options()
    }

    pub fn translate(&self, key: &str) -> String {
        match self.context.lock() {
            Ok(context) => context.t(key),
            Err(poisoned) => poisoned.into_inner().t(key),
        }
    }

    /// Target surface and localised title for a window-open request.
    pub fn window_request(&self, label: &str) -> Result<(WindowSurface, String), BridgeResult> {
        let surface = surface_for_label(label)?;
        Ok((surface, self.translate(surface.spec().title_key)))
    }

    /// Switch requested by the webview labelled `origin`. Unsupported tags are
    /// dropped without an error, like the in-window switch.
    pub fn set_language(&self, origin: &str, candidate: &str) -> BridgeResult {
        let Some(locale) = Locale::from_tag(candidate) else {
            tracing::debug!(origin, candidate, "ignoring unsupported language");
            return BridgeResult::ok();
        };

        let mut context = self
            .context
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        context.apply(locale, true);
        context.bus().publish(origin, locale);
        BridgeResult::ok()
    }
}
