//! Per-window composition root: one UI root, one locale context, one document.

use std::collections::BTreeSet;

use crate::{
    locale::Locale,
    locale_bus::LocaleSubscription,
    locale_context::{LocaleContext, LocaleServices},
    window_surface::WindowSurface,
    MOUNT_POINT,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BootstrapError {
    #[error("mount point {mount_point} not found in {surface:?} window")]
    MountPointMissing {
        surface: WindowSurface,
        mount_point: String,
    },
}

/// The parts of a window document the shell touches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    lang: Option<String>,
    mount_points: BTreeSet<String>,
    mounted_at: Option<String>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// A document with the standard `#app` container.
    pub fn with_app_container() -> Self {
        Self::new().with_mount_point(MOUNT_POINT)
    }

    pub fn with_mount_point(mut self, selector: &str) -> Self {
        self.mount_points.insert(selector.to_string());
        self
    }

    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    pub fn set_lang(&mut self, lang: &str) {
        self.lang = Some(lang.to_string());
    }

    pub fn mounted_at(&self) -> Option<&str> {
        self.mounted_at.as_deref()
    }

    fn mount(&mut self, selector: &str) -> bool {
        if !self.mount_points.contains(selector) {
            return false;
        }
        self.mounted_at = Some(selector.to_string());
        true
    }
}

pub trait UiRoot {
    fn render(&self, i18n: &LocaleContext) -> String;
}

/// Root component of the four built-in surfaces: the localised window title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceRoot {
    surface: WindowSurface,
    app_id: Option<String>,
}

impl SurfaceRoot {
    pub fn new(surface: WindowSurface) -> Self {
        Self {
            surface,
            app_id: None,
        }
    }

    pub fn for_app(surface: WindowSurface, app_id: &str) -> Self {
        Self {
            surface,
            app_id: Some(app_id.to_string()),
        }
    }

    pub fn app_id(&self) -> Option<&str> {
        self.app_id.as_deref()
    }
}

impl UiRoot for SurfaceRoot {
    fn render(&self, i18n: &LocaleContext) -> String {
        i18n.t(self.surface.spec().title_key)
    }
}

pub struct WindowBootstrap<R: UiRoot> {
    surface: WindowSurface,
    root: R,
    locale: Option<LocaleContext>,
}

impl<R: UiRoot> WindowBootstrap<R> {
    pub fn new(surface: WindowSurface, root: R) -> Self {
        Self {
            surface,
            root,
            locale: None,
        }
    }

    pub fn with_locale(mut self, context: LocaleContext) -> Self {
        self.locale = Some(context);
        self
    }

    pub fn mount(self, mut document: Document) -> Result<WindowRuntime<R>, BootstrapError> {
        let subscription = self.locale.as_ref().map(|context| context.bus().subscribe());
        if let Some(context) = &self.locale {
            document.set_lang(context.locale().tag());
        }

        if !document.mount(MOUNT_POINT) {
            return Err(BootstrapError::MountPointMissing {
                surface: self.surface,
                mount_point: MOUNT_POINT.to_string(),
            });
        }

        tracing::debug!(
            window = self.surface.label(),
            localized = self.locale.is_some(),
            "mounted window root"
        );
        Ok(WindowRuntime {
            surface: self.surface,
            root: self.root,
            document,
            locale: self.locale,
            subscription,
        })
    }
}

pub struct WindowRuntime<R: UiRoot = SurfaceRoot> {
    surface: WindowSurface,
    root: R,
    document: Document,
    locale: Option<LocaleContext>,
    subscription: Option<LocaleSubscription>,
}

impl<R: UiRoot> WindowRuntime<R> {
    pub fn surface(&self) -> WindowSurface {
        self.surface
    }

    pub fn root(&self) -> &R {
        &self.root
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn locale(&self) -> Option<Locale> {
        self.locale.as_ref().map(LocaleContext::locale)
    }

    pub fn i18n(&self) -> Option<&LocaleContext> {
        self.locale.as_ref()
    }

    pub fn render(&self) -> Option<String> {
        self.locale.as_ref().map(|context| self.root.render(context))
    }

    /// Switches this window and tells the others. Unsupported tags, or a
    /// window without a locale context, leave everything untouched.
    pub fn set_language(&mut self, candidate: &str) -> bool {
        let Some(locale) = Locale::from_tag(candidate) else {
            tracing::debug!(candidate, "ignoring unsupported language");
            return false;
        };
        let Some(context) = self.locale.as_mut() else {
            return false;
        };

        context.apply(locale, true);
        self.document.set_lang(locale.tag());
        context.bus().publish(self.surface.label(), locale);
        tracing::info!(window = self.surface.label(), %locale, "language switched");
        true
    }

    /// Applies the latest language published by another window. Not persisted
    /// again and not re-broadcast.
    pub fn sync_language(&mut self) -> Option<Locale> {
        let event = self
            .subscription
            .as_mut()?
            .drain_latest(self.surface.label())?;
        let locale = event.payload.language;
        let context = self.locale.as_mut()?;
        if context.locale() != locale {
            context.apply(locale, false);
        }
        self.document.set_lang(locale.tag());
        tracing::debug!(
            window = self.surface.label(),
            origin = %event.origin,
            %locale,
            "language synced from another window"
        );
        Some(locale)
    }
}

fn bootstrap_surface(
    root: SurfaceRoot,
    surface: WindowSurface,
    services: &LocaleServices,
    document: Document,
) -> Result<WindowRuntime, BootstrapError> {
    WindowBootstrap::new(surface, root)
        .with_locale(services.context())
        .mount(document)
}

pub fn bootstrap_main_window(
    services: &LocaleServices,
    document: Document,
) -> Result<WindowRuntime, BootstrapError> {
    let surface = WindowSurface::Main;
    bootstrap_surface(SurfaceRoot::new(surface), surface, services, document)
}

pub fn bootstrap_settings_window(
    services: &LocaleServices,
    document: Document,
) -> Result<WindowRuntime, BootstrapError> {
    let surface = WindowSurface::Settings;
    bootstrap_surface(SurfaceRoot::new(surface), surface, services, document)
}

pub fn bootstrap_new_project_window(
    services: &LocaleServices,
    document: Document,
) -> Result<WindowRuntime, BootstrapError> {
    let surface = WindowSurface::NewProject;
    bootstrap_surface(SurfaceRoot::new(surface), surface, services, document)
}

pub fn bootstrap_edit_project_window(
    services: &LocaleServices,
    document: Document,
    app_id: &str,
) -> Result<WindowRuntime, BootstrapError> {
    let surface = WindowSurface::EditProject;
    bootstrap_surface(SurfaceRoot::for_app(surface, app_id), surface, services, document)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        desktop_config::DesktopConfig,
        locale_resolver::ReportedLanguage,
        message_catalog::Catalogs,
        preference_store::{MemoryStore, PreferenceStore},
        LANGUAGE_STORAGE_KEY,
    };

    fn services_with(store: Arc<MemoryStore>, reported: Option<&str>) -> LocaleServices {
        LocaleServices::new(
            store,
            Catalogs::bundled().expect("bundled catalogs"),
            ReportedLanguage::new(reported.map(str::to_string)),
        )
    }

    #[test]
    fn file_backed_switch_survives_a_restart() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config = DesktopConfig::new(dir.path());

        let services = LocaleServices::from_config(&config).expect("file-backed services");
        let mut settings = bootstrap_settings_window(&services, Document::with_app_container())
            .expect("settings mounts");
        let target = match settings.locale() {
            Some(Locale::ZhCn) => Locale::EnUs,
            _ => Locale::ZhCn,
        };
        assert!(settings.set_language(target.tag()));

        let state: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(config.state_file()).expect("read state file"),
        )
        .expect("parse state file");
        assert_eq!(state[LANGUAGE_STORAGE_KEY], target.tag());

        let restarted = LocaleServices::from_config(&config).expect("file-backed services");
        let main = bootstrap_main_window(&restarted, Document::with_app_container())
            .expect("main mounts");
        assert_eq!(main.locale(), Some(target));
        assert_eq!(main.document().lang(), Some(target.tag()));
    }

    #[test]
    fn every_entry_point_mounts_at_app_container() {
        let services = services_with(Arc::new(MemoryStore::new()), Some("en-US"));
        let windows = [
            bootstrap_main_window(&services, Document::with_app_container()),
            bootstrap_settings_window(&services, Document::with_app_container()),
            bootstrap_new_project_window(&services, Document::with_app_container()),
            bootstrap_edit_project_window(&services, Document::with_app_container(), "app-1"),
        ];
        let titles: Vec<String> = windows
            .into_iter()
            .map(|window| {
                let window = window.expect("window mounts");
                assert_eq!(window.document().mounted_at(), Some("#app"));
                assert_eq!(window.document().lang(), Some("en-US"));
                window.render().expect("localized root renders")
            })
            .collect();
        assert_eq!(titles, ["Lora", "Settings", "New Project", "Edit Project"]);
    }

    #[test]
    fn edit_project_root_keeps_app_id() {
        let services = services_with(Arc::new(MemoryStore::new()), None);
        let window =
            bootstrap_edit_project_window(&services, Document::with_app_container(), "app-7")
                .expect("window mounts");
        assert_eq!(window.root().app_id(), Some("app-7"));
        assert_eq!(window.surface(), WindowSurface::EditProject);
    }

    #[test]
    fn missing_mount_point_fails_bootstrap() {
        let services = services_with(Arc::new(MemoryStore::new()), None);
        let error = bootstrap_settings_window(&services, Document::new().with_mount_point("#root"))
            .err()
            .expect("bootstrap fails");
        assert_eq!(
            error,
            BootstrapError::MountPointMissing {
                surface: WindowSurface::Settings,
                mount_point: "#app".to_string(),
            }
        );
    }

    #[test]
    fn window_without_locale_ignores_switch() {
        let root = SurfaceRoot::new(WindowSurface::Main);
        let mut window = WindowBootstrap::new(WindowSurface::Main, root)
            .mount(Document::with_app_container())
            .expect("window mounts");
        assert_eq!(window.document().lang(), None);
        assert!(!window.set_language("en-US"));
        assert_eq!(window.locale(), None);
        assert_eq!(window.render(), None);
        assert_eq!(window.sync_language(), None);
    }

    #[test]
    fn unsupported_language_leaves_state_untouched() {
        let store = Arc::new(MemoryStore::with_value(LANGUAGE_STORAGE_KEY, "zh-CN"));
        let services = services_with(store.clone(), None);
        let mut watcher = services.bus.subscribe();
        let mut window =
            bootstrap_main_window(&services, Document::with_app_container()).expect("mount");

        for candidate in ["fr-FR", "en-us", "EN-US", "", "zh", "en_US", " en-US"] {
            assert!(!window.set_language(candidate));
            assert_eq!(window.locale(), Some(Locale::ZhCn));
            assert_eq!(store.read(LANGUAGE_STORAGE_KEY).as_deref(), Some("zh-CN"));
            assert_eq!(window.document().lang(), Some("zh-CN"));
        }
        assert_eq!(watcher.drain_latest(""), None);
    }

    #[test]
    fn valid_language_updates_state_storage_and_document() {
        for (candidate, expected) in [("en-US", Locale::EnUs), ("zh-CN", Locale::ZhCn)] {
            let store = Arc::new(MemoryStore::new());
            let services = services_with(store.clone(), Some("fr-FR"));
            let mut window =
                bootstrap_settings_window(&services, Document::with_app_container())
                    .expect("mount");

            assert!(window.set_language(candidate));
            assert_eq!(window.locale(), Some(expected));
            assert_eq!(store.read(LANGUAGE_STORAGE_KEY).as_deref(), Some(candidate));
            assert_eq!(window.document().lang(), Some(candidate));
        }
    }

    #[test]
    fn switch_end_to_end_broadcasts_language_changed() {
        let store = Arc::new(MemoryStore::new());
        let services = services_with(store.clone(), Some("en-US"));
        let mut listener = services.bus.subscribe();
        let mut main = bootstrap_main_window(&services, Document::with_app_container())
            .expect("mount");
        assert_eq!(main.locale(), Some(Locale::EnUs));

        assert!(main.set_language("zh-CN"));
        assert_eq!(main.locale(), Some(Locale::ZhCn));
        assert_eq!(store.read(LANGUAGE_STORAGE_KEY).as_deref(), Some("zh-CN"));
        assert_eq!(main.document().lang(), Some("zh-CN"));
        assert_eq!(main.render().as_deref(), Some("Lora"));

        let event = listener.drain_latest("").expect("broadcast fired");
        assert_eq!(event.origin, "main");
        assert_eq!(
            serde_json::to_value(event.payload).expect("serialize payload"),
            serde_json::json!({ "language": "zh-CN" })
        );
    }

    #[test]
    fn sibling_window_resyncs_from_broadcast() {
        let store = Arc::new(MemoryStore::new());
        let services = services_with(store.clone(), Some("zh-CN"));
        let mut main = bootstrap_main_window(&services, Document::with_app_container())
            .expect("mount main");
        let mut settings = bootstrap_settings_window(&services, Document::with_app_container())
            .expect("mount settings");

        assert!(settings.set_language("en-US"));
        assert_eq!(settings.sync_language(), None);

        assert_eq!(main.locale(), Some(Locale::ZhCn));
        assert_eq!(main.sync_language(), Some(Locale::EnUs));
        assert_eq!(main.locale(), Some(Locale::EnUs));
        assert_eq!(main.document().lang(), Some("en-US"));
        assert_eq!(main.sync_language(), None);
    }

    #[test]
    fn rapid_switches_resolve_last_write_wins() {
        let services = services_with(Arc::new(MemoryStore::new()), None);
        let mut main = bootstrap_main_window(&services, Document::with_app_container())
            .expect("mount main");
        let mut settings = bootstrap_settings_window(&services, Document::with_app_container())
            .expect("mount settings");
        let mut new_project =
            bootstrap_new_project_window(&services, Document::with_app_container())
                .expect("mount new project");

        assert!(settings.set_language("en-US"));
        assert!(new_project.set_language("zh-CN"));
        assert!(settings.set_language("en-US"));

        assert_eq!(main.sync_language(), Some(Locale::EnUs));
        assert_eq!(new_project.sync_language(), Some(Locale::EnUs));
        assert_eq!(settings.sync_language(), None);
        assert_eq!(settings.locale(), Some(Locale::EnUs));
    }
}
