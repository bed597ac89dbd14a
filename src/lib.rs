//! Desktop shell of the Lora launcher: locale resolution and switching, the
//! bilingual message tables, the four window surfaces and the version-sync tool.

mod app_constants;
mod app_types;
pub mod desktop_config;
pub mod locale;
pub mod locale_bus;
pub mod locale_context;
pub mod locale_resolver;
pub mod logging;
pub mod message_catalog;
pub mod preference_store;
pub mod version_sync;
pub mod window_runtime;
pub mod window_surface;

#[cfg(feature = "desktop")]
pub mod app_runtime;
#[cfg(feature = "desktop")]
mod desktop_bridge_commands;
#[cfg(feature = "desktop")]
pub mod window_actions;

pub use app_constants::*;
pub use app_types::{BridgeResult, DesktopLocaleState};
pub use locale::{LanguageOption, Locale, UnsupportedLocale};
pub use locale_bus::{LanguageChanged, LocaleBus, LocaleEvent};
pub use locale_context::{LocaleContext, LocaleServices};
pub use logging::append_desktop_log;
