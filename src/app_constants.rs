use crate::locale::Locale;

pub const DEFAULT_LOCALE: Locale = Locale::ZhCn;
pub const FALLBACK_LOCALE: Locale = Locale::EnUs;

pub const LANGUAGE_STORAGE_KEY: &str = "language";
pub const LANGUAGE_CHANGED_EVENT: &str = "languageChanged";
pub const MOUNT_POINT: &str = "#app";

pub const ROOT_DIR_ENV: &str = "LORA_ROOT";
pub const LOCALE_OVERRIDE_ENV: &str = "LORA_LOCALE";
pub const LOG_FILTER_ENV: &str = "LORA_LOG";

pub const DEFAULT_ROOT_DIR_NAME: &str = ".lora";
pub const DESKTOP_STATE_FILE: &str = "desktop_state.json";

pub const LOCALE_BUS_CAPACITY: usize = 16;
