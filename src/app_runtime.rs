use tauri::{Builder, Emitter, Manager, Runtime};

use crate::{
    append_desktop_log, locale_context::LocaleServices, DesktopLocaleState,
    LANGUAGE_CHANGED_EVENT,
};

/// Wires locale state, the bridge commands and the cross-window relay into a
/// Tauri builder. The host supplies its own context when it runs the app.
pub fn configure<R: Runtime>(builder: Builder<R>, services: LocaleServices) -> Builder<R> {
    let mut subscription = services.bus.subscribe();
    builder
        .manage(DesktopLocaleState::new(services))
        .invoke_handler(tauri::generate_handler![
            crate::desktop_bridge_commands::desktop_bridge_get_language,
            crate::desktop_bridge_commands::desktop_bridge_language_options,
            crate::desktop_bridge_commands::desktop_bridge_set_language,
            crate::desktop_bridge_commands::desktop_bridge_open_window,
            crate::desktop_bridge_commands::desktop_bridge_close_window,
            crate::desktop_bridge_commands::desktop_bridge_is_window_open,
            crate::desktop_bridge_commands::desktop_bridge_toggle_window,
        ])
        .setup(move |app| {
            let app_handle = app.handle().clone();
            let language = app_handle.state::<DesktopLocaleState>().language();
            append_desktop_log(&format!("desktop locale initialized: {language}"));

            tauri::async_runtime::spawn(async move {
                while let Some(event) = subscription.recv().await {
                    if let Err(error) = app_handle.emit(LANGUAGE_CHANGED_EVENT, event.payload) {
                        append_desktop_log(&format!(
                            "failed to relay {LANGUAGE_CHANGED_EVENT} from {}: {error}",
                            event.origin
                        ));
                    }
                }
            });
            Ok(())
        })
}
