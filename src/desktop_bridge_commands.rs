use tauri::{AppHandle, Manager, Runtime, State, WebviewWindow};

use crate::{
    app_types::surface_for_label, append_desktop_log, window_actions, BridgeResult,
    DesktopLocaleState, LanguageOption,
};

#[tauri::command]
pub(crate) fn desktop_bridge_get_language(state: State<'_, DesktopLocaleState>) -> String {
    state.language().tag().to_string()
}

#[tauri::command]
pub(crate) fn desktop_bridge_language_options(
    state: State<'_, DesktopLocaleState>,
) -> Vec<LanguageOption> {
    state.options()
}

#[tauri::command]
pub(crate) fn desktop_bridge_set_language<R: Runtime>(
    window: WebviewWindow<R>,
    state: State<'_, DesktopLocaleState>,
    language: String,
) -> BridgeResult {
    state.set_language(window.label(), &language)
}

// Builds webviews, so it must not run on the main thread (WebView2 deadlocks).
#[tauri::command]
pub(crate) async fn desktop_bridge_open_window<R: Runtime>(
    app_handle: AppHandle<R>,
    label: String,
    app_id: Option<String>,
) -> BridgeResult {
    let request = app_handle.state::<DesktopLocaleState>().window_request(&label);
    let (surface, title) = match request {
        Ok(request) => request,
        Err(result) => return result,
    };

    match window_actions::open_surface_window(
        &app_handle,
        surface,
        app_id.as_deref(),
        &title,
        append_desktop_log,
    ) {
        Ok(()) => BridgeResult::ok(),
        Err(error) => {
            append_desktop_log(&format!("failed to open {label} window: {error}"));
            BridgeResult::failed(error)
        }
    }
}

#[tauri::command]
pub(crate) fn desktop_bridge_close_window<R: Runtime>(
    app_handle: AppHandle<R>,
    label: String,
) -> BridgeResult {
    match surface_for_label(&label) {
        Ok(surface) => {
            window_actions::close_surface_window(&app_handle, surface, append_desktop_log);
            BridgeResult::ok()
        }
        Err(result) => result,
    }
}

#[tauri::command]
pub(crate) fn desktop_bridge_is_window_open<R: Runtime>(
    app_handle: AppHandle<R>,
    label: String,
) -> bool {
    surface_for_label(&label)
        .map(|surface| window_actions::is_surface_window_open(&app_handle, surface))
        .unwrap_or(false)
}

#[tauri::command]
pub(crate) fn desktop_bridge_toggle_window<R: Runtime>(
    app_handle: AppHandle<R>,
    label: String,
) -> BridgeResult {
    let surface = match surface_for_label(&label) {
        Ok(surface) => surface,
        Err(result) => return result,
    };

    match window_actions::toggle_surface_window(&app_handle, surface, append_desktop_log) {
        Ok(()) => BridgeResult::ok(),
        Err(error) => {
            append_desktop_log(&format!("failed to toggle {label} window: {error}"));
            BridgeResult::failed(error)
        }
    }
}
