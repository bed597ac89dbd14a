use tauri::{AppHandle, Manager, Runtime, WebviewUrl, WebviewWindowBuilder};

use crate::window_surface::WindowSurface;

/// Shows and focuses the surface's window, creating it on first use.
pub fn open_surface_window<R, F>(
    app_handle: &AppHandle<R>,
    surface: WindowSurface,
    app_id: Option<&str>,
    title: &str,
    log: F,
) -> Result<(), String>
where
    R: Runtime,
    F: Fn(&str),
{
    let spec = surface.spec();
    if let Some(window) = app_handle.get_webview_window(spec.label) {
        if let Err(error) = window.set_title(title) {
            log(&format!("failed to update {} window title: {error}", spec.label));
        }
        window
            .show()
            .map_err(|error| format!("Failed to show {} window: {error}", spec.label))?;
        window
            .set_focus()
            .map_err(|error| format!("Failed to focus {} window: {error}", spec.label))?;
        return Ok(());
    }

    let entry_path = surface.entry_path(app_id);
    let (width, height) = spec.size;
    let (min_width, min_height) = spec.min_size;
    WebviewWindowBuilder::new(app_handle, spec.label, WebviewUrl::App(entry_path.into()))
        .title(title)
        .inner_size(width, height)
        .min_inner_size(min_width, min_height)
        .center()
        .resizable(true)
        .decorations(true)
        .always_on_top(false)
        .build()
        .map_err(|error| format!("Failed to create {} window: {error}", spec.label))?;

    log(&format!("opened {} window", spec.label));
    Ok(())
}

pub fn close_surface_window<R, F>(app_handle: &AppHandle<R>, surface: WindowSurface, log: F)
where
    R: Runtime,
    F: Fn(&str),
{
    let label = surface.label();
    let Some(window) = app_handle.get_webview_window(label) else {
        log(&format!("close_surface_window skipped: {label} window not found"));
        return;
    };

    if let Err(error) = window.close() {
        log(&format!("failed to close {label} window: {error}"));
    }
}

pub fn is_surface_window_open<R: Runtime>(
    app_handle: &AppHandle<R>,
    surface: WindowSurface,
) -> bool {
    app_handle.get_webview_window(surface.label()).is_some()
}

/// Hides a visible window and shows a hidden one. Missing windows are left alone.
pub fn toggle_surface_window<R, F>(
    app_handle: &AppHandle<R>,
    surface: WindowSurface,
    log: F,
) -> Result<(), String>
where
    R: Runtime,
    F: Fn(&str),
{
    let label = surface.label();
    let Some(window) = app_handle.get_webview_window(label) else {
        log(&format!("toggle_surface_window skipped: {label} window not found"));
        return Ok(());
    };

    let visible = window
        .is_visible()
        .map_err(|error| format!("Failed to read {label} window visibility: {error}"))?;
    if visible {
        window
            .hide()
            .map_err(|error| format!("Failed to hide {label} window: {error}"))?;
    } else {
        window
            .show()
            .map_err(|error| format!("Failed to show {label} window: {error}"))?;
        window
            .set_focus()
            .map_err(|error| format!("Failed to focus {label} window: {error}"))?;
    }
    Ok(())
}
