use url::form_urlencoded;

pub const WINDOW_LABEL_MAIN: &str = "main";
pub const WINDOW_LABEL_SETTINGS: &str = "settings";
pub const WINDOW_LABEL_NEW_PROJECT: &str = "new_project";
pub const WINDOW_LABEL_EDIT_PROJECT: &str = "edit_project";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowSurface {
    Main,
    Settings,
    NewProject,
    EditProject,
}

/// Static geometry and content of a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSpec {
    pub label: &'static str,
    pub entry_page: &'static str,
    pub title_key: &'static str,
    pub size: (f64, f64),
    pub min_size: (f64, f64),
}

const MAIN_SPEC: WindowSpec = WindowSpec {
    label: WINDOW_LABEL_MAIN,
    entry_page: "index.html",
    title_key: "main.title",
    size: (800.0, 600.0),
    min_size: (400.0, 300.0),
};

const SETTINGS_SPEC: WindowSpec = WindowSpec {
    label: WINDOW_LABEL_SETTINGS,
    entry_page: "settings.html",
    title_key: "settings.title",
    size: (800.0, 600.0),
    min_size: (600.0, 450.0),
};

const NEW_PROJECT_SPEC: WindowSpec = WindowSpec {
    label: WINDOW_LABEL_NEW_PROJECT,
    entry_page: "new-project.html",
    title_key: "newProject.title",
    size: (600.0, 500.0),
    min_size: (500.0, 400.0),
};

const EDIT_PROJECT_SPEC: WindowSpec = WindowSpec {
    label: WINDOW_LABEL_EDIT_PROJECT,
    entry_page: "edit-project.html",
    title_key: "editProject.title",
    size: (600.0, 500.0),
    min_size: (500.0, 400.0),
};

impl WindowSurface {
    pub const ALL: [WindowSurface; 4] = [
        WindowSurface::Main,
        WindowSurface::Settings,
        WindowSurface::NewProject,
        WindowSurface::EditProject,
    ];

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            WINDOW_LABEL_MAIN => Some(WindowSurface::Main),
            WINDOW_LABEL_SETTINGS => Some(WindowSurface::Settings),
            WINDOW_LABEL_NEW_PROJECT => Some(WindowSurface::NewProject),
            WINDOW_LABEL_EDIT_PROJECT => Some(WindowSurface::EditProject),
            _ => None,
        }
    }

    pub const fn spec(self) -> &'static WindowSpec {
        match self {
            WindowSurface::Main => &MAIN_SPEC,
            WindowSurface::Settings => &SETTINGS_SPEC,
            WindowSurface::NewProject => &NEW_PROJECT_SPEC,
            WindowSurface::EditProject => &EDIT_PROJECT_SPEC,
        }
    }

    pub const fn label(self) -> &'static str {
        self.spec().label
    }

    /// Page to load, relative to the frontend root. Only the edit-project
    /// surface carries the application id, as `?id=<urlencoded>`.
    pub fn entry_path(self, app_id: Option<&str>) -> String {
        let page = self.spec().entry_page;
        match (self, app_id) {
            (WindowSurface::EditProject, Some(app_id)) => {
                let encoded: String = form_urlencoded::byte_serialize(app_id.as_bytes()).collect();
                format!("{page}?id={encoded}")
            }
            _ => page.to_string(),
        }
    }
}
