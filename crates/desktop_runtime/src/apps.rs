//! Desktop icon catalog and window-content routing.

use std::sync::OnceLock;

use desktop_app_contract::AppModule;
use leptos::*;
use serde::Deserialize;

use crate::model::{
    OpenWindowRequest, SourceAppId, WindowContent, WindowControls, WindowSize,
    DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH,
};

include!(concat!(env!("OUT_DIR"), "/icon_catalog_generated.rs"));

/// Terminal windows open (and restore without a snapshot) at this size.
pub const TERMINAL_WINDOW_SIZE: WindowSize = WindowSize::new(700, 420);
pub const WELCOME_WINDOW_SIZE: WindowSize = WindowSize::new(520, 180);
pub const WELCOME_TITLE: &str = "La Résistance";
pub const SEARCH_URL_PREFIX: &str = "https://www.bing.com/search?q=";

const TERMINAL_MODULE: AppModule = AppModule::new(desktop_app_terminal::mount);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconKind {
    App,
    Terminal,
    RecycleBin,
}

/// One desktop grid icon.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DesktopIcon {
    pub source_id: String,
    pub label: String,
    pub glyph: String,
    pub kind: IconKind,
    /// 1-based grid column.
    pub column: u32,
    /// 1-based grid row.
    pub row: u32,
    width: Option<i32>,
    height: Option<i32>,
}

impl DesktopIcon {
    pub fn source(&self) -> SourceAppId {
        SourceAppId::trusted(self.source_id.clone())
    }

    pub fn window_size(&self) -> WindowSize {
        match (self.width, self.height, self.kind) {
            (Some(width), Some(height), _) => WindowSize::new(width, height),
            (_, _, IconKind::Terminal) => TERMINAL_WINDOW_SIZE,
            _ => WindowSize::new(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT),
        }
    }
}

/// Returns the build-time validated icon catalog ordered by grid position.
pub fn desktop_icons() -> &'static [DesktopIcon] {
    static CATALOG: OnceLock<Vec<DesktopIcon>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        serde_json::from_str(DESKTOP_ICON_CATALOG_JSON)
            .expect("generated desktop icon catalog should parse")
    })
}

/// Builds the open request for a double-clicked icon.
///
/// The Recycle Bin still produces a request; the reducer rejects it by source identity.
pub fn icon_open_request(icon: &DesktopIcon) -> OpenWindowRequest {
    let content = match icon.kind {
        IconKind::Terminal => WindowContent::Terminal,
        IconKind::App | IconKind::RecycleBin => WindowContent::Placeholder {
            app_name: icon.label.clone(),
        },
    };
    let mut req = OpenWindowRequest::from_source(icon.source(), icon.label.clone(), content)
        .with_size(icon.window_size());
    if icon.kind == IconKind::Terminal {
        req = req.with_fallback_size(TERMINAL_WINDOW_SIZE);
    }
    req
}

pub fn search_url(query: &str) -> String {
    format!("{SEARCH_URL_PREFIX}{}", urlencoding::encode(query))
}

/// Builds the open request for a taskbar search. Blank queries open nothing.
pub fn search_open_request(query: &str) -> Option<OpenWindowRequest> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    Some(
        OpenWindowRequest::new(
            format!("Bing: {query}"),
            WindowContent::EmbeddedFrame {
                url: search_url(query),
            },
        )
        .with_size(WindowSize::new(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT)),
    )
}

pub fn welcome_open_request() -> OpenWindowRequest {
    OpenWindowRequest::new(
        WELCOME_TITLE,
        WindowContent::Notice {
            heading: "Bienvenue".to_string(),
            body: "Nous sommes au bon endroit pour lutter contre les Big Tech.".to_string(),
        },
    )
    .with_size(WELCOME_WINDOW_SIZE)
    .with_fallback_size(WELCOME_WINDOW_SIZE)
    .with_controls(WindowControls::close_only())
}

/// Returns the hosted app module for content backed by an app crate.
pub fn app_module(content: &WindowContent) -> Option<AppModule> {
    match content {
        WindowContent::Terminal => Some(TERMINAL_MODULE),
        _ => None,
    }
}

/// Renders window content that needs no app session.
pub fn render_static_content(content: &WindowContent) -> View {
    match content {
        WindowContent::Placeholder { app_name } => view! {
            <div class="app app-placeholder">
                <p>"Fenêtre ouverte pour "<strong>{app_name.clone()}</strong>". Ceci est un paragraphe d'exemple."</p>
            </div>
        }
        .into_view(),
        WindowContent::EmbeddedFrame { url } => view! {
            <iframe class="search-iframe" src=url.clone() title="search results"></iframe>
        }
        .into_view(),
        WindowContent::Notice { heading, body } => view! {
            <div class="app app-notice">
                <div class="notice-heading">{heading.clone()}</div>
                <div>{body.clone()}</div>
            </div>
        }
        .into_view(),
        WindowContent::Terminal => ().into_view(),
    }
}
