use std::collections::BTreeMap;

use desktop_app_contract::SurfaceSize;
use serde::{Deserialize, Serialize};

use crate::window_manager::ZOrderCounter;

/// Size used by generic app windows when the request does not override it.
pub const DEFAULT_WINDOW_WIDTH: i32 = 1000;
pub const DEFAULT_WINDOW_HEIGHT: i32 = 600;
/// Size a window restores to when it leaves the maximized state without a snapshot.
pub const FALLBACK_RESTORE_WIDTH: i32 = 300;
pub const FALLBACK_RESTORE_HEIGHT: i32 = 600;
/// Height of the window titlebar; the content surface is the window minus this strip.
pub const TITLEBAR_HEIGHT_PX: i32 = 40;
/// Source identity of the Recycle Bin icon, which never opens a window.
pub const RECYCLE_BIN_SOURCE_ID: &str = "desktop.recycle-bin";

/// Opaque window token, `win-<time base36>-<random base36>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(String);

impl WindowId {
    pub(crate) fn from_parts(timestamp: &str, suffix: &str) -> Self {
        Self(format!("win-{timestamp}-{suffix}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of the desktop icon that spawned a window.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceAppId(String);

impl SourceAppId {
    /// Wraps a source id. Catalog entries are validated by the build script.
    pub fn trusted(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn recycle_bin() -> Self {
        Self::trusted(RECYCLE_BIN_SOURCE_ID)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_recycle_bin(&self) -> bool {
        self.0 == RECYCLE_BIN_SOURCE_ID
    }
}

impl std::fmt::Display for SourceAppId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: i32,
    pub height: i32,
}

impl WindowSize {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WindowTransform {
    /// `left`/`top` are the window's top-left corner.
    #[default]
    None,
    /// `left`/`top` are the window's center point.
    CenterOnAnchor,
}

/// On-screen placement of a window. Only meaningful while the window is not maximized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
    pub transform: WindowTransform,
}

impl WindowGeometry {
    /// Geometry centered on the usable desktop area.
    pub fn centered(size: WindowSize, viewport: DesktopViewport) -> Self {
        Self {
            left: viewport.width / 2,
            top: viewport.available_height() / 2,
            width: size.width,
            height: size.height,
            transform: WindowTransform::CenterOnAnchor,
        }
    }

    /// Geometry covering the full desktop width and the height above the taskbar.
    pub fn fill(viewport: DesktopViewport) -> Self {
        Self {
            left: 0,
            top: 0,
            width: viewport.width,
            height: viewport.available_height(),
            transform: WindowTransform::None,
        }
    }

    /// Size of the content area below the titlebar.
    pub fn content_surface(&self) -> SurfaceSize {
        SurfaceSize::new(
            self.width.max(0),
            (self.height - TITLEBAR_HEIGHT_PX).max(0),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestoreState {
    Normal,
    Maximized,
}

/// Visibility state of a window. Minimized remembers what it returns to, so a window can never be
/// minimized and maximized at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowState {
    Normal,
    Maximized,
    Minimized { restore_to: RestoreState },
}

impl WindowState {
    pub fn is_minimized(self) -> bool {
        matches!(self, Self::Minimized { .. })
    }

    pub fn is_maximized(self) -> bool {
        matches!(self, Self::Maximized)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowControls {
    pub minimize: bool,
    pub maximize: bool,
    pub close: bool,
}

impl WindowControls {
    pub const fn close_only() -> Self {
        Self {
            minimize: false,
            maximize: false,
            close: true,
        }
    }
}

impl Default for WindowControls {
    fn default() -> Self {
        Self {
            minimize: true,
            maximize: true,
            close: true,
        }
    }
}

/// What the window body renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowContent {
    /// Sample paragraph naming the app.
    Placeholder { app_name: String },
    /// Hosted terminal session.
    Terminal,
    /// Embedded external page.
    EmbeddedFrame { url: String },
    /// Short message with a heading.
    Notice { heading: String, body: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: WindowId,
    pub title: String,
    pub source: Option<SourceAppId>,
    pub content: WindowContent,
    pub geometry: WindowGeometry,
    pub saved_geometry: Option<WindowGeometry>,
    pub state: WindowState,
    pub z_index: u64,
    pub controls: WindowControls,
    pub fallback_size: WindowSize,
}

impl WindowRecord {
    pub fn is_visible(&self) -> bool {
        !self.state.is_minimized()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskbarItem {
    pub id: WindowId,
    pub label: String,
}

/// Size of the desktop surface and the optional taskbar strip reserved at its bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopViewport {
    pub width: i32,
    pub height: i32,
    /// `None` when the page has no taskbar chrome.
    pub taskbar_height: Option<i32>,
}

impl DesktopViewport {
    pub fn available_height(&self) -> i32 {
        (self.height - self.taskbar_height.unwrap_or(0)).max(0)
    }

    pub fn has_taskbar(&self) -> bool {
        self.taskbar_height.is_some()
    }
}

impl Default for DesktopViewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
            taskbar_height: Some(48),
        }
    }
}

/// Desktop-level panels that sit above every window. At most one is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DesktopOverlay {
    StartPanel { z_index: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DesktopState {
    pub windows: Vec<WindowRecord>,
    pub taskbar: Vec<TaskbarItem>,
    pub z_order: ZOrderCounter,
    pub last_open_ms: BTreeMap<SourceAppId, u64>,
    pub viewport: DesktopViewport,
    pub overlay: Option<DesktopOverlay>,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self {
            windows: Vec::new(),
            taskbar: Vec::new(),
            z_order: ZOrderCounter::default(),
            last_open_ms: BTreeMap::new(),
            viewport: DesktopViewport::default(),
            overlay: None,
        }
    }
}

impl DesktopState {
    pub fn with_viewport(viewport: DesktopViewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    pub fn window(&self, window_id: &WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| &w.id == window_id)
    }

    pub fn window_mut(&mut self, window_id: &WindowId) -> Option<&mut WindowRecord> {
        self.windows.iter_mut().find(|w| &w.id == window_id)
    }

    /// The visible window with the highest z-index.
    pub fn focused_window_id(&self) -> Option<&WindowId> {
        self.windows
            .iter()
            .filter(|w| w.is_visible())
            .max_by_key(|w| w.z_index)
            .map(|w| &w.id)
    }

    pub fn taskbar_item(&self, window_id: &WindowId) -> Option<&TaskbarItem> {
        self.taskbar.iter().find(|item| &item.id == window_id)
    }

    pub fn start_panel_open(&self) -> bool {
        matches!(self.overlay, Some(DesktopOverlay::StartPanel { .. }))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenWindowRequest {
    pub source: Option<SourceAppId>,
    pub title: String,
    pub content: WindowContent,
    pub size: Option<WindowSize>,
    pub start_maximized: bool,
    pub controls: WindowControls,
    pub fallback_size: WindowSize,
}

impl OpenWindowRequest {
    pub fn new(title: impl Into<String>, content: WindowContent) -> Self {
        Self {
            source: None,
            title: title.into(),
            content,
            size: None,
            start_maximized: false,
            controls: WindowControls::default(),
            fallback_size: WindowSize::new(FALLBACK_RESTORE_WIDTH, FALLBACK_RESTORE_HEIGHT),
        }
    }

    pub fn from_source(
        source: SourceAppId,
        title: impl Into<String>,
        content: WindowContent,
    ) -> Self {
        Self {
            source: Some(source),
            ..Self::new(title, content)
        }
    }

    pub fn with_size(mut self, size: WindowSize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_fallback_size(mut self, size: WindowSize) -> Self {
        self.fallback_size = size;
        self
    }

    pub fn with_controls(mut self, controls: WindowControls) -> Self {
        self.controls = controls;
        self
    }

    pub fn maximized(mut self) -> Self {
        self.start_maximized = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_recycle_bin_source_is_excluded() {
        assert!(SourceAppId::recycle_bin().is_recycle_bin());
        assert_eq!(SourceAppId::recycle_bin().as_str(), RECYCLE_BIN_SOURCE_ID);
        assert!(!SourceAppId::trusted("desktop.word").is_recycle_bin());
    }

    #[test]
    fn centered_geometry_anchors_on_the_viewport_center() {
        let viewport = DesktopViewport {
            width: 1000,
            height: 848,
            taskbar_height: Some(48),
        };
        let geometry = WindowGeometry::centered(WindowSize::new(300, 600), viewport);
        assert_eq!((geometry.left, geometry.top), (500, 400));
        assert_eq!(geometry.transform, WindowTransform::CenterOnAnchor);
    }

    #[test]
    fn fill_reserves_the_taskbar_strip() {
        let with_taskbar = DesktopViewport {
            width: 1280,
            height: 800,
            taskbar_height: Some(48),
        };
        let geometry = WindowGeometry::fill(with_taskbar);
        assert_eq!(geometry.width, 1280);
        assert_eq!(geometry.height, 752);

        let bare = DesktopViewport {
            taskbar_height: None,
            ..with_taskbar
        };
        assert_eq!(WindowGeometry::fill(bare).height, 800);
    }

    #[test]
    fn content_surface_excludes_the_titlebar() {
        let geometry = WindowGeometry {
            left: 0,
            top: 0,
            width: 700,
            height: 420,
            transform: WindowTransform::None,
        };
        assert_eq!(geometry.content_surface(), SurfaceSize::new(700, 380));
    }
}
