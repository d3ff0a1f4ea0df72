//! Shared contract types between the desktop window manager runtime and hosted apps.
//!
//! A hosted app only ever sees a window through this crate: the window id, a content surface
//! size, and lifecycle notifications. It never reads window-manager state directly.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use leptos::{ReadSignal, View};
use serde::{Deserialize, Serialize};

/// Opaque identifier of a runtime-managed window as seen by hosted apps.
pub type WindowRuntimeId = String;

/// Returns the DOM id apps put on their primary text input so the runtime can focus it.
pub fn window_primary_input_dom_id(window_id: &str) -> String {
    format!("{window_id}-primary-input")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Lifecycle events emitted by the desktop window manager.
pub enum AppLifecycleEvent {
    /// App view has been mounted into a managed window.
    Mounted,
    /// Window was raised to the front.
    Focused,
    /// Window was hidden behind a taskbar item.
    Minimized,
    /// Window came back from the taskbar or left the maximized state.
    Restored,
    /// Window now fills the desktop surface.
    Maximized,
    /// Window close sequence started; hosted timers and listeners must be released now.
    Closing,
    /// Window close sequence completed.
    Closed,
}

impl AppLifecycleEvent {
    /// Returns whether the event changes the size of the content surface.
    pub const fn resizes_surface(self) -> bool {
        matches!(self, Self::Maximized | Self::Restored)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Pixel size of a window's content area.
pub struct SurfaceSize {
    /// Width in CSS pixels.
    pub width: i32,
    /// Height in CSS pixels.
    pub height: i32,
}

impl SurfaceSize {
    /// Creates a surface size.
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

#[derive(Clone)]
/// App mount context injected by the desktop runtime per window instance.
pub struct AppMountContext {
    /// Runtime window id.
    pub window_id: WindowRuntimeId,
    /// Latest lifecycle event for this window.
    pub lifecycle: ReadSignal<AppLifecycleEvent>,
    /// Current content surface size, updated on maximize/restore and viewport changes.
    pub surface: ReadSignal<SurfaceSize>,
}

/// Static app mount function used by the runtime registry.
pub type AppMountFn = fn(AppMountContext) -> View;

#[derive(Debug, Clone, Copy)]
/// Mounted app module descriptor used by the runtime app registry.
pub struct AppModule {
    mount_fn: AppMountFn,
}

impl AppModule {
    /// Creates a module from a mount function.
    pub const fn new(mount_fn: AppMountFn) -> Self {
        Self { mount_fn }
    }

    /// Mounts the app view with a runtime-provided context.
    pub fn mount(self, context: AppMountContext) -> View {
        (self.mount_fn)(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_geometry_events_resize_the_surface() {
        assert!(AppLifecycleEvent::Maximized.resizes_surface());
        assert!(AppLifecycleEvent::Restored.resizes_surface());
        assert!(!AppLifecycleEvent::Minimized.resizes_surface());
        assert!(!AppLifecycleEvent::Closing.resizes_surface());
    }

    #[test]
    fn primary_input_id_is_scoped_to_the_window() {
        assert_eq!(
            window_primary_input_dom_id("win-1-abcdef"),
            "win-1-abcdef-primary-input"
        );
    }
}
