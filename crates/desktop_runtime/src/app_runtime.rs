//! Runtime app-session state owned by the desktop shell.

use std::collections::{BTreeSet, HashMap};

use desktop_app_contract::{AppLifecycleEvent, SurfaceSize};
use leptos::*;

use crate::model::{WindowId, WindowRecord};

#[derive(Clone, Copy)]
/// Reactive per-window app session signals.
pub struct WindowAppSession {
    /// Latest lifecycle signal value for the window.
    pub lifecycle: RwSignal<AppLifecycleEvent>,
    /// Current content surface size of the window.
    pub surface: RwSignal<SurfaceSize>,
}

/// Runtime-owned app sessions keyed by window.
///
/// Session signals are created under the provider's owner so they outlive the window views that
/// read them.
pub struct AppRuntimeState {
    owner: Option<Owner>,
    sessions: HashMap<WindowId, WindowAppSession>,
}

impl AppRuntimeState {
    pub fn new(owner: Option<Owner>) -> Self {
        Self {
            owner,
            sessions: HashMap::new(),
        }
    }

    fn ensure_session(&mut self, window: &WindowRecord) -> WindowAppSession {
        if let Some(session) = self.sessions.get(&window.id).copied() {
            return session;
        }

        let surface = window.geometry.content_surface();
        let create = move || WindowAppSession {
            lifecycle: create_rw_signal(AppLifecycleEvent::Mounted),
            surface: create_rw_signal(surface),
        };
        let session = match self.owner {
            Some(owner) => with_owner(owner, create),
            None => create(),
        };
        self.sessions.insert(window.id.clone(), session);
        session
    }

    fn session(&self, window_id: &WindowId) -> Option<WindowAppSession> {
        self.sessions.get(window_id).copied()
    }

    fn sync_windows(&mut self, windows: &[WindowRecord]) {
        for window in windows {
            self.ensure_session(window);
        }
    }
}

/// Ensures and returns a per-window runtime app session.
pub fn ensure_window_session(
    runtime_state: RwSignal<AppRuntimeState>,
    window: &WindowRecord,
) -> WindowAppSession {
    if let Some(session) = runtime_state.with_untracked(|state| state.session(&window.id)) {
        return session;
    }

    runtime_state
        .try_update_untracked(|state| state.ensure_session(window))
        .unwrap_or_else(|| WindowAppSession {
            lifecycle: create_rw_signal(AppLifecycleEvent::Mounted),
            surface: create_rw_signal(window.geometry.content_surface()),
        })
}

/// Creates sessions for newly opened windows.
///
/// Closed windows keep their session until [`release_window_session`] runs so the `Closed`
/// event still reaches them.
pub fn sync_runtime_sessions(runtime_state: RwSignal<AppRuntimeState>, windows: &[WindowRecord]) {
    runtime_state.update_untracked(|state| state.sync_windows(windows));
}

/// Applies an app lifecycle event to a window session. Unknown windows are ignored.
pub fn set_window_lifecycle(
    runtime_state: RwSignal<AppRuntimeState>,
    window_id: &WindowId,
    event: AppLifecycleEvent,
) {
    if let Some(session) = runtime_state.with_untracked(|state| state.session(window_id)) {
        session.lifecycle.set(event);
    }
}

/// Publishes a new content surface size to a window session.
pub fn set_window_surface(
    runtime_state: RwSignal<AppRuntimeState>,
    window_id: &WindowId,
    surface: SurfaceSize,
) {
    if let Some(session) = runtime_state.with_untracked(|state| state.session(window_id)) {
        if session.surface.get_untracked() != surface {
            session.surface.set(surface);
        }
    }
}

/// Marks a session closed and drops it, along with any session whose window is gone.
pub fn release_window_session(
    runtime_state: RwSignal<AppRuntimeState>,
    window_id: &WindowId,
    open_windows: &[WindowRecord],
) {
    set_window_lifecycle(runtime_state, window_id, AppLifecycleEvent::Closed);
    let open: BTreeSet<&WindowId> = open_windows.iter().map(|w| &w.id).collect();
    runtime_state.update_untracked(|state| {
        state.sessions.remove(window_id);
        state.sessions.retain(|id, _| open.contains(id));
    });
}
