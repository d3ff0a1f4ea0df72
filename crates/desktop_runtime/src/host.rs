//! Host-side runtime helpers for executing reducer effects and querying browser environment state.

#[cfg(target_arch = "wasm32")]
use desktop_app_contract::window_primary_input_dom_id;
use leptos::{Callback, SignalWithUntracked};
#[cfg(target_arch = "wasm32")]
use leptos::{ev, request_animation_frame, window_event_listener, Callable};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};

use crate::{
    app_runtime::{release_window_session, set_window_lifecycle, set_window_surface},
    model::{DesktopViewport, WindowId},
    reducer::{DesktopAction, ReducerEnv, RuntimeEffect},
    runtime_context::DesktopRuntimeContext,
};

/// CSS class of the taskbar element measured for the reserved strip.
pub const TASKBAR_SELECTOR: &str = ".taskbar";

/// Selector of a window's outer element. Taskbar items carry the same data attribute.
pub fn window_element_selector(window_id: &WindowId) -> String {
    format!(".window[data-win-id=\"{window_id}\"]")
}

#[derive(Clone)]
/// Host service bundle for desktop runtime side effects.
pub struct DesktopHostContext {
    env: ReducerEnv,
}

impl Default for DesktopHostContext {
    fn default() -> Self {
        Self::new(ReducerEnv::system())
    }
}

impl DesktopHostContext {
    /// Creates a host context around an explicit reducer environment.
    pub fn new(env: ReducerEnv) -> Self {
        Self { env }
    }

    /// Returns the clock and entropy used by the reducer.
    pub fn env(&self) -> &ReducerEnv {
        &self.env
    }

    /// Executes a single [`RuntimeEffect`] emitted by the reducer.
    pub fn run_runtime_effect(&self, runtime: DesktopRuntimeContext, effect: RuntimeEffect) {
        match effect {
            RuntimeEffect::FocusWindowInput(window_id) => self.focus_window_input(&window_id),
            RuntimeEffect::NotifyLifecycle { window_id, event } => {
                set_window_lifecycle(runtime.app_runtime, &window_id, event);
            }
            RuntimeEffect::SurfaceChanged { window_id, surface } => {
                set_window_surface(runtime.app_runtime, &window_id, surface);
            }
            RuntimeEffect::ReleaseWindowSession(window_id) => {
                let open = runtime.state.with_untracked(|state| state.windows.clone());
                release_window_session(runtime.app_runtime, &window_id, &open);
            }
        }
    }

    /// Focuses the window's primary input once the current render pass has settled.
    ///
    /// Apps opt in by rendering [`desktop_app_contract::window_primary_input_dom_id`] on their
    /// primary text field. Windows without one get focus on their outer element.
    pub fn focus_window_input(&self, window_id: &WindowId) {
        #[cfg(target_arch = "wasm32")]
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let dom_id = window_primary_input_dom_id(window_id.as_str());
            let selector = window_element_selector(window_id);
            let callback = Closure::once_into_js(move || {
                let Some(document) = web_sys::window().and_then(|window| window.document()) else {
                    return;
                };
                let Some(element) = document
                    .get_element_by_id(&dom_id)
                    .or_else(|| document.query_selector(&selector).ok().flatten())
                else {
                    return;
                };
                if let Ok(element) = element.dyn_into::<web_sys::HtmlElement>() {
                    let _ = element.focus();
                }
            });
            let _ = window
                .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), 0);
        }
        #[cfg(not(target_arch = "wasm32"))]
        let _ = window_id;
    }

    /// Measures the browser viewport and the taskbar strip.
    pub fn desktop_viewport(&self) -> DesktopViewport {
        #[cfg(target_arch = "wasm32")]
        {
            if let Some(window) = web_sys::window() {
                let width = window
                    .inner_width()
                    .ok()
                    .and_then(|value| value.as_f64())
                    .map(|value| value as i32)
                    .unwrap_or(1024);
                let height = window
                    .inner_height()
                    .ok()
                    .and_then(|value| value.as_f64())
                    .map(|value| value as i32)
                    .unwrap_or(768);
                let taskbar_height = window
                    .document()
                    .and_then(|document| document.query_selector(TASKBAR_SELECTOR).ok().flatten())
                    .map(|taskbar| taskbar.get_bounding_client_rect().height().round() as i32);

                return DesktopViewport {
                    width: width.max(0),
                    height: height.max(0),
                    taskbar_height,
                };
            }
        }

        DesktopViewport::default()
    }

    /// Publishes the current viewport now and whenever the browser window resizes.
    pub fn install_viewport_tracking(&self, dispatch: Callback<DesktopAction>) {
        #[cfg(target_arch = "wasm32")]
        {
            let host = self.clone();
            {
                // The taskbar only has a size once the shell has rendered.
                let host = host.clone();
                request_animation_frame(move || {
                    dispatch.call(DesktopAction::SetViewport {
                        viewport: host.desktop_viewport(),
                    });
                });
            }
            // Lives as long as the page.
            let _handle = window_event_listener(ev::resize, move |_| {
                dispatch.call(DesktopAction::SetViewport {
                    viewport: host.desktop_viewport(),
                });
            });
        }
        #[cfg(not(target_arch = "wasm32"))]
        let _ = dispatch;
    }
}
