//! Runtime provider and context wiring for the desktop shell.
//!
//! This module owns the long-lived reducer container, runtime effect queue, app-session state,
//! and host bootstrap wiring. UI composition stays in [`crate::components`].

use leptos::*;

use crate::{
    app_runtime::{set_window_lifecycle, sync_runtime_sessions, AppRuntimeState},
    apps,
    host::DesktopHostContext,
    model::{DesktopState, DesktopViewport},
    reducer::{reduce_desktop, DesktopAction, RuntimeEffect},
};

#[derive(Clone, Copy)]
/// Leptos context for reading desktop runtime state and dispatching [`DesktopAction`] values.
pub struct DesktopRuntimeContext {
    /// Host service bundle for executing runtime side effects and environment queries.
    pub host: StoredValue<DesktopHostContext>,
    /// Reactive desktop state signal.
    pub state: RwSignal<DesktopState>,
    /// Queue of runtime effects emitted by the reducer and processed by the shell.
    pub effects: RwSignal<Vec<RuntimeEffect>>,
    /// Runtime app-session state.
    pub app_runtime: RwSignal<AppRuntimeState>,
    /// Reducer dispatch callback.
    pub dispatch: Callback<DesktopAction>,
}

impl DesktopRuntimeContext {
    /// Dispatches a reducer action through the runtime context callback.
    pub fn dispatch_action(&self, action: DesktopAction) {
        self.dispatch.call(action);
    }
}

/// Drains queued effects in order. Effects that dispatch again append to a fresh queue, which
/// re-triggers this drain.
fn install_effect_executor(runtime: DesktopRuntimeContext) {
    create_effect(move |_| {
        if runtime.effects.with(Vec::is_empty) {
            return;
        }
        let queued = runtime.effects.try_update(std::mem::take).unwrap_or_default();
        let host = runtime.host.get_value();
        for effect in queued {
            host.run_runtime_effect(runtime, effect);
        }
    });
}

fn install_runtime_orchestration(runtime: DesktopRuntimeContext) {
    install_effect_executor(runtime);
    let host = runtime.host.get_value();
    host.install_viewport_tracking(runtime.dispatch);
    runtime.dispatch_action(DesktopAction::OpenWindow(apps::welcome_open_request()));
}

#[component]
/// Provides [`DesktopRuntimeContext`] to descendant components and opens the welcome window.
pub fn DesktopProvider(
    /// Host bundle; defaults to the browser clock and a host-seeded random source.
    #[prop(optional)]
    host: Option<DesktopHostContext>,
    children: Children,
) -> impl IntoView {
    let host = store_value(host.unwrap_or_default());
    let mut viewport = host.with_value(|host| host.desktop_viewport());
    if viewport.taskbar_height.is_none() {
        // Re-measured once the taskbar has rendered.
        viewport.taskbar_height = DesktopViewport::default().taskbar_height;
    }
    let state = create_rw_signal(DesktopState::with_viewport(viewport));
    let effects = create_rw_signal(Vec::<RuntimeEffect>::new());
    let app_runtime = create_rw_signal(AppRuntimeState::new(Owner::current()));

    let dispatch = Callback::new(move |action: DesktopAction| {
        let mut desktop = state.get_untracked();
        let previous_desktop = desktop.clone();
        let env = host.with_value(|host| host.env().clone());

        match reduce_desktop(&mut desktop, &env, action) {
            Ok(new_effects) => {
                let (before_commit, after_commit): (Vec<_>, Vec<_>) = new_effects
                    .into_iter()
                    .partition(RuntimeEffect::runs_before_commit);
                for effect in before_commit {
                    if let RuntimeEffect::NotifyLifecycle { window_id, event } = effect {
                        set_window_lifecycle(app_runtime, &window_id, event);
                    }
                }

                if desktop.windows != previous_desktop.windows {
                    sync_runtime_sessions(app_runtime, &desktop.windows);
                }
                if desktop != previous_desktop {
                    state.set(desktop);
                }
                if !after_commit.is_empty() {
                    let mut queue = effects.get_untracked();
                    queue.extend(after_commit);
                    effects.set(queue);
                }
            }
            Err(err) if err.is_ignorable() => logging::debug_warn!("desktop action ignored: {err}"),
            Err(err) => logging::warn!("desktop reducer error: {err}"),
        }
    });

    let runtime = DesktopRuntimeContext {
        host,
        state,
        effects,
        app_runtime,
        dispatch,
    };

    provide_context(runtime);

    install_runtime_orchestration(runtime);

    children().into_view()
}

/// Returns the current [`DesktopRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`DesktopProvider`].
pub fn use_desktop_runtime() -> DesktopRuntimeContext {
    use_context::<DesktopRuntimeContext>().expect("DesktopRuntimeContext not provided")
}
