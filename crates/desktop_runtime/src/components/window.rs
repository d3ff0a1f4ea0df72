use super::*;
use crate::app_runtime::ensure_window_session;
use crate::model::WindowId;
use desktop_app_contract::AppMountContext;

fn window_class(window: Option<&WindowRecord>, focused: bool) -> String {
    let Some(window) = window else {
        return "window".to_string();
    };
    let mut class = String::from("window");
    if focused {
        class.push_str(" focused");
    }
    if window.state.is_maximized() {
        class.push_str(" maximized");
    }
    if window.state.is_minimized() {
        class.push_str(" minimized");
    }
    class
}

/// Titlebar control. Acts on pointer-down and keeps the press from raising the window.
fn titlebar_button(
    class: &'static str,
    label: &'static str,
    glyph: impl IntoView,
    on_press: impl Fn() + 'static,
) -> View {
    view! {
        <div
            class=format!("win-btn {class}")
            title=label
            role="button"
            aria-label=label
            on:pointerdown=move |ev: web_sys::PointerEvent| {
                ev.stop_propagation();
                ev.prevent_default();
                on_press();
            }
        >
            {glyph}
        </div>
    }
    .into_view()
}

#[component]
pub(super) fn DesktopWindow(window_id: WindowId) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let id = store_value(window_id);

    let window = create_memo(move |_| {
        runtime
            .state
            .with(|state| id.with_value(|id| state.window(id).cloned()))
    });
    let focused = create_memo(move |_| {
        runtime
            .state
            .with(|state| id.with_value(|id| state.focused_window_id() == Some(id)))
    });

    let Some(initial) = window.get_untracked() else {
        return ().into_view();
    };
    let controls = initial.controls;

    let raise = move |_: web_sys::PointerEvent| {
        runtime.dispatch_action(DesktopAction::FocusWindow {
            window_id: id.get_value(),
        });
    };
    let close = move || {
        runtime.dispatch_action(DesktopAction::CloseWindow {
            window_id: id.get_value(),
        })
    };
    let minimize = move || {
        runtime.dispatch_action(DesktopAction::MinimizeWindow {
            window_id: id.get_value(),
        })
    };
    let toggle_maximize = move || {
        runtime.dispatch_action(DesktopAction::ToggleMaximize {
            window_id: id.get_value(),
        })
    };
    let is_maximized = move || window.with(|w| w.as_ref().is_some_and(|w| w.state.is_maximized()));

    view! {
        <div
            class=move || window.with(|w| window_class(w.as_ref(), focused.get()))
            style=move || window.with(|w| w.as_ref().map(window_style).unwrap_or_default())
            data-win-id=id.get_value().to_string()
            tabindex="-1"
            on:pointerdown=raise
        >
            <div
                class="titlebar"
                on:dblclick=move |_| {
                    if controls.maximize {
                        toggle_maximize();
                    }
                }
            >
                <div class="title">
                    {move || window.with(|w| w.as_ref().map(|w| w.title.clone()).unwrap_or_default())}
                </div>
                <div class="controls">
                    {controls
                        .minimize
                        .then(|| titlebar_button("minimize", "Minimize", "—", minimize))}
                    {controls
                        .maximize
                        .then(|| {
                            titlebar_button(
                                "maximize",
                                "Maximize",
                                move || if is_maximized() { "❐" } else { "▢" },
                                toggle_maximize,
                            )
                        })}
                    {controls.close.then(|| titlebar_button("close", "Close", "✕", close))}
                </div>
            </div>
            <div class="content">
                <WindowBody window=initial />
            </div>
        </div>
    }
    .into_view()
}

#[component]
fn WindowBody(window: WindowRecord) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let Some(module) = apps::app_module(&window.content) else {
        return apps::render_static_content(&window.content);
    };

    let session = ensure_window_session(runtime.app_runtime, &window);
    module.mount(AppMountContext {
        window_id: window.id.to_string(),
        lifecycle: session.lifecycle.read_only(),
        surface: session.surface.read_only(),
    })
}
