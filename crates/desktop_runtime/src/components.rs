//! Desktop shell UI composition and interaction surfaces.

mod taskbar;
mod window;

use leptos::*;

use self::{taskbar::Taskbar, window::DesktopWindow};

use crate::{
    apps::{self, DesktopIcon},
    model::{DesktopOverlay, WindowRecord, WindowTransform},
    reducer::DesktopAction,
};

pub use crate::runtime_context::{use_desktop_runtime, DesktopProvider, DesktopRuntimeContext};

/// Columns of the desktop icon grid.
pub const ICON_GRID_COLUMNS: u32 = 16;
/// Rows of the desktop icon grid.
pub const ICON_GRID_ROWS: u32 = 32;

const START_PANEL_MESSAGE: &str =
    "La Résistance commence! Quitte cet OS immédiatement et rejoins Linux!";

/// Inline style placing a window from its geometry and stacking value.
pub(crate) fn window_style(window: &WindowRecord) -> String {
    let geometry = window.geometry;
    let transform = match geometry.transform {
        WindowTransform::None => "",
        WindowTransform::CenterOnAnchor => "transform:translate(-50%,-50%);",
    };
    let display = if window.state.is_minimized() {
        "display:none;"
    } else {
        ""
    };
    format!(
        "left:{}px;top:{}px;width:{}px;height:{}px;max-width:none;z-index:{};{transform}{display}",
        geometry.left, geometry.top, geometry.width, geometry.height, window.z_index
    )
}

fn icon_class(icon: &DesktopIcon) -> &'static str {
    match icon.kind {
        apps::IconKind::App => "app",
        apps::IconKind::Terminal => "app app-terminal",
        apps::IconKind::RecycleBin => "app app-bin",
    }
}

fn icon_cell_style(icon: &DesktopIcon) -> String {
    format!("grid-column:{};grid-row:{};", icon.column, icon.row)
}

/// Browsers report the second click of a double click with `detail == 2`; that click and the
/// `dblclick` event both count as an open gesture and the per-source debounce keeps only one.
fn is_double_click(detail: i32) -> bool {
    detail == 2
}

fn open_icon(runtime: DesktopRuntimeContext, icon: &DesktopIcon) {
    runtime.dispatch_action(DesktopAction::OpenWindow(apps::icon_open_request(icon)));
}

#[component]
fn DesktopIconTile(icon: &'static DesktopIcon) -> impl IntoView {
    let runtime = use_desktop_runtime();

    view! {
        <div
            class=icon_class(icon)
            id=icon.source_id.clone()
            style=icon_cell_style(icon)
            on:dblclick=move |_| open_icon(runtime, icon)
            on:click=move |ev: web_sys::MouseEvent| {
                if is_double_click(ev.detail()) {
                    open_icon(runtime, icon);
                }
            }
        >
            <div class="app-glyph" aria-hidden="true">{icon.glyph.clone()}</div>
            <div class="appName">{icon.label.clone()}</div>
        </div>
    }
}

#[component]
fn StartPanel() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let z_index = Signal::derive(move || {
        runtime.state.with(|state| match state.overlay {
            Some(DesktopOverlay::StartPanel { z_index }) => Some(z_index),
            None => None,
        })
    });

    view! {
        <Show when=move || z_index.get().is_some() fallback=|| ()>
            <div
                class="start-panel"
                style=move || format!("z-index:{};", z_index.get().unwrap_or_default())
                on:pointerdown=move |ev: web_sys::PointerEvent| ev.stop_propagation()
            >
                <div class="start-panel-center">
                    <div class="resistance-text">{START_PANEL_MESSAGE}</div>
                </div>
            </div>
        </Show>
    }
}

#[component]
/// Renders the full desktop shell: icon grid, window layer, start panel, and taskbar.
pub fn DesktopShell() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;

    view! {
        <div id="desktop-shell-root" class="desktop-shell" tabindex="-1">
            <div
                class="desktop"
                on:pointerdown=move |_| {
                    if state.with_untracked(|s| s.start_panel_open()) {
                        runtime.dispatch_action(DesktopAction::CloseStartPanel);
                    }
                }
            >
                <div
                    class="desktop-icons"
                    style=format!(
                        "display:grid;grid-template-columns:repeat({ICON_GRID_COLUMNS},1fr);grid-template-rows:repeat({ICON_GRID_ROWS},1fr);"
                    )
                >
                    <For each=move || apps::desktop_icons().iter() key=|icon| icon.source_id.clone() let:icon>
                        <DesktopIconTile icon />
                    </For>
                </div>

                <div class="window-layer">
                    <For
                        each=move || state.with(|s| s.windows.iter().map(|w| w.id.clone()).collect::<Vec<_>>())
                        key=|id| id.clone()
                        let:id
                    >
                        <DesktopWindow window_id=id />
                    </For>
                </div>

                <StartPanel />
            </div>

            <Taskbar />
        </div>
    }
}
