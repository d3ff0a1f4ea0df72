use super::*;
use crate::model::TaskbarItem;

#[component]
pub(super) fn Taskbar() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;
    let query = create_rw_signal(String::new());

    let items = create_memo(move |_| state.with(|s| s.taskbar.clone()));
    let start_open = create_memo(move |_| state.with(|s| s.start_panel_open()));

    let submit_search = move || {
        if let Some(req) = apps::search_open_request(&query.get_untracked()) {
            runtime.dispatch_action(DesktopAction::OpenWindow(req));
            query.set(String::new());
        }
    };

    view! {
        <div class="taskbar">
            <div class="tb-left">
                <button
                    class="start-button"
                    class:active=move || start_open.get()
                    aria-label="Start"
                    on:pointerdown=move |ev: web_sys::PointerEvent| {
                        ev.stop_propagation();
                        ev.prevent_default();
                        runtime.dispatch_action(DesktopAction::ToggleStartPanel);
                    }
                >
                    "⊞"
                </button>
                <input
                    class="tb-search"
                    type="search"
                    placeholder="Rechercher"
                    prop:value=move || query.get()
                    on:input=move |ev| query.set(event_target_value(&ev))
                    on:keydown=move |ev: web_sys::KeyboardEvent| {
                        if ev.key() == "Enter" {
                            ev.prevent_default();
                            submit_search();
                        }
                    }
                />
            </div>
            <div class="tb-right">
                <For each=move || items.get() key=|item| item.id.clone() let:item>
                    <TaskbarButton item />
                </For>
            </div>
        </div>
    }
}

#[component]
fn TaskbarButton(item: TaskbarItem) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let id = store_value(item.id.clone());

    view! {
        <div
            class="tb-item"
            data-win-id=item.id.to_string()
            role="button"
            on:pointerdown=move |ev: web_sys::PointerEvent| {
                ev.stop_propagation();
                ev.prevent_default();
                runtime.dispatch_action(DesktopAction::RestoreFromTaskbar {
                    window_id: id.get_value(),
                });
            }
        >
            {item.label}
        </div>
    }
}
