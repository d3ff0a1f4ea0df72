//! Konsole desktop app: a parody Ubuntu terminal with a built-in snake game.
//!
//! Command handling and the game are plain state machines in [`session`] and [`snake`]. The
//! [`TerminalApp`] component owns the browser side: the game timer, window listeners, canvas
//! drawing, and input focus.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod game_loop;
pub mod session;
pub mod snake;

use std::{rc::Rc, time::Duration};

use desktop_app_contract::{
    window_primary_input_dom_id, AppLifecycleEvent, AppMountContext, SurfaceSize,
};
use leptos::ev::KeyboardEvent;
use leptos::*;
use platform_host::SmallRngEntropy;
use wasm_bindgen::{JsCast, JsValue};

use crate::game_loop::{GameResources, LifecycleReaction};
use crate::session::{KeyOutcome, SubmitOutcome, TerminalSession, PROMPT};
use crate::snake::{GridSize, SnakeGame, CELL_SIZE_PX, TICK_INTERVAL_MS};

/// Narrowest playing surface.
pub const MIN_CANVAS_WIDTH_PX: i32 = 240;
/// Shortest playing surface.
pub const MIN_CANVAS_HEIGHT_PX: i32 = 160;
/// Widest playing surface.
pub const MAX_CANVAS_WIDTH_PX: i32 = 1200;

const INPUT_REFOCUS_DELAY_MS: u64 = 200;

const BACKGROUND_COLOR: &str = "#000";
const FOOD_COLOR: &str = "#d9534f";
const SNAKE_COLOR: &str = "#5dd85d";
const SCORE_COLOR: &str = "#fff";
const SCORE_FONT: &str = "12px monospace";

/// Playing-surface size for a measured output area, bounded by the browser viewport height.
pub fn canvas_surface(measured: SurfaceSize, viewport_height: Option<i32>) -> SurfaceSize {
    let max_height = viewport_height.map_or(i32::MAX, |height| height.max(MIN_CANVAS_HEIGHT_PX));
    SurfaceSize::new(
        measured.width.clamp(MIN_CANVAS_WIDTH_PX, MAX_CANVAS_WIDTH_PX),
        measured.height.max(MIN_CANVAS_HEIGHT_PX).min(max_height),
    )
}

fn viewport_height() -> Option<i32> {
    let height = web_sys::window()?.inner_height().ok()?.as_f64()?;
    Some(height.round() as i32)
}

fn draw_frame(canvas: &web_sys::HtmlCanvasElement, game: &SnakeGame) {
    let size = game.grid().pixel_size();
    let (width, height) = (size.width as u32, size.height as u32);
    if canvas.width() != width {
        canvas.set_width(width);
    }
    if canvas.height() != height {
        canvas.set_height(height);
    }

    let context = match canvas.get_context("2d") {
        Ok(Some(context)) => context,
        _ => {
            logging::warn!("terminal canvas has no 2d context");
            return;
        }
    };
    let Ok(context) = context.dyn_into::<web_sys::CanvasRenderingContext2d>() else {
        return;
    };

    let cell = f64::from(CELL_SIZE_PX);
    context.set_fill_style(&JsValue::from_str(BACKGROUND_COLOR));
    context.fill_rect(0.0, 0.0, f64::from(size.width), f64::from(size.height));

    let food = game.food();
    context.set_fill_style(&JsValue::from_str(FOOD_COLOR));
    context.fill_rect(f64::from(food.x) * cell, f64::from(food.y) * cell, cell, cell);

    // Segments are inset by one pixel so the body reads as separate cells.
    context.set_fill_style(&JsValue::from_str(SNAKE_COLOR));
    for segment in game.snake() {
        context.fill_rect(
            f64::from(segment.x) * cell + 1.0,
            f64::from(segment.y) * cell + 1.0,
            cell - 2.0,
            cell - 2.0,
        );
    }

    context.set_fill_style(&JsValue::from_str(SCORE_COLOR));
    context.set_font(SCORE_FONT);
    if let Err(err) = context.fill_text(&format!("Score: {}", game.score()), 6.0, 14.0) {
        logging::warn!("terminal score draw failed: {err:?}");
    }
}

#[component]
/// Terminal window contents.
///
/// Lines typed at the prompt run against a [`TerminalSession`]. While a snake game runs the input
/// is disabled and window key presses steer the game until it ends.
pub fn TerminalApp(
    /// Window context injected by the desktop runtime.
    context: AppMountContext,
) -> impl IntoView {
    let AppMountContext {
        window_id,
        lifecycle,
        surface,
        ..
    } = context;
    let input_id = window_primary_input_dom_id(&window_id);
    let session = create_rw_signal(TerminalSession::new(Rc::new(
        SmallRngEntropy::from_entropy(),
    )));
    let input = create_rw_signal(String::new());
    let output_ref = create_node_ref::<html::Div>();
    let canvas_ref = create_node_ref::<html::Canvas>();
    let input_ref = create_node_ref::<html::Input>();
    let resources = store_value(GameResources::default());

    let lines = create_memo(move |_| session.with(|session| session.lines().to_vec()));
    let game_running = create_memo(move |_| session.with(TerminalSession::game_running));

    // `None` while the window is minimized and its output is not laid out.
    let measure_grid = move || {
        if lifecycle.get_untracked() == AppLifecycleEvent::Minimized {
            return None;
        }
        let measured = output_ref
            .get_untracked()
            .map(|output| {
                let rect = output.get_bounding_client_rect();
                SurfaceSize::new(rect.width().round() as i32, rect.height().round() as i32)
            })
            .unwrap_or_else(|| surface.get_untracked());
        game_loop::playfield_grid(measured, viewport_height())
    };

    let refit_game = move || {
        if let Some(grid) = measure_grid() {
            let _ = session.try_update(|session| session.resize(grid));
        }
    };

    let refocus_input = move || {
        set_timeout(
            move || {
                if let Some(field) = input_ref.get_untracked() {
                    let _ = field.focus();
                }
            },
            Duration::from_millis(INPUT_REFOCUS_DELAY_MS),
        );
    };

    let start_game_loop = move || {
        let tick = set_interval_with_handle(
            move || {
                let ended = session
                    .try_update(|session| {
                        resources.try_update_value(|held| game_loop::advance(session, held))
                    })
                    .flatten()
                    .flatten();
                if ended.is_some() {
                    refocus_input();
                }
            },
            Duration::from_millis(TICK_INTERVAL_MS),
        )
        .map_err(|err| logging::warn!("terminal game timer failed: {err:?}"))
        .ok();
        let keydown = window_event_listener(ev::keydown, move |ev: KeyboardEvent| {
            let key = ev.key();
            let outcome = session
                .try_update(|session| {
                    resources.try_update_value(|held| game_loop::press_key(session, held, &key))
                })
                .flatten()
                .unwrap_or(KeyOutcome::Ignored);
            if outcome.consumed() {
                ev.prevent_default();
            }
            if let KeyOutcome::Ended(_) = outcome {
                refocus_input();
            }
        });
        let resize = window_event_listener(ev::resize, move |_| refit_game());

        resources.update_value(|held| {
            if !held.is_empty() {
                logging::debug_warn!("terminal game started while earlier handles were held");
                held.release_all();
            }
            if let Some(tick) = tick {
                held.hold(move || tick.clear());
            }
            held.hold(move || keydown.remove());
            held.hold(move || resize.remove());
        });
    };

    let submit = move || {
        let line = input.get_untracked();
        input.set(String::new());
        let grid = measure_grid().unwrap_or_else(|| {
            GridSize::from_surface(canvas_surface(surface.get_untracked(), viewport_height()))
        });
        if session.try_update(|session| session.submit(&line, grid))
            == Some(SubmitOutcome::GameStarted)
        {
            start_game_loop();
        }
    };

    create_effect(move |_| match game_loop::lifecycle_reaction(lifecycle.get()) {
        LifecycleReaction::Teardown => {
            let _ = session.try_update(|session| {
                resources.try_update_value(|held| game_loop::teardown(session, held))
            });
        }
        LifecycleReaction::Remeasure => {
            if session.with_untracked(TerminalSession::game_running) {
                request_animation_frame(refit_game);
            }
        }
        LifecycleReaction::Ignore => {}
    });

    create_effect(move |_| {
        let _ = surface.get();
        if session.with_untracked(TerminalSession::game_running) {
            request_animation_frame(refit_game);
        }
    });

    create_effect(move |_| {
        let Some(canvas) = canvas_ref.get() else {
            return;
        };
        session.with(|session| {
            if let Some(game) = session.game() {
                draw_frame(&canvas, game);
            }
        });
    });

    on_cleanup(move || {
        resources.try_update_value(GameResources::release_all);
    });

    view! {
        <div class="app-shell app-terminal-shell">
            <div class="terminal-screen" role="log" aria-live="polite" node_ref=output_ref>
                <Show when=move || game_running.get() fallback=|| ()>
                    <canvas class="terminal-snake" node_ref=canvas_ref></canvas>
                </Show>
                <For
                    each=move || lines.get().into_iter().enumerate()
                    key=|entry| entry.clone()
                    let:entry
                >
                    <div class="terminal-line">{entry.1}</div>
                </For>
            </div>

            <div class="terminal-input-row">
                <label class="terminal-prompt" for=input_id.clone()>
                    {PROMPT}
                </label>
                <input
                    id=input_id
                    node_ref=input_ref
                    class="terminal-input app-field"
                    type="text"
                    prop:value=move || input.get()
                    prop:disabled=move || game_running.get()
                    on:input=move |ev| input.set(event_target_value(&ev))
                    on:keydown=move |ev: KeyboardEvent| {
                        if ev.key() == "Enter" {
                            ev.prevent_default();
                            submit();
                        }
                    }
                    autocomplete="off"
                    spellcheck="false"
                />
            </div>
        </div>
    }
}

/// Mounts the terminal into a desktop window.
pub fn mount(context: AppMountContext) -> View {
    view! { <TerminalApp context /> }.into_view()
}
