//! Reducer actions, side-effect intents, and transition logic for the desktop runtime.

use std::rc::Rc;

use desktop_app_contract::{AppLifecycleEvent, SurfaceSize};
use platform_host::{Clock, EntropySource, SmallRngEntropy, SystemClock};
use thiserror::Error;

use crate::model::{
    DesktopOverlay, DesktopState, DesktopViewport, OpenWindowRequest, WindowGeometry, WindowId,
    WindowRecord, WindowSize, WindowState, DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH,
};
use crate::window_manager::{
    apply_viewport, mint_window_id, minimize_window, open_suppression, raise_to_front,
    restore_from_taskbar, sync_taskbar, toggle_maximize, MaximizeTransition, MinimizeOutcome,
    SuppressReason,
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open a new window using the supplied request.
    OpenWindow(OpenWindowRequest),
    /// Close a window by id.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Raise a window above every other one (pointer-down anywhere on it).
    FocusWindow {
        /// Window to raise.
        window_id: WindowId,
    },
    /// Hide a window behind a taskbar item.
    MinimizeWindow {
        /// Window to minimize.
        window_id: WindowId,
    },
    /// Bring a minimized window back from its taskbar item.
    RestoreFromTaskbar {
        /// Window associated with the taskbar item.
        window_id: WindowId,
    },
    /// Flip a window between normal and maximized geometry.
    ToggleMaximize {
        /// Window to toggle.
        window_id: WindowId,
    },
    /// Record the current desktop size; maximized windows refill it.
    SetViewport {
        /// Measured desktop viewport.
        viewport: DesktopViewport,
    },
    /// Open or close the start panel.
    ToggleStartPanel,
    /// Close the start panel if open.
    CloseStartPanel,
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the shell runtime to execute.
pub enum RuntimeEffect {
    /// Move focus into the window's primary input.
    FocusWindowInput(WindowId),
    /// Deliver a lifecycle event to the app hosted in a window.
    NotifyLifecycle {
        /// Target window.
        window_id: WindowId,
        /// Event to deliver.
        event: AppLifecycleEvent,
    },
    /// Publish a new content surface size to the app hosted in a window.
    SurfaceChanged {
        /// Target window.
        window_id: WindowId,
        /// New content size.
        surface: SurfaceSize,
    },
    /// Drop the per-window app session after its window left the state.
    ReleaseWindowSession(WindowId),
}

impl RuntimeEffect {
    /// Returns whether the effect must run before the new state is committed.
    ///
    /// `Closing` is delivered while the window is still mounted so hosted apps can release timers
    /// and listeners before their view is detached.
    pub fn runs_before_commit(&self) -> bool {
        matches!(
            self,
            Self::NotifyLifecycle {
                event: AppLifecycleEvent::Closing,
                ..
            }
        )
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for actions that left the state unchanged.
pub enum ReducerError {
    /// The target window id was not found in the current state.
    #[error("window not found")]
    WindowNotFound,
    /// An open gesture was dropped.
    #[error("open suppressed: {0}")]
    OpenSuppressed(SuppressReason),
    /// Every generated window id collided with an open window.
    #[error("could not mint a unique window id")]
    WindowIdExhausted,
}

impl ReducerError {
    /// Returns whether the error is an expected no-op rather than a fault worth logging.
    pub fn is_ignorable(&self) -> bool {
        matches!(self, Self::WindowNotFound | Self::OpenSuppressed(_))
    }
}

#[derive(Clone)]
/// Time and randomness consumed by [`reduce_desktop`].
pub struct ReducerEnv {
    /// Wall clock for the open debounce and window ids.
    pub clock: Rc<dyn Clock>,
    /// Random source for window id suffixes.
    pub entropy: Rc<dyn EntropySource>,
}

impl ReducerEnv {
    /// Creates an environment from explicit sources.
    pub fn new(clock: Rc<dyn Clock>, entropy: Rc<dyn EntropySource>) -> Self {
        Self { clock, entropy }
    }

    /// Host wall clock and a host-seeded random source.
    pub fn system() -> Self {
        Self::new(Rc::new(SystemClock), Rc::new(SmallRngEntropy::from_entropy()))
    }
}

/// Applies a [`DesktopAction`] to the desktop runtime state and collects resulting side effects.
///
/// On error the state is left exactly as it was.
///
/// # Errors
///
/// Returns [`ReducerError::WindowNotFound`] when an action references a window that is not
/// present, [`ReducerError::OpenSuppressed`] when an open gesture is dropped by the Recycle Bin
/// exclusion or the per-source debounce, and [`ReducerError::WindowIdExhausted`] when no unique
/// id could be minted.
pub fn reduce_desktop(
    state: &mut DesktopState,
    env: &ReducerEnv,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        DesktopAction::OpenWindow(req) => {
            let window_id = open_window(state, env, req)?;
            state.overlay = None;
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::CloseWindow { window_id } => {
            let index = state
                .windows
                .iter()
                .position(|w| w.id == window_id)
                .ok_or(ReducerError::WindowNotFound)?;
            effects.push(RuntimeEffect::NotifyLifecycle {
                window_id: window_id.clone(),
                event: AppLifecycleEvent::Closing,
            });
            state.windows.remove(index);
            state.taskbar.retain(|item| item.id != window_id);
            effects.push(RuntimeEffect::ReleaseWindowSession(window_id));
        }
        DesktopAction::FocusWindow { window_id } => {
            find_window_mut(state, &window_id)?;
            raise_to_front(state, &window_id).ok_or(ReducerError::WindowNotFound)?;
            state.overlay = None;
            effects.push(RuntimeEffect::NotifyLifecycle {
                window_id,
                event: AppLifecycleEvent::Focused,
            });
        }
        DesktopAction::MinimizeWindow { window_id } => {
            let was_visible = find_window_mut(state, &window_id)?.is_visible();
            let outcome =
                minimize_window(state, &window_id).ok_or(ReducerError::WindowNotFound)?;
            if was_visible && outcome != MinimizeOutcome::AlreadyDocked {
                effects.push(RuntimeEffect::NotifyLifecycle {
                    window_id,
                    event: AppLifecycleEvent::Minimized,
                });
            }
        }
        DesktopAction::RestoreFromTaskbar { window_id } => {
            let was_minimized = find_window_mut(state, &window_id)?.state.is_minimized();
            restore_from_taskbar(state, &window_id).ok_or(ReducerError::WindowNotFound)?;
            state.overlay = None;
            if was_minimized {
                effects.push(RuntimeEffect::NotifyLifecycle {
                    window_id: window_id.clone(),
                    event: AppLifecycleEvent::Restored,
                });
                effects.push(surface_changed(find_window_mut(state, &window_id)?));
            }
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::ToggleMaximize { window_id } => {
            find_window_mut(state, &window_id)?;
            if let Some(transition) = toggle_maximize(state, &window_id) {
                let event = match transition {
                    MaximizeTransition::Maximized => AppLifecycleEvent::Maximized,
                    MaximizeTransition::Restored => AppLifecycleEvent::Restored,
                };
                effects.push(RuntimeEffect::NotifyLifecycle {
                    window_id: window_id.clone(),
                    event,
                });
                effects.push(surface_changed(find_window_mut(state, &window_id)?));
            }
        }
        DesktopAction::SetViewport { viewport } => {
            for window_id in apply_viewport(state, viewport) {
                effects.push(surface_changed(find_window_mut(state, &window_id)?));
            }
        }
        DesktopAction::ToggleStartPanel => {
            state.overlay = if state.start_panel_open() {
                None
            } else {
                Some(DesktopOverlay::StartPanel {
                    z_index: state.z_order.next(),
                })
            };
        }
        DesktopAction::CloseStartPanel => {
            state.overlay = None;
        }
    }

    sync_taskbar(state);
    Ok(effects)
}

fn open_window(
    state: &mut DesktopState,
    env: &ReducerEnv,
    req: OpenWindowRequest,
) -> Result<WindowId, ReducerError> {
    let now_ms = env.clock.now_ms();
    if let Some(source) = req.source.as_ref() {
        if let Some(reason) = open_suppression(state, source, now_ms) {
            return Err(ReducerError::OpenSuppressed(reason));
        }
    }

    let window_id = mint_window_id(state, now_ms, env.entropy.as_ref())
        .ok_or(ReducerError::WindowIdExhausted)?;
    let size = req
        .size
        .unwrap_or(WindowSize::new(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT));
    let (geometry, window_state) = if req.start_maximized {
        (WindowGeometry::fill(state.viewport), WindowState::Maximized)
    } else {
        (
            WindowGeometry::centered(size, state.viewport),
            WindowState::Normal,
        )
    };

    if let Some(source) = req.source.as_ref() {
        state.last_open_ms.insert(source.clone(), now_ms);
    }
    let z_index = state.z_order.next();
    state.windows.push(WindowRecord {
        id: window_id.clone(),
        title: req.title,
        source: req.source,
        content: req.content,
        geometry,
        saved_geometry: None,
        state: window_state,
        z_index,
        controls: req.controls,
        fallback_size: req.fallback_size,
    });
    Ok(window_id)
}

fn surface_changed(window: &WindowRecord) -> RuntimeEffect {
    RuntimeEffect::SurfaceChanged {
        window_id: window.id.clone(),
        surface: window.geometry.content_surface(),
    }
}

fn find_window_mut<'a>(
    state: &'a mut DesktopState,
    window_id: &WindowId,
) -> Result<&'a mut WindowRecord, ReducerError> {
    state
        .window_mut(window_id)
        .ok_or(ReducerError::WindowNotFound)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{
        SourceAppId, WindowContent, WindowTransform, FALLBACK_RESTORE_HEIGHT,
        FALLBACK_RESTORE_WIDTH,
    };
    use crate::window_manager::{OPEN_DEBOUNCE_MS, Z_INDEX_BASE};
    use platform_host::ManualClock;

    struct Harness {
        state: DesktopState,
        clock: Rc<ManualClock>,
        env: ReducerEnv,
    }

    impl Harness {
        fn new() -> Self {
            Self::with_viewport(DesktopViewport {
                width: 1280,
                height: 800,
                taskbar_height: Some(48),
            })
        }

        fn with_viewport(viewport: DesktopViewport) -> Self {
            let clock = Rc::new(ManualClock::new(1_700_000_000_000));
            let env = ReducerEnv::new(clock.clone(), Rc::new(SmallRngEntropy::seeded(42)));
            Self {
                state: DesktopState::with_viewport(viewport),
                clock,
                env,
            }
        }

        fn dispatch(&mut self, action: DesktopAction) -> Result<Vec<RuntimeEffect>, ReducerError> {
            reduce_desktop(&mut self.state, &self.env, action)
        }

        fn open(&mut self, source: &str) -> WindowId {
            let req = OpenWindowRequest::from_source(
                SourceAppId::trusted(source),
                source,
                WindowContent::Placeholder {
                    app_name: source.to_string(),
                },
            );
            self.dispatch(DesktopAction::OpenWindow(req))
                .expect("open window");
            self.state.windows.last().expect("window").id.clone()
        }

        fn window(&self, id: &WindowId) -> &WindowRecord {
            self.state.window(id).expect("window")
        }

        fn assert_invariants(&self) {
            let mut ids: Vec<&WindowId> = self.state.windows.iter().map(|w| &w.id).collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), self.state.windows.len(), "window ids are unique");

            let minimized: Vec<&WindowId> = self
                .state
                .windows
                .iter()
                .filter(|w| w.state.is_minimized())
                .map(|w| &w.id)
                .collect();
            if self.state.viewport.has_taskbar() {
                let mut docked: Vec<&WindowId> =
                    self.state.taskbar.iter().map(|item| &item.id).collect();
                docked.sort();
                let mut minimized = minimized.clone();
                minimized.sort();
                assert_eq!(docked, minimized, "taskbar mirrors minimized windows");
            }

            for window in &self.state.windows {
                assert!(window.z_index <= self.state.z_order.current());
                assert!(window.z_index > Z_INDEX_BASE);
                if window.state == WindowState::Normal {
                    assert_eq!(window.saved_geometry, None);
                }
            }
        }
    }

    #[test]
    fn open_assigns_strictly_increasing_z_and_focuses_newest() {
        let mut h = Harness::new();
        let first = h.open("desktop.word");
        let second = h.open("desktop.excel");

        assert!(h.window(&second).z_index > h.window(&first).z_index);
        assert_eq!(h.state.focused_window_id(), Some(&second));
        assert_eq!(h.window(&first).geometry.width, DEFAULT_WINDOW_WIDTH);
        assert_eq!(
            h.window(&first).geometry.transform,
            WindowTransform::CenterOnAnchor
        );
        h.assert_invariants();
    }

    #[test]
    fn open_emits_input_focus_and_closes_start_panel() {
        let mut h = Harness::new();
        h.dispatch(DesktopAction::ToggleStartPanel).unwrap();
        assert!(h.state.start_panel_open());

        let req = OpenWindowRequest::new("Bing: rust", WindowContent::Terminal);
        let effects = h.dispatch(DesktopAction::OpenWindow(req)).unwrap();
        let id = h.state.windows[0].id.clone();

        assert_eq!(effects, vec![RuntimeEffect::FocusWindowInput(id)]);
        assert!(!h.state.start_panel_open());
    }

    #[test]
    fn recycle_bin_never_opens_a_window() {
        let mut h = Harness::new();
        let req = OpenWindowRequest::from_source(
            SourceAppId::recycle_bin(),
            "Corbeille",
            WindowContent::Placeholder {
                app_name: "Corbeille".into(),
            },
        );

        let err = h.dispatch(DesktopAction::OpenWindow(req)).unwrap_err();

        assert_eq!(err, ReducerError::OpenSuppressed(SuppressReason::RecycleBin));
        assert!(err.is_ignorable());
        assert!(h.state.windows.is_empty());
    }

    #[test]
    fn rapid_second_open_from_same_source_is_debounced() {
        let mut h = Harness::new();
        h.open("desktop.word");
        h.clock.advance(300);

        let req = OpenWindowRequest::from_source(
            SourceAppId::trusted("desktop.word"),
            "Word",
            WindowContent::Placeholder {
                app_name: "Word".into(),
            },
        );
        let err = h.dispatch(DesktopAction::OpenWindow(req.clone())).unwrap_err();
        assert_eq!(
            err,
            ReducerError::OpenSuppressed(SuppressReason::Debounced { elapsed_ms: 300 })
        );
        assert_eq!(h.state.windows.len(), 1);

        h.clock.advance(OPEN_DEBOUNCE_MS - 300);
        h.dispatch(DesktopAction::OpenWindow(req)).unwrap();
        assert_eq!(h.state.windows.len(), 2);
    }

    #[test]
    fn debounce_is_tracked_per_source() {
        let mut h = Harness::new();
        h.open("desktop.word");
        h.clock.advance(10);
        h.open("desktop.excel");
        assert_eq!(h.state.windows.len(), 2);
    }

    #[test]
    fn sourceless_requests_skip_the_debounce() {
        let mut h = Harness::new();
        for _ in 0..3 {
            let req = OpenWindowRequest::new("Bing: a", WindowContent::Terminal);
            h.dispatch(DesktopAction::OpenWindow(req)).unwrap();
        }
        assert_eq!(h.state.windows.len(), 3);
        h.assert_invariants();
    }

    #[test]
    fn minimize_docks_one_taskbar_item_even_when_repeated() {
        let mut h = Harness::new();
        let id = h.open("desktop.word");

        let effects = h
            .dispatch(DesktopAction::MinimizeWindow {
                window_id: id.clone(),
            })
            .unwrap();
        assert_eq!(
            effects,
            vec![RuntimeEffect::NotifyLifecycle {
                window_id: id.clone(),
                event: AppLifecycleEvent::Minimized,
            }]
        );
        let effects = h
            .dispatch(DesktopAction::MinimizeWindow {
                window_id: id.clone(),
            })
            .unwrap();
        assert!(effects.is_empty());

        assert_eq!(h.state.taskbar.len(), 1);
        assert_eq!(h.state.taskbar[0].label, "desktop.word");
        assert_eq!(h.state.focused_window_id(), None);
        h.assert_invariants();
    }

    #[test]
    fn taskbar_restore_removes_item_and_raises_above_all() {
        let mut h = Harness::new();
        let first = h.open("desktop.word");
        let second = h.open("desktop.excel");
        h.dispatch(DesktopAction::MinimizeWindow {
            window_id: first.clone(),
        })
        .unwrap();

        let effects = h
            .dispatch(DesktopAction::RestoreFromTaskbar {
                window_id: first.clone(),
            })
            .unwrap();

        assert!(h.state.taskbar.is_empty());
        assert_eq!(h.window(&first).state, WindowState::Normal);
        assert!(h.window(&first).z_index > h.window(&second).z_index);
        assert_eq!(h.state.focused_window_id(), Some(&first));
        assert!(effects.contains(&RuntimeEffect::NotifyLifecycle {
            window_id: first.clone(),
            event: AppLifecycleEvent::Restored,
        }));
        assert_eq!(effects.last(), Some(&RuntimeEffect::FocusWindowInput(first)));
        h.assert_invariants();
    }

    #[test]
    fn minimized_while_maximized_restores_maximized() {
        let mut h = Harness::new();
        let id = h.open("desktop.word");
        h.dispatch(DesktopAction::ToggleMaximize {
            window_id: id.clone(),
        })
        .unwrap();
        h.dispatch(DesktopAction::MinimizeWindow {
            window_id: id.clone(),
        })
        .unwrap();
        assert!(!h.window(&id).state.is_maximized());

        h.dispatch(DesktopAction::RestoreFromTaskbar {
            window_id: id.clone(),
        })
        .unwrap();

        assert_eq!(h.window(&id).state, WindowState::Maximized);
        assert_eq!(h.window(&id).geometry, WindowGeometry::fill(h.state.viewport));
        h.assert_invariants();
    }

    #[test]
    fn toggle_maximize_twice_restores_exact_geometry() {
        let mut h = Harness::new();
        let id = h.open("desktop.word");
        let before = h.window(&id).geometry;

        let effects = h
            .dispatch(DesktopAction::ToggleMaximize {
                window_id: id.clone(),
            })
            .unwrap();
        let maximized = h.window(&id).geometry;
        assert_eq!(
            (maximized.left, maximized.top, maximized.width, maximized.height),
            (0, 0, 1280, 752)
        );
        assert_eq!(maximized.transform, WindowTransform::None);
        assert_eq!(h.window(&id).saved_geometry, Some(before));
        assert_eq!(
            effects,
            vec![
                RuntimeEffect::NotifyLifecycle {
                    window_id: id.clone(),
                    event: AppLifecycleEvent::Maximized,
                },
                RuntimeEffect::SurfaceChanged {
                    window_id: id.clone(),
                    surface: SurfaceSize::new(1280, 712),
                },
            ]
        );

        h.dispatch(DesktopAction::ToggleMaximize {
            window_id: id.clone(),
        })
        .unwrap();
        assert_eq!(h.window(&id).geometry, before);
        assert_eq!(h.window(&id).saved_geometry, None);
        h.assert_invariants();
    }

    #[test]
    fn restoring_without_snapshot_uses_centered_fallback() {
        let mut h = Harness::with_viewport(DesktopViewport {
            width: 1000,
            height: 848,
            taskbar_height: Some(48),
        });
        let req = OpenWindowRequest::from_source(
            SourceAppId::trusted("desktop.word"),
            "Word",
            WindowContent::Placeholder {
                app_name: "Word".into(),
            },
        )
        .maximized();
        h.dispatch(DesktopAction::OpenWindow(req)).unwrap();
        let id = h.state.windows[0].id.clone();
        assert_eq!(h.window(&id).state, WindowState::Maximized);

        h.dispatch(DesktopAction::ToggleMaximize {
            window_id: id.clone(),
        })
        .unwrap();

        assert_eq!(
            h.window(&id).geometry,
            WindowGeometry {
                left: 500,
                top: 400,
                width: FALLBACK_RESTORE_WIDTH,
                height: FALLBACK_RESTORE_HEIGHT,
                transform: WindowTransform::CenterOnAnchor,
            }
        );
    }

    #[test]
    fn toggle_maximize_ignores_minimized_windows() {
        let mut h = Harness::new();
        let id = h.open("desktop.word");
        h.dispatch(DesktopAction::MinimizeWindow {
            window_id: id.clone(),
        })
        .unwrap();
        let before = h.state.clone();

        let effects = h
            .dispatch(DesktopAction::ToggleMaximize { window_id: id })
            .unwrap();

        assert!(effects.is_empty());
        assert_eq!(h.state, before);
    }

    #[test]
    fn close_is_idempotent_and_drops_taskbar_item() {
        let mut h = Harness::new();
        let id = h.open("desktop.word");
        h.dispatch(DesktopAction::MinimizeWindow {
            window_id: id.clone(),
        })
        .unwrap();

        let effects = h
            .dispatch(DesktopAction::CloseWindow {
                window_id: id.clone(),
            })
            .unwrap();
        assert!(effects[0].runs_before_commit());
        assert_eq!(effects[1], RuntimeEffect::ReleaseWindowSession(id.clone()));
        assert!(h.state.windows.is_empty());
        assert!(h.state.taskbar.is_empty());

        let before = h.state.clone();
        let err = h
            .dispatch(DesktopAction::CloseWindow { window_id: id })
            .unwrap_err();
        assert_eq!(err, ReducerError::WindowNotFound);
        assert!(err.is_ignorable());
        assert_eq!(h.state, before);
    }

    #[test]
    fn pointer_focus_raises_every_time() {
        let mut h = Harness::new();
        let first = h.open("desktop.word");
        let _second = h.open("desktop.excel");

        h.dispatch(DesktopAction::FocusWindow {
            window_id: first.clone(),
        })
        .unwrap();
        let z1 = h.window(&first).z_index;
        h.dispatch(DesktopAction::FocusWindow {
            window_id: first.clone(),
        })
        .unwrap();

        assert!(h.window(&first).z_index > z1);
        assert_eq!(h.state.focused_window_id(), Some(&first));
    }

    #[test]
    fn start_panel_stacks_above_existing_windows() {
        let mut h = Harness::new();
        let id = h.open("desktop.word");
        h.dispatch(DesktopAction::ToggleStartPanel).unwrap();

        let Some(DesktopOverlay::StartPanel { z_index }) = h.state.overlay else {
            panic!("start panel should be open");
        };
        assert!(z_index > h.window(&id).z_index);

        h.dispatch(DesktopAction::ToggleStartPanel).unwrap();
        assert_eq!(h.state.overlay, None);
    }

    #[test]
    fn missing_taskbar_hides_without_docking_until_taskbar_appears() {
        let mut h = Harness::with_viewport(DesktopViewport {
            width: 1280,
            height: 800,
            taskbar_height: None,
        });
        let id = h.open("desktop.word");
        h.dispatch(DesktopAction::MinimizeWindow {
            window_id: id.clone(),
        })
        .unwrap();
        assert!(h.window(&id).state.is_minimized());
        assert!(h.state.taskbar.is_empty());

        h.dispatch(DesktopAction::SetViewport {
            viewport: DesktopViewport {
                width: 1280,
                height: 800,
                taskbar_height: Some(48),
            },
        })
        .unwrap();
        assert_eq!(h.state.taskbar.len(), 1);
        h.assert_invariants();
    }

    #[test]
    fn viewport_change_refills_maximized_windows_only() {
        let mut h = Harness::new();
        let normal = h.open("desktop.word");
        let maximized = h.open("desktop.excel");
        h.dispatch(DesktopAction::ToggleMaximize {
            window_id: maximized.clone(),
        })
        .unwrap();
        let normal_before = h.window(&normal).geometry;

        let viewport = DesktopViewport {
            width: 900,
            height: 700,
            taskbar_height: Some(40),
        };
        let effects = h.dispatch(DesktopAction::SetViewport { viewport }).unwrap();

        assert_eq!(h.window(&normal).geometry, normal_before);
        assert_eq!(h.window(&maximized).geometry.height, 660);
        assert_eq!(
            effects,
            vec![RuntimeEffect::SurfaceChanged {
                window_id: maximized,
                surface: SurfaceSize::new(900, 620),
            }]
        );
    }

    #[test]
    fn unknown_ids_leave_state_untouched() {
        let mut h = Harness::new();
        h.open("desktop.word");
        let ghost = WindowId::from_parts("0", "000000");
        let before = h.state.clone();

        for action in [
            DesktopAction::FocusWindow {
                window_id: ghost.clone(),
            },
            DesktopAction::MinimizeWindow {
                window_id: ghost.clone(),
            },
            DesktopAction::RestoreFromTaskbar {
                window_id: ghost.clone(),
            },
            DesktopAction::ToggleMaximize {
                window_id: ghost.clone(),
            },
        ] {
            assert_eq!(h.dispatch(action), Err(ReducerError::WindowNotFound));
        }
        assert_eq!(h.state, before);
    }

    #[test]
    fn id_exhaustion_is_reported_and_not_ignorable() {
        struct Stuck;
        impl EntropySource for Stuck {
            fn next_u64(&self) -> u64 {
                7
            }
            fn below(&self, _upper: u32) -> u32 {
                0
            }
        }

        let mut h = Harness::new();
        h.env = ReducerEnv::new(h.clock.clone(), Rc::new(Stuck));
        let req = || OpenWindowRequest::new("Bing: x", WindowContent::Terminal);
        h.dispatch(DesktopAction::OpenWindow(req())).unwrap();

        let err = h.dispatch(DesktopAction::OpenWindow(req())).unwrap_err();

        assert_eq!(err, ReducerError::WindowIdExhausted);
        assert!(!err.is_ignorable());
        assert_eq!(h.state.windows.len(), 1);
    }
}
