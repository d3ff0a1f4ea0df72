//! Bookkeeping for the browser resources a running game holds.
//!
//! The component stores timer and listener handles here as release callbacks, so the rules for
//! letting go of them stay testable without a DOM.

use desktop_app_contract::{AppLifecycleEvent, SurfaceSize};

use crate::canvas_surface;
use crate::session::{GameSummary, KeyOutcome, TerminalSession};
use crate::snake::GridSize;

/// Release callbacks for the timer and window listeners of one game.
#[derive(Default)]
pub(crate) struct GameResources {
    releases: Vec<Box<dyn FnOnce()>>,
}

impl GameResources {
    /// Keeps `release` until the game ends.
    pub(crate) fn hold(&mut self, release: impl FnOnce() + 'static) {
        self.releases.push(Box::new(release));
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    /// Runs every held release callback once. Returns how many ran.
    pub(crate) fn release_all(&mut self) -> usize {
        let released = self.releases.len();
        for release in self.releases.drain(..) {
            release();
        }
        released
    }
}

/// What a running game does when its window reports a lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LifecycleReaction {
    /// End the game and release its resources before the window unmounts.
    Teardown,
    /// Fit the game to the output area again once the window is laid out.
    Remeasure,
    Ignore,
}

pub(crate) fn lifecycle_reaction(event: AppLifecycleEvent) -> LifecycleReaction {
    match event {
        AppLifecycleEvent::Closing | AppLifecycleEvent::Closed => LifecycleReaction::Teardown,
        event if event.resizes_surface() => LifecycleReaction::Remeasure,
        _ => LifecycleReaction::Ignore,
    }
}

/// Grid for a measured output area.
///
/// A hidden output (a minimized window is `display:none`) measures 0×0 and yields `None`, so
/// the game keeps its grid instead of shrinking to the minimum surface.
pub(crate) fn playfield_grid(
    measured: SurfaceSize,
    viewport_height: Option<i32>,
) -> Option<GridSize> {
    if measured.width <= 0 || measured.height <= 0 {
        return None;
    }
    Some(GridSize::from_surface(canvas_surface(measured, viewport_height)))
}

/// Advances the game one tick. Resources are released when the tick ended it.
pub(crate) fn advance(
    session: &mut TerminalSession,
    resources: &mut GameResources,
) -> Option<GameSummary> {
    let summary = session.tick()?;
    resources.release_all();
    Some(summary)
}

/// Routes a key press to the game. Resources are released when the key ended it.
pub(crate) fn press_key(
    session: &mut TerminalSession,
    resources: &mut GameResources,
    key: &str,
) -> KeyOutcome {
    let outcome = session.handle_key(key);
    if let KeyOutcome::Ended(_) = outcome {
        resources.release_all();
    }
    outcome
}

/// Stops a game whose window is going away.
pub(crate) fn teardown(
    session: &mut TerminalSession,
    resources: &mut GameResources,
) -> Option<GameSummary> {
    resources.release_all();
    session.dispose()
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::session::game_over_line;
    use platform_host::SmallRngEntropy;

    fn running_session() -> TerminalSession {
        let mut session = TerminalSession::new(Rc::new(SmallRngEntropy::seeded(5)));
        session.submit("snake", GridSize::new(6, 6));
        session
    }

    fn counted(resources: &mut GameResources, count: usize) -> Rc<Cell<usize>> {
        let released = Rc::new(Cell::new(0));
        for _ in 0..count {
            let released = Rc::clone(&released);
            resources.hold(move || released.set(released.get() + 1));
        }
        released
    }

    #[test]
    fn closing_tears_down_the_game() {
        let mut session = running_session();
        let mut resources = GameResources::default();
        let released = counted(&mut resources, 3);

        assert_eq!(
            lifecycle_reaction(AppLifecycleEvent::Closing),
            LifecycleReaction::Teardown
        );
        assert_eq!(
            teardown(&mut session, &mut resources),
            Some(GameSummary { score: 0 })
        );
        assert_eq!(released.get(), 3);
        assert!(resources.is_empty());
        assert!(session.input_enabled());

        assert_eq!(teardown(&mut session, &mut resources), None);
        assert_eq!(released.get(), 3);
    }

    #[test]
    fn game_over_releases_resources_once() {
        let mut session = running_session();
        let mut resources = GameResources::default();
        let released = counted(&mut resources, 3);

        let mut summary = None;
        for _ in 0..6 {
            summary = advance(&mut session, &mut resources);
            if summary.is_some() {
                break;
            }
            assert_eq!(released.get(), 0);
        }

        let score = summary.map(|summary| summary.score).unwrap_or(u32::MAX);
        assert_eq!(session.lines().last(), Some(&game_over_line(score)));
        assert_eq!(released.get(), 3);
        assert_eq!(advance(&mut session, &mut resources), None);
        assert_eq!(released.get(), 3);
    }

    #[test]
    fn only_escape_releases_on_key_presses() {
        let mut session = running_session();
        let mut resources = GameResources::default();
        let released = counted(&mut resources, 2);

        assert_eq!(
            press_key(&mut session, &mut resources, "ArrowUp"),
            KeyOutcome::Steered
        );
        assert_eq!(released.get(), 0);

        let outcome = press_key(&mut session, &mut resources, "Escape");
        assert!(matches!(outcome, KeyOutcome::Ended(_)));
        assert_eq!(released.get(), 2);
    }

    #[test]
    fn restore_and_maximize_remeasure_but_minimize_does_not() {
        assert_eq!(
            lifecycle_reaction(AppLifecycleEvent::Restored),
            LifecycleReaction::Remeasure
        );
        assert_eq!(
            lifecycle_reaction(AppLifecycleEvent::Maximized),
            LifecycleReaction::Remeasure
        );
        assert_eq!(
            lifecycle_reaction(AppLifecycleEvent::Minimized),
            LifecycleReaction::Ignore
        );
        assert_eq!(
            lifecycle_reaction(AppLifecycleEvent::Focused),
            LifecycleReaction::Ignore
        );
    }

    #[test]
    fn hidden_output_keeps_the_current_grid() {
        assert_eq!(playfield_grid(SurfaceSize::new(0, 0), Some(800)), None);
        assert_eq!(playfield_grid(SurfaceSize::new(700, 0), Some(800)), None);
        assert_eq!(
            playfield_grid(SurfaceSize::new(700, 380), Some(800)),
            Some(GridSize::new(43, 23))
        );
    }

    #[test]
    fn minimized_resize_then_restore_keeps_the_snake_intact() {
        let mut session = TerminalSession::new(Rc::new(SmallRngEntropy::seeded(5)));
        let konsole = GridSize::new(43, 23);
        session.submit("snake", konsole);

        if let Some(grid) = playfield_grid(SurfaceSize::new(0, 0), Some(800)) {
            session.resize(grid);
        }
        assert_eq!(session.game().map(|game| game.grid()), Some(konsole));

        if let Some(grid) = playfield_grid(SurfaceSize::new(700, 380), Some(800)) {
            session.resize(grid);
        }
        assert_eq!(session.game().map(|game| game.grid()), Some(konsole));
    }
}
