//! Shared window-manager transition helpers used by the desktop reducer.

use platform_host::EntropySource;

use crate::model::{
    DesktopState, DesktopViewport, RestoreState, SourceAppId, TaskbarItem, WindowGeometry,
    WindowId, WindowState,
};

/// First value handed out by [`ZOrderCounter::next`] is one above this base.
pub const Z_INDEX_BASE: u64 = 20_000;
/// Window-opening gestures for the same source within this window are dropped.
pub const OPEN_DEBOUNCE_MS: u64 = 600;
/// Attempts made to mint an unused window id before giving up.
pub const WINDOW_ID_ATTEMPTS: usize = 8;

const ID_SUFFIX_LEN: usize = 6;

/// Monotonic stacking counter shared by windows and desktop overlays.
///
/// Owned by [`DesktopState`] and only advanced from the reducer, so every raise yields a value
/// strictly above all previously assigned ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZOrderCounter {
    last: u64,
}

impl ZOrderCounter {
    pub fn next(&mut self) -> u64 {
        self.last = self.last.saturating_add(1);
        self.last
    }

    pub fn current(&self) -> u64 {
        self.last
    }
}

impl Default for ZOrderCounter {
    fn default() -> Self {
        Self { last: Z_INDEX_BASE }
    }
}

/// Why an open gesture produced no window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressReason {
    /// The Recycle Bin icon never opens a window.
    RecycleBin,
    /// The same source opened a window less than [`OPEN_DEBOUNCE_MS`] ago.
    Debounced { elapsed_ms: u64 },
}

impl std::fmt::Display for SuppressReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RecycleBin => f.write_str("recycle bin"),
            Self::Debounced { elapsed_ms } => write!(f, "debounced after {elapsed_ms}ms"),
        }
    }
}

/// Checks the Recycle Bin exclusion and the per-source debounce for an open gesture.
pub fn open_suppression(
    state: &DesktopState,
    source: &SourceAppId,
    now_ms: u64,
) -> Option<SuppressReason> {
    if source.is_recycle_bin() {
        return Some(SuppressReason::RecycleBin);
    }
    let last = *state.last_open_ms.get(source)?;
    // A clock that went backwards counts as zero elapsed.
    let elapsed_ms = now_ms.saturating_sub(last);
    (elapsed_ms < OPEN_DEBOUNCE_MS).then_some(SuppressReason::Debounced { elapsed_ms })
}

/// Formats `value` in lowercase base 36.
pub fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Mints a window id not currently used by any open window.
///
/// Returns `None` when [`WINDOW_ID_ATTEMPTS`] consecutive candidates collided.
pub fn mint_window_id(
    state: &DesktopState,
    now_ms: u64,
    entropy: &dyn EntropySource,
) -> Option<WindowId> {
    let timestamp = to_base36(now_ms);
    for _ in 0..WINDOW_ID_ATTEMPTS {
        let mut suffix = to_base36(entropy.next_u64());
        suffix.truncate(ID_SUFFIX_LEN);
        while suffix.len() < ID_SUFFIX_LEN {
            suffix.insert(0, '0');
        }
        let candidate = WindowId::from_parts(&timestamp, &suffix);
        if state.window(&candidate).is_none() {
            return Some(candidate);
        }
    }
    None
}

/// Gives `window_id` the next stacking value. Returns the new z-index.
pub fn raise_to_front(state: &mut DesktopState, window_id: &WindowId) -> Option<u64> {
    state.window(window_id)?;
    let z_index = state.z_order.next();
    let window = state.window_mut(window_id)?;
    window.z_index = z_index;
    Some(z_index)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Result of [`minimize_window`].
pub enum MinimizeOutcome {
    /// Window was hidden and a taskbar item now represents it.
    Docked,
    /// Window was already represented on the taskbar; it is only hidden again.
    AlreadyDocked,
    /// No taskbar chrome is present; the window is hidden without an item.
    HiddenWithoutTaskbar,
}

/// Hides a window and docks it on the taskbar.
pub fn minimize_window(
    state: &mut DesktopState,
    window_id: &WindowId,
) -> Option<MinimizeOutcome> {
    let has_taskbar = state.viewport.has_taskbar();
    let docked = state.taskbar_item(window_id).is_some();
    let window = state.window_mut(window_id)?;

    window.state = match window.state {
        WindowState::Normal => WindowState::Minimized {
            restore_to: RestoreState::Normal,
        },
        WindowState::Maximized => WindowState::Minimized {
            restore_to: RestoreState::Maximized,
        },
        minimized @ WindowState::Minimized { .. } => minimized,
    };
    let label = window.title.clone();

    if docked {
        return Some(MinimizeOutcome::AlreadyDocked);
    }
    if !has_taskbar {
        return Some(MinimizeOutcome::HiddenWithoutTaskbar);
    }
    state.taskbar.push(TaskbarItem {
        id: window_id.clone(),
        label,
    });
    Some(MinimizeOutcome::Docked)
}

/// Shows a minimized window again, drops its taskbar item, and raises it.
///
/// A window minimized while maximized comes back maximized against the current viewport.
pub fn restore_from_taskbar(state: &mut DesktopState, window_id: &WindowId) -> Option<u64> {
    let viewport = state.viewport;
    let window = state.window_mut(window_id)?;
    match window.state {
        WindowState::Minimized {
            restore_to: RestoreState::Maximized,
        } => {
            window.geometry = WindowGeometry::fill(viewport);
            window.state = WindowState::Maximized;
        }
        WindowState::Minimized {
            restore_to: RestoreState::Normal,
        } => {
            window.state = WindowState::Normal;
        }
        WindowState::Normal | WindowState::Maximized => {}
    }
    state.taskbar.retain(|item| &item.id != window_id);
    raise_to_front(state, window_id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Direction taken by [`toggle_maximize`].
pub enum MaximizeTransition {
    Maximized,
    Restored,
}

/// Flips a visible window between normal and maximized.
///
/// Maximizing snapshots the current geometry; restoring reapplies it, or falls back to the
/// window's fallback size centered on the viewport. Minimized windows are left untouched.
pub fn toggle_maximize(
    state: &mut DesktopState,
    window_id: &WindowId,
) -> Option<MaximizeTransition> {
    let viewport = state.viewport;
    let window = state.window_mut(window_id)?;
    match window.state {
        WindowState::Normal => {
            window.saved_geometry = Some(window.geometry);
            window.geometry = WindowGeometry::fill(viewport);
            window.state = WindowState::Maximized;
            Some(MaximizeTransition::Maximized)
        }
        WindowState::Maximized => {
            let fallback = window.fallback_size;
            window.geometry = window
                .saved_geometry
                .take()
                .unwrap_or_else(|| WindowGeometry::centered(fallback, viewport));
            window.state = WindowState::Normal;
            Some(MaximizeTransition::Restored)
        }
        WindowState::Minimized { .. } => None,
    }
}

/// Applies a new viewport, refilling maximized windows. Returns the ids whose geometry changed.
pub fn apply_viewport(state: &mut DesktopState, viewport: DesktopViewport) -> Vec<WindowId> {
    state.viewport = viewport;
    let fill = WindowGeometry::fill(viewport);
    let mut changed = Vec::new();
    for window in &mut state.windows {
        if window.state.is_maximized() && window.geometry != fill {
            window.geometry = fill;
            changed.push(window.id.clone());
        }
    }
    sync_taskbar(state);
    changed
}

/// Re-establishes the one-to-one mapping between minimized windows and taskbar items.
pub fn sync_taskbar(state: &mut DesktopState) {
    let windows = &state.windows;
    state.taskbar.retain(|item| {
        windows
            .iter()
            .any(|w| w.id == item.id && w.state.is_minimized())
    });
    if !state.viewport.has_taskbar() {
        return;
    }
    for window in &state.windows {
        if window.state.is_minimized() && !state.taskbar.iter().any(|item| item.id == window.id) {
            state.taskbar.push(TaskbarItem {
                id: window.id.clone(),
                label: window.title.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform_host::SmallRngEntropy;

    struct FixedEntropy(u64);

    impl EntropySource for FixedEntropy {
        fn next_u64(&self) -> u64 {
            self.0
        }

        fn below(&self, _upper: u32) -> u32 {
            0
        }
    }

    #[test]
    fn base36_matches_known_values() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_700_000_000_000), "loyw3v28");
    }

    #[test]
    fn z_counter_starts_above_base_and_only_grows() {
        let mut counter = ZOrderCounter::default();
        assert_eq!(counter.current(), Z_INDEX_BASE);
        let first = counter.next();
        let second = counter.next();
        assert_eq!(first, Z_INDEX_BASE + 1);
        assert!(second > first);
    }

    #[test]
    fn minted_ids_follow_the_token_shape() {
        let state = DesktopState::default();
        let entropy = SmallRngEntropy::seeded(11);
        let id = mint_window_id(&state, 1_700_000_000_000, &entropy).expect("id");
        let parts: Vec<&str> = id.as_str().split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "win");
        assert_eq!(parts[1], "loyw3v28");
        assert_eq!(parts[2].len(), 6);
    }

    #[test]
    fn short_random_suffixes_are_zero_padded() {
        let state = DesktopState::default();
        let id = mint_window_id(&state, 36, &FixedEntropy(35)).expect("id");
        assert_eq!(id.as_str(), "win-10-00000z");
    }

    #[test]
    fn debounce_treats_backwards_clock_as_zero_elapsed() {
        let mut state = DesktopState::default();
        let source = SourceAppId::trusted("desktop.word");
        state.last_open_ms.insert(source.clone(), 5_000);
        assert_eq!(
            open_suppression(&state, &source, 4_000),
            Some(SuppressReason::Debounced { elapsed_ms: 0 })
        );
        assert_eq!(open_suppression(&state, &source, 5_600), None);
    }
}
