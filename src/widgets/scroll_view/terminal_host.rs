// tokio-scrollbar/src/widgets/scroll_view/terminal_host.rs
use std::{
    collections::HashSet,
    sync::{
        Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use tracing::trace;

use crate::{
    AppliedPositions, Axis, Binding, EventBinder, Extents, Measure, Platform, PlatformFeatures,
    ScrollSurface, Visibility,
};

/// How long an update flash keeps the bar on screen.
pub const FLASH_LENGTH: Duration = Duration::from_millis(400);

#[derive(Debug)]
struct HostState {
    extents: Extents,
    positions: AppliedPositions,
    disabled: bool,
    visible: bool,
    selection_suppressed: bool,
    bindings: HashSet<Binding>,
    flash_length: Duration,
    flash_deadline: Option<Instant>,
}

/// Capabilities of a terminal viewport, measured in cells.
///
/// The widget writes extents before each draw and reads the applied
/// positions back when rendering. Hide callbacks may run on a tokio task, so
/// state sits behind a mutex and changes raise a redraw flag.
#[derive(Debug)]
pub struct TerminalHost {
    state: Mutex<HostState>,
    redraw: AtomicBool,
}

impl Default for TerminalHost {
    fn default() -> Self {
        Self {
            state: Mutex::new(HostState {
                extents: Extents::default(),
                positions: AppliedPositions::default(),
                disabled: false,
                visible: true,
                selection_suppressed: false,
                bindings: HashSet::new(),
                flash_length: FLASH_LENGTH,
                flash_deadline: None,
            }),
            redraw: AtomicBool::new(true),
        }
    }
}

impl TerminalHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns true when the extents differ from the previous ones.
    pub fn set_extents(&self, extents: Extents) -> bool {
        let mut state = self.state();
        let changed = state.extents != extents;
        state.extents = extents;
        changed
    }

    pub fn extents(&self) -> Extents {
        self.state().extents
    }

    pub fn positions(&self) -> AppliedPositions {
        self.state().positions
    }

    pub fn is_visible(&self) -> bool {
        self.state().visible
    }

    pub fn is_disabled(&self) -> bool {
        self.state().disabled
    }

    pub fn is_selection_suppressed(&self) -> bool {
        self.state().selection_suppressed
    }

    pub fn is_bound(&self, binding: Binding) -> bool {
        self.state().bindings.contains(&binding)
    }

    pub fn bound_count(&self) -> usize {
        self.state().bindings.len()
    }

    pub fn set_flash_length(&self, flash_length: Duration) {
        self.state().flash_length = flash_length;
    }

    /// True while an update flash is waiting to expire.
    pub fn is_flashing(&self) -> bool {
        self.state().flash_deadline.is_some()
    }

    /// Hide the bar once an update flash has run its course. Called after
    /// each draw; returns true when the bar was hidden.
    pub fn settle_flash(&self) -> bool {
        let expired = {
            let mut state = self.state();
            match state.flash_deadline {
                Some(deadline) if Instant::now() >= deadline => {
                    state.flash_deadline = None;
                    state.visible = false;
                    true
                }
                _ => false,
            }
        };
        if expired {
            self.request_redraw();
        }
        expired
    }

    pub fn request_redraw(&self) {
        self.redraw.store(true, Ordering::Release);
    }

    pub fn needs_redraw(&self) -> bool {
        self.redraw.load(Ordering::Acquire)
    }

    pub fn take_redraw(&self) -> bool {
        self.redraw.swap(false, Ordering::AcqRel)
    }

    fn set_visible(&self, visible: bool) {
        let changed = {
            let mut state = self.state();
            let changed = state.visible != visible;
            state.visible = visible;
            state.flash_deadline = None;
            changed
        };
        if changed {
            self.request_redraw();
        }
    }
}

impl Measure for TerminalHost {
    fn measure(&self, _axis: Axis) -> Extents {
        self.extents()
    }
}

impl ScrollSurface for TerminalHost {
    fn apply_positions(&self, positions: AppliedPositions) {
        self.state().positions = positions;
        self.request_redraw();
    }

    fn set_disabled(&self, disabled: bool) {
        self.state().disabled = disabled;
    }

    fn set_selection_suppressed(&self, suppressed: bool) {
        self.state().selection_suppressed = suppressed;
    }
}

impl Visibility for TerminalHost {
    fn show(&self) {
        self.set_visible(true);
    }

    fn hide(&self) {
        self.set_visible(false);
    }

    // No fade in a terminal: the bar stays up for the flash length, then the
    // next draw after the deadline hides it.
    fn flash(&self) {
        {
            let mut state = self.state();
            state.visible = true;
            state.flash_deadline = Some(Instant::now() + state.flash_length);
        }
        self.request_redraw();
    }
}

impl EventBinder for TerminalHost {
    fn bind(&self, binding: Binding) {
        trace!(?binding, "bind");
        self.state().bindings.insert(binding);
    }

    fn unbind(&self, binding: Binding) {
        trace!(?binding, "unbind");
        self.state().bindings.remove(&binding);
    }
}

impl Platform for TerminalHost {
    fn features(&self) -> PlatformFeatures {
        PlatformFeatures {
            touch_events: false,
            wheel: true,
            document_mode: None,
            mouse_wheel: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_bindings_and_visibility() {
        let host = TerminalHost::new();
        assert!(host.take_redraw());

        host.bind(Binding::WindowResize);
        host.bind(Binding::WindowResize);
        assert_eq!(host.bound_count(), 1);
        host.unbind(Binding::WindowResize);
        host.unbind(Binding::WindowResize);
        assert_eq!(host.bound_count(), 0);

        host.hide();
        assert!(!host.is_visible());
        assert!(host.take_redraw());
        host.hide();
        assert!(!host.needs_redraw());
    }

    #[test]
    fn flash_shows_until_settled() {
        let host = TerminalHost::new();
        host.hide();
        host.set_flash_length(Duration::ZERO);
        host.take_redraw();

        host.flash();
        assert!(host.is_visible());
        assert!(host.is_flashing());
        assert!(host.take_redraw());

        assert!(host.settle_flash());
        assert!(!host.is_visible());
        assert!(!host.is_flashing());
        assert!(host.needs_redraw());
        assert!(!host.settle_flash());
    }

    #[test]
    fn show_during_flash_keeps_the_bar_up() {
        let host = TerminalHost::new();
        host.set_flash_length(Duration::ZERO);
        host.flash();
        host.show();

        assert!(!host.is_flashing());
        assert!(!host.settle_flash());
        assert!(host.is_visible());
    }

    #[test]
    fn reports_extent_changes() {
        let host = TerminalHost::new();
        let extents = Extents {
            viewport: 10.0,
            content: 40.0,
            track_origin: 1.0,
        };
        assert!(host.set_extents(extents));
        assert!(!host.set_extents(extents));
        assert_eq!(host.measure(Axis::Y), extents);
    }
}
