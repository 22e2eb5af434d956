// tokio-scrollbar/src/widgets/scrollbar/flasher.rs
use std::{sync::Arc, time::Duration};

use super::{Scheduler, TimerHandle, Visibility};

/// How long the bar stays visible after the last wheel event.
pub const WHEEL_HIDE_DELAY: Duration = Duration::from_millis(100);

/// Shows the bar on interaction and fades it out again.
///
/// Inert when the bar is always visible. Nothing here feeds back into
/// positions.
pub struct VisibilityFlasher {
    enabled: bool,
    visibility: Arc<dyn Visibility>,
    scheduler: Arc<dyn Scheduler>,
    pending_hide: Option<TimerHandle>,
}

impl std::fmt::Debug for VisibilityFlasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilityFlasher")
            .field("enabled", &self.enabled)
            .field("pending_hide", &self.pending_hide)
            .finish()
    }
}

impl VisibilityFlasher {
    pub fn new(
        always_visible: bool,
        visibility: Arc<dyn Visibility>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        Self {
            enabled: !always_visible,
            visibility,
            scheduler,
            pending_hide: None,
        }
    }

    /// Hidden resting state set up at initialization.
    pub fn conceal(&self) {
        if self.enabled {
            self.visibility.hide();
        }
    }

    /// Flash after the geometry changed.
    pub fn flash(&self) {
        if self.enabled {
            self.visibility.flash();
        }
    }

    /// A drag or touch gesture started.
    pub fn interaction_started(&mut self) {
        if self.enabled {
            self.cancel_pending();
            self.visibility.show();
        }
    }

    /// A wheel event arrived: show now, hide once wheeling stops.
    pub fn wheeled(&mut self) {
        if !self.enabled {
            return;
        }
        self.cancel_pending();
        self.visibility.show();

        let visibility = self.visibility.clone();
        let handle = self
            .scheduler
            .schedule(Box::new(move || visibility.hide()), WHEEL_HIDE_DELAY);
        self.pending_hide = Some(handle);
    }

    /// The gesture ended: hide without delay.
    pub fn interaction_ended(&self) {
        if self.enabled {
            self.visibility.hide();
        }
    }

    pub fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending_hide.take() {
            self.scheduler.cancel(handle);
        }
    }

    pub fn has_pending_hide(&self) -> bool {
        self.pending_hide.is_some()
    }
}
