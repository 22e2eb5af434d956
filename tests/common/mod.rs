// Shared host double for the controller tests.
#![allow(dead_code)]

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use tokio_scrollbar::{
    AppliedPositions, Axis, Binding, Capabilities, Deferred, EventBinder, Extents, Measure,
    Platform, PlatformFeatures, Scheduler, ScrollSurface, ScrollbarController, ScrollbarOptions,
    TimerHandle, TokioScheduler, Visibility,
};

#[derive(Debug, Default)]
pub struct HostState {
    pub extents: Extents,
    pub features: PlatformFeatures,
    pub applied: Vec<AppliedPositions>,
    pub disabled: bool,
    pub selection_suppressed: bool,
    pub shows: usize,
    pub hides: usize,
    pub bindings: HashSet<Binding>,
    pub unbinds: usize,
}

/// Records every capability call the controller makes.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub state: Mutex<HostState>,
}

impl RecordingHost {
    pub fn new(viewport: f64, content: f64) -> Arc<Self> {
        let host = Arc::new(Self::default());
        host.resize(viewport, content);
        host
    }

    pub fn with_features(self: Arc<Self>, features: PlatformFeatures) -> Arc<Self> {
        self.state.lock().unwrap().features = features;
        self
    }

    pub fn resize(&self, viewport: f64, content: f64) {
        let mut state = self.state.lock().unwrap();
        state.extents = Extents {
            viewport,
            content,
            track_origin: 0.0,
        };
    }

    pub fn last_applied(&self) -> AppliedPositions {
        self.state
            .lock()
            .unwrap()
            .applied
            .last()
            .copied()
            .unwrap_or_default()
    }

    pub fn visibility_counts(&self) -> (usize, usize) {
        let state = self.state.lock().unwrap();
        (state.shows, state.hides)
    }

    pub fn is_bound(&self, binding: Binding) -> bool {
        self.state.lock().unwrap().bindings.contains(&binding)
    }

    pub fn bound_count(&self) -> usize {
        self.state.lock().unwrap().bindings.len()
    }

    pub fn is_disabled(&self) -> bool {
        self.state.lock().unwrap().disabled
    }

    pub fn is_selection_suppressed(&self) -> bool {
        self.state.lock().unwrap().selection_suppressed
    }
}

impl Measure for RecordingHost {
    fn measure(&self, _axis: Axis) -> Extents {
        self.state.lock().unwrap().extents
    }
}

impl ScrollSurface for RecordingHost {
    fn apply_positions(&self, positions: AppliedPositions) {
        self.state.lock().unwrap().applied.push(positions);
    }

    fn set_disabled(&self, disabled: bool) {
        self.state.lock().unwrap().disabled = disabled;
    }

    fn set_selection_suppressed(&self, suppressed: bool) {
        self.state.lock().unwrap().selection_suppressed = suppressed;
    }
}

impl Visibility for RecordingHost {
    fn show(&self) {
        self.state.lock().unwrap().shows += 1;
    }

    fn hide(&self) {
        self.state.lock().unwrap().hides += 1;
    }
}

impl EventBinder for RecordingHost {
    fn bind(&self, binding: Binding) {
        self.state.lock().unwrap().bindings.insert(binding);
    }

    fn unbind(&self, binding: Binding) {
        let mut state = self.state.lock().unwrap();
        state.bindings.remove(&binding);
        state.unbinds += 1;
    }
}

impl Platform for RecordingHost {
    fn features(&self) -> PlatformFeatures {
        self.state.lock().unwrap().features
    }
}

/// Scheduler that only remembers what was scheduled.
#[derive(Default)]
pub struct ManualScheduler {
    pub scheduled: Mutex<Vec<TimerHandle>>,
    pub cancelled: Mutex<Vec<TimerHandle>>,
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, _callback: Deferred, _delay: std::time::Duration) -> TimerHandle {
        let mut scheduled = self.scheduled.lock().unwrap();
        let handle = TimerHandle::new(scheduled.len() as u64);
        scheduled.push(handle);
        handle
    }

    fn cancel(&self, handle: TimerHandle) {
        self.cancelled.lock().unwrap().push(handle);
    }
}

pub fn controller(host: &Arc<RecordingHost>, options: ScrollbarOptions) -> ScrollbarController {
    let capabilities = Capabilities::from_host(host.clone(), Arc::new(ManualScheduler::default()));
    ScrollbarController::new(options, capabilities)
}

pub fn controller_with_scheduler(
    host: &Arc<RecordingHost>,
    options: ScrollbarOptions,
    scheduler: Arc<dyn Scheduler>,
) -> ScrollbarController {
    ScrollbarController::new(options, Capabilities::from_host(host.clone(), scheduler))
}

/// Must run inside a tokio runtime.
pub fn tokio_controller(host: &Arc<RecordingHost>, options: ScrollbarOptions) -> ScrollbarController {
    controller_with_scheduler(host, options, Arc::new(TokioScheduler::new()))
}
