// tokio-scrollbar/src/widgets/scrollbar/host.rs
//! Capabilities the scrollbar controller consumes from its environment.
//!
//! Every trait takes `&self` so a single host object can be shared behind
//! `Arc` between the controller and deferred callbacks.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio_util::sync::CancellationToken;

use super::{Axis, WheelEventName};

/// Rendered extents along one axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Extents {
    /// Size of the visible window.
    pub viewport: f64,
    /// Full size of the scrollable content.
    pub content: f64,
    /// Offset of the track, in the same coordinates pointer events use.
    pub track_origin: f64,
}

/// Positions and sizes written to the visual elements.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AppliedPositions {
    pub thumb_offset: f64,
    /// Scroll offset of the content; the content is shifted by its negation.
    pub content_offset: f64,
    pub track_length: f64,
    pub thumb_length: f64,
}

pub trait Measure: Send + Sync {
    fn measure(&self, axis: Axis) -> Extents;
}

pub trait ScrollSurface: Send + Sync {
    fn apply_positions(&self, positions: AppliedPositions);
    /// Toggle the disabled look when the content fits.
    fn set_disabled(&self, disabled: bool);
    /// Suppress text selection on the document and element during a drag.
    fn set_selection_suppressed(&self, suppressed: bool);
}

pub trait Visibility: Send + Sync {
    fn show(&self);
    fn hide(&self);
    /// Briefly show the bar and let it fade again.
    fn flash(&self) {
        self.show();
        self.hide();
    }
}

pub type Deferred = Box<dyn FnOnce() + Send + 'static>;

/// Opaque handle of a scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

pub trait Scheduler: Send + Sync {
    fn schedule(&self, callback: Deferred, delay: Duration) -> TimerHandle;
    /// Cancelling a fired or already cancelled handle does nothing.
    fn cancel(&self, handle: TimerHandle);
}

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    ThumbPointerDown,
    TrackPointerDown,
    ViewportTouchStart,
    DocumentPointerMove,
    DocumentPointerUp,
    ThumbPointerUp,
    DocumentTouchMove,
    DocumentTouchEnd,
    DocumentTouchCancel,
    WindowResize,
    Wheel(WheelEventName),
}

pub trait EventBinder: Send + Sync {
    fn bind(&self, binding: Binding);
    fn unbind(&self, binding: Binding);
}

/// Capability flags probed once when the controller initializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformFeatures {
    pub touch_events: bool,
    /// `onwheel` is supported.
    pub wheel: bool,
    /// Legacy document mode, wheel events exist from mode 9 on.
    pub document_mode: Option<u32>,
    /// `onmousewheel` is supported.
    pub mouse_wheel: bool,
}

impl Default for PlatformFeatures {
    fn default() -> Self {
        Self {
            touch_events: false,
            wheel: true,
            document_mode: None,
            mouse_wheel: true,
        }
    }
}

pub trait Platform: Send + Sync {
    fn features(&self) -> PlatformFeatures;
}

/// Everything the controller needs from its host.
#[derive(Clone)]
pub struct Capabilities {
    pub measure: Arc<dyn Measure>,
    pub surface: Arc<dyn ScrollSurface>,
    pub visibility: Arc<dyn Visibility>,
    pub scheduler: Arc<dyn Scheduler>,
    pub events: Arc<dyn EventBinder>,
    pub platform: Arc<dyn Platform>,
}

impl Capabilities {
    /// Use one host object for every capability except scheduling.
    pub fn from_host<H>(host: Arc<H>, scheduler: Arc<dyn Scheduler>) -> Self
    where
        H: Measure + ScrollSurface + Visibility + EventBinder + Platform + 'static,
    {
        Self {
            measure: host.clone(),
            surface: host.clone(),
            visibility: host.clone(),
            scheduler,
            events: host.clone(),
            platform: host,
        }
    }
}

impl std::fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capabilities").finish_non_exhaustive()
    }
}

/// Scheduler running every callback on its own tokio task.
///
/// Must be used from within a tokio runtime. Callbacks run under the
/// scheduler's lock and must not schedule or cancel on the same scheduler.
#[derive(Debug, Default)]
pub struct TokioScheduler {
    next_id: AtomicU64,
    pending: Arc<Mutex<HashMap<u64, CancellationToken>>>,
}

impl TokioScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of callbacks that have neither fired nor been cancelled.
    pub fn pending(&self) -> usize {
        self.pending.lock().map(|pending| pending.len()).unwrap_or(0)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, callback: Deferred, delay: Duration) -> TimerHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let cancel = CancellationToken::new();
        if let Ok(mut pending) = self.pending.lock() {
            pending.insert(id, cancel.clone());
        }

        let pending = self.pending.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    // Held across the callback so a concurrent `cancel` either
                    // wins outright or waits for the callback to finish.
                    let Ok(mut pending) = pending.lock() else {
                        return;
                    };
                    if pending.remove(&id).is_some() {
                        callback();
                    }
                }
            }
        });

        TimerHandle(id)
    }

    fn cancel(&self, handle: TimerHandle) {
        let token = self
            .pending
            .lock()
            .ok()
            .and_then(|mut pending| pending.remove(&handle.0));
        if let Some(token) = token {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter() -> (Arc<AtomicUsize>, Deferred) {
        let count = Arc::new(AtomicUsize::new(0));
        let hits = count.clone();
        (
            count,
            Box::new(move || {
                hits.fetch_add(1, Ordering::SeqCst);
            }),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn fires_after_delay() {
        let scheduler = TokioScheduler::new();
        let (count, callback) = counter();
        scheduler.schedule(callback, Duration::from_millis(100));

        tokio::time::sleep(Duration::from_millis(99)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_is_idempotent() {
        let scheduler = TokioScheduler::new();
        let (count, callback) = counter();
        let handle = scheduler.schedule(callback, Duration::from_millis(100));

        scheduler.cancel(handle);
        scheduler.cancel(handle);
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_after_fire_is_noop() {
        let scheduler = TokioScheduler::new();
        let (count, callback) = counter();
        let handle = scheduler.schedule(callback, Duration::from_millis(10));

        tokio::time::sleep(Duration::from_millis(20)).await;
        scheduler.cancel(handle);

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn cancel_waits_for_a_running_callback() {
        let scheduler = TokioScheduler::new();
        let (started_tx, started_rx) = std::sync::mpsc::channel();
        let finished = Arc::new(AtomicUsize::new(0));
        let done = finished.clone();
        let handle = scheduler.schedule(
            Box::new(move || {
                let _ = started_tx.send(());
                std::thread::sleep(Duration::from_millis(50));
                done.fetch_add(1, Ordering::SeqCst);
            }),
            Duration::from_millis(1),
        );

        started_rx.recv().unwrap();
        scheduler.cancel(handle);
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }
}
