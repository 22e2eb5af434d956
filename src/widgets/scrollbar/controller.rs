// tokio-scrollbar/src/widgets/scrollbar/controller.rs
//! The scrollbar controller ties geometry, gestures, input adapters and the
//! visibility flasher to the capabilities of its host.
//!
//! Hosts deliver events one at a time through [`ScrollbarController::handle`];
//! each call runs to completion. Events whose listener is not currently bound
//! are ignored, which is what keeps a cleaned-up controller inert.

use std::collections::HashSet;

use tracing::{debug, trace};

use super::{
    AppliedPositions, Binding, Capabilities, DragAnchor, Geometry, InputProfile, InputSource,
    Interaction, Point, ScrollTarget, ScrollbarOptions, TouchPoint, VisibilityFlasher, WheelDelta,
    pointer_coordinate, touch_coordinate,
};

const POINTER_DRAG_BINDINGS: [Binding; 3] = [
    Binding::DocumentPointerMove,
    Binding::DocumentPointerUp,
    Binding::ThumbPointerUp,
];

const TOUCH_DRAG_BINDINGS: [Binding; 3] = [
    Binding::DocumentTouchMove,
    Binding::DocumentTouchEnd,
    Binding::DocumentTouchCancel,
];

/// Input delivered by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollEvent {
    ThumbPointerDown(Point),
    TrackPointerDown(Point),
    /// Pointer moved anywhere on the document.
    PointerMove(Point),
    /// Pointer released on the document.
    PointerUp,
    /// Pointer released over the thumb.
    ThumbPointerUp,
    TouchStart(Vec<TouchPoint>),
    TouchMove(Vec<TouchPoint>),
    TouchEnd,
    TouchCancel,
    Resize,
    Wheel(WheelDelta),
}

impl ScrollEvent {
    fn binding(&self, profile: &InputProfile) -> Binding {
        match self {
            ScrollEvent::ThumbPointerDown(_) => Binding::ThumbPointerDown,
            ScrollEvent::TrackPointerDown(_) => Binding::TrackPointerDown,
            ScrollEvent::PointerMove(_) => Binding::DocumentPointerMove,
            ScrollEvent::PointerUp => Binding::DocumentPointerUp,
            ScrollEvent::ThumbPointerUp => Binding::ThumbPointerUp,
            ScrollEvent::TouchStart(_) => Binding::ViewportTouchStart,
            ScrollEvent::TouchMove(_) => Binding::DocumentTouchMove,
            ScrollEvent::TouchEnd => Binding::DocumentTouchEnd,
            ScrollEvent::TouchCancel => Binding::DocumentTouchCancel,
            ScrollEvent::Resize => Binding::WindowResize,
            ScrollEvent::Wheel(_) => Binding::Wheel(profile.wheel_event),
        }
    }
}

/// What the host should do with the native event after handling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventResponse {
    pub handled: bool,
    /// Suppress the platform's own scrolling.
    pub prevent_default: bool,
    pub stop_propagation: bool,
}

impl EventResponse {
    fn ignored() -> Self {
        Self::default()
    }

    fn handled() -> Self {
        Self {
            handled: true,
            ..Self::default()
        }
    }
}

/// Identifies a registered move listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveListenerId(u64);

type MoveListener = Box<dyn Fn(&Geometry) + Send + Sync>;

pub struct ScrollbarController {
    options: ScrollbarOptions,
    capabilities: Capabilities,
    geometry: Geometry,
    interaction: Interaction,
    flasher: VisibilityFlasher,
    profile: Option<InputProfile>,
    bound: HashSet<Binding>,
    disabled: bool,
    listeners: Vec<(MoveListenerId, MoveListener)>,
    next_listener: u64,
}

impl std::fmt::Debug for ScrollbarController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollbarController")
            .field("options", &self.options)
            .field("geometry", &self.geometry)
            .field("interaction", &self.interaction)
            .field("profile", &self.profile)
            .field("bound", &self.bound)
            .field("disabled", &self.disabled)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ScrollbarController {
    pub fn new(options: ScrollbarOptions, capabilities: Capabilities) -> Self {
        let flasher = VisibilityFlasher::new(
            options.always_visible,
            capabilities.visibility.clone(),
            capabilities.scheduler.clone(),
        );
        Self {
            options,
            capabilities,
            geometry: Geometry::default(),
            interaction: Interaction::Idle,
            flasher,
            profile: None,
            bound: HashSet::new(),
            disabled: false,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn options(&self) -> &ScrollbarOptions {
        &self.options
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn profile(&self) -> Option<InputProfile> {
        self.profile
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_bound(&self, binding: Binding) -> bool {
        self.bound.contains(&binding)
    }

    /// Probe the platform, take the first measurement and attach listeners.
    pub fn initialize(&mut self) -> &mut Self {
        let profile = InputProfile::detect(&self.capabilities.platform.features());
        self.profile = Some(profile);

        self.flasher.conceal();
        self.update(ScrollTarget::default());

        if profile.touch {
            self.bind(Binding::ViewportTouchStart);
        } else {
            self.bind(Binding::ThumbPointerDown);
            self.bind(Binding::TrackPointerDown);
        }
        self.bind(Binding::WindowResize);
        if self.options.wheel {
            self.bind(Binding::Wheel(profile.wheel_event));
        }

        debug!(
            axis = ?self.options.axis,
            touch = profile.touch,
            wheel_event = profile.wheel_event.as_str(),
            "scrollbar initialized"
        );
        self
    }

    /// Remeasure and move the content to `target`.
    pub fn update(&mut self, target: impl Into<ScrollTarget>) -> &mut Self {
        let target = target.into();
        let extents = self.capabilities.measure.measure(self.options.axis);
        self.geometry.remeasure(extents, &self.options);

        let disabled = !self.geometry.is_scrollable();
        if disabled != self.disabled {
            debug!(
                disabled,
                viewport = self.geometry.viewport_size,
                content = self.geometry.content_size,
                "scrollbar availability changed"
            );
        }
        self.disabled = disabled;
        self.capabilities.surface.set_disabled(disabled);

        if disabled {
            self.geometry.rest();
            self.apply_positions();
            return self;
        }

        if target != ScrollTarget::Remeasure {
            self.flasher.flash();
        }
        self.geometry.resolve(target);
        self.apply_positions();
        self
    }

    /// Detach everything and return to idle. Safe to call repeatedly.
    pub fn cleanup(&mut self) {
        self.end_drag();
        for binding in std::mem::take(&mut self.bound) {
            self.capabilities.events.unbind(binding);
        }
        self.flasher.cancel_pending();
        debug!("scrollbar cleaned up");
    }

    /// Register a listener called after every drag or wheel move.
    pub fn on_move<F>(&mut self, listener: F) -> MoveListenerId
    where
        F: Fn(&Geometry) + Send + Sync + 'static,
    {
        let id = MoveListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn remove_move_listener(&mut self, id: MoveListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn handle(&mut self, event: ScrollEvent) -> EventResponse {
        let Some(profile) = self.profile else {
            return EventResponse::ignored();
        };
        if !self.bound.contains(&event.binding(&profile)) {
            trace!(?event, "event without bound listener");
            return EventResponse::ignored();
        }

        let axis = self.options.axis;
        match event {
            ScrollEvent::ThumbPointerDown(point) => {
                let started =
                    self.start_drag(pointer_coordinate(point, axis), InputSource::Pointer, None);
                respond(started)
            }
            ScrollEvent::TrackPointerDown(point) => {
                let origin = self.geometry.track_origin;
                if !self.start_drag(origin, InputSource::Pointer, None) {
                    return EventResponse::ignored();
                }
                self.drag_to(pointer_coordinate(point, axis));
                EventResponse::handled()
            }
            ScrollEvent::PointerMove(point) => respond(self.drag_to(pointer_coordinate(point, axis))),
            ScrollEvent::PointerUp
            | ScrollEvent::ThumbPointerUp
            | ScrollEvent::TouchEnd
            | ScrollEvent::TouchCancel => {
                self.end_drag();
                EventResponse::handled()
            }
            ScrollEvent::TouchStart(touches) => self.touch_start(&touches),
            ScrollEvent::TouchMove(touches) => {
                let coordinate = self
                    .interaction
                    .anchor()
                    .and_then(|anchor| anchor.touch_id)
                    .and_then(|id| touch_coordinate(&touches, id, axis));
                if let Some(coordinate) = coordinate {
                    self.drag_to(coordinate);
                }
                EventResponse {
                    handled: coordinate.is_some(),
                    prevent_default: true,
                    stop_propagation: false,
                }
            }
            ScrollEvent::Resize => {
                self.update(ScrollTarget::Relative);
                EventResponse::handled()
            }
            ScrollEvent::Wheel(delta) => self.wheel(&delta),
        }
    }

    fn touch_start(&mut self, touches: &[TouchPoint]) -> EventResponse {
        let [touch] = touches else {
            return EventResponse::ignored();
        };
        let coordinate = touch.point.along(self.options.axis);
        if !self.start_drag(coordinate, InputSource::Touch, Some(touch.id)) {
            return EventResponse::ignored();
        }
        EventResponse {
            handled: true,
            prevent_default: false,
            stop_propagation: true,
        }
    }

    fn start_drag(&mut self, coordinate: f64, source: InputSource, touch_id: Option<u64>) -> bool {
        if !self.geometry.is_scrollable() {
            return false;
        }

        self.capabilities.surface.set_selection_suppressed(true);
        self.flasher.interaction_started();
        self.interaction.start(DragAnchor {
            pointer: coordinate,
            thumb: self.geometry.thumb_position,
            source,
            touch_id,
        });

        let bindings = match source {
            InputSource::Pointer => POINTER_DRAG_BINDINGS,
            InputSource::Touch => TOUCH_DRAG_BINDINGS,
        };
        for binding in bindings {
            self.bind(binding);
        }

        debug!(?source, coordinate, thumb = self.geometry.thumb_position, "drag started");
        true
    }

    fn drag_to(&mut self, coordinate: f64) -> bool {
        let Some(anchor) = self.interaction.anchor().copied() else {
            return false;
        };
        if !self.geometry.has_travel() {
            return false;
        }

        let thumb = anchor.thumb_for(coordinate, self.options.scroll_invert);
        self.geometry.place_thumb(thumb);
        self.notify_moved();
        self.apply_positions();
        true
    }

    fn end_drag(&mut self) {
        let ended = self.interaction.end();

        self.capabilities.surface.set_selection_suppressed(false);
        self.flasher.interaction_ended();
        for binding in POINTER_DRAG_BINDINGS.into_iter().chain(TOUCH_DRAG_BINDINGS) {
            self.unbind(binding);
        }

        if let Some(anchor) = ended {
            debug!(
                source = ?anchor.source,
                content = self.geometry.content_position,
                "drag ended"
            );
        }
    }

    fn wheel(&mut self, delta: &WheelDelta) -> EventResponse {
        if !self.options.wheel || !self.geometry.is_scrollable() {
            return EventResponse::ignored();
        }

        self.flasher.wheeled();
        let content_delta = delta.content_delta(self.options.axis, self.options.wheel_speed);
        self.geometry.scroll_content_by(content_delta);
        self.notify_moved();
        self.apply_positions();

        trace!(content_delta, content = self.geometry.content_position, "wheel");
        EventResponse {
            handled: true,
            prevent_default: self.options.wheel_lock || !self.geometry.at_content_edge(),
            stop_propagation: false,
        }
    }

    fn notify_moved(&self) {
        for (_, listener) in &self.listeners {
            listener(&self.geometry);
        }
    }

    fn apply_positions(&self) {
        self.capabilities.surface.apply_positions(AppliedPositions {
            thumb_offset: self.geometry.thumb_position,
            content_offset: self.geometry.content_position,
            track_length: self.geometry.track_size,
            thumb_length: self.geometry.thumb_size,
        });
    }

    fn bind(&mut self, binding: Binding) {
        if self.bound.insert(binding) {
            self.capabilities.events.bind(binding);
        }
    }

    fn unbind(&mut self, binding: Binding) {
        if self.bound.remove(&binding) {
            self.capabilities.events.unbind(binding);
        }
    }
}

fn respond(handled: bool) -> EventResponse {
    if handled {
        EventResponse::handled()
    } else {
        EventResponse::ignored()
    }
}
