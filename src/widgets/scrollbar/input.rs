// tokio-scrollbar/src/widgets/scrollbar/input.rs
//! Normalizes pointer, touch and wheel input into axis coordinates and deltas.

use super::{Axis, PlatformFeatures};

/// Wheel deltas are divided by this before `wheel_speed` is applied.
pub const WHEEL_DIVISOR: f64 = 40.0;

/// A pointer location in page coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn along(self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }
}

/// A single touch contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub id: u64,
    pub point: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Pointer,
    Touch,
}

/// Raw wheel event data in the conventions browsers have used over time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WheelDelta {
    pub delta_x: Option<f64>,
    pub delta_y: Option<f64>,
    /// Legacy line count.
    pub detail: Option<f64>,
    /// Legacy inverted delta, a multiple of 120 per notch.
    pub wheel_delta: Option<f64>,
}

impl WheelDelta {
    pub fn vertical(delta_y: f64) -> Self {
        Self {
            delta_y: Some(delta_y),
            ..Self::default()
        }
    }

    pub fn horizontal(delta_x: f64) -> Self {
        Self {
            delta_x: Some(delta_x),
            ..Self::default()
        }
    }

    /// The raw delta for `axis`, falling back to the legacy fields. Zero
    /// counts as missing.
    pub fn raw(&self, axis: Axis) -> f64 {
        let primary = match axis {
            Axis::X => self.delta_x,
            Axis::Y => self.delta_y,
        };
        present(primary)
            .or_else(|| present(self.detail))
            .or_else(|| present(self.wheel_delta.map(|delta| -delta / 3.0)))
            .unwrap_or(0.0)
    }

    /// Content movement for this event: positive scrolls toward the end.
    pub fn content_delta(&self, axis: Axis, wheel_speed: f64) -> f64 {
        let normalized = -self.raw(axis) / WHEEL_DIVISOR;
        -(normalized * wheel_speed)
    }
}

fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|value| *value != 0.0 && !value.is_nan())
}

/// The wheel event the environment dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WheelEventName {
    Wheel,
    MouseWheel,
    DomMouseScroll,
}

impl WheelEventName {
    pub fn detect(features: &PlatformFeatures) -> Self {
        if features.wheel || features.document_mode.is_some_and(|mode| mode >= 9) {
            WheelEventName::Wheel
        } else if features.mouse_wheel {
            WheelEventName::MouseWheel
        } else {
            WheelEventName::DomMouseScroll
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WheelEventName::Wheel => "wheel",
            WheelEventName::MouseWheel => "mousewheel",
            WheelEventName::DomMouseScroll => "DOMMouseScroll",
        }
    }
}

/// Input capabilities resolved once at initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputProfile {
    pub touch: bool,
    pub wheel_event: WheelEventName,
}

impl InputProfile {
    pub fn detect(features: &PlatformFeatures) -> Self {
        Self {
            touch: features.touch_events,
            wheel_event: WheelEventName::detect(features),
        }
    }
}

/// Pointer coordinate along `axis`; mouse input maps one to one.
pub fn pointer_coordinate(point: Point, axis: Axis) -> f64 {
    point.along(axis)
}

/// The contact driving a touch gesture, if it is still present.
pub fn touch_coordinate(touches: &[TouchPoint], id: u64, axis: Axis) -> Option<f64> {
    touches
        .iter()
        .find(|touch| touch.id == id)
        .map(|touch| touch.point.along(axis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_delta_scrolls_toward_the_end() {
        let wheel = WheelDelta::vertical(40.0);
        assert_eq!(wheel.content_delta(Axis::Y, 40.0), 40.0);
        assert_eq!(WheelDelta::vertical(-80.0).content_delta(Axis::Y, 40.0), -80.0);
    }

    #[test]
    fn falls_back_through_legacy_fields() {
        let detail = WheelDelta {
            detail: Some(3.0),
            ..WheelDelta::default()
        };
        assert_eq!(detail.raw(Axis::Y), 3.0);

        let legacy = WheelDelta {
            wheel_delta: Some(-120.0),
            ..WheelDelta::default()
        };
        assert_eq!(legacy.raw(Axis::Y), 40.0);

        let zero_primary = WheelDelta {
            delta_y: Some(0.0),
            detail: Some(-2.0),
            ..WheelDelta::default()
        };
        assert_eq!(zero_primary.raw(Axis::Y), -2.0);
        assert_eq!(WheelDelta::default().raw(Axis::Y), 0.0);
    }

    #[test]
    fn reads_the_active_axis() {
        let wheel = WheelDelta {
            delta_x: Some(10.0),
            delta_y: Some(30.0),
            ..WheelDelta::default()
        };
        assert_eq!(wheel.raw(Axis::X), 10.0);
        assert_eq!(wheel.raw(Axis::Y), 30.0);
    }

    #[test]
    fn detects_wheel_event_name() {
        let modern = PlatformFeatures::default();
        assert_eq!(WheelEventName::detect(&modern), WheelEventName::Wheel);

        let legacy_document = PlatformFeatures {
            wheel: false,
            document_mode: Some(9),
            ..modern
        };
        assert_eq!(WheelEventName::detect(&legacy_document), WheelEventName::Wheel);

        let mouse_wheel = PlatformFeatures {
            wheel: false,
            document_mode: Some(8),
            mouse_wheel: true,
            ..modern
        };
        assert_eq!(WheelEventName::detect(&mouse_wheel), WheelEventName::MouseWheel);

        let gecko = PlatformFeatures {
            wheel: false,
            document_mode: None,
            mouse_wheel: false,
            touch_events: false,
        };
        assert_eq!(WheelEventName::detect(&gecko), WheelEventName::DomMouseScroll);
        assert_eq!(WheelEventName::DomMouseScroll.as_str(), "DOMMouseScroll");
    }

    #[test]
    fn follows_the_first_touch() {
        let touches = [
            TouchPoint {
                id: 7,
                point: Point::new(1.0, 2.0),
            },
            TouchPoint {
                id: 9,
                point: Point::new(5.0, 6.0),
            },
        ];
        assert_eq!(touch_coordinate(&touches, 9, Axis::Y), Some(6.0));
        assert_eq!(touch_coordinate(&touches, 3, Axis::Y), None);
    }
}
