// tokio-scrollbar/src/widgets/scrollbar/interaction.rs
use super::InputSource;

/// Where a gesture started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragAnchor {
    /// Pointer coordinate along the axis when the gesture began.
    pub pointer: f64,
    /// Thumb position when the gesture began.
    pub thumb: f64,
    pub source: InputSource,
    /// Identity of the contact driving a touch gesture.
    pub touch_id: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Interaction {
    #[default]
    Idle,
    Dragging(DragAnchor),
}

impl Interaction {
    pub fn is_dragging(&self) -> bool {
        matches!(self, Interaction::Dragging(_))
    }

    pub fn anchor(&self) -> Option<&DragAnchor> {
        match self {
            Interaction::Dragging(anchor) => Some(anchor),
            Interaction::Idle => None,
        }
    }

    pub fn start(&mut self, anchor: DragAnchor) {
        *self = Interaction::Dragging(anchor);
    }

    /// Returns the anchor of the gesture that just ended, if any.
    pub fn end(&mut self) -> Option<DragAnchor> {
        match std::mem::take(self) {
            Interaction::Dragging(anchor) => Some(anchor),
            Interaction::Idle => None,
        }
    }
}

impl DragAnchor {
    /// Thumb position the pointer at `coordinate` asks for, before clamping.
    pub fn thumb_for(&self, coordinate: f64, scroll_invert: bool) -> f64 {
        let mut delta = coordinate - self.pointer;
        if scroll_invert && self.source == InputSource::Touch {
            delta = -delta;
        }
        self.thumb + delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor(source: InputSource) -> DragAnchor {
        DragAnchor {
            pointer: 50.0,
            thumb: 20.0,
            source,
            touch_id: None,
        }
    }

    #[test]
    fn delta_follows_pointer() {
        assert_eq!(anchor(InputSource::Pointer).thumb_for(60.0, false), 30.0);
        assert_eq!(anchor(InputSource::Pointer).thumb_for(45.0, false), 15.0);
    }

    #[test]
    fn invert_only_applies_to_touch() {
        assert_eq!(anchor(InputSource::Pointer).thumb_for(60.0, true), 30.0);
        assert_eq!(anchor(InputSource::Touch).thumb_for(60.0, true), 10.0);
    }

    #[test]
    fn end_clears_state() {
        let mut interaction = Interaction::default();
        assert_eq!(interaction.end(), None);

        interaction.start(anchor(InputSource::Pointer));
        assert!(interaction.is_dragging());
        assert_eq!(interaction.end(), Some(anchor(InputSource::Pointer)));
        assert!(!interaction.is_dragging());
        assert_eq!(interaction.anchor(), None);
    }
}
