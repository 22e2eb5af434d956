// tokio-scrollbar/src/widgets/scrollbar/geometry.rs
use super::{Extents, ScrollbarOptions};

/// Where `update` should leave the content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollTarget {
    /// Absolute content offset.
    Offset(f64),
    /// Jump to the end of the content.
    Bottom,
    /// Keep the current offset, clamped to the new geometry.
    Relative,
    /// Re-read the geometry without moving or flashing.
    Remeasure,
}

impl Default for ScrollTarget {
    fn default() -> Self {
        ScrollTarget::Offset(0.0)
    }
}

impl ScrollTarget {
    /// `"bottom"`, `"relative"`, or a leading base-10 integer. Anything else
    /// resolves to offset `0`.
    pub fn parse(target: &str) -> Self {
        match target {
            "bottom" => ScrollTarget::Bottom,
            "relative" => ScrollTarget::Relative,
            other => match leading_int(other) {
                Some(offset) => ScrollTarget::Offset(offset),
                None => {
                    tracing::trace!(target = other, "unparseable scroll target, using 0");
                    ScrollTarget::Offset(0.0)
                }
            },
        }
    }
}

impl From<&str> for ScrollTarget {
    fn from(target: &str) -> Self {
        Self::parse(target)
    }
}

impl From<f64> for ScrollTarget {
    fn from(offset: f64) -> Self {
        ScrollTarget::Offset(offset)
    }
}

/// Parse an optionally signed run of digits after leading whitespace,
/// ignoring whatever follows it. Runs too long for an integer still parse.
fn leading_int(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let value: f64 = rest[..digits].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Measured sizes, derived ratios and the current positions along the axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Geometry {
    pub viewport_size: f64,
    pub content_size: f64,
    /// `viewport_size / content_size`, scrolling is possible only below 1.
    pub content_ratio: f64,
    pub track_size: f64,
    pub track_origin: f64,
    pub thumb_size: f64,
    /// Content pixels per thumb pixel.
    pub track_ratio: f64,
    pub content_position: f64,
    pub thumb_position: f64,
}

impl Geometry {
    /// Take new measurements and derive sizes and ratios from them.
    /// Positions are left untouched.
    pub fn remeasure(&mut self, extents: Extents, options: &ScrollbarOptions) {
        self.viewport_size = extents.viewport;
        self.content_size = extents.content;
        self.track_origin = extents.track_origin;
        self.content_ratio = self.viewport_size / self.content_size;
        self.track_size = options.track_size.unwrap_or(self.viewport_size);

        let thumb = options
            .thumb_size
            .unwrap_or(self.track_size * self.content_ratio);
        self.thumb_size = clamp(thumb, 0.0, self.track_size);

        self.track_ratio = if options.thumb_size.is_some() {
            (self.content_size - self.viewport_size) / (self.track_size - self.thumb_size)
        } else {
            self.content_size / self.track_size
        };
    }

    /// False when the content fits, including degenerate measurements.
    pub fn is_scrollable(&self) -> bool {
        (0.0..1.0).contains(&self.content_ratio)
    }

    pub fn max_content_position(&self) -> f64 {
        (self.content_size - self.viewport_size).max(0.0)
    }

    pub fn max_thumb_position(&self) -> f64 {
        (self.track_size - self.thumb_size).max(0.0)
    }

    /// Whether the thumb maps onto content positions at all.
    pub fn has_travel(&self) -> bool {
        self.is_scrollable() && self.track_ratio.is_finite() && self.track_ratio > 0.0
    }

    /// Resolve `target` into a content position and derive the thumb from it.
    pub fn resolve(&mut self, target: ScrollTarget) {
        let max = self.max_content_position();
        self.content_position = match target {
            ScrollTarget::Bottom => max,
            ScrollTarget::Relative | ScrollTarget::Remeasure => {
                clamp(self.content_position, 0.0, max)
            }
            ScrollTarget::Offset(offset) if offset.is_finite() => clamp(offset, 0.0, max),
            ScrollTarget::Offset(_) => 0.0,
        };
        self.sync_thumb();
    }

    /// Collapse positions for the disabled state.
    pub fn rest(&mut self) {
        self.content_position = clamp(self.content_position, 0.0, self.max_content_position());
        self.thumb_position = 0.0;
    }

    /// Place the thumb, then derive the content position from it.
    pub fn place_thumb(&mut self, thumb_position: f64) {
        self.thumb_position = clamp(thumb_position, 0.0, self.max_thumb_position());
        self.content_position = clamp(
            self.thumb_position * self.track_ratio,
            0.0,
            self.max_content_position(),
        );
    }

    /// Move the content by `delta`, then derive the thumb from it.
    pub fn scroll_content_by(&mut self, delta: f64) {
        self.content_position = clamp(
            self.content_position + delta,
            0.0,
            self.max_content_position(),
        );
        self.sync_thumb();
    }

    pub fn at_content_edge(&self) -> bool {
        self.content_position == 0.0 || self.content_position == self.max_content_position()
    }

    fn sync_thumb(&mut self) {
        self.thumb_position = if self.has_travel() {
            clamp(
                self.content_position / self.track_ratio,
                0.0,
                self.max_thumb_position(),
            )
        } else {
            0.0
        };
    }
}

/// `min(max(value, low), high)`, with `high` winning when the range is empty.
fn clamp(value: f64, low: f64, high: f64) -> f64 {
    value.max(low).min(high)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measured(viewport: f64, content: f64, options: ScrollbarOptions) -> Geometry {
        let mut geometry = Geometry::default();
        geometry.remeasure(
            Extents {
                viewport,
                content,
                track_origin: 0.0,
            },
            &options,
        );
        geometry
    }

    #[test]
    fn proportional_thumb() {
        let geometry = measured(100.0, 400.0, ScrollbarOptions::default());
        assert_eq!(geometry.content_ratio, 0.25);
        assert_eq!(geometry.track_size, 100.0);
        assert_eq!(geometry.thumb_size, 25.0);
        assert_eq!(geometry.track_ratio, 4.0);
        assert!(geometry.is_scrollable());
    }

    #[test]
    fn fixed_track_and_thumb() {
        let options = ScrollbarOptions::default()
            .with_track_size(50.0)
            .with_thumb_size(10.0);
        let geometry = measured(100.0, 400.0, options);
        assert_eq!(geometry.thumb_size, 10.0);
        assert_eq!(geometry.track_ratio, 7.5);
    }

    #[test]
    fn oversized_thumb_is_clamped_to_track() {
        let options = ScrollbarOptions::default().with_thumb_size(500.0);
        let geometry = measured(100.0, 400.0, options);
        assert_eq!(geometry.thumb_size, 100.0);
        assert!(!geometry.has_travel());
    }

    #[test]
    fn degenerate_sizes_are_not_scrollable() {
        assert!(!measured(0.0, 0.0, ScrollbarOptions::default()).is_scrollable());
        assert!(!measured(100.0, 100.0, ScrollbarOptions::default()).is_scrollable());
        assert!(!measured(100.0, 40.0, ScrollbarOptions::default()).is_scrollable());
        assert!(!measured(10.0, -5.0, ScrollbarOptions::default()).is_scrollable());
    }

    #[test]
    fn bottom_and_explicit_targets() {
        let mut geometry = measured(100.0, 400.0, ScrollbarOptions::default());
        geometry.resolve(ScrollTarget::Bottom);
        assert_eq!(geometry.content_position, 300.0);
        assert_eq!(geometry.thumb_position, 75.0);

        geometry.resolve(ScrollTarget::Offset(1_000.0));
        assert_eq!(geometry.content_position, 300.0);

        geometry.resolve(ScrollTarget::Offset(-3.0));
        assert_eq!(geometry.content_position, 0.0);

        geometry.resolve(ScrollTarget::Offset(f64::NAN));
        assert_eq!(geometry.content_position, 0.0);
    }

    #[test]
    fn relative_clamps_after_content_shrinks() {
        let mut geometry = measured(100.0, 400.0, ScrollbarOptions::default());
        geometry.resolve(ScrollTarget::Bottom);

        geometry.remeasure(
            Extents {
                viewport: 100.0,
                content: 200.0,
                track_origin: 0.0,
            },
            &ScrollbarOptions::default(),
        );
        geometry.resolve(ScrollTarget::Relative);
        assert_eq!(geometry.content_position, 100.0);
        assert_eq!(geometry.thumb_position, 50.0);
    }

    #[test]
    fn parses_targets() {
        assert_eq!(ScrollTarget::parse("bottom"), ScrollTarget::Bottom);
        assert_eq!(ScrollTarget::parse("relative"), ScrollTarget::Relative);
        assert_eq!(ScrollTarget::parse("120"), ScrollTarget::Offset(120.0));
        assert_eq!(ScrollTarget::parse("  42px"), ScrollTarget::Offset(42.0));
        assert_eq!(ScrollTarget::parse("-7"), ScrollTarget::Offset(-7.0));
        assert_eq!(ScrollTarget::parse("top"), ScrollTarget::Offset(0.0));
        assert_eq!(ScrollTarget::parse(""), ScrollTarget::Offset(0.0));
    }

    #[test]
    fn oversized_offset_lands_at_bottom() {
        let target = ScrollTarget::parse("99999999999999999999");
        assert_eq!(target, ScrollTarget::Offset(1e20));

        let mut geometry = measured(100.0, 400.0, ScrollbarOptions::default());
        geometry.resolve(target);
        assert_eq!(geometry.content_position, 300.0);
        assert_eq!(geometry.thumb_position, 75.0);
    }

    #[test]
    fn thumb_maps_back_to_content() {
        let mut geometry = measured(100.0, 400.0, ScrollbarOptions::default());
        geometry.place_thumb(10.0);
        assert_eq!(geometry.content_position, 40.0);

        geometry.place_thumb(1_000.0);
        assert_eq!(geometry.thumb_position, 75.0);
        assert_eq!(geometry.content_position, 300.0);
    }
}
