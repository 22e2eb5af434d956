// tokio-scrollbar/src/widgets/scroll_view/scroll_view_widget.rs
//! A bordered text viewport whose scrollbar is driven by
//! [`ScrollbarController`]. The scrollbar lives on the right border for a
//! vertical axis and on the bottom border for a horizontal one.

use std::{sync::Arc, time::Duration};

use ratatui::{
    buffer::Buffer,
    crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind},
    layout::{Margin, Position, Rect},
    style::Style,
    symbols::line,
    text::Line,
    widgets::{Block, BorderType, Paragraph, Widget},
};
use tracing::debug;

use crate::{
    Axis, Capabilities, Extents, Geometry, MoveListenerId, Point, ScrollEvent, ScrollTarget,
    ScrollbarController, ScrollbarOptions, Scheduler, TokioScheduler, TuiWidget, WHEEL_DIVISOR,
    WheelDelta, tui_theme,
};

use super::TerminalHost;

pub struct ScrollView {
    /* ---------- scrollbar ----------- */
    host: Arc<TerminalHost>,
    controller: ScrollbarController,
    initialized: bool,
    pending_target: Option<ScrollTarget>,

    /* ---------- data ----------- */
    lines: Vec<String>,
    max_line_width: usize,
    follow: bool,

    /* ---------- rendering & style ----------- */
    title: String,
    border_style: Style,
    scrollbar_style: Style,
    is_focused: bool,
    last_area: Rect,
}

impl std::fmt::Debug for ScrollView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollView")
            .field("title", &self.title)
            .field("lines", &self.lines.len())
            .field("controller", &self.controller)
            .field("follow", &self.follow)
            .finish()
    }
}

impl ScrollView {
    /// Must be created inside a tokio runtime when the bar auto-hides.
    pub fn new(title: impl AsRef<str>, options: ScrollbarOptions) -> Self {
        Self::with_scheduler(title, options, Arc::new(TokioScheduler::new()))
    }

    pub fn with_scheduler(
        title: impl AsRef<str>,
        options: ScrollbarOptions,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        let host = Arc::new(TerminalHost::new());
        let capabilities = Capabilities::from_host(host.clone(), scheduler);
        Self {
            controller: ScrollbarController::new(options, capabilities),
            host,
            initialized: false,
            pending_target: None,
            lines: Vec::new(),
            max_line_width: 0,
            follow: false,
            title: title.as_ref().to_string(),
            border_style: Style::default().fg(tui_theme::BORDER_DEFAULT),
            scrollbar_style: Style::default().fg(tui_theme::SCROLLBAR_DEFAULT),
            is_focused: false,
            last_area: Rect::default(),
        }
    }

    /// Keep the view pinned to the end while lines are appended.
    pub fn follow(mut self, follow: bool) -> Self {
        self.follow = follow;
        if follow {
            self.pending_target = Some(ScrollTarget::Bottom);
        }
        self
    }

    /// How long the bar stays up after an update when it auto-hides.
    pub fn with_flash_length(self, flash_length: Duration) -> Self {
        self.host.set_flash_length(flash_length);
        self
    }

    pub fn set_title(&mut self, title: impl AsRef<str>) {
        self.title = title.as_ref().to_string();
        self.host.request_redraw();
    }

    pub fn push_line(&mut self, line: impl Into<String>) {
        let line = line.into();
        self.max_line_width = self.max_line_width.max(Line::raw(line.as_str()).width());
        self.lines.push(line);
        if self.follow {
            self.pending_target = Some(ScrollTarget::Bottom);
        }
        self.host.request_redraw();
    }

    pub fn extend_lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for line in lines {
            self.push_line(line);
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Scroll on the next draw, once the geometry is known.
    pub fn scroll_to(&mut self, target: impl Into<ScrollTarget>) {
        self.pending_target = Some(target.into());
        self.host.request_redraw();
    }

    pub fn on_move<F>(&mut self, listener: F) -> MoveListenerId
    where
        F: Fn(&Geometry) + Send + Sync + 'static,
    {
        self.controller.on_move(listener)
    }

    pub fn geometry(&self) -> &Geometry {
        self.controller.geometry()
    }

    pub fn controller(&self) -> &ScrollbarController {
        &self.controller
    }

    pub fn host(&self) -> &TerminalHost {
        &self.host
    }

    fn axis(&self) -> Axis {
        self.controller.options().axis
    }

    fn extents_for(&self, area: Rect) -> Extents {
        let inner = area.inner(Margin::new(1, 1));
        match self.axis() {
            Axis::Y => Extents {
                viewport: inner.height as f64,
                content: self.lines.len() as f64,
                track_origin: inner.top() as f64,
            },
            Axis::X => Extents {
                viewport: inner.width as f64,
                content: self.max_line_width as f64,
                track_origin: inner.left() as f64,
            },
        }
    }

    /// Bring the controller in line with the area and content about to be drawn.
    fn sync_geometry(&mut self, area: Rect) {
        let changed = self.host.set_extents(self.extents_for(area));

        if !self.initialized {
            self.controller.initialize();
            self.initialized = true;
        } else if area != self.last_area {
            self.controller.handle(ScrollEvent::Resize);
        } else if changed && self.pending_target.is_none() {
            self.controller.update(ScrollTarget::Remeasure);
        }

        if let Some(target) = self.pending_target.take() {
            self.controller.update(target);
        }
        self.last_area = area;
    }

    /* ---------- scrollbar cells ----------- */

    /// Cells of the track along the axis: (first, past-the-end).
    fn track_span(&self) -> (u16, u16) {
        let inner = self.last_area.inner(Margin::new(1, 1));
        let (start, available) = match self.axis() {
            Axis::Y => (inner.top(), inner.height),
            Axis::X => (inner.left(), inner.width),
        };
        let length = (self.host.positions().track_length.round().max(0.0) as u16).min(available);
        (start, start + length)
    }

    fn thumb_span(&self) -> (u16, u16) {
        let (track_start, track_end) = self.track_span();
        let positions = self.host.positions();
        let start = (track_start + positions.thumb_offset.round().max(0.0) as u16).min(track_end);
        let length = (positions.thumb_length.round().max(1.0) as u16).min(track_end - start);
        (start, start + length)
    }

    /// Position along the track if the cell belongs to it.
    fn on_track(&self, column: u16, row: u16) -> Option<u16> {
        let area = self.last_area;
        if area.width < 2 || area.height < 2 || self.host.is_disabled() {
            return None;
        }
        let (start, end) = self.track_span();
        let (cross, expected, along) = match self.axis() {
            Axis::Y => (column, area.right() - 1, row),
            Axis::X => (row, area.bottom() - 1, column),
        };
        (cross == expected && along >= start && along < end).then_some(along)
    }

    fn on_thumb(&self, column: u16, row: u16) -> bool {
        let (start, end) = self.thumb_span();
        self.on_track(column, row)
            .is_some_and(|along| along >= start && along < end)
    }

    /* ---------- rendering ----------- */

    fn render_content(&self, inner: Rect, buf: &mut Buffer) {
        let offset = self.host.positions().content_offset.round().max(0.0) as u16;
        let scroll = match self.axis() {
            Axis::Y => (offset, 0),
            Axis::X => (0, offset),
        };
        let lines: Vec<Line> = self.lines.iter().map(|line| Line::raw(line.as_str())).collect();
        Paragraph::new(lines).scroll(scroll).render(inner, buf);
    }

    fn render_scrollbar(&self, buf: &mut Buffer) {
        if self.host.is_disabled() || !self.host.is_visible() {
            return;
        }
        let area = self.last_area;
        let (track_start, track_end) = self.track_span();
        let (thumb_start, thumb_end) = self.thumb_span();
        let (track_symbol, thumb_symbol) = match self.axis() {
            Axis::Y => (line::VERTICAL, tui_theme::THUMB_SYMBOL_VERTICAL),
            Axis::X => (line::HORIZONTAL, tui_theme::THUMB_SYMBOL),
        };

        for along in track_start..track_end {
            let position = match self.axis() {
                Axis::Y => Position::new(area.right() - 1, along),
                Axis::X => Position::new(along, area.bottom() - 1),
            };
            if let Some(cell) = buf.cell_mut(position) {
                if along >= thumb_start && along < thumb_end {
                    cell.set_symbol(thumb_symbol).set_style(self.scrollbar_style);
                } else {
                    cell.set_symbol(track_symbol).set_style(self.border_style);
                }
            }
        }
    }

    fn border_style(&self) -> Style {
        if self.host.is_selection_suppressed() {
            Style::default().fg(tui_theme::BORDER_ACTIVE)
        } else if self.is_focused {
            Style::default().fg(tui_theme::BORDER_FOCUSED)
        } else {
            self.border_style
        }
    }
}

impl TuiWidget for ScrollView {
    fn need_draw(&self) -> bool {
        self.host.needs_redraw() || self.host.is_flashing() || self.pending_target.is_some()
    }

    fn draw(&mut self, area: Rect, buf: &mut Buffer) {
        if area.width < 3 || area.height < 3 {
            return;
        }
        self.sync_geometry(area);
        self.host.take_redraw();

        let inner = area.inner(Margin::new(1, 1));
        Block::bordered()
            .title(self.title.as_str())
            .border_type(BorderType::Rounded)
            .border_style(self.border_style())
            .render(area, buf);

        self.render_content(inner, buf);
        self.render_scrollbar(buf);
        self.host.settle_flash();
    }

    fn key_event(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        let geometry = *self.controller.geometry();
        let target = match key.code {
            KeyCode::Home => ScrollTarget::Offset(0.0),
            KeyCode::End => ScrollTarget::Bottom,
            KeyCode::PageDown => {
                ScrollTarget::Offset(geometry.content_position + geometry.viewport_size)
            }
            KeyCode::PageUp => {
                ScrollTarget::Offset(geometry.content_position - geometry.viewport_size)
            }
            _ => return false,
        };
        self.scroll_to(target);
        true
    }

    fn mouse_event(&mut self, mouse: MouseEvent) -> bool {
        let point = Point::new(mouse.column as f64, mouse.row as f64);
        let inside = self
            .last_area
            .contains(Position::new(mouse.column, mouse.row));

        let event = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.on_thumb(mouse.column, mouse.row) {
                    ScrollEvent::ThumbPointerDown(point)
                } else if self.on_track(mouse.column, mouse.row).is_some() {
                    ScrollEvent::TrackPointerDown(point)
                } else {
                    return false;
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => ScrollEvent::PointerMove(point),
            MouseEventKind::Up(MouseButton::Left) => ScrollEvent::PointerUp,
            MouseEventKind::ScrollDown if inside => {
                ScrollEvent::Wheel(WheelDelta::vertical(WHEEL_DIVISOR))
            }
            MouseEventKind::ScrollUp if inside => {
                ScrollEvent::Wheel(WheelDelta::vertical(-WHEEL_DIVISOR))
            }
            MouseEventKind::ScrollRight if inside => {
                ScrollEvent::Wheel(WheelDelta::horizontal(WHEEL_DIVISOR))
            }
            MouseEventKind::ScrollLeft if inside => {
                ScrollEvent::Wheel(WheelDelta::horizontal(-WHEEL_DIVISOR))
            }
            _ => return false,
        };

        let response = self.controller.handle(event);
        if response.handled {
            self.host.request_redraw();
        }
        response.handled
    }

    fn focus(&mut self) {
        self.is_focused = true;
        self.host.request_redraw();
    }

    fn unfocus(&mut self) {
        self.is_focused = false;
        self.host.request_redraw();
    }

    fn is_focused(&self) -> bool {
        self.is_focused
    }
}

impl Drop for ScrollView {
    fn drop(&mut self) {
        if self.initialized {
            debug!(title = %self.title, "tearing down scroll view");
        }
        self.controller.cleanup();
    }
}
