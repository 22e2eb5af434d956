// tokio-scrollbar/src/tui/input_backend.rs
use std::time::Duration;

use anyhow::{Result, anyhow};
use crossterm::event::{
    Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent,
    MouseEventKind,
};
use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::trace;

pub type InputEvents = (Option<Vec<KeyEvent>>, Option<Vec<MouseEvent>>);

#[derive(Clone, Copy, Debug)]
pub struct InputBackendOpts {
    key_buffer: usize,
    mouse_buffer: usize,
    tick_rate: Duration,
    flush_cap: usize,
}

impl Default for InputBackendOpts {
    fn default() -> Self {
        Self {
            key_buffer: 5,
            mouse_buffer: 8,
            tick_rate: Duration::from_millis(16),
            flush_cap: 512,
        }
    }
}

impl InputBackendOpts {
    pub fn with_tick_rate(mut self, tick_rate: Duration) -> Self {
        self.tick_rate = tick_rate;
        self
    }
}

/// Reads terminal input on a tokio task and hands it over in batches.
pub struct InputHandler {
    rx: UnboundedReceiver<InputEvents>,
    task_handle: Option<JoinHandle<()>>,
    cancel: CancellationToken,
    backend: Option<InputBackend>,
    opts: InputBackendOpts,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::with_opts(InputBackendOpts::default())
    }

    pub fn with_opts(opts: InputBackendOpts) -> Self {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        Self {
            rx,
            task_handle: None,
            backend: Some(InputBackend::new(opts, tx, cancel.clone())),
            opts,
            cancel,
        }
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    pub fn start(&mut self) -> Result<()> {
        let backend = self
            .backend
            .take()
            .ok_or(anyhow!("Input handler already started"))?;
        self.task_handle = Some(tokio::spawn(backend.run()));
        Ok(())
    }

    pub fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }

    pub fn flush_events(&mut self) -> Option<InputEvents> {
        if !self.is_running() {
            return None;
        }

        let mut key_events: Vec<KeyEvent> = Vec::new();
        let mut mouse_events: Vec<MouseEvent> = Vec::new();

        while let Ok((keys, mouses)) = self.rx.try_recv() {
            if let Some(keys) = keys {
                key_events.extend(keys);
            }
            if let Some(mouses) = mouses {
                mouse_events.extend(mouses);
            }
            // never stall a frame on a flood of input
            if key_events.len() + mouse_events.len() > self.opts.flush_cap {
                break;
            }
        }
        match (key_events.len(), mouse_events.len()) {
            (0, 0) => None,
            (_, 0) => Some((Some(key_events), None)),
            (0, _) => Some((None, Some(mouse_events))),
            (_, _) => Some((Some(key_events), Some(mouse_events))),
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputHandler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Pending wheel notches, summed per axis until the next tick.
#[derive(Debug, Clone, Copy)]
struct WheelAccumulator {
    vertical: i32,   // +N down, -N up
    horizontal: i32, // +N right, -N left
    column: u16,
    row: u16,
    modifiers: KeyModifiers,
}

impl Default for WheelAccumulator {
    fn default() -> Self {
        Self {
            vertical: 0,
            horizontal: 0,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        }
    }
}

impl WheelAccumulator {
    fn add(&mut self, event: &MouseEvent) -> bool {
        match event.kind {
            MouseEventKind::ScrollDown => self.vertical += 1,
            MouseEventKind::ScrollUp => self.vertical -= 1,
            MouseEventKind::ScrollRight => self.horizontal += 1,
            MouseEventKind::ScrollLeft => self.horizontal -= 1,
            _ => return false,
        }
        // wheel events are delivered where the pointer was last seen
        self.column = event.column;
        self.row = event.row;
        self.modifiers = event.modifiers;
        true
    }

    /// Expand the sums into one event per notch.
    fn drain(&mut self) -> Vec<MouseEvent> {
        let mut events = Vec::new();
        let axes = [
            (
                self.vertical,
                MouseEventKind::ScrollDown,
                MouseEventKind::ScrollUp,
            ),
            (
                self.horizontal,
                MouseEventKind::ScrollRight,
                MouseEventKind::ScrollLeft,
            ),
        ];
        for (delta, forward, backward) in axes {
            let kind = if delta > 0 { forward } else { backward };
            for _ in 0..delta.unsigned_abs() {
                events.push(MouseEvent {
                    kind,
                    column: self.column,
                    row: self.row,
                    modifiers: self.modifiers,
                });
            }
        }
        self.vertical = 0;
        self.horizontal = 0;
        events
    }
}

struct InputBackend {
    tx: UnboundedSender<InputEvents>,
    key_buffer: Vec<KeyEvent>,
    mouse_buffer: Vec<MouseEvent>,
    wheel: WheelAccumulator,
    cancel: CancellationToken,
    opts: InputBackendOpts,
}

impl InputBackend {
    fn new(opts: InputBackendOpts, tx: UnboundedSender<InputEvents>, cancel: CancellationToken) -> Self {
        Self {
            tx,
            key_buffer: Vec::with_capacity(opts.key_buffer),
            mouse_buffer: Vec::with_capacity(opts.mouse_buffer),
            wheel: WheelAccumulator::default(),
            cancel,
            opts,
        }
    }

    /// Push the current buffers through the channel in one packet.
    fn flush(&mut self) {
        if self.key_buffer.is_empty() && self.mouse_buffer.is_empty() {
            return;
        }
        let keys = (!self.key_buffer.is_empty()).then(|| std::mem::take(&mut self.key_buffer));
        let mouses =
            (!self.mouse_buffer.is_empty()).then(|| std::mem::take(&mut self.mouse_buffer));
        let _ = self.tx.send((keys, mouses));
    }

    fn handle(&mut self, event: CrosstermEvent) {
        match event {
            CrosstermEvent::Mouse(mouse) => {
                if self.wheel.add(&mouse) {
                    return;
                }
                // notches seen before this event go out ahead of it
                let wheel = self.wheel.drain();
                self.mouse_buffer.extend(wheel);
                self.mouse_buffer.push(mouse);
                if self.mouse_buffer.len() >= self.opts.mouse_buffer {
                    self.flush();
                }
            }
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                self.key_buffer.push(key);
                if self.key_buffer.len() >= self.opts.key_buffer {
                    self.flush();
                }
            }
            _ => {}
        }
    }

    async fn run(mut self) {
        let mut events = EventStream::new();
        let mut interval = tokio::time::interval(self.opts.tick_rate);
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                maybe_event = events.next().fuse() => match maybe_event {
                    Some(Ok(event)) => self.handle(event),
                    Some(Err(err)) => trace!("input stream error: {err}"),
                    None => break,
                },
                _ = interval.tick() => {
                    let wheel = self.wheel.drain();
                    self.mouse_buffer.extend(wheel);
                    self.flush();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wheel(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn coalesces_notches_at_last_position() {
        let mut acc = WheelAccumulator::default();
        assert!(acc.add(&wheel(MouseEventKind::ScrollDown, 3, 4)));
        assert!(acc.add(&wheel(MouseEventKind::ScrollDown, 3, 5)));
        assert!(acc.add(&wheel(MouseEventKind::ScrollUp, 6, 7)));
        assert!(acc.add(&wheel(MouseEventKind::ScrollLeft, 6, 7)));
        assert!(!acc.add(&wheel(MouseEventKind::Moved, 0, 0)));

        let events = acc.drain();
        assert_eq!(
            events,
            vec![
                wheel(MouseEventKind::ScrollDown, 6, 7),
                wheel(MouseEventKind::ScrollLeft, 6, 7),
            ]
        );
        assert!(acc.drain().is_empty());
    }

    #[test]
    fn wheel_before_click_keeps_its_order() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut backend = InputBackend::new(InputBackendOpts::default(), tx, CancellationToken::new());

        let down = wheel(MouseEventKind::Down(crossterm::event::MouseButton::Left), 9, 2);
        backend.handle(CrosstermEvent::Mouse(wheel(MouseEventKind::ScrollDown, 4, 4)));
        backend.handle(CrosstermEvent::Mouse(down));
        backend.handle(CrosstermEvent::Mouse(wheel(MouseEventKind::ScrollUp, 5, 5)));
        backend.flush();
        assert_eq!(backend.wheel.drain().len(), 1);

        let (keys, mouses) = rx.try_recv().unwrap();
        assert!(keys.is_none());
        assert_eq!(
            mouses.unwrap(),
            vec![wheel(MouseEventKind::ScrollDown, 4, 4), down]
        );
    }
}
