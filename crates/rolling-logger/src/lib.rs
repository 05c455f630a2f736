//! Rolling Logger
//!
//! A `tracing` layer that formats each event as one line, keeps the most
//! recent lines in a circular buffer, and forwards them to the browser console
//! (wasm32) or stderr (native).

use std::collections::VecDeque;
use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex, OnceLock};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Lines kept when no capacity is given
pub const DEFAULT_CAPACITY: usize = 500;

/// Fixed-size buffer of formatted lines, oldest dropped first
#[derive(Debug)]
pub struct RingBuffer {
    lines: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { lines: Mutex::new(VecDeque::with_capacity(capacity)), capacity }
    }

    pub fn push(&self, line: String) {
        let mut lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

/// Collects an event's message and fields into one line
#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

/// Layer writing every event into a `RingBuffer` and the platform console
pub struct RingLayer {
    buffer: Arc<RingBuffer>,
    echo: bool,
}

impl RingLayer {
    pub fn new(buffer: Arc<RingBuffer>) -> Self {
        Self { buffer, echo: true }
    }

    /// Keep lines in the buffer only
    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }
}

/// `[HH:MM:SS.mmm LEVEL target] message k=v`
pub fn format_line(time: &str, level: &Level, target: &str, message: &str, fields: &str) -> String {
    format!("[{} {:<5} {}] {}{}", time, level.as_str(), target, message, fields)
}

impl<S: Subscriber> Layer<S> for RingLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);

        let meta = event.metadata();
        let time = chrono::Local::now().format("%H:%M:%S%.3f").to_string();
        let line = format_line(&time, meta.level(), meta.target(), &visitor.message, &visitor.fields);

        if self.echo {
            emit(meta.level(), &line);
        }
        self.buffer.push(line);
    }
}

#[cfg(target_arch = "wasm32")]
fn emit(level: &Level, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    match *level {
        Level::ERROR => web_sys::console::error_1(&value),
        Level::WARN => web_sys::console::warn_1(&value),
        Level::INFO => web_sys::console::info_1(&value),
        _ => web_sys::console::debug_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(_level: &Level, line: &str) {
    eprintln!("{}", line);
}

/// Handle to the installed logger's buffer
#[derive(Clone, Debug)]
pub struct LogHandle {
    buffer: Arc<RingBuffer>,
}

impl LogHandle {
    /// Oldest first
    pub fn recent_lines(&self) -> Vec<String> {
        self.buffer.lines()
    }

    pub fn clear(&self) {
        self.buffer.clear();
    }
}

static INSTALLED: OnceLock<LogHandle> = OnceLock::new();

/// Install the global subscriber. Later calls return the first handle.
pub fn init_logger(app_name: &str, capacity: usize, max_level: LevelFilter) -> Result<LogHandle, TryInitError> {
    if let Some(handle) = INSTALLED.get() {
        return Ok(handle.clone());
    }

    let buffer = Arc::new(RingBuffer::new(capacity));
    tracing_subscriber::registry()
        .with(max_level)
        .with(RingLayer::new(Arc::clone(&buffer)))
        .try_init()?;

    let handle = INSTALLED.get_or_init(|| LogHandle { buffer }).clone();
    tracing::info!(app = app_name, capacity, "logger initialized");
    Ok(handle)
}
