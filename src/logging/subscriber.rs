//! Tracing subscriber setup: console formatter, file layer, and initialisation.
//!
//! Besides plain messages, two event kinds get their own rendering: stage
//! headers (`==> Installing git`) and tool outcomes emitted by the run
//! summary, which carry `tool`, `status` and `detail` fields instead of a
//! message.
use std::fs;
use std::io::Write as _;
use std::sync::Mutex;

use tracing::Level;
use tracing::field::{Field, Visit};

use super::types::ToolEntry;
use super::utils::{format_utc_datetime, format_utc_time, log_file_path, strip_ansi};

/// Tracing target for stage headers.
pub(super) const STAGE_TARGET: &str = "devutils::stage";

/// Tracing target for per-tool summary lines.
pub(super) const TOOL_TARGET: &str = "devutils::tool";

/// The fields devutils events carry.
#[derive(Debug, Default)]
struct EventFields {
    message: String,
    tool: Option<String>,
    status: Option<String>,
    detail: Option<String>,
}

impl EventFields {
    fn from_event(event: &tracing::Event<'_>) -> Self {
        let mut fields = Self::default();
        event.record(&mut fields);
        fields
    }

    /// The tool outcome, when the event is a well-formed summary line.
    fn tool_entry(&self) -> Option<ToolEntry> {
        Some(ToolEntry {
            name: self.tool.clone()?,
            status: self.status.as_deref()?.parse().ok()?,
            detail: self.detail.clone().filter(|d| !d.is_empty()),
        })
    }

    fn set(&mut self, name: &str, value: String) {
        match name {
            "message" => self.message = value,
            "tool" => self.tool = Some(value),
            "status" => self.status = Some(value),
            "detail" => self.detail = Some(value),
            _ => {}
        }
    }
}

impl Visit for EventFields {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.set(field.name(), format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.set(field.name(), value.to_string());
    }
}

/// Console rendering of one event, without the trailing newline.
fn console_line(level: Level, target: &str, fields: &EventFields) -> String {
    let msg = &fields.message;
    if target == TOOL_TARGET
        && let Some(entry) = fields.tool_entry()
    {
        return format!("  {}{}\x1b[0m", entry.status.color(), entry.line());
    }
    match level {
        Level::ERROR => format!("\x1b[31mERROR\x1b[0m {msg}"),
        Level::WARN => format!("\x1b[33mWARN\x1b[0m  {msg}"),
        Level::INFO if target == STAGE_TARGET => {
            format!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m")
        }
        Level::INFO => format!("  {msg}"),
        _ => format!("  \x1b[2m{msg}\x1b[0m"),
    }
}

/// Log-file rendering of one event: timestamped and free of ANSI codes.
fn file_line(ts: &str, level: Level, target: &str, fields: &EventFields) -> String {
    if target == TOOL_TARGET
        && let Some(entry) = fields.tool_entry()
    {
        return format!("[{ts}]     {}", entry.line());
    }
    let msg = strip_ansi(&fields.message);
    match (level, target) {
        (Level::INFO, STAGE_TARGET) => format!("[{ts}] ==> {msg}"),
        (Level::ERROR, _) => format!("[{ts}]     [error] {msg}"),
        (Level::WARN, _) => format!("[{ts}]     [warn] {msg}"),
        (Level::DEBUG | Level::TRACE, _) => format!("[{ts}]     [debug] {msg}"),
        _ => format!("[{ts}]     {msg}"),
    }
}

/// A [`tracing_subscriber::Layer`] that appends all events to the persistent
/// log file with timestamps and ANSI codes stripped.
///
/// Always captures events at `DEBUG` level and above regardless of the
/// console verbosity setting.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Open the log file for `command`, truncating any previous run, and
    /// write a header naming the build.
    ///
    /// Returns `None` if the cache directory cannot be created or the file
    /// cannot be opened.
    pub(super) fn new(command: &str) -> Option<Self> {
        let path = log_file_path(command)?;
        let header = format!(
            "==========================================\n\
             devutils {} ({}) {command} {}\n\
             ==========================================\n",
            crate::commands::version::current(),
            crate::commands::version::target(),
            format_utc_datetime(),
        );
        fs::write(&path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(&path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();
        let fields = EventFields::from_event(event);
        let line = file_line(&format_utc_time(), *metadata.level(), metadata.target(), &fields);
        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "{line}").ok();
        }
    }
}

/// A [`tracing_subscriber::fmt::FormatEvent`] for the devutils console style.
struct ConsoleFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let fields = EventFields::from_event(event);
        writeln!(
            writer,
            "{}",
            console_line(*metadata.level(), metadata.target(), &fields)
        )
    }
}

/// Initialise the global [`tracing`] subscriber.
///
/// Warnings and errors go to stderr, everything else to stdout.  The file
/// layer writes all events (including `debug`) to
/// `$XDG_CACHE_HOME/devutils/<command>.log`.  Must be called once at program
/// startup, before any logging.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let make_writer = std::io::stderr
        .with_max_level(Level::WARN)
        .and(std::io::stdout.with_min_level(Level::INFO));

    let console_layer = fmt::layer()
        .event_format(ConsoleFormatter)
        .with_writer(make_writer)
        .with_filter(console_level);

    let file_layer = FileLayer::new(command).map(|l| l.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
