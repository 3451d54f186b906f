use chrono::Local;
use nu_ansi_term::{Color, Style};
use std::fmt;
use tracing::{Event, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    prelude::*,
    registry::LookupSpan,
    Layer,
};

/// Console + rolling-file logging. The returned guard flushes the file
/// writer and MUST be kept alive by the caller.
pub fn setup_logger() -> Option<WorkerGuard> {
    std::fs::create_dir_all("logs").ok();

    let file_appender = tracing_appender::rolling::hourly("logs", "ghosttx");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .event_format(FileFormatter)
        .with_filter(LevelFilter::DEBUG);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .event_format(ConsoleFormatter)
        .with_filter(LevelFilter::INFO);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .init();

    Some(guard)
}

// --- Formatters ---

struct MessageVisitor {
    message: String,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        }
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

/// Colorizes the bracket tags of the trace vocabulary.
fn paint_tags(message: &str) -> String {
    const GREEN: &[&str] = &["[SUCCESS]", "[TRIGGER]", "[AUTH]", "[READY]"];
    const RED: &[&str] = &["[ERROR]", "[CRITICAL]"];
    const YELLOW: &[&str] = &["[WARNING]", "[REVOKE]"];

    let mut painted = message.to_string();
    for tag in GREEN {
        if painted.contains(tag) {
            let style = Style::new().fg(Color::LightGreen).bold();
            painted = painted.replace(tag, &format!("{}", style.paint(*tag)));
        }
    }
    for tag in RED {
        if painted.contains(tag) {
            let style = Style::new().fg(Color::LightRed).bold();
            painted = painted.replace(tag, &format!("{}", style.paint(*tag)));
        }
    }
    for tag in YELLOW {
        if painted.contains(tag) {
            let style = Style::new().fg(Color::Yellow).bold();
            painted = painted.replace(tag, &format!("{}", style.paint(*tag)));
        }
    }
    painted
}

pub struct ConsoleFormatter;

impl<S, N> FormatEvent<S, N> for ConsoleFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut visitor = MessageVisitor {
            message: String::new(),
        };
        event.record(&mut visitor);

        write!(writer, "{}", paint_tags(&visitor.message))?;
        writeln!(writer)
    }
}

pub struct FileFormatter;

impl<S, N> FormatEvent<S, N> for FileFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let level = event.metadata().level();

        write!(writer, "{} [{}] ", timestamp, level)?;

        let mut visitor = MessageVisitor {
            message: String::new(),
        };
        event.record(&mut visitor);
        writeln!(writer, "{}", visitor.message)
    }
}
