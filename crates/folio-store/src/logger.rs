//! Pluggable logging sink.
//!
//! The store reports what it does through a [`Logger`] rather than calling
//! `tracing` directly, so embedders can route or silence its output. The
//! default sink, [`TracingLogger`], forwards everything to `tracing`.

use std::fmt;

/// Log severity, most severe first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Fatal,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Fatal => "FATAL",
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        };
        f.write_str(name)
    }
}

/// A sink for leveled log messages.
///
/// Implementors only need [`Logger::log`]; the per-level methods are
/// conveniences. Messages arrive as `format_args!` output so nothing is
/// allocated for sinks that drop them.
pub trait Logger: Send + Sync {
    fn log(&self, level: Level, args: fmt::Arguments<'_>);

    fn fatal(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Fatal, args);
    }

    fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, args);
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args);
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args);
    }

    fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args);
    }

    fn trace(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Trace, args);
    }
}

/// Forwards every message to the `tracing` macro of the same level.
///
/// `tracing` has no fatal level; fatal messages are emitted at `ERROR` with
/// a `fatal = true` field.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        match level {
            Level::Fatal => tracing::error!(fatal = true, "{}", args),
            Level::Error => tracing::error!("{}", args),
            Level::Warn => tracing::warn!("{}", args),
            Level::Info => tracing::info!("{}", args),
            Level::Debug => tracing::debug!("{}", args),
            Level::Trace => tracing::trace!("{}", args),
        }
    }
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _level: Level, _args: fmt::Arguments<'_>) {}
}
