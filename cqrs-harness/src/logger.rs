use std::{fmt, rc::Rc};

/// Sink for human-readable lines produced during a test.
///
/// Receives handler log lines written through
/// [`AggregateScope::log`](crate::AggregateScope::log) and
/// [`ProcessScope::log`](crate::ProcessScope::log), instance lifecycle lines
/// (`created`, `destroyed`, `begun`, `ended`), every recorded event and
/// executed command with its rendering, and the report of
/// [`TestResult::expect`](crate::testing::TestResult::expect).
///
/// Implemented for [`SilentLogger`], [`PrintLogger`], [`Tracer`] and any
/// `Fn(&str)` closure, so capturing lines in a test is a one-liner:
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
/// use cqrs_harness::Logger;
///
/// let lines = Rc::new(RefCell::new(Vec::<String>::new()));
/// let sink = {
///     let lines = lines.clone();
///     move |line: &str| lines.borrow_mut().push(line.to_owned())
/// };
/// sink.log("account 'A1' opened");
/// assert_eq!(lines.borrow().len(), 1);
/// ```
pub trait Logger {
    fn log(&self, line: &str);
}

pub(crate) type SharedLogger = Rc<dyn Logger>;

impl<F: Fn(&str)> Logger for F {
    fn log(&self, line: &str) {
        self(line)
    }
}

/// Discards every line.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentLogger;

impl Logger for SilentLogger {
    fn log(&self, _line: &str) {}
}

/// Writes lines to stdout.
///
/// The default logger. The Rust test runner captures stdout per test and
/// shows it only when the test fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrintLogger;

impl Logger for PrintLogger {
    fn log(&self, line: &str) {
        println!("{line}");
    }
}

/// Forwards lines to the `tracing` crate at `info` level.
///
/// Multi-line reports are emitted as a single event. Install a subscriber
/// (e.g. `tracing_subscriber::fmt`) to see them.
///
/// # Example
///
/// ```ignore
/// use cqrs_harness::{Engine, Tracer};
///
/// let engine = Engine::builder().aggregate(AccountHandler).logger(Tracer).build()?;
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct Tracer;

impl Logger for Tracer {
    fn log(&self, line: &str) {
        tracing::info!(target: "cqrs_harness", "{line}");
    }
}

/// Prefix a log line with the handler and instance it concerns.
pub(crate) fn instance_line(handler: &str, instance_id: &str, text: impl fmt::Display) -> String {
    format!("{handler} '{instance_id}' {text}")
}
