//! Shared test setup for the Supperchain proof-of-work crates.
//!
//! Every test calls [`init`] first. It installs a tracing subscriber and the
//! `color-eyre` report and panic hooks, once per test binary.
// Standard lints
#![warn(missing_docs)]
#![allow(clippy::try_err)]
#![forbid(unsafe_code)]

use std::{fmt, panic::PanicHookInfo, sync::Once};

use color_eyre::section::PanicMessage;
use owo_colors::OwoColorize;
use tracing_error::ErrorLayer;
use tracing_subscriber::{prelude::*, EnvFilter};

pub mod prelude;

static INIT: Once = Once::new();

/// Log directives used when `RUST_LOG` is not set.
///
/// Rejected headers and difficulty transitions are logged at `debug`, and
/// many tests reject them on purpose.
const DEFAULT_LOG_DIRECTIVES: &str = "warn,supper_chain=error,supper_consensus=error";

/// Backtrace frames that never point at the code under test.
const HIDDEN_FRAMES: &[&str] = &[
    "std::panic",
    "core::panic",
    "core::ops::function::FnOnce::call_once",
    "test::run_test",
    "test::assert_test_result",
    "proptest::",
];

/// The panic payload `libtest` uses when a test returns an `Err`.
const RETURNED_ERR_PANIC: &str =
    "the test returned a termination value with a non-zero status code";

/// Install the tracing subscriber and error reporting hooks for tests.
///
/// Safe to call from every test: only the first call has any effect.
pub fn init() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter());

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_test_writer(),
            )
            .with(ErrorLayer::default())
            .init();

        color_eyre::config::HookBuilder::default()
            .add_frame_filter(Box::new(|frames| {
                frames.retain(|frame| match frame.name.as_deref() {
                    Some(name) => !HIDDEN_FRAMES.iter().any(|hidden| name.starts_with(hidden)),
                    None => true,
                });
                frames.dedup_by_key(|frame| (frame.filename.clone(), frame.lineno));
            }))
            .panic_message(TestPanicMessage)
            .install()
            .expect("test hooks are only installed once");
    })
}

/// Returns the log filter used when `RUST_LOG` is not set.
fn default_filter() -> EnvFilter {
    EnvFilter::try_new(DEFAULT_LOG_DIRECTIVES).expect("hard-coded directives are valid")
}

/// Returns the panic payload as a string, if it is one.
fn payload_str<'a>(info: &'a PanicHookInfo<'_>) -> &'a str {
    let payload = info.payload();

    payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("<non string panic payload>")
}

/// Prints test panics, except the ones `libtest` raises for tests that
/// returned an `Err`. The error report has already been printed for those.
struct TestPanicMessage;

impl PanicMessage for TestPanicMessage {
    fn display(&self, info: &PanicHookInfo<'_>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let payload = payload_str(info);

        if payload.contains(RETURNED_ERR_PANIC) {
            return write!(f, "---- test returned an error ----");
        }

        writeln!(f, "{}", "\nTest panicked.".red())?;
        writeln!(f, "Message:  {}", payload.cyan())?;

        match info.location() {
            Some(location) => write!(
                f,
                "Location: {}:{}",
                location.file().purple(),
                location.line().purple()
            ),
            None => write!(f, "Location: <unknown>"),
        }
    }
}
