//! Diagnostics for the command line tool.

use std::io;

use anyhow::Context;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the default log filter.
pub const LOG_ENV: &str = "NUMINT_LOG";

/// Install a stderr subscriber filtered by `filter` (an `EnvFilter`
/// directive such as `debug` or `numint=trace`). `None` and `off` disable
/// logging. Returns false if a subscriber was already installed.
pub fn init(filter: Option<&str>) -> anyhow::Result<bool> {
  if tracing::dispatcher::has_been_set() {
    return Ok(false);
  }

  let directive = filter.unwrap_or("off");
  let filter = if directive.eq_ignore_ascii_case("off") {
    EnvFilter::default().add_directive(LevelFilter::OFF.into())
  } else {
    EnvFilter::try_new(directive)
      .with_context(|| format!("invalid log filter `{directive}`"))?
  };

  let stderr_layer = tracing_subscriber::fmt::layer()
    .with_writer(io::stderr)
    .with_target(false);
  tracing_subscriber::registry()
    .with(filter)
    .with(stderr_layer)
    .try_init()
    .context("failed to initialize logging")?;

  Ok(true)
}
