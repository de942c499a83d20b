//! Process-wide logging setup shared by the binaries.

pub mod tracing;

pub use self::tracing::{LogFormat, UnknownLogFormat};

/// Initialize logging from `RUST_LOG` and `LOG_FORMAT`.
///
/// An unset `LOG_FORMAT` means JSON; any other unrecognized value is an error.
/// Safe to call more than once; later calls are no-ops.
pub fn init() -> Result<(), UnknownLogFormat> {
    let format = LogFormat::from_env_value(std::env::var("LOG_FORMAT").ok().as_deref())?;
    self::tracing::init(format, "info");
    Ok(())
}
