use anyhow::Result;
use flexi_logger::{FileSpec, Logger, LoggerHandle};

/// Route diagnostics to a file under the user's local data directory.
///
/// The returned handle must stay alive for the lifetime of the process;
/// dropping it shuts the logger down.
pub fn init() -> Result<LoggerHandle> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("causerie");

    let handle = Logger::try_with_env_or_str("info")?
        .log_to_file(FileSpec::default().directory(log_dir).basename("causerie"))
        .start()?;

    Ok(handle)
}
