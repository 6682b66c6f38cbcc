//! Logger setup for the binary.

use std::path::Path;

use flexi_logger::{
    Cleanup, Criterion, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming, opt_format,
};

/// Start logging at `level` unless `RUST_LOG` says otherwise.
///
/// Logs go to stderr, so stdout stays clean for the text protocol. With a
/// `log_dir` they go to rotating files there instead. Keep the returned
/// handle alive for as long as logging is wanted.
pub fn setup_logging(
    level: &str,
    log_dir: Option<&Path>,
) -> Result<LoggerHandle, FlexiLoggerError> {
    let logger = Logger::try_with_env_or_str(level)?.format(opt_format);
    let logger = match log_dir {
        Some(dir) => logger
            .log_to_file(FileSpec::default().directory(dir))
            .rotate(
                Criterion::Size(10 * 1024 * 1024),
                Naming::Numbers,
                Cleanup::KeepLogFiles(3),
            ),
        None => logger.log_to_stderr(),
    };
    logger.start()
}
