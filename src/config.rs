//! Command-line surface and run configuration.
//!
//! All validation happens here, before any bus activity: bad values are a
//! startup error, never a dispatcher concern.

use clap::Parser;

use crate::error::{QrngError, Result};
use crate::request::ReportingMode;

/// Default number of octets requested per call.
pub const DEFAULT_OCTETS: u64 = 10;

/// Fetch random octets from the QRNG bus service.
#[derive(Debug, Parser)]
#[command(name = "qrng-client", version, about)]
pub struct Cli {
    /// Total number of requests to make.
    #[arg(short = 'n', long, default_value_t = 1)]
    pub count: u64,

    /// Octets requested per call.
    #[arg(short = 'b', long, default_value_t = DEFAULT_OCTETS)]
    pub octets: u64,

    /// Maximum requests in flight at once.
    #[arg(short = 'j', long, default_value_t = 1)]
    pub concurrency: u64,

    /// Advisory per-call timeout in milliseconds (0 = none).
    #[arg(short = 't', long = "timeout-ms", default_value_t = 0)]
    pub timeout_ms: u64,

    /// Suppress per-request summaries.
    #[arg(short, long)]
    pub quiet: bool,

    /// Connect to the system bus instead of the session bus.
    #[arg(long)]
    pub system: bool,

    /// Enable debug-level logging.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Validated, read-only parameters for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Number of calls to make.
    pub count: u64,
    /// Octets requested per call.
    pub octets: u64,
    /// In-flight cap.
    pub concurrency: u64,
    /// Advisory timeout passed through to each call.
    pub timeout_ms: u64,
    /// Suppress per-request summaries.
    pub quiet: bool,
    /// Use the system bus.
    pub system: bool,
}

impl RunConfig {
    /// Build a validated configuration from parsed arguments.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let cfg = Self {
            count: cli.count,
            octets: cli.octets,
            concurrency: cli.concurrency,
            timeout_ms: cli.timeout_ms,
            quiet: cli.quiet,
            system: cli.system,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject zero values for count, octets and concurrency.
    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(QrngError::Config("count must be positive".into()));
        }
        if self.octets == 0 {
            return Err(QrngError::Config("octets must be positive".into()));
        }
        if self.concurrency == 0 {
            return Err(QrngError::Config("concurrency must be positive".into()));
        }
        Ok(())
    }

    /// Derive how successful payloads are reported: single-request runs
    /// dump hex, multi-request runs log summaries unless quieted.
    pub fn reporting_mode(&self) -> ReportingMode {
        if self.count == 1 {
            ReportingMode::HexDump
        } else if self.quiet {
            ReportingMode::Silent
        } else {
            ReportingMode::Summary
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> RunConfig {
        RunConfig {
            count: 1,
            octets: DEFAULT_OCTETS,
            concurrency: 1,
            timeout_ms: 0,
            quiet: false,
            system: false,
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn test_zero_count_rejected() {
        let cfg = RunConfig { count: 0, ..base() };
        assert!(matches!(cfg.validate(), Err(QrngError::Config(_))));
    }

    #[test]
    fn test_zero_octets_rejected() {
        let cfg = RunConfig {
            octets: 0,
            ..base()
        };
        assert!(matches!(cfg.validate(), Err(QrngError::Config(_))));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let cfg = RunConfig {
            concurrency: 0,
            ..base()
        };
        assert!(matches!(cfg.validate(), Err(QrngError::Config(_))));
    }

    #[test]
    fn test_single_request_run_dumps_hex() {
        assert_eq!(base().reporting_mode(), ReportingMode::HexDump);
        // The quiet override does not apply to single-request runs.
        let cfg = RunConfig {
            quiet: true,
            ..base()
        };
        assert_eq!(cfg.reporting_mode(), ReportingMode::HexDump);
    }

    #[test]
    fn test_multi_request_run_logs_summaries() {
        let cfg = RunConfig { count: 5, ..base() };
        assert_eq!(cfg.reporting_mode(), ReportingMode::Summary);
    }

    #[test]
    fn test_quiet_silences_multi_request_runs() {
        let cfg = RunConfig {
            count: 5,
            quiet: true,
            ..base()
        };
        assert_eq!(cfg.reporting_mode(), ReportingMode::Silent);
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from([
            "qrng-client",
            "-n",
            "5",
            "-b",
            "32",
            "-j",
            "2",
            "--timeout-ms",
            "500",
            "--quiet",
        ]);
        let cfg = RunConfig::from_cli(cli).unwrap();
        assert_eq!(cfg.count, 5);
        assert_eq!(cfg.octets, 32);
        assert_eq!(cfg.concurrency, 2);
        assert_eq!(cfg.timeout_ms, 500);
        assert!(cfg.quiet);
        assert!(!cfg.system);
    }

    #[test]
    fn test_cli_zero_count_is_a_startup_error() {
        let cli = Cli::parse_from(["qrng-client", "-n", "0"]);
        assert!(RunConfig::from_cli(cli).is_err());
    }
}
