//! Command-line argument structures for the `snmp-walk` tool.

use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::time::Duration;

use crate::Version;
use crate::util::resolve_target;

/// SNMP version for CLI argument parsing.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum SnmpVersion {
    /// SNMPv1 message layout
    #[value(name = "1")]
    V1,
    /// SNMPv2c (default)
    #[default]
    #[value(name = "2c")]
    V2c,
}

impl From<SnmpVersion> for Version {
    fn from(v: SnmpVersion) -> Self {
        match v {
            SnmpVersion::V1 => Version::V1,
            SnmpVersion::V2c => Version::V2c,
        }
    }
}

/// Target and session arguments.
#[derive(Debug, Parser)]
pub struct CommonArgs {
    /// Agent host or IP, optionally with :port (default port 161).
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Message version.
    #[arg(short = 'v', long = "snmp-version", default_value = "2c")]
    pub snmp_version: SnmpVersion,

    /// Community string.
    #[arg(short = 'c', long = "community", default_value = "public")]
    pub community: String,

    /// Per-step timeout in milliseconds.
    #[arg(short = 't', long = "timeout", default_value = "5000")]
    pub timeout_ms: u64,
}

impl CommonArgs {
    /// Resolve the target, defaulting to port 161.
    pub fn target_addr(&self) -> Result<SocketAddr, String> {
        resolve_target(&self.target).map_err(|e| format!("invalid target '{}': {}", self.target, e))
    }

    /// Get the timeout as a Duration.
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Walk-specific arguments.
#[derive(Debug, Parser)]
pub struct WalkArgs {
    /// Stop after this many results.
    #[arg(long = "max-results", value_name = "N")]
    pub max_results: Option<usize>,

    /// Accept replies without matching their request id.
    #[arg(long = "no-verify-id")]
    pub no_verify_id: bool,
}

/// Output control arguments.
#[derive(Debug, Parser)]
pub struct OutputArgs {
    /// Suppress the progress dots.
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Enable debug logging (snmp_walker=debug).
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Enable trace logging (snmp_walker=trace).
    #[arg(short = 'D', long = "trace")]
    pub trace: bool,
}

impl OutputArgs {
    /// Initialize tracing based on debug/trace flags.
    ///
    /// `RUST_LOG` is ignored; the flags pick the level.
    pub fn init_tracing(&self) {
        use tracing_subscriber::EnvFilter;

        let filter = if self.trace {
            "snmp_walker=trace"
        } else if self.debug {
            "snmp_walker=debug"
        } else {
            "snmp_walker=warn"
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(filter))
            .with_writer(std::io::stderr)
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Parser)]
    struct TestArgs {
        #[command(flatten)]
        common: CommonArgs,
        #[command(flatten)]
        walk: WalkArgs,
        #[command(flatten)]
        output: OutputArgs,
    }

    #[test]
    fn test_defaults() {
        let args = TestArgs::try_parse_from(["snmp-walk", "192.168.1.1"]).unwrap();
        assert_eq!(args.common.community, "public");
        assert_eq!(args.common.timeout_duration(), Duration::from_secs(5));
        assert_eq!(Version::from(args.common.snmp_version), Version::V2c);
        assert_eq!(args.walk.max_results, None);
        assert!(!args.walk.no_verify_id);
        assert!(!args.output.debug);
        assert_eq!(args.common.target_addr().unwrap().port(), 161);
    }

    #[test]
    fn test_flags() {
        let args = TestArgs::try_parse_from([
            "snmp-walk",
            "10.0.0.1:1161",
            "-c",
            "private",
            "-t",
            "250",
            "-v",
            "1",
            "--max-results",
            "20",
            "--trace",
        ])
        .unwrap();
        assert_eq!(args.common.community, "private");
        assert_eq!(args.common.timeout_duration(), Duration::from_millis(250));
        assert_eq!(Version::from(args.common.snmp_version), Version::V1);
        assert_eq!(args.walk.max_results, Some(20));
        assert!(args.output.trace);
        assert_eq!(args.common.target_addr().unwrap().port(), 1161);
    }

    #[test]
    fn test_unknown_version_rejected() {
        assert!(TestArgs::try_parse_from(["snmp-walk", "host", "-v", "3"]).is_err());
    }
}
