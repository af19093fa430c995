//! snmp-walk: walk an SNMP subtree with GetNext.

use clap::Parser;
use snmp_walker::cli::args::{CommonArgs, OutputArgs, WalkArgs};
use snmp_walker::{Client, Oid, WalkOutcome, WalkState};
use std::io::Write;
use std::process::ExitCode;
use std::time::Instant;

/// Walk an SNMP subtree using GETNEXT.
#[derive(Debug, Parser)]
#[command(name = "snmp-walk", version, about)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    output: OutputArgs,

    #[command(flatten)]
    walk: WalkArgs,

    /// OID subtree to walk, in dotted notation.
    #[arg(value_name = "OID")]
    oid: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    args.output.init_tracing();

    let target = match args.common.target_addr() {
        Ok(addr) => addr,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let oid = match Oid::parse(&args.oid) {
        Ok(oid) => oid,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();
    let outcome = match run_walk(&args, target, oid).await {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let elapsed = start.elapsed();

    let mut stdout = std::io::stdout().lock();
    for (oid, value) in outcome.results.rendered() {
        if writeln!(stdout, "{} = {}", oid, value).is_err() {
            return ExitCode::FAILURE;
        }
    }

    eprintln!(
        "{} entries from {} in {:.2?}",
        outcome.results.len(),
        target,
        elapsed
    );

    match outcome.state {
        WalkState::Aborted(reason) => {
            eprintln!("Walk aborted: {}", reason);
            ExitCode::FAILURE
        }
        _ => ExitCode::SUCCESS,
    }
}

async fn run_walk(
    args: &Args,
    target: std::net::SocketAddr,
    oid: Oid,
) -> snmp_walker::Result<WalkOutcome> {
    let mut builder = Client::builder(target.to_string(), args.common.community.clone())
        .version(args.common.snmp_version.into())
        .timeout(args.common.timeout_duration())
        .verify_request_id(!args.walk.no_verify_id);
    if let Some(max) = args.walk.max_results {
        builder = builder.max_walk_results(max);
    }
    let client = builder.connect().await?;

    let mut walk = client.walk(oid)?;
    let mut stderr = std::io::stderr();
    while walk.next().await.is_some() {
        if !args.output.quiet {
            let _ = write!(stderr, ".");
            let _ = stderr.flush();
        }
    }
    if !args.output.quiet && !walk.results().is_empty() {
        let _ = writeln!(stderr);
    }

    Ok(walk.run().await)
}
