//! sysplotd - Host metrics agent.
//!
//! Samples the local process table on a fixed period, encodes each snapshot
//! into one framed wire document, and streams the documents to a remote
//! collector over a persistent TCP connection. Runs until interrupted,
//! reconnecting forever on failure.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use clap::Parser;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use sysplot_core::collector::{Collector, NameFilter, RealFs};
use sysplot_core::schedule::Interval;
use sysplot_core::transport::Transport;
use sysplot_core::wire::encode_snapshot;

/// Host metrics agent.
#[derive(Parser)]
#[command(name = "sysplotd", about = "Host metrics agent", version)]
struct Args {
    /// Collector address.
    #[arg(short, long, default_value = "127.0.0.1")]
    address: String,

    /// Collector TCP port.
    #[arg(short, long, default_value = "8001")]
    port: u16,

    /// Sampling period in seconds.
    #[arg(short, long, default_value = "3")]
    interval: u64,

    /// Process name pattern (regex, matched anywhere in the name); may be
    /// given multiple times. No patterns means every process.
    #[arg(short = 'P', long = "pattern")]
    patterns: Vec<String>,

    /// Path to the proc filesystem (for testing/mocking).
    #[arg(long, default_value = "/proc")]
    proc_path: String,

    /// Delay before reconnecting after a failure, in milliseconds.
    #[arg(long, default_value = "1000")]
    retry_delay_ms: u64,

    /// Increase logging verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Initializes the tracing subscriber with the appropriate log level.
/// Default level is INFO. Use -q for quiet mode (errors only).
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("sysplotd={}", level).parse().unwrap())
        .add_directive(format!("sysplot_core={}", level).parse().unwrap());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Human-readable pattern set for the startup log line.
fn describe_patterns(patterns: &[String]) -> String {
    if patterns.is_empty() {
        "<all processes>".to_string()
    } else {
        patterns.join(", ")
    }
}

fn main() {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    let filter = match NameFilter::new(&args.patterns) {
        Ok(filter) => filter,
        Err(e) => {
            error!("Invalid process pattern: {}", e);
            std::process::exit(2);
        }
    };

    info!("sysplotd {} starting", env!("CARGO_PKG_VERSION"));
    info!(
        "Config: collector={}:{}, interval={}s, patterns={}",
        args.address,
        args.port,
        args.interval,
        describe_patterns(&args.patterns)
    );

    // Setup graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    }) {
        warn!("Failed to set Ctrl-C handler: {}", e);
    }

    let retry_delay = Duration::from_millis(args.retry_delay_ms);
    let mut retry_count: u64 = 0;

    while running.load(Ordering::SeqCst) {
        run_cycle(&args, &filter, &running);
        if !running.load(Ordering::SeqCst) {
            break;
        }

        retry_count += 1;
        info!("Retrying connection ({} attempts so far)", retry_count);
        sleep_interruptible(retry_delay, &running);
    }

    info!("Shutdown complete");
}

/// One connect-and-sample cycle.
///
/// Builds a fresh transport and scheduler, then parks the foreground thread
/// until the link fails or shutdown is requested. Every failure takes the
/// same path: tear the cycle down and let the caller retry after its delay.
fn run_cycle(args: &Args, filter: &NameFilter, running: &Arc<AtomicBool>) {
    let transport = Transport::connect(&args.address, args.port);
    if !transport.ready() {
        return;
    }

    let collector = Collector::new(RealFs::new(), &args.proc_path, filter.clone());
    let link_down = Arc::new(AtomicBool::new(false));

    let ticker = {
        let link_down = Arc::clone(&link_down);
        let mut transport = transport;
        let mut tick_count: u64 = 0;
        Interval::start(
            Duration::ZERO,
            Duration::from_secs(args.interval),
            move || {
                if link_down.load(Ordering::SeqCst) {
                    return;
                }

                let snapshot = collector.collect_snapshot();
                let document = encode_snapshot(&snapshot);
                tick_count += 1;
                debug!(
                    "Snapshot #{}: {} processes, {} cores, {} bytes",
                    tick_count,
                    snapshot.processes.len(),
                    snapshot.cpus.len(),
                    document.len()
                );

                if let Err(e) = transport.send(document.as_bytes()) {
                    warn!("Send failed: {}", e);
                    link_down.store(true, Ordering::SeqCst);
                }
            },
        )
    };

    // Park until the link drops or shutdown is requested. Sampling and
    // sending happen entirely on the scheduler's thread.
    while running.load(Ordering::SeqCst) && !link_down.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_millis(200));
    }

    ticker.stop();
    ticker.wait();
}

/// Sleeps for `total`, checking the shutdown flag along the way.
fn sleep_interruptible(total: Duration, running: &Arc<AtomicBool>) {
    let step = Duration::from_millis(100);
    let mut remaining = total;
    while remaining > Duration::ZERO && running.load(Ordering::SeqCst) {
        let chunk = remaining.min(step);
        thread::sleep(chunk);
        remaining = remaining.saturating_sub(chunk);
    }
}
