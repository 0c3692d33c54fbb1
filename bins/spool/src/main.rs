use anyhow::{Context, bail};
use spool_config::SpoolConfig;
use spool_ring::ByteRing;
use spool_shm::{MappedRing, RingConfig};
use std::io;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod pump;

const USAGE: &str = "usage: spool <config.toml> <push|drain|stat>";

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let (Some(config_path), Some(command)) = (args.next(), args.next()) else {
        bail!(USAGE);
    };

    let cfg = SpoolConfig::load(config_path.as_str())
        .with_context(|| format!("loading config '{config_path}'"))?;
    init_tracing(&cfg.log_level);

    match command.as_str() {
        "push" => push(&cfg),
        "drain" => drain(&cfg),
        "stat" => stat(&cfg),
        other => bail!("unknown command '{other}'\n{USAGE}"),
    }
}

/// Logs go to stderr so `drain` can own stdout. `RUST_LOG` wins over the config.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open_ring(cfg: &SpoolConfig) -> anyhow::Result<MappedRing> {
    MappedRing::open_or_create(&cfg.ring_path, RingConfig::new(cfg.capacity))
        .with_context(|| format!("opening ring '{}'", cfg.ring_path))
}

/// Stages stdin through a heap ring and sends it into the mapped ring.
fn push(cfg: &SpoolConfig) -> anyhow::Result<()> {
    let mut mapped = open_ring(cfg)?;
    let mut staging = ByteRing::from_storage(vec![0u8; cfg.chunk_size]);
    let mut stdin = io::stdin().lock();

    let mut ring = mapped.ring()?;
    let outcome = pump::push(&mut stdin, &mut staging, &mut *ring).context("reading stdin")?;
    let (size, available) = (ring.size(), ring.available());
    drop(ring);
    mapped.flush()?;

    info!(
        bytes = outcome.sent,
        dropped = outcome.dropped,
        size,
        available,
        "push complete"
    );
    Ok(())
}

/// Copies the mapped ring to stdout, consuming only what was written out.
///
/// The cursor is persisted even when stdout fails partway, so a later drain
/// resumes after the last byte actually written.
fn drain(cfg: &SpoolConfig) -> anyhow::Result<()> {
    let mut mapped = open_ring(cfg)?;
    let mut buf = vec![0u8; cfg.chunk_size];
    let mut stdout = io::stdout().lock();

    let mut ring = mapped.ring()?;
    let drained = pump::drain(&mut *ring, &mut stdout, &mut buf);
    drop(ring);
    mapped.flush()?;

    let total = drained.context("writing stdout")?;
    info!(bytes = total, "drain complete");
    Ok(())
}

fn stat(cfg: &SpoolConfig) -> anyhow::Result<()> {
    let mut mapped = open_ring(cfg)?;
    let ring = mapped.ring()?;
    let cursor = ring.cursor();

    info!(
        path = %cfg.ring_path,
        capacity = ring.capacity(),
        size = ring.size(),
        available = ring.available(),
        head = cursor.head,
        "ring status"
    );
    println!(
        "capacity={} size={} available={} head={}",
        ring.capacity(),
        ring.size(),
        ring.available(),
        cursor.head
    );
    Ok(())
}
