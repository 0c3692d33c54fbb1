//! The byte-moving loops behind `push` and `drain`, kept generic over the
//! reader, writer and ring storage so they run the same against stdin/stdout
//! and a mapped file as against in-memory buffers.

use spool_ring::{ByteRing, send};
use std::io::{self, Read, Write};
use tracing::{debug, warn};

/// Result of a `push` pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushOutcome {
    /// Bytes that reached the destination ring.
    pub sent: usize,
    /// Bytes left in staging when the destination filled up; they are dropped.
    pub dropped: usize,
}

/// Stages `input` through `staging` and sends it into `ring` until the input
/// ends or `ring` is full.
///
/// Input is only read while staging is empty, so at most one staging load is
/// ever dropped on a full ring.
pub fn push<R, S, D>(
    input: &mut R,
    staging: &mut ByteRing<S>,
    ring: &mut ByteRing<D>,
) -> io::Result<PushOutcome>
where
    R: Read,
    S: AsRef<[u8]> + AsMut<[u8]>,
    D: AsRef<[u8]> + AsMut<[u8]>,
{
    let mut chunk = vec![0u8; staging.capacity()];
    let mut sent = 0usize;

    loop {
        if staging.is_empty() {
            let n = match input.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            staging.write(&chunk[..n]);
        }

        let moved = send(ring, staging, usize::MAX);
        if moved == 0 {
            warn!(
                pending = staging.size(),
                capacity = ring.capacity(),
                "ring full, dropping remaining input"
            );
            break;
        }
        sent += moved;
        debug!(moved, size = ring.size(), "staged chunk sent");
    }

    let dropped = staging.size();
    staging.reset();
    Ok(PushOutcome { sent, dropped })
}

/// Writes the contents of `ring` to `out`, consuming exactly the bytes `out`
/// accepted. On a write error the bytes already written stay consumed and
/// the rest stay in the ring.
pub fn drain<D, W>(ring: &mut ByteRing<D>, out: &mut W, buf: &mut [u8]) -> io::Result<usize>
where
    D: AsRef<[u8]> + AsMut<[u8]>,
    W: Write,
{
    let mut total = 0usize;

    loop {
        let n = ring.peek(buf);
        if n == 0 {
            break;
        }
        let mut written = 0;
        while written < n {
            match out.write(&buf[written..n]) {
                Ok(0) => {
                    return Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "output closed while draining",
                    ));
                }
                Ok(k) => {
                    ring.skip(k);
                    written += k;
                    total += k;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    out.flush()?;
    Ok(total)
}
