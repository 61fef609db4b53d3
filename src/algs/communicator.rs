//! Thin façade over intra-process (Rayon) or inter-process (MPI) message passing.
//!
//! Messages are contiguous byte slices. Handles are waitable; callers must
//! `.wait()` every handle before trusting a receive buffer or dropping a send.

use bytes::Bytes;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Message tag shared by all ranks taking part in one exchange.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CommTag(u16);

impl CommTag {
    #[inline]
    pub const fn new(tag: u16) -> Self {
        Self(tag)
    }

    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Tag `n` steps after this one.
    #[inline]
    pub const fn offset(self, n: u16) -> Self {
        Self(self.0.wrapping_add(n))
    }
}

/// Tags for the two stages of a ghost exchange.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GhostCommTags {
    pub sizes: CommTag,
    pub data: CommTag,
}

impl GhostCommTags {
    #[inline]
    pub const fn from_base(base: CommTag) -> Self {
        Self {
            sizes: base,
            data: base.offset(1),
        }
    }
}

/// Non-blocking communication interface.
pub trait Communicator: Send + Sync + 'static {
    /// Handle returned by `isend`.
    type SendHandle: Wait;
    /// Handle returned by `irecv`.
    type RecvHandle: Wait;

    fn isend(&self, peer: usize, tag: u16, buf: &[u8]) -> Self::SendHandle;
    /// Post a receive of at most `buf.len()` bytes; the data arrives through
    /// [`Wait::wait`].
    fn irecv(&self, peer: usize, tag: u16, buf: &mut [u8]) -> Self::RecvHandle;

    fn rank(&self) -> usize;
    fn size(&self) -> usize;
}

/// Anything that can be waited on.
pub trait Wait {
    /// Wait for completion and return the received data (if any).
    fn wait(self) -> Option<Vec<u8>>;
}

impl Wait for () {
    fn wait(self) -> Option<Vec<u8>> {
        None
    }
}

/// No-op communicator for serial runs: a single rank with no neighbours.
#[derive(Clone, Debug, Default)]
pub struct NoComm;

impl Communicator for NoComm {
    type SendHandle = ();
    type RecvHandle = ();

    fn isend(&self, _peer: usize, _tag: u16, _buf: &[u8]) {}
    fn irecv(&self, _peer: usize, _tag: u16, _buf: &mut [u8]) {}

    fn rank(&self) -> usize {
        0
    }
    fn size(&self) -> usize {
        1
    }
}

// --- RayonComm: intra-process / multi-thread ---
type Key = (usize, usize, u16); // (src, dst, tag)

/// One `(src, dst, tag)` channel. Every message carries the sender's sequence
/// number and every posted receive claims the next receiver-side number, so a
/// receive only ever matches the message sent for it.
#[derive(Debug, Default)]
struct Channel {
    sent: u64,
    posted: u64,
    queue: VecDeque<(u64, Bytes)>,
}

impl Channel {
    /// Pop the message numbered `seq`, dropping older ones whose receive
    /// was abandoned.
    fn take(&mut self, seq: u64) -> Option<Bytes> {
        while let Some(&(front, _)) = self.queue.front() {
            if front >= seq {
                break;
            }
            self.queue.pop_front();
            log::debug!("dropped stale message #{front} (waiting for #{seq})");
        }
        match self.queue.front() {
            Some(&(front, _)) if front == seq => self.queue.pop_front().map(|(_, b)| b),
            _ => None,
        }
    }
}

static MAILBOX: Lazy<DashMap<Key, Channel>> = Lazy::new(DashMap::new);

/// Pending receive from the in-process mailbox.
#[derive(Debug)]
pub struct LocalHandle {
    key: Key,
    seq: u64,
    max_len: usize,
    timeout: Duration,
}

impl Wait for LocalHandle {
    fn wait(self) -> Option<Vec<u8>> {
        let start = Instant::now();
        loop {
            let popped = MAILBOX
                .get_mut(&self.key)
                .and_then(|mut channel| channel.take(self.seq));
            if let Some(bytes) = popped {
                let n = bytes.len().min(self.max_len);
                return Some(bytes[..n].to_vec());
            }
            if start.elapsed() >= self.timeout {
                log::warn!(
                    "receive from rank {} (tag {}) timed out after {:?}",
                    self.key.0,
                    self.key.2,
                    self.timeout
                );
                return None;
            }
            std::thread::yield_now();
        }
    }
}

/// Ranks simulated as threads of one process; messages go through a global
/// mailbox, first in first out per `(src, dst, tag)`.
///
/// The n-th receive posted on a channel matches only the n-th send on it.
/// A receive that timed out still consumes its number, so the message that
/// arrives for it later is discarded instead of answering the next receive.
#[derive(Clone, Debug)]
pub struct RayonComm {
    rank: usize,
    size: usize,
    timeout: Duration,
}

impl RayonComm {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(rank: usize, size: usize) -> Self {
        Self {
            rank,
            size,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// How long `wait` polls before giving up on a receive.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Communicator for RayonComm {
    type SendHandle = ();
    type RecvHandle = LocalHandle;

    fn isend(&self, peer: usize, tag: u16, buf: &[u8]) {
        let mut channel = MAILBOX.entry((self.rank, peer, tag)).or_default();
        let seq = channel.sent;
        channel.sent += 1;
        channel.queue.push_back((seq, Bytes::copy_from_slice(buf)));
    }

    fn irecv(&self, peer: usize, tag: u16, buf: &mut [u8]) -> LocalHandle {
        let key = (peer, self.rank, tag);
        let seq = {
            let mut channel = MAILBOX.entry(key).or_default();
            channel.posted += 1;
            channel.posted - 1
        };
        LocalHandle {
            key,
            seq,
            max_len: buf.len(),
            timeout: self.timeout,
        }
    }

    fn rank(&self) -> usize {
        self.rank
    }
    fn size(&self) -> usize {
        self.size
    }
}

// --- MPI backend (feature = "mpi-support") ---
#[cfg(feature = "mpi-support")]
mod mpi_backend {
    use super::{Communicator, Wait};
    use mpi::point_to_point::{Destination, Source};
    use mpi::topology::{Communicator as _, SimpleCommunicator};

    /// Communicator over `MPI_COMM_WORLD`.
    ///
    /// The caller keeps the `mpi::environment::Universe` alive. Sends are
    /// standard-mode and complete inside `isend`; receives happen in `wait`.
    #[derive(Clone, Debug)]
    pub struct MpiComm {
        rank: usize,
        size: usize,
    }

    impl MpiComm {
        pub fn new(world: &SimpleCommunicator) -> Self {
            Self {
                rank: world.rank() as usize,
                size: world.size() as usize,
            }
        }
    }

    pub struct MpiRecvHandle {
        peer: i32,
        tag: i32,
        max_len: usize,
    }

    impl Wait for MpiRecvHandle {
        fn wait(self) -> Option<Vec<u8>> {
            let world = SimpleCommunicator::world();
            let (mut data, _status) = world
                .process_at_rank(self.peer)
                .receive_vec_with_tag::<u8>(self.tag);
            data.truncate(self.max_len);
            Some(data)
        }
    }

    impl Communicator for MpiComm {
        type SendHandle = ();
        type RecvHandle = MpiRecvHandle;

        fn isend(&self, peer: usize, tag: u16, buf: &[u8]) {
            let world = SimpleCommunicator::world();
            world
                .process_at_rank(peer as i32)
                .send_with_tag(buf, i32::from(tag));
        }

        fn irecv(&self, peer: usize, tag: u16, buf: &mut [u8]) -> MpiRecvHandle {
            MpiRecvHandle {
                peer: peer as i32,
                tag: i32::from(tag),
                max_len: buf.len(),
            }
        }

        fn rank(&self) -> usize {
            self.rank
        }
        fn size(&self) -> usize {
            self.size
        }
    }
}

#[cfg(feature = "mpi-support")]
pub use mpi_backend::MpiComm;
