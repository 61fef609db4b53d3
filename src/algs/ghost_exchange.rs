//! Framing and neighbour exchange of ghost records.
//!
//! Ghost records carry no tag or length, so a batch travels as one frame:
//!
//! ```text
//! [WireHdr: version, KIND_GHOST_FRAME][WireCount: n][kind u8][record] x n
//! ```
//!
//! [`exchange_ghosts`] sends one frame to every neighbour in two stages,
//! frame sizes first, then the frames. Both stages always run to completion
//! on every rank, even when a size fails to arrive: each rank posts the same
//! sends and receives per round, so a failed round leaves no message behind
//! that could be taken for the next round's. Every send handle is drained
//! before returning.

use crate::algs::communicator::{CommTag, Communicator, GhostCommTags, Wait};
use crate::algs::wire::{KIND_GHOST_FRAME, WIRE_VERSION, WireCount, WireHdr, cast_slice, cast_slice_mut};
use crate::ghost::{GhostInfo, GhostKind, read_ghost, write_ghost};
use crate::mesh_error::MeshError;
use crate::stream::{InStream, OutStream};
use bytes::{BufMut, Bytes, BytesMut};
use std::collections::{BTreeMap, HashMap, HashSet};

const PREAMBLE: usize = WireHdr::SIZE + WireCount::SIZE;

/// Encode a batch of records into one frame.
///
/// Fails with [`MeshError::WireMismatch`] when the batch or the frame is too
/// long for the 32-bit count fields.
pub fn pack_ghosts(ghosts: &[GhostInfo]) -> Result<Bytes, MeshError> {
    let count = WireCount::try_new(ghosts.len())?;
    let body: usize = ghosts.iter().map(|g| 1 + g.kind().wire_size()).sum();
    WireCount::try_new(PREAMBLE + body)?;
    let mut buf = BytesMut::with_capacity(PREAMBLE + body);
    buf.put_slice(cast_slice(&[WireHdr::new(KIND_GHOST_FRAME)]));
    buf.put_slice(cast_slice(&[count]));
    for ghost in ghosts {
        buf.put_byte(ghost.kind().to_byte());
        write_ghost(&mut buf, ghost);
    }
    Ok(buf.freeze())
}

/// Decode a frame produced by [`pack_ghosts`].
pub fn unpack_ghosts(frame: &[u8]) -> Result<Vec<GhostInfo>, MeshError> {
    if frame.len() < PREAMBLE {
        return Err(MeshError::WireMismatch(format!(
            "frame of {} bytes is shorter than its {PREAMBLE}-byte header",
            frame.len()
        )));
    }
    let hdr: WireHdr = bytemuck::pod_read_unaligned(&frame[..WireHdr::SIZE]);
    if hdr.version() != WIRE_VERSION {
        return Err(MeshError::WireMismatch(format!(
            "wire version {} (expected {WIRE_VERSION})",
            hdr.version()
        )));
    }
    if hdr.kind() != KIND_GHOST_FRAME {
        return Err(MeshError::WireMismatch(format!(
            "frame kind {} (expected {KIND_GHOST_FRAME})",
            hdr.kind()
        )));
    }
    let count: WireCount = bytemuck::pod_read_unaligned(&frame[WireHdr::SIZE..PREAMBLE]);
    let count = count.get();

    let mut input = &frame[PREAMBLE..];
    // never trust the count for the allocation
    let mut ghosts = Vec::with_capacity(count.min(input.len() / (1 + TETRA_MIN)));
    for _ in 0..count {
        let kind = GhostKind::from_byte(input.get_byte()?)?;
        ghosts.push(read_ghost(&mut input, kind)?);
    }
    if input.remaining_bytes() != 0 {
        return Err(MeshError::WireMismatch(format!(
            "{} trailing bytes after {count} ghost records",
            input.remaining_bytes()
        )));
    }
    Ok(ghosts)
}

const TETRA_MIN: usize = GhostKind::Tetra.wire_size();

/// Send `outgoing[nbr]` to every neighbour and collect what they send back.
///
/// `neighbors` must be symmetric across ranks: every rank listed here posts a
/// frame to this one, possibly empty. Records addressed to this rank itself
/// are returned without touching the communicator.
pub fn exchange_ghosts<C>(
    outgoing: &HashMap<usize, Vec<GhostInfo>>,
    neighbors: &HashSet<usize>,
    comm: &C,
    tags: GhostCommTags,
) -> Result<HashMap<usize, Vec<GhostInfo>>, MeshError>
where
    C: Communicator,
{
    let me = comm.rank();
    let mut received = HashMap::new();
    if let Some(own) = outgoing.get(&me) {
        received.insert(me, own.clone());
    }

    if let Some(&stray) = outgoing.keys().find(|&&r| r != me && !neighbors.contains(&r)) {
        return Err(MeshError::CommError {
            neighbor: stray,
            message: "ghost records addressed to a rank that is not a neighbor".into(),
        });
    }
    // everything that can fail locally fails before the first message
    let frames: BTreeMap<usize, (WireCount, Bytes)> = neighbors
        .iter()
        .copied()
        .filter(|&nbr| nbr != me)
        .map(|nbr| {
            let batch = outgoing.get(&nbr).map_or(&[][..], Vec::as_slice);
            let frame = pack_ghosts(batch)?;
            Ok((nbr, (WireCount::try_new(frame.len())?, frame)))
        })
        .collect::<Result<_, MeshError>>()?;

    let (sizes, size_err) = exchange_frame_sizes(&frames, comm, tags.sizes);
    let incoming = exchange_frames(&frames, &sizes, comm, tags.data);
    if let Some(err) = size_err {
        return Err(err);
    }
    for (nbr, frame) in incoming? {
        let ghosts = unpack_ghosts(&frame).map_err(|e| MeshError::CommError {
            neighbor: nbr,
            message: e.to_string(),
        })?;
        received.insert(nbr, ghosts);
    }

    log::debug!(
        "rank {me}: ghost exchange with {} neighbors, {} records in",
        frames.len(),
        received.values().map(Vec::len).sum::<usize>()
    );
    Ok(received)
}

/// Stage 1: byte length of each neighbour's frame, plus the first failure.
///
/// A neighbour whose size did not arrive is missing from the map.
fn exchange_frame_sizes<C: Communicator>(
    frames: &BTreeMap<usize, (WireCount, Bytes)>,
    comm: &C,
    tag: CommTag,
) -> (HashMap<usize, usize>, Option<MeshError>) {
    // 1) post all receives
    let mut recvs = Vec::with_capacity(frames.len());
    for &nbr in frames.keys() {
        let mut cnt = WireCount::zero();
        let h = comm.irecv(nbr, tag.as_u16(), cast_slice_mut(std::slice::from_mut(&mut cnt)));
        recvs.push((nbr, h));
    }

    // 2) post all sends
    let mut pending_sends = Vec::with_capacity(frames.len());
    for (&nbr, (count, _)) in frames {
        pending_sends.push(comm.isend(nbr, tag.as_u16(), cast_slice(std::slice::from_ref(count))));
    }

    // 3) wait for all receives without returning early
    let mut sizes = HashMap::with_capacity(recvs.len());
    let mut maybe_err = None;
    for (nbr, h) in recvs {
        match h.wait() {
            Some(data) if data.len() == WireCount::SIZE => {
                let cnt: WireCount = bytemuck::pod_read_unaligned(&data);
                sizes.insert(nbr, cnt.get());
            }
            Some(data) if maybe_err.is_none() => {
                maybe_err = Some(MeshError::CommError {
                    neighbor: nbr,
                    message: format!(
                        "expected {} bytes for size header, got {}",
                        WireCount::SIZE,
                        data.len()
                    ),
                });
            }
            None if maybe_err.is_none() => {
                maybe_err = Some(MeshError::CommError {
                    neighbor: nbr,
                    message: "failed to receive frame size".into(),
                });
            }
            _ => {}
        }
    }

    // 4) always drain the sends
    for send in pending_sends {
        let _ = send.wait();
    }

    (sizes, maybe_err)
}

/// Stage 2: the frames themselves.
///
/// Runs for every neighbour. Where the size is unknown the frame is still
/// received, then discarded.
fn exchange_frames<C: Communicator>(
    frames: &BTreeMap<usize, (WireCount, Bytes)>,
    sizes: &HashMap<usize, usize>,
    comm: &C,
    tag: CommTag,
) -> Result<Vec<(usize, Vec<u8>)>, MeshError> {
    let mut recvs = Vec::with_capacity(frames.len());
    for &nbr in frames.keys() {
        let expected = sizes.get(&nbr).copied();
        let mut buf = vec![0u8; expected.unwrap_or(0)];
        let h = comm.irecv(nbr, tag.as_u16(), &mut buf);
        recvs.push((nbr, expected, h));
    }

    let mut pending_sends = Vec::with_capacity(frames.len());
    for (&nbr, (_, frame)) in frames {
        pending_sends.push(comm.isend(nbr, tag.as_u16(), frame));
    }

    let mut incoming = Vec::with_capacity(recvs.len());
    let mut maybe_err = None;
    for (nbr, expected, h) in recvs {
        let data = h.wait();
        let Some(len) = expected else {
            // stage 1 already failed for this neighbour
            continue;
        };
        match data {
            Some(data) if data.len() == len => {
                if maybe_err.is_none() {
                    incoming.push((nbr, data));
                }
            }
            Some(data) if maybe_err.is_none() => {
                maybe_err = Some(MeshError::CommError {
                    neighbor: nbr,
                    message: format!("expected a {len}-byte frame, got {}", data.len()),
                });
            }
            None if maybe_err.is_none() => {
                maybe_err = Some(MeshError::CommError {
                    neighbor: nbr,
                    message: "failed to receive ghost frame".into(),
                });
            }
            _ => {}
        }
    }

    for send in pending_sends {
        let _ = send.wait();
    }

    match maybe_err {
        Some(err) => Err(err),
        None => {
            incoming.sort_unstable_by_key(|(nbr, _)| *nbr);
            Ok(incoming)
        }
    }
}
