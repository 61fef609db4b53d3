//! Communication, wire framing and ghost exchange.

pub mod communicator;
pub mod ghost_exchange;
pub mod wire;

pub use communicator::{CommTag, Communicator, GhostCommTags, NoComm, RayonComm, Wait};
pub use ghost_exchange::{exchange_ghosts, pack_ghosts, unpack_ghosts};
