//! The external collaborator contract: chunk storage presence, client interest, and
//! the sink that finished chunks are handed off to. All three are provided by the
//! owning world/server and are treated as thread-safe by contract.

use crate::pipeline::GeneratedChunk;

/// Everything the generator needs from the surrounding world to do its job, without
/// owning or depending on chunk storage, networking, or client tracking itself.
pub trait WorldHandle: Send + Sync {
    /// Is this chunk already persisted or loaded? If so the worker skips generation
    /// entirely.
    fn is_chunk_available(&self, cx: i32, cz: i32) -> bool;

    /// Is any client currently within view distance of this chunk? Consulted only
    /// when the queue is over its high-water mark, to decide whether an overloaded
    /// worker may skip generating a chunk nobody is watching.
    fn any_client_within_view(&self, cx: i32, cz: i32) -> bool;

    /// Hand off a finished chunk. Called on the worker thread; must not block for
    /// long — queuing for persistence is this callback's own responsibility.
    fn deliver_chunk(&self, cx: i32, cz: i32, chunk: GeneratedChunk);
}
