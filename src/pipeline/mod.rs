//! Event intake and forwarding: the per-delivery decision pipeline and the
//! shared state it consults.

pub mod dedup;
pub mod identity;
pub mod language;
pub mod router;
pub mod sink;
pub mod translation;
