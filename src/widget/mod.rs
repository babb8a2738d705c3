// src/widget/mod.rs
//
// Client side of the support chat: the per-session message list and turn
// state machine, the transport-chunk-safe SSE decoder, and a reqwest-based
// driver that ties them to a running relay.

pub mod client;
pub mod session;
pub mod sse;
