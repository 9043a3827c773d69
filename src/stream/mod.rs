//! Reconstruction of TCP payload streams from captured segments.

mod tcp_follower;
pub use tcp_follower::*;

mod tcp_stream;
pub use tcp_stream::*;
