//! Transport layer dissectors.

mod tcp;
pub use tcp::*;

mod tcp_options;
pub use tcp_options::*;

mod udp;
pub use udp::*;
