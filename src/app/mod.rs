//! Application layer dissectors.

mod bfd;
pub use bfd::*;

mod dhcp;
pub use dhcp::*;

mod dhcpv6;
pub use dhcpv6::*;

mod dns;
pub use dns::*;

mod rtp;
pub use rtp::*;
