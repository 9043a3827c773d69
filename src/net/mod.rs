//! Network layer dissectors & their value types.

mod arp;
pub use arp::*;

mod ether_type;
pub use ether_type::*;

mod icmp_extensions;
pub use icmp_extensions::*;

mod icmpv4;
pub use icmpv4::*;

mod icmpv6;
pub use icmpv6::*;

mod ip_dscp;
pub use ip_dscp::*;

mod ip_ecn;
pub use ip_ecn::*;

mod ip_frag_offset;
pub use ip_frag_offset::*;

mod ip_number;
pub use ip_number::*;

mod ipv4;
pub use ipv4::*;

mod ipv6;
pub use ipv6::*;

mod ipv6_exts;
pub use ipv6_exts::*;

mod ipv6_flow_label;
pub use ipv6_flow_label::*;
