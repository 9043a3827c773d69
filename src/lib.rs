//! A library for crafting & dissecting layered network packets
//! (Ethernet II, VLAN, ARP, IPv4, IPv6, TCP, UDP, ICMP, DNS, DHCP,
//! 802.11, RadioTap, EAPOL, BFD, RTP, VXLAN, Linux cooked captures ...).
//!
//! Packets are modeled as a chain of protocol layers: every [`Pdu`]
//! carries one layer (an [`AnyLayer`] variant) and exclusively owns at
//! most one inner layer. Chains are built with the `/` operator and
//! serialized byte exactly, with checksum, length & next-protocol
//! fields recomputed from the chain itself.
//!
//! # Crafting packets
//!
//! ```
//! use wirecraft::*;
//! use core::net::Ipv4Addr;
//!
//! let chain = Ethernet2Header::new(
//!         "7a:1f:f4:39:ab:0d".parse().unwrap(),
//!         "13:da:de:f1:01:85".parse().unwrap(),
//!     )
//!     / Ipv4Header::new(Ipv4Addr::new(192, 168, 0, 100), Ipv4Addr::new(192, 168, 0, 1))
//!     / UdpHeader::new(1024, 53)
//!     / RawData::from(&b"payload"[..]);
//!
//! let bytes = chain.serialize().unwrap();
//! assert_eq!(bytes.len(), chain.len());
//! // the ether type & IP protocol fields were filled in from the chain
//! assert_eq!([0x08, 0x00], [bytes[12], bytes[13]]);
//! assert_eq!(17, bytes[23]);
//! ```
//!
//! # Dissecting packets
//!
//! ```
//! use wirecraft::*;
//!
//! # let bytes = (Ethernet2Header::new(MacAddr::ZERO, MacAddr::BROADCAST)
//! #     / Ipv4Header::new(core::net::Ipv4Addr::LOCALHOST, core::net::Ipv4Addr::LOCALHOST)
//! #     / TcpHeader::new(80, 12345))
//! #     .serialize()
//! #     .unwrap();
//! let chain = Ethernet2Header::parse(&bytes).unwrap();
//! if let Some(tcp) = chain.find(LayerType::Tcp) {
//!     if let AnyLayer::Tcp(tcp) = &tcp.layer {
//!         println!("{} -> {}", tcp.source_port, tcp.destination_port);
//!     }
//! }
//! ```
//!
//! Payloads that can not be decoded (unknown protocol values, short or
//! contradictory data) are preserved as [`RawData`] layers, so a chain
//! parse below the root never fails and always round trips.
//!
//! # Capture files
//!
//! [`PcapReader`] & [`PcapWriter`] read & write classic pcap files;
//! [`Sniffer`] drives a callback loop over any [`CaptureSource`].
//! Reassembly of fragmented IPv4 packets ([`IpDefragPool`]) & of TCP
//! payload streams ([`TcpStreamFollower`]) operates on parsed chains.

pub mod err;

mod addr;
pub use addr::*;

mod app;
pub use app::*;

mod capture;
pub use capture::*;

pub mod checksum;

mod defrag;
pub use defrag::*;

pub mod dispatch;

mod io;
pub use crate::io::{InputStream, OutputStream};

mod layer;
pub use layer::*;

mod link;
pub use link::*;

mod net;
pub use net::*;

mod options;
pub use options::*;

mod packet;
pub use packet::*;

mod stream;
pub use stream::*;

mod transport;
pub use transport::*;
