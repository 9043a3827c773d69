//! The composition operator: `a / b` appends `b` at the innermost end
//! of `a`'s chain (propagating next-protocol fields, see
//! [`Pdu::push`]).

use crate::layer::Pdu;
use crate::*;

impl<T: Into<Pdu>> core::ops::Div<T> for Pdu {
    type Output = Pdu;

    fn div(mut self, rhs: T) -> Pdu {
        self.push(rhs.into());
        self
    }
}

/// Generates the conversions into [`AnyLayer`]/[`Pdu`] and the `/`
/// composition operator for a concrete layer struct.
macro_rules! impl_layer_conversions {
    ($($layer:ty => $variant:ident,)*) => {
        $(
            impl From<$layer> for AnyLayer {
                fn from(layer: $layer) -> AnyLayer {
                    AnyLayer::$variant(layer)
                }
            }

            impl From<$layer> for Pdu {
                fn from(layer: $layer) -> Pdu {
                    Pdu::new(AnyLayer::$variant(layer))
                }
            }

            impl<T: Into<Pdu>> core::ops::Div<T> for $layer {
                type Output = Pdu;

                fn div(self, rhs: T) -> Pdu {
                    Pdu::from(self) / rhs
                }
            }
        )*
    };
}

impl_layer_conversions! {
    Ethernet2Header => Ethernet2,
    VlanHeader => Dot1Q,
    PppoeHeader => Pppoe,
    MplsHeader => Mpls,
    ArpPacket => Arp,
    Ipv4Header => Ipv4,
    Ipv6Header => Ipv6,
    TcpHeader => Tcp,
    UdpHeader => Udp,
    Icmpv4Header => Icmpv4,
    Icmpv6Header => Icmpv6,
    DnsMessage => Dns,
    DhcpMessage => Dhcp,
    Dhcpv6Message => Dhcpv6,
    Dot11Beacon => Dot11Beacon,
    Dot11ProbeReq => Dot11ProbeReq,
    Dot11ProbeResp => Dot11ProbeResp,
    Dot11AssocReq => Dot11AssocReq,
    Dot11AssocResp => Dot11AssocResp,
    Dot11ReassocReq => Dot11ReassocReq,
    Dot11ReassocResp => Dot11ReassocResp,
    Dot11Auth => Dot11Auth,
    Dot11Deauth => Dot11Deauth,
    Dot11Disassoc => Dot11Disassoc,
    Dot11Action => Dot11Action,
    Dot11Control => Dot11Control,
    Dot11Data => Dot11Data,
    RadioTapHeader => RadioTap,
    PpiHeader => Ppi,
    LlcHeader => Llc,
    SnapHeader => Snap,
    StpBpdu => Stp,
    EapolRc4 => EapolRc4,
    EapolRsn => EapolRsn,
    BfdPacket => Bfd,
    RtpHeader => Rtp,
    VxlanHeader => Vxlan,
    SllHeader => Sll,
    Sll2Header => Sll2,
    PktapHeader => Pktap,
    LoopbackHeader => Loopback,
    RawData => Raw,
}

impl From<Vec<u8>> for Pdu {
    fn from(payload: Vec<u8>) -> Pdu {
        Pdu::new(AnyLayer::Raw(RawData::from(payload)))
    }
}

impl From<&[u8]> for Pdu {
    fn from(payload: &[u8]) -> Pdu {
        Pdu::new(AnyLayer::Raw(RawData::from(payload)))
    }
}
