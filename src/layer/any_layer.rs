use crate::err::SerializeError;
use crate::layer::{ChildInfo, PseudoHeader, ResponseMatch, SerializeCtx};
use crate::{dispatch, err, *};

/// Sum type over all protocol layers the crate can decode & write.
///
/// Every variant wraps the concrete layer struct. Code that needs a
/// specific layer matches on the enum (or uses [`Pdu::find`] with the
/// [`LayerType`] tag first):
///
/// ```
/// use wirecraft::*;
///
/// # let pdu = Pdu::from(UdpHeader::new(53, 1024));
/// if let AnyLayer::Udp(udp) = &pdu.layer {
///     assert_eq!(53, udp.source_port);
/// }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum AnyLayer {
    Ethernet2(Ethernet2Header),
    Dot1Q(VlanHeader),
    Dot1AD(VlanHeader),
    Pppoe(PppoeHeader),
    Mpls(MplsHeader),
    Arp(ArpPacket),
    Ipv4(Ipv4Header),
    Ipv6(Ipv6Header),
    Tcp(TcpHeader),
    Udp(UdpHeader),
    Icmpv4(Icmpv4Header),
    Icmpv6(Icmpv6Header),
    Dns(DnsMessage),
    Dhcp(DhcpMessage),
    Dhcpv6(Dhcpv6Message),
    Dot11Beacon(Dot11Beacon),
    Dot11ProbeReq(Dot11ProbeReq),
    Dot11ProbeResp(Dot11ProbeResp),
    Dot11AssocReq(Dot11AssocReq),
    Dot11AssocResp(Dot11AssocResp),
    Dot11ReassocReq(Dot11ReassocReq),
    Dot11ReassocResp(Dot11ReassocResp),
    Dot11Auth(Dot11Auth),
    Dot11Deauth(Dot11Deauth),
    Dot11Disassoc(Dot11Disassoc),
    Dot11Action(Dot11Action),
    Dot11Control(Dot11Control),
    Dot11Data(Dot11Data),
    RadioTap(RadioTapHeader),
    Ppi(PpiHeader),
    Llc(LlcHeader),
    Snap(SnapHeader),
    Stp(StpBpdu),
    EapolRc4(EapolRc4),
    EapolRsn(EapolRsn),
    Bfd(BfdPacket),
    Rtp(RtpHeader),
    Vxlan(VxlanHeader),
    Sll(SllHeader),
    Sll2(Sll2Header),
    Pktap(PktapHeader),
    Loopback(LoopbackHeader),
    Raw(RawData),
}

/// Expands to a match over every variant, binding the wrapped layer.
macro_rules! for_each_layer {
    ($value:expr, $layer:pat => $result:expr) => {
        match $value {
            AnyLayer::Ethernet2($layer) => $result,
            AnyLayer::Dot1Q($layer) => $result,
            AnyLayer::Dot1AD($layer) => $result,
            AnyLayer::Pppoe($layer) => $result,
            AnyLayer::Mpls($layer) => $result,
            AnyLayer::Arp($layer) => $result,
            AnyLayer::Ipv4($layer) => $result,
            AnyLayer::Ipv6($layer) => $result,
            AnyLayer::Tcp($layer) => $result,
            AnyLayer::Udp($layer) => $result,
            AnyLayer::Icmpv4($layer) => $result,
            AnyLayer::Icmpv6($layer) => $result,
            AnyLayer::Dns($layer) => $result,
            AnyLayer::Dhcp($layer) => $result,
            AnyLayer::Dhcpv6($layer) => $result,
            AnyLayer::Dot11Beacon($layer) => $result,
            AnyLayer::Dot11ProbeReq($layer) => $result,
            AnyLayer::Dot11ProbeResp($layer) => $result,
            AnyLayer::Dot11AssocReq($layer) => $result,
            AnyLayer::Dot11AssocResp($layer) => $result,
            AnyLayer::Dot11ReassocReq($layer) => $result,
            AnyLayer::Dot11ReassocResp($layer) => $result,
            AnyLayer::Dot11Auth($layer) => $result,
            AnyLayer::Dot11Deauth($layer) => $result,
            AnyLayer::Dot11Disassoc($layer) => $result,
            AnyLayer::Dot11Action($layer) => $result,
            AnyLayer::Dot11Control($layer) => $result,
            AnyLayer::Dot11Data($layer) => $result,
            AnyLayer::RadioTap($layer) => $result,
            AnyLayer::Ppi($layer) => $result,
            AnyLayer::Llc($layer) => $result,
            AnyLayer::Snap($layer) => $result,
            AnyLayer::Stp($layer) => $result,
            AnyLayer::EapolRc4($layer) => $result,
            AnyLayer::EapolRsn($layer) => $result,
            AnyLayer::Bfd($layer) => $result,
            AnyLayer::Rtp($layer) => $result,
            AnyLayer::Vxlan($layer) => $result,
            AnyLayer::Sll($layer) => $result,
            AnyLayer::Sll2($layer) => $result,
            AnyLayer::Pktap($layer) => $result,
            AnyLayer::Loopback($layer) => $result,
            AnyLayer::Raw($layer) => $result,
        }
    };
}

impl AnyLayer {
    /// Type tag of the wrapped layer.
    pub fn layer_type(&self) -> LayerType {
        use AnyLayer::*;
        match self {
            Ethernet2(_) => LayerType::Ethernet2,
            Dot1Q(_) => LayerType::Dot1Q,
            Dot1AD(_) => LayerType::Dot1AD,
            Pppoe(_) => LayerType::Pppoe,
            Mpls(_) => LayerType::Mpls,
            Arp(_) => LayerType::Arp,
            Ipv4(_) => LayerType::Ipv4,
            Ipv6(_) => LayerType::Ipv6,
            Tcp(_) => LayerType::Tcp,
            Udp(_) => LayerType::Udp,
            Icmpv4(_) => LayerType::Icmpv4,
            Icmpv6(_) => LayerType::Icmpv6,
            Dns(_) => LayerType::Dns,
            Dhcp(_) => LayerType::Dhcp,
            Dhcpv6(_) => LayerType::Dhcpv6,
            Dot11Beacon(_) => LayerType::Dot11Beacon,
            Dot11ProbeReq(_) => LayerType::Dot11ProbeReq,
            Dot11ProbeResp(_) => LayerType::Dot11ProbeResp,
            Dot11AssocReq(_) => LayerType::Dot11AssocReq,
            Dot11AssocResp(_) => LayerType::Dot11AssocResp,
            Dot11ReassocReq(_) => LayerType::Dot11ReassocReq,
            Dot11ReassocResp(_) => LayerType::Dot11ReassocResp,
            Dot11Auth(_) => LayerType::Dot11Auth,
            Dot11Deauth(_) => LayerType::Dot11Deauth,
            Dot11Disassoc(_) => LayerType::Dot11Disassoc,
            Dot11Action(_) => LayerType::Dot11Action,
            Dot11Control(_) => LayerType::Dot11Control,
            Dot11Data(_) => LayerType::Dot11Data,
            RadioTap(_) => LayerType::RadioTap,
            Ppi(_) => LayerType::Ppi,
            Llc(_) => LayerType::Llc,
            Snap(_) => LayerType::Snap,
            Stp(_) => LayerType::Stp,
            EapolRc4(_) => LayerType::EapolRc4,
            EapolRsn(_) => LayerType::EapolRsn,
            Bfd(_) => LayerType::Bfd,
            Rtp(_) => LayerType::Rtp,
            Vxlan(_) => LayerType::Vxlan,
            Sll(_) => LayerType::Sll,
            Sll2(_) => LayerType::Sll2,
            Pktap(_) => LayerType::Pktap,
            Loopback(_) => LayerType::Loopback,
            Raw(_) => LayerType::Raw,
        }
    }

    /// Bytes the wrapped layer contributes before its child.
    pub fn header_len(&self) -> usize {
        for_each_layer!(self, layer => layer.header_len())
    }

    /// Bytes the wrapped layer appends after its child.
    pub fn trailer_len(&self) -> usize {
        use AnyLayer::*;
        match self {
            Icmpv4(layer) => layer.trailer_len(),
            Icmpv6(layer) => layer.trailer_len(),
            Rtp(layer) => layer.trailer_len(),
            RadioTap(layer) => layer.trailer_len(),
            _ => 0,
        }
    }

    /// The [`err::Layer`] used when reporting errors for this layer.
    pub fn error_layer(&self) -> err::Layer {
        use AnyLayer::*;
        match self {
            Ethernet2(_) => err::Layer::Ethernet2Header,
            Dot1Q(_) | Dot1AD(_) => err::Layer::VlanHeader,
            Pppoe(_) => err::Layer::PppoeHeader,
            Mpls(_) => err::Layer::MplsHeader,
            Arp(_) => err::Layer::ArpPacket,
            Ipv4(_) => err::Layer::Ipv4Header,
            Ipv6(_) => err::Layer::Ipv6Header,
            Tcp(_) => err::Layer::TcpHeader,
            Udp(_) => err::Layer::UdpHeader,
            Icmpv4(_) => err::Layer::Icmpv4,
            Icmpv6(_) => err::Layer::Icmpv6,
            Dns(_) => err::Layer::DnsMessage,
            Dhcp(_) => err::Layer::DhcpMessage,
            Dhcpv6(_) => err::Layer::Dhcpv6Message,
            RadioTap(_) => err::Layer::RadioTapHeader,
            Ppi(_) => err::Layer::PpiHeader,
            Llc(_) => err::Layer::LlcHeader,
            Snap(_) => err::Layer::SnapHeader,
            Stp(_) => err::Layer::StpBpdu,
            EapolRc4(_) | EapolRsn(_) => err::Layer::EapolHeader,
            Bfd(_) => err::Layer::BfdHeader,
            Rtp(_) => err::Layer::RtpHeader,
            Vxlan(_) => err::Layer::VxlanHeader,
            Sll(_) | Sll2(_) => err::Layer::SllHeader,
            Pktap(_) => err::Layer::PktapHeader,
            Loopback(_) => err::Layer::LoopbackHeader,
            Raw(_) => err::Layer::RawPayload,
            _ => err::Layer::Dot11Header,
        }
    }

    /// Writes the layer into `buf` (the whole subtree slice, child bytes
    /// already rendered behind the header area).
    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        child: Option<ChildInfo>,
        ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        for_each_layer!(self, layer => layer.write_layer(buf, child, ctx))
    }

    /// Updates the next-protocol field of this layer for the given child
    /// tag, when the layer has such a field and the dispatch tables know
    /// a value for the tag. Unknown tags leave the field untouched.
    pub fn set_next_protocol(&mut self, child: LayerType) {
        use AnyLayer::*;
        match self {
            Ethernet2(eth) => {
                if let Some(ether_type) = dispatch::ether_type_of(child) {
                    eth.ether_type = ether_type;
                }
            }
            Dot1Q(vlan) | Dot1AD(vlan) => {
                if let Some(ether_type) = dispatch::ether_type_of(child) {
                    vlan.ether_type = ether_type;
                }
            }
            Snap(snap) => {
                if let Some(ether_type) = dispatch::ether_type_of(child) {
                    snap.protocol = ether_type;
                }
            }
            Sll2(sll2) => {
                if let Some(ether_type) = dispatch::ether_type_of(child) {
                    sll2.protocol = ether_type;
                }
            }
            Sll(sll) => {
                if let Some(ether_type) = dispatch::ether_type_of(child) {
                    sll.protocol = ether_type;
                }
            }
            Ipv4(ip) => {
                if let Some(protocol) = dispatch::ip_number_of(child) {
                    ip.protocol = protocol;
                }
            }
            Ipv6(ip) => {
                if let Some(protocol) = dispatch::ip_number_of(child) {
                    ip.next_header = protocol;
                }
            }
            Loopback(loopback) => {
                loopback.set_family_for(child);
            }
            _ => {}
        }
    }

    /// Serialization context handed to the children of this layer.
    pub(crate) fn descend_ctx(&self, ctx: &SerializeCtx) -> SerializeCtx {
        match self {
            AnyLayer::Ipv4(ip) => SerializeCtx {
                pseudo: Some(PseudoHeader::V4 {
                    source: ip.source,
                    destination: ip.destination,
                }),
            },
            AnyLayer::Ipv6(ip) => SerializeCtx {
                pseudo: Some(PseudoHeader::V6 {
                    source: ip.source,
                    destination: ip.destination,
                }),
            },
            _ => ctx.clone(),
        }
    }

    /// Checks whether `data` starts with a plausible response to this
    /// layer (see [`Pdu::matches_response`]).
    pub(crate) fn response_matches<'a>(&self, data: &'a [u8]) -> ResponseMatch<'a> {
        use AnyLayer::*;
        match self {
            Ethernet2(eth) => eth.response_matches(data),
            Dot1Q(vlan) | Dot1AD(vlan) => vlan.response_matches(data),
            Arp(arp) => arp.response_matches(data),
            Ipv4(ip) => ip.response_matches(data),
            Ipv6(ip) => ip.response_matches(data),
            Tcp(tcp) => tcp.response_matches(data),
            Udp(udp) => udp.response_matches(data),
            Icmpv4(icmp) => icmp.response_matches(data),
            Icmpv6(icmp) => icmp.response_matches(data),
            Dns(dns) => dns.response_matches(data),
            _ => ResponseMatch::No,
        }
    }
}

