//! Dispatch tables mapping next-protocol field values to the dissector
//! that decodes the payload.
//!
//! Every lookup is a plain `match`. A miss (or a payload the selected
//! dissector rejects as malformed) is recovered locally by wrapping the
//! remaining bytes into a [`RawData`] layer, so a chain parse below the
//! root never fails.

use crate::err::ParseError;
use crate::*;

/// Parses a raw frame starting at the link layer selected by the
/// pcap link type.
///
/// Unknown link types yield a single [`RawData`] layer. An error is
/// only returned if the root layer itself can not be decoded.
pub fn parse_link(link_type: LinkType, data: &[u8]) -> Result<Pdu, ParseError> {
    match link_type {
        LinkType::NULL | LinkType::LOOP => LoopbackHeader::parse(data),
        LinkType::ETHERNET => Ethernet2Header::parse(data),
        LinkType::IEEE802_11 => dot11::parse(data),
        LinkType::LINUX_SLL => SllHeader::parse(data),
        LinkType::IEEE802_11_RADIOTAP => RadioTapHeader::parse(data),
        LinkType::PPI => PpiHeader::parse(data),
        LinkType::PKTAP => PktapHeader::parse(data),
        LinkType::LINUX_SLL2 => Sll2Header::parse(data),
        _ => Ok(RawData::parse(data)),
    }
}

/// Parses the payload of a layer that selects its inner protocol with
/// an ether type value.
pub(crate) fn child_from_ether_type(ether_type: EtherType, data: &[u8]) -> Pdu {
    let result = match ether_type {
        EtherType::IPV4 => Ipv4Header::parse(data),
        EtherType::IPV6 => Ipv6Header::parse(data),
        EtherType::ARP => ArpPacket::parse(data),
        EtherType::VLAN_TAGGED_FRAME | EtherType::VLAN_DOUBLE_TAGGED_FRAME => {
            VlanHeader::parse(data)
        }
        EtherType::PROVIDER_BRIDGING => VlanHeader::parse_dot1ad(data),
        EtherType::PPPOE_SESSION | EtherType::PPPOE_DISCOVERY => PppoeHeader::parse(data),
        EtherType::MPLS | EtherType::MPLS_MULTICAST => MplsHeader::parse(data),
        EtherType::EAPOL => eapol_parse(data),
        _ => return RawData::parse(data),
    };
    result.unwrap_or_else(|_| RawData::parse(data))
}

/// Parses the payload of an IPv4/IPv6 header based on the IP number.
pub(crate) fn child_from_ip_number(ip_number: IpNumber, data: &[u8]) -> Pdu {
    let result = match ip_number {
        IpNumber::ICMP => Icmpv4Header::parse(data),
        IpNumber::TCP => TcpHeader::parse(data),
        IpNumber::UDP => UdpHeader::parse(data),
        IpNumber::IPV6 => Ipv6Header::parse(data),
        IpNumber::IPV6_ICMP => Icmpv6Header::parse(data),
        // IPsec AH/ESP & GRE payloads are kept as opaque bytes
        _ => return RawData::parse(data),
    };
    result.unwrap_or_else(|_| RawData::parse(data))
}

/// Parses an UDP payload based on the well known ports of both sides.
pub(crate) fn child_from_udp_ports(source_port: u16, destination_port: u16, data: &[u8]) -> Pdu {
    let result = match (source_port, destination_port) {
        (53 | 5353 | 5355, _) | (_, 53 | 5353 | 5355) => DnsMessage::parse(data),
        (67 | 68, _) | (_, 67 | 68) => DhcpMessage::parse(data),
        (546 | 547, _) | (_, 546 | 547) => Dhcpv6Message::parse(data),
        (3784 | 4784, _) | (_, 3784 | 4784) => BfdPacket::parse(data),
        (_, 4789) => VxlanHeader::parse(data),
        _ => return RawData::parse(data),
    };
    result.unwrap_or_else(|_| RawData::parse(data))
}

/// Selects the EAPOL variant from the key descriptor type byte.
fn eapol_parse(data: &[u8]) -> Result<Pdu, ParseError> {
    // the byte after the 4 byte EAPOL header selects the descriptor
    match data.get(4).copied() {
        Some(EapolRc4::KEY_DESCRIPTOR_RC4) => EapolRc4::parse(data),
        Some(EapolRsn::KEY_DESCRIPTOR_RSN) | Some(EapolRsn::KEY_DESCRIPTOR_WPA) => {
            EapolRsn::parse(data)
        }
        _ => Ok(RawData::parse(data)),
    }
}

/// Ether type value registered for a layer tag (used to auto-update
/// payload type fields on composition & serialization).
pub fn ether_type_of(layer_type: LayerType) -> Option<EtherType> {
    use LayerType::*;
    match layer_type {
        Ipv4 => Some(EtherType::IPV4),
        Ipv6 => Some(EtherType::IPV6),
        Arp => Some(EtherType::ARP),
        Dot1Q => Some(EtherType::VLAN_TAGGED_FRAME),
        Dot1AD => Some(EtherType::PROVIDER_BRIDGING),
        Pppoe => Some(EtherType::PPPOE_SESSION),
        Mpls => Some(EtherType::MPLS),
        EapolRc4 | EapolRsn => Some(EtherType::EAPOL),
        _ => None,
    }
}

/// IP number value registered for a layer tag.
pub fn ip_number_of(layer_type: LayerType) -> Option<IpNumber> {
    use LayerType::*;
    match layer_type {
        Icmpv4 => Some(IpNumber::ICMP),
        Tcp => Some(IpNumber::TCP),
        Udp => Some(IpNumber::UDP),
        Ipv6 => Some(IpNumber::IPV6),
        Icmpv6 => Some(IpNumber::IPV6_ICMP),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unknown_ether_type_becomes_raw() {
        let pdu = child_from_ether_type(EtherType(0x1234), &[1, 2, 3]);
        assert_eq!(LayerType::Raw, pdu.layer_type());
    }

    #[test]
    fn malformed_payload_becomes_raw() {
        // way too short for an IPv4 header
        let pdu = child_from_ether_type(EtherType::IPV4, &[0x45]);
        assert_eq!(LayerType::Raw, pdu.layer_type());
    }

    #[test]
    fn unknown_link_type_becomes_raw() {
        let pdu = parse_link(LinkType(0x7fff), &[1, 2, 3]).unwrap();
        assert_eq!(LayerType::Raw, pdu.layer_type());
    }

    #[test]
    fn mappings() {
        assert_eq!(Some(EtherType::IPV4), ether_type_of(LayerType::Ipv4));
        assert_eq!(Some(IpNumber::TCP), ip_number_of(LayerType::Tcp));
        assert_eq!(None, ether_type_of(LayerType::Raw));
        assert_eq!(None, ip_number_of(LayerType::Dns));
    }
}
