/// Layers on which an error can occur.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Layer {
    /// Error occurred in the ethernet II header.
    Ethernet2Header,
    /// Error occurred in a VLAN tag (801.1Q or 802.1AD).
    VlanHeader,
    /// Error occurred in the PPPoE session header.
    PppoeHeader,
    /// Error occurred in an MPLS label stack entry.
    MplsHeader,
    /// Error occurred in the ARP packet.
    ArpPacket,
    /// Error occurred in the IPv4 header.
    Ipv4Header,
    /// Error occurred in the IPv6 header.
    Ipv6Header,
    /// Error occurred in an IPv6 extension header.
    Ipv6ExtHeader,
    /// Error occurred in the TCP header.
    TcpHeader,
    /// Error occurred in the UDP header.
    UdpHeader,
    /// Error occurred in the ICMPv4 packet.
    Icmpv4,
    /// Error occurred in the ICMPv6 packet.
    Icmpv6,
    /// Error occurred in an ICMP multipart extension block.
    IcmpExtensions,
    /// Error occurred in the DNS message.
    DnsMessage,
    /// Error occurred in the DHCPv4 message.
    DhcpMessage,
    /// Error occurred in the DHCPv6 message.
    Dhcpv6Message,
    /// Error occurred in an 802.11 header.
    Dot11Header,
    /// Error occurred in the tagged parameters of an 802.11 management frame.
    Dot11TaggedParams,
    /// Error occurred in the RadioTap header.
    RadioTapHeader,
    /// Error occurred in the PPI header.
    PpiHeader,
    /// Error occurred in the LLC header.
    LlcHeader,
    /// Error occurred in the SNAP header.
    SnapHeader,
    /// Error occurred in the STP BPDU.
    StpBpdu,
    /// Error occurred in an EAPOL packet.
    EapolHeader,
    /// Error occurred in the BFD control packet.
    BfdHeader,
    /// Error occurred in the RTP header.
    RtpHeader,
    /// Error occurred in the VXLAN header.
    VxlanHeader,
    /// Error occurred in a Linux cooked capture header (v1 or v2).
    SllHeader,
    /// Error occurred in the PKTAP header.
    PktapHeader,
    /// Error occurred in the loopback (NULL) header.
    LoopbackHeader,
    /// Error occurred in an opaque payload.
    RawPayload,
    /// Error occurred in the pcap file header.
    PcapHeader,
    /// Error occurred in a pcap record header.
    PcapRecord,
}

impl Layer {
    /// String that is used as a title for the error.
    pub fn error_title(&self) -> &'static str {
        use Layer::*;
        match self {
            Ethernet2Header => "Ethernet 2 Header Error",
            VlanHeader => "VLAN Header Error",
            PppoeHeader => "PPPoE Header Error",
            MplsHeader => "MPLS Header Error",
            ArpPacket => "ARP Packet Error",
            Ipv4Header => "IPv4 Header Error",
            Ipv6Header => "IPv6 Header Error",
            Ipv6ExtHeader => "IPv6 Extension Header Error",
            TcpHeader => "TCP Header Error",
            UdpHeader => "UDP Header Error",
            Icmpv4 => "ICMPv4 Packet Error",
            Icmpv6 => "ICMPv6 Packet Error",
            IcmpExtensions => "ICMP Extensions Error",
            DnsMessage => "DNS Message Error",
            DhcpMessage => "DHCP Message Error",
            Dhcpv6Message => "DHCPv6 Message Error",
            Dot11Header => "802.11 Header Error",
            Dot11TaggedParams => "802.11 Tagged Parameters Error",
            RadioTapHeader => "RadioTap Header Error",
            PpiHeader => "PPI Header Error",
            LlcHeader => "LLC Header Error",
            SnapHeader => "SNAP Header Error",
            StpBpdu => "STP BPDU Error",
            EapolHeader => "EAPOL Packet Error",
            BfdHeader => "BFD Packet Error",
            RtpHeader => "RTP Header Error",
            VxlanHeader => "VXLAN Header Error",
            SllHeader => "Linux Cooked Capture Header Error",
            PktapHeader => "PKTAP Header Error",
            LoopbackHeader => "Loopback Header Error",
            RawPayload => "Raw Payload Error",
            PcapHeader => "Pcap File Header Error",
            PcapRecord => "Pcap Record Error",
        }
    }
}

impl core::fmt::Display for Layer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use Layer::*;
        match self {
            Ethernet2Header => write!(f, "Ethernet 2 header"),
            VlanHeader => write!(f, "VLAN header"),
            PppoeHeader => write!(f, "PPPoE session header"),
            MplsHeader => write!(f, "MPLS label stack entry"),
            ArpPacket => write!(f, "ARP packet"),
            Ipv4Header => write!(f, "IPv4 header"),
            Ipv6Header => write!(f, "IPv6 header"),
            Ipv6ExtHeader => write!(f, "IPv6 extension header"),
            TcpHeader => write!(f, "TCP header"),
            UdpHeader => write!(f, "UDP header"),
            Icmpv4 => write!(f, "ICMPv4 packet"),
            Icmpv6 => write!(f, "ICMPv6 packet"),
            IcmpExtensions => write!(f, "ICMP multipart extensions"),
            DnsMessage => write!(f, "DNS message"),
            DhcpMessage => write!(f, "DHCP message"),
            Dhcpv6Message => write!(f, "DHCPv6 message"),
            Dot11Header => write!(f, "802.11 header"),
            Dot11TaggedParams => write!(f, "802.11 tagged parameters"),
            RadioTapHeader => write!(f, "RadioTap header"),
            PpiHeader => write!(f, "PPI header"),
            LlcHeader => write!(f, "LLC header"),
            SnapHeader => write!(f, "SNAP header"),
            StpBpdu => write!(f, "STP BPDU"),
            EapolHeader => write!(f, "EAPOL packet"),
            BfdHeader => write!(f, "BFD control packet"),
            RtpHeader => write!(f, "RTP header"),
            VxlanHeader => write!(f, "VXLAN header"),
            SllHeader => write!(f, "Linux cooked capture header"),
            PktapHeader => write!(f, "PKTAP header"),
            LoopbackHeader => write!(f, "loopback header"),
            RawPayload => write!(f, "raw payload"),
            PcapHeader => write!(f, "pcap file header"),
            PcapRecord => write!(f, "pcap record"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Layer::*;

    #[test]
    fn display() {
        assert_eq!("IPv4 header", format!("{}", Ipv4Header));
        assert_eq!("TCP header", format!("{}", TcpHeader));
        assert_eq!("802.11 header", format!("{}", Dot11Header));
    }

    #[test]
    fn error_title() {
        assert_eq!("BFD Packet Error", BfdHeader.error_title());
        assert_eq!("RTP Header Error", RtpHeader.error_title());
    }

    #[test]
    fn clone_eq() {
        assert_eq!(UdpHeader, UdpHeader.clone());
    }
}
