//! End-to-end scenarios across multiple layers.

use core::net::Ipv4Addr;

use wirecraft::checksum::Sum16BitWords;
use wirecraft::*;

#[test]
fn arp_reply_build() {
    let chain = Ethernet2Header::new(
        "7a:1f:f4:39:ab:0d".parse().unwrap(),
        "13:da:de:f1:01:85".parse().unwrap(),
    ) / ArpPacket::reply(
        "7a:1f:f4:39:ab:0d".parse().unwrap(),
        Ipv4Addr::new(192, 168, 0, 100),
        "13:da:de:f1:01:85".parse().unwrap(),
        Ipv4Addr::new(192, 168, 0, 1),
    );
    let bytes = chain.serialize().unwrap();

    assert_eq!(42, bytes.len());
    // ethernet header: destination, source, auto filled ether type
    assert_eq!(
        &[0x13, 0xda, 0xde, 0xf1, 0x01, 0x85],
        &bytes[0..6]
    );
    assert_eq!(
        &[0x7a, 0x1f, 0xf4, 0x39, 0xab, 0x0d],
        &bytes[6..12]
    );
    assert_eq!(&[0x08, 0x06], &bytes[12..14]);
    // ARP hardware type & opcode
    assert_eq!(&[0x00, 0x01], &bytes[14..16]);
    assert_eq!(&[0x00, 0x02], &bytes[20..22]);

    // and the tree parses back to the same chain
    let parsed = Ethernet2Header::parse(&bytes).unwrap();
    assert_eq!(chain, parsed);
}

#[test]
fn icmp_echo_request_checksum() {
    let bytes = Pdu::from(Icmpv4Header::echo_request(0x34ab, 0x12f7))
        .serialize()
        .unwrap();
    assert_eq!(8, bytes.len());
    assert_eq!(&[0x34, 0xab, 0x12, 0xf7], &bytes[4..8]);
    // the one's complement sum over the serialized bytes verifies
    assert_eq!(0, Sum16BitWords::new().add_slice(&bytes).ones_complement());
}

#[test]
fn dhcp_discover_parse() {
    let mut discover = DhcpMessage::discover(0x3903f326, "7a:1f:f4:39:ab:0d".parse().unwrap());
    discover.set_requested_ip_addr(Ipv4Addr::new(192, 168, 0, 100));
    discover.set_server_identifier(Ipv4Addr::new(192, 168, 0, 1));
    let bytes = Pdu::from(discover).serialize().unwrap();

    // fixed BOOTP frame, magic cookie, then the option stream
    assert_eq!(
        0x63825363,
        u32::from_be_bytes(bytes[236..240].try_into().unwrap())
    );
    assert_eq!(&[53, 1, 1], &bytes[240..243]);

    let pdu = DhcpMessage::parse(&bytes).unwrap();
    let dhcp = match &pdu.layer {
        AnyLayer::Dhcp(dhcp) => dhcp,
        other => panic!("expected a DHCP layer, got {other:?}"),
    };
    assert_eq!(Some(DhcpMessageType::DISCOVER), dhcp.message_type());
    assert_eq!(
        Some(Ipv4Addr::new(192, 168, 0, 100)),
        dhcp.requested_ip_addr()
    );
    assert_eq!(Some(Ipv4Addr::new(192, 168, 0, 1)), dhcp.server_identifier());
    assert_eq!(bytes, pdu.serialize().unwrap());
}

#[test]
fn dot1ad_reserializes_as_dot1q() {
    // 802.1AD service tag around an 802.1Q customer tag around IPv4
    let chain = Ethernet2Header::new(MacAddr::ZERO, MacAddr::BROADCAST)
        / VlanHeader::new(VlanId::try_new(100).unwrap()).into_dot1ad()
        / VlanHeader::new(VlanId::try_new(200).unwrap())
        / Ipv4Header::new(Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2));
    let bytes = chain.serialize().unwrap();
    assert_eq!(&[0x88, 0xa8], &bytes[12..14]);

    let mut parsed = Ethernet2Header::parse(&bytes).unwrap();
    let tags: Vec<LayerType> = parsed.iter().map(|pdu| pdu.layer_type()).collect();
    assert_eq!(
        vec![
            LayerType::Ethernet2,
            LayerType::Dot1AD,
            LayerType::Dot1Q,
            LayerType::Ipv4,
        ],
        tags
    );

    // flipping the outer tag to a customer tag must produce exactly the
    // bytes of the plain Q-in-Q encoding
    let outer = parsed.find_mut(LayerType::Dot1AD).unwrap();
    if let AnyLayer::Dot1AD(vlan) = outer.layer.clone() {
        outer.layer = AnyLayer::Dot1Q(vlan);
    }
    let rewritten = parsed.serialize().unwrap();

    let reference = (Ethernet2Header::new(MacAddr::ZERO, MacAddr::BROADCAST)
        / VlanHeader::new(VlanId::try_new(100).unwrap())
        / VlanHeader::new(VlanId::try_new(200).unwrap())
        / Ipv4Header::new(Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2)))
    .serialize()
    .unwrap();
    assert_eq!(reference, rewritten);
    assert_eq!(&[0x81, 0x00], &rewritten[12..14]);
}

#[test]
fn rtp_with_padding_sizes() {
    // 60 byte packet: 12 byte header, 5 CSRC ids, extension of 2 words,
    // 12 byte payload, 4 bytes padding
    let mut data = vec![
        0xb5, 0x60, 0x00, 0x01, 0x00, 0x00, 0x00, 0x10, 0x11, 0x22, 0x33, 0x44,
    ];
    for csrc in 1u32..=5 {
        data.extend_from_slice(&csrc.to_be_bytes());
    }
    data.extend_from_slice(&[0x00, 0x01, 0x00, 0x02]);
    data.extend_from_slice(&[0u8; 8]);
    data.extend_from_slice(b"twelve bytes");
    data.extend_from_slice(&[0, 0, 0, 4]);
    assert_eq!(60, data.len());

    let pdu = RtpHeader::parse(&data).unwrap();
    assert_eq!(60, pdu.len());
    assert_eq!(44, pdu.header_len());
    assert_eq!(4, pdu.trailer_len());
    assert_eq!(12, pdu.child().unwrap().len());
    assert_eq!(data, pdu.serialize().unwrap());
}

#[test]
fn bfd_meticulous_sha1_auth() {
    let mut data = vec![
        0x20, 0xc4, 0x05, 0x34, // version 1; state UP, auth present; mult 5; length 52
        0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x02, // discriminators
        0x00, 0x0f, 0x42, 0x40, 0x00, 0x0f, 0x42, 0x40, // tx/rx intervals
        0x00, 0x00, 0x00, 0x00, // echo rx interval
        0x05, 0x1c, 0x01, 0x00, // auth type 5 (meticulous SHA1), len 28, key id, reserved
        0x00, 0x00, 0x10, 0x00, // sequence number
    ];
    data.extend((0u8..20).map(|i| 0x50 + i));
    assert_eq!(52, data.len());

    let pdu = BfdPacket::parse(&data).unwrap();
    let bfd = match &pdu.layer {
        AnyLayer::Bfd(bfd) => bfd,
        other => panic!("expected a BFD layer, got {other:?}"),
    };
    assert_eq!(&data[32..52], bfd.auth_sha1_value().unwrap());
    assert_eq!(0x1000, bfd.auth_sequence_number().unwrap());
    assert_eq!(data, pdu.serialize().unwrap());
}

#[test]
fn ipv4_fragment_reassembly_reverse_order() {
    let payload = vec![0x5au8; 2000];

    // the original datagram, fragmented into two pieces
    let datagram = (Ipv4Header::new(
        Ipv4Addr::new(192, 168, 0, 100),
        Ipv4Addr::new(192, 168, 0, 1),
    ) / UdpHeader::new(6000, 6001)
        / &payload[..])
        .serialize()
        .unwrap();
    let inner = &datagram[20..];

    let mut fragments = Vec::new();
    for (i, chunk) in inner.chunks(1480).enumerate() {
        let mut ip = Ipv4Header::new(
            Ipv4Addr::new(192, 168, 0, 100),
            Ipv4Addr::new(192, 168, 0, 1),
        );
        ip.identification = 0x77;
        ip.protocol = IpNumber::UDP;
        ip.dont_fragment = false;
        ip.more_fragments = (i + 1) * 1480 < inner.len();
        ip.fragment_offset = IpFragOffset::try_new((i * 1480 / 8) as u16).unwrap();
        fragments.push(
            Ipv4Header::parse(&(ip / chunk).serialize().unwrap()).unwrap(),
        );
    }
    assert_eq!(2, fragments.len());
    fragments.reverse();

    let mut pool = IpDefragPool::new();
    let mut reassembled = None;
    for fragment in &fragments {
        if let Some(packet) = pool.process(fragment, 0).unwrap() {
            assert!(reassembled.is_none(), "only one packet may be emitted");
            reassembled = Some(packet);
        }
    }
    let packet = reassembled.expect("reassembly completed");

    let ip = match &packet.layer {
        AnyLayer::Ipv4(ip) => ip,
        other => panic!("expected an IPv4 layer, got {other:?}"),
    };
    assert_eq!(0, ip.fragment_offset.value());
    assert!(!ip.more_fragments);

    let udp = packet.find(LayerType::Udp).expect("inner UDP reparsed");
    assert_eq!(payload, udp.child().unwrap().serialize().unwrap());
}
