//! Cross-layer laws that hold for every supported protocol stack.

use core::net::{Ipv4Addr, Ipv6Addr};

use proptest::prelude::*;
use wirecraft::checksum::Sum16BitWords;
use wirecraft::*;

fn sample_chains() -> Vec<Pdu> {
    let eth = || {
        Ethernet2Header::new(
            "7a:1f:f4:39:ab:0d".parse().unwrap(),
            "13:da:de:f1:01:85".parse().unwrap(),
        )
    };
    let ipv4 = || Ipv4Header::new(Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2));
    let ipv6 = || {
        Ipv6Header::new(
            Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 1),
            Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 2),
        )
    };
    vec![
        eth() / ipv4() / UdpHeader::new(4000, 4001) / &b"payload"[..],
        eth() / ipv4() / TcpHeader::new(49152, 443) / &b"hello"[..],
        eth() / ipv6() / UdpHeader::new(546, 547),
        eth() / ipv4() / Icmpv4Header::echo_request(1, 2) / &b"ping"[..],
        eth() / ipv6() / Icmpv6Header::echo_request(3, 4),
        eth()
            / ArpPacket::request(
                "7a:1f:f4:39:ab:0d".parse().unwrap(),
                Ipv4Addr::new(10, 0, 0, 1),
                Ipv4Addr::new(10, 0, 0, 254),
            ),
        eth() / VlanHeader::new(VlanId::try_new(42).unwrap()) / ipv4() / UdpHeader::new(1, 2),
        eth()
            / ipv4()
            / UdpHeader::new(40000, 4789)
            / VxlanHeader::new(VxlanVni::try_new(0x1234).unwrap())
            / eth()
            / ipv4()
            / UdpHeader::new(7, 7),
    ]
}

/// `serialize(parse(serialize(chain)))` is byte exact for chains whose
/// payloads decode without raw fallback surprises.
#[test]
fn round_trip_is_byte_exact() {
    for chain in sample_chains() {
        let bytes = chain.serialize().unwrap();
        let parsed = Ethernet2Header::parse(&bytes).unwrap();
        assert_eq!(
            bytes,
            parsed.serialize().unwrap(),
            "round trip mismatch for {:?}",
            chain.layer_type()
        );
    }
}

/// The serialized length always equals the computed length.
#[test]
fn size_law() {
    for chain in sample_chains() {
        assert_eq!(chain.len(), chain.serialize().unwrap().len());
        for layer in chain.iter() {
            assert_eq!(
                layer.len(),
                layer.header_len()
                    + layer.child().map(|c| c.len()).unwrap_or(0)
                    + layer.trailer_len()
            );
        }
    }
}

/// Composing `a / b` serializes to `a`'s header (with the next-protocol
/// field set to `b`'s registered value) followed by `b`'s serialization.
#[test]
fn composition_law() {
    let eth = Ethernet2Header::new(MacAddr::ZERO, MacAddr::BROADCAST);
    let ip = Ipv4Header::new(Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2));

    let composed = (eth / ip.clone()).serialize().unwrap();

    let alone = Pdu::from(ip).serialize().unwrap();
    assert_eq!(&alone[..], &composed[14..]);
    // the payload type field carries the registered value for IPv4
    assert_eq!(&[0x08, 0x00], &composed[12..14]);
}

/// Clones serialize identically & share no mutable state.
#[test]
fn clone_equivalence() {
    for chain in sample_chains() {
        let mut clone = chain.clone();
        assert_eq!(chain.serialize().unwrap(), clone.serialize().unwrap());

        // mutating the clone's innermost layer leaves the original alone
        clone.push(RawData::from(&b"extra"[..]));
        assert_ne!(chain.len(), clone.len());
        assert_eq!(chain.serialize().unwrap().len(), chain.len());
    }
}

/// After serialization the checksummed regions verify (the 16 bit one's
/// complement sum over them, checksum included, folds to zero).
#[test]
fn checksum_law() {
    let bytes = (Ethernet2Header::new(MacAddr::ZERO, MacAddr::BROADCAST)
        / Ipv4Header::new(Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2))
        / TcpHeader::new(1, 2)
        / &b"data"[..])
        .serialize()
        .unwrap();

    // IPv4 header checksum
    assert_eq!(
        0,
        Sum16BitWords::new()
            .add_slice(&bytes[14..34])
            .ones_complement()
    );
    // TCP checksum incl. pseudo header
    let tcp = &bytes[34..];
    assert_eq!(
        0,
        Sum16BitWords::new()
            .add_4bytes([10, 0, 0, 1])
            .add_4bytes([10, 0, 0, 2])
            .add_2bytes([0, 6])
            .add_2bytes((tcp.len() as u16).to_be_bytes())
            .add_slice(tcp)
            .ones_complement()
    );
}

/// Options are emitted in insertion order, duplicates included.
#[test]
fn option_ordering() {
    let mut dhcp = DhcpMessage::default();
    dhcp.options.push(TaggedOption::new(53, vec![1]));
    dhcp.options.push(TaggedOption::new(61, vec![1, 2]));
    dhcp.options.push(TaggedOption::new(61, vec![3, 4]));
    let bytes = Pdu::from(dhcp).serialize().unwrap();

    let parsed = DhcpMessage::parse(&bytes).unwrap();
    let reparsed = match &parsed.layer {
        AnyLayer::Dhcp(dhcp) => dhcp,
        other => panic!("expected a DHCP layer, got {other:?}"),
    };
    assert_eq!(
        vec![(53u8, vec![1u8]), (61, vec![1, 2]), (61, vec![3, 4])],
        reparsed
            .options
            .iter()
            .map(|o| (o.kind, o.data.clone()))
            .collect::<Vec<_>>()
    );
    assert_eq!(bytes, parsed.serialize().unwrap());
}

proptest! {
    /// Randomized UDP chains round trip & verify.
    #[test]
    fn udp_chain_round_trip(
        source in any::<[u8; 4]>(),
        destination in any::<[u8; 4]>(),
        source_port in 6000u16..10000,
        destination_port in 6000u16..10000,
        payload in proptest::collection::vec(any::<u8>(), 0..256),
    ) {
        let chain = Ethernet2Header::new(MacAddr::ZERO, MacAddr::BROADCAST)
            / Ipv4Header::new(Ipv4Addr::from(source), Ipv4Addr::from(destination))
            / UdpHeader::new(source_port, destination_port)
            / &payload[..];
        let bytes = chain.serialize().unwrap();
        prop_assert_eq!(chain.len(), bytes.len());
        let parsed = Ethernet2Header::parse(&bytes).unwrap();
        prop_assert_eq!(bytes, parsed.serialize().unwrap());
    }

    /// Randomized TCP headers survive parse & re-serialization.
    #[test]
    fn tcp_header_round_trip(
        source_port in any::<u16>(),
        destination_port in any::<u16>(),
        seq in any::<u32>(),
        ack_num in any::<u32>(),
        window in any::<u16>(),
        flags in any::<[bool; 4]>(),
    ) {
        let mut tcp = TcpHeader::new(source_port, destination_port);
        tcp.sequence_number = seq;
        tcp.acknowledgment_number = ack_num;
        tcp.window_size = window;
        tcp.syn = flags[0];
        tcp.ack = flags[1];
        tcp.psh = flags[2];
        tcp.fin = flags[3];
        let bytes = Pdu::from(tcp.clone()).serialize().unwrap();
        let parsed = TcpHeader::parse(&bytes).unwrap();
        prop_assert_eq!(AnyLayer::Tcp(tcp), parsed.layer);
    }
}
