use core::net::Ipv4Addr;

use crate::err::{ContentError, Layer, ParseError, SerializeError};
use crate::io::{InputStream, OutputStream};
use crate::layer::{ChildInfo, ResponseMatch, SerializeCtx};
use crate::{HwAddress, MacAddr, Pdu};

/// Operation field of an [`ArpPacket`].
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArpOperation(pub u16);

impl ArpOperation {
    pub const REQUEST: ArpOperation = ArpOperation(1);
    pub const REPLY: ArpOperation = ArpOperation(2);
}

impl core::fmt::Debug for ArpOperation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self {
            ArpOperation::REQUEST => write!(f, "1 (request)"),
            ArpOperation::REPLY => write!(f, "2 (reply)"),
            _ => write!(f, "{}", self.0),
        }
    }
}

/// ARP packet of the Ethernet/IPv4 form (hardware type 1, protocol
/// type 0x0800). Other forms are rejected as malformed and end up as
/// raw payloads in the chain.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ArpPacket {
    pub operation: ArpOperation,
    pub sender_hw_addr: MacAddr,
    pub sender_ip_addr: Ipv4Addr,
    pub target_hw_addr: MacAddr,
    pub target_ip_addr: Ipv4Addr,
}

impl ArpPacket {
    /// Serialized size of the packet in bytes.
    pub const LEN: usize = 28;

    /// Hardware type of Ethernet.
    pub const HW_TYPE_ETHERNET: u16 = 0x0001;

    /// Creates a "who has `target_ip`" request.
    pub fn request(
        sender_hw_addr: MacAddr,
        sender_ip_addr: Ipv4Addr,
        target_ip_addr: Ipv4Addr,
    ) -> ArpPacket {
        ArpPacket {
            operation: ArpOperation::REQUEST,
            sender_hw_addr,
            sender_ip_addr,
            target_hw_addr: MacAddr::ZERO,
            target_ip_addr,
        }
    }

    /// Creates a reply announcing `sender_ip` at `sender_hw`.
    pub fn reply(
        sender_hw_addr: MacAddr,
        sender_ip_addr: Ipv4Addr,
        target_hw_addr: MacAddr,
        target_ip_addr: Ipv4Addr,
    ) -> ArpPacket {
        ArpPacket {
            operation: ArpOperation::REPLY,
            sender_hw_addr,
            sender_ip_addr,
            target_hw_addr,
            target_ip_addr,
        }
    }

    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let (packet, _) = ArpPacket::parse_packet(data)?;
        Ok(Pdu::new(packet))
    }

    fn parse_packet(data: &[u8]) -> Result<(ArpPacket, &[u8]), ParseError> {
        let mut stream = InputStream::new(data, Layer::ArpPacket);
        let hw_type = stream.read_u16_be()?;
        let proto_type = stream.read_u16_be()?;
        let hw_len = stream.read_u8()?;
        let proto_len = stream.read_u8()?;
        if hw_type != ArpPacket::HW_TYPE_ETHERNET
            || proto_type != crate::net::ether_type::ether_type::IPV4
            || hw_len != 6
            || proto_len != 4
        {
            return Err(ContentError::ArpNonEthIpv4 {
                hw_type,
                proto_type,
            }
            .into());
        }
        let packet = ArpPacket {
            operation: ArpOperation(stream.read_u16_be()?),
            sender_hw_addr: HwAddress(stream.read_array()?),
            sender_ip_addr: Ipv4Addr::from(stream.read_array::<4>()?),
            target_hw_addr: HwAddress(stream.read_array()?),
            target_ip_addr: Ipv4Addr::from(stream.read_array::<4>()?),
        };
        Ok((packet, stream.rest()))
    }

    #[inline]
    pub fn header_len(&self) -> usize {
        ArpPacket::LEN
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        _child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let mut stream = OutputStream::new(&mut buf[..ArpPacket::LEN], Layer::ArpPacket);
        stream.write_u16_be(ArpPacket::HW_TYPE_ETHERNET)?;
        stream.write_u16_be(crate::net::ether_type::ether_type::IPV4)?;
        stream.write_u8(6)?;
        stream.write_u8(4)?;
        stream.write_u16_be(self.operation.0)?;
        stream.write_bytes(&self.sender_hw_addr.octets())?;
        stream.write_bytes(&self.sender_ip_addr.octets())?;
        stream.write_bytes(&self.target_hw_addr.octets())?;
        stream.write_bytes(&self.target_ip_addr.octets())
    }

    pub(crate) fn response_matches<'a>(&self, data: &'a [u8]) -> ResponseMatch<'a> {
        match ArpPacket::parse_packet(data) {
            Ok((reply, _))
                if reply.operation == ArpOperation::REPLY
                    && self.operation == ArpOperation::REQUEST
                    && reply.sender_ip_addr == self.target_ip_addr
                    && reply.target_ip_addr == self.sender_ip_addr =>
            {
                ResponseMatch::Match
            }
            _ => ResponseMatch::No,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_matches::assert_matches;

    #[rustfmt::skip]
    const SAMPLE: [u8; 28] = [
        0x00, 0x01, // hardware type: ethernet
        0x08, 0x00, // protocol type: ipv4
        0x06, 0x04, // lengths
        0x00, 0x02, // operation: reply
        0x7a, 0x1f, 0xf4, 0x39, 0xab, 0x0d, // sender hw
        0xc0, 0xa8, 0x00, 0x64, // sender ip: 192.168.0.100
        0x13, 0xda, 0xde, 0xf1, 0x01, 0x85, // target hw
        0xc0, 0xa8, 0x00, 0x01, // target ip: 192.168.0.1
    ];

    #[test]
    fn parse() {
        let pdu = ArpPacket::parse(&SAMPLE).unwrap();
        let arp = match &pdu.layer {
            crate::AnyLayer::Arp(arp) => arp,
            _ => panic!(),
        };
        assert_eq!(ArpOperation::REPLY, arp.operation);
        assert_eq!("192.168.0.100", arp.sender_ip_addr.to_string());
        assert_eq!("13:da:de:f1:01:85", arp.target_hw_addr.to_string());
    }

    #[test]
    fn round_trip() {
        let pdu = ArpPacket::parse(&SAMPLE).unwrap();
        assert_eq!(&SAMPLE[..], &pdu.serialize().unwrap()[..]);
    }

    #[test]
    fn rejects_non_eth_ipv4() {
        let mut data = SAMPLE;
        data[1] = 6; // IEEE 802 hardware type
        assert_matches!(
            ArpPacket::parse(&data).unwrap_err().content_error(),
            Some(ContentError::ArpNonEthIpv4 { .. })
        );
    }

    #[test]
    fn request_reply_matching() {
        let request = ArpPacket::request(
            "13:da:de:f1:01:85".parse().unwrap(),
            Ipv4Addr::new(192, 168, 0, 1),
            Ipv4Addr::new(192, 168, 0, 100),
        );
        assert!(Pdu::from(request).matches_response(&SAMPLE));

        let unrelated = ArpPacket::request(
            "13:da:de:f1:01:85".parse().unwrap(),
            Ipv4Addr::new(192, 168, 0, 1),
            Ipv4Addr::new(192, 168, 0, 42),
        );
        assert!(!Pdu::from(unrelated).matches_response(&SAMPLE));
    }
}
