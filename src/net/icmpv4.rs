use core::net::Ipv4Addr;

use crate::checksum::Sum16BitWords;
use crate::err::{Layer, ParseError, SerializeError};
use crate::io::{InputStream, OutputStream};
use crate::layer::{ChildInfo, ResponseMatch, SerializeCtx};
use crate::{IcmpExtensions, Pdu, RawData};

/// Id & sequence pair used by ICMP echo & timestamp messages.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IcmpEchoHeader {
    pub id: u16,
    pub seq: u16,
}

/// Message type of an [`Icmpv4Header`], together with the contents of
/// the 4 byte field after the checksum (which the type discriminates).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Icmpv4Type {
    EchoReply(IcmpEchoHeader),
    /// Destination unreachable; `length` is the RFC 4884 original
    /// datagram length in 32 bit words, `next_hop_mtu` is meaningful
    /// for the "fragmentation needed" code 4.
    DestinationUnreachable {
        code: u8,
        length: u8,
        next_hop_mtu: u16,
    },
    Redirect {
        code: u8,
        gateway: Ipv4Addr,
    },
    EchoRequest(IcmpEchoHeader),
    TimeExceeded {
        code: u8,
        length: u8,
    },
    /// Parameter problem; `pointer` indicates the offending octet,
    /// `length` is the RFC 4884 original datagram length.
    ParameterProblem {
        code: u8,
        pointer: u8,
        length: u8,
    },
    /// Any other type; the 4 bytes after the checksum are kept raw.
    Unknown {
        type_u8: u8,
        code_u8: u8,
        bytes5to8: [u8; 4],
    },
}

impl Icmpv4Type {
    /// The (type, code) byte pair of the message.
    pub fn type_code(&self) -> (u8, u8) {
        use Icmpv4Type::*;
        match self {
            EchoReply(_) => (0, 0),
            DestinationUnreachable { code, .. } => (3, *code),
            Redirect { code, .. } => (5, *code),
            EchoRequest(_) => (8, 0),
            TimeExceeded { code, .. } => (11, *code),
            ParameterProblem { code, .. } => (12, *code),
            Unknown {
                type_u8, code_u8, ..
            } => (*type_u8, *code_u8),
        }
    }

    fn rest_of_header(&self) -> [u8; 4] {
        use Icmpv4Type::*;
        match self {
            EchoReply(echo) | EchoRequest(echo) => {
                let id = echo.id.to_be_bytes();
                let seq = echo.seq.to_be_bytes();
                [id[0], id[1], seq[0], seq[1]]
            }
            DestinationUnreachable {
                length,
                next_hop_mtu,
                ..
            } => {
                let mtu = next_hop_mtu.to_be_bytes();
                [0, *length, mtu[0], mtu[1]]
            }
            Redirect { gateway, .. } => gateway.octets(),
            TimeExceeded { length, .. } => [0, *length, 0, 0],
            ParameterProblem {
                pointer, length, ..
            } => [*pointer, *length, 0, 0],
            Unknown { bytes5to8, .. } => *bytes5to8,
        }
    }

    /// RFC 4884 length field (original datagram length in 32 bit
    /// words) for the types that carry one.
    fn rfc4884_length(&self) -> Option<u8> {
        use Icmpv4Type::*;
        match self {
            DestinationUnreachable { length, .. }
            | TimeExceeded { length, .. }
            | ParameterProblem { length, .. } => Some(*length),
            _ => None,
        }
    }
}

/// ICMPv4 packet: type, code, checksum and the type discriminated
/// 4 byte field, optionally followed by an RFC 4884 extension block
/// after the payload (the payload of error messages is the excerpt of
/// the original datagram, kept as a raw layer).
///
/// The checksum covers the header, the payload & the extensions and is
/// recomputed on serialization.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Icmpv4Header {
    pub icmp_type: Icmpv4Type,
    /// Checksum as found on the wire (recomputed when serializing).
    pub checksum: u16,
    pub extensions: Option<IcmpExtensions>,
}

impl Icmpv4Header {
    /// Serialized size of the fixed header in bytes.
    pub const MIN_LEN: usize = 8;

    pub fn new(icmp_type: Icmpv4Type) -> Icmpv4Header {
        Icmpv4Header {
            icmp_type,
            checksum: 0,
            extensions: None,
        }
    }

    /// Creates an echo request with the given id & sequence.
    pub fn echo_request(id: u16, seq: u16) -> Icmpv4Header {
        Icmpv4Header::new(Icmpv4Type::EchoRequest(IcmpEchoHeader { id, seq }))
    }

    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::Icmpv4);
        let type_u8 = stream.read_u8()?;
        let code_u8 = stream.read_u8()?;
        let checksum = stream.read_u16_be()?;
        let bytes5to8: [u8; 4] = stream.read_array()?;
        let icmp_type = match type_u8 {
            0 if code_u8 == 0 => Icmpv4Type::EchoReply(IcmpEchoHeader {
                id: u16::from_be_bytes([bytes5to8[0], bytes5to8[1]]),
                seq: u16::from_be_bytes([bytes5to8[2], bytes5to8[3]]),
            }),
            3 => Icmpv4Type::DestinationUnreachable {
                code: code_u8,
                length: bytes5to8[1],
                next_hop_mtu: u16::from_be_bytes([bytes5to8[2], bytes5to8[3]]),
            },
            5 => Icmpv4Type::Redirect {
                code: code_u8,
                gateway: Ipv4Addr::from(bytes5to8),
            },
            8 if code_u8 == 0 => Icmpv4Type::EchoRequest(IcmpEchoHeader {
                id: u16::from_be_bytes([bytes5to8[0], bytes5to8[1]]),
                seq: u16::from_be_bytes([bytes5to8[2], bytes5to8[3]]),
            }),
            11 => Icmpv4Type::TimeExceeded {
                code: code_u8,
                length: bytes5to8[1],
            },
            12 => Icmpv4Type::ParameterProblem {
                code: code_u8,
                pointer: bytes5to8[0],
                length: bytes5to8[1],
            },
            _ => Icmpv4Type::Unknown {
                type_u8,
                code_u8,
                bytes5to8,
            },
        };

        let rest = stream.rest();
        let (payload, extensions) = match icmp_type.rfc4884_length() {
            Some(length) if length > 0 && rest.len() > usize::from(length) * 4 => {
                let split = usize::from(length) * 4;
                (&rest[..split], Some(IcmpExtensions::parse(&rest[split..])?))
            }
            _ => (rest, None),
        };

        let mut pdu = Pdu::new(Icmpv4Header {
            icmp_type,
            checksum,
            extensions,
        });
        if !payload.is_empty() {
            pdu.set_child(RawData::parse(payload));
        }
        Ok(pdu)
    }

    #[inline]
    pub fn header_len(&self) -> usize {
        Icmpv4Header::MIN_LEN
    }

    #[inline]
    pub fn trailer_len(&self) -> usize {
        self.extensions.as_ref().map(|e| e.len()).unwrap_or(0)
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        _child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let (type_u8, code_u8) = self.icmp_type.type_code();
        {
            let mut stream = OutputStream::new(&mut buf[..Icmpv4Header::MIN_LEN], Layer::Icmpv4);
            stream.write_u8(type_u8)?;
            stream.write_u8(code_u8)?;
            stream.write_u16_be(0)?;
            stream.write_bytes(&self.icmp_type.rest_of_header())?;
        }
        if let Some(extensions) = &self.extensions {
            let trailer_start = buf.len() - extensions.len();
            extensions.write_to(&mut buf[trailer_start..])?;
        }
        // checksum over header, payload & extensions
        let checksum = Sum16BitWords::new().add_slice(buf).ones_complement();
        buf[2..4].copy_from_slice(&checksum.to_be_bytes());
        Ok(())
    }

    pub(crate) fn response_matches<'a>(&self, data: &'a [u8]) -> ResponseMatch<'a> {
        let request = match &self.icmp_type {
            Icmpv4Type::EchoRequest(echo) => echo,
            _ => return ResponseMatch::No,
        };
        match Icmpv4Header::parse(data) {
            Ok(pdu) => match &pdu.layer {
                crate::AnyLayer::Icmpv4(reply) => match &reply.icmp_type {
                    Icmpv4Type::EchoReply(echo) if echo == request => ResponseMatch::Match,
                    _ => ResponseMatch::No,
                },
                _ => ResponseMatch::No,
            },
            Err(_) => ResponseMatch::No,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn echo_request_checksum_verifies() {
        let bytes = Pdu::from(Icmpv4Header::echo_request(0x34ab, 0x12f7))
            .serialize()
            .unwrap();
        assert_eq!(8, bytes.len());
        assert_eq!(8, bytes[0]);
        // the 16 bit one's complement sum over the whole message
        // (checksum included) verifies
        assert_eq!(0, Sum16BitWords::new().add_slice(&bytes).ones_complement());
    }

    #[test]
    fn parse_echo_round_trip() {
        let pdu = Pdu::from(Icmpv4Header::echo_request(0x1234, 1)) / &b"ping data"[..];
        let bytes = pdu.serialize().unwrap();
        let parsed = Icmpv4Header::parse(&bytes).unwrap();
        let icmp = match &parsed.layer {
            crate::AnyLayer::Icmpv4(icmp) => icmp,
            _ => panic!(),
        };
        assert_eq!(
            Icmpv4Type::EchoRequest(IcmpEchoHeader { id: 0x1234, seq: 1 }),
            icmp.icmp_type
        );
        assert_eq!(bytes, parsed.serialize().unwrap());
    }

    #[test]
    fn dest_unreachable_with_extensions() {
        // 8 byte header + 8 byte "original datagram" + extension block
        let mut data = vec![
            3, 1, 0x00, 0x00, // type, code, checksum placeholder
            0, 2, 0, 0, // unused, length 2 (8 bytes), mtu
        ];
        data.extend_from_slice(&[0x45, 0, 0, 0, 0, 0, 0, 0]); // datagram excerpt
        data.extend_from_slice(&[0x20, 0x00, 0x00, 0x00, 0x00, 0x08, 0x01, 0x01, 1, 2, 3, 4]);
        let pdu = Icmpv4Header::parse(&data).unwrap();
        let icmp = match &pdu.layer {
            crate::AnyLayer::Icmpv4(icmp) => icmp,
            _ => panic!(),
        };
        assert_eq!(8, pdu.child().unwrap().len());
        assert_eq!(1, icmp.extensions.as_ref().unwrap().objects.len());
        assert_eq!(12, pdu.trailer_len());
        assert_eq!(28, pdu.len());
    }

    #[test]
    fn echo_response_matching() {
        let request = Pdu::from(Icmpv4Header::echo_request(7, 9));
        let reply = Pdu::from(Icmpv4Header::new(Icmpv4Type::EchoReply(IcmpEchoHeader {
            id: 7,
            seq: 9,
        })))
        .serialize()
        .unwrap();
        assert!(request.matches_response(&reply));

        let wrong_seq = Pdu::from(Icmpv4Header::new(Icmpv4Type::EchoReply(IcmpEchoHeader {
            id: 7,
            seq: 10,
        })))
        .serialize()
        .unwrap();
        assert!(!request.matches_response(&wrong_seq));
    }
}
