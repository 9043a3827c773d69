use crate::checksum::Sum16BitWords;
use crate::err::{Layer, ParseError, SerializeError};
use crate::io::{InputStream, OutputStream};
use crate::layer::{ChildInfo, PseudoHeader, ResponseMatch, SerializeCtx};
use crate::{IcmpEchoHeader, IcmpExtensions, IpNumber, Pdu, RawData};

/// Message type of an [`Icmpv6Header`], together with the contents of
/// the 4 byte field after the checksum.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Icmpv6Type {
    /// Destination unreachable; `length` is the RFC 4884 original
    /// datagram length in 64 bit words.
    DestinationUnreachable { code: u8, length: u8 },
    PacketTooBig { mtu: u32 },
    TimeExceeded { code: u8, length: u8 },
    ParameterProblem { code: u8, pointer: u32 },
    EchoRequest(IcmpEchoHeader),
    EchoReply(IcmpEchoHeader),
    /// Any other type; the 4 bytes after the checksum are kept raw.
    Unknown {
        type_u8: u8,
        code_u8: u8,
        bytes5to8: [u8; 4],
    },
}

impl Icmpv6Type {
    /// The (type, code) byte pair of the message.
    pub fn type_code(&self) -> (u8, u8) {
        use Icmpv6Type::*;
        match self {
            DestinationUnreachable { code, .. } => (1, *code),
            PacketTooBig { .. } => (2, 0),
            TimeExceeded { code, .. } => (3, *code),
            ParameterProblem { code, .. } => (4, *code),
            EchoRequest(_) => (128, 0),
            EchoReply(_) => (129, 0),
            Unknown {
                type_u8, code_u8, ..
            } => (*type_u8, *code_u8),
        }
    }

    fn rest_of_header(&self) -> [u8; 4] {
        use Icmpv6Type::*;
        match self {
            DestinationUnreachable { length, .. } | TimeExceeded { length, .. } => {
                [*length, 0, 0, 0]
            }
            PacketTooBig { mtu } => mtu.to_be_bytes(),
            ParameterProblem { pointer, .. } => pointer.to_be_bytes(),
            EchoRequest(echo) | EchoReply(echo) => {
                let id = echo.id.to_be_bytes();
                let seq = echo.seq.to_be_bytes();
                [id[0], id[1], seq[0], seq[1]]
            }
            Unknown { bytes5to8, .. } => *bytes5to8,
        }
    }

    /// RFC 4884 length field (in 64 bit words for ICMPv6).
    fn rfc4884_length(&self) -> Option<u8> {
        use Icmpv6Type::*;
        match self {
            DestinationUnreachable { length, .. } | TimeExceeded { length, .. } => Some(*length),
            _ => None,
        }
    }
}

/// ICMPv6 packet.
///
/// The checksum includes the IPv6 pseudo header; serializing an ICMPv6
/// layer without an enclosing IPv6 layer fails with
/// [`SerializeError::MissingAncestor`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Icmpv6Header {
    pub icmp_type: Icmpv6Type,
    /// Checksum as found on the wire (recomputed when serializing).
    pub checksum: u16,
    pub extensions: Option<IcmpExtensions>,
}

impl Icmpv6Header {
    /// Serialized size of the fixed header in bytes.
    pub const MIN_LEN: usize = 8;

    pub fn new(icmp_type: Icmpv6Type) -> Icmpv6Header {
        Icmpv6Header {
            icmp_type,
            checksum: 0,
            extensions: None,
        }
    }

    /// Creates an echo request with the given id & sequence.
    pub fn echo_request(id: u16, seq: u16) -> Icmpv6Header {
        Icmpv6Header::new(Icmpv6Type::EchoRequest(IcmpEchoHeader { id, seq }))
    }

    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::Icmpv6);
        let type_u8 = stream.read_u8()?;
        let code_u8 = stream.read_u8()?;
        let checksum = stream.read_u16_be()?;
        let bytes5to8: [u8; 4] = stream.read_array()?;
        let icmp_type = match type_u8 {
            1 => Icmpv6Type::DestinationUnreachable {
                code: code_u8,
                length: bytes5to8[0],
            },
            2 => Icmpv6Type::PacketTooBig {
                mtu: u32::from_be_bytes(bytes5to8),
            },
            3 => Icmpv6Type::TimeExceeded {
                code: code_u8,
                length: bytes5to8[0],
            },
            4 => Icmpv6Type::ParameterProblem {
                code: code_u8,
                pointer: u32::from_be_bytes(bytes5to8),
            },
            128 if code_u8 == 0 => Icmpv6Type::EchoRequest(IcmpEchoHeader {
                id: u16::from_be_bytes([bytes5to8[0], bytes5to8[1]]),
                seq: u16::from_be_bytes([bytes5to8[2], bytes5to8[3]]),
            }),
            129 if code_u8 == 0 => Icmpv6Type::EchoReply(IcmpEchoHeader {
                id: u16::from_be_bytes([bytes5to8[0], bytes5to8[1]]),
                seq: u16::from_be_bytes([bytes5to8[2], bytes5to8[3]]),
            }),
            _ => Icmpv6Type::Unknown {
                type_u8,
                code_u8,
                bytes5to8,
            },
        };

        let rest = stream.rest();
        let (payload, extensions) = match icmp_type.rfc4884_length() {
            Some(length) if length > 0 && rest.len() > usize::from(length) * 8 => {
                let split = usize::from(length) * 8;
                (&rest[..split], Some(IcmpExtensions::parse(&rest[split..])?))
            }
            _ => (rest, None),
        };

        let mut pdu = Pdu::new(Icmpv6Header {
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
        Icmpv6Header::MIN_LEN
    }

    #[inline]
    pub fn trailer_len(&self) -> usize {
        self.extensions.as_ref().map(|e| e.len()).unwrap_or(0)
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        _child: Option<ChildInfo>,
        ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let (source, destination) = match ctx.pseudo {
            Some(PseudoHeader::V6 {
                source,
                destination,
            }) => (source, destination),
            _ => {
                return Err(SerializeError::MissingAncestor {
                    layer: Layer::Icmpv6,
                    required: Layer::Ipv6Header,
                })
            }
        };
        let (type_u8, code_u8) = self.icmp_type.type_code();
        {
            let mut stream = OutputStream::new(&mut buf[..Icmpv6Header::MIN_LEN], Layer::Icmpv6);
            stream.write_u8(type_u8)?;
            stream.write_u8(code_u8)?;
            stream.write_u16_be(0)?;
            stream.write_bytes(&self.icmp_type.rest_of_header())?;
        }
        if let Some(extensions) = &self.extensions {
            let trailer_start = buf.len() - extensions.len();
            extensions.write_to(&mut buf[trailer_start..])?;
        }
        let checksum = Sum16BitWords::new()
            .add_16bytes(source.octets())
            .add_16bytes(destination.octets())
            .add_4bytes((buf.len() as u32).to_be_bytes())
            .add_2bytes([0, IpNumber::IPV6_ICMP.0])
            .add_slice(buf)
            .to_ones_complement_with_no_zero();
        buf[2..4].copy_from_slice(&checksum.to_be_bytes());
        Ok(())
    }

    pub(crate) fn response_matches<'a>(&self, data: &'a [u8]) -> ResponseMatch<'a> {
        let request = match &self.icmp_type {
            Icmpv6Type::EchoRequest(echo) => echo,
            _ => return ResponseMatch::No,
        };
        match Icmpv6Header::parse(data) {
            Ok(pdu) => match &pdu.layer {
                crate::AnyLayer::Icmpv6(reply) => match &reply.icmp_type {
                    Icmpv6Type::EchoReply(echo) if echo == request => ResponseMatch::Match,
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
    use core::net::Ipv6Addr;

    #[test]
    fn serialize_requires_ipv6_parent() {
        let err = Pdu::from(Icmpv6Header::echo_request(1, 2))
            .serialize()
            .unwrap_err();
        assert_eq!(
            SerializeError::MissingAncestor {
                layer: Layer::Icmpv6,
                required: Layer::Ipv6Header,
            },
            err
        );
    }

    #[test]
    fn checksum_includes_pseudo_header() {
        let ip = crate::Ipv6Header::new(
            Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 1),
            Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 2),
        );
        let bytes = (ip / Icmpv6Header::echo_request(0x42, 1)).serialize().unwrap();
        let icmp = &bytes[40..];
        let sum = Sum16BitWords::new()
            .add_16bytes(Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 1).octets())
            .add_16bytes(Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 2).octets())
            .add_4bytes((icmp.len() as u32).to_be_bytes())
            .add_2bytes([0, 58])
            .add_slice(icmp)
            .ones_complement();
        assert_eq!(0, sum);
    }

    #[test]
    fn parse_round_trip_below_ipv6() {
        let ip = crate::Ipv6Header::new(Ipv6Addr::LOCALHOST, Ipv6Addr::LOCALHOST);
        let bytes = (ip / Icmpv6Header::echo_request(3, 4) / &b"data"[..])
            .serialize()
            .unwrap();
        let parsed = crate::Ipv6Header::parse(&bytes).unwrap();
        assert_eq!(crate::LayerType::Icmpv6, parsed.child().unwrap().layer_type());
        assert_eq!(bytes, parsed.serialize().unwrap());
    }
}
