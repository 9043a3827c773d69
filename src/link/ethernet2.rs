use crate::err::{Layer, ParseError, SerializeError};
use crate::io::{InputStream, OutputStream};
use crate::layer::{ChildInfo, ResponseMatch, SerializeCtx};
use crate::{dispatch, EtherType, HwAddress, LayerType, LlcHeader, MacAddr, Pdu};

/// Ethernet II header.
///
/// When serialized below a child whose tag has a registered ether type
/// the `ether_type` field is updated automatically; otherwise the
/// stored value is written (a value below
/// [`EtherType::MIN_PROTOCOL_VALUE`] is an 802.3 length field and the
/// payload is decoded as LLC).
///
/// Frames are not padded to the 60 byte minimum; that is left to the
/// transmitting transport.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Ethernet2Header {
    pub destination: MacAddr,
    pub source: MacAddr,
    pub ether_type: EtherType,
}

impl Ethernet2Header {
    /// Serialized size of the header in bytes.
    pub const LEN: usize = 14;

    pub fn new(source: MacAddr, destination: MacAddr) -> Ethernet2Header {
        Ethernet2Header {
            destination,
            source,
            ether_type: EtherType(0),
        }
    }

    /// Decode an Ethernet II frame (header & payload chain) from a slice.
    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::Ethernet2Header);
        let header = Ethernet2Header {
            destination: HwAddress(stream.read_array()?),
            source: HwAddress(stream.read_array()?),
            ether_type: EtherType(stream.read_u16_be()?),
        };
        let rest = stream.rest();
        let mut pdu = Pdu::new(header.clone());
        if !rest.is_empty() {
            if header.ether_type.0 >= EtherType::MIN_PROTOCOL_VALUE {
                pdu.set_child(dispatch::child_from_ether_type(header.ether_type, rest));
            } else {
                // 802.3 length field, payload is LLC
                pdu.set_child(
                    LlcHeader::parse(rest).unwrap_or_else(|_| crate::RawData::parse(rest)),
                );
            }
        }
        Ok(pdu)
    }

    #[inline]
    pub fn header_len(&self) -> usize {
        Ethernet2Header::LEN
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let type_len = match child {
            Some(child) => match dispatch::ether_type_of(child.layer_type) {
                Some(ether_type) => ether_type.0,
                // crafted 802.3 frames get their length field derived
                None if child.layer_type == LayerType::Llc && self.ether_type.0 == 0 => {
                    child.len as u16
                }
                None => self.ether_type.0,
            },
            None => self.ether_type.0,
        };
        let mut stream = OutputStream::new(&mut buf[..Ethernet2Header::LEN], Layer::Ethernet2Header);
        stream.write_bytes(&self.destination.octets())?;
        stream.write_bytes(&self.source.octets())?;
        stream.write_u16_be(type_len)
    }

    pub(crate) fn response_matches<'a>(&self, data: &'a [u8]) -> ResponseMatch<'a> {
        let mut stream = InputStream::new(data, Layer::Ethernet2Header);
        let destination = match stream.read_array() {
            Ok(octets) => HwAddress(octets),
            Err(_) => return ResponseMatch::No,
        };
        let source = match stream.read_array() {
            Ok(octets) => HwAddress(octets),
            Err(_) => return ResponseMatch::No,
        };
        if stream.skip(2).is_err() {
            return ResponseMatch::No;
        }
        let addressed_to_us = destination == self.source;
        let from_our_peer = source == self.destination || self.destination.is_broadcast();
        if addressed_to_us && from_our_peer {
            ResponseMatch::Descend(stream.rest())
        } else {
            ResponseMatch::No
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::AnyLayer;

    const SAMPLE: [u8; 16] = [
        0x13, 0xda, 0xde, 0xf1, 0x01, 0x85, // destination
        0x7a, 0x1f, 0xf4, 0x39, 0xab, 0x0d, // source
        0x12, 0x34, // ether type (unknown)
        0xde, 0xad, // payload
    ];

    #[test]
    fn parse() {
        let pdu = Ethernet2Header::parse(&SAMPLE).unwrap();
        let eth = match &pdu.layer {
            AnyLayer::Ethernet2(eth) => eth,
            _ => panic!(),
        };
        assert_eq!("13:da:de:f1:01:85", eth.destination.to_string());
        assert_eq!("7a:1f:f4:39:ab:0d", eth.source.to_string());
        assert_eq!(EtherType(0x1234), eth.ether_type);
        assert_eq!(LayerType::Raw, pdu.child().unwrap().layer_type());
    }

    #[test]
    fn parse_len_error() {
        assert_eq!(
            Some(Layer::Ethernet2Header),
            Ethernet2Header::parse(&SAMPLE[..13])
                .unwrap_err()
                .len_error()
                .map(|e| e.layer)
        );
    }

    #[test]
    fn round_trip() {
        let pdu = Ethernet2Header::parse(&SAMPLE).unwrap();
        assert_eq!(&SAMPLE[..], &pdu.serialize().unwrap()[..]);
    }

    #[test]
    fn header_only_frame() {
        let pdu = Ethernet2Header::parse(&SAMPLE[..14]).unwrap();
        assert!(pdu.child().is_none());
        assert_eq!(14, pdu.len());
    }

    #[test]
    fn response_match() {
        let eth = Ethernet2Header::new(
            "7a:1f:f4:39:ab:0d".parse().unwrap(),
            "13:da:de:f1:01:85".parse().unwrap(),
        );
        // reply swaps the addresses
        let mut reply = Vec::new();
        reply.extend_from_slice(&[0x7a, 0x1f, 0xf4, 0x39, 0xab, 0x0d]);
        reply.extend_from_slice(&[0x13, 0xda, 0xde, 0xf1, 0x01, 0x85]);
        reply.extend_from_slice(&[0x12, 0x34]);
        assert!(Pdu::from(eth.clone()).matches_response(&reply));

        // a frame addressed elsewhere is no response
        let mut other = reply.clone();
        other[0] = 0xff;
        assert!(!Pdu::from(eth).matches_response(&other));
    }
}
