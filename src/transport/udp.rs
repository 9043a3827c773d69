use crate::checksum::Sum16BitWords;
use crate::err::{Layer, LenError, ParseError, SerializeError};
use crate::io::{InputStream, OutputStream};
use crate::layer::{ChildInfo, PseudoHeader, ResponseMatch, SerializeCtx};
use crate::{dispatch, IpNumber, Pdu};

/// UDP header.
///
/// Length & checksum are recomputed on serialization. The checksum
/// always includes the pseudo header of the enclosing IP layer (with
/// the 0 result encoded as 0xffff); without an enclosing IP layer it
/// stays zero.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct UdpHeader {
    pub source_port: u16,
    pub destination_port: u16,
    /// Length as found on the wire (recomputed when serializing).
    pub length: u16,
    /// Checksum as found on the wire (recomputed when serializing).
    pub checksum: u16,
}

impl UdpHeader {
    /// Serialized size of the header in bytes.
    pub const LEN: usize = 8;

    pub fn new(source_port: u16, destination_port: u16) -> UdpHeader {
        UdpHeader {
            source_port,
            destination_port,
            length: 0,
            checksum: 0,
        }
    }

    /// Decode an UDP datagram (header & payload chain) from a slice.
    ///
    /// The payload is dispatched on the well known ports of both sides
    /// (DNS, DHCP, DHCPv6, BFD, VXLAN) and kept raw otherwise.
    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::UdpHeader);
        let header = UdpHeader {
            source_port: stream.read_u16_be()?,
            destination_port: stream.read_u16_be()?,
            length: stream.read_u16_be()?,
            checksum: stream.read_u16_be()?,
        };
        if usize::from(header.length) < UdpHeader::LEN {
            return Err(LenError {
                required_len: UdpHeader::LEN,
                len: header.length.into(),
                layer: Layer::UdpHeader,
                layer_start_offset: 0,
            }
            .into());
        }
        let payload_len = usize::from(header.length) - UdpHeader::LEN;
        if payload_len > stream.remaining() {
            return Err(LenError {
                required_len: header.length.into(),
                len: data.len(),
                layer: Layer::UdpHeader,
                layer_start_offset: 0,
            }
            .into());
        }
        let payload = &stream.rest()[..payload_len];
        let mut pdu = Pdu::new(header.clone());
        if !payload.is_empty() {
            pdu.set_child(dispatch::child_from_udp_ports(
                header.source_port,
                header.destination_port,
                payload,
            ));
        }
        Ok(pdu)
    }

    #[inline]
    pub fn header_len(&self) -> usize {
        UdpHeader::LEN
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        _child: Option<ChildInfo>,
        ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        if buf.len() > usize::from(u16::MAX) {
            return Err(SerializeError::PayloadTooLarge {
                layer: Layer::UdpHeader,
                actual: buf.len(),
                max: u16::MAX.into(),
            });
        }
        {
            let total_len = buf.len() as u16;
            let mut stream = OutputStream::new(&mut buf[..UdpHeader::LEN], Layer::UdpHeader);
            stream.write_u16_be(self.source_port)?;
            stream.write_u16_be(self.destination_port)?;
            stream.write_u16_be(total_len)?;
            stream.write_u16_be(0)?;
        }
        let sum = match ctx.pseudo {
            Some(PseudoHeader::V4 {
                source,
                destination,
            }) => Sum16BitWords::new()
                .add_4bytes(source.octets())
                .add_4bytes(destination.octets())
                .add_2bytes([0, IpNumber::UDP.0])
                .add_2bytes((buf.len() as u16).to_be_bytes()),
            Some(PseudoHeader::V6 {
                source,
                destination,
            }) => Sum16BitWords::new()
                .add_16bytes(source.octets())
                .add_16bytes(destination.octets())
                .add_4bytes((buf.len() as u32).to_be_bytes())
                .add_2bytes([0, IpNumber::UDP.0]),
            None => return Ok(()),
        };
        let checksum = sum.add_slice(buf).to_ones_complement_with_no_zero();
        buf[6..8].copy_from_slice(&checksum.to_be_bytes());
        Ok(())
    }

    pub(crate) fn response_matches<'a>(&self, data: &'a [u8]) -> ResponseMatch<'a> {
        let mut stream = InputStream::new(data, Layer::UdpHeader);
        let source_port = match stream.read_u16_be() {
            Ok(port) => port,
            Err(_) => return ResponseMatch::No,
        };
        let destination_port = match stream.read_u16_be() {
            Ok(port) => port,
            Err(_) => return ResponseMatch::No,
        };
        if stream.skip(4).is_err() {
            return ResponseMatch::No;
        }
        if source_port == self.destination_port && destination_port == self.source_port {
            ResponseMatch::Descend(stream.rest())
        } else {
            ResponseMatch::No
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Ipv4Header;
    use core::net::Ipv4Addr;

    #[test]
    fn length_is_derived() {
        let bytes = (UdpHeader::new(1024, 53) / &b"abcd"[..]).serialize().unwrap();
        assert_eq!(12, u16::from_be_bytes([bytes[4], bytes[5]]));
    }

    #[test]
    fn parse_rejects_bad_length_field() {
        // length field smaller than the header
        let data = [0, 1, 0, 2, 0, 4, 0, 0];
        assert!(UdpHeader::parse(&data).is_err());
        // length field beyond the buffer
        let data = [0, 1, 0, 2, 0, 20, 0, 0, 1];
        assert!(UdpHeader::parse(&data).is_err());
    }

    #[test]
    fn checksum_verifies() {
        let ip = Ipv4Header::new(Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2));
        let bytes = (ip / UdpHeader::new(1024, 9999) / &b"data"[..])
            .serialize()
            .unwrap();
        let udp = &bytes[20..];
        let sum = Sum16BitWords::new()
            .add_4bytes([10, 0, 0, 1])
            .add_4bytes([10, 0, 0, 2])
            .add_2bytes([0, 17])
            .add_2bytes((udp.len() as u16).to_be_bytes())
            .add_slice(udp)
            .ones_complement();
        assert_eq!(0, sum);
    }

    #[test]
    fn round_trip_with_payload() {
        let ip = Ipv4Header::new(Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2));
        let bytes = (ip / UdpHeader::new(40000, 40001) / &b"opaque"[..])
            .serialize()
            .unwrap();
        let parsed = Ipv4Header::parse(&bytes).unwrap();
        assert_eq!(crate::LayerType::Udp, parsed.child().unwrap().layer_type());
        assert_eq!(bytes, parsed.serialize().unwrap());
    }
}
