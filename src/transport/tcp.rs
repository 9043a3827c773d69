use crate::checksum::Sum16BitWords;
use crate::err::{ContentError, Layer, ParseError, SerializeError};
use crate::io::{InputStream, OutputStream};
use crate::layer::{ChildInfo, PseudoHeader, ResponseMatch, SerializeCtx};
use crate::{IpNumber, Pdu, RawData, TcpOptions};

/// TCP header (including its options).
///
/// The data offset is derived from the options length and the checksum
/// is recomputed over the header, payload & pseudo header on every
/// serialization. A TCP layer serialized without an enclosing IP layer
/// keeps a zero checksum.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TcpHeader {
    pub source_port: u16,
    pub destination_port: u16,
    pub sequence_number: u32,
    pub acknowledgment_number: u32,
    /// ECN nonce (experimental, RFC 3540).
    pub ns: bool,
    pub cwr: bool,
    pub ece: bool,
    pub urg: bool,
    pub ack: bool,
    pub psh: bool,
    pub rst: bool,
    pub syn: bool,
    pub fin: bool,
    pub window_size: u16,
    /// Checksum as found on the wire (recomputed when serializing).
    pub checksum: u16,
    pub urgent_pointer: u16,
    pub options: TcpOptions,
}

impl TcpHeader {
    /// Size of the header without options.
    pub const MIN_LEN: usize = 20;

    pub fn new(source_port: u16, destination_port: u16) -> TcpHeader {
        TcpHeader {
            source_port,
            destination_port,
            sequence_number: 0,
            acknowledgment_number: 0,
            ns: false,
            cwr: false,
            ece: false,
            urg: false,
            ack: false,
            psh: false,
            rst: false,
            syn: false,
            fin: false,
            window_size: 0,
            checksum: 0,
            urgent_pointer: 0,
            options: TcpOptions::new(),
        }
    }

    /// Decode a TCP segment (header & raw payload) from a slice.
    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let (header, payload) = TcpHeader::parse_header(data)?;
        let mut pdu = Pdu::new(header);
        if !payload.is_empty() {
            pdu.set_child(RawData::parse(payload));
        }
        Ok(pdu)
    }

    /// Decode only the header, returning it & the payload slice.
    pub fn parse_header(data: &[u8]) -> Result<(TcpHeader, &[u8]), ParseError> {
        let mut stream = InputStream::new(data, Layer::TcpHeader);
        let source_port = stream.read_u16_be()?;
        let destination_port = stream.read_u16_be()?;
        let sequence_number = stream.read_u32_be()?;
        let acknowledgment_number = stream.read_u32_be()?;
        let offset_flags = stream.read_u16_be()?;
        let data_offset = (offset_flags >> 12) as u8;
        if data_offset < 5 {
            return Err(ContentError::TcpDataOffsetTooSmall { data_offset }.into());
        }
        let header = TcpHeader {
            source_port,
            destination_port,
            sequence_number,
            acknowledgment_number,
            ns: 0 != offset_flags & 0x100,
            cwr: 0 != offset_flags & 0x80,
            ece: 0 != offset_flags & 0x40,
            urg: 0 != offset_flags & 0x20,
            ack: 0 != offset_flags & 0x10,
            psh: 0 != offset_flags & 0x08,
            rst: 0 != offset_flags & 0x04,
            syn: 0 != offset_flags & 0x02,
            fin: 0 != offset_flags & 0x01,
            window_size: stream.read_u16_be()?,
            checksum: stream.read_u16_be()?,
            urgent_pointer: stream.read_u16_be()?,
            options: {
                let options_len = usize::from(data_offset) * 4 - TcpHeader::MIN_LEN;
                TcpOptions::try_from_slice(stream.read_bytes(options_len)?)
                    .expect("options fit, length is bounded by the 4 bit data offset")
            },
        };
        Ok((header, stream.rest()))
    }

    #[inline]
    pub fn header_len(&self) -> usize {
        TcpHeader::MIN_LEN + self.options.len()
    }

    fn flags_u16(&self, data_offset: u8) -> u16 {
        (u16::from(data_offset) << 12)
            | if self.ns { 0x100 } else { 0 }
            | if self.cwr { 0x80 } else { 0 }
            | if self.ece { 0x40 } else { 0 }
            | if self.urg { 0x20 } else { 0 }
            | if self.ack { 0x10 } else { 0 }
            | if self.psh { 0x08 } else { 0 }
            | if self.rst { 0x04 } else { 0 }
            | if self.syn { 0x02 } else { 0 }
            | if self.fin { 0x01 } else { 0 }
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        _child: Option<ChildInfo>,
        ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let header_len = self.header_len();
        {
            let mut stream = OutputStream::new(&mut buf[..header_len], Layer::TcpHeader);
            stream.write_u16_be(self.source_port)?;
            stream.write_u16_be(self.destination_port)?;
            stream.write_u32_be(self.sequence_number)?;
            stream.write_u32_be(self.acknowledgment_number)?;
            stream.write_u16_be(self.flags_u16((header_len / 4) as u8))?;
            stream.write_u16_be(self.window_size)?;
            stream.write_u16_be(0)?;
            stream.write_u16_be(self.urgent_pointer)?;
            stream.write_bytes(self.options.as_slice())?;
        }
        // checksum over the pseudo header, the TCP header & the payload;
        // without an enclosing IP layer it stays zero
        let sum = match ctx.pseudo {
            Some(PseudoHeader::V4 {
                source,
                destination,
            }) => Sum16BitWords::new()
                .add_4bytes(source.octets())
                .add_4bytes(destination.octets())
                .add_2bytes([0, IpNumber::TCP.0])
                .add_2bytes((buf.len() as u16).to_be_bytes()),
            Some(PseudoHeader::V6 {
                source,
                destination,
            }) => Sum16BitWords::new()
                .add_16bytes(source.octets())
                .add_16bytes(destination.octets())
                .add_4bytes((buf.len() as u32).to_be_bytes())
                .add_2bytes([0, IpNumber::TCP.0]),
            None => return Ok(()),
        };
        let checksum = sum.add_slice(buf).to_ones_complement_with_no_zero();
        buf[16..18].copy_from_slice(&checksum.to_be_bytes());
        Ok(())
    }

    pub(crate) fn response_matches<'a>(&self, data: &'a [u8]) -> ResponseMatch<'a> {
        let (reply, _) = match TcpHeader::parse_header(data) {
            Ok(parsed) => parsed,
            Err(_) => return ResponseMatch::No,
        };
        if reply.source_port != self.destination_port
            || reply.destination_port != self.source_port
        {
            return ResponseMatch::No;
        }
        let matches = if self.syn && !self.ack {
            // handshake: the SYN-ACK acknowledges our ISN + 1
            reply.ack && reply.acknowledgment_number == self.sequence_number.wrapping_add(1)
        } else {
            // otherwise accept acks within our send window
            let offset = reply
                .acknowledgment_number
                .wrapping_sub(self.sequence_number);
            offset <= u32::from(self.window_size).max(1)
        };
        if matches {
            ResponseMatch::Match
        } else {
            ResponseMatch::No
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Ipv4Header, TcpOptionElement};
    use core::net::Ipv4Addr;

    fn syn() -> TcpHeader {
        let mut tcp = TcpHeader::new(49152, 80);
        tcp.sequence_number = 0x1000;
        tcp.syn = true;
        tcp.window_size = 0xffff;
        tcp.options = TcpOptions::from_elements(&[
            TcpOptionElement::MaximumSegmentSize(1460),
            TcpOptionElement::WindowScale(7),
        ])
        .unwrap();
        tcp
    }

    #[test]
    fn data_offset_reflects_options() {
        let tcp = syn();
        assert_eq!(28, tcp.header_len());
        let bytes = Pdu::from(tcp).serialize().unwrap();
        assert_eq!(7, bytes[12] >> 4);
    }

    #[test]
    fn parse_round_trip() {
        let bytes = Pdu::from(syn()).serialize().unwrap();
        let parsed = TcpHeader::parse(&bytes).unwrap();
        let tcp = match &parsed.layer {
            crate::AnyLayer::Tcp(tcp) => tcp,
            _ => panic!(),
        };
        assert!(tcp.syn);
        assert!(!tcp.ack);
        assert_eq!(0x1000, tcp.sequence_number);
        assert_eq!(
            vec![
                TcpOptionElement::MaximumSegmentSize(1460),
                TcpOptionElement::WindowScale(7),
            ],
            tcp.options
                .elements_iter()
                .map(|e| e.unwrap())
                .collect::<Vec<_>>()
        );
        assert_eq!(bytes, parsed.serialize().unwrap());
    }

    #[test]
    fn rejects_small_data_offset() {
        let mut bytes = Pdu::from(TcpHeader::new(1, 2)).serialize().unwrap();
        bytes[12] = 0x40;
        assert!(TcpHeader::parse(&bytes).is_err());
    }

    #[test]
    fn checksum_over_pseudo_header_verifies() {
        let ip = Ipv4Header::new(Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2));
        let bytes = (ip / syn() / &b"payload"[..]).serialize().unwrap();
        let tcp = &bytes[20..];
        let sum = Sum16BitWords::new()
            .add_4bytes([10, 0, 0, 1])
            .add_4bytes([10, 0, 0, 2])
            .add_2bytes([0, 6])
            .add_2bytes((tcp.len() as u16).to_be_bytes())
            .add_slice(tcp)
            .ones_complement();
        assert_eq!(0, sum);
    }

    #[test]
    fn checksum_zero_without_ip_parent() {
        let bytes = Pdu::from(syn()).serialize().unwrap();
        assert_eq!(&[0, 0], &bytes[16..18]);
    }

    #[test]
    fn syn_response_matching() {
        let mut reply = TcpHeader::new(80, 49152);
        reply.syn = true;
        reply.ack = true;
        reply.acknowledgment_number = 0x1001;
        let reply_bytes = Pdu::from(reply).serialize().unwrap();
        assert!(Pdu::from(syn()).matches_response(&reply_bytes));

        let mut bad = TcpHeader::new(80, 49152);
        bad.syn = true;
        bad.ack = true;
        bad.acknowledgment_number = 0x1002;
        let bad_bytes = Pdu::from(bad).serialize().unwrap();
        assert!(!Pdu::from(syn()).matches_response(&bad_bytes));
    }
}
