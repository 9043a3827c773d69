use core::net::Ipv4Addr;

use arrayvec::ArrayVec;

use crate::checksum::Sum16BitWords;
use crate::err::{ContentError, Layer, LenError, ParseError, SerializeError};
use crate::io::{InputStream, OutputStream};
use crate::layer::{ChildInfo, ResponseMatch, SerializeCtx};
use crate::{dispatch, IpDscp, IpEcn, IpFragOffset, IpNumber, Pdu, RawData};

/// IPv4 header (including its options).
///
/// Derived fields are recomputed on every serialization: the IHL from
/// the options length, the total length from the payload, the header
/// checksum over the final header bytes and (when the dispatch table
/// knows the child's tag) the protocol field.
///
/// ```
/// use wirecraft::Ipv4Header;
/// use core::net::Ipv4Addr;
///
/// let mut ip = Ipv4Header::new(
///     Ipv4Addr::new(192, 168, 1, 1),
///     Ipv4Addr::new(192, 168, 1, 2),
/// );
/// ip.ttl = 32;
/// assert_eq!(20, ip.header_len());
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Ipv4Header {
    pub dscp: IpDscp,
    pub ecn: IpEcn,
    pub identification: u16,
    pub dont_fragment: bool,
    pub more_fragments: bool,
    pub fragment_offset: IpFragOffset,
    pub ttl: u8,
    /// Protocol of the payload; auto updated when serializing below a
    /// child with a registered tag.
    pub protocol: IpNumber,
    /// Checksum as found on the wire (recomputed when serializing).
    pub header_checksum: u16,
    pub source: Ipv4Addr,
    pub destination: Ipv4Addr,
    options: ArrayVec<u8, 40>,
}

impl Ipv4Header {
    /// Size of the header without options.
    pub const MIN_LEN: usize = 20;

    /// Maximum length of the options in bytes (limited by the IHL field).
    pub const MAX_OPTIONS_LEN: usize = 40;

    /// Maximum total length (header & payload) in bytes.
    pub const MAX_TOTAL_LEN: usize = u16::MAX as usize;

    pub fn new(source: Ipv4Addr, destination: Ipv4Addr) -> Ipv4Header {
        Ipv4Header {
            dscp: IpDscp::ZERO,
            ecn: IpEcn::NOT_ECT,
            identification: 0,
            dont_fragment: true,
            more_fragments: false,
            fragment_offset: IpFragOffset::ZERO,
            ttl: 64,
            protocol: IpNumber(0),
            header_checksum: 0,
            source,
            destination,
            options: ArrayVec::new(),
        }
    }

    /// Decode an IPv4 packet (header & payload chain) from a slice.
    ///
    /// The payload is cut down to the total length field. Fragmented
    /// packets keep their payload as a raw layer (a reassembler can
    /// combine them afterwards, see [`crate::IpDefragPool`]).
    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let (header, payload) = Ipv4Header::parse_header(data)?;
        let mut pdu = Pdu::new(header.clone());
        if !payload.is_empty() {
            let child = if header.is_fragmented() {
                RawData::parse(payload)
            } else {
                dispatch::child_from_ip_number(header.protocol, payload)
            };
            pdu.set_child(child);
        }
        Ok(pdu)
    }

    /// Decode only the header, returning it & the payload slice
    /// (trimmed to the total length field).
    pub fn parse_header(data: &[u8]) -> Result<(Ipv4Header, &[u8]), ParseError> {
        let mut stream = InputStream::new(data, Layer::Ipv4Header);
        let version_ihl = stream.read_u8()?;
        let version = version_ihl >> 4;
        if version != 4 {
            return Err(ContentError::UnexpectedIpVersion {
                expected: 4,
                found: version,
            }
            .into());
        }
        let ihl = version_ihl & 0xf;
        if ihl < 5 {
            return Err(ContentError::Ipv4IhlTooSmall { ihl }.into());
        }
        let dscp_ecn = stream.read_u8()?;
        let total_len = stream.read_u16_be()?;
        let header_len = usize::from(ihl) * 4;
        if usize::from(total_len) < header_len {
            return Err(ContentError::Ipv4TotalLenTooSmall {
                total_len,
                header_len: header_len as u16,
            }
            .into());
        }
        let identification = stream.read_u16_be()?;
        let flags_offset = stream.read_u16_be()?;
        let header = Ipv4Header {
            dscp: IpDscp::from_wire(dscp_ecn >> 2),
            ecn: IpEcn::from_wire(dscp_ecn),
            identification,
            dont_fragment: 0 != flags_offset & 0x4000,
            more_fragments: 0 != flags_offset & 0x2000,
            fragment_offset: IpFragOffset::from_wire(flags_offset),
            ttl: stream.read_u8()?,
            protocol: IpNumber(stream.read_u8()?),
            header_checksum: stream.read_u16_be()?,
            source: Ipv4Addr::from(stream.read_array::<4>()?),
            destination: Ipv4Addr::from(stream.read_array::<4>()?),
            options: {
                let mut options = ArrayVec::new();
                options
                    .try_extend_from_slice(stream.read_bytes(header_len - Ipv4Header::MIN_LEN)?)
                    .expect("options fit, length is bounded by the 4 bit IHL");
                options
            },
        };
        let payload_len = usize::from(total_len) - header_len;
        if payload_len > stream.remaining() {
            return Err(LenError {
                required_len: usize::from(total_len),
                len: stream.position() + stream.remaining(),
                layer: Layer::Ipv4Header,
                layer_start_offset: 0,
            }
            .into());
        }
        let payload = &stream.rest()[..payload_len];
        Ok((header, payload))
    }

    /// The raw option bytes (including any padding).
    #[inline]
    pub fn options(&self) -> &[u8] {
        &self.options
    }

    /// Replaces the options. The data is padded with zero bytes (the
    /// end-of-options option) to the next multiple of 4; at most 40
    /// bytes (after padding) are allowed.
    pub fn set_options(&mut self, data: &[u8]) -> Result<(), crate::err::ValueTooBigError<usize>> {
        let padded = data.len().div_ceil(4) * 4;
        if padded > Ipv4Header::MAX_OPTIONS_LEN {
            return Err(crate::err::ValueTooBigError {
                actual: data.len(),
                max_allowed: Ipv4Header::MAX_OPTIONS_LEN,
                value_type: crate::err::ValueType::OptionPayloadLen,
            });
        }
        self.options.clear();
        self.options.try_extend_from_slice(data).unwrap();
        for _ in data.len()..padded {
            self.options.push(0);
        }
        Ok(())
    }

    /// True if the header describes a fragment of a larger packet.
    #[inline]
    pub fn is_fragmented(&self) -> bool {
        self.more_fragments || self.fragment_offset.value() != 0
    }

    #[inline]
    pub fn header_len(&self) -> usize {
        Ipv4Header::MIN_LEN + self.options.len()
    }

    /// Computes the header checksum over the serialized header bytes.
    pub fn calc_header_checksum(&self, payload_len: usize) -> u16 {
        let mut bytes = [0u8; Ipv4Header::MIN_LEN + Ipv4Header::MAX_OPTIONS_LEN];
        let header_len = self.header_len();
        self.write_header(&mut bytes[..header_len], payload_len, self.protocol, 0)
            .expect("buffer is as large as the maximum header");
        Sum16BitWords::new()
            .add_slice(&bytes[..header_len])
            .ones_complement()
    }

    fn write_header(
        &self,
        buf: &mut [u8],
        payload_len: usize,
        protocol: IpNumber,
        checksum: u16,
    ) -> Result<(), SerializeError> {
        let header_len = self.header_len();
        let total_len = header_len + payload_len;
        if total_len > Ipv4Header::MAX_TOTAL_LEN {
            return Err(SerializeError::PayloadTooLarge {
                layer: Layer::Ipv4Header,
                actual: total_len,
                max: Ipv4Header::MAX_TOTAL_LEN,
            });
        }
        let mut stream = OutputStream::new(buf, Layer::Ipv4Header);
        stream.write_u8(0x40 | (header_len / 4) as u8)?;
        stream.write_u8((self.dscp.value() << 2) | self.ecn.value())?;
        stream.write_u16_be(total_len as u16)?;
        stream.write_u16_be(self.identification)?;
        stream.write_u16_be(
            if self.dont_fragment { 0x4000 } else { 0 }
                | if self.more_fragments { 0x2000 } else { 0 }
                | self.fragment_offset.value(),
        )?;
        stream.write_u8(self.ttl)?;
        stream.write_u8(protocol.0)?;
        stream.write_u16_be(checksum)?;
        stream.write_bytes(&self.source.octets())?;
        stream.write_bytes(&self.destination.octets())?;
        stream.write_bytes(&self.options)
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let header_len = self.header_len();
        let payload_len = child.map(|c| c.len).unwrap_or(0);
        let protocol = child
            .and_then(|c| dispatch::ip_number_of(c.layer_type))
            .unwrap_or(self.protocol);
        self.write_header(&mut buf[..header_len], payload_len, protocol, 0)?;
        let checksum = Sum16BitWords::new()
            .add_slice(&buf[..header_len])
            .ones_complement();
        buf[10..12].copy_from_slice(&checksum.to_be_bytes());
        Ok(())
    }

    pub(crate) fn response_matches<'a>(&self, data: &'a [u8]) -> ResponseMatch<'a> {
        match Ipv4Header::parse_header(data) {
            Ok((header, payload))
                if header.source == self.destination && header.destination == self.source =>
            {
                ResponseMatch::Descend(payload)
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
    const SAMPLE: [u8; 24] = [
        0x45, 0x00, 0x00, 0x18, // version/ihl, dscp/ecn, total len 24
        0xab, 0xcd, 0x40, 0x00, // id, flags (DF)
        0x40, 0xff, 0x00, 0xc6, // ttl 64, proto 255, checksum
        0xc0, 0xa8, 0x01, 0x01, // source
        0xc0, 0xa8, 0x01, 0x02, // destination
        0xde, 0xad, 0xbe, 0xef, // payload
    ];

    #[test]
    fn parse() {
        let pdu = Ipv4Header::parse(&SAMPLE).unwrap();
        let ip = match &pdu.layer {
            crate::AnyLayer::Ipv4(ip) => ip,
            _ => panic!(),
        };
        assert_eq!(0xabcd, ip.identification);
        assert!(ip.dont_fragment);
        assert!(!ip.is_fragmented());
        assert_eq!(64, ip.ttl);
        assert_eq!("192.168.1.1", ip.source.to_string());
        assert_eq!("192.168.1.2", ip.destination.to_string());
        assert_eq!(4, pdu.child().unwrap().len());
    }

    #[test]
    fn checksum_verifies() {
        let pdu = Ipv4Header::parse(&SAMPLE).unwrap();
        let ip = match &pdu.layer {
            crate::AnyLayer::Ipv4(ip) => ip,
            _ => panic!(),
        };
        assert_eq!(ip.header_checksum, ip.calc_header_checksum(4));
    }

    #[test]
    fn round_trip() {
        let pdu = Ipv4Header::parse(&SAMPLE).unwrap();
        assert_eq!(&SAMPLE[..], &pdu.serialize().unwrap()[..]);
    }

    #[test]
    fn serialized_header_sums_to_zero() {
        let bytes = Ipv4Header::parse(&SAMPLE).unwrap().serialize().unwrap();
        assert_eq!(
            0,
            Sum16BitWords::new().add_slice(&bytes[..20]).ones_complement()
        );
    }

    #[test]
    fn rejects_bad_version() {
        let mut data = SAMPLE;
        data[0] = 0x65;
        assert_matches!(
            Ipv4Header::parse(&data).unwrap_err().content_error(),
            Some(ContentError::UnexpectedIpVersion { found: 6, .. })
        );
    }

    #[test]
    fn rejects_small_ihl() {
        let mut data = SAMPLE;
        data[0] = 0x43;
        assert_matches!(
            Ipv4Header::parse(&data).unwrap_err().content_error(),
            Some(ContentError::Ipv4IhlTooSmall { ihl: 3 })
        );
    }

    #[test]
    fn rejects_total_len_below_ihl() {
        let mut data = SAMPLE;
        data[3] = 0x10; // total len 16 < 20
        assert_matches!(
            Ipv4Header::parse(&data).unwrap_err().content_error(),
            Some(ContentError::Ipv4TotalLenTooSmall { .. })
        );
    }

    #[test]
    fn rejects_total_len_beyond_buffer() {
        let mut data = SAMPLE;
        data[3] = 0xff;
        assert!(Ipv4Header::parse(&data).unwrap_err().len_error().is_some());
    }

    #[test]
    fn options_are_padded() {
        let mut ip = Ipv4Header::new(Ipv4Addr::LOCALHOST, Ipv4Addr::LOCALHOST);
        ip.set_options(&[0x94, 0x04, 0x00, 0x00, 0x01]).unwrap();
        assert_eq!(8, ip.options().len());
        assert_eq!(28, ip.header_len());
        assert!(ip.set_options(&[0u8; 41]).is_err());

        // ihl reflects the options in the serialized form
        let bytes = Pdu::from(ip).serialize().unwrap();
        assert_eq!(0x47, bytes[0]);
    }

    #[test]
    fn fragment_payload_stays_raw() {
        let mut data = SAMPLE;
        data[6] = 0x20; // more fragments
        data[8..10].copy_from_slice(&[0x40, 0x06]); // ttl, proto tcp
        let pdu = Ipv4Header::parse(&data).unwrap();
        assert_eq!(crate::LayerType::Raw, pdu.child().unwrap().layer_type());
    }
}
