use core::net::Ipv6Addr;

use crate::err::{ContentError, Layer, LenError, ParseError, SerializeError};
use crate::io::{InputStream, OutputStream};
use crate::layer::{ChildInfo, ResponseMatch, SerializeCtx};
use crate::{dispatch, IpNumber, Ipv6ExtHeader, Ipv6FlowLabel, Pdu};

/// IPv6 header including its chain of extension headers.
///
/// The on-wire `next_header` values (of the fixed header & of every
/// extension) are back-patched on serialization so the chain stays
/// consistent: each extension announces the following one and the last
/// announces the payload protocol.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Ipv6Header {
    pub traffic_class: u8,
    pub flow_label: Ipv6FlowLabel,
    pub hop_limit: u8,
    /// Protocol of the payload (after all extension headers); auto
    /// updated when serializing below a child with a registered tag.
    pub next_header: IpNumber,
    pub source: Ipv6Addr,
    pub destination: Ipv6Addr,
    pub extensions: Vec<Ipv6ExtHeader>,
}

impl Ipv6Header {
    /// Size of the fixed header.
    pub const MIN_LEN: usize = 40;

    /// Hop-by-hop option type of the jumbo payload option.
    pub const JUMBO_OPTION: u8 = 0xc2;

    pub fn new(source: Ipv6Addr, destination: Ipv6Addr) -> Ipv6Header {
        Ipv6Header {
            traffic_class: 0,
            flow_label: Ipv6FlowLabel::ZERO,
            hop_limit: 64,
            next_header: IpNumber::IPV6_NO_NEXT_HEADER,
            source,
            destination,
            extensions: Vec::new(),
        }
    }

    /// Decode an IPv6 packet (fixed header, extension chain & payload
    /// chain) from a slice.
    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let (header, payload_proto, payload) = Ipv6Header::parse_header(data)?;
        let mut pdu = Pdu::new(header);
        if !payload.is_empty() && payload_proto != IpNumber::IPV6_NO_NEXT_HEADER {
            pdu.set_child(dispatch::child_from_ip_number(payload_proto, payload));
        } else if !payload.is_empty() {
            pdu.set_child(crate::RawData::parse(payload));
        }
        Ok(pdu)
    }

    fn parse_header(data: &[u8]) -> Result<(Ipv6Header, IpNumber, &[u8]), ParseError> {
        let mut stream = InputStream::new(data, Layer::Ipv6Header);
        let first = stream.read_u32_be()?;
        let version = (first >> 28) as u8;
        if version != 6 {
            return Err(ContentError::UnexpectedIpVersion {
                expected: 6,
                found: version,
            }
            .into());
        }
        let payload_length = stream.read_u16_be()?;
        let first_header = IpNumber(stream.read_u8()?);
        let hop_limit = stream.read_u8()?;
        let source = Ipv6Addr::from(stream.read_array::<16>()?);
        let destination = Ipv6Addr::from(stream.read_array::<16>()?);

        let after_fixed = stream.rest();
        let (extensions, payload_proto, payload) =
            Ipv6ExtHeader::parse_chain(first_header, after_fixed)?;
        let ext_len: usize = extensions.iter().map(|e| e.header_len()).sum();

        // the 16 bit length field is overridden by a hop-by-hop jumbo
        // payload option when it is zero
        let announced_len = if payload_length == 0 {
            Ipv6Header::jumbo_length(&extensions).unwrap_or(ext_len + payload.len())
        } else {
            usize::from(payload_length)
        };
        let payload_len = announced_len.checked_sub(ext_len).ok_or(LenError {
            required_len: ext_len,
            len: announced_len,
            layer: Layer::Ipv6Header,
            layer_start_offset: 0,
        })?;
        if payload_len > payload.len() {
            return Err(LenError {
                required_len: Ipv6Header::MIN_LEN + announced_len,
                len: data.len(),
                layer: Layer::Ipv6Header,
                layer_start_offset: 0,
            }
            .into());
        }

        let header = Ipv6Header {
            traffic_class: ((first >> 20) & 0xff) as u8,
            flow_label: Ipv6FlowLabel::from_wire(first),
            hop_limit,
            next_header: payload_proto,
            source,
            destination,
            extensions,
        };
        Ok((header, payload_proto, &payload[..payload_len]))
    }

    fn jumbo_length(extensions: &[Ipv6ExtHeader]) -> Option<usize> {
        let hop_by_hop = extensions
            .first()
            .filter(|e| e.ext_type == crate::Ipv6ExtType::HopByHop)?;
        let mut options = hop_by_hop.payload();
        while options.len() >= 2 {
            let (kind, len) = (options[0], usize::from(options[1]));
            if kind == 0 {
                // Pad1 has no length byte
                options = &options[1..];
                continue;
            }
            if options.len() < 2 + len {
                return None;
            }
            if kind == Ipv6Header::JUMBO_OPTION && len == 4 {
                return Some(u32::from_be_bytes([
                    options[2], options[3], options[4], options[5],
                ]) as usize);
            }
            options = &options[2 + len..];
        }
        None
    }

    /// True if the extension chain contains a fragment header.
    pub fn is_fragmented(&self) -> bool {
        self.extensions
            .iter()
            .any(|e| e.ext_type == crate::Ipv6ExtType::Fragment)
    }

    #[inline]
    pub fn header_len(&self) -> usize {
        Ipv6Header::MIN_LEN + self.extensions.iter().map(|e| e.header_len()).sum::<usize>()
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let header_len = self.header_len();
        let child_len = child.map(|c| c.len).unwrap_or(0);
        let payload_len = header_len - Ipv6Header::MIN_LEN + child_len;
        if payload_len > usize::from(u16::MAX) {
            return Err(SerializeError::PayloadTooLarge {
                layer: Layer::Ipv6Header,
                actual: payload_len,
                max: u16::MAX.into(),
            });
        }
        // the protocol of the real payload, announced by the last link
        // of the chain
        let payload_proto = child
            .and_then(|c| dispatch::ip_number_of(c.layer_type))
            .unwrap_or(self.next_header);
        let first_header = self
            .extensions
            .first()
            .map(|e| e.ext_type.ip_number())
            .unwrap_or(payload_proto);

        let mut stream = OutputStream::new(&mut buf[..header_len], Layer::Ipv6Header);
        stream.write_u32_be(
            (6u32 << 28) | (u32::from(self.traffic_class) << 20) | self.flow_label.value(),
        )?;
        stream.write_u16_be(payload_len as u16)?;
        stream.write_u8(first_header.0)?;
        stream.write_u8(self.hop_limit)?;
        stream.write_bytes(&self.source.octets())?;
        stream.write_bytes(&self.destination.octets())?;
        for (i, ext) in self.extensions.iter().enumerate() {
            let next = self
                .extensions
                .get(i + 1)
                .map(|e| e.ext_type.ip_number())
                .unwrap_or(payload_proto);
            ext.write(&mut stream, next)?;
        }
        Ok(())
    }

    pub(crate) fn response_matches<'a>(&self, data: &'a [u8]) -> ResponseMatch<'a> {
        match Ipv6Header::parse_header(data) {
            Ok((header, _, payload))
                if header.source == self.destination && header.destination == self.source =>
            {
                ResponseMatch::Descend(payload)
            }
            _ => ResponseMatch::No,
        }
    }
}
