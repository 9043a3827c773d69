use crate::err::{Layer, ParseError, SerializeError};
use crate::io::{InputStream, OutputStream};
use crate::IpNumber;

/// Kinds of IPv6 extension headers the dissector walks through.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Ipv6ExtType {
    HopByHop,
    Routing,
    Fragment,
    DestinationOptions,
    Authentication,
    Mobility,
}

impl Ipv6ExtType {
    /// The IP number announcing this extension header.
    pub fn ip_number(self) -> IpNumber {
        use Ipv6ExtType::*;
        match self {
            HopByHop => IpNumber::IPV6_HOP_BY_HOP,
            Routing => IpNumber::IPV6_ROUTE,
            Fragment => IpNumber::IPV6_FRAG,
            DestinationOptions => IpNumber::IPV6_DEST_OPTIONS,
            Authentication => IpNumber::IPSEC_AH,
            Mobility => IpNumber::MOBILITY,
        }
    }

    fn from_ip_number(value: IpNumber) -> Option<Ipv6ExtType> {
        use Ipv6ExtType::*;
        match value {
            IpNumber::IPV6_HOP_BY_HOP => Some(HopByHop),
            IpNumber::IPV6_ROUTE => Some(Routing),
            IpNumber::IPV6_FRAG => Some(Fragment),
            IpNumber::IPV6_DEST_OPTIONS => Some(DestinationOptions),
            IpNumber::IPSEC_AH => Some(Authentication),
            IpNumber::MOBILITY => Some(Mobility),
            _ => None,
        }
    }
}

/// One IPv6 extension header.
///
/// `payload` holds the bytes after the 2 byte (next header, length)
/// prefix; its size must encode into the length field (see
/// [`Ipv6ExtHeader::new`] which zero pads accordingly).
///
/// The on-wire `next_header` byte of each extension is back-patched on
/// serialization to the type of the following extension (the last one
/// takes the payload protocol).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Ipv6ExtHeader {
    pub ext_type: Ipv6ExtType,
    /// Next header value as found on the wire (kept for chains that end
    /// in an undecodable payload).
    pub next_header: IpNumber,
    payload: Vec<u8>,
}

impl Ipv6ExtHeader {
    /// Creates an extension header, zero padding the payload up to the
    /// next length the 8 byte granular length field can express (4 byte
    /// granular for authentication headers).
    pub fn new(ext_type: Ipv6ExtType, payload: Vec<u8>) -> Ipv6ExtHeader {
        let mut header = Ipv6ExtHeader {
            ext_type,
            next_header: IpNumber::IPV6_NO_NEXT_HEADER,
            payload,
        };
        let granularity = match ext_type {
            Ipv6ExtType::Authentication => 4,
            _ => 8,
        };
        let min = granularity - 2;
        let len = header.payload.len().max(min);
        let padded = min + (len - min).div_ceil(granularity) * granularity;
        header.payload.resize(padded, 0);
        header
    }

    /// The bytes after the (next header, length) prefix.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Serialized size of the extension header in bytes.
    #[inline]
    pub fn header_len(&self) -> usize {
        2 + self.payload.len()
    }

    /// Parses the chain of extension headers starting with the header
    /// announced by `first`. Returns the headers, the IP number of the
    /// payload & the payload slice.
    pub(crate) fn parse_chain(
        first: IpNumber,
        data: &[u8],
    ) -> Result<(Vec<Ipv6ExtHeader>, IpNumber, &[u8]), ParseError> {
        let mut headers = Vec::new();
        let mut next = first;
        let mut stream = InputStream::new(data, Layer::Ipv6ExtHeader);
        while let Some(ext_type) = Ipv6ExtType::from_ip_number(next) {
            let next_header = IpNumber(stream.read_u8()?);
            let len_field = stream.read_u8()?;
            let payload_len = match ext_type {
                // AH counts in 4 byte units & includes 2 extra units
                Ipv6ExtType::Authentication => (usize::from(len_field) + 2) * 4 - 2,
                // fragment headers have a fixed size, the field is reserved
                Ipv6ExtType::Fragment => 6,
                _ => (usize::from(len_field) + 1) * 8 - 2,
            };
            headers.push(Ipv6ExtHeader {
                ext_type,
                next_header,
                payload: stream.read_bytes(payload_len)?.to_vec(),
            });
            next = next_header;
        }
        Ok((headers, next, stream.rest()))
    }

    pub(crate) fn write(
        &self,
        stream: &mut OutputStream<'_>,
        next_header: IpNumber,
    ) -> Result<(), SerializeError> {
        stream.write_u8(next_header.0)?;
        let len_field = match self.ext_type {
            Ipv6ExtType::Authentication => (self.payload.len() + 2) / 4 - 2,
            Ipv6ExtType::Fragment => 0,
            _ => (self.payload.len() + 2) / 8 - 1,
        };
        stream.write_u8(len_field as u8)?;
        stream.write_bytes(&self.payload)
    }

    /// Fragment header helpers (only meaningful for
    /// [`Ipv6ExtType::Fragment`] headers): offset in 8 byte units,
    /// more-fragments flag & identification.
    pub fn fragment_info(&self) -> Option<(u16, bool, u32)> {
        if self.ext_type != Ipv6ExtType::Fragment || self.payload.len() != 6 {
            return None;
        }
        let offset_flags = u16::from_be_bytes([self.payload[0], self.payload[1]]);
        let identification = u32::from_be_bytes([
            self.payload[2],
            self.payload[3],
            self.payload[4],
            self.payload[5],
        ]);
        Some((offset_flags >> 3, 0 != offset_flags & 1, identification))
    }

}
