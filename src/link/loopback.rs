use crate::err::{Layer, ParseError, SerializeError};
use crate::io::{InputStream, OutputStream};
use crate::layer::{ChildInfo, SerializeCtx};
use crate::{Ipv4Header, Ipv6Header, LayerType, Pdu, RawData};

/// Loopback (pcap `DLT_NULL`) header: a 4 byte protocol family in the
/// byte order of the capturing host.
///
/// The parser first assumes little endian and falls back to big endian
/// when the value does not fit into 16 bits; the detected order is kept
/// for byte exact re-serialization.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LoopbackHeader {
    /// Protocol family of the payload (`AF_INET`/`AF_INET6` values).
    pub family: u32,
    /// True if the family was captured in big endian byte order.
    pub big_endian: bool,
}

impl LoopbackHeader {
    /// Serialized size of the header in bytes.
    pub const LEN: usize = 4;

    /// `AF_INET`.
    pub const FAMILY_INET: u32 = 2;
    /// `AF_INET6` values of the BSDs & Linux.
    pub const FAMILY_INET6: [u32; 4] = [10, 24, 28, 30];

    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::LoopbackHeader);
        let le = stream.read_u32_le()?;
        let (family, big_endian) = if le <= 0xffff {
            (le, false)
        } else {
            (le.swap_bytes(), true)
        };
        let rest = stream.rest();
        let mut pdu = Pdu::new(LoopbackHeader { family, big_endian });
        if !rest.is_empty() {
            let child = if family == LoopbackHeader::FAMILY_INET {
                Ipv4Header::parse(rest).unwrap_or_else(|_| RawData::parse(rest))
            } else if LoopbackHeader::FAMILY_INET6.contains(&family) {
                Ipv6Header::parse(rest).unwrap_or_else(|_| RawData::parse(rest))
            } else {
                RawData::parse(rest)
            };
            pdu.set_child(child);
        }
        Ok(pdu)
    }

    /// Updates the family for a child tag (used by the composition
    /// operator).
    pub(crate) fn set_family_for(&mut self, child: LayerType) {
        match child {
            LayerType::Ipv4 => self.family = LoopbackHeader::FAMILY_INET,
            LayerType::Ipv6 => self.family = LoopbackHeader::FAMILY_INET6[0],
            _ => {}
        }
    }

    #[inline]
    pub fn header_len(&self) -> usize {
        LoopbackHeader::LEN
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        _child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let mut stream = OutputStream::new(&mut buf[..LoopbackHeader::LEN], Layer::LoopbackHeader);
        if self.big_endian {
            stream.write_u32_be(self.family)
        } else {
            stream.write_u32_le(self.family)
        }
    }
}
