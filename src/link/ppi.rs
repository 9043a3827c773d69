use crate::err::{Layer, ParseError, SerializeError};
use crate::io::{InputStream, OutputStream};
use crate::layer::{ChildInfo, SerializeCtx};
use crate::{dispatch, LinkType, Pdu};

/// Per-Packet Information header (pcap `DLT_PPI`).
///
/// The TLV field area between the fixed header and the payload is
/// preserved verbatim; the payload is dispatched on the embedded DLT.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PpiHeader {
    pub version: u8,
    pub flags: u8,
    /// DLT of the encapsulated frame.
    pub dlt: u32,
    /// Raw TLV field data between the fixed header & the payload.
    pub fields: Vec<u8>,
}

impl PpiHeader {
    /// Serialized size of the fixed part of the header in bytes.
    pub const MIN_LEN: usize = 8;

    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::PpiHeader);
        let version = stream.read_u8()?;
        let flags = stream.read_u8()?;
        let length = stream.read_u16_le()? as usize;
        let dlt = stream.read_u32_le()?;
        let fields = stream
            .read_bytes(length.saturating_sub(PpiHeader::MIN_LEN))?
            .to_vec();
        let rest = stream.rest();
        let mut pdu = Pdu::new(PpiHeader {
            version,
            flags,
            dlt,
            fields,
        });
        if !rest.is_empty() {
            let link_type = LinkType(dlt.min(u32::from(u16::MAX)) as u16);
            pdu.set_child(
                dispatch::parse_link(link_type, rest)
                    .unwrap_or_else(|_| crate::RawData::parse(rest)),
            );
        }
        Ok(pdu)
    }

    #[inline]
    pub fn header_len(&self) -> usize {
        PpiHeader::MIN_LEN + self.fields.len()
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        _child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let header_len = self.header_len();
        let mut stream = OutputStream::new(&mut buf[..header_len], Layer::PpiHeader);
        stream.write_u8(self.version)?;
        stream.write_u8(self.flags)?;
        stream.write_u16_le(header_len as u16)?;
        stream.write_u32_le(self.dlt)?;
        stream.write_bytes(&self.fields)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::LayerType;

    #[test]
    fn parse_round_trip() {
        let data = [
            0x00, 0x00, // version, flags
            0x0c, 0x00, // length 12 (little endian)
            0x69, 0x00, 0x00, 0x00, // dlt 105 (802.11)
            0xaa, 0xbb, 0xcc, 0xdd, // one opaque field
        ];
        let pdu = PpiHeader::parse(&data).unwrap();
        assert_eq!(LayerType::Ppi, pdu.layer_type());
        assert!(pdu.child().is_none());
        assert_eq!(&data[..], &pdu.serialize().unwrap()[..]);
    }
}
