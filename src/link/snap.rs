use crate::err::{Layer, ParseError, SerializeError};
use crate::io::{InputStream, OutputStream};
use crate::layer::{ChildInfo, SerializeCtx};
use crate::{dispatch, EtherType, Pdu};

/// SNAP extension header (follows an LLC header with SAP 0xaa).
///
/// With the zero OUI the protocol field is an ether type and the
/// payload is dispatched through the ether type table.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SnapHeader {
    /// Organizationally unique identifier.
    pub oui: [u8; 3],
    /// Protocol id (an ether type for OUI 00:00:00).
    pub protocol: EtherType,
}

impl SnapHeader {
    /// Serialized size of the header in bytes.
    pub const LEN: usize = 5;

    pub fn new(protocol: EtherType) -> SnapHeader {
        SnapHeader {
            oui: [0; 3],
            protocol,
        }
    }

    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::SnapHeader);
        let header = SnapHeader {
            oui: stream.read_array()?,
            protocol: EtherType(stream.read_u16_be()?),
        };
        let rest = stream.rest();
        let mut pdu = Pdu::new(header.clone());
        if !rest.is_empty() {
            let child = if header.oui == [0, 0, 0] {
                dispatch::child_from_ether_type(header.protocol, rest)
            } else {
                crate::RawData::parse(rest)
            };
            pdu.set_child(child);
        }
        Ok(pdu)
    }

    #[inline]
    pub fn header_len(&self) -> usize {
        SnapHeader::LEN
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let protocol = child
            .and_then(|c| dispatch::ether_type_of(c.layer_type))
            .unwrap_or(self.protocol);
        let mut stream = OutputStream::new(&mut buf[..SnapHeader::LEN], Layer::SnapHeader);
        stream.write_bytes(&self.oui)?;
        stream.write_u16_be(protocol.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::LayerType;

    #[test]
    fn parse_round_trip() {
        let data = [0x00, 0x00, 0x00, 0x08, 0x06, 0xde, 0xad];
        let pdu = SnapHeader::parse(&data).unwrap();
        let snap = match &pdu.layer {
            crate::AnyLayer::Snap(header) => header,
            _ => panic!(),
        };
        assert_eq!(EtherType::ARP, snap.protocol);
        // payload too short for ARP, kept raw
        assert_eq!(LayerType::Raw, pdu.child().unwrap().layer_type());
        assert_eq!(&data[..], &pdu.serialize().unwrap()[..]);
    }

    #[test]
    fn vendor_oui_payload_kept_raw() {
        let data = [0x00, 0x50, 0xf2, 0x00, 0x01, 0xaa];
        let pdu = SnapHeader::parse(&data).unwrap();
        assert_eq!(LayerType::Raw, pdu.child().unwrap().layer_type());
    }
}
