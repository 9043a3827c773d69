use crate::err::{Layer, ParseError, SerializeError};
use crate::io::{InputStream, OutputStream};
use crate::layer::{ChildInfo, SerializeCtx};
use crate::{dispatch, EtherType, HwAddress, LlAddr, Pdu};

/// Linux cooked capture header, version 1 (pcap `DLT_LINUX_SLL`).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SllHeader {
    /// Where the packet was going (host, broadcast, multicast, ...).
    pub packet_type: u16,
    /// ARPHRD value of the capturing interface.
    pub arphrd_type: u16,
    /// Number of meaningful bytes in `address`.
    pub address_length: u16,
    /// Link layer address, zero padded.
    pub address: LlAddr,
    /// Protocol of the payload (an ether type for most ARPHRD values).
    pub protocol: EtherType,
}

impl SllHeader {
    /// Serialized size of the header in bytes.
    pub const LEN: usize = 16;

    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::SllHeader);
        let header = SllHeader {
            packet_type: stream.read_u16_be()?,
            arphrd_type: stream.read_u16_be()?,
            address_length: stream.read_u16_be()?,
            address: HwAddress(stream.read_array()?),
            protocol: EtherType(stream.read_u16_be()?),
        };
        let rest = stream.rest();
        let protocol = header.protocol;
        let mut pdu = Pdu::new(header);
        if !rest.is_empty() {
            pdu.set_child(dispatch::child_from_ether_type(protocol, rest));
        }
        Ok(pdu)
    }

    #[inline]
    pub fn header_len(&self) -> usize {
        SllHeader::LEN
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
        let mut stream = OutputStream::new(&mut buf[..SllHeader::LEN], Layer::SllHeader);
        stream.write_u16_be(self.packet_type)?;
        stream.write_u16_be(self.arphrd_type)?;
        stream.write_u16_be(self.address_length)?;
        stream.write_bytes(&self.address.octets())?;
        stream.write_u16_be(protocol.0)
    }
}

/// Linux cooked capture header, version 2 (pcap `DLT_LINUX_SLL2`).
///
/// Dispatches on `protocol` via the ether type table.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Sll2Header {
    /// Protocol of the payload (an ether type for most ARPHRD values).
    pub protocol: EtherType,
    /// Interface index the packet was captured on.
    pub interface_index: u32,
    /// ARPHRD value of the capturing interface.
    pub arphrd_type: u16,
    /// Where the packet was going (host, broadcast, multicast, ...).
    pub packet_type: u8,
    /// Number of meaningful bytes in `address`.
    pub address_length: u8,
    /// Link layer address, zero padded.
    pub address: LlAddr,
}

impl Sll2Header {
    /// Serialized size of the header in bytes.
    pub const LEN: usize = 20;

    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::SllHeader);
        let protocol = EtherType(stream.read_u16_be()?);
        stream.skip(2)?; // reserved (MBZ)
        let header = Sll2Header {
            protocol,
            interface_index: stream.read_u32_be()?,
            arphrd_type: stream.read_u16_be()?,
            packet_type: stream.read_u8()?,
            address_length: stream.read_u8()?,
            address: HwAddress(stream.read_array()?),
        };
        let rest = stream.rest();
        let mut pdu = Pdu::new(header);
        if !rest.is_empty() {
            pdu.set_child(dispatch::child_from_ether_type(protocol, rest));
        }
        Ok(pdu)
    }

    #[inline]
    pub fn header_len(&self) -> usize {
        Sll2Header::LEN
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
        let mut stream = OutputStream::new(&mut buf[..Sll2Header::LEN], Layer::SllHeader);
        stream.write_u16_be(protocol.0)?;
        stream.write_u16_be(0)?; // reserved (MBZ)
        stream.write_u32_be(self.interface_index)?;
        stream.write_u16_be(self.arphrd_type)?;
        stream.write_u8(self.packet_type)?;
        stream.write_u8(self.address_length)?;
        stream.write_bytes(&self.address.octets())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{AnyLayer, LayerType};

    #[test]
    fn sll2_parse_round_trip() {
        let data = [
            0x08, 0x06, // protocol: ARP
            0x00, 0x00, // reserved
            0x00, 0x00, 0x00, 0x03, // interface index
            0x00, 0x01, // ARPHRD_ETHER
            0x00, // packet type: to us
            0x06, // address length
            0x7a, 0x1f, 0xf4, 0x39, 0xab, 0x0d, 0x00, 0x00, // address
            0xde, 0xad, // (payload too short for ARP, kept raw)
        ];
        let pdu = Sll2Header::parse(&data).unwrap();
        let sll2 = match &pdu.layer {
            AnyLayer::Sll2(header) => header,
            _ => panic!(),
        };
        assert_eq!(EtherType::ARP, sll2.protocol);
        assert_eq!(3, sll2.interface_index);
        assert_eq!(6, sll2.address_length);
        assert_eq!("7a:1f:f4:39:ab:0d:00:00", sll2.address.to_string());
        assert_eq!(LayerType::Raw, pdu.child().unwrap().layer_type());
        assert_eq!(&data[..], &pdu.serialize().unwrap()[..]);
    }

    #[test]
    fn sll_parse_round_trip() {
        let data = [
            0x00, 0x00, // packet type
            0x00, 0x01, // ARPHRD_ETHER
            0x00, 0x06, // address length
            0x7a, 0x1f, 0xf4, 0x39, 0xab, 0x0d, 0x00, 0x00, // address
            0x12, 0x34, // unknown protocol
            0xaa, // payload
        ];
        let pdu = SllHeader::parse(&data).unwrap();
        assert_eq!(LayerType::Sll, pdu.layer_type());
        assert_eq!(LayerType::Raw, pdu.child().unwrap().layer_type());
        assert_eq!(&data[..], &pdu.serialize().unwrap()[..]);
    }
}
