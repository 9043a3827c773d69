use crate::err::{Layer, ParseError, SerializeError};
use crate::io::{InputStream, OutputStream};
use crate::layer::{ChildInfo, SerializeCtx};
use crate::{HwAddress, LlcHeader, MacAddr, Pdu, RawData};

use super::{write_frame_control, Dot11Flags, DOT11_TYPE_DATA};

/// Data frame subtype values.
pub mod data_subtype {
    pub const DATA: u8 = 0;
    pub const NULL: u8 = 4;
    pub const QOS_DATA: u8 = 8;
    pub const QOS_NULL: u8 = 12;
}

/// 802.11 data frame (including the QoS variants).
///
/// The address count follows the DS bits (a fourth address is present
/// when both are set), the QoS control field follows the subtype.
/// Unprotected payloads are decoded as LLC; protected ones stay raw.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Dot11Data {
    /// Data frame subtype (see [`data_subtype`]).
    pub subtype: u8,
    pub flags: Dot11Flags,
    pub duration: u16,
    pub addr1: MacAddr,
    pub addr2: MacAddr,
    pub addr3: MacAddr,
    /// Fragment number (4 bits).
    pub fragment: u8,
    /// Sequence number (12 bits).
    pub sequence: u16,
    /// Fourth address (present when to-DS & from-DS are both set).
    pub addr4: Option<MacAddr>,
    /// QoS control field (present for the QoS subtypes).
    pub qos_control: Option<u16>,
}

impl Dot11Data {
    /// Size of the header with three addresses.
    pub const MIN_LEN: usize = 24;

    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::Dot11Header);
        let first = stream.read_u8()?;
        let subtype = first >> 4;
        let flags = Dot11Flags::from_wire(stream.read_u8()?);
        let duration = stream.read_u16_le()?;
        let addr1 = HwAddress(stream.read_array()?);
        let addr2 = HwAddress(stream.read_array()?);
        let addr3 = HwAddress(stream.read_array()?);
        let seq_control = stream.read_u16_le()?;
        let addr4 = if flags.to_ds && flags.from_ds {
            Some(HwAddress(stream.read_array()?))
        } else {
            None
        };
        let qos_control = if 0 != subtype & data_subtype::QOS_DATA {
            Some(stream.read_u16_le()?)
        } else {
            None
        };
        let header = Dot11Data {
            subtype,
            flags,
            duration,
            addr1,
            addr2,
            addr3,
            fragment: (seq_control & 0xf) as u8,
            sequence: seq_control >> 4,
            addr4,
            qos_control,
        };
        let rest = stream.rest();
        let protected = header.flags.protected;
        let mut pdu = Pdu::new(header);
        if !rest.is_empty() {
            let child = if protected {
                RawData::parse(rest)
            } else {
                LlcHeader::parse(rest).unwrap_or_else(|_| RawData::parse(rest))
            };
            pdu.set_child(child);
        }
        Ok(pdu)
    }

    pub fn header_len(&self) -> usize {
        Dot11Data::MIN_LEN
            + if self.addr4.is_some() { 6 } else { 0 }
            + if self.qos_control.is_some() { 2 } else { 0 }
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        _child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let header_len = self.header_len();
        let mut stream = OutputStream::new(&mut buf[..header_len], Layer::Dot11Header);
        write_frame_control(&mut stream, DOT11_TYPE_DATA, self.subtype, self.flags)?;
        stream.write_u16_le(self.duration)?;
        stream.write_bytes(&self.addr1.octets())?;
        stream.write_bytes(&self.addr2.octets())?;
        stream.write_bytes(&self.addr3.octets())?;
        stream.write_u16_le((self.sequence << 4) | u16::from(self.fragment & 0xf))?;
        if let Some(addr4) = self.addr4 {
            stream.write_bytes(&addr4.octets())?;
        }
        if let Some(qos_control) = self.qos_control {
            stream.write_u16_le(qos_control)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{AnyLayer, LayerType};

    fn qos_data_bytes() -> Vec<u8> {
        let mut data = vec![
            0x88, 0x01, // QoS data, to-DS
            0x2c, 0x00, // duration
        ];
        data.extend_from_slice(&[0x00, 0x1c, 0x0e, 0x87, 0x85, 0x01]); // addr1
        data.extend_from_slice(&[0x7a, 0x1f, 0xf4, 0x39, 0xab, 0x0d]); // addr2
        data.extend_from_slice(&[0x00, 0x1c, 0x0e, 0x87, 0x85, 0x01]); // addr3
        data.extend_from_slice(&[0x30, 0x01]); // sequence control
        data.extend_from_slice(&[0x06, 0x00]); // qos control
        data.extend_from_slice(&[0xaa, 0xaa, 0x03, 0x00, 0x00, 0x00, 0x12, 0x34]); // LLC+SNAP
        data
    }

    #[test]
    fn parse_qos_data() {
        let data = qos_data_bytes();
        let pdu = Dot11Data::parse(&data).unwrap();
        let frame = match &pdu.layer {
            AnyLayer::Dot11Data(frame) => frame,
            _ => panic!(),
        };
        assert_eq!(data_subtype::QOS_DATA, frame.subtype);
        assert!(frame.flags.to_ds);
        assert!(!frame.flags.from_ds);
        assert_eq!(None, frame.addr4);
        assert_eq!(Some(0x0006), frame.qos_control);
        assert_eq!(0x013, frame.sequence);
        assert_eq!(0, frame.fragment);
        assert_eq!(26, frame.header_len());
        assert_eq!(LayerType::Llc, pdu.child().unwrap().layer_type());
        assert_eq!(data, pdu.serialize().unwrap());
    }

    #[test]
    fn protected_payload_stays_raw() {
        let mut data = qos_data_bytes();
        data[1] |= 0x40; // protected
        let pdu = Dot11Data::parse(&data).unwrap();
        assert_eq!(LayerType::Raw, pdu.child().unwrap().layer_type());
        assert_eq!(data, pdu.serialize().unwrap());
    }

    #[test]
    fn four_address_format() {
        let mut data = qos_data_bytes();
        data[1] |= 0x02; // from-DS as well
        data.splice(24..24, [0xde, 0xad, 0xbe, 0xef, 0x00, 0x01]);
        let pdu = Dot11Data::parse(&data).unwrap();
        let frame = match &pdu.layer {
            AnyLayer::Dot11Data(frame) => frame,
            _ => panic!(),
        };
        assert_eq!(
            Some("de:ad:be:ef:00:01".parse().unwrap()),
            frame.addr4
        );
        assert_eq!(32, frame.header_len());
        assert_eq!(data, pdu.serialize().unwrap());
    }
}
