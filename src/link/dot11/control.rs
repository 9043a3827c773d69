use crate::err::{Layer, ParseError, SerializeError};
use crate::io::{InputStream, OutputStream};
use crate::layer::{ChildInfo, SerializeCtx};
use crate::{HwAddress, MacAddr, Pdu};

use super::{write_frame_control, Dot11Flags, DOT11_TYPE_CONTROL};

/// Control frame subtype values.
pub mod control_subtype {
    pub const BLOCK_ACK_REQ: u8 = 8;
    pub const BLOCK_ACK: u8 = 9;
    pub const PS_POLL: u8 = 10;
    pub const RTS: u8 = 11;
    pub const CTS: u8 = 12;
    pub const ACK: u8 = 13;
    pub const CF_END: u8 = 14;
    pub const CF_END_ACK: u8 = 15;
}

/// Body of an 802.11 control frame, one variant per subtype.
///
/// The minimum frame sizes follow the standard: CTS & ACK carry frame
/// control, duration and the receiver address (10 bytes); RTS, PS-Poll
/// & CF-End carry a second address (16 bytes).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ControlFrame {
    Rts {
        duration: u16,
        receiver: MacAddr,
        transmitter: MacAddr,
    },
    Cts {
        duration: u16,
        receiver: MacAddr,
    },
    Ack {
        duration: u16,
        receiver: MacAddr,
    },
    PsPoll {
        /// Association id (in place of the duration field).
        aid: u16,
        bssid: MacAddr,
        transmitter: MacAddr,
    },
    CfEnd {
        duration: u16,
        receiver: MacAddr,
        bssid: MacAddr,
    },
    CfEndAck {
        duration: u16,
        receiver: MacAddr,
        bssid: MacAddr,
    },
    BlockAckReq {
        duration: u16,
        receiver: MacAddr,
        transmitter: MacAddr,
        bar_control: u16,
        start_sequence: u16,
    },
    BlockAck {
        duration: u16,
        receiver: MacAddr,
        transmitter: MacAddr,
        ba_control: u16,
        start_sequence: u16,
        /// Compressed block ack bitmap.
        bitmap: [u8; 8],
    },
}

impl ControlFrame {
    fn subtype(&self) -> u8 {
        use control_subtype::*;
        match self {
            ControlFrame::Rts { .. } => RTS,
            ControlFrame::Cts { .. } => CTS,
            ControlFrame::Ack { .. } => ACK,
            ControlFrame::PsPoll { .. } => PS_POLL,
            ControlFrame::CfEnd { .. } => CF_END,
            ControlFrame::CfEndAck { .. } => CF_END_ACK,
            ControlFrame::BlockAckReq { .. } => BLOCK_ACK_REQ,
            ControlFrame::BlockAck { .. } => BLOCK_ACK,
        }
    }
}

/// 802.11 control frame.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Dot11Control {
    pub flags: Dot11Flags,
    pub frame: ControlFrame,
}

impl Dot11Control {
    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        use control_subtype::*;
        let mut stream = InputStream::new(data, Layer::Dot11Header);
        let first = stream.read_u8()?;
        let subtype = first >> 4;
        let flags = Dot11Flags::from_wire(stream.read_u8()?);
        let duration = stream.read_u16_le()?;
        let frame = match subtype {
            RTS => ControlFrame::Rts {
                duration,
                receiver: HwAddress(stream.read_array()?),
                transmitter: HwAddress(stream.read_array()?),
            },
            CTS => ControlFrame::Cts {
                duration,
                receiver: HwAddress(stream.read_array()?),
            },
            ACK => ControlFrame::Ack {
                duration,
                receiver: HwAddress(stream.read_array()?),
            },
            PS_POLL => ControlFrame::PsPoll {
                aid: duration,
                bssid: HwAddress(stream.read_array()?),
                transmitter: HwAddress(stream.read_array()?),
            },
            CF_END => ControlFrame::CfEnd {
                duration,
                receiver: HwAddress(stream.read_array()?),
                bssid: HwAddress(stream.read_array()?),
            },
            CF_END_ACK => ControlFrame::CfEndAck {
                duration,
                receiver: HwAddress(stream.read_array()?),
                bssid: HwAddress(stream.read_array()?),
            },
            BLOCK_ACK_REQ => ControlFrame::BlockAckReq {
                duration,
                receiver: HwAddress(stream.read_array()?),
                transmitter: HwAddress(stream.read_array()?),
                bar_control: stream.read_u16_le()?,
                start_sequence: stream.read_u16_le()?,
            },
            BLOCK_ACK => ControlFrame::BlockAck {
                duration,
                receiver: HwAddress(stream.read_array()?),
                transmitter: HwAddress(stream.read_array()?),
                ba_control: stream.read_u16_le()?,
                start_sequence: stream.read_u16_le()?,
                bitmap: stream.read_array()?,
            },
            _ => return Ok(crate::RawData::parse(data)),
        };
        Ok(Pdu::new(Dot11Control { flags, frame }))
    }

    pub fn header_len(&self) -> usize {
        match self.frame {
            ControlFrame::Cts { .. } | ControlFrame::Ack { .. } => 10,
            ControlFrame::Rts { .. }
            | ControlFrame::PsPoll { .. }
            | ControlFrame::CfEnd { .. }
            | ControlFrame::CfEndAck { .. } => 16,
            ControlFrame::BlockAckReq { .. } => 20,
            ControlFrame::BlockAck { .. } => 28,
        }
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        _child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let mut stream = OutputStream::new(buf, Layer::Dot11Header);
        write_frame_control(&mut stream, DOT11_TYPE_CONTROL, self.frame.subtype(), self.flags)?;
        match &self.frame {
            ControlFrame::Rts {
                duration,
                receiver,
                transmitter,
            } => {
                stream.write_u16_le(*duration)?;
                stream.write_bytes(&receiver.octets())?;
                stream.write_bytes(&transmitter.octets())
            }
            ControlFrame::Cts { duration, receiver } | ControlFrame::Ack { duration, receiver } => {
                stream.write_u16_le(*duration)?;
                stream.write_bytes(&receiver.octets())
            }
            ControlFrame::PsPoll {
                aid,
                bssid,
                transmitter,
            } => {
                stream.write_u16_le(*aid)?;
                stream.write_bytes(&bssid.octets())?;
                stream.write_bytes(&transmitter.octets())
            }
            ControlFrame::CfEnd {
                duration,
                receiver,
                bssid,
            }
            | ControlFrame::CfEndAck {
                duration,
                receiver,
                bssid,
            } => {
                stream.write_u16_le(*duration)?;
                stream.write_bytes(&receiver.octets())?;
                stream.write_bytes(&bssid.octets())
            }
            ControlFrame::BlockAckReq {
                duration,
                receiver,
                transmitter,
                bar_control,
                start_sequence,
            } => {
                stream.write_u16_le(*duration)?;
                stream.write_bytes(&receiver.octets())?;
                stream.write_bytes(&transmitter.octets())?;
                stream.write_u16_le(*bar_control)?;
                stream.write_u16_le(*start_sequence)
            }
            ControlFrame::BlockAck {
                duration,
                receiver,
                transmitter,
                ba_control,
                start_sequence,
                bitmap,
            } => {
                stream.write_u16_le(*duration)?;
                stream.write_bytes(&receiver.octets())?;
                stream.write_bytes(&transmitter.octets())?;
                stream.write_u16_le(*ba_control)?;
                stream.write_u16_le(*start_sequence)?;
                stream.write_bytes(bitmap)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::LayerType;

    #[test]
    fn ack_round_trip() {
        let ack = Dot11Control {
            flags: Dot11Flags::default(),
            frame: ControlFrame::Ack {
                duration: 0,
                receiver: "7a:1f:f4:39:ab:0d".parse().unwrap(),
            },
        };
        let bytes = Pdu::from(ack).serialize().unwrap();
        // an ACK is 10 bytes: frame control, duration & receiver
        assert_eq!(10, bytes.len());
        assert_eq!(0xd4, bytes[0]);
        let pdu = super::super::parse(&bytes).unwrap();
        assert_eq!(LayerType::Dot11Control, pdu.layer_type());
        assert_eq!(bytes, pdu.serialize().unwrap());
    }

    #[test]
    fn ack_requires_duration_field() {
        // 8 bytes miss the duration & parts of the receiver
        let short = [0xd4, 0x00, 0x00, 0x00, 0x01, 0x02, 0x03, 0x04];
        assert!(Dot11Control::parse(&short).is_err());
    }

    #[test]
    fn rts_round_trip() {
        let rts = Dot11Control {
            flags: Dot11Flags::default(),
            frame: ControlFrame::Rts {
                duration: 44,
                receiver: "00:1c:0e:87:85:01".parse().unwrap(),
                transmitter: "7a:1f:f4:39:ab:0d".parse().unwrap(),
            },
        };
        let bytes = Pdu::from(rts).serialize().unwrap();
        assert_eq!(16, bytes.len());
        assert_eq!(0xb4, bytes[0]);
        let pdu = super::super::parse(&bytes).unwrap();
        assert_eq!(bytes, pdu.serialize().unwrap());
    }

    #[test]
    fn block_ack_round_trip() {
        let ba = Dot11Control {
            flags: Dot11Flags::default(),
            frame: ControlFrame::BlockAck {
                duration: 0,
                receiver: "00:1c:0e:87:85:01".parse().unwrap(),
                transmitter: "7a:1f:f4:39:ab:0d".parse().unwrap(),
                ba_control: 5,
                start_sequence: 0x0120,
                bitmap: [0xff; 8],
            },
        };
        let bytes = Pdu::from(ba.clone()).serialize().unwrap();
        assert_eq!(28, bytes.len());
        let pdu = super::super::parse(&bytes).unwrap();
        assert_eq!(crate::AnyLayer::Dot11Control(ba), pdu.layer);
    }
}
