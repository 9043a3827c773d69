use crate::err::{Layer, ParseError, SerializeError};
use crate::io::{InputStream, OutputStream};
use crate::layer::{ChildInfo, SerializeCtx};
use crate::{Pdu, RawData, SnapHeader, StpBpdu};

/// Control field forms of an LLC header.
///
/// U frames carry a single control byte, I & S frames carry two.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LlcControl {
    /// Unnumbered frame. `modifier` contains the modifier bits with the
    /// poll/final bit masked out (see the [`llc_modifier`] module for the
    /// assigned values).
    Unnumbered { modifier: u8, poll_final: bool },
    /// Information frame.
    Information {
        send_seq: u8,
        recv_seq: u8,
        poll_final: bool,
    },
    /// Supervisory frame (`function` is RR=0, REJ=2, RNR=1).
    Supervisory {
        function: u8,
        recv_seq: u8,
        poll_final: bool,
    },
}

/// Modifier values of unnumbered LLC frames (poll/final bit cleared).
pub mod llc_modifier {
    pub const UI: u8 = 0x00;
    pub const DM: u8 = 0x0c;
    pub const DISC: u8 = 0x40;
    pub const UA: u8 = 0x60;
    pub const SABME: u8 = 0x6c;
    pub const FRMR: u8 = 0x84;
    pub const XID: u8 = 0xac;
    pub const TEST: u8 = 0xe0;
}

/// IEEE 802.2 LLC header.
///
/// A header with DSAP & SSAP 0xaa and an UI control decodes its payload
/// as SNAP; DSAP & SSAP 0x42 (spanning tree) decodes it as an STP BPDU.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LlcHeader {
    pub dsap: u8,
    pub ssap: u8,
    pub control: LlcControl,
}

impl LlcHeader {
    /// Service access point value announcing a SNAP header.
    pub const SAP_SNAP: u8 = 0xaa;
    /// Service access point value of the spanning tree protocol.
    pub const SAP_STP: u8 = 0x42;

    pub fn new_ui(dsap: u8, ssap: u8) -> LlcHeader {
        LlcHeader {
            dsap,
            ssap,
            control: LlcControl::Unnumbered {
                modifier: llc_modifier::UI,
                poll_final: false,
            },
        }
    }

    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::LlcHeader);
        let dsap = stream.read_u8()?;
        let ssap = stream.read_u8()?;
        let first = stream.read_u8()?;
        let control = match first & 0b11 {
            0b11 => LlcControl::Unnumbered {
                modifier: first & !0x13,
                poll_final: 0 != first & 0x10,
            },
            tag => {
                let second = stream.read_u8()?;
                let poll_final = 0 != second & 1;
                let recv_seq = second >> 1;
                if tag & 1 == 0 {
                    LlcControl::Information {
                        send_seq: first >> 1,
                        recv_seq,
                        poll_final,
                    }
                } else {
                    LlcControl::Supervisory {
                        function: (first >> 2) & 0b11,
                        recv_seq,
                        poll_final,
                    }
                }
            }
        };
        let header = LlcHeader {
            dsap,
            ssap,
            control,
        };
        let rest = stream.rest();
        let mut pdu = Pdu::new(header);
        if !rest.is_empty() {
            let is_ui = matches!(
                control,
                LlcControl::Unnumbered {
                    modifier: llc_modifier::UI,
                    ..
                }
            );
            let child = if dsap == LlcHeader::SAP_SNAP && ssap == LlcHeader::SAP_SNAP && is_ui {
                SnapHeader::parse(rest).unwrap_or_else(|_| RawData::parse(rest))
            } else if dsap == LlcHeader::SAP_STP && ssap == LlcHeader::SAP_STP {
                StpBpdu::parse(rest).unwrap_or_else(|_| RawData::parse(rest))
            } else {
                RawData::parse(rest)
            };
            pdu.set_child(child);
        }
        Ok(pdu)
    }

    #[inline]
    pub fn header_len(&self) -> usize {
        match self.control {
            LlcControl::Unnumbered { .. } => 3,
            _ => 4,
        }
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        _child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let header_len = self.header_len();
        let mut stream = OutputStream::new(&mut buf[..header_len], Layer::LlcHeader);
        stream.write_u8(self.dsap)?;
        stream.write_u8(self.ssap)?;
        match self.control {
            LlcControl::Unnumbered {
                modifier,
                poll_final,
            } => stream.write_u8(modifier | 0b11 | if poll_final { 0x10 } else { 0 }),
            LlcControl::Information {
                send_seq,
                recv_seq,
                poll_final,
            } => {
                stream.write_u8(send_seq << 1)?;
                stream.write_u8((recv_seq << 1) | u8::from(poll_final))
            }
            LlcControl::Supervisory {
                function,
                recv_seq,
                poll_final,
            } => {
                stream.write_u8(0b01 | ((function & 0b11) << 2))?;
                stream.write_u8((recv_seq << 1) | u8::from(poll_final))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::LayerType;

    #[test]
    fn parse_ui_snap() {
        let data = [
            0xaa, 0xaa, 0x03, // LLC UI announcing SNAP
            0x00, 0x00, 0x00, // OUI
            0x12, 0x34, // unknown protocol
            0xde, // payload
        ];
        let pdu = LlcHeader::parse(&data).unwrap();
        assert_eq!(LayerType::Snap, pdu.child().unwrap().layer_type());
        assert_eq!(&data[..], &pdu.serialize().unwrap()[..]);
    }

    #[test]
    fn parse_supervisory() {
        let data = [0x00, 0x01, 0x05, 0x03];
        let pdu = LlcHeader::parse(&data).unwrap();
        let llc = match &pdu.layer {
            crate::AnyLayer::Llc(header) => header,
            _ => panic!(),
        };
        assert_eq!(
            LlcControl::Supervisory {
                function: 1, // RNR
                recv_seq: 1,
                poll_final: true,
            },
            llc.control
        );
        assert_eq!(4, llc.header_len());
        assert_eq!(&data[..], &pdu.serialize().unwrap()[..]);
    }

    #[test]
    fn parse_information() {
        let data = [0x00, 0x01, 0x0a, 0x02, 0xff];
        let pdu = LlcHeader::parse(&data).unwrap();
        let llc = match &pdu.layer {
            crate::AnyLayer::Llc(header) => header,
            _ => panic!(),
        };
        assert_eq!(
            LlcControl::Information {
                send_seq: 5,
                recv_seq: 1,
                poll_final: false,
            },
            llc.control
        );
        assert_eq!(&data[..], &pdu.serialize().unwrap()[..]);
    }
}
