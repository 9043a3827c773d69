//! The 802.11 frame family: management, control & data frames plus
//! their tagged parameters & RSN information element.

mod control;
pub use control::*;

mod data;
pub use data::*;

mod mgmt;
pub use mgmt::*;

mod rsn;
pub use rsn::*;

use crate::err::{Layer, LenError, ParseError, SerializeError};
use crate::io::{InputStream, OutputStream};
use crate::{HwAddress, MacAddr, OptionList, Pdu, TaggedOption};

/// Frame type values of the 802.11 frame control field.
pub const DOT11_TYPE_MGMT: u8 = 0;
pub const DOT11_TYPE_CONTROL: u8 = 1;
pub const DOT11_TYPE_DATA: u8 = 2;

/// Flag bits of the second frame control byte, stored unpacked.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dot11Flags {
    pub to_ds: bool,
    pub from_ds: bool,
    pub more_frag: bool,
    pub retry: bool,
    pub power_mgmt: bool,
    pub more_data: bool,
    pub protected: bool,
    pub order: bool,
}

impl Dot11Flags {
    pub(crate) fn from_wire(value: u8) -> Dot11Flags {
        Dot11Flags {
            to_ds: 0 != value & 0x01,
            from_ds: 0 != value & 0x02,
            more_frag: 0 != value & 0x04,
            retry: 0 != value & 0x08,
            power_mgmt: 0 != value & 0x10,
            more_data: 0 != value & 0x20,
            protected: 0 != value & 0x40,
            order: 0 != value & 0x80,
        }
    }

    pub(crate) fn to_wire(self) -> u8 {
        u8::from(self.to_ds)
            | (u8::from(self.from_ds) << 1)
            | (u8::from(self.more_frag) << 2)
            | (u8::from(self.retry) << 3)
            | (u8::from(self.power_mgmt) << 4)
            | (u8::from(self.more_data) << 5)
            | (u8::from(self.protected) << 6)
            | (u8::from(self.order) << 7)
    }
}

/// Writes the 2 byte frame control field.
pub(crate) fn write_frame_control(
    stream: &mut OutputStream<'_>,
    frame_type: u8,
    subtype: u8,
    flags: Dot11Flags,
) -> Result<(), SerializeError> {
    stream.write_u8((subtype << 4) | (frame_type << 2))?;
    stream.write_u8(flags.to_wire())
}

/// Common header of all management frames: frame control, duration &
/// the three addresses plus the sequence control field (24 bytes).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Dot11MgmtHeader {
    pub flags: Dot11Flags,
    pub duration: u16,
    /// Receiver address.
    pub addr1: MacAddr,
    /// Transmitter address.
    pub addr2: MacAddr,
    /// BSSID (or destination for frames through the DS).
    pub addr3: MacAddr,
    /// Fragment number (4 bits).
    pub fragment: u8,
    /// Sequence number (12 bits).
    pub sequence: u16,
}

impl Dot11MgmtHeader {
    /// Serialized size in bytes.
    pub const LEN: usize = 24;

    pub fn new(addr1: MacAddr, addr2: MacAddr, addr3: MacAddr) -> Dot11MgmtHeader {
        Dot11MgmtHeader {
            addr1,
            addr2,
            addr3,
            ..Dot11MgmtHeader::default()
        }
    }

    pub(crate) fn read(stream: &mut InputStream<'_>) -> Result<Dot11MgmtHeader, ParseError> {
        stream.skip(1)?; // frame control byte 0 (checked by the dispatcher)
        let flags = Dot11Flags::from_wire(stream.read_u8()?);
        let duration = stream.read_u16_le()?;
        let addr1 = HwAddress(stream.read_array()?);
        let addr2 = HwAddress(stream.read_array()?);
        let addr3 = HwAddress(stream.read_array()?);
        let seq_control = stream.read_u16_le()?;
        Ok(Dot11MgmtHeader {
            flags,
            duration,
            addr1,
            addr2,
            addr3,
            fragment: (seq_control & 0xf) as u8,
            sequence: seq_control >> 4,
        })
    }

    pub(crate) fn write(
        &self,
        stream: &mut OutputStream<'_>,
        subtype: u8,
    ) -> Result<(), SerializeError> {
        write_frame_control(stream, DOT11_TYPE_MGMT, subtype, self.flags)?;
        stream.write_u16_le(self.duration)?;
        stream.write_bytes(&self.addr1.octets())?;
        stream.write_bytes(&self.addr2.octets())?;
        stream.write_bytes(&self.addr3.octets())?;
        stream.write_u16_le((self.sequence << 4) | u16::from(self.fragment & 0xf))
    }
}

/// Capability information bitfield of management frames.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dot11Capabilities(pub u16);

impl Dot11Capabilities {
    pub fn ess(self) -> bool {
        0 != self.0 & 0x0001
    }
    pub fn ibss(self) -> bool {
        0 != self.0 & 0x0002
    }
    pub fn cf_pollable(self) -> bool {
        0 != self.0 & 0x0004
    }
    pub fn cf_poll_request(self) -> bool {
        0 != self.0 & 0x0008
    }
    pub fn privacy(self) -> bool {
        0 != self.0 & 0x0010
    }
    pub fn short_preamble(self) -> bool {
        0 != self.0 & 0x0020
    }
    pub fn spectrum_management(self) -> bool {
        0 != self.0 & 0x0100
    }
    pub fn qos(self) -> bool {
        0 != self.0 & 0x0200
    }
    pub fn short_slot_time(self) -> bool {
        0 != self.0 & 0x0400
    }
    pub fn apsd(self) -> bool {
        0 != self.0 & 0x0800
    }
    pub fn radio_measurement(self) -> bool {
        0 != self.0 & 0x1000
    }
    pub fn delayed_block_ack(self) -> bool {
        0 != self.0 & 0x4000
    }
    pub fn immediate_block_ack(self) -> bool {
        0 != self.0 & 0x8000
    }
}

/// Tag numbers of the tagged parameters of management frames.
pub mod dot11_param {
    pub const SSID: u8 = 0;
    pub const SUPPORTED_RATES: u8 = 1;
    pub const DS_PARAMETER_SET: u8 = 3;
    pub const TIM: u8 = 5;
    pub const COUNTRY: u8 = 7;
    pub const POWER_CONSTRAINT: u8 = 32;
    pub const CHANNEL_SWITCH: u8 = 37;
    pub const QUIET: u8 = 40;
    pub const TPC_REPORT: u8 = 35;
    pub const ERP_INFORMATION: u8 = 42;
    pub const RSN: u8 = 48;
    pub const EXTENDED_SUPPORTED_RATES: u8 = 50;
    pub const HT_CAPABILITIES: u8 = 45;
    pub const VENDOR_SPECIFIC: u8 = 221;
}

/// Decodes the tagged parameter area of a management frame.
pub(crate) fn parse_tagged_params(data: &[u8]) -> Result<OptionList<u8>, ParseError> {
    let mut stream = InputStream::new(data, Layer::Dot11TaggedParams);
    let mut params = OptionList::new();
    while stream.remaining() > 0 {
        let kind = stream.read_u8()?;
        let len = usize::from(stream.read_u8()?);
        params.push(TaggedOption::new(kind, stream.read_bytes(len)?.to_vec()));
    }
    Ok(params)
}

/// Serialized size of a tagged parameter area.
pub(crate) fn tagged_params_len(params: &OptionList<u8>) -> usize {
    params.iter().map(|p| 2 + p.data.len()).sum()
}

/// Writes a tagged parameter area.
pub(crate) fn write_tagged_params(
    stream: &mut OutputStream<'_>,
    params: &OptionList<u8>,
) -> Result<(), SerializeError> {
    for param in params {
        stream.write_u8(param.kind)?;
        stream.write_u8(param.data.len() as u8)?;
        stream.write_bytes(&param.data)?;
    }
    Ok(())
}

/// Decodes an 802.11 frame, dispatching on the type & subtype of the
/// frame control field.
pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
    let first = *data.first().ok_or(LenError {
        required_len: 2,
        len: data.len(),
        layer: Layer::Dot11Header,
        layer_start_offset: 0,
    })?;
    let frame_type = (first >> 2) & 0b11;
    let subtype = first >> 4;
    match frame_type {
        DOT11_TYPE_MGMT => mgmt::parse_mgmt(subtype, data),
        DOT11_TYPE_CONTROL => Dot11Control::parse(data),
        DOT11_TYPE_DATA => Dot11Data::parse(data),
        _ => Ok(crate::RawData::parse(data)),
    }
}
