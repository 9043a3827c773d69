use crate::err::{Layer, ParseError, SerializeError, ValueTooBigError, ValueType};
use crate::io::{InputStream, OutputStream};
use crate::layer::{ChildInfo, SerializeCtx};
use crate::{Ethernet2Header, Pdu, RawData};

/// 24 bit unsigned integer containing a VXLAN network identifier.
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VxlanVni(u32);

impl VxlanVni {
    /// Maximum value of a VXLAN network identifier.
    pub const MAX_U32: u32 = 0x00ff_ffff;

    /// Tries to create a [`VxlanVni`] and checks that the passed value
    /// is smaller or equal than [`VxlanVni::MAX_U32`] (24 bit unsigned integer).
    #[inline]
    pub const fn try_new(value: u32) -> Result<VxlanVni, ValueTooBigError<u32>> {
        if value <= VxlanVni::MAX_U32 {
            Ok(VxlanVni(value))
        } else {
            Err(ValueTooBigError {
                actual: value,
                max_allowed: VxlanVni::MAX_U32,
                value_type: ValueType::VxlanVni,
            })
        }
    }

    /// Returns the underlying unsigned 24 bit value.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }
}

/// VXLAN overlay header (RFC 7348). The payload is always an Ethernet
/// frame.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct VxlanHeader {
    /// Flag byte; bit 3 (0x08) announces a valid VNI.
    pub flags: u8,
    pub vni: VxlanVni,
}

impl VxlanHeader {
    /// Serialized size of the header in bytes.
    pub const LEN: usize = 8;

    /// Flag bit announcing a valid VNI.
    pub const FLAG_VNI_VALID: u8 = 0x08;

    pub fn new(vni: VxlanVni) -> VxlanHeader {
        VxlanHeader {
            flags: VxlanHeader::FLAG_VNI_VALID,
            vni,
        }
    }

    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::VxlanHeader);
        let flags = stream.read_u8()?;
        stream.skip(3)?; // reserved
        let vni = VxlanVni(stream.read_u24_be()?);
        stream.skip(1)?; // reserved
        let rest = stream.rest();
        let mut pdu = Pdu::new(VxlanHeader { flags, vni });
        if !rest.is_empty() {
            pdu.set_child(Ethernet2Header::parse(rest).unwrap_or_else(|_| RawData::parse(rest)));
        }
        Ok(pdu)
    }

    #[inline]
    pub fn header_len(&self) -> usize {
        VxlanHeader::LEN
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        _child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let mut stream = OutputStream::new(&mut buf[..VxlanHeader::LEN], Layer::VxlanHeader);
        stream.write_u8(self.flags)?;
        stream.fill(3, 0)?;
        stream.write_u24_be(self.vni.value())?;
        stream.write_u8(0)
    }
}
