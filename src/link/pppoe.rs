use crate::err::{Layer, ParseError, SerializeError};
use crate::io::{InputStream, OutputStream};
use crate::layer::{ChildInfo, SerializeCtx};
use crate::{Pdu, RawData};

/// PPPoE header (session & discovery stage).
///
/// The `length` field is derived from the payload on serialization.
/// The encapsulated PPP payload is kept opaque.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PppoeHeader {
    /// Version (4 bits, 1 on the wire today).
    pub version: u8,
    /// Type (4 bits, 1 on the wire today).
    pub pppoe_type: u8,
    /// Code (0 for session data, discovery stage values otherwise).
    pub code: u8,
    pub session_id: u16,
}

impl PppoeHeader {
    /// Serialized size of the header in bytes.
    pub const LEN: usize = 6;

    pub fn new(session_id: u16) -> PppoeHeader {
        PppoeHeader {
            version: 1,
            pppoe_type: 1,
            code: 0,
            session_id,
        }
    }

    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::PppoeHeader);
        let ver_type = stream.read_u8()?;
        let header = PppoeHeader {
            version: ver_type >> 4,
            pppoe_type: ver_type & 0xf,
            code: stream.read_u8()?,
            session_id: stream.read_u16_be()?,
        };
        let length = stream.read_u16_be()? as usize;
        let rest = stream.rest();
        let payload = &rest[..length.min(rest.len())];
        let mut pdu = Pdu::new(header);
        if !payload.is_empty() {
            pdu.set_child(RawData::parse(payload));
        }
        Ok(pdu)
    }

    #[inline]
    pub fn header_len(&self) -> usize {
        PppoeHeader::LEN
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let payload_len = child.map(|c| c.len).unwrap_or(0);
        if payload_len > usize::from(u16::MAX) {
            return Err(SerializeError::PayloadTooLarge {
                layer: Layer::PppoeHeader,
                actual: payload_len,
                max: u16::MAX.into(),
            });
        }
        let mut stream = OutputStream::new(&mut buf[..PppoeHeader::LEN], Layer::PppoeHeader);
        stream.write_u8((self.version << 4) | (self.pppoe_type & 0xf))?;
        stream.write_u8(self.code)?;
        stream.write_u16_be(self.session_id)?;
        stream.write_u16_be(payload_len as u16)
    }
}
