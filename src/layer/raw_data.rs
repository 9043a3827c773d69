use crate::err::SerializeError;
use crate::io::OutputStream;
use crate::layer::{ChildInfo, Pdu, SerializeCtx};

/// Opaque payload bytes.
///
/// Used as the innermost layer of crafted packets and as the fallback
/// the parsers substitute whenever a payload can not be decoded (unknown
/// protocol value or malformed inner data).
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct RawData {
    pub payload: Vec<u8>,
}

impl RawData {
    pub fn new(payload: Vec<u8>) -> RawData {
        RawData { payload }
    }

    /// Wraps the given bytes into a single layer chain.
    pub fn parse(data: &[u8]) -> Pdu {
        Pdu::new(RawData {
            payload: data.to_vec(),
        })
    }

    #[inline]
    pub fn header_len(&self) -> usize {
        self.payload.len()
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        _child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let mut stream = OutputStream::new(buf, crate::err::Layer::RawPayload);
        stream.write_bytes(&self.payload)
    }
}

impl From<Vec<u8>> for RawData {
    fn from(payload: Vec<u8>) -> RawData {
        RawData { payload }
    }
}

impl From<&[u8]> for RawData {
    fn from(payload: &[u8]) -> RawData {
        RawData {
            payload: payload.to_vec(),
        }
    }
}
