use crate::err::{Layer, ParseError, SerializeError};
use crate::io::{InputStream, OutputStream};
use crate::layer::{ChildInfo, SerializeCtx};
use crate::{dispatch, LinkType, Pdu};

/// Apple PKTAP header (pcap `DLT_PKTAP`).
///
/// All fields are little endian. The header is length prefixed; bytes
/// between the known fields and the announced length are preserved
/// verbatim. The payload is dispatched on the embedded DLT.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PktapHeader {
    pub next: u32,
    /// DLT of the encapsulated frame.
    pub dlt: u32,
    /// Name of the interface the packet was captured on (zero padded).
    pub interface_name: [u8; 24],
    pub flags: u32,
    pub protocol_family: u32,
    pub llhdr_length: u32,
    pub lltrailer_length: u32,
    pub pid: u32,
    /// Name of the process (zero padded).
    pub command: [u8; 20],
    pub service_class: u32,
    pub interface_type: u16,
    pub interface_unit: u16,
    pub epid: u32,
    /// Name of the effective process (zero padded).
    pub ecommand: [u8; 20],
    /// Bytes between the known fields and the announced header length.
    pub extra: Vec<u8>,
}

impl Default for PktapHeader {
    fn default() -> PktapHeader {
        PktapHeader {
            next: 0,
            dlt: 0,
            interface_name: [0; 24],
            flags: 0,
            protocol_family: 0,
            llhdr_length: 0,
            lltrailer_length: 0,
            pid: 0,
            command: [0; 20],
            service_class: 0,
            interface_type: 0,
            interface_unit: 0,
            epid: 0,
            ecommand: [0; 20],
            extra: Vec::new(),
        }
    }
}

impl PktapHeader {
    /// Serialized size of the known fields (incl. the length prefix).
    pub const MIN_LEN: usize = 108;

    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::PktapHeader);
        let length = stream.read_u32_le()? as usize;
        if length < PktapHeader::MIN_LEN {
            return Err(crate::err::LenError {
                required_len: PktapHeader::MIN_LEN,
                len: length,
                layer: Layer::PktapHeader,
                layer_start_offset: 0,
            }
            .into());
        }
        let header = PktapHeader {
            next: stream.read_u32_le()?,
            dlt: stream.read_u32_le()?,
            interface_name: stream.read_array()?,
            flags: stream.read_u32_le()?,
            protocol_family: stream.read_u32_le()?,
            llhdr_length: stream.read_u32_le()?,
            lltrailer_length: stream.read_u32_le()?,
            pid: stream.read_u32_le()?,
            command: stream.read_array()?,
            service_class: stream.read_u32_le()?,
            interface_type: stream.read_u16_le()?,
            interface_unit: stream.read_u16_le()?,
            epid: stream.read_u32_le()?,
            ecommand: stream.read_array()?,
            extra: stream.read_bytes(length - PktapHeader::MIN_LEN)?.to_vec(),
        };
        let rest = stream.rest();
        let dlt = header.dlt;
        let mut pdu = Pdu::new(header);
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
        PktapHeader::MIN_LEN + self.extra.len()
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        _child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let header_len = self.header_len();
        let mut stream = OutputStream::new(&mut buf[..header_len], Layer::PktapHeader);
        stream.write_u32_le(header_len as u32)?;
        stream.write_u32_le(self.next)?;
        stream.write_u32_le(self.dlt)?;
        stream.write_bytes(&self.interface_name)?;
        stream.write_u32_le(self.flags)?;
        stream.write_u32_le(self.protocol_family)?;
        stream.write_u32_le(self.llhdr_length)?;
        stream.write_u32_le(self.lltrailer_length)?;
        stream.write_u32_le(self.pid)?;
        stream.write_bytes(&self.command)?;
        stream.write_u32_le(self.service_class)?;
        stream.write_u16_le(self.interface_type)?;
        stream.write_u16_le(self.interface_unit)?;
        stream.write_u32_le(self.epid)?;
        stream.write_bytes(&self.ecommand)?;
        stream.write_bytes(&self.extra)
    }
}
