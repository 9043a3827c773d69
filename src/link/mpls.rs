use crate::err::{Layer, ParseError, SerializeError, ValueTooBigError, ValueType};
use crate::io::{InputStream, OutputStream};
use crate::layer::{ChildInfo, SerializeCtx};
use crate::{Ipv4Header, Ipv6Header, Pdu, RawData};

/// One MPLS label stack entry.
///
/// Entries with the bottom-of-stack bit cleared decode their payload as
/// another MPLS entry. Below the bottom of the stack the payload
/// protocol is guessed from the IP version nibble (there is no explicit
/// next-protocol field in MPLS).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MplsHeader {
    /// Label value (20 bits).
    pub label: MplsLabel,
    /// Traffic class (3 bits).
    pub traffic_class: u8,
    /// Bottom of stack flag.
    pub bottom_of_stack: bool,
    pub ttl: u8,
}

/// 20 bit unsigned integer containing an MPLS label value.
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MplsLabel(u32);

impl MplsLabel {
    /// Maximum value of an MPLS label.
    pub const MAX_U32: u32 = 0x000f_ffff;

    /// Tries to create an [`MplsLabel`] and checks that the passed value
    /// is smaller or equal than [`MplsLabel::MAX_U32`] (20 bit unsigned integer).
    #[inline]
    pub const fn try_new(value: u32) -> Result<MplsLabel, ValueTooBigError<u32>> {
        if value <= MplsLabel::MAX_U32 {
            Ok(MplsLabel(value))
        } else {
            Err(ValueTooBigError {
                actual: value,
                max_allowed: MplsLabel::MAX_U32,
                value_type: ValueType::MplsLabel,
            })
        }
    }

    /// Returns the underlying unsigned 20 bit value.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl MplsHeader {
    /// Serialized size of one stack entry in bytes.
    pub const LEN: usize = 4;

    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::MplsHeader);
        let entry = stream.read_u32_be()?;
        let header = MplsHeader {
            label: MplsLabel(entry >> 12),
            traffic_class: ((entry >> 9) & 0b111) as u8,
            bottom_of_stack: 0 != entry & 0x100,
            ttl: (entry & 0xff) as u8,
        };
        let rest = stream.rest();
        let bottom = header.bottom_of_stack;
        let mut pdu = Pdu::new(header);
        if !rest.is_empty() {
            let child = if bottom {
                match rest[0] >> 4 {
                    4 => Ipv4Header::parse(rest).unwrap_or_else(|_| RawData::parse(rest)),
                    6 => Ipv6Header::parse(rest).unwrap_or_else(|_| RawData::parse(rest)),
                    _ => RawData::parse(rest),
                }
            } else {
                MplsHeader::parse(rest).unwrap_or_else(|_| RawData::parse(rest))
            };
            pdu.set_child(child);
        }
        Ok(pdu)
    }

    #[inline]
    pub fn header_len(&self) -> usize {
        MplsHeader::LEN
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        _child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let entry = (self.label.value() << 12)
            | (u32::from(self.traffic_class & 0b111) << 9)
            | if self.bottom_of_stack { 0x100 } else { 0 }
            | u32::from(self.ttl);
        OutputStream::new(&mut buf[..MplsHeader::LEN], Layer::MplsHeader).write_u32_be(entry)
    }
}
