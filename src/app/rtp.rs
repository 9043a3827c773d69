use crate::err::{
    ContentError, Layer, LogicError, ParseError, SerializeError, ValueTooBigError, ValueType,
};
use crate::io::{InputStream, OutputStream};
use crate::layer::{ChildInfo, SerializeCtx};
use crate::{Pdu, RawData};

/// Header extension of an [`RtpHeader`] (profile dependent, data in
/// 32 bit words).
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct RtpExtension {
    pub profile: u16,
    pub data: Vec<u32>,
}

/// RTP header: the fixed 12 bytes, CSRC list, optional header
/// extension, and the padding trailer after the payload.
///
/// The CSRC count, extension length & padding bit are derived from the
/// stored data on serialization.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct RtpHeader {
    /// Protocol version (2 bits, 2 on the wire today).
    pub version: u8,
    pub marker: bool,
    payload_type: u8,
    pub sequence_number: u16,
    pub timestamp: u32,
    /// Synchronization source id.
    pub ssrc: u32,
    csrc_ids: Vec<u32>,
    pub extension: Option<RtpExtension>,
    /// Number of padding bytes appended after the payload (the last of
    /// them carries this count on the wire). 0 = no padding.
    pub padding_size: u8,
}

impl RtpHeader {
    /// Size of the fixed header in bytes.
    pub const MIN_LEN: usize = 12;

    /// Maximum number of CSRC ids (4 bit count field).
    pub const MAX_CSRC_COUNT: usize = 15;

    /// Maximum value of the payload type (7 bits).
    pub const MAX_PAYLOAD_TYPE: u8 = 0x7f;

    pub fn new(payload_type: u8, ssrc: u32) -> RtpHeader {
        RtpHeader {
            version: 2,
            marker: false,
            payload_type: payload_type & RtpHeader::MAX_PAYLOAD_TYPE,
            sequence_number: 0,
            timestamp: 0,
            ssrc,
            csrc_ids: Vec::new(),
            extension: None,
            padding_size: 0,
        }
    }

    pub fn parse(data: &[u8]) -> Result<Pdu, ParseError> {
        let mut stream = InputStream::new(data, Layer::RtpHeader);
        let first = stream.read_u8()?;
        let second = stream.read_u8()?;
        let padding_bit = 0 != first & 0x20;
        let extension_bit = 0 != first & 0x10;
        let csrc_count = usize::from(first & 0x0f);
        let mut header = RtpHeader {
            version: first >> 6,
            marker: 0 != second & 0x80,
            payload_type: second & 0x7f,
            sequence_number: stream.read_u16_be()?,
            timestamp: stream.read_u32_be()?,
            ssrc: stream.read_u32_be()?,
            csrc_ids: Vec::with_capacity(csrc_count),
            extension: None,
            padding_size: 0,
        };
        for _ in 0..csrc_count {
            header.csrc_ids.push(stream.read_u32_be()?);
        }
        if extension_bit {
            let profile = stream.read_u16_be()?;
            let length = usize::from(stream.read_u16_be()?);
            let mut data = Vec::with_capacity(length);
            for _ in 0..length {
                data.push(stream.read_u32_be()?);
            }
            header.extension = Some(RtpExtension { profile, data });
        }

        let rest = stream.rest();
        if padding_bit {
            let padding_size = *rest.last().ok_or(ContentError::RtpZeroPaddingSize)?;
            if padding_size == 0 {
                return Err(ContentError::RtpZeroPaddingSize.into());
            }
            if usize::from(padding_size) > rest.len() {
                return Err(ContentError::RtpPaddingSizeTooBig {
                    padding_size,
                    available: rest.len(),
                }
                .into());
            }
            header.padding_size = padding_size;
        }

        let payload = &rest[..rest.len() - usize::from(header.padding_size)];
        let mut pdu = Pdu::new(header);
        if !payload.is_empty() {
            pdu.set_child(RawData::parse(payload));
        }
        Ok(pdu)
    }

    /// Payload type (7 bits).
    #[inline]
    pub fn payload_type(&self) -> u8 {
        self.payload_type
    }

    pub fn set_payload_type(&mut self, payload_type: u8) -> Result<(), ValueTooBigError<u8>> {
        if payload_type > RtpHeader::MAX_PAYLOAD_TYPE {
            return Err(ValueTooBigError {
                actual: payload_type,
                max_allowed: RtpHeader::MAX_PAYLOAD_TYPE,
                value_type: ValueType::RtpPayloadType,
            });
        }
        self.payload_type = payload_type;
        Ok(())
    }

    /// The contributing source ids.
    #[inline]
    pub fn csrc_ids(&self) -> &[u32] {
        &self.csrc_ids
    }

    /// Appends a CSRC id (at most 15 fit the 4 bit count field).
    pub fn add_csrc_id(&mut self, csrc_id: u32) -> Result<(), LogicError> {
        if self.csrc_ids.len() >= RtpHeader::MAX_CSRC_COUNT {
            return Err(LogicError::RtpCsrcLimitReached);
        }
        self.csrc_ids.push(csrc_id);
        Ok(())
    }

    /// Removes the first occurrence of the given CSRC id. Returns true
    /// if one was removed.
    pub fn remove_csrc_id(&mut self, csrc_id: u32) -> bool {
        match self.csrc_ids.iter().position(|&id| id == csrc_id) {
            Some(index) => {
                self.csrc_ids.remove(index);
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn header_len(&self) -> usize {
        RtpHeader::MIN_LEN
            + self.csrc_ids.len() * 4
            + self.extension.as_ref().map(|e| 4 + e.data.len() * 4).unwrap_or(0)
    }

    #[inline]
    pub fn trailer_len(&self) -> usize {
        usize::from(self.padding_size)
    }

    pub(crate) fn write_layer(
        &self,
        buf: &mut [u8],
        _child: Option<ChildInfo>,
        _ctx: &SerializeCtx,
    ) -> Result<(), SerializeError> {
        let header_len = self.header_len();
        {
            let mut stream = OutputStream::new(&mut buf[..header_len], Layer::RtpHeader);
            stream.write_u8(
                (self.version << 6)
                    | if self.padding_size > 0 { 0x20 } else { 0 }
                    | if self.extension.is_some() { 0x10 } else { 0 }
                    | self.csrc_ids.len() as u8,
            )?;
            stream.write_u8(if self.marker { 0x80 } else { 0 } | self.payload_type)?;
            stream.write_u16_be(self.sequence_number)?;
            stream.write_u32_be(self.timestamp)?;
            stream.write_u32_be(self.ssrc)?;
            for csrc_id in &self.csrc_ids {
                stream.write_u32_be(*csrc_id)?;
            }
            if let Some(extension) = &self.extension {
                stream.write_u16_be(extension.profile)?;
                stream.write_u16_be(extension.data.len() as u16)?;
                for word in &extension.data {
                    stream.write_u32_be(*word)?;
                }
            }
        }
        if self.padding_size > 0 {
            let trailer_start = buf.len() - usize::from(self.padding_size);
            let mut trailer = OutputStream::new(&mut buf[trailer_start..], Layer::RtpHeader);
            trailer.fill(usize::from(self.padding_size) - 1, 0)?;
            trailer.write_u8(self.padding_size)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_matches::assert_matches;

    /// 60 byte packet: 12 byte header, 5 CSRC ids, extension of 2
    /// words, 12 byte payload & 4 bytes of padding.
    fn sample() -> Vec<u8> {
        let mut data = vec![
            0xb5, 0xe0, // version 2, padding, extension, 5 CSRCs; marker, pt 96
            0x12, 0x34, // sequence
            0x00, 0x00, 0x10, 0x00, // timestamp
            0xde, 0xad, 0xbe, 0xef, // ssrc
        ];
        for i in 1u32..=5 {
            data.extend_from_slice(&i.to_be_bytes());
        }
        data.extend_from_slice(&[0x10, 0x01, 0x00, 0x02]); // profile, length 2
        data.extend_from_slice(&[0u8; 8]); // extension data
        data.extend_from_slice(b"payload-12by"); // payload (12 bytes)
        data.extend_from_slice(&[0, 0, 0, 4]); // padding
        data
    }

    #[test]
    fn parse_sizes() {
        let data = sample();
        assert_eq!(60, data.len());
        let pdu = RtpHeader::parse(&data).unwrap();
        let rtp = match &pdu.layer {
            crate::AnyLayer::Rtp(rtp) => rtp,
            _ => panic!(),
        };
        assert_eq!(2, rtp.version);
        assert!(rtp.marker);
        assert_eq!(96, rtp.payload_type());
        assert_eq!(5, rtp.csrc_ids().len());
        assert_eq!(2, rtp.extension.as_ref().unwrap().data.len());
        assert_eq!(4, rtp.padding_size);
        assert_eq!(44, pdu.header_len());
        assert_eq!(4, pdu.trailer_len());
        assert_eq!(12, pdu.child().unwrap().len());
        assert_eq!(60, pdu.len());
    }

    #[test]
    fn round_trip() {
        let data = sample();
        let pdu = RtpHeader::parse(&data).unwrap();
        assert_eq!(data, pdu.serialize().unwrap());
    }

    #[test]
    fn rejects_zero_padding_size() {
        let mut data = sample();
        let last = data.len() - 1;
        data[last] = 0;
        assert_matches!(
            RtpHeader::parse(&data).unwrap_err().content_error(),
            Some(ContentError::RtpZeroPaddingSize)
        );
    }

    #[test]
    fn rejects_padding_bigger_than_rest() {
        let mut data = sample();
        let last = data.len() - 1;
        data[last] = 200;
        assert_matches!(
            RtpHeader::parse(&data).unwrap_err().content_error(),
            Some(ContentError::RtpPaddingSizeTooBig { padding_size: 200, .. })
        );
    }

    #[test]
    fn csrc_limit() {
        let mut rtp = RtpHeader::new(0, 1);
        for i in 0..15 {
            rtp.add_csrc_id(i).unwrap();
        }
        assert_eq!(Err(LogicError::RtpCsrcLimitReached), rtp.add_csrc_id(16));
        assert!(rtp.remove_csrc_id(3));
        assert!(!rtp.remove_csrc_id(99));
        assert!(rtp.add_csrc_id(16).is_ok());
    }

    #[test]
    fn payload_type_range() {
        let mut rtp = RtpHeader::new(0, 1);
        assert!(rtp.set_payload_type(127).is_ok());
        assert!(rtp.set_payload_type(128).is_err());
    }
}
