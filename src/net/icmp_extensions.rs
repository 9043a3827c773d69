use crate::checksum::Sum16BitWords;
use crate::err::{ContentError, InvalidArgError, Layer, ParseError, SerializeError};
use crate::io::{InputStream, OutputStream};

/// One object of an ICMP multipart extension block (RFC 4884).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IcmpExtObject {
    pub class_num: u8,
    pub class_type: u8,
    payload: Vec<u8>,
}

impl IcmpExtObject {
    /// Size of the object header in bytes.
    pub const HEADER_LEN: usize = 4;

    pub fn new(class_num: u8, class_type: u8, payload: Vec<u8>) -> Result<IcmpExtObject, InvalidArgError> {
        if payload.len() + IcmpExtObject::HEADER_LEN > usize::from(u16::MAX) {
            return Err(InvalidArgError::IcmpExtPayloadLen { len: payload.len() });
        }
        Ok(IcmpExtObject {
            class_num,
            class_type,
            payload,
        })
    }

    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Serialized size of the object (header & payload) in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        IcmpExtObject::HEADER_LEN + self.payload.len()
    }
}

/// ICMP multipart extension block (RFC 4884): a 4 byte header followed
/// by a list of objects. Appended after the payload of the ICMP types
/// that support it.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct IcmpExtensions {
    /// Checksum as found on the wire (recomputed when serializing).
    pub checksum: u16,
    pub objects: Vec<IcmpExtObject>,
}

impl IcmpExtensions {
    /// Version announced in the extension header.
    pub const VERSION: u8 = 2;

    /// Size of the extension header in bytes.
    pub const HEADER_LEN: usize = 4;

    pub fn parse(data: &[u8]) -> Result<IcmpExtensions, ParseError> {
        let mut stream = InputStream::new(data, Layer::IcmpExtensions);
        let version_reserved = stream.read_u16_be()?;
        let version = (version_reserved >> 12) as u8;
        if version != IcmpExtensions::VERSION {
            return Err(ContentError::IcmpExtBadVersion { version }.into());
        }
        let checksum = stream.read_u16_be()?;
        let mut objects = Vec::new();
        while stream.remaining() > 0 {
            let length = stream.read_u16_be()?;
            if usize::from(length) < IcmpExtObject::HEADER_LEN {
                return Err(ContentError::IcmpExtObjectLenTooSmall { length }.into());
            }
            objects.push(IcmpExtObject {
                class_num: stream.read_u8()?,
                class_type: stream.read_u8()?,
                payload: stream
                    .read_bytes(usize::from(length) - IcmpExtObject::HEADER_LEN)?
                    .to_vec(),
            });
        }
        Ok(IcmpExtensions { checksum, objects })
    }

    /// Serialized size of the block in bytes.
    pub fn len(&self) -> usize {
        IcmpExtensions::HEADER_LEN + self.objects.iter().map(|o| o.len()).sum::<usize>()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Writes the block (recomputing its checksum) into a buffer of
    /// exactly [`IcmpExtensions::len`] bytes.
    pub(crate) fn write_to(&self, buf: &mut [u8]) -> Result<(), SerializeError> {
        {
            let mut stream = OutputStream::new(buf, Layer::IcmpExtensions);
            stream.write_u16_be(u16::from(IcmpExtensions::VERSION) << 12)?;
            stream.write_u16_be(0)?;
            for object in &self.objects {
                stream.write_u16_be(object.len() as u16)?;
                stream.write_u8(object.class_num)?;
                stream.write_u8(object.class_type)?;
                stream.write_bytes(&object.payload)?;
            }
        }
        let checksum = Sum16BitWords::new()
            .add_slice(buf)
            .to_ones_complement_with_no_zero();
        buf[2..4].copy_from_slice(&checksum.to_be_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_and_write() {
        let data = [
            0x20, 0x00, // version 2
            0x00, 0x00, // checksum (zero in this sample)
            0x00, 0x08, // object length 8
            0x01, 0x01, // MPLS label stack class
            0x12, 0x34, 0x56, 0x78,
        ];
        let exts = IcmpExtensions::parse(&data).unwrap();
        assert_eq!(1, exts.objects.len());
        assert_eq!(1, exts.objects[0].class_num);
        assert_eq!(&[0x12, 0x34, 0x56, 0x78], exts.objects[0].payload());
        assert_eq!(12, exts.len());

        let mut buf = vec![0u8; exts.len()];
        exts.write_to(&mut buf).unwrap();
        // everything but the now computed checksum is identical
        assert_eq!(&data[..2], &buf[..2]);
        assert_eq!(&data[4..], &buf[4..]);
        // and the block verifies
        assert_eq!(
            0,
            Sum16BitWords::new().add_slice(&buf).ones_complement()
        );
    }

    #[test]
    fn rejects_bad_version() {
        let data = [0x10, 0x00, 0x00, 0x00];
        assert!(IcmpExtensions::parse(&data).is_err());
    }

    #[test]
    fn rejects_short_object() {
        let data = [0x20, 0x00, 0x00, 0x00, 0x00, 0x02, 0x01, 0x01];
        assert!(IcmpExtensions::parse(&data).is_err());
    }
}
