use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::err::{Layer, SerializeError};

/// Bounds checked writer over a mutable byte slice.
///
/// Writes past the end of the slice fail with
/// [`SerializeError::SpaceExhausted`].
pub struct OutputStream<'a> {
    data: &'a mut [u8],
    pos: usize,
    layer: Layer,
}

impl<'a> OutputStream<'a> {
    /// Setup a stream that writes the given layer into `data`.
    pub fn new(data: &'a mut [u8], layer: Layer) -> OutputStream<'a> {
        OutputStream {
            data,
            pos: 0,
            layer,
        }
    }

    /// Mark subsequent writes as belonging to a different layer.
    pub fn start_layer(&mut self, layer: Layer) {
        self.layer = layer;
    }

    /// Number of bytes that can still be written.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Absolute write position from the start of the slice.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    fn reserve(&mut self, len: usize) -> Result<&mut [u8], SerializeError> {
        if self.data.len() - self.pos >= len {
            let slice = &mut self.data[self.pos..self.pos + len];
            self.pos += len;
            Ok(slice)
        } else {
            Err(SerializeError::SpaceExhausted {
                required_len: self.pos + len,
                len: self.data.len(),
                layer: self.layer,
            })
        }
    }

    /// Write all given bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), SerializeError> {
        self.reserve(bytes.len())?.copy_from_slice(bytes);
        Ok(())
    }

    /// Write `len` copies of the given byte.
    pub fn fill(&mut self, len: usize, value: u8) -> Result<(), SerializeError> {
        for b in self.reserve(len)? {
            *b = value;
        }
        Ok(())
    }

    /// Advance the write position without touching the bytes.
    pub fn skip(&mut self, len: usize) -> Result<(), SerializeError> {
        self.reserve(len).map(|_| ())
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), SerializeError> {
        self.reserve(1)?[0] = value;
        Ok(())
    }

    pub fn write_u16_be(&mut self, value: u16) -> Result<(), SerializeError> {
        BigEndian::write_u16(self.reserve(2)?, value);
        Ok(())
    }

    pub fn write_u16_le(&mut self, value: u16) -> Result<(), SerializeError> {
        LittleEndian::write_u16(self.reserve(2)?, value);
        Ok(())
    }

    pub fn write_u24_be(&mut self, value: u32) -> Result<(), SerializeError> {
        BigEndian::write_u24(self.reserve(3)?, value);
        Ok(())
    }

    pub fn write_u32_be(&mut self, value: u32) -> Result<(), SerializeError> {
        BigEndian::write_u32(self.reserve(4)?, value);
        Ok(())
    }

    pub fn write_u32_le(&mut self, value: u32) -> Result<(), SerializeError> {
        LittleEndian::write_u32(self.reserve(4)?, value);
        Ok(())
    }

    pub fn write_u64_be(&mut self, value: u64) -> Result<(), SerializeError> {
        BigEndian::write_u64(self.reserve(8)?, value);
        Ok(())
    }

    pub fn write_u64_le(&mut self, value: u64) -> Result<(), SerializeError> {
        LittleEndian::write_u64(self.reserve(8)?, value);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn writes() {
        let mut buf = [0u8; 8];
        let mut stream = OutputStream::new(&mut buf, Layer::UdpHeader);
        stream.write_u16_be(0x1234).unwrap();
        stream.write_u16_le(0x5678).unwrap();
        stream.write_bytes(&[0xaa, 0xbb]).unwrap();
        stream.fill(2, 0xff).unwrap();
        assert_eq!(0, stream.remaining());
        assert_eq!([0x12, 0x34, 0x78, 0x56, 0xaa, 0xbb, 0xff, 0xff], buf);
    }

    #[test]
    fn exhausted() {
        let mut buf = [0u8; 2];
        let mut stream = OutputStream::new(&mut buf, Layer::UdpHeader);
        stream.write_u16_be(1).unwrap();
        assert_eq!(
            Err(SerializeError::SpaceExhausted {
                required_len: 4,
                len: 2,
                layer: Layer::UdpHeader,
            }),
            stream.write_u16_be(2)
        );
    }
}
