use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::err::{Layer, LenError};

/// Bounds checked reader over an immutable byte slice.
///
/// All read methods return a [`LenError`] tagged with the layer the
/// stream currently decodes when the slice is exhausted. The reported
/// `required_len`/`len` values are relative to the start of the current
/// layer (see [`InputStream::start_layer`]).
pub struct InputStream<'a> {
    data: &'a [u8],
    pos: usize,
    layer: Layer,
    layer_start: usize,
    layer_offset: usize,
}

impl<'a> InputStream<'a> {
    /// Setup a stream that decodes the given layer from the start of `data`.
    pub fn new(data: &'a [u8], layer: Layer) -> InputStream<'a> {
        InputStream {
            data,
            pos: 0,
            layer,
            layer_start: 0,
            layer_offset: 0,
        }
    }

    /// Set the current position as the start of a new layer (used when one
    /// dissector hands the stream over to another).
    pub fn start_layer(&mut self, layer: Layer) {
        self.layer_offset += self.pos - self.layer_start;
        self.layer_start = self.pos;
        self.layer = layer;
    }

    /// Number of bytes that can still be read.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// The not yet read part of the slice.
    #[inline]
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Absolute read position from the start of the slice.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// True if at least `len` more bytes can be read.
    #[inline]
    pub fn can_read(&self, len: usize) -> bool {
        self.remaining() >= len
    }

    fn len_error(&self, len: usize) -> LenError {
        LenError {
            required_len: (self.pos - self.layer_start) + len,
            len: self.data.len() - self.layer_start,
            layer: self.layer,
            layer_start_offset: self.layer_offset,
        }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], LenError> {
        if self.can_read(len) {
            let slice = &self.data[self.pos..self.pos + len];
            self.pos += len;
            Ok(slice)
        } else {
            Err(self.len_error(len))
        }
    }

    /// Skip the given number of bytes.
    pub fn skip(&mut self, len: usize) -> Result<(), LenError> {
        self.take(len).map(|_| ())
    }

    /// Read a byte slice of the given length.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], LenError> {
        self.take(len)
    }

    /// Read a fixed size byte array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], LenError> {
        let slice = self.take(N)?;
        let mut result = [0u8; N];
        result.copy_from_slice(slice);
        Ok(result)
    }

    pub fn read_u8(&mut self) -> Result<u8, LenError> {
        self.take(1).map(|s| s[0])
    }

    pub fn read_u16_be(&mut self) -> Result<u16, LenError> {
        self.take(2).map(BigEndian::read_u16)
    }

    pub fn read_u16_le(&mut self) -> Result<u16, LenError> {
        self.take(2).map(LittleEndian::read_u16)
    }

    pub fn read_u24_be(&mut self) -> Result<u32, LenError> {
        self.take(3).map(BigEndian::read_u24)
    }

    pub fn read_u32_be(&mut self) -> Result<u32, LenError> {
        self.take(4).map(BigEndian::read_u32)
    }

    pub fn read_u32_le(&mut self) -> Result<u32, LenError> {
        self.take(4).map(LittleEndian::read_u32)
    }

    pub fn read_u64_be(&mut self) -> Result<u64, LenError> {
        self.take(8).map(BigEndian::read_u64)
    }

    pub fn read_u64_le(&mut self) -> Result<u64, LenError> {
        self.take(8).map(LittleEndian::read_u64)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reads() {
        let data = [0x12u8, 0x34, 0x56, 0x78, 0x9a, 0xbc];
        let mut stream = InputStream::new(&data, Layer::Ethernet2Header);
        assert_eq!(6, stream.remaining());
        assert!(stream.can_read(6));
        assert!(!stream.can_read(7));
        assert_eq!(0x12, stream.read_u8().unwrap());
        assert_eq!(0x3456, stream.read_u16_be().unwrap());
        assert_eq!(0x9a78, stream.read_u16_le().unwrap());
        assert_eq!(&[0xbc], stream.rest());
        assert_eq!(5, stream.position());
    }

    #[test]
    fn exhausted() {
        let data = [0x12u8, 0x34];
        let mut stream = InputStream::new(&data, Layer::UdpHeader);
        assert_eq!(
            Err(LenError {
                required_len: 4,
                len: 2,
                layer: Layer::UdpHeader,
                layer_start_offset: 0,
            }),
            stream.read_u32_be()
        );
        // a failed read must not consume anything
        assert_eq!(0x1234, stream.read_u16_be().unwrap());
    }

    #[test]
    fn layer_handover() {
        let data = [0u8; 20];
        let mut stream = InputStream::new(&data, Layer::Ethernet2Header);
        stream.skip(14).unwrap();
        stream.start_layer(Layer::ArpPacket);
        let err = stream.read_bytes(28).unwrap_err();
        assert_eq!(
            LenError {
                required_len: 28,
                len: 6,
                layer: Layer::ArpPacket,
                layer_start_offset: 14,
            },
            err
        );
    }

    #[test]
    fn arrays() {
        let data = [1u8, 2, 3, 4, 5, 6];
        let mut stream = InputStream::new(&data, Layer::Ethernet2Header);
        assert_eq!([1, 2, 3, 4], stream.read_array::<4>().unwrap());
        assert_eq!(2, stream.remaining());
    }
}
