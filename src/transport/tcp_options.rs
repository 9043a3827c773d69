use arrayvec::ArrayVec;

use crate::err::{ValueTooBigError, ValueType};

/// Kind constants of the supported TCP options.
pub mod tcp_option_kind {
    pub const END: u8 = 0;
    pub const NOOP: u8 = 1;
    pub const MAX_SEGMENT_SIZE: u8 = 2;
    pub const WINDOW_SCALE: u8 = 3;
    pub const SELECTIVE_ACK_PERMITTED: u8 = 4;
    pub const SELECTIVE_ACK: u8 = 5;
    pub const TIMESTAMP: u8 = 8;
    pub const ALT_CHECKSUM_REQUEST: u8 = 14;
    pub const ALT_CHECKSUM_DATA: u8 = 15;
}

/// A decoded TCP option.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum TcpOptionElement {
    /// "No operation" filler byte.
    Noop,
    MaximumSegmentSize(u16),
    WindowScale(u8),
    SelectiveAckPermitted,
    /// Up to 4 (left edge, right edge) pairs.
    SelectiveAck(ArrayVec<(u32, u32), 4>),
    /// Timestamp value & echo reply.
    Timestamp(u32, u32),
    /// Alternate checksum request with the checksum algorithm number.
    AlternateChecksumRequest(u8),
    /// Any other option, kept verbatim (`data` is the payload after
    /// the kind & length bytes).
    Raw { kind: u8, data: Vec<u8> },
}

/// Error while decoding a single TCP option.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum TcpOptionReadError {
    /// The option expects more data than the options area contains.
    UnexpectedEnd { kind: u8 },
    /// The length byte of the option contradicts its kind.
    UnexpectedSize { kind: u8, size: u8 },
}

impl core::fmt::Display for TcpOptionReadError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TcpOptionReadError::UnexpectedEnd { kind } => write!(
                f,
                "TCP option of kind {kind} expects more data than the options area contains."
            ),
            TcpOptionReadError::UnexpectedSize { kind, size } => write!(
                f,
                "TCP option of kind {kind} has the invalid length {size}."
            ),
        }
    }
}

impl std::error::Error for TcpOptionReadError {}

/// The options area of a [`crate::TcpHeader`] (up to 40 bytes),
/// preserved byte exact.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct TcpOptions {
    buf: ArrayVec<u8, 40>,
}

impl TcpOptions {
    /// Maximum length of the options area in bytes (limited by the
    /// 4 bit data offset field).
    pub const MAX_LEN: usize = 40;

    pub fn new() -> TcpOptions {
        TcpOptions {
            buf: ArrayVec::new(),
        }
    }

    /// Builds the options area from decoded elements, padding with
    /// end-of-options bytes to the next multiple of 4.
    pub fn from_elements(
        elements: &[TcpOptionElement],
    ) -> Result<TcpOptions, ValueTooBigError<usize>> {
        let mut bytes: Vec<u8> = Vec::new();
        for element in elements {
            use tcp_option_kind::*;
            use TcpOptionElement::*;
            match element {
                Noop => bytes.push(NOOP),
                MaximumSegmentSize(mss) => {
                    bytes.extend_from_slice(&[MAX_SEGMENT_SIZE, 4]);
                    bytes.extend_from_slice(&mss.to_be_bytes());
                }
                WindowScale(shift) => bytes.extend_from_slice(&[WINDOW_SCALE, 3, *shift]),
                SelectiveAckPermitted => bytes.extend_from_slice(&[SELECTIVE_ACK_PERMITTED, 2]),
                SelectiveAck(pairs) => {
                    bytes.extend_from_slice(&[SELECTIVE_ACK, 2 + 8 * pairs.len() as u8]);
                    for (left, right) in pairs {
                        bytes.extend_from_slice(&left.to_be_bytes());
                        bytes.extend_from_slice(&right.to_be_bytes());
                    }
                }
                Timestamp(value, echo) => {
                    bytes.extend_from_slice(&[TIMESTAMP, 10]);
                    bytes.extend_from_slice(&value.to_be_bytes());
                    bytes.extend_from_slice(&echo.to_be_bytes());
                }
                AlternateChecksumRequest(algorithm) => {
                    bytes.extend_from_slice(&[ALT_CHECKSUM_REQUEST, 3, *algorithm])
                }
                Raw { kind, data } => {
                    bytes.extend_from_slice(&[*kind, 2 + data.len() as u8]);
                    bytes.extend_from_slice(data);
                }
            }
        }
        while bytes.len() % 4 != 0 {
            bytes.push(tcp_option_kind::END);
        }
        TcpOptions::try_from_slice(&bytes)
    }

    /// Takes the raw options bytes (must be at most 40 bytes & a
    /// multiple of 4, as the data offset field counts 4 byte words).
    pub fn try_from_slice(data: &[u8]) -> Result<TcpOptions, ValueTooBigError<usize>> {
        if data.len() > TcpOptions::MAX_LEN || data.len() % 4 != 0 {
            return Err(ValueTooBigError {
                actual: data.len(),
                max_allowed: TcpOptions::MAX_LEN,
                value_type: ValueType::OptionPayloadLen,
            });
        }
        let mut buf = ArrayVec::new();
        buf.try_extend_from_slice(data).unwrap();
        Ok(TcpOptions { buf })
    }

    /// The raw encoded option bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Iterates over the decoded option elements (stops at the
    /// end-of-options option).
    pub fn elements_iter(&self) -> TcpOptionsIterator<'_> {
        TcpOptionsIterator { rest: &self.buf }
    }
}

/// Iterator over the elements of the TCP options area.
#[derive(Clone, Debug)]
pub struct TcpOptionsIterator<'a> {
    rest: &'a [u8],
}

impl<'a> Iterator for TcpOptionsIterator<'a> {
    type Item = Result<TcpOptionElement, TcpOptionReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        use tcp_option_kind::*;
        use TcpOptionElement::*;

        let kind = *self.rest.first()?;
        if kind == END {
            self.rest = &[];
            return None;
        }
        if kind == NOOP {
            self.rest = &self.rest[1..];
            return Some(Ok(Noop));
        }

        let stop = |err| {
            // decoding can not continue after an error
            Some(Err(err))
        };
        let size = match self.rest.get(1) {
            Some(size) => *size,
            None => {
                self.rest = &[];
                return stop(TcpOptionReadError::UnexpectedEnd { kind });
            }
        };
        if size < 2 || usize::from(size) > self.rest.len() {
            let err = if size < 2 {
                TcpOptionReadError::UnexpectedSize { kind, size }
            } else {
                TcpOptionReadError::UnexpectedEnd { kind }
            };
            self.rest = &[];
            return stop(err);
        }
        let (data, rest) = self.rest[2..].split_at(usize::from(size) - 2);
        self.rest = rest;

        let expect_size = |expected: u8, element: TcpOptionElement| {
            if size == expected {
                Ok(element)
            } else {
                Err(TcpOptionReadError::UnexpectedSize { kind, size })
            }
        };
        Some(match kind {
            MAX_SEGMENT_SIZE => expect_size(
                4,
                MaximumSegmentSize(u16::from_be_bytes([
                    data.first().copied().unwrap_or(0),
                    data.get(1).copied().unwrap_or(0),
                ])),
            ),
            WINDOW_SCALE => expect_size(3, WindowScale(data.first().copied().unwrap_or(0))),
            SELECTIVE_ACK_PERMITTED => expect_size(2, SelectiveAckPermitted),
            SELECTIVE_ACK => {
                if data.len() % 8 != 0 || data.len() > 32 {
                    Err(TcpOptionReadError::UnexpectedSize { kind, size })
                } else {
                    let mut pairs = ArrayVec::new();
                    for chunk in data.chunks_exact(8) {
                        pairs.push((
                            u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]),
                            u32::from_be_bytes([chunk[4], chunk[5], chunk[6], chunk[7]]),
                        ));
                    }
                    Ok(SelectiveAck(pairs))
                }
            }
            TIMESTAMP => {
                if size != 10 {
                    Err(TcpOptionReadError::UnexpectedSize { kind, size })
                } else {
                    Ok(Timestamp(
                        u32::from_be_bytes([data[0], data[1], data[2], data[3]]),
                        u32::from_be_bytes([data[4], data[5], data[6], data[7]]),
                    ))
                }
            }
            ALT_CHECKSUM_REQUEST => {
                expect_size(3, AlternateChecksumRequest(data.first().copied().unwrap_or(0)))
            }
            _ => Ok(Raw {
                kind,
                data: data.to_vec(),
            }),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn build_and_decode() {
        let mut pairs = ArrayVec::new();
        pairs.push((10, 20));
        let options = TcpOptions::from_elements(&[
            TcpOptionElement::MaximumSegmentSize(1460),
            TcpOptionElement::SelectiveAckPermitted,
            TcpOptionElement::WindowScale(7),
            TcpOptionElement::SelectiveAck(pairs.clone()),
            TcpOptionElement::Timestamp(0x1122_3344, 0),
        ])
        .unwrap();
        assert_eq!(0, options.len() % 4);
        let decoded: Vec<_> = options.elements_iter().map(|e| e.unwrap()).collect();
        assert_eq!(
            vec![
                TcpOptionElement::MaximumSegmentSize(1460),
                TcpOptionElement::SelectiveAckPermitted,
                TcpOptionElement::WindowScale(7),
                TcpOptionElement::SelectiveAck(pairs),
                TcpOptionElement::Timestamp(0x1122_3344, 0),
            ],
            decoded
        );
    }

    #[test]
    fn insertion_order_is_preserved() {
        // duplicate noops & options are legal and must stay in order
        let options = TcpOptions::from_elements(&[
            TcpOptionElement::Noop,
            TcpOptionElement::Noop,
            TcpOptionElement::WindowScale(2),
        ])
        .unwrap();
        assert_eq!(&[1, 1, 3, 3, 2, 0, 0, 0], options.as_slice());
    }

    #[test]
    fn rejects_over_long() {
        let elements = vec![TcpOptionElement::Timestamp(0, 0); 5];
        assert!(TcpOptions::from_elements(&elements).is_err());
        assert!(TcpOptions::try_from_slice(&[0u8; 44]).is_err());
        assert!(TcpOptions::try_from_slice(&[0u8; 6]).is_err());
    }

    #[test]
    fn bad_length_byte_is_an_error() {
        let options = TcpOptions::try_from_slice(&[3, 1, 0, 0]).unwrap();
        assert_eq!(
            Some(Err(TcpOptionReadError::UnexpectedSize { kind: 3, size: 1 })),
            options.elements_iter().next()
        );
    }

    #[test]
    fn unknown_kind_is_passed_through() {
        let options = TcpOptions::try_from_slice(&[254, 4, 0xab, 0xcd]).unwrap();
        assert_eq!(
            Some(Ok(TcpOptionElement::Raw {
                kind: 254,
                data: vec![0xab, 0xcd]
            })),
            options.elements_iter().next()
        );
    }
}
