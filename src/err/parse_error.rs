use crate::err::{ContentError, LenError};

/// Error while decoding a packet from its on-wire form (the equivalent of a
/// "malformed packet").
///
/// Dissector constructors return this error to their caller. The chain
/// parsers in [`crate::dispatch`] catch it at every layer boundary below the
/// root and substitute a [`crate::RawData`] child so a partially decodable
/// buffer still yields a usable chain.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum ParseError {
    /// Not enough data was available to decode a layer.
    Len(LenError),

    /// A field value contradicted the wire format of the layer.
    Content(ContentError),
}

impl ParseError {
    /// Returns the [`LenError`] if the error is a length error.
    pub fn len_error(&self) -> Option<&LenError> {
        match self {
            ParseError::Len(err) => Some(err),
            ParseError::Content(_) => None,
        }
    }

    /// Returns the [`ContentError`] if the error is a content error.
    pub fn content_error(&self) -> Option<&ContentError> {
        match self {
            ParseError::Len(_) => None,
            ParseError::Content(err) => Some(err),
        }
    }

    /// Adds an offset to the layer start of a contained length error.
    pub fn add_offset(self, offset: usize) -> ParseError {
        match self {
            ParseError::Len(err) => ParseError::Len(err.add_offset(offset)),
            other => other,
        }
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParseError::Len(err) => err.fmt(f),
            ParseError::Content(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Len(err) => Some(err),
            ParseError::Content(err) => Some(err),
        }
    }
}

impl From<LenError> for ParseError {
    fn from(err: LenError) -> ParseError {
        ParseError::Len(err)
    }
}

impl From<ContentError> for ParseError {
    fn from(err: ContentError) -> ParseError {
        ParseError::Content(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::err::Layer;

    #[test]
    fn accessors() {
        let len = LenError {
            required_len: 4,
            len: 0,
            layer: Layer::ArpPacket,
            layer_start_offset: 0,
        };
        let err = ParseError::from(len.clone());
        assert_eq!(Some(&len), err.len_error());
        assert_eq!(None, err.content_error());

        let content = ContentError::DnsPointerLoop;
        let err = ParseError::from(content.clone());
        assert_eq!(Some(&content), err.content_error());
        assert_eq!(None, err.len_error());
    }

    #[test]
    fn add_offset() {
        let err = ParseError::Len(LenError {
            required_len: 4,
            len: 0,
            layer: Layer::ArpPacket,
            layer_start_offset: 3,
        });
        assert_eq!(
            Some(17),
            err.add_offset(14).len_error().map(|e| e.layer_start_offset)
        );
    }
}
