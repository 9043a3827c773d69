use crate::err::ParseError;

/// Error surfaced by the capture façade and the pcap file reader/writer.
#[derive(Debug)]
pub enum CaptureError {
    /// An underlying I/O operation failed.
    Io(std::io::Error),

    /// The file does not start with a known pcap magic number.
    BadMagic { magic: u32 },

    /// The pcap link type is not one the dispatch tables can decode.
    UnsupportedLinkType { link_type: u16 },

    /// A record header claims more captured bytes than the file contains.
    TruncatedRecord { caplen: u32, available: usize },

    /// The capture source rejected the interface or file it was opened on.
    InvalidInterface { name: String },

    /// The root layer of a captured frame could not be decoded.
    Parse(ParseError),
}

impl core::fmt::Display for CaptureError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use CaptureError::*;
        match self {
            Io(err) => err.fmt(f),
            BadMagic { magic } => {
                write!(f, "0x{magic:08x} is not a known pcap magic number.")
            }
            UnsupportedLinkType { link_type } => {
                write!(f, "Link type {link_type} can not be decoded.")
            }
            TruncatedRecord { caplen, available } => write!(
                f,
                "Pcap record claims {caplen} captured byte(s) but only {available} byte(s) are left in the file."
            ),
            InvalidInterface { name } => {
                write!(f, "'{name}' is not a usable capture interface or file.")
            }
            Parse(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for CaptureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use CaptureError::*;
        match self {
            Io(err) => Some(err),
            Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> CaptureError {
        CaptureError::Io(err)
    }
}

impl From<ParseError> for CaptureError {
    fn from(err: ParseError) -> CaptureError {
        CaptureError::Parse(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            "0xdeadbeef is not a known pcap magic number.",
            format!("{}", CaptureError::BadMagic { magic: 0xdead_beef })
        );
        assert_eq!(
            "Link type 147 can not be decoded.",
            format!("{}", CaptureError::UnsupportedLinkType { link_type: 147 })
        );
    }

    #[test]
    fn from_io() {
        let err: CaptureError =
            std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof").into();
        assert!(matches!(err, CaptureError::Io(_)));
    }
}
