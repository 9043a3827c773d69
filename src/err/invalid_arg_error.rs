/// Error if a caller supplied argument is outside the range the
/// protocol allows (for arguments where a plain "too big" check via
/// [`crate::err::ValueTooBigError`] does not fit).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum InvalidArgError {
    /// BFD simple password must contain between 1 and 16 bytes.
    BfdPasswordLen { len: usize },

    /// BFD MD5/SHA1 auth value must have exactly the digest size.
    BfdAuthValueLen { expected: usize, actual: usize },

    /// A hardware address string could not be parsed.
    HwAddrParse { value: String },

    /// DNS labels must contain at least 1 byte.
    DnsEmptyLabel,

    /// DNS labels are limited to 63 bytes.
    DnsLabelTooLong { len: usize },

    /// An ICMP extension object payload must fit its 16 bit length field
    /// (4 byte header included).
    IcmpExtPayloadLen { len: usize },
}

impl core::fmt::Display for InvalidArgError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use InvalidArgError::*;
        match self {
            BfdPasswordLen { len } => write!(
                f,
                "BFD simple password must contain 1 to 16 bytes ({len} byte(s) given)."
            ),
            BfdAuthValueLen { expected, actual } => write!(
                f,
                "BFD auth value must contain exactly {expected} bytes ({actual} byte(s) given)."
            ),
            HwAddrParse { value } => {
                write!(f, "'{value}' is not a valid hardware address.")
            }
            DnsEmptyLabel => write!(f, "DNS labels must contain at least 1 byte."),
            DnsLabelTooLong { len } => write!(
                f,
                "DNS label with a length of {len} exceeds the maximum of 63 bytes."
            ),
            IcmpExtPayloadLen { len } => write!(
                f,
                "ICMP extension object payload of {len} byte(s) does not fit the 16 bit length field."
            ),
        }
    }
}

impl std::error::Error for InvalidArgError {}

#[cfg(test)]
mod test {
    use super::InvalidArgError::*;

    #[test]
    fn display() {
        assert_eq!(
            "BFD simple password must contain 1 to 16 bytes (0 byte(s) given).",
            format!("{}", BfdPasswordLen { len: 0 })
        );
        assert_eq!(
            "'xx' is not a valid hardware address.",
            format!(
                "{}",
                HwAddrParse {
                    value: "xx".to_string()
                }
            )
        );
    }
}
