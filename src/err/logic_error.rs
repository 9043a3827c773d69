/// Error if an operation is incompatible with the current state of the
/// layer it is called on.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum LogicError {
    /// A BFD auth field accessor was used while a different auth type
    /// (or no auth section at all) is active.
    BfdAuthTypeMismatch {
        /// Auth type required by the accessor.
        expected: &'static str,
        /// Auth type currently set (`None` if no auth section is present).
        actual: Option<&'static str>,
    },

    /// The maximum of 15 CSRC ids of an RTP header has been reached.
    RtpCsrcLimitReached,

    /// The maximum extension data length of an RTP header has been reached.
    RtpExtensionLimitReached,
}

impl core::fmt::Display for LogicError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use LogicError::*;
        match self {
            BfdAuthTypeMismatch { expected, actual } => match actual {
                Some(actual) => write!(
                    f,
                    "BFD auth type is {actual} (operation requires {expected})."
                ),
                None => write!(
                    f,
                    "BFD packet has no auth section (operation requires {expected})."
                ),
            },
            RtpCsrcLimitReached => {
                write!(f, "Maximum number of RTP CSRC ids (15) reached.")
            }
            RtpExtensionLimitReached => {
                write!(f, "Maximum RTP extension data length reached.")
            }
        }
    }
}

impl std::error::Error for LogicError {}

#[cfg(test)]
mod test {
    use super::LogicError::*;

    #[test]
    fn display() {
        assert_eq!(
            "BFD packet has no auth section (operation requires simple password).",
            format!(
                "{}",
                BfdAuthTypeMismatch {
                    expected: "simple password",
                    actual: None
                }
            )
        );
        assert_eq!(
            "BFD auth type is keyed MD5 (operation requires simple password).",
            format!(
                "{}",
                BfdAuthTypeMismatch {
                    expected: "simple password",
                    actual: Some("keyed MD5")
                }
            )
        );
    }
}
