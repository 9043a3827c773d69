use crate::defrag::MAX_IP_DEFRAG_LEN;

/// Errors of the IPv4 defragmentation buffer & pool.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum IpDefragError {
    /// A fragment would extend the packet beyond the maximum
    /// reassembled size.
    SegmentTooBig { offset: usize, payload_len: usize },

    /// A fragment without the more-fragments flag announced an end
    /// that conflicts with the end established by an earlier one.
    ConflictingEnd { previous_end: usize, end: usize },

    /// Data was received beyond the end established by the final
    /// fragment.
    UnexpectedDataAfterEnd { end: usize, offset: usize },
}

impl core::fmt::Display for IpDefragError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use IpDefragError::*;
        match self {
            SegmentTooBig {
                offset,
                payload_len,
            } => write!(
                f,
                "Fragment at offset {offset} with {payload_len} byte(s) exceeds the maximum reassembled size of {MAX_IP_DEFRAG_LEN} bytes."
            ),
            ConflictingEnd { previous_end, end } => write!(
                f,
                "Final fragment ends at {end} but an earlier final fragment ended at {previous_end}."
            ),
            UnexpectedDataAfterEnd { end, offset } => write!(
                f,
                "Fragment at offset {offset} lies beyond the end of the packet ({end})."
            ),
        }
    }
}

impl std::error::Error for IpDefragError {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            "Final fragment ends at 16 but an earlier final fragment ended at 8.",
            format!(
                "{}",
                IpDefragError::ConflictingEnd {
                    previous_end: 8,
                    end: 16
                }
            )
        );
    }
}
