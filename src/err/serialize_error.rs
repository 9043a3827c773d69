use crate::err::Layer;

/// Error while writing a packet to its on-wire form.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum SerializeError {
    /// The output buffer does not have enough space for the serialized data.
    SpaceExhausted {
        /// Number of bytes that would have been required.
        required_len: usize,
        /// Number of bytes available in the output buffer.
        len: usize,
        /// Layer that was being written.
        layer: Layer,
    },

    /// A derived field could not be computed because the layer that
    /// provides its inputs is missing from the chain (e.g. an ICMPv6
    /// checksum without an enclosing IPv6 header).
    MissingAncestor {
        /// Layer whose field could not be computed.
        layer: Layer,
        /// Layer that would have been required above it.
        required: Layer,
    },

    /// The payload is too large for a length field of the layer.
    PayloadTooLarge {
        /// Layer whose length field overflowed.
        layer: Layer,
        /// Actual payload length.
        actual: usize,
        /// Maximum value the length field can carry.
        max: usize,
    },
}

impl core::fmt::Display for SerializeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use SerializeError::*;
        match self {
            SpaceExhausted {
                required_len,
                len,
                layer,
            } => write!(
                f,
                "Not enough space to serialize '{layer}'. {required_len} byte(s) would be required, but only {len} byte(s) are available."
            ),
            MissingAncestor { layer, required } => write!(
                f,
                "Can not serialize '{layer}': no '{required}' is present above it in the chain."
            ),
            PayloadTooLarge { layer, actual, max } => write!(
                f,
                "Payload length of {actual} byte(s) exceeds the maximum of {max} byte(s) that the length field of '{layer}' can represent."
            ),
        }
    }
}

impl std::error::Error for SerializeError {}

#[cfg(test)]
mod test {
    use super::SerializeError::*;
    use crate::err::Layer;

    #[test]
    fn display() {
        assert_eq!(
            "Not enough space to serialize 'UDP header'. 8 byte(s) would be required, but only 2 byte(s) are available.",
            format!(
                "{}",
                SpaceExhausted {
                    required_len: 8,
                    len: 2,
                    layer: Layer::UdpHeader
                }
            )
        );
        assert_eq!(
            "Can not serialize 'ICMPv6 packet': no 'IPv6 header' is present above it in the chain.",
            format!(
                "{}",
                MissingAncestor {
                    layer: Layer::Icmpv6,
                    required: Layer::Ipv6Header
                }
            )
        );
    }
}
