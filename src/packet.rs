use crate::Pdu;

/// Microsecond resolution capture timestamp.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp {
    pub seconds: u64,
    /// Sub-second part (0..1_000_000).
    pub microseconds: u32,
}

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp {
        seconds: 0,
        microseconds: 0,
    };

    pub fn new(seconds: u64, microseconds: u32) -> Timestamp {
        Timestamp {
            seconds: seconds + u64::from(microseconds) / 1_000_000,
            microseconds: microseconds % 1_000_000,
        }
    }

    /// Total number of microseconds.
    pub fn as_micros(&self) -> u64 {
        self.seconds * 1_000_000 + u64::from(self.microseconds)
    }
}

impl From<core::time::Duration> for Timestamp {
    fn from(duration: core::time::Duration) -> Timestamp {
        Timestamp {
            seconds: duration.as_secs(),
            microseconds: duration.subsec_micros(),
        }
    }
}

impl core::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:06}", self.seconds, self.microseconds)
    }
}

/// A captured (or crafted) packet: the root of a layer chain plus the
/// capture timestamp.
#[derive(Clone, Debug, PartialEq)]
pub struct Packet {
    pdu: Pdu,
    timestamp: Timestamp,
}

impl Packet {
    pub fn new(pdu: impl Into<Pdu>, timestamp: Timestamp) -> Packet {
        Packet {
            pdu: pdu.into(),
            timestamp,
        }
    }

    /// The outermost layer of the chain.
    #[inline]
    pub fn pdu(&self) -> &Pdu {
        &self.pdu
    }

    /// The outermost layer of the chain (mutable).
    #[inline]
    pub fn pdu_mut(&mut self) -> &mut Pdu {
        &mut self.pdu
    }

    /// Consumes the packet, returning the chain.
    pub fn into_pdu(self) -> Pdu {
        self.pdu
    }

    #[inline]
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn timestamp_normalization() {
        let ts = Timestamp::new(1, 2_500_000);
        assert_eq!(3, ts.seconds);
        assert_eq!(500_000, ts.microseconds);
        assert_eq!(3_500_000, ts.as_micros());
        assert_eq!("3.500000", ts.to_string());
    }

    #[test]
    fn packet_owns_its_chain() {
        let packet = Packet::new(
            crate::RawData::from(vec![1u8, 2, 3]),
            Timestamp::new(10, 20),
        );
        let clone = packet.clone();
        assert_eq!(3, clone.pdu().len());
        assert_eq!(packet, clone);
        assert_eq!(3, packet.into_pdu().len());
    }
}
