use crate::err::{ValueTooBigError, ValueType};

/// 13 bit unsigned integer containing the fragment offset of an
/// [`crate::Ipv4Header`] (in units of 8 bytes).
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IpFragOffset(u16);

impl IpFragOffset {
    /// IpFragOffset with value 0.
    pub const ZERO: IpFragOffset = IpFragOffset(0);

    /// Maximum value of an IP fragment offset.
    pub const MAX_U16: u16 = 0b0001_1111_1111_1111;

    /// Tries to create an [`IpFragOffset`] and checks that the passed
    /// value is smaller or equal than [`IpFragOffset::MAX_U16`]
    /// (13 bit unsigned integer).
    #[inline]
    pub const fn try_new(value: u16) -> Result<IpFragOffset, ValueTooBigError<u16>> {
        if value <= IpFragOffset::MAX_U16 {
            Ok(IpFragOffset(value))
        } else {
            Err(ValueTooBigError {
                actual: value,
                max_allowed: IpFragOffset::MAX_U16,
                value_type: ValueType::IpFragOffset,
            })
        }
    }

    #[inline]
    pub(crate) const fn from_wire(value: u16) -> IpFragOffset {
        IpFragOffset(value & IpFragOffset::MAX_U16)
    }

    /// Returns the underlying unsigned 13 bit value (in 8 byte units).
    #[inline]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// The offset in bytes.
    #[inline]
    pub const fn byte_offset(self) -> usize {
        (self.0 as usize) * 8
    }
}

impl core::fmt::Display for IpFragOffset {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<IpFragOffset> for u16 {
    #[inline]
    fn from(value: IpFragOffset) -> u16 {
        value.0
    }
}

impl TryFrom<u16> for IpFragOffset {
    type Error = ValueTooBigError<u16>;

    #[inline]
    fn try_from(value: u16) -> Result<IpFragOffset, Self::Error> {
        IpFragOffset::try_new(value)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn try_new(
            valid in 0..=IpFragOffset::MAX_U16,
            invalid in (IpFragOffset::MAX_U16 + 1)..=u16::MAX,
        ) {
            prop_assert_eq!(valid, IpFragOffset::try_new(valid).unwrap().value());
            prop_assert!(IpFragOffset::try_new(invalid).is_err());
        }
    }

    #[test]
    fn byte_offset() {
        assert_eq!(1480, IpFragOffset::try_new(185).unwrap().byte_offset());
    }
}
