use crate::err::{ValueTooBigError, ValueType};

/// 3 bit unsigned integer containing the "priority code point" of a
/// VLAN tag (present in [`crate::VlanHeader`]).
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VlanPcp(u8);

impl VlanPcp {
    /// VlanPcp with value 0.
    pub const ZERO: VlanPcp = VlanPcp(0);

    /// Maximum value of a VLAN priority code point.
    pub const MAX_U8: u8 = 0b0000_0111;

    /// Tries to create a [`VlanPcp`] and checks that the passed value
    /// is smaller or equal than [`VlanPcp::MAX_U8`] (3 bit unsigned integer).
    #[inline]
    pub const fn try_new(value: u8) -> Result<VlanPcp, ValueTooBigError<u8>> {
        if value <= VlanPcp::MAX_U8 {
            Ok(VlanPcp(value))
        } else {
            Err(ValueTooBigError {
                actual: value,
                max_allowed: VlanPcp::MAX_U8,
                value_type: ValueType::VlanPcp,
            })
        }
    }

    #[inline]
    pub(crate) const fn from_wire(value: u8) -> VlanPcp {
        VlanPcp(value & VlanPcp::MAX_U8)
    }

    /// Returns the underlying unsigned 3 bit value.
    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl core::fmt::Display for VlanPcp {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<VlanPcp> for u8 {
    #[inline]
    fn from(value: VlanPcp) -> u8 {
        value.0
    }
}

impl TryFrom<u8> for VlanPcp {
    type Error = ValueTooBigError<u8>;

    #[inline]
    fn try_from(value: u8) -> Result<VlanPcp, Self::Error> {
        VlanPcp::try_new(value)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn try_new(
            valid in 0..=VlanPcp::MAX_U8,
            invalid in (VlanPcp::MAX_U8 + 1)..=u8::MAX,
        ) {
            prop_assert_eq!(valid, VlanPcp::try_new(valid).unwrap().value());
            prop_assert!(VlanPcp::try_new(invalid).is_err());
        }
    }
}
