use crate::err::{ValueTooBigError, ValueType};

/// 12 bit unsigned integer containing the "VLAN identifier" (present
/// in [`crate::VlanHeader`]).
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VlanId(u16);

impl VlanId {
    /// VlanId with value 0.
    pub const ZERO: VlanId = VlanId(0);

    /// Maximum value of a VLAN id.
    pub const MAX_U16: u16 = 0b0000_1111_1111_1111;

    /// Tries to create a [`VlanId`] and checks that the passed value
    /// is smaller or equal than [`VlanId::MAX_U16`] (12 bit unsigned integer).
    #[inline]
    pub const fn try_new(value: u16) -> Result<VlanId, ValueTooBigError<u16>> {
        if value <= VlanId::MAX_U16 {
            Ok(VlanId(value))
        } else {
            Err(ValueTooBigError {
                actual: value,
                max_allowed: VlanId::MAX_U16,
                value_type: ValueType::VlanId,
            })
        }
    }

    /// Creates a [`VlanId`] from a masked on-wire value (upper 4 bits
    /// are discarded).
    #[inline]
    pub(crate) const fn from_wire(value: u16) -> VlanId {
        VlanId(value & VlanId::MAX_U16)
    }

    /// Returns the underlying unsigned 12 bit value.
    #[inline]
    pub const fn value(self) -> u16 {
        self.0
    }
}

impl core::fmt::Display for VlanId {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<VlanId> for u16 {
    #[inline]
    fn from(value: VlanId) -> u16 {
        value.0
    }
}

impl TryFrom<u16> for VlanId {
    type Error = ValueTooBigError<u16>;

    #[inline]
    fn try_from(value: u16) -> Result<VlanId, Self::Error> {
        VlanId::try_new(value)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn try_new(
            valid in 0..=VlanId::MAX_U16,
            invalid in (VlanId::MAX_U16 + 1)..=u16::MAX,
        ) {
            prop_assert_eq!(valid, VlanId::try_new(valid).unwrap().value());
            prop_assert_eq!(
                VlanId::try_new(invalid).unwrap_err(),
                ValueTooBigError {
                    actual: invalid,
                    max_allowed: VlanId::MAX_U16,
                    value_type: ValueType::VlanId,
                }
            );
        }
    }

    #[test]
    fn from_wire_masks() {
        assert_eq!(0x123, VlanId::from_wire(0xf123).value());
    }
}
