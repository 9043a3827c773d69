use crate::err::{ValueTooBigError, ValueType};

/// 20 bit unsigned integer containing the flow label of an
/// [`crate::Ipv6Header`].
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ipv6FlowLabel(u32);

impl Ipv6FlowLabel {
    /// Ipv6FlowLabel with value 0.
    pub const ZERO: Ipv6FlowLabel = Ipv6FlowLabel(0);

    /// Maximum value of an IPv6 flow label.
    pub const MAX_U32: u32 = 0x000f_ffff;

    /// Tries to create an [`Ipv6FlowLabel`] and checks that the passed
    /// value is smaller or equal than [`Ipv6FlowLabel::MAX_U32`]
    /// (20 bit unsigned integer).
    #[inline]
    pub const fn try_new(value: u32) -> Result<Ipv6FlowLabel, ValueTooBigError<u32>> {
        if value <= Ipv6FlowLabel::MAX_U32 {
            Ok(Ipv6FlowLabel(value))
        } else {
            Err(ValueTooBigError {
                actual: value,
                max_allowed: Ipv6FlowLabel::MAX_U32,
                value_type: ValueType::Ipv6FlowLabel,
            })
        }
    }

    #[inline]
    pub(crate) const fn from_wire(value: u32) -> Ipv6FlowLabel {
        Ipv6FlowLabel(value & Ipv6FlowLabel::MAX_U32)
    }

    /// Returns the underlying unsigned 20 bit value.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for Ipv6FlowLabel {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Ipv6FlowLabel> for u32 {
    #[inline]
    fn from(value: Ipv6FlowLabel) -> u32 {
        value.0
    }
}

impl TryFrom<u32> for Ipv6FlowLabel {
    type Error = ValueTooBigError<u32>;

    #[inline]
    fn try_from(value: u32) -> Result<Ipv6FlowLabel, Self::Error> {
        Ipv6FlowLabel::try_new(value)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn try_new(
            valid in 0..=Ipv6FlowLabel::MAX_U32,
            invalid in (Ipv6FlowLabel::MAX_U32 + 1)..=u32::MAX,
        ) {
            prop_assert_eq!(valid, Ipv6FlowLabel::try_new(valid).unwrap().value());
            prop_assert!(Ipv6FlowLabel::try_new(invalid).is_err());
        }
    }
}
