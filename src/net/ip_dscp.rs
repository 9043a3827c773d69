use crate::err::{ValueTooBigError, ValueType};

/// 6 bit unsigned integer containing the "differentiated services code
/// point" (present in [`crate::Ipv4Header`] & [`crate::Ipv6Header`]).
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IpDscp(u8);

impl IpDscp {
    /// IpDscp with value 0 (default forwarding).
    pub const ZERO: IpDscp = IpDscp(0);

    /// Maximum value of an IP DSCP.
    pub const MAX_U8: u8 = 0b0011_1111;

    /// Tries to create an [`IpDscp`] and checks that the passed value
    /// is smaller or equal than [`IpDscp::MAX_U8`] (6 bit unsigned integer).
    #[inline]
    pub const fn try_new(value: u8) -> Result<IpDscp, ValueTooBigError<u8>> {
        if value <= IpDscp::MAX_U8 {
            Ok(IpDscp(value))
        } else {
            Err(ValueTooBigError {
                actual: value,
                max_allowed: IpDscp::MAX_U8,
                value_type: ValueType::IpDscp,
            })
        }
    }

    #[inline]
    pub(crate) const fn from_wire(value: u8) -> IpDscp {
        IpDscp(value & IpDscp::MAX_U8)
    }

    /// Returns the underlying unsigned 6 bit value.
    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl core::fmt::Display for IpDscp {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<IpDscp> for u8 {
    #[inline]
    fn from(value: IpDscp) -> u8 {
        value.0
    }
}

impl TryFrom<u8> for IpDscp {
    type Error = ValueTooBigError<u8>;

    #[inline]
    fn try_from(value: u8) -> Result<IpDscp, Self::Error> {
        IpDscp::try_new(value)
    }
}
