use crate::err::InvalidArgError;

/// Fixed size hardware address (e.g. the 6 byte MAC addresses of
/// Ethernet & 802.11 or the 8 byte link layer addresses of Linux
/// cooked captures).
///
/// The textual form is groups of two lowercase hex digits separated by
/// colons ("00:1b:44:11:3a:b7"). Parsing is strict: exactly `N`
/// components, each exactly one or two hex digits.
///
/// ```
/// use wirecraft::MacAddr;
///
/// let addr: MacAddr = "00:1b:44:11:3a:b7".parse().unwrap();
/// assert_eq!(addr.octets(), [0x00, 0x1b, 0x44, 0x11, 0x3a, 0xb7]);
/// assert_eq!("00:1b:44:11:3a:b7", addr.to_string());
///
/// // wrong component counts & non-hex digits are rejected
/// assert!("00:1b:44:11:3a".parse::<MacAddr>().is_err());
/// assert!("00:1b:44:11:3a:zz".parse::<MacAddr>().is_err());
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct HwAddress<const N: usize>(pub [u8; N]);

impl<const N: usize> Default for HwAddress<N> {
    fn default() -> HwAddress<N> {
        HwAddress([0; N])
    }
}

/// 48 bit hardware address used by Ethernet & 802.11.
pub type MacAddr = HwAddress<6>;

/// 64 bit link layer address used by Linux cooked capture v2.
pub type LlAddr = HwAddress<8>;

impl<const N: usize> HwAddress<N> {
    /// Address with all octets zero.
    pub const ZERO: HwAddress<N> = HwAddress([0; N]);

    /// Broadcast address (all octets 0xff).
    pub const BROADCAST: HwAddress<N> = HwAddress([0xff; N]);

    /// The octets of the address in transmission order.
    #[inline]
    pub const fn octets(&self) -> [u8; N] {
        self.0
    }

    /// True if all octets are zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == [0; N]
    }

    /// True if this is the broadcast address.
    #[inline]
    pub fn is_broadcast(&self) -> bool {
        self.0 == [0xff; N]
    }

    /// True if the group bit (least significant bit of the first octet)
    /// is set.
    #[inline]
    pub fn is_multicast(&self) -> bool {
        N > 0 && (self.0[0] & 1) != 0
    }
}

impl<const N: usize> From<[u8; N]> for HwAddress<N> {
    fn from(octets: [u8; N]) -> HwAddress<N> {
        HwAddress(octets)
    }
}

impl<const N: usize> From<HwAddress<N>> for [u8; N] {
    fn from(addr: HwAddress<N>) -> [u8; N] {
        addr.0
    }
}

impl<const N: usize> core::fmt::Display for HwAddress<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, octet) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ":")?;
            }
            write!(f, "{octet:02x}")?;
        }
        Ok(())
    }
}

impl<const N: usize> core::str::FromStr for HwAddress<N> {
    type Err = InvalidArgError;

    fn from_str(s: &str) -> Result<HwAddress<N>, InvalidArgError> {
        let err = || InvalidArgError::HwAddrParse {
            value: s.to_string(),
        };
        let mut octets = [0u8; N];
        let mut parts = s.split(':');
        for octet in octets.iter_mut() {
            let part = parts.next().ok_or_else(err)?;
            if part.is_empty() || part.len() > 2 {
                return Err(err());
            }
            *octet = u8::from_str_radix(part, 16).map_err(|_| err())?;
        }
        if parts.next().is_some() {
            return Err(err());
        }
        Ok(HwAddress(octets))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn display() {
        assert_eq!(
            "13:da:de:f1:01:85",
            MacAddr::from([0x13, 0xda, 0xde, 0xf1, 0x01, 0x85]).to_string()
        );
        assert_eq!(
            "00:00:00:00:00:00:00:01",
            LlAddr::from([0, 0, 0, 0, 0, 0, 0, 1]).to_string()
        );
    }

    #[test]
    fn parse_strict() {
        // component count
        assert!("00:11:22:33:44".parse::<MacAddr>().is_err());
        assert!("00:11:22:33:44:55:66".parse::<MacAddr>().is_err());
        // component size
        assert!("001:11:22:33:44:55".parse::<MacAddr>().is_err());
        assert!(":11:22:33:44:55".parse::<MacAddr>().is_err());
        // non hex digits
        assert!("0g:11:22:33:44:55".parse::<MacAddr>().is_err());
        // upper case accepted
        assert_eq!(
            MacAddr::from([0xab, 0xcd, 0xef, 0, 1, 2]),
            "AB:CD:EF:0:01:2".parse::<MacAddr>().unwrap()
        );
    }

    #[test]
    fn classification() {
        assert!(MacAddr::BROADCAST.is_broadcast());
        assert!(MacAddr::BROADCAST.is_multicast());
        assert!(MacAddr::ZERO.is_zero());
        assert!(!MacAddr::from([2, 0, 0, 0, 0, 1]).is_multicast());
        assert!(MacAddr::from([1, 0, 0, 0, 0, 1]).is_multicast());
    }

    proptest! {
        #[test]
        fn display_parse_roundtrip(octets in proptest::array::uniform6(any::<u8>())) {
            let addr = MacAddr::from(octets);
            prop_assert_eq!(addr, addr.to_string().parse::<MacAddr>().unwrap());
        }
    }
}
