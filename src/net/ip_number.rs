/// Value of the `protocol` field of IPv4 headers and the `next_header`
/// fields of IPv6 headers & extensions, identifying the payload protocol.
///
/// ```
/// use wirecraft::IpNumber;
///
/// assert_eq!(IpNumber::TCP.0, 6);
/// let num: IpNumber = 17.into();
/// assert_eq!(IpNumber::UDP, num);
/// ```
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IpNumber(pub u8);

impl IpNumber {
    /// IPv6 Hop-by-Hop Option extension header.
    pub const IPV6_HOP_BY_HOP: IpNumber = IpNumber(0);
    /// Internet Control Message Protocol.
    pub const ICMP: IpNumber = IpNumber(1);
    /// Transmission Control Protocol.
    pub const TCP: IpNumber = IpNumber(6);
    /// User Datagram Protocol.
    pub const UDP: IpNumber = IpNumber(17);
    /// IPv6 encapsulation.
    pub const IPV6: IpNumber = IpNumber(41);
    /// IPv6 Routing extension header.
    pub const IPV6_ROUTE: IpNumber = IpNumber(43);
    /// IPv6 Fragment extension header.
    pub const IPV6_FRAG: IpNumber = IpNumber(44);
    /// Generic Routing Encapsulation.
    pub const GRE: IpNumber = IpNumber(47);
    /// Encapsulating Security Payload (IPsec).
    pub const IPSEC_ESP: IpNumber = IpNumber(50);
    /// Authentication Header (IPsec).
    pub const IPSEC_AH: IpNumber = IpNumber(51);
    /// ICMP for IPv6.
    pub const IPV6_ICMP: IpNumber = IpNumber(58);
    /// There is no next header (IPv6).
    pub const IPV6_NO_NEXT_HEADER: IpNumber = IpNumber(59);
    /// IPv6 Destination Options extension header.
    pub const IPV6_DEST_OPTIONS: IpNumber = IpNumber(60);
    /// IPv6 Mobility extension header.
    pub const MOBILITY: IpNumber = IpNumber(135);

    /// True if the value identifies an IPv6 extension header the
    /// dissector walks through (instead of a payload protocol).
    pub fn is_ipv6_ext_header_value(self) -> bool {
        matches!(
            self,
            IpNumber::IPV6_HOP_BY_HOP
                | IpNumber::IPV6_ROUTE
                | IpNumber::IPV6_FRAG
                | IpNumber::IPV6_DEST_OPTIONS
                | IpNumber::IPSEC_AH
                | IpNumber::MOBILITY
        )
    }
}

impl From<u8> for IpNumber {
    #[inline]
    fn from(value: u8) -> IpNumber {
        IpNumber(value)
    }
}

impl From<IpNumber> for u8 {
    #[inline]
    fn from(value: IpNumber) -> u8 {
        value.0
    }
}

impl core::fmt::Debug for IpNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self {
            IpNumber::IPV6_HOP_BY_HOP => write!(f, "0 (IPv6 Hop-by-Hop Option)"),
            IpNumber::ICMP => write!(f, "1 (ICMP)"),
            IpNumber::TCP => write!(f, "6 (TCP)"),
            IpNumber::UDP => write!(f, "17 (UDP)"),
            IpNumber::IPV6 => write!(f, "41 (IPv6 encapsulation)"),
            IpNumber::IPV6_ROUTE => write!(f, "43 (IPv6 Routing Header)"),
            IpNumber::IPV6_FRAG => write!(f, "44 (IPv6 Fragment Header)"),
            IpNumber::GRE => write!(f, "47 (GRE)"),
            IpNumber::IPSEC_ESP => write!(f, "50 (IPsec ESP)"),
            IpNumber::IPSEC_AH => write!(f, "51 (IPsec AH)"),
            IpNumber::IPV6_ICMP => write!(f, "58 (ICMPv6)"),
            IpNumber::IPV6_NO_NEXT_HEADER => write!(f, "59 (IPv6 No Next Header)"),
            IpNumber::IPV6_DEST_OPTIONS => write!(f, "60 (IPv6 Destination Options)"),
            IpNumber::MOBILITY => write!(f, "135 (Mobility Header)"),
            _ => write!(f, "{}", self.0),
        }
    }
}

/// `u8` constants of the most used IP numbers, for use in patterns.
pub mod ip_number {
    use super::IpNumber;
    pub const IPV6_HOP_BY_HOP: u8 = IpNumber::IPV6_HOP_BY_HOP.0;
    pub const ICMP: u8 = IpNumber::ICMP.0;
    pub const TCP: u8 = IpNumber::TCP.0;
    pub const UDP: u8 = IpNumber::UDP.0;
    pub const IPV6: u8 = IpNumber::IPV6.0;
    pub const IPV6_ROUTE: u8 = IpNumber::IPV6_ROUTE.0;
    pub const IPV6_FRAG: u8 = IpNumber::IPV6_FRAG.0;
    pub const GRE: u8 = IpNumber::GRE.0;
    pub const IPSEC_ESP: u8 = IpNumber::IPSEC_ESP.0;
    pub const IPSEC_AH: u8 = IpNumber::IPSEC_AH.0;
    pub const IPV6_ICMP: u8 = IpNumber::IPV6_ICMP.0;
    pub const IPV6_NO_NEXT_HEADER: u8 = IpNumber::IPV6_NO_NEXT_HEADER.0;
    pub const IPV6_DEST_OPTIONS: u8 = IpNumber::IPV6_DEST_OPTIONS.0;
    pub const MOBILITY: u8 = IpNumber::MOBILITY.0;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn conversions() {
        assert_eq!(IpNumber::TCP, IpNumber::from(6));
        assert_eq!(6u8, IpNumber::TCP.into());
    }

    #[test]
    fn is_ipv6_ext_header_value() {
        assert!(IpNumber::IPV6_FRAG.is_ipv6_ext_header_value());
        assert!(IpNumber::IPSEC_AH.is_ipv6_ext_header_value());
        assert!(!IpNumber::TCP.is_ipv6_ext_header_value());
        assert!(!IpNumber::IPV6_NO_NEXT_HEADER.is_ipv6_ext_header_value());
    }

    #[test]
    fn debug() {
        assert_eq!("6 (TCP)", format!("{:?}", IpNumber::TCP));
        assert_eq!("99", format!("{:?}", IpNumber(99)));
    }
}
