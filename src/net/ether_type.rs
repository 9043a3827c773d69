/// Value of the "ether type" field present in Ethernet II, VLAN, SNAP
/// and SLL2 headers, identifying the protocol of the payload.
///
/// The underlying `u16` can be accessed via `.0` and any `u16` converts
/// into an `EtherType`:
///
/// ```
/// use wirecraft::EtherType;
///
/// assert_eq!(EtherType::IPV4.0, 0x0800);
/// let ether_type: EtherType = 0x0806.into();
/// assert_eq!(EtherType::ARP, ether_type);
/// ```
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EtherType(pub u16);

impl EtherType {
    pub const IPV4: EtherType = EtherType(0x0800);
    pub const ARP: EtherType = EtherType(0x0806);
    pub const WAKE_ON_LAN: EtherType = EtherType(0x0842);
    pub const VLAN_TAGGED_FRAME: EtherType = EtherType(0x8100);
    pub const IPV6: EtherType = EtherType(0x86dd);
    pub const EAPOL: EtherType = EtherType(0x888e);
    pub const PROVIDER_BRIDGING: EtherType = EtherType(0x88a8);
    pub const VLAN_DOUBLE_TAGGED_FRAME: EtherType = EtherType(0x9100);
    pub const PPPOE_DISCOVERY: EtherType = EtherType(0x8863);
    pub const PPPOE_SESSION: EtherType = EtherType(0x8864);
    pub const MPLS: EtherType = EtherType(0x8847);
    pub const MPLS_MULTICAST: EtherType = EtherType(0x8848);

    /// Smallest value that identifies a protocol. Values below it are
    /// 802.3 length fields instead (payload is LLC).
    pub const MIN_PROTOCOL_VALUE: u16 = 0x0600;
}

impl From<u16> for EtherType {
    #[inline]
    fn from(value: u16) -> EtherType {
        EtherType(value)
    }
}

impl From<EtherType> for u16 {
    #[inline]
    fn from(value: EtherType) -> u16 {
        value.0
    }
}

impl core::fmt::Debug for EtherType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self {
            EtherType::IPV4 => write!(f, "{:#06x} (Internet Protocol version 4)", self.0),
            EtherType::ARP => write!(f, "{:#06x} (Address Resolution Protocol)", self.0),
            EtherType::WAKE_ON_LAN => write!(f, "{:#06x} (Wake on LAN)", self.0),
            EtherType::VLAN_TAGGED_FRAME => {
                write!(f, "{:#06x} (Customer VLAN Tag - 802.1Q)", self.0)
            }
            EtherType::IPV6 => write!(f, "{:#06x} (Internet Protocol version 6)", self.0),
            EtherType::EAPOL => write!(f, "{:#06x} (EAP over LAN - 802.1X)", self.0),
            EtherType::PROVIDER_BRIDGING => {
                write!(f, "{:#06x} (Service VLAN Tag - 802.1AD)", self.0)
            }
            EtherType::VLAN_DOUBLE_TAGGED_FRAME => {
                write!(f, "{:#06x} (VLAN Double Tagged Frame)", self.0)
            }
            EtherType::PPPOE_DISCOVERY => write!(f, "{:#06x} (PPPoE Discovery Stage)", self.0),
            EtherType::PPPOE_SESSION => write!(f, "{:#06x} (PPPoE Session Stage)", self.0),
            EtherType::MPLS => write!(f, "{:#06x} (MPLS Unicast)", self.0),
            EtherType::MPLS_MULTICAST => write!(f, "{:#06x} (MPLS Multicast)", self.0),
            _ => write!(f, "{:#06x}", self.0),
        }
    }
}

/// `u16` constants for the most used `ether_type` values, for use in
/// patterns without the need to write `EtherType::` in front of them.
pub mod ether_type {
    use super::EtherType;
    pub const IPV4: u16 = EtherType::IPV4.0;
    pub const ARP: u16 = EtherType::ARP.0;
    pub const WAKE_ON_LAN: u16 = EtherType::WAKE_ON_LAN.0;
    pub const VLAN_TAGGED_FRAME: u16 = EtherType::VLAN_TAGGED_FRAME.0;
    pub const IPV6: u16 = EtherType::IPV6.0;
    pub const EAPOL: u16 = EtherType::EAPOL.0;
    pub const PROVIDER_BRIDGING: u16 = EtherType::PROVIDER_BRIDGING.0;
    pub const VLAN_DOUBLE_TAGGED_FRAME: u16 = EtherType::VLAN_DOUBLE_TAGGED_FRAME.0;
    pub const PPPOE_DISCOVERY: u16 = EtherType::PPPOE_DISCOVERY.0;
    pub const PPPOE_SESSION: u16 = EtherType::PPPOE_SESSION.0;
    pub const MPLS: u16 = EtherType::MPLS.0;
    pub const MPLS_MULTICAST: u16 = EtherType::MPLS_MULTICAST.0;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn conversions() {
        assert_eq!(EtherType::IPV6, EtherType::from(0x86dd));
        assert_eq!(0x86ddu16, EtherType::IPV6.into());
    }

    #[test]
    fn debug() {
        assert_eq!(
            "0x0800 (Internet Protocol version 4)",
            format!("{:?}", EtherType::IPV4)
        );
        assert_eq!("0x1234", format!("{:?}", EtherType(0x1234)));
    }
}
