/// Link type code of a capture (pcap "network" / DLT value), selecting
/// the root dissector of each frame.
///
/// ```
/// use wirecraft::LinkType;
///
/// assert_eq!(LinkType::ETHERNET.0, 1);
/// assert_eq!(LinkType::IEEE802_11_RADIOTAP, LinkType(127));
/// ```
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkType(pub u16);

impl LinkType {
    /// BSD loopback (4 byte protocol family header).
    pub const NULL: LinkType = LinkType(0);
    pub const ETHERNET: LinkType = LinkType(1);
    /// 802.11 without a capture pseudo header.
    pub const IEEE802_11: LinkType = LinkType(105);
    /// OpenBSD loopback.
    pub const LOOP: LinkType = LinkType(108);
    /// Linux cooked capture v1.
    pub const LINUX_SLL: LinkType = LinkType(113);
    /// 802.11 preceded by a RadioTap header.
    pub const IEEE802_11_RADIOTAP: LinkType = LinkType(127);
    /// Per-Packet Information encapsulation.
    pub const PPI: LinkType = LinkType(192);
    /// Apple PKTAP.
    pub const PKTAP: LinkType = LinkType(258);
    /// Linux cooked capture v2.
    pub const LINUX_SLL2: LinkType = LinkType(276);
}

impl From<u16> for LinkType {
    #[inline]
    fn from(value: u16) -> LinkType {
        LinkType(value)
    }
}

impl From<LinkType> for u16 {
    #[inline]
    fn from(value: LinkType) -> u16 {
        value.0
    }
}

impl core::fmt::Debug for LinkType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self {
            LinkType::NULL => write!(f, "0 (NULL/loopback)"),
            LinkType::ETHERNET => write!(f, "1 (Ethernet)"),
            LinkType::IEEE802_11 => write!(f, "105 (IEEE 802.11)"),
            LinkType::LOOP => write!(f, "108 (OpenBSD loopback)"),
            LinkType::LINUX_SLL => write!(f, "113 (Linux cooked v1)"),
            LinkType::IEEE802_11_RADIOTAP => write!(f, "127 (RadioTap)"),
            LinkType::PPI => write!(f, "192 (PPI)"),
            LinkType::PKTAP => write!(f, "258 (PKTAP)"),
            LinkType::LINUX_SLL2 => write!(f, "276 (Linux cooked v2)"),
            _ => write!(f, "{}", self.0),
        }
    }
}
