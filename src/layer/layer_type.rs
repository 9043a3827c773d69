/// Type tag identifying the protocol of a layer in a chain.
///
/// Tags are used for matching ([`crate::Pdu::find`],
/// [`crate::Pdu::matches`]), for downcasting via the
/// [`crate::AnyLayer`] variants and by the composition operator to
/// decide next-header field values.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayerType {
    Ethernet2,
    /// Customer VLAN tag (802.1Q).
    Dot1Q,
    /// Service VLAN tag (802.1AD, outer tag of Q-in-Q).
    Dot1AD,
    Pppoe,
    Mpls,
    Arp,
    Ipv4,
    Ipv6,
    Tcp,
    Udp,
    Icmpv4,
    Icmpv6,
    Dns,
    Dhcp,
    Dhcpv6,
    /// Family tag matching any 802.11 frame (never a concrete layer).
    Dot11,
    Dot11Beacon,
    Dot11ProbeReq,
    Dot11ProbeResp,
    Dot11AssocReq,
    Dot11AssocResp,
    Dot11ReassocReq,
    Dot11ReassocResp,
    Dot11Auth,
    Dot11Deauth,
    Dot11Disassoc,
    Dot11Action,
    Dot11Control,
    Dot11Data,
    RadioTap,
    Ppi,
    Llc,
    Snap,
    Stp,
    EapolRc4,
    EapolRsn,
    Bfd,
    Rtp,
    Vxlan,
    /// Linux cooked capture v1.
    Sll,
    /// Linux cooked capture v2.
    Sll2,
    Pktap,
    Loopback,
    Raw,
}

impl LayerType {
    /// True if the tag belongs to the 802.11 frame family.
    pub fn is_dot11(&self) -> bool {
        use LayerType::*;
        matches!(
            self,
            Dot11
                | Dot11Beacon
                | Dot11ProbeReq
                | Dot11ProbeResp
                | Dot11AssocReq
                | Dot11AssocResp
                | Dot11ReassocReq
                | Dot11ReassocResp
                | Dot11Auth
                | Dot11Deauth
                | Dot11Disassoc
                | Dot11Action
                | Dot11Control
                | Dot11Data
        )
    }

    /// True if a layer with this tag matches the given tag, taking
    /// family tags into account (e.g. a `Dot11Beacon` also matches
    /// `Dot11`).
    pub fn matches(&self, flag: LayerType) -> bool {
        *self == flag || (flag == LayerType::Dot11 && self.is_dot11())
    }
}
