/// Types of values that have a limited allowed value range and can
/// cause an [`crate::err::ValueTooBigError`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueType {
    /// VLAN identifier (12 bit).
    VlanId,
    /// VLAN priority code point (3 bit).
    VlanPcp,
    /// IPv4/IPv6 DSCP field (6 bit).
    IpDscp,
    /// IPv4/IPv6 ECN field (2 bit).
    IpEcn,
    /// IPv4 fragment offset in 8 byte units (13 bit).
    IpFragOffset,
    /// IPv6 flow label (20 bit).
    Ipv6FlowLabel,
    /// MPLS label value (20 bit).
    MplsLabel,
    /// VXLAN network identifier (24 bit).
    VxlanVni,
    /// RTP payload type (7 bit).
    RtpPayloadType,
    /// BFD version field (3 bit).
    BfdVersion,
    /// STP bridge priority (4 bit, in units of 4096).
    StpBridgePriority,
    /// STP bridge system id extension (12 bit).
    StpSystemIdExtension,
    /// Payload length of a TLV option (limited by its 8 or 16 bit length field).
    OptionPayloadLen,
}

impl core::fmt::Display for ValueType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use ValueType::*;
        match self {
            VlanId => write!(f, "VLAN identifier"),
            VlanPcp => write!(f, "VLAN priority code point"),
            IpDscp => write!(f, "IP DSCP"),
            IpEcn => write!(f, "IP ECN"),
            IpFragOffset => write!(f, "IP fragment offset"),
            Ipv6FlowLabel => write!(f, "IPv6 flow label"),
            MplsLabel => write!(f, "MPLS label"),
            VxlanVni => write!(f, "VXLAN network identifier"),
            RtpPayloadType => write!(f, "RTP payload type"),
            BfdVersion => write!(f, "BFD version"),
            StpBridgePriority => write!(f, "STP bridge priority"),
            StpSystemIdExtension => write!(f, "STP system id extension"),
            OptionPayloadLen => write!(f, "option payload length"),
        }
    }
}
