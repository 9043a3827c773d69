/// Errors caused by field values that contradict the layer's wire format
/// (in contrast to [`crate::err::LenError`] which signals missing data).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum ContentError {
    /// IP header version field contains a value other than the one the
    /// dissector decodes (4 for IPv4, 6 for IPv6).
    UnexpectedIpVersion { expected: u8, found: u8 },

    /// IPv4 "internet header length" is smaller than the minimum of 5.
    Ipv4IhlTooSmall { ihl: u8 },

    /// IPv4 "total length" is smaller than the header length implied by the IHL.
    Ipv4TotalLenTooSmall { total_len: u16, header_len: u16 },

    /// ARP packet is not of the Ethernet/IPv4 form.
    ArpNonEthIpv4 { hw_type: u16, proto_type: u16 },

    /// TCP data offset field is smaller than the minimum of 5.
    TcpDataOffsetTooSmall { data_offset: u8 },

    /// DNS compressed name contains a pointer loop.
    DnsPointerLoop,

    /// DNS label is longer than the maximum of 63 bytes.
    DnsLabelTooLong { len: usize },

    /// DNS name is longer than the maximum of 255 bytes.
    DnsNameTooLong { len: usize },

    /// DHCP message does not carry the BOOTP magic cookie.
    DhcpBadMagicCookie { found: u32 },

    /// RTP padding bit is set but the padding size byte is zero.
    RtpZeroPaddingSize,

    /// RTP padding size exceeds the bytes remaining after the header.
    RtpPaddingSizeTooBig { padding_size: u8, available: usize },

    /// BFD length field does not match the actual PDU length.
    BfdLengthMismatch { length_field: u8, actual: usize },

    /// BFD auth section length is invalid for the given auth type.
    BfdAuthLenInvalid { auth_type: u8, auth_len: u8 },

    /// BFD auth type is not one of the assigned values.
    BfdUnknownAuthType { auth_type: u8 },

    /// RadioTap version field contains a value other than 0.
    RadioTapUnexpectedVersion { version: u8 },

    /// RadioTap length field is smaller than the fixed part of the header.
    RadioTapLenTooSmall { length: u16 },

    /// RadioTap present bitmap contains a field the dissector does not know.
    RadioTapUnknownField { bit: u8 },

    /// STP BPDU protocol identifier is not 0.
    StpUnexpectedProtocolId { protocol_id: u16 },

    /// EAPOL descriptor type is neither RC4 nor RSN/WPA.
    EapolUnknownDescriptor { key_type: u8 },

    /// ICMP multipart extension header version is not 2.
    IcmpExtBadVersion { version: u8 },

    /// ICMP multipart extension object length is smaller than the 4 byte
    /// object header.
    IcmpExtObjectLenTooSmall { length: u16 },
}

impl core::fmt::Display for ContentError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use ContentError::*;
        match self {
            UnexpectedIpVersion { expected, found } => write!(
                f,
                "IP version field is {found} (only version {expected} can be decoded here)."
            ),
            Ipv4IhlTooSmall { ihl } => write!(
                f,
                "IPv4 header length of {ihl} is smaller than the minimum of 5."
            ),
            Ipv4TotalLenTooSmall { total_len, header_len } => write!(
                f,
                "IPv4 total length of {total_len} bytes is smaller than the header length of {header_len} bytes."
            ),
            ArpNonEthIpv4 { hw_type, proto_type } => write!(
                f,
                "ARP packet with hardware type {hw_type} and protocol type 0x{proto_type:04x} is not of the Ethernet/IPv4 form."
            ),
            TcpDataOffsetTooSmall { data_offset } => write!(
                f,
                "TCP data offset of {data_offset} is smaller than the minimum of 5."
            ),
            DnsPointerLoop => write!(f, "DNS compressed name contains a pointer loop."),
            DnsLabelTooLong { len } => write!(
                f,
                "DNS label with a length of {len} exceeds the maximum of 63 bytes."
            ),
            DnsNameTooLong { len } => write!(
                f,
                "DNS name with a length of {len} exceeds the maximum of 255 bytes."
            ),
            DhcpBadMagicCookie { found } => write!(
                f,
                "DHCP message carries 0x{found:08x} instead of the magic cookie 0x63825363."
            ),
            RtpZeroPaddingSize => write!(
                f,
                "RTP padding bit is set but the padding size byte is zero."
            ),
            RtpPaddingSizeTooBig { padding_size, available } => write!(
                f,
                "RTP padding size of {padding_size} bytes exceeds the {available} byte(s) that follow the header."
            ),
            BfdLengthMismatch { length_field, actual } => write!(
                f,
                "BFD length field claims {length_field} bytes but the PDU is {actual} bytes long."
            ),
            BfdAuthLenInvalid { auth_type, auth_len } => write!(
                f,
                "BFD auth section length {auth_len} is invalid for auth type {auth_type}."
            ),
            BfdUnknownAuthType { auth_type } => {
                write!(f, "BFD auth type {auth_type} is not an assigned value.")
            }
            RadioTapUnexpectedVersion { version } => {
                write!(f, "RadioTap version field is {version} (must be 0).")
            }
            RadioTapLenTooSmall { length } => write!(
                f,
                "RadioTap length field of {length} is smaller than the fixed 8 byte header."
            ),
            RadioTapUnknownField { bit } => write!(
                f,
                "RadioTap present bitmap sets bit {bit} which is not a known field."
            ),
            StpUnexpectedProtocolId { protocol_id } => {
                write!(f, "STP BPDU protocol identifier is {protocol_id} (must be 0).")
            }
            EapolUnknownDescriptor { key_type } => write!(
                f,
                "EAPOL key descriptor type {key_type} is neither RC4 nor RSN/WPA."
            ),
            IcmpExtBadVersion { version } => write!(
                f,
                "ICMP multipart extension header version is {version} (must be 2)."
            ),
            IcmpExtObjectLenTooSmall { length } => write!(
                f,
                "ICMP multipart extension object length of {length} is smaller than the 4 byte object header."
            ),
        }
    }
}

impl std::error::Error for ContentError {}
