use core::net::Ipv4Addr;

use crate::{IpNumber, Ipv4Header};

/// Values identifying which packet a fragment belongs to.
///
/// The two addresses are stored as an unordered pair (smaller one
/// first) so both directions of a flow share a key space without
/// colliding identifications mixing streams up.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct IpFragId {
    /// The numerically smaller of the two addresses.
    pub addr_low: Ipv4Addr,
    /// The numerically larger of the two addresses.
    pub addr_high: Ipv4Addr,
    /// IP identification field of the fragments.
    pub identification: u16,
    /// Protocol of the fragmented payload.
    pub protocol: IpNumber,
}

impl IpFragId {
    /// Builds the fragment key of an IPv4 header.
    pub fn from_header(header: &Ipv4Header) -> IpFragId {
        let (addr_low, addr_high) = if header.source <= header.destination {
            (header.source, header.destination)
        } else {
            (header.destination, header.source)
        };
        IpFragId {
            addr_low,
            addr_high,
            identification: header.identification,
            protocol: header.protocol,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn directions_share_a_key() {
        let mut forward = Ipv4Header::new(
            Ipv4Addr::new(10, 0, 0, 2),
            Ipv4Addr::new(10, 0, 0, 1),
        );
        forward.identification = 7;
        let mut backward = Ipv4Header::new(
            Ipv4Addr::new(10, 0, 0, 1),
            Ipv4Addr::new(10, 0, 0, 2),
        );
        backward.identification = 7;
        assert_eq!(
            IpFragId::from_header(&forward),
            IpFragId::from_header(&backward)
        );

        backward.identification = 8;
        assert_ne!(
            IpFragId::from_header(&forward),
            IpFragId::from_header(&backward)
        );
    }
}
