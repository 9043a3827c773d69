//! Link layer & encapsulation dissectors.

pub mod dot11;
pub use dot11::{
    control_subtype, data_subtype, dot11_param, mgmt_subtype, ControlFrame, Dot11Action,
    Dot11AssocReq, Dot11AssocResp, Dot11Auth, Dot11Beacon, Dot11Capabilities, Dot11Control,
    Dot11Data, Dot11Deauth, Dot11Disassoc, Dot11Flags, Dot11MgmtHeader, Dot11ProbeReq,
    Dot11ProbeResp, Dot11ReassocReq, Dot11ReassocResp, RsnInformation, SuiteSelector,
};

mod eapol;
pub use eapol::*;

mod ethernet2;
pub use ethernet2::*;

mod llc;
pub use llc::*;

mod loopback;
pub use loopback::*;

mod mpls;
pub use mpls::*;

mod pktap;
pub use pktap::*;

mod ppi;
pub use ppi::*;

mod pppoe;
pub use pppoe::*;

mod radiotap;
pub use radiotap::*;

mod sll;
pub use sll::*;

mod snap;
pub use snap::*;

mod stp;
pub use stp::*;

mod vlan;
pub use vlan::*;

mod vlan_id;
pub use vlan_id::*;

mod vlan_pcp;
pub use vlan_pcp::*;

mod vxlan;
pub use vxlan::*;
