//! Capture sources, pcap file reading & writing and the seams towards
//! OS level capture & send backends.

mod link_type;
pub use link_type::*;

mod pcap_reader;
pub use pcap_reader::*;

mod pcap_writer;
pub use pcap_writer::*;

mod sender;
pub use sender::*;

mod source;
pub use source::*;
