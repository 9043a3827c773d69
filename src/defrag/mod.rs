//! Reconstruction of fragmented IPv4 packets.

mod ip_defrag_buf;
pub use ip_defrag_buf::*;

mod ip_defrag_error;
pub use ip_defrag_error::*;

mod ip_defrag_pool;
pub use ip_defrag_pool::*;

mod ip_frag_id;
pub use ip_frag_id::*;

mod ip_frag_range;
pub use ip_frag_range::*;

/// Maximum length of a defragmented packet payload (limited by the
/// 16 bit total length field of the reassembled header).
pub const MAX_IP_DEFRAG_LEN: usize = u16::MAX as usize;
