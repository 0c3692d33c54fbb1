mod mapped;
mod ring;
mod shm_layout;

pub use mapped::{MappedRing, RingGuard};
pub use ring::RingConfig;
pub use shm_layout::{HEADER_LEN, RING_MAGIC, RING_VERSION, RingHeader};
