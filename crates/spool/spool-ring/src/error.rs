/// Construction-time failures.
///
/// Running out of data or room is never an error: operations report it
/// through the number of bytes they transferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RingError {
    #[error("storage holds {storage} bytes but capacity is {capacity}")]
    StorageTooSmall { capacity: usize, storage: usize },

    #[error("cursor out of range (head {head}, len {len}, capacity {capacity})")]
    CursorOutOfRange {
        head: usize,
        len: usize,
        capacity: usize,
    },
}
