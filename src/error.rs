use core::fmt;

/// Errors reported by fallible [`Vector`](crate::vector::Vector) operations.
///
/// Checked failures never mutate observable container state; contract
/// violations (unchecked indexing past the live range, `front`/`back` on an
/// empty container) panic instead of reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VectorError {
    /// A checked access or an insertion position referenced a slot at or past
    /// the end of the live range.
    OutOfRange {
        /// The requested slot index.
        index: usize,
        /// Number of live elements at the time of the call.
        len: usize,
    },
    /// The allocator refused to provide a block of the requested size.
    AllocFailed {
        /// Size of the refused request, in bytes.
        size: usize,
    },
    /// The required capacity does not fit in the address space.
    CapacityOverflow,
}

impl fmt::Display for VectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index, len } => {
                write!(f, "index out of range: index {index}, len {len}")
            }
            Self::AllocFailed { size } => {
                write!(f, "failed to allocate {size} bytes")
            }
            Self::CapacityOverflow => write!(f, "required capacity overflows usize"),
        }
    }
}

impl std::error::Error for VectorError {}
