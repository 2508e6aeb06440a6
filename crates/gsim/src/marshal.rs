//! Bulk transfer of variable-length sequences across the kernel boundary.
//!
//! Wire-id lists and logic-state arrays are converted into a
//! [`TransferBuffer`] before being handed to the kernel. Sequences up to
//! [`INLINE_THRESHOLD`] elements stay inline on the stack; longer ones spill
//! to the heap. The contents are identical either way.

use smallvec::SmallVec;

/// Longest sequence transferred without a heap allocation.
pub const INLINE_THRESHOLD: usize = 64;

/// Buffer handed to the kernel.
pub type TransferBuffer<T> = SmallVec<[T; INLINE_THRESHOLD]>;

/// Storage chosen for one transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarshalStrategy {
    /// Bounded inline buffer.
    Inline,
    /// Dynamically sized heap buffer.
    Heap,
}

/// Select the storage for a sequence of `len` elements.
pub fn select_strategy(len: usize) -> MarshalStrategy {
    if len <= INLINE_THRESHOLD {
        MarshalStrategy::Inline
    } else {
        MarshalStrategy::Heap
    }
}

/// Convert every element into a transfer buffer.
pub fn marshal<S, T>(items: &[S], convert: impl FnMut(&S) -> T) -> TransferBuffer<T> {
    let buffer: TransferBuffer<T> = items.iter().map(convert).collect();
    debug_assert_eq!(
        buffer.spilled(),
        select_strategy(items.len()) == MarshalStrategy::Heap
    );
    buffer
}

/// Convert every element, stopping at the first failure.
pub fn try_marshal<S, T, E>(
    items: &[S],
    convert: impl FnMut(&S) -> Result<T, E>,
) -> Result<TransferBuffer<T>, E> {
    let buffer: TransferBuffer<T> = items.iter().map(convert).collect::<Result<_, E>>()?;
    debug_assert_eq!(
        buffer.spilled(),
        select_strategy(items.len()) == MarshalStrategy::Heap
    );
    Ok(buffer)
}
