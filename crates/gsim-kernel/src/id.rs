//! Opaque handles for simulations, components, and wires.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Process-unique identifier of one simulation instance. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SimulationHandle(u64);

static NEXT_SIMULATION: AtomicU64 = AtomicU64::new(1);

impl SimulationHandle {
    /// Allocate a fresh handle.
    pub fn next() -> Self {
        SimulationHandle(NEXT_SIMULATION.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SimulationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sim#{}", self.0)
    }
}

/// Keys stored in an [`Arena`](crate::arena::Arena): a slot index plus the
/// slot generation it was issued for.
pub trait ArenaKey: Copy + Eq {
    fn from_parts(index: u32, generation: u32) -> Self;
    fn index(self) -> u32;
    fn generation(self) -> u32;
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw boundary value.
            pub fn from_raw(raw: u64) -> Self {
                $name(raw)
            }

            /// Raw boundary value: generation in the high half, index in the low half.
            pub fn raw(self) -> u64 {
                self.0
            }
        }

        impl ArenaKey for $name {
            fn from_parts(index: u32, generation: u32) -> Self {
                $name((u64::from(generation) << 32) | u64::from(index))
            }

            fn index(self) -> u32 {
                self.0 as u32
            }

            fn generation(self) -> u32 {
                (self.0 >> 32) as u32
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}v{}", $prefix, self.index(), self.generation())
            }
        }
    };
}

entity_id!(
    /// Component identifier, unique within one simulation.
    ComponentId,
    "c"
);

entity_id!(
    /// Wire identifier, unique within one simulation.
    WireId,
    "w"
);
