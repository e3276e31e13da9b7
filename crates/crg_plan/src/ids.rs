//! Opaque ID newtypes for clock-plan entities.
//!
//! [`RefClockId`] and [`DomainId`] are thin `u32` wrappers used as arena
//! indices into the clock-domain graph. The graph owns every node; all
//! other components refer to nodes by ID or by name. Stages are keyed by
//! name alone, since they live outside the graph.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }
    };
}

define_id!(
    /// Opaque, copyable ID for an external reference-clock input.
    RefClockId
);

define_id!(
    /// Opaque, copyable ID for a clock domain in the graph.
    DomainId
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn id_roundtrip() {
        let id = DomainId::from_raw(42);
        assert_eq!(id.as_raw(), 42);
    }

    #[test]
    fn id_equality() {
        let a = DomainId::from_raw(7);
        let b = DomainId::from_raw(7);
        let c = DomainId::from_raw(8);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn id_hash_in_set() {
        let mut set = HashSet::new();
        set.insert(RefClockId::from_raw(1));
        set.insert(RefClockId::from_raw(2));
        set.insert(RefClockId::from_raw(1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn id_serde_roundtrip() {
        let id = DomainId::from_raw(99);
        let json = serde_json::to_string(&id).unwrap();
        let restored: DomainId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, restored);
    }
}
