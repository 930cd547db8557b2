//! Handle types backed by generational slot maps
//!
//! Objects and physics bodies live in slot maps; the keys handed out are
//! stable, `Copy`, hashable, and never alias a later occupant of the same slot.

use slotmap::{Key, KeyData};

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable reference to an object owned by a scene
    pub struct ObjectHandle;

    /// Stable reference to a rigid body owned by a physics scene
    pub struct BodyHandle;
}

/// Conversion between a handle and an opaque `u64` payload
///
/// Used to store a back-reference from a physics body to its owning object.
pub trait OpaqueHandle: Key {
    /// Encode the handle as an opaque value
    fn to_raw(self) -> u64 {
        self.data().as_ffi()
    }

    /// Decode a handle previously produced by [`OpaqueHandle::to_raw`]
    fn from_raw(raw: u64) -> Self {
        Self::from(KeyData::from_ffi(raw))
    }
}

impl OpaqueHandle for ObjectHandle {}
impl OpaqueHandle for BodyHandle {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_roundtrip_is_stable() {
        let mut map: SlotMap<ObjectHandle, u32> = SlotMap::with_key();
        let handle = map.insert(7);

        assert_eq!(ObjectHandle::from_raw(handle.to_raw()), handle);
    }

    #[test]
    fn test_stale_handle_does_not_alias() {
        let mut map: SlotMap<ObjectHandle, u32> = SlotMap::with_key();
        let first = map.insert(1);
        map.remove(first);
        let second = map.insert(2);

        assert_ne!(first, second);
        assert!(map.get(first).is_none());
    }
}
