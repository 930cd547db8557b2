//! Object kind tags

use std::fmt;

/// Type tag carried by every scene object
///
/// Collision hooks compare the kind of the other participant to decide how
/// to react ("did a projectile hit me").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectKind(&'static str);

impl ObjectKind {
    /// Create a kind from a unique, namespaced name
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROCK: ObjectKind = ObjectKind::new("test.rock");

    #[test]
    fn test_kinds_compare_by_name() {
        assert_eq!(ROCK, ObjectKind::new("test.rock"));
        assert_ne!(ROCK, ObjectKind::new("test.ship"));
        assert_eq!(ROCK.to_string(), "test.rock");
    }
}
