//! # Larkspur Core
//!
//! Shared math layer for the Larkspur scene crates: `nalgebra`-backed type
//! aliases plus the TRS and quaternion helpers the hierarchy engine uses to
//! compose world transforms.

pub mod math;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
