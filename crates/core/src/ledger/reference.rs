//! Transfer reference generation.
//!
//! References are short external identifiers with no semantic content.
//! They are statistically unique, not guaranteed unique: the database
//! enforces uniqueness, and the transfer orchestration retries with a
//! fresh reference when an insert hits the constraint.

use rand::Rng;
use rand::distr::Alphanumeric;

/// Length of a transfer reference in characters.
pub const REFERENCE_LENGTH: usize = 12;

/// Maximum number of generation attempts before a transfer fails with
/// `ReferenceGenerationFailed`. With 62^12 possible references even one
/// collision is rare; two in a row means something is wrong.
pub const MAX_REFERENCE_ATTEMPTS: u32 = 5;

/// Generates 12-character alphanumeric transfer references.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceGenerator;

impl ReferenceGenerator {
    /// Generates a new reference from the thread-local RNG.
    #[must_use]
    pub fn generate() -> String {
        Self::generate_with(&mut rand::rng())
    }

    /// Generates a new reference from the given RNG.
    ///
    /// Split out so tests can pass a seeded generator.
    pub fn generate_with<R: Rng>(rng: &mut R) -> String {
        rng.sample_iter(Alphanumeric)
            .take(REFERENCE_LENGTH)
            .map(char::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn test_reference_length() {
        assert_eq!(ReferenceGenerator::generate().len(), REFERENCE_LENGTH);
    }

    #[test]
    fn test_reference_charset_is_alphanumeric() {
        for _ in 0..100 {
            let reference = ReferenceGenerator::generate();
            assert!(reference.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_references_are_distinct_in_practice() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            assert!(seen.insert(ReferenceGenerator::generate()));
        }
    }

    #[test]
    fn test_seeded_generator_is_deterministic() {
        let a = ReferenceGenerator::generate_with(&mut StdRng::seed_from_u64(7));
        let b = ReferenceGenerator::generate_with(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = ReferenceGenerator::generate_with(&mut StdRng::seed_from_u64(1));
        let b = ReferenceGenerator::generate_with(&mut StdRng::seed_from_u64(2));
        assert_ne!(a, b);
    }
}
