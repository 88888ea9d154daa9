//! Confirmation codes: short human-presentable tokens handed to the customer
//! at reservation time and read back by staff at pickup.

use rand::Rng;
use serde::{Deserialize, Serialize};

use shelflife_core::{DomainError, DomainResult};

/// Number of decimal digits in a confirmation code.
pub const CODE_DIGITS: usize = 6;

/// A 6-digit confirmation token. Unique among all reservations; the engine
/// enforces uniqueness with a generate-and-check loop against the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfirmationCode(String);

impl ConfirmationCode {
    pub fn parse(s: &str) -> DomainResult<Self> {
        if s.len() != CODE_DIGITS || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::validation(format!(
                "confirmation code must be exactly {CODE_DIGITS} digits"
            )));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ConfirmationCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Source of candidate confirmation codes.
///
/// Implementations produce candidates only; uniqueness is the engine's job
/// (bounded retry against the repository's constraint).
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> ConfirmationCode;
}

impl<G> CodeGenerator for std::sync::Arc<G>
where
    G: CodeGenerator + ?Sized,
{
    fn generate(&self) -> ConfirmationCode {
        (**self).generate()
    }
}

/// Uniform random codes. Production implementation.
#[derive(Debug, Default, Copy, Clone)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> ConfirmationCode {
        let n: u32 = rand::thread_rng().gen_range(0..1_000_000);
        ConfirmationCode(format!("{n:06}"))
    }
}

/// Deterministic counter-based codes for tests.
#[derive(Debug, Default)]
pub struct SequentialCodeGenerator {
    next: std::sync::atomic::AtomicU32,
}

impl SequentialCodeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the counter at a chosen value (handy for forcing collisions).
    pub fn starting_at(n: u32) -> Self {
        Self {
            next: std::sync::atomic::AtomicU32::new(n),
        }
    }
}

impl CodeGenerator for SequentialCodeGenerator {
    fn generate(&self) -> ConfirmationCode {
        let n = self
            .next
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed)
            % 1_000_000;
        ConfirmationCode(format!("{n:06}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_six_digits() {
        let code = ConfirmationCode::parse("007312").unwrap();
        assert_eq!(code.as_str(), "007312");
    }

    #[test]
    fn parse_rejects_wrong_length_and_non_digits() {
        assert!(ConfirmationCode::parse("12345").is_err());
        assert!(ConfirmationCode::parse("1234567").is_err());
        assert!(ConfirmationCode::parse("12a456").is_err());
    }

    #[test]
    fn random_codes_are_well_formed() {
        let generator = RandomCodeGenerator;
        for _ in 0..100 {
            let code = generator.generate();
            assert!(ConfirmationCode::parse(code.as_str()).is_ok());
        }
    }

    #[test]
    fn sequential_codes_count_up() {
        let generator = SequentialCodeGenerator::starting_at(41);
        assert_eq!(generator.generate().as_str(), "000041");
        assert_eq!(generator.generate().as_str(), "000042");
    }
}
