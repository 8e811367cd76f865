// Chain validation

use crate::consensus::pow::ProofOfWork;
use crate::core::Block;

/// Validation error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Candidate chain has no blocks
    EmptyChain,
    /// Block's previous_hash is not the digest of its predecessor
    InvalidPreviousHash { index: u64 },
    /// Block's proof does not solve the puzzle against its predecessor's proof
    InvalidProofOfWork { index: u64 },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ValidationError::EmptyChain => write!(f, "Chain is empty"),
            ValidationError::InvalidPreviousHash { index } => {
                write!(f, "Block {} does not link to its predecessor", index)
            }
            ValidationError::InvalidProofOfWork { index } => {
                write!(f, "Block {} has an invalid proof of work", index)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Walks a chain checking every link and every proof.
///
/// The genesis block is taken on trust: its sentinel `previous_hash` and
/// seed proof are never checked.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainValidator {
    pow: ProofOfWork,
}

impl ChainValidator {
    /// Create a validator using the given puzzle
    pub fn new(pow: ProofOfWork) -> Self {
        Self { pow }
    }

    /// Validate a candidate chain, reporting the first bad block
    pub fn validate(&self, chain: &[Block]) -> Result<(), ValidationError> {
        if chain.is_empty() {
            return Err(ValidationError::EmptyChain);
        }

        for pair in chain.windows(2) {
            let (prev, block) = (&pair[0], &pair[1]);

            if block.previous_hash != prev.hash() {
                return Err(ValidationError::InvalidPreviousHash { index: block.index });
            }

            if !self.pow.verify(prev.proof, block.proof) {
                return Err(ValidationError::InvalidProofOfWork { index: block.index });
            }
        }

        Ok(())
    }

    /// Check if a candidate chain is valid
    pub fn is_valid(&self, chain: &[Block]) -> bool {
        match self.validate(chain) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("Rejected chain of {} blocks: {}", chain.len(), e);
                false
            }
        }
    }
}
