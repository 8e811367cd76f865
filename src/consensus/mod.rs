// Consensus: proof of work, chain validation and peer reconciliation

pub mod pow;
pub mod resolve;
pub mod validation;

pub use pow::{CancelFlag, DEFAULT_DIFFICULTY, Difficulty, MiningControl, MiningResult, ProofOfWork};
pub use resolve::Consensus;
pub use validation::{ChainValidator, ValidationError};
