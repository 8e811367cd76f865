// Proof of Work implementation

use crate::core::sha256_hex;
use crate::error::{ChainError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Default number of leading zero hex digits
pub const DEFAULT_DIFFICULTY: usize = 4;

/// Attempts between checks of the cancel flag and deadline
const CONTROL_POLL_INTERVAL: u64 = 1024;

/// Difficulty target: how many leading `'0'` hex digits a proof hash needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Difficulty(usize);

impl Difficulty {
    /// Create a difficulty of `zeros` leading hex zeros (at most 64)
    pub fn new(zeros: usize) -> Result<Self> {
        if zeros > 64 {
            return Err(ChainError::InvalidDifficulty(zeros));
        }
        Ok(Self(zeros))
    }

    /// Number of leading zero hex digits required
    pub fn zeros(&self) -> usize {
        self.0
    }

    /// Check if a rendered hash meets this difficulty
    pub fn is_met_by(&self, hex_hash: &str) -> bool {
        hex_hash.len() >= self.0 && hex_hash.bytes().take(self.0).all(|b| b == b'0')
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self(DEFAULT_DIFFICULTY)
    }
}

/// Shared flag used to abort a running proof search
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Stop conditions for [`ProofOfWork::mine`]
#[derive(Debug, Clone, Default)]
pub struct MiningControl {
    pub cancel: CancelFlag,
    pub deadline: Option<Instant>,
}

impl MiningControl {
    /// Control that stops only when `cancel` is raised
    pub fn new(cancel: CancelFlag) -> Self {
        Self {
            cancel,
            deadline: None,
        }
    }

    /// Also give up once `timeout` has elapsed from now
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    fn should_stop(&self) -> bool {
        self.cancel.is_cancelled()
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// Proof of Work puzzle: find `p` such that SHA256("{previous}{p}") starts
/// with the configured number of zero hex digits.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProofOfWork {
    pub difficulty: Difficulty,
}

impl ProofOfWork {
    /// Create a puzzle with the given difficulty
    pub fn new(difficulty: Difficulty) -> Self {
        Self { difficulty }
    }

    /// Hash of a candidate proof against the previous proof
    pub fn proof_hash(previous_proof: u64, proof: u64) -> String {
        let guess = format!("{}{}", previous_proof, proof);
        sha256_hex(guess.as_bytes())
    }

    /// Verify that `proof` solves the puzzle for `previous_proof`
    pub fn verify(&self, previous_proof: u64, proof: u64) -> bool {
        self.difficulty
            .is_met_by(&Self::proof_hash(previous_proof, proof))
    }

    /// Search upward from 0 for the first valid proof.
    /// Blocks until found; use [`ProofOfWork::mine`] to be able to stop it.
    pub fn find_proof(&self, previous_proof: u64) -> u64 {
        let mut proof = 0;
        while !self.verify(previous_proof, proof) {
            proof += 1;
        }
        proof
    }

    /// Search for a proof, giving up when `control` says so
    pub fn mine(&self, previous_proof: u64, control: &MiningControl) -> MiningResult {
        let start_time = Instant::now();
        let mut attempts = 0u64;

        for proof in 0..=u64::MAX {
            let hash = Self::proof_hash(previous_proof, proof);
            attempts += 1;

            if self.difficulty.is_met_by(&hash) {
                return MiningResult {
                    success: true,
                    proof,
                    hash,
                    attempts,
                    duration: start_time.elapsed(),
                };
            }

            if attempts % CONTROL_POLL_INTERVAL == 0 && control.should_stop() {
                log::debug!("Proof search stopped after {} attempts", attempts);
                break;
            }

            // Progress indicator every 100k attempts
            if attempts % 100_000 == 0 {
                let elapsed = start_time.elapsed();
                log::debug!(
                    "Mining attempts: {} ({:.1} KH/s)",
                    attempts,
                    attempts as f64 / elapsed.as_secs_f64() / 1000.0
                );
            }
        }

        MiningResult {
            success: false,
            proof: 0,
            hash: String::new(),
            attempts,
            duration: start_time.elapsed(),
        }
    }
}

/// Mining result
#[derive(Debug)]
pub struct MiningResult {
    /// Whether a proof was found
    pub success: bool,
    /// The proof that was found
    pub proof: u64,
    /// The winning puzzle hash
    pub hash: String,
    /// Number of attempts
    pub attempts: u64,
    /// Time taken
    pub duration: Duration,
}

impl MiningResult {
    /// Calculate hash rate (hashes per second)
    pub fn hash_rate(&self) -> f64 {
        self.attempts as f64 / self.duration.as_secs_f64()
    }
}
