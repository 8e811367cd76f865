// Transaction data structure

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A transfer recorded in the ledger.
///
/// Transactions carry no identity beyond their content and are never
/// validated: any sender, recipient or amount is accepted. The amount is
/// any JSON number, integral or fractional, of either sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: Number,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: impl Into<Number>,
    ) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount: amount.into(),
        }
    }

    /// Mining reward paid by the network (sender "0")
    pub fn reward(recipient: impl Into<String>, amount: impl Into<Number>) -> Self {
        Self::new(REWARD_SENDER, recipient, amount)
    }

    /// Check if this transaction is a mining reward
    pub fn is_reward(&self) -> bool {
        self.sender == REWARD_SENDER
    }
}

/// Sender used for mining rewards
pub const REWARD_SENDER: &str = "0";
