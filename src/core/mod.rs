// Core ledger data structures

mod transaction;
mod block;
mod blockchain;
mod serialize;
mod hash;

pub use transaction::*;
pub use block::*;
pub use blockchain::Blockchain;
pub use serialize::*;
pub use hash::*;
