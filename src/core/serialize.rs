// Canonical block encoding
//
// The digest of a block is taken over this exact text, so every node must
// produce it byte for byte. Keys are emitted in lexicographic order by hand
// rather than relying on a serializer's map ordering, and the timestamp is
// always rendered with six fractional digits.

use crate::core::{Block, Transaction};

/// Fractional digits used when rendering timestamps
pub const TIMESTAMP_PRECISION: usize = 6;

/// Trait for types with a canonical text form
pub trait Canonical {
    fn write_canonical(&self, out: &mut String);

    fn canonical_string(&self) -> String {
        let mut out = String::new();
        self.write_canonical(&mut out);
        out
    }

    fn canonical_bytes(&self) -> Vec<u8> {
        self.canonical_string().into_bytes()
    }
}

/// Append a JSON string literal with standard escaping
pub fn write_json_str(out: &mut String, value: &str) {
    out.push_str(&serde_json::Value::from(value).to_string());
}

/// Render a timestamp with fixed precision
pub fn format_timestamp(timestamp: f64) -> String {
    format!("{:.*}", TIMESTAMP_PRECISION, timestamp)
}

impl Canonical for Transaction {
    // amount < recipient < sender
    fn write_canonical(&self, out: &mut String) {
        out.push_str("{\"amount\":");
        out.push_str(&self.amount.to_string());
        out.push_str(",\"recipient\":");
        write_json_str(out, &self.recipient);
        out.push_str(",\"sender\":");
        write_json_str(out, &self.sender);
        out.push('}');
    }
}

impl Canonical for Block {
    // index < previous_hash < proof < timestamp < transactions
    fn write_canonical(&self, out: &mut String) {
        out.push_str("{\"index\":");
        out.push_str(&self.index.to_string());
        out.push_str(",\"previous_hash\":");
        write_json_str(out, &self.previous_hash);
        out.push_str(",\"proof\":");
        out.push_str(&self.proof.to_string());
        out.push_str(",\"timestamp\":");
        out.push_str(&format_timestamp(self.timestamp));
        out.push_str(",\"transactions\":[");
        for (i, tx) in self.transactions.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            tx.write_canonical(out);
        }
        out.push_str("]}");
    }
}
