//! Migration checksums
//!
//! Line endings are normalized first so a CRLF checkout of the same SQL
//! records the same checksum.

use sha2::{Digest, Sha256};

pub fn compute_checksum(content: &str) -> String {
    let normalized = content.replace("\r\n", "\n");
    hex::encode(Sha256::digest(normalized.as_bytes()))
}
