/*
 * SHA256 checksums for dictionary documents. The checksum identifies the exact
 * bytes a `Dictionary` was built from, so a reload of unchanged content can
 * keep the existing character-set cache instead of rebuilding it.
 */
use sha2::{Digest, Sha256};

/*
 * Calculates the SHA256 checksum of `bytes` and returns it as a lowercase
 * hex-encoded string.
 */
pub fn calculate_sha256_checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let hex_checksum = format!("{:x}", hasher.finalize());
    log::trace!(
        "ChecksumUtils: Checksum {} for {} bytes",
        hex_checksum,
        bytes.len()
    );
    hex_checksum
}
