//! Run name generation

use uuid::Uuid;

pub const RUN_NAME_PREFIX: &str = "bolt-wf-";
pub const SUFFIX_LEN: usize = 6;

const ALPHABET: &[u8; 36] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a workflow name, `bolt-wf-` plus six lowercase alphanumerics
///
/// Randomness comes from a v4 UUID, backed by the OS generator, so concurrent
/// callers never share generator state.
pub fn run_name() -> String {
    let bytes = Uuid::new_v4().into_bytes();
    let suffix: String = bytes
        .iter()
        .take(SUFFIX_LEN)
        .map(|b| ALPHABET[usize::from(*b) % ALPHABET.len()] as char)
        .collect();
    format!("{RUN_NAME_PREFIX}{suffix}")
}
