//! Session identifier generation.
//!
//! Format: `sid_{YYYYMMDDHHMMSSffffff}_{suffix}` where the timestamp is UTC
//! with microsecond resolution and the suffix is 8 random characters from
//! `[a-z0-9]`. Generation is purely local; the store is never consulted.

use chrono::Utc;
use rand::Rng;

const SESSION_ID_PREFIX: &str = "sid";
const SUFFIX_LEN: usize = 8;
const SUFFIX_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a new opaque session identifier.
pub fn generate_session_id() -> String {
    let timestamp = Utc::now().format("%Y%m%d%H%M%S%6f");
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_CHARSET[rng.gen_range(0..SUFFIX_CHARSET.len())] as char)
        .collect();
    format!("{SESSION_ID_PREFIX}_{timestamp}_{suffix}")
}
