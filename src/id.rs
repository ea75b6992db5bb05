//! Node identifier generation.
//!
//! Ids are `<kind prefix>_<time>_<random>` strings: the prefix keeps them
//! valid as CSS identifiers, the millisecond timestamp orders them loosely by
//! creation, and the random suffix makes collisions between editors working
//! on the same document practically impossible.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::tree::node::NodeKind;

/// Source of fresh node ids.
pub trait IdGenerator {
    /// Produce a new id for a node of the given kind. Never repeats.
    fn next_id(&mut self, kind: NodeKind) -> String;
}

/// Time + random suffix ids. The default generator.
#[derive(Debug, Clone)]
pub struct RandomIds {
    suffix_len: usize,
}

impl Default for RandomIds {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomIds {
    /// Create a generator with an 8-character random suffix.
    pub fn new() -> Self {
        Self { suffix_len: 8 }
    }

    /// Set the random suffix length (builder). Values below 4 are raised to 4.
    pub fn with_suffix_len(mut self, len: usize) -> Self {
        self.suffix_len = len.max(4);
        self
    }
}

impl IdGenerator for RandomIds {
    fn next_id(&mut self, kind: NodeKind) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(self.suffix_len)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect();
        format!("{}_{}_{}", kind.id_prefix(), to_base36(millis), suffix)
    }
}

/// Deterministic `<prefix>_<n>` ids, for tests and reproducible fixtures.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self, kind: NodeKind) -> String {
        self.next += 1;
        format!("{}_{}", kind.id_prefix(), self.next)
    }
}

fn to_base36(mut value: u128) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_owned();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}
