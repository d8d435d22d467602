//! Deterministic stand-ins for the injected clock and randomness.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::clock::Clock;
use crate::config::Config;
use crate::ids::RandomSource;
use crate::storage::memory::MemoryStore;
use crate::App;

/// Yields the given bytes in order, cycling when they run out.
pub struct SequenceRandom {
    bytes: Vec<u8>,
    drawn: AtomicUsize,
}

impl SequenceRandom {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        assert!(!bytes.is_empty());
        SequenceRandom {
            bytes,
            drawn: AtomicUsize::new(0),
        }
    }

    /// Total number of bytes handed out so far.
    pub fn drawn(&self) -> usize {
        self.drawn.load(Ordering::SeqCst)
    }
}

impl RandomSource for SequenceRandom {
    fn fill(&self, buf: &mut [u8]) {
        let start = self.drawn.fetch_add(buf.len(), Ordering::SeqCst);
        for (i, b) in buf.iter_mut().enumerate() {
            *b = self.bytes[(start + i) % self.bytes.len()];
        }
    }
}

pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

pub const NOW: i64 = 1_757_000_000_000;

const TEST_CONFIG: &str = r#"
base_url = "https://pb.example.com/"
port = 0

[limits]
max_upload_size = 65536

[storage]
kind = "memory"
"#;

/// App over an empty memory store, a fixed clock and the given bytes.
pub fn test_app(random: SequenceRandom) -> App {
    App {
        config: Config::parse(TEST_CONFIG).unwrap(),
        store: MemoryStore::new().into(),
        random: Arc::new(random),
        clock: Arc::new(FixedClock(NOW)),
    }
}
