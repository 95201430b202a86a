use rand::Rng;

use crate::error::GenError;
use crate::registry::IdRegistry;
use crate::transaction::{TransactionRecord, TransactionRecordType, MAX_AMOUNT};

/// Upper bound (inclusive) of the draw deciding whether an id is reused.
pub const REUSE_DRAW_MAX: u8 = 10;
/// Draws below this value reuse a known id, so reuse happens 8 times in 11.
pub const REUSE_THRESHOLD: u8 = 8;
/// Records reserved up front by `generate`; larger runs grow the buffer.
const MAX_PREALLOCATED_RECORDS: usize = 1 << 20;

/// How the transaction ids of a run were obtained.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    /// Records that received a brand-new id
    pub minted: u64,
    /// Records that received an id allocated by an earlier record
    pub reused: u64,
}

impl RunStats {
    #[must_use]
    pub fn total(&self) -> u64 {
        self.minted + self.reused
    }
}

/// Produces random [`TransactionRecord`]s, deciding for each one whether it
/// gets a fresh transaction id or points at one handed out earlier.
#[derive(Debug)]
pub struct Synthesizer<R> {
    rng: R,
    registry: IdRegistry,
    stats: RunStats,
}

impl<R: Rng> Synthesizer<R> {
    #[must_use]
    pub fn new(rng: R) -> Self {
        Synthesizer::with_registry(rng, IdRegistry::default())
    }

    #[must_use]
    pub fn with_registry(rng: R, registry: IdRegistry) -> Self {
        Synthesizer {
            rng,
            registry,
            stats: RunStats::default(),
        }
    }

    /// # Errors
    /// Fails only when the registry cannot find a free transaction id.
    pub fn next_record(&mut self) -> Result<TransactionRecord, GenError> {
        let client_id: u16 = self.rng.gen();
        let transaction_type: TransactionRecordType = self.rng.gen();
        let reuse_draw = self.rng.gen_range(0..=REUSE_DRAW_MAX);

        let transaction_id =
            if reuse_draw < REUSE_THRESHOLD && transaction_type.refers_to_prior_tx() {
                let known = self.registry.len();
                let id = self.registry.pick_existing(&mut self.rng)?;
                if self.registry.len() == known {
                    self.stats.reused += 1;
                } else {
                    self.stats.minted += 1;
                }
                id
            } else {
                let id = self.registry.allocate_unique(&mut self.rng)?;
                self.stats.minted += 1;
                id
            };

        let amount = self.rng.gen_range(0..=MAX_AMOUNT);

        Ok(TransactionRecord::new(
            transaction_type,
            client_id,
            transaction_id,
            amount,
        ))
    }

    /// Synthesizes `count` records and keeps all of them in memory.
    ///
    /// # Errors
    /// See [`Synthesizer::next_record`].
    pub fn generate(&mut self, count: usize) -> Result<Vec<TransactionRecord>, GenError> {
        let mut records = Vec::with_capacity(count.min(MAX_PREALLOCATED_RECORDS));
        for _ in 0..count {
            records.push(self.next_record()?);
        }
        Ok(records)
    }

    /// Lazily synthesizes `count` records.
    pub fn records(
        &mut self,
        count: usize,
    ) -> impl Iterator<Item = Result<TransactionRecord, GenError>> + '_ {
        (0..count).map(move |_| self.next_record())
    }

    #[must_use]
    pub fn registry(&self) -> &IdRegistry {
        &self.registry
    }

    #[must_use]
    pub fn stats(&self) -> RunStats {
        self.stats
    }
}
