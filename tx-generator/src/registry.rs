use std::collections::HashSet;

use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::GenError;

/// Collision retries allowed before `allocate_unique` gives up.
pub const DEFAULT_MAX_RETRIES: u32 = 1_000;

/// Every transaction id handed out during one generation run.
///
/// Ids are kept twice: a set for membership checks and a list so that a
/// uniformly random known id can be picked without walking the set.
#[derive(Debug)]
pub struct IdRegistry {
    known: HashSet<u32>,
    ids: Vec<u32>,
    max_retries: u32,
}

impl Default for IdRegistry {
    fn default() -> Self {
        IdRegistry::with_max_retries(DEFAULT_MAX_RETRIES)
    }
}

impl IdRegistry {
    #[must_use]
    pub fn with_max_retries(max_retries: u32) -> Self {
        IdRegistry {
            known: HashSet::new(),
            ids: Vec::new(),
            max_retries,
        }
    }

    /// Draws ids until one is found that was never allocated, records it and
    /// returns it.
    ///
    /// # Errors
    /// Returns [`GenError::IdSpaceExhausted`] when the first draw and all
    /// `max_retries` retries hit ids that are already allocated.
    pub fn allocate_unique<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<u32, GenError> {
        for _ in 0..=self.max_retries {
            let id: u32 = rng.gen();
            if self.known.insert(id) {
                self.ids.push(id);
                return Ok(id);
            }
        }
        warn!(
            "Gave up looking for a free transaction id with {} ids allocated",
            self.ids.len()
        );
        Err(GenError::IdSpaceExhausted {
            attempts: self.max_retries.saturating_add(1),
            allocated: self.ids.len(),
        })
    }

    /// Returns a uniformly chosen id that was already allocated.
    ///
    /// On an empty registry there is nothing to reuse, so a new id is
    /// allocated instead. Either way the returned id is in the registry once
    /// this returns.
    ///
    /// # Errors
    /// Only when falling back to [`IdRegistry::allocate_unique`] fails.
    pub fn pick_existing<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<u32, GenError> {
        match self.ids.choose(rng) {
            Some(&id) => Ok(id),
            None => {
                debug!("Registry is empty, minting a new id instead of reusing one");
                self.allocate_unique(rng)
            }
        }
    }

    #[must_use]
    pub fn contains(&self, id: u32) -> bool {
        self.known.contains(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
