//! Word selection for new dictation tasks.
//!
//! A task's words come from exactly one [`WordSource`], checked in priority
//! order: an explicit list, a curriculum unit, then smart selection.

use anyhow::Result;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::CurriculumPosition;

/// Where the words for a new task come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordSource {
    /// Use these words verbatim, duplicates and all.
    Explicit(Vec<String>),
    /// Sample from the catalog words of this unit at the child's position.
    Unit(i64),
    /// No input given. Not defined yet; yields no words.
    Smart,
}

impl WordSource {
    /// Resolve the source from optional request fields. An explicit list wins
    /// over a unit, even when the list is empty.
    pub fn from_request(words: Option<Vec<String>>, unit: Option<i64>) -> Self {
        match (words, unit) {
            (Some(words), _) => Self::Explicit(words),
            (None, Some(unit)) => Self::Unit(unit),
            (None, None) => Self::Smart,
        }
    }
}

/// Lookup of catalog words for a textbook unit.
pub trait CurriculumLookup {
    /// All words filed under `unit` at `position`, in catalog order.
    fn unit_words(&self, position: &CurriculumPosition, unit: i64) -> Result<Vec<String>>;
}

/// Choose the words for a new dictation task.
///
/// In unit mode, when the unit holds more than `target_count` words a uniform
/// sample of exactly `target_count` distinct entries is drawn; otherwise every
/// word of the unit is used. A negative `target_count` counts as zero.
///
/// Only a failing `lookup` produces an error.
pub fn select_words<L, R>(
    source: WordSource,
    position: &CurriculumPosition,
    lookup: &L,
    target_count: i64,
    rng: &mut R,
) -> Result<Vec<String>>
where
    L: CurriculumLookup + ?Sized,
    R: Rng + ?Sized,
{
    match source {
        WordSource::Explicit(words) => Ok(words),
        WordSource::Unit(unit) => {
            let words = lookup.unit_words(position, unit)?;
            let target = usize::try_from(target_count).unwrap_or(0);
            if words.len() > target {
                tracing::debug!(
                    "Sampling {} of {} words from unit {}",
                    target,
                    words.len(),
                    unit
                );
                Ok(words.choose_multiple(rng, target).cloned().collect())
            } else {
                Ok(words)
            }
        }
        WordSource::Smart => {
            tracing::debug!("Smart selection requested; no strategy defined");
            Ok(Vec::new())
        }
    }
}
