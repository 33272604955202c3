//! compression/dict.rs
//! Fixed-capacity dictionary slot and sample-table training.
//!
//! The slot mirrors the header's dictionary field byte for byte: it is always
//! `MAX_DICTIONARY_SIZE` long and only the first `used` bytes are meaningful.

use tracing::info;

use crate::compression::types::CompressionError;
use crate::constants::{MAX_DICTIONARY_SIZE, TRAINING_CAP_FACTOR};

pub struct Dictionary {
    slot: Box<[u8]>,
    used: usize,
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl Dictionary {
    /// Zero-filled slot, no dictionary.
    pub fn new() -> Self {
        Self { slot: vec![0u8; MAX_DICTIONARY_SIZE].into_boxed_slice(), used: 0 }
    }

    /// Empty placeholder left behind at teardown; holds no slot memory.
    pub fn released() -> Self {
        Self { slot: Box::default(), used: 0 }
    }

    /// Restore from a header slot and its recorded size.
    pub fn from_slot(slot: Box<[u8]>, used: usize) -> Result<Self, CompressionError> {
        if slot.len() != MAX_DICTIONARY_SIZE || used > MAX_DICTIONARY_SIZE {
            return Err(CompressionError::DictionaryTooLarge { have: used.max(slot.len()), max: MAX_DICTIONARY_SIZE });
        }
        Ok(Self { slot, used })
    }

    /// Replace the contents; the tail of the slot is zeroed.
    pub fn set(&mut self, bytes: &[u8]) -> Result<(), CompressionError> {
        if bytes.len() > MAX_DICTIONARY_SIZE {
            return Err(CompressionError::DictionaryTooLarge { have: bytes.len(), max: MAX_DICTIONARY_SIZE });
        }
        self.slot[..bytes.len()].copy_from_slice(bytes);
        self.slot[bytes.len()..].fill(0);
        self.used = bytes.len();
        Ok(())
    }

    /// Valid dictionary bytes (empty when none).
    pub fn as_bytes(&self) -> &[u8] {
        &self.slot[..self.used]
    }

    /// Dictionary bytes for engine priming, `None` when no dictionary is bound.
    pub fn for_engine(&self) -> Option<&[u8]> {
        (self.used > 0).then(|| self.as_bytes())
    }

    /// The full padded slot, as persisted in the header.
    pub fn slot(&self) -> &[u8] {
        &self.slot
    }

    pub fn used(&self) -> usize {
        self.used
    }

    pub fn is_empty(&self) -> bool {
        self.used == 0
    }
}

/// Equal-sized sample plan derived from a training request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplePlan {
    pub sample_size: usize,
    pub sample_count: usize,
}

impl SamplePlan {
    /// `used = min(total, MAX_DICTIONARY_SIZE * TRAINING_CAP_FACTOR)`,
    /// `count = used / sample_size`.
    pub fn new(sample_size: usize, total_size: usize) -> Self {
        let used = total_size.min(MAX_DICTIONARY_SIZE * TRAINING_CAP_FACTOR);
        let sample_count = if sample_size == 0 { 0 } else { used / sample_size };
        Self { sample_size, sample_count }
    }

    /// Bytes of the source actually fed to the trainer.
    pub fn span(&self) -> usize {
        self.sample_size * self.sample_count
    }

    pub fn sizes(&self) -> Vec<usize> {
        vec![self.sample_size; self.sample_count]
    }
}

/// Train a dictionary of at most `MAX_DICTIONARY_SIZE` bytes from `source`.
///
/// `source` must hold at least `plan.span()` bytes.
pub fn train_dictionary(source: &[u8], plan: &SamplePlan) -> Result<Vec<u8>, CompressionError> {
    let span = plan.span();
    if plan.sample_count == 0 || source.len() < span {
        return Err(CompressionError::TrainingFailed {
            msg: format!("{} samples of {} bytes over {} source bytes", plan.sample_count, plan.sample_size, source.len()),
        });
    }

    let sizes = plan.sizes();
    let dict = zstd::dict::from_continuous(&source[..span], &sizes, MAX_DICTIONARY_SIZE)
        .map_err(|e| CompressionError::TrainingFailed { msg: e.to_string() })?;

    info!(samples = plan.sample_count, sample_size = plan.sample_size, dict_len = dict.len(), "dictionary trained");
    Ok(dict)
}
