//! session/train.rs
//! Dictionary training bound into a store session.

use std::time::Instant;

use tracing::info;

use crate::compression::codecs::ZstdStreamEncoder;
use crate::compression::{train_dictionary, SamplePlan};
use crate::session::config::validate_level;
use crate::session::context::Session;
use crate::session::types::{Mode, SessionError};
use crate::telemetry::Stage;
use crate::types::StoreError;

impl Session {
    /// Train a dictionary from `source[..total_size]` cut into `sample_size`
    /// samples and prime the encoder with it.
    ///
    /// Must run before the first write. The training volume is capped at
    /// `MAX_DICTIONARY_SIZE * TRAINING_CAP_FACTOR` bytes; a trailing partial
    /// sample is ignored. The dictionary is persisted by `close`.
    pub fn train(&mut self, source: &[u8], sample_size: usize, total_size: usize) -> Result<(), StoreError> {
        self.ensure_mode(Mode::Store, "train")?;
        self.ensure_usable()?;
        if sample_size == 0 || total_size == 0 {
            return Err(SessionError::InvalidArgument(format!(
                "sample_size ({sample_size}) and total_size ({total_size}) must be non-zero"
            ))
            .into());
        }
        if total_size > source.len() {
            return Err(SessionError::InvalidArgument(format!(
                "total_size {total_size} exceeds source length {}",
                source.len()
            ))
            .into());
        }
        if self.written > 0 {
            return Err(SessionError::TrainAfterWrite { written: self.written }.into());
        }
        let plan = SamplePlan::new(sample_size, total_size);
        if plan.sample_count == 0 {
            return Err(SessionError::InvalidArgument(format!(
                "sample_size {sample_size} leaves no complete sample in {total_size} bytes"
            ))
            .into());
        }

        let result = self.train_inner(source, &plan);
        self.track("train", result)
    }

    fn train_inner(&mut self, source: &[u8], plan: &SamplePlan) -> Result<(), StoreError> {
        let started = Instant::now();
        let trained = train_dictionary(source, plan)?;
        self.dictionary.set(&trained)?;
        self.encoder = Some(ZstdStreamEncoder::boxed(self.level, self.dictionary.for_engine())?);
        self.timer.record_since(Stage::Train, started);
        info!(dict_len = self.dictionary.used(), samples = plan.sample_count, "encoder primed with trained dictionary");
        Ok(())
    }

    /// Compression level of the store encoder.
    pub fn compression_level(&self) -> i32 {
        self.level
    }

    /// Change the compression level. Store mode, before the first write.
    pub fn set_compression_level(&mut self, level: i32) -> Result<(), StoreError> {
        self.ensure_mode(Mode::Store, "set_compression_level")?;
        self.ensure_usable()?;
        validate_level(level)?;
        if self.written > 0 {
            return Err(SessionError::LevelAfterWrite { written: self.written }.into());
        }
        let encoder = self.encoder.as_mut().ok_or(SessionError::Closed)?;
        let result = encoder.set_level(level).map_err(StoreError::from);
        if result.is_ok() {
            self.level = level;
        }
        self.track("set_compression_level", result)
    }
}
