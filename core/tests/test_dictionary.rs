#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use rand::{rngs::StdRng, Rng, SeedableRng};
    use tempfile::tempdir;
    use zstore_core::{
        constants::{HEADER_LEN, MAX_DICTIONARY_SIZE},
        session::{Mode, Session, SessionError},
        types::StoreError,
    };

    fn records(count: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(count * 64);
        for i in 0..count {
            let line = format!("{{\"id\":{:08},\"name\":\"user-{:04}\",\"score\":{:6.2}}}", i, i % 1000, (i % 613) as f64 / 7.0);
            let mut rec = line.into_bytes();
            rec.resize(64, b' ');
            out.extend_from_slice(&rec);
        }
        out
    }

    fn store_trained(path: &Path, data: &[u8], sample: usize) -> anyhow::Result<Vec<u8>> {
        let mut s = Session::open(Mode::Store, path)?;
        s.train(data, sample, data.len())?;
        let dict = s.dictionary().to_vec();
        s.write(data)?;
        s.close()?;
        Ok(dict)
    }

    #[test]
    fn trained_dictionary_round_trips() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("dict.zst");
        let data = records(8192);

        let dict = store_trained(&path, &data, 64)?;
        assert!(!dict.is_empty() && dict.len() <= MAX_DICTIONARY_SIZE);

        let mut s = Session::open(Mode::Load, &path)?;
        assert_eq!(s.dictionary(), &dict[..]);
        let mut out = vec![0u8; data.len()];
        s.read(&mut out)?;
        s.close()?;
        assert_eq!(out, data);
        Ok(())
    }

    #[test]
    fn training_is_deterministic() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let data = records(8192);

        let a = dir.path().join("a.zst");
        let b = dir.path().join("b.zst");
        let dict_a = store_trained(&a, &data, 64)?;
        let dict_b = store_trained(&b, &data, 64)?;

        assert_eq!(dict_a, dict_b);
        assert_eq!(fs::read(&a)?, fs::read(&b)?);
        Ok(())
    }

    #[test]
    fn dropped_store_session_still_persists_dictionary() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("dropped.zst");
        let data = records(4096);

        let dict = {
            let mut s = Session::open(Mode::Store, &path)?;
            s.train(&data, 64, data.len())?;
            s.write(&data)?;
            s.dictionary().to_vec()
        };

        let mut s = Session::open(Mode::Load, &path)?;
        assert_eq!(s.dictionary(), &dict[..]);
        let mut out = vec![0u8; data.len()];
        s.read(&mut out)?;
        assert_eq!(out, data);
        Ok(())
    }

    #[test]
    fn training_volume_is_capped() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("cap.zst");
        // Larger than MAX_DICTIONARY_SIZE * TRAINING_CAP_FACTOR; only the
        // capped prefix is sampled.
        let data = records(110_000);

        let mut s = Session::open(Mode::Store, &path)?;
        s.train(&data, 64, data.len())?;
        assert!(!s.dictionary().is_empty());
        s.close()?;
        Ok(())
    }

    #[test]
    fn train_rejects_bad_arguments() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let data = records(64);
        let mut s = Session::open(Mode::Store, dir.path().join("args.zst"))?;

        for (sample, total) in [(0usize, data.len()), (64, 0), (64, data.len() + 1), (data.len() + 1, data.len())] {
            let err = s.train(&data, sample, total).err().expect("invalid training arguments");
            assert!(matches!(err, StoreError::Session(SessionError::InvalidArgument(_))), "{err}");
        }
        assert!(!s.is_poisoned());
        assert!(s.dictionary().is_empty());
        s.close()?;
        Ok(())
    }

    #[test]
    fn train_after_write_is_rejected() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let data = records(2048);
        let mut s = Session::open(Mode::Store, dir.path().join("late.zst"))?;
        s.write(b"already streaming")?;

        let err = s.train(&data, 64, data.len()).err().expect("train after write");
        assert!(matches!(err, StoreError::Session(SessionError::TrainAfterWrite { written: 17 })), "{err}");
        s.close()?;
        Ok(())
    }

    #[test]
    fn train_in_load_mode_is_rejected() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("load.zst");
        Session::open(Mode::Store, &path)?.close()?;

        let data = records(2048);
        let mut s = Session::open(Mode::Load, &path)?;
        let err = s.train(&data, 64, data.len()).err().expect("train in load mode");
        assert!(matches!(err, StoreError::Session(SessionError::WrongMode { .. })), "{err}");
        Ok(())
    }

    /// 16 MiB of random doubles, trained with 8-byte samples, stored as a
    /// length-prefixed record and read back with a single 16 MiB request.
    #[test]
    fn sixteen_mib_of_doubles() -> anyhow::Result<()> {
        const COUNT: usize = 2 * 1024 * 1024;
        let dir = tempdir()?;
        let path = dir.path().join("doubles.zst");

        let mut rng = StdRng::seed_from_u64(0x5eed);
        let values: Vec<f64> = (0..COUNT).map(|_| rng.gen::<f64>()).collect();
        let mut bytes: Vec<u8> = bytemuck::cast_slice(&values).to_vec();
        assert_eq!(bytes.len(), 16 * 1024 * 1024);

        let mut s = Session::open(Mode::Store, &path)?;
        s.train(&bytes, std::mem::size_of::<f64>(), bytes.len())?;
        s.record_heap(&mut bytes)?;
        s.close()?;
        assert!(fs::metadata(&path)?.len() as usize > HEADER_LEN);

        let mut s = Session::open(Mode::Load, &path)?;
        let mut len = 0u64;
        s.record_value(&mut len)?;
        assert_eq!(len as usize, bytes.len());

        // Small prefix read left a window behind; drain it, then one request for the rest.
        let mut back = vec![0u8; bytes.len()];
        s.read_draining(&mut back)?;
        s.close()?;

        let restored = back
            .chunks_exact(8)
            .map(|c| f64::from_ne_bytes(c.try_into().expect("8-byte chunk")));
        for (i, (a, b)) in values.iter().zip(restored).enumerate() {
            assert_eq!(a.to_bits(), b.to_bits(), "element {i}");
        }
        Ok(())
    }
}
