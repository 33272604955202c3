#[cfg(test)]
mod tests {
    use std::path::Path;

    use rand::{rngs::StdRng, Rng, SeedableRng};
    use tempfile::tempdir;
    use zstore_core::{
        constants::HEADER_LEN,
        session::{close, Mode, Session, SessionConfig},
    };

    fn payload(len: usize, seed: u64) -> Vec<u8> {
        let mut rng = StdRng::seed_from_u64(seed);
        let words: [&[u8]; 6] = [b"alpha ", b"beta ", b"gamma ", b"delta ", b"epsilon ", b"zeta "];
        let mut out = Vec::with_capacity(len + 8);
        while out.len() < len {
            if rng.gen_bool(0.2) {
                out.push(rng.gen());
            } else {
                out.extend_from_slice(words[rng.gen_range(0..words.len())]);
            }
        }
        out.truncate(len);
        out
    }

    fn store(path: &Path, data: &[u8]) -> anyhow::Result<()> {
        let mut s = Session::open(Mode::Store, path)?;
        s.write(data)?;
        s.close()?;
        Ok(())
    }

    fn load(path: &Path, len: usize) -> anyhow::Result<Vec<u8>> {
        let mut s = Session::open(Mode::Load, path)?;
        let mut out = vec![0u8; len];
        s.read(&mut out)?;
        s.close()?;
        Ok(out)
    }

    #[test]
    fn roundtrip_without_dictionary() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("plain.zst");
        let data = payload(300_000, 1);

        store(&path, &data)?;
        assert_eq!(load(&path, data.len())?, data);

        let file_len = std::fs::metadata(&path)?.len() as usize;
        assert!(file_len > HEADER_LEN, "stream follows the header");
        assert!(file_len < HEADER_LEN + data.len(), "text-like payload should compress");
        Ok(())
    }

    #[test]
    fn roundtrip_across_many_writes_and_flushes() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("chunks.zst");
        let data = payload(200_000, 2);

        let mut s = Session::open(Mode::Store, &path)?;
        for (i, chunk) in data.chunks(7_777).enumerate() {
            s.write(chunk)?;
            if i % 5 == 0 {
                s.flush()?;
            }
        }
        assert_eq!(s.bytes_written(), data.len() as u64);
        s.close()?;

        assert_eq!(load(&path, data.len())?, data);
        Ok(())
    }

    #[test]
    fn empty_payload_produces_a_loadable_file() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("empty.zst");

        store(&path, &[])?;
        let mut s = Session::open(Mode::Load, &path)?;
        assert!(s.dictionary().is_empty());
        // Zero-length reads never touch the stream.
        s.read(&mut [])?;
        s.close()?;
        Ok(())
    }

    #[test]
    fn reading_past_the_end_is_an_error() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("short.zst");
        let data = payload(1_000, 3);
        store(&path, &data)?;

        let mut s = Session::open(Mode::Load, &path)?;
        let mut out = vec![0u8; data.len() + 1];
        assert!(s.read(&mut out).is_err());
        assert!(s.is_poisoned());
        Ok(())
    }

    #[test]
    fn small_staging_buffers_on_both_sides() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("tiny.zst");
        let data = payload(40_000, 4);

        let mut s = Session::open_with_config(Mode::Store, &path, SessionConfig::with_capacities(16, 16))?;
        s.write(&data)?;
        s.close()?;

        let mut s = Session::open_with_config(Mode::Load, &path, SessionConfig::with_capacities(3, 5))?;
        let mut out = vec![0u8; data.len()];
        for chunk in out.chunks_mut(5) {
            s.read(chunk)?;
        }
        s.close()?;
        assert_eq!(out, data);
        Ok(())
    }

    #[test]
    fn compression_level_is_applied_before_first_write() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("level.zst");
        let data = payload(100_000, 5);

        let mut s = Session::open(Mode::Store, &path)?;
        s.set_compression_level(19)?;
        assert_eq!(s.compression_level(), 19);
        s.write(&data)?;
        s.close()?;

        assert_eq!(load(&path, data.len())?, data);
        Ok(())
    }

    #[test]
    fn record_helpers_mirror_each_other() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("records.zst");

        let mut heap = payload(500_000, 6);
        let mut header = [7u32, 11, 13, 17];
        let mut scale = 0.125f64;

        let mut s = Session::open(Mode::Store, &path)?;
        s.record_slice(&mut header)?;
        s.record_value(&mut scale)?;
        s.record_heap(&mut heap)?;
        s.close()?;

        let mut header_back = [0u32; 4];
        let mut scale_back = 0.0f64;
        let mut heap_back = Vec::new();

        let mut s = Session::open(Mode::Load, &path)?;
        s.record_slice(&mut header_back)?;
        s.record_value(&mut scale_back)?;
        // The length prefix is a small read; the body is larger than the
        // output window and still loads in one call.
        s.record_heap(&mut heap_back)?;
        s.close()?;

        assert_eq!(header_back, header);
        assert_eq!(scale_back.to_bits(), scale.to_bits());
        assert_eq!(heap_back, heap);
        Ok(())
    }

    #[test]
    fn close_none_is_a_noop() -> anyhow::Result<()> {
        assert!(close(None)?.is_none());
        Ok(())
    }

    #[test]
    fn free_close_returns_telemetry() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("free_close.zst");
        let mut s = Session::open(Mode::Store, &path)?;
        s.write(b"hello")?;

        let snap = close(Some(s))?.expect("snapshot");
        assert_eq!(snap.counters.bytes_payload, 5);
        Ok(())
    }
}
