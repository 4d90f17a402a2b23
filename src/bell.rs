use std::io::{self, Write};

/// ASCII BEL
pub const BELL: u8 = 7;

/// A writer that swallows lone terminal bells.
///
/// A write consisting of exactly the single byte [`BELL`] is dropped; every
/// other write, including longer buffers that happen to contain a bell, is
/// forwarded unchanged. The dropped byte is reported as written so that
/// `write_all` does not treat it as a short write.
#[derive(Debug)]
pub struct BellSkipper<W> {
    inner: W,
}

impl<W: Write> BellSkipper<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for BellSkipper<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf == [BELL] {
            return Ok(1);
        }
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lone_bell_dropped() {
        let mut skipper = BellSkipper::new(Vec::new());
        assert_eq!(skipper.write(&[BELL]).unwrap(), 1);
        skipper.write_all(&[BELL]).unwrap();
        assert!(skipper.into_inner().is_empty());
    }

    #[test]
    fn test_embedded_bell_passes_through() {
        let mut skipper = BellSkipper::new(Vec::new());
        assert_eq!(skipper.write(&[65, 7, 66]).unwrap(), 3);
        assert_eq!(skipper.into_inner(), vec![65, 7, 66]);
    }

    #[test]
    fn test_other_single_bytes_pass_through() {
        let mut skipper = BellSkipper::new(Vec::new());
        skipper.write_all(b"a").unwrap();
        skipper.write_all(&[BELL, BELL]).unwrap();
        skipper.write_all(b"").unwrap();
        assert_eq!(skipper.into_inner(), vec![b'a', BELL, BELL]);
    }
}
