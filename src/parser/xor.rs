use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

pub const XOR_KEY_LEN: usize = 8;

///
/// Obfuscation key Bitcoin Core applies to blk files at rest (`xor.dat`).
///
/// The all-zero key is the identity transform.
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct XorKey([u8; XOR_KEY_LEN]);

impl XorKey {
    pub fn new(key: [u8; XOR_KEY_LEN]) -> XorKey {
        XorKey(key)
    }

    ///
    /// Load the key from `xor.dat`.
    ///
    /// A missing or unreadable key file is not an error: the blk files
    /// are then assumed not to be obfuscated. An empty file means the same.
    ///
    pub fn load(path: &Path) -> XorKey {
        match fs::read(path) {
            Ok(bytes) => {
                if bytes.is_empty() {
                    info!("XOR file {} is empty, no obfuscation", path.display());
                    return XorKey::default();
                }
                let mut key = [0u8; XOR_KEY_LEN];
                let n = bytes.len().min(XOR_KEY_LEN);
                key[..n].copy_from_slice(&bytes[..n]);
                let key = XorKey(key);
                if key.is_identity() {
                    info!("XOR key is all zero, blk files are not obfuscated");
                } else {
                    info!("XOR key: {}", hex::encode(key.0));
                }
                key
            }
            Err(err) => {
                warn!(
                    "cannot read XOR file {} ({}), assuming blk files are not obfuscated",
                    path.display(),
                    err
                );
                XorKey::default()
            }
        }
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        self.0 == [0u8; XOR_KEY_LEN]
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; XOR_KEY_LEN] {
        &self.0
    }

    /// xor `buf` in place, `buf[0]` being at absolute stream offset `offset`
    #[inline]
    pub fn apply(&self, buf: &mut [u8], offset: u64) {
        if self.is_identity() {
            return;
        }
        let start = (offset % XOR_KEY_LEN as u64) as usize;
        for (b, k) in buf.iter_mut().zip(self.0.iter().cycle().skip(start)) {
            *b ^= k;
        }
    }
}

impl From<[u8; XOR_KEY_LEN]> for XorKey {
    fn from(key: [u8; XOR_KEY_LEN]) -> Self {
        XorKey(key)
    }
}

///
/// Reader removing the XOR obfuscation of the underlying byte source.
///
/// Keeps the absolute offset across reads, so the output does not depend
/// on how callers chunk their reads.
///
pub struct XorReader<R> {
    inner: R,
    key: XorKey,
    pos: u64,
}

impl<R: Read> XorReader<R> {
    pub fn new(inner: R, key: XorKey) -> XorReader<R> {
        XorReader::with_offset(inner, key, 0)
    }

    /// `inner` is already positioned at `offset` of the obfuscated file
    pub fn with_offset(inner: R, key: XorKey, offset: u64) -> XorReader<R> {
        XorReader {
            inner,
            key,
            pos: offset,
        }
    }

    /// number of bytes read since the start of the stream
    #[inline]
    pub fn position(&self) -> u64 {
        self.pos
    }

    #[inline]
    pub fn key(&self) -> &XorKey {
        &self.key
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for XorReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.key.apply(&mut buf[..n], self.pos);
        self.pos += n as u64;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempdir::TempDir;

    const KEY: [u8; 8] = [0x3a, 0x1f, 0xc4, 0x00, 0x9e, 0x55, 0x01, 0xff];

    fn sample() -> Vec<u8> {
        (0..1000u32).map(|i| (i * 31 % 251) as u8).collect()
    }

    fn read_chunked(data: &[u8], key: XorKey, chunk: usize) -> Vec<u8> {
        let mut r = XorReader::new(Cursor::new(data), key);
        let mut out = Vec::new();
        let mut buf = vec![0u8; chunk];
        loop {
            let n = r.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        assert_eq!(r.position(), data.len() as u64);
        out
    }

    #[test]
    fn test_output_independent_of_chunking() {
        let data = sample();
        let key = XorKey::new(KEY);
        let expected: Vec<u8> = data
            .iter()
            .enumerate()
            .map(|(i, b)| b ^ KEY[i % 8])
            .collect();
        for chunk in &[1, 2, 3, 5, 7, 8, 9, 64, 999, 1000, 4096] {
            assert_eq!(read_chunked(&data, key, *chunk), expected, "chunk {}", chunk);
        }
    }

    #[test]
    fn test_xor_is_self_inverse() {
        let data = sample();
        let key = XorKey::new(KEY);
        let once = read_chunked(&data, key, 13);
        let twice = read_chunked(&once, key, 7);
        assert_eq!(twice, data);
    }

    #[test]
    fn test_zero_key_is_identity() {
        let data = sample();
        assert_eq!(read_chunked(&data, XorKey::default(), 10), data);
    }

    #[test]
    fn test_with_offset() {
        let data = sample();
        let key = XorKey::new(KEY);
        let full = read_chunked(&data, key, 100);
        let mut r = XorReader::with_offset(Cursor::new(&data[13..]), key, 13);
        let mut rest = Vec::new();
        r.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, &full[13..]);
    }

    #[test]
    fn test_load_key_file() {
        let dir = TempDir::new("xor").unwrap();

        let missing = dir.path().join("xor.dat");
        assert!(XorKey::load(&missing).is_identity());

        let empty = dir.path().join("empty.dat");
        fs::write(&empty, b"").unwrap();
        assert!(XorKey::load(&empty).is_identity());

        let zero = dir.path().join("zero.dat");
        fs::write(&zero, [0u8; 8]).unwrap();
        assert!(XorKey::load(&zero).is_identity());

        let real = dir.path().join("real.dat");
        fs::write(&real, KEY).unwrap();
        assert_eq!(XorKey::load(&real), XorKey::new(KEY));
    }
}
