use crate::parser::errors::{OpError, OpErrorKind, OpResult};
use crate::parser::xor::{XorKey, XorReader};
use byteorder::{LittleEndian, ReadBytesExt};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, ErrorKind, Read};
use std::path::Path;
use std::str::FromStr;

///
/// Networks whose blk files can be read.
///
/// Each one starts its frames with a different magic value.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    Bitcoin,
    Testnet,
    Testnet4,
    Signet,
    Regtest,
}

impl Network {
    /// frame magic, as read little-endian from the file
    pub fn magic(self) -> u32 {
        match self {
            Network::Bitcoin => 0xD9B4BEF9,
            Network::Testnet => 0x0709110B,
            Network::Testnet4 => 0x283F161C,
            Network::Signet => 0x40CF030A,
            Network::Regtest => 0xDAB5BFFA,
        }
    }
}

impl Default for Network {
    fn default() -> Self {
        Network::Bitcoin
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Network::Bitcoin => "bitcoin",
            Network::Testnet => "testnet",
            Network::Testnet4 => "testnet4",
            Network::Signet => "signet",
            Network::Regtest => "regtest",
        };
        f.write_str(name)
    }
}

impl FromStr for Network {
    type Err = OpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bitcoin" | "main" | "mainnet" => Ok(Network::Bitcoin),
            "testnet" | "testnet3" => Ok(Network::Testnet),
            "testnet4" => Ok(Network::Testnet4),
            "signet" => Ok(Network::Signet),
            "regtest" => Ok(Network::Regtest),
            other => Err(OpError::from(format!("unknown network {}", other))),
        }
    }
}

/// One `[magic][length][payload]` record of a blk file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub magic: u32,
    pub length: u32,
    /// absolute offset of the magic in the block file
    pub offset: u64,
    pub payload: Vec<u8>,
}

///
/// Reads the frames of a blk file sequentially.
///
/// The reader is fused: after the end of the file or the first error,
/// no more frames are produced. Bad framing is never resynchronized.
///
pub struct BlkFile<R> {
    reader: R,
    magic: u32,
    offset: u64,
    done: bool,
}

impl BlkFile<XorReader<BufReader<File>>> {
    /// open a blk file, deobfuscating it with `key`
    pub fn open(path: &Path, key: XorKey, magic: u32) -> OpResult<Self> {
        let file = File::open(path)
            .map_err(|e| OpError::from(e).join_msg(&path.display().to_string()))?;
        debug!("opened blk file {}", path.display());
        Ok(BlkFile::new(XorReader::new(BufReader::new(file), key), magic))
    }
}

impl<R: Read> BlkFile<R> {
    pub fn new(reader: R, magic: u32) -> BlkFile<R> {
        BlkFile {
            reader,
            magic,
            offset: 0,
            done: false,
        }
    }

    /// bytes consumed from the (deobfuscated) stream
    #[inline]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    #[inline]
    pub fn magic(&self) -> u32 {
        self.magic
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    ///
    /// Read the next frame.
    ///
    /// `Ok(None)` means the file ended cleanly before a new frame.
    ///
    pub fn next_frame(&mut self) -> OpResult<Option<Frame>> {
        let offset = self.offset;
        let magic = match self.read_magic()? {
            Some(m) => m,
            None => return Ok(None),
        };
        if magic != self.magic {
            return Err(OpError::bad_magic(magic, offset));
        }

        let length = self
            .reader
            .read_u32::<LittleEndian>()
            .map_err(|e| truncated(e, "frame length", self.offset))?;
        self.offset += 4;

        // no up-front allocation, the length field is not trusted yet
        let mut payload = Vec::new();
        let n = (&mut self.reader)
            .take(length as u64)
            .read_to_end(&mut payload)?;
        if n != length as usize {
            return Err(OpError::truncated("frame payload", self.offset));
        }
        self.offset += length as u64;

        Ok(Some(Frame {
            magic,
            length,
            offset,
            payload,
        }))
    }

    /// like `read_exact`, but zero bytes before the end of stream is `None`
    fn read_magic(&mut self) -> OpResult<Option<u32>> {
        let mut buf = [0u8; 4];
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        match filled {
            0 => Ok(None),
            4 => {
                self.offset += 4;
                Ok(Some(u32::from_le_bytes(buf)))
            }
            _ => Err(OpError::truncated("frame magic", self.offset)),
        }
    }
}

fn truncated(err: io::Error, field: &'static str, offset: u64) -> OpError {
    if err.kind() == ErrorKind::UnexpectedEof {
        OpError::truncated(field, offset)
    } else {
        OpError::new(OpErrorKind::IoError(err))
    }
}

impl<R: Read> Iterator for BlkFile<R> {
    type Item = OpResult<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_frame() {
            Ok(Some(frame)) => Some(Ok(frame)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
