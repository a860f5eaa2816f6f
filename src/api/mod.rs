//!
//! Crates APIs, essential structs, functions, methods are all here!
//!
//! To quickly understand how to use this crate, have a look at the
//! documentation for `blk_reader::BlkReader`!!.
//!
//! # Example
//!
//! ```rust
//! use blk_reader::{BlkReader, ReaderConfig};
//! use std::path::Path;
//!
//! let blocks = Path::new("/Users/me/bitcoin/blocks");
//!
//! // read the obfuscation key next to the blk files
//! let config = ReaderConfig::from_xor_file(&blocks.join("xor.dat"));
//! let reader = BlkReader::open(&blocks.join("blk00000.dat"), config).unwrap();
//!
//! for block in reader.iter_block() {
//!     println!("{}", block.unwrap().block_hash());
//! }
//! ```
//!

pub mod report;

use crate::iter::BlockIter;
use crate::parser::blk_file::BlkFile;
use crate::parser::errors::{OpError, OpResult};
use crate::parser::xor::XorKey;
use log::info;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
// re-exports
pub use crate::parser::blk_file::{Frame, Network};
pub use crate::parser::proto::block::{Block, BlockHeader};
pub use crate::parser::proto::hash_types::{BlockHash, TxMerkleNode, Txid, Wtxid};
pub use crate::parser::proto::transaction::{OutPoint, Transaction, TxIn, TxOut};
pub use crate::parser::reader::{decode_block, decode_transaction};
pub use crate::parser::xor::XorReader;
pub use report::{write_block_json, write_block_report};

///
/// Settings for reading one blk file.
///
/// The obfuscation key and network are passed explicitly,
/// there is no process-wide default.
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderConfig {
    pub xor_key: XorKey,
    pub network: Network,
}

impl ReaderConfig {
    pub fn new(xor_key: XorKey, network: Network) -> ReaderConfig {
        ReaderConfig { xor_key, network }
    }

    /// mainnet, key read from `xor.dat` (identity key if the file is absent)
    pub fn from_xor_file(path: &Path) -> ReaderConfig {
        ReaderConfig {
            xor_key: XorKey::load(path),
            network: Network::Bitcoin,
        }
    }

    pub fn with_network(mut self, network: Network) -> ReaderConfig {
        self.network = network;
        self
    }
}

///
/// This is the main struct of this crate!! Click and read the doc.
///
/// Owns the open blk file. The file is closed when the reader
/// (or the iterator made from it) is dropped, on success or error.
///
pub struct BlkReader {
    path: PathBuf,
    frames: BlkFile<XorReader<BufReader<File>>>,
}

impl BlkReader {
    ///
    /// Open a blk file for sequential reading.
    ///
    /// # Example
    ///
    /// ```rust
    /// use blk_reader::{BlkReader, Network, ReaderConfig, XorKey};
    /// use std::path::Path;
    ///
    /// let config = ReaderConfig::new(XorKey::default(), Network::Testnet4);
    /// let reader = BlkReader::open(Path::new("blk00000.dat"), config).unwrap();
    /// ```
    pub fn open(path: &Path, config: ReaderConfig) -> OpResult<BlkReader> {
        if !path.is_file() {
            return Err(OpError::from(format!(
                "blk file {} does not exist",
                path.display()
            )));
        }
        info!(
            "reading {} ({} network, {})",
            path.display(),
            config.network,
            if config.xor_key.is_identity() {
                "not obfuscated"
            } else {
                "obfuscated"
            }
        );
        Ok(BlkReader {
            path: path.to_path_buf(),
            frames: BlkFile::open(path, config.xor_key, config.network.magic())?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// the raw frames, before decoding
    pub fn iter_frames(self) -> BlkFile<XorReader<BufReader<File>>> {
        self.frames
    }

    ///
    /// Iterate through the blocks of the file, in file order.
    ///
    /// Stops after the end of the file, or right after yielding the first error.
    ///
    pub fn iter_block(self) -> BlockIter<XorReader<BufReader<File>>> {
        BlockIter::new(self.frames)
    }

    ///
    /// Print a report of every block to `out`, until the end of the file.
    ///
    /// Halts at the first error: blocks before it are already printed,
    /// nothing after it is read.
    ///
    pub fn report<W: Write>(self, out: &mut W, json: bool) -> OpResult<usize> {
        let mut n_blocks = 0;
        for block in self.iter_block() {
            let block = block?;
            if json {
                write_block_json(out, &block)?;
            } else {
                write_block_report(out, &block)?;
            }
            n_blocks += 1;
        }
        out.flush()?;
        info!("{} blocks read", n_blocks);
        Ok(n_blocks)
    }
}
