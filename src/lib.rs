//!
//! # Introduction
//!
//! This library reads the binary Bitcoin Core block files (`blk*.dat`)
//! sequentially, one file at a time.
//!
//! It removes the XOR obfuscation Bitcoin Core applies to block files
//! (the key is stored in `blocks/xor.dat`), splits the file into
//! `[magic][length][payload]` frames, and decodes every payload into
//! a block header and its transactions, including segwit witness data.
//! Block hashes and transaction ids are computed on the fly.
//!
//! ## Caveat
//!
//! Nothing is validated: no proof-of-work, no scripts, no UTXO set.
//! The first malformed frame stops the reading, frame boundaries
//! cannot be trusted after it.
//!
//! # Example
//!
//! ```rust
//! use blk_reader::{BlkReader, ReaderConfig};
//! use std::path::Path;
//!
//! let blocks = Path::new("/Users/me/bitcoin/blocks");
//! let config = ReaderConfig::from_xor_file(&blocks.join("xor.dat"));
//!
//! let reader = BlkReader::open(&blocks.join("blk00455.dat"), config).unwrap();
//! for block in reader.iter_block() {
//!     let block = block.unwrap();
//!     println!("{}: {} transactions", block.block_hash(), block.txdata.len());
//! }
//! ```
//!

pub(crate) mod api;
pub mod iter;
pub mod parser;

#[doc(inline)]
pub use crate::api::*;
pub use crate::parser::errors::{OpError, OpErrorKind, OpResult};
pub use crate::parser::xor::XorKey;
