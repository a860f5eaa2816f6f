//!
//! This module defines how to turn the binary data of a blk file into Block structs defined in proto.
//!

/// split a deobfuscated blk file into frames
pub mod blk_file;

/// define binary payload readers
pub mod reader;

/// define binary serialization, needed for hashing
pub mod writer;

/// remove the XOR obfuscation of blk files
pub mod xor;

/// blockchain data representation
pub mod proto;

/// error handling
pub mod errors;
