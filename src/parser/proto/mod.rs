//!
//! ## Block Types
//!
//! - `Block`: header plus transactions, as laid out in blk files.
//! - `Transaction`: inputs, outputs, per-input witness stacks and locktime.
//!
//! Identifiers (`BlockHash`, `Txid`, `Wtxid`) are never stored on disk,
//! they are computed by double SHA-256 over the canonical serialization.
//!

/// block header and block
pub mod block;

/// identifiers computed by double SHA-256
pub mod hash_types;

/// transactions, inputs, outputs
pub mod transaction;
