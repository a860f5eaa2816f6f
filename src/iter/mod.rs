//!
//! This module defines lazy iteration over the blocks of a blk file
//!

mod iter_block;

pub use iter_block::BlockIter;
