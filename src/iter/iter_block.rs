use crate::parser::blk_file::BlkFile;
use crate::parser::errors::OpResult;
use crate::parser::proto::block::Block;
use crate::parser::reader::decode_block;
use log::debug;
use std::io::Read;

///
/// Iterate through the blocks of one blk file, in file order.
///
/// Each frame is decoded as soon as it is read. The first framing or
/// decoding error is yielded once, then the iterator stops for good.
///
pub struct BlockIter<R> {
    frames: BlkFile<R>,
    failed: bool,
}

impl<R: Read> BlockIter<R> {
    pub fn new(frames: BlkFile<R>) -> Self {
        BlockIter {
            frames,
            failed: false,
        }
    }

    /// bytes of the blk file consumed so far
    #[inline]
    pub fn offset(&self) -> u64 {
        self.frames.offset()
    }
}

impl<R: Read> Iterator for BlockIter<R> {
    type Item = OpResult<Block>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let result = self.frames.next()?.and_then(|frame| {
            debug!("frame at offset {}, {} bytes", frame.offset, frame.length);
            decode_block(&frame.payload)
                .map_err(|e| e.join_msg(&format!("frame at offset {}", frame.offset)))
        });
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}
