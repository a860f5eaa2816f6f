use crate::parser::proto::hash_types::{BlockHash, TxMerkleNode};
use crate::parser::proto::transaction::Transaction;
use crate::parser::writer::BlockchainWrite;
use serde::{Deserialize, Serialize};

/// size of a serialized block header
pub const BLOCK_HEADER_SIZE: usize = 80;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub version: i32,
    pub prev_blockhash: BlockHash,
    pub merkle_root: TxMerkleNode,
    pub time: u32,
    pub bits: u32,
    pub nonce: u32,
}

impl BlockHeader {
    /// double SHA-256 of the 80-byte header
    pub fn block_hash(&self) -> BlockHash {
        BlockHash::hash(&self.serialize())
    }

    pub fn serialize(&self) -> [u8; BLOCK_HEADER_SIZE] {
        let mut buf = Vec::with_capacity(BLOCK_HEADER_SIZE);
        let _ = buf.write_block_header(self);
        let mut out = [0u8; BLOCK_HEADER_SIZE];
        out.copy_from_slice(&buf);
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    pub txdata: Vec<Transaction>,
}

impl Block {
    #[inline]
    pub fn block_hash(&self) -> BlockHash {
        self.header.block_hash()
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        let _ = buf.write_block(self);
        buf
    }
}
