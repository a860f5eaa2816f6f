use crate::parser::errors::{OpError, OpResult};
use crate::parser::proto::block::{Block, BlockHeader};
use crate::parser::proto::hash_types::{BlockHash, TxMerkleNode, Txid};
use crate::parser::proto::transaction::{OutPoint, Transaction, TxIn, TxOut};
use crate::parser::writer::SEGWIT_MARKER;
use byteorder::LittleEndian;
use std::io::{Cursor, Read, Seek, SeekFrom};

// smallest possible encodings, used to reject counts before allocating
const MIN_TX_SIZE: u64 = 10;
const MIN_TX_IN_SIZE: u64 = 41;
const MIN_TX_OUT_SIZE: u64 = 9;
const MIN_WITNESS_ITEM_SIZE: u64 = 1;

///
/// Decode blockchain objects from an in-memory payload.
///
/// Every read names the decoding step, so that a short or inconsistent
/// payload fails with the step and the offset where it happened.
///
pub trait BlockchainRead: Read + Seek {
    /// bytes consumed so far
    fn offset(&self) -> u64;

    /// bytes left to consume
    fn remaining(&self) -> u64;

    #[inline]
    fn read_u8(&mut self, step: &'static str) -> OpResult<u8> {
        let offset = self.offset();
        byteorder::ReadBytesExt::read_u8(self).map_err(|_| OpError::decode(step, offset))
    }

    #[inline]
    fn read_u16(&mut self, step: &'static str) -> OpResult<u16> {
        let offset = self.offset();
        byteorder::ReadBytesExt::read_u16::<LittleEndian>(self)
            .map_err(|_| OpError::decode(step, offset))
    }

    #[inline]
    fn read_u32(&mut self, step: &'static str) -> OpResult<u32> {
        let offset = self.offset();
        byteorder::ReadBytesExt::read_u32::<LittleEndian>(self)
            .map_err(|_| OpError::decode(step, offset))
    }

    #[inline]
    fn read_i32(&mut self, step: &'static str) -> OpResult<i32> {
        let offset = self.offset();
        byteorder::ReadBytesExt::read_i32::<LittleEndian>(self)
            .map_err(|_| OpError::decode(step, offset))
    }

    #[inline]
    fn read_u64(&mut self, step: &'static str) -> OpResult<u64> {
        let offset = self.offset();
        byteorder::ReadBytesExt::read_u64::<LittleEndian>(self)
            .map_err(|_| OpError::decode(step, offset))
    }

    #[inline]
    fn read_u256(&mut self, step: &'static str) -> OpResult<[u8; 32]> {
        let offset = self.offset();
        let mut arr = [0u8; 32];
        self.read_exact(&mut arr)
            .map_err(|_| OpError::decode(step, offset))?;
        Ok(arr)
    }

    #[inline]
    fn read_u8_vec(&mut self, count: usize, step: &'static str) -> OpResult<Vec<u8>> {
        let offset = self.offset();
        if count as u64 > self.remaining() {
            return Err(OpError::decode(step, offset));
        }
        let mut arr = vec![0u8; count];
        self.read_exact(&mut arr)
            .map_err(|_| OpError::decode(step, offset))?;
        Ok(arr)
    }

    ///
    /// Compact size integer: one byte below `0xfd`, otherwise a
    /// `0xfd`/`0xfe`/`0xff` prefix followed by a 2/4/8-byte value.
    ///
    /// Non-canonical encodings (a wider tier than needed) are accepted.
    ///
    fn read_compact_size(&mut self, step: &'static str) -> OpResult<u64> {
        match self.read_u8(step)? {
            0xfd => Ok(self.read_u16(step)? as u64),
            0xfe => Ok(self.read_u32(step)? as u64),
            0xff => self.read_u64(step),
            n => Ok(n as u64),
        }
    }

    ///
    /// Read an element count and check that `count` elements of at least
    /// `min_size` bytes each can still fit in the payload.
    ///
    fn read_count(&mut self, step: &'static str, min_size: u64) -> OpResult<usize> {
        let offset = self.offset();
        let count = self.read_compact_size(step)?;
        if count.saturating_mul(min_size) > self.remaining() {
            return Err(OpError::decode(step, offset)
                .join_msg(&format!("count {} exceeds remaining payload", count)));
        }
        Ok(count as usize)
    }

    #[inline]
    fn read_var_bytes(&mut self, step: &'static str) -> OpResult<Vec<u8>> {
        let len = self.read_count(step, 1)?;
        self.read_u8_vec(len, step)
    }

    ///
    /// Consume the segwit marker and flag if they come next.
    ///
    /// Otherwise the two bytes belong to the input count and the
    /// reader is moved back to where it was.
    ///
    fn read_segwit_marker(&mut self) -> OpResult<bool> {
        let start = self.offset();
        let mut marker = [0u8; 2];
        match self.read_exact(&mut marker) {
            Ok(()) if marker == SEGWIT_MARKER => Ok(true),
            _ => {
                self.seek(SeekFrom::Start(start))?;
                Ok(false)
            }
        }
    }

    fn read_block_header(&mut self) -> OpResult<BlockHeader> {
        Ok(BlockHeader {
            version: self.read_i32("header version")?,
            prev_blockhash: BlockHash::from_inner(self.read_u256("previous block hash")?),
            merkle_root: TxMerkleNode::from_inner(self.read_u256("merkle root")?),
            time: self.read_u32("header time")?,
            bits: self.read_u32("header bits")?,
            nonce: self.read_u32("header nonce")?,
        })
    }

    fn read_tx_in(&mut self) -> OpResult<TxIn> {
        let txid = Txid::from_inner(self.read_u256("previous output hash")?);
        let vout = self.read_u32("previous output index")?;
        let script_sig = self.read_var_bytes("input script")?;
        let sequence = self.read_u32("input sequence")?;
        Ok(TxIn {
            previous_output: OutPoint { txid, vout },
            script_sig,
            sequence,
            witness: Vec::new(),
        })
    }

    fn read_tx_out(&mut self) -> OpResult<TxOut> {
        let value = self.read_u64("output value")?;
        let script_pubkey = self.read_var_bytes("output script")?;
        Ok(TxOut {
            value,
            script_pubkey,
        })
    }

    fn read_witness(&mut self) -> OpResult<Vec<Vec<u8>>> {
        let n_items = self.read_count("witness item count", MIN_WITNESS_ITEM_SIZE)?;
        let mut stack = Vec::with_capacity(n_items);
        for _ in 0..n_items {
            stack.push(self.read_var_bytes("witness item")?);
        }
        Ok(stack)
    }

    fn read_transaction(&mut self) -> OpResult<Transaction> {
        let version = self.read_i32("transaction version")?;
        let segwit = self.read_segwit_marker()?;

        let n_in = self.read_count("input count", MIN_TX_IN_SIZE)?;
        let mut input = Vec::with_capacity(n_in);
        for _ in 0..n_in {
            input.push(self.read_tx_in()?);
        }

        let n_out = self.read_count("output count", MIN_TX_OUT_SIZE)?;
        let mut output = Vec::with_capacity(n_out);
        for _ in 0..n_out {
            output.push(self.read_tx_out()?);
        }

        if segwit {
            for tx_in in input.iter_mut() {
                tx_in.witness = self.read_witness()?;
            }
        }

        let lock_time = self.read_u32("locktime")?;
        Ok(Transaction {
            version,
            input,
            output,
            lock_time,
        })
    }

    fn read_block(&mut self) -> OpResult<Block> {
        let header = self.read_block_header()?;
        let n_tx = self.read_count("transaction count", MIN_TX_SIZE)?;
        let mut txdata = Vec::with_capacity(n_tx);
        for i in 0..n_tx {
            let tx = self
                .read_transaction()
                .map_err(|e| e.join_msg(&format!("transaction {}", i)))?;
            txdata.push(tx);
        }
        Ok(Block { header, txdata })
    }
}

impl<T: AsRef<[u8]>> BlockchainRead for Cursor<T> {
    #[inline]
    fn offset(&self) -> u64 {
        self.position()
    }

    #[inline]
    fn remaining(&self) -> u64 {
        (self.get_ref().as_ref().len() as u64).saturating_sub(self.position())
    }
}

///
/// Decode one frame payload into a block.
///
/// The payload must be consumed exactly: trailing bytes are an error.
///
pub fn decode_block(payload: &[u8]) -> OpResult<Block> {
    let mut r = Cursor::new(payload);
    let block = r.read_block()?;
    if r.remaining() > 0 {
        return Err(OpError::decode("end of block", r.offset())
            .join_msg(&format!("{} trailing bytes", r.remaining())));
    }
    Ok(block)
}

/// decode a single serialized transaction, consuming all of `bytes`
pub fn decode_transaction(bytes: &[u8]) -> OpResult<Transaction> {
    let mut r = Cursor::new(bytes);
    let tx = r.read_transaction()?;
    if r.remaining() > 0 {
        return Err(OpError::decode("end of transaction", r.offset())
            .join_msg(&format!("{} trailing bytes", r.remaining())));
    }
    Ok(tx)
}
