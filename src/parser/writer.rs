use crate::parser::proto::block::{Block, BlockHeader};
use crate::parser::proto::transaction::Transaction;
use byteorder::{LittleEndian, WriteBytesExt};
use std::io;

/// segwit marker and flag, written right after the transaction version
pub const SEGWIT_MARKER: [u8; 2] = [0x00, 0x01];

///
/// Serialize blockchain objects in their wire format.
///
/// Used to compute block hashes and transaction ids.
///
pub trait BlockchainWrite: io::Write {
    /// smallest compact size tier that holds `n`
    fn write_compact_size(&mut self, n: u64) -> io::Result<()> {
        if n < 0xfd {
            self.write_u8(n as u8)
        } else if n <= 0xffff {
            self.write_u8(0xfd)?;
            self.write_u16::<LittleEndian>(n as u16)
        } else if n <= 0xffff_ffff {
            self.write_u8(0xfe)?;
            self.write_u32::<LittleEndian>(n as u32)
        } else {
            self.write_u8(0xff)?;
            self.write_u64::<LittleEndian>(n)
        }
    }

    #[inline]
    fn write_var_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.write_compact_size(bytes.len() as u64)?;
        self.write_all(bytes)
    }

    fn write_block_header(&mut self, header: &BlockHeader) -> io::Result<()> {
        self.write_i32::<LittleEndian>(header.version)?;
        self.write_all(header.prev_blockhash.as_inner())?;
        self.write_all(header.merkle_root.as_inner())?;
        self.write_u32::<LittleEndian>(header.time)?;
        self.write_u32::<LittleEndian>(header.bits)?;
        self.write_u32::<LittleEndian>(header.nonce)
    }

    ///
    /// Marker, flag and witness stacks are only written when
    /// `include_witness` is set and some input has a witness.
    ///
    fn write_transaction(&mut self, tx: &Transaction, include_witness: bool) -> io::Result<()> {
        let segwit = include_witness && tx.has_witness();
        self.write_i32::<LittleEndian>(tx.version)?;
        if segwit {
            self.write_all(&SEGWIT_MARKER)?;
        }
        self.write_compact_size(tx.input.len() as u64)?;
        for input in &tx.input {
            self.write_all(input.previous_output.txid.as_inner())?;
            self.write_u32::<LittleEndian>(input.previous_output.vout)?;
            self.write_var_bytes(&input.script_sig)?;
            self.write_u32::<LittleEndian>(input.sequence)?;
        }
        self.write_compact_size(tx.output.len() as u64)?;
        for output in &tx.output {
            self.write_u64::<LittleEndian>(output.value)?;
            self.write_var_bytes(&output.script_pubkey)?;
        }
        if segwit {
            for input in &tx.input {
                self.write_compact_size(input.witness.len() as u64)?;
                for item in &input.witness {
                    self.write_var_bytes(item)?;
                }
            }
        }
        self.write_u32::<LittleEndian>(tx.lock_time)
    }

    fn write_block(&mut self, block: &Block) -> io::Result<()> {
        self.write_block_header(&block.header)?;
        self.write_compact_size(block.txdata.len() as u64)?;
        for tx in &block.txdata {
            self.write_transaction(tx, true)?;
        }
        Ok(())
    }
}

impl<W: io::Write + ?Sized> BlockchainWrite for W {}
