use crate::parser::errors::OpResult;
use crate::parser::proto::block::Block;
use std::io::{self, Write};

const MAX_TX_SHOWN: usize = 5;
const MAX_IO_SHOWN: usize = 3;

///
/// Human readable summary of a block.
///
/// Shows the first 5 transactions, and for each of them
/// the first 3 inputs and outputs.
///
pub fn write_block_report<W: Write>(out: &mut W, block: &Block) -> io::Result<()> {
    writeln!(
        out,
        "Block hash: {}, {} tx(s) present in block.",
        block.block_hash(),
        block.txdata.len()
    )?;
    for (i, tx) in block.txdata.iter().take(MAX_TX_SHOWN).enumerate() {
        writeln!(out, "  Tx {}: {}", i, tx.txid())?;

        writeln!(out, "    Inputs: {}", tx.input.len())?;
        for (j, input) in tx.input.iter().take(MAX_IO_SHOWN).enumerate() {
            let prev = &input.previous_output;
            writeln!(out, "      Input {}: {}:{}", j, prev.txid, prev.vout)?;
        }

        writeln!(out, "    Outputs: {}", tx.output.len())?;
        for (k, output) in tx.output.iter().take(MAX_IO_SHOWN).enumerate() {
            writeln!(out, "      Output {}: {:.8} BTC", k, output.value_btc())?;
        }
    }
    if block.txdata.len() > MAX_TX_SHOWN {
        writeln!(
            out,
            "  ... and {} more transactions",
            block.txdata.len() - MAX_TX_SHOWN
        )?;
    }
    writeln!(out)
}

/// one block per line, as JSON
pub fn write_block_json<W: Write>(out: &mut W, block: &Block) -> OpResult<()> {
    serde_json::to_writer(&mut *out, block)?;
    writeln!(out)?;
    Ok(())
}
