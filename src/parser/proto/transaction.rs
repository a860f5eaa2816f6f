use crate::parser::proto::hash_types::{Txid, Wtxid};
use crate::parser::writer::BlockchainWrite;
use serde::{Deserialize, Serialize};

/// reference to an output of a previous transaction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    pub txid: Txid,
    pub vout: u32,
}

impl OutPoint {
    /// the outpoint of a coinbase input (all-zero txid, `vout == u32::MAX`)
    pub fn null() -> OutPoint {
        OutPoint {
            txid: Txid::default(),
            vout: u32::MAX,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        *self == OutPoint::null()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxIn {
    pub previous_output: OutPoint,
    pub script_sig: Vec<u8>,
    pub sequence: u32,
    /// witness stack, empty unless the transaction is segwit-encoded
    pub witness: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOut {
    /// value in satoshis
    pub value: u64,
    pub script_pubkey: Vec<u8>,
}

impl TxOut {
    /// value converted to BTC, for display only
    #[inline]
    pub fn value_btc(&self) -> f64 {
        self.value as f64 / 100_000_000.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub version: i32,
    /// List of inputs
    pub input: Vec<TxIn>,
    /// List of outputs
    pub output: Vec<TxOut>,
    pub lock_time: u32,
}

impl Transaction {
    ///
    /// Transaction id, computed over the serialization without
    /// marker, flag and witness stacks, so it does not depend on witnesses.
    ///
    pub fn txid(&self) -> Txid {
        Txid::hash(&self.serialize_no_witness())
    }

    /// witness transaction id, equal to `txid` bytes for non-segwit transactions
    pub fn wtxid(&self) -> Wtxid {
        Wtxid::hash(&self.serialize())
    }

    /// any input carries a non-empty witness stack
    #[inline]
    pub fn has_witness(&self) -> bool {
        self.input.iter().any(|i| !i.witness.is_empty())
    }

    #[inline]
    pub fn is_coinbase(&self) -> bool {
        self.input.len() == 1 && self.input[0].previous_output.is_null()
    }

    /// sum of all output values, `None` on overflow
    pub fn total_output_value(&self) -> Option<u64> {
        self.output
            .iter()
            .try_fold(0u64, |acc, o| acc.checked_add(o.value))
    }

    /// canonical serialization, segwit-encoded when any witness is present
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        // writing into a Vec cannot fail
        let _ = buf.write_transaction(self, true);
        buf
    }

    /// legacy serialization used for the transaction id
    pub fn serialize_no_witness(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        let _ = buf.write_transaction(self, false);
        buf
    }
}
