use bitcoin_hashes::{sha256d, Hash};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! sha256d_newtype {
    ( $name:ident, $doc:literal ) => {
        #[doc = $doc]
        ///
        /// Displayed as byte-reversed hex, like Bitcoin Core does.
        #[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(sha256d::Hash);

        impl $name {
            /// double SHA-256 of `data`
            #[inline]
            pub fn hash(data: &[u8]) -> Self {
                $name(sha256d::Hash::hash(data))
            }

            /// wrap raw bytes in internal (wire) byte order
            #[inline]
            pub fn from_inner(inner: [u8; 32]) -> Self {
                $name(sha256d::Hash::from_inner(inner))
            }

            /// raw bytes in internal (wire) byte order
            #[inline]
            pub fn into_inner(self) -> [u8; 32] {
                self.0.into_inner()
            }

            #[inline]
            pub fn as_inner(&self) -> &[u8; 32] {
                self.0.as_inner()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }
    };
}

sha256d_newtype!(BlockHash, "Hash of an 80-byte block header.");
sha256d_newtype!(Txid, "Hash of a transaction serialized without witness data.");
sha256d_newtype!(Wtxid, "Hash of a transaction serialized with witness data.");
sha256d_newtype!(TxMerkleNode, "Merkle root committed to by a block header.");
