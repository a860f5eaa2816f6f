//!
//! Integration Test
//!
//! Write blk files to disk, obfuscate them, and read them back through the public API.
//!
#[cfg(test)]
mod blk_reader_tests {
    use blk_reader::{
        write_block_report, BlkReader, Block, BlockHeader, Network, OpErrorKind, OutPoint,
        ReaderConfig, Transaction, TxIn, TxOut, XorKey,
    };
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempdir::TempDir;

    const KEY: [u8; 8] = [0x5b, 0x2c, 0x91, 0x07, 0xe3, 0x40, 0x18, 0xaa];

    /// utility function
    fn frame(magic: u32, payload: &[u8]) -> Vec<u8> {
        let mut out = magic.to_le_bytes().to_vec();
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(payload);
        out
    }

    /// write `plain` obfuscated with `KEY`, and the key file next to it
    fn write_blk(dir: &Path, plain: &[u8]) -> PathBuf {
        let key = XorKey::new(KEY);
        let mut data = plain.to_vec();
        key.apply(&mut data, 0);
        fs::write(dir.join("xor.dat"), KEY).unwrap();
        let path = dir.join("blk00000.dat");
        fs::write(&path, data).unwrap();
        path
    }

    fn coinbase_block(nonce: u32) -> Block {
        Block {
            header: BlockHeader {
                version: 0x2000_0000,
                time: 1_700_000_000,
                bits: 0x1703_4219,
                nonce,
                ..Default::default()
            },
            txdata: vec![Transaction {
                version: 1,
                input: vec![TxIn {
                    previous_output: OutPoint::null(),
                    script_sig: vec![0x03, 0x01, 0x02, 0x03],
                    sequence: u32::MAX,
                    witness: vec![vec![0u8; 32]],
                }],
                output: vec![TxOut {
                    value: 5_000_000_000,
                    script_pubkey: vec![0x51],
                }],
                lock_time: 0,
            }],
        }
    }

    #[test]
    /// one good block, then a magic with one bit flipped
    fn test_report_halts_at_bad_magic() {
        let dir = TempDir::new("blk").unwrap();
        let block = coinbase_block(42);
        let mut plain = frame(Network::Bitcoin.magic(), &block.serialize());
        let second_frame = plain.len() as u64;
        plain.extend(frame(Network::Bitcoin.magic() ^ 0x0000_0100, &block.serialize()));
        let path = write_blk(dir.path(), &plain);

        let config = ReaderConfig::from_xor_file(&dir.path().join("xor.dat"));
        assert_eq!(config.xor_key, XorKey::new(KEY));
        let reader = BlkReader::open(&path, config).unwrap();

        let mut out = Vec::new();
        let err = reader.report(&mut out, false).unwrap_err();
        match err.kind {
            OpErrorKind::BadMagic { magic, offset } => {
                assert_eq!(magic, 0xD9B4BFF9);
                assert_eq!(offset, second_frame);
            }
            ref other => panic!("unexpected error {:?}", other),
        }
        assert!(err.to_string().contains(&format!("offset {}", second_frame)));

        let mut expected = Vec::new();
        write_block_report(&mut expected, &block).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            String::from_utf8(expected).unwrap()
        );
    }

    #[test]
    /// every block comes back, with the same hashes as before writing
    fn test_iter_block() {
        let dir = TempDir::new("blk").unwrap();
        let blocks: Vec<Block> = (0..5).map(coinbase_block).collect();
        let plain: Vec<u8> = blocks
            .iter()
            .flat_map(|b| frame(Network::Bitcoin.magic(), &b.serialize()))
            .collect();
        let path = write_blk(dir.path(), &plain);

        let config = ReaderConfig::from_xor_file(&dir.path().join("xor.dat"));
        let read: Vec<Block> = BlkReader::open(&path, config)
            .unwrap()
            .iter_block()
            .map(|b| b.unwrap())
            .collect();
        assert_eq!(read, blocks);
        for (a, b) in read.iter().zip(blocks.iter()) {
            assert_eq!(a.block_hash(), b.block_hash());
            assert_eq!(a.txdata[0].txid(), b.txdata[0].txid());
            assert_eq!(a.txdata[0].input[0].witness.len(), 1);
        }
    }

    #[test]
    /// without the key file the obfuscated magic is rejected right away
    fn test_missing_key_file() {
        let dir = TempDir::new("blk").unwrap();
        let plain = frame(Network::Bitcoin.magic(), &coinbase_block(0).serialize());
        let path = write_blk(dir.path(), &plain);
        fs::remove_file(dir.path().join("xor.dat")).unwrap();

        let config = ReaderConfig::from_xor_file(&dir.path().join("xor.dat"));
        assert!(config.xor_key.is_identity());
        let mut iter = BlkReader::open(&path, config).unwrap().iter_block();
        let err = iter.next().unwrap().unwrap_err();
        assert_eq!(err.offset(), Some(0));
        assert!(iter.next().is_none());
    }

    #[test]
    /// other networks use other magic values
    fn test_network_magic() {
        let dir = TempDir::new("blk").unwrap();
        let plain = frame(Network::Testnet4.magic(), &coinbase_block(7).serialize());
        let path = write_blk(dir.path(), &plain);
        let key = XorKey::load(&dir.path().join("xor.dat"));

        let config = ReaderConfig::new(key, Network::Testnet4);
        let n = BlkReader::open(&path, config)
            .unwrap()
            .report(&mut Vec::<u8>::new(), true)
            .unwrap();
        assert_eq!(n, 1);

        let config = ReaderConfig::new(key, Network::Bitcoin);
        let reader = BlkReader::open(&path, config).unwrap();
        assert!(reader.report(&mut Vec::<u8>::new(), false).is_err());
    }

    #[test]
    fn test_open_missing_file() {
        let dir = TempDir::new("blk").unwrap();
        let path = dir.path().join("blk00001.dat");
        assert!(BlkReader::open(&path, ReaderConfig::default()).is_err());
    }
}
