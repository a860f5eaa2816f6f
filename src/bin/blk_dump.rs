//! Print a summary of every block stored in one blk*.dat file.

use blk_reader::{BlkReader, Network, ReaderConfig, XorKey};
use clap::Parser;
use log::error;
use std::io::{stdout, BufWriter};
use std::path::PathBuf;
use std::process::exit;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// blk file to read, e.g. ~/.bitcoin/blocks/blk00455.dat
    blk_file: PathBuf,

    /// obfuscation key file [default: xor.dat next to the blk file]
    #[arg(short, long)]
    xor: Option<PathBuf>,

    /// bitcoin, testnet, testnet4, signet or regtest
    #[arg(short, long, default_value = "bitcoin")]
    network: Network,

    /// print blocks as JSON lines instead of the text summary
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();
    let args = Args::parse();

    let xor_path = args.xor.clone().unwrap_or_else(|| {
        args.blk_file
            .parent()
            .map(|dir| dir.join("xor.dat"))
            .unwrap_or_else(|| PathBuf::from("xor.dat"))
    });
    let config = ReaderConfig::new(XorKey::load(&xor_path), args.network);

    let result = BlkReader::open(&args.blk_file, config).and_then(|reader| {
        let stdout = stdout();
        let mut out = BufWriter::new(stdout.lock());
        reader.report(&mut out, args.json)
    });

    if let Err(e) = result {
        error!("{}", e);
        exit(1);
    }
}
