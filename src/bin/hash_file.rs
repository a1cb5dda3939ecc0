use clap::Parser;
use hashd::utils::hash::{DEFAULT_BLOCK_SIZE, hash_file_named};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Print the digest of a local file.
#[derive(Parser, Debug)]
#[command(name = "hash-file", version)]
struct Args {
    /// File to hash
    path: PathBuf,

    /// sha256, sha512, md5 or sha1 (case-insensitive)
    #[arg(default_value = "sha256")]
    algorithm: String,

    /// Bytes read per iteration
    #[arg(long, default_value_t = DEFAULT_BLOCK_SIZE)]
    block_size: usize,
}

fn main() -> ExitCode {
    // Diagnostics go to stderr so stdout carries only the result.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hashd=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let algorithm = args.algorithm.to_lowercase();

    match hash_file_named(&args.path, &algorithm, args.block_size) {
        Ok(hex) => {
            println!(
                "{} hash of {}:\n{}",
                algorithm.to_uppercase(),
                args.path.display(),
                hex
            );
            ExitCode::SUCCESS
        }
        Err(e) if e.is_invalid_argument() => {
            eprintln!("error: {}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
