//! File hashing utilities

use clap::ValueEnum;
use sha2::digest::Digest;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::utils::config::HashingConsts;

/// Hash applied to file content. MD5 is the default so output matches `md5sum`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum HashAlgorithm {
    #[default]
    Md5,
    Sha256,
    Blake3,
}

impl HashAlgorithm {
    pub fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Blake3 => "blake3",
        }
    }

    /// Length of the hex digest this algorithm produces.
    pub fn hex_len(self) -> usize {
        match self {
            HashAlgorithm::Md5 => 32,
            HashAlgorithm::Sha256 | HashAlgorithm::Blake3 => 64,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Digest function used by the worker pool: path in, lowercase hex digest out.
///
/// Implemented by [`HashAlgorithm`] and by any `Fn(&Path) -> io::Result<String> + Sync`,
/// so callers can plug their own hash.
pub trait FileDigest: Sync {
    fn digest_file(&self, path: &Path) -> io::Result<String>;
}

impl FileDigest for HashAlgorithm {
    fn digest_file(&self, path: &Path) -> io::Result<String> {
        let file = File::open(path)?;
        digest_reader(*self, file)
    }
}

impl<F> FileDigest for F
where
    F: Fn(&Path) -> io::Result<String> + Sync,
{
    fn digest_file(&self, path: &Path) -> io::Result<String> {
        self(path)
    }
}

/// Stream `reader` through `algorithm` in fixed-size chunks and return the hex digest.
pub fn digest_reader<R: Read>(algorithm: HashAlgorithm, reader: R) -> io::Result<String> {
    match algorithm {
        HashAlgorithm::Md5 => stream_digest::<md5::Md5, _>(reader),
        HashAlgorithm::Sha256 => stream_digest::<sha2::Sha256, _>(reader),
        HashAlgorithm::Blake3 => {
            let mut hasher = blake3::Hasher::new();
            for_each_chunk(reader, |chunk| {
                hasher.update(chunk);
            })?;
            Ok(hex::encode(hasher.finalize().as_bytes()))
        }
    }
}

/// Hash a whole file with `algorithm`.
pub fn digest_file(algorithm: HashAlgorithm, path: &Path) -> io::Result<String> {
    algorithm.digest_file(path)
}

fn stream_digest<D: Digest, R: Read>(reader: R) -> io::Result<String> {
    let mut hasher = D::new();
    for_each_chunk(reader, |chunk| hasher.update(chunk))?;
    Ok(hex::encode(hasher.finalize()))
}

fn for_each_chunk<R: Read>(mut reader: R, mut f: impl FnMut(&[u8])) -> io::Result<()> {
    let mut buffer = vec![0u8; HashingConsts::READ_CHUNK_SIZE];
    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        f(&buffer[..n]);
    }
    Ok(())
}
