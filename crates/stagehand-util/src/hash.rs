//! Streaming content digests (MD5, SHA-1, SHA-256, SHA-512).
//!
//! Input is consumed in fixed-size chunks so arbitrarily large artifacts are
//! hashed without being buffered in memory.

use std::fmt;
use std::io::Read;
use std::path::Path;

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};

const CHUNK_SIZE: usize = 8192;

/// Digest algorithms used for Maven checksum sidecars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Md5,
    Sha1,
    Sha256,
    Sha512,
}

impl Algorithm {
    /// File extension of the sidecar carrying this digest (without the dot).
    pub fn extension(self) -> &'static str {
        match self {
            Algorithm::Md5 => "md5",
            Algorithm::Sha1 => "sha1",
            Algorithm::Sha256 => "sha256",
            Algorithm::Sha512 => "sha512",
        }
    }

    pub const ALL: [Algorithm; 4] = [
        Algorithm::Md5,
        Algorithm::Sha1,
        Algorithm::Sha256,
        Algorithm::Sha512,
    ];
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::Md5 => "MD5",
            Algorithm::Sha1 => "SHA-1",
            Algorithm::Sha256 => "SHA-256",
            Algorithm::Sha512 => "SHA-512",
        };
        f.write_str(name)
    }
}

/// Hash everything readable from `reader`, returning a lowercase hex string.
pub fn digest_reader<R: Read>(reader: R, algorithm: Algorithm) -> std::io::Result<String> {
    match algorithm {
        Algorithm::Md5 => stream::<Md5, R>(reader),
        Algorithm::Sha1 => stream::<Sha1, R>(reader),
        Algorithm::Sha256 => stream::<Sha256, R>(reader),
        Algorithm::Sha512 => stream::<Sha512, R>(reader),
    }
}

/// Hash a file on disk, returning a lowercase hex string.
pub fn digest_file(path: &Path, algorithm: Algorithm) -> std::io::Result<String> {
    let file = std::fs::File::open(path)?;
    digest_reader(file, algorithm)
}

/// Hash a byte slice, returning a lowercase hex string.
pub fn digest_bytes(data: &[u8], algorithm: Algorithm) -> String {
    // Reading from a slice cannot fail.
    digest_reader(data, algorithm).unwrap_or_default()
}

/// Compute the SHA-256 hash of a file, returning a lowercase hex string.
pub fn sha256_file(path: &Path) -> std::io::Result<String> {
    digest_file(path, Algorithm::Sha256)
}

/// Compute the MD5 hash of a byte slice, returning a lowercase hex string.
pub fn md5_bytes(data: &[u8]) -> String {
    digest_bytes(data, Algorithm::Md5)
}

fn stream<D: Digest, R: Read>(mut reader: R) -> std::io::Result<String> {
    let mut hasher = D::new();
    let mut buffer = [0u8; CHUNK_SIZE];
    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(to_hex(&hasher.finalize()))
}

fn to_hex(bytes: &[u8]) -> String {
    use fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// Extract the hex hash from a checksum file.
///
/// Maven checksum files may contain just the hash, or `hash  filename`.
pub fn extract_hash(content: &str) -> String {
    content.split_whitespace().next().unwrap_or("").to_string()
}
