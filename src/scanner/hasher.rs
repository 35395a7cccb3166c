//! Content digests for duplicate confirmation.
//!
//! # Overview
//!
//! This module provides the [`Hasher`] struct, which computes hex digests
//! of file content with one of two backends:
//!
//! - **xxHash64** (cargo feature `xxhash`, on by default): fast 64-bit
//!   non-cryptographic digest.
//! - **BLAKE3-128**: portable fallback, BLAKE3 truncated to 128 bits.
//!
//! The backend is chosen once per process (see [`active_backend`]) and its
//! name is what the UI shows as the hashing mode indicator.
//!
//! Two digests are exposed:
//!
//! - [`Hasher::full_digest`]: the whole file, streamed through a 64 KiB buffer.
//! - [`Hasher::partial_digest`]: the first and last 8 KiB only. Files smaller
//!   than two chunks get their full digest instead.
//!
//! Both return an empty string on any I/O failure; an empty digest never
//! matches anything downstream. The hasher keeps no cache.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::OnceLock;

/// Size of the head and tail chunks read by the partial digest.
pub const CHUNK_SIZE: u64 = 8 * 1024;

/// Read buffer size for full digests.
pub const BUFFER_SIZE: usize = 64 * 1024;

/// Digest algorithm used by a [`Hasher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashBackend {
    /// 64-bit xxHash, seed 0
    XxHash64,
    /// BLAKE3 truncated to its first 16 bytes
    Blake3,
}

impl HashBackend {
    /// Pick the preferred backend compiled into this binary.
    #[must_use]
    pub fn detect() -> Self {
        if Self::XxHash64.is_available() {
            Self::XxHash64
        } else {
            Self::Blake3
        }
    }

    /// Whether this backend was compiled in.
    #[must_use]
    pub fn is_available(self) -> bool {
        match self {
            Self::XxHash64 => cfg!(feature = "xxhash"),
            Self::Blake3 => true,
        }
    }

    /// Display name used as the mode indicator.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::XxHash64 => "xxHash64",
            Self::Blake3 => "BLAKE3-128",
        }
    }

    /// Length of a hex digest produced by this backend.
    #[must_use]
    pub fn hex_len(self) -> usize {
        match self {
            Self::XxHash64 => 16,
            Self::Blake3 => 32,
        }
    }
}

impl std::fmt::Display for HashBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The backend for this process, resolved on first use and constant afterwards.
pub fn active_backend() -> HashBackend {
    static BACKEND: OnceLock<HashBackend> = OnceLock::new();
    *BACKEND.get_or_init(|| {
        let backend = HashBackend::detect();
        log::debug!("Hash backend: {}", backend);
        backend
    })
}

/// Streaming digest state for either backend.
enum DigestState {
    #[cfg(feature = "xxhash")]
    XxHash64(twox_hash::XxHash64),
    Blake3(Box<blake3::Hasher>),
}

impl DigestState {
    fn new(backend: HashBackend) -> Self {
        match backend {
            #[cfg(feature = "xxhash")]
            HashBackend::XxHash64 => Self::XxHash64(twox_hash::XxHash64::with_seed(0)),
            _ => Self::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            #[cfg(feature = "xxhash")]
            Self::XxHash64(state) => std::hash::Hasher::write(state, data),
            Self::Blake3(state) => {
                state.update(data);
            }
        }
    }

    fn finish_hex(self) -> String {
        match self {
            #[cfg(feature = "xxhash")]
            Self::XxHash64(state) => format!("{:016x}", std::hash::Hasher::finish(&state)),
            Self::Blake3(state) => to_hex(&state.finalize().as_bytes()[..16]),
        }
    }
}

/// Lowercase hex encoding.
fn to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;

    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
        let _ = write!(out, "{:02x}", b);
        out
    })
}

/// File content hasher.
///
/// Cheap to construct and `Copy`; share it freely across worker threads.
#[derive(Debug, Clone, Copy)]
pub struct Hasher {
    backend: HashBackend,
    chunk_size: u64,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher using the process-wide backend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            backend: active_backend(),
            chunk_size: CHUNK_SIZE,
        }
    }

    /// Create a hasher for a specific backend.
    ///
    /// Falls back to the detected backend when `backend` was not compiled in.
    #[must_use]
    pub fn with_backend(backend: HashBackend) -> Self {
        let backend = if backend.is_available() {
            backend
        } else {
            log::warn!("{} is not available, using {}", backend, HashBackend::detect());
            HashBackend::detect()
        };
        Self {
            backend,
            chunk_size: CHUNK_SIZE,
        }
    }

    /// Override the head/tail chunk size of the partial digest, clamped to
    /// `1..=BUFFER_SIZE`.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size.clamp(1, BUFFER_SIZE as u64);
        self
    }

    /// The backend in use.
    #[must_use]
    pub fn backend(&self) -> HashBackend {
        self.backend
    }

    /// The head/tail chunk size of the partial digest.
    #[must_use]
    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    /// Digest of the entire file content, or `""` on I/O failure.
    #[must_use]
    pub fn full_digest(&self, path: &Path) -> String {
        match self.try_full_digest(path) {
            Ok(digest) => digest,
            Err(e) => {
                log::debug!("Failed to hash {}: {}", path.display(), e);
                String::new()
            }
        }
    }

    /// Digest of the first and last chunk, or `""` on I/O failure.
    ///
    /// `size` is the size recorded at scan time. Files smaller than two
    /// chunks get their full digest.
    #[must_use]
    pub fn partial_digest(&self, path: &Path, size: u64) -> String {
        if size < self.chunk_size * 2 {
            return self.full_digest(path);
        }
        match self.try_partial_digest(path) {
            Ok(digest) => digest,
            Err(e) => {
                log::debug!("Failed to partially hash {}: {}", path.display(), e);
                String::new()
            }
        }
    }

    fn try_full_digest(&self, path: &Path) -> io::Result<String> {
        let mut file = File::open(path)?;
        let mut state = DigestState::new(self.backend);
        let mut buffer = vec![0u8; BUFFER_SIZE];

        loop {
            match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => state.update(&buffer[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(state.finish_hex())
    }

    fn try_partial_digest(&self, path: &Path) -> io::Result<String> {
        let mut file = File::open(path)?;
        let mut state = DigestState::new(self.backend);
        let mut chunk = vec![0u8; self.chunk_size as usize];

        file.read_exact(&mut chunk)?;
        state.update(&chunk);

        // The file may have shrunk since the scan; read_exact then fails
        // and the entry drops out instead of producing a torn digest.
        file.seek(SeekFrom::End(-(self.chunk_size as i64)))?;
        file.read_exact(&mut chunk)?;
        state.update(&chunk);

        Ok(state.finish_hex())
    }
}

/// Full digest with the process-wide hasher.
#[must_use]
pub fn full_digest(path: &Path) -> String {
    Hasher::new().full_digest(path)
}

/// Partial digest with the process-wide hasher.
#[must_use]
pub fn partial_digest(path: &Path, size: u64) -> String {
    Hasher::new().partial_digest(path, size)
}
