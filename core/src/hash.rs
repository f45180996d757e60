use digest::Digest as _;
use md4::Md4;
use md5::Md5;
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};
use sha3::{Sha3_224, Sha3_256, Sha3_384, Sha3_512};

use crate::error::{RainbowError, RainbowResult};

/// All supported hash algorithms, numbered following Go's `crypto.Hash`
/// registry ordering so that tables produced against that numbering remain
/// readable. The ordering is part of the on-disk compatibility contract and
/// must never be renumbered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u16)]
pub enum HashAlgo {
    Md4 = 1,
    Md5 = 2,
    Sha1 = 3,
    Sha224 = 4,
    Sha256 = 5,
    Sha384 = 6,
    Sha512 = 7,
    Sha3_224 = 10,
    Sha3_256 = 11,
    Sha3_384 = 12,
    Sha3_512 = 13,
}

impl HashAlgo {
    /// The stable numeric identifier written into the table signature.
    pub fn id(&self) -> u16 {
        *self as u16
    }

    /// Looks up an algorithm by its numeric identifier.
    pub fn from_id(id: u16) -> RainbowResult<Self> {
        Ok(match id {
            1 => HashAlgo::Md4,
            2 => HashAlgo::Md5,
            3 => HashAlgo::Sha1,
            4 => HashAlgo::Sha224,
            5 => HashAlgo::Sha256,
            6 => HashAlgo::Sha384,
            7 => HashAlgo::Sha512,
            10 => HashAlgo::Sha3_224,
            11 => HashAlgo::Sha3_256,
            12 => HashAlgo::Sha3_384,
            13 => HashAlgo::Sha3_512,
            other => {
                return Err(RainbowError::Config(format!(
                    "unknown hash algorithm id {other}"
                )))
            }
        })
    }

    /// The digest width `D` in bytes.
    pub fn digest_size(&self) -> usize {
        match self {
            HashAlgo::Md4 => <Md4 as digest::Digest>::output_size(),
            HashAlgo::Md5 => <Md5 as digest::Digest>::output_size(),
            HashAlgo::Sha1 => <Sha1 as digest::Digest>::output_size(),
            HashAlgo::Sha224 => <Sha224 as digest::Digest>::output_size(),
            HashAlgo::Sha256 => <Sha256 as digest::Digest>::output_size(),
            HashAlgo::Sha384 => <Sha384 as digest::Digest>::output_size(),
            HashAlgo::Sha512 => <Sha512 as digest::Digest>::output_size(),
            HashAlgo::Sha3_224 => <Sha3_224 as digest::Digest>::output_size(),
            HashAlgo::Sha3_256 => <Sha3_256 as digest::Digest>::output_size(),
            HashAlgo::Sha3_384 => <Sha3_384 as digest::Digest>::output_size(),
            HashAlgo::Sha3_512 => <Sha3_512 as digest::Digest>::output_size(),
        }
    }
}

/// Wraps a single, already-constructed hasher so its internal state can be
/// reset and reused across an entire chain instead of reallocated per call.
enum Inner {
    Md4(Md4),
    Md5(Md5),
    Sha1(Sha1),
    Sha224(Sha224),
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
    Sha3_224(Sha3_224),
    Sha3_256(Sha3_256),
    Sha3_384(Sha3_384),
    Sha3_512(Sha3_512),
}

/// `(preimage, out_buffer) -> digest` over a chosen hash primitive, reusing
/// one hasher instance for its whole lifetime. A fresh adapter is obtained
/// per compile; it must not be shared across threads.
pub(crate) struct HashAdapter {
    algo: HashAlgo,
    inner: Inner,
}

impl HashAdapter {
    pub(crate) fn new(algo: HashAlgo) -> Self {
        let inner = match algo {
            HashAlgo::Md4 => Inner::Md4(Md4::new()),
            HashAlgo::Md5 => Inner::Md5(Md5::new()),
            HashAlgo::Sha1 => Inner::Sha1(Sha1::new()),
            HashAlgo::Sha224 => Inner::Sha224(Sha224::new()),
            HashAlgo::Sha256 => Inner::Sha256(Sha256::new()),
            HashAlgo::Sha384 => Inner::Sha384(Sha384::new()),
            HashAlgo::Sha512 => Inner::Sha512(Sha512::new()),
            HashAlgo::Sha3_224 => Inner::Sha3_224(Sha3_224::new()),
            HashAlgo::Sha3_256 => Inner::Sha3_256(Sha3_256::new()),
            HashAlgo::Sha3_384 => Inner::Sha3_384(Sha3_384::new()),
            HashAlgo::Sha3_512 => Inner::Sha3_512(Sha3_512::new()),
        };
        Self { algo, inner }
    }

    pub(crate) fn digest_size(&self) -> usize {
        self.algo.digest_size()
    }

    /// Absorbs `preimage`, writes the digest into `out` (replacing its
    /// contents), and resets the internal hasher state for the next call.
    pub(crate) fn hash(&mut self, preimage: &[u8], out: &mut Vec<u8>) {
        out.clear();
        macro_rules! finish {
            ($hasher:expr) => {{
                digest::Digest::update(&mut *$hasher, preimage);
                out.extend_from_slice(&digest::Digest::finalize_reset(&mut *$hasher));
            }};
        }
        match &mut self.inner {
            Inner::Md4(h) => finish!(h),
            Inner::Md5(h) => finish!(h),
            Inner::Sha1(h) => finish!(h),
            Inner::Sha224(h) => finish!(h),
            Inner::Sha256(h) => finish!(h),
            Inner::Sha384(h) => finish!(h),
            Inner::Sha512(h) => finish!(h),
            Inner::Sha3_224(h) => finish!(h),
            Inner::Sha3_256(h) => finish!(h),
            Inner::Sha3_384(h) => finish!(h),
            Inner::Sha3_512(h) => finish!(h),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn md5_matches_known_vector() {
        let mut adapter = HashAdapter::new(HashAlgo::Md5);
        let mut out = Vec::new();
        adapter.hash(b"", &mut out);
        assert_eq!(hex_encode(&out), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn reused_adapter_resets_between_calls() {
        let mut adapter = HashAdapter::new(HashAlgo::Sha1);
        let mut first = Vec::new();
        let mut second = Vec::new();
        adapter.hash(b"abc", &mut first);
        adapter.hash(b"abc", &mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn ids_follow_go_crypto_hash_ordering() {
        assert_eq!(HashAlgo::Md5.id(), 2);
        assert_eq!(HashAlgo::Sha1.id(), 3);
    }

    fn hex_encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}
