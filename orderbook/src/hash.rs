//! Fixed finalizer hash for the order-id and symbol tables.
//!
//! Order ids and symbols come straight off an exchange counter (or a
//! big-endian-packed ticker); both collide badly under identity hashing
//! once folded into a power-of-two bucket count. This mixes the key through
//! the same three-stage multiply-shift finalizer the original C++ feed used
//! (Austin Appleby's 64-bit avalanche), then hands it to `std::HashMap`,
//! which is itself already an open-addressed table.

use std::hash::{BuildHasherDefault, Hasher};

#[derive(Default)]
pub(crate) struct MixHasher(u64);

impl Hasher for MixHasher {
    #[inline]
    fn finish(&self) -> u64 {
        let mut h = self.0;
        h ^= h >> 33;
        h = h.wrapping_mul(0xff51afd7ed558ccd);
        h ^= h >> 33;
        h = h.wrapping_mul(0xc4ceb9fe1a85ec53);
        h ^= h >> 33;
        h
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        // Only ever fed u64 keys in this crate; fold arbitrary byte spans in
        // case that ever changes instead of panicking.
        for chunk in bytes.chunks(8) {
            let mut buf = [0u8; 8];
            buf[..chunk.len()].copy_from_slice(chunk);
            self.0 ^= u64::from_ne_bytes(buf);
        }
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.0 = i;
    }
}

pub(crate) type MixBuildHasher = BuildHasherDefault<MixHasher>;
