//! Seeding helpers shared by the randomized searches.

use rand::rngs::SmallRng;
use rand::SeedableRng;

/// SplitMix64 mixer for deriving well-spread seeds from small user seeds.
#[inline]
pub(crate) fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Builds a fast RNG from an optional seed; `None` draws one from the OS.
pub(crate) fn seeded_rng(seed: Option<u64>) -> SmallRng {
    let base = seed.unwrap_or_else(rand::random::<u64>);
    SmallRng::seed_from_u64(splitmix64(base))
}
