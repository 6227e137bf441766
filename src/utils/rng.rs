use rand::{prelude::*, rngs::StdRng};

#[cfg(debug_assertions)]
pub fn make_rng() -> StdRng {
    const SEED: u64 = 63;
    seeded_rng(SEED)
}

#[cfg(not(debug_assertions))]
pub fn make_rng() -> StdRng {
    use rand::{rngs::SysRng, TryRng};
    match SysRng::try_next_u64(&mut SysRng) {
        Ok(seed) => seeded_rng(seed),
        // no OS entropy
        Err(_) => seeded_rng(63),
    }
}

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
