//! Architecture-dispatched digit-run decoding.
//!
//! `simd_str2int(chunk, need)` folds up to 16 consecutive ASCII decimal
//! digits from the front of `chunk` into a single `u64`, stopping early at
//! the first non-digit byte. It returns `(value, count)` where `count` is
//! how many of the first `need` bytes were actually digits. Callers must
//! ensure `chunk.len() >= 16` and `need <= 16`; the vector paths read a full
//! 16-byte lane regardless of `need` and rely on the caller's masking.

use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(all(target_arch = "x86_64", target_feature = "sse2"))] {
        mod x86_64;
        pub(crate) use self::x86_64::simd_str2int;
    } else if #[cfg(all(target_arch = "aarch64", target_feature = "neon"))] {
        mod aarch64;
        pub(crate) use self::aarch64::simd_str2int;
    } else {
        mod fallback;
        pub(crate) use self::fallback::simd_str2int;
    }
}
