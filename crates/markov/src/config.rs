#![forbid(unsafe_code)]

use std::env;

use rand_chacha::ChaCha8Rng;

/// How the corpus is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildConfig {
    /// build speakers on the rayon pool instead of one after another
    pub parallel: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl BuildConfig {
    /// Defaults, with `MARKOV_PARALLEL=0|false` switching to sequential.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(v) = env::var("MARKOV_PARALLEL") {
            config.parallel = !(v == "0" || v.eq_ignore_ascii_case("false"));
        }
        config
    }
}

/// How text is generated from a built chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateConfig {
    /// hard cap on tokens per walk
    pub max_tokens: usize,
    /// RNG seed, same seed -> same text
    pub seed: u64,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self { max_tokens: 32, seed: 42 }
    }
}

impl GenerateConfig {
    /// Defaults overridden by `MARKOV_MAX_TOKENS` and `MARKOV_SEED`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = env::var("MARKOV_MAX_TOKENS") {
            if let Ok(n) = v.parse() {
                config.max_tokens = n;
            } else {
                tracing::warn!(value = %v, "ignoring unparsable MARKOV_MAX_TOKENS");
            }
        }

        if let Ok(v) = env::var("MARKOV_SEED") {
            if let Ok(s) = v.parse() {
                config.seed = s;
            } else {
                tracing::warn!(value = %v, "ignoring unparsable MARKOV_SEED");
            }
        }

        config
    }

    /// Fresh RNG seeded from `seed`.
    pub fn rng(&self) -> ChaCha8Rng {
        markov_core::make_rng(self.seed)
    }
}
