//! Debug-tier event sampling.

use super::config::clamp_rate;
use super::events::Level;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Sampling decision for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sampling {
    Keep,
    Drop,
}

/// Randomly drops debug-tier events; every other level is kept.
///
/// Each debug-tier event consumes exactly one draw `u` in [0, 1) and is
/// dropped iff `u > rate`. Rate 1 keeps all of them; rate 0 keeps only an
/// exact zero draw (probability 2^-53).
#[derive(Debug, Clone)]
pub struct Sampler {
    rate: f64,
    rng: StdRng,
}

impl Sampler {
    /// Create a sampler seeded from the OS.
    pub fn new(rate: f64) -> Self {
        Self::with_rng(rate, StdRng::from_os_rng())
    }

    /// Create a sampler with an explicit random source.
    pub fn with_rng(rate: f64, rng: StdRng) -> Self {
        Self {
            rate: clamp_rate(rate),
            rng,
        }
    }

    /// Effective (clamped) rate.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn sample(&mut self, level: Level) -> Sampling {
        if !level.is_debug_tier() {
            return Sampling::Keep;
        }

        let draw: f64 = self.rng.random();
        decide(draw, self.rate)
    }
}

fn decide(draw: f64, rate: f64) -> Sampling {
    if draw > rate {
        Sampling::Drop
    } else {
        Sampling::Keep
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIALS: usize = 1000;

    fn seeded(rate: f64) -> Sampler {
        Sampler::with_rng(rate, StdRng::seed_from_u64(7))
    }

    fn count_kept(sampler: &mut Sampler, level: Level) -> usize {
        (0..TRIALS)
            .filter(|_| sampler.sample(level) == Sampling::Keep)
            .count()
    }

    #[test]
    fn test_rate_zero_drops_all_debug() {
        let mut sampler = Sampler::new(0.0);
        assert_eq!(count_kept(&mut sampler, Level::Debug), 0);
        assert_eq!(count_kept(&mut sampler, Level::Trace), 0);
    }

    #[test]
    fn test_rate_zero_keeps_other_levels() {
        let mut sampler = Sampler::new(0.0);
        for level in [Level::Info, Level::Warn, Level::Error] {
            assert_eq!(count_kept(&mut sampler, level), TRIALS);
        }
    }

    #[test]
    fn test_rate_one_keeps_all_debug() {
        let mut sampler = Sampler::new(1.0);
        assert_eq!(count_kept(&mut sampler, Level::Debug), TRIALS);
    }

    #[test]
    fn test_draw_equal_to_rate_is_kept() {
        assert_eq!(decide(0.5, 0.5), Sampling::Keep);
        assert_eq!(decide(0.0, 0.0), Sampling::Keep);
        assert_eq!(decide(0.25, 0.5), Sampling::Keep);
        assert_eq!(decide(0.5000001, 0.5), Sampling::Drop);
        assert_eq!(decide(f64::MIN_POSITIVE, 0.0), Sampling::Drop);
    }

    #[test]
    fn test_rate_clamped() {
        assert_eq!(Sampler::new(3.5).rate(), 1.0);
        assert_eq!(Sampler::new(-1.0).rate(), 0.0);
        assert_eq!(Sampler::new(f64::NAN).rate(), 0.0);
        assert_eq!(Sampler::new(0.3).rate(), 0.3);
    }

    #[test]
    fn test_partial_rate_is_roughly_proportional() {
        let mut sampler = seeded(0.5);
        let kept = count_kept(&mut sampler, Level::Debug);
        // Loose bound; a fair coin over 1000 draws stays well inside it.
        assert!((350..=650).contains(&kept), "kept {} of {}", kept, TRIALS);
    }

    #[test]
    fn test_same_seed_same_decisions() {
        let mut a = seeded(0.4);
        let mut b = seeded(0.4);
        for _ in 0..100 {
            assert_eq!(a.sample(Level::Debug), b.sample(Level::Debug));
        }
    }

    #[test]
    fn test_non_debug_consumes_no_draw() {
        let mut a = seeded(0.5);
        let mut b = seeded(0.5);
        for _ in 0..10 {
            a.sample(Level::Info);
        }
        for _ in 0..50 {
            assert_eq!(a.sample(Level::Debug), b.sample(Level::Debug));
        }
    }
}
