//! Weighted random generation of spirit roots.

use std::collections::BTreeSet;

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};

use crate::error::SpiritRootError;

use super::descriptor::SpiritRoot;
use super::vocab::{Attribute, COUNT_WEIGHTS, Tier};

/// Samples spirit roots from the configured vocabulary weights.
///
/// Generation is a pure function of the RNG passed in; seed it for
/// reproducible rolls.
#[derive(Clone, Debug)]
pub struct SpiritRootGenerator {
    count_dist: WeightedIndex<f64>,
    attribute_dist: WeightedIndex<f64>,
    tier_dist: WeightedIndex<f64>,
    max_attempts: u32,
}

impl SpiritRootGenerator {
    /// Relative error accepted by [`generate_near`](Self::generate_near).
    pub const TOLERANCE: f64 = 0.1;

    /// Default cap on rejection-sampling attempts.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 100_000;

    pub fn new() -> Self {
        // The vocabulary weights are compile-time constants, all positive.
        let count_dist = WeightedIndex::new(COUNT_WEIGHTS).expect("count weights are positive");
        let attribute_dist = WeightedIndex::new(Attribute::ALL.map(Attribute::weight))
            .expect("attribute weights are positive");
        let tier_dist =
            WeightedIndex::new(Tier::ALL.map(Tier::weight)).expect("tier weights are positive");

        Self {
            count_dist,
            attribute_dist,
            tier_dist,
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Caps the number of draws made by [`generate_near`](Self::generate_near).
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Rolls one spirit root.
    ///
    /// 1. Draw an attribute count `k` from the count weights.
    /// 2. Draw `k` attributes with replacement, then deduplicate. The realized
    ///    count can therefore be lower than `k`.
    /// 3. Draw one tier.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> SpiritRoot {
        let count = self.count_dist.sample(rng) + 1;

        let attributes: BTreeSet<Attribute> = (0..count)
            .map(|_| Attribute::ALL[self.attribute_dist.sample(rng)])
            .collect();

        let tier = Tier::ALL[self.tier_dist.sample(rng)];

        SpiritRoot::new(attributes, tier)
            .expect("sampled attribute count is within 1..=MAX_ATTRIBUTES")
    }

    /// Rolls spirit roots until one's value is within [`Self::TOLERANCE`] of
    /// `target` (relative error).
    ///
    /// Fails fast with [`SpiritRootError::TargetUnreachable`] when no
    /// canonical root can satisfy the target, and with
    /// [`SpiritRootError::AttemptsExhausted`] once the attempt budget is spent.
    pub fn generate_near<R: Rng + ?Sized>(
        &self,
        target: u64,
        rng: &mut R,
    ) -> Result<SpiritRoot, SpiritRootError> {
        if target == 0 {
            return Err(SpiritRootError::InvalidTarget { target });
        }
        if !is_reachable(target) {
            return Err(SpiritRootError::TargetUnreachable {
                target,
                tolerance: Self::TOLERANCE,
            });
        }

        for _ in 0..self.max_attempts {
            let root = self.generate(rng);
            if within_tolerance(root.value(), target) {
                return Ok(root);
            }
        }

        Err(SpiritRootError::AttemptsExhausted {
            target,
            attempts: self.max_attempts,
        })
    }
}

impl Default for SpiritRootGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Rolls one spirit root with the thread-local RNG.
pub fn generate() -> SpiritRoot {
    SpiritRootGenerator::new().generate(&mut rand::thread_rng())
}

/// Rolls a spirit root near `target` with the thread-local RNG and the
/// default attempt budget.
pub fn generate_near(target: u64) -> Result<SpiritRoot, SpiritRootError> {
    SpiritRootGenerator::new().generate_near(target, &mut rand::thread_rng())
}

/// True when some canonical root has a value within tolerance of `target`.
pub fn is_reachable(target: u64) -> bool {
    target > 0 && SpiritRoot::all().any(|root| within_tolerance(root.value(), target))
}

fn within_tolerance(value: u64, target: u64) -> bool {
    let error = (value as f64 - target as f64).abs() / target as f64;
    error < SpiritRootGenerator::TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spirit_root::{MAX_ATTRIBUTES, is_legal};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn generated_roots_respect_invariants() {
        let generator = SpiritRootGenerator::new();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..5_000 {
            let root = generator.generate(&mut rng);
            assert!((1..=MAX_ATTRIBUTES).contains(&root.len()));
            assert!(Tier::ALL.contains(&root.tier()));

            let text = root.to_string();
            assert!(text.contains('_'));
            assert!(is_legal(&text), "{text}");
            assert_eq!(text.parse::<SpiritRoot>().unwrap(), root);
        }
    }

    #[test]
    fn same_seed_same_rolls() {
        let generator = SpiritRootGenerator::new();
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            assert_eq!(generator.generate(&mut a), generator.generate(&mut b));
        }
    }

    #[test]
    fn common_tier_dominates() {
        let generator = SpiritRootGenerator::new();
        let mut rng = StdRng::seed_from_u64(1);

        let common = (0..10_000)
            .filter(|_| generator.generate(&mut rng).tier() == Tier::Common)
            .count();
        // expected 7000
        assert!((6_500..7_500).contains(&common), "{common}");
    }

    #[test]
    fn generate_near_hits_target_band() {
        let generator = SpiritRootGenerator::new();
        let mut rng = StdRng::seed_from_u64(3);

        for target in [422, 1_000, 2_000] {
            let root = generator.generate_near(target, &mut rng).unwrap();
            let error = (root.value() as f64 - target as f64).abs() / target as f64;
            assert!(error < 0.1, "{target}: {root} = {}", root.value());
        }
    }

    #[test]
    fn zero_target_is_rejected() {
        let generator = SpiritRootGenerator::new();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            generator.generate_near(0, &mut rng),
            Err(SpiritRootError::InvalidTarget { target: 0 })
        );
    }

    #[test]
    fn unreachable_target_fails_fast() {
        // the cheapest root is worth 422
        assert!(!is_reachable(100));
        assert!(is_reachable(400));

        let generator = SpiritRootGenerator::new();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            generator.generate_near(100, &mut rng),
            Err(SpiritRootError::TargetUnreachable { target: 100, .. })
        ));
    }

    #[test]
    fn attempt_budget_is_enforced() {
        // the strongest root is reachable but astronomically unlikely
        let target = SpiritRoot::all().map(|r| r.value()).max().unwrap();
        let generator = SpiritRootGenerator::new().with_max_attempts(10);
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(
            generator.generate_near(target, &mut rng),
            Err(SpiritRootError::AttemptsExhausted {
                target,
                attempts: 10
            })
        );
    }
}
