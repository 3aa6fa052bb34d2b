//! Randomized property checks for the fusion engine.
//! Seeded, so failures reproduce.

use post_quality_scorer::fusion::signals::Signals;
use post_quality_scorer::fusion::{
    fuse, Bucket, ConfidenceLevel, FusionInput, FusionParams, FusionWeights, PostFacts,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

const ROUNDS: usize = 2_000;

fn random_signals(rng: &mut StdRng) -> Signals {
    Signals {
        clip_similarity: rng.random_range(0.0..=1.0),
        sentiment: rng.random_range(0.0..=1.0),
        hashtag_relevance: rng.random_range(0.0..=1.0),
        hashtag_quantity: [0.0, 0.05, 0.10][rng.random_range(0..3)],
        readability: rng.random_range(0.0..=1.0),
        face_presence: if rng.random_bool(0.5) { 1.0 } else { 0.0 },
        dimension_quality: rng.random_range(0.0..=1.0),
    }
}

/// Random non-negative weights normalized to sum to one.
fn random_weights(rng: &mut StdRng) -> FusionWeights {
    let raw: [f64; 7] = std::array::from_fn(|_| rng.random_range(0.01..1.0));
    let total: f64 = raw.iter().sum();
    let w = raw.map(|x| x / total);
    FusionWeights {
        clip_similarity: w[0],
        sentiment: w[1],
        hashtag_relevance: w[2],
        hashtag_quantity: w[3],
        readability: w[4],
        face_presence: w[5],
        dimension_quality: w[6],
    }
}

#[test]
fn score_and_interval_bounds_hold_for_random_posts() {
    let mut rng = StdRng::seed_from_u64(0x5C0E);
    for i in 0..ROUNDS {
        let input = FusionInput {
            signals: random_signals(&mut rng),
            facts: PostFacts {
                hashtag_count: rng.random_range(0..8),
                ..PostFacts::default()
            },
        };
        let weights = if i % 2 == 0 {
            FusionWeights::DEFAULT
        } else {
            random_weights(&mut rng)
        };
        for confidence in ConfidenceLevel::ALL {
            let params = FusionParams {
                confidence,
                effective_sample_size: rng.random_range(1..500),
            };
            let r = fuse(&input, &weights, &params);
            let ci = r.confidence_interval;

            assert!((0.0..=100.0).contains(&r.final_score), "round {i}: {r:?}");
            assert!(
                0.0 <= ci.low && ci.low <= r.final_score && r.final_score <= ci.high && ci.high <= 100.0,
                "round {i}: {ci:?} vs {}",
                r.final_score
            );
            assert_eq!(r.bucket, Bucket::from_score(r.final_score));
            // One decimal.
            assert_eq!((r.final_score * 10.0).round() / 10.0, r.final_score);
        }
    }
}

#[test]
fn out_of_range_signals_are_clamped_not_rejected() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..ROUNDS {
        let wild = Signals {
            clip_similarity: rng.random_range(-5.0..5.0),
            sentiment: rng.random_range(-5.0..5.0),
            hashtag_relevance: rng.random_range(-5.0..5.0),
            hashtag_quantity: rng.random_range(-5.0..5.0),
            readability: rng.random_range(-5.0..5.0),
            face_presence: rng.random_range(-5.0..5.0),
            dimension_quality: rng.random_range(-5.0..5.0),
        };
        let wild_input = FusionInput {
            signals: wild,
            ..FusionInput::default()
        };
        let clamped_input = FusionInput {
            signals: wild.clamped(),
            ..FusionInput::default()
        };
        let params = FusionParams::default();
        let a = fuse(&wild_input, &FusionWeights::DEFAULT, &params);
        let b = fuse(&clamped_input, &FusionWeights::DEFAULT, &params);
        assert_eq!(a, b);
    }
}
