use super::cluster::{kmeans, populated_clusters, CLUSTER_SEED};
use super::embedding::MockEmbedder;
use super::naive;
use super::*;

fn sized(bytes: i64) -> ImpactInput {
    ImpactInput {
        size_bytes: Some(bytes),
        description: None,
    }
}

fn described(text: &str) -> ImpactInput {
    ImpactInput {
        size_bytes: None,
        description: Some(text.to_string()),
    }
}

fn mock_assessor(vectors: Vec<Vec<f32>>) -> ImpactAssessor {
    ImpactAssessor::with_embedder(Box::new(MockEmbedder { vectors }))
}

#[test]
fn naive_empty_input_is_low_with_zero_total() {
    let result = naive::assess(&[]);
    assert_eq!(result.level, ImpactLevel::Low);
    assert_eq!(
        result.outcome,
        ImpactOutcome::Naive {
            total_size_bytes: 0
        }
    );
    assert!(!result.explanation.is_empty());
}

#[test]
fn naive_treats_missing_sizes_as_zero() {
    let inputs = [ImpactInput::default(), sized(5_000)];
    let result = naive::assess(&inputs);
    assert_eq!(result.level, ImpactLevel::Low);
    assert_eq!(
        result.outcome,
        ImpactOutcome::Naive {
            total_size_bytes: 5_000
        }
    );
}

#[test]
fn naive_nine_megabytes_is_low() {
    let result = naive::assess(&[sized(5_000_000), sized(4_000_000)]);
    assert_eq!(result.level, ImpactLevel::Low);
    assert_eq!(
        result.outcome,
        ImpactOutcome::Naive {
            total_size_bytes: 9_000_000
        }
    );
    assert!(result.explanation.contains("9.00 MB"));
}

#[test]
fn naive_lower_boundaries_are_inclusive() {
    assert_eq!(naive::assess(&[sized(9_999_999)]).level, ImpactLevel::Low);
    assert_eq!(
        naive::assess(&[sized(10_000_000)]).level,
        ImpactLevel::Medium
    );
    assert_eq!(
        naive::assess(&[sized(999_999_999)]).level,
        ImpactLevel::Medium
    );
    assert_eq!(
        naive::assess(&[sized(1_000_000_000)]).level,
        ImpactLevel::High
    );
}

#[test]
fn naive_large_combination_is_high() {
    let result = naive::assess(&[sized(500_000_000), sized(600_000_000)]);
    assert_eq!(result.level, ImpactLevel::High);
    assert_eq!(
        result.outcome,
        ImpactOutcome::Naive {
            total_size_bytes: 1_100_000_000
        }
    );
}

#[test]
fn naive_explanation_names_the_relevant_threshold() {
    assert!(naive::assess(&[sized(1)]).explanation.contains("10 MB"));
    assert!(naive::assess(&[sized(20_000_000)])
        .explanation
        .contains("between 10 MB and 1000 MB"));
    assert!(naive::assess(&[sized(2_000_000_000)])
        .explanation
        .contains("1000 MB"));
}

#[test]
fn advanced_all_empty_descriptions_falls_back_to_naive() {
    let assessor = mock_assessor(vec![vec![1.0, 0.0]]);
    let inputs = [
        sized(5_000_000),
        ImpactInput {
            size_bytes: Some(4_000_000),
            description: Some(String::new()),
        },
    ];

    let result = assessor.assess(&inputs, ImpactMethod::Advanced).unwrap();

    assert_eq!(result.level, ImpactLevel::Low);
    assert_eq!(
        result.outcome,
        ImpactOutcome::Naive {
            total_size_bytes: 9_000_000
        }
    );
}

#[test]
fn advanced_single_description_is_one_cluster() {
    let assessor = mock_assessor(vec![vec![1.0, 0.0, 0.0]]);
    let result = assessor
        .assess(
            &[described("tweets labelled for sentiment")],
            ImpactMethod::Advanced,
        )
        .unwrap();

    assert_eq!(result.level, ImpactLevel::Low);
    assert_eq!(result.outcome, ImpactOutcome::Advanced { cluster_count: 1 });
}

#[test]
fn advanced_identical_descriptions_collapse_to_one_cluster() {
    let assessor = mock_assessor(vec![vec![0.5, 0.5, 0.0]]);
    let inputs = [
        described("news articles"),
        described("news articles"),
        described("news articles"),
    ];

    let result = assessor.assess(&inputs, ImpactMethod::Advanced).unwrap();

    assert_eq!(result.level, ImpactLevel::Low);
    assert_eq!(result.outcome, ImpactOutcome::Advanced { cluster_count: 1 });
}

#[test]
fn advanced_two_semantic_groups_are_medium() {
    let assessor = mock_assessor(vec![
        vec![1.0, 0.0],
        vec![1.0, 0.0],
        vec![0.0, 1.0],
    ]);
    let inputs = [
        described("english tweets"),
        described("more english tweets"),
        described("satellite imagery"),
    ];

    let result = assessor.assess(&inputs, ImpactMethod::Advanced).unwrap();

    assert_eq!(result.level, ImpactLevel::Medium);
    assert_eq!(result.outcome, ImpactOutcome::Advanced { cluster_count: 2 });
}

#[test]
fn advanced_three_distinct_descriptions_are_high() {
    let assessor = mock_assessor(vec![
        vec![1.0, 0.0, 0.0],
        vec![0.0, 1.0, 0.0],
        vec![0.0, 0.0, 1.0],
    ]);
    let inputs = [
        described("protein structures"),
        described("french poetry"),
        described("traffic camera footage"),
    ];

    let result = assessor.assess(&inputs, ImpactMethod::Advanced).unwrap();

    assert_eq!(result.level, ImpactLevel::High);
    assert_eq!(result.outcome, ImpactOutcome::Advanced { cluster_count: 3 });
}

#[test]
fn advanced_is_deterministic_for_identical_inputs() {
    let vectors = vec![
        vec![1.0, 0.0, 0.0],
        vec![0.0, 1.0, 0.0],
        vec![0.9, 0.1, 0.0],
    ];
    let inputs = [
        described("tweets"),
        described("satellite imagery"),
        described("more tweets"),
    ];

    let first = mock_assessor(vectors.clone())
        .assess(&inputs, ImpactMethod::Advanced)
        .unwrap();
    let second = mock_assessor(vectors)
        .assess(&inputs, ImpactMethod::Advanced)
        .unwrap();

    assert_eq!(first.level, second.level);
    assert_eq!(first.outcome, second.outcome);
}

#[test]
fn result_json_carries_method_tag_and_diagnostics() {
    let naive_json = serde_json::to_value(naive::assess(&[sized(1_000)])).unwrap();
    assert_eq!(naive_json["level"], "low");
    assert_eq!(naive_json["method"], "naive");
    assert_eq!(naive_json["total_size_bytes"], 1_000);

    let assessor = mock_assessor(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    let advanced = assessor
        .assess(
            &[described("code"), described("census records")],
            ImpactMethod::Advanced,
        )
        .unwrap();
    let advanced_json = serde_json::to_value(&advanced).unwrap();
    assert_eq!(advanced_json["method"], "advanced");
    assert_eq!(advanced_json["cluster_count"], 2);
}

#[test]
fn unknown_method_is_rejected() {
    let err = "fancy".parse::<ImpactMethod>().unwrap_err();
    assert!(err.contains("Invalid assessment method"));
    assert_eq!("naive".parse::<ImpactMethod>(), Ok(ImpactMethod::Naive));
    assert_eq!(
        "advanced".parse::<ImpactMethod>(),
        Ok(ImpactMethod::Advanced)
    );
}

#[test]
fn kmeans_is_deterministic_for_a_fixed_seed() {
    let vectors = vec![
        vec![0.1, 0.9],
        vec![0.2, 0.8],
        vec![0.9, 0.1],
        vec![0.8, 0.2],
        vec![0.5, 0.5],
    ];
    assert_eq!(
        kmeans(&vectors, 3, CLUSTER_SEED),
        kmeans(&vectors, 3, CLUSTER_SEED)
    );
}

#[test]
fn kmeans_k_one_puts_everything_in_one_cluster() {
    assert_eq!(kmeans(&[vec![1.0], vec![2.0]], 1, CLUSTER_SEED), vec![0, 0]);
}

#[test]
fn kmeans_empty_input_yields_no_labels() {
    assert!(kmeans(&[], 3, CLUSTER_SEED).is_empty());
}

#[test]
fn kmeans_caps_k_at_input_count() {
    assert_eq!(kmeans(&[vec![1.0, 0.0]], 3, CLUSTER_SEED), vec![0]);
}

#[test]
fn kmeans_separates_well_separated_points() {
    let vectors = vec![
        vec![1.0, 0.0, 0.0],
        vec![0.0, 1.0, 0.0],
        vec![0.0, 0.0, 1.0],
    ];
    let labels = kmeans(&vectors, 3, CLUSTER_SEED);
    assert_eq!(populated_clusters(&labels), 3);
}

#[test]
fn populated_clusters_counts_distinct_labels() {
    assert_eq!(populated_clusters(&[0, 1, 1, 2]), 3);
    assert_eq!(populated_clusters(&[0, 0, 0]), 1);
    assert_eq!(populated_clusters(&[]), 0);
}
