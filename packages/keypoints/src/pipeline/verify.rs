//! Verification aggregation - check every claim of one summary.

use tracing::{debug, info};

use crate::pipeline::claims::split_claims;
use crate::traits::ai::FactChecker;
use crate::types::verification::VerificationResults;

/// Split `key_points` into claims and check each against `document`.
///
/// Claims are checked one at a time, in extraction order, and bucketed by
/// verdict. A summary with no extractable claims yields empty results
/// without calling the checker.
pub async fn aggregate<C>(checker: &C, document: &str, key_points: &str) -> VerificationResults
where
    C: FactChecker + ?Sized,
{
    let claims = split_claims(key_points);
    let mut results = VerificationResults::new();

    if claims.is_empty() {
        info!("No claims to verify");
        return results;
    }

    let total = claims.len();
    for (index, claim) in claims.into_iter().enumerate() {
        debug!(claim = index + 1, total, "Verifying claim");
        let verification = checker.check_claim(document, &claim).await;
        debug!(claim = index + 1, verdict = %verification.verdict(), "Claim verified");
        results.push(claim, verification);
    }

    info!(
        claims = total,
        accurate = results.accurate.len(),
        inaccurate = results.inaccurate.len(),
        uncertain = results.uncertain.len(),
        "Verification complete"
    );

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockFactChecker;
    use crate::types::verification::Verdict;
    use proptest::prelude::*;

    const SKY_DOC: &str = "The sky is blue. The grass is green.";

    #[tokio::test]
    async fn test_sky_scenario() {
        let checker = MockFactChecker::new()
            .with_response("The sky is blue", "Yes, the document says so.")
            .with_response("The sky is green", "No, the document says blue.");

        let results = aggregate(&checker, SKY_DOC, "* The sky is blue\n* The sky is green").await;

        assert_eq!(results.points(Verdict::Accurate), vec!["The sky is blue"]);
        assert_eq!(results.points(Verdict::Inaccurate), vec!["The sky is green"]);
        assert!(results.uncertain.is_empty());
        assert_eq!(
            results.inaccurate[0].verification.explanation,
            "No, the document says blue."
        );
    }

    #[tokio::test]
    async fn test_nothing_to_verify_makes_no_calls() {
        let checker = MockFactChecker::new();

        let results = aggregate(&checker, SKY_DOC, "  \n\n ").await;

        assert!(results.is_empty());
        assert!(checker.calls().is_empty());
    }

    #[tokio::test]
    async fn test_claims_checked_in_order() {
        let checker = MockFactChecker::new().with_default_response("Maybe");

        aggregate(&checker, SKY_DOC, "* one\n* two\n* three").await;

        let claims: Vec<_> = checker.calls().into_iter().map(|c| c.claim).collect();
        assert_eq!(claims, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn test_failed_check_lands_in_uncertain() {
        let checker = MockFactChecker::new()
            .with_failure("flaky", "connection refused")
            .with_response("solid", "Yes");

        let results = aggregate(&checker, SKY_DOC, "* flaky\n* solid").await;

        assert_eq!(results.points(Verdict::Uncertain), vec!["flaky"]);
        assert_eq!(results.points(Verdict::Accurate), vec!["solid"]);
        assert_eq!(
            results.uncertain[0].verification.explanation,
            "Error: connection refused"
        );
        assert!(results.uncertain[0].verification.raw_response.is_none());
    }

    #[tokio::test]
    async fn test_trait_default_delegates_to_aggregate() {
        let checker = MockFactChecker::new().with_default_response("No");

        let results = checker.verify_key_points(SKY_DOC, "* a\n* b").await;

        assert_eq!(results.inaccurate.len(), 2);
    }

    fn response_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            "[Yy][Ee][Ss][ ,.a-z]{0,12}",
            "[Nn][Oo][ ,.a-z]{0,12}",
            "[a-mp-xz ]{0,16}",
        ]
    }

    proptest! {
        #[test]
        fn prop_buckets_cover_every_claim(
            claims in prop::collection::vec("[a-z]{1,10}( [a-z]{1,10}){0,3}", 0..8),
            responses in prop::collection::vec(response_strategy(), 8),
        ) {
            let mut checker = MockFactChecker::new();
            for (claim, response) in claims.iter().zip(&responses) {
                checker = checker.with_response(claim.clone(), response.clone());
            }
            let summary: String = claims.iter().map(|c| format!("* {}\n", c)).collect();
            let expected = split_claims(&summary).len();

            let first = tokio_test::block_on(aggregate(&checker, SKY_DOC, &summary));
            let second = tokio_test::block_on(aggregate(&checker, SKY_DOC, &summary));

            prop_assert_eq!(first.len(), expected);
            prop_assert_eq!(
                first.accurate.len() + first.inaccurate.len() + first.uncertain.len(),
                expected
            );
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_verdict_follows_response_prefix(response in response_strategy()) {
            let lower = response.to_ascii_lowercase();
            let expected = if lower.starts_with("yes") {
                Verdict::Accurate
            } else if lower.starts_with("no") {
                Verdict::Inaccurate
            } else {
                Verdict::Uncertain
            };
            prop_assert_eq!(Verdict::from_response(&response), expected);
        }
    }
}
