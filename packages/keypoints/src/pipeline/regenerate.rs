//! Regeneration controller - generate, verify, and retry on inaccuracies.
//!
//! ```text
//! GENERATING ──fail──────────────────────────────────────────► DONE (previous or none)
//!     │
//!     ▼
//! CHECKING ──no inaccuracies / budget spent──────────────────► DONE (current)
//!     │
//!     └──inaccurate points, attempts remain──► REGENERATING ──► GENERATING
//! ```
//!
//! Uncertain points never block acceptance. Checking is skipped entirely
//! when auto-check is disabled or no fact checker is configured.

use tracing::{info, warn};

use crate::traits::ai::{FactChecker, KeyPointGenerator};
use crate::types::config::ExtractionConfig;
use crate::types::verification::VerificationResults;

/// Final key points for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct RegenerationOutcome {
    /// Last successfully generated key points
    pub key_points: String,

    /// Generation calls made, successful or not
    pub generations: u32,

    /// Verification of `key_points`, when checking ran
    pub verification: Option<VerificationResults>,
}

impl RegenerationOutcome {
    /// Whether the accepted key points still contain rejected claims.
    pub fn has_inaccuracies(&self) -> bool {
        self.verification
            .as_ref()
            .is_some_and(VerificationResults::has_inaccuracies)
    }
}

/// Generate key points for `document`, regenerating while the fact checker
/// rejects any of them and the attempt budget allows.
///
/// Returns `None` only when no generation call succeeded. A generation
/// failure after an earlier success returns that earlier result.
pub async fn generate_verified<G>(
    generator: &G,
    checker: Option<&dyn FactChecker>,
    document: &str,
    config: &ExtractionConfig,
) -> Option<RegenerationOutcome>
where
    G: KeyPointGenerator + ?Sized,
{
    let checker = checker.filter(|_| config.auto_check_enabled);
    let max_attempts = config.max_regeneration_attempts;

    let mut attempt: u32 = 0;
    let mut generations: u32 = 0;
    let mut previous: Option<RegenerationOutcome> = None;

    loop {
        generations += 1;
        let key_points = match generator.generate_key_points(document).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!(generation = generations, "Generator returned empty key points");
                return previous.map(|p| RegenerationOutcome { generations, ..p });
            }
            Err(e) => {
                warn!(generation = generations, error = %e, "Key point generation failed");
                return previous.map(|p| RegenerationOutcome { generations, ..p });
            }
        };

        let Some(checker) = checker else {
            return Some(RegenerationOutcome {
                key_points,
                generations,
                verification: None,
            });
        };

        let results = checker.verify_key_points(document, &key_points).await;

        if !results.has_inaccuracies() || attempt >= max_attempts {
            if results.has_inaccuracies() {
                warn!(
                    attempts = attempt,
                    inaccurate = results.inaccurate.len(),
                    "Regeneration budget spent; keeping key points with inaccuracies"
                );
            } else if !results.uncertain.is_empty() {
                info!(
                    uncertain = results.uncertain.len(),
                    "Accepting key points with uncertain claims"
                );
            }
            return Some(RegenerationOutcome {
                key_points,
                generations,
                verification: Some(results),
            });
        }

        attempt += 1;
        info!(
            attempt,
            max_attempts,
            inaccurate = results.inaccurate.len(),
            "Inaccurate key points found, regenerating"
        );
        previous = Some(RegenerationOutcome {
            key_points,
            generations,
            verification: Some(results),
        });
    }
}
