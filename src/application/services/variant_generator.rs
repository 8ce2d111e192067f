use std::collections::HashSet;
use std::sync::Arc;

use crate::application::ports::PunctuationRestorer;
use crate::application::services::substitution_engine::candidates_for;
use crate::domain::transcript::tokenize;
use crate::domain::{SubstitutionRule, VariantTranscript};

/// Expands a transcript into every distinct wording variant the rules allow:
/// one candidate set per token, Cartesian product in token order, exact-string
/// dedup, then punctuation restoration per surviving variant.
pub struct VariantGenerator {
    restorer: Arc<dyn PunctuationRestorer>,
    /// Upper bound on the raw candidate product. Exceeding it rejects the
    /// run before anything is materialized.
    max_variants: u64,
}

impl VariantGenerator {
    pub fn new(restorer: Arc<dyn PunctuationRestorer>, max_variants: u64) -> Self {
        Self {
            restorer,
            max_variants,
        }
    }

    pub async fn generate(
        &self,
        transcript: &str,
        rules: &[SubstitutionRule],
        threshold: u8,
    ) -> Result<Vec<VariantTranscript>, VariantError> {
        let tokens = tokenize(transcript);
        let candidate_sets: Vec<Vec<String>> = tokens
            .iter()
            .map(|token| candidates_for(token, rules, threshold))
            .collect();

        let product = candidate_sets
            .iter()
            .try_fold(1u64, |acc, set| acc.checked_mul(set.len() as u64))
            .unwrap_or(u64::MAX);
        if product > self.max_variants {
            return Err(VariantError::Explosion {
                product,
                cap: self.max_variants,
            });
        }

        let raw_variants = cartesian_join(&candidate_sets);

        let mut seen = HashSet::new();
        let mut variants = Vec::new();
        for raw in raw_variants {
            if !seen.insert(raw.clone()) {
                continue;
            }
            let index = variants.len();
            // Restoration backends are not assumed reentrant; variants are
            // restored serially in generation order.
            match self.restorer.restore(&raw).await {
                Ok(text) => variants.push(VariantTranscript::new(index, text, true)),
                Err(error) => {
                    tracing::warn!(
                        variant_index = index,
                        error = %error,
                        "Punctuation restoration failed, keeping raw text"
                    );
                    variants.push(VariantTranscript::new(index, raw, false));
                }
            }
        }

        tracing::debug!(
            tokens = tokens.len(),
            raw_product = product,
            distinct = variants.len(),
            "Generated variant transcripts"
        );

        Ok(variants)
    }
}

/// Cartesian product over the candidate sets in token order, each combination
/// joined with single spaces. An empty set list yields one empty string.
fn cartesian_join(sets: &[Vec<String>]) -> Vec<String> {
    let mut indices = vec![0usize; sets.len()];
    let mut out = Vec::new();

    loop {
        let combination: Vec<&str> = sets
            .iter()
            .zip(&indices)
            .map(|(set, &i)| set[i].as_str())
            .collect();
        out.push(combination.join(" "));

        // Odometer increment, last token varies fastest.
        let mut pos = sets.len();
        loop {
            if pos == 0 {
                return out;
            }
            pos -= 1;
            indices[pos] += 1;
            if indices[pos] < sets[pos].len() {
                break;
            }
            indices[pos] = 0;
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VariantError {
    #[error("candidate product {product} exceeds configured cap {cap}")]
    Explosion { product: u64, cap: u64 },
}
