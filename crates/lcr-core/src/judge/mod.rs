//! Grading of candidate answers by a judge model

mod verdict;

pub use verdict::{JudgeVerdict, normalize_judge_result};

use crate::concurrency::ConcurrencyGate;
use crate::config::ModelEndpointConfig;
use crate::error::EvalResult;
use crate::llm::{ChatCompletion, TokenUsage};
use crate::tokens::TokenBudget;
use std::sync::Arc;

/// Fixed grading prompt; the judge is asked to reply with a single word.
pub fn build_judge_prompt(question: &str, gold_answer: &str, candidate_answer: &str) -> String {
    format!(
        "Assess whether the following CANDIDATE ANSWER is CORRECT or INCORRECT.\n\
         For the CANDIDATE ANSWER to be correct, it must be consistent with the OFFICIAL ANSWER.\n\
         \n\
         The question, for reference only: {question}\n\
         The OFFICIAL ANSWER: {gold_answer}\n\
         CANDIDATE ANSWER TO ASSESS: {candidate_answer}\n\
         \n\
         Reply only with CORRECT or INCORRECT.\n"
    )
}

/// Grades candidate answers against the official one.
///
/// The judge shares the task model's [`ConcurrencyGate`]; one permit is held
/// for the whole retry sequence of a grading call.
#[derive(Clone)]
pub struct Judge {
    client: Arc<dyn ChatCompletion>,
    gate: ConcurrencyGate,
    budget: TokenBudget,
    endpoint: ModelEndpointConfig,
    retries: u32,
}

impl Judge {
    pub fn new(
        client: Arc<dyn ChatCompletion>,
        gate: ConcurrencyGate,
        budget: TokenBudget,
        endpoint: ModelEndpointConfig,
        retries: u32,
    ) -> Self {
        Self {
            client,
            gate,
            budget,
            endpoint,
            retries,
        }
    }

    pub async fn grade(
        &self,
        question: &str,
        gold_answer: &str,
        candidate_answer: &str,
    ) -> EvalResult<(JudgeVerdict, TokenUsage)> {
        let prompt = build_judge_prompt(question, gold_answer, candidate_answer);
        let prompt_tokens = self.budget.count_tokens(&prompt);
        let max_tokens =
            self.budget
                .remaining_for_with_floor(prompt_tokens, self.endpoint.max_tokens, 1);

        let outcome = {
            let _permit = self.gate.acquire().await?;
            self.client
                .complete(&self.endpoint, &prompt, max_tokens, self.retries)
                .await?
        };

        let verdict = normalize_judge_result(&outcome.text);
        tracing::debug!(
            judge = %self.endpoint.model_id,
            verdict = %verdict,
            "graded answer"
        );
        Ok((verdict, outcome.usage))
    }
}

impl std::fmt::Debug for Judge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Judge")
            .field("endpoint", &self.endpoint)
            .field("retries", &self.retries)
            .finish_non_exhaustive()
    }
}
