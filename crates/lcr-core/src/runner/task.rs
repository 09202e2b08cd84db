//! Per-question state machine: documents, budget, completion, grading

use super::prompt::build_task_prompt;
use crate::concurrency::ConcurrencyGate;
use crate::config::ModelEndpointConfig;
use crate::dataset::{DocumentSource, QuestionRecord, load_document_set};
use crate::error::EvalResult;
use crate::judge::Judge;
use crate::llm::{ChatCompletion, TokenUsage};
use crate::store::ResultRecord;
use crate::tokens::TokenBudget;
use std::sync::Arc;
use tracing::{info, warn};

/// Terminal result of one question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    pub record: ResultRecord,
    /// Usage of the grading call, when one was made and succeeded
    pub judge_usage: Option<TokenUsage>,
}

impl TaskOutcome {
    fn without_judge(record: ResultRecord) -> Self {
        Self {
            record,
            judge_usage: None,
        }
    }
}

/// Runs one question end to end.
///
/// Never fails: every error inside a task becomes an `ERROR` record.
#[derive(Clone)]
pub struct TaskRunner {
    client: Arc<dyn ChatCompletion>,
    documents: Arc<dyn DocumentSource>,
    budget: TokenBudget,
    gate: ConcurrencyGate,
    model: ModelEndpointConfig,
    judge: Judge,
    retries: u32,
}

impl TaskRunner {
    /// The judge shares `client`, `budget` and `gate` with the task calls
    pub fn new(
        client: Arc<dyn ChatCompletion>,
        documents: Arc<dyn DocumentSource>,
        budget: TokenBudget,
        gate: ConcurrencyGate,
        model: ModelEndpointConfig,
        judge_model: ModelEndpointConfig,
        retries: u32,
    ) -> Self {
        let judge = Judge::new(
            client.clone(),
            gate.clone(),
            budget.clone(),
            judge_model,
            retries,
        );
        Self {
            client,
            documents,
            budget,
            gate,
            model,
            judge,
            retries,
        }
    }

    pub fn gate(&self) -> &ConcurrencyGate {
        &self.gate
    }

    pub fn model(&self) -> &ModelEndpointConfig {
        &self.model
    }

    pub async fn run(&self, question: &QuestionRecord) -> TaskOutcome {
        match self.execute(question).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(question_id = %question.id, error = %e, "task failed");
                TaskOutcome::without_judge(ResultRecord::failed(question, &e))
            }
        }
    }

    async fn execute(&self, question: &QuestionRecord) -> EvalResult<TaskOutcome> {
        let context_length = self.budget.context_length();

        let documents = load_document_set(self.documents.as_ref(), question);
        let docs_tokens = self.budget.count_all(&documents);
        if self.budget.exceeds_context(docs_tokens) {
            let reason = format!(
                "docs_tokens_sum({}) > context_length({})",
                docs_tokens, context_length
            );
            info!(question_id = %question.id, %reason, "task skipped");
            return Ok(TaskOutcome::without_judge(ResultRecord::skipped(
                question, reason,
            )));
        }

        let prompt = build_task_prompt(&documents, &question.question);
        let prompt_tokens = self.budget.count_tokens(&prompt);
        let max_tokens = self
            .budget
            .remaining_for(prompt_tokens, self.model.max_tokens);
        if max_tokens == 0 {
            let reason = format!(
                "prompt_tokens({}) >= context_length({})",
                prompt_tokens, context_length
            );
            info!(question_id = %question.id, %reason, "task skipped");
            return Ok(TaskOutcome::without_judge(ResultRecord::skipped(
                question, reason,
            )));
        }

        let completion = {
            let _permit = self.gate.acquire().await?;
            self.client
                .complete(&self.model, &prompt, max_tokens, self.retries)
                .await?
        };

        let (verdict, judge_usage) = self
            .judge
            .grade(&question.question, &question.gold_answer, &completion.text)
            .await?;

        Ok(TaskOutcome {
            record: ResultRecord::completed(
                question,
                completion.text,
                verdict,
                completion.usage,
            ),
            judge_usage: Some(judge_usage),
        })
    }
}

impl std::fmt::Debug for TaskRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskRunner")
            .field("model", &self.model)
            .field("judge", &self.judge)
            .field("budget", &self.budget)
            .field("retries", &self.retries)
            .finish_non_exhaustive()
    }
}
