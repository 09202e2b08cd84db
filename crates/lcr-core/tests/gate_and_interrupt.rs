//! Admission control across task and judge calls, and interrupts that land
//! after part of the run has been persisted.

use async_trait::async_trait;
use lcr_core::llm::retry_with_backoff;
use lcr_core::{
    CharRatioTokenizer, ChatCompletion, CompletionOutcome, ConcurrencyGate, DocumentSource,
    EvalError, EvalResult, HEADER_WIDTH, ModelEndpointConfig, Pipeline, PipelineEvent,
    ProgressCallback, QuestionRecord, ResultStore, RetryPolicy, TaskRunner, TokenBudget,
    TokenUsage,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

struct NoDocs;

impl DocumentSource for NoDocs {
    fn load(&self, _category: &str, _set_id: &str, _filename: &str) -> Option<String> {
        None
    }
}

fn question(id: &str, text: &str) -> QuestionRecord {
    QuestionRecord {
        id: id.to_string(),
        question: text.to_string(),
        gold_answer: "right".to_string(),
        ..Default::default()
    }
}

fn reply(endpoint: &ModelEndpointConfig) -> CompletionOutcome {
    let text = if endpoint.model_id == "judge" {
        "CORRECT"
    } else {
        "right"
    };
    CompletionOutcome {
        text: text.to_string(),
        usage: TokenUsage::new(4, 1),
    }
}

fn runner(client: Arc<dyn ChatCompletion>, gate: ConcurrencyGate) -> TaskRunner {
    let budget = TokenBudget::new(Arc::new(CharRatioTokenizer::new()), 10_000);
    TaskRunner::new(
        client,
        Arc::new(NoDocs),
        budget,
        gate,
        ModelEndpointConfig::new("task", "http://task", "k"),
        ModelEndpointConfig::new("judge", "http://judge", "k"),
        3,
    )
}

/// Every call stays in flight for a while and records how many calls
/// overlapped, whichever model it targets.
#[derive(Default)]
struct OverlapTracker {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    task_calls: AtomicUsize,
    judge_calls: AtomicUsize,
}

#[async_trait]
impl ChatCompletion for OverlapTracker {
    async fn complete(
        &self,
        endpoint: &ModelEndpointConfig,
        _prompt: &str,
        _max_tokens: u32,
        _retries: u32,
    ) -> EvalResult<CompletionOutcome> {
        if endpoint.model_id == "judge" {
            self.judge_calls.fetch_add(1, Ordering::SeqCst);
        } else {
            self.task_calls.fetch_add(1, Ordering::SeqCst);
        }
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(reply(endpoint))
    }
}

#[tokio::test(start_paused = true)]
async fn test_task_and_judge_calls_share_one_gate() {
    let dir = TempDir::new().unwrap();
    let tracker = Arc::new(OverlapTracker::default());
    let gate = ConcurrencyGate::new(2);
    let store = ResultStore::open(dir.path().join("run.jsonl"), HEADER_WIDTH).unwrap();
    let mut pipeline = Pipeline::new(runner(tracker.clone(), gate.clone()), store);
    let questions: Vec<QuestionRecord> = (1..=8)
        .map(|i| question(&i.to_string(), "what?"))
        .collect();

    let summary = pipeline
        .run(&questions, &CancellationToken::new(), None)
        .await
        .unwrap();

    assert_eq!(summary.persisted, 8);
    assert_eq!(tracker.task_calls.load(Ordering::SeqCst), 8);
    assert_eq!(tracker.judge_calls.load(Ordering::SeqCst), 8);
    assert_eq!(tracker.peak.load(Ordering::SeqCst), 2);
    assert_eq!(gate.available(), 2);
}

/// Task calls fail their first two attempts; every attempt is logged with
/// the call it belongs to.
#[derive(Default)]
struct FlakyModel {
    next_call: AtomicUsize,
    attempts: Mutex<Vec<(usize, u32)>>,
}

#[async_trait]
impl ChatCompletion for FlakyModel {
    async fn complete(
        &self,
        endpoint: &ModelEndpointConfig,
        _prompt: &str,
        _max_tokens: u32,
        retries: u32,
    ) -> EvalResult<CompletionOutcome> {
        let call = self.next_call.fetch_add(1, Ordering::SeqCst);
        let policy = RetryPolicy::new(Duration::from_millis(100), Duration::from_millis(400));
        let is_task = endpoint.model_id == "task";

        retry_with_backoff(&policy, retries, |attempt| {
            self.attempts.lock().unwrap().push((call, attempt));
            let outcome = reply(endpoint);
            async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                if is_task && attempt < 2 {
                    Err(EvalError::transient("flaky upstream"))
                } else {
                    Ok(outcome)
                }
            }
        })
        .await
    }
}

#[tokio::test(start_paused = true)]
async fn test_retrying_call_keeps_its_slot() {
    let dir = TempDir::new().unwrap();
    let model = Arc::new(FlakyModel::default());
    let store = ResultStore::open(dir.path().join("run.jsonl"), HEADER_WIDTH).unwrap();
    let mut pipeline = Pipeline::new(runner(model.clone(), ConcurrencyGate::new(1)), store);
    let questions = vec![question("1", "a?"), question("2", "b?"), question("3", "c?")];

    let summary = pipeline
        .run(&questions, &CancellationToken::new(), None)
        .await
        .unwrap();
    assert_eq!(summary.persisted, 3);
    assert_eq!(summary.stats.correct, 3);

    let attempts = model.attempts.lock().unwrap().clone();
    // 3 task calls with 3 attempts each, 3 judge calls with one attempt
    assert_eq!(attempts.len(), 12);

    // With one slot, no other call may start while a call sits in backoff:
    // each call's attempts form one contiguous run in the log.
    let mut finished = Vec::new();
    for window in attempts.windows(2) {
        let (call, _) = window[0];
        let (next_call, next_attempt) = window[1];
        if next_call != call {
            assert!(
                !finished.contains(&next_call),
                "call {next_call} resumed after other calls ran: {attempts:?}"
            );
            assert_eq!(next_attempt, 0, "interleaved attempts: {attempts:?}");
            finished.push(call);
        }
    }
}

/// Questions whose text contains "hang" never get an answer.
struct HangingModel;

#[async_trait]
impl ChatCompletion for HangingModel {
    async fn complete(
        &self,
        endpoint: &ModelEndpointConfig,
        prompt: &str,
        _max_tokens: u32,
        _retries: u32,
    ) -> EvalResult<CompletionOutcome> {
        if endpoint.model_id == "task" && prompt.contains("hang") {
            std::future::pending::<()>().await;
        }
        Ok(reply(endpoint))
    }
}

#[tokio::test]
async fn test_interrupt_after_appends_keeps_written_lines() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("run.jsonl");
    let questions = vec![
        question("1", "quick"),
        question("2", "quick"),
        question("3", "hang"),
        question("4", "hang"),
    ];

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let progress: ProgressCallback = Box::new(move |event| {
        if let PipelineEvent::Recorded { completed: 2, .. } = event {
            trigger.cancel();
        }
    });

    let written = {
        let store = ResultStore::open(&path, HEADER_WIDTH).unwrap();
        let task_runner = runner(Arc::new(HangingModel), ConcurrencyGate::new(4));
        let mut pipeline = Pipeline::new(task_runner, store);
        let summary = pipeline.run(&questions, &cancel, Some(&progress)).await.unwrap();

        assert!(summary.interrupted);
        assert_eq!(summary.persisted, 2);
        assert_eq!(summary.abandoned(), 2);
        std::fs::read_to_string(&path).unwrap()
    };

    let written_lines: Vec<&str> = written.lines().collect();
    assert_eq!(written_lines.len(), 3);
    let header: serde_json::Value = serde_json::from_str(written_lines[0]).unwrap();
    assert_eq!(header["total"], 2);
    assert_eq!(header["correct"], 2);

    let store = ResultStore::open(&path, HEADER_WIDTH).unwrap();
    let reopened = std::fs::read_to_string(&path).unwrap();
    assert_eq!(reopened.lines().skip(1).collect::<Vec<_>>(), written_lines[1..]);

    let pending: Vec<String> = store.pending(&questions).into_iter().map(|q| q.id).collect();
    assert_eq!(pending, vec!["3", "4"]);
    assert_eq!(store.stats().total, 2);
}
