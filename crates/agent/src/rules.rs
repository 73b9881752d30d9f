//! Rules engine: task drafting and reply composition for one utterance.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use db::{
    Store,
    models::{CreateTask, Domain, Task, TaskDetails, TaskType},
};
use reasoning_client::{ReasoningClient, ReasoningClientError};
use serde::Serialize;

use crate::{
    Result,
    classifier::{Classifier, Intent, KeywordClassifier, TopicMatch},
    extract::{
        build_title, determine_priority, extract_date, extract_quantity, extract_recipient,
        truncate_description,
    },
    replies::ReplyKind,
};

/// Something that can answer a forwarded utterance.
#[async_trait]
pub trait ReasoningBackend: Send + Sync {
    async fn ask(&self, message: &str) -> std::result::Result<String, ReasoningClientError>;
}

#[async_trait]
impl ReasoningBackend for ReasoningClient {
    async fn ask(&self, message: &str) -> std::result::Result<String, ReasoningClientError> {
        ReasoningClient::ask(self, message).await
    }
}

/// Reply to one utterance: the canned text, plus the reasoning service's
/// answer when one arrived in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentReply {
    pub kind: ReplyKind,
    pub immediate: String,
    pub final_text: Option<String>,
}

impl AgentReply {
    pub fn final_answer(&self) -> &str {
        self.final_text.as_deref().unwrap_or(&self.immediate)
    }
}

pub struct RulesEngine {
    store: Store,
    classifier: Arc<dyn Classifier>,
    reasoning: Option<Arc<dyn ReasoningBackend>>,
    reasoning_timeout: Duration,
}

impl RulesEngine {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            classifier: Arc::new(KeywordClassifier::new()),
            reasoning: None,
            reasoning_timeout: reasoning_client::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Consult `backend` for final answers, giving up after `timeout`.
    pub fn with_reasoning(mut self, backend: Arc<dyn ReasoningBackend>, timeout: Duration) -> Self {
        self.reasoning = Some(backend);
        self.reasoning_timeout = timeout;
        self
    }

    pub fn classify(&self, domain: Domain, utterance: &str) -> Intent {
        self.classifier.classify(domain, utterance)
    }

    /// Draft and persist a task when the utterance asks for one.
    pub async fn classify_and_create_task(&self, domain: Domain, utterance: &str) -> Result<Option<Task>> {
        let intent = self.classify(domain, utterance);
        if is_redirect(domain, intent.topics) {
            tracing::debug!(%domain, "Request belongs to another agent, no task drafted");
            return Ok(None);
        }
        let Some(task_intent) = intent.task else {
            tracing::debug!(%domain, "No task intent in utterance");
            return Ok(None);
        };

        let draft = draft_task(domain, task_intent.task_type(), utterance);
        let task = self.store.add_task(draft).await?;
        tracing::info!(
            task_id = %task.id,
            %domain,
            task_type = %task.task_type,
            "Drafted task from chat"
        );
        Ok(Some(task))
    }

    /// Pick the canned reply and, when configured, ask the reasoning service
    /// for a better one. Never fails: any reasoning problem leaves
    /// `final_text` empty.
    pub async fn compose_reply(&self, domain: Domain, utterance: &str) -> AgentReply {
        let kind = select_reply(domain, &self.classify(domain, utterance));
        let immediate = kind.text();

        let final_text = match &self.reasoning {
            Some(backend) => self.consult(backend.as_ref(), domain, utterance).await,
            None => None,
        };

        AgentReply {
            kind,
            immediate,
            final_text,
        }
    }

    async fn consult(&self, backend: &dyn ReasoningBackend, domain: Domain, utterance: &str) -> Option<String> {
        let message = format!("[{}] {}", domain, utterance.to_lowercase());

        match tokio::time::timeout(self.reasoning_timeout, backend.ask(&message)).await {
            Ok(Ok(answer)) if !answer.trim().is_empty() => Some(answer),
            Ok(Ok(_)) => {
                tracing::warn!("Reasoning service returned an empty answer");
                None
            }
            Ok(Err(e)) => {
                tracing::warn!("Reasoning service failed, using canned reply: {}", e);
                None
            }
            Err(_) => {
                tracing::warn!(
                    "Reasoning service did not answer within {:?}, using canned reply",
                    self.reasoning_timeout
                );
                None
            }
        }
    }
}

/// Build the task record for an utterance already known to want one.
pub fn draft_task(domain: Domain, task_type: TaskType, utterance: &str) -> CreateTask {
    let recipient = extract_recipient(utterance);
    let title = build_title(task_type, &recipient);
    let details = TaskDetails {
        scheduled_date: Some(extract_date(utterance)),
        quantity: Some(extract_quantity(utterance)),
        priority: Some(determine_priority(utterance)),
        recipient: Some(recipient),
        ..Default::default()
    };

    CreateTask::new(domain, task_type, title, truncate_description(utterance), details)
}

/// Choose the canned reply for a classified utterance.
pub fn select_reply(domain: Domain, intent: &Intent) -> ReplyKind {
    let topics = intent.topics;
    let drafted = intent.task.map(|task| ReplyKind::TaskDrafted {
        domain,
        task_type: task.task_type(),
    });

    match domain {
        Domain::Gateway => match (topics.risk, topics.operations) {
            (true, true) => ReplyKind::RouteToBoth,
            (true, false) => ReplyKind::RouteToRisk,
            (false, true) => ReplyKind::RouteToOperations,
            (false, false) => drafted.unwrap_or(ReplyKind::AskClarification),
        },
        Domain::RiskManagement if is_redirect(domain, topics) => ReplyKind::RedirectToOperations,
        Domain::Operations if is_redirect(domain, topics) => ReplyKind::RedirectToRisk,
        _ => drafted.unwrap_or(ReplyKind::DomainHelp { domain }),
    }
}

/// True when a downstream agent's request only touches the other agent's
/// topics. The gateway never redirects.
fn is_redirect(domain: Domain, topics: TopicMatch) -> bool {
    match domain {
        Domain::Gateway => false,
        Domain::RiskManagement => topics.operations && !topics.risk,
        Domain::Operations => topics.risk && !topics.operations,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use db::models::{Priority, TaskStatus};

    use super::*;
    use crate::classifier::TaskIntent;

    struct FailingBackend;

    #[async_trait]
    impl ReasoningBackend for FailingBackend {
        async fn ask(&self, _message: &str) -> std::result::Result<String, ReasoningClientError> {
            Err(ReasoningClientError::NotReachable("http://localhost:8000".into()))
        }
    }

    struct SlowBackend;

    #[async_trait]
    impl ReasoningBackend for SlowBackend {
        async fn ask(&self, _message: &str) -> std::result::Result<String, ReasoningClientError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok("too late".into())
        }
    }

    #[derive(Default)]
    struct RecordingBackend {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ReasoningBackend for RecordingBackend {
        async fn ask(&self, message: &str) -> std::result::Result<String, ReasoningClientError> {
            self.seen.lock().unwrap().push(message.to_string());
            Ok("Reorder queued with supplier.".into())
        }
    }

    #[tokio::test]
    async fn reorder_scenario_drafts_expected_task() {
        let store = Store::in_memory();
        let engine = RulesEngine::new(store.clone());

        let task = engine
            .classify_and_create_task(
                Domain::Operations,
                "Please reorder 50 units for Jane Smith by 12/25, this is urgent",
            )
            .await
            .unwrap()
            .expect("task drafted");

        assert_eq!(task.task_type, TaskType::Reorder);
        assert_eq!(task.domain, Domain::Operations);
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.title, "Reorder for Jane Smith");
        assert_eq!(task.details.quantity, Some(50));
        assert_eq!(task.details.recipient.as_deref(), Some("Jane Smith"));
        assert_eq!(task.details.scheduled_date.as_deref(), Some("12/25"));
        assert_eq!(task.priority(), Priority::High);

        assert_eq!(store.get_tasks().await, vec![task]);
    }

    #[tokio::test]
    async fn out_of_scope_request_is_redirected_without_task() {
        let store = Store::in_memory();
        let engine = RulesEngine::new(store.clone());
        let utterance = "can you schedule a delivery";

        let task = engine
            .classify_and_create_task(Domain::RiskManagement, utterance)
            .await
            .unwrap();
        let reply = engine.compose_reply(Domain::RiskManagement, utterance).await;

        assert!(task.is_none());
        assert!(store.get_tasks().await.is_empty());
        assert_eq!(reply.kind, ReplyKind::RedirectToOperations);
        assert_eq!(reply.final_answer(), ReplyKind::RedirectToOperations.text());
    }

    #[tokio::test]
    async fn redirected_request_with_generic_word_creates_nothing() {
        let store = Store::in_memory();
        let engine = RulesEngine::new(store.clone());
        let utterance = "add a delivery to the schedule";

        let task = engine
            .classify_and_create_task(Domain::RiskManagement, utterance)
            .await
            .unwrap();
        let reply = engine.compose_reply(Domain::RiskManagement, utterance).await;

        assert!(task.is_none());
        assert!(store.get_tasks().await.is_empty());
        assert_eq!(reply.kind, ReplyKind::RedirectToOperations);

        let task = engine
            .classify_and_create_task(Domain::Operations, "draft a compliance audit note")
            .await
            .unwrap();
        assert!(task.is_none());
        assert!(store.get_tasks().await.is_empty());
    }

    #[tokio::test]
    async fn unmatched_utterance_creates_nothing() {
        let store = Store::in_memory();
        let engine = RulesEngine::new(store.clone());
        let task = engine
            .classify_and_create_task(Domain::Gateway, "good morning")
            .await
            .unwrap();
        assert!(task.is_none());
        assert!(store.get_tasks().await.is_empty());
    }

    #[tokio::test]
    async fn long_utterances_are_truncated_in_description() {
        let engine = RulesEngine::new(Store::in_memory());
        let utterance = format!("create a task to {}", "check the dock doors ".repeat(10));
        let task = engine
            .classify_and_create_task(Domain::Operations, &utterance)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(task.description.chars().count(), 100);
        assert!(task.description.ends_with("..."));
        assert_eq!(task.task_type, TaskType::FollowUp);
        assert_eq!(task.title, "Follow-up task");
        assert_eq!(task.details.quantity, Some(0));
    }

    #[test]
    fn gateway_routing() {
        let intent = |risk, operations| Intent {
            task: None,
            topics: TopicMatch { risk, operations },
        };
        assert_eq!(select_reply(Domain::Gateway, &intent(true, true)), ReplyKind::RouteToBoth);
        assert_eq!(select_reply(Domain::Gateway, &intent(true, false)), ReplyKind::RouteToRisk);
        assert_eq!(
            select_reply(Domain::Gateway, &intent(false, true)),
            ReplyKind::RouteToOperations
        );
        assert_eq!(
            select_reply(Domain::Gateway, &intent(false, false)),
            ReplyKind::AskClarification
        );
    }

    #[test]
    fn in_scope_requests_get_domain_replies() {
        let drafted = Intent {
            task: Some(TaskIntent::Typed(TaskType::Maintenance)),
            topics: TopicMatch::default(),
        };
        assert_eq!(
            select_reply(Domain::Operations, &drafted),
            ReplyKind::TaskDrafted {
                domain: Domain::Operations,
                task_type: TaskType::Maintenance
            }
        );

        let mixed = Intent {
            task: None,
            topics: TopicMatch {
                risk: true,
                operations: true,
            },
        };
        assert_eq!(
            select_reply(Domain::Operations, &mixed),
            ReplyKind::DomainHelp {
                domain: Domain::Operations
            }
        );

        let risky = Intent {
            task: None,
            topics: TopicMatch {
                risk: true,
                operations: false,
            },
        };
        assert_eq!(select_reply(Domain::Operations, &risky), ReplyKind::RedirectToRisk);
    }

    #[tokio::test]
    async fn failing_reasoning_falls_back_to_immediate() {
        let engine = RulesEngine::new(Store::in_memory())
            .with_reasoning(Arc::new(FailingBackend), Duration::from_secs(1));

        let reply = engine
            .compose_reply(Domain::Operations, "reorder 10 units of tape")
            .await;
        assert_eq!(reply.final_text, None);
        assert_eq!(reply.final_answer(), reply.immediate);
    }

    #[tokio::test]
    async fn slow_reasoning_times_out_to_immediate() {
        let engine = RulesEngine::new(Store::in_memory())
            .with_reasoning(Arc::new(SlowBackend), Duration::from_millis(50));

        let started = std::time::Instant::now();
        let reply = engine.compose_reply(Domain::Gateway, "audit the warehouse").await;

        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(reply.kind, ReplyKind::RouteToBoth);
        assert_eq!(reply.final_answer(), reply.immediate);
    }

    #[tokio::test]
    async fn reasoning_answer_becomes_final() {
        let backend = Arc::new(RecordingBackend::default());
        let engine = RulesEngine::new(Store::in_memory())
            .with_reasoning(backend.clone(), Duration::from_secs(1));

        let reply = engine
            .compose_reply(Domain::Operations, "Reorder 10 Units of tape")
            .await;

        assert_eq!(reply.final_answer(), "Reorder queued with supplier.");
        assert_ne!(reply.immediate, reply.final_answer());
        assert_eq!(
            backend.seen.lock().unwrap().as_slice(),
            ["[operations] reorder 10 units of tape".to_string()]
        );
    }

    #[tokio::test]
    async fn custom_classifier_is_used() {
        struct AlwaysAnalysis;

        impl Classifier for AlwaysAnalysis {
            fn classify(&self, _domain: Domain, _utterance: &str) -> Intent {
                Intent {
                    task: Some(TaskIntent::Typed(TaskType::Analysis)),
                    topics: TopicMatch::default(),
                }
            }
        }

        let engine = RulesEngine::new(Store::in_memory()).with_classifier(Arc::new(AlwaysAnalysis));
        let task = engine
            .classify_and_create_task(Domain::RiskManagement, "hi")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(task.task_type, TaskType::Analysis);
    }
}
