//! Intent classification from free-text utterances.
//!
//! The default [`KeywordClassifier`] lower-cases the utterance and walks an
//! ordered rule table for the domain; the first rule with a matching keyword
//! decides the task type. Order matters where keywords overlap.

use db::models::{Domain, TaskType};
use serde::Serialize;

/// What kind of task an utterance asks for, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "taskType")]
pub enum TaskIntent {
    /// A specific rule matched.
    Typed(TaskType),
    /// Only a generic "make me a task" word matched.
    Generic,
}

impl TaskIntent {
    /// Task type to record. Generic requests become follow-ups.
    pub fn task_type(&self) -> TaskType {
        match self {
            TaskIntent::Typed(task_type) => *task_type,
            TaskIntent::Generic => TaskType::FollowUp,
        }
    }
}

/// Which downstream agent topics an utterance touches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TopicMatch {
    pub risk: bool,
    pub operations: bool,
}

impl TopicMatch {
    pub fn any(&self) -> bool {
        self.risk || self.operations
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    pub task: Option<TaskIntent>,
    pub topics: TopicMatch,
}

/// Maps an utterance to an [`Intent`]. Implementations must be pure: the
/// rules engine may classify the same utterance more than once.
pub trait Classifier: Send + Sync {
    fn classify(&self, domain: Domain, utterance: &str) -> Intent;
}

struct Rule {
    keywords: &'static [&'static str],
    task_type: TaskType,
}

const fn rule(keywords: &'static [&'static str], task_type: TaskType) -> Rule {
    Rule {
        keywords,
        task_type,
    }
}

const GATEWAY_RULES: &[Rule] = &[
    rule(&["outreach"], TaskType::Outreach),
    rule(&["follow up", "follow-up"], TaskType::FollowUp),
    rule(&["email", "respond"], TaskType::Email),
    rule(&["schedule", "reschedule"], TaskType::Reschedule),
    rule(&["reorder", "restock"], TaskType::Reorder),
    rule(&["risk", "inventory", "analysis"], TaskType::Analysis),
];

const RISK_MANAGEMENT_RULES: &[Rule] = &[
    rule(&["email", "respond"], TaskType::Email),
    rule(&["risk", "inventory", "analysis"], TaskType::Analysis),
];

const OPERATIONS_RULES: &[Rule] = &[
    rule(&["schedule", "reschedule"], TaskType::Reschedule),
    rule(&["reorder", "restock"], TaskType::Reorder),
    rule(&["maintenance", "repair"], TaskType::Maintenance),
    rule(&["inventory", "analysis"], TaskType::Analysis),
];

const GENERIC_TASK_WORDS: &[&str] = &["task", "create", "add", "draft"];

pub const RISK_TOPICS: &[&str] = &["risk", "incident", "compliance", "audit", "security"];
pub const OPERATIONS_TOPICS: &[&str] = &[
    "schedule",
    "route",
    "inventory",
    "reorder",
    "dispatch",
    "warehouse",
    "delivery",
];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Deterministic substring classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }

    fn rules_for(domain: Domain) -> &'static [Rule] {
        match domain {
            Domain::Gateway => GATEWAY_RULES,
            Domain::RiskManagement => RISK_MANAGEMENT_RULES,
            Domain::Operations => OPERATIONS_RULES,
        }
    }
}

impl Classifier for KeywordClassifier {
    fn classify(&self, domain: Domain, utterance: &str) -> Intent {
        let lowered = utterance.to_lowercase();

        let task = Self::rules_for(domain)
            .iter()
            .find(|rule| contains_any(&lowered, rule.keywords))
            .map(|rule| TaskIntent::Typed(rule.task_type))
            .or_else(|| contains_any(&lowered, GENERIC_TASK_WORDS).then_some(TaskIntent::Generic));

        let topics = TopicMatch {
            risk: contains_any(&lowered, RISK_TOPICS),
            operations: contains_any(&lowered, OPERATIONS_TOPICS),
        };

        Intent { task, topics }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task_of(domain: Domain, utterance: &str) -> Option<TaskIntent> {
        KeywordClassifier.classify(domain, utterance).task
    }

    #[test]
    fn operations_rules_follow_declared_order() {
        assert_eq!(
            task_of(Domain::Operations, "Please reorder 50 units"),
            Some(TaskIntent::Typed(TaskType::Reorder))
        );
        // "schedule" is checked before "reorder".
        assert_eq!(
            task_of(Domain::Operations, "schedule a reorder for Friday"),
            Some(TaskIntent::Typed(TaskType::Reschedule))
        );
        assert_eq!(
            task_of(Domain::Operations, "forklift needs REPAIR"),
            Some(TaskIntent::Typed(TaskType::Maintenance))
        );
        assert_eq!(
            task_of(Domain::Operations, "run an inventory analysis"),
            Some(TaskIntent::Typed(TaskType::Analysis))
        );
    }

    #[test]
    fn gateway_prefers_outreach_and_follow_up() {
        assert_eq!(
            task_of(Domain::Gateway, "draft an outreach email"),
            Some(TaskIntent::Typed(TaskType::Outreach))
        );
        assert_eq!(
            task_of(Domain::Gateway, "Follow up by email with Acme"),
            Some(TaskIntent::Typed(TaskType::FollowUp))
        );
        assert_eq!(
            task_of(Domain::Gateway, "respond to the carrier"),
            Some(TaskIntent::Typed(TaskType::Email))
        );
    }

    #[test]
    fn risk_management_ignores_operations_task_words() {
        assert_eq!(task_of(Domain::RiskManagement, "can you schedule a delivery"), None);
        assert_eq!(
            task_of(Domain::RiskManagement, "run a risk analysis"),
            Some(TaskIntent::Typed(TaskType::Analysis))
        );
    }

    #[test]
    fn generic_words_fall_back_to_follow_up() {
        let intent = task_of(Domain::RiskManagement, "Create a reminder about the audit");
        assert_eq!(intent, Some(TaskIntent::Generic));
        assert_eq!(intent.map(|i| i.task_type()), Some(TaskType::FollowUp));
        assert_eq!(task_of(Domain::Gateway, "hello there"), None);
    }

    #[test]
    fn topics_are_detected_independently() {
        let intent = KeywordClassifier.classify(
            Domain::Gateway,
            "Security incident at the warehouse delayed a delivery",
        );
        assert!(intent.topics.risk);
        assert!(intent.topics.operations);

        let intent = KeywordClassifier.classify(Domain::Gateway, "good morning");
        assert!(!intent.topics.any());
    }
}
