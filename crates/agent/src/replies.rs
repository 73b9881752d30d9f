//! Canned assistant replies.

use db::models::{Domain, TaskType};
use serde::Serialize;

/// Which canned reply to give.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "kind")]
pub enum ReplyKind {
    /// Gateway request touching both risk and operations topics.
    RouteToBoth,
    RouteToRisk,
    RouteToOperations,
    AskClarification,
    /// A risk-management request that belongs to operations.
    RedirectToOperations,
    /// An operations request that belongs to risk management.
    RedirectToRisk,
    TaskDrafted { domain: Domain, task_type: TaskType },
    DomainHelp { domain: Domain },
}

impl ReplyKind {
    pub fn text(&self) -> String {
        match self {
            ReplyKind::RouteToBoth => "This request involves both risk and operations. I'll route it to both the Risk Management agent and the Operations agent.".to_string(),
            ReplyKind::RouteToRisk => "This looks like a risk-management matter. I'll route it to the Risk Management agent for assessment.".to_string(),
            ReplyKind::RouteToOperations => "This looks like an operations request. I'll route it to the Operations agent for scheduling and fulfilment.".to_string(),
            ReplyKind::AskClarification => "I can route requests to the Risk Management or Operations agents. Could you tell me more about what you need, for example an incident, a compliance check, a delivery or an inventory reorder?".to_string(),
            ReplyKind::RedirectToOperations => "That sounds like an operations request (scheduling, inventory or deliveries). Please switch to the Operations agent so it can be handled there.".to_string(),
            ReplyKind::RedirectToRisk => "That sounds like a risk-management matter (incidents, compliance or audits). Please switch to the Risk Management agent so it can be handled there.".to_string(),
            ReplyKind::TaskDrafted { domain, task_type } => drafted_text(*domain, *task_type),
            ReplyKind::DomainHelp { domain } => help_text(*domain).to_string(),
        }
    }
}

fn drafted_text(domain: Domain, task_type: TaskType) -> String {
    match (domain, task_type) {
        (_, TaskType::Email) => "I've drafted an email task for your review. You can edit and approve it in the task panel.".to_string(),
        (_, TaskType::Outreach) => "I've created a draft outreach task for your review. You can approve it in the task panel.".to_string(),
        (_, TaskType::FollowUp) => "I've added a follow-up task to your review queue.".to_string(),
        (Domain::Operations, TaskType::Reschedule) => "I've created a scheduling task with the details provided. Stakeholders will be notified and conflicts flagged for your review.".to_string(),
        (Domain::Operations, TaskType::Reorder) => "I've generated a reorder task based on your request. Please review the quantities and approve the order.".to_string(),
        (Domain::Operations, TaskType::Maintenance) => "I've logged a maintenance task. Review the details and approve it to dispatch a technician.".to_string(),
        (Domain::RiskManagement, TaskType::Analysis) => "I've opened a risk analysis task. Review the scope and approve it to start the assessment.".to_string(),
        (_, task_type) => format!(
            "I've created a {} task for your review in the task panel.",
            task_type.label().to_lowercase()
        ),
    }
}

fn help_text(domain: Domain) -> &'static str {
    match domain {
        Domain::Gateway => "I'm the logistics gateway. Tell me what you need and I'll route it to the right agent.",
        Domain::RiskManagement => "I can help you track incidents, run compliance checks, prepare audits and draft responses. How can I assist you today?",
        Domain::Operations => "I'm here to help with scheduling, inventory management and operational coordination. What do you need?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirects_name_the_target_agent() {
        assert!(ReplyKind::RedirectToOperations.text().contains("Operations agent"));
        assert!(ReplyKind::RedirectToRisk.text().contains("Risk Management agent"));
    }

    #[test]
    fn drafted_text_falls_back_to_type_label() {
        let text = ReplyKind::TaskDrafted {
            domain: Domain::Gateway,
            task_type: TaskType::Reorder,
        }
        .text();
        assert_eq!(text, "I've created a reorder task for your review in the task panel.");
    }
}
