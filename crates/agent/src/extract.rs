//! Field extraction for drafted tasks.

use db::models::{Priority, TaskType};
use once_cell::sync::Lazy;
use regex::Regex;

pub const UNKNOWN_RECIPIENT: &str = "Not specified";
pub const UNKNOWN_DATE: &str = "To be determined";

const DESCRIPTION_LIMIT: usize = 100;
const DESCRIPTION_KEEP: usize = 97;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\w.-]+@[\w.-]+\.\w+").expect("valid email regex")
});

// Names must be capitalised, so the connective is matched case-sensitively.
static NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:to|for|with)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)").expect("valid name regex")
});

static DATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:on|for|by)\s+(\w+\s+\d+|\d+/\d+)").expect("valid date regex")
});

static QUANTITY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+)\s*(?:units?|items?|pieces?)").expect("valid quantity regex")
});

/// First e-mail address, else a capitalised name after "to", "for" or
/// "with", else [`UNKNOWN_RECIPIENT`].
pub fn extract_recipient(text: &str) -> String {
    if let Some(email) = EMAIL_REGEX.find(text) {
        return email.as_str().to_string();
    }
    NAME_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN_RECIPIENT.to_string())
}

/// Date-like token after "on", "for" or "by" ("March 3", "12/25").
pub fn extract_date(text: &str) -> String {
    DATE_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN_DATE.to_string())
}

/// Number in front of units/items/pieces, 0 when absent. Saturates on
/// overflow.
pub fn extract_quantity(text: &str) -> u64 {
    QUANTITY_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().parse::<u64>().unwrap_or(u64::MAX))
        .unwrap_or(0)
}

pub fn determine_priority(text: &str) -> Priority {
    let lowered = text.to_lowercase();
    if lowered.contains("urgent") || lowered.contains("asap") || lowered.contains("critical") {
        Priority::High
    } else if lowered.contains("low priority") || lowered.contains("when possible") {
        Priority::Low
    } else {
        Priority::Medium
    }
}

/// Utterances over 100 characters keep their first 97 and gain "...".
pub fn truncate_description(text: &str) -> String {
    if text.chars().count() > DESCRIPTION_LIMIT {
        let kept: String = text.chars().take(DESCRIPTION_KEEP).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}

pub fn build_title(task_type: TaskType, recipient: &str) -> String {
    if recipient == UNKNOWN_RECIPIENT {
        format!("{} task", task_type.label())
    } else {
        format!("{} for {}", task_type.label(), recipient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_wins_over_name() {
        let text = "Send an update to Maria Lopez at maria.lopez@acme-freight.com today";
        assert_eq!(extract_recipient(text), "maria.lopez@acme-freight.com");
    }

    #[test]
    fn every_email_is_extracted_verbatim() {
        for address in ["a@b.io", "ops.team@warehouse-3.example.org", "x_y@z.co"] {
            let text = format!("please email {} about the shipment", address);
            assert_eq!(extract_recipient(&text), address);
        }
    }

    #[test]
    fn name_after_connective() {
        assert_eq!(extract_recipient("Please reorder 50 units for Jane Smith by 12/25"), "Jane Smith");
        assert_eq!(extract_recipient("set up a call with Bob"), "Bob");
        assert_eq!(extract_recipient("reorder pallets for the dock"), UNKNOWN_RECIPIENT);
    }

    #[test]
    fn dates() {
        assert_eq!(extract_date("Please reorder 50 units for Jane Smith by 12/25"), "12/25");
        assert_eq!(extract_date("inspect the crane ON March 3"), "March 3");
        assert_eq!(extract_date("inspect the crane soon"), UNKNOWN_DATE);
    }

    #[test]
    fn quantities() {
        assert_eq!(extract_quantity("restock 12 pieces"), 12);
        assert_eq!(extract_quantity("we need 3units"), 3);
        assert_eq!(extract_quantity("7 Items please"), 7);
        assert_eq!(extract_quantity("restock the shelves"), 0);
        assert_eq!(extract_quantity("order 40 boxes"), 0);
        assert_eq!(extract_quantity("99999999999999999999999 units"), u64::MAX);
    }

    #[test]
    fn priority_buckets() {
        assert_eq!(determine_priority("this is URGENT"), Priority::High);
        assert_eq!(determine_priority("asap please"), Priority::High);
        assert_eq!(determine_priority("critical, but low priority"), Priority::High);
        assert_eq!(determine_priority("low priority"), Priority::Low);
        assert_eq!(determine_priority("do it when possible"), Priority::Low);
        assert_eq!(determine_priority("reorder gloves"), Priority::Medium);
    }

    #[test]
    fn descriptions_are_truncated_by_characters() {
        let short = "a".repeat(100);
        assert_eq!(truncate_description(&short), short);

        let long = "é".repeat(120);
        let truncated = truncate_description(&long);
        assert_eq!(truncated.chars().count(), 100);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn titles() {
        assert_eq!(build_title(TaskType::Reorder, "Jane Smith"), "Reorder for Jane Smith");
        assert_eq!(build_title(TaskType::FollowUp, UNKNOWN_RECIPIENT), "Follow-up task");
    }
}
