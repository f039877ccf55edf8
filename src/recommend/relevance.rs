//! Relevance scoring of remote actions against an incident.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{info, warn};

use super::types::{Incident, RankedAction, RemoteAction};
use crate::utils::constants::MAX_RELEVANCE_SCORE;

/// Device naming conventions, checked in order
static DEVICE_NAME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(CPC-[A-Za-z0-9-]+)\b",
        r"(?i)\b(LAPTOP-[A-Za-z0-9-]+)\b",
        r"(?i)\b(DESKTOP-[A-Za-z0-9-]+)\b",
        r"(?i)\b(WIN-[A-Za-z0-9-]+)\b",
        r"(?i)\b(PC-[A-Za-z0-9-]+)\b",
        r"(?i)\b(WS-[A-Za-z0-9-]+)\b",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

const HARDWARE_KEYWORDS: &[&str] = &["hardware", "health", "diagnostic", "disk", "memory", "cpu"];
const INQUIRY_NETWORK_KEYWORDS: &[&str] = &["vpn", "network", "connectivity", "ping", "dns"];
const INQUIRY_SOFTWARE_KEYWORDS: &[&str] = &["software", "app", "install", "update", "patch"];
const SOFTWARE_KEYWORDS: &[&str] = &["software", "application", "app", "install", "update", "patch"];
const NETWORK_KEYWORDS: &[&str] = &["network", "vpn", "connectivity", "ping", "dns", "proxy"];

/// Description words checked against the action name
const MAX_KEYWORDS: usize = 10;
const MIN_KEYWORD_LEN: usize = 4;

/// First device name found in free text
pub fn extract_device_name(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        return None;
    }
    DEVICE_NAME_PATTERNS
        .iter()
        .find_map(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Device for an incident: explicit field, then description, then short description
pub fn resolve_device_name(incident: &Incident) -> Option<String> {
    incident
        .device_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .or_else(|| incident.description.as_deref().and_then(extract_device_name))
        .or_else(|| incident.short_description.as_deref().and_then(extract_device_name))
}

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| haystack.contains(*kw))
}

/// Maximal runs of word characters at least four characters long
fn description_keywords(description: &str) -> impl Iterator<Item = &str> {
    description
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|word| word.chars().count() >= MIN_KEYWORD_LEN)
        .take(MAX_KEYWORDS)
}

/// Score an action for an incident category and description, 0 to 100
pub fn score_action(action: &RemoteAction, category: &str, description: &str) -> f64 {
    let name = action.action_name.as_deref().unwrap_or("").to_lowercase();
    let purpose = action.purpose.as_deref().unwrap_or("").to_lowercase();
    let description = description.to_lowercase();
    let mut score = 0.0;

    match category.to_lowercase().as_str() {
        "hardware" => {
            if contains_any(&name, HARDWARE_KEYWORDS) {
                score += 40.0;
            }
            if description.contains("printer") && name.contains("print") {
                score += 50.0;
            }
        }
        "inquiry" => {
            if contains_any(&description, &["vpn", "network"])
                && contains_any(&name, INQUIRY_NETWORK_KEYWORDS)
            {
                score += 50.0;
            }
            if contains_any(&description, &["software", "app", "application"])
                && contains_any(&name, INQUIRY_SOFTWARE_KEYWORDS)
            {
                score += 50.0;
            }
            if description.contains("print") && name.contains("print") {
                score += 50.0;
            }
        }
        "software" => {
            if contains_any(&name, SOFTWARE_KEYWORDS) {
                score += 40.0;
            }
        }
        "network" => {
            if contains_any(&name, NETWORK_KEYWORDS) {
                score += 40.0;
            }
        }
        _ => {}
    }

    match purpose.as_str() {
        "remediation" => score += 20.0,
        "data_collection" => score += 10.0,
        _ => {}
    }

    if let Some(status) = action.status.as_deref() {
        match status.to_lowercase().as_str() {
            "success" => score += 15.0,
            "failure" => score += 5.0,
            _ => {}
        }
    }

    for keyword in description_keywords(&description) {
        if name.contains(keyword) {
            score += 5.0;
        }
    }

    f64::min(score, MAX_RELEVANCE_SCORE)
}

/// Rank a device's remote actions for an incident.
///
/// Actions scoring zero are dropped. Duplicate names keep their first
/// position and their highest score. Ordering is stable by descending score.
pub fn recommend(incident: &Incident, actions: &[RemoteAction], limit: usize) -> Vec<RankedAction> {
    let Some(device_name) = resolve_device_name(incident) else {
        warn!(
            incident = %incident.incident_number,
            "Cannot determine device name for incident"
        );
        return Vec::new();
    };

    let category = incident.category.as_deref().unwrap_or("");
    let description = incident.combined_description();

    let mut ranked: Vec<RankedAction> = Vec::new();
    let mut index_by_name: HashMap<String, usize> = HashMap::new();

    for action in actions {
        let score = score_action(action, category, &description);
        if score <= 0.0 {
            continue;
        }
        let name = match action.action_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => continue,
        };

        match index_by_name.get(name) {
            Some(&idx) => {
                if score > ranked[idx].score {
                    ranked[idx] = RankedAction {
                        score,
                        action: action.clone(),
                    };
                }
            }
            None => {
                index_by_name.insert(name.to_string(), ranked.len());
                ranked.push(RankedAction {
                    score,
                    action: action.clone(),
                });
            }
        }
    }

    let unique = ranked.len();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(limit);

    info!(
        incident = %incident.incident_number,
        device = %device_name,
        total_actions = actions.len(),
        unique_actions = unique,
        recommendations = ranked.len(),
        "Generated recommendations"
    );

    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_extract_device_name() {
        assert_eq!(
            extract_device_name("User reports CPC-ABC-123 is slow").as_deref(),
            Some("CPC-ABC-123")
        );
        assert_eq!(
            extract_device_name("laptop-9f2k won't boot").as_deref(),
            Some("laptop-9f2k")
        );
        assert_eq!(extract_device_name("no device here"), None);
        assert_eq!(extract_device_name(""), None);
    }

    #[test]
    fn test_extract_device_name_pattern_order() {
        // PC- appears first in the text but CPC- is checked first
        assert_eq!(
            extract_device_name("PC-0001 and CPC-0002").as_deref(),
            Some("CPC-0002")
        );
    }

    #[test]
    fn test_resolve_device_name_fallbacks() {
        let explicit = Incident::new("INC1").with_device("DESKTOP-1").with_description("CPC-9", "PC-8");
        assert_eq!(resolve_device_name(&explicit).as_deref(), Some("DESKTOP-1"));

        let from_description = Incident::new("INC2").with_description("on WS-77", "see PC-8");
        assert_eq!(resolve_device_name(&from_description).as_deref(), Some("PC-8"));

        let from_short = Incident::new("INC3").with_description("on WS-77", "no name");
        assert_eq!(resolve_device_name(&from_short).as_deref(), Some("WS-77"));

        let blank = Incident::new("INC4").with_device("  ");
        assert_eq!(resolve_device_name(&blank), None);
    }

    #[test]
    fn test_score_hardware_category() {
        let action = RemoteAction::new("Get Disk Health").with_status("success");
        // hardware keyword 40 + success 15 + "disk" keyword 5
        assert_eq!(score_action(&action, "Hardware", "disk is full"), 60.0);
    }

    #[test]
    fn test_score_inquiry_printer() {
        let action = RemoteAction::new("Restart print spooler").with_purpose("remediation");
        // print 50 + remediation 20 + keyword "print" 5
        let score = score_action(&action, "inquiry", "cannot print anything");
        assert_eq!(score, 75.0);
    }

    #[test]
    fn test_score_capped() {
        let action = RemoteAction::new("network vpn connectivity dns reset tool")
            .with_status("success")
            .with_purpose("remediation");
        let score = score_action(
            &action,
            "inquiry",
            "network vpn connectivity reset tool software app network",
        );
        assert_eq!(score, MAX_RELEVANCE_SCORE);
    }

    #[test]
    fn test_score_unrelated_is_zero() {
        let action = RemoteAction::new("Clear Teams Cache");
        assert_eq!(score_action(&action, "network", "vpn drops"), 0.0);
    }

    #[test]
    fn test_recommend_dedupes_and_sorts() {
        let incident = Incident::new("INC0001")
            .with_category("network")
            .with_description("VPN keeps dropping", "Device CPC-ABC-1 loses vpn");

        let actions = vec![
            RemoteAction::new("Reset Network Adapter").with_status("failure"),
            RemoteAction::new("Clear Teams Cache").with_status("running"),
            RemoteAction::new("Flush DNS").with_status("success").with_purpose("remediation"),
            RemoteAction::new("Reset Network Adapter").with_status("success"),
            RemoteAction::new(""),
        ];

        let ranked = recommend(&incident, &actions, 10);
        let names: Vec<_> = ranked
            .iter()
            .map(|r| r.action.action_name.as_deref().unwrap())
            .collect();
        assert_eq!(names, vec!["Flush DNS", "Reset Network Adapter"]);
        assert_eq!(ranked[0].score, 75.0);
        assert_eq!(ranked[1].score, 55.0);
        assert_eq!(ranked[1].action.status.as_deref(), Some("success"));

        assert_eq!(recommend(&incident, &actions, 1).len(), 1);
    }

    #[test]
    fn test_recommend_without_device_is_empty() {
        let incident = Incident::new("INC0002")
            .with_category("network")
            .with_description("VPN down", "no machine named");
        let actions = vec![RemoteAction::new("Flush DNS")];
        assert!(recommend(&incident, &actions, 10).is_empty());
    }

    proptest! {
        #[test]
        fn property_score_bounded(
            name in "[a-z ]{0,40}",
            category in prop::sample::select(vec!["hardware", "inquiry", "software", "network", "other"]),
            description in "[a-z ]{0,80}",
            status in prop::sample::select(vec!["success", "failure", "pending"]),
        ) {
            let action = RemoteAction::new(name).with_status(status).with_purpose("remediation");
            let score = score_action(&action, category, &description);
            prop_assert!((0.0..=MAX_RELEVANCE_SCORE).contains(&score));
        }
    }
}
