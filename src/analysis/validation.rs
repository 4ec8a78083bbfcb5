//! Dataset invariant checks.
//!
//! Aggregation never depends on these checks; they only report records
//! that break the expected shape so a caller can decide what to do.

use crate::models::{Company, DeliveryStatus, SlideCatalog};
use serde::Serialize;
use std::fmt;

/// What is wrong with a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationKind {
    /// Status is `read` but no engagement was recorded.
    ReadWithoutEngagement,
    /// Status is `sent` or `read` but the contact has no link.
    LinkMissingAfterSend,
    /// A slide is flagged replayed without being visited.
    ReplayedNotVisited { slide_index: usize },
    /// Stored completion disagrees with `slides_viewed / total_slides`.
    CompletionDrift { stored: u32, expected: u32 },
    /// The slide breakdown does not cover the catalog.
    BreakdownLength { actual: usize, expected: usize },
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::ReadWithoutEngagement => write!(f, "read without engagement data"),
            ViolationKind::LinkMissingAfterSend => write!(f, "sent without a link"),
            ViolationKind::ReplayedNotVisited { slide_index } => {
                write!(f, "slide {} replayed but not visited", slide_index)
            }
            ViolationKind::CompletionDrift { stored, expected } => write!(
                f,
                "completion stored as {}% but slides viewed give {}%",
                stored, expected
            ),
            ViolationKind::BreakdownLength { actual, expected } => write!(
                f,
                "slide breakdown has {} entries, catalog has {}",
                actual, expected
            ),
        }
    }
}

/// A violation attached to the contact it was found on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub company_id: String,
    pub contact_id: String,
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}: {}", self.company_id, self.contact_id, self.kind)
    }
}

/// Check every contact of every company against the data model invariants.
pub fn validate_companies(companies: &[Company], catalog: &SlideCatalog) -> Vec<Violation> {
    let mut violations = Vec::new();

    for company in companies {
        for contact in &company.contacts {
            let mut push = |kind: ViolationKind| {
                violations.push(Violation {
                    company_id: company.id.clone(),
                    contact_id: contact.id.clone(),
                    kind,
                })
            };

            if contact.status == DeliveryStatus::Read && contact.engagement.is_none() {
                push(ViolationKind::ReadWithoutEngagement);
            }

            if contact.status.is_delivered() && contact.link.is_none() {
                push(ViolationKind::LinkMissingAfterSend);
            }

            let Some(engagement) = &contact.engagement else {
                continue;
            };

            if engagement.slide_breakdown.len() != catalog.len() {
                push(ViolationKind::BreakdownLength {
                    actual: engagement.slide_breakdown.len(),
                    expected: catalog.len(),
                });
            }

            for slide in &engagement.slide_breakdown {
                if slide.replayed && !slide.visited {
                    push(ViolationKind::ReplayedNotVisited {
                        slide_index: slide.slide_index,
                    });
                }
            }

            if engagement.has_completion_drift() {
                push(ViolationKind::CompletionDrift {
                    stored: engagement.completion_percent,
                    expected: engagement.expected_completion_percent(),
                });
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregator::tests::{contact, engaged};
    use crate::models::DeviceType;

    fn company(contacts: Vec<crate::models::Contact>) -> Company {
        Company {
            id: "comp".to_string(),
            name: "Test Co".to_string(),
            industry: "Testing".to_string(),
            contacts,
        }
    }

    #[test]
    fn test_clean_dataset() {
        let companies = vec![company(vec![
            engaged("a", 4, &[0, 1], 100, DeviceType::Desktop, true),
            contact("b", DeliveryStatus::Sent, true),
            contact("c", DeliveryStatus::NotSent, false),
        ])];

        assert!(validate_companies(&companies, &SlideCatalog::default()).is_empty());
    }

    #[test]
    fn test_detects_read_without_engagement() {
        let companies = vec![company(vec![contact("a", DeliveryStatus::Read, true)])];

        let violations = validate_companies(&companies, &SlideCatalog::default());

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::ReadWithoutEngagement);
        assert_eq!(violations[0].contact_id, "a");
    }

    #[test]
    fn test_detects_missing_link() {
        let companies = vec![company(vec![contact("a", DeliveryStatus::Sent, false)])];

        let violations = validate_companies(&companies, &SlideCatalog::default());

        assert_eq!(violations[0].kind, ViolationKind::LinkMissingAfterSend);
    }

    #[test]
    fn test_detects_engagement_problems() {
        let mut c = engaged("a", 1, &[], 100, DeviceType::Desktop, true);
        {
            let e = c.engagement.as_mut().unwrap();
            e.completion_percent = 55;
            e.slide_breakdown[3].replayed = true;
            e.slide_breakdown.pop();
        }
        let companies = vec![company(vec![c])];

        let violations = validate_companies(&companies, &SlideCatalog::default());
        let kinds: Vec<_> = violations.into_iter().map(|v| v.kind).collect();

        assert!(kinds.contains(&ViolationKind::BreakdownLength {
            actual: 4,
            expected: 5
        }));
        assert!(kinds.contains(&ViolationKind::ReplayedNotVisited { slide_index: 3 }));
        assert!(kinds.contains(&ViolationKind::CompletionDrift {
            stored: 55,
            expected: 40
        }));
    }

    #[test]
    fn test_violation_display() {
        let v = Violation {
            company_id: "comp_1".to_string(),
            contact_id: "c_1".to_string(),
            kind: ViolationKind::CompletionDrift {
                stored: 50,
                expected: 100,
            },
        };

        assert_eq!(
            v.to_string(),
            "comp_1/c_1: completion stored as 50% but slides viewed give 100%"
        );
    }
}
