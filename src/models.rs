//! Data models for scorecard engagement analytics.
//!
//! This module contains the company/contact/engagement records supplied by
//! a dataset, and the aggregate records produced by the analysis layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::analysis::percentage;

/// Slide names shown to a viewer, in presentation order.
pub const DEFAULT_SLIDE_NAMES: [&str; 5] = [
    "Score Global",
    "Indicateurs",
    "Vulnérabilités",
    "Radar Chart",
    "Score Final",
];

/// Delivery status of a contact's scorecard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    /// No email has been sent yet.
    NotSent,
    /// The scorecard email was sent.
    Sent,
    /// The contact opened the scorecard experience.
    Read,
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryStatus::NotSent => write!(f, "Not sent"),
            DeliveryStatus::Sent => write!(f, "Sent"),
            DeliveryStatus::Read => write!(f, "Read"),
        }
    }
}

impl DeliveryStatus {
    /// Whether the scorecard email went out (`sent` or `read`).
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryStatus::Sent | DeliveryStatus::Read)
    }

    /// Returns an emoji badge for the status.
    pub fn emoji(&self) -> &'static str {
        match self {
            DeliveryStatus::NotSent => "⚪",
            DeliveryStatus::Sent => "📨",
            DeliveryStatus::Read => "✅",
        }
    }
}

/// Device category a viewer used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Desktop,
    Mobile,
    Tablet,
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceType::Desktop => write!(f, "Desktop"),
            DeviceType::Mobile => write!(f, "Mobile"),
            DeviceType::Tablet => write!(f, "Tablet"),
        }
    }
}

/// Per-slide engagement of a single viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideEngagement {
    pub slide_index: usize,
    pub slide_name: String,
    pub visited: bool,
    pub replayed: bool,
}

/// Recorded interaction of a contact with their scorecard experience.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementData {
    /// When the scorecard email was opened, if it was.
    #[serde(default)]
    pub mail_opened_at: Option<DateTime<Utc>>,
    /// Total time spent in the experience.
    pub time_spent_seconds: u64,
    /// Share of slides reached, 0-100. Stored, not derived.
    pub completion_percent: u32,
    /// Number of slides viewed.
    pub slides_viewed: usize,
    /// Number of slides in the experience.
    pub total_slides: usize,
    /// Index of the furthest slide reached.
    pub last_slide_reached: usize,
    /// Last recorded activity.
    pub last_active_at: DateTime<Utc>,
    /// Device used for the session.
    pub device_type: DeviceType,
    /// One entry per slide, in catalog order.
    #[serde(default)]
    pub slide_breakdown: Vec<SlideEngagement>,
}

impl EngagementData {
    /// Builds an engagement record where every slide up to `last_slide_reached`
    /// is visited and the completion figures are derived from it.
    ///
    /// Slides listed in `replayed_slides` are flagged as replayed only when
    /// they were also visited.
    pub fn synthesize(
        catalog: &SlideCatalog,
        mail_opened_at: Option<DateTime<Utc>>,
        time_spent_seconds: u64,
        last_slide_reached: usize,
        replayed_slides: &[usize],
        last_active_at: DateTime<Utc>,
        device_type: DeviceType,
    ) -> Self {
        let total_slides = catalog.len();
        let slides_viewed = (last_slide_reached + 1).min(total_slides);

        let slide_breakdown = catalog
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let visited = i <= last_slide_reached;
                SlideEngagement {
                    slide_index: i,
                    slide_name: name.to_string(),
                    visited,
                    replayed: visited && replayed_slides.contains(&i),
                }
            })
            .collect();

        Self {
            mail_opened_at,
            time_spent_seconds,
            completion_percent: percentage(slides_viewed, total_slides),
            slides_viewed,
            total_slides,
            last_slide_reached,
            last_active_at,
            device_type,
            slide_breakdown,
        }
    }

    /// Completion percentage derived from `slides_viewed / total_slides`.
    pub fn expected_completion_percent(&self) -> u32 {
        percentage(self.slides_viewed, self.total_slides)
    }

    /// Number of slides flagged as visited in the breakdown.
    pub fn visited_count(&self) -> usize {
        self.slide_breakdown.iter().filter(|s| s.visited).count()
    }

    /// Number of slides flagged as replayed in the breakdown.
    pub fn replayed_count(&self) -> usize {
        self.slide_breakdown.iter().filter(|s| s.replayed).count()
    }

    /// Whether any slide was replayed.
    pub fn has_replay(&self) -> bool {
        self.slide_breakdown.iter().any(|s| s.replayed)
    }

    /// Whether the stored completion disagrees with the derived one.
    pub fn has_completion_drift(&self) -> bool {
        self.completion_percent != self.expected_completion_percent()
    }
}

/// A person receiving a scorecard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    /// Name of the scorecard document generated for this contact.
    pub scorecard_name: String,
    /// Access link, absent until generated.
    #[serde(default)]
    pub link: Option<String>,
    pub status: DeliveryStatus,
    /// Present once the contact has interacted with the experience.
    #[serde(default)]
    pub engagement: Option<EngagementData>,
    pub created_at: DateTime<Utc>,
}

impl Contact {
    /// Returns "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns "First L." as used on chart axes.
    pub fn short_name(&self) -> String {
        match self.last_name.chars().next() {
            Some(initial) => format!("{} {}.", self.first_name, initial),
            None => self.first_name.clone(),
        }
    }

    /// Whether the contact opened the scorecard email.
    pub fn mail_opened(&self) -> bool {
        self.engagement
            .as_ref()
            .is_some_and(|e| e.mail_opened_at.is_some())
    }
}

/// A company and the contacts it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
    pub industry: String,
    #[serde(default)]
    pub contacts: Vec<Contact>,
}

/// Fixed, ordered list of slide names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlideCatalog {
    names: Vec<String>,
}

impl Default for SlideCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_SLIDE_NAMES.iter().map(|s| s.to_string()).collect())
    }
}

impl SlideCatalog {
    /// Creates a catalog from slide names in presentation order.
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Number of slides.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name of the slide at `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Iterates over slide names in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// Company-level rollup of its contacts' delivery statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyBatchStatus {
    /// No contact has a link yet.
    NoLinks,
    /// Links exist but nothing has been sent.
    LinksReady,
    /// At least one contact was sent (or read) its scorecard.
    Sent,
}

impl fmt::Display for CompanyBatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompanyBatchStatus::NoLinks => write!(f, "No links"),
            CompanyBatchStatus::LinksReady => write!(f, "Links ready"),
            CompanyBatchStatus::Sent => write!(f, "Sent"),
        }
    }
}

impl CompanyBatchStatus {
    /// The bulk action offered for a company in this state.
    pub fn suggested_action(&self) -> &'static str {
        match self {
            CompanyBatchStatus::NoLinks => "generate",
            CompanyBatchStatus::LinksReady => "send",
            CompanyBatchStatus::Sent => "resend",
        }
    }
}

/// Summary of engagement over a set of contacts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Number of contacts considered.
    pub total_contacts: usize,
    /// Contacts with engagement data.
    pub engaged_count: usize,
    /// Engaged contacts who opened the email.
    pub mail_opened_count: usize,
    /// `mail_opened_count` over all contacts, in percent.
    pub mail_open_rate: u32,
    /// Mean completion over engaged contacts, in percent.
    pub avg_completion: u32,
    /// Engaged contacts with exactly 100% completion.
    pub full_completion_count: usize,
    /// Mean time spent over engaged contacts.
    pub avg_time_seconds: u64,
    /// Engaged contacts with at least one replayed slide, in percent.
    pub replay_rate: u32,
}

/// View and replay counts for one slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideStats {
    pub slide_name: String,
    pub viewed_count: usize,
    pub replayed_count: usize,
}

/// Headline figures for the dashboard page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_companies: usize,
    pub total_contacts: usize,
    pub total_read: usize,
    pub read_rate: u32,
    pub companies_sent: usize,
    pub companies_no_links: usize,
}

/// Read/sent progress of a group of contacts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryProgress {
    pub read: usize,
    pub sent: usize,
    pub total: usize,
    pub pct_read: f64,
    pub pct_sent: f64,
}

/// Contacts split by how far their scorecard got.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDistribution {
    pub opened: usize,
    pub sent: usize,
    pub not_sent: usize,
}

/// One bar of the per-company open/completion chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyOverviewRow {
    pub company_id: String,
    pub label: String,
    pub completion: u32,
    pub open_rate: u32,
}

/// Sessions per device with their share of engaged contacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceShare {
    pub device: DeviceType,
    pub count: usize,
    pub share: u32,
}

/// One line of a company's contact table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEngagementRow {
    pub contact_id: String,
    pub name: String,
    pub short_name: String,
    pub status: DeliveryStatus,
    pub has_engagement: bool,
    pub completion: u32,
    pub mail_opened: bool,
    pub time_spent_seconds: Option<u64>,
    pub replayed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 14, 10, 5, 0).unwrap()
    }

    #[test]
    fn test_default_catalog() {
        let catalog = SlideCatalog::default();
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.get(0), Some("Score Global"));
        assert_eq!(catalog.get(4), Some("Score Final"));
        assert_eq!(catalog.get(5), None);
    }

    #[test]
    fn test_synthesize_full_view() {
        let catalog = SlideCatalog::default();
        let e = EngagementData::synthesize(
            &catalog,
            Some(ts()),
            185,
            4,
            &[0, 1],
            ts(),
            DeviceType::Desktop,
        );

        assert_eq!(e.slides_viewed, 5);
        assert_eq!(e.completion_percent, 100);
        assert_eq!(e.visited_count(), 5);
        assert_eq!(e.replayed_count(), 2);
        assert!(e.has_replay());
        assert!(!e.has_completion_drift());
    }

    #[test]
    fn test_synthesize_partial_view_ignores_unvisited_replays() {
        let catalog = SlideCatalog::default();
        let e = EngagementData::synthesize(
            &catalog,
            None,
            40,
            0,
            &[0, 1],
            ts(),
            DeviceType::Mobile,
        );

        assert_eq!(e.slides_viewed, 1);
        assert_eq!(e.completion_percent, 20);
        assert!(e.slide_breakdown[0].replayed);
        assert!(!e.slide_breakdown[1].visited);
        assert!(!e.slide_breakdown[1].replayed);
    }

    #[test]
    fn test_completion_drift() {
        let catalog = SlideCatalog::default();
        let mut e = EngagementData::synthesize(
            &catalog,
            None,
            10,
            3,
            &[],
            ts(),
            DeviceType::Tablet,
        );
        assert_eq!(e.completion_percent, 80);

        e.completion_percent = 75;
        assert!(e.has_completion_drift());
        assert_eq!(e.expected_completion_percent(), 80);
    }

    #[test]
    fn test_batch_status_actions() {
        assert_eq!(CompanyBatchStatus::NoLinks.suggested_action(), "generate");
        assert_eq!(CompanyBatchStatus::LinksReady.suggested_action(), "send");
        assert_eq!(CompanyBatchStatus::Sent.suggested_action(), "resend");
    }

    #[test]
    fn test_contact_names() {
        let contact = Contact {
            id: "c_1".to_string(),
            first_name: "Jean".to_string(),
            last_name: "Dupont".to_string(),
            email: "jean.dupont@acme.com".to_string(),
            role: "CISO".to_string(),
            scorecard_name: "Acme.pdf".to_string(),
            link: None,
            status: DeliveryStatus::NotSent,
            engagement: None,
            created_at: ts(),
        };

        assert_eq!(contact.full_name(), "Jean Dupont");
        assert_eq!(contact.short_name(), "Jean D.");
        assert!(!contact.mail_opened());
    }

    #[test]
    fn test_contact_json_shape() {
        let json = r#"{
            "id": "c_3",
            "firstName": "Paul",
            "lastName": "Martin",
            "email": "paul.martin@acme.com",
            "role": "IT Manager",
            "scorecardName": "Acme_IT_Metrics_Q1.pdf",
            "link": "https://ai.scorecard.com/v/p3q4r5s6",
            "status": "not_sent",
            "engagement": null,
            "createdAt": "2024-01-10T09:00:00Z"
        }"#;

        let contact: Contact = serde_json::from_str(json).unwrap();
        assert_eq!(contact.status, DeliveryStatus::NotSent);
        assert!(contact.engagement.is_none());
        assert_eq!(contact.link.as_deref(), Some("https://ai.scorecard.com/v/p3q4r5s6"));
    }

    #[test]
    fn test_status_delivered() {
        assert!(!DeliveryStatus::NotSent.is_delivered());
        assert!(DeliveryStatus::Sent.is_delivered());
        assert!(DeliveryStatus::Read.is_delivered());
    }
}
