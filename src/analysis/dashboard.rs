//! Dashboard and chart rollups.
//!
//! Built on top of the aggregator: headline KPIs, per-company chart rows,
//! device shares and the contact search used by the list views.

use super::aggregator::{
    compute_company_batch_status, compute_device_distribution, compute_summary_stats,
    percentage, EngagedContact,
};
use crate::models::{
    Company, CompanyBatchStatus, CompanyOverviewRow, Contact, ContactEngagementRow,
    DashboardStats, DeliveryProgress, DeliveryStatus, DeviceShare, StatusDistribution,
};

/// Compute the headline figures over every company.
pub fn compute_dashboard_stats(companies: &[Company]) -> DashboardStats {
    let contacts: Vec<&Contact> = companies.iter().flat_map(|c| &c.contacts).collect();
    let total_read = contacts
        .iter()
        .filter(|c| c.status == DeliveryStatus::Read)
        .count();

    let statuses: Vec<CompanyBatchStatus> =
        companies.iter().map(compute_company_batch_status).collect();

    DashboardStats {
        total_companies: companies.len(),
        total_contacts: contacts.len(),
        total_read,
        read_rate: percentage(total_read, contacts.len()),
        companies_sent: statuses
            .iter()
            .filter(|s| **s == CompanyBatchStatus::Sent)
            .count(),
        companies_no_links: statuses
            .iter()
            .filter(|s| **s == CompanyBatchStatus::NoLinks)
            .count(),
    }
}

/// Read/sent progress of a group of contacts, for progress bars.
pub fn compute_delivery_progress(contacts: &[Contact]) -> DeliveryProgress {
    let total = contacts.len();
    let read = contacts
        .iter()
        .filter(|c| c.status == DeliveryStatus::Read)
        .count();
    let sent = contacts
        .iter()
        .filter(|c| c.status == DeliveryStatus::Sent)
        .count();

    let ratio = |n: usize| {
        if total > 0 {
            n as f64 / total as f64 * 100.0
        } else {
            0.0
        }
    };

    DeliveryProgress {
        read,
        sent,
        total,
        pct_read: ratio(read),
        pct_sent: ratio(sent),
    }
}

/// Split contacts into opened / sent / not sent.
///
/// `opened` counts opened emails, independently of the delivery status.
pub fn compute_status_distribution<'a, I>(contacts: I) -> StatusDistribution
where
    I: IntoIterator<Item = &'a Contact>,
{
    let mut dist = StatusDistribution::default();

    for contact in contacts {
        if contact.mail_opened() {
            dist.opened += 1;
        }
        match contact.status {
            DeliveryStatus::Sent => dist.sent += 1,
            DeliveryStatus::NotSent => dist.not_sent += 1,
            DeliveryStatus::Read => {}
        }
    }

    dist
}

/// Shorten a label to `width` characters, marking the cut with an ellipsis.
pub fn truncate_label(name: &str, width: usize) -> String {
    if name.chars().count() > width {
        let head: String = name.chars().take(width).collect();
        format!("{}…", head)
    } else {
        name.to_string()
    }
}

/// One chart row per company: average completion and open rate.
pub fn compute_company_overview(
    companies: &[Company],
    name_width: usize,
) -> Vec<CompanyOverviewRow> {
    companies
        .iter()
        .map(|company| {
            let stats = compute_summary_stats(&company.contacts);
            CompanyOverviewRow {
                company_id: company.id.clone(),
                label: truncate_label(&company.name, name_width),
                completion: stats.avg_completion,
                open_rate: stats.mail_open_rate,
            }
        })
        .collect()
}

/// Device counts with their share of engaged sessions.
pub fn compute_device_shares(engaged: &[EngagedContact<'_>]) -> Vec<DeviceShare> {
    compute_device_distribution(engaged)
        .into_iter()
        .map(|(device, count)| DeviceShare {
            device,
            count,
            share: percentage(count, engaged.len()),
        })
        .collect()
}

/// Per-contact rows for a company's engagement table.
pub fn compute_contact_rows(contacts: &[Contact]) -> Vec<ContactEngagementRow> {
    contacts
        .iter()
        .map(|c| {
            let engagement = c.engagement.as_ref();
            ContactEngagementRow {
                contact_id: c.id.clone(),
                name: c.full_name(),
                short_name: c.short_name(),
                status: c.status,
                has_engagement: engagement.is_some(),
                completion: engagement.map(|e| e.completion_percent).unwrap_or(0),
                mail_opened: c.mail_opened(),
                time_spent_seconds: engagement.map(|e| e.time_spent_seconds),
                replayed: engagement.is_some_and(|e| e.has_replay()),
            }
        })
        .collect()
}

/// Keep contacts matching `query` on name, email, role or company name.
///
/// Matching is case-insensitive on the query as typed, surrounding spaces
/// included. Companies left without contacts are dropped; a blank query
/// keeps everything.
pub fn filter_companies(companies: &[Company], query: &str) -> Vec<Company> {
    if query.trim().is_empty() {
        return companies.to_vec();
    }
    let query = query.to_lowercase();

    companies
        .iter()
        .filter_map(|company| {
            let company_matches = company.name.to_lowercase().contains(&query);
            let contacts: Vec<Contact> = company
                .contacts
                .iter()
                .filter(|c| {
                    company_matches
                        || c.first_name.to_lowercase().contains(&query)
                        || c.last_name.to_lowercase().contains(&query)
                        || c.email.to_lowercase().contains(&query)
                        || c.role.to_lowercase().contains(&query)
                })
                .cloned()
                .collect();

            if contacts.is_empty() {
                None
            } else {
                Some(Company {
                    contacts,
                    ..company.clone()
                })
            }
        })
        .collect()
}

/// Format a duration as "3m 5s", or "45s" under a minute.
pub fn format_duration(seconds: u64) -> String {
    let minutes = seconds / 60;
    let secs = seconds % 60;

    if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregator::engaged_contacts;
    use crate::analysis::aggregator::tests::{contact, engaged};
    use crate::models::DeviceType;

    fn company(id: &str, name: &str, contacts: Vec<Contact>) -> Company {
        Company {
            id: id.to_string(),
            name: name.to_string(),
            industry: "Testing".to_string(),
            contacts,
        }
    }

    #[test]
    fn test_dashboard_stats() {
        let companies = vec![
            company(
                "a",
                "Alpha",
                vec![
                    engaged("a1", 4, &[], 100, DeviceType::Desktop, true),
                    contact("a2", DeliveryStatus::Sent, true),
                ],
            ),
            company("b", "Beta", vec![contact("b1", DeliveryStatus::NotSent, false)]),
            company("c", "Gamma", vec![contact("c1", DeliveryStatus::NotSent, true)]),
        ];

        let stats = compute_dashboard_stats(&companies);

        assert_eq!(stats.total_companies, 3);
        assert_eq!(stats.total_contacts, 4);
        assert_eq!(stats.total_read, 1);
        assert_eq!(stats.read_rate, 25);
        assert_eq!(stats.companies_sent, 1);
        assert_eq!(stats.companies_no_links, 1);
    }

    #[test]
    fn test_dashboard_stats_empty() {
        let stats = compute_dashboard_stats(&[]);
        assert_eq!(stats, DashboardStats::default());
    }

    #[test]
    fn test_delivery_progress() {
        let contacts = vec![
            engaged("a", 4, &[], 100, DeviceType::Desktop, true),
            contact("b", DeliveryStatus::Sent, true),
            contact("c", DeliveryStatus::Sent, true),
            contact("d", DeliveryStatus::NotSent, true),
        ];

        let progress = compute_delivery_progress(&contacts);

        assert_eq!(progress.read, 1);
        assert_eq!(progress.sent, 2);
        assert_eq!(progress.total, 4);
        assert!((progress.pct_read - 25.0).abs() < f64::EPSILON);
        assert!((progress.pct_sent - 50.0).abs() < f64::EPSILON);

        let empty = compute_delivery_progress(&[]);
        assert_eq!(empty.pct_read, 0.0);
    }

    #[test]
    fn test_status_distribution() {
        let contacts = vec![
            engaged("a", 4, &[], 100, DeviceType::Desktop, true),
            engaged("b", 4, &[], 100, DeviceType::Desktop, false),
            contact("c", DeliveryStatus::Sent, true),
            contact("d", DeliveryStatus::NotSent, false),
        ];

        let dist = compute_status_distribution(&contacts);

        assert_eq!(dist.opened, 1);
        assert_eq!(dist.sent, 1);
        assert_eq!(dist.not_sent, 1);
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("Acme Corp", 15), "Acme Corp");
        assert_eq!(truncate_label("Global Tech Industries", 15), "Global Tech Ind…");
        assert_eq!(truncate_label("Vulnérabilités", 5), "Vulné…");
    }

    #[test]
    fn test_company_overview() {
        let companies = vec![
            company(
                "a",
                "Alpha",
                vec![
                    engaged("a1", 4, &[], 100, DeviceType::Desktop, true),
                    engaged("a2", 3, &[], 100, DeviceType::Desktop, false),
                    contact("a3", DeliveryStatus::Sent, true),
                ],
            ),
            company("b", "Beta", vec![]),
        ];

        let rows = compute_company_overview(&companies, 15);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].completion, 90);
        assert_eq!(rows[0].open_rate, 33);
        assert_eq!(rows[1].completion, 0);
        assert_eq!(rows[1].open_rate, 0);
    }

    #[test]
    fn test_device_shares() {
        let contacts = vec![
            engaged("a", 4, &[], 100, DeviceType::Desktop, true),
            engaged("b", 4, &[], 100, DeviceType::Desktop, true),
            engaged("c", 4, &[], 100, DeviceType::Mobile, true),
        ];
        let engaged = engaged_contacts(&contacts);

        let shares = compute_device_shares(&engaged);

        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].device, DeviceType::Desktop);
        assert_eq!(shares[0].share, 67);
        assert_eq!(shares[1].share, 33);
    }

    #[test]
    fn test_contact_rows() {
        let contacts = vec![
            engaged("a", 4, &[1], 185, DeviceType::Desktop, true),
            contact("b", DeliveryStatus::Sent, true),
        ];

        let rows = compute_contact_rows(&contacts);

        assert_eq!(rows[0].completion, 100);
        assert!(rows[0].mail_opened);
        assert!(rows[0].replayed);
        assert_eq!(rows[0].time_spent_seconds, Some(185));
        assert_eq!(rows[1].completion, 0);
        assert!(!rows[1].has_engagement);
        assert_eq!(rows[1].time_spent_seconds, None);
    }

    #[test]
    fn test_filter_companies() {
        let mut jean = contact("c1", DeliveryStatus::Read, true);
        jean.first_name = "Jean".to_string();
        let mut marie = contact("c2", DeliveryStatus::Sent, true);
        marie.first_name = "Marie".to_string();
        marie.role = "CEO".to_string();

        let companies = vec![
            company("a", "Acme Corp", vec![jean, marie]),
            company("b", "Beta", vec![contact("c3", DeliveryStatus::NotSent, false)]),
        ];

        let by_name = filter_companies(&companies, "JEAN");
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].contacts.len(), 1);

        let by_role = filter_companies(&companies, "ceo");
        assert_eq!(by_role[0].contacts[0].first_name, "Marie");

        let by_company = filter_companies(&companies, "acme");
        assert_eq!(by_company[0].contacts.len(), 2);

        assert!(filter_companies(&companies, "nobody").is_empty());
        assert_eq!(filter_companies(&companies, "  ").len(), 2);
    }

    #[test]
    fn test_filter_companies_keeps_query_spaces() {
        let companies = vec![
            company("a", "Acme Corp", vec![contact("c1", DeliveryStatus::Read, true)]),
            company("b", "Beta", vec![contact("c2", DeliveryStatus::Sent, true)]),
        ];

        let inner = filter_companies(&companies, " CORP");
        assert_eq!(inner.len(), 1);
        assert_eq!(inner[0].id, "a");

        assert!(filter_companies(&companies, "corp ").is_empty());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(45), "45s");
        assert_eq!(format_duration(185), "3m 5s");
        assert_eq!(format_duration(0), "0s");
    }
}
