//! Engagement aggregation and statistics.
//!
//! Pure rollups over contacts, used by every report view. None of these
//! functions fail: empty input and missing engagement data degrade to zero.

use crate::models::{
    Company, CompanyBatchStatus, Contact, DeviceType, EngagementData, SlideCatalog, SlideStats,
    SummaryStats,
};
use std::collections::BTreeMap;

/// A contact known to have engagement data.
#[derive(Debug, Clone, Copy)]
pub struct EngagedContact<'a> {
    pub contact: &'a Contact,
    pub engagement: &'a EngagementData,
}

/// Round half up, matching how dashboard percentages are displayed.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// `part / whole` as a rounded percentage, 0 when `whole` is 0.
pub fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }

    round_half_up(part as f64 / whole as f64 * 100.0) as u32
}

/// Rounded mean, 0 for an empty sample.
fn rounded_mean(total: u128, count: usize) -> u64 {
    if count == 0 {
        return 0;
    }

    round_half_up(total as f64 / count as f64) as u64
}

/// Select the contacts that have engagement data, preserving order.
pub fn engaged_contacts<'a, I>(contacts: I) -> Vec<EngagedContact<'a>>
where
    I: IntoIterator<Item = &'a Contact>,
{
    contacts
        .into_iter()
        .filter_map(|contact| {
            contact
                .engagement
                .as_ref()
                .map(|engagement| EngagedContact {
                    contact,
                    engagement,
                })
        })
        .collect()
}

/// Compute summary statistics over any sequence of contacts.
pub fn compute_summary_stats<'a, I>(contacts: I) -> SummaryStats
where
    I: IntoIterator<Item = &'a Contact>,
{
    let contacts: Vec<&Contact> = contacts.into_iter().collect();
    let engaged = engaged_contacts(contacts.iter().copied());

    let total_contacts = contacts.len();
    let engaged_count = engaged.len();

    let mail_opened_count = engaged
        .iter()
        .filter(|e| e.engagement.mail_opened_at.is_some())
        .count();

    // Totals are widened so large stored values cannot overflow.
    let completion_total: u128 = engaged
        .iter()
        .map(|e| u128::from(e.engagement.completion_percent))
        .sum();

    let full_completion_count = engaged
        .iter()
        .filter(|e| e.engagement.completion_percent == 100)
        .count();

    let time_total: u128 = engaged
        .iter()
        .map(|e| u128::from(e.engagement.time_spent_seconds))
        .sum();

    let with_replay = engaged.iter().filter(|e| e.engagement.has_replay()).count();

    SummaryStats {
        total_contacts,
        engaged_count,
        mail_opened_count,
        mail_open_rate: percentage(mail_opened_count, total_contacts),
        avg_completion: rounded_mean(completion_total, engaged_count) as u32,
        full_completion_count,
        avg_time_seconds: rounded_mean(time_total, engaged_count),
        replay_rate: percentage(with_replay, engaged_count),
    }
}

/// Count views and replays per slide, one entry per catalog slide.
///
/// Breakdowns shorter than the catalog count as not visited for the
/// missing positions.
pub fn compute_per_slide_stats(
    engaged: &[EngagedContact<'_>],
    catalog: &SlideCatalog,
) -> Vec<SlideStats> {
    catalog
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let viewed_count = engaged
                .iter()
                .filter(|e| e.engagement.slide_breakdown.get(i).is_some_and(|s| s.visited))
                .count();
            let replayed_count = engaged
                .iter()
                .filter(|e| e.engagement.slide_breakdown.get(i).is_some_and(|s| s.replayed))
                .count();

            SlideStats {
                slide_name: name.to_string(),
                viewed_count,
                replayed_count,
            }
        })
        .collect()
}

/// Group engaged contacts by device. Only observed devices appear.
pub fn compute_device_distribution(engaged: &[EngagedContact<'_>]) -> BTreeMap<DeviceType, usize> {
    let mut dist: BTreeMap<DeviceType, usize> = BTreeMap::new();

    for e in engaged {
        *dist.entry(e.engagement.device_type).or_default() += 1;
    }

    dist
}

/// Roll a company's contacts up into one batch status.
///
/// The furthest-progressed contact wins: a single sent or read contact
/// makes the whole company `Sent`, checked before any link is looked at.
pub fn compute_company_batch_status(company: &Company) -> CompanyBatchStatus {
    if company.contacts.iter().any(|c| c.status.is_delivered()) {
        return CompanyBatchStatus::Sent;
    }

    if company.contacts.iter().any(|c| c.link.is_some()) {
        return CompanyBatchStatus::LinksReady;
    }

    CompanyBatchStatus::NoLinks
}
