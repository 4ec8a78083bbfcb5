//! Report assembly.
//!
//! Turns a dataset into the records behind each dashboard view: the global
//! overview, a single company, or a single contact.

use crate::analysis::{
    compute_company_batch_status, compute_company_overview, compute_contact_rows,
    compute_dashboard_stats, compute_delivery_progress, compute_device_shares,
    compute_per_slide_stats, compute_status_distribution, compute_summary_stats,
    engaged_contacts,
};
use crate::dataset::Dataset;
use crate::models::{
    Company, CompanyBatchStatus, CompanyOverviewRow, Contact, ContactEngagementRow,
    DashboardStats, DeliveryProgress, DeliveryStatus, DeviceShare, DeviceType, SlideCatalog,
    SlideEngagement, SlideStats, StatusDistribution, SummaryStats,
};
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

/// Which view to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportView {
    Global,
    Company(String),
    Contact(String),
}

impl ReportView {
    pub fn name(&self) -> &'static str {
        match self {
            ReportView::Global => "global",
            ReportView::Company(_) => "company",
            ReportView::Contact(_) => "contact",
        }
    }
}

/// Knobs for report assembly.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Maximum characters of a company name on chart labels.
    pub company_name_width: usize,
    /// Include per-slide view/replay counts.
    pub include_slide_breakdown: bool,
    /// Include device distribution.
    pub include_devices: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            company_name_width: 15,
            include_slide_breakdown: true,
            include_devices: true,
        }
    }
}

/// Metadata about the report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Where the dataset came from.
    pub source: String,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// View name.
    pub view: String,
    /// Search query applied before aggregation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    pub companies: usize,
    pub contacts: usize,
}

/// One line of the company batch table.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyBatchRow {
    pub company_id: String,
    pub name: String,
    pub industry: String,
    pub contacts: usize,
    pub status: CompanyBatchStatus,
    pub action: String,
    pub progress: DeliveryProgress,
}

/// Overview across every company.
#[derive(Debug, Clone, Serialize)]
pub struct GlobalReport {
    pub dashboard: DashboardStats,
    pub batches: Vec<CompanyBatchRow>,
    pub summary: SummaryStats,
    pub status_distribution: StatusDistribution,
    pub company_overview: Vec<CompanyOverviewRow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub slides: Vec<SlideStats>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub devices: Vec<DeviceShare>,
}

/// Engagement of one company's contacts.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyReport {
    pub company_id: String,
    pub name: String,
    pub industry: String,
    pub batch_status: CompanyBatchStatus,
    pub summary: SummaryStats,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub slides: Vec<SlideStats>,
    pub contacts: Vec<ContactEngagementRow>,
}

/// Engagement detail of one contact.
#[derive(Debug, Clone, Serialize)]
pub struct ContactEngagementDetail {
    pub completion_percent: u32,
    pub slides_viewed: usize,
    pub total_slides: usize,
    pub time_spent_seconds: u64,
    pub device: DeviceType,
    pub mail_opened_at: Option<DateTime<Utc>>,
    pub last_active_at: DateTime<Utc>,
    pub replayed_slides: usize,
    pub slides: Vec<SlideEngagement>,
}

/// Everything known about one contact.
#[derive(Debug, Clone, Serialize)]
pub struct ContactReport {
    pub contact_id: String,
    pub name: String,
    pub role: String,
    pub email: String,
    pub company_name: String,
    pub scorecard_name: String,
    pub status: DeliveryStatus,
    pub link: Option<String>,
    pub engagement: Option<ContactEngagementDetail>,
}

/// Body of a report, one variant per view.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", content = "data", rename_all = "snake_case")]
pub enum ReportBody {
    Global(GlobalReport),
    Company(CompanyReport),
    Contact(ContactReport),
}

/// The complete analytics report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub body: ReportBody,
}

/// Build the global overview.
pub fn build_global_report(
    companies: &[Company],
    catalog: &SlideCatalog,
    options: &ReportOptions,
) -> GlobalReport {
    let contacts: Vec<&Contact> = companies.iter().flat_map(|c| &c.contacts).collect();
    let engaged = engaged_contacts(contacts.iter().copied());

    let batches = companies
        .iter()
        .map(|company| {
            let status = compute_company_batch_status(company);
            CompanyBatchRow {
                company_id: company.id.clone(),
                name: company.name.clone(),
                industry: company.industry.clone(),
                contacts: company.contacts.len(),
                status,
                action: status.suggested_action().to_string(),
                progress: compute_delivery_progress(&company.contacts),
            }
        })
        .collect();

    GlobalReport {
        dashboard: compute_dashboard_stats(companies),
        batches,
        summary: compute_summary_stats(contacts.iter().copied()),
        status_distribution: compute_status_distribution(contacts.iter().copied()),
        company_overview: compute_company_overview(companies, options.company_name_width),
        slides: if options.include_slide_breakdown {
            compute_per_slide_stats(&engaged, catalog)
        } else {
            Vec::new()
        },
        devices: if options.include_devices {
            compute_device_shares(&engaged)
        } else {
            Vec::new()
        },
    }
}

/// Build the view of a single company.
pub fn build_company_report(
    company: &Company,
    catalog: &SlideCatalog,
    options: &ReportOptions,
) -> CompanyReport {
    let engaged = engaged_contacts(&company.contacts);

    CompanyReport {
        company_id: company.id.clone(),
        name: company.name.clone(),
        industry: company.industry.clone(),
        batch_status: compute_company_batch_status(company),
        summary: compute_summary_stats(&company.contacts),
        slides: if options.include_slide_breakdown {
            compute_per_slide_stats(&engaged, catalog)
        } else {
            Vec::new()
        },
        contacts: compute_contact_rows(&company.contacts),
    }
}

/// Build the view of a single contact.
pub fn build_contact_report(company: &Company, contact: &Contact) -> ContactReport {
    let engagement = contact.engagement.as_ref().map(|e| ContactEngagementDetail {
        completion_percent: e.completion_percent,
        slides_viewed: e.slides_viewed,
        total_slides: e.total_slides,
        time_spent_seconds: e.time_spent_seconds,
        device: e.device_type,
        mail_opened_at: e.mail_opened_at,
        last_active_at: e.last_active_at,
        replayed_slides: e.replayed_count(),
        slides: e.slide_breakdown.clone(),
    });

    ContactReport {
        contact_id: contact.id.clone(),
        name: contact.full_name(),
        role: contact.role.clone(),
        email: contact.email.clone(),
        company_name: company.name.clone(),
        scorecard_name: contact.scorecard_name.clone(),
        status: contact.status,
        link: contact.link.clone(),
        engagement,
    }
}

/// Build the requested view over a dataset.
pub fn build_report(
    dataset: &Dataset,
    view: &ReportView,
    catalog: &SlideCatalog,
    options: &ReportOptions,
    search: Option<&str>,
) -> Result<Report> {
    debug!("Building {} report from {}", view.name(), dataset.source);

    let body = match view {
        ReportView::Global => {
            ReportBody::Global(build_global_report(&dataset.companies, catalog, options))
        }
        ReportView::Company(id) => {
            let company = dataset
                .find_company(id)
                .ok_or_else(|| anyhow!("Company not found: {}", id))?;
            ReportBody::Company(build_company_report(company, catalog, options))
        }
        ReportView::Contact(id) => {
            let (company, contact) = dataset
                .find_contact(id)
                .ok_or_else(|| anyhow!("Contact not found: {}", id))?;
            ReportBody::Contact(build_contact_report(company, contact))
        }
    };

    let metadata = ReportMetadata {
        source: dataset.source.clone(),
        generated_at: Utc::now(),
        view: view.name().to_string(),
        search: search.map(str::to_string),
        companies: dataset.companies.len(),
        contacts: dataset.contact_count(),
    };

    Ok(Report { metadata, body })
}
