//! Markdown and JSON report generation.
//!
//! This module renders the assembled report records into the formats the
//! CLI writes out.

use super::views::{
    CompanyBatchRow, CompanyReport, ContactReport, GlobalReport, Report, ReportBody,
    ReportMetadata,
};
use crate::analysis::format_duration;
use crate::models::{
    CompanyOverviewRow, ContactEngagementRow, DeviceShare, SlideStats, SummaryStats,
};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str("# Scorecard Engagement Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));

    match &report.body {
        ReportBody::Global(global) => output.push_str(&generate_global_sections(global)),
        ReportBody::Company(company) => output.push_str(&generate_company_sections(company)),
        ReportBody::Contact(contact) => output.push_str(&generate_contact_sections(contact)),
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Dataset:** {}\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **View:** {}\n", metadata.view));
    if let Some(ref search) = metadata.search {
        section.push_str(&format!("- **Search:** `{}`\n", search));
    }
    section.push_str(&format!("- **Companies:** {}\n", metadata.companies));
    section.push_str(&format!("- **Contacts:** {}\n", metadata.contacts));
    section.push('\n');

    section
}

fn generate_global_sections(global: &GlobalReport) -> String {
    let mut output = String::new();

    let d = &global.dashboard;
    output.push_str("## Dashboard\n\n");
    output.push_str("| Companies | Contacts | Read | Batches Sent | Without Links |\n");
    output.push_str("|:---:|:---:|:---:|:---:|:---:|\n");
    output.push_str(&format!(
        "| {} | {} | {} ({}%) | {} | {} |\n\n",
        d.total_companies,
        d.total_contacts,
        d.total_read,
        d.read_rate,
        d.companies_sent,
        d.companies_no_links
    ));

    output.push_str(&generate_batch_section(&global.batches));
    output.push_str(&generate_summary_section(&global.summary));

    let s = &global.status_distribution;
    output.push_str("### Delivery Status\n\n");
    output.push_str("| Opened | Sent | Not Sent |\n");
    output.push_str("|:---:|:---:|:---:|\n");
    output.push_str(&format!("| {} | {} | {} |\n\n", s.opened, s.sent, s.not_sent));

    output.push_str(&generate_overview_section(&global.company_overview));
    output.push_str(&generate_slides_section(&global.slides));
    output.push_str(&generate_devices_section(&global.devices));

    output
}

/// Generate the company batch table.
fn generate_batch_section(batches: &[CompanyBatchRow]) -> String {
    let mut section = String::new();

    section.push_str("## Companies\n\n");

    if batches.is_empty() {
        section.push_str("No companies match.\n\n");
        return section;
    }

    section.push_str("| Company | Industry | Contacts | Batch Status | Next Action | Read |\n");
    section.push_str("|:---|:---|:---:|:---|:---|:---:|\n");

    for row in batches {
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} | {}/{} |\n",
            row.name,
            row.industry,
            row.contacts,
            row.status,
            row.action,
            row.progress.read,
            row.progress.total
        ));
    }
    section.push('\n');

    section
}

/// Generate the engagement KPI section.
fn generate_summary_section(summary: &SummaryStats) -> String {
    let mut section = String::new();

    section.push_str("## Engagement Summary\n\n");
    section.push_str("| Open Rate | Avg. Completion | Avg. Time | Replay Rate |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {}% ({} / {}) | {}% ({} complete) | {} | {}% |\n\n",
        summary.mail_open_rate,
        summary.mail_opened_count,
        summary.total_contacts,
        summary.avg_completion,
        summary.full_completion_count,
        format_duration(summary.avg_time_seconds),
        summary.replay_rate
    ));

    section
}

fn generate_overview_section(rows: &[CompanyOverviewRow]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("### Open Rate and Completion by Company\n\n");
    section.push_str("| Company | Open Rate | Completion |\n");
    section.push_str("|:---|:---:|:---:|\n");
    for row in rows {
        section.push_str(&format!(
            "| {} | {}% | {}% |\n",
            row.label, row.open_rate, row.completion
        ));
    }
    section.push('\n');

    section
}

/// Generate the per-slide views/replays table.
fn generate_slides_section(slides: &[SlideStats]) -> String {
    if slides.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("### Views and Replays by Slide\n\n");
    section.push_str("| # | Slide | Views | Replays |\n");
    section.push_str("|:---:|:---|:---:|:---:|\n");
    for (i, slide) in slides.iter().enumerate() {
        section.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            i + 1,
            slide.slide_name,
            slide.viewed_count,
            slide.replayed_count
        ));
    }
    section.push('\n');

    section
}

fn generate_devices_section(devices: &[DeviceShare]) -> String {
    if devices.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("### Devices\n\n");
    section.push_str("| Device | Sessions | Share |\n");
    section.push_str("|:---|:---:|:---:|\n");
    for device in devices {
        section.push_str(&format!(
            "| {} | {} | {}% |\n",
            device.device, device.count, device.share
        ));
    }
    section.push('\n');

    section
}

fn generate_company_sections(company: &CompanyReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("## {}\n\n", company.name));
    output.push_str(&format!(
        "*Industry: {} | Batch status: {} | Next action: {}*\n\n",
        company.industry,
        company.batch_status,
        company.batch_status.suggested_action()
    ));

    output.push_str(&generate_summary_section(&company.summary));
    output.push_str(&generate_slides_section(&company.slides));
    output.push_str(&generate_contact_table(&company.contacts));

    output
}

/// Generate the per-contact engagement table of a company.
fn generate_contact_table(rows: &[ContactEngagementRow]) -> String {
    let mut section = String::new();

    section.push_str("### Contacts\n\n");
    section.push_str("| Contact | Status | Mail Opened | Completion | Time | Replay |\n");
    section.push_str("|:---|:---|:---:|:---:|:---:|:---:|\n");

    for row in rows {
        let completion = if row.has_engagement {
            format!("{}%", row.completion)
        } else {
            "—".to_string()
        };
        let time = row
            .time_spent_seconds
            .map(format_duration)
            .unwrap_or_else(|| "—".to_string());

        section.push_str(&format!(
            "| {} | {} {} | {} | {} | {} | {} |\n",
            row.name,
            row.status.emoji(),
            row.status,
            yes_no(row.mail_opened),
            completion,
            time,
            yes_no(row.replayed)
        ));
    }
    section.push('\n');

    section
}

fn generate_contact_sections(contact: &ContactReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("## {}\n\n", contact.name));
    output.push_str(&format!(
        "*{} — {} | {}*\n\n",
        contact.role, contact.email, contact.company_name
    ));
    output.push_str(&format!("- **Scorecard:** {}\n", contact.scorecard_name));
    output.push_str(&format!(
        "- **Status:** {} {}\n",
        contact.status.emoji(),
        contact.status
    ));
    match contact.link {
        Some(ref link) => output.push_str(&format!("- **Link:** {}\n", link)),
        None => output.push_str("- **Link:** not generated\n"),
    }
    output.push('\n');

    let Some(ref e) = contact.engagement else {
        output.push_str("No engagement data recorded for this contact yet.\n\n");
        return output;
    };

    output.push_str("### Engagement\n\n");
    output.push_str(&format!(
        "- **Completion:** {}% ({}/{} slides)\n",
        e.completion_percent, e.slides_viewed, e.total_slides
    ));
    output.push_str(&format!(
        "- **Time Spent:** {}\n",
        format_duration(e.time_spent_seconds)
    ));
    output.push_str(&format!("- **Replayed Slides:** {}\n", e.replayed_slides));
    output.push_str(&format!("- **Device:** {}\n", e.device));
    match e.mail_opened_at {
        Some(opened) => output.push_str(&format!(
            "- **Mail Opened:** {}\n",
            opened.format("%Y-%m-%d %H:%M UTC")
        )),
        None => output.push_str("- **Mail Opened:** no\n"),
    }
    output.push_str(&format!(
        "- **Last Active:** {}\n\n",
        e.last_active_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output.push_str("### Progression\n\n");
    for slide in &e.slides {
        let state = match (slide.visited, slide.replayed) {
            (_, true) => "🔁 replayed",
            (true, false) => "✅ viewed",
            (false, false) => "⬜ not reached",
        };
        output.push_str(&format!(
            "{}. {} — {}\n",
            slide.slide_index + 1,
            slide.slide_name,
            state
        ));
    }
    output.push('\n');

    output
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Report generated by scorecard-analytics*\n".to_string()
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::sample::sample_dataset;
    use crate::models::SlideCatalog;
    use crate::report::views::{build_report, ReportOptions, ReportView};

    fn report_for(view: ReportView) -> Report {
        build_report(
            &sample_dataset(),
            &view,
            &SlideCatalog::default(),
            &ReportOptions::default(),
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_generate_global_markdown() {
        let markdown = generate_markdown_report(&report_for(ReportView::Global));

        assert!(markdown.contains("# Scorecard Engagement Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("## Dashboard"));
        let medsecure = "| MedSecure Health | Healthcare | 3 | Links ready | send | 0/3 |";
        assert!(markdown.contains(medsecure));
        assert!(markdown.contains("| 47% (8 / 17) | 98% (7 complete) | 2m 39s | 50% |"));
        assert!(markdown.contains("| 5 | Score Final | 7 | 0 |"));
        assert!(markdown.contains("| Desktop | 5 | 63% |"));
    }

    #[test]
    fn test_generate_company_markdown() {
        let markdown = generate_markdown_report(&report_for(ReportView::Company("comp_1".into())));

        assert!(markdown.contains("## Acme Corp"));
        assert!(markdown.contains("Next action: resend"));
        assert!(markdown.contains("| Paul Martin | 📨 Sent | No | — | — | No |"));
        assert!(markdown.contains("| Jean Dupont | ✅ Read | Yes | 100% | 3m 5s | Yes |"));
    }

    #[test]
    fn test_generate_contact_markdown() {
        let markdown = generate_markdown_report(&report_for(ReportView::Contact("c_10".into())));

        assert!(markdown.contains("## Antoine Petit"));
        assert!(markdown.contains("- **Completion:** 80% (4/5 slides)"));
        assert!(markdown.contains("5. Score Final — ⬜ not reached"));

        let markdown = generate_markdown_report(&report_for(ReportView::Contact("c_16".into())));
        assert!(markdown.contains("not generated"));
        assert!(markdown.contains("No engagement data recorded"));
    }

    #[test]
    fn test_generate_json_report() {
        let json = generate_json_report(&report_for(ReportView::Global)).unwrap();

        assert!(json.contains("\"metadata\""));
        assert!(json.contains("\"view\": \"global\""));
        assert!(json.contains("\"mail_open_rate\": 47"));
        assert!(json.contains("\"status\": \"links_ready\""));
    }
}
