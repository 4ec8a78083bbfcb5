//! Built-in sample dataset.
//!
//! Five companies covering every batch status, used when no dataset is
//! given on the command line and as a known baseline in tests.

use super::Dataset;
use crate::models::{
    Company, Contact, DeliveryStatus, DeviceType, EngagementData, SlideCatalog,
};
use chrono::{DateTime, Utc};

/// Slides flagged as replayed for sample viewers who replayed.
const SAMPLE_REPLAYED_SLIDES: [usize; 2] = [0, 1];

fn at(timestamp: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_default()
}

fn engagement(
    mail_opened_at: &str,
    time_spent_seconds: u64,
    last_slide: usize,
    has_replay: bool,
    last_active_at: &str,
    device: DeviceType,
) -> EngagementData {
    let replayed: &[usize] = if has_replay {
        &SAMPLE_REPLAYED_SLIDES
    } else {
        &[]
    };

    EngagementData::synthesize(
        &SlideCatalog::default(),
        Some(at(mail_opened_at)),
        time_spent_seconds,
        last_slide,
        replayed,
        at(last_active_at),
        device,
    )
}

struct ContactSeed<'a> {
    id: &'a str,
    name: (&'a str, &'a str),
    email: &'a str,
    role: &'a str,
    scorecard: &'a str,
    link: Option<&'a str>,
    status: DeliveryStatus,
    created_at: &'a str,
}

impl ContactSeed<'_> {
    fn build(self, engagement: Option<EngagementData>) -> Contact {
        Contact {
            id: self.id.to_string(),
            first_name: self.name.0.to_string(),
            last_name: self.name.1.to_string(),
            email: self.email.to_string(),
            role: self.role.to_string(),
            scorecard_name: self.scorecard.to_string(),
            link: self
                .link
                .map(|code| format!("https://ai.scorecard.com/v/{}", code)),
            status: self.status,
            engagement,
            created_at: at(self.created_at),
        }
    }
}

fn company(id: &str, name: &str, industry: &str, contacts: Vec<Contact>) -> Company {
    Company {
        id: id.to_string(),
        name: name.to_string(),
        industry: industry.to_string(),
        contacts,
    }
}

/// Companies of the sample dataset.
pub fn sample_companies() -> Vec<Company> {
    use DeliveryStatus::{NotSent, Read, Sent};
    use DeviceType::{Desktop, Mobile, Tablet};

    vec![
        // Every contact has a link; batch sent.
        company(
            "comp_1",
            "Acme Corp",
            "Manufacturing",
            vec![
                ContactSeed {
                    id: "c_1",
                    name: ("Jean", "Dupont"),
                    email: "jean.dupont@acme.com",
                    role: "CISO",
                    scorecard: "Acme_Security_Report_Q1.pdf",
                    link: Some("a1b2c3d4"),
                    status: Read,
                    created_at: "2024-01-10T09:00:00Z",
                }
                .build(Some(engagement(
                    "2024-01-14T10:05:00Z",
                    185,
                    4,
                    true,
                    "2024-01-14T10:08:05Z",
                    Desktop,
                ))),
                ContactSeed {
                    id: "c_2",
                    name: ("Marie", "Curie"),
                    email: "marie.curie@acme.com",
                    role: "CEO",
                    scorecard: "Acme_Exec_Summary_Q1.pdf",
                    link: Some("x9y8z7w6"),
                    status: Read,
                    created_at: "2024-01-10T09:00:00Z",
                }
                .build(Some(engagement(
                    "2024-01-14T11:30:00Z",
                    130,
                    4,
                    false,
                    "2024-01-14T11:32:10Z",
                    Mobile,
                ))),
                ContactSeed {
                    id: "c_3",
                    name: ("Paul", "Martin"),
                    email: "paul.martin@acme.com",
                    role: "IT Manager",
                    scorecard: "Acme_IT_Metrics_Q1.pdf",
                    link: Some("p3q4r5s6"),
                    status: Sent,
                    created_at: "2024-01-10T09:00:00Z",
                }
                .build(None),
                ContactSeed {
                    id: "c_4",
                    name: ("Sophie", "Bernard"),
                    email: "sophie.bernard@acme.com",
                    role: "Risk Manager",
                    scorecard: "Acme_Risk_Overview_Q1.pdf",
                    link: Some("r4s5t6u7"),
                    status: Read,
                    created_at: "2024-01-10T09:00:00Z",
                }
                .build(Some(engagement(
                    "2024-01-15T09:00:00Z",
                    210,
                    4,
                    true,
                    "2024-01-15T09:03:30Z",
                    Desktop,
                ))),
            ],
        ),
        // All sent, some read.
        company(
            "comp_2",
            "Global Tech Industries",
            "Technology",
            vec![
                ContactSeed {
                    id: "c_5",
                    name: ("Sarah", "Connor"),
                    email: "s.connor@globaltech.com",
                    role: "Head of Security",
                    scorecard: "GlobalTech_Risk_Assessment.pdf",
                    link: Some("f5g6h7j8"),
                    status: Read,
                    created_at: "2024-01-08T10:00:00Z",
                }
                .build(Some(engagement(
                    "2024-01-12T09:00:00Z",
                    95,
                    4,
                    true,
                    "2024-01-12T09:01:35Z",
                    Desktop,
                ))),
                ContactSeed {
                    id: "c_6",
                    name: ("John", "Smith"),
                    email: "j.smith@globaltech.com",
                    role: "CTO",
                    scorecard: "GlobalTech_Tech_Debt.pdf",
                    link: Some("j6k7l8m9"),
                    status: Sent,
                    created_at: "2024-01-08T10:00:00Z",
                }
                .build(None),
                ContactSeed {
                    id: "c_7",
                    name: ("Emily", "Zhang"),
                    email: "e.zhang@globaltech.com",
                    role: "VP Engineering",
                    scorecard: "GlobalTech_Infra_Review.pdf",
                    link: Some("k1l2m3n4"),
                    status: Read,
                    created_at: "2024-01-09T10:00:00Z",
                }
                .build(Some(engagement(
                    "2024-01-13T16:00:00Z",
                    150,
                    4,
                    false,
                    "2024-01-13T16:02:30Z",
                    Tablet,
                ))),
            ],
        ),
        // All sent, mix of read and sent.
        company(
            "comp_3",
            "CyberShield Financial",
            "Finance",
            vec![
                ContactSeed {
                    id: "c_8",
                    name: ("Lucas", "Moreau"),
                    email: "l.moreau@cybershield.fin",
                    role: "DSI",
                    scorecard: "CyberShield_Full_Audit.pdf",
                    link: Some("csf_01"),
                    status: Read,
                    created_at: "2024-01-05T08:00:00Z",
                }
                .build(Some(engagement(
                    "2024-01-09T14:00:00Z",
                    175,
                    4,
                    true,
                    "2024-01-09T14:02:55Z",
                    Desktop,
                ))),
                ContactSeed {
                    id: "c_9",
                    name: ("Camille", "Leroy"),
                    email: "c.leroy@cybershield.fin",
                    role: "Compliance Officer",
                    scorecard: "CyberShield_Compliance.pdf",
                    link: Some("csf_02"),
                    status: Sent,
                    created_at: "2024-01-05T08:00:00Z",
                }
                .build(None),
                ContactSeed {
                    id: "c_10",
                    name: ("Antoine", "Petit"),
                    email: "a.petit@cybershield.fin",
                    role: "Risk Manager",
                    scorecard: "CyberShield_Risk_Matrix.pdf",
                    link: Some("csf_03"),
                    status: Read,
                    created_at: "2024-01-06T08:00:00Z",
                }
                .build(Some(engagement(
                    "2024-01-11T15:30:00Z",
                    140,
                    3,
                    false,
                    "2024-01-11T15:32:20Z",
                    Desktop,
                ))),
                ContactSeed {
                    id: "c_11",
                    name: ("Nadia", "Benali"),
                    email: "n.benali@cybershield.fin",
                    role: "CISO",
                    scorecard: "CyberShield_CISO_Brief.pdf",
                    link: Some("csf_04"),
                    status: Read,
                    created_at: "2024-01-06T08:00:00Z",
                }
                .build(Some(engagement(
                    "2024-01-10T08:15:00Z",
                    190,
                    4,
                    false,
                    "2024-01-10T08:18:10Z",
                    Mobile,
                ))),
                ContactSeed {
                    id: "c_12",
                    name: ("Thomas", "Roux"),
                    email: "t.roux@cybershield.fin",
                    role: "IT Manager",
                    scorecard: "CyberShield_IT_Ops.pdf",
                    link: Some("csf_05"),
                    status: Sent,
                    created_at: "2024-01-07T08:00:00Z",
                }
                .build(None),
            ],
        ),
        // Links generated, nothing sent yet.
        company(
            "comp_4",
            "MedSecure Health",
            "Healthcare",
            vec![
                ContactSeed {
                    id: "c_13",
                    name: ("Claire", "Fontaine"),
                    email: "c.fontaine@medsecure.health",
                    role: "CIO",
                    scorecard: "MedSecure_HIPAA_Review.pdf",
                    link: Some("ms_01"),
                    status: NotSent,
                    created_at: "2024-01-12T08:00:00Z",
                }
                .build(None),
                ContactSeed {
                    id: "c_14",
                    name: ("Marc", "Dubois"),
                    email: "m.dubois@medsecure.health",
                    role: "Head of Compliance",
                    scorecard: "MedSecure_Compliance_Audit.pdf",
                    link: Some("ms_02"),
                    status: NotSent,
                    created_at: "2024-01-12T08:00:00Z",
                }
                .build(None),
                ContactSeed {
                    id: "c_15",
                    name: ("Isabelle", "Garnier"),
                    email: "i.garnier@medsecure.health",
                    role: "DPO",
                    scorecard: "MedSecure_Data_Protection.pdf",
                    link: Some("ms_03"),
                    status: NotSent,
                    created_at: "2024-01-13T08:00:00Z",
                }
                .build(None),
            ],
        ),
        // No links generated yet.
        company(
            "comp_5",
            "EnergiePlus",
            "Energy",
            vec![
                ContactSeed {
                    id: "c_16",
                    name: ("Hugo", "Lambert"),
                    email: "h.lambert@energieplus.eu",
                    role: "CISO",
                    scorecard: "EnergiePlus_OT_Security.pdf",
                    link: None,
                    status: NotSent,
                    created_at: "2024-01-14T08:00:00Z",
                }
                .build(None),
                ContactSeed {
                    id: "c_17",
                    name: ("Léa", "Mercier"),
                    email: "l.mercier@energieplus.eu",
                    role: "CEO",
                    scorecard: "EnergiePlus_Exec_Brief.pdf",
                    link: None,
                    status: NotSent,
                    created_at: "2024-01-14T08:00:00Z",
                }
                .build(None),
            ],
        ),
    ]
}

/// The sample dataset.
pub fn sample_dataset() -> Dataset {
    Dataset::new(sample_companies(), "built-in sample")
}
