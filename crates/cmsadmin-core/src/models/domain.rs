//! Custom domain mapping.
//!
//! Verification is simulated: a refresh flips a coin.

use chrono::{NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{seed_date, WebsiteCatalog, WorkspaceError};
use crate::utils::contains_ignore_case;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DomainStatus {
    Verified,
    Pending,
    Failed,
    Expired,
}

impl DomainStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DomainStatus::Verified => "VERIFIED",
            DomainStatus::Pending => "PENDING",
            DomainStatus::Failed => "FAILED",
            DomainStatus::Expired => "EXPIRED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DomainKind {
    Custom,
    Subdomain,
}

impl DomainKind {
    pub fn label(&self) -> &'static str {
        match self {
            DomainKind::Custom => "CUSTOM",
            DomainKind::Subdomain => "SUBDOMAIN",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            DomainKind::Custom => DomainKind::Subdomain,
            DomainKind::Subdomain => DomainKind::Custom,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SslStatus {
    Active,
    Pending,
    Failed,
}

impl SslStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SslStatus::Active => "ACTIVE",
            SslStatus::Pending => "PENDING",
            SslStatus::Failed => "FAILED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    pub record_type: String,
    pub name: String,
    pub value: String,
    pub status: DomainStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Domain {
    pub id: u64,
    pub domain: String,
    pub website_id: u64,
    pub website_name: String,
    pub status: DomainStatus,
    pub kind: DomainKind,
    pub ssl_status: SslStatus,
    pub created: NaiveDate,
    pub last_checked: NaiveDate,
    pub dns_records: Vec<DnsRecord>,
}

#[derive(Debug, Clone)]
pub struct NewDomain {
    pub domain: String,
    pub website_id: Option<u64>,
    pub kind: DomainKind,
}

impl Default for NewDomain {
    fn default() -> Self {
        Self {
            domain: String::new(),
            website_id: None,
            kind: DomainKind::Custom,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DomainStats {
    pub total: usize,
    pub verified: usize,
    pub pending: usize,
    pub ssl_active: usize,
}

#[derive(Debug, Clone)]
pub struct DomainRegistry {
    domains: Vec<Domain>,
    next_id: u64,
}

impl DomainRegistry {
    pub fn sample() -> Self {
        let record = |record_type: &str, name: &str, value: &str, status| DnsRecord {
            record_type: record_type.to_string(),
            name: name.to_string(),
            value: value.to_string(),
            status,
        };

        let domains = vec![
            Domain {
                id: 1,
                domain: "johnsmith.com".to_string(),
                website_id: 1,
                website_name: "My Personal Blog".to_string(),
                status: DomainStatus::Verified,
                kind: DomainKind::Custom,
                ssl_status: SslStatus::Active,
                created: seed_date((2024, 1, 15)),
                last_checked: seed_date((2024, 1, 20)),
                dns_records: vec![
                    record("CNAME", "www", "johnblog.cms.com", DomainStatus::Verified),
                    record("A", "@", "192.168.1.100", DomainStatus::Verified),
                ],
            },
            Domain {
                id: 2,
                domain: "mybusiness.org".to_string(),
                website_id: 2,
                website_name: "Tech Startup".to_string(),
                status: DomainStatus::Pending,
                kind: DomainKind::Custom,
                ssl_status: SslStatus::Pending,
                created: seed_date((2024, 1, 18)),
                last_checked: seed_date((2024, 1, 20)),
                dns_records: vec![record("CNAME", "www", "techstartup.cms.com", DomainStatus::Pending)],
            },
            Domain {
                id: 3,
                domain: "mystore.cms.com".to_string(),
                website_id: 3,
                website_name: "Online Store".to_string(),
                status: DomainStatus::Verified,
                kind: DomainKind::Subdomain,
                ssl_status: SslStatus::Active,
                created: seed_date((2024, 1, 18)),
                last_checked: seed_date((2024, 1, 20)),
                dns_records: Vec::new(),
            },
        ];

        Self { domains, next_id: 4 }
    }

    pub fn all(&self) -> &[Domain] {
        &self.domains
    }

    pub fn get(&self, id: u64) -> Option<&Domain> {
        self.domains.iter().find(|d| d.id == id)
    }

    pub fn search(&self, term: &str) -> Vec<&Domain> {
        self.domains
            .iter()
            .filter(|d| contains_ignore_case(&d.domain, term) || contains_ignore_case(&d.website_name, term))
            .collect()
    }

    /// Map a domain to a website. It starts pending, with a `www` CNAME
    /// record to configure when it is a custom domain.
    pub fn add(&mut self, request: NewDomain, websites: &WebsiteCatalog) -> Result<&Domain, WorkspaceError> {
        let hostname = request.domain.trim().to_lowercase();
        if hostname.is_empty() {
            return Err(WorkspaceError::Required("Domain"));
        }
        if !is_valid_hostname(&hostname) {
            return Err(WorkspaceError::InvalidHostname(hostname));
        }
        if self.domains.iter().any(|d| d.domain == hostname) {
            return Err(WorkspaceError::Duplicate(hostname));
        }

        let website_id = request.website_id.ok_or(WorkspaceError::Required("Website"))?;
        let website = websites
            .get(website_id)
            .ok_or(WorkspaceError::NotFound { kind: "website", id: website_id })?;

        let dns_records = match request.kind {
            DomainKind::Custom => vec![DnsRecord {
                record_type: "CNAME".to_string(),
                name: "www".to_string(),
                value: website.platform_host(),
                status: DomainStatus::Pending,
            }],
            DomainKind::Subdomain => Vec::new(),
        };

        let today = Utc::now().date_naive();
        let id = self.next_id;
        self.next_id += 1;
        self.domains.push(Domain {
            id,
            domain: hostname,
            website_id,
            website_name: website.name.clone(),
            status: DomainStatus::Pending,
            kind: request.kind,
            ssl_status: SslStatus::Pending,
            created: today,
            last_checked: today,
            dns_records,
        });

        self.domains
            .last()
            .ok_or(WorkspaceError::NotFound { kind: "domain", id })
    }

    /// Re-run the (simulated) verification check.
    pub fn refresh<R: Rng + ?Sized>(&mut self, id: u64, rng: &mut R) -> Result<DomainStatus, WorkspaceError> {
        let domain = self
            .domains
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(WorkspaceError::NotFound { kind: "domain", id })?;

        domain.last_checked = Utc::now().date_naive();
        domain.status = if rng.gen_bool(0.5) {
            DomainStatus::Verified
        } else {
            DomainStatus::Pending
        };
        Ok(domain.status)
    }

    pub fn remove(&mut self, id: u64) -> Result<Domain, WorkspaceError> {
        let index = self
            .domains
            .iter()
            .position(|d| d.id == id)
            .ok_or(WorkspaceError::NotFound { kind: "domain", id })?;
        Ok(self.domains.remove(index))
    }

    pub fn stats(&self) -> DomainStats {
        let count = |f: fn(&Domain) -> bool| self.domains.iter().filter(|d| f(d)).count();
        DomainStats {
            total: self.domains.len(),
            verified: count(|d| d.status == DomainStatus::Verified),
            pending: count(|d| d.status == DomainStatus::Pending),
            ssl_active: count(|d| d.ssl_status == SslStatus::Active),
        }
    }
}

fn is_valid_hostname(s: &str) -> bool {
    let labels: Vec<&str> = s.split('.').collect();
    s.len() <= 253
        && labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}
