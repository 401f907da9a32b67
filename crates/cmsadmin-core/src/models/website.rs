//! Hosted websites and site templates.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{seed_date, WorkspaceError};
use crate::utils::contains_ignore_case;

/// Starting point for a new website.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub features: [&'static str; 3],
}

pub static TEMPLATES: [Template; 6] = [
    Template {
        id: "blog",
        name: "Blog & Portfolio",
        description: "Perfect for personal blogs and portfolios",
        features: ["Responsive Design", "SEO Optimized", "Comment System"],
    },
    Template {
        id: "business",
        name: "Business Website",
        description: "Professional business presence",
        features: ["Contact Forms", "Service Pages", "Team Showcase"],
    },
    Template {
        id: "ecommerce",
        name: "E-commerce Store",
        description: "Online store with payment integration",
        features: ["Product Catalog", "Payment Gateway", "Inventory Management"],
    },
    Template {
        id: "portfolio",
        name: "Creative Portfolio",
        description: "Showcase your creative work",
        features: ["Gallery Views", "Project Showcase", "Client Testimonials"],
    },
    Template {
        id: "event",
        name: "Event Website",
        description: "Event management and promotion",
        features: ["Event Calendar", "Registration Forms", "Speaker Profiles"],
    },
    Template {
        id: "custom",
        name: "Custom Build",
        description: "Start from scratch with custom code",
        features: ["Full Customization", "Custom Components", "Advanced Features"],
    },
];

impl Template {
    pub fn find(id: &str) -> Option<&'static Template> {
        TEMPLATES.iter().find(|t| t.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WebsiteStatus {
    Active,
    Suspended,
    Building,
}

impl WebsiteStatus {
    pub fn label(&self) -> &'static str {
        match self {
            WebsiteStatus::Active => "ACTIVE",
            WebsiteStatus::Suspended => "SUSPENDED",
            WebsiteStatus::Building => "BUILDING",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Website {
    pub id: u64,
    pub name: String,
    pub subdomain: String,
    pub domain: Option<String>,
    pub template: String,
    pub status: WebsiteStatus,
    pub owner: String,
    pub created: NaiveDate,
    pub last_updated: NaiveDate,
    pub visitors: u64,
}

impl Website {
    /// Platform hostname, e.g. `johnblog.cms.com`.
    pub fn platform_host(&self) -> String {
        format!("{}.cms.com", self.subdomain)
    }
}

/// Input for [`WebsiteCatalog::create`].
#[derive(Debug, Clone, Default)]
pub struct NewWebsite {
    pub name: String,
    pub subdomain: String,
    pub description: String,
    pub template: String,
    pub owner_name: String,
    pub owner_email: String,
    pub send_invitation: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WebsiteStats {
    pub total: usize,
    pub active: usize,
    pub building: usize,
    pub visitors: u64,
}

#[derive(Debug, Clone)]
pub struct WebsiteCatalog {
    websites: Vec<Website>,
    next_id: u64,
}

impl WebsiteCatalog {
    pub fn sample() -> Self {
        let site = |id, name: &str, subdomain: &str, domain: Option<&str>, template: &str, status, owner: &str, created, updated, visitors| Website {
            id,
            name: name.to_string(),
            subdomain: subdomain.to_string(),
            domain: domain.map(str::to_string),
            template: template.to_string(),
            status,
            owner: owner.to_string(),
            created: seed_date(created),
            last_updated: seed_date(updated),
            visitors,
        };

        let websites = vec![
            site(1, "My Personal Blog", "johnblog", Some("johnsmith.com"), "blog", WebsiteStatus::Active, "John Doe", (2024, 1, 15), (2024, 1, 20), 1250),
            site(2, "Tech Startup", "techstartup", None, "business", WebsiteStatus::Active, "Jane Smith", (2024, 1, 10), (2024, 1, 19), 3400),
            site(3, "Online Store", "mystore", None, "ecommerce", WebsiteStatus::Building, "Mike Johnson", (2024, 1, 18), (2024, 1, 20), 0),
            site(4, "Portfolio Site", "portfolio", None, "portfolio", WebsiteStatus::Active, "Jane Smith", (2024, 1, 22), (2024, 1, 22), 410),
        ];

        Self { websites, next_id: 5 }
    }

    pub fn all(&self) -> &[Website] {
        &self.websites
    }

    pub fn get(&self, id: u64) -> Option<&Website> {
        self.websites.iter().find(|w| w.id == id)
    }

    pub fn search(&self, term: &str) -> Vec<&Website> {
        self.websites
            .iter()
            .filter(|w| contains_ignore_case(&w.name, term) || contains_ignore_case(&w.subdomain, term))
            .collect()
    }

    /// Create a website in the building state.
    ///
    /// Returns the new site and the confirmation text shown to the operator.
    pub fn create(&mut self, request: NewWebsite) -> Result<(&Website, String), WorkspaceError> {
        let name = request.name.trim();
        let subdomain = request.subdomain.trim();

        if name.is_empty() {
            return Err(WorkspaceError::Required("Website name"));
        }
        if request.template.is_empty() {
            return Err(WorkspaceError::Required("Template"));
        }
        if Template::find(&request.template).is_none() {
            return Err(WorkspaceError::UnknownTemplate(request.template.clone()));
        }
        if subdomain.is_empty() {
            return Err(WorkspaceError::Required("Subdomain"));
        }
        if !is_valid_subdomain(subdomain) {
            return Err(WorkspaceError::InvalidSubdomain(subdomain.to_string()));
        }
        if self.websites.iter().any(|w| w.subdomain == subdomain) {
            return Err(WorkspaceError::Duplicate(format!("{}.cms.com", subdomain)));
        }

        let owner_name = request.owner_name.trim();
        let owner_email = request.owner_email.trim();
        let today = Utc::now().date_naive();

        let id = self.next_id;
        self.next_id += 1;
        self.websites.push(Website {
            id,
            name: name.to_string(),
            subdomain: subdomain.to_string(),
            domain: None,
            template: request.template.clone(),
            status: WebsiteStatus::Building,
            owner: if owner_name.is_empty() {
                "Current User".to_string()
            } else {
                owner_name.to_string()
            },
            created: today,
            last_updated: today,
            visitors: 0,
        });

        let message = if request.send_invitation && !owner_name.is_empty() && !owner_email.is_empty() {
            format!(
                "Website created successfully! Invitation sent to {} ({}) to manage \"{}\".",
                owner_name, owner_email, name
            )
        } else {
            "Website created successfully!".to_string()
        };

        let website = self
            .websites
            .last()
            .ok_or(WorkspaceError::NotFound { kind: "website", id })?;
        Ok((website, message))
    }

    /// Active and suspended swap; a site still building stays building.
    pub fn toggle_status(&mut self, id: u64) -> Result<WebsiteStatus, WorkspaceError> {
        let website = self
            .websites
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(WorkspaceError::NotFound { kind: "website", id })?;
        website.status = match website.status {
            WebsiteStatus::Active => WebsiteStatus::Suspended,
            WebsiteStatus::Suspended => WebsiteStatus::Active,
            WebsiteStatus::Building => WebsiteStatus::Building,
        };
        Ok(website.status)
    }

    pub fn remove(&mut self, id: u64) -> Result<Website, WorkspaceError> {
        let index = self
            .websites
            .iter()
            .position(|w| w.id == id)
            .ok_or(WorkspaceError::NotFound { kind: "website", id })?;
        Ok(self.websites.remove(index))
    }

    pub fn stats(&self) -> WebsiteStats {
        WebsiteStats {
            total: self.websites.len(),
            active: self.websites.iter().filter(|w| w.status == WebsiteStatus::Active).count(),
            building: self.websites.iter().filter(|w| w.status == WebsiteStatus::Building).count(),
            visitors: self.websites.iter().map(|w| w.visitors).sum(),
        }
    }
}

/// Lowercase letters, digits and inner hyphens, at most 63 characters.
fn is_valid_subdomain(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= 63
        && !s.starts_with('-')
        && !s.ends_with('-')
        && s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, subdomain: &str, template: &str) -> NewWebsite {
        NewWebsite {
            name: name.to_string(),
            subdomain: subdomain.to_string(),
            template: template.to_string(),
            ..NewWebsite::default()
        }
    }

    #[test]
    fn test_templates_are_unique() {
        for (i, a) in TEMPLATES.iter().enumerate() {
            for b in &TEMPLATES[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
        assert_eq!(Template::find("ecommerce").map(|t| t.name), Some("E-commerce Store"));
        assert!(Template::find("wiki").is_none());
    }

    #[test]
    fn test_create_starts_building() {
        let mut catalog = WebsiteCatalog::sample();
        let (site, message) = catalog.create(request("Recipes", "recipes", "blog")).unwrap();

        assert_eq!(site.status, WebsiteStatus::Building);
        assert_eq!(site.owner, "Current User");
        assert_eq!(site.visitors, 0);
        assert_eq!(site.platform_host(), "recipes.cms.com");
        assert_eq!(message, "Website created successfully!");
    }

    #[test]
    fn test_create_with_invitation_message() {
        let mut catalog = WebsiteCatalog::sample();
        let req = NewWebsite {
            owner_name: "Ada".to_string(),
            owner_email: "ada@example.com".to_string(),
            send_invitation: true,
            ..request("Recipes", "recipes", "blog")
        };
        let (site, message) = catalog.create(req).unwrap();
        assert_eq!(site.owner, "Ada");
        assert!(message.contains("Invitation sent to Ada (ada@example.com)"));
    }

    #[test]
    fn test_create_validation() {
        let mut catalog = WebsiteCatalog::sample();
        assert_eq!(catalog.create(request("", "x", "blog")).unwrap_err(), WorkspaceError::Required("Website name"));
        assert_eq!(catalog.create(request("X", "x", "")).unwrap_err(), WorkspaceError::Required("Template"));
        assert!(matches!(catalog.create(request("X", "x", "wiki")), Err(WorkspaceError::UnknownTemplate(_))));
        assert!(matches!(catalog.create(request("X", "My Site", "blog")), Err(WorkspaceError::InvalidSubdomain(_))));
        assert!(matches!(catalog.create(request("X", "-x", "blog")), Err(WorkspaceError::InvalidSubdomain(_))));
        assert!(matches!(catalog.create(request("X", "johnblog", "blog")), Err(WorkspaceError::Duplicate(_))));
        assert_eq!(catalog.all().len(), 4);
    }

    #[test]
    fn test_toggle_status_rules() {
        let mut catalog = WebsiteCatalog::sample();
        assert_eq!(catalog.toggle_status(1).unwrap(), WebsiteStatus::Suspended);
        assert_eq!(catalog.toggle_status(1).unwrap(), WebsiteStatus::Active);
        assert_eq!(catalog.toggle_status(3).unwrap(), WebsiteStatus::Building);
    }

    #[test]
    fn test_search_and_stats() {
        let mut catalog = WebsiteCatalog::sample();
        assert_eq!(catalog.search("store").len(), 1);
        assert_eq!(catalog.search("TECH").len(), 1);

        let stats = catalog.stats();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.active, 3);
        assert_eq!(stats.building, 1);
        assert_eq!(stats.visitors, 1250 + 3400 + 410);

        catalog.remove(2).unwrap();
        assert_eq!(catalog.stats().total, 3);
    }
}
