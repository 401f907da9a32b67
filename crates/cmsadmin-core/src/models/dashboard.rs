//! Overview page content.

use crate::routes::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Positive,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatCard {
    pub title: &'static str,
    pub value: &'static str,
    pub change: &'static str,
    pub trend: Trend,
    pub description: &'static str,
}

/// Shortcut to another admin page. `target` is `None` when the page does
/// not exist yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickAction {
    pub title: &'static str,
    pub description: &'static str,
    pub target: Option<Route>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activity {
    pub user: &'static str,
    pub action: &'static str,
    pub target: &'static str,
    pub time: &'static str,
}

impl Activity {
    pub fn summary(&self) -> String {
        format!("{} {} {}", self.user, self.action, self.target)
    }
}

#[derive(Debug, Clone)]
pub struct DashboardSummary {
    pub stats: Vec<StatCard>,
    pub quick_actions: Vec<QuickAction>,
    pub recent_activity: Vec<Activity>,
}

impl DashboardSummary {
    pub fn sample() -> Self {
        let stats = vec![
            StatCard {
                title: "Total Users",
                value: "1,234",
                change: "+12%",
                trend: Trend::Positive,
                description: "Active users this month",
            },
            StatCard {
                title: "Websites",
                value: "56",
                change: "+8%",
                trend: Trend::Positive,
                description: "Active websites hosted",
            },
            StatCard {
                title: "Custom Domains",
                value: "23",
                change: "+15%",
                trend: Trend::Positive,
                description: "Domains mapped successfully",
            },
            StatCard {
                title: "Performance",
                value: "99.9%",
                change: "Stable",
                trend: Trend::Neutral,
                description: "Platform uptime",
            },
        ];

        let quick_actions = vec![
            QuickAction {
                title: "Add New User",
                description: "Create a new user account",
                target: Some(Route::Users),
            },
            QuickAction {
                title: "Create Website",
                description: "Set up a new website",
                target: Some(Route::CreateWebsite),
            },
            QuickAction {
                title: "Domain Mapping",
                description: "Configure custom domains",
                target: Some(Route::Domains),
            },
            QuickAction {
                title: "System Settings",
                description: "Manage platform settings",
                target: None,
            },
        ];

        let recent_activity = vec![
            Activity {
                user: "John Doe",
                action: "created a new website",
                target: "myblog.com",
                time: "2 minutes ago",
            },
            Activity {
                user: "Jane Smith",
                action: "mapped custom domain",
                target: "customsite.com",
                time: "15 minutes ago",
            },
            Activity {
                user: "Admin",
                action: "added new user",
                target: "newuser@example.com",
                time: "1 hour ago",
            },
            Activity {
                user: "Mike Johnson",
                action: "updated website settings",
                target: "portfolio.site",
                time: "2 hours ago",
            },
        ];

        Self {
            stats,
            quick_actions,
            recent_activity,
        }
    }
}
