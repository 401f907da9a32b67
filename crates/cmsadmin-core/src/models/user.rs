//! Platform user accounts.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{seed_date, WorkspaceError};
use crate::utils::contains_ignore_case;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Admin,
    Owner,
}

impl UserRole {
    pub fn label(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Owner => "OWNER",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            UserRole::Admin => UserRole::Owner,
            UserRole::Owner => UserRole::Admin,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserStatus {
    Active,
    Suspended,
}

impl UserStatus {
    pub fn label(&self) -> &'static str {
        match self {
            UserStatus::Active => "ACTIVE",
            UserStatus::Suspended => "SUSPENDED",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub websites: u32,
    pub last_login: String,
    pub created_at: NaiveDate,
}

/// Input for [`UserDirectory::add`].
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub send_invitation: bool,
}

impl Default for NewUser {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            role: UserRole::Owner,
            send_invitation: true,
        }
    }
}

/// Notice that an invitation would have been emailed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invitation {
    pub email: String,
}

impl Invitation {
    pub fn message(&self) -> String {
        format!(
            "Invitation email sent to {}! They will receive setup instructions.",
            self.email
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserStats {
    pub total: usize,
    pub active: usize,
    pub admins: usize,
}

#[derive(Debug, Clone)]
pub struct UserDirectory {
    users: Vec<User>,
    next_id: u64,
}

impl UserDirectory {
    /// Directory seeded with the sample accounts.
    pub fn sample() -> Self {
        let user = |id, email: &str, name: &str, role, status, websites, last_login: &str, created: (i32, u32, u32)| User {
            id,
            email: email.to_string(),
            name: name.to_string(),
            role,
            status,
            websites,
            last_login: last_login.to_string(),
            created_at: seed_date(created),
        };

        let users = vec![
            user(1, "admin@cms.com", "Admin User", UserRole::Admin, UserStatus::Active, 0, "2 minutes ago", (2024, 1, 1)),
            user(2, "john.doe@example.com", "John Doe", UserRole::Owner, UserStatus::Active, 3, "1 hour ago", (2024, 1, 15)),
            user(3, "jane.smith@example.com", "Jane Smith", UserRole::Owner, UserStatus::Active, 1, "1 day ago", (2024, 2, 1)),
            user(4, "mike.johnson@example.com", "Mike Johnson", UserRole::Owner, UserStatus::Suspended, 2, "1 week ago", (2024, 1, 20)),
        ];

        Self { users, next_id: 5 }
    }

    pub fn all(&self) -> &[User] {
        &self.users
    }

    pub fn get(&self, id: u64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Users whose name or email contains `term`, ignoring case.
    pub fn search(&self, term: &str) -> Vec<&User> {
        self.users
            .iter()
            .filter(|u| contains_ignore_case(&u.name, term) || contains_ignore_case(&u.email, term))
            .collect()
    }

    pub fn add(&mut self, new_user: NewUser) -> Result<(&User, Option<Invitation>), WorkspaceError> {
        let name = new_user.name.trim();
        let email = new_user.email.trim();

        if name.is_empty() {
            return Err(WorkspaceError::Required("Name"));
        }
        if email.is_empty() {
            return Err(WorkspaceError::Required("Email"));
        }
        if !is_plausible_email(email) {
            return Err(WorkspaceError::InvalidEmail(email.to_string()));
        }
        if self.users.iter().any(|u| u.email.eq_ignore_ascii_case(email)) {
            return Err(WorkspaceError::Duplicate(email.to_string()));
        }

        let id = self.next_id;
        self.next_id += 1;
        self.users.push(User {
            id,
            email: email.to_string(),
            name: name.to_string(),
            role: new_user.role,
            status: UserStatus::Active,
            websites: 0,
            last_login: "Never".to_string(),
            created_at: Utc::now().date_naive(),
        });

        let invitation = new_user.send_invitation.then(|| Invitation {
            email: email.to_string(),
        });

        let user = self.users.last().ok_or(WorkspaceError::NotFound { kind: "user", id })?;
        Ok((user, invitation))
    }

    pub fn remove(&mut self, id: u64) -> Result<User, WorkspaceError> {
        let index = self
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or(WorkspaceError::NotFound { kind: "user", id })?;
        Ok(self.users.remove(index))
    }

    /// Flip between active and suspended. Returns the new status.
    pub fn toggle_status(&mut self, id: u64) -> Result<UserStatus, WorkspaceError> {
        let user = self
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(WorkspaceError::NotFound { kind: "user", id })?;
        user.status = match user.status {
            UserStatus::Active => UserStatus::Suspended,
            UserStatus::Suspended => UserStatus::Active,
        };
        Ok(user.status)
    }

    pub fn stats(&self) -> UserStats {
        UserStats {
            total: self.users.len(),
            active: self.users.iter().filter(|u| u.status == UserStatus::Active).count(),
            admins: self.users.iter().filter(|u| u.role == UserRole::Admin).count(),
        }
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}
