//! Modal forms for the admin pages.
//!
//! A form is a list of fields followed by a submit button. Focus moves the
//! same way it does on the login form.

use cmsadmin_core::models::{
    BackupKind, DomainKind, NewBackup, NewDomain, NewUser, NewWebsite, UserRole, WebsiteCatalog,
    TEMPLATES,
};

use crate::app::is_valid_input_char;

const MAX_NAME_LENGTH: usize = 50;
const MAX_EMAIL_LENGTH: usize = 50;
const MAX_HOSTNAME_LENGTH: usize = 253;
const MAX_DESCRIPTION_LENGTH: usize = 200;
const MAX_QUERY_LENGTH: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    AddUser,
    CreateWebsite,
    AddDomain,
    StartBackup,
    RunQuery,
}

impl FormKind {
    pub fn title(&self) -> &'static str {
        match self {
            FormKind::AddUser => "Add New User",
            FormKind::CreateWebsite => "Create New Website",
            FormKind::AddDomain => "Add Custom Domain",
            FormKind::StartBackup => "Create Database Backup",
            FormKind::RunQuery => "SQL Query Console",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self {
            FormKind::AddUser => "Add User",
            FormKind::CreateWebsite => "Create Website",
            FormKind::AddDomain => "Add Domain",
            FormKind::StartBackup => "Start Backup",
            FormKind::RunQuery => "Execute",
        }
    }
}

#[derive(Debug, Clone)]
pub enum FieldValue {
    Text { value: String, max_len: usize },
    /// `(value, label)` pairs; the value is what the request is built from.
    Choice { options: Vec<(String, String)>, selected: usize },
    Flag(bool),
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub value: FieldValue,
}

impl FormField {
    fn text(label: &'static str, max_len: usize) -> Self {
        Self {
            label,
            value: FieldValue::Text {
                value: String::new(),
                max_len,
            },
        }
    }

    fn choice(label: &'static str, options: Vec<(String, String)>) -> Self {
        Self {
            label,
            value: FieldValue::Choice { options, selected: 0 },
        }
    }

    fn flag(label: &'static str, on: bool) -> Self {
        Self {
            label,
            value: FieldValue::Flag(on),
        }
    }

    /// Text shown in the field box.
    pub fn display(&self) -> String {
        match &self.value {
            FieldValue::Text { value, .. } => value.clone(),
            FieldValue::Choice { options, selected } => options
                .get(*selected)
                .map(|(_, label)| format!("◀ {} ▶", label))
                .unwrap_or_else(|| "(none available)".to_string()),
            FieldValue::Flag(on) => (if *on { "[x]" } else { "[ ]" }).to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Form {
    pub kind: FormKind,
    pub fields: Vec<FormField>,
    /// Index into `fields`; `fields.len()` is the submit button.
    pub focus: usize,
    pub error: Option<String>,
}

fn options<I, K, L>(items: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (K, L)>,
    K: ToString,
    L: ToString,
{
    items
        .into_iter()
        .map(|(k, l)| (k.to_string(), l.to_string()))
        .collect()
}

impl Form {
    fn new(kind: FormKind, fields: Vec<FormField>) -> Self {
        Self {
            kind,
            fields,
            focus: 0,
            error: None,
        }
    }

    pub fn add_user() -> Self {
        Self::new(
            FormKind::AddUser,
            vec![
                FormField::text("Full Name", MAX_NAME_LENGTH),
                FormField::text("Email Address", MAX_EMAIL_LENGTH),
                FormField::choice(
                    "Role",
                    options([UserRole::Owner, UserRole::Admin].map(|r| (r.label(), r.label()))),
                ),
                FormField::flag("Send invitation", true),
            ],
        )
    }

    pub fn create_website() -> Self {
        Self::new(
            FormKind::CreateWebsite,
            vec![
                FormField::text("Website Name", MAX_NAME_LENGTH),
                FormField::text("Subdomain", 63),
                FormField::choice("Template", options(TEMPLATES.iter().map(|t| (t.id, t.name)))),
                FormField::text("Description", MAX_DESCRIPTION_LENGTH),
                FormField::text("Owner Name", MAX_NAME_LENGTH),
                FormField::text("Owner Email", MAX_EMAIL_LENGTH),
                FormField::flag("Send invitation", false),
            ],
        )
    }

    pub fn add_domain(websites: &WebsiteCatalog) -> Self {
        Self::new(
            FormKind::AddDomain,
            vec![
                FormField::text("Domain Name", MAX_HOSTNAME_LENGTH),
                FormField::choice(
                    "Website",
                    options(websites.all().iter().map(|w| (w.id, w.name.as_str()))),
                ),
                FormField::choice(
                    "Type",
                    options([DomainKind::Custom, DomainKind::Subdomain].map(|k| (k.label(), k.label()))),
                ),
            ],
        )
    }

    pub fn start_backup() -> Self {
        let kinds = [BackupKind::Full, BackupKind::Incremental, BackupKind::Schema];
        Self::new(
            FormKind::StartBackup,
            vec![
                FormField::text("Backup Name", MAX_NAME_LENGTH),
                FormField::choice("Type", options(kinds.map(|k| (k.label(), k.label())))),
            ],
        )
    }

    pub fn run_query() -> Self {
        Self::new(FormKind::RunQuery, vec![FormField::text("SQL", MAX_QUERY_LENGTH)])
    }

    // ------------------------------------------------------------------------
    // Focus and editing
    // ------------------------------------------------------------------------

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % (self.fields.len() + 1);
    }

    pub fn focus_prev(&mut self) {
        let slots = self.fields.len() + 1;
        self.focus = (self.focus + slots - 1) % slots;
    }

    pub fn on_submit_button(&self) -> bool {
        self.focus >= self.fields.len()
    }

    pub fn insert_char(&mut self, c: char) {
        let Some(field) = self.fields.get_mut(self.focus) else {
            return;
        };
        match &mut field.value {
            FieldValue::Text { value, max_len } => {
                if value.chars().count() < *max_len && is_valid_input_char(c) {
                    value.push(c);
                }
            }
            FieldValue::Flag(on) if c == ' ' => *on = !*on,
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        if let Some(FormField {
            value: FieldValue::Text { value, .. },
            ..
        }) = self.fields.get_mut(self.focus)
        {
            value.pop();
        }
    }

    /// Step a choice field, or flip a flag.
    pub fn cycle(&mut self, forward: bool) {
        let Some(field) = self.fields.get_mut(self.focus) else {
            return;
        };
        match &mut field.value {
            FieldValue::Choice { options, selected } if !options.is_empty() => {
                let len = options.len();
                *selected = if forward {
                    (*selected + 1) % len
                } else {
                    (*selected + len - 1) % len
                };
            }
            FieldValue::Flag(on) => *on = !*on,
            _ => {}
        }
    }

    // ------------------------------------------------------------------------
    // Reading values
    // ------------------------------------------------------------------------

    fn field(&self, label: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.label == label).map(|f| &f.value)
    }

    fn text(&self, label: &str) -> String {
        match self.field(label) {
            Some(FieldValue::Text { value, .. }) => value.clone(),
            _ => String::new(),
        }
    }

    fn choice(&self, label: &str) -> Option<&str> {
        match self.field(label) {
            Some(FieldValue::Choice { options, selected }) => {
                options.get(*selected).map(|(value, _)| value.as_str())
            }
            _ => None,
        }
    }

    fn flag(&self, label: &str) -> bool {
        matches!(self.field(label), Some(FieldValue::Flag(true)))
    }

    pub fn new_user(&self) -> NewUser {
        NewUser {
            name: self.text("Full Name"),
            email: self.text("Email Address"),
            role: match self.choice("Role") {
                Some("ADMIN") => UserRole::Admin,
                _ => UserRole::Owner,
            },
            send_invitation: self.flag("Send invitation"),
        }
    }

    pub fn new_website(&self) -> NewWebsite {
        NewWebsite {
            name: self.text("Website Name"),
            subdomain: self.text("Subdomain"),
            description: self.text("Description"),
            template: self.choice("Template").unwrap_or_default().to_string(),
            owner_name: self.text("Owner Name"),
            owner_email: self.text("Owner Email"),
            send_invitation: self.flag("Send invitation"),
        }
    }

    pub fn new_domain(&self) -> NewDomain {
        NewDomain {
            domain: self.text("Domain Name"),
            website_id: self.choice("Website").and_then(|id| id.parse().ok()),
            kind: match self.choice("Type") {
                Some("SUBDOMAIN") => DomainKind::Subdomain,
                _ => DomainKind::Custom,
            },
        }
    }

    pub fn new_backup(&self) -> NewBackup {
        NewBackup {
            name: self.text("Backup Name"),
            kind: match self.choice("Type") {
                Some("INCREMENTAL") => BackupKind::Incremental,
                Some("SCHEMA") => BackupKind::Schema,
                _ => BackupKind::Full,
            },
        }
    }

    pub fn query(&self) -> String {
        self.text("SQL")
    }
}
