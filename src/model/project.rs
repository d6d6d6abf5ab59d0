use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    #[serde(alias = "project_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Project {
    /// Display name, or `placeholder` when the name is missing or blank.
    pub fn display_name<'a>(&'a self, placeholder: &'a str) -> &'a str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => placeholder,
        }
    }
}
