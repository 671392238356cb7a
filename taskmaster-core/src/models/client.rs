use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub full_name: String,
    pub company_name: String,
    pub email: String,
    pub phone_number: String,
    pub status: ClientStatus,
    pub notes: String,
    pub created_date: NaiveDate,
    pub last_contacted: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ClientStatus {
    #[default]
    Active,
    Inactive,
    Lead,
}

impl ClientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Lead => "Lead",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Active" => Some(Self::Active),
            "Inactive" => Some(Self::Inactive),
            "Lead" => Some(Self::Lead),
            _ => None,
        }
    }
}

/// Search/status query for client listings. The search term matches name,
/// company, or email, case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct ClientQuery {
    pub search: Option<String>,
    pub status: Option<ClientStatus>,
}

impl ClientQuery {
    pub fn matches(&self, client: &Client) -> bool {
        if let Some(status) = self.status {
            if client.status != status {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                client.full_name.to_lowercase().contains(&term)
                    || client.company_name.to_lowercase().contains(&term)
                    || client.email.to_lowercase().contains(&term)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateClientInput {
    pub full_name: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub status: Option<ClientStatus>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub last_contacted: Option<NaiveDate>,
}

impl CreateClientInput {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.full_name.trim().is_empty() {
            return Err("full_name must not be empty".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateClientInput {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub status: Option<ClientStatus>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub last_contacted: Option<NaiveDate>,
}

impl UpdateClientInput {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.full_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err("full_name must not be empty".into());
        }
        Ok(())
    }
}
