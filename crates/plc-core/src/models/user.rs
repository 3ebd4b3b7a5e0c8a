use serde::{Deserialize, Serialize};

use super::{Relationship, Resource};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlcUser {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
    /// Write-only; the server never returns it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub phone: Option<String>,
    pub mobile_phone: Option<String>,
    pub gender: Option<String>,
    pub marital_status: Option<String>,
    pub parental_status: Option<String>,
    pub religion: Option<String>,
    // Mailing address
    pub mailing_street: Option<String>,
    pub mailing_city: Option<String>,
    pub mailing_state: Option<String>,
    pub mailing_postal_code: Option<String>,
    pub mailing_country: Option<String>,
    // Preferences
    pub has_opted_out_of_email: Option<bool>,
    pub mail_opt_out: Option<bool>,
    // Social
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    // Server-owned
    #[serde(default, skip_serializing)]
    pub first_donation_date: Option<String>,
    #[serde(default, skip_serializing)]
    pub last_donation_date: Option<String>,
}

impl Resource for PlcUser {
    const JSONAPI_TYPE: &'static str = "plc_users";

    fn relationships() -> &'static [Relationship] {
        const RELATIONSHIPS: &[Relationship] = &[
            Relationship::has_many("plcTransactions"),
            Relationship::has_many("plcSubscriptions"),
        ];
        RELATIONSHIPS
    }
}

impl PlcUser {
    /// Display name, skipping missing parts.
    pub fn full_name(&self) -> String {
        [&self.first_name, &self.middle_name, &self.last_name]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether the donor accepts any mailing (email or post).
    pub fn accepts_mail(&self) -> bool {
        !self.has_opted_out_of_email.unwrap_or(false) || !self.mail_opt_out.unwrap_or(false)
    }
}
