use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Relationship, Resource};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlcCampaign {
    pub name: Option<String>,
    pub unique_name: Option<String>,
    pub is_active: Option<bool>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub originating_landing_page: Option<String>,
}

impl Resource for PlcCampaign {
    const JSONAPI_TYPE: &'static str = "plc_campaigns";

    fn relationships() -> &'static [Relationship] {
        const RELATIONSHIPS: &[Relationship] = &[
            Relationship::has_many("plcTransactions"),
            Relationship::has_many("plcSubscriptions"),
        ];
        RELATIONSHIPS
    }
}

impl PlcCampaign {
    /// Active and, where dates are known, within its date window.
    /// Dates are `YYYY-MM-DD`; unparseable dates are ignored.
    pub fn is_running_on(&self, day: NaiveDate) -> bool {
        if !self.is_active.unwrap_or(false) {
            return false;
        }
        let parse = |d: &Option<String>| {
            d.as_deref()
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        };
        let started = parse(&self.start_date).map_or(true, |start| start <= day);
        let not_ended = parse(&self.end_date).map_or(true, |end| day <= end);
        started && not_ended
    }
}
