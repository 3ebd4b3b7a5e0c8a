use serde::{Deserialize, Serialize};

use super::{Relationship, Resource};

/// A recurring donation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlcSubscription {
    pub amount: Option<f64>,
    pub installments: Option<i64>,
    pub open_ended_status: Option<String>,
    pub date_established: Option<String>,
    pub last_payment_date: Option<String>,
    pub next_payment_date: Option<String>,
    pub cancel_date: Option<String>,
}

impl Resource for PlcSubscription {
    const JSONAPI_TYPE: &'static str = "plc_subscriptions";

    fn relationships() -> &'static [Relationship] {
        const RELATIONSHIPS: &[Relationship] = &[
            Relationship::belongs_to("plcUser"),
            Relationship::belongs_to("plcCampaign"),
        ];
        RELATIONSHIPS
    }
}

impl PlcSubscription {
    pub fn is_cancelled(&self) -> bool {
        self.cancel_date.as_deref().is_some_and(|d| !d.is_empty())
    }
}
