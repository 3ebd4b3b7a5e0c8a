use serde::{Deserialize, Serialize};

use super::{Relationship, Resource};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlcTransaction {
    pub amount: Option<f64>,
    pub close_date: Option<String>,
    pub stage_name: Option<String>,
    pub transaction_type: Option<String>,
    pub is_closed: Option<bool>,
    pub is_won: Option<bool>,
    pub is_refund: Option<bool>,
    pub tax_deductible_amount: Option<f64>,
    pub digital_wallet_service: Option<String>,
    pub shopify_discount_amount: Option<f64>,
    pub shopify_discount_code: Option<String>,
}

impl Resource for PlcTransaction {
    const JSONAPI_TYPE: &'static str = "plc_transactions";

    fn relationships() -> &'static [Relationship] {
        const RELATIONSHIPS: &[Relationship] = &[
            Relationship::belongs_to("plcUser"),
            Relationship::belongs_to("plcSubscription"),
            Relationship::belongs_to("plcCampaign"),
            Relationship::has_many("plcLineItems"),
        ];
        RELATIONSHIPS
    }
}

impl PlcTransaction {
    /// Closed, won and not a refund.
    pub fn is_completed_gift(&self) -> bool {
        self.is_closed.unwrap_or(false) && self.is_won.unwrap_or(false) && !self.is_refund.unwrap_or(false)
    }

    /// Amount after any Shopify discount.
    pub fn net_amount(&self) -> Option<f64> {
        self.amount
            .map(|amount| amount - self.shopify_discount_amount.unwrap_or(0.0))
    }
}
