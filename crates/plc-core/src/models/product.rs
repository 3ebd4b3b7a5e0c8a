use serde::{Deserialize, Serialize};

use super::Resource;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlcProduct {
    pub product_code: Option<String>,
    pub sku: Option<String>,
    pub is_active: Option<bool>,
    pub is_donation: Option<bool>,
    pub is_product: Option<bool>,
    pub is_refugee_made: Option<bool>,
}

impl Resource for PlcProduct {
    const JSONAPI_TYPE: &'static str = "plc_products";
}
