use serde::{Deserialize, Serialize};

use super::{Relationship, Resource};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlcLineItem {
    pub name: Option<String>,
    pub product_code: Option<String>,
    pub quantity: Option<i64>,
    pub list_price: Option<f64>,
    pub unit_price: Option<f64>,
    pub total_price: Option<f64>,
    pub taxable_amount: Option<f64>,
    pub is_donation: Option<bool>,
    pub is_product: Option<bool>,
}

impl Resource for PlcLineItem {
    const JSONAPI_TYPE: &'static str = "plc_line_items";

    fn relationships() -> &'static [Relationship] {
        const RELATIONSHIPS: &[Relationship] = &[Relationship::belongs_to("plcTransaction")];
        RELATIONSHIPS
    }
}

impl PlcLineItem {
    /// Server total if present, otherwise unit price times quantity.
    pub fn line_total(&self) -> Option<f64> {
        self.total_price.or_else(|| {
            let quantity = self.quantity? as f64;
            Some(self.unit_price? * quantity)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total() {
        let item = PlcLineItem {
            quantity: Some(3),
            unit_price: Some(15.0),
            ..PlcLineItem::default()
        };
        assert_eq!(item.line_total(), Some(45.0));

        let priced = PlcLineItem {
            total_price: Some(40.0),
            ..item.clone()
        };
        assert_eq!(priced.line_total(), Some(40.0));

        assert_eq!(PlcLineItem::default().line_total(), None);
    }

    #[test]
    fn test_parse_line_item() {
        let json = r#"{"name":"Hand-knit scarf","quantity":2,"unitPrice":30.0,"listPrice":35.0,"isProduct":true}"#;
        let item: PlcLineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.name.as_deref(), Some("Hand-knit scarf"));
        assert_eq!(item.line_total(), Some(60.0));
    }
}
