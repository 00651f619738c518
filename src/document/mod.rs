//! # Receipt Document Model
//!
//! One type that is both the Rust API and the JSON input format.
//! `ReceiptDocument` can be built in Rust or deserialized from the loosely
//! typed map the point-of-sale app sends.
//!
//! ```
//! use chekprint::document::*;
//!
//! // Rust construction
//! let doc = ReceiptDocument {
//!     company_name: Some("Baraka".into()),
//!     products: vec![LineItem::new("Non", 2.0, 3000.0)],
//!     final_amount: 6000.0,
//!     ..Default::default()
//! };
//! assert_eq!(doc.company_name(), "Baraka");
//!
//! // JSON deserialization
//! let doc = ReceiptDocument::from_json(
//!     r#"{"companyName": "Baraka", "products": [{"name": "Non", "quantity": 2, "price": "3000"}]}"#,
//! ).unwrap();
//! assert_eq!(doc.products[0].line_total(), 6000.0);
//! ```
//!
//! Missing or `null` fields take their documented defaults, numbers may be
//! given as strings, and unknown keys are ignored.

pub mod types;

pub use types::*;

use types::{deserialize_amount, deserialize_int, deserialize_list, deserialize_text};

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// Printed when no company name is supplied.
pub const DEFAULT_COMPANY_NAME: &str = "Do'kon";

/// Printed when no transaction id is supplied.
pub const DEFAULT_TRANSACTION_ID: &str = "-";

/// Document status code when none is supplied.
pub const DEFAULT_STATUS: i64 = 1;

/// Direction of the transaction. A named supplier makes it a purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptKind {
    /// Goods sold to a customer: seller and receiver rows.
    Sale,
    /// Goods received from a supplier: supplier and receiver rows.
    Purchase,
}

/// A receipt to lay out.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptDocument {
    #[serde(default, deserialize_with = "deserialize_text", alias = "storeName")]
    pub company_name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_text", alias = "chequeId")]
    pub transaction_id: Option<String>,

    /// Document status code; [`DEFAULT_STATUS`] by default.
    #[serde(default, deserialize_with = "deserialize_int")]
    pub status: Option<i64>,

    /// Human-readable status shown on the "Holati" row.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub status_name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_text")]
    pub seller_name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_text")]
    pub receiver_name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_text")]
    pub supplier_name: Option<String>,

    /// Sum before discounts.
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub total_amount: f64,

    /// Amount due.
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub final_amount: f64,

    /// Local wall-clock time of the transaction.
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<NaiveDateTime>,

    #[serde(default, deserialize_with = "deserialize_list", alias = "items")]
    pub products: Vec<LineItem>,

    #[serde(default, deserialize_with = "deserialize_list", alias = "payments")]
    pub payment_methods: Vec<PaymentMethod>,

    /// Element override; when non-empty it replaces the business template.
    #[serde(
        default,
        deserialize_with = "deserialize_elements",
        alias = "elements",
        alias = "template"
    )]
    pub template_elements: Vec<TemplateElement>,

    #[serde(default, deserialize_with = "deserialize_settings", alias = "templateSettings")]
    pub settings: TemplateSettings,
}

impl Default for ReceiptDocument {
    fn default() -> Self {
        Self {
            company_name: None,
            transaction_id: None,
            status: None,
            status_name: None,
            seller_name: None,
            receiver_name: None,
            supplier_name: None,
            total_amount: 0.0,
            final_amount: 0.0,
            created_at: None,
            products: Vec::new(),
            payment_methods: Vec::new(),
            template_elements: Vec::new(),
            settings: TemplateSettings::default(),
        }
    }
}

impl ReceiptDocument {
    /// Parse a document from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse a document from an already decoded JSON value.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Company name, [`DEFAULT_COMPANY_NAME`] when absent.
    pub fn company_name(&self) -> &str {
        self.company_name.as_deref().unwrap_or(DEFAULT_COMPANY_NAME)
    }

    /// Transaction id, [`DEFAULT_TRANSACTION_ID`] when absent.
    pub fn transaction_id(&self) -> &str {
        self.transaction_id.as_deref().unwrap_or(DEFAULT_TRANSACTION_ID)
    }

    /// Status code, [`DEFAULT_STATUS`] when absent.
    pub fn status_code(&self) -> i64 {
        self.status.unwrap_or(DEFAULT_STATUS)
    }

    pub fn kind(&self) -> ReceiptKind {
        match self.supplier_name.as_deref() {
            Some(name) if !name.trim().is_empty() => ReceiptKind::Purchase,
            _ => ReceiptKind::Sale,
        }
    }

    /// Sum of all payment amounts.
    pub fn paid_amount(&self) -> f64 {
        self.payment_methods.iter().map(|p| p.amount).sum()
    }

    /// Whether the default business template is replaced by an override.
    pub fn has_override(&self) -> bool {
        !self.template_elements.is_empty()
    }
}

// ============================================================================
// FIELD DESERIALIZERS
// ============================================================================

/// Formats accepted for textual timestamps, tried in order after RFC 3339.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d.%m.%Y %H:%M",
];

/// Parse a textual timestamp. Offsets are dropped; the wall-clock time is kept.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
}

/// Timestamp: RFC 3339 / `YYYY-MM-DD HH:MM:SS` text, or epoch milliseconds.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let parsed = match &value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => parse_timestamp(s),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.naive_utc()),
        Some(_) => None,
    };
    if parsed.is_none() {
        warn!("unreadable createdAt {:?}, date row omitted", value);
    }
    Ok(parsed)
}

fn deserialize_settings<'de, D>(deserializer: D) -> Result<TemplateSettings, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TemplateSettings>::deserialize(deserializer)?.unwrap_or_default())
}

/// Shorthand keys: (shorthand_key, type_name, target_field).
///
/// When an element object has no `"type"` field, these shorthands are
/// checked in order. The shorthand key's value is moved to `target_field`,
/// and `"type"` is set to `type_name`.
///
/// Example: `{"text": "Aksiya!", "bold": true}` becomes
/// `{"type": "text", "content": "Aksiya!", "bold": true}`
const SHORTHANDS: &[(&str, &str, &str)] = &[
    ("text", "text", "content"),
    ("qr", "qr", "payload"),
    ("barcode", "barcode", "payload"),
    ("feed", "feed", "lines"),
    ("rule", "rule", "width"),
];

/// Rewrite a shorthand object to canonical `{"type": ...}` form.
/// Only called when the map has no `"type"` key.
fn normalize_shorthand(map: &mut serde_json::Map<String, Value>) -> bool {
    for &(key, type_name, field) in SHORTHANDS {
        if let Some(val) = map.remove(key) {
            map.insert("type".into(), Value::String(type_name.into()));
            if !val.is_boolean() {
                map.insert(field.into(), val);
            }
            return true;
        }
    }
    false
}

/// Deserialize template elements with shorthand support.
///
/// Elements that are not objects, have neither `"type"` nor a shorthand
/// key, or fail to parse are skipped with a warning. The rest of the
/// override still renders.
fn deserialize_elements<'de, D>(deserializer: D) -> Result<Vec<TemplateElement>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values
        .into_iter()
        .enumerate()
        .filter_map(|(i, v)| {
            let mut obj = match v {
                Value::Object(map) => map,
                other => {
                    warn!("templateElements[{}]: expected object, got {}", i, other);
                    return None;
                }
            };

            if !obj.contains_key("type") && !normalize_shorthand(&mut obj) {
                warn!("templateElements[{}]: no 'type' field, skipped", i);
                return None;
            }

            match serde_json::from_value(Value::Object(obj)) {
                Ok(element) => Some(element),
                Err(e) => {
                    warn!("templateElements[{}]: {}, skipped", i, e);
                    None
                }
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_empty_object_defaults() {
        let doc = ReceiptDocument::from_json("{}").unwrap();
        assert_eq!(doc, ReceiptDocument::default());
        assert_eq!(doc.company_name(), "Do'kon");
        assert_eq!(doc.transaction_id(), "-");
        assert_eq!(doc.kind(), ReceiptKind::Sale);
        assert!(!doc.has_override());
    }

    #[test]
    fn test_nulls_and_unknown_keys() {
        let doc = ReceiptDocument::from_json(
            r#"{
                "companyName": null,
                "transactionId": 1042,
                "totalAmount": "15000",
                "products": null,
                "paymentMethods": null,
                "settings": null,
                "somethingElse": [1, 2, 3]
            }"#,
        )
        .unwrap();
        assert_eq!(doc.company_name(), "Do'kon");
        assert_eq!(doc.transaction_id(), "1042");
        assert_eq!(doc.total_amount, 15000.0);
        assert!(doc.products.is_empty());
        assert_eq!(doc.settings, TemplateSettings::default());
    }

    #[test]
    fn test_purchase_kind() {
        let doc = ReceiptDocument::from_json(r#"{"supplierName": "Agro LLC"}"#).unwrap();
        assert_eq!(doc.kind(), ReceiptKind::Purchase);
        let doc = ReceiptDocument::from_json(r#"{"supplierName": "", "status": "2"}"#).unwrap();
        assert_eq!(doc.kind(), ReceiptKind::Sale);
        assert_eq!(doc.status_code(), 2);
    }

    #[test]
    fn test_created_at_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 7, 0)
            .unwrap();
        for json in [
            r#"{"createdAt": "2024-03-05 14:07:00"}"#,
            r#"{"createdAt": "2024-03-05T14:07:00"}"#,
            r#"{"createdAt": "2024-03-05T14:07:00+05:00"}"#,
            r#"{"createdAt": 1709647620000}"#,
        ] {
            let doc = ReceiptDocument::from_json(json).unwrap();
            assert_eq!(doc.created_at, Some(expected), "{}", json);
        }
    }

    #[test]
    fn test_created_at_unreadable() {
        let doc = ReceiptDocument::from_json(r#"{"createdAt": "yesterday"}"#).unwrap();
        assert_eq!(doc.created_at, None);
    }

    #[test]
    fn test_bad_list_entries_skipped() {
        let doc = ReceiptDocument::from_json(
            r#"{"products": [{"name": "Non", "price": 3000}, "garbage", {"name": "Suv"}]}"#,
        )
        .unwrap();
        assert_eq!(doc.products.len(), 2);
        assert_eq!(doc.products[1].name(), "Suv");
    }

    #[test]
    fn test_paid_amount() {
        let doc = ReceiptDocument {
            payment_methods: vec![
                PaymentMethod::new(PaymentKind::Cash, 10000.0),
                PaymentMethod::new(PaymentKind::Card, 5000.0),
            ],
            ..Default::default()
        };
        assert_eq!(doc.paid_amount(), 15000.0);
    }

    #[test]
    fn test_template_elements_shorthand() {
        let doc = ReceiptDocument::from_json(
            r#"{"templateElements": [
                {"text": "Aksiya!", "bold": true},
                {"rule": true},
                {"qr": "https://example.uz"},
                {"type": "confetti"},
                {"bold": true},
                42
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            doc.template_elements,
            vec![
                TemplateElement::Text(TextElement::new("Aksiya!").bold()),
                TemplateElement::Rule(RuleElement { width: None }),
                TemplateElement::Qr(CodeElement {
                    payload: Some("https://example.uz".into()),
                    position: AlignTag::Left,
                }),
                TemplateElement::Unknown,
            ]
        );
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(ReceiptDocument::from_json("{not json").is_err());
        assert!(ReceiptDocument::from_json("42").is_err());
    }
}
