//! Input record types for receipt documents.
//!
//! Receipt data arrives as loosely typed JSON from the point-of-sale app:
//! numbers sometimes come as strings, optional fields as `null`. Every
//! field here has a documented default, and the lenient deserializers below
//! turn anything unusable into that default instead of failing the print.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use crate::error::StructuralError;

// ============================================================================
// LENIENT FIELD DESERIALIZERS
// ============================================================================

/// Interpret a JSON value as a number: numbers as-is, numeric strings
/// parsed (spaces removed, `,` accepted as decimal point).
pub(crate) fn number_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(' ', "").replace(',', ".").parse().ok(),
        _ => None,
    }
}

/// Amount: number, numeric string, or null. Anything else is `0.0`.
pub(crate) fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_value).unwrap_or(0.0))
}

/// Optional text: strings and numbers become text, blank strings and
/// everything else become `None`.
pub(crate) fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Optional integer: integral numbers or numeric strings.
pub(crate) fn deserialize_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(number_value)
        .filter(|n| n.is_finite())
        .map(|n| n.trunc() as i64))
}

/// Optional flag: booleans, `0`/`1`, `"true"`/`"false"`.
pub(crate) fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::Number(n)) => n.as_f64().map(|n| n != 0.0),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

/// A list that may be `null`. Entries that fail to parse are skipped.
pub(crate) fn deserialize_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values
        .into_iter()
        .enumerate()
        .filter_map(|(i, v)| match serde_json::from_value(v) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("list entry {} skipped: {}", i, e);
                None
            }
        })
        .collect())
}

fn default_quantity() -> f64 {
    1.0
}

// ============================================================================
// LINE ITEMS
// ============================================================================

/// Default unit label for line items.
pub const DEFAULT_UNIT: &str = "dona";

/// Status of a single line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemStatus {
    #[default]
    Normal,
    /// Returned by the customer; printed with a suffix.
    Returned,
}

impl<'de> Deserialize<'de> for ItemStatus {
    /// `1` / `"normal"` is normal. Any other number, or `"returned"`, marks
    /// a return. Unrecognized strings and `null` count as normal.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Number(n)) if n.as_f64() != Some(1.0) => ItemStatus::Returned,
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "returned" | "return" | "qaytarilgan" => ItemStatus::Returned,
                "" | "1" | "normal" | "active" => ItemStatus::Normal,
                other => match other.parse::<f64>() {
                    Ok(n) if n != 1.0 => ItemStatus::Returned,
                    Ok(_) => ItemStatus::Normal,
                    Err(_) => {
                        warn!("unknown item status '{}', treated as normal", other);
                        ItemStatus::Normal
                    }
                },
            },
            _ => ItemStatus::Normal,
        })
    }
}

/// One product row on the receipt.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default, deserialize_with = "deserialize_text", alias = "productName")]
    pub name: Option<String>,
    /// Quantity in `unit`s. Defaults to 1.
    #[serde(default = "default_quantity", deserialize_with = "deserialize_quantity")]
    pub quantity: f64,
    /// Unit label ("dona", "kg", ...). Defaults to [`DEFAULT_UNIT`].
    #[serde(default, deserialize_with = "deserialize_text", alias = "unitName")]
    pub unit: Option<String>,
    /// Price of one unit.
    #[serde(default, deserialize_with = "deserialize_amount", alias = "unitPrice")]
    pub price: f64,
    #[serde(default)]
    pub status: ItemStatus,
}

fn deserialize_quantity<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_value).unwrap_or(1.0))
}

impl Default for LineItem {
    fn default() -> Self {
        Self {
            name: None,
            quantity: 1.0,
            unit: None,
            price: 0.0,
            status: ItemStatus::Normal,
        }
    }
}

impl LineItem {
    /// A normal item with a name, quantity, and unit price.
    pub fn new(name: impl Into<String>, quantity: f64, price: f64) -> Self {
        Self {
            name: Some(name.into()),
            quantity,
            price,
            ..Default::default()
        }
    }

    /// Set the unit label.
    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Mark the item as returned.
    pub fn returned(mut self) -> Self {
        self.status = ItemStatus::Returned;
        self
    }

    /// Item name, empty when absent.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Unit label, [`DEFAULT_UNIT`] when absent.
    pub fn unit_label(&self) -> &str {
        self.unit.as_deref().unwrap_or(DEFAULT_UNIT)
    }

    /// `quantity * price`.
    pub fn line_total(&self) -> f64 {
        self.quantity * self.price
    }
}

// ============================================================================
// PAYMENTS
// ============================================================================

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentKind {
    #[default]
    Cash,
    Card,
    /// Any method the template has no label for.
    Other,
}

impl<'de> Deserialize<'de> for PaymentKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "cash" | "naqd" => PaymentKind::Cash,
                "card" | "plastik" | "uzcard" | "humo" => PaymentKind::Card,
                _ => PaymentKind::Other,
            },
            Some(Value::Number(n)) => match n.as_i64() {
                Some(1) => PaymentKind::Cash,
                Some(2) => PaymentKind::Card,
                _ => PaymentKind::Other,
            },
            _ => PaymentKind::Other,
        })
    }
}

/// One payment toward the receipt total.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    #[serde(default, alias = "type", alias = "paymentType")]
    pub method: PaymentKind,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub amount: f64,
}

impl PaymentMethod {
    pub fn new(method: PaymentKind, amount: f64) -> Self {
        Self { method, amount }
    }
}

// ============================================================================
// TEMPLATE SETTINGS
// ============================================================================

/// Default page width in columns (58mm paper, Font A).
pub const DEFAULT_PAGE_WIDTH: i64 = 32;

/// Default number of blank lines fed before the cut.
pub const DEFAULT_FEED_LINES: i64 = 4;

/// Widest accepted page, in columns. 80mm paper in Font B is 64.
pub const MAX_PAGE_WIDTH: usize = 255;

/// Most blank lines accepted for one feed.
pub const MAX_FEED_LINES: usize = 255;

/// Page settings as supplied by the caller.
///
/// Values are kept signed so that bad input can be reported as a
/// [`StructuralError`] by [`TemplateSettings::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSettings {
    #[serde(default, deserialize_with = "deserialize_int")]
    page_width: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    use_auto_cut: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_int")]
    feed_line_count: Option<i64>,
}

impl TemplateSettings {
    pub fn new(page_width: i64, use_auto_cut: bool, feed_line_count: i64) -> Self {
        Self {
            page_width: Some(page_width),
            use_auto_cut: Some(use_auto_cut),
            feed_line_count: Some(feed_line_count),
        }
    }

    /// Page width in columns (default 32).
    pub fn page_width(&self) -> i64 {
        self.page_width.unwrap_or(DEFAULT_PAGE_WIDTH)
    }

    /// Whether to cut after the feed (default true).
    pub fn use_auto_cut(&self) -> bool {
        self.use_auto_cut.unwrap_or(true)
    }

    /// Blank lines before the cut (default 4).
    pub fn feed_line_count(&self) -> i64 {
        self.feed_line_count.unwrap_or(DEFAULT_FEED_LINES)
    }

    /// Check the settings and produce a [`PageLayout`].
    pub fn validate(&self) -> Result<PageLayout, StructuralError> {
        let page_width = self.page_width();
        let page_width = usize::try_from(page_width)
            .ok()
            .filter(|w| (1..=MAX_PAGE_WIDTH).contains(w))
            .ok_or(StructuralError::PageWidth(page_width))?;

        let feed_lines = self.feed_line_count();
        let feed_lines = usize::try_from(feed_lines)
            .ok()
            .filter(|n| *n <= MAX_FEED_LINES)
            .ok_or(StructuralError::FeedLineCount(feed_lines))?;

        Ok(PageLayout {
            page_width,
            auto_cut: self.use_auto_cut(),
            feed_lines,
        })
    }
}

/// Validated page settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    pub page_width: usize,
    pub auto_cut: bool,
    pub feed_lines: usize,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            page_width: DEFAULT_PAGE_WIDTH as usize,
            auto_cut: true,
            feed_lines: DEFAULT_FEED_LINES as usize,
        }
    }
}

// ============================================================================
// TEMPLATE OVERRIDE ELEMENTS
// ============================================================================

/// Alignment tag of an override text element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignTag {
    #[default]
    Left,
    #[serde(alias = "centre")]
    Center,
    Right,
    /// `content` on the left, `value` on the right.
    #[serde(alias = "justify", alias = "between")]
    Justified,
    /// Unrecognized tag; rendered left-aligned.
    #[serde(other)]
    Unknown,
}

/// Text element of a template override.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    #[serde(default, deserialize_with = "deserialize_text", alias = "text")]
    pub content: Option<String>,
    /// Right-hand fragment for justified rows.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub value: Option<String>,
    #[serde(default, alias = "align")]
    pub alignment: AlignTag,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub double_height: bool,
    /// Blank columns on the left.
    #[serde(default, alias = "leftPadding")]
    pub padding: usize,
}

impl TextElement {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn align(mut self, alignment: AlignTag) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// QR code or barcode element of a template override.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeElement {
    #[serde(default, deserialize_with = "deserialize_text", alias = "data")]
    pub payload: Option<String>,
    #[serde(default, alias = "align", alias = "alignment")]
    pub position: AlignTag,
}

/// Rule element of a template override; full page width by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct RuleElement {
    #[serde(default)]
    pub width: Option<usize>,
}

/// Feed element of a template override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct FeedElement {
    #[serde(default)]
    pub lines: usize,
    #[serde(default)]
    pub cut: bool,
}

/// One element of a template override, tagged by `"type"`.
///
/// ```json
/// {"type": "text", "content": "Aksiya!", "alignment": "center", "bold": true}
/// {"type": "text", "content": "Bonus:", "value": "500", "alignment": "justified"}
/// {"type": "rule"}
/// {"type": "qr", "payload": "https://example.uz/c/42"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TemplateElement {
    Text(TextElement),
    #[serde(alias = "divider", alias = "line")]
    Rule(RuleElement),
    Qr(CodeElement),
    Barcode(CodeElement),
    Feed(FeedElement),
    /// Unrecognized `"type"`; skipped when rendering.
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_item_defaults() {
        let item: LineItem = serde_json::from_str(r#"{"name": "Non"}"#).unwrap();
        assert_eq!(item.name(), "Non");
        assert_eq!(item.quantity, 1.0);
        assert_eq!(item.unit_label(), "dona");
        assert_eq!(item.price, 0.0);
        assert_eq!(item.status, ItemStatus::Normal);
    }

    #[test]
    fn test_line_item_string_numbers() {
        let item: LineItem = serde_json::from_str(
            r#"{"name": "Guruch", "quantity": "2,5", "unit": "kg", "price": "12 000"}"#,
        )
        .unwrap();
        assert_eq!(item.quantity, 2.5);
        assert_eq!(item.price, 12000.0);
        assert_eq!(item.line_total(), 30000.0);
    }

    #[test]
    fn test_item_status_values() {
        let parse = |s: &str| serde_json::from_str::<ItemStatus>(s).unwrap();
        assert_eq!(parse("1"), ItemStatus::Normal);
        assert_eq!(parse("2"), ItemStatus::Returned);
        assert_eq!(parse(r#""returned""#), ItemStatus::Returned);
        assert_eq!(parse(r#""normal""#), ItemStatus::Normal);
        assert_eq!(parse(r#""weird""#), ItemStatus::Normal);
        assert_eq!(parse("null"), ItemStatus::Normal);
    }

    #[test]
    fn test_payment_kinds() {
        let parse = |s: &str| serde_json::from_str::<PaymentMethod>(s).unwrap();
        assert_eq!(parse(r#"{"method": "cash", "amount": 5}"#).method, PaymentKind::Cash);
        assert_eq!(parse(r#"{"method": "CARD"}"#).method, PaymentKind::Card);
        assert_eq!(parse(r#"{"type": "click"}"#).method, PaymentKind::Other);
        assert_eq!(parse(r#"{"amount": "100"}"#).amount, 100.0);
    }

    #[test]
    fn test_settings_defaults() {
        let settings: TemplateSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, TemplateSettings::default());
        let layout = settings.validate().unwrap();
        assert_eq!(layout, PageLayout::default());
        assert_eq!(layout.page_width, 32);
        assert!(layout.auto_cut);
        assert_eq!(layout.feed_lines, 4);
    }

    #[test]
    fn test_settings_null_fields_default() {
        let settings: TemplateSettings = serde_json::from_str(
            r#"{"pageWidth": null, "useAutoCut": null, "feedLineCount": null}"#,
        )
        .unwrap();
        assert_eq!(settings.validate().unwrap(), PageLayout::default());
    }

    #[test]
    fn test_settings_structural_errors() {
        assert_eq!(
            TemplateSettings::new(0, true, 4).validate(),
            Err(StructuralError::PageWidth(0))
        );
        assert_eq!(
            TemplateSettings::new(32, true, -1).validate(),
            Err(StructuralError::FeedLineCount(-1))
        );
        assert_eq!(
            TemplateSettings::new(256, true, 4).validate(),
            Err(StructuralError::PageWidth(256))
        );
        assert_eq!(
            TemplateSettings::new(i64::MAX, true, 4).validate(),
            Err(StructuralError::PageWidth(i64::MAX))
        );
        assert_eq!(
            TemplateSettings::new(32, true, 200_000_000).validate(),
            Err(StructuralError::FeedLineCount(200_000_000))
        );
        assert_eq!(
            TemplateSettings::new(255, false, 255).validate(),
            Ok(PageLayout {
                page_width: 255,
                auto_cut: false,
                feed_lines: 255,
            })
        );
    }

    #[test]
    fn test_template_element_tags() {
        let el: TemplateElement = serde_json::from_str(
            r#"{"type": "text", "content": "Hi", "alignment": "center", "bold": true}"#,
        )
        .unwrap();
        assert_eq!(
            el,
            TemplateElement::Text(TextElement::new("Hi").align(AlignTag::Center).bold())
        );

        let el: TemplateElement = serde_json::from_str(r#"{"type": "divider"}"#).unwrap();
        assert_eq!(el, TemplateElement::Rule(RuleElement { width: None }));

        let el: TemplateElement = serde_json::from_str(r#"{"type": "sparkles"}"#).unwrap();
        assert_eq!(el, TemplateElement::Unknown);
    }

    #[test]
    fn test_unknown_alignment_tag() {
        let el: TextElement =
            serde_json::from_str(r#"{"content": "x", "alignment": "diagonal"}"#).unwrap();
        assert_eq!(el.alignment, AlignTag::Unknown);
        let el: TextElement = serde_json::from_str(r#"{"text": "x", "align": "justify"}"#).unwrap();
        assert_eq!(el.alignment, AlignTag::Justified);
    }
}
