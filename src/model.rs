//! Wire and display types for book records.
//!
//! These mirror the JSON the backend exchanges with the table page:
//! list responses, pagination, query parameters and form payloads.
//!
use serde::{Deserialize, Deserializer, Serialize};

/// Default number of rows requested per page when neither config nor backend provide one.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// A display value that is either free text or a number.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Coerce to a number the way the dashboard's `Number(..)` does.
    ///
    /// Blank text is `0`, unparsable text is `NaN`. No NaN guard is applied.
    pub fn as_number(&self) -> f64 {
        match self {
            FieldValue::Number(n) => *n,
            FieldValue::Text(s) => coerce_number(s),
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Number(n) => f.write_str(&format_number(*n)),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

/// One `{label, value}` pair shown in the book info block.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LabeledField {
    #[serde(default, deserialize_with = "null_as_default")]
    pub label: String,
    /// A `null` value reads as blank text.
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: FieldValue,
}

impl LabeledField {
    pub fn new(label: impl Into<String>, value: FieldValue) -> Self {
        Self { label: label.into(), value }
    }
}

/// Nested book metadata (cover image, score, title).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BookMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, alias = "desc", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<FieldValue>,
}

/// One book row as returned by the list endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub key: u64,
    #[serde(rename = "ISBN", default)]
    pub isbn: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub author: Option<LabeledField>,
    #[serde(default)]
    pub publisher: Option<LabeledField>,
    #[serde(default)]
    pub original_name: Option<LabeledField>,
    #[serde(rename = "translatoer", alias = "translator", default)]
    pub translator: Option<LabeledField>,
    #[serde(default)]
    pub pages: Option<LabeledField>,
    #[serde(default)]
    pub price: Option<LabeledField>,
    #[serde(default)]
    pub layout: Option<LabeledField>,
    #[serde(default)]
    pub book: Option<BookMeta>,
}

impl BookRecord {
    /// Score used by the score column comparator.
    pub fn score(&self) -> f64 {
        self.book
            .as_ref()
            .and_then(|b| b.score.as_ref())
            .map(FieldValue::as_number)
            .unwrap_or(0.0)
    }

    /// Price coerced to a number; a missing price counts as `0`.
    pub fn price_value(&self) -> f64 {
        self.price
            .as_ref()
            .map(|p| p.value.as_number())
            .unwrap_or(0.0)
    }

    /// The six labeled fields of the book info block, in display order.
    pub fn info_fields(&self) -> [(&'static str, Option<&LabeledField>); 6] {
        [
            ("Author", self.author.as_ref()),
            ("Original name", self.original_name.as_ref()),
            ("Publisher", self.publisher.as_ref()),
            ("Translator", self.translator.as_ref()),
            ("Layout", self.layout.as_ref()),
            ("Pages", self.pages.as_ref()),
        ]
    }

    /// Snapshot of the editable projection of this record.
    pub fn form_values(&self) -> FormValues {
        let meta = self.book.as_ref();
        let name = meta
            .and_then(|b| b.name.clone())
            .or_else(|| self.original_name.as_ref().map(|f| f.value.to_string()));
        FormValues {
            name,
            desc: meta.and_then(|b| b.description.clone()),
            key: Some(self.key),
        }
    }
}

/// Pagination as echoed by the backend; every field may be absent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<i64>,
}

impl Pagination {
    /// Clamp present fields into range: `total >= 0`, `page_size >= 1`, `current >= 1`.
    pub fn normalized(self) -> Self {
        Self {
            total: self.total.map(|t| t.max(0)),
            page_size: self.page_size.map(|n| n.max(1)),
            current: self.current.map(|c| c.max(1)),
        }
    }
}

/// Concrete pagination state held by the grid. Always `current >= 1`, `page_size >= 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageCursor {
    pub current: u64,
    pub page_size: u64,
    pub total: u64,
}

impl PageCursor {
    pub fn new(page_size: u64) -> Self {
        Self {
            current: 1,
            page_size: page_size.max(1),
            total: 0,
        }
    }

    /// Merge the fields the backend sent, clamping them into range.
    pub fn absorb(&mut self, p: &Pagination) {
        let p = p.normalized();
        if let Some(total) = p.total {
            self.total = total as u64;
        }
        if let Some(size) = p.page_size {
            self.page_size = size as u64;
        }
        if let Some(current) = p.current {
            self.current = current as u64;
        }
    }

    /// Number of pages implied by `total`; at least one.
    pub fn page_count(&self) -> u64 {
        self.total.div_ceil(self.page_size).max(1)
    }

    pub fn has_next(&self) -> bool {
        self.current < self.page_count()
    }

    pub fn has_prev(&self) -> bool {
        self.current > 1
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// Flat filter/sort bag passed to the list endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sorter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u64>,
}

/// Fields captured by the create and update forms.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormValues {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<u64>,
}

impl FormValues {
    /// True when no field is present.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.desc.is_none() && self.key.is_none()
    }
}

/// Body of a list response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TableListData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub list: Vec<BookRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pagination: Pagination,
}

fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

/// Parse text into a number with `Number(..)` semantics.
///
/// Unsigned `0x`, `0o` and `0b` literals are read in their radix; a signed one is NaN.
pub fn coerce_number(s: &str) -> f64 {
    let t = s.trim();
    if t.is_empty() {
        return 0.0;
    }
    match t {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(radix) = radix_prefix(t) {
        return parse_radix(&t[2..], radix);
    }
    // Rust accepts "inf"/"nan" spellings that `Number(..)` rejects.
    if t.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return f64::NAN;
    }
    t.parse::<f64>().unwrap_or(f64::NAN)
}

fn radix_prefix(t: &str) -> Option<u32> {
    match t.get(..2)? {
        "0x" | "0X" => Some(16),
        "0o" | "0O" => Some(8),
        "0b" | "0B" => Some(2),
        _ => None,
    }
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits
        .chars()
        .try_fold(0.0_f64, |acc, c| c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d)))
        .unwrap_or(f64::NAN)
}

/// Render a number the way the dashboard prints it: `35`, `35.5`, `NaN`, `Infinity`.
///
/// Magnitudes from `1e21` up and below `1e-6` use exponent form, e.g. `1e+21`, `1.5e-7`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() }
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        let exp = format!("{:e}", n);
        match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
            _ => exp,
        }
    } else {
        format!("{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_deserializes_wire_names() {
        let json = r#"{
            "key": 7,
            "ISBN": "978-7-5442-9116-4",
            "createdAt": "2020-05-01",
            "author": {"label": "Author", "value": "Yu Hua"},
            "translatoer": {"label": "Translator", "value": ""},
            "pages": {"label": "Pages", "value": 191},
            "price": {"label": "Price", "value": "39.50"},
            "book": {"img": "https://img/1.jpg", "score": 9.1, "name": "To Live"}
        }"#;
        let rec: BookRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.key, 7);
        assert_eq!(rec.isbn, "978-7-5442-9116-4");
        assert_eq!(rec.created_at, "2020-05-01");
        assert_eq!(rec.pages.as_ref().unwrap().value, FieldValue::Number(191.0));
        assert_eq!(rec.translator.as_ref().unwrap().label, "Translator");
        assert_eq!(rec.price_value(), 39.5);
        assert_eq!(rec.score(), 9.1);
        assert!(rec.publisher.is_none());
    }

    #[test]
    fn null_field_value_reads_as_blank() {
        let json = r#"{
            "key": 4,
            "translatoer": {"label": "Translator", "value": null},
            "price": {"label": null, "value": null},
            "book": {"name": "Brothers", "score": null}
        }"#;
        let rec: BookRecord = serde_json::from_str(json).unwrap();
        let translator = rec.translator.as_ref().unwrap();
        assert_eq!(translator.label, "Translator");
        assert_eq!(translator.value, FieldValue::default());
        assert_eq!(translator.value.to_string(), "");
        assert_eq!(rec.price_value(), 0.0);
        assert!(rec.book.as_ref().unwrap().score.is_none());
    }

    #[test]
    fn list_tolerates_missing_and_null_sections() {
        let data: TableListData = serde_json::from_str(r#"{"list": null}"#).unwrap();
        assert!(data.list.is_empty());
        assert_eq!(data.pagination, Pagination::default());
    }

    #[test]
    fn coerce_number_follows_number_semantics() {
        assert_eq!(coerce_number("10"), 10.0);
        assert_eq!(coerce_number(" 25.5 "), 25.5);
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("1e2"), 100.0);
        assert!(coerce_number("abc").is_nan());
        assert!(coerce_number("inf").is_nan());
        assert_eq!(coerce_number("-Infinity"), f64::NEG_INFINITY);
    }

    #[test]
    fn coerce_number_reads_radix_literals() {
        assert_eq!(coerce_number("0x10"), 16.0);
        assert_eq!(coerce_number(" 0XfF "), 255.0);
        assert_eq!(coerce_number("0o17"), 15.0);
        assert_eq!(coerce_number("0b101"), 5.0);
        assert!(coerce_number("-0x10").is_nan());
        assert!(coerce_number("0x").is_nan());
        assert!(coerce_number("0b102").is_nan());
    }

    #[test]
    fn format_number_drops_trailing_zero_fraction() {
        assert_eq!(format_number(35.5), "35.5");
        assert_eq!(format_number(35.0), "35");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::NAN), "NaN");
    }

    #[test]
    fn format_number_switches_to_exponent_at_the_edges() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-2.5e22), "-2.5e+22");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(0.000001), "0.000001");
    }

    #[test]
    fn page_cursor_clamps_backend_values() {
        let mut cursor = PageCursor::new(10);
        cursor.absorb(&Pagination {
            total: Some(-3),
            page_size: Some(0),
            current: Some(0),
        });
        assert_eq!(cursor, PageCursor { current: 1, page_size: 1, total: 0 });

        cursor.absorb(&Pagination { total: Some(25), page_size: Some(10), current: None });
        assert_eq!(cursor.page_count(), 3);
        assert!(cursor.has_next());
        assert!(!cursor.has_prev());
    }

    #[test]
    fn query_params_skip_absent_fields() {
        let params = QueryParams {
            page_size: Some(20),
            current_page: Some(2),
            ..Default::default()
        };
        let v = serde_json::to_value(&params).unwrap();
        assert_eq!(v, serde_json::json!({"pageSize": 20, "currentPage": 2}));
    }

    #[test]
    fn form_values_snapshot_prefers_book_name() {
        let rec = BookRecord {
            key: 3,
            original_name: Some(LabeledField::new("Original", FieldValue::Text("Vivre".into()))),
            ..Default::default()
        };
        assert_eq!(rec.form_values().name.as_deref(), Some("Vivre"));

        let rec = BookRecord {
            key: 3,
            book: Some(BookMeta {
                name: Some("To Live".into()),
                description: Some("novel".into()),
                ..Default::default()
            }),
            ..rec
        };
        let values = rec.form_values();
        assert_eq!(values.name.as_deref(), Some("To Live"));
        assert_eq!(values.desc.as_deref(), Some("novel"));
        assert_eq!(values.key, Some(3));
        assert!(FormValues::default().is_empty());
    }
}
