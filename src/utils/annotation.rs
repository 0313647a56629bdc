use serde_json::{Map, Value};

const MISSING: &str = "N/A";
const NULL: &str = "None";

/// A titled block of `label: value` lines, drawn as a chart annotation box
pub struct Annotation {
    heading: String,
    rows: Vec<(String, String)>,
}

impl Annotation {
    /// Create an empty annotation with the given heading
    pub fn new(heading: &str) -> Self {
        Annotation {
            heading: heading.to_string(),
            rows: Vec::new(),
        }
    }

    /// Add a row to the annotation
    pub fn add_row(&mut self, label: &str, value: impl Into<String>) -> &mut Self {
        self.rows.push((label.to_string(), value.into()));
        self
    }

    /// Render the annotation as one string per line, heading first
    pub fn render(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.rows.len() + 1);
        lines.push(self.heading.clone());
        for (label, value) in &self.rows {
            lines.push(format!("{}: {}", label, value));
        }
        lines
    }
}

/// Text for a free-form JSON field: strings unquoted, an absent key as "N/A"
pub fn field_text(fields: &Map<String, Value>, key: &str) -> String {
    fields.get(key).map(value_text).unwrap_or_else(|| MISSING.to_string())
}

/// Text for a JSON value without surrounding quotes; an explicit null is "None"
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => NULL.to_string(),
        other => other.to_string(),
    }
}

/// Whole numbers print without a fractional part: 150.0 -> "150", 12.5 -> "12.5"
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}
