//! Failure message templates
//!
//! Every failure message is a template carrying placeholders that are
//! substituted when the failure is recorded, not when the schema is defined:
//!
//! - `{PATH}`  - the failing field path
//! - `{VALUE}` - the offending value
//! - `{TYPE}`  - the failure classification ("required", "enum", "regexp", ...)
//! - `{MIN}`   - the declared lower bound, for range failures
//! - `{MAX}`   - the declared upper bound, for range failures

use serde_json::Value;

/// Default template for a missing required field.
pub const REQUIRED_TEMPLATE: &str = "`{PATH}` is required";

/// Default template for a value inconsistent with the declared field type.
pub const TYPE_TEMPLATE: &str = "`{VALUE}` is not a valid {TYPE} for `{PATH}`";

/// Default template for a value outside an allowed set.
pub const ENUM_TEMPLATE: &str = "`{VALUE}` is not an allowed value for `{PATH}`";

/// Default template for a value that does not match a pattern.
pub const PATTERN_TEMPLATE: &str = "`{VALUE}` does not match the required pattern for `{PATH}`";

/// Default template for a value below a declared minimum.
pub const MIN_TEMPLATE: &str = "`{VALUE}` is below the minimum {MIN} for `{PATH}`";

/// Default template for a value above a declared maximum.
pub const MAX_TEMPLATE: &str = "`{VALUE}` is above the maximum {MAX} for `{PATH}`";

/// Default template for a range constraint applied to a non-numeric value.
pub const NOT_NUMERIC_TEMPLATE: &str = "`{VALUE}` at `{PATH}` is not numeric";

/// Placeholder values available to a template at render time.
pub struct Placeholders<'a> {
    pub path: &'a str,
    pub value: &'a Value,
    pub kind: &'a str,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl<'a> Placeholders<'a> {
    /// Placeholders with no declared bounds.
    pub fn new(path: &'a str, value: &'a Value, kind: &'a str) -> Self {
        Self {
            path,
            value,
            kind,
            min: None,
            max: None,
        }
    }

    pub fn with_bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }
}

/// Substitutes placeholders into a template.
///
/// Unknown brace sequences pass through untouched so a literal `{}` in a
/// hand-written message is not mangled.
pub fn render(template: &str, placeholders: &Placeholders<'_>) -> String {
    let mut message = template.replace("{PATH}", placeholders.path);
    message = message.replace("{VALUE}", &value_text(placeholders.value));
    message = message.replace("{TYPE}", placeholders.kind);

    if let Some(min) = placeholders.min {
        message = message.replace("{MIN}", &bound_text(min));
    }
    if let Some(max) = placeholders.max {
        message = message.replace("{MAX}", &bound_text(max));
    }

    message
}

/// Text form of a value for messages and for enum/pattern matching.
///
/// Strings render without surrounding quotes; everything else renders as its
/// JSON text.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Renders a numeric bound, dropping a trailing `.0` for whole numbers.
fn bound_text(bound: f64) -> String {
    if bound.fract() == 0.0 && bound.abs() < 1e15 {
        format!("{}", bound as i64)
    } else {
        format!("{}", bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_path_and_value() {
        let value = json!("Klingon");
        let rendered = render(ENUM_TEMPLATE, &Placeholders::new("language", &value, "enum"));
        assert_eq!(rendered, "`Klingon` is not an allowed value for `language`");
    }

    #[test]
    fn test_render_kind() {
        let value = json!(42);
        let rendered = render(TYPE_TEMPLATE, &Placeholders::new("title", &value, "text"));
        assert_eq!(rendered, "`42` is not a valid text for `title`");
    }

    #[test]
    fn test_render_bounds() {
        let value = json!(-3);
        let placeholders =
            Placeholders::new("price", &value, "min").with_bounds(Some(0.0), None);
        let rendered = render(MIN_TEMPLATE, &placeholders);
        assert_eq!(rendered, "`-3` is below the minimum 0 for `price`");
    }

    #[test]
    fn test_render_fractional_bound() {
        let value = json!(10);
        let placeholders =
            Placeholders::new("rating", &value, "max").with_bounds(None, Some(9.5));
        let rendered = render(MAX_TEMPLATE, &placeholders);
        assert!(rendered.contains("9.5"));
    }

    #[test]
    fn test_value_text_string_unquoted() {
        assert_eq!(value_text(&json!("English")), "English");
        assert_eq!(value_text(&json!(11.99)), "11.99");
        assert_eq!(value_text(&json!(true)), "true");
        assert_eq!(value_text(&json!(null)), "null");
    }

    #[test]
    fn test_unknown_braces_untouched() {
        let value = json!("x");
        let rendered = render("literal {braces} stay for `{PATH}`", &Placeholders::new("f", &value, "enum"));
        assert_eq!(rendered, "literal {braces} stay for `f`");
    }
}
