/// Filter formula construction for record store list queries
///
/// The store selects rows without a primary-key lookup through a small
/// query-string formula language: field equality, conjunction, and
/// case-insensitive comparison. Every filter is an expression tree rendered
/// to the wire grammar by a single encoder, so escaping happens in exactly
/// one place.

/// One node of a filter expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// `{field}="value"`
    Eq { field: String, value: String },
    /// `LOWER({field})=LOWER("value")`
    EqIgnoreCase { field: String, value: String },
    /// `AND(expr,expr,...)`
    And(Vec<Filter>),
}

impl Filter {
    /// Field equality
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Case-insensitive field equality
    pub fn eq_ignore_case(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::EqIgnoreCase {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Conjunction of sub-expressions
    pub fn and(exprs: Vec<Filter>) -> Self {
        Filter::And(exprs)
    }

    /// Render to the wire-format formula string
    pub fn render(&self) -> String {
        match self {
            Filter::Eq { field, value } => {
                format!("{{{}}}=\"{}\"", field, escape_value(value))
            }
            Filter::EqIgnoreCase { field, value } => {
                format!("LOWER({{{}}})=LOWER(\"{}\")", field, escape_value(value))
            }
            Filter::And(exprs) => {
                let inner: Vec<String> = exprs.iter().map(Filter::render).collect();
                format!("AND({})", inner.join(","))
            }
        }
    }

    /// Render and percent-encode for use as a query parameter value
    pub fn encoded(&self) -> String {
        urlencoding::encode(&self.render()).into_owned()
    }
}

/// Escape a string literal for embedding in a formula
fn escape_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
