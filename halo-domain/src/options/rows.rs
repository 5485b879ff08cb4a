//! Settings rows.
//!
//! A settings page is a list of [`RowSpec`]s, each naming an option id and
//! the kind of editor it wants. [`bind_row`] resolves a spec against the
//! tree. Misconfigured rows (unknown id, editor kind that does not fit the
//! cell's value) become an inline `[ERROR]` marker instead of failing.

use serde_json::Value;
use tracing::warn;

use super::cell::Opt;
use super::errors::OptionsError;
use super::tree::OptionsTree;

pub const ERROR_MARKER: &str = "[ERROR]";

#[derive(Debug, Clone, PartialEq)]
pub enum RowKind {
    Switch,
    Spin { min: f64, max: f64 },
    Text,
    Color,
    Enum(Vec<String>),
}

impl RowKind {
    fn expected(&self) -> &'static str {
        match self {
            RowKind::Switch => "a boolean",
            RowKind::Spin { .. } => "a number",
            RowKind::Text => "a string",
            RowKind::Color => "a hex color",
            RowKind::Enum(_) => "one of the listed choices",
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (RowKind::Switch, Value::Bool(_)) => true,
            (RowKind::Spin { min, max }, Value::Number(n)) => n.as_f64().map_or(false, |v| v >= *min && v <= *max),
            (RowKind::Text, Value::String(_)) => true,
            (RowKind::Color, Value::String(s)) => is_hex_color(s),
            (RowKind::Enum(choices), Value::String(s)) => choices.iter().any(|c| c == s),
            _ => false,
        }
    }

    /// Whether the default value can be edited with this kind at all.
    fn fits(&self, value: &Value) -> bool {
        match (self, value) {
            (RowKind::Spin { .. }, Value::Number(_)) => true,
            _ => self.accepts(value),
        }
    }
}

/// `#rgb`, `#rrggbb` or `#rrggbbaa`.
pub fn is_hex_color(s: &str) -> bool {
    match s.strip_prefix('#') {
        Some(hex) => matches!(hex.len(), 3 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowSpec {
    pub id: String,
    pub title: String,
    pub kind: RowKind,
}

impl RowSpec {
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: RowKind) -> Self {
        Self { id: id.into(), title: title.into(), kind }
    }
}

#[derive(Debug, Clone)]
pub struct BoundRow {
    pub title: String,
    pub kind: RowKind,
    cell: Opt<Value>,
}

impl BoundRow {
    pub fn id(&self) -> &str {
        self.cell.id()
    }

    pub fn value(&self) -> Value {
        self.cell.get()
    }

    pub fn is_default(&self) -> bool {
        self.cell.is_default()
    }

    /// Writes `value` if the row kind accepts it.
    pub fn apply(&self, value: Value) -> Result<(), OptionsError> {
        if !self.kind.accepts(&value) {
            return Err(OptionsError::TypeMismatch {
                id: self.cell.id().to_string(),
                expected: self.kind.expected().to_string(),
            });
        }
        self.cell.set(value);
        Ok(())
    }

    pub fn reset(&self) {
        self.cell.reset();
    }
}

#[derive(Debug, Clone)]
pub enum RowBinding {
    Bound(BoundRow),
    /// Text shown in place of the editor, always prefixed with [`ERROR_MARKER`].
    Error(String),
}

impl RowBinding {
    pub fn is_error(&self) -> bool {
        matches!(self, RowBinding::Error(_))
    }
}

pub fn bind_row(tree: &OptionsTree, spec: &RowSpec) -> RowBinding {
    let cell = match tree.get_str(&spec.id) {
        Some(cell) => cell,
        None => {
            let err = OptionsError::UnknownOption(spec.id.clone());
            warn!("Settings row '{}': {}", spec.title, err);
            return RowBinding::Error(format!("{} {}", ERROR_MARKER, err));
        }
    };
    if !spec.kind.fits(&cell.default_value()) {
        warn!("Settings row '{}' cannot edit option '{}' as {}", spec.title, spec.id, spec.kind.expected());
        return RowBinding::Error(format!(
            "{} {}: {} expects {}",
            ERROR_MARKER,
            spec.id,
            spec.title,
            spec.kind.expected()
        ));
    }
    RowBinding::Bound(BoundRow { title: spec.title.clone(), kind: spec.kind.clone(), cell: cell.clone() })
}

pub fn bind_rows(tree: &OptionsTree, specs: &[RowSpec]) -> Vec<RowBinding> {
    specs.iter().map(|spec| bind_row(tree, spec)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree() -> OptionsTree {
        OptionsTree::build(&json!({
            "autotheme": false,
            "bar": { "position": "top", "size": 32 },
            "theme": { "dark": { "bg": "#171717" } }
        }))
    }

    #[test]
    fn binds_matching_rows() {
        let tree = tree();
        let rows = bind_rows(
            &tree,
            &[
                RowSpec::new("autotheme", "Auto theme", RowKind::Switch),
                RowSpec::new("bar.size", "Bar size", RowKind::Spin { min: 16.0, max: 64.0 }),
                RowSpec::new("theme.dark.bg", "Background", RowKind::Color),
                RowSpec::new("bar.position", "Position", RowKind::Enum(vec!["top".into(), "bottom".into()])),
            ],
        );
        assert!(rows.iter().all(|row| !row.is_error()));
    }

    #[test]
    fn unknown_id_yields_error_marker() {
        match bind_row(&tree(), &RowSpec::new("bar.ghost", "Ghost", RowKind::Text)) {
            RowBinding::Error(text) => {
                assert_eq!(text, "[ERROR] Unknown option 'bar.ghost'");
            }
            RowBinding::Bound(_) => panic!("expected error marker"),
        }
    }

    #[test]
    fn mismatched_kind_yields_error_marker() {
        let binding = bind_row(&tree(), &RowSpec::new("bar.size", "Bar size", RowKind::Switch));
        assert!(matches!(binding, RowBinding::Error(ref t) if t.starts_with("[ERROR]")));
    }

    #[test]
    fn apply_validates_values() {
        let tree = tree();
        let row = match bind_row(&tree, &RowSpec::new("theme.dark.bg", "Background", RowKind::Color)) {
            RowBinding::Bound(row) => row,
            RowBinding::Error(e) => panic!("{}", e),
        };
        assert!(row.apply(json!("not a color")).is_err());
        assert_eq!(row.value(), json!("#171717"));
        row.apply(json!("#ABCDEF")).unwrap();
        assert_eq!(tree.get_str("theme.dark.bg").unwrap().get(), json!("#ABCDEF"));
        row.reset();
        assert!(row.is_default());
    }

    #[test]
    fn spin_respects_bounds() {
        let tree = tree();
        let row = match bind_row(&tree, &RowSpec::new("bar.size", "Size", RowKind::Spin { min: 16.0, max: 64.0 })) {
            RowBinding::Bound(row) => row,
            RowBinding::Error(e) => panic!("{}", e),
        };
        assert!(row.apply(json!(100)).is_err());
        row.apply(json!(48)).unwrap();
        assert_eq!(row.value(), json!(48));
    }

    #[test]
    fn hex_color_validation() {
        assert!(is_hex_color("#fff"));
        assert!(is_hex_color("#51a4e7"));
        assert!(is_hex_color("#51a4e7ff"));
        assert!(!is_hex_color("51a4e7"));
        assert!(!is_hex_color("#51a4e"));
        assert!(!is_hex_color("#zzzzzz"));
    }
}
