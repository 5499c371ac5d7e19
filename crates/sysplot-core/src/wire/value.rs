//! Polymorphic wire document values.

/// A document value: scalar text, ordered list, or keyed object.
///
/// Objects preserve insertion order and the encoder never inserts a key
/// twice. Each variant has its own render arm; no runtime type inspection
/// happens anywhere else.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(String),
    List(Vec<Value>),
    Object(Vec<(String, Value)>),
}

impl Value {
    /// Builds a list from anything convertible to values.
    pub fn list<I, T>(items: I) -> Value
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Renders this value onto `out`.
    pub fn render(&self, out: &mut String) {
        match self {
            Value::Scalar(text) => render_scalar(text, out),
            Value::List(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    item.render(out);
                }
                out.push(']');
            }
            Value::Object(pairs) => {
                out.push('{');
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push('"');
                    out.push_str(key);
                    out.push_str("\":");
                    value.render(out);
                }
                out.push('}');
            }
        }
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        self.render(&mut out);
        out
    }
}

/// Scalar rule: text that reads as a finite number is emitted bare;
/// everything else is quoted, with control bytes blanked and embedded quotes
/// escaped. Blanking control bytes guarantees the CR/LF frame delimiter can
/// never appear inside a string.
fn render_scalar(text: &str, out: &mut String) {
    if is_numeric(text) {
        out.push_str(text);
        return;
    }

    out.push('"');
    for c in text.chars() {
        if (c as u32) < 32 {
            out.push(' ');
        } else if c == '"' {
            out.push_str("\\\"");
        } else {
            out.push(c);
        }
    }
    out.push('"');
}

/// Finite numbers only: "inf" and "nan" parse as floats but must stay
/// quoted to keep the document well-formed.
fn is_numeric(text: &str) -> bool {
    matches!(text.parse::<f64>(), Ok(n) if n.is_finite())
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Scalar(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Scalar(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Scalar(v.to_string())
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Scalar(v.to_string())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Scalar(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_text_is_unquoted() {
        assert_eq!(Value::from(42u64).to_text(), "42");
        assert_eq!(Value::from(-7i64).to_text(), "-7");
        assert_eq!(Value::from("3.5").to_text(), "3.5");
        assert_eq!(Value::from("1e3").to_text(), "1e3");
    }

    #[test]
    fn non_numeric_text_is_quoted() {
        assert_eq!(Value::from("bash").to_text(), "\"bash\"");
        assert_eq!(Value::from("").to_text(), "\"\"");
        assert_eq!(Value::from("12abc").to_text(), "\"12abc\"");
        assert_eq!(Value::from(" 12").to_text(), "\" 12\"");
    }

    #[test]
    fn infinite_and_nan_text_stay_quoted() {
        assert_eq!(Value::from("inf").to_text(), "\"inf\"");
        assert_eq!(Value::from("NaN").to_text(), "\"NaN\"");
    }

    #[test]
    fn control_bytes_become_spaces() {
        assert_eq!(Value::from("a\x00b\r\nc\td").to_text(), "\"a b  c d\"");
    }

    #[test]
    fn embedded_quotes_are_escaped() {
        assert_eq!(Value::from("say \"hi\"").to_text(), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn empty_list_and_object() {
        assert_eq!(Value::List(Vec::new()).to_text(), "[]");
        assert_eq!(Value::Object(Vec::new()).to_text(), "{}");
    }

    #[test]
    fn lists_have_no_trailing_comma() {
        assert_eq!(Value::list([1u64]).to_text(), "[1]");
        assert_eq!(Value::list([1u64, 2, 3]).to_text(), "[1,2,3]");
    }

    #[test]
    fn objects_preserve_insertion_order() {
        let obj = Value::Object(vec![
            ("b".to_string(), Value::from(1u64)),
            ("a".to_string(), Value::from("x")),
        ]);
        assert_eq!(obj.to_text(), "{\"b\":1,\"a\":\"x\"}");
    }

    #[test]
    fn nested_values_render_recursively() {
        let obj = Value::Object(vec![(
            "items".to_string(),
            Value::list(["a", "2"]),
        )]);
        assert_eq!(obj.to_text(), "{\"items\":[\"a\",2]}");
    }
}
