use serde_json::Value;

/// Produce the text form of a [`Value`], which is what filters operate on.
///
/// Strings are taken as-is (no quoting), scalars use their natural
/// display form, and composite values are written in bracket notation.
pub(crate) fn to_text(value: &Value) -> String {
    let mut buffer = String::new();
    write_value(&mut buffer, value);

    buffer
}

fn write_value(buffer: &mut String, value: &Value) {
    match value {
        Value::Null => {}
        Value::Bool(bool) => buffer.push_str(if *bool { "true" } else { "false" }),
        Value::Number(number) => buffer.push_str(&number.to_string()),
        Value::String(string) => buffer.push_str(string),
        Value::Array(array) => {
            buffer.push('[');
            let mut iter = array.iter();
            if let Some(item) = iter.next() {
                write_value(buffer, item);
                for item in iter {
                    buffer.push_str(", ");
                    write_value(buffer, item);
                }
            }
            buffer.push(']');
        }
        Value::Object(object) => {
            buffer.push('{');
            let mut iter = object.iter();
            if let Some((key, value)) = iter.next() {
                buffer.push_str(key);
                buffer.push_str(": ");
                write_value(buffer, value);
                for (key, value) in iter {
                    buffer.push_str(", ");
                    buffer.push_str(key);
                    buffer.push_str(": ");
                    write_value(buffer, value);
                }
            }
            buffer.push('}');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::to_text;
    use serde_json::json;

    #[test]
    fn test_scalars() {
        assert_eq!(to_text(&json!("text")), "text");
        assert_eq!(to_text(&json!(42)), "42");
        assert_eq!(to_text(&json!(1.5)), "1.5");
        assert_eq!(to_text(&json!(true)), "true");
    }

    #[test]
    fn test_composites() {
        assert_eq!(to_text(&json!([1, 2, 3])), "[1, 2, 3]");
        assert_eq!(to_text(&json!({"a": 1, "b": "x"})), "{a: 1, b: x}");
    }
}
