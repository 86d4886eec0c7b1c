use serde::Deserialize;
use serde_json::Value;

/// Body of `POST /users` and `PUT /users/:id`. Absent or null fields are
/// stored as NULL; any other JSON value is stored as text.
#[derive(Debug, Default, Deserialize)]
pub struct UserPayload {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub email: Option<Value>,
}

impl UserPayload {
    pub fn name_text(&self) -> Option<String> {
        self.name.as_ref().and_then(as_text)
    }

    pub fn email_text(&self) -> Option<String> {
        self.email.as_ref().and_then(as_text)
    }
}

/// Coerces a JSON value into the text bound to a VARCHAR column.
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => {
            Some(value.to_string())
        }
    }
}
