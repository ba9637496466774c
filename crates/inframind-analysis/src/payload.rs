use crate::model::ConfidenceLabel;
use serde_json::{Map, Value};

pub(crate) type Object = Map<String, Value>;

/// Read-only view over a loosely shaped backend object.
///
/// Lookups try each alias in order against the body first and then the
/// envelope, skipping keys whose value is `null`.
#[derive(Clone, Copy)]
pub(crate) struct Fields<'a> {
    body: &'a Object,
    envelope: Option<&'a Object>,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(body: &'a Object) -> Self {
        Self {
            body,
            envelope: None,
        }
    }

    /// Native backend responses nest the analysis under `rca`.
    pub(crate) fn from_response(root: &'a Object) -> Self {
        match root.get("rca").and_then(Value::as_object) {
            Some(rca) => Self {
                body: rca,
                envelope: Some(root),
            },
            None => Self::new(root),
        }
    }

    pub(crate) fn get(&self, keys: &[&str]) -> Option<&'a Value> {
        lookup(self.body, keys).or_else(|| self.envelope.and_then(|env| lookup(env, keys)))
    }

    pub(crate) fn text(&self, keys: &[&str]) -> String {
        self.get(keys).and_then(scalar_text).unwrap_or_default()
    }

    pub(crate) fn optional_text(&self, keys: &[&str]) -> Option<String> {
        self.get(keys)
            .and_then(scalar_text)
            .filter(|text| !text.trim().is_empty())
    }

    pub(crate) fn strings(&self, keys: &[&str]) -> Vec<String> {
        self.get(keys)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(|s| s.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn array(&self, keys: &[&str]) -> &'a [Value] {
        self.get(keys)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub(crate) fn objects(&self, keys: &[&str]) -> Vec<&'a Object> {
        self.array(keys)
            .iter()
            .filter_map(Value::as_object)
            .collect()
    }

    pub(crate) fn flag(&self, keys: &[&str]) -> bool {
        self.get(keys).and_then(Value::as_bool).unwrap_or(false)
    }

    pub(crate) fn score(&self, keys: &[&str]) -> Option<Score> {
        self.get(keys).and_then(Score::read)
    }

    pub(crate) fn label(&self, keys: &[&str]) -> Option<ConfidenceLabel> {
        self.get(keys)
            .and_then(Value::as_str)
            .and_then(ConfidenceLabel::parse)
    }
}

/// A confidence as the backend sent it: a number, or only a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Score {
    Number(u8),
    Label(ConfidenceLabel),
}

impl Score {
    fn read(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => number.as_f64().map(|n| Score::Number(clamp_percent(n))),
            Value::String(text) => match text.trim().trim_end_matches('%').parse::<f64>() {
                Ok(n) => Some(Score::Number(clamp_percent(n))),
                Err(_) => ConfidenceLabel::parse(text).map(Score::Label),
            },
            _ => None,
        }
    }

    pub(crate) fn value(self) -> u8 {
        match self {
            Score::Number(n) => n,
            Score::Label(label) => label.representative_score(),
        }
    }

    pub(crate) fn implied_label(self) -> Option<ConfidenceLabel> {
        match self {
            Score::Number(_) => None,
            Score::Label(label) => Some(label),
        }
    }
}

fn lookup<'a>(object: &'a Object, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn clamp_percent(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}
