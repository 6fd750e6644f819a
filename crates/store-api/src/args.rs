//! Route argument schemas and validation.
//!
//! Path captures, the JSON body and the query string are merged into one
//! argument map (path wins over body, body wins over query) and checked
//! against the route's [`ArgSchema`] before any handler runs.

use crate::error::RouteError;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// Argument type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Integer,
    String,
    Boolean,
    Array,
    Object,
    /// An object, or a list of objects.
    ObjectOrArray,
}

impl ArgKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArgKind::Integer => "integer",
            ArgKind::String => "string",
            ArgKind::Boolean => "boolean",
            ArgKind::Array => "array",
            ArgKind::Object => "object",
            ArgKind::ObjectOrArray => "object or array",
        }
    }

    /// JSON Schema `type` for OPTIONS responses.
    fn type_json(&self) -> Value {
        match self {
            ArgKind::ObjectOrArray => json!(["object", "array"]),
            kind => json!(kind.as_str()),
        }
    }
}

/// One declared argument.
#[derive(Debug, Clone)]
pub struct ArgSpec {
    pub name: &'static str,
    pub kind: ArgKind,
    pub required: bool,
    pub default: Option<Value>,
    /// Allowed values for string arguments; empty allows anything.
    pub one_of: Vec<&'static str>,
    /// Lower bound for integer arguments.
    pub minimum: Option<i64>,
    pub description: &'static str,
}

impl ArgSpec {
    fn new(name: &'static str, kind: ArgKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            default: None,
            one_of: Vec::new(),
            minimum: None,
            description: "",
        }
    }

    pub fn integer(name: &'static str) -> Self {
        Self::new(name, ArgKind::Integer)
    }

    pub fn string(name: &'static str) -> Self {
        Self::new(name, ArgKind::String)
    }

    pub fn boolean(name: &'static str) -> Self {
        Self::new(name, ArgKind::Boolean)
    }

    pub fn array(name: &'static str) -> Self {
        Self::new(name, ArgKind::Array)
    }

    pub fn object(name: &'static str) -> Self {
        Self::new(name, ArgKind::Object)
    }

    pub fn object_or_array(name: &'static str) -> Self {
        Self::new(name, ArgKind::ObjectOrArray)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn minimum(mut self, minimum: i64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    pub fn one_of(mut self, values: &[&'static str]) -> Self {
        self.one_of = values.to_vec();
        self
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Coerce a raw value to this argument's type.
    fn coerce(&self, raw: Value) -> Result<Value, String> {
        let value = match (self.kind, raw) {
            (ArgKind::Integer, Value::Number(n)) => n
                .as_i64()
                .map(Value::from)
                .ok_or_else(|| "is not of type integer".to_string())?,
            (ArgKind::Integer, Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| "is not of type integer".to_string())?,
            (ArgKind::String, Value::String(s)) => Value::String(s),
            (ArgKind::Boolean, Value::Bool(b)) => Value::Bool(b),
            (ArgKind::Boolean, Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Value::Bool(true),
                "false" | "0" | "no" | "" => Value::Bool(false),
                _ => return Err("is not of type boolean".to_string()),
            },
            (ArgKind::Boolean, Value::Number(n)) => match n.as_i64() {
                Some(0) => Value::Bool(false),
                Some(1) => Value::Bool(true),
                _ => return Err("is not of type boolean".to_string()),
            },
            (ArgKind::Array, Value::Array(items)) => Value::Array(items),
            (ArgKind::Array, Value::String(s)) => Value::Array(
                s.split(',')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(|part| Value::String(part.to_string()))
                    .collect(),
            ),
            (ArgKind::Object | ArgKind::ObjectOrArray, Value::Object(map)) => Value::Object(map),
            (ArgKind::ObjectOrArray, Value::Array(items)) => Value::Array(items),
            (kind, _) => return Err(format!("is not of type {}", kind.as_str())),
        };

        if let (Some(min), Some(n)) = (self.minimum, value.as_i64()) {
            if n < min {
                return Err(format!("must be greater than or equal to {}", min));
            }
        }
        if !self.one_of.is_empty() {
            if let Some(s) = value.as_str() {
                if !self.one_of.contains(&s) {
                    return Err(format!("is not one of {}", self.one_of.join(", ")));
                }
            }
        }
        Ok(value)
    }

    /// JSON description used in OPTIONS responses.
    pub fn describe_json(&self) -> Value {
        let mut out = json!({
            "type": self.kind.type_json(),
            "required": self.required,
            "description": self.description,
        });
        if let Some(default) = &self.default {
            out["default"] = default.clone();
        }
        if let Some(min) = self.minimum {
            out["minimum"] = json!(min);
        }
        if !self.one_of.is_empty() {
            out["enum"] = json!(self.one_of);
        }
        out
    }
}

/// The declared arguments of a route.
#[derive(Debug, Clone, Default)]
pub struct ArgSchema {
    specs: Vec<ArgSpec>,
}

impl ArgSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, spec: ArgSpec) -> Self {
        self.specs.push(spec);
        self
    }

    pub fn specs(&self) -> &[ArgSpec] {
        &self.specs
    }

    /// Check and coerce raw arguments.
    ///
    /// Missing required arguments are reported before type errors; every
    /// offending field is listed in the error's params. Undeclared arguments
    /// are dropped.
    pub fn validate(&self, mut raw: Map<String, Value>) -> Result<Args, RouteError> {
        let mut values = BTreeMap::new();
        let mut missing = Vec::new();
        let mut invalid = BTreeMap::new();

        for spec in &self.specs {
            match raw.remove(spec.name) {
                Some(Value::Null) | None => {
                    if spec.required {
                        missing.push(spec.name);
                    } else if let Some(default) = &spec.default {
                        values.insert(spec.name.to_string(), default.clone());
                    }
                }
                Some(value) => match spec.coerce(value) {
                    Ok(value) => {
                        values.insert(spec.name.to_string(), value);
                    }
                    Err(reason) => {
                        invalid.insert(spec.name.to_string(), format!("{} {}", spec.name, reason));
                    }
                },
            }
        }

        if !missing.is_empty() {
            return Err(RouteError::missing_params(missing));
        }
        if !invalid.is_empty() {
            return Err(RouteError::invalid_params(invalid));
        }
        Ok(Args { values })
    }

    /// JSON description of every argument, keyed by name.
    pub fn describe_json(&self) -> Value {
        let map: Map<String, Value> = self
            .specs
            .iter()
            .map(|spec| (spec.name.to_string(), spec.describe_json()))
            .collect();
        Value::Object(map)
    }
}

/// Validated, coerced arguments.
#[derive(Debug, Clone, Default)]
pub struct Args {
    values: BTreeMap<String, Value>,
}

impl Args {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn array(&self, name: &str) -> &[Value] {
        self.get(name)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// A required integer argument.
    pub fn require_i64(&self, name: &str) -> Result<i64, RouteError> {
        self.i64(name)
            .ok_or_else(|| RouteError::missing_params([name]))
    }

    /// A required string argument.
    pub fn require_str(&self, name: &str) -> Result<&str, RouteError> {
        self.str(name)
            .ok_or_else(|| RouteError::missing_params([name]))
    }
}

/// Merge request inputs into one raw argument map.
///
/// Later sources never overwrite earlier ones: path, then body, then query.
pub fn merge_sources(
    path: &BTreeMap<String, String>,
    body: Option<Map<String, Value>>,
    query: &str,
) -> Map<String, Value> {
    let mut merged: Map<String, Value> = path
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();

    for (key, value) in body.into_iter().flatten() {
        merged.entry(key).or_insert(value);
    }

    for (key, value) in parse_query(query) {
        merged.entry(key).or_insert(value);
    }
    merged
}

/// Decode a query string. `a[]=1&a[]=2` and repeated keys become arrays.
pub fn parse_query(query: &str) -> Map<String, Value> {
    let mut out = Map::new();
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        let (key, is_list) = match key.strip_suffix("[]") {
            Some(stripped) => (stripped.to_string(), true),
            None => (key.to_string(), false),
        };
        let value = Value::String(value.into_owned());
        match out.get_mut(&key) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None if is_list => {
                out.insert(key, Value::Array(vec![value]));
            }
            None => {
                out.insert(key, value);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    fn select_rate_schema() -> ArgSchema {
        ArgSchema::new()
            .arg(ArgSpec::integer("package_id").required().minimum(0))
            .arg(ArgSpec::string("rate_id").required())
    }

    #[test]
    fn test_integer_strings_are_coerced() {
        let args = select_rate_schema()
            .validate(raw(json!({"package_id": "7", "rate_id": "free_shipping"})))
            .unwrap();
        assert_eq!(args.i64("package_id"), Some(7));
        assert_eq!(args.str("rate_id"), Some("free_shipping"));
    }

    #[test]
    fn test_missing_reported_before_invalid() {
        let err = select_rate_schema()
            .validate(raw(json!({"package_id": "seven"})))
            .unwrap_err();
        assert_eq!(err.code(), "missing_param");
        assert!(err.to_envelope()["data"]["params"]["rate_id"].is_string());
    }

    #[test]
    fn test_null_counts_as_missing() {
        let err = select_rate_schema()
            .validate(raw(json!({"package_id": 1, "rate_id": null})))
            .unwrap_err();
        assert_eq!(err.code(), "missing_param");
    }

    #[test]
    fn test_invalid_values_listed() {
        let err = select_rate_schema()
            .validate(raw(json!({"package_id": -1, "rate_id": ["a"]})))
            .unwrap_err();
        assert_eq!(err.code(), "invalid_param");
        let params = &err.to_envelope()["data"]["params"];
        assert!(params["package_id"].as_str().unwrap().contains("greater than"));
        assert!(params["rate_id"].as_str().unwrap().contains("string"));
    }

    #[test]
    fn test_defaults_and_booleans() {
        let schema = ArgSchema::new()
            .arg(ArgSpec::integer("quantity").default(json!(1)))
            .arg(ArgSpec::boolean("hide_empty").default(json!(false)))
            .arg(ArgSpec::array("exclude"));
        let args = schema
            .validate(raw(json!({"hide_empty": "true", "exclude": "3, 4"})))
            .unwrap();
        assert_eq!(args.i64("quantity"), Some(1));
        assert_eq!(args.bool("hide_empty"), Some(true));
        assert_eq!(args.array("exclude"), &[json!("3"), json!("4")]);
    }

    #[test]
    fn test_string_args_reject_numbers() {
        let err = select_rate_schema()
            .validate(raw(json!({"package_id": 0, "rate_id": 5})))
            .unwrap_err();
        assert_eq!(err.code(), "invalid_param");
        assert_eq!(
            err.to_envelope()["data"]["params"]["rate_id"],
            "rate_id is not of type string"
        );
    }

    #[test]
    fn test_object_or_array() {
        let schema = ArgSchema::new().arg(ArgSpec::object_or_array("payment_data"));
        let pairs = json!([{"key": "card", "value": "4242"}]);
        let args = schema.validate(raw(json!({"payment_data": pairs.clone()}))).unwrap();
        assert_eq!(args.get("payment_data"), Some(&pairs));
        assert!(schema.validate(raw(json!({"payment_data": {"card": "4242"}}))).is_ok());

        let err = schema.validate(raw(json!({"payment_data": "card=4242"}))).unwrap_err();
        assert_eq!(err.code(), "invalid_param");
        assert_eq!(schema.describe_json()["payment_data"]["type"], json!(["object", "array"]));
    }

    #[test]
    fn test_one_of() {
        let schema = ArgSchema::new().arg(ArgSpec::string("context").one_of(&["view", "edit"]));
        assert!(schema.validate(raw(json!({"context": "view"}))).is_ok());
        assert!(schema.validate(raw(json!({"context": "embed"}))).is_err());
    }

    #[test]
    fn test_merge_precedence() {
        let path = BTreeMap::from([("package_id".to_string(), "7".to_string())]);
        let body = raw(json!({"package_id": 9, "rate_id": "flat_rate"}));
        let merged = merge_sources(&path, Some(body), "rate_id=other&extra=1");

        assert_eq!(merged["package_id"], json!("7"));
        assert_eq!(merged["rate_id"], json!("flat_rate"));
        assert_eq!(merged["extra"], json!("1"));
    }

    #[test]
    fn test_query_lists() {
        let query = parse_query("exclude[]=1&exclude[]=2&tag=a&tag=b&name=caf%C3%A9+au+lait");
        assert_eq!(query["exclude"], json!(["1", "2"]));
        assert_eq!(query["tag"], json!(["a", "b"]));
        assert_eq!(query["name"], json!("café au lait"));
    }
}
