use crate::utils::error::ForwardError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Agent name → chore name → rating.
pub type RatingMatrix = BTreeMap<String, BTreeMap<String, i64>>;

/// Rating used when a submitted value is not an integer.
pub const NEUTRAL_RATING: i64 = 5;

pub const STATUS_ERROR: &str = "error";
pub const STATUS_PENDING: &str = "pending";
pub const STATUS_UNKNOWN: &str = "unknown";

pub const PENDING_MESSAGE: &str = "Web API integration coming soon. Received your input.";

/// Which per-pair rating, if any, the form collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingKind {
    None,
    Cost,
    #[default]
    Dislike,
}

impl RatingKind {
    /// Form field prefix and outbound JSON key, e.g. `dislike_values`.
    pub fn field_name(self) -> Option<&'static str> {
        match self {
            RatingKind::None => None,
            RatingKind::Cost => Some("cost_values"),
            RatingKind::Dislike => Some("dislike_values"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RatingKind::None => "none",
            RatingKind::Cost => "cost",
            RatingKind::Dislike => "dislike",
        }
    }

    pub fn requires_ratings(self) -> bool {
        self != RatingKind::None
    }

    /// What the ends of the 1..=10 scale mean for this kind of rating.
    pub fn scale_hint(self) -> Option<&'static str> {
        match self {
            RatingKind::None => None,
            RatingKind::Cost => Some("1 = Cheap, 10 = Costly"),
            RatingKind::Dislike => Some("1 = Don't mind, 10 = Hate it"),
        }
    }
}

impl fmt::Display for RatingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RatingKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(RatingKind::None),
            "cost" | "cost_values" => Ok(RatingKind::Cost),
            "dislike" | "dislike_values" => Ok(RatingKind::Dislike),
            other => Err(format!(
                "unknown rating mode '{}', expected one of: none, cost, dislike",
                other
            )),
        }
    }
}

/// Deployment flavour; development logs verbosely for humans, production logs JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_debug(self) -> bool {
        self == Environment::Development
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => f.write_str("development"),
            Environment::Production => f.write_str("production"),
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!(
                "unknown environment '{}', expected development or production",
                other
            )),
        }
    }
}

/// Decoded form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocationForm {
    pub agents: Vec<String>,
    pub chores: Vec<String>,
    /// `None` when the form does not collect ratings.
    pub ratings: Option<RatingMatrix>,
}

/// JSON body sent to `<calculator>/allocate`.
#[derive(Debug, Clone, Serialize)]
pub struct AllocationRequest<'a> {
    pub agents: &'a [String],
    pub chores: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_values: Option<&'a RatingMatrix>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dislike_values: Option<&'a RatingMatrix>,
}

impl<'a> AllocationRequest<'a> {
    pub fn from_form(form: &'a AllocationForm, kind: RatingKind) -> Self {
        let ratings = form.ratings.as_ref();
        Self {
            agents: &form.agents,
            chores: &form.chores,
            cost_values: ratings.filter(|_| kind == RatingKind::Cost),
            dislike_values: ratings.filter(|_| kind == RatingKind::Dislike),
        }
    }
}

/// What the page (or the JSON endpoint) shows for one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    pub status: String,
    pub message: String,
    pub agents_count: usize,
    pub chores_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_response: Option<serde_json::Value>,
}

impl AllocationResult {
    /// Passes the Calculator's own `status` and `message` through untouched.
    pub fn from_reply(form: &AllocationForm, reply: serde_json::Value) -> Self {
        let status = reply_field(&reply, "status").unwrap_or_else(|| STATUS_UNKNOWN.to_string());
        let message = reply_field(&reply, "message").unwrap_or_default();

        Self {
            status,
            message,
            agents_count: form.agents.len(),
            chores_count: form.chores.len(),
            api_response: Some(reply),
        }
    }

    pub fn from_error(form: &AllocationForm, error: ForwardError) -> Self {
        let message = error.to_string();
        let api_response = match error {
            ForwardError::Status { body, .. } => body,
            _ => None,
        };

        Self {
            status: STATUS_ERROR.to_string(),
            message,
            agents_count: form.agents.len(),
            chores_count: form.chores.len(),
            api_response,
        }
    }

    pub fn pending(form: &AllocationForm) -> Self {
        Self {
            status: STATUS_PENDING.to_string(),
            message: PENDING_MESSAGE.to_string(),
            agents_count: form.agents.len(),
            chores_count: form.chores.len(),
            api_response: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == STATUS_ERROR
    }
}

fn reply_field(reply: &serde_json::Value, key: &str) -> Option<String> {
    match reply.get(key)? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form() -> AllocationForm {
        AllocationForm {
            agents: vec!["Alice".to_string(), "Bob".to_string()],
            chores: vec!["Dishes".to_string()],
            ratings: None,
        }
    }

    #[test]
    fn test_rating_kind_from_str() {
        assert_eq!("cost".parse::<RatingKind>().unwrap(), RatingKind::Cost);
        assert_eq!("Dislike".parse::<RatingKind>().unwrap(), RatingKind::Dislike);
        assert_eq!("none".parse::<RatingKind>().unwrap(), RatingKind::None);
        assert!("sorta".parse::<RatingKind>().is_err());
        assert_eq!(RatingKind::default(), RatingKind::Dislike);
    }

    #[test]
    fn test_request_serializes_only_the_active_matrix() {
        let mut form = form();
        let mut inner = BTreeMap::new();
        inner.insert("Dishes".to_string(), 7);
        let mut matrix = RatingMatrix::new();
        matrix.insert("Alice".to_string(), inner);
        form.ratings = Some(matrix);

        let body = serde_json::to_value(AllocationRequest::from_form(&form, RatingKind::Cost)).unwrap();
        assert_eq!(
            body,
            json!({
                "agents": ["Alice", "Bob"],
                "chores": ["Dishes"],
                "cost_values": {"Alice": {"Dishes": 7}}
            })
        );

        let body = serde_json::to_value(AllocationRequest::from_form(&form, RatingKind::None)).unwrap();
        assert!(body.get("cost_values").is_none());
        assert!(body.get("dislike_values").is_none());
    }

    #[test]
    fn test_from_reply_defaults() {
        let result = AllocationResult::from_reply(&form(), json!({"allocation": {}}));
        assert_eq!(result.status, "unknown");
        assert_eq!(result.message, "");
        assert_eq!(result.agents_count, 2);
        assert_eq!(result.chores_count, 1);
        assert!(result.api_response.is_some());
    }

    #[test]
    fn test_from_reply_passes_status_through() {
        let result =
            AllocationResult::from_reply(&form(), json!({"status": "infeasible", "message": "no"}));
        assert_eq!(result.status, "infeasible");
        assert_eq!(result.message, "no");
        assert!(!result.is_error());
    }

    #[test]
    fn test_pending_result() {
        let result = AllocationResult::pending(&form());
        assert_eq!(result.status, "pending");
        assert_eq!(result.message, PENDING_MESSAGE);
        assert!(result.api_response.is_none());
    }
}
