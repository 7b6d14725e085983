use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Liveness payload for `GET /health`.
#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl Health {
    pub fn now() -> Self {
        Self { status: "ok".into(), timestamp: Utc::now() }
    }
}

/// Payload for `GET /health/db`. `error` is only present when the
/// database did not answer.
#[derive(Serialize, Deserialize, Debug)]
pub struct DbHealth {
    pub status: String,
    pub database: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DbHealth {
    pub fn connected() -> Self {
        Self { status: "ok".into(), database: "connected".into(), error: None }
    }

    pub fn disconnected(error: impl Into<String>) -> Self {
        Self {
            status: "error".into(),
            database: "disconnected".into(),
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connected_omits_error_field() {
        let v = serde_json::to_value(DbHealth::connected()).unwrap();
        assert_eq!(v, serde_json::json!({"status": "ok", "database": "connected"}));
    }

    #[test]
    fn disconnected_carries_detail() {
        let v = serde_json::to_value(DbHealth::disconnected("connection refused")).unwrap();
        assert_eq!(v["status"], "error");
        assert_eq!(v["database"], "disconnected");
        assert_eq!(v["error"], "connection refused");
    }

    #[test]
    fn health_timestamp_is_rfc3339() {
        let v = serde_json::to_value(Health::now()).unwrap();
        let ts = v["timestamp"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(ts).is_ok());
    }
}
