use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_LATENCY, DEFAULT_SPEED};

/// Call-handling capabilities granted to an agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentTools {
    pub allow_hang_up: bool,
    pub allow_callback: bool,
    pub live_transfer: bool,
}

/// Agent configuration as submitted to `POST /agents` and `PUT /agents/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentData {
    pub name: String,
    pub call_type: String,
    pub language: String,
    pub voice: String,
    pub prompt: String,
    pub model: String,
    /// Response latency in seconds
    pub latency: f64,
    /// Speaking speed in percent
    pub speed: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_script: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_description: Option<String>,
    /// Remote identifiers of registered attachments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<AgentTools>,
}

impl Default for AgentData {
    fn default() -> Self {
        Self {
            name: String::new(),
            call_type: String::new(),
            language: String::new(),
            voice: String::new(),
            prompt: String::new(),
            model: String::new(),
            latency: DEFAULT_LATENCY,
            speed: DEFAULT_SPEED,
            description: None,
            call_script: None,
            service_description: None,
            attachments: None,
            tools: None,
        }
    }
}

impl AgentData {
    /// Wire names of required fields that are still empty, in form order.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("callType", &self.call_type),
            ("language", &self.language),
            ("voice", &self.voice),
            ("prompt", &self.prompt),
            ("model", &self.model),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    pub fn has_required_fields(&self) -> bool {
        self.missing_required_fields().is_empty()
    }

    /// Copy of this payload carrying the given attachment identifiers.
    pub fn with_attachments(&self, attachment_ids: Vec<String>) -> Self {
        Self {
            attachments: Some(attachment_ids),
            ..self.clone()
        }
    }
}

/// Agent as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    #[serde(flatten)]
    pub data: AgentData,
}

/// Recipient of a test call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCallData {
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCallResponse {
    pub success: bool,
    pub call_id: String,
    pub agent_id: String,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_agent() -> AgentData {
        AgentData {
            name: "Front desk".to_string(),
            call_type: "inbound".to_string(),
            language: "en".to_string(),
            voice: "v-1".to_string(),
            prompt: "p-1".to_string(),
            model: "m-1".to_string(),
            ..AgentData::default()
        }
    }

    #[test]
    fn test_default_tuning() {
        let data = AgentData::default();
        assert_eq!(data.latency, 0.5);
        assert_eq!(data.speed, 110.0);
    }

    #[test]
    fn test_missing_required_fields() {
        let mut data = complete_agent();
        assert!(data.has_required_fields());

        data.voice = "  ".to_string();
        data.model.clear();
        assert_eq!(data.missing_required_fields(), vec!["voice", "model"]);
        assert_eq!(AgentData::default().missing_required_fields().len(), 6);
    }

    #[test]
    fn test_serializes_camel_case_and_skips_absent() {
        let data = complete_agent().with_attachments(vec!["att-1".to_string()]);
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["callType"], "inbound");
        assert_eq!(value["attachments"], serde_json::json!(["att-1"]));
        assert!(value.get("callScript").is_none());
        assert!(value.get("tools").is_none());
    }

    #[test]
    fn test_agent_flattens_data() {
        let agent: Agent = serde_json::from_value(serde_json::json!({
            "id": "agent-1",
            "name": "Front desk",
            "callType": "inbound",
            "language": "en",
            "voice": "v-1",
            "prompt": "p-1",
            "model": "m-1",
            "latency": 0.8,
            "speed": 100,
            "tools": { "allowHangUp": true, "allowCallback": false, "liveTransfer": true }
        }))
        .unwrap();
        assert_eq!(agent.id, "agent-1");
        assert_eq!(agent.data.latency, 0.8);
        assert_eq!(agent.data.speed, 100.0);
        assert!(agent.data.tools.unwrap().allow_hang_up);
        assert!(agent.data.attachments.is_none());
    }

    #[test]
    fn test_test_call_data_wire_names() {
        let data = TestCallData {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            gender: "female".to_string(),
            phone_number: "+15551234567".to_string(),
        };
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["firstName"], "Ada");
        assert_eq!(value["phoneNumber"], "+15551234567");
    }
}
