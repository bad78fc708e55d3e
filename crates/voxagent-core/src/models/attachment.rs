use serde::{Deserialize, Serialize};

/// Response of `POST /attachments/upload-url`: where to PUT the bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlResponse {
    /// Storage key the bytes are written under
    pub key: String,
    /// Pre-signed URL accepting a raw PUT
    pub signed_url: String,
}

/// Body of `POST /attachments`, finalizing a transferred blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAttachmentRequest {
    pub key: String,
    pub file_name: String,
    pub file_size: u64,
    pub mime_type: String,
}

/// Response of `POST /attachments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentResponse {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_url_response_wire_names() {
        let parsed: UploadUrlResponse = serde_json::from_str(
            r#"{"key":"uploads/abc.pdf","signedUrl":"https://bucket.example.com/abc?sig=1"}"#,
        )
        .unwrap();
        assert_eq!(parsed.key, "uploads/abc.pdf");
        assert_eq!(parsed.signed_url, "https://bucket.example.com/abc?sig=1");
    }

    #[test]
    fn test_register_request_wire_names() {
        let request = RegisterAttachmentRequest {
            key: "uploads/abc.pdf".to_string(),
            file_name: "report.pdf".to_string(),
            file_size: 500_000,
            mime_type: "application/pdf".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "key": "uploads/abc.pdf",
                "fileName": "report.pdf",
                "fileSize": 500000,
                "mimeType": "application/pdf"
            })
        );
    }
}
