use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub document_id: i64,
    pub patient_id: i64,
    pub title: String,
    pub document_type: Option<String>,
    pub file_path: String,
    pub upload_date: String,
}
