use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::Document;

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub patient_id: i64,
    pub title: String,
    pub document_type: Option<String>,
    pub file_path: String,
}

pub fn insert_document(conn: &Connection, new: &NewDocument) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO document (patient_id, title, document_type, file_path)
         VALUES (?1, ?2, ?3, ?4)",
        params![new.patient_id, new.title, new.document_type, new.file_path],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Uploaded documents for one patient, most recent first.
pub fn fetch_for_patient(
    conn: &Connection,
    patient_id: i64,
) -> Result<Vec<Document>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT document_id, patient_id, title, document_type, file_path, upload_date
         FROM document WHERE patient_id = ?1 ORDER BY upload_date DESC, document_id DESC",
    )?;

    let rows = stmt.query_map(params![patient_id], |row| {
        Ok(Document {
            document_id: row.get(0)?,
            patient_id: row.get(1)?,
            title: row.get(2)?,
            document_type: row.get(3)?,
            file_path: row.get(4)?,
            upload_date: row.get(5)?,
        })
    })?;

    let mut documents = Vec::new();
    for row in rows {
        documents.push(row?);
    }
    Ok(documents)
}
