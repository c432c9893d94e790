use super::BusyFlag;
use anyhow::{Context, Result};
use chrono::Utc;
use kb_client::{
    ApiEnvelope, DeleteRequest, DeleteResponse, DocumentInput, Gateway, RequestResult,
};
use kb_store::Store;
use kb_types::{FileItem, FileStatus};
use serde_json::{json, Map, Value};
use std::path::Path;

/// A document staged for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub content: String,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let name = name.into();
        let content = content.into();
        Self {
            mime_type: guess_mime_type(&name).to_string(),
            size: content.len() as u64,
            name,
            content,
        }
    }

    /// Read a UTF-8 text file from disk.
    pub async fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let size = tokio::fs::metadata(path)
            .await
            .with_context(|| format!("Failed to stat {}", path.display()))?
            .len();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            mime_type: guess_mime_type(&name).to_string(),
            size,
            name,
            content,
        })
    }

    fn metadata(&self) -> Map<String, Value> {
        let mut metadata = Map::new();
        metadata.insert("filename".into(), json!(self.name));
        metadata.insert("size".into(), json!(self.size));
        metadata.insert("type".into(), json!(self.mime_type));
        metadata.insert("upload_date".into(), json!(Utc::now().to_rfc3339()));
        metadata
    }
}

/// MIME type from the file extension; unknown extensions are `text/plain`.
pub fn guess_mime_type(name: &str) -> &'static str {
    let extension = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("md") | Some("markdown") => "text/markdown",
        Some("json") => "application/json",
        Some("csv") => "text/csv",
        Some("html") | Some("htm") => "text/html",
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        _ => "text/plain",
    }
}

#[derive(Clone)]
pub struct FileController {
    gateway: Gateway,
    store: Store,
}

impl FileController {
    pub fn new(gateway: Gateway, store: Store) -> Self {
        Self { gateway, store }
    }

    pub async fn upload_paths<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<FileItem>> {
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            files.push(UploadFile::read(path).await?);
        }
        Ok(self.upload(files).await?)
    }

    /// Upload `files` in one request and mirror them into the store.
    ///
    /// Ids come from the response, index-aligned with `files`; a file the
    /// backend returned no id for gets a generated one.
    pub async fn upload(&self, files: Vec<UploadFile>) -> RequestResult<Vec<FileItem>> {
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let result = {
            let _uploading = BusyFlag::raise(&self.store, Store::set_is_uploading);
            self.store.set_upload_progress(0.0);
            self.upload_staged(files).await
        };

        if let Err(e) = &result {
            tracing::warn!(error = %e, "document upload failed");
        }
        result
    }

    async fn upload_staged(&self, files: Vec<UploadFile>) -> RequestResult<Vec<FileItem>> {
        let total = files.len();
        let mut input = DocumentInput {
            documents: Vec::with_capacity(total),
            metadatas: Some(Vec::with_capacity(total)),
        };

        for (staged, file) in files.iter().enumerate() {
            input.documents.push(file.content.clone());
            if let Some(metadatas) = input.metadatas.as_mut() {
                metadatas.push(file.metadata());
            }
            // Staging is the first half of the progress bar
            self.store
                .set_upload_progress((staged + 1) as f32 / total as f32 * 50.0);
        }

        let response = self
            .gateway
            .documents()
            .upload(&input)
            .await?
            .into_result("upload failed")?;

        let items: Vec<FileItem> = files
            .into_iter()
            .enumerate()
            .map(|(index, file)| {
                let id = response
                    .document_ids
                    .get(index)
                    .filter(|id| !id.is_empty())
                    .cloned()
                    .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
                FileItem::new(id, file.name, file.mime_type, file.size)
                    .with_status(FileStatus::Uploaded)
                    .with_content(file.content)
            })
            .collect();

        for item in &items {
            self.store.add_file(item.clone());
        }
        self.store.set_upload_progress(100.0);

        tracing::info!(count = response.count, "uploaded documents");
        Ok(items)
    }

    /// Delete one document. The local list only changes once the backend
    /// confirms.
    pub async fn delete(&self, file_id: &str) -> RequestResult<DeleteResponse> {
        let request = DeleteRequest {
            document_ids: vec![file_id.to_string()],
        };
        let response = self
            .gateway
            .documents()
            .delete(&request)
            .await
            .and_then(|r| r.into_result("delete failed"))
            .inspect_err(|e| tracing::warn!(file_id, error = %e, "document delete failed"))?;

        self.store.remove_file(file_id);
        Ok(response)
    }

    /// Case-insensitive filter over file names.
    pub fn filter(&self, term: &str) -> Vec<FileItem> {
        let term = term.to_lowercase();
        self.store.read(|s| {
            s.files
                .iter()
                .filter(|f| f.name.to_lowercase().contains(&term))
                .cloned()
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_mime_type() {
        assert_eq!(guess_mime_type("notes.TXT"), "text/plain");
        assert_eq!(guess_mime_type("README.md"), "text/markdown");
        assert_eq!(guess_mime_type("paper.pdf"), "application/pdf");
        assert_eq!(guess_mime_type("no_extension"), "text/plain");
    }

    #[test]
    fn test_upload_file_metadata() {
        let file = UploadFile::new("a.csv", "x,y\n1,2\n");
        let metadata = file.metadata();
        assert_eq!(metadata["filename"], "a.csv");
        assert_eq!(metadata["size"], 8);
        assert_eq!(metadata["type"], "text/csv");
        assert!(metadata.contains_key("upload_date"));
    }

    #[tokio::test]
    async fn test_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guide.md");
        tokio::fs::write(&path, "# Guide").await.unwrap();

        let file = UploadFile::read(&path).await.unwrap();
        assert_eq!(file.name, "guide.md");
        assert_eq!(file.size, 7);
        assert_eq!(file.mime_type, "text/markdown");
        assert_eq!(file.content, "# Guide");
    }
}
