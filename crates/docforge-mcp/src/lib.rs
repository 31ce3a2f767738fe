//! MCP server implementation for docforge.
//!
//! Exposes the document toolkit as MCP tools over a tool router. Every tool
//! returns a structured JSON result with a `success` flag; operational
//! failures come back as `success: false` payloads rather than protocol
//! errors, so one failed call never affects the next one.

use rmcp::handler::server::tool::{Parameters, ToolRouter};
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData, ServerHandler};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::future::Future;

use docforge_files::{delete_directory, delete_file, DeleteMode, FileOpError};
use docforge_model::{from_plain_text, parse, DocumentDescription, Section};
use docforge_ooxml::{compare, inspect, DocxEditor, DocxWriter, EditOperation};

const SERVER_NAME: &str = "docforge";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

const SERVER_INSTRUCTIONS: &str = r#"docforge provides MCP tools for Word document operations.

Workflow:
1. Create documents with `create_word_document` (plain text) or
   `create_formatted_word_document` (JSON description with a "sections" array).
2. Analyze structure with `read_word_document_structure` and diff two files
   with `compare_word_documents`.
3. Modify existing documents with `edit_word_document`.
4. Delete files with `delete_file` / `delete_directory`; both require the
   literal confirmation token "CORBEILLE" (recoverable) or
   "SUPPRESSION DÉFINITIVE" (permanent).

The formatted description uses a "sections" key (NOT "content"):
{"title": "...", "sections": [{"type": "heading", "level": 1, "text": "..."},
{"type": "paragraph", "text": "Body with **bold** spans"},
{"type": "table", "headers": ["A"], "rows": [["1"]]}]}"#;

// ---------------------------------------------------------------------------
// Tool inputs
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Debug, schemars::JsonSchema)]
pub struct CreateDocumentInput {
    #[schemars(description = "Path where to save the document")]
    pub filepath: String,
    #[schemars(description = "Plain text content for the document body")]
    pub content: String,
}

#[derive(Serialize, Deserialize, Debug, schemars::JsonSchema)]
pub struct CreateFormattedDocumentInput {
    #[schemars(description = "Path where to save the document")]
    pub filepath: String,
    #[schemars(
        description = "JSON string describing the document; must contain a \"sections\" array"
    )]
    pub document_data: String,
}

#[derive(Serialize, Deserialize, Debug, schemars::JsonSchema)]
pub struct FilepathInput {
    #[schemars(description = "Path to the Word document")]
    pub filepath: String,
}

#[derive(Serialize, Deserialize, Debug, schemars::JsonSchema)]
pub struct CompareDocumentsInput {
    #[schemars(description = "Path to the first Word document")]
    pub filepath1: String,
    #[schemars(description = "Path to the second Word document")]
    pub filepath2: String,
}

#[derive(Serialize, Deserialize, Debug, schemars::JsonSchema)]
pub struct EditDocumentInput {
    #[schemars(description = "Path to the Word document to edit")]
    pub filepath: String,
    #[schemars(
        description = "Ordered operations: {\"type\": \"add_paragraph\"|\"add_heading\"|\"edit_paragraph\"|\"delete_paragraph\", ...}"
    )]
    pub operations: Vec<Value>,
}

#[derive(Serialize, Deserialize, Debug, schemars::JsonSchema)]
pub struct ConvertTxtInput {
    #[schemars(description = "Path to the source text file")]
    pub source_path: String,
    #[schemars(description = "Path for the resulting Word document")]
    pub target_path: String,
}

#[derive(Serialize, Deserialize, Debug, schemars::JsonSchema)]
pub struct DeleteFileInput {
    #[schemars(description = "Path to the file to delete")]
    pub filepath: String,
    #[schemars(
        description = "Must be \"CORBEILLE\" (recoverable) or \"SUPPRESSION DÉFINITIVE\" (permanent)"
    )]
    pub confirm: String,
}

#[derive(Serialize, Deserialize, Debug, schemars::JsonSchema)]
pub struct DeleteDirectoryInput {
    #[schemars(description = "Path to the directory to delete (must be empty)")]
    pub dirpath: String,
    #[schemars(
        description = "Must be \"CORBEILLE\" (recoverable) or \"SUPPRESSION DÉFINITIVE\" (permanent)"
    )]
    pub confirm: String,
}

// ---------------------------------------------------------------------------
// Result helpers
// ---------------------------------------------------------------------------

fn success(mut payload: Value) -> Result<CallToolResult, ErrorData> {
    if let Some(obj) = payload.as_object_mut() {
        obj.insert("success".to_string(), Value::Bool(true));
    }
    Ok(CallToolResult::success(vec![Content::json(payload)?]))
}

fn failure(error: impl std::fmt::Display, extra: Value) -> Result<CallToolResult, ErrorData> {
    let mut payload = extra;
    if let Some(obj) = payload.as_object_mut() {
        obj.insert("success".to_string(), Value::Bool(false));
        obj.insert("error".to_string(), Value::String(error.to_string()));
    }
    tracing::warn!("tool call failed: {error}");
    Ok(CallToolResult::success(vec![Content::json(payload)?]))
}

/// MCP server exposing the docforge tool surface.
#[derive(Clone)]
pub struct DocforgeServer {
    tool_router: ToolRouter<Self>,
}

impl Default for DocforgeServer {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct VersionInfo {
    name: &'static str,
    version: &'static str,
}

#[tool_router]
impl DocforgeServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Get the docforge server name and version.")]
    async fn version(&self) -> Result<CallToolResult, ErrorData> {
        let payload = VersionInfo {
            name: SERVER_NAME,
            version: SERVER_VERSION,
        };
        Ok(CallToolResult::success(vec![Content::json(payload)?]))
    }

    #[tool(description = "Create a new Word document with the provided plain text content.")]
    async fn create_word_document(
        &self,
        params: Parameters<CreateDocumentInput>,
    ) -> Result<CallToolResult, ErrorData> {
        let input = params.0;
        let mut description = DocumentDescription::new();
        description.push(Section::Paragraph {
            text: input.content,
            bold: false,
            italic: false,
            color: None,
            alignment: Default::default(),
            font_size: 11,
            space_after: 6,
        });
        match DocxWriter::render_to_path(&description, &input.filepath) {
            Ok(()) => success(json!({
                "message": "Successfully created Word document",
                "filepath": input.filepath,
            })),
            Err(e) => failure(e, json!({ "filepath": null })),
        }
    }

    #[tool(
        description = "Create a formatted Word document from a JSON description. The JSON must \
                       use a \"sections\" array (NOT \"content\") with typed sections: heading, \
                       paragraph, bullet_list, numbered_list, table, key_value_table, \
                       page_break, spacer."
    )]
    async fn create_formatted_word_document(
        &self,
        params: Parameters<CreateFormattedDocumentInput>,
    ) -> Result<CallToolResult, ErrorData> {
        let input = params.0;
        let description = match parse(&input.document_data) {
            Ok(description) => description,
            Err(e) => return failure(e, json!({ "filepath": null })),
        };
        match DocxWriter::render_to_path(&description, &input.filepath) {
            Ok(()) => success(json!({
                "message": "Successfully created formatted Word document",
                "filepath": input.filepath,
            })),
            Err(e) => failure(e, json!({ "filepath": null })),
        }
    }

    #[tool(
        description = "Read the structure of a Word document: table dimensions, column widths, \
                       row heights, paragraph count, and header/footer presence."
    )]
    async fn read_word_document_structure(
        &self,
        params: Parameters<FilepathInput>,
    ) -> Result<CallToolResult, ErrorData> {
        let input = params.0;
        match inspect(&input.filepath) {
            Ok(fingerprint) => success(json!({
                "filepath": input.filepath,
                "table_count": fingerprint.table_count,
                "tables": fingerprint.tables,
                "paragraph_count": fingerprint.paragraph_count,
                "has_header": fingerprint.has_header,
                "has_footer": fingerprint.has_footer,
            })),
            Err(e) => failure(e, json!({ "filepath": input.filepath })),
        }
    }

    #[tool(
        description = "Compare the structure of two Word documents, reporting every mismatched \
                       field (table layout, paragraph count, header/footer presence)."
    )]
    async fn compare_word_documents(
        &self,
        params: Parameters<CompareDocumentsInput>,
    ) -> Result<CallToolResult, ErrorData> {
        let input = params.0;
        let fp1 = match inspect(&input.filepath1) {
            Ok(fp) => fp,
            Err(e) => return failure(e, json!({ "filepath": input.filepath1 })),
        };
        let fp2 = match inspect(&input.filepath2) {
            Ok(fp) => fp,
            Err(e) => return failure(e, json!({ "filepath": input.filepath2 })),
        };
        let result = compare(&fp1, &fp2);
        success(json!({
            "filepath1": input.filepath1,
            "filepath2": input.filepath2,
            "is_identical": result.is_identical,
            "differences": result.differences,
            "summary": result.summary(),
        }))
    }

    #[tool(
        description = "Edit an existing Word document with ordered paragraph operations: \
                       add_paragraph {text}, add_heading {text, level}, edit_paragraph \
                       {index, text}, delete_paragraph {index}."
    )]
    async fn edit_word_document(
        &self,
        params: Parameters<EditDocumentInput>,
    ) -> Result<CallToolResult, ErrorData> {
        let input = params.0;
        let mut operations = Vec::with_capacity(input.operations.len());
        for (i, raw) in input.operations.into_iter().enumerate() {
            match serde_json::from_value::<EditOperation>(raw) {
                Ok(op) => operations.push(op),
                Err(e) => {
                    return failure(
                        format!("invalid operation {i}: {e}"),
                        json!({ "filepath": input.filepath }),
                    )
                }
            }
        }

        let result = DocxEditor::open(&input.filepath)
            .and_then(|mut editor| {
                editor.apply_all(&operations)?;
                editor.save()
            });
        match result {
            Ok(()) => success(json!({
                "message": "Successfully edited Word document",
                "filepath": input.filepath,
            })),
            Err(e) => failure(e, json!({ "filepath": input.filepath })),
        }
    }

    #[tool(description = "Convert a plain text file to a Word document, one paragraph per line.")]
    async fn convert_txt_to_word(
        &self,
        params: Parameters<ConvertTxtInput>,
    ) -> Result<CallToolResult, ErrorData> {
        let input = params.0;
        let content = match std::fs::read_to_string(&input.source_path) {
            Ok(content) => content,
            Err(e) => {
                return failure(
                    format!("failed to read {}: {e}", input.source_path),
                    json!({ "filepath": null }),
                )
            }
        };
        let description = from_plain_text(&content);
        match DocxWriter::render_to_path(&description, &input.target_path) {
            Ok(()) => success(json!({
                "message": "Successfully converted text to Word document",
                "filepath": input.target_path,
            })),
            Err(e) => failure(e, json!({ "filepath": null })),
        }
    }

    #[tool(
        description = "Delete a file. Requires confirm = \"CORBEILLE\" (send to trash, \
                       recoverable) or \"SUPPRESSION DÉFINITIVE\" (permanent, irreversible)."
    )]
    async fn delete_file(
        &self,
        params: Parameters<DeleteFileInput>,
    ) -> Result<CallToolResult, ErrorData> {
        let input = params.0;
        let Some(mode) = DeleteMode::parse(&input.confirm) else {
            return failure(
                FileOpError::InvalidConfirmation,
                json!({ "filepath": input.filepath, "deleted": false }),
            );
        };
        match delete_file(&input.filepath, mode) {
            Ok(report) => success(json!({
                "message": format!("Deleted {} ({} bytes)", report.path, report.size),
                "filepath": report.path,
                "deleted": true,
                "method": report.method,
            })),
            Err(e) => failure(e, json!({ "filepath": input.filepath, "deleted": false })),
        }
    }

    #[tool(
        description = "Delete an empty directory. Refuses non-empty directories and reports the \
                       item count. Requires confirm = \"CORBEILLE\" or \
                       \"SUPPRESSION DÉFINITIVE\"."
    )]
    async fn delete_directory(
        &self,
        params: Parameters<DeleteDirectoryInput>,
    ) -> Result<CallToolResult, ErrorData> {
        let input = params.0;
        let Some(mode) = DeleteMode::parse(&input.confirm) else {
            return failure(
                FileOpError::InvalidConfirmation,
                json!({ "dirpath": input.dirpath, "deleted": false }),
            );
        };
        match delete_directory(&input.dirpath, mode) {
            Ok(report) => success(json!({
                "message": format!("Deleted directory {}", report.path),
                "dirpath": report.path,
                "deleted": true,
                "method": report.method,
            })),
            Err(e) => failure(e, json!({ "dirpath": input.dirpath, "deleted": false })),
        }
    }
}

#[tool_handler]
impl ServerHandler for DocforgeServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_payload_gets_flag() {
        assert!(success(json!({"filepath": "a.docx"})).is_ok());
        assert!(failure("boom", json!({"filepath": "a.docx"})).is_ok());
    }

    #[test]
    fn server_info_advertises_tools() {
        let info = DocforgeServer::new().get_info();
        assert!(info.capabilities.tools.is_some());
        assert_eq!(info.instructions.as_deref().map(|s| s.contains("sections")), Some(true));
    }

    #[test]
    fn server_name_and_version_are_set() {
        assert_eq!(SERVER_NAME, "docforge");
        assert!(!SERVER_VERSION.is_empty());
    }
}
