//! Grounded prompt construction.
//!
//! Loads the RAG prompt template from the workspace (falling back to a
//! hardcoded default), renders it with Handlebars, and appends the retrieved
//! passages block.

use crate::types::{truncate_chars, RetrievedDoc};
use farmguru_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;
use std::path::Path;

/// Maximum characters of passage content included per document.
const MAX_DOC_CONTENT_CHARS: usize = 500;

/// Template used when the workspace does not provide one.
const DEFAULT_TEMPLATE: &str = r#"You are FarmGuru. Use ONLY the retrieved passages below (labeled [DOC1],[DOC2]...[DOCn]). Do NOT invent facts. If none of the passages support the user's question, reply exactly: "I don't know — please consult a local expert." Output must be strict JSON with fields: answer (short 1-2 sentences), confidence (0-1), actions (array of 1-3 concise actions), sources (array with title,url,snippet). For chemistry/chemical suggestions: do NOT provide dosages or prescriptive application guidance—only broad IPM steps and advise to consult local extension.
User question: {{question}}"#;

/// Load the RAG prompt template from `<workspace>/.farmguru/prompts/rag.hbs`.
///
/// Falls back to the built-in default when the file is missing or unreadable;
/// template provisioning is outside this module's control.
pub fn load_template(workspace: &Path) -> String {
    let template_file = workspace.join(".farmguru/prompts/rag.hbs");

    match std::fs::read_to_string(&template_file) {
        Ok(contents) => {
            tracing::debug!("Loaded prompt template from {:?}", template_file);
            contents
        }
        Err(e) => {
            tracing::debug!(
                "Prompt template {:?} not available ({}), using built-in default",
                template_file,
                e
            );
            DEFAULT_TEMPLATE.to_string()
        }
    }
}

/// List available prompt template names in the workspace.
pub fn list_templates(workspace: &Path) -> AppResult<Vec<String>> {
    let prompts_dir = workspace.join(".farmguru/prompts");

    if !prompts_dir.exists() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();

    for entry in walkdir::WalkDir::new(&prompts_dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("hbs") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
    }

    Ok(names)
}

/// Build the full prompt sent to the inference endpoint.
///
/// Renders the template with the user question, then appends a
/// `Retrieved docs:` block listing at most `max_docs` passages and a final
/// instruction to return only JSON.
pub fn build_prompt(
    template: &str,
    question: &str,
    docs: &[RetrievedDoc],
    max_docs: usize,
) -> AppResult<String> {
    let mut variables = HashMap::new();
    variables.insert("question".to_string(), question.to_string());

    let rendered = render_template(template, &variables)?;
    let docs_block = format_docs(docs, max_docs);

    Ok(format!(
        "{}\nRetrieved docs:\n{}\n\nReturn only JSON.",
        rendered, docs_block
    ))
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    let rendered = handlebars
        .render("prompt", &variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

    Ok(rendered)
}

/// Format retrieved documents as a labeled passage list.
///
/// Content is truncated per document to keep the prompt inside token limits.
fn format_docs(docs: &[RetrievedDoc], max_docs: usize) -> String {
    docs.iter()
        .take(max_docs)
        .enumerate()
        .map(|(i, doc)| {
            let title = doc.title.as_deref().unwrap_or("Unknown");
            let url = doc.source_url.as_deref().unwrap_or("No URL");
            let content = truncate_chars(doc.content_or_empty(), MAX_DOC_CONTENT_CHARS);

            format!("[DOC{}] Title: {}, URL: {}\n{}", i + 1, title, url, content)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
