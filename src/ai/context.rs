//! Supplementary context (RAG) that gets injected into the prompt
//! ahead of the user's message.

use serde::Serialize;

use crate::documents::{DocumentKind, read_uploaded_file};

pub const USER_CONTEXT_LABEL: &str = "Contexto do Usuário";

/// Wrap `text` in a labeled block separated by blank lines.
pub fn format_context(text: &str, label: &str) -> String {
    format!("\n\n{}:\n{}\n\n", label, text)
}

#[derive(Clone, Debug)]
pub enum RagSource {
    /// An uploaded document, extracted each time context is resolved
    File {
        kind: DocumentKind,
        name: String,
        bytes: Vec<u8>,
    },
    /// Text pasted directly by the user
    Text(String),
}

impl RagSource {
    /// Formatted context block for this source. Empty pasted text
    /// contributes nothing.
    pub fn to_context(&self) -> String {
        match self {
            RagSource::File { kind, name, bytes } => {
                let text = read_uploaded_file(*kind, bytes);
                format_context(&text, &format!("Contexto do arquivo {}: {}", kind, name))
            }
            RagSource::Text(text) if text.trim().is_empty() => String::new(),
            RagSource::Text(text) => format_context(text, USER_CONTEXT_LABEL),
        }
    }

    pub fn summary(&self) -> RagSourceSummary {
        match self {
            RagSource::File { kind, name, bytes } => RagSourceSummary::File {
                kind: *kind,
                name: name.clone(),
                size: bytes.len(),
            },
            RagSource::Text(text) => RagSourceSummary::Text {
                chars: text.chars().count(),
            },
        }
    }
}

/// What the shell gets to see about the configured source, without
/// the payload itself.
#[derive(Serialize, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RagSourceSummary {
    File {
        #[serde(rename = "document")]
        kind: DocumentKind,
        name: String,
        size: usize,
    },
    Text {
        chars: usize,
    },
}

#[derive(Clone, Debug, Default)]
pub struct RagSettings {
    pub enabled: bool,
    pub source: Option<RagSource>,
}

impl RagSettings {
    /// The context block to send along with the next message, or an
    /// empty string when RAG is off or nothing is configured.
    pub fn resolve(&self) -> String {
        match (&self.source, self.enabled) {
            (Some(source), true) => source.to_context(),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_context() {
        let out = format_context("coleta às 10h", "Contexto do Usuário");
        assert_eq!(out, "\n\nContexto do Usuário:\ncoleta às 10h\n\n");
    }

    #[test]
    fn test_format_context_keeps_label_and_text_verbatim() {
        let label = "Contexto do arquivo TXT: a {{b}}.txt";
        let text = "linha 1\n  linha 2 \t";
        let out = format_context(text, label);
        assert!(out.contains(label));
        assert!(out.contains(text));
    }

    #[test]
    fn test_resolve_disabled() {
        let settings = RagSettings {
            enabled: false,
            source: Some(RagSource::Text("algo".to_string())),
        };
        assert_eq!(settings.resolve(), "");
    }

    #[test]
    fn test_resolve_without_source() {
        let settings = RagSettings {
            enabled: true,
            source: None,
        };
        assert_eq!(settings.resolve(), "");
    }

    #[test]
    fn test_resolve_text() {
        let settings = RagSettings {
            enabled: true,
            source: Some(RagSource::Text("Moro no bairro Centro".to_string())),
        };
        assert_eq!(
            settings.resolve(),
            "\n\nContexto do Usuário:\nMoro no bairro Centro\n\n"
        );
    }

    #[test]
    fn test_resolve_blank_text() {
        let settings = RagSettings {
            enabled: true,
            source: Some(RagSource::Text("   ".to_string())),
        };
        assert_eq!(settings.resolve(), "");
    }

    #[test]
    fn test_resolve_file() {
        let settings = RagSettings {
            enabled: true,
            source: Some(RagSource::File {
                kind: DocumentKind::Txt,
                name: "rotas.txt".to_string(),
                bytes: b"rota norte".to_vec(),
            }),
        };
        assert_eq!(
            settings.resolve(),
            "\n\nContexto do arquivo TXT: rotas.txt:\nrota norte\n\n"
        );
    }

    #[test]
    fn test_resolve_malformed_csv_still_yields_context() {
        let source = RagSource::File {
            kind: DocumentKind::Csv,
            name: "ruim.csv".to_string(),
            bytes: b"a,b\n1,2,3\n".to_vec(),
        };
        let ctx = source.to_context();
        assert!(ctx.starts_with("\n\nContexto do arquivo CSV: ruim.csv:\nErro ao ler CSV:"));
    }
}
