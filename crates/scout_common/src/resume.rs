//! Resume intake - one-shot profile extraction plus follow-up chat
//!
//! The uploaded file type is sniffed from its first KiB rather than trusted
//! from the file name. PDF and DOCX are supported; anything else is refused.

use crate::catalog::ProfileField;
use crate::llm_client::{LanguageOracle, LlmError};
use crate::record::CandidateRecord;
use serde::{Deserialize, Serialize};
use std::io::{Cursor, Read};

const SNIFF_LEN: usize = 1024;

/// Resume text beyond this is cut before it goes into a prompt
pub const MAX_RESUME_CHARS: usize = 12_000;

#[derive(Debug, thiserror::Error)]
pub enum ResumeError {
    #[error("unsupported file type ({0}); please upload a PDF or Word (.docx) document")]
    UnsupportedType(String),

    #[error("could not read PDF: {0}")]
    Pdf(String),

    #[error("could not read Word document: {0}")]
    Docx(String),

    #[error("no text found in the document")]
    NoText,

    #[error("could not extract profile from resume: {0}")]
    Extraction(String),

    #[error("language model call failed: {0}")]
    Oracle(#[from] LlmError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    pub fn mime(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "application/pdf",
            DocumentKind::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

/// Identify the document from its leading bytes
pub fn sniff(bytes: &[u8]) -> Result<DocumentKind, ResumeError> {
    let head = &bytes[..bytes.len().min(SNIFF_LEN)];

    if head.starts_with(b"%PDF-") {
        return Ok(DocumentKind::Pdf);
    }

    if head.starts_with(b"PK\x03\x04") {
        let is_word = contains(head, b"word/") || contains(head, b"[Content_Types].xml");
        return if is_word {
            Ok(DocumentKind::Docx)
        } else {
            Err(ResumeError::UnsupportedType("application/zip".to_string()))
        };
    }

    let guess = if head.is_empty() {
        "empty file"
    } else if std::str::from_utf8(head).is_ok() {
        "text/plain"
    } else {
        "application/octet-stream"
    };
    Err(ResumeError::UnsupportedType(guess.to_string()))
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Extract plain text from an uploaded resume
pub fn extract_text(bytes: &[u8]) -> Result<String, ResumeError> {
    let kind = sniff(bytes)?;
    tracing::debug!(mime = kind.mime(), size = bytes.len(), "extracting resume text");

    let text = match kind {
        DocumentKind::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ResumeError::Pdf(e.to_string()))?,
        DocumentKind::Docx => docx_text(bytes)?,
    };

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(ResumeError::NoText);
    }
    Ok(text)
}

/// Paragraph text from `word/document.xml`
fn docx_text(bytes: &[u8]) -> Result<String, ResumeError> {
    use quick_xml::events::Event;

    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| ResumeError::Docx(e.to_string()))?;

    let mut doc_xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|_| ResumeError::Docx("missing word/document.xml".to_string()))?
        .read_to_string(&mut doc_xml)
        .map_err(|e| ResumeError::Docx(e.to_string()))?;

    let mut reader = quick_xml::Reader::from_str(&doc_xml);
    let mut output = String::new();
    let mut paragraph = String::new();
    let mut in_text = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"p" => paragraph.clear(),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"tab" => paragraph.push('\t'),
                b"br" => paragraph.push('\n'),
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"p" => {
                    if !paragraph.is_empty() {
                        output.push_str(&paragraph);
                        output.push('\n');
                    }
                }
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_text => {
                if let Ok(text) = e.unescape() {
                    paragraph.push_str(&text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ResumeError::Docx(format!("XML parse error: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    Ok(output)
}

fn clip(text: &str) -> &str {
    match text.char_indices().nth(MAX_RESUME_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Profile fields read off a resume
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub tech_stack: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl ResumeProfile {
    /// Prefill a candidate record; blank values are skipped
    pub fn into_record(self) -> CandidateRecord {
        let mut record = CandidateRecord::default();
        let values = [
            (ProfileField::Name, self.name),
            (ProfileField::Email, self.email),
            (ProfileField::Phone, self.phone),
            (ProfileField::Experience, self.experience),
            (ProfileField::Position, self.position),
            (ProfileField::Location, self.location),
            (ProfileField::TechStack, self.tech_stack),
        ];
        for (field, value) in values {
            if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
                record.set(field, v);
            }
        }
        if record.tech_stack.is_none() && !self.skills.is_empty() {
            record.set(ProfileField::TechStack, self.skills.join(", "));
        }
        record
    }
}

fn extraction_prompt(resume_text: &str) -> String {
    format!(
        "Extract the candidate's details from the resume below. \
         Respond with only a JSON object with these keys: \
         \"name\", \"email\", \"phone\", \"experience\" (years, or \"fresher\"), \
         \"position\" (most recent or desired job title), \"location\", \
         \"tech_stack\" (comma-separated technologies) and \"skills\" (array of strings). \
         Use null for anything the resume does not state.\n\nResume:\n{}",
        clip(resume_text)
    )
}

/// Parse the first `{` .. last `}` span of an oracle reply
pub fn parse_profile(reply: &str) -> Result<ResumeProfile, ResumeError> {
    let start = reply.find('{');
    let end = reply.rfind('}');
    let json = match (start, end) {
        (Some(s), Some(e)) if s < e => &reply[s..=e],
        _ => return Err(ResumeError::Extraction("no JSON object in reply".to_string())),
    };
    serde_json::from_str(json).map_err(|e| ResumeError::Extraction(e.to_string()))
}

pub fn extract_profile(
    oracle: &dyn LanguageOracle,
    resume_text: &str,
) -> Result<ResumeProfile, ResumeError> {
    let reply = oracle.complete(&extraction_prompt(resume_text))?;
    let profile = parse_profile(&reply)?;
    tracing::info!(skills = profile.skills.len(), "resume profile extracted");
    Ok(profile)
}

/// One question/answer exchange in the follow-up chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub question: String,
    pub answer: String,
}

/// Free-form chat grounded on the uploaded resume
#[derive(Debug, Clone)]
pub struct FollowUpChat {
    resume_text: String,
    history: Vec<Exchange>,
}

impl FollowUpChat {
    pub fn new(resume_text: impl Into<String>) -> Self {
        Self {
            resume_text: resume_text.into(),
            history: Vec::new(),
        }
    }

    pub fn history(&self) -> &[Exchange] {
        &self.history
    }

    fn prompt(&self, question: &str) -> String {
        let mut prompt = String::from(
            "You are the TalentScout Hiring Assistant. Answer the user's questions about the \
             candidate resume below. Be concise and only use facts from the resume.\n\nResume:\n",
        );
        prompt.push_str(clip(&self.resume_text));
        prompt.push_str("\n\n");
        for exchange in &self.history {
            prompt.push_str(&format!("User: {}\nAssistant: {}\n", exchange.question, exchange.answer));
        }
        prompt.push_str(&format!("User: {}\nAssistant:", question));
        prompt
    }

    /// Ask a question; the exchange is kept only if the oracle answers
    pub fn ask(&mut self, oracle: &dyn LanguageOracle, question: &str) -> Result<String, LlmError> {
        let answer = oracle.complete(&self.prompt(question))?.trim().to_string();
        self.history.push(Exchange {
            question: question.to_string(),
            answer: answer.clone(),
        });
        Ok(answer)
    }
}
