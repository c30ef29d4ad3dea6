//! Field definitions — what the onboarding flow asks for, in what order, and
//! how each answer is checked.

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::model::FileReference;
use super::prompts;

/// Identifies one field of the onboarding form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKey {
    Name,
    Qualification,
    Phone,
    About,
    Skills,
    ProfilePhoto,
    Document,
}

impl FieldKey {
    /// Every key, in collection order.
    pub const ALL: [FieldKey; 7] = [
        Self::Name,
        Self::Qualification,
        Self::Phone,
        Self::About,
        Self::Skills,
        Self::ProfilePhoto,
        Self::Document,
    ];

    /// Wire name, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Qualification => "qualification",
            Self::Phone => "phone",
            Self::About => "about",
            Self::Skills => "skills",
            Self::ProfilePhoto => "profilePhoto",
            Self::Document => "document",
        }
    }

    /// Human-readable label used in the review summary and edit menu.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Qualification => "Qualification",
            Self::Phone => "Phone Number",
            Self::About => "About",
            Self::Skills => "Skills",
            Self::ProfilePhoto => "Profile Photo",
            Self::Document => "Document",
        }
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FieldKey {
    type Err = String;

    /// Accepts the wire name, a snake_case alias, or the label (any case).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|key| {
                key.as_str().eq_ignore_ascii_case(needle)
                    || key.label().eq_ignore_ascii_case(needle)
                    || key.as_str().to_ascii_lowercase() == needle.replace('_', "").to_ascii_lowercase()
            })
            .ok_or_else(|| format!("Unknown field: {}", s))
    }
}

/// Which kind of file an upload step accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFilter {
    Image,
    Pdf,
}

impl FileFilter {
    const IMAGE_EXTENSIONS: &'static [&'static str] = &["jpg", "jpeg", "png", "gif", "webp"];

    /// Whether a selected file satisfies this filter, by MIME type when known,
    /// otherwise by file extension.
    pub fn accepts(&self, file: &FileReference) -> bool {
        if let Some(mime) = file.mime.as_deref() {
            return match self {
                Self::Image => mime.starts_with("image/"),
                Self::Pdf => mime == "application/pdf",
            };
        }
        let ext = file.extension().unwrap_or_default();
        match self {
            Self::Image => Self::IMAGE_EXTENSIONS.contains(&ext.as_str()),
            Self::Pdf => ext == "pdf",
        }
    }

    /// Best-effort MIME type for a file extension, if it belongs to this filter.
    pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some("image/jpeg"),
            "png" => Some("image/png"),
            "gif" => Some("image/gif"),
            "webp" => Some("image/webp"),
            "pdf" => Some("application/pdf"),
            _ => None,
        }
    }
}

impl std::fmt::Display for FileFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Pdf => write!(f, "pdf"),
        }
    }
}

/// How a field is answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text.
    Text,
    /// One of a fixed list of options, matched exactly.
    Choice(Vec<String>),
    /// A file from the file-selection capability. Free text never satisfies it.
    File(FileFilter),
}

/// A format check applied to text answers.
#[derive(Debug, Clone)]
pub struct Validator {
    pattern: Regex,
    message: String,
}

impl Validator {
    pub fn new(pattern: Regex, message: impl Into<String>) -> Self {
        Self {
            pattern,
            message: message.into(),
        }
    }

    pub fn is_valid(&self, input: &str) -> bool {
        self.pattern.is_match(input)
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A submitted answer: typed text, or a file handed back by the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Text(String),
    File(FileReference),
}

/// Static description of one form field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub key: FieldKey,
    pub prompt: String,
    /// Prompt used when the field is re-collected from the review screen.
    pub edit_prompt: String,
    pub kind: FieldKind,
    pub validator: Option<Validator>,
}

impl FieldSpec {
    pub fn text(key: FieldKey, prompt: &str, edit_prompt: &str) -> Self {
        Self {
            key,
            prompt: prompt.to_string(),
            edit_prompt: edit_prompt.to_string(),
            kind: FieldKind::Text,
            validator: None,
        }
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Check a non-empty submission against this field.
    ///
    /// Returns the corrective message on failure.
    pub fn check(&self, submission: &Submission) -> Result<(), String> {
        match (&self.kind, submission) {
            (FieldKind::File(filter), Submission::File(file)) => {
                if filter.accepts(file) {
                    Ok(())
                } else {
                    Err(prompts::wrong_file_type(*filter))
                }
            }
            (FieldKind::File(_), Submission::Text(_)) => Err(prompts::USE_UPLOAD.to_string()),
            (_, Submission::File(_)) => Err(prompts::INVALID_INPUT.to_string()),
            (FieldKind::Choice(choices), Submission::Text(text)) => {
                if choices.iter().any(|c| c == text) {
                    Ok(())
                } else {
                    Err(prompts::INVALID_CHOICE.to_string())
                }
            }
            (FieldKind::Text, Submission::Text(text)) => match &self.validator {
                Some(v) if !v.is_valid(text) => Err(v.message().to_string()),
                _ => Ok(()),
            },
        }
    }
}

/// Default qualification options.
pub const DEFAULT_QUALIFICATIONS: [&str; 5] = ["B.Tech", "B.E", "B.Sc", "M.Tech", "M.Sc"];

/// The ordered set of fields a flow collects.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    fields: Vec<FieldSpec>,
}

impl FieldSchema {
    /// The canonical sequence: name, qualification, phone, about, skills,
    /// profile photo, document.
    pub fn standard(qualifications: &[String]) -> Self {
        let letters = Regex::new(r"^[A-Za-z]+$").expect("static regex");
        let ten_digits = Regex::new(r"^\d{10}$").expect("static regex");

        let fields = vec![
            FieldSpec::text(
                FieldKey::Name,
                "Welcome! Please tell me your name.",
                "Please enter your new name:",
            )
            .with_validator(Validator::new(letters, "Name must contain only letters.")),
            FieldSpec {
                key: FieldKey::Qualification,
                prompt: "What is your qualification?".to_string(),
                edit_prompt: "Please enter your new qualification:".to_string(),
                kind: FieldKind::Choice(qualifications.to_vec()),
                validator: None,
            },
            FieldSpec::text(
                FieldKey::Phone,
                "Enter your phone number.",
                "Please enter your new phone number:",
            )
            .with_validator(Validator::new(
                ten_digits,
                "Please enter a valid 10-digit phone number.",
            )),
            FieldSpec::text(
                FieldKey::About,
                "Tell me a bit about yourself.",
                "Please enter your new information about yourself:",
            ),
            FieldSpec::text(
                FieldKey::Skills,
                "What are your skills?",
                "Please enter your new skills:",
            ),
            FieldSpec {
                key: FieldKey::ProfilePhoto,
                prompt: "Please upload a profile photo.".to_string(),
                edit_prompt: "Please upload your new profile photo.".to_string(),
                kind: FieldKind::File(FileFilter::Image),
                validator: None,
            },
            FieldSpec {
                key: FieldKey::Document,
                prompt: "Please upload a document (PDF only).".to_string(),
                edit_prompt: "Please upload your new document (PDF only).".to_string(),
                kind: FieldKind::File(FileFilter::Pdf),
                validator: None,
            },
        ];

        Self { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FieldSpec> {
        self.fields.get(index)
    }

    pub fn first(&self) -> &FieldSpec {
        &self.fields[0]
    }

    pub fn find(&self, key: FieldKey) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter()
    }
}

impl Default for FieldSchema {
    fn default() -> Self {
        let qualifications: Vec<String> =
            DEFAULT_QUALIFICATIONS.iter().map(|s| s.to_string()).collect();
        Self::standard(&qualifications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Submission {
        Submission::Text(s.to_string())
    }

    #[test]
    fn standard_schema_order() {
        let schema = FieldSchema::default();
        let keys: Vec<FieldKey> = schema.iter().map(|f| f.key).collect();
        assert_eq!(keys, FieldKey::ALL.to_vec());
    }

    #[test]
    fn name_accepts_letters_only() {
        let schema = FieldSchema::default();
        let name = schema.find(FieldKey::Name).unwrap();
        assert!(name.check(&text("Alice")).is_ok());
        assert_eq!(
            name.check(&text("Alice1")).unwrap_err(),
            "Name must contain only letters."
        );
        assert!(name.check(&text("Mary Jane")).is_err());
    }

    #[test]
    fn phone_requires_ten_digits() {
        let schema = FieldSchema::default();
        let phone = schema.find(FieldKey::Phone).unwrap();
        assert!(phone.check(&text("9876543210")).is_ok());
        assert_eq!(
            phone.check(&text("12345")).unwrap_err(),
            "Please enter a valid 10-digit phone number."
        );
        assert!(phone.check(&text("98765432101")).is_err());
        assert!(phone.check(&text("98765-4321")).is_err());
    }

    #[test]
    fn choice_is_exact_and_case_sensitive() {
        let schema = FieldSchema::default();
        let q = schema.find(FieldKey::Qualification).unwrap();
        assert!(q.check(&text("B.Tech")).is_ok());
        assert!(q.check(&text("btech")).is_err());
        assert!(q.check(&text("b.tech")).is_err());
        assert!(q.check(&text("PhD")).is_err());
    }

    #[test]
    fn file_fields_reject_text_and_wrong_types() {
        let schema = FieldSchema::default();
        let photo = schema.find(FieldKey::ProfilePhoto).unwrap();
        assert!(photo.check(&text("me.png")).is_err());
        assert!(
            photo
                .check(&Submission::File(FileReference::new("file:///tmp/me.png")))
                .is_ok()
        );
        assert!(
            photo
                .check(&Submission::File(FileReference::new("file:///tmp/cv.pdf")))
                .is_err()
        );

        let doc = schema.find(FieldKey::Document).unwrap();
        let pdf = FileReference::new("content://docs/42").with_mime("application/pdf");
        assert!(doc.check(&Submission::File(pdf)).is_ok());
    }

    #[test]
    fn text_fields_reject_files() {
        let schema = FieldSchema::default();
        let about = schema.find(FieldKey::About).unwrap();
        let file = FileReference::new("file:///tmp/me.png");
        assert!(about.check(&Submission::File(file)).is_err());
        assert!(about.check(&text("anything goes")).is_ok());
    }

    #[test]
    fn field_key_parsing() {
        assert_eq!("name".parse::<FieldKey>().unwrap(), FieldKey::Name);
        assert_eq!("profilePhoto".parse::<FieldKey>().unwrap(), FieldKey::ProfilePhoto);
        assert_eq!("profile_photo".parse::<FieldKey>().unwrap(), FieldKey::ProfilePhoto);
        assert_eq!("Phone Number".parse::<FieldKey>().unwrap(), FieldKey::Phone);
        assert!("email".parse::<FieldKey>().is_err());
    }

    #[test]
    fn display_matches_serde() {
        for key in FieldKey::ALL {
            let json = serde_json::to_string(&key).unwrap();
            assert_eq!(json, format!("\"{key}\""));
        }
    }
}
