use serde::{Deserialize, Serialize};
use std::fmt;

/// The input type of a field.
///
/// Serialized as the bare lowercase name used in schema documents
/// (`"text"`, `"check"`, ...). Names this build does not know are kept
/// verbatim in [`FieldType::Other`] so documents written by newer admin
/// screens still load; such fields resolve as plain passthrough values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Text,
    Textarea,
    Wysiwyg,
    Check,
    Radio,
    Select,
    Relation,
    Image,
    File,
    Colorpicker,
    Datepicker,
    Boolean,
    Other(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Wysiwyg => "wysiwyg",
            Self::Check => "check",
            Self::Radio => "radio",
            Self::Select => "select",
            Self::Relation => "relation",
            Self::Image => "image",
            Self::File => "file",
            Self::Colorpicker => "colorpicker",
            Self::Datepicker => "datepicker",
            Self::Boolean => "boolean",
            Self::Other(name) => name,
        }
    }

    /// Values of this type go through the host's rich-content transform.
    pub fn is_rich_text(&self) -> bool {
        matches!(self, Self::Textarea | Self::Wysiwyg)
    }

    /// Types stored as a list even outside repeatable groups.
    pub fn is_inherently_multiple(&self) -> bool {
        matches!(self, Self::Check | Self::Relation)
    }
}

impl From<String> for FieldType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "text" => Self::Text,
            "textarea" => Self::Textarea,
            "wysiwyg" => Self::Wysiwyg,
            "check" => Self::Check,
            "radio" => Self::Radio,
            "select" => Self::Select,
            "relation" => Self::Relation,
            "image" => Self::Image,
            "file" => Self::File,
            "colorpicker" => Self::Colorpicker,
            "datepicker" => Self::Datepicker,
            "boolean" => Self::Boolean,
            _ => Self::Other(name),
        }
    }
}

impl From<&str> for FieldType {
    fn from(name: &str) -> Self {
        Self::from(name.to_string())
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single named, typed value slot defined by an administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub label: String,
    /// Scalar default, or a newline-delimited list for multi-choice fields.
    #[serde(default)]
    pub default: String,
    /// Newline-delimited option list for check/radio/select fields.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub choices: String,
    /// Explicit override; when absent the field type decides.
    #[serde(
        default,
        rename = "allow-multiple-data",
        skip_serializing_if = "Option::is_none"
    )]
    pub allow_multiple_data: Option<bool>,
    #[serde(default)]
    pub notes: String,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, field_type: impl Into<FieldType>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            label: String::new(),
            default: String::new(),
            choices: String::new(),
            allow_multiple_data: None,
            notes: String::new(),
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Text)
    }

    pub fn textarea(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Textarea)
    }

    pub fn wysiwyg(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Wysiwyg)
    }

    pub fn check(name: impl Into<String>, choices: &str) -> Self {
        Self::new(name, FieldType::Check).with_choices(choices)
    }

    pub fn relation(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Relation)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = default.into();
        self
    }

    pub fn with_choices(mut self, choices: impl Into<String>) -> Self {
        self.choices = choices.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_multiple_data(mut self, allow: bool) -> Self {
        self.allow_multiple_data = Some(allow);
        self
    }

    /// Whether one entity can hold more than one value for this field.
    pub fn allows_multiple_data(&self) -> bool {
        self.allow_multiple_data
            .unwrap_or_else(|| self.field_type.is_inherently_multiple())
    }

    /// The label shown next to the input; falls back to the field name.
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.name
        } else {
            &self.label
        }
    }

    pub fn has_default(&self) -> bool {
        !self.default.is_empty()
    }

    /// The default as a choice list (one entry per non-blank line).
    pub fn default_choices(&self) -> Vec<String> {
        choices_eol_to_array(&self.default)
    }
}

/// Splits a newline-delimited choice list, accepting `\r\n`, `\r` and `\n`.
///
/// Entries are trimmed and blank lines dropped.
pub fn choices_eol_to_array(choices: &str) -> Vec<String> {
    choices
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
