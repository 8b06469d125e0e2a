use crate::error::FailureCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// Dismissible message shown once a submission or copy resolves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    /// Set for failures
    pub category: Option<FailureCategory>,
}

impl Notice {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Success,
            category: None,
        }
    }

    pub fn failure(title: impl Into<String>, category: FailureCategory, message: &str) -> Self {
        Self {
            title: title.into(),
            description: describe(category, message),
            severity: Severity::Error,
            category: Some(category),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// User-facing text for a failure category
fn describe(category: FailureCategory, message: &str) -> String {
    match category {
        FailureCategory::MissingCredential => "Add your Gemini API key before transcribing".to_owned(),
        FailureCategory::MissingAudioSource => "Please select an audio file".to_owned(),
        FailureCategory::RemoteFetchFailed => "The audio URL could not be downloaded".to_owned(),
        FailureCategory::EmptyTranscription => "No transcript was produced for this audio".to_owned(),
        FailureCategory::ProviderError => {
            "An error occurred during transcription. Please try again.".to_owned()
        }
        FailureCategory::ClipboardFailure => "Failed to copy transcript".to_owned(),
        FailureCategory::Network => "Could not reach the transcription server".to_owned(),
        FailureCategory::Other => message.to_owned(),
    }
}
