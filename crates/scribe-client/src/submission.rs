//! Single-submission state machine
//!
//! Every transition goes through [`reduce`], which returns the next state and
//! the notice to show, if any. [`SubmissionFlow`] owns the current state and
//! performs the network call between the `Submit` event and its resolution.

use std::sync::{Mutex, PoisonError};

use crate::client::ScribeClient;
use crate::clipboard::Clipboard;
use crate::error::{ClientError, FailureCategory, Result};
use crate::notice::Notice;
use crate::types::AudioInput;

/// How the last submission ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure {
        category: FailureCategory,
        message: String,
    },
}

/// Submission state. The transcript on display travels through every state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting {
        transcript: Option<String>,
    },
    Resolved {
        transcript: Option<String>,
        outcome: Outcome,
    },
    /// Resolution dismissed; the transcript stays visible
    Dismissed {
        transcript: Option<String>,
    },
}

impl SubmissionState {
    pub fn transcript(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Submitting { transcript }
            | Self::Resolved { transcript, .. }
            | Self::Dismissed { transcript } => transcript.as_deref(),
        }
    }

    pub const fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting { .. })
    }
}

#[derive(Debug, Clone)]
pub enum SubmissionEvent {
    Submit,
    Succeeded { transcript: String },
    Failed { category: FailureCategory, message: String },
    Dismiss,
}

/// Compute the next state
///
/// Events that do not apply to the current state leave it unchanged. A
/// failure keeps whatever transcript was already displayed.
pub fn reduce(state: &SubmissionState, event: SubmissionEvent) -> (SubmissionState, Option<Notice>) {
    use SubmissionEvent::{Dismiss, Failed, Submit, Succeeded};
    use SubmissionState::{Dismissed, Idle, Resolved, Submitting};

    match (state, event) {
        (Idle, Submit) => (Submitting { transcript: None }, None),
        (Resolved { transcript, .. } | Dismissed { transcript }, Submit) => (
            Submitting {
                transcript: transcript.clone(),
            },
            None,
        ),

        (Submitting { .. }, Succeeded { transcript }) => (
            Resolved {
                transcript: Some(transcript),
                outcome: Outcome::Success,
            },
            Some(Notice::success(
                "Transcription Complete",
                "Your audio has been transcribed.",
            )),
        ),
        (Submitting { transcript }, Failed { category, message }) => {
            let notice = Notice::failure("Transcription Failed", category, &message);
            (
                Resolved {
                    transcript: transcript.clone(),
                    outcome: Outcome::Failure { category, message },
                },
                Some(notice),
            )
        }

        (Resolved { transcript, .. }, Dismiss) => (
            Dismissed {
                transcript: transcript.clone(),
            },
            None,
        ),

        (state, _) => (state.clone(), None),
    }
}

/// Drives submissions against the relay, one at a time
#[derive(Debug)]
pub struct SubmissionFlow {
    client: ScribeClient,
    state: Mutex<SubmissionState>,
}

impl SubmissionFlow {
    pub fn new(client: ScribeClient) -> Self {
        Self {
            client,
            state: Mutex::new(SubmissionState::default()),
        }
    }

    pub const fn client(&self) -> &ScribeClient {
        &self.client
    }

    pub fn state(&self) -> SubmissionState {
        self.lock().clone()
    }

    pub fn transcript(&self) -> Option<String> {
        self.lock().transcript().map(str::to_owned)
    }

    /// Submit audio and wait for the relay to answer
    ///
    /// A missing input is reported as a notice without leaving the current
    /// state. Relay failures resolve the submission and come back as an error
    /// notice, not as `Err`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::SubmissionInFlight`] if another submission has
    /// not resolved yet
    pub async fn submit(&self, input: Option<&AudioInput>) -> Result<Notice> {
        let Some(input) = input else {
            return Ok(Notice::failure(
                "Error",
                FailureCategory::MissingAudioSource,
                "",
            ));
        };

        let in_flight = InFlight::begin(self)?;

        let event = match self.client.transcribe(input).await {
            Ok(result) => SubmissionEvent::Succeeded {
                transcript: result.transcript,
            },
            Err(e) => {
                tracing::warn!(error = %e, "transcription failed");
                SubmissionEvent::Failed {
                    category: e.category(),
                    message: e.to_string(),
                }
            }
        };

        in_flight
            .resolve(event)
            .ok_or_else(|| ClientError::Parse("submission resolved without a notice".to_owned()))
    }

    /// Dismiss the last resolution notice
    pub fn dismiss(&self) {
        self.apply(SubmissionEvent::Dismiss);
    }

    /// Copy the displayed transcript
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Clipboard`] if there is nothing to copy or the
    /// clipboard rejects the text
    pub fn copy_transcript(&self, clipboard: &mut dyn Clipboard) -> Result<Notice> {
        let transcript = self
            .transcript()
            .ok_or_else(|| ClientError::Clipboard("no transcript to copy".to_owned()))?;

        clipboard.set_text(&transcript)?;

        Ok(Notice::success("Copied", "Transcript copied to clipboard"))
    }

    fn apply(&self, event: SubmissionEvent) -> Option<Notice> {
        let mut state = self.lock();
        let (next, notice) = reduce(&state, event);
        *state = next;
        notice
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SubmissionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Marks a submission as running until it resolves
///
/// Dropping it unresolved, e.g. when the `submit` future is cancelled,
/// resolves the submission as a failure so the flow accepts new submits.
struct InFlight<'a> {
    flow: &'a SubmissionFlow,
    resolved: bool,
}

impl<'a> InFlight<'a> {
    fn begin(flow: &'a SubmissionFlow) -> Result<Self> {
        let mut state = flow.lock();
        if state.is_submitting() {
            return Err(ClientError::SubmissionInFlight);
        }
        *state = reduce(&state, SubmissionEvent::Submit).0;

        Ok(Self {
            flow,
            resolved: false,
        })
    }

    fn resolve(mut self, event: SubmissionEvent) -> Option<Notice> {
        self.resolved = true;
        self.flow.apply(event)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.resolved {
            return;
        }

        tracing::debug!("submission cancelled before the relay answered");
        self.flow.apply(SubmissionEvent::Failed {
            category: FailureCategory::Other,
            message: CANCELLED.to_owned(),
        });
    }
}

/// Failure message recorded for a cancelled submission
pub const CANCELLED: &str = "cancelled";

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn resolved_with(text: &str) -> SubmissionState {
        SubmissionState::Resolved {
            transcript: Some(text.to_owned()),
            outcome: Outcome::Success,
        }
    }

    fn failed() -> SubmissionEvent {
        SubmissionEvent::Failed {
            category: FailureCategory::ProviderError,
            message: "500: boom".to_owned(),
        }
    }

    #[test]
    fn submit_moves_idle_to_submitting() {
        let (next, notice) = reduce(&SubmissionState::Idle, SubmissionEvent::Submit);
        assert_eq!(next, SubmissionState::Submitting { transcript: None });
        assert!(notice.is_none());
    }

    #[test]
    fn success_replaces_transcript() {
        let (submitting, _) = reduce(&resolved_with("old"), SubmissionEvent::Submit);
        let (next, notice) = reduce(
            &submitting,
            SubmissionEvent::Succeeded {
                transcript: "new".to_owned(),
            },
        );
        assert_eq!(next.transcript(), Some("new"));
        assert!(!notice.unwrap().is_error());
    }

    #[test]
    fn failure_keeps_previous_transcript() {
        let (submitting, _) = reduce(&resolved_with("old"), SubmissionEvent::Submit);
        let (next, notice) = reduce(&submitting, failed());

        assert_eq!(next.transcript(), Some("old"));
        assert!(matches!(
            next,
            SubmissionState::Resolved {
                outcome: Outcome::Failure {
                    category: FailureCategory::ProviderError,
                    ..
                },
                ..
            }
        ));
        let notice = notice.unwrap();
        assert!(notice.is_error());
        assert_eq!(notice.category, Some(FailureCategory::ProviderError));
    }

    #[test]
    fn submit_while_submitting_is_ignored() {
        let submitting = SubmissionState::Submitting {
            transcript: Some("kept".to_owned()),
        };
        let (next, notice) = reduce(&submitting, SubmissionEvent::Submit);
        assert_eq!(next, submitting);
        assert!(notice.is_none());
    }

    #[test]
    fn stray_resolutions_are_ignored() {
        let (next, notice) = reduce(&SubmissionState::Idle, failed());
        assert_eq!(next, SubmissionState::Idle);
        assert!(notice.is_none());
    }

    #[test]
    fn dismiss_keeps_transcript_visible() {
        let (next, _) = reduce(&resolved_with("text"), SubmissionEvent::Dismiss);
        assert_eq!(
            next,
            SubmissionState::Dismissed {
                transcript: Some("text".to_owned())
            }
        );
    }

    struct RecordingClipboard {
        copied: Option<String>,
        fail: bool,
    }

    impl Clipboard for RecordingClipboard {
        fn set_text(&mut self, text: &str) -> Result<()> {
            if self.fail {
                return Err(ClientError::Clipboard("denied".to_owned()));
            }
            self.copied = Some(text.to_owned());
            Ok(())
        }
    }

    fn flow_with(state: SubmissionState) -> SubmissionFlow {
        let flow = SubmissionFlow::new(ScribeClient::new("http://127.0.0.1:9").unwrap());
        *flow.lock() = state;
        flow
    }

    #[test]
    fn copy_writes_transcript() {
        let flow = flow_with(resolved_with("hello"));
        let mut clipboard = RecordingClipboard {
            copied: None,
            fail: false,
        };

        let notice = flow.copy_transcript(&mut clipboard).unwrap();
        assert!(!notice.is_error());
        assert_eq!(clipboard.copied.as_deref(), Some("hello"));
    }

    #[test]
    fn copy_failure_is_a_clipboard_error() {
        let flow = flow_with(resolved_with("hello"));
        let mut clipboard = RecordingClipboard {
            copied: None,
            fail: true,
        };

        let err = flow.copy_transcript(&mut clipboard).unwrap_err();
        assert_eq!(err.category(), FailureCategory::ClipboardFailure);
    }

    #[test]
    fn copy_without_transcript_fails() {
        let flow = flow_with(SubmissionState::Idle);
        let mut clipboard = RecordingClipboard {
            copied: None,
            fail: false,
        };

        assert!(flow.copy_transcript(&mut clipboard).is_err());
        assert!(clipboard.copied.is_none());
    }

    #[tokio::test]
    async fn missing_input_is_rejected_locally() {
        let flow = flow_with(resolved_with("before"));

        let notice = flow.submit(None).await.unwrap();
        assert_eq!(notice.description, "Please select an audio file");
        assert_eq!(flow.state(), resolved_with("before"));
    }

    #[tokio::test]
    async fn concurrent_submit_is_rejected() {
        let flow = flow_with(SubmissionState::Submitting { transcript: None });

        let err = flow
            .submit(Some(&AudioInput::url("https://example.com/a.mp3")))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::SubmissionInFlight));
    }

    #[tokio::test]
    async fn cancelled_submit_releases_the_flow() {
        // Accepts connections and never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _hold = tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                open.push(socket);
            }
        });

        let flow = SubmissionFlow::new(ScribeClient::new(&format!("http://{addr}")).unwrap());
        *flow.lock() = resolved_with("before");
        let input = AudioInput::url("https://example.com/a.mp3");

        let timed_out = tokio::time::timeout(Duration::from_millis(200), flow.submit(Some(&input))).await;
        assert!(timed_out.is_err());

        assert_eq!(
            flow.state(),
            SubmissionState::Resolved {
                transcript: Some("before".to_owned()),
                outcome: Outcome::Failure {
                    category: FailureCategory::Other,
                    message: CANCELLED.to_owned(),
                },
            }
        );

        // A new submit is accepted, it only times out against the silent server
        let again = tokio::time::timeout(Duration::from_millis(200), flow.submit(Some(&input))).await;
        assert!(again.is_err());
        assert!(!flow.state().is_submitting());
    }

    #[tokio::test]
    async fn unreachable_relay_resolves_as_network_failure() {
        let flow = flow_with(resolved_with("before"));

        let notice = flow
            .submit(Some(&AudioInput::url("https://example.com/a.mp3")))
            .await
            .unwrap();
        assert_eq!(notice.category, Some(FailureCategory::Network));
        assert_eq!(flow.transcript().as_deref(), Some("before"));
        assert!(!flow.state().is_submitting());
    }
}
