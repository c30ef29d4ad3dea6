//! CLI channel — runs the onboarding conversation on stdin/stdout.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use uuid::Uuid;

use crate::error::ChannelError;
use crate::onboarding::flow::{Affordance, FlowSnapshot, TextAction};
use crate::onboarding::manager::{OnboardingManager, UploadOutcome};
use crate::onboarding::transcript::{Origin, TranscriptEntry};
use crate::picker::LocalFilePicker;

/// Terminal host for one onboarding session.
///
/// System messages are printed as they appear in the transcript. On an upload
/// step the typed line is read as a file path; an empty line cancels.
pub struct CliChannel {
    manager: Arc<OnboardingManager>,
    reset_sentinel: String,
}

impl CliChannel {
    pub fn new(manager: Arc<OnboardingManager>, reset_sentinel: impl Into<String>) -> Self {
        Self {
            manager,
            reset_sentinel: reset_sentinel.into(),
        }
    }

    pub fn name(&self) -> &str {
        "cli"
    }

    /// Run until EOF or `/quit`.
    pub async fn run(&self) -> Result<(), ChannelError> {
        let stdin = tokio::io::stdin();
        let reader = BufReader::new(stdin);
        let mut lines = reader.lines();
        tracing::debug!(channel = self.name(), "Channel started");
        let mut printed = render(&self.manager.snapshot().await, None);

        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break, // EOF
                Err(e) => {
                    tracing::error!("Error reading stdin: {}", e);
                    return Err(ChannelError::Io(e));
                }
            };

            let trimmed = line.trim();
            if trimmed == "/quit" {
                break;
            }

            self.dispatch(&snapshot_affordance(&self.manager).await, &line)
                .await;

            let snapshot = self.manager.snapshot().await;
            printed = render(&snapshot, printed);
        }

        Ok(())
    }

    async fn dispatch(&self, affordance: &Affordance, line: &str) {
        let trimmed = line.trim();

        if let Affordance::Upload { field, .. } = affordance {
            if trimmed != self.reset_sentinel {
                let picker = LocalFilePicker::new(trimmed);
                match self.manager.upload(*field, &picker).await {
                    Ok(UploadOutcome::Completed(_)) => {}
                    Ok(UploadOutcome::Cancelled) => eprintln!("   (upload cancelled)"),
                    Ok(UploadOutcome::Failed(reason)) => eprintln!("   {}", reason),
                    Err(e) => eprintln!("   {}", e),
                }
                return;
            }
        }

        match self.manager.handle_text(line).await {
            Ok(TextAction::Reset) => eprintln!("   (starting over)"),
            Ok(_) => {}
            Err(e) => eprintln!("   {}", e),
        }
    }
}

async fn snapshot_affordance(manager: &OnboardingManager) -> Affordance {
    manager.snapshot().await.affordance
}

/// Print transcript entries after `printed` and the input hint.
/// Returns the id of the last entry shown.
fn render(snapshot: &FlowSnapshot, printed: Option<Uuid>) -> Option<Uuid> {
    let start = printed
        .and_then(|id| snapshot.transcript.iter().position(|e| e.id == id))
        .map(|i| i + 1)
        .unwrap_or(0);

    for entry in &snapshot.transcript[start..] {
        print_entry(entry);
    }

    match &snapshot.affordance {
        Affordance::Text { .. } => {}
        Affordance::Choice { options } => {
            for option in options {
                println!("   - {}", option);
            }
        }
        Affordance::Upload { label, .. } => {
            println!("   [{}] Enter a file path (empty to cancel)", label);
        }
        Affordance::EditMenu { options } => {
            for option in options {
                println!("   {}. {}", option.number, option.label);
            }
        }
        Affordance::Review { summary, actions } => {
            println!();
            for line in summary.lines() {
                println!("   {}", line);
            }
            println!("\n   [{}]", actions.join("] ["));
        }
    }
    eprint!("> ");

    snapshot.transcript.last().map(|e| e.id).or(printed)
}

fn print_entry(entry: &TranscriptEntry) {
    match entry.origin {
        Origin::System => println!("\n{}", entry.content.display_text()),
        // The user already sees what they typed
        Origin::User => {}
    }
}
