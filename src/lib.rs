//! `awsop` command-line front end.
//!
//! Binds arguments with clap, layers configuration, asks before mutating
//! anything, streams projected output as JSON lines and maps outcomes to
//! exit codes:
//!
//! | Code | Meaning                                        |
//! |------|------------------------------------------------|
//! | 0    | completed, truncated by `--max-items`, declined |
//! | 1    | service, transport or configuration failure    |
//! | 2    | invalid parameters or selector                 |
//! | 130  | cancelled with Ctrl-C                          |

pub mod cli;
pub mod commands;
pub mod confirm;
pub mod logging;
pub mod output;

use awsop_aws::AwsError;
use awsop_core::{InvocationError, InvocationReport, InvocationStatus};

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_INVALID: u8 = 2;
pub const EXIT_CANCELLED: u8 = 130;

pub fn exit_code(result: &anyhow::Result<InvocationReport>) -> u8 {
    match result {
        Ok(report) if report.status == InvocationStatus::Cancelled => EXIT_CANCELLED,
        Ok(_) => 0,
        Err(err) => match err.downcast_ref::<InvocationError<AwsError>>() {
            Some(e) if e.is_validation() => EXIT_INVALID,
            _ => EXIT_FAILURE,
        },
    }
}

/// Human-facing remarks about a successful run, printed on stderr.
pub fn notes(report: &InvocationReport) -> Vec<String> {
    let mut notes = Vec::new();
    match report.status {
        InvocationStatus::Declined => {
            notes.push("not confirmed; nothing was changed".to_string());
        }
        InvocationStatus::Cancelled => {
            notes.push(format!("cancelled after {} request(s)", report.calls));
        }
        InvocationStatus::Completed | InvocationStatus::Truncated => {}
    }
    if let Some(ref error) = report.swallowed_error {
        notes.push(format!("stopped early after a failed page: {}", error));
    }
    if let Some(ref token) = report.resume_token {
        notes.push(format!("more results are available; continue with --next-token {}", token));
    }
    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use awsop_core::ValidationError;

    fn report(status: InvocationStatus) -> InvocationReport {
        InvocationReport {
            status,
            calls: 2,
            items: 10,
            resume_token: None,
            swallowed_error: None,
        }
    }

    #[test]
    fn exit_codes() {
        assert_eq!(exit_code(&Ok(report(InvocationStatus::Completed))), 0);
        assert_eq!(exit_code(&Ok(report(InvocationStatus::Declined))), 0);
        assert_eq!(exit_code(&Ok(report(InvocationStatus::Cancelled))), 130);

        let invalid: InvocationError<AwsError> =
            ValidationError::MissingParameter("PipelineName").into();
        assert_eq!(exit_code(&Err(invalid.into())), 2);

        let service: InvocationError<AwsError> = InvocationError::Service(AwsError::new(
            "codepipeline",
            "PipelineNotFoundException",
            "missing",
            400,
        ));
        assert_eq!(exit_code(&Err(service.into())), 1);
        assert_eq!(exit_code(&Err(AwsError::config("no region").into())), 1);
    }

    #[test]
    fn notes_mention_resume_token() {
        let mut r = report(InvocationStatus::Truncated);
        r.resume_token = Some("t-9".into());
        assert_eq!(
            notes(&r),
            vec!["more results are available; continue with --next-token t-9".to_string()]
        );
        assert!(notes(&report(InvocationStatus::Completed)).is_empty());
        assert_eq!(notes(&report(InvocationStatus::Declined)).len(), 1);
    }
}
