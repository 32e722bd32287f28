//! Process exit codes.

use crate::pump::{ErrorKind, PumpOutcome, PumpReport};

/// Clean run: dataset completed or stopped, exports fine.
pub const EXIT_OK: i32 = 0;
/// Dashboard or runtime error, or command-line misuse.
pub const EXIT_RUNTIME: i32 = 1;
/// Required configuration missing.
pub const EXIT_CONFIGURATION: i32 = 2;
/// Dataset or engine could not be opened.
pub const EXIT_RESOURCE: i32 = 3;
/// Run aborted by frame validation or initialization.
pub const EXIT_ABORTED: i32 = 4;
/// A shutdown export failed.
pub const EXIT_EXPORT: i32 = 5;

/// Exit code for an error category.
pub fn exit_code_for_kind(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Configuration => EXIT_CONFIGURATION,
        ErrorKind::ResourceOpen => EXIT_RESOURCE,
        ErrorKind::FrameValidation | ErrorKind::Initialization => EXIT_ABORTED,
    }
}

/// Exit code for a finished pump.
///
/// A pump error wins over export failures.
pub fn exit_code_for(report: &PumpReport) -> i32 {
    if let PumpOutcome::Failed(e) = &report.outcome {
        return exit_code_for_kind(e.kind());
    }
    match &report.export {
        Some(export) if export.has_failures() => EXIT_EXPORT,
        _ => EXIT_OK,
    }
}
