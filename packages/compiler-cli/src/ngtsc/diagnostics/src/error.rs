use super::error_code::ErrorCode;
use super::util::ng_error_code;
use oxc_span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Message,
}

/// A diagnostic ready to be reported against a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: i32,
    pub file: Option<String>,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
}

/// An error that aborts analysis of the current class.
///
/// The span points at the offending node (a decorator, or the parameter's binding name) so the
/// caller can attribute the diagnostic to the source location.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("NG{}: {message}", .code.number())]
pub struct FatalDiagnosticError {
    pub code: ErrorCode,
    pub span: Span,
    pub message: String,
}

impl FatalDiagnosticError {
    pub fn new(code: ErrorCode, span: Span, message: impl Into<String>) -> Self {
        Self {
            code,
            span,
            message: message.into(),
        }
    }

    pub fn to_diagnostic(&self, file: Option<&str>) -> Diagnostic {
        Diagnostic {
            category: DiagnosticCategory::Error,
            code: ng_error_code(self.code),
            file: file.map(str::to_string),
            start: self.span.start,
            length: self.span.end - self.span.start,
            message_text: self.message.clone(),
        }
    }
}

pub fn is_fatal_diagnostic_error(err: &(dyn std::error::Error + 'static)) -> bool {
    err.is::<FatalDiagnosticError>()
}
