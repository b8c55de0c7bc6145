//! User-facing warnings and the backend error code lookup table.
//!
//! The backend reports failures as opaque string codes. The core never
//! branches on a code's value; it only translates it here into the
//! `{title, text, severity}` triple shown to the user. Unknown codes fall
//! back to the generic unknown-error entry.

use std::fmt;

pub const ERR_UNKNOWN: &str = "E001";
pub const ERR_NOT_FOUND: &str = "E002";
pub const ERR_NOT_AVAILABLE: &str = "E003";
pub const ERR_UNAUTHORIZED: &str = "E004";
pub const ERR_INVALID_TOKEN: &str = "E005";
pub const ERR_INVALID_FORMAT: &str = "E006";
pub const ERR_INVALID_HEADER: &str = "E007";
pub const ERR_WRONG_CREDENTIALS: &str = "E008";
pub const ERR_REGEX_NOT_MATCH: &str = "E009";

/// Opaque backend error code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorCode(pub String);

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ErrorCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// A warning ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub title: String,
    pub text: String,
    pub severity: Severity,
}

// ── Lookup table ──────────────────────────────────────────────────────────

struct WarningProps {
    code: &'static str,
    title: &'static str,
    text: &'static str,
    severity: Severity,
}

const UNKNOWN_PROPS: WarningProps = WarningProps {
    code: ERR_UNKNOWN,
    title: "Something bad did happen",
    text: "We could not proceed with your request, please try again.",
    severity: Severity::Error,
};

const WARNING_PROPS: &[WarningProps] = &[
    UNKNOWN_PROPS,
    WarningProps {
        code: ERR_NOT_FOUND,
        title: "Forbidden",
        text: "You do not have permissions to execute this action. Make sure you are \
               properly authenticated.",
        severity: Severity::Error,
    },
    WarningProps {
        code: ERR_NOT_AVAILABLE,
        title: "Verification required",
        text: "We just sent to you a verification email. Use the link provided there to \
               complete the action.",
        severity: Severity::Info,
    },
    WarningProps {
        code: ERR_UNAUTHORIZED,
        title: "2FA required",
        text: "We need you to provide the 6-code in order to proceed with your request.",
        severity: Severity::Info,
    },
    WarningProps {
        code: ERR_INVALID_TOKEN,
        title: "Forbidden",
        text: "You do not have permissions to execute this action. Make sure you are \
               properly authenticated.",
        severity: Severity::Error,
    },
    WarningProps {
        code: ERR_INVALID_FORMAT,
        title: "Invalid format",
        text: "Some of the credentials you just provided do not have the expected format. \
               Make sure you wrote them properly.",
        severity: Severity::Error,
    },
    WarningProps {
        code: ERR_INVALID_HEADER,
        title: "Forbidden",
        text: "You do not have permissions to execute this action. Make sure you are \
               properly authenticated.",
        severity: Severity::Error,
    },
    WarningProps {
        code: ERR_WRONG_CREDENTIALS,
        title: "Invalid username or password",
        text: "We could not identify you. Make sure all your credentials are well written.",
        severity: Severity::Error,
    },
];

impl Warning {
    pub fn new(title: &str, text: &str, severity: Severity) -> Self {
        Self {
            title: title.to_string(),
            text: text.to_string(),
            severity,
        }
    }

    /// Translate a backend error code into its display entry.
    pub fn find(code: &ErrorCode) -> Self {
        let props = WARNING_PROPS
            .iter()
            .find(|props| props.code == code.as_str())
            .unwrap_or(&UNKNOWN_PROPS);

        Warning::new(props.title, props.text, props.severity)
    }
}
