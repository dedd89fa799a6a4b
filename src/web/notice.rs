use serde::{Deserialize, Serialize};

use crate::erx::{Erx, PreL4};

// Notice is what a screen shows for an error.
// every Erx maps to exactly one notice, nothing is fatal
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    /// Send the user to the login screen.
    LoginRequired(String),
    /// Message under the form field `field`; empty field means the whole form.
    Field { field: String, message: String },
    /// Dismissible banner above the list.
    Inline { message: String, dismissible: bool },
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::LoginRequired(m) => m,
            Notice::Field { message, .. } => message,
            Notice::Inline { message, .. } => message,
        }
    }

    pub fn is_login(&self) -> bool {
        matches!(self, Notice::LoginRequired(_))
    }
}

impl From<&Erx> for Notice {
    fn from(erx: &Erx) -> Self {
        let message = |fallback: &str| {
            if erx.message().is_empty() {
                fallback.to_string()
            } else {
                erx.message_string()
            }
        };

        let inline = |message: String| Notice::Inline { message, dismissible: true };

        match erx.pre() {
            PreL4::AUTH => Notice::LoginRequired(message("Please log in to continue.")),
            PreL4::VALD => Notice::Field {
                field: erx.extra_val("FIELD").unwrap_or_default(),
                message: message("Invalid input."),
            },
            PreL4::UPLD if erx.is_cancelled() => inline(message("Upload cancelled.")),
            PreL4::UPLD => inline(message("Upload failed. Please try again.")),
            PreL4::DECO => inline("Unexpected response from the server.".to_string()),
            _ => inline(message("Something went wrong. Please try again.")),
        }
    }
}

impl From<Erx> for Notice {
    fn from(erx: Erx) -> Self {
        Notice::from(&erx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping() {
        assert!(Notice::from(&Erx::auth("")).is_login());
        assert!(Notice::from(&Erx::unauthorized("expired")).is_login());

        let n = Notice::from(&Erx::validation("name", "Category name is required."));
        let message = "Category name is required.".to_string();
        assert_eq!(n, Notice::Field { field: "name".into(), message });

        let n = Notice::from(&Erx::status(500, "down"));
        assert_eq!(n, Notice::Inline { message: "down".into(), dismissible: true });

        let n = Notice::from(Erx::decode("expected value at line 1"));
        assert_eq!(n.message(), "Unexpected response from the server.");
        assert_eq!(Notice::from(&Erx::cancelled()).message(), "upload cancelled");
    }
}
