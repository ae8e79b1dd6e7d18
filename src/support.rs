//! Help & support directory.
//!
//! Contact channels form a closed set; each category carries its own fixed
//! fields and is listed explicitly.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum SupportContact {
    Email { address: String },
    Phone { number: String, hours: String },
    WhatsApp { number: String },
    Office { address: String, city: String },
}

impl SupportContact {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Email { .. } => "Email",
            Self::Phone { .. } => "Phone",
            Self::WhatsApp { .. } => "WhatsApp",
            Self::Office { .. } => "Office",
        }
    }

    /// Text a "copy" button hands to the clipboard.
    pub fn copy_text(&self) -> String {
        match self {
            Self::Email { address } => address.clone(),
            Self::Phone { number, .. } | Self::WhatsApp { number } => number.clone(),
            Self::Office { address, city } => format!("{address}, {city}"),
        }
    }
}

impl fmt::Display for SupportContact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Phone { number, hours } => write!(f, "{}: {number} ({hours})", self.label()),
            _ => write!(f, "{}: {}", self.label(), self.copy_text()),
        }
    }
}

/// The portal's published support channels, in display order.
pub fn directory() -> Vec<SupportContact> {
    vec![
        SupportContact::Email {
            address: "partners@loanportal.in".to_string(),
        },
        SupportContact::Phone {
            number: "1800-120-4455".to_string(),
            hours: "Mon–Sat, 9:30 AM to 6:30 PM".to_string(),
        },
        SupportContact::WhatsApp {
            number: "+91 98200 11223".to_string(),
        },
        SupportContact::Office {
            address: "4th Floor, Prestige Tower, Residency Road".to_string(),
            city: "Bengaluru".to_string(),
        },
    ]
}
