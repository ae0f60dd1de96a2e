//! Service highlights ("Why choose us" callouts).

use core::fmt;

use serde::{Deserialize, Serialize};

use super::HighlightId;
use super::product::{ValidationError, require};

/// Icon shown next to a highlight.
///
/// Stored by name. Names outside the known set fall back to [`HighlightIcon::Shield`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HighlightIcon {
    #[default]
    Shield,
    Truck,
    Wrench,
    Clock,
    Award,
    Users,
}

impl HighlightIcon {
    /// All icons, in the order the admin picker lists them.
    pub const ALL: [Self; 6] = [
        Self::Shield,
        Self::Truck,
        Self::Wrench,
        Self::Clock,
        Self::Award,
        Self::Users,
    ];

    /// Resolve an icon name, falling back to `Shield` for unknown names.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "Truck" => Self::Truck,
            "Wrench" => Self::Wrench,
            "Clock" => Self::Clock,
            "Award" => Self::Award,
            "Users" => Self::Users,
            _ => Self::Shield,
        }
    }

    /// The stored name of this icon.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Shield => "Shield",
            Self::Truck => "Truck",
            Self::Wrench => "Wrench",
            Self::Clock => "Clock",
            Self::Award => "Award",
            Self::Users => "Users",
        }
    }
}

impl fmt::Display for HighlightIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for HighlightIcon {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<HighlightIcon> for String {
    fn from(icon: HighlightIcon) -> Self {
        icon.name().to_string()
    }
}

/// A promotional callout on the services page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceHighlight {
    pub id: HighlightId,
    pub title: String,
    pub description: String,
    pub icon: HighlightIcon,
    /// Inactive highlights stay in storage but are not displayed.
    pub is_active: bool,
    /// Display position, ascending.
    pub order: i32,
}

/// Admin form input for a highlight.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightInput {
    pub title: String,
    pub description: String,
    pub icon: HighlightIcon,
    pub is_active: bool,
    pub order: i32,
}

impl HighlightInput {
    /// Check the required form fields.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] naming the first blank field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("description", &self.description)?;
        Ok(())
    }

    #[must_use]
    pub fn into_highlight(self, id: HighlightId) -> ServiceHighlight {
        ServiceHighlight {
            id,
            title: self.title,
            description: self.description,
            icon: self.icon,
            is_active: self.is_active,
            order: self.order,
        }
    }
}
