//! Filter selector model.
//!
//! Both selectors persist as raw strings (`filterType`, `filterDate`), not JSON.

use crate::model::task::{TaskType, TaskValidationError};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Narrows the visible list to one category, or shows all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(TaskType),
}

impl TypeFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(kind) => kind.as_str(),
        }
    }

    pub fn matches(self, kind: TaskType) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == kind,
        }
    }
}

impl Display for TypeFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeFilter {
    type Err = FilterParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == "all" {
            return Ok(Self::All);
        }
        value
            .parse::<TaskType>()
            .map(Self::Only)
            .map_err(|_: TaskValidationError| FilterParseError {
                selector: "filterType",
                value: value.to_string(),
            })
    }
}

/// Narrows the visible list relative to the current instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFilter {
    #[default]
    All,
    /// Scheduled strictly after now.
    Upcoming,
    /// Scheduled strictly before now.
    Expired,
}

impl DateFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Upcoming => "upcoming",
            Self::Expired => "expired",
        }
    }
}

impl Display for DateFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateFilter {
    type Err = FilterParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "all" => Ok(Self::All),
            "upcoming" => Ok(Self::Upcoming),
            "expired" => Ok(Self::Expired),
            other => Err(FilterParseError {
                selector: "filterDate",
                value: other.to_string(),
            }),
        }
    }
}

/// Both selectors together, as persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Filters {
    pub type_filter: TypeFilter,
    pub date_filter: DateFilter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterParseError {
    pub selector: &'static str,
    pub value: String,
}

impl Display for FilterParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {} value `{}`", self.selector, self.value)
    }
}

impl std::error::Error for FilterParseError {}

#[cfg(test)]
mod tests {
    use super::{DateFilter, TypeFilter};
    use crate::model::task::TaskType;

    #[test]
    fn selectors_parse_their_storage_strings() {
        assert_eq!("all".parse::<TypeFilter>().unwrap(), TypeFilter::All);
        assert_eq!(
            "Meeting".parse::<TypeFilter>().unwrap(),
            TypeFilter::Only(TaskType::Meeting)
        );
        assert_eq!(
            "expired".parse::<DateFilter>().unwrap(),
            DateFilter::Expired
        );
        assert_eq!(TypeFilter::Only(TaskType::Event).as_str(), "Event");
    }

    #[test]
    fn unknown_selector_values_are_rejected() {
        let err = "soon".parse::<DateFilter>().unwrap_err();
        assert_eq!(err.to_string(), "unknown filterDate value `soon`");
        assert!("All".parse::<TypeFilter>().is_err());
    }
}
