//! Log categories and the on-disk location derived from them

use chrono::{Datelike, NaiveDate};
use std::path::{Path, PathBuf};

/// Log partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogCategory {
    /// Runtime errors, exceptions, panics
    Php,
    /// HTTP 404 requests
    NotFound,
    /// Failed logins
    Login,
}

impl LogCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Php => "php",
            Self::NotFound => "404",
            Self::Login => "login",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "php" => Some(Self::Php),
            "404" => Some(Self::NotFound),
            "login" => Some(Self::Login),
            _ => None,
        }
    }
}

impl std::fmt::Display for LogCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a line for a given category and day goes.
///
/// Layout: `{base}/{category}/{YYYY}/{MM}/{category}_{YYYY}_{MM}_{DD}.log`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogTarget {
    pub base_folder: PathBuf,
    pub category: LogCategory,
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl LogTarget {
    pub fn new(base_folder: impl AsRef<Path>, category: LogCategory, date: NaiveDate) -> Self {
        Self {
            base_folder: base_folder.as_ref().to_path_buf(),
            category,
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }

    /// `{base}/{category}/{YYYY}/{MM}`
    pub fn dir(&self) -> PathBuf {
        self.base_folder
            .join(self.category.as_str())
            .join(format!("{:04}", self.year))
            .join(format!("{:02}", self.month))
    }

    /// `{category}_{YYYY}_{MM}_{DD}.log`
    pub fn file_name(&self) -> String {
        format!(
            "{}_{:04}_{:02}_{:02}.log",
            self.category.as_str(),
            self.year,
            self.month,
            self.day
        )
    }

    pub fn path(&self) -> PathBuf {
        self.dir().join(self.file_name())
    }
}
