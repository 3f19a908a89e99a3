//! CSV roster import feeding employee geofence settings into a store.

mod parser;

use crate::geofence::EmployeeGeoConfig;
use std::io::Read;
use std::path::Path;

use parser::ParseFailure;

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: u64, reason: String },
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read employee roster: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterImportError::InvalidRow { line, reason } => {
                write!(f, "invalid roster row on line {}: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<ParseFailure> for RosterImportError {
    fn from(failure: ParseFailure) -> Self {
        match failure {
            ParseFailure::Csv(err) => Self::Csv(err),
            ParseFailure::Row(problem) => Self::InvalidRow {
                line: problem.line,
                reason: problem.reason,
            },
        }
    }
}

pub struct EmployeeRosterImporter;

impl EmployeeRosterImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<EmployeeGeoConfig>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<EmployeeGeoConfig>, RosterImportError> {
        Ok(parser::parse_roster(reader)?)
    }
}
