use std::{
    fmt::{self, Display, Formatter},
    ops::{Deref, DerefMut},
};

use cursor::{Col, Line};
use itertools::Itertools;

/// A single diagnostic, produced by either the scanner or the parser.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub struct LoxError {
    pub line: Line,
    pub col: Col,
    /// Where on the line the error happened, e.g. `end` or `'+'`.
    pub location: Option<String>,
    pub message: String,
}

impl LoxError {
    pub fn new(line: Line, col: Col, message: impl Into<String>) -> Self {
        Self { line, col, location: None, message: message.into() }
    }

    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl Display for LoxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if cfg!(feature = "strict") {
            write!(f, "[line {}] Error", self.line)?;
        } else {
            write!(f, "[line {}, col {}] Error", self.line, self.col)?;
        }
        if let Some(location) = &self.location {
            write!(f, " at {location}")?;
        }
        write!(f, ": {}", self.message)
    }
}

#[derive(thiserror::Error, Clone, Debug, Default, PartialEq)]
pub struct LoxErrors(pub Vec<LoxError>);

impl From<LoxError> for LoxErrors {
    fn from(e: LoxError) -> Self {
        Self(vec![e])
    }
}

impl FromIterator<LoxError> for LoxErrors {
    fn from_iter<I: IntoIterator<Item = LoxError>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Deref for LoxErrors {
    type Target = Vec<LoxError>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for LoxErrors {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Display for LoxErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join("\n"))
    }
}

pub type Result<T> = std::result::Result<T, LoxError>;
