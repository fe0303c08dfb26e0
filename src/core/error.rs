use std::error::Error as StdError;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Internal,
    NoMatch,
    DepthLimit,
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    depth: Option<usize>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            depth: None,
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn depth(&self) -> Option<usize> {
        self.depth
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(depth) = self.depth {
            write!(f, " (depth: {depth})")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

/// The engine produced no match for the input.
///
/// Carries nothing else: a failed parse is indistinguishable from "input did
/// not match grammar".
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ParseFailed;

impl fmt::Display for ParseFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("parse failed")
    }
}

impl StdError for ParseFailed {}

impl From<ParseFailed> for Error {
    fn from(err: ParseFailed) -> Self {
        Error::new(ErrorKind::NoMatch).with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind, ParseFailed};
    use std::error::Error as StdError;

    #[test]
    fn display_includes_kind_message_and_depth() {
        let err = Error::new(ErrorKind::DepthLimit)
            .with_message("token tree too deep")
            .with_depth(65);
        assert_eq!(err.to_string(), "DepthLimit: token tree too deep (depth: 65)");
        assert_eq!(err.depth(), Some(65));
    }

    #[test]
    fn parse_failed_converts_to_no_match() {
        let err = Error::from(ParseFailed);
        assert_eq!(err.kind(), ErrorKind::NoMatch);
        assert_eq!(
            err.source().map(|source| source.to_string()),
            Some("parse failed".to_string())
        );
    }
}
