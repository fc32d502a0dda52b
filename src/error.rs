use thiserror::Error;

pub type MapperlateResult<T> = std::result::Result<T, MapperlateError>;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum ParseErrorKind {
    #[error("Unclosed placeholder '{sigil}{{' (expected '}}')")]
    UnclosedPlaceholder { sigil: char },
    #[error("Empty placeholder '{sigil}{{}}'")]
    EmptyPlaceholder { sigil: char },
    #[error("Parser error: {0}")]
    Message(String),
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("Parse error at line {line}, column {column}: {kind}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    #[source]
    pub kind: ParseErrorKind,
}

#[derive(Debug, Error)]
pub enum MapperlateError {
    /// The output sink rejected a write. Whatever was written before the
    /// failure is partial and must be discarded by the caller.
    #[error("Failed to write restored SQL: {0}")]
    Io(#[from] std::io::Error),
    #[error("Restored SQL is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("Unknown directive: <{tag}>")]
    UnknownDirective { tag: String },
    #[error("Unbalanced tag: expected </{expected}>, found </{found}>")]
    UnbalancedTag { expected: String, found: String },
    #[error("Unclosed tag: <{tag}>")]
    UnclosedTag { tag: String },
    #[error("Statement already exists: {id}")]
    StatementExists { id: String },
    #[error("Statement not found: {id}")]
    MissingStatement { id: String },
}
