use thiserror::Error;

/// Result type for stripping operations
pub type Result<T> = std::result::Result<T, StripError>;

/// The first syntax error found in an input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} ({line}:{column})")]
pub struct ParseError {
    pub message: String,
    /// Byte offset of the offending token.
    pub offset: usize,
    /// 1-indexed line.
    pub line: usize,
    /// 0-indexed column, in characters.
    pub column: usize,
}

impl ParseError {
    /// An error with no better position than the start of the input.
    pub fn at_start(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            offset: 0,
            line: 1,
            column: 0,
        }
    }
}

/// Errors that can occur while configuring or running a strip.
#[derive(Error, Debug)]
pub enum StripError {
    /// The input failed to parse; fatal for that input only.
    #[error("{source} in {id}")]
    Parse {
        id: String,
        #[source]
        source: ParseError,
    },

    /// A keypath pattern that cannot describe a member chain.
    #[error("invalid keypath pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("invalid pattern regex: {0}")]
    Regex(#[from] regex::Error),

    #[error("invalid glob: {0}")]
    Glob(#[from] globset::Error),

    #[error("invalid sourcemap: {0}")]
    SourceMap(#[from] sourcemap::Error),
}

impl StripError {
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Attach the input's identifier to a parse failure.
    pub fn parse(id: impl Into<String>, source: ParseError) -> Self {
        Self::Parse {
            id: id.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_message_names_the_input() {
        let err = StripError::parse(
            "src/app.js",
            ParseError {
                message: "unexpected `)`".to_string(),
                offset: 7,
                line: 1,
                column: 7,
            },
        );
        assert_eq!(err.to_string(), "unexpected `)` (1:7) in src/app.js");
    }

    #[test]
    fn invalid_pattern_message() {
        let err = StripError::invalid_pattern("console..log", "empty segment");
        assert_eq!(
            err.to_string(),
            "invalid keypath pattern `console..log`: empty segment"
        );
    }
}
