//! Quilt: a small language for rectangular patch designs.
//!
//! Source text is tokenized and parsed into a [`parser::Program`], then the
//! runtime binds its definitions and evaluates the final expression into a
//! flat [`Design`]: a bounding box plus absolutely positioned patches.
//!
//! ```
//! use quilt::{evaluate_source, EvalConfig};
//!
//! let design = evaluate_source("vert(rect(2, 2, red), rect(2, 2, blue))", EvalConfig::default()).unwrap();
//! assert_eq!((design.width, design.height), (2.0, 4.0));
//! ```

pub mod compose;
pub mod config;
pub mod env;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod render;
pub mod runtime;
pub mod value;

pub use config::{EvalConfig, OutputFormat, RenderConfig};
pub use error::{ErrorKind, EvalError, ParseError, QuiltError};
pub use value::{Color, Design, Patch, Value};

/// Lex, parse and evaluate `source` in a fresh session.
pub fn evaluate_source(source: &str, config: EvalConfig) -> Result<Design, QuiltError> {
    let tokens = lexer::lex(source)?;
    let program = parser::parse_with_depth(tokens, config.max_depth)?;
    Ok(runtime::execute(&program, config)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_errors_keep_their_location() {
        let err = evaluate_source("hor(rect(1, 1, red)", EvalConfig::default()).unwrap_err();
        assert!(err.location().is_some());
    }

    #[test]
    fn evaluation_errors_have_no_location() {
        let err = evaluate_source("hor(a)", EvalConfig::default()).unwrap_err();
        assert_eq!(err.location(), None);
        match err {
            QuiltError::Eval(e) => assert_eq!(e.kind(), ErrorKind::UnboundNameError),
            other => panic!("expected eval error, got {other:?}"),
        }
    }
}
