use std::io::Write;

use errors::{LoxError, LoxErrors};
use itertools::Itertools;
use log::debug;
use parser::{print, print_rpn, Parser};

/// What to print besides the syntax tree.
#[derive(Debug, Default, Clone, Copy)]
pub struct Options {
    pub tokens: bool,
    pub rpn: bool,
}

#[derive(thiserror::Error, Debug)]
pub enum RunError {
    #[error("{0}")]
    Scan(LoxErrors),
    #[error("{0}")]
    Syntax(LoxError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RunError {
    /// Exit code following the sysexits convention.
    pub fn exit_code(&self) -> u8 {
        match self {
            RunError::Scan(_) | RunError::Syntax(_) => 65,
            RunError::Io(_) => 74,
        }
    }
}

/// Scans and parses `source` as a single expression and writes its tree to `out`.
pub fn run_source(source: &str, options: Options, out: &mut impl Write) -> Result<(), RunError> {
    debug!("Running {} bytes of source with {options:?}", source.len());
    let scanned = scanner::scan(source);

    if options.tokens {
        writeln!(out, "{}", scanned.tokens.iter().join("\n"))?;
    }

    let tokens = scanned.into_result().map_err(|errors| {
        debug!("Scanning failed with {} errors", errors.len());
        RunError::Scan(errors)
    })?;

    let mut parser = Parser::new(&tokens);
    let expr = parser
        .parse()
        .and_then(|expr| parser.expect_end().map(|_| expr))
        .map_err(|e| RunError::Syntax(e.into()))?;

    writeln!(out, "{}", print(&expr))?;
    if options.rpn {
        writeln!(out, "{}", print_rpn(&expr))?;
    }

    Ok(())
}
