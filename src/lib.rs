use parse_display::Display;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, trace};

mod digest;
mod encoder;
mod operator;
mod parameters;
mod resolve;
mod token;
mod variable;
mod vars;

mod tests_readme;

pub use digest::{Syntax, digest};
pub use encoder::{decode, encode, minimal_encode};
pub use operator::Operator;
pub use parameters::Parameters;
pub use resolve::{ResolveResult, Status};
pub use token::Token;
pub use variable::{Form, Variable, VariableType};
pub use vars::Vars;

/// A compiled URI pattern.
///
/// Patterns are immutable once compiled and can be shared between threads.
#[derive(Clone)]
pub struct UriPattern {
    source: String,
    tokens: Vec<Token>,
    /// Capture group of each token, `None` for literals.
    groups: Vec<Option<usize>>,
    regex: Regex,
}
impl fmt::Debug for UriPattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\"{}\"", self.source)
    }
}
impl fmt::Display for UriPattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl UriPattern {
    pub fn new(s: &str) -> Result<Self> {
        Self::with_syntax(s, &Syntax::default())
    }

    pub fn with_syntax(s: &str, syntax: &Syntax) -> Result<Self> {
        let tokens = digest(s, syntax)?;
        let mut groups = Vec::with_capacity(tokens.len());
        let mut re = String::from("^");
        let mut group = 0;
        for token in &tokens {
            if let Token::Literal(_) = token {
                re.push_str(&token.to_regex());
                groups.push(None);
            } else {
                group += 1;
                re.push('(');
                re.push_str(&token.to_regex());
                re.push(')');
                groups.push(Some(group));
            }
        }
        re.push('$');
        trace!(pattern = s, regex = %re, "generated matcher");
        let regex = match Regex::new(&re) {
            Ok(regex) => regex,
            Err(e) => panic!("invalid matcher `{re}` generated for `{s}`: {e}"),
        };
        debug!(pattern = s, tokens = tokens.len(), "compiled uri pattern");
        Ok(Self {
            source: s.to_string(),
            tokens,
            groups,
            regex,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
    /// All variables in token order. A variable used twice is listed twice.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.tokens.iter().flat_map(|t| t.variables())
    }
    pub fn var_names(&self) -> impl Iterator<Item = &str> {
        self.variables().map(|v| v.name())
    }
    /// Returns `true` if every variable of this pattern can be recovered by [`UriPattern::resolve`].
    pub fn is_resolvable(&self) -> bool {
        self.tokens
            .iter()
            .all(|t| matches!(t, Token::Literal(_)) || t.is_resolvable())
    }

    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Matches `path` and extracts the values of the resolvable tokens.
    pub fn resolve(&self, path: &str) -> ResolveResult {
        let Some(captures) = self.regex.captures(path) else {
            trace!(pattern = %self.source, path, "unresolved");
            return ResolveResult::unresolved();
        };
        let mut bindings = BTreeMap::new();
        for (token, group) in self.tokens.iter().zip(&self.groups) {
            let Some(group) = group else {
                continue;
            };
            let matched = captures.get(*group).map_or("", |m| m.as_str());
            if let Err(e) = token.resolve(matched, path, &mut bindings) {
                debug!(pattern = %self.source, path, error = %e, "failed to decode value");
                return ResolveResult::error(bindings, e);
            }
        }
        trace!(pattern = %self.source, path, bindings = bindings.len(), "resolved");
        ResolveResult::resolved(bindings)
    }

    pub fn expand(&self, vars: impl Vars) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            token.expand(&vars, &mut out);
        }
        out
    }
}

/// Compiles `template` with the default [`Syntax`].
pub fn compile(template: &str) -> Result<UriPattern> {
    UriPattern::new(template)
}

/// Expands `pattern` with `vars`.
pub fn expand(pattern: &UriPattern, vars: impl Vars) -> String {
    pattern.expand(vars)
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    #[display("unclosed expression")]
    UnclosedExpression,
    #[display("unexpected closing brace")]
    UnexpectedCloseBrace,
    #[display("empty expression")]
    EmptyExpression,
    #[display("invalid variable name")]
    InvalidVariableName,
    #[display("invalid variable type")]
    InvalidVariableType,
    #[display("invalid prefix length")]
    InvalidPrefixLength,
    #[display("unbalanced quote")]
    UnbalancedQuote,
    #[display("invalid utf-8")]
    InvalidUtf8,
}

#[derive(Clone, Debug)]
pub struct Error {
    source: String,
    source_index: usize,
    kind: ErrorKind,
    expression: Option<String>,
}

impl Error {
    fn new(source: &str, source_index: usize, kind: ErrorKind) -> Self {
        Self {
            source: source.to_string(),
            source_index,
            kind,
            expression: None,
        }
    }
    fn with_expression(source: &str, source_index: usize, kind: ErrorKind, expression: &str) -> Self {
        Self {
            expression: Some(expression.to_string()),
            ..Self::new(source, source_index, kind)
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
    /// Byte offset of the error in the template or value.
    pub fn source_index(&self) -> usize {
        self.source_index
    }
    /// The offending expression, without braces.
    pub fn expression(&self) -> Option<&str> {
        self.expression.as_deref()
    }
}
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(expr) = &self.expression {
            write!(f, " in `{{{expr}}}`")?;
        }
        write!(
            f,
            " (\"{} >>>> {}\")",
            &self.source[..self.source_index],
            &self.source[self.source_index..],
        )
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let e = UriPattern::new("/a/{b c}").unwrap_err();
        assert_eq!(e.to_string(), "invalid variable name in `{b c}` (\"/a/ >>>> {b c}\")");
        let e = UriPattern::new("/a/{b").unwrap_err();
        assert_eq!(e.to_string(), "unclosed expression (\"/a/ >>>> {b\")");
    }

    #[test]
    fn groups_skip_literals() {
        let p = UriPattern::new("/a/{b}/c/{;d}").unwrap();
        assert_eq!(p.groups, [None, Some(1), None, Some(2)]);
    }

    #[test]
    fn shared_between_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<UriPattern>();
    }
}
