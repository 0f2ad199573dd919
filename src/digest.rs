use serde::{Deserialize, Serialize};

use crate::{Error, ErrorKind, Form, Operator, Result, Token, Variable};

/// Syntax options used when digesting a template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Syntax {
    /// Treat a literal `*` outside braces as `{+wildcard_name}`.
    pub wildcard: bool,
    /// Variable bound by `*` and `{*}`.
    pub wildcard_name: String,
}
impl Default for Syntax {
    fn default() -> Self {
        Self {
            wildcard: true,
            wildcard_name: "wildcard".to_string(),
        }
    }
}

impl Syntax {
    fn wildcard_token(&self, source: &str, index: usize, expr: &str) -> Result<Token> {
        let var = Variable::new(&self.wildcard_name).ok_or_else(|| {
            Error::with_expression(source, index, ErrorKind::InvalidVariableName, expr)
        })?;
        Ok(Token::Operator(Operator::UriInsert, vec![var]))
    }
}

/// Splits a template into its tokens, in order.
pub fn digest(source: &str, syntax: &Syntax) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    let bytes = source.as_bytes();
    let is_special = |b: u8| b == b'{' || b == b'}' || (b == b'*' && syntax.wildcard);

    while let Some(off) = bytes[pos..].iter().position(|&b| is_special(b)) {
        let index = pos + off;
        push_literal(&mut tokens, &source[pos..index]);
        match bytes[index] {
            b'{' => {
                let start = index + 1;
                let Some(len) = bytes[start..].iter().position(|&b| b == b'}') else {
                    return Err(Error::new(source, index, ErrorKind::UnclosedExpression));
                };
                let expr = &source[start..start + len];
                if expr.contains('{') {
                    return Err(Error::with_expression(
                        source,
                        index,
                        ErrorKind::UnclosedExpression,
                        expr,
                    ));
                }
                tokens.push(parse_expression(source, index, expr, syntax)?);
                pos = start + len + 1;
            }
            b'}' => return Err(Error::new(source, index, ErrorKind::UnexpectedCloseBrace)),
            _ => {
                tokens.push(syntax.wildcard_token(source, index, "*")?);
                pos = index + 1;
            }
        }
    }
    push_literal(&mut tokens, &source[pos..]);
    Ok(tokens)
}

fn push_literal(tokens: &mut Vec<Token>, text: &str) {
    if !text.is_empty() {
        tokens.push(Token::Literal(text.to_string()));
    }
}

/// Parses the text between `{` and `}`. `index` is the position of `{` in `source`.
fn parse_expression(source: &str, index: usize, expr: &str, syntax: &Syntax) -> Result<Token> {
    if expr == "*" {
        return syntax.wildcard_token(source, index, expr);
    }
    let var = |spec: &str| Variable::parse(spec, source, index, expr);
    let list = |specs: &str| specs.split(',').map(var).collect::<Result<Vec<_>>>();

    let mut chars = expr.chars();
    let is_operator = |c: char| !c.is_ascii_alphanumeric() && Form::from_char(c).is_none();
    match chars.next() {
        Some(c) if is_operator(c) && !chars.as_str().is_empty() => {
            Ok(Token::Operator(Operator::from_char(c), list(chars.as_str())?))
        }
        _ if expr.contains(',') => Ok(Token::Operator(Operator::Substitution, list(expr)?)),
        _ => Ok(Token::Variable(var(expr)?)),
    }
}
