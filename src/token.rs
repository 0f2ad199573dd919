use std::collections::BTreeMap;
use std::fmt;

use regex::escape;

use crate::encoder::{decode, encode_to};
use crate::operator::{RE_RUN, lookup};
use crate::{Operator, Result, Variable, Vars};

/// A parsed unit of a template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// Text copied verbatim to the output and matched exactly.
    Literal(String),
    /// `{name}`
    Variable(Variable),
    /// `{op name,...}`, or several comma-separated names without an operator.
    Operator(Operator, Vec<Variable>),
}

impl Token {
    pub fn expand(&self, values: &dyn Vars, out: &mut String) {
        match self {
            Token::Literal(text) => out.push_str(text),
            Token::Variable(var) => {
                if let Some(vs) = lookup(var, values) {
                    if let Some(v) = vs.first() {
                        encode_to(var.truncate(v), out);
                    }
                }
            }
            Token::Operator(op, vars) => op.expand(vars, values, out),
        }
    }

    /// Regex fragment matching what [`Token::expand`] can produce.
    pub(crate) fn to_regex(&self) -> String {
        match self {
            Token::Literal(text) => escape(text),
            Token::Variable(_) => RE_RUN.to_string(),
            Token::Operator(op, vars) => op.to_regex(vars),
        }
    }

    /// Returns `true` if values can be recovered from the text matched by this token.
    pub fn is_resolvable(&self) -> bool {
        match self {
            Token::Literal(_) => false,
            Token::Variable(_) => true,
            Token::Operator(op, vars) => op.is_resolvable(vars),
        }
    }

    /// Binds the values found in `matched`, the text of this token, or in the whole `path`.
    /// Returns `Ok(false)` if this token is not resolvable.
    pub(crate) fn resolve(
        &self,
        matched: &str,
        path: &str,
        bindings: &mut BTreeMap<String, String>,
    ) -> Result<bool> {
        match self {
            Token::Literal(_) => Ok(false),
            Token::Variable(var) => {
                bindings.insert(var.name().to_string(), decode(matched)?);
                Ok(true)
            }
            Token::Operator(op, vars) => op.resolve(vars, matched, path, bindings),
        }
    }

    pub fn variables(&self) -> &[Variable] {
        match self {
            Token::Literal(_) => &[],
            Token::Variable(var) => std::slice::from_ref(var),
            Token::Operator(_, vars) => vars,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Literal(text) => f.write_str(text),
            Token::Variable(var) => write!(f, "{{{var}}}"),
            Token::Operator(op, vars) => {
                write!(f, "{{{op}")?;
                for (i, var) in vars.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{var}")?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Form, Parameters};

    #[test]
    fn expand_variable_uses_first_value() {
        let t = Token::Variable(Variable::new("a").unwrap());
        let mut p = Parameters::new();
        p.set_values("a", ["x y", "z"]);
        let mut out = String::new();
        t.expand(&p, &mut out);
        assert_eq!(out, "x%20y");
    }

    #[test]
    fn literal_is_verbatim() {
        let t = Token::Literal("a b/%41".to_string());
        let mut out = String::new();
        t.expand(&(), &mut out);
        assert_eq!(out, "a b/%41");
        assert!(!t.is_resolvable());
        assert!(t.variables().is_empty());
    }

    #[test]
    fn display() {
        let vars = vec![
            Variable::new("a").unwrap(),
            Variable::new("b").unwrap().with_form(Form::List),
        ];
        assert_eq!(Token::Operator(Operator::QueryParameter, vars.clone()).to_string(), "{?a,@b}");
        assert_eq!(Token::Operator(Operator::Substitution, vars).to_string(), "{a,@b}");
    }
}
