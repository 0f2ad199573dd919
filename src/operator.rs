use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use regex::escape;

use crate::encoder::{decode, encode_to, minimal_encode_to};
use crate::{Form, Result, Variable, Vars};

/// Matches one value of a simple substitution. Never crosses a path,
/// parameter or query boundary.
pub(crate) const RE_RUN: &str = "[^;/?#,&]*";

/// Expansion operator of an expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    /// No operator character.
    Substitution,
    /// `+`
    UriInsert,
    /// `/`
    PathSegment,
    /// `;`
    PathParameter,
    /// `?`
    QueryParameter,
}

impl Operator {
    /// Unknown operator characters fall back to [`Operator::Substitution`].
    pub fn from_char(c: char) -> Self {
        match c {
            '+' => Self::UriInsert,
            '/' => Self::PathSegment,
            ';' => Self::PathParameter,
            '?' => Self::QueryParameter,
            _ => Self::Substitution,
        }
    }
    pub fn to_prefix(self) -> &'static str {
        match self {
            Self::Substitution => "",
            Self::UriInsert => "+",
            Self::PathSegment => "/",
            Self::PathParameter => ";",
            Self::QueryParameter => "?",
        }
    }

    pub(crate) fn expand(self, vars: &[Variable], values: &dyn Vars, out: &mut String) {
        match self {
            Self::Substitution => expand_joined(vars, values, encode_to, out),
            Self::UriInsert => expand_joined(vars, values, minimal_encode_to, out),
            Self::PathSegment => expand_path_segment(vars, values, out),
            Self::PathParameter => expand_path_parameter(vars, values, out),
            Self::QueryParameter => expand_query_parameter(vars, values, out),
        }
    }

    pub(crate) fn to_regex(self, vars: &[Variable]) -> String {
        match self {
            Self::Substitution => format!("{RE_RUN}(?:,{RE_RUN})*"),
            Self::UriInsert => "[^?#]*".to_string(),
            Self::PathSegment => "(?:/[^/?#]*)*".to_string(),
            Self::PathParameter => {
                if vars.iter().any(|v| v.form() == Form::Map) {
                    "(?:;[^;/?#]*)*".to_string()
                } else {
                    let names: Vec<String> = vars.iter().map(|v| escape(v.name())).collect();
                    format!("(?:;(?:{})(?:=[^;/?#]*)?)*", names.join("|"))
                }
            }
            Self::QueryParameter => {
                if vars.iter().any(|v| v.form() == Form::Map) {
                    r"(?:\?[^#]*)?".to_string()
                } else {
                    let names: Vec<String> = vars
                        .iter()
                        .map(|v| match v.form() {
                            Form::List => format!(r"{}\d*", escape(v.name())),
                            _ => escape(v.name()),
                        })
                        .collect();
                    let param = format!("(?:{})(?:=[^&#]*)?", names.join("|"));
                    format!(r"(?:\?{param}(?:&{param})*)?")
                }
            }
        }
    }

    pub(crate) fn is_resolvable(self, vars: &[Variable]) -> bool {
        match self {
            Self::Substitution | Self::UriInsert | Self::PathSegment => vars.len() == 1,
            Self::PathParameter | Self::QueryParameter => true,
        }
    }

    /// Extracts values for this operator's variables.
    ///
    /// Positional operators read `matched`, the text matched by their own fragment.
    /// Parameter operators scan the whole matched `path` for their names.
    /// Returns `Ok(false)` without touching `bindings` when the expression is not resolvable.
    pub(crate) fn resolve(
        self,
        vars: &[Variable],
        matched: &str,
        path: &str,
        bindings: &mut BTreeMap<String, String>,
    ) -> Result<bool> {
        if !self.is_resolvable(vars) {
            return Ok(false);
        }
        match self {
            Self::Substitution | Self::UriInsert => {
                bindings.insert(vars[0].name().to_string(), decode(matched)?);
            }
            Self::PathSegment => {
                if let Some(segments) = matched.strip_prefix('/') {
                    bindings.insert(vars[0].name().to_string(), decode(segments)?);
                }
            }
            Self::PathParameter => scan_named(vars, path, &[';'], &[';', '/', '?', '#'], bindings)?,
            Self::QueryParameter => scan_named(vars, path, &['?', '&'], &['&', '#'], bindings)?,
        }
        Ok(true)
    }
}
impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.to_prefix())
    }
}

/// Values of `var`, falling back to its default when absent.
pub(crate) fn lookup<'a>(var: &'a Variable, values: &'a dyn Vars) -> Option<Cow<'a, [String]>> {
    values
        .values(var.name())
        .or_else(|| Some(Cow::Owned(vec![var.default_value()?.to_string()])))
}

fn expand_joined(
    vars: &[Variable],
    values: &dyn Vars,
    encode: fn(&str, &mut String),
    out: &mut String,
) {
    let mut first = true;
    for var in vars {
        let Some(vs) = lookup(var, values) else {
            continue;
        };
        for v in vs.iter() {
            if !first {
                out.push(',');
            }
            encode(var.truncate(v), out);
            first = false;
        }
    }
}

fn expand_path_segment(vars: &[Variable], values: &dyn Vars, out: &mut String) {
    for var in vars {
        let Some(vs) = lookup(var, values) else {
            continue;
        };
        for v in vs.iter() {
            out.push('/');
            encode_to(var.truncate(v), out);
        }
    }
}

fn expand_path_parameter(vars: &[Variable], values: &dyn Vars, out: &mut String) {
    for var in vars {
        let Some(vs) = lookup(var, values) else {
            continue;
        };
        match var.form() {
            Form::Scalar | Form::List => {
                for v in vs.iter() {
                    out.push(';');
                    out.push_str(var.name());
                    if !v.is_empty() {
                        out.push('=');
                        encode_to(var.truncate(v), out);
                    }
                }
            }
            Form::Map => {
                // An odd trailing key is written without a value.
                for pair in vs.chunks(2) {
                    out.push(';');
                    encode_to(&pair[0], out);
                    if let Some(v) = pair.get(1) {
                        out.push('=');
                        encode_to(var.truncate(v), out);
                    }
                }
            }
        }
    }
}

fn expand_query_parameter(vars: &[Variable], values: &dyn Vars, out: &mut String) {
    let mut first = true;
    let mut sep = |out: &mut String| {
        out.push(if first { '?' } else { '&' });
        first = false;
    };
    for var in vars {
        let Some(vs) = lookup(var, values) else {
            continue;
        };
        match var.form() {
            Form::Scalar => {
                sep(out);
                out.push_str(var.name());
                out.push('=');
                for (i, v) in vs.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    encode_to(var.truncate(v), out);
                }
            }
            Form::List => {
                for (i, v) in vs.iter().enumerate() {
                    sep(out);
                    out.push_str(var.name());
                    if i > 0 {
                        out.push_str(&(i + 1).to_string());
                    }
                    out.push('=');
                    encode_to(var.truncate(v), out);
                }
            }
            Form::Map => {
                // An odd trailing key is written with an empty value.
                for pair in vs.chunks(2) {
                    sep(out);
                    encode_to(&pair[0], out);
                    out.push('=');
                    if let Some(v) = pair.get(1) {
                        encode_to(var.truncate(v), out);
                    }
                }
            }
        }
    }
}

/// Binds the first `name` or `name=value` run of every non-map variable found in `path`.
///
/// A run starts after one of `separators` and ends before one of `terminators`.
fn scan_named(
    vars: &[Variable],
    path: &str,
    separators: &[char],
    terminators: &[char],
    bindings: &mut BTreeMap<String, String>,
) -> Result<()> {
    for var in vars.iter().filter(|v| v.form() != Form::Map) {
        let name = var.name();
        for (i, sep) in path.match_indices(separators) {
            let rest = &path[i + sep.len()..];
            let piece = &rest[..rest.find(terminators).unwrap_or(rest.len())];
            let value = match piece.strip_prefix(name) {
                Some("") => "",
                Some(rest) => match rest.strip_prefix('=') {
                    Some(value) => value,
                    None => continue,
                },
                None => continue,
            };
            bindings.insert(name.to_string(), decode(value)?);
            break;
        }
    }
    Ok(())
}
