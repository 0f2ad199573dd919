use std::fmt;
use std::hash::{Hash, Hasher};

use crate::{Error, ErrorKind, Result};

/// Shape of the values bound to a variable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Form {
    /// A single value. Several values are comma-joined where an operator allows it.
    #[default]
    Scalar,
    /// `@name`: an ordered list of values.
    List,
    /// `%name`: alternating key and value entries.
    Map,
}
impl Form {
    pub(crate) fn from_char(c: char) -> Option<Self> {
        match c {
            '@' => Some(Self::List),
            '%' => Some(Self::Map),
            _ => None,
        }
    }
    fn to_prefix(self) -> &'static str {
        match self {
            Self::Scalar => "",
            Self::List => "@",
            Self::Map => "%",
        }
    }
}

/// Descriptive type tag of a variable (`{type:name}`).
///
/// Tags never change how a variable is matched or expanded.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VariableType(String);

impl VariableType {
    pub fn new(name: &str) -> Option<Self> {
        is_valid_name(name).then(|| Self(name.to_string()))
    }
    pub fn name(&self) -> &str {
        &self.0
    }
}
impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named placeholder inside a template expression.
///
/// Two variables are equal when their names and default values are equal.
/// The type tag, form and prefix length are descriptive and do not take part
/// in identity.
#[derive(Clone, Debug)]
pub struct Variable {
    name: String,
    default: Option<String>,
    var_type: Option<VariableType>,
    form: Form,
    prefix: Option<usize>,
}

impl Variable {
    pub fn new(name: &str) -> Option<Self> {
        is_valid_name(name).then(|| Self {
            name: name.to_string(),
            default: None,
            var_type: None,
            form: Form::Scalar,
            prefix: None,
        })
    }
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
    pub fn with_type(mut self, var_type: VariableType) -> Self {
        self.var_type = Some(var_type);
        self
    }
    pub fn with_form(mut self, form: Form) -> Self {
        self.form = form;
        self
    }
    pub fn with_prefix(mut self, prefix: usize) -> Self {
        self.prefix = Some(prefix);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }
    pub fn var_type(&self) -> Option<&VariableType> {
        self.var_type.as_ref()
    }
    pub fn form(&self) -> Form {
        self.form
    }
    pub fn prefix(&self) -> Option<usize> {
        self.prefix
    }

    /// Applies the prefix modifier to a raw value.
    pub(crate) fn truncate<'a>(&self, value: &'a str) -> &'a str {
        match self.prefix {
            Some(n) => match value.char_indices().nth(n) {
                Some((i, _)) => &value[..i],
                None => value,
            },
            None => value,
        }
    }

    /// Parses `[form] [type ':'] name [':' digits] ['=' default]`.
    ///
    /// `offset` is the position of the enclosing expression in `source`.
    pub(crate) fn parse(spec: &str, source: &str, offset: usize, expr: &str) -> Result<Self> {
        let err = |kind: ErrorKind| Error::with_expression(source, offset, kind, expr);

        let (head, default) = match spec.split_once('=') {
            Some((head, default)) => {
                let default = unquote(default).ok_or_else(|| err(ErrorKind::UnbalancedQuote))?;
                (head, Some(default))
            }
            None => (spec, None),
        };
        let mut chars = head.chars();
        let form = chars.next().and_then(Form::from_char);
        let head = if form.is_some() { chars.as_str() } else { head };

        let parts: Vec<&str> = head.split(':').collect();
        let (var_type, name, prefix) = match parts.as_slice() {
            [name] => (None, *name, None),
            [a, b] if is_digits(b) => (None, *a, Some(*b)),
            [t, name] => (Some(*t), *name, None),
            [t, name, p] => (Some(*t), *name, Some(*p)),
            _ => return Err(err(ErrorKind::InvalidVariableName)),
        };
        if name.is_empty() && var_type.is_none() && prefix.is_none() && default.is_none() {
            return Err(err(ErrorKind::EmptyExpression));
        }
        let mut var = Variable::new(name).ok_or_else(|| err(ErrorKind::InvalidVariableName))?;
        if let Some(t) = var_type {
            let var_type = VariableType::new(t).ok_or_else(|| err(ErrorKind::InvalidVariableType))?;
            var = var.with_type(var_type);
        }
        if let Some(p) = prefix {
            if !is_digits(p) {
                return Err(err(ErrorKind::InvalidPrefixLength));
            }
            let n = p.parse().map_err(|_| err(ErrorKind::InvalidPrefixLength))?;
            var = var.with_prefix(n);
        }
        if let Some(d) = default {
            var = var.with_default(d);
        }
        Ok(var.with_form(form.unwrap_or_default()))
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.default == other.default
    }
}
impl Eq for Variable {}
impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.default.hash(state);
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.form.to_prefix())?;
        if let Some(t) = &self.var_type {
            write!(f, "{t}:")?;
        }
        f.write_str(&self.name)?;
        if let Some(p) = self.prefix {
            write!(f, ":{p}")?;
        }
        if let Some(d) = &self.default {
            write!(f, "={d}")?;
        }
        Ok(())
    }
}

/// `[A-Za-z][A-Za-z0-9._-]*`
pub(crate) fn is_valid_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn unquote(s: &str) -> Option<&str> {
    let first = s.chars().next();
    let last = s.chars().next_back();
    match (first, last) {
        (Some(q @ ('\'' | '"')), Some(l)) if s.len() >= 2 && l == q => Some(&s[1..s.len() - 1]),
        (Some('\'' | '"'), _) => None,
        (_, Some('\'' | '"')) => None,
        _ => Some(s),
    }
}
