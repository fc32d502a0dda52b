use std::{fmt, io::Write, str::FromStr};

use crate::{MapperlateError, MapperlateResult, ast::Node};

/// The directive tags a mapper statement body may contain.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DirectiveKind {
    If,
    Choose,
    When,
    Otherwise,
    Trim,
    Where,
    Set,
}

impl DirectiveKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::If => "if",
            Self::Choose => "choose",
            Self::When => "when",
            Self::Otherwise => "otherwise",
            Self::Trim => "trim",
            Self::Where => "where",
            Self::Set => "set",
        }
    }
}

impl FromStr for DirectiveKind {
    type Err = MapperlateError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "if" => Ok(Self::If),
            "choose" => Ok(Self::Choose),
            "when" => Ok(Self::When),
            "otherwise" => Ok(Self::Otherwise),
            "trim" => Ok(Self::Trim),
            "where" => Ok(Self::Where),
            "set" => Ok(Self::Set),
            other => Err(MapperlateError::UnknownDirective {
                tag: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The markup attributes a directive node is constructed from.
///
/// Absent attributes are empty strings; no attribute is ever validated.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NodeAttributes {
    pub test: String,
    pub prefix: String,
    pub suffix: String,
    /// `|`-delimited tokens stripped from the start of a trimmed clause.
    pub prefix_overrides: String,
    /// `|`-delimited tokens stripped from the end of a trimmed clause.
    pub suffix_overrides: String,
}

impl NodeAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the recognised attributes out of raw `(name, value)` pairs as
    /// handed over by a markup tokenizer. Unknown names are ignored and a
    /// repeated name keeps its last value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut attributes = Self::default();
        for (name, value) in pairs {
            let slot = match name.as_ref() {
                "test" => &mut attributes.test,
                "prefix" => &mut attributes.prefix,
                "suffix" => &mut attributes.suffix,
                "prefixOverrides" => &mut attributes.prefix_overrides,
                "suffixOverrides" => &mut attributes.suffix_overrides,
                _ => continue,
            };
            *slot = value.into();
        }
        attributes
    }
}

/// `SqlNode` is the contract every node of a mapper statement tree fulfils.
///
/// Restoration never evaluates a directive's condition: the output is the
/// union of every branch, so that a SQL parser downstream can see every table
/// and column the statement could possibly touch.
pub trait SqlNode {
    /// `restore` writes the literal SQL contribution of this node, including
    /// all of its descendants, into `sink`.
    ///
    /// # Errors
    /// - If `sink` rejects a write. Output written so far is partial.
    fn restore<W: Write + ?Sized>(&self, sink: &mut W) -> MapperlateResult<()>;

    /// `add_child` appends `child` to the children of this node. Any node may
    /// be nested in any other; leaf nodes discard the child.
    fn add_child(&mut self, child: Node);

    /// `restore_to_string` restores this node into a freshly allocated string.
    ///
    /// # Errors
    /// - If the restored bytes are not valid UTF-8.
    fn restore_to_string(&self) -> MapperlateResult<String> {
        let mut buffer = Vec::new();
        self.restore(&mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
