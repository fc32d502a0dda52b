use crate::interface::{DirectiveKind, NodeAttributes};

/// A node of a mapper statement tree.
///
/// The variant set is closed. Every variant owns its children exclusively and
/// the tree is never mutated once restoration starts.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "node", rename_all = "lowercase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A statement body, rendered without any added whitespace.
    Root(RootNode),
    /// Literal SQL text.
    Text(TextNode),
    /// A `#{...}` or `${...}` parameter expression.
    Placeholder(PlaceholderNode),
    If(IfNode),
    Choose(ChooseNode),
    When(WhenNode),
    Otherwise(OtherwiseNode),
    Trim(TrimNode),
    Where(WhereNode),
    Set(SetNode),
}

impl Node {
    /// Builds the node for a directive tag out of its markup attributes.
    ///
    /// Attributes the directive does not use are ignored.
    pub fn from_directive(kind: DirectiveKind, attributes: &NodeAttributes) -> Self {
        match kind {
            DirectiveKind::If => Self::If(IfNode::new(attributes.test.as_str())),
            DirectiveKind::Choose => Self::Choose(ChooseNode::new()),
            DirectiveKind::When => Self::When(WhenNode::new(attributes.test.as_str())),
            DirectiveKind::Otherwise => Self::Otherwise(OtherwiseNode::new()),
            DirectiveKind::Trim => Self::Trim(TrimNode::new(
                attributes.prefix.as_str(),
                attributes.suffix.as_str(),
                &attributes.prefix_overrides,
                &attributes.suffix_overrides,
            )),
            DirectiveKind::Where => Self::Where(WhereNode::new()),
            DirectiveKind::Set => Self::Set(SetNode::new()),
        }
    }

    /// The children of this node, in rendering order. Leaves have none.
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Root(node) => node.children.as_slice(),
            Self::Text(_) | Self::Placeholder(_) => &[],
            Self::If(node) => node.children.as_slice(),
            Self::Choose(node) => node.children.as_slice(),
            Self::When(node) => node.children.as_slice(),
            Self::Otherwise(node) => node.children.as_slice(),
            Self::Trim(node) => node.children.as_slice(),
            Self::Where(node) => node.trim.children.as_slice(),
            Self::Set(node) => node.trim.children.as_slice(),
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RootNode {
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: Vec<Node>,
}

impl RootNode {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextNode {
    pub text: String,
}

impl TextNode {
    pub fn new<T: Into<String>>(text: T) -> Self {
        Self { text: text.into() }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlaceholderKind {
    /// `#{...}`, bound as a prepared statement parameter.
    Bind,
    /// `${...}`, spliced into the statement text as is.
    Substitution,
}

impl PlaceholderKind {
    pub const fn sigil(self) -> char {
        match self {
            Self::Bind => '#',
            Self::Substitution => '$',
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderNode {
    pub kind: PlaceholderKind,
    /// The expression between the braces, without surrounding whitespace.
    pub expression: String,
}

impl PlaceholderNode {
    pub fn bind<T: Into<String>>(expression: T) -> Self {
        Self {
            kind: PlaceholderKind::Bind,
            expression: expression.into(),
        }
    }

    pub fn substitution<T: Into<String>>(expression: T) -> Self {
        Self {
            kind: PlaceholderKind::Substitution,
            expression: expression.into(),
        }
    }
}

/// `<if test="...">`. The test expression is kept but never evaluated.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IfNode {
    #[cfg_attr(feature = "serde", serde(default))]
    pub test: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: Vec<Node>,
}

impl IfNode {
    pub fn new<T: Into<String>>(test: T) -> Self {
        Self {
            test: test.into(),
            children: Vec::new(),
        }
    }
}

/// `<choose>`. No branch is selected; every `<when>` and `<otherwise>` is
/// rendered.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChooseNode {
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: Vec<Node>,
}

impl ChooseNode {
    pub fn new() -> Self {
        Self::default()
    }
}

/// `<when test="...">` inside a `<choose>`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WhenNode {
    #[cfg_attr(feature = "serde", serde(default))]
    pub test: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: Vec<Node>,
}

impl WhenNode {
    pub fn new<T: Into<String>>(test: T) -> Self {
        Self {
            test: test.into(),
            children: Vec::new(),
        }
    }
}

/// `<otherwise>` inside a `<choose>`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OtherwiseNode {
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: Vec<Node>,
}

impl OtherwiseNode {
    pub fn new() -> Self {
        Self::default()
    }
}

/// `<trim prefix="..." suffix="..." prefixOverrides="..." suffixOverrides="...">`.
///
/// The overrides are split on `|` at construction. An empty override source
/// yields a single empty token, which matches everything and strips nothing.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimNode {
    #[cfg_attr(feature = "serde", serde(default))]
    pub prefix: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub suffix: String,
    #[cfg_attr(
        feature = "serde",
        serde(default = "no_overrides", deserialize_with = "deserialize_overrides")
    )]
    pub prefix_overrides: Vec<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default = "no_overrides", deserialize_with = "deserialize_overrides")
    )]
    pub suffix_overrides: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: Vec<Node>,
}

impl TrimNode {
    pub fn new<P, S>(prefix: P, suffix: S, prefix_overrides: &str, suffix_overrides: &str) -> Self
    where
        P: Into<String>,
        S: Into<String>,
    {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
            prefix_overrides: split_overrides(prefix_overrides),
            suffix_overrides: split_overrides(suffix_overrides),
            children: Vec::new(),
        }
    }
}

fn split_overrides(source: &str) -> Vec<String> {
    source.split('|').map(str::to_owned).collect()
}

/// What an absent or empty override source splits into.
#[cfg(feature = "serde")]
fn no_overrides() -> Vec<String> {
    split_overrides("")
}

/// An empty override list is read as an empty override source, which is the
/// only form `split_overrides` can produce for it.
#[cfg(feature = "serde")]
fn deserialize_overrides<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let overrides = <Vec<String> as serde::Deserialize>::deserialize(deserializer)?;
    if overrides.is_empty() {
        return Ok(no_overrides());
    }
    Ok(overrides)
}

/// `<where>`: a trim with prefix `WHERE` that drops a leading `AND ` or `OR `.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "ClauseBody", into = "ClauseBody"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhereNode {
    pub(crate) trim: TrimNode,
}

impl WhereNode {
    pub fn new() -> Self {
        Self {
            trim: TrimNode::new("WHERE", "", "AND |OR ", ""),
        }
    }
}

impl Default for WhereNode {
    fn default() -> Self {
        Self::new()
    }
}

/// `<set>`: a trim with prefix `SET` that drops a trailing `,`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "ClauseBody", into = "ClauseBody"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetNode {
    pub(crate) trim: TrimNode,
}

impl SetNode {
    pub fn new() -> Self {
        Self {
            trim: TrimNode::new("SET", "", "", ","),
        }
    }
}

impl Default for SetNode {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialised form of `<where>` and `<set>`: only the children, since their
/// trim configuration is fixed.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct ClauseBody {
    #[serde(default)]
    children: Vec<Node>,
}

#[cfg(feature = "serde")]
impl From<ClauseBody> for WhereNode {
    fn from(body: ClauseBody) -> Self {
        let mut node = Self::new();
        node.trim.children = body.children;
        node
    }
}

#[cfg(feature = "serde")]
impl From<WhereNode> for ClauseBody {
    fn from(node: WhereNode) -> Self {
        Self {
            children: node.trim.children,
        }
    }
}

#[cfg(feature = "serde")]
impl From<ClauseBody> for SetNode {
    fn from(body: ClauseBody) -> Self {
        let mut node = Self::new();
        node.trim.children = body.children;
        node
    }
}

#[cfg(feature = "serde")]
impl From<SetNode> for ClauseBody {
    fn from(node: SetNode) -> Self {
        Self {
            children: node.trim.children,
        }
    }
}

macro_rules! impl_from_for_node {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Node {
                fn from(node: $ty) -> Self {
                    Self::$variant(node)
                }
            }
        )*
    };
}

impl_from_for_node!(
    Root(RootNode),
    Text(TextNode),
    Placeholder(PlaceholderNode),
    If(IfNode),
    Choose(ChooseNode),
    When(WhenNode),
    Otherwise(OtherwiseNode),
    Trim(TrimNode),
    Where(WhereNode),
    Set(SetNode),
);
