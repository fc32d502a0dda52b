use crate::{
    MapperlateError, MapperlateResult,
    ast::{Node, RootNode},
    interface::{DirectiveKind, NodeAttributes, SqlNode},
    parser::parse_text,
};

/// `TreeBuilder` assembles a statement tree from the event stream of a markup
/// tokenizer: element starts, text runs and element ends.
///
/// # Examples
///
/// ```
/// use mapperlate::{NodeAttributes, SqlNode, TreeBuilder};
///
/// let mut builder = TreeBuilder::new();
/// builder
///     .text("SELECT * FROM users")?
///     .start("where", &NodeAttributes::new())?
///     .start("if", &NodeAttributes::from_pairs([("test", "id != null")]))?
///     .text("AND id = #{id}")?
///     .end("if")?
///     .end("where")?;
///
/// let statement = builder.finish()?;
/// assert_eq!(
///     statement.restore_to_string()?,
///     "SELECT * FROM users WHERE id = ?"
/// );
/// # Ok::<(), mapperlate::MapperlateError>(())
/// ```
#[derive(Debug, Default)]
pub struct TreeBuilder {
    root: RootNode,
    open: Vec<(DirectiveKind, Node)>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a directive element. Everything up to the matching [`end`] is
    /// nested inside it.
    ///
    /// # Errors
    /// - If `tag` is not a known directive.
    ///
    /// [`end`]: Self::end
    pub fn start<T: AsRef<str>>(
        &mut self,
        tag: T,
        attributes: &NodeAttributes,
    ) -> MapperlateResult<&mut Self> {
        let kind: DirectiveKind = tag.as_ref().parse()?;
        self.open.push((kind, Node::from_directive(kind, attributes)));
        Ok(self)
    }

    /// Appends a run of literal text to the innermost open element.
    ///
    /// # Errors
    /// - If the text holds a malformed placeholder.
    pub fn text<T: AsRef<str>>(&mut self, text: T) -> MapperlateResult<&mut Self> {
        for node in parse_text(text.as_ref())? {
            self.append(node);
        }
        Ok(self)
    }

    /// Closes the innermost open element.
    ///
    /// # Errors
    /// - If `tag` does not name the innermost open element, or nothing is
    ///   open.
    pub fn end<T: AsRef<str>>(&mut self, tag: T) -> MapperlateResult<&mut Self> {
        let tag = tag.as_ref();
        match self.open.pop() {
            Some((kind, node)) if kind.as_str() == tag => {
                self.append(node);
                Ok(self)
            }
            Some((kind, node)) => {
                let expected = kind.as_str().to_owned();
                self.open.push((kind, node));
                Err(MapperlateError::UnbalancedTag {
                    expected,
                    found: tag.to_owned(),
                })
            }
            None => Err(MapperlateError::UnbalancedTag {
                expected: String::new(),
                found: tag.to_owned(),
            }),
        }
    }

    /// Returns the assembled statement as a root node.
    ///
    /// # Errors
    /// - If an element is still open; the innermost one is reported.
    pub fn finish(self) -> MapperlateResult<Node> {
        if let Some((kind, _)) = self.open.last() {
            return Err(MapperlateError::UnclosedTag {
                tag: kind.as_str().to_owned(),
            });
        }
        tracing::debug!(children = self.root.children.len(), "statement tree assembled");
        Ok(Node::Root(self.root))
    }

    fn append(&mut self, node: Node) {
        match self.open.last_mut() {
            Some((_, parent)) => parent.add_child(node),
            None => self.root.add_child(node),
        }
    }
}
