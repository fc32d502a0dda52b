use std::io::Write;

use crate::{
    MapperlateResult,
    ast::{
        ChooseNode, IfNode, Node, OtherwiseNode, PlaceholderKind, PlaceholderNode, RootNode,
        SetNode, TextNode, TrimNode, WhenNode, WhereNode,
    },
    interface::SqlNode,
};

/// Separator written before directive content so that it never glues onto
/// the preceding token, e.g. `id = 1` followed by `AND x = 2`.
const DIRECTIVE_SEPARATOR: &[u8] = b" ";
/// `<when>` bodies are separated by two spaces rather than one.
const WHEN_SEPARATOR: &[u8] = b"  ";

fn restore_children<W: Write + ?Sized>(children: &[Node], sink: &mut W) -> MapperlateResult<()> {
    for child in children {
        child.restore(sink)?;
    }
    Ok(())
}

/// Writes `separator` followed by every child, or nothing at all when there
/// are no children. The directive's condition is ignored.
fn restore_directive<W: Write + ?Sized>(
    separator: &[u8],
    children: &[Node],
    sink: &mut W,
) -> MapperlateResult<()> {
    if children.is_empty() {
        return Ok(());
    }
    sink.write_all(separator)?;
    restore_children(children, sink)
}

/// Space, `\t`, `\n`, `\x0B`, `\x0C` and `\r`. Unlike `u8::is_ascii_whitespace`
/// this includes the vertical tab.
const fn is_sql_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\x0B' | b'\x0C' | b'\r')
}

fn trim_sql_whitespace(content: &[u8]) -> &[u8] {
    let Some(start) = content.iter().position(|&byte| !is_sql_whitespace(byte)) else {
        return &[];
    };
    let end = content
        .iter()
        .rposition(|&byte| !is_sql_whitespace(byte))
        .map_or(content.len(), |last| last + 1);
    content.get(start..end).unwrap_or_default()
}

/// Strips the first token that `content` starts with. Later tokens are not
/// tried once one matched, even if they would strip more.
fn strip_first_prefix<'a>(content: &'a [u8], tokens: &[String]) -> &'a [u8] {
    tokens
        .iter()
        .find_map(|token| {
            let stripped = content.strip_prefix(token.as_bytes())?;
            tracing::trace!(token = %token, "prefix override stripped");
            Some(stripped)
        })
        .unwrap_or(content)
}

fn strip_first_suffix<'a>(content: &'a [u8], tokens: &[String]) -> &'a [u8] {
    tokens
        .iter()
        .find_map(|token| {
            let stripped = content.strip_suffix(token.as_bytes())?;
            tracing::trace!(token = %token, "suffix override stripped");
            Some(stripped)
        })
        .unwrap_or(content)
}

fn write_separated<W: Write + ?Sized>(part: &[u8], sink: &mut W) -> MapperlateResult<()> {
    if part.is_empty() {
        return Ok(());
    }
    sink.write_all(DIRECTIVE_SEPARATOR)?;
    sink.write_all(part)?;
    Ok(())
}

impl SqlNode for TrimNode {
    /// Children are rendered into a local buffer first, since the overrides
    /// can only be matched against the fully assembled clause.
    ///
    /// A clause whose children render to nothing but whitespace vanishes,
    /// prefix and suffix included.
    fn restore<W: Write + ?Sized>(&self, sink: &mut W) -> MapperlateResult<()> {
        let mut buffer = Vec::new();
        restore_children(&self.children, &mut buffer)?;

        let content = trim_sql_whitespace(&buffer);
        if content.is_empty() {
            tracing::trace!(prefix = %self.prefix, suffix = %self.suffix, "empty clause dropped");
            return Ok(());
        }

        let content = strip_first_prefix(content, &self.prefix_overrides);
        let content = strip_first_suffix(content, &self.suffix_overrides);

        write_separated(self.prefix.as_bytes(), sink)?;
        write_separated(content, sink)?;
        write_separated(self.suffix.as_bytes(), sink)?;
        Ok(())
    }

    fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }
}

impl SqlNode for WhereNode {
    fn restore<W: Write + ?Sized>(&self, sink: &mut W) -> MapperlateResult<()> {
        self.trim.restore(sink)
    }

    fn add_child(&mut self, child: Node) {
        self.trim.add_child(child);
    }
}

impl SqlNode for SetNode {
    fn restore<W: Write + ?Sized>(&self, sink: &mut W) -> MapperlateResult<()> {
        self.trim.restore(sink)
    }

    fn add_child(&mut self, child: Node) {
        self.trim.add_child(child);
    }
}

impl SqlNode for IfNode {
    fn restore<W: Write + ?Sized>(&self, sink: &mut W) -> MapperlateResult<()> {
        restore_directive(DIRECTIVE_SEPARATOR, &self.children, sink)
    }

    fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }
}

impl SqlNode for ChooseNode {
    fn restore<W: Write + ?Sized>(&self, sink: &mut W) -> MapperlateResult<()> {
        restore_directive(DIRECTIVE_SEPARATOR, &self.children, sink)
    }

    fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }
}

impl SqlNode for WhenNode {
    fn restore<W: Write + ?Sized>(&self, sink: &mut W) -> MapperlateResult<()> {
        restore_directive(WHEN_SEPARATOR, &self.children, sink)
    }

    fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }
}

impl SqlNode for OtherwiseNode {
    fn restore<W: Write + ?Sized>(&self, sink: &mut W) -> MapperlateResult<()> {
        restore_directive(DIRECTIVE_SEPARATOR, &self.children, sink)
    }

    fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }
}

impl SqlNode for RootNode {
    fn restore<W: Write + ?Sized>(&self, sink: &mut W) -> MapperlateResult<()> {
        restore_children(&self.children, sink)
    }

    fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }
}

impl SqlNode for TextNode {
    fn restore<W: Write + ?Sized>(&self, sink: &mut W) -> MapperlateResult<()> {
        sink.write_all(self.text.as_bytes())?;
        Ok(())
    }

    fn add_child(&mut self, _child: Node) {
        tracing::trace!("child appended to a text node discarded");
    }
}

impl SqlNode for PlaceholderNode {
    /// Bind parameters restore as `?`; substitutions restore as the raw
    /// expression, which is usually an identifier.
    fn restore<W: Write + ?Sized>(&self, sink: &mut W) -> MapperlateResult<()> {
        match self.kind {
            PlaceholderKind::Bind => sink.write_all(b"?")?,
            PlaceholderKind::Substitution => sink.write_all(self.expression.as_bytes())?,
        }
        Ok(())
    }

    fn add_child(&mut self, _child: Node) {
        tracing::trace!("child appended to a placeholder node discarded");
    }
}

impl SqlNode for Node {
    fn restore<W: Write + ?Sized>(&self, sink: &mut W) -> MapperlateResult<()> {
        match self {
            Self::Root(node) => node.restore(sink),
            Self::Text(node) => node.restore(sink),
            Self::Placeholder(node) => node.restore(sink),
            Self::If(node) => node.restore(sink),
            Self::Choose(node) => node.restore(sink),
            Self::When(node) => node.restore(sink),
            Self::Otherwise(node) => node.restore(sink),
            Self::Trim(node) => node.restore(sink),
            Self::Where(node) => node.restore(sink),
            Self::Set(node) => node.restore(sink),
        }
    }

    fn add_child(&mut self, child: Node) {
        match self {
            Self::Root(node) => node.add_child(child),
            Self::Text(node) => node.add_child(child),
            Self::Placeholder(node) => node.add_child(child),
            Self::If(node) => node.add_child(child),
            Self::Choose(node) => node.add_child(child),
            Self::When(node) => node.add_child(child),
            Self::Otherwise(node) => node.add_child(child),
            Self::Trim(node) => node.add_child(child),
            Self::Where(node) => node.add_child(child),
            Self::Set(node) => node.add_child(child),
        }
    }
}
