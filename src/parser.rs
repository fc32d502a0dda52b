use crate::{
    ast::{Node, PlaceholderKind, PlaceholderNode, TextNode},
    error::{ParseError, ParseErrorKind},
};

type ParseResult<T> = Result<T, ParseError>;

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    /// Current line number (1-indexed)
    line: usize,
    /// The starting location of the current line
    line_start_pos: usize,
}

impl<'a> Parser<'a> {
    const fn new(input: &'a str) -> Self {
        Parser {
            input,
            pos: 0,
            line: 1,
            line_start_pos: 0,
        }
    }

    #[inline]
    const fn current_column(&self) -> usize {
        self.pos - self.line_start_pos + 1
    }

    #[inline]
    const fn make_error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            line: self.line,
            column: self.current_column(),
            kind,
        }
    }

    #[inline]
    fn rest(&self) -> &'a str {
        self.input.get(self.pos..).unwrap_or_default()
    }

    const fn eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn current_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Advances the parser position past `current_char`, updating line
    /// tracking if it is a newline.
    #[inline]
    fn advance_by_char(&mut self, current_char: char) {
        let char_len = current_char.len_utf8();
        if current_char == '\n' {
            self.line += 1;
            self.line_start_pos = self.pos + char_len;
        }
        self.pos += char_len;
    }

    /// Advances the parser position by `len` bytes.
    /// Assumes the consumed text does NOT contain newlines.
    #[inline]
    const fn advance_bytes_no_newline(&mut self, len: usize) {
        self.pos += len;
    }

    /// Returns the placeholder kind if the remaining input opens one.
    fn peek_placeholder(&self) -> Option<PlaceholderKind> {
        let rest = self.rest();
        if rest.starts_with("#{") {
            Some(PlaceholderKind::Bind)
        } else if rest.starts_with("${") {
            Some(PlaceholderKind::Substitution)
        } else {
            None
        }
    }

    fn slice(&self, start: usize, end: usize) -> ParseResult<&'a str> {
        self.input.get(start..end).ok_or_else(|| {
            self.make_error(ParseErrorKind::Message(format!(
                "Invalid text boundary {}..{}",
                start, end
            )))
        })
    }

    /// Consumes literal text up to the next placeholder or the end of input.
    fn parse_text(&mut self) -> ParseResult<Option<Node>> {
        let start = self.pos;
        while let Some(current_char) = self.current_char() {
            if self.peek_placeholder().is_some() {
                break;
            }
            self.advance_by_char(current_char);
        }

        if self.pos == start {
            return Ok(None);
        }
        let text = self.slice(start, self.pos)?;
        Ok(Some(Node::Text(TextNode::new(text))))
    }

    /// Consumes a `#{...}` or `${...}` placeholder. Errors are reported at the
    /// position of the opening sigil.
    fn parse_placeholder(&mut self, kind: PlaceholderKind) -> ParseResult<Node> {
        let sigil = kind.sigil();
        let unclosed = self.make_error(ParseErrorKind::UnclosedPlaceholder { sigil });
        let empty = self.make_error(ParseErrorKind::EmptyPlaceholder { sigil });

        self.advance_bytes_no_newline(2);
        let start = self.pos;
        loop {
            match self.current_char() {
                Some('}') => break,
                Some(current_char) => self.advance_by_char(current_char),
                None => return Err(unclosed),
            }
        }

        let expression = self.slice(start, self.pos)?.trim();
        self.advance_bytes_no_newline(1);

        if expression.is_empty() {
            return Err(empty);
        }

        Ok(Node::Placeholder(PlaceholderNode {
            kind,
            expression: expression.to_owned(),
        }))
    }

    fn parse_nodes(&mut self) -> ParseResult<Vec<Node>> {
        let mut nodes = Vec::new();
        while !self.eof() {
            match self.peek_placeholder() {
                Some(kind) => nodes.push(self.parse_placeholder(kind)?),
                None => nodes.extend(self.parse_text()?),
            }
        }
        Ok(nodes)
    }
}

/// Splits literal statement text into text and placeholder nodes.
///
/// `#{expr}` becomes a bind placeholder and `${expr}` a substitution; any
/// other text, including a lone `#` or `$`, is kept verbatim. Empty text nodes
/// are never produced.
///
/// # Errors
/// - If a placeholder is never closed with `}`.
/// - If a placeholder holds no expression.
pub fn parse_text(input: &str) -> Result<Vec<Node>, ParseError> {
    if input.is_empty() {
        return Ok(Vec::new());
    }
    Parser::new(input).parse_nodes()
}
