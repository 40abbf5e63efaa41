//! Allow-list parser from markup strings to [`RichText`].
//!
//! The parser never fails: anything outside the supported subset is
//! dropped (keeping its text where that makes sense), so whatever comes
//! out of it can be serialized back into well-formed markup.

use std::rc::Rc;

use super::text::decode_entities;
use super::types::{Block, BlockKind, Cell, Marks, RichText};
use super::url::{UrlTarget, is_safe_url};

/// Parse a markup string into structured content.
pub fn parse(markup: &str) -> RichText {
    let mut builder = Builder::default();
    for token in Tokenizer::new(markup) {
        builder.feed(token);
    }
    builder.finish()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    Text(&'a str),
    Open {
        name: String,
        attrs: Vec<(String, String)>,
        self_closing: bool,
    },
    Close(String),
}

struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    const fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    /// Skip past the next occurrence of `end`, or to the end of input.
    fn skip_past(&mut self, end: &str) {
        let rest = &self.src[self.pos..];
        self.pos += rest.find(end).map_or(rest.len(), |idx| idx + end.len());
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let rest = &self.src[self.pos..];
            if rest.is_empty() {
                return None;
            }
            if rest.starts_with("<!--") {
                self.skip_past("-->");
                continue;
            }
            if rest.starts_with("<!") || rest.starts_with("<?") {
                self.skip_past(">");
                continue;
            }
            if rest.starts_with('<') {
                if let Some((token, consumed)) = parse_tag(rest) {
                    self.pos += consumed;
                    return Some(token);
                }
                self.pos += 1;
                return Some(Token::Text(&rest[..1]));
            }
            let end = rest.find('<').unwrap_or(rest.len());
            self.pos += end;
            return Some(Token::Text(&rest[..end]));
        }
    }
}

/// Parse one tag at the start of `s`.
///
/// Returns `None` when `s` does not start with a complete tag, in which
/// case the `<` is treated as text.
fn parse_tag(s: &str) -> Option<(Token<'_>, usize)> {
    let bytes = s.as_bytes();
    let len = bytes.len();
    let closing = bytes.get(1) == Some(&b'/');
    let mut i = if closing { 2 } else { 1 };

    let name_start = i;
    if !bytes.get(i)?.is_ascii_alphabetic() {
        return None;
    }
    while i < len && bytes[i].is_ascii_alphanumeric() {
        i += 1;
    }
    let name = s[name_start..i].to_ascii_lowercase();

    let mut attrs = Vec::new();
    let mut self_closing = false;
    loop {
        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        match bytes.get(i)? {
            b'>' => {
                i += 1;
                break;
            }
            b'/' => {
                self_closing = true;
                i += 1;
            }
            _ => {
                let attr_start = i;
                while i < len
                    && !bytes[i].is_ascii_whitespace()
                    && !matches!(bytes[i], b'=' | b'>' | b'/')
                {
                    i += 1;
                }
                let attr_name = s[attr_start..i].to_ascii_lowercase();
                while i < len && bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                let mut value = "";
                if bytes.get(i) == Some(&b'=') {
                    i += 1;
                    while i < len && bytes[i].is_ascii_whitespace() {
                        i += 1;
                    }
                    match bytes.get(i)? {
                        quote @ (b'"' | b'\'') => {
                            let quote = *quote;
                            let value_start = i + 1;
                            let value_len = bytes[value_start..].iter().position(|&b| b == quote)?;
                            value = &s[value_start..value_start + value_len];
                            i = value_start + value_len + 1;
                        }
                        _ => {
                            let value_start = i;
                            while i < len && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                                i += 1;
                            }
                            value = &s[value_start..i];
                        }
                    }
                }
                self_closing = false;
                if !attr_name.is_empty() {
                    attrs.push((attr_name, decode_entities(value).into_owned()));
                }
            }
        }
    }

    let token = if closing {
        Token::Close(name)
    } else {
        Token::Open {
            name,
            attrs,
            self_closing,
        }
    };
    Some((token, i))
}

#[derive(Debug, Default)]
struct Builder {
    blocks: Vec<Block>,
    current: Option<Block>,
    /// The current block was opened by a container element and has not
    /// received content yet.
    fresh: bool,
    bold: usize,
    italic: usize,
    underline: usize,
    links: Vec<Option<Rc<str>>>,
    lists: Vec<BlockKind>,
    list_items: usize,
    /// Name of a raw-text element whose content is being dropped.
    skipping: Option<String>,
}

impl Builder {
    fn feed(&mut self, token: Token<'_>) {
        if let Some(skipping) = &self.skipping {
            if matches!(&token, Token::Close(name) if name == skipping) {
                self.skipping = None;
            }
            return;
        }
        match token {
            Token::Text(text) => self.text(text),
            Token::Open {
                name,
                attrs,
                self_closing,
            } => self.open(&name, &attrs, self_closing),
            Token::Close(name) => self.close(&name),
        }
    }

    fn finish(mut self) -> RichText {
        self.close_current();
        RichText::from_blocks(self.blocks)
    }

    fn open(&mut self, name: &str, attrs: &[(String, String)], self_closing: bool) {
        if self_closing && !matches!(name, "img" | "br") {
            return;
        }
        match name {
            "b" | "strong" => self.bold += 1,
            "i" | "em" => self.italic += 1,
            "u" | "ins" => self.underline += 1,
            "a" => {
                let href = attr(attrs, "href")
                    .filter(|href| is_safe_url(href, UrlTarget::Link))
                    .map(Rc::from);
                self.links.push(href);
            }
            "img" => {
                if let Some(src) = attr(attrs, "src").filter(|src| is_safe_url(src, UrlTarget::Image)) {
                    self.push_cell(Cell::Image { src: Rc::from(src) });
                }
            }
            "br" => self.line_break(),
            "p" | "div" => self.open_block(self.context_kind()),
            "ul" => {
                self.close_current();
                self.lists.push(BlockKind::Bullet);
            }
            "ol" => {
                self.close_current();
                self.lists.push(BlockKind::Numbered);
            }
            "li" => {
                self.list_items += 1;
                self.open_block(self.lists.last().copied().unwrap_or(BlockKind::Bullet));
            }
            "script" | "style" => self.skipping = Some(name.to_string()),
            _ => {}
        }
    }

    fn close(&mut self, name: &str) {
        match name {
            "b" | "strong" => self.bold = self.bold.saturating_sub(1),
            "i" | "em" => self.italic = self.italic.saturating_sub(1),
            "u" | "ins" => self.underline = self.underline.saturating_sub(1),
            "a" => {
                self.links.pop();
            }
            "p" | "div" => self.close_current(),
            "li" => {
                self.close_current();
                self.list_items = self.list_items.saturating_sub(1);
            }
            "ul" | "ol" => {
                self.close_current();
                self.lists.pop();
            }
            _ => {}
        }
    }

    fn text(&mut self, raw: &str) {
        let decoded = decode_entities(raw);
        let container_empty = self
            .current
            .as_ref()
            .is_none_or(|b| b.is_empty() && self.fresh);
        // Indentation between elements, not content.
        if container_empty
            && decoded.contains('\n')
            && decoded.chars().all(|c| c.is_ascii_whitespace())
        {
            return;
        }
        let marks = self.marks();
        let link = self.links.last().cloned().flatten();
        for ch in decoded.chars() {
            let ch = if matches!(ch, '\n' | '\r' | '\t') { ' ' } else { ch };
            self.push_cell(Cell::Char {
                ch,
                marks,
                link: link.clone(),
            });
        }
    }

    const fn marks(&self) -> Marks {
        Marks {
            bold: self.bold > 0,
            italic: self.italic > 0,
            underline: self.underline > 0,
        }
    }

    fn context_kind(&self) -> BlockKind {
        if self.list_items > 0 {
            self.lists.last().copied().unwrap_or(BlockKind::Bullet)
        } else {
            BlockKind::Paragraph
        }
    }

    fn push_cell(&mut self, cell: Cell) {
        let kind = self.context_kind();
        self.current.get_or_insert_with(|| Block::new(kind)).cells.push(cell);
        self.fresh = false;
    }

    fn open_block(&mut self, kind: BlockKind) {
        if self.fresh
            && let Some(current) = self.current.as_mut()
            && current.is_empty()
        {
            current.kind = kind;
            return;
        }
        self.close_current();
        self.current = Some(Block::new(kind));
        self.fresh = true;
    }

    fn close_current(&mut self) {
        if let Some(block) = self.current.take() {
            self.blocks.push(block);
        }
        self.fresh = false;
    }

    fn line_break(&mut self) {
        if self.fresh && self.current.as_ref().is_some_and(Block::is_empty) {
            // `<p><br></p>` is how an empty line is spelled.
            self.fresh = false;
            return;
        }
        if let Some(current) = self.current.take() {
            let kind = current.kind;
            self.blocks.push(current);
            self.current = Some(Block::new(kind));
        } else {
            self.blocks.push(Block::new(self.context_kind()));
        }
        self.fresh = false;
    }
}

fn attr<'a>(attrs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.trim())
}
