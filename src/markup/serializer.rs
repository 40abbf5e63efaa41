//! Serialization of [`RichText`] back into markup.

use super::text::{escape_attr, escape_text};
use super::types::{Block, BlockKind, Cell, InlineStyle, Marks, RichText};

/// Serialize content into the supported markup subset.
///
/// A document made of a single paragraph is written as bare inline
/// content; anything else wraps paragraphs in `<p>` and groups list items
/// into `<ul>` / `<ol>`.
pub fn serialize(doc: &RichText) -> String {
    let mut out = String::new();
    let blocks = doc.blocks();
    if let [only] = blocks
        && only.kind == BlockKind::Paragraph
    {
        write_inline(&only.cells, &mut out);
        return out;
    }

    let mut open_list: Option<BlockKind> = None;
    for block in blocks {
        if open_list != Some(block.kind) {
            close_list(open_list.take(), &mut out);
        }
        match block.kind {
            BlockKind::Paragraph => write_wrapped("p", block, &mut out),
            kind @ (BlockKind::Bullet | BlockKind::Numbered) => {
                if open_list.is_none() {
                    out.push_str(list_open_tag(kind));
                    open_list = Some(kind);
                }
                write_wrapped("li", block, &mut out);
            }
        }
    }
    close_list(open_list, &mut out);
    out
}

const fn list_open_tag(kind: BlockKind) -> &'static str {
    match kind {
        BlockKind::Numbered => "<ol>",
        _ => "<ul>",
    }
}

fn close_list(kind: Option<BlockKind>, out: &mut String) {
    match kind {
        Some(BlockKind::Bullet) => out.push_str("</ul>"),
        Some(BlockKind::Numbered) => out.push_str("</ol>"),
        _ => {}
    }
}

fn write_wrapped(tag: &str, block: &Block, out: &mut String) {
    out.push('<');
    out.push_str(tag);
    out.push('>');
    write_inline(&block.cells, out);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

/// Write inline cells with canonical nesting: link, then bold, italic,
/// underline.
fn write_inline(cells: &[Cell], out: &mut String) {
    let mut idx = 0;
    while idx < cells.len() {
        match &cells[idx] {
            Cell::Image { src } => {
                out.push_str("<img src=\"");
                escape_attr(src, out);
                out.push_str("\">");
                idx += 1;
            }
            Cell::Char { link, .. } => {
                let run_end = idx
                    + cells[idx..]
                        .iter()
                        .take_while(|c| c.is_text() && c.link() == link.as_deref())
                        .count();
                if let Some(href) = link {
                    out.push_str("<a href=\"");
                    escape_attr(href, out);
                    out.push_str("\">");
                    write_styled_run(&cells[idx..run_end], out);
                    out.push_str("</a>");
                } else {
                    write_styled_run(&cells[idx..run_end], out);
                }
                idx = run_end;
            }
        }
    }
}

/// Write a run of text cells that share a link, grouping equal marks.
fn write_styled_run(cells: &[Cell], out: &mut String) {
    let mut idx = 0;
    while idx < cells.len() {
        let marks = cells[idx].marks().unwrap_or(Marks::NONE);
        let text: String = cells[idx..]
            .iter()
            .take_while(|c| c.marks() == Some(marks))
            .filter_map(Cell::as_char)
            .collect();
        idx += text.chars().count().max(1);

        for style in InlineStyle::ALL.iter().filter(|s| marks.has(**s)) {
            out.push('<');
            out.push_str(style.tag());
            out.push('>');
        }
        escape_text(&text, out);
        for style in InlineStyle::ALL.iter().rev().filter(|s| marks.has(**s)) {
            out.push_str("</");
            out.push_str(style.tag());
            out.push('>');
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::markup::parse;

    #[test]
    fn test_single_paragraph_is_bare_inline() {
        assert_eq!(serialize(&parse("hi")), "hi");
        assert_eq!(serialize(&RichText::empty()), "");
    }

    #[test]
    fn test_styles_nest_in_canonical_order() {
        assert_eq!(serialize(&parse("<u><i><b>x</b></i></u>")), "<b><i><u>x</u></i></b>");
        assert_eq!(serialize(&parse("<b>a</b><b>b</b>")), "<b>ab</b>");
    }

    #[test]
    fn test_link_wraps_styled_runs() {
        let doc = parse(r#"<b><a href="/p">bo</a></b><a href="/p">ld</a>"#);
        assert_eq!(serialize(&doc), r#"<a href="/p"><b>bo</b>ld</a>"#);
    }

    #[test]
    fn test_multiple_blocks_use_paragraphs_and_lists() {
        let doc = RichText::from_blocks(vec![
            Block::from_text(BlockKind::Paragraph, "intro"),
            Block::from_text(BlockKind::Bullet, "a"),
            Block::from_text(BlockKind::Bullet, "b"),
            Block::from_text(BlockKind::Numbered, "one"),
            Block::from_text(BlockKind::Paragraph, ""),
        ]);
        assert_eq!(
            serialize(&doc),
            "<p>intro</p><ul><li>a</li><li>b</li></ul><ol><li>one</li></ol><p></p>"
        );
    }

    #[test]
    fn test_single_list_item_stays_a_list() {
        let doc = RichText::from_blocks(vec![Block::from_text(BlockKind::Numbered, "x")]);
        assert_eq!(serialize(&doc), "<ol><li>x</li></ol>");
    }

    #[test]
    fn test_text_and_attributes_are_escaped() {
        let mut block = Block::from_text(BlockKind::Paragraph, "a<b>&");
        block.cells.push(Cell::Image {
            src: Rc::from("x.png?a=\"1\""),
        });
        let doc = RichText::from_blocks(vec![block]);
        assert_eq!(
            serialize(&doc),
            "a&lt;b&gt;&amp;<img src=\"x.png?a=&quot;1&quot;\">"
        );
    }

    #[test]
    fn test_serialized_output_parses_back_to_same_content() {
        let markup = r#"<p><b>bold</b> and <a href="https://x.io"><i>link</i></a></p><p></p><ul><li>item<img src="a.png"></li></ul><p>end</p>"#;
        let doc = parse(markup);
        let again = parse(&serialize(&doc));
        assert_eq!(doc, again);
        assert_eq!(serialize(&again), markup);
    }
}
