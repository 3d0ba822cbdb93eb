// Canonical JSON rendering for tag trees.
// Layout: `{`, then one `\n<indent>"key":value` per child in key order joined by `,`,
// then `\n<indent>}`. Indent is two spaces per depth. No trailing newline.
use crate::core::tree::{Node, NodeKind, TagTree};

const INDENT: &str = "  ";
const COLOR_KEY: &str = "36";
const COLOR_STRING: &str = "32";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Style {
    Plain,
    Ansi,
}

pub fn render(tree: &TagTree) -> String {
    render_styled(tree, Style::Plain)
}

/// Same bytes as [`render`] when `style` is `Plain`; `Ansi` colors keys and strings.
pub fn render_styled(tree: &TagTree, style: Style) -> String {
    let mut out = String::new();
    write_node(tree.root(), style, &mut out);
    out
}

fn write_node(node: &Node, style: Style, out: &mut String) {
    match node.kind() {
        NodeKind::Leaf(text) => push_string(text, Escape::Leaf, style, out),
        NodeKind::Branch(children) => {
            out.push('{');
            for (idx, child) in children.values().enumerate() {
                if idx > 0 {
                    out.push(',');
                }
                out.push('\n');
                push_indent(child.depth(), out);
                push_string(child.tag(), Escape::Key, style, out);
                out.push(':');
                write_node(child, style, out);
            }
            out.push('\n');
            push_indent(node.depth(), out);
            out.push('}');
        }
    }
}

fn push_indent(level: usize, out: &mut String) {
    for _ in 0..level {
        out.push_str(INDENT);
    }
}

// Keys and leaves were written by different encoders in legacy files: keys
// HTML-escape `<`, `>` and `&`, leaves keep them literal.
#[derive(Clone, Copy)]
enum Escape {
    Key,
    Leaf,
}

fn push_string(text: &str, escape: Escape, style: Style, out: &mut String) {
    let (color, write): (&str, fn(&str, &mut String)) = match escape {
        Escape::Key => (COLOR_KEY, write_json_key),
        Escape::Leaf => (COLOR_STRING, write_json_string),
    };
    if style == Style::Plain {
        write(text, out);
        return;
    }
    out.push_str("\u{1b}[");
    out.push_str(color);
    out.push('m');
    write(text, out);
    out.push_str("\u{1b}[0m");
}

/// Writes `text` as a quoted JSON string without HTML escaping.
///
/// `<`, `>` and `&` stay literal. Quote and backslash are escaped, the usual
/// control characters get short escapes, other controls use `\u00XX`, and
/// U+2028/U+2029 are escaped so the output stays valid JavaScript.
pub fn write_json_string(text: &str, out: &mut String) {
    write_escaped(text, false, out);
}

/// Writes an object key: same as [`write_json_string`] plus `<`, `>` and `&`
/// as `\u003c`, `\u003e` and `\u0026`.
pub fn write_json_key(text: &str, out: &mut String) {
    write_escaped(text, true, out);
}

fn write_escaped(text: &str, html: bool, out: &mut String) {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    out.push('"');
    for ch in text.chars() {
        match ch {
            '<' if html => out.push_str("\\u003c"),
            '>' if html => out.push_str("\\u003e"),
            '&' if html => out.push_str("\\u0026"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            ch if (ch as u32) < 0x20 => {
                let byte = ch as u8;
                out.push_str("\\u00");
                out.push(HEX[usize::from(byte >> 4)] as char);
                out.push(HEX[usize::from(byte & 0x0f)] as char);
            }
            ch => out.push(ch),
        }
    }
    out.push('"');
}
