//! Lenient markup parser.
//!
//! Never fails: unterminated constructs run to the end of input, unmatched
//! close tags are kept as raw text, and elements left open are closed where
//! their parent (or the document) ends. Tag and attribute names keep their
//! source spelling; all name matching is case-insensitive.

use super::tree::{Attribute, Document, Element, Node, Quote};
use crate::mapping;

/// Elements whose content is not markup.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

pub fn parse(source: &str) -> Document {
    let mut parser = Parser {
        src: source,
        pos: 0,
        stack: Vec::new(),
        root: Vec::new(),
    };
    parser.run();
    Document { children: parser.root }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    stack: Vec<Element>,
    root: Vec<Node>,
}

fn is_name_char(b: u8) -> bool {
    !(b.is_ascii_whitespace() || b == b'>' || b == b'/' || b == b'=')
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.as_bytes().get(self.pos + offset).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Consumes up to and including `terminator`, returning the text before
    /// it. Without a terminator the rest of the input is consumed.
    fn take_until(&mut self, terminator: &str) -> &'a str {
        let rest = self.rest();
        match rest.find(terminator) {
            Some(end) => {
                self.pos += end + terminator.len();
                &rest[..end]
            }
            None => {
                self.pos = self.src.len();
                rest
            }
        }
    }

    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        &self.src[start..self.pos]
    }

    fn push_node(&mut self, node: Node) {
        let siblings = match self.stack.last_mut() {
            Some(parent) => &mut parent.children,
            None => &mut self.root,
        };
        if let (Node::Text(text), Some(Node::Text(previous))) = (&node, siblings.last_mut()) {
            previous.push_str(text);
            return;
        }
        siblings.push(node);
    }

    fn close_top(&mut self) {
        if let Some(element) = self.stack.pop() {
            self.push_node(Node::Element(element));
        }
    }

    fn run(&mut self) {
        while self.pos < self.src.len() {
            let rest = self.rest();
            if rest.starts_with("<!--") {
                self.pos += 4;
                let body = self.take_until("-->");
                self.push_node(Node::Comment(body.to_string()));
            } else if rest.starts_with("<%") {
                let start = self.pos;
                self.take_until("%>");
                self.push_node(Node::Raw(self.src[start..self.pos].to_string()));
            } else if rest.starts_with("</")
                && self.peek_at(2).is_some_and(|b| b.is_ascii_alphabetic())
            {
                self.parse_close_tag();
            } else if rest.starts_with("<!") || rest.starts_with("<?") {
                let start = self.pos;
                self.take_until(">");
                self.push_node(Node::Raw(self.src[start..self.pos].to_string()));
            } else if rest.starts_with('<')
                && self.peek_at(1).is_some_and(|b| b.is_ascii_alphabetic())
            {
                self.parse_open_tag();
            } else {
                self.parse_text();
            }
        }
        while !self.stack.is_empty() {
            self.close_top();
        }
    }

    fn parse_text(&mut self) {
        let start = self.pos;
        // Always make progress, even on a lone '<'.
        self.pos += 1;
        while self.peek().is_some_and(|b| b != b'<') {
            self.pos += 1;
        }
        // `pos` only stops on ASCII bytes or the end, so this is a char boundary.
        self.push_node(Node::Text(self.src[start..self.pos].to_string()));
    }

    fn parse_open_tag(&mut self) {
        let start = self.pos;
        self.pos += 1;
        let name = self.take_while(is_name_char);
        let mut element = Element::new(name);

        loop {
            self.skip_whitespace();
            match self.peek() {
                None => {
                    // Unterminated tag: keep the source as text.
                    self.pos = self.src.len();
                    self.push_node(Node::Text(self.src[start..].to_string()));
                    return;
                }
                Some(b'>') => {
                    self.pos += 1;
                    break;
                }
                Some(b'/') if self.peek_at(1) == Some(b'>') => {
                    self.pos += 2;
                    element.self_closing = true;
                    break;
                }
                Some(b'/') | Some(b'=') => self.pos += 1,
                Some(_) => {
                    let attribute = self.parse_attribute();
                    element.attributes.push(attribute);
                }
            }
        }

        if element.self_closing || mapping::is_void_element(&element.name) {
            self.push_node(Node::Element(element));
        } else if RAW_TEXT_ELEMENTS
            .iter()
            .any(|raw| raw.eq_ignore_ascii_case(&element.name))
        {
            self.parse_raw_text_body(element);
        } else {
            self.stack.push(element);
        }
    }

    fn parse_attribute(&mut self) -> Attribute {
        let name = self.take_while(is_name_char).to_string();
        let after_name = self.pos;
        self.skip_whitespace();
        if self.peek() != Some(b'=') {
            self.pos = after_name;
            return Attribute {
                name,
                value: None,
                quote: Quote::Unquoted,
            };
        }
        self.pos += 1;
        self.skip_whitespace();
        let (value, quote) = match self.peek() {
            Some(b'"') => {
                self.pos += 1;
                (self.take_until("\""), Quote::Double)
            }
            Some(b'\'') => {
                self.pos += 1;
                (self.take_until("'"), Quote::Single)
            }
            _ => (
                self.take_while(|b| !(b.is_ascii_whitespace() || b == b'>')),
                Quote::Unquoted,
            ),
        };
        Attribute {
            name,
            value: Some(value.to_string()),
            quote,
        }
    }

    fn parse_raw_text_body(&mut self, mut element: Element) {
        let rest = self.rest();
        let close = format!("</{}", element.name.to_ascii_lowercase());
        let end = rest.to_ascii_lowercase().find(&close).unwrap_or(rest.len());
        if end > 0 {
            element.children.push(Node::Text(rest[..end].to_string()));
        }
        self.pos += end;
        if self.pos < self.src.len() {
            self.take_until(">");
        }
        self.push_node(Node::Element(element));
    }

    fn parse_close_tag(&mut self) {
        let start = self.pos;
        self.pos += 2;
        let name = self.take_until(">").trim();
        match self
            .stack
            .iter()
            .rposition(|open| open.name.eq_ignore_ascii_case(name))
        {
            Some(depth) => {
                while self.stack.len() > depth {
                    self.close_top();
                }
            }
            None => {
                log::debug!("Keeping unmatched close tag </{name}> as text");
                self.push_node(Node::Raw(self.src[start..self.pos].to_string()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only_element(doc: &Document) -> &Element {
        match doc.children.as_slice() {
            [Node::Element(element)] => element,
            other => panic!("expected a single element, got {other:?}"),
        }
    }

    #[test]
    fn parses_nested_elements_and_attributes() {
        let doc = parse(r#"<div id="main"><asp:Label runat="server" Text='Hi' /></div>"#);
        let div = only_element(&doc);
        assert_eq!(div.name, "div");
        assert_eq!(div.get_attribute("id"), Some("main"));
        match div.children.as_slice() {
            [Node::Element(label)] => {
                assert_eq!(label.name, "asp:Label");
                assert!(label.self_closing);
                assert_eq!(label.get_attribute("text"), Some("Hi"));
                assert_eq!(label.attributes[1].quote, Quote::Single);
            }
            other => panic!("unexpected children {other:?}"),
        }
    }

    #[test]
    fn close_tags_match_case_insensitively() {
        let doc = parse("<ASP:Panel><p>x</P></asp:panel>");
        let panel = only_element(&doc);
        assert_eq!(panel.name, "ASP:Panel");
        assert_eq!(panel.children.len(), 1);
    }

    #[test]
    fn void_elements_do_not_swallow_siblings() {
        let doc = parse("<p><br>after</p>");
        let p = only_element(&doc);
        assert!(matches!(&p.children[0], Node::Element(br) if br.name == "br"));
        assert_eq!(p.children[1], Node::Text("after".to_string()));
    }

    #[test]
    fn server_blocks_and_comments_are_opaque() {
        let doc = parse("<%= DateTime.Now %><!-- <asp:Button/> -->");
        assert_eq!(
            doc.children,
            vec![
                Node::Raw("<%= DateTime.Now %>".to_string()),
                Node::Comment(" <asp:Button/> ".to_string()),
            ]
        );
    }

    #[test]
    fn unmatched_close_tag_is_kept() {
        let doc = parse("a</span>b");
        assert_eq!(
            doc.children,
            vec![
                Node::Text("a".to_string()),
                Node::Raw("</span>".to_string()),
                Node::Text("b".to_string()),
            ]
        );
    }

    #[test]
    fn unclosed_elements_are_closed_at_end() {
        let doc = parse("<div><span>text");
        let div = only_element(&doc);
        assert!(matches!(&div.children[0], Node::Element(span) if span.children.len() == 1));
    }

    #[test]
    fn script_body_is_text() {
        let doc = parse("<script>if (a < b) { x(); }</script>");
        let script = only_element(&doc);
        assert_eq!(
            script.children,
            vec![Node::Text("if (a < b) { x(); }".to_string())]
        );
    }

    #[test]
    fn bare_and_unquoted_attributes() {
        let doc = parse("<input disabled value=42>");
        let input = only_element(&doc);
        assert_eq!(input.attributes[0].value, None);
        assert_eq!(input.attributes[1].value.as_deref(), Some("42"));
        assert_eq!(input.attributes[1].quote, Quote::Unquoted);
    }

    #[test]
    fn lone_angle_bracket_is_text() {
        let doc = parse("1 < 2");
        assert_eq!(doc.children, vec![Node::Text("1 < 2".to_string())]);
    }
}
