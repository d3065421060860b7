//! Lenient HTML tokenizer.
//!
//! Never fails: anything that does not look like a tag is text, and a tag cut
//! off by the end of input is closed implicitly.

use std::borrow::Cow;

use smol_str::SmolStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    /// Lowercased element name.
    pub name: SmolStr,
    pub attrs: Vec<(SmolStr, String)>,
    pub self_closing: bool,
}

impl StartTag {
    /// Value of the first attribute called `name` (case-insensitive).
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    StartTag(StartTag),
    EndTag(SmolStr),
    /// Text with entities decoded.
    Text(String),
    Comment,
    /// `<!DOCTYPE …>` and processing instructions.
    Declaration,
}

pub struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Consume up to and including `pat`, or everything if it never occurs.
    fn skip_past(&mut self, pat: &str) {
        match self.rest().find(pat) {
            Some(idx) => self.pos += idx + pat.len(),
            None => self.pos = self.src.len(),
        }
    }

    fn read_name(&mut self) -> SmolStr {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| !c.is_whitespace() && c != '>' && c != '/' && c != '=')
        {
            self.bump();
        }
        SmolStr::new(self.src[start..self.pos].to_ascii_lowercase())
    }

    fn read_text(&mut self) -> Token {
        let start = self.pos;
        // Always consume at least one char so a lone `<` makes progress.
        self.bump();
        match self.rest().find('<') {
            Some(idx) => self.pos += idx,
            None => self.pos = self.src.len(),
        }
        Token::Text(decode_entities(&self.src[start..self.pos]).into_owned())
    }

    fn read_attr_value(&mut self) -> String {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                let start = self.pos;
                let end = self.rest().find(quote).map(|i| start + i);
                let raw = &self.src[start..end.unwrap_or(self.src.len())];
                self.pos = end.map(|e| e + 1).unwrap_or(self.src.len());
                decode_entities(raw).into_owned()
            }
            _ => {
                let start = self.pos;
                while self.peek().is_some_and(|c| !c.is_whitespace() && c != '>') {
                    self.bump();
                }
                decode_entities(&self.src[start..self.pos]).into_owned()
            }
        }
    }

    fn read_start_tag(&mut self) -> Token {
        // Past the `<`.
        let name = self.read_name();
        let mut attrs = Vec::new();
        let mut self_closing = false;

        loop {
            self.skip_whitespace();
            match self.peek() {
                None => break,
                Some('>') => {
                    self.bump();
                    break;
                }
                Some('/') => {
                    self.bump();
                    if self.peek() == Some('>') {
                        self.bump();
                        self_closing = true;
                        break;
                    }
                }
                Some('=') => {
                    // Stray `=` with no attribute name.
                    self.bump();
                }
                Some(_) => {
                    let key = self.read_name();
                    self.skip_whitespace();
                    let value = if self.peek() == Some('=') {
                        self.bump();
                        self.skip_whitespace();
                        self.read_attr_value()
                    } else {
                        String::new()
                    };
                    attrs.push((key, value));
                }
            }
        }

        Token::StartTag(StartTag {
            name,
            attrs,
            self_closing,
        })
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let rest = self.rest();
        if rest.is_empty() {
            return None;
        }
        if !rest.starts_with('<') {
            return Some(self.read_text());
        }

        let mut chars = rest.chars().skip(1);
        let second = chars.next();
        let third = chars.next();
        let token = match second {
            Some('!') if rest.starts_with("<!--") => {
                self.pos += 4;
                self.skip_past("-->");
                Token::Comment
            }
            Some('!' | '?') => {
                self.skip_past(">");
                Token::Declaration
            }
            Some('/') if third.is_some_and(|c| c.is_ascii_alphabetic()) => {
                self.pos += 2;
                let name = self.read_name();
                self.skip_past(">");
                Token::EndTag(name)
            }
            Some(c) if c.is_ascii_alphabetic() => {
                self.pos += 1;
                self.read_start_tag()
            }
            _ => self.read_text(),
        };
        Some(token)
    }
}

/// Decode character references. Unknown references are kept literally.
pub fn decode_entities(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest[1..]
            .find(';')
            .filter(|&end| end > 0 && end <= 10)
            .and_then(|end| decode_reference(&rest[1..=end]).map(|c| (c, end + 2)));
        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn decode_reference(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    Some(match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{A0}',
        "copy" => '©',
        "reg" => '®',
        "trade" => '™',
        "hellip" => '…',
        "mdash" => '—',
        "ndash" => '–',
        "laquo" => '«',
        "raquo" => '»',
        "lsquo" => '‘',
        "rsquo" => '’',
        "ldquo" => '“',
        "rdquo" => '”',
        "euro" => '€',
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(src: &str) -> Vec<Token> {
        Tokenizer::new(src).collect()
    }

    #[test]
    fn test_tags_and_text() {
        let toks = tokens(r#"<p style="text-align: center">a &amp; b</p>"#);
        assert_eq!(toks.len(), 3);
        match &toks[0] {
            Token::StartTag(tag) => {
                assert_eq!(tag.name, "p");
                assert_eq!(tag.attr("STYLE"), Some("text-align: center"));
            }
            other => panic!("expected start tag, got {other:?}"),
        }
        assert_eq!(toks[1], Token::Text("a & b".into()));
        assert_eq!(toks[2], Token::EndTag("p".into()));
    }

    #[test]
    fn test_self_closing_and_unquoted() {
        let toks = tokens("<IMG src=blob:x draggable />");
        let Token::StartTag(tag) = &toks[0] else {
            panic!("expected start tag");
        };
        assert_eq!(tag.name, "img");
        assert!(tag.self_closing);
        assert_eq!(tag.attr("src"), Some("blob:x"));
        assert_eq!(tag.attr("draggable"), Some(""));
    }

    #[test]
    fn test_stray_angle_bracket_is_text() {
        let toks = tokens("1 < 2 <3");
        let text: String = toks
            .iter()
            .map(|t| match t {
                Token::Text(s) => s.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(text, "1 < 2 <3");
    }

    #[test]
    fn test_comments_and_doctype() {
        let toks = tokens("<!DOCTYPE html><!-- hi -->x");
        assert_eq!(
            toks,
            vec![Token::Declaration, Token::Comment, Token::Text("x".into())]
        );
    }

    #[test]
    fn test_unterminated_tag() {
        let toks = tokens("<b class=\"x");
        assert!(matches!(&toks[0], Token::StartTag(t) if t.name == "b"));
        assert_eq!(toks.len(), 1);
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("&lt;b&gt;"), "<b>");
        assert_eq!(decode_entities("&#65;&#x42;"), "AB");
        assert_eq!(decode_entities("a&nbsp;b"), "a\u{A0}b");
        assert_eq!(decode_entities("fish & chips"), "fish & chips");
        assert_eq!(decode_entities("&bogus;"), "&bogus;");
    }
}
