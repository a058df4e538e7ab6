//! Java tokenizer used for comment harvesting and for re-deriving diagnostic
//! positions. Offsets are byte offsets into the source.

use jdt_bridge_api::{Comment, CommentKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    Keyword,
    Number,
    String,
    TextBlock,
    Char,
    Operator,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semi,
    Comma,
    Dot,
    At,
    Comment(CommentKind),
    Unknown,
}

impl TokenKind {
    pub fn is_bracket(self) -> bool {
        matches!(
            self,
            TokenKind::LParen
                | TokenKind::RParen
                | TokenKind::LBrace
                | TokenKind::RBrace
                | TokenKind::LBracket
                | TokenKind::RBracket
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: i32,
    pub end: i32,
}

impl Token {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start as usize..self.end as usize).unwrap_or("")
    }
}

const KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "null", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "true", "try", "void", "volatile", "while",
];

const OPERATORS: &[&str] = &[
    ">>>=", "<<=", ">>=", ">>>", "...", "->", "::", "++", "--", "&&", "||", "==", "!=", "<=",
    ">=", "+=", "-=", "*=", "/=", "&=", "|=", "^=", "%=", "<<", ">>",
];

pub fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

/// Token stream over a source text. Comments are skipped unless requested.
pub struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
    keep_comments: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            bytes: source.as_bytes(),
            pos: 0,
            keep_comments: false,
        }
    }

    pub fn with_comments(source: &'a str) -> Self {
        Self {
            keep_comments: true,
            ..Self::new(source)
        }
    }

    /// Starts scanning at `offset` instead of the beginning.
    pub fn starting_at(mut self, offset: i32) -> Self {
        self.pos = (offset.max(0) as usize).min(self.bytes.len());
        self
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek(0) {
            if b.is_ascii_whitespace() || b == 0x0c {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn line_comment(&mut self) -> TokenKind {
        while let Some(b) = self.peek(0) {
            if b == b'\n' || b == b'\r' {
                break;
            }
            self.pos += 1;
        }
        TokenKind::Comment(CommentKind::Line)
    }

    fn block_comment(&mut self) -> TokenKind {
        // `/**/` is an empty block comment, not a doc comment.
        let doc = self.peek(2) == Some(b'*') && self.peek(3) != Some(b'/');
        self.pos += 2;
        while self.pos < self.bytes.len() {
            if self.peek(0) == Some(b'*') && self.peek(1) == Some(b'/') {
                self.pos += 2;
                break;
            }
            self.pos += 1;
        }
        if self.pos > self.bytes.len() {
            self.pos = self.bytes.len();
        }
        TokenKind::Comment(if doc { CommentKind::Doc } else { CommentKind::Block })
    }

    fn quoted(&mut self, quote: u8) {
        self.pos += 1;
        while let Some(b) = self.peek(0) {
            match b {
                b'\\' => self.pos += 2,
                b'\n' | b'\r' => break,
                _ if b == quote => {
                    self.pos += 1;
                    break;
                }
                _ => self.pos += 1,
            }
        }
        self.pos = self.pos.min(self.bytes.len());
    }

    fn text_block(&mut self) {
        self.pos += 3;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\\' => self.pos += 2,
                b'"' if self.bytes[self.pos..].starts_with(b"\"\"\"") => {
                    self.pos += 3;
                    break;
                }
                _ => self.pos += 1,
            }
        }
        self.pos = self.pos.min(self.bytes.len());
    }

    fn number(&mut self) {
        let hex = self.peek(0) == Some(b'0') && matches!(self.peek(1), Some(b'x' | b'X'));
        while let Some(b) = self.peek(0) {
            let exponent = if hex {
                matches!(b, b'p' | b'P')
            } else {
                matches!(b, b'e' | b'E')
            };
            if exponent && matches!(self.peek(1), Some(b'+' | b'-')) {
                self.pos += 2;
            } else if b.is_ascii_alphanumeric() || b == b'_' || b == b'.' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn operator(&mut self) -> TokenKind {
        let rest = &self.bytes[self.pos..];
        let len = OPERATORS
            .iter()
            .find(|op| rest.starts_with(op.as_bytes()))
            .map(|op| op.len())
            .unwrap_or(1);
        self.pos += len;
        TokenKind::Operator
    }

    fn scan(&mut self) -> Option<Token> {
        self.skip_whitespace();
        let start = self.pos;
        let b = self.peek(0)?;
        let kind = match b {
            b'/' if self.peek(1) == Some(b'/') => self.line_comment(),
            b'/' if self.peek(1) == Some(b'*') => self.block_comment(),
            b'"' if self.bytes[start..].starts_with(b"\"\"\"") => {
                self.text_block();
                TokenKind::TextBlock
            }
            b'"' => {
                self.quoted(b'"');
                TokenKind::String
            }
            b'\'' => {
                self.quoted(b'\'');
                TokenKind::Char
            }
            b'0'..=b'9' => {
                self.number();
                TokenKind::Number
            }
            b'.' if matches!(self.peek(1), Some(b'0'..=b'9')) => {
                self.number();
                TokenKind::Number
            }
            b'.' if !self.bytes[start..].starts_with(b"...") => {
                self.pos += 1;
                TokenKind::Dot
            }
            b'(' | b')' | b'{' | b'}' | b'[' | b']' | b';' | b',' | b'@' => {
                self.pos += 1;
                match b {
                    b'(' => TokenKind::LParen,
                    b')' => TokenKind::RParen,
                    b'{' => TokenKind::LBrace,
                    b'}' => TokenKind::RBrace,
                    b'[' => TokenKind::LBracket,
                    b']' => TokenKind::RBracket,
                    b';' => TokenKind::Semi,
                    b',' => TokenKind::Comma,
                    _ => TokenKind::At,
                }
            }
            _ if is_identifier_byte(b) => {
                while self.peek(0).is_some_and(is_identifier_byte) {
                    self.pos += 1;
                }
                let word = &self.bytes[start..self.pos];
                if KEYWORDS.iter().any(|k| k.as_bytes() == word) {
                    TokenKind::Keyword
                } else {
                    TokenKind::Identifier
                }
            }
            b'+' | b'-' | b'*' | b'/' | b'%' | b'=' | b'<' | b'>' | b'!' | b'~' | b'?' | b':'
            | b'&' | b'|' | b'^' | b'.' => self.operator(),
            _ => {
                self.pos += 1;
                TokenKind::Unknown
            }
        };
        Some(Token {
            kind,
            start: start as i32,
            end: self.pos as i32,
        })
    }
}

impl Iterator for Scanner<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            let token = self.scan()?;
            if self.keep_comments || !matches!(token.kind, TokenKind::Comment(_)) {
                return Some(token);
            }
        }
    }
}

/// Yields only the comments of a source text, in source order.
pub struct CommentScanner<'a> {
    inner: Scanner<'a>,
}

impl<'a> CommentScanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            inner: Scanner::with_comments(source),
        }
    }

    pub fn harvest(self) -> Vec<Comment> {
        self.collect()
    }
}

impl Iterator for CommentScanner<'_> {
    type Item = Comment;

    fn next(&mut self) -> Option<Comment> {
        self.inner.by_ref().find_map(|token| match token.kind {
            TokenKind::Comment(kind) => Some(Comment::new(kind, token.start, token.end)),
            _ => None,
        })
    }
}

/// Offset of `word` as a whole identifier in `source[from..to)`, skipping any
/// occurrence inside the excluded ranges.
pub fn find_word(source: &str, word: &str, from: i32, to: i32, excluded: &[(i32, i32)]) -> Option<i32> {
    if word.is_empty() || from < 0 {
        return None;
    }
    let bytes = source.as_bytes();
    let to = (to.max(0) as usize).min(bytes.len());
    let mut at = from as usize;
    while at < to {
        let hit = at + source.get(at..to)?.find(word)?;
        let end = hit + word.len();
        if end > to {
            return None;
        }
        let before_ok = hit == 0 || !is_identifier_byte(bytes[hit - 1]) || word_is_punctuated(word);
        let after_ok = end >= bytes.len() || !is_identifier_byte(bytes[end]) || word_is_punctuated(word);
        let hit_i = hit as i32;
        let end_i = end as i32;
        let blocked = excluded.iter().any(|&(s, e)| hit_i < e && s < end_i);
        if before_ok && after_ok && !blocked {
            return Some(hit_i);
        }
        at = hit + 1;
    }
    None
}

fn word_is_punctuated(word: &str) -> bool {
    !word.bytes().all(is_identifier_byte) && !word.contains('-')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Scanner::new(source).map(|t| t.kind).collect()
    }

    #[test]
    fn test_comment_text_inside_literals_is_not_a_comment() {
        let source = "String s = \"// not\"; char c = '/'; /* real */ String t = \"\"\"\n/** no */\n\"\"\";";
        let comments = CommentScanner::new(source).harvest();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].kind, CommentKind::Block);
        assert_eq!(comments[0].text(source), Some("/* real */"));
    }

    #[test]
    fn test_doc_and_line_comments() {
        let source = "/** doc */\n// line\n/**/ class A {}";
        let kinds: Vec<CommentKind> = CommentScanner::new(source).map(|c| c.kind).collect();
        assert_eq!(kinds, vec![CommentKind::Doc, CommentKind::Line, CommentKind::Block]);
    }

    #[test]
    fn test_operators_use_longest_match() {
        assert_eq!(
            kinds("a >>>= 1e+5;"),
            vec![
                TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::Number,
                TokenKind::Semi
            ]
        );
        let source = "x->y::z";
        let texts: Vec<&str> = Scanner::new(source).map(|t| t.text(source)).collect();
        assert_eq!(texts, vec!["x", "->", "y", "::", "z"]);
    }

    #[test]
    fn test_keywords_are_not_identifiers() {
        assert_eq!(
            kinds("int foo()"),
            vec![
                TokenKind::Keyword,
                TokenKind::Identifier,
                TokenKind::LParen,
                TokenKind::RParen
            ]
        );
    }

    #[test]
    fn test_find_word_respects_boundaries_and_exclusions() {
        let source = "final int finalize = final;";
        assert_eq!(find_word(source, "final", 1, 27, &[]), Some(21));
        assert_eq!(find_word(source, "final", 0, 27, &[(0, 5)]), Some(21));
        assert_eq!(find_word(source, "finalize", 0, 27, &[]), Some(10));
        assert_eq!(find_word(source, "nothing", 0, 27, &[]), None);
    }

    #[test]
    fn test_unterminated_comment_runs_to_end() {
        let source = "int a; /* open";
        let comments = CommentScanner::new(source).harvest();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].range.end(), source.len() as i32);
    }
}
