use crate::frontend::token::{Spanned, Token};

/// Lazy scanner over a source buffer.
///
/// There is no reset: to rescan, build a new `Lexer` over the same bytes.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a [u8]) -> Self {
        Lexer { source, pos: 0 }
    }

    pub fn source(&self) -> &'a [u8] {
        self.source
    }

    fn skip_comments(&mut self) {
        while let Some(&b) = self.source.get(self.pos) {
            if Token::from_byte(b).is_some() {
                break;
            }
            self.pos += 1;
        }
    }

    pub fn next_token(&mut self) -> Spanned {
        self.skip_comments();

        match self.source.get(self.pos).copied().and_then(Token::from_byte) {
            Some(token) => {
                let offset = self.pos;
                self.pos += 1;
                Spanned { token, offset }
            }
            None => Spanned {
                token: Token::Eof,
                offset: self.source.len(),
            },
        }
    }

    /// Looks at the next token without consuming it.
    pub fn peek(&mut self) -> Spanned {
        let pos = self.pos;
        let next = self.next_token();
        self.pos = pos;
        next
    }

    /// Collects every token, including the trailing `Eof`.
    pub fn tokenize(&mut self) -> Vec<Spanned> {
        let mut tokens = Vec::new();
        loop {
            let t = self.next_token();
            let done = t.token == Token::Eof;
            tokens.push(t);
            if done {
                return tokens;
            }
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Spanned;

    fn next(&mut self) -> Option<Spanned> {
        let t = self.next_token();
        (t.token != Token::Eof).then_some(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token> {
        Lexer::new(source.as_bytes()).map(|s| s.token).collect()
    }

    #[test]
    fn test_all_commands() {
        assert_eq!(
            tokens("><+-.,[]"),
            vec![
                Token::RArrow,
                Token::LArrow,
                Token::Plus,
                Token::Minus,
                Token::Dot,
                Token::Comma,
                Token::LBracket,
                Token::RBracket,
            ]
        );
    }

    #[test]
    fn test_comments_skipped() {
        assert_eq!(
            tokens("add two + and + then print: ."),
            vec![Token::Plus, Token::Plus, Token::Dot]
        );
    }

    #[test]
    fn test_offsets() {
        let offsets: Vec<usize> = Lexer::new(b"a+ b\n-").map(|s| s.offset).collect();
        assert_eq!(offsets, vec![1, 5]);
    }

    #[test]
    fn test_eof_offset_is_source_len() {
        let mut lexer = Lexer::new(b"+ comment");
        assert_eq!(lexer.next_token().token, Token::Plus);
        let eof = lexer.next_token();
        assert_eq!(eof.token, Token::Eof);
        assert_eq!(eof.offset, 9);
    }

    #[test]
    fn test_eof_is_sticky() {
        let mut lexer = Lexer::new(b"");
        assert_eq!(lexer.next_token().token, Token::Eof);
        assert_eq!(lexer.next_token().token, Token::Eof);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut lexer = Lexer::new(b" + -");
        let peeked = lexer.peek();
        assert_eq!(peeked, Spanned { token: Token::Plus, offset: 1 });
        assert_eq!(lexer.next_token(), peeked);
        assert_eq!(lexer.peek().token, Token::Minus);
        assert_eq!(lexer.next_token().token, Token::Minus);
        assert_eq!(lexer.peek().token, Token::Eof);
    }

    #[test]
    fn test_tokenize_ends_with_eof() {
        let all = Lexer::new(b"[]").tokenize();
        assert_eq!(all.len(), 3);
        assert_eq!(all[2], Spanned { token: Token::Eof, offset: 2 });
    }

    #[test]
    fn test_only_comments() {
        assert!(tokens("hello world\n\t 123").is_empty());
    }

    #[test]
    fn test_non_utf8_bytes_are_comments() {
        let mut lexer = Lexer::new(&[0xff, b'+', 0xc3, 0x28]);
        assert_eq!(lexer.next_token(), Spanned { token: Token::Plus, offset: 1 });
        assert_eq!(lexer.next_token().token, Token::Eof);
    }
}
