/// The command alphabet, indexed in `Token` declaration order.
pub const COMMANDS: &[u8; 8] = b"><+-.,[]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    // Head movement
    RArrow, // >
    LArrow, // <

    // Cell arithmetic
    Plus,  // +
    Minus, // -

    // I/O
    Dot,   // .
    Comma, // ,

    // Loops
    LBracket, // [
    RBracket, // ]

    // Special
    Eof,
}

impl Token {
    /// Classifies a source byte. Anything outside `COMMANDS` is a comment.
    pub fn from_byte(byte: u8) -> Option<Token> {
        Some(match byte {
            b'>' => Token::RArrow,
            b'<' => Token::LArrow,
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            b'.' => Token::Dot,
            b',' => Token::Comma,
            b'[' => Token::LBracket,
            b']' => Token::RBracket,
            _ => return None,
        })
    }

    /// The source byte for a command token, `None` for `Eof`.
    pub fn as_byte(&self) -> Option<u8> {
        let idx = match self {
            Token::RArrow => 0,
            Token::LArrow => 1,
            Token::Plus => 2,
            Token::Minus => 3,
            Token::Dot => 4,
            Token::Comma => 5,
            Token::LBracket => 6,
            Token::RBracket => 7,
            Token::Eof => return None,
        };
        Some(COMMANDS[idx])
    }

    /// Returns true for the six commands the compiler folds into a counted op.
    pub fn is_foldable(&self) -> bool {
        matches!(
            self,
            Token::RArrow | Token::LArrow | Token::Plus | Token::Minus | Token::Dot | Token::Comma
        )
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.as_byte() {
            Some(b) => write!(f, "{}", b as char),
            None => write!(f, "EOF"),
        }
    }
}

/// A 1-based source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub col: usize,
}

impl Span {
    /// Translates a byte offset into a line/column pair by counting newlines
    /// before it. Offsets past the end clamp to the end of the source.
    pub fn locate(source: &[u8], offset: usize) -> Span {
        let mut span = Span { line: 1, col: 1 };
        for &b in &source[..offset.min(source.len())] {
            if b == b'\n' {
                span.line += 1;
                span.col = 1;
            } else {
                span.col += 1;
            }
        }
        span
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// A token and the byte offset it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spanned {
    pub token: Token,
    pub offset: usize,
}
