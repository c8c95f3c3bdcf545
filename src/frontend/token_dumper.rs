use std::io::{self, Write};

use crate::frontend::token::{Span, Spanned, Token};

/// Prints one line per token: position, kind, and the command character.
pub struct TokenDumper {
    pub color: bool,
    pub show_offsets: bool, // if true, append the raw byte offset
}

impl Default for TokenDumper {
    fn default() -> Self {
        Self {
            color: true,
            show_offsets: false,
        }
    }
}

impl TokenDumper {
    // ANSI colors
    const RESET: &'static str = "\x1b[0m";
    const DIM: &'static str = "\x1b[2m";
    const GRN: &'static str = "\x1b[32m";
    const YEL: &'static str = "\x1b[33m";
    const CYN: &'static str = "\x1b[36m";
    const MAG: &'static str = "\x1b[35m";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn no_color(mut self) -> Self {
        self.color = false;
        self
    }

    pub fn with_offsets(mut self) -> Self {
        self.show_offsets = true;
        self
    }

    pub fn dump<W: Write>(&self, tokens: &[Spanned], source: &[u8], out: &mut W) -> io::Result<()> {
        for s in tokens {
            self.print_one(s, source, out)?;
        }
        Ok(())
    }

    fn print_one<W: Write>(&self, s: &Spanned, source: &[u8], out: &mut W) -> io::Result<()> {
        let Span { line, col } = Span::locate(source, s.offset);

        let kind = self.kind(&s.token);
        let colr = if self.color { self.color(&s.token) } else { "" };
        let reset = if self.color { Self::RESET } else { "" };

        write!(out, "[{:02}:{:02}] {}{:<6} {}{}", line, col, colr, kind, s.token, reset)?;
        if self.show_offsets {
            write!(out, " @{}", s.offset)?;
        }
        writeln!(out)
    }

    fn kind(&self, t: &Token) -> &'static str {
        use Token::*;
        match t {
            RArrow | LArrow => "MOVE",
            Plus | Minus => "ARITH",
            Dot | Comma => "IO",
            LBracket | RBracket => "LOOP",
            Eof => "EOF",
        }
    }

    fn color(&self, t: &Token) -> &'static str {
        use Token::*;
        match t {
            RArrow | LArrow => Self::CYN,
            Plus | Minus => Self::MAG,
            Dot | Comma => Self::GRN,
            LBracket | RBracket => Self::YEL,
            Eof => Self::DIM,
        }
    }
}
