use tracing::debug;

use crate::{
    bytecode::{
        Op, Program,
        compile_error::{Bracket, CompileError},
        op::UNRESOLVED,
    },
    frontend::{
        lexer::Lexer,
        token::{Span, Spanned, Token},
    },
};

pub struct Compiler<'a> {
    lexer: Lexer<'a>,

    /// Output ops. Mutable only while compiling; handed out as a `Program`.
    ops: Vec<Op>,

    /// Indices of `JumpIfZero` ops still waiting for their `]`, paired with
    /// the source offset of the `[` for diagnostics.
    open_loops: Vec<(usize, usize)>,
}

impl<'a> Compiler<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self {
            lexer,
            ops: Vec::new(),
            open_loops: Vec::new(),
        }
    }

    /// Compiles the whole source. Nothing is returned on failure, so a
    /// half-built program can never reach the VM.
    pub fn compile(mut self) -> Result<Program, CompileError> {
        loop {
            let spanned = self.lexer.next_token();
            match spanned.token {
                Token::Eof => break,
                Token::LBracket => self.open_loop(spanned),
                Token::RBracket => self.close_loop(spanned)?,
                token => {
                    if let Some(op) = self.fold_run(token) {
                        self.ops.push(op);
                    }
                }
            }
        }

        // The bottom of the stack is the earliest `[` left open.
        if let Some(&(_, offset)) = self.open_loops.first() {
            return Err(self.mismatch(offset, Bracket::Open));
        }

        debug!(
            source_len = self.lexer.source().len(),
            ops = self.ops.len(),
            "compiled program"
        );

        Ok(Program::from_compiled(self.ops))
    }

    /// Collapses a run of identical commands into one counted op.
    /// Returns `None`, consuming nothing, for a token that cannot be folded.
    fn fold_run(&mut self, token: Token) -> Option<Op> {
        let counted: fn(usize) -> Op = match token {
            Token::RArrow => Op::Right,
            Token::LArrow => Op::Left,
            Token::Plus => Op::Incr,
            Token::Minus => Op::Decr,
            Token::Dot => Op::Output,
            Token::Comma => Op::Input,
            Token::LBracket | Token::RBracket | Token::Eof => return None,
        };

        let mut count = 1;
        while self.lexer.peek().token == token {
            self.lexer.next_token();
            count += 1;
        }
        Some(counted(count))
    }

    fn open_loop(&mut self, spanned: Spanned) {
        self.open_loops.push((self.ops.len(), spanned.offset));
        self.ops.push(Op::JumpIfZero(UNRESOLVED));
    }

    fn close_loop(&mut self, spanned: Spanned) -> Result<(), CompileError> {
        let (open, _) = self
            .open_loops
            .pop()
            .ok_or_else(|| self.mismatch(spanned.offset, Bracket::Close))?;

        self.ops.push(Op::JumpIfNonZero(open + 1));

        // `[` exits to the instruction right after this `]`.
        let exit = self.ops.len();
        if let Op::JumpIfZero(target) = &mut self.ops[open] {
            *target = exit;
        }
        Ok(())
    }

    fn mismatch(&self, offset: usize, bracket: Bracket) -> CompileError {
        CompileError::unmatched(Span::locate(self.lexer.source(), offset), bracket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn compile_str(source: &str) -> Result<Program, CompileError> {
        Compiler::new(Lexer::new(source.as_bytes())).compile()
    }

    fn ops(source: &str) -> Vec<Op> {
        compile_str(source).unwrap().ops().to_vec()
    }

    #[test]
    fn test_run_length_folding() {
        assert_eq!(
            ops("...><<+"),
            vec![Op::Output(3), Op::Right(1), Op::Left(2), Op::Incr(1)]
        );
    }

    #[test]
    fn test_fold_every_kind() {
        assert_eq!(
            ops(">>>> <<< ++ ----- .. ,,,"),
            vec![
                Op::Right(4),
                Op::Left(3),
                Op::Incr(2),
                Op::Decr(5),
                Op::Output(2),
                Op::Input(3),
            ]
        );
    }

    #[test]
    fn test_fold_spans_comments() {
        assert_eq!(ops("+ one\n+ two\n+ three"), vec![Op::Incr(3)]);
    }

    #[test]
    fn test_fold_does_not_cross_other_command() {
        assert_eq!(ops("++-++"), vec![Op::Incr(2), Op::Decr(1), Op::Incr(2)]);
    }

    #[test]
    fn test_long_run() {
        let source = "+".repeat(1000);
        assert_eq!(ops(&source), vec![Op::Incr(1000)]);
    }

    #[test]
    fn test_fold_run_rejects_brackets_and_eof() {
        let mut compiler = Compiler::new(Lexer::new(b"[[]]"));
        assert_eq!(compiler.fold_run(Token::LBracket), None);
        assert_eq!(compiler.fold_run(Token::Eof), None);
        assert_eq!(compiler.lexer.peek().offset, 0);
        assert!(compiler.ops.is_empty());
    }

    #[test]
    fn test_brackets_are_never_folded() {
        assert_eq!(
            ops("[[]]"),
            vec![
                Op::JumpIfZero(4),
                Op::JumpIfZero(3),
                Op::JumpIfNonZero(2),
                Op::JumpIfNonZero(1),
            ]
        );
    }

    #[test]
    fn test_simple_loop_targets() {
        assert_eq!(
            ops("+[-]"),
            vec![Op::Incr(1), Op::JumpIfZero(4), Op::Decr(1), Op::JumpIfNonZero(2)]
        );
    }

    #[test]
    fn test_empty_source() {
        assert!(compile_str("").unwrap().is_empty());
        assert!(compile_str("no commands here!\n").unwrap().is_empty());
    }

    #[test]
    fn test_jump_targets_are_mutual() {
        let program = compile_str("+[>[-]<[>+<-]]>[.,]").unwrap();
        for (i, op) in program.iter().enumerate() {
            if let Op::JumpIfZero(j) = *op {
                assert_eq!(program[j - 1], Op::JumpIfNonZero(i + 1), "loop at {}", i);
            }
        }
    }

    #[test]
    fn test_unmatched_close() {
        let err = compile_str("]").unwrap_err();
        assert_eq!(
            err,
            CompileError::unmatched(Span { line: 1, col: 1 }, Bracket::Close)
        );
    }

    #[test]
    fn test_unmatched_close_position() {
        let err = compile_str("+[-]\n  ]").unwrap_err();
        assert_eq!((err.line(), err.col()), (2, 3));
    }

    #[test]
    fn test_first_unmatched_close_is_reported() {
        let err = compile_str("[]]\n]").unwrap_err();
        assert_eq!((err.line(), err.col()), (1, 3));
    }

    #[test]
    fn test_unmatched_open_reports_first() {
        let err = compile_str("+\n [ [ []").unwrap_err();
        assert_eq!(
            err,
            CompileError::unmatched(Span { line: 2, col: 2 }, Bracket::Open)
        );
    }

    #[test]
    fn test_compile_is_deterministic() {
        let source = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]";
        assert_eq!(compile_str(source).unwrap(), compile_str(source).unwrap());
    }
}
