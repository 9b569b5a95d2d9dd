//! Lexical scanner.
//!
//! Streams tokens with accurate zero-based positions. `\r`, `\r\n` and
//! `\n` all normalize to a single newline. `#` comments run to the end of
//! the line and are discarded, including a trailing comment cut off by end
//! of input. The scanner supports single-rune pushback, which the keyword
//! and integer scans use to retract their terminating rune.

use std::iter::Peekable;
use std::str::Chars;

use crate::token::{Position, Token, TokenKind};

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    position: Position,
    pushback: Option<(Option<char>, Position)>,
    disable_positions: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Lexer<'a> {
        Lexer {
            chars: input.chars().peekable(),
            position: Position::default(),
            pushback: None,
            disable_positions: false,
        }
    }

    /// Report every token at the origin position. Lets tests compare
    /// whole trees without spelling out positions.
    pub fn without_positions(mut self) -> Lexer<'a> {
        self.disable_positions = true;
        self
    }

    /// Scan the next token. Scanning past end of input keeps
    /// returning [`TokenKind::Eof`].
    pub fn scan(&mut self) -> Token {
        let (mut ch, mut pos) = self.read();

        // Skip comments and whitespace runs before the token.
        loop {
            match ch {
                Some('#') => self.skip_comment(),
                Some(c) if is_whitespace(c) => self.skip_whitespace(),
                _ => break,
            }
            let next = self.read();
            ch = next.0;
            pos = next.1;
        }

        match ch {
            None => self.token(TokenKind::Eof, "EOF", pos),
            Some(c) if is_letter(c) => self.scan_keyword(c, pos),
            Some(c) if c.is_ascii_digit() => self.scan_integer(c, pos),
            Some('"') => self.scan_string(),
            Some('(') => self.token(TokenKind::LParen, "(", pos),
            Some(')') => self.token(TokenKind::RParen, ")", pos),
            Some(',') => self.token(TokenKind::Comma, ",", pos),
            Some(':') => self.token(TokenKind::Colon, ":", pos),
            Some('+') => self.token(TokenKind::Add, "+", pos),
            Some('*') => self.token(TokenKind::Mul, "*", pos),
            Some(c) => Token {
                kind: TokenKind::Illegal,
                lexeme: c.to_string(),
                position: self.effective(pos),
            },
        }
    }

    /// Consume identifier runes after `first`. Only the four DSL words
    /// are keywords; anything else surfaces as one Illegal token so the
    /// parser can report the unknown word with its location.
    fn scan_keyword(&mut self, first: char, pos: Position) -> Token {
        let mut lexeme = String::from(first);
        loop {
            let (ch, p) = self.read();
            match ch {
                Some(c) if is_letter(c) || c.is_ascii_digit() || c == '_' => lexeme.push(c),
                other => {
                    self.unread(other, p);
                    break;
                }
            }
        }

        let kind = match lexeme.as_str() {
            "pod" => TokenKind::Pod,
            "cpu" => TokenKind::Cpu,
            "memory" => TokenKind::Memory,
            "gpu" => TokenKind::Gpu,
            _ => TokenKind::Illegal,
        };
        Token {
            kind,
            lexeme,
            position: self.effective(pos),
        }
    }

    fn scan_integer(&mut self, first: char, pos: Position) -> Token {
        let mut lexeme = String::from(first);
        loop {
            let (ch, p) = self.read();
            match ch {
                Some(c) if c.is_ascii_digit() => lexeme.push(c),
                other => {
                    self.unread(other, p);
                    break;
                }
            }
        }
        Token {
            kind: TokenKind::Integer,
            lexeme,
            position: self.effective(pos),
        }
    }

    /// Consume string contents after the opening quote. No escape
    /// processing; a newline or end of input before the closing quote
    /// yields BadString with the partial contents.
    fn scan_string(&mut self) -> Token {
        let (mut ch, pos) = self.read();
        let mut contents = String::new();
        loop {
            match ch {
                Some('"') => {
                    return Token {
                        kind: TokenKind::Str,
                        lexeme: contents,
                        position: self.effective(pos),
                    }
                }
                None | Some('\n') => {
                    return Token {
                        kind: TokenKind::BadString,
                        lexeme: contents,
                        position: self.effective(pos),
                    }
                }
                Some(c) => contents.push(c),
            }
            ch = self.read().0;
        }
    }

    fn skip_comment(&mut self) {
        loop {
            match self.read().0 {
                Some('\n') | None => return,
                Some(_) => {}
            }
        }
    }

    fn skip_whitespace(&mut self) {
        loop {
            let (ch, pos) = self.read();
            match ch {
                Some(c) if is_whitespace(c) => {}
                other => {
                    self.unread(other, pos);
                    return;
                }
            }
        }
    }

    /// Next rune and the position it was read at. Carriage returns
    /// normalize to a newline here, so the rest of the lexer only ever
    /// sees `\n`.
    fn read(&mut self) -> (Option<char>, Position) {
        if let Some(saved) = self.pushback.take() {
            return saved;
        }

        let pos = self.position;
        let ch = match self.chars.next() {
            Some('\r') => {
                if self.chars.peek() == Some(&'\n') {
                    self.chars.next();
                }
                Some('\n')
            }
            other => other,
        };

        match ch {
            Some('\n') => {
                self.position.line += 1;
                self.position.column = 0;
            }
            Some(_) => self.position.column += 1,
            None => {}
        }

        (ch, pos)
    }

    fn unread(&mut self, ch: Option<char>, pos: Position) {
        self.pushback = Some((ch, pos));
    }

    fn token(&self, kind: TokenKind, lexeme: &str, pos: Position) -> Token {
        Token {
            kind,
            lexeme: lexeme.to_string(),
            position: self.effective(pos),
        }
    }

    fn effective(&self, pos: Position) -> Position {
        if self.disable_positions {
            Position::default()
        } else {
            pos
        }
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n')
}

fn is_letter(c: char) -> bool {
    c.is_alphabetic()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_tokens(input: &str, expected: &[(TokenKind, &str)]) {
        let mut lexer = Lexer::new(input);
        for (kind, lexeme) in expected {
            let token = lexer.scan();
            assert_eq!(token.kind, *kind, "lexeme {:?}", token.lexeme);
            assert_eq!(token.lexeme, *lexeme);
        }
        assert_eq!(lexer.scan().kind, TokenKind::Eof);
    }

    #[test]
    fn scans_integers() {
        assert_tokens("9", &[(TokenKind::Integer, "9")]);
        assert_tokens("123", &[(TokenKind::Integer, "123")]);
    }

    #[test]
    fn scans_strings() {
        assert_tokens("\"abc\"", &[(TokenKind::Str, "abc")]);
        assert_tokens(
            "\"abc\" \"test\"",
            &[(TokenKind::Str, "abc"), (TokenKind::Str, "test")],
        );
    }

    #[test]
    fn unterminated_string_is_bad() {
        assert_tokens("\"abc", &[(TokenKind::BadString, "abc")]);
        assert_tokens("\"abc\n", &[(TokenKind::BadString, "abc")]);
        assert_tokens(
            "\"abc\"\"",
            &[(TokenKind::Str, "abc"), (TokenKind::BadString, "")],
        );
    }

    #[test]
    fn scans_mixed_literals_across_whitespace() {
        assert_tokens(
            "\"hello1\" \n\n\n 1234 \t\n\t   \"hhh4h33\" 111 34",
            &[
                (TokenKind::Str, "hello1"),
                (TokenKind::Integer, "1234"),
                (TokenKind::Str, "hhh4h33"),
                (TokenKind::Integer, "111"),
                (TokenKind::Integer, "34"),
            ],
        );
    }

    #[test]
    fn scans_keywords_and_unknown_identifiers() {
        assert_tokens(
            "\n\tpod cpu   memory\n\t gpu gpu pod da\n",
            &[
                (TokenKind::Pod, "pod"),
                (TokenKind::Cpu, "cpu"),
                (TokenKind::Memory, "memory"),
                (TokenKind::Gpu, "gpu"),
                (TokenKind::Gpu, "gpu"),
                (TokenKind::Pod, "pod"),
                (TokenKind::Illegal, "da"),
            ],
        );
    }

    #[test]
    fn identifiers_may_contain_digits_and_underscores() {
        assert_tokens("cpu_2x", &[(TokenKind::Illegal, "cpu_2x")]);
    }

    #[test]
    fn scans_symbols() {
        assert_tokens(
            "(),,    :",
            &[
                (TokenKind::LParen, "("),
                (TokenKind::RParen, ")"),
                (TokenKind::Comma, ","),
                (TokenKind::Comma, ","),
                (TokenKind::Colon, ":"),
            ],
        );
    }

    #[test]
    fn scans_operators_and_flags_unknown_runes() {
        assert_tokens(
            "+ ++ * | |",
            &[
                (TokenKind::Add, "+"),
                (TokenKind::Add, "+"),
                (TokenKind::Add, "+"),
                (TokenKind::Mul, "*"),
                (TokenKind::Illegal, "|"),
                (TokenKind::Illegal, "|"),
            ],
        );
    }

    #[test]
    fn comments_are_discarded() {
        assert_tokens(
            "# hello\n5 + 4 # good 3\n# # comment inside comment 3+2\npod(6 * 7) # )\n",
            &[
                (TokenKind::Integer, "5"),
                (TokenKind::Add, "+"),
                (TokenKind::Integer, "4"),
                (TokenKind::Pod, "pod"),
                (TokenKind::LParen, "("),
                (TokenKind::Integer, "6"),
                (TokenKind::Mul, "*"),
                (TokenKind::Integer, "7"),
                (TokenKind::RParen, ")"),
            ],
        );
    }

    #[test]
    fn comment_cut_off_by_end_of_input_is_discarded() {
        assert_tokens("5 # trailing", &[(TokenKind::Integer, "5")]);
        assert_tokens("# only a comment", &[]);
    }

    #[test]
    fn positions_are_zero_based_and_newline_normalized() {
        let mut lexer = Lexer::new("pod\n  cpu\r\n5");

        let pod = lexer.scan();
        assert_eq!(pod.position, Position { line: 0, column: 0 });

        let cpu = lexer.scan();
        assert_eq!(cpu.position, Position { line: 1, column: 2 });

        let five = lexer.scan();
        assert_eq!(five.position, Position { line: 2, column: 0 });
    }

    #[test]
    fn carriage_return_alone_counts_as_a_newline() {
        let mut lexer = Lexer::new("(\r)");
        assert_eq!(lexer.scan().position, Position { line: 0, column: 0 });
        assert_eq!(lexer.scan().position, Position { line: 1, column: 0 });
    }

    #[test]
    fn eof_repeats() {
        let mut lexer = Lexer::new("");
        assert_eq!(lexer.scan().kind, TokenKind::Eof);
        assert_eq!(lexer.scan().kind, TokenKind::Eof);
        assert_eq!(lexer.scan().lexeme, "EOF");
    }
}
