use logos::Logos;

use crate::error::ParseError;

#[derive(Logos, Debug, PartialEq, Clone)]
pub enum TokenKind {
    #[regex(r"[ \t\r\n]+", logos::skip)]
    Whitespace,
    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    #[token("rect")]
    Rect,
    #[token("hor")]
    Hor,
    #[token("vert")]
    Vert,
    #[token("over")]
    Over,
    #[token("rot")]
    Rot,
    #[token("rep")]
    Rep,
    #[token("fun")]
    Fun,
    // Type words introducing a variable definition (`rect` doubles as one).
    #[token("design")]
    Design,
    #[token("num")]
    Num,
    #[token("color")]
    Color,
    #[token("angle")]
    Angle,

    // Strings: naive double-quoted without escapes, used as CSS colors
    #[regex(r#""[^"\n]*""#)]
    String,
    #[regex(r"#[0-9a-fA-F]+")]
    Hex,
    #[regex(r"[0-9]+")]
    Int,
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("=")]
    Equal,
    #[token("+")]
    Plus,
    #[token("*")]
    Star,

    #[error]
    Error,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub col: usize,
}

pub fn lex(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut lex = TokenKind::lexer(input);
    // Precompute line starts for line/col mapping
    let mut line_starts: Vec<usize> = vec![0];
    for (i, ch) in input.char_indices() {
        if ch == '\n' {
            line_starts.push(i + 1);
        }
    }
    let find_line_col = |start: usize| -> (usize, usize) {
        // greatest line start <= start
        let lo = line_starts.partition_point(|&s| s <= start).saturating_sub(1);
        let line = lo + 1; // 1-based
        let col = input[line_starts[lo]..start].chars().count() + 1; // 1-based
        (line, col)
    };
    let mut tokens = Vec::new();
    while let Some(kind) = lex.next() {
        let text = lex.slice().to_string();
        let (line, col) = find_line_col(lex.span().start);
        if matches!(kind, TokenKind::Error) {
            return Err(ParseError::new(
                line,
                col,
                format!("unexpected character '{}'", text),
            ));
        }
        if matches!(kind, TokenKind::Hex) && !matches!(text.len(), 4 | 7) {
            return Err(ParseError::new(
                line,
                col,
                format!("hex color '{}' must have 3 or 6 digits", text),
            ));
        }
        tokens.push(Token {
            kind,
            text,
            line,
            col,
        });
    }
    Ok(tokens)
}
