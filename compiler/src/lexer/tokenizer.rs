use crate::lexer::{Node, SyntaxError, Token};

/// Describes the input medium tokenizer
pub trait Tokenable<'a> {
    type Type;
    fn tokenize(input: Self::Type) -> Result<Vec<Token>, SyntaxError>;
    fn parse(tokens: Vec<Token>) -> Result<Node, SyntaxError>;
}

/// Parses a raw query string into its syntax tree
pub fn parse(query: &str) -> Result<Node, SyntaxError> {
    let tokens = StringTokenizer::tokenize(query)?;
    StringTokenizer::parse(tokens)
}

/// Processes simple strings into our search AST
///
/// Operators from loosest to tightest: `OR`/`|`, then `AND`/`&` (or plain
/// juxtaposition), then `NOT`/`!`. Repeated `&&` and `||` are accepted.
///
/// Some examples of valid inputs:
///  - `apple`
///  - `apple banana`, `apple & banana`, `apple AND banana`
///  - `(apple | "green banana") !grape lang:en`
pub struct StringTokenizer {}

type TokenIter<'t> = std::iter::Peekable<std::slice::Iter<'t, Token>>;

/// Deepest nesting of parentheses and negations a query may use
pub const MAX_DEPTH: usize = 256;

const RESERVED: [(&str, Token); 3] = [("not", Token::Not), ("and", Token::And), ("or", Token::Or)];

impl StringTokenizer {
    fn parse_or(iter: &mut TokenIter, depth: usize) -> Result<Node, SyntaxError> {
        let mut children = vec![Self::parse_and(iter, depth)?];
        while let Some(Token::Or) = iter.peek() {
            iter.next();
            children.push(Self::parse_and(iter, depth)?);
        }
        Ok(Self::collapse(children, Node::Or))
    }

    fn parse_and(iter: &mut TokenIter, depth: usize) -> Result<Node, SyntaxError> {
        let mut children = vec![Self::parse_not(iter, depth)?];
        loop {
            match iter.peek() {
                Some(Token::And) => {
                    iter.next();
                    children.push(Self::parse_not(iter, depth)?);
                }
                // two factors side by side are an implicit AND
                Some(token) if Self::starts_factor(token) => {
                    children.push(Self::parse_not(iter, depth)?);
                }
                _ => break,
            }
        }
        Ok(Self::collapse(children, Node::And))
    }

    fn parse_not(iter: &mut TokenIter, depth: usize) -> Result<Node, SyntaxError> {
        if let Some(Token::Not) = iter.peek() {
            iter.next();
            let expr = Self::parse_not(iter, Self::descend(depth)?)?;
            return Ok(Node::Not(Box::new(expr)));
        }
        Self::parse_primary(iter, depth)
    }

    fn parse_primary(iter: &mut TokenIter, depth: usize) -> Result<Node, SyntaxError> {
        match iter.next() {
            Some(Token::Word(word)) => Self::parse_leaf(iter, word, false),
            Some(Token::Quoted(text)) => Self::parse_leaf(iter, text, true),
            Some(Token::LParen) => {
                let expr = Self::parse_or(iter, Self::descend(depth)?)?;
                match iter.next() {
                    Some(Token::RParen) => Ok(expr),
                    Some(token) => Err(SyntaxError::UnexpectedToken(token.to_string())),
                    None => Err(SyntaxError::MissingClosingParen),
                }
            }
            Some(Token::RParen) => Err(SyntaxError::UnexpectedClosingParen),
            Some(token) => Err(SyntaxError::UnexpectedToken(token.to_string())),
            None => Err(SyntaxError::UnexpectedEof),
        }
    }

    /// A word or quoted string, which becomes a filter when followed by `:`
    fn parse_leaf(iter: &mut TokenIter, text: &str, quoted: bool) -> Result<Node, SyntaxError> {
        if let Some(Token::Colon) = iter.peek() {
            iter.next();
            let value = match iter.next() {
                Some(Token::Word(value)) | Some(Token::Quoted(value)) => value.clone(),
                Some(token) => return Err(SyntaxError::UnexpectedToken(token.to_string())),
                None => return Err(SyntaxError::UnexpectedEof),
            };
            return Ok(Node::filter(text, value));
        }

        if quoted {
            Ok(Node::Term(format!("\"{}\"", text)))
        } else {
            Ok(Node::term(text))
        }
    }

    fn descend(depth: usize) -> Result<usize, SyntaxError> {
        if depth >= MAX_DEPTH {
            return Err(SyntaxError::TooDeep(MAX_DEPTH));
        }
        Ok(depth + 1)
    }

    fn starts_factor(token: &Token) -> bool {
        matches!(
            token,
            Token::Word(_) | Token::Quoted(_) | Token::Not | Token::LParen
        )
    }

    fn collapse(mut children: Vec<Node>, wrap: fn(Vec<Node>) -> Node) -> Node {
        if children.len() == 1 {
            children.remove(0)
        } else {
            wrap(children)
        }
    }

    fn is_term_breaker(ch: char) -> bool {
        ch.is_whitespace() || matches!(ch, '!' | '&' | '|' | ':' | '"' | '(' | ')')
    }

    fn is_word_char(ch: char) -> bool {
        ch.is_alphanumeric() || ch == '_'
    }

    /// Returns the keyword token and its byte length when `run` starts with a
    /// reserved word that ends on a word boundary.
    fn reserved_prefix(run: &str) -> Option<(Token, usize)> {
        RESERVED.iter().find_map(|(keyword, token)| {
            let head = run.get(..keyword.len())?;
            let bounded = run[keyword.len()..]
                .chars()
                .next()
                .map_or(true, |c| !Self::is_word_char(c));
            (head.eq_ignore_ascii_case(keyword) && bounded).then(|| (token.clone(), keyword.len()))
        })
    }

    fn push_bare(run: &str, tokens: &mut Vec<Token>) {
        let rest = match Self::reserved_prefix(run) {
            Some((token, len)) => {
                tokens.push(token);
                &run[len..]
            }
            None => run,
        };
        if !rest.is_empty() {
            tokens.push(Token::Word(rest.to_string()));
        }
    }
}

impl<'a> Tokenable<'a> for StringTokenizer {
    type Type = &'a str;

    fn parse(tokens: Vec<Token>) -> Result<Node, SyntaxError> {
        if tokens.is_empty() {
            return Err(SyntaxError::EmptyQuery);
        }
        let mut iter = tokens.iter().peekable();
        let expr = Self::parse_or(&mut iter, 0)?;
        match iter.next() {
            None => Ok(expr),
            Some(Token::RParen) => Err(SyntaxError::UnexpectedClosingParen),
            Some(token) => Err(SyntaxError::UnexpectedToken(token.to_string())),
        }
    }

    fn tokenize(input: Self::Type) -> Result<Vec<Token>, SyntaxError> {
        let mut chars = input.char_indices().peekable();
        let mut tokens = Vec::new();
        while let Some((start, ch)) = chars.next() {
            match ch {
                c if c.is_whitespace() => continue,
                '(' => tokens.push(Token::LParen),
                ')' => tokens.push(Token::RParen),
                ':' => tokens.push(Token::Colon),
                '!' => tokens.push(Token::Not),
                '&' => {
                    while let Some((_, '&')) = chars.peek() {
                        chars.next();
                    }
                    tokens.push(Token::And);
                }
                '|' => {
                    while let Some((_, '|')) = chars.peek() {
                        chars.next();
                    }
                    tokens.push(Token::Or);
                }
                '"' => {
                    let mut text = String::new();
                    let mut found_closing_quote = false;
                    while let Some((_, c)) = chars.next() {
                        match c {
                            '"' => {
                                found_closing_quote = true;
                                break;
                            }
                            '\\' => match chars.next() {
                                Some((_, escaped)) => text.push(escaped),
                                None => break,
                            },
                            _ => text.push(c),
                        }
                    }
                    if !found_closing_quote {
                        return Err(SyntaxError::UnclosedQuote);
                    }
                    tokens.push(Token::Quoted(text));
                }
                _ => {
                    let mut end = start + ch.len_utf8();
                    while let Some(&(i, c)) = chars.peek() {
                        if Self::is_term_breaker(c) {
                            break;
                        }
                        end = i + c.len_utf8();
                        chars.next();
                    }
                    Self::push_bare(&input[start..end], &mut tokens);
                }
            }
        }
        Ok(tokens)
    }
}
