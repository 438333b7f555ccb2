//! Minimal PENMAN graph reader shared by the default codec and the default
//! scoring backend. Parses `(var / concept :role target ...)` s-expressions,
//! re-emits a canonical string, and extracts the triple view scoring works on.

pub mod smatch;

use crate::error::DeserializeError;

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub var: String,
    pub concept: String,
    pub edges: Vec<(String, Target)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Node(Node),
    /// Bare atom: either a re-entrant variable reference or a constant.
    /// Which one is only decidable once every variable is known.
    Atom(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Triple {
    Instance {
        var: String,
        concept: String,
    },
    Relation {
        role: String,
        source: String,
        target: String,
    },
    Attribute {
        role: String,
        var: String,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    LParen,
    RParen,
    Slash,
    Role(String),
    Atom(String),
}

fn tokenize(text: &str) -> Result<Vec<Token>, DeserializeError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '"' => {
                chars.next();
                let mut s = String::from('"');
                let mut closed = false;
                for ch in chars.by_ref() {
                    s.push(ch);
                    if ch == '"' {
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return Err(DeserializeError::new("unterminated string literal"));
                }
                tokens.push(Token::Atom(s));
            }
            ':' => {
                chars.next();
                let mut role = String::from(':');
                while let Some(&ch) = chars.peek() {
                    if ch.is_whitespace() || ch == '(' || ch == ')' {
                        break;
                    }
                    role.push(ch);
                    chars.next();
                }
                if role.len() == 1 {
                    return Err(DeserializeError::new("empty role name"));
                }
                tokens.push(Token::Role(role));
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            _ => {
                let mut atom = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_whitespace() || ch == '(' || ch == ')' {
                        break;
                    }
                    atom.push(ch);
                    chars.next();
                }
                tokens.push(Token::Atom(atom));
            }
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    seen_vars: Vec<String>,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Result<Token, DeserializeError> {
        let tok = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or_else(|| DeserializeError::new("unexpected end of graph"))?;
        self.pos += 1;
        Ok(tok)
    }

    fn parse_node(&mut self) -> Result<Node, DeserializeError> {
        match self.next()? {
            Token::LParen => {}
            other => {
                return Err(DeserializeError::new(format!(
                    "expected '(' at node start, found {other:?}"
                )))
            }
        }
        let var = match self.next()? {
            Token::Atom(a) => a,
            other => {
                return Err(DeserializeError::new(format!(
                    "expected variable, found {other:?}"
                )))
            }
        };
        if self.seen_vars.contains(&var) {
            return Err(DeserializeError::new(format!(
                "variable '{var}' defined twice"
            )));
        }
        self.seen_vars.push(var.clone());
        match self.next()? {
            Token::Slash => {}
            other => {
                return Err(DeserializeError::new(format!(
                    "expected '/' after variable '{var}', found {other:?}"
                )))
            }
        }
        let concept = match self.next()? {
            Token::Atom(a) => a,
            other => {
                return Err(DeserializeError::new(format!(
                    "expected concept for '{var}', found {other:?}"
                )))
            }
        };
        let mut edges = Vec::new();
        loop {
            match self.peek() {
                Some(Token::RParen) => {
                    self.pos += 1;
                    break;
                }
                Some(Token::Role(_)) => {
                    let role = match self.next()? {
                        Token::Role(r) => r,
                        _ => unreachable!(),
                    };
                    let target = match self.peek() {
                        Some(Token::LParen) => Target::Node(self.parse_node()?),
                        Some(Token::Atom(_)) => match self.next()? {
                            Token::Atom(a) => Target::Atom(a),
                            _ => unreachable!(),
                        },
                        other => {
                            return Err(DeserializeError::new(format!(
                                "role {role} has no target, found {other:?}"
                            )))
                        }
                    };
                    edges.push((role, target));
                }
                other => {
                    return Err(DeserializeError::new(format!(
                        "expected role or ')' inside '{var}', found {other:?}"
                    )))
                }
            }
        }
        Ok(Node {
            var,
            concept,
            edges,
        })
    }
}

/// Parse one graph. Metadata lines (leading `#`) are ignored; the remainder
/// must be exactly one well-formed node expression.
pub fn parse(text: &str) -> Result<Node, DeserializeError> {
    let body: String = text
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n");
    let tokens = tokenize(&body)?;
    if tokens.is_empty() {
        return Err(DeserializeError::new("empty graph text"));
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        seen_vars: Vec::new(),
    };
    let node = parser.parse_node()?;
    if parser.pos != parser.tokens.len() {
        return Err(DeserializeError::new("trailing tokens after graph"));
    }
    Ok(node)
}

/// Canonical multi-line rendering, one role per line, indented by depth.
pub fn to_graph_string(node: &Node) -> String {
    let mut out = String::new();
    write_node(node, 0, &mut out);
    out
}

fn write_node(node: &Node, depth: usize, out: &mut String) {
    out.push('(');
    out.push_str(&node.var);
    out.push_str(" / ");
    out.push_str(&node.concept);
    for (role, target) in &node.edges {
        out.push('\n');
        for _ in 0..(depth + 1) * 6 {
            out.push(' ');
        }
        out.push_str(role);
        out.push(' ');
        match target {
            Target::Node(child) => write_node(child, depth + 1, out),
            Target::Atom(a) => out.push_str(a),
        }
    }
    out.push(')');
}

/// Single-line rendering used as the serialized (model-target) form.
pub fn linearize(node: &Node) -> String {
    let mut out = String::new();
    write_flat(node, &mut out);
    out
}

fn write_flat(node: &Node, out: &mut String) {
    out.push('(');
    out.push_str(&node.var);
    out.push_str(" / ");
    out.push_str(&node.concept);
    for (role, target) in &node.edges {
        out.push(' ');
        out.push_str(role);
        out.push(' ');
        match target {
            Target::Node(child) => write_flat(child, out),
            Target::Atom(a) => out.push_str(a),
        }
    }
    out.push(')');
}

/// Flatten a graph into instance/relation/attribute triples plus a TOP marker.
pub fn triples(root: &Node) -> Vec<Triple> {
    let mut vars = Vec::new();
    collect_vars(root, &mut vars);
    let mut out = vec![Triple::Attribute {
        role: "TOP".to_string(),
        var: root.var.clone(),
        value: root.concept.clone(),
    }];
    collect_triples(root, &vars, &mut out);
    out
}

fn collect_vars(node: &Node, vars: &mut Vec<String>) {
    vars.push(node.var.clone());
    for (_, target) in &node.edges {
        if let Target::Node(child) = target {
            collect_vars(child, vars);
        }
    }
}

fn collect_triples(node: &Node, vars: &[String], out: &mut Vec<Triple>) {
    out.push(Triple::Instance {
        var: node.var.clone(),
        concept: node.concept.clone(),
    });
    for (role, target) in &node.edges {
        match target {
            Target::Node(child) => {
                out.push(Triple::Relation {
                    role: role.clone(),
                    source: node.var.clone(),
                    target: child.var.clone(),
                });
                collect_triples(child, vars, out);
            }
            Target::Atom(a) if vars.contains(a) => {
                out.push(Triple::Relation {
                    role: role.clone(),
                    source: node.var.clone(),
                    target: a.clone(),
                });
            }
            Target::Atom(a) => {
                out.push(Triple::Attribute {
                    role: role.clone(),
                    var: node.var.clone(),
                    value: a.clone(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_graph() {
        let node = parse("(a / alpha)").unwrap();
        assert_eq!(node.var, "a");
        assert_eq!(node.concept, "alpha");
        assert!(node.edges.is_empty());
    }

    #[test]
    fn parse_nested_with_reentrancy_and_constant() {
        let text = "(w / want-01 :ARG0 (b / boy) :ARG1 (g / go-02 :ARG0 b :polarity -))";
        let node = parse(text).unwrap();
        assert_eq!(node.edges.len(), 2);
        let ts = triples(&node);
        assert!(ts.contains(&Triple::Relation {
            role: ":ARG0".to_string(),
            source: "g".to_string(),
            target: "b".to_string(),
        }));
        assert!(ts.contains(&Triple::Attribute {
            role: ":polarity".to_string(),
            var: "g".to_string(),
            value: "-".to_string(),
        }));
    }

    #[test]
    fn parse_skips_metadata_lines() {
        let text = "# ::snt The boy wants to go.\n# ::id 42\n(w / want-01)";
        let node = parse(text).unwrap();
        assert_eq!(node.concept, "want-01");
    }

    #[test]
    fn parse_quoted_string_attribute() {
        let node = parse("(c / city :wiki \"New York\" :name (n / name))").unwrap();
        let ts = triples(&node);
        assert!(ts.contains(&Triple::Attribute {
            role: ":wiki".to_string(),
            var: "c".to_string(),
            value: "\"New York\"".to_string(),
        }));
    }

    #[test]
    fn parse_rejects_malformed_graphs() {
        assert!(parse("").is_err());
        assert!(parse("()").is_err());
        assert!(parse("(a / alpha").is_err());
        assert!(parse("(a alpha)").is_err());
        assert!(parse("(a / alpha)) extra").is_err());
        assert!(parse("(a / alpha :ARG0 (a / beta))").is_err());
        assert!(parse("(a / alpha :ARG0)").is_err());
    }

    #[test]
    fn graph_string_round_trips() {
        let text = "(w / want-01 :ARG0 (b / boy) :ARG1 (g / go-02 :ARG0 b))";
        let node = parse(text).unwrap();
        let rendered = to_graph_string(&node);
        let reparsed = parse(&rendered).unwrap();
        assert_eq!(node, reparsed);
    }

    #[test]
    fn linearize_is_single_line() {
        let node = parse("(w / want-01 :ARG0 (b / boy))").unwrap();
        let flat = linearize(&node);
        assert!(!flat.contains('\n'));
        assert_eq!(flat, "(w / want-01 :ARG0 (b / boy))");
    }

    #[test]
    fn triples_include_top_and_instances() {
        let node = parse("(a / alpha :mod (b / beta))").unwrap();
        let ts = triples(&node);
        assert_eq!(ts.len(), 4);
        assert!(matches!(&ts[0], Triple::Attribute { role, .. } if role == "TOP"));
        let instances = ts
            .iter()
            .filter(|t| matches!(t, Triple::Instance { .. }))
            .count();
        assert_eq!(instances, 2);
    }
}
