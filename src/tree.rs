//! The augmented syntax tree and its `nullable`/`firstpos`/`lastpos`
//! attributes.

use std::collections::BTreeSet;
use std::{fmt, str};
use bit_set::BitSet;
use log::debug;
use vec_map::VecMap;
use crate::regex::{normalize, to_postfix, Lexeme, ParseError, Symbol, Token};

/// Identifies one leaf of the tree. Positions start at 1.
pub type Position = usize;

#[derive(Clone, Debug)]
pub enum NodeKind {
    Leaf(Symbol, Position),
    /// Kleene closure of the child.
    Kleene(Box<Node>),
    /// Concatenation: left, then right.
    Cat(Box<Node>, Box<Node>),
    /// Union.
    Alt(Box<Node>, Box<Node>),
}

/// A syntax tree node. The attributes are computed when the node is built
/// and depend only on the subtree below it.
#[derive(Clone, Debug)]
pub struct Node {
    kind: NodeKind,
    nullable: bool,
    firstpos: BitSet,
    lastpos: BitSet,
}

impl Node {
    fn leaf(symbol: Symbol, position: Position) -> Node {
        let mut set = BitSet::new();
        set.insert(position);
        Node {
            kind: NodeKind::Leaf(symbol, position),
            nullable: false,
            firstpos: set.clone(),
            lastpos: set,
        }
    }

    fn kleene(child: Node) -> Node {
        Node {
            nullable: true,
            firstpos: child.firstpos.clone(),
            lastpos: child.lastpos.clone(),
            kind: NodeKind::Kleene(Box::new(child)),
        }
    }

    fn cat(left: Node, right: Node) -> Node {
        let mut firstpos = left.firstpos.clone();
        if left.nullable {
            firstpos.union_with(&right.firstpos);
        }
        let mut lastpos = right.lastpos.clone();
        if right.nullable {
            lastpos.union_with(&left.lastpos);
        }
        Node {
            nullable: left.nullable && right.nullable,
            firstpos: firstpos,
            lastpos: lastpos,
            kind: NodeKind::Cat(Box::new(left), Box::new(right)),
        }
    }

    fn alt(left: Node, right: Node) -> Node {
        let mut firstpos = left.firstpos.clone();
        firstpos.union_with(&right.firstpos);
        let mut lastpos = left.lastpos.clone();
        lastpos.union_with(&right.lastpos);
        Node {
            nullable: left.nullable || right.nullable,
            firstpos: firstpos,
            lastpos: lastpos,
            kind: NodeKind::Alt(Box::new(left), Box::new(right)),
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Whether the subtree matches the empty string.
    pub fn nullable(&self) -> bool {
        self.nullable
    }

    /// Positions that can match the first symbol of a string in the subtree's language.
    pub fn firstpos(&self) -> &BitSet {
        &self.firstpos
    }

    /// Positions that can match the last symbol of a string in the subtree's language.
    pub fn lastpos(&self) -> &BitSet {
        &self.lastpos
    }

    /// The left (or only) child and the right child.
    pub fn children(&self) -> (Option<&Node>, Option<&Node>) {
        match self.kind {
            NodeKind::Leaf(..) => (None, None),
            NodeKind::Kleene(ref child) => (Some(&**child), None),
            NodeKind::Cat(ref left, ref right) | NodeKind::Alt(ref left, ref right) => {
                (Some(&**left), Some(&**right))
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            NodeKind::Leaf(symbol, position) => write!(f, "{}:{}", symbol, position),
            NodeKind::Kleene(_) => write!(f, "*"),
            NodeKind::Cat(..) => write!(f, "."),
            NodeKind::Alt(..) => write!(f, "|"),
        }
    }
}

/// Maps every leaf position to the symbol it holds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Positions {
    symbols: VecMap<Symbol>,
}

impl Positions {
    fn push(&mut self, symbol: Symbol) -> Position {
        let position = self.symbols.len() + 1;
        self.symbols.insert(position, symbol);
        position
    }

    pub fn symbol(&self, position: Position) -> Option<Symbol> {
        self.symbols.get(position).cloned()
    }

    /// The number of leaves, end marker included.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The position of the end marker leaf.
    pub fn end(&self) -> Option<Position> {
        self.iter().find(|&(_, symbol)| symbol == Symbol::End).map(|(position, _)| position)
    }

    /// Distinct input symbols in ascending order. The end marker is excluded.
    pub fn alphabet(&self) -> Vec<char> {
        let chars: BTreeSet<char> = self.symbols.values().filter_map(|symbol| match *symbol {
            Symbol::Char(c) => Some(c),
            Symbol::End => None,
        }).collect();
        chars.into_iter().collect()
    }

    pub fn iter<'a>(&'a self) -> impl Iterator<Item=(Position, Symbol)> + 'a {
        self.symbols.iter().map(|(position, &symbol)| (position, symbol))
    }
}

/// An augmented syntax tree together with its position table.
#[derive(Clone, Debug)]
pub struct Tree {
    root: Node,
    positions: Positions,
}

fn pop(stack: &mut Vec<Node>, op: &Lexeme) -> Result<Node, ParseError> {
    stack.pop().ok_or(ParseError::MissingOperand(op.token.as_char(), op.offset))
}

impl Tree {
    /// Builds the tree bottom-up from a postfix token sequence, numbering
    /// leaves in the order they are consumed.
    pub fn from_postfix(postfix: &[Lexeme]) -> Result<Tree, ParseError> {
        let mut positions = Positions::default();
        let mut stack = Vec::new();
        for lexeme in postfix {
            let node = match lexeme.token {
                Token::Symbol(symbol) => Node::leaf(symbol, positions.push(symbol)),
                Token::Star => Node::kleene(pop(&mut stack, lexeme)?),
                Token::Concat | Token::Union => {
                    let right = pop(&mut stack, lexeme)?;
                    let left = pop(&mut stack, lexeme)?;
                    if lexeme.token == Token::Concat {
                        Node::cat(left, right)
                    } else {
                        Node::alt(left, right)
                    }
                }
                Token::Open | Token::Close => panic!("parenthesis in postfix input"),
            };
            stack.push(node);
        }
        let root = stack.pop().ok_or(ParseError::Incomplete)?;
        if !stack.is_empty() {
            return Err(ParseError::Incomplete);
        }
        debug!("built syntax tree with {} leaves", positions.len());
        Ok(Tree { root: root, positions: positions })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn positions(&self) -> &Positions {
        &self.positions
    }

    /// Every node of the tree, parents before children, left before right.
    pub fn nodes(&self) -> Nodes {
        Nodes { stack: vec![&self.root] }
    }
}

impl str::FromStr for Tree {
    type Err = ParseError;
    /// Normalizes, converts and builds the tree for a raw expression.
    fn from_str(s: &str) -> Result<Tree, ParseError> {
        let infix = normalize(s)?;
        let postfix = to_postfix(&infix)?;
        Tree::from_postfix(&postfix)
    }
}

/// Preorder iterator over the nodes of a [`Tree`].
pub struct Nodes<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a Node;
    fn next(&mut self) -> Option<&'a Node> {
        let node = self.stack.pop()?;
        let (left, right) = node.children();
        self.stack.extend(right);
        self.stack.extend(left);
        Some(node)
    }
}
