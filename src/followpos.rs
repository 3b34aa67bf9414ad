use bit_set::BitSet;
use log::debug;
use vec_map::VecMap;
use crate::tree::{NodeKind, Position, Positions, Tree};

/// For every leaf position, the positions that can immediately follow it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Followpos {
    table: VecMap<BitSet>,
}

impl Followpos {
    /// An empty entry for every position in `positions`.
    pub fn new(positions: &Positions) -> Followpos {
        let mut table = VecMap::with_capacity(positions.len() + 1);
        for (position, _) in positions.iter() {
            table.insert(position, BitSet::new());
        }
        Followpos { table: table }
    }

    pub fn compute(tree: &Tree) -> Followpos {
        let mut followpos = Followpos::new(tree.positions());
        followpos.accumulate(tree);
        debug!("computed followpos for {} positions", followpos.len());
        followpos
    }

    /// Adds the contributions of every node of `tree`. Entries only ever
    /// grow, so running this again on the same tree changes nothing.
    pub fn accumulate(&mut self, tree: &Tree) {
        for node in tree.nodes() {
            match *node.kind() {
                NodeKind::Cat(ref left, ref right) => {
                    for i in left.lastpos() {
                        self.extend(i, right.firstpos());
                    }
                }
                NodeKind::Kleene(_) => {
                    for i in node.lastpos() {
                        self.extend(i, node.firstpos());
                    }
                }
                NodeKind::Leaf(..) | NodeKind::Alt(..) => {}
            }
        }
    }

    fn extend(&mut self, position: Position, with: &BitSet) {
        self.table.entry(position).or_insert_with(BitSet::new).union_with(with);
    }

    pub fn get(&self, position: Position) -> Option<&BitSet> {
        self.table.get(position)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Entries in ascending position order.
    pub fn iter<'a>(&'a self) -> impl Iterator<Item=(Position, &'a BitSet)> + 'a {
        self.table.iter()
    }
}
