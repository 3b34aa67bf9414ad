use std::io::BufRead;
use posdfa::*;

const INDENT: usize = 10;

fn print_tree(node: &Node, depth: usize) {
    let (left, right) = node.children();
    if let Some(right) = right {
        print_tree(right, depth + 1);
    }
    println!("\n{:width$}[{}]", "", node, width = depth * INDENT);
    if let Some(left) = left {
        print_tree(left, depth + 1);
    }
}

fn print_details(node: &Node) {
    let (left, right) = node.children();
    for child in left.into_iter().chain(right) {
        print_details(child);
    }
    println!("Node: {}\t| Nullable: {}\t| Firstpos: {:?}\t| Lastpos: {:?}",
             node, node.nullable(), node.firstpos(), node.lastpos());
}

fn print_followpos(tree: &Tree, followpos: &Followpos) {
    for (position, follow) in followpos.iter() {
        let symbol = tree.positions().symbol(position).map_or(String::new(), |s| s.to_string());
        println!("Position {} ({}):\t{:?}", position, symbol, follow);
    }
}

fn print_table(dfa: &Dfa) {
    print!("{:>10} | ", "State");
    for c in dfa.alphabet.iter() {
        print!("{:>10} | ", c);
    }
    println!("\n{}", "_".repeat(10 + dfa.alphabet.len() * 13));
    for (id, state) in dfa.states.iter().enumerate() {
        let label = format!("{}{}", if state.accepting { "*" } else { "" }, id);
        print!("{:>10} | ", label);
        for c in dfa.alphabet.iter() {
            match state.by_char.get(c) {
                Some(next) => print!("{:>10} | ", next),
                None => print!("{:>10} | ", "-"),
            }
        }
        println!();
    }
    println!("\n(* denotes accepting state)");
}

fn main() {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("error: {}", e);
                break;
            }
        };
        match construct(line.trim()) {
            Err(e) => println!("error: {}", e),
            Ok(construction) => {
                println!("=== Syntax Tree ===");
                print_tree(construction.tree.root(), 0);
                println!("\n=== Node Attributes ===");
                print_details(construction.tree.root());
                println!("\n=== Followpos ===");
                print_followpos(&construction.tree, &construction.followpos);
                println!("\n=== DFA Transition Table ===\n");
                print_table(&construction.dfa);
            }
        }
    }
}
