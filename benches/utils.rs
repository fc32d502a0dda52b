use mapperlate::{IfNode, Node, NodeAttributes, RootNode, SqlNode, TextNode, TrimNode, WhenNode};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Generate n random statement trees to use in the benchmark
pub fn generate_random_statements(n: usize) -> Vec<Node> {
    let mut rng = StdRng::seed_from_u64(42); // Fixed seed for reproducibility
    (0..n).map(|_| random_statement(&mut rng)).collect()
}

fn random_statement(rng: &mut StdRng) -> Node {
    let mut root = Node::Root(RootNode::new());
    root.add_child(text(&format!("SELECT * FROM {}", random_string(rng, 3, 8))));

    let mut clause = Node::from_directive("where".parse().unwrap(), &NodeAttributes::new());
    for _ in 0..rng.random_range(1..8) {
        clause.add_child(random_condition(rng, 3));
    }
    root.add_child(clause);
    root
}

fn random_condition(rng: &mut StdRng, depth: usize) -> Node {
    let column = random_string(rng, 3, 8);
    let connective = if rng.random_bool(0.7) { "AND" } else { "OR" };
    let literal = text(&format!("{connective} {column} = #{{{column}}}"));

    if depth == 0 {
        return literal;
    }

    match rng.random_range(0..3) {
        0 => {
            let mut node = Node::If(IfNode::new(format!("{column} != null")));
            node.add_child(literal);
            node
        }
        1 => {
            let mut node = Node::Trim(TrimNode::new("", "", "AND |OR ", ""));
            node.add_child(literal);
            node.add_child(random_condition(rng, depth - 1));
            node
        }
        _ => {
            let mut node = Node::When(WhenNode::new(column));
            node.add_child(random_condition(rng, depth - 1));
            node
        }
    }
}

fn text(sql: &str) -> Node {
    Node::Text(TextNode::new(sql))
}

/// Generate a random string with length between min and max
fn random_string(rng: &mut StdRng, min_len: usize, max_len: usize) -> String {
    let charset = "abcdefghijklmnopqrstuvwxyz";
    let len = rng.random_range(min_len..=max_len);

    (0..len)
        .map(|_| {
            let idx = rng.random_range(0..charset.len());
            charset.chars().nth(idx).unwrap()
        })
        .collect()
}
