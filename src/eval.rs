use crate::parse::Node;

type Combine = fn(bool, bool) -> bool;

/// Work left to do while climbing back up the tree.
enum Frame<'a> {
    Negate,
    /// The left operand is being evaluated; `right` comes next.
    Right(Combine, &'a Node),
    /// The left operand came out as `left`; the right one is being evaluated.
    Apply(Combine, bool),
}

impl Node {
    /// Fold the tree to a single value. Infallible: everything that can go
    /// wrong is caught while parsing.
    ///
    /// Runs on an explicit stack, so arbitrarily long operator chains do not
    /// grow the call stack.
    pub fn evaluate(&self) -> bool {
        let mut frames = Vec::new();
        let mut node = self;

        loop {
            let mut value = loop {
                match node {
                    Node::Literal(value) => break *value,
                    Node::Not(child) => {
                        frames.push(Frame::Negate);
                        node = &**child;
                    }
                    Node::And(left, right) => {
                        frames.push(Frame::Right(|a, b| a && b, right));
                        node = &**left;
                    }
                    Node::Or(left, right) => {
                        frames.push(Frame::Right(|a, b| a || b, right));
                        node = &**left;
                    }
                    Node::Xor(left, right) => {
                        frames.push(Frame::Right(|a, b| a ^ b, right));
                        node = &**left;
                    }
                }
            };

            node = loop {
                match frames.pop() {
                    None => return value,
                    Some(Frame::Negate) => value = !value,
                    Some(Frame::Right(combine, right)) => {
                        frames.push(Frame::Apply(combine, value));
                        break right;
                    }
                    Some(Frame::Apply(combine, left)) => value = combine(left, value),
                }
            };
        }
    }
}

pub fn evaluate(node: &Node) -> bool {
    node.evaluate()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn lit(value: bool) -> Box<Node> {
        Box::new(Node::Literal(value))
    }

    #[rstest]
    #[case(false, false)]
    #[case(false, true)]
    #[case(true, false)]
    #[case(true, true)]
    fn binary_nodes_match_native_operators(#[case] a: bool, #[case] b: bool) {
        assert_eq!(Node::And(lit(a), lit(b)).evaluate(), a && b);
        assert_eq!(Node::Or(lit(a), lit(b)).evaluate(), a || b);
        assert_eq!(Node::Xor(lit(a), lit(b)).evaluate(), a ^ b);
    }

    #[test]
    fn not_negates_its_child() {
        assert!(!Node::Not(lit(true)).evaluate());
        assert!(Node::Not(Box::new(Node::Not(lit(true)))).evaluate());
    }

    #[test]
    fn nested_operands_on_both_sides() {
        // (true and not (false or true)) xor not false
        let tree = Node::Xor(
            Box::new(Node::And(
                lit(true),
                Box::new(Node::Not(Box::new(Node::Or(lit(false), lit(true))))),
            )),
            Box::new(Node::Not(lit(false))),
        );
        assert!(tree.evaluate());
    }

    #[test]
    fn deep_left_chain_does_not_recurse() {
        let mut tree = Node::Literal(false);
        for i in 0..200_000 {
            tree = Node::Xor(Box::new(tree), lit(i % 3 == 0));
        }
        // 66_667 multiples of three in 0..200_000
        assert!(tree.evaluate());
    }

    #[test]
    fn evaluation_is_repeatable() {
        let tree = Node::Xor(Box::new(Node::Or(lit(true), lit(false))), lit(true));
        assert_eq!(evaluate(&tree), evaluate(&tree));
        assert!(!tree.evaluate());
    }
}
