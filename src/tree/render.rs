//! Tree rendering for debugging and visualization.
//!
//! These force the tree fully (lazy children are, by the finite-shrinking
//! invariant, always a finite structure) — fine for a debug aid, but never
//! used on the hot path of generation or shrink search.

use super::Tree;

impl<T> Tree<T>
where
    T: std::fmt::Display + Clone + 'static,
{
    /// Render the tree structure as a string for debugging.
    pub fn render(&self) -> String {
        let mut result = String::new();
        self.render_recursive(&mut result, "", true);
        result
    }

    fn render_recursive(&self, result: &mut String, prefix: &str, is_last: bool) {
        result.push_str(prefix);
        result.push_str(if is_last { "└── " } else { "├── " });
        result.push_str(&format!("{}\n", self.value));

        let child_prefix = if is_last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}│   ")
        };

        let children: Vec<_> = self.children().collect();
        let last_index = children.len().saturating_sub(1);
        for (i, child) in children.into_iter().enumerate() {
            child.render_recursive(result, &child_prefix, i == last_index);
        }
    }

    /// Render the tree compactly, showing only values: `10[5[2], 0]`.
    pub fn render_compact(&self) -> String {
        let children: Vec<_> = self.children().collect();
        if children.is_empty() {
            format!("{}", self.value)
        } else {
            let children_str: Vec<String> =
                children.into_iter().map(|child| child.render_compact()).collect();
            format!("{}[{}]", self.value, children_str.join(", "))
        }
    }

    /// Render just the shrink sequence: `10 → [5, 0, 2]`.
    pub fn render_shrinks(&self) -> String {
        let shrinks = self.shrinks();
        if shrinks.is_empty() {
            format!("{} (no shrinks)", self.value)
        } else {
            let shrink_strs: Vec<String> = shrinks.iter().map(|v| format!("{v}")).collect();
            format!("{} → [{}]", self.value, shrink_strs.join(", "))
        }
    }

    /// Render with numbered shrinks, for stepping through a failure by hand.
    pub fn render_numbered(&self) -> String {
        let shrinks = self.shrinks();
        if shrinks.is_empty() {
            format!("{} (no shrinks)", self.value)
        } else {
            let mut result = format!("Original: {}\nShrinks:\n", self.value);
            for (i, shrink) in shrinks.iter().enumerate() {
                result.push_str(&format!("  {}: {}\n", i + 1, shrink));
            }
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Tree;
    use crate::data::{Seed, Size};
    use crate::primitive::{bool as bool_gen, char_range, f64_range, int_range};

    #[test]
    fn full_rendering() {
        let tree = Tree::with_children(
            10,
            vec![
                Tree::with_children(5, vec![Tree::singleton(2)]),
                Tree::singleton(0),
            ],
        );

        archetype::snap("fixed_integer_tree_render", tree.render());
        archetype::snap("fixed_integer_tree_render_compact", tree.render_compact());
        archetype::snap("fixed_integer_tree_render_shrinks", tree.render_shrinks());

        let singleton = Tree::singleton(42);
        archetype::snap("fixed_singleton_render_compact", singleton.render_compact());
        archetype::snap("fixed_singleton_render_shrinks", singleton.render_shrinks());
    }

    #[test]
    fn numbered_rendering() {
        let tree = Tree::with_children(100, vec![Tree::singleton(50), Tree::singleton(0)]);
        archetype::snap("fixed_tree_render_numbered", tree.render_numbered());

        let singleton = Tree::singleton(42);
        archetype::snap("fixed_singleton_render_numbered", singleton.render_numbered());
    }

    // Snapshot tests for generator-produced tree rendering output, matching
    // the teacher's split: one test per primitive generator family.
    #[test]
    fn snapshot_integer_tree_rendering() {
        let gen = int_range(1, 20);
        let seed = Seed::from_u64(42);
        let tree = gen.generate(Size::new(10), seed);

        archetype::snap("integer_tree_render", tree.render());
        archetype::snap("integer_tree_render_compact", tree.render_compact());
        archetype::snap("integer_tree_render_shrinks", tree.render_shrinks());
        archetype::snap("integer_tree_render_numbered", tree.render_numbered());
    }

    #[test]
    fn snapshot_boolean_tree_rendering() {
        let gen = bool_gen();
        let seed = Seed::from_u64(123);
        let tree = gen.generate(Size::new(10), seed);

        archetype::snap("boolean_tree_render_compact", tree.render_compact());
        archetype::snap("boolean_tree_render_shrinks", tree.render_shrinks());
    }

    #[test]
    fn snapshot_float_tree_rendering() {
        let gen = f64_range(-2.0, 2.0);
        let seed = Seed::from_u64(789);
        let tree = gen.generate(Size::new(10), seed);

        archetype::snap("float_tree_render_compact", tree.render_compact());
        archetype::snap("float_tree_render_shrinks", tree.render_shrinks());
    }

    #[test]
    fn snapshot_character_tree_rendering() {
        let gen = char_range('a' as u32, 'z' as u32);
        let seed = Seed::from_u64(456);
        let tree = gen.generate(Size::new(10), seed);

        archetype::snap("character_tree_render_compact", tree.render_compact());
        archetype::snap("character_tree_render_shrinks", tree.render_shrinks());
    }
}
