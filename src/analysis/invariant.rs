//! Soundness of the static flag.
//!
//! Folding replaces a static subtree with its cached value. That is only
//! sound if nothing beneath the static node depends on the context, so the
//! flag must hold for every descendant too.

use crate::ludeme::Ludeme;

/// Whether every node of the subtree, the root included, is static.
#[must_use]
pub fn all_descendants_static(node: &dyn Ludeme) -> bool {
    let mut all = node.is_static();
    node.for_each_child(&mut |child| all &= all_descendants_static(child));
    all
}

/// Describe every node flagged static above a non-static descendant.
#[must_use]
pub fn static_violations(root: &dyn Ludeme) -> Vec<String> {
    let mut violations = Vec::new();
    walk(root, &mut violations);
    violations
}

/// Returns whether the whole subtree is static.
fn walk(node: &dyn Ludeme, violations: &mut Vec<String>) -> bool {
    let mut children_static = true;
    node.for_each_child(&mut |child| children_static &= walk(child, violations));

    let is_static = node.is_static();
    if is_static && !children_static {
        violations.push(format!(
            "`{}` is flagged static but has a non-static descendant",
            node.name()
        ));
    }
    is_static && children_static
}
