//! Structural validation for [`SkipList`].
//!
//! [`check_integrity`] walks every level of a list and reports each broken
//! invariant it finds instead of stopping at the first one. It never mutates
//! the list and is meant for tests and debugging.

use std::cmp::Ordering;

use thiserror::Error;

use crate::comparator::Comparator;
use crate::skip_list::{NodeId, SkipList};

/// One broken invariant found by [`check_integrity`].
///
/// Nodes are identified by their slot in the list's arena.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A node compares greater than the node before it on the same level.
    #[error("level {level}: node {node} sorts before its predecessor {previous}")]
    OutOfOrder {
        /// Level of the offending link.
        level: usize,
        /// Node before the offending one.
        previous: usize,
        /// Node that is out of order.
        node: usize,
    },
    /// A node is linked at a level but absent from the level below.
    #[error("level {level}: node {node} is missing from the level below")]
    MissingBelow {
        /// Level the node was found on.
        level: usize,
        /// Node that is missing below.
        node: usize,
    },
    /// Two nodes appear in a different order than on the level below.
    #[error("level {level}: nodes {previous} and {node} are swapped relative to the level below")]
    Reordered {
        /// Level the swap was found on.
        level: usize,
        /// Node that comes first on `level`.
        previous: usize,
        /// Node that comes second on `level`.
        node: usize,
    },
    /// A level links to a node whose height does not reach that level.
    #[error("level {level}: link to node {node} of height {height}")]
    LinkAboveHeight {
        /// Level of the link.
        level: usize,
        /// Node linked to.
        node: usize,
        /// Height of that node.
        height: usize,
    },
    /// A node is taller than the head.
    #[error("node {node} has height {height}, above the head height {head_height}")]
    TallerThanHead {
        /// The tall node.
        node: usize,
        /// Its height.
        height: usize,
        /// Height of the head.
        head_height: usize,
    },
    /// A link points at a vacant or nonexistent arena slot.
    #[error("level {level}: link to vacant slot {target}")]
    DanglingLink {
        /// Level of the link.
        level: usize,
        /// Slot linked to.
        target: usize,
    },
    /// Following the links on a level revisits a node.
    #[error("level {level}: cycle through node {node}")]
    Cycle {
        /// Level of the cycle.
        level: usize,
        /// First node visited twice.
        node: usize,
    },
    /// A stored node cannot be reached on level 0.
    #[error("node {node} is unreachable on level 0")]
    Unreachable {
        /// The stored node.
        node: usize,
    },
    /// The recorded length disagrees with the nodes found on level 0.
    #[error("recorded length {recorded} but {counted} nodes on level 0")]
    CountMismatch {
        /// Length the list reports.
        recorded: usize,
        /// Nodes found by walking level 0.
        counted: usize,
    },
}

/// Check `list` against the skip list invariants and return every violation
/// found. An empty result means the list is well formed.
///
/// On every level the values must be non-decreasing under the list's
/// comparator, and every node must also appear on each level below, in the
/// same relative order. No node may be taller than the head, every stored
/// node must be reachable on level 0, and the walk must agree with
/// [`SkipList::len`].
pub fn check_integrity<T, C, R>(list: &SkipList<T, C, R>) -> Vec<Violation>
where
    C: Comparator<T>,
{
    let mut violations = Vec::new();
    let slots = list.nodes.len();
    // level_zero[id] and below[id] are the node's index along level 0 and
    // along the previous level; only those two are ever consulted.
    let mut level_zero: Vec<Option<usize>> = Vec::new();
    let mut below: Vec<Option<usize>> = Vec::new();
    let mut here: Vec<Option<usize>> = Vec::with_capacity(slots);

    for level in 0..list.head.len() {
        here.clear();
        here.resize(slots, None);
        let mut previous: Option<NodeId> = None;
        let mut counted = 0;
        let mut link = list.head[level];

        while let Some(id) = link {
            let node = match list.nodes.get(id).and_then(Option::as_ref) {
                Some(node) => node,
                None => {
                    violations.push(Violation::DanglingLink { level, target: id });
                    break;
                }
            };
            if here[id].is_some() {
                violations.push(Violation::Cycle { level, node: id });
                break;
            }
            if node.height() <= level {
                violations.push(Violation::LinkAboveHeight {
                    level,
                    node: id,
                    height: node.height(),
                });
                break;
            }
            here[id] = Some(counted);

            if let Some(prev) = previous {
                let prev_value = match &list.nodes[prev] {
                    Some(prev_node) => &prev_node.value,
                    None => unreachable!("visited vacant slot {prev}"),
                };
                if list.comparator().compare(prev_value, &node.value) == Ordering::Greater {
                    violations.push(Violation::OutOfOrder {
                        level,
                        previous: prev,
                        node: id,
                    });
                }
            }
            if level > 0 {
                let prev_position = previous.and_then(|prev| below[prev].map(|p| (prev, p)));
                match (below[id], prev_position) {
                    (None, _) => violations.push(Violation::MissingBelow { level, node: id }),
                    (Some(position), Some((prev, prev_position))) if prev_position >= position => {
                        violations.push(Violation::Reordered {
                            level,
                            previous: prev,
                            node: id,
                        });
                    }
                    _ => {}
                }
            }

            previous = Some(id);
            counted += 1;
            link = node.forward[level];
        }

        if level == 0 {
            if counted != list.len {
                violations.push(Violation::CountMismatch {
                    recorded: list.len,
                    counted,
                });
            }
            level_zero = here.clone();
        }
        std::mem::swap(&mut below, &mut here);
    }

    for (id, slot) in list.nodes.iter().enumerate() {
        let Some(node) = slot else { continue };
        if node.height() > list.head.len() {
            violations.push(Violation::TallerThanHead {
                node: id,
                height: node.height(),
                head_height: list.head.len(),
            });
        }
        if level_zero[id].is_none() {
            violations.push(Violation::Unreachable { node: id });
        }
    }

    violations
}

#[cfg(test)]
mod test {
    use rand::rngs::mock::StepRng;

    use super::*;
    use crate::comparator::Natural;

    /// Every node reaches the height cap, so the layout is fixed:
    /// values 10..=50 get heights 1, 1, 2, 2, 3 in slots 0..=4.
    fn tower() -> SkipList<i32, Natural, StepRng> {
        let mut skip_list = SkipList::with_rng(Natural, StepRng::new(0, 0));
        skip_list.extend([10, 20, 30, 40, 50]);
        assert_eq!(skip_list.heights().collect::<Vec<_>>(), vec![1, 1, 2, 2, 3]);
        skip_list
    }

    fn node_mut(
        skip_list: &mut SkipList<i32, Natural, StepRng>,
        id: NodeId,
    ) -> &mut crate::skip_list::Node<i32> {
        skip_list.nodes[id].as_mut().unwrap()
    }

    #[test]
    fn test_well_formed_list_passes() {
        assert!(check_integrity(&tower()).is_empty());
        let empty: SkipList<i32> = SkipList::new();
        assert!(check_integrity(&empty).is_empty());
    }

    #[test]
    fn test_out_of_order_values() {
        let mut skip_list = tower();
        node_mut(&mut skip_list, 0).value = 25;
        let violations = check_integrity(&skip_list);
        assert_eq!(
            violations,
            vec![Violation::OutOfOrder {
                level: 0,
                previous: 0,
                node: 1
            }]
        );
    }

    #[test]
    fn test_reports_every_violation() {
        let mut skip_list = tower();
        node_mut(&mut skip_list, 0).value = 25;
        node_mut(&mut skip_list, 3).value = 60;
        skip_list.len = 7;
        let violations = check_integrity(&skip_list);
        assert!(violations.contains(&Violation::OutOfOrder {
            level: 0,
            previous: 0,
            node: 1
        }));
        // 60 now sits before 50 on levels 0 and 1.
        assert!(violations.contains(&Violation::OutOfOrder {
            level: 0,
            previous: 3,
            node: 4
        }));
        assert!(violations.contains(&Violation::OutOfOrder {
            level: 1,
            previous: 3,
            node: 4
        }));
        assert!(violations.contains(&Violation::CountMismatch {
            recorded: 7,
            counted: 5
        }));
        assert_eq!(violations.len(), 4);
    }

    #[test]
    fn test_node_missing_below() {
        let mut skip_list = tower();
        // Unlink 30 (slot 2) from level 0 only.
        node_mut(&mut skip_list, 1).forward[0] = Some(3);
        let violations = check_integrity(&skip_list);
        assert!(violations.contains(&Violation::MissingBelow { level: 1, node: 2 }));
        assert!(violations.contains(&Violation::Unreachable { node: 2 }));
        assert!(violations.contains(&Violation::CountMismatch {
            recorded: 5,
            counted: 4
        }));
    }

    #[test]
    fn test_upper_level_checked_against_level_directly_below() {
        let mut skip_list = tower();
        // Drop 50 (slot 4) from level 1 while levels 0 and 2 still hold it.
        node_mut(&mut skip_list, 3).forward[1] = None;
        let violations = check_integrity(&skip_list);
        assert_eq!(violations, vec![Violation::MissingBelow { level: 2, node: 4 }]);
    }

    #[test]
    fn test_reordered_levels() {
        let mut skip_list = tower();
        // Level 1 reads 40, 30, 50 while level 0 reads 30, 40.
        skip_list.head[1] = Some(3);
        node_mut(&mut skip_list, 3).forward[1] = Some(2);
        node_mut(&mut skip_list, 2).forward[1] = Some(4);
        let violations = check_integrity(&skip_list);
        assert!(violations.contains(&Violation::Reordered {
            level: 1,
            previous: 3,
            node: 2
        }));
        assert!(violations.contains(&Violation::OutOfOrder {
            level: 1,
            previous: 3,
            node: 2
        }));
    }

    #[test]
    fn test_cycle_and_dangling_links() {
        let mut skip_list = tower();
        node_mut(&mut skip_list, 4).forward[0] = Some(0);
        node_mut(&mut skip_list, 4).forward[2] = Some(99);
        let violations = check_integrity(&skip_list);
        assert!(violations.contains(&Violation::Cycle { level: 0, node: 0 }));
        assert!(violations.contains(&Violation::DanglingLink {
            level: 2,
            target: 99
        }));
    }

    #[test]
    fn test_link_above_height_and_tall_node() {
        let mut skip_list = tower();
        // Slot 0 has height 1 but level 1 now points at it. The walk stops
        // there, so level 2 finds 50 missing from level 1.
        skip_list.head[1] = Some(0);
        let violations = check_integrity(&skip_list);
        assert_eq!(
            violations,
            vec![
                Violation::LinkAboveHeight {
                    level: 1,
                    node: 0,
                    height: 1
                },
                Violation::MissingBelow { level: 2, node: 4 },
            ]
        );

        let mut skip_list = tower();
        node_mut(&mut skip_list, 4).forward = vec![None; 5].into_boxed_slice();
        let violations = check_integrity(&skip_list);
        assert!(violations.contains(&Violation::TallerThanHead {
            node: 4,
            height: 5,
            head_height: 3
        }));
    }

    #[test]
    fn test_violation_messages() {
        let violation = Violation::MissingBelow { level: 2, node: 7 };
        assert_eq!(
            violation.to_string(),
            "level 2: node 7 is missing from the level below"
        );
    }
}
