//! Generic cycle detection over an id adjacency graph.
//!
//! Depth-first search tracking the current path, the nodes on the stack and
//! the nodes fully explored. Reaching a node already on the stack closes a
//! cycle. Each cycle is canonicalized (rotated to start at its smallest id)
//! before recording, so one loop is reported once whichever member the
//! search entered it from.

use std::collections::{btree_set, BTreeMap, BTreeSet, HashSet};

/// Node id to successor ids.
pub type Adjacency = BTreeMap<String, BTreeSet<String>>;

/// How many cycles to look for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CycleSearch {
    /// Stop after the first cycle.
    #[default]
    FirstOnly,
    /// Report every distinct cycle reachable from the scanned nodes.
    Exhaustive,
}

static NO_SUCCESSORS: BTreeSet<String> = BTreeSet::new();

/// Find cycles reachable from `nodes`, scanned in the given order.
///
/// Each cycle is returned closed (first id repeated at the end) and in
/// canonical rotation.
#[must_use]
pub fn find_cycles<'g, I>(adjacency: &'g Adjacency, nodes: I, search: CycleSearch) -> Vec<Vec<String>>
where
    I: IntoIterator<Item = &'g str>,
{
    let mut finder = CycleFinder {
        adjacency,
        stop_at_first: search == CycleSearch::FirstOnly,
        path: Vec::new(),
        on_stack: HashSet::new(),
        done: HashSet::new(),
        seen: HashSet::new(),
        cycles: Vec::new(),
    };
    for node in nodes {
        if finder.done.contains(node) {
            continue;
        }
        if finder.scan(node) {
            break;
        }
    }
    finder.cycles
}

struct CycleFinder<'g> {
    adjacency: &'g Adjacency,
    stop_at_first: bool,
    path: Vec<&'g str>,
    on_stack: HashSet<&'g str>,
    done: HashSet<&'g str>,
    seen: HashSet<String>,
    cycles: Vec<Vec<String>>,
}

impl<'g> CycleFinder<'g> {
    fn successors(&self, node: &str) -> btree_set::Iter<'g, String> {
        self.adjacency
            .get(node)
            .map_or_else(|| NO_SUCCESSORS.iter(), BTreeSet::iter)
    }

    /// Explore from `root`. Returns true when the search should stop.
    fn scan(&mut self, root: &'g str) -> bool {
        let mut stack = vec![(root, self.successors(root))];
        self.path.push(root);
        self.on_stack.insert(root);

        while let Some((node, successors)) = stack.last_mut() {
            if let Some(next) = successors.next() {
                let next = next.as_str();
                if self.on_stack.contains(next) {
                    if self.record(next) && self.stop_at_first {
                        return true;
                    }
                } else if !self.done.contains(next) {
                    self.path.push(next);
                    self.on_stack.insert(next);
                    stack.push((next, self.successors(next)));
                }
            } else {
                let node = *node;
                stack.pop();
                self.path.pop();
                self.on_stack.remove(node);
                self.done.insert(node);
            }
        }
        false
    }

    /// Record the cycle closed by revisiting `repeated`. Returns true when
    /// it had not been seen before.
    fn record(&mut self, repeated: &str) -> bool {
        let Some(start) = self.path.iter().position(|node| *node == repeated) else {
            return false;
        };
        let mut cycle: Vec<String> = self.path[start..].iter().map(ToString::to_string).collect();
        cycle.push(repeated.to_string());

        let canonical = canonicalize_cycle(&cycle);
        if !self.seen.insert(cycle_key(&canonical)) {
            return false;
        }
        self.cycles.push(canonical);
        true
    }
}

/// Rotate a closed cycle to start at its smallest id, and close it again.
#[must_use]
pub fn canonicalize_cycle(cycle: &[String]) -> Vec<String> {
    let open = match cycle {
        [first, .., last] if first == last => &cycle[..cycle.len() - 1],
        _ => cycle,
    };
    let Some(start) = open
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cmp(b))
        .map(|(position, _)| position)
    else {
        return Vec::new();
    };

    let mut canonical: Vec<String> = open[start..].iter().chain(&open[..start]).cloned().collect();
    canonical.push(open[start].clone());
    canonical
}

/// Display form of a cycle, also used as its dedup key.
#[must_use]
pub fn cycle_key(cycle: &[String]) -> String {
    cycle.join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, &str)]) -> Adjacency {
        let mut adjacency = Adjacency::new();
        for (from, to) in edges {
            adjacency
                .entry((*from).to_string())
                .or_default()
                .insert((*to).to_string());
        }
        adjacency
    }

    fn strings(ids: &[&str]) -> Vec<String> {
        ids.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_acyclic_graph() {
        let adjacency = graph(&[("a", "b"), ("b", "c"), ("a", "c")]);
        assert!(find_cycles(&adjacency, ["a", "b", "c"], CycleSearch::Exhaustive).is_empty());
    }

    #[test]
    fn test_canonical_rotation() {
        assert_eq!(
            canonicalize_cycle(&strings(&["c", "a", "b", "c"])),
            strings(&["a", "b", "c", "a"])
        );
        assert_eq!(canonicalize_cycle(&strings(&["x", "x"])), strings(&["x", "x"]));
    }

    #[test]
    fn test_three_cycle_reported_once_from_any_entry() {
        let adjacency = graph(&[("b", "c"), ("c", "a"), ("a", "b")]);
        for order in [["a", "b", "c"], ["b", "c", "a"], ["c", "a", "b"]] {
            let cycles = find_cycles(&adjacency, order, CycleSearch::Exhaustive);
            assert_eq!(cycles, vec![strings(&["a", "b", "c", "a"])]);
        }
    }

    #[test]
    fn test_first_only_stops_early() {
        let adjacency = graph(&[("a", "b"), ("b", "a"), ("c", "d"), ("d", "c")]);
        let first = find_cycles(&adjacency, ["a", "c"], CycleSearch::FirstOnly);
        assert_eq!(first, vec![strings(&["a", "b", "a"])]);

        let all = find_cycles(&adjacency, ["a", "c"], CycleSearch::Exhaustive);
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_self_loop() {
        let adjacency = graph(&[("a", "a")]);
        assert_eq!(
            find_cycles(&adjacency, ["a"], CycleSearch::FirstOnly),
            vec![strings(&["a", "a"])]
        );
    }

    #[test]
    fn test_cycle_behind_a_tail() {
        let adjacency = graph(&[("start", "x"), ("x", "y"), ("y", "z"), ("z", "x")]);
        assert_eq!(
            find_cycles(&adjacency, ["start"], CycleSearch::FirstOnly),
            vec![strings(&["x", "y", "z", "x"])]
        );
    }
}
