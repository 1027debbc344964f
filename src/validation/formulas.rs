//! Circular reference detection for forecast spreadsheet formulas.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::LazyLock;

use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use regex::Regex;

use super::ValidationIssue;

/// Ranges larger than this are reduced to their two corner cells.
const MAX_RANGE_CELLS: u64 = 10_000;

/// Longer cycles are shown with the middle elided.
const MAX_PATH_CELLS: usize = 12;

static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$?\b([A-Za-z]{1,3})\$?([0-9]+):\$?([A-Za-z]{1,3})\$?([0-9]+)\b")
        .expect("range pattern is valid")
});

static CELL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$?\b([A-Za-z]{1,3})\$?([0-9]+)\b").expect("cell pattern is valid")
});

/// Cell ids referenced by a formula, uppercased, in order of first use.
///
/// Rectangular ranges such as `A1:B3` are expanded to every cell they cover.
pub fn extract_references(formula: &str) -> Vec<String> {
    let mut refs: Vec<String> = Vec::new();
    let mut push = |cell: String| {
        if !refs.contains(&cell) {
            refs.push(cell);
        }
    };

    let mut rest = String::with_capacity(formula.len());
    let mut last = 0;
    for caps in RANGE_RE.captures_iter(formula) {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        rest.push_str(&formula[last..whole.start]);
        rest.push(' ');
        last = whole.end;

        let start = (column_index(&caps[1]), caps[2].parse::<u64>().ok());
        let end = (column_index(&caps[3]), caps[4].parse::<u64>().ok());
        match (start, end) {
            ((c1, Some(r1)), (c2, Some(r2))) => {
                for cell in expand_range(c1, r1, c2, r2) {
                    push(cell);
                }
            }
            _ => {
                push(format!("{}{}", caps[1].to_uppercase(), &caps[2]));
                push(format!("{}{}", caps[3].to_uppercase(), &caps[4]));
            }
        }
    }
    rest.push_str(&formula[last..]);

    for caps in CELL_RE.captures_iter(&rest) {
        push(format!("{}{}", caps[1].to_uppercase(), &caps[2]));
    }

    refs
}

fn column_index(letters: &str) -> u64 {
    letters
        .to_uppercase()
        .bytes()
        .fold(0, |acc, b| acc * 26 + u64::from(b - b'A' + 1))
}

fn column_letters(mut index: u64) -> String {
    let mut letters = Vec::new();
    while index > 0 {
        let rem = ((index - 1) % 26) as u8;
        letters.push((b'A' + rem) as char);
        index = (index - 1) / 26;
    }
    letters.iter().rev().collect()
}

fn expand_range(c1: u64, r1: u64, c2: u64, r2: u64) -> Vec<String> {
    let (c_lo, c_hi) = (c1.min(c2), c1.max(c2));
    let (r_lo, r_hi) = (r1.min(r2), r1.max(r2));
    let count = (c_hi - c_lo)
        .checked_add(1)
        .zip((r_hi - r_lo).checked_add(1))
        .and_then(|(cols, rows)| cols.checked_mul(rows));

    match count {
        Some(count) if count <= MAX_RANGE_CELLS => {
            let mut cells = Vec::with_capacity(count as usize);
            for c in c_lo..=c_hi {
                let col = column_letters(c);
                for r in r_lo..=r_hi {
                    cells.push(format!("{}{}", col, r));
                }
            }
            cells
        }
        _ => vec![
            format!("{}{}", column_letters(c1), r1),
            format!("{}{}", column_letters(c2), r2),
        ],
    }
}

fn cell_id(cell: &str) -> String {
    cell.trim().to_uppercase()
}

/// Report every cell that takes part in a circular reference.
///
/// `formulas` maps cell id to formula text. `cell_references` maps a cell to
/// the cells its formula reads; when a formula cell has no entry there, its
/// references are extracted from the formula text. Cell ids are compared
/// case-insensitively. One error is produced per cell on a cycle, in cell id
/// order.
pub fn validate_formulas(
    formulas: &HashMap<String, String>,
    cell_references: &HashMap<String, Vec<String>>,
) -> Vec<ValidationIssue> {
    let mut edges: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (cell, targets) in cell_references {
        edges
            .entry(cell_id(cell))
            .or_default()
            .extend(targets.iter().map(|t| cell_id(t)));
    }
    for (cell, formula) in formulas {
        edges
            .entry(cell_id(cell))
            .or_insert_with(|| extract_references(formula));
    }

    let mut graph: DiGraph<&str, ()> = DiGraph::new();
    let mut nodes: HashMap<&str, NodeIndex> = HashMap::new();
    for (cell, targets) in &edges {
        let from = node(&mut graph, &mut nodes, cell);
        for target in targets {
            let to = node(&mut graph, &mut nodes, target);
            graph.update_edge(from, to, ());
        }
    }

    let mut on_cycle: BTreeMap<&str, String> = BTreeMap::new();
    for component in kosaraju_scc(&graph) {
        let cyclic = component.len() > 1
            || component
                .first()
                .is_some_and(|&n| graph.find_edge(n, n).is_some());
        if !cyclic {
            continue;
        }

        let Some(&start) = component.iter().min_by_key(|&&n| graph[n]) else {
            continue;
        };
        let members: HashSet<NodeIndex> = component.iter().copied().collect();
        let path = describe_cycle(&cycle_through(&graph, start, &members));
        for &member in &component {
            on_cycle.insert(graph[member], path.clone());
        }
    }

    on_cycle
        .into_iter()
        .map(|(cell, path)| {
            ValidationIssue::error(cell, format!("Circular reference: {}", path))
                .with_suggestion("Replace one of the references with a fixed value")
        })
        .collect()
}

/// Join a cycle path, eliding the middle of long ones.
fn describe_cycle(path: &[&str]) -> String {
    if path.len() <= MAX_PATH_CELLS {
        return path.join(" -> ");
    }
    let head = path[..3].join(" -> ");
    let tail = path[path.len() - 2..].join(" -> ");
    format!("{} -> ... -> {}", head, tail)
}

fn node<'a>(
    graph: &mut DiGraph<&'a str, ()>,
    nodes: &mut HashMap<&'a str, NodeIndex>,
    cell: &'a str,
) -> NodeIndex {
    *nodes.entry(cell).or_insert_with(|| graph.add_node(cell))
}

/// Shortest cycle from `start` back to itself through `members`.
fn cycle_through<'a>(
    graph: &DiGraph<&'a str, ()>,
    start: NodeIndex,
    members: &HashSet<NodeIndex>,
) -> Vec<&'a str> {
    let mut previous: HashMap<NodeIndex, NodeIndex> = HashMap::new();
    let mut queue = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        for next in graph.neighbors(current) {
            if next == start {
                let mut back = Vec::new();
                let mut step = current;
                while step != start {
                    back.push(graph[step]);
                    match previous.get(&step) {
                        Some(&p) => step = p,
                        None => break,
                    }
                }
                let mut path = vec![graph[start]];
                path.extend(back.into_iter().rev());
                path.push(graph[start]);
                return path;
            }
            if members.contains(&next) && !previous.contains_key(&next) {
                previous.insert(next, current);
                queue.push_back(next);
            }
        }
    }

    let mut cells: Vec<&str> = members.iter().map(|&n| graph[n]).collect();
    cells.sort_unstable();
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Severity;

    fn refs(pairs: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
        pairs
            .iter()
            .map(|(cell, targets)| {
                (
                    cell.to_string(),
                    targets.iter().map(|t| t.to_string()).collect(),
                )
            })
            .collect()
    }

    fn formulas(cells: &[&str]) -> HashMap<String, String> {
        cells
            .iter()
            .map(|c| (c.to_string(), String::new()))
            .collect()
    }

    #[test]
    fn test_two_cycle_detected() {
        let issues = validate_formulas(
            &formulas(&["A", "B"]),
            &refs(&[("A", &["B"]), ("B", &["A"])]),
        );
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.severity == Severity::Error));
        assert_eq!(issues[0].field, "A");
        assert_eq!(issues[0].message, "Circular reference: A -> B -> A");
        assert_eq!(issues[1].field, "B");
    }

    #[test]
    fn test_acyclic_graph_ok() {
        let issues = validate_formulas(
            &formulas(&["A", "B", "C"]),
            &refs(&[("A", &["B"]), ("B", &["C"])]),
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn test_only_cycle_members_reported() {
        // A feeds into the B <-> C loop but is not part of it
        let issues = validate_formulas(
            &formulas(&["A", "B", "C"]),
            &refs(&[("A", &["B"]), ("B", &["C"]), ("C", &["B"])]),
        );
        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["B", "C"]);
    }

    #[test]
    fn test_self_reference() {
        let issues = validate_formulas(&formulas(&["A1"]), &refs(&[("A1", &["A1"])]));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "Circular reference: A1 -> A1");
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let issues = validate_formulas(
            &formulas(&["A", "B", "C"]),
            &refs(&[("A", &["B", "C"]), ("B", &["D"]), ("C", &["D"])]),
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn test_references_from_formula_text() {
        let mut cells = HashMap::new();
        cells.insert("B2".to_string(), "=SUM(C1:C3) * 2".to_string());
        cells.insert("C2".to_string(), "=b2 + $D$1".to_string());

        let issues = validate_formulas(&cells, &HashMap::new());
        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["B2", "C2"]);
    }

    #[test]
    fn test_extract_references() {
        assert_eq!(extract_references("=A1+b2*$C$3"), vec!["A1", "B2", "C3"]);
        assert_eq!(
            extract_references("=SUM(A1:B2)+A1"),
            vec!["A1", "A2", "B1", "B2"]
        );
        assert_eq!(extract_references("=Z1:AA1"), vec!["Z1", "AA1"]);
        assert!(extract_references("=100*2").is_empty());
    }

    #[test]
    fn test_long_dependency_chain() {
        // a running-balance column: each cell reads the one below it
        let n = 5_000;
        let chain: HashMap<String, Vec<String>> = (0..n)
            .map(|i| (format!("A{}", i), vec![format!("A{}", i + 1)]))
            .collect();
        let cells: HashMap<String, String> =
            chain.keys().map(|c| (c.clone(), String::new())).collect();
        assert!(validate_formulas(&cells, &chain).is_empty());

        let mut ring = chain.clone();
        ring.insert(format!("A{}", n - 1), vec!["A0".to_string()]);
        let issues = validate_formulas(&cells, &ring);
        assert_eq!(issues.len(), n);
        assert!(issues[0].message.starts_with("Circular reference: A0 -> A1 -> A2"));
        assert!(issues[0].message.ends_with("A4999 -> A0"));
        assert!(issues[0].message.contains(" -> ... -> "));
        assert!(issues.iter().all(|i| i.message == issues[0].message));
    }

    #[test]
    fn test_cell_ids_are_case_insensitive() {
        let mut cells = HashMap::new();
        cells.insert("b2".to_string(), "=C2".to_string());
        cells.insert("C2".to_string(), "=b2".to_string());

        let issues = validate_formulas(&cells, &HashMap::new());
        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["B2", "C2"]);

        let issues = validate_formulas(&formulas(&["x1"]), &refs(&[("x1", &["X1"])]));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "X1");
    }

    #[test]
    fn test_oversized_ranges_do_not_overflow() {
        assert_eq!(
            extract_references("=A0:A18446744073709551615"),
            vec!["A0", "A18446744073709551615"]
        );
        assert_eq!(extract_references("=A1:XFD1048576"), vec!["A1", "XFD1048576"]);
        // rows too large for u64 are kept as written
        assert_eq!(
            extract_references("=A1:A99999999999999999999"),
            vec!["A1", "A99999999999999999999"]
        );
    }

    #[test]
    fn test_column_letters_round_trip() {
        for index in [1, 26, 27, 52, 702, 703] {
            assert_eq!(column_index(&column_letters(index)), index);
        }
        assert_eq!(column_letters(28), "AB");
    }
}
