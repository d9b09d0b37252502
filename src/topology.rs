//! Ordering and cycle detection over pipeline node graphs.

use crate::types::PipelineEdge;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use tracing::instrument;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
  Unvisited,
  Visiting,
  Done,
}

/// Adjacency lists by node index; edges naming unknown nodes are ignored.
fn adjacency(nodes: &[String], edges: &[PipelineEdge]) -> Vec<Vec<usize>> {
  let index: HashMap<&str, usize> = nodes
    .iter()
    .enumerate()
    .map(|(i, n)| (n.as_str(), i))
    .collect();
  let mut adj = vec![Vec::new(); nodes.len()];
  for e in edges {
    if let (Some(&from), Some(&to)) = (
      index.get(e.from_node.as_str()),
      index.get(e.to_node.as_str()),
    ) && !adj[from].contains(&to)
    {
      adj[from].push(to);
    }
  }
  adj
}

/// Topological order of `nodes` (as indices), preferring declaration order among ready nodes.
///
/// On a cycle, returns the node names along it with the first node repeated at the end.
#[instrument(level = "trace", skip(nodes, edges))]
pub(crate) fn topological_order(
  nodes: &[String],
  edges: &[PipelineEdge],
) -> Result<Vec<usize>, Vec<String>> {
  let adj = adjacency(nodes, edges);
  let mut indegree = vec![0usize; nodes.len()];
  for targets in &adj {
    for &t in targets {
      indegree[t] += 1;
    }
  }

  let mut ready: BinaryHeap<Reverse<usize>> = indegree
    .iter()
    .enumerate()
    .filter(|(_, d)| **d == 0)
    .map(|(i, _)| Reverse(i))
    .collect();
  let mut order = Vec::with_capacity(nodes.len());
  while let Some(Reverse(i)) = ready.pop() {
    order.push(i);
    for &t in &adj[i] {
      indegree[t] -= 1;
      if indegree[t] == 0 {
        ready.push(Reverse(t));
      }
    }
  }

  if order.len() == nodes.len() {
    return Ok(order);
  }
  let cycle = find_cycle(&adj).unwrap_or_default();
  Err(cycle.into_iter().map(|i| nodes[i].clone()).collect())
}

fn find_cycle(adj: &[Vec<usize>]) -> Option<Vec<usize>> {
  let mut marks = vec![Mark::Unvisited; adj.len()];
  let mut path = Vec::new();
  (0..adj.len()).find_map(|start| {
    if marks[start] == Mark::Unvisited {
      visit(start, adj, &mut marks, &mut path)
    } else {
      None
    }
  })
}

fn visit(node: usize, adj: &[Vec<usize>], marks: &mut [Mark], path: &mut Vec<usize>) -> Option<Vec<usize>> {
  marks[node] = Mark::Visiting;
  path.push(node);
  for &next in &adj[node] {
    match marks[next] {
      Mark::Visiting => {
        let pos = path.iter().position(|&p| p == next).unwrap_or(0);
        let mut cycle = path[pos..].to_vec();
        cycle.push(next);
        return Some(cycle);
      }
      Mark::Unvisited => {
        if let Some(cycle) = visit(next, adj, marks, path) {
          return Some(cycle);
        }
      }
      Mark::Done => {}
    }
  }
  path.pop();
  marks[node] = Mark::Done;
  None
}
