//! Dependency graph over declared targets.
//!
//! Nodes are added in declaration order, so a node's index doubles as its
//! declaration position and is used to break ordering ties.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};

use super::types::ScheduleError;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
  Unvisited,
  Visiting,
  Done,
}

/// A validated, acyclic target graph. Edges point from dependency to dependent.
#[derive(Debug)]
pub struct TargetGraph {
  graph: DiGraph<String, ()>,
  nodes: HashMap<String, NodeIndex>,
}

impl TargetGraph {
  /// Build and validate the graph from `(name, dependencies)` pairs in declaration order.
  ///
  /// # Errors
  ///
  /// Returns the first duplicate name, unknown dependency, or cycle found.
  pub fn build<'a, I>(targets: I) -> Result<Self, ScheduleError>
  where
    I: IntoIterator<Item = (&'a str, &'a [String])>,
  {
    let mut graph = DiGraph::new();
    let mut nodes = HashMap::new();
    let mut declared = Vec::new();

    for (name, deps) in targets {
      if nodes.contains_key(name) {
        return Err(ScheduleError::DuplicateTarget(name.to_string()));
      }
      let idx = graph.add_node(name.to_string());
      nodes.insert(name.to_string(), idx);
      declared.push((idx, deps));
    }

    for (dependent, deps) in declared {
      for dep in deps {
        let Some(&dep_idx) = nodes.get(dep) else {
          return Err(ScheduleError::UnknownDependency {
            target: graph[dependent].clone(),
            dependency: dep.clone(),
          });
        };
        graph.update_edge(dep_idx, dependent, ());
      }
    }

    let graph = Self { graph, nodes };
    graph.detect_cycle()?;
    Ok(graph)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.nodes.contains_key(name)
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// Direct dependencies of `name`, in declaration order of the dependencies.
  pub fn dependencies(&self, name: &str) -> Vec<&str> {
    let Some(&idx) = self.nodes.get(name) else {
      return Vec::new();
    };
    self
      .sorted_neighbors(idx, Direction::Incoming)
      .into_iter()
      .map(|dep| self.graph[dep].as_str())
      .collect()
  }

  /// Transitive closure of `requested` ordered so every target follows its
  /// dependencies. Ties go to the target declared first.
  pub fn order(&self, requested: &[String]) -> Result<Vec<String>, ScheduleError> {
    let closure = self.closure(requested)?;

    let mut in_degree: HashMap<NodeIndex, usize> = closure
      .iter()
      .map(|&idx| (idx, self.graph.neighbors_directed(idx, Direction::Incoming).count()))
      .collect();

    let mut ready: BinaryHeap<Reverse<NodeIndex>> = in_degree
      .iter()
      .filter(|&(_, &deg)| deg == 0)
      .map(|(&idx, _)| Reverse(idx))
      .collect();

    let mut order = Vec::with_capacity(closure.len());
    while let Some(Reverse(idx)) = ready.pop() {
      order.push(self.graph[idx].clone());
      for dependent in self.graph.neighbors_directed(idx, Direction::Outgoing) {
        if let Some(deg) = in_degree.get_mut(&dependent) {
          *deg -= 1;
          if *deg == 0 {
            ready.push(Reverse(dependent));
          }
        }
      }
    }

    Ok(order)
  }

  /// Group an order produced by [`Self::order`] into dependency levels.
  pub fn waves(&self, order: &[String]) -> Vec<Vec<String>> {
    let mut level: HashMap<NodeIndex, usize> = HashMap::new();
    let mut waves: Vec<Vec<String>> = Vec::new();

    for name in order {
      let Some(&idx) = self.nodes.get(name) else {
        continue;
      };
      let depth = self
        .graph
        .neighbors_directed(idx, Direction::Incoming)
        .filter_map(|dep| level.get(&dep))
        .map(|l| l + 1)
        .max()
        .unwrap_or(0);
      level.insert(idx, depth);

      if waves.len() <= depth {
        waves.resize_with(depth + 1, Vec::new);
      }
      waves[depth].push(name.clone());
    }

    waves
  }

  fn closure(&self, requested: &[String]) -> Result<HashSet<NodeIndex>, ScheduleError> {
    let mut closure = HashSet::new();
    let mut stack = Vec::new();

    for name in requested {
      let &idx = self
        .nodes
        .get(name)
        .ok_or_else(|| ScheduleError::UnknownTarget(name.clone()))?;
      stack.push(idx);
    }

    while let Some(idx) = stack.pop() {
      if closure.insert(idx) {
        stack.extend(self.graph.neighbors_directed(idx, Direction::Incoming));
      }
    }

    Ok(closure)
  }

  /// Depth-first search over dependency edges. Reaching a node that is still
  /// being visited closes a cycle.
  fn detect_cycle(&self) -> Result<(), ScheduleError> {
    let mut state = vec![Visit::Unvisited; self.graph.node_count()];
    let mut path = Vec::new();

    for start in self.graph.node_indices() {
      if state[start.index()] == Visit::Unvisited {
        self.visit(start, &mut state, &mut path)?;
      }
    }
    Ok(())
  }

  fn visit(&self, idx: NodeIndex, state: &mut [Visit], path: &mut Vec<NodeIndex>) -> Result<(), ScheduleError> {
    state[idx.index()] = Visit::Visiting;
    path.push(idx);

    for dep in self.sorted_neighbors(idx, Direction::Incoming) {
      match state[dep.index()] {
        Visit::Done => {}
        Visit::Unvisited => self.visit(dep, state, path)?,
        Visit::Visiting => {
          let start = path.iter().position(|&n| n == dep).unwrap_or(0);
          let mut cycle: Vec<String> = path[start..].iter().map(|&n| self.graph[n].clone()).collect();
          cycle.push(self.graph[dep].clone());
          return Err(ScheduleError::Cycle { path: cycle });
        }
      }
    }

    path.pop();
    state[idx.index()] = Visit::Done;
    Ok(())
  }

  fn sorted_neighbors(&self, idx: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
    let mut neighbors: Vec<NodeIndex> = self.graph.neighbors_directed(idx, direction).collect();
    neighbors.sort();
    neighbors
  }
}
