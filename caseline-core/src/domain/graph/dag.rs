// caseline-core/src/domain/graph/dag.rs

use crate::domain::error::DomainError;
use crate::domain::graph::task::TaskId;
use std::collections::{BTreeMap, VecDeque};

pub struct GraphSolver;

impl GraphSolver {
    /// Topological order of the given tasks (Kahn's algorithm).
    ///
    /// Dependencies outside `tasks` are ignored. Ties are broken by task
    /// declaration order so the plan is deterministic.
    pub fn plan_execution(tasks: &[TaskId]) -> Result<Vec<TaskId>, DomainError> {
        let mut in_degree: BTreeMap<TaskId, usize> = BTreeMap::new();
        let mut adj_list: BTreeMap<TaskId, Vec<TaskId>> = BTreeMap::new();

        // 1. Initialization
        for task in tasks {
            in_degree.insert(*task, 0);
            adj_list.insert(*task, Vec::new());
        }

        // 2. Graph Construction (Dependency Inversion)
        for task in tasks {
            for dep in task.upstream() {
                if in_degree.contains_key(dep) {
                    adj_list.entry(*dep).or_default().push(*task);
                    *in_degree.entry(*task).or_insert(0) += 1;
                }
            }
        }

        // 3. Kahn's Algorithm
        let mut queue: VecDeque<TaskId> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(task, _)| *task)
            .collect();

        let mut order = Vec::with_capacity(tasks.len());
        while let Some(current) = queue.pop_front() {
            order.push(current);
            if let Some(neighbors) = adj_list.get(&current) {
                for neighbor in neighbors {
                    if let Some(degree) = in_degree.get_mut(neighbor) {
                        *degree -= 1;
                        if *degree == 0 {
                            queue.push_back(*neighbor);
                        }
                    }
                }
            }
        }

        // 4. Cycle Detection
        if order.len() != in_degree.len() {
            return Err(DomainError::CircularDependency(format!(
                "Graph contains a cycle. Resolved {}/{} tasks.",
                order.len(),
                in_degree.len()
            )));
        }

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_full_chain_is_linear() -> Result<()> {
        let plan = GraphSolver::plan_execution(&TaskId::ALL)?;
        assert_eq!(plan, TaskId::ALL.to_vec());
        Ok(())
    }

    #[test]
    fn test_declaration_order_does_not_matter() -> Result<()> {
        let mut shuffled = TaskId::ALL.to_vec();
        shuffled.reverse();
        let plan = GraphSolver::plan_execution(&shuffled)?;
        assert_eq!(plan, TaskId::ALL.to_vec());
        Ok(())
    }

    #[test]
    fn test_subset_keeps_relative_order() -> Result<()> {
        let plan = GraphSolver::plan_execution(&[TaskId::Notify, TaskId::SourceApiReady])?;
        assert_eq!(plan, vec![TaskId::SourceApiReady, TaskId::Notify]);
        Ok(())
    }
}
