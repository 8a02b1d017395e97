//! Flat module records to a parent/child forest.

use std::collections::HashMap;

use backoffice_core::models::module::{ModuleId, ModuleNode, ModuleRecord};

use crate::error::AccessError;

/// Build a forest from flat records.
///
/// Children keep input order. A `parent_id` that references no record
/// in the input puts the node at root level. Duplicate ids and cyclic
/// parent chains are rejected.
pub fn build_forest(records: Vec<ModuleRecord>) -> Result<Vec<ModuleNode>, AccessError> {
    let n = records.len();

    let mut index: HashMap<ModuleId, usize> = HashMap::with_capacity(n);
    for (i, record) in records.iter().enumerate() {
        if index.insert(record.id, i).is_some() {
            return Err(AccessError::DuplicateModule(record.id));
        }
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut roots = Vec::new();
    for (i, record) in records.iter().enumerate() {
        match record.parent_id.and_then(|p| index.get(&p)) {
            Some(&parent) => children[parent].push(i),
            None => roots.push(i),
        }
    }

    // Pre-order from the roots. Anything not reached sits on a cycle
    // or hangs below one.
    let mut order = Vec::with_capacity(n);
    let mut reached = vec![false; n];
    let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
    while let Some(i) = stack.pop() {
        reached[i] = true;
        order.push(i);
        stack.extend(children[i].iter().rev());
    }
    if order.len() != n {
        return Err(cycle_error(&records, &index, &reached));
    }

    let mut slots: Vec<Option<ModuleRecord>> = records.into_iter().map(Some).collect();
    let mut built: Vec<Option<ModuleNode>> = (0..n).map(|_| None).collect();
    for &i in order.iter().rev() {
        let kids = children[i]
            .iter()
            .filter_map(|&c| built[c].take())
            .collect();
        if let Some(record) = slots[i].take() {
            built[i] = Some(ModuleNode {
                record,
                children: kids,
            });
        }
    }

    Ok(roots.iter().filter_map(|&r| built[r].take()).collect())
}

/// Follow parent links from the first unreached record until an id
/// repeats, and report that loop.
fn cycle_error(
    records: &[ModuleRecord],
    index: &HashMap<ModuleId, usize>,
    reached: &[bool],
) -> AccessError {
    let Some(start) = reached.iter().position(|r| !r) else {
        return AccessError::CyclicParent { chain: Vec::new() };
    };

    let mut position: HashMap<usize, usize> = HashMap::new();
    let mut chain: Vec<usize> = Vec::new();
    let mut cur = start;
    loop {
        if let Some(&pos) = position.get(&cur) {
            let chain = chain[pos..].iter().map(|&i| records[i].id).collect();
            return AccessError::CyclicParent { chain };
        }
        position.insert(cur, chain.len());
        chain.push(cur);
        match records[cur].parent_id.and_then(|p| index.get(&p)) {
            Some(&parent) => cur = parent,
            None => break,
        }
    }
    AccessError::CyclicParent {
        chain: chain.iter().map(|&i| records[i].id).collect(),
    }
}
