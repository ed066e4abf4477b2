//! Graph algorithms over the circuit DAG: reachability and topological order.

use crate::circuit::Circuit;
use crate::logic::GateId;

/// Per-gate marker produced by the depth-first search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitState {
    Unvisited,
    Visited,
}

/// Iterative depth-first search along operand edges, with hooks.
///
/// Roots are taken in the given order, operands in their stored order, so the
/// enter/exit sequence is exactly what the recursive formulation would
/// produce. Hooks fire as follows: `on_enter` when the traversal first touches
/// a gate, `on_exit` when all of its operands have been processed, `on_done`
/// once after the traversal, `on_unvisited` once per id left unvisited, in
/// ascending id order. Revisits are suppressed through the state vector, so
/// the search terminates on cycles. The explicit stack keeps deep circuits
/// from overflowing the call stack.
pub fn depth_first_search(
    circuit: &Circuit,
    roots: &[GateId],
    mut on_enter: impl FnMut(GateId, &[VisitState]),
    mut on_exit: impl FnMut(GateId, &[VisitState]),
    mut on_done: impl FnMut(),
    mut on_unvisited: impl FnMut(GateId, &[VisitState]),
) -> Vec<VisitState> {
    let n = circuit.num_gates();
    let mut state = vec![VisitState::Unvisited; n];
    // (gate, index of the next operand to look at)
    let mut stack: Vec<(GateId, usize)> = Vec::new();

    for &root in roots {
        if state[root] == VisitState::Visited {
            continue;
        }
        state[root] = VisitState::Visited;
        on_enter(root, &state);
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let gate = frame.0;
            let next = frame.1;
            let operands = circuit.operands(gate);
            if next == operands.len() {
                stack.pop();
                on_exit(gate, &state);
                continue;
            }
            frame.1 += 1;
            let operand = operands[next];
            if state[operand] == VisitState::Unvisited {
                state[operand] = VisitState::Visited;
                on_enter(operand, &state);
                stack.push((operand, 0));
            }
        }
    }
    on_done();

    for gate in 0..n {
        if state[gate] == VisitState::Unvisited {
            on_unvisited(gate, &state);
        }
    }
    state
}

/// Marks every gate reachable from `roots` following operand edges.
#[must_use]
pub fn reach(circuit: &Circuit, roots: &[GateId]) -> Vec<VisitState> {
    depth_first_search(circuit, roots, |_, _| {}, |_, _| {}, || {}, |_, _| {})
}

/// Topological order of the whole circuit, outputs-first.
///
/// Every gate precedes all of its operands and every id in `[0, N)` appears
/// exactly once. Computed as the reverse post-order of a DFS rooted at the
/// gates without users (ascending), which covers disconnected regions as well;
/// ids on a cycle (unreachable from any user-less gate) trail the rest.
#[must_use]
pub fn top_sort(circuit: &Circuit) -> Vec<GateId> {
    let n = circuit.num_gates();
    let sinks: Vec<GateId> = (0..n).filter(|&g| circuit.users(g).is_empty()).collect();

    let mut order: Vec<GateId> = Vec::with_capacity(n);
    let state = depth_first_search(
        circuit,
        &sinks,
        |_, _| {},
        |gate, _| order.push(gate),
        || {},
        |_, _| {},
    );
    order.reverse();
    for gate in 0..n {
        if state[gate] == VisitState::Unvisited {
            order.push(gate);
        }
    }
    order
}
