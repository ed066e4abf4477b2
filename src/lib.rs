//! Boolean circuit minimization.
//!
//! The crate ingests a combinational circuit in the bench text format, runs a
//! pipeline of semantics-preserving rewrites over an immutable DAG
//! representation, and emits the reduced circuit in the same format. The
//! interesting machinery lives in [`circuit`] (the IR), [`algo`] (traversals
//! and the three-valued evaluator) and [`minimize`] (the rewrite passes and
//! their combinators); [`bench`] holds the textual frontend.

pub mod algo;
pub mod assignment;
pub mod bench;
pub mod circuit;
pub mod encoder;
mod error;
pub mod logic;
pub mod minimize;
pub mod seed;

pub use assignment::VectorAssignment;
pub use circuit::{Circuit, GateInfo};
pub use encoder::NameEncoder;
pub use error::{Error, Result};
pub use logic::{GateId, GateState, GateType};
pub use minimize::{Pass, Pipeline};

use std::io::{BufRead, Write};

use snafu::ensure;

/// Parses bench text from `input`, runs `pipeline` over it, and writes the
/// reduced circuit as bench text to `output`.
pub fn minimize_bench(
    input: impl BufRead,
    output: &mut impl Write,
    pipeline: &Pipeline,
) -> Result<()> {
    let (circuit, encoder) = bench::parse_bench(input)?;
    log::info!(
        "parsed circuit: {} gates ({} operators), {} outputs",
        circuit.num_gates(),
        circuit.num_operator_gates(),
        circuit.outputs().len()
    );

    let (reduced, reduced_encoder) = pipeline.apply(circuit, encoder);
    ensure!(
        reduced_encoder.size() == reduced.num_gates(),
        error::InvariantSnafu {
            detail: format!(
                "encoder carries {} names for {} gates",
                reduced_encoder.size(),
                reduced.num_gates()
            ),
        }
    );
    log::info!(
        "reduced circuit: {} gates ({} operators)",
        reduced.num_gates(),
        reduced.num_operator_gates()
    );

    bench::write_bench(&reduced, &reduced_encoder, output).map_err(|source| Error::Io {
        source,
        path: "<bench sink>".into(),
    })
}
