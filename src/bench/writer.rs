//! Writer for the bench circuit format.

use std::io::{self, Write};

use crate::circuit::Circuit;
use crate::encoder::NameEncoder;
use crate::logic::GateType;

/// Emits `circuit` as bench text: the `INPUT` block, a blank line, the
/// `OUTPUT` block, a blank line, then one definition per non-input gate in id
/// order. Names are decoded through `encoder`; constants are printed back in
/// their `CONST(0)` / `CONST(1)` spelling so the output re-parses.
pub fn write_bench(
    circuit: &Circuit,
    encoder: &NameEncoder,
    out: &mut impl Write,
) -> io::Result<()> {
    log::debug!("writing bench stream");

    for &input in circuit.inputs() {
        writeln!(out, "INPUT({})", encoder.decode(input))?;
    }
    writeln!(out)?;

    for &output in circuit.outputs() {
        writeln!(out, "OUTPUT({})", encoder.decode(output))?;
    }
    writeln!(out)?;

    for gate_id in 0..circuit.num_gates() {
        let gate_type = circuit.gate_type(gate_id);
        if gate_type == GateType::Input {
            continue;
        }
        if gate_type.is_constant() {
            writeln!(
                out,
                "{} = {}",
                encoder.decode(gate_id),
                gate_type.bench_name()
            )?;
            continue;
        }
        let operands = circuit
            .operands(gate_id)
            .iter()
            .map(|&operand| encoder.decode(operand))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(
            out,
            "{} = {}({})",
            encoder.decode(gate_id),
            gate_type.bench_name(),
            operands
        )?;
    }
    Ok(())
}

/// [`write_bench`] into a `String`.
#[must_use]
pub fn to_bench_string(circuit: &Circuit, encoder: &NameEncoder) -> String {
    let mut buf = Vec::new();
    write_bench(circuit, encoder, &mut buf).expect("writing to a Vec can not fail");
    String::from_utf8(buf).expect("bench text is ASCII")
}
