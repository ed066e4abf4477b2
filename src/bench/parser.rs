//! Parser for the bench circuit format.
//!
//! The format is line oriented: `INPUT(name)` and `OUTPUT(name)` declarations
//! plus one `name = OP(arg, ...)` definition per gate. Blank lines and lines
//! starting with `#` are skipped. Each name is encoded on first mention, so
//! the id order of the resulting circuit is the textual order of first
//! mention.

use std::io::BufRead;

use snafu::ResultExt;

use crate::circuit::{Circuit, GateInfo};
use crate::encoder::NameEncoder;
use crate::error::{Error, IoSnafu, Result};
use crate::logic::{GateId, GateType};

/// Parses a whole bench stream into a circuit and its name encoder.
pub fn parse_bench(reader: impl BufRead) -> Result<(Circuit, NameEncoder)> {
    log::debug!("started parsing of bench stream");
    let mut parser = BenchParser::default();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.context(IoSnafu {
            path: "<bench stream>",
        })?;
        parser.parse_line(idx + 1, &line)?;
    }
    let parsed = parser.finish();
    log::debug!("ended parsing of bench stream");
    parsed
}

/// Convenience wrapper for in-memory bench text.
pub fn parse_bench_str(text: &str) -> Result<(Circuit, NameEncoder)> {
    parse_bench(text.as_bytes())
}

#[derive(Default)]
struct BenchParser {
    encoder: NameEncoder,
    // Definition per gate id; `None` until the defining line was seen.
    defs: Vec<Option<GateInfo>>,
    outputs: Vec<GateId>,
}

fn parse_error(line_no: usize, line: &str, reason: impl Into<String>) -> Error {
    Error::Parse {
        line_no,
        line: line.trim().to_owned(),
        reason: reason.into(),
    }
}

fn operator_from_keyword(op: &str) -> Option<GateType> {
    // Case-sensitive, as in the original benchmark files. `BUFF` is the
    // identity just like `IFF` and is normalized to it.
    match op {
        "NOT" => Some(GateType::Not),
        "AND" => Some(GateType::And),
        "NAND" => Some(GateType::Nand),
        "OR" => Some(GateType::Or),
        "NOR" => Some(GateType::Nor),
        "XOR" => Some(GateType::Xor),
        "NXOR" => Some(GateType::Nxor),
        "IFF" | "BUFF" => Some(GateType::Iff),
        "MUX" => Some(GateType::Mux),
        _ => None,
    }
}

impl BenchParser {
    fn parse_line(&mut self, line_no: usize, raw_line: &str) -> Result<()> {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        if let Some(rest) = line.strip_prefix("INPUT") {
            let name = Self::bracketed_name(line_no, line, rest)?;
            let gate_id = self.encoder.encode(name);
            self.define(line_no, line, gate_id, GateInfo::new(GateType::Input, vec![]))?;
            return Ok(());
        }
        if let Some(rest) = line.strip_prefix("OUTPUT") {
            let name = Self::bracketed_name(line_no, line, rest)?;
            let gate_id = self.encoder.encode(name);
            self.outputs.push(gate_id);
            return Ok(());
        }

        self.parse_gate_line(line_no, line)
    }

    /// Extracts the name out of `(name)`, tolerating surrounding whitespace.
    fn bracketed_name<'l>(line_no: usize, line: &str, rest: &'l str) -> Result<&'l str> {
        let open = rest
            .find('(')
            .ok_or_else(|| parse_error(line_no, line, "missing '('"))?;
        let close = rest
            .rfind(')')
            .ok_or_else(|| parse_error(line_no, line, "missing ')'"))?;
        if close < open {
            return Err(parse_error(line_no, line, "')' before '('"));
        }
        let name = rest[open + 1..close].trim();
        if name.is_empty() {
            return Err(parse_error(line_no, line, "empty gate name"));
        }
        Ok(name)
    }

    /// A `name = OP(arg, ...)` definition, or one of the zero-ary special
    /// forms `name = CONST(0|1)` and `name = vdd`.
    fn parse_gate_line(&mut self, line_no: usize, line: &str) -> Result<()> {
        let eq = line
            .find('=')
            .ok_or_else(|| parse_error(line_no, line, "expected INPUT, OUTPUT or '='"))?;
        let name = line[..eq].trim();
        if name.is_empty() {
            return Err(parse_error(line_no, line, "empty gate name"));
        }
        let rhs = line[eq + 1..].trim();

        // `name = vdd` is the only bracket-free form: a constant TRUE.
        if rhs == "vdd" {
            let gate_id = self.encoder.encode(name);
            return self.define(
                line_no,
                line,
                gate_id,
                GateInfo::new(GateType::ConstTrue, vec![]),
            );
        }

        let open = rhs
            .find('(')
            .ok_or_else(|| parse_error(line_no, line, "missing '('"))?;
        let close = rhs
            .rfind(')')
            .ok_or_else(|| parse_error(line_no, line, "missing ')'"))?;
        if close < open {
            return Err(parse_error(line_no, line, "')' before '('"));
        }
        let op = rhs[..open].trim();
        let args = rhs[open + 1..close].trim();
        let gate_id = self.encoder.encode(name);

        if op == "CONST" {
            let gate_type = match args {
                "0" => GateType::ConstFalse,
                "1" => GateType::ConstTrue,
                other => {
                    return Err(parse_error(line_no, line, format!("bad CONST arg '{other}'")))
                }
            };
            return self.define(line_no, line, gate_id, GateInfo::new(gate_type, vec![]));
        }

        let gate_type = operator_from_keyword(op)
            .ok_or_else(|| parse_error(line_no, line, format!("unknown operator '{op}'")))?;
        if args.is_empty() {
            return Err(parse_error(line_no, line, "missing operands"));
        }
        let mut operands: Vec<GateId> = Vec::new();
        for arg in args.split(',') {
            let arg = arg.trim();
            if arg.is_empty() {
                return Err(parse_error(line_no, line, "empty operand"));
            }
            operands.push(self.encoder.encode(arg));
        }

        let arity_ok = match gate_type {
            GateType::Not | GateType::Iff => operands.len() == 1,
            GateType::Mux => operands.len() == 3,
            // The symmetric operators are N-ary with at least one operand.
            _ => !operands.is_empty(),
        };
        if !arity_ok {
            return Err(parse_error(
                line_no,
                line,
                format!("operator '{op}' does not take {} operands", operands.len()),
            ));
        }

        self.define(line_no, line, gate_id, GateInfo::new(gate_type, operands))
    }

    fn define(&mut self, line_no: usize, line: &str, gate_id: GateId, info: GateInfo) -> Result<()> {
        if self.defs.len() < self.encoder.size() {
            self.defs.resize(self.encoder.size(), None);
        }
        if self.defs[gate_id].is_some() {
            return Err(parse_error(
                line_no,
                line,
                format!("gate '{}' is defined twice", self.encoder.decode(gate_id)),
            ));
        }
        self.defs[gate_id] = Some(info);
        Ok(())
    }

    fn finish(mut self) -> Result<(Circuit, NameEncoder)> {
        self.defs.resize(self.encoder.size(), None);
        let mut gate_info = Vec::with_capacity(self.defs.len());
        for (id, def) in self.defs.into_iter().enumerate() {
            match def {
                Some(info) => gate_info.push(info),
                None => {
                    return Err(Error::Parse {
                        line_no: 0,
                        line: String::new(),
                        reason: format!(
                            "gate '{}' is referenced but never defined",
                            self.encoder.decode(id)
                        ),
                    })
                }
            }
        }
        Ok((Circuit::new(gate_info, self.outputs), self.encoder))
    }
}

#[cfg(test)]
mod tests {
    use super::parse_bench_str;
    use crate::logic::GateType;

    #[test]
    fn names_encode_in_order_of_first_mention() {
        let text = "# Comment Line\n\
                    #\n\
                    \n\
                    INPUT(X)\n\
                    INPUT(Y)\n\
                    \n\
                    OUTPUT(Z)\n\
                    Z = AND(X, Y)\n";
        let (circuit, encoder) = parse_bench_str(text).unwrap();
        assert_eq!(encoder.get("X"), Some(0));
        assert_eq!(encoder.get("Y"), Some(1));
        assert_eq!(encoder.get("Z"), Some(2));
        assert_eq!(circuit.gate_type(2), GateType::And);
        assert_eq!(circuit.outputs(), &[2]);
    }

    #[test]
    fn keywords_are_valid_names() {
        let text = "INPUT(INPUT)\n\
                    INPUT(ABCDEF)\n\
                    OUTPUT(OUTPUT)\n\
                    OUTPUT = OR(INPUT, ABCDEF)\n";
        let (_, encoder) = parse_bench_str(text).unwrap();
        assert_eq!(encoder.get("INPUT"), Some(0));
        assert_eq!(encoder.get("ABCDEF"), Some(1));
        assert_eq!(encoder.get("OUTPUT"), Some(2));
    }

    #[test]
    fn whitespace_around_tokens_is_ignored() {
        let text = "# Comment Line\n\
                    #\n\
                    \x20  \n\
                    \x20INPUT(     XXX)  \n\
                    INPUT(YY     )  \n\
                    \x20 INPUT(  ZZZZ     )\n\
                    \n\
                    OUTPUT(   ABC   )\n\
                    \x20  ABC  =   MUX(XXX  , YY,  ZZZZ  ) \n";
        let (circuit, encoder) = parse_bench_str(text).unwrap();
        assert_eq!(encoder.get("XXX"), Some(0));
        assert_eq!(encoder.get("YY"), Some(1));
        assert_eq!(encoder.get("ZZZZ"), Some(2));
        assert_eq!(encoder.get("ABC"), Some(3));
        assert_eq!(circuit.gate_type(3), GateType::Mux);
        assert_eq!(circuit.operands(3), &[0, 1, 2]);
    }

    #[test]
    fn const_gates() {
        let text = " INPUT(     XXX)  \n\
                    INPUT(YY     )  \n\
                    \x20ZZZZ  = CONST(0)\n\
                    \x20FFFFF  = CONST(1)\n\
                    \n\
                    OUTPUT(   ABC   )\n\
                    \x20  ABC  =   MUX(XXX  , YY,  ZZZZ  ) \n";
        let (circuit, encoder) = parse_bench_str(text).unwrap();
        assert_eq!(encoder.get("XXX"), Some(0));
        assert_eq!(encoder.get("YY"), Some(1));
        assert_eq!(encoder.get("ZZZZ"), Some(2));
        assert_eq!(encoder.get("FFFFF"), Some(3));
        assert_eq!(encoder.get("ABC"), Some(4));
        assert_eq!(circuit.gate_type(0), GateType::Input);
        assert_eq!(circuit.gate_type(1), GateType::Input);
        assert_eq!(circuit.gate_type(2), GateType::ConstFalse);
        assert_eq!(circuit.gate_type(3), GateType::ConstTrue);
        assert_eq!(circuit.gate_type(4), GateType::Mux);
    }

    #[test]
    fn vdd_is_const_true() {
        let text = " INPUT(     XXX)  \n\
                    \x20ZZZZ  = vdd\n\
                    \x20FFFFF  =      vdd    \n\
                    \n\
                    OUTPUT(   ABC   )\n\
                    \x20  ABC  =   MUX(XXX  , FFFFF,  ZZZZ  ) \n";
        let (circuit, encoder) = parse_bench_str(text).unwrap();
        assert_eq!(encoder.get("XXX"), Some(0));
        assert_eq!(encoder.get("ZZZZ"), Some(1));
        assert_eq!(encoder.get("FFFFF"), Some(2));
        assert_eq!(encoder.get("ABC"), Some(3));
        assert_eq!(circuit.gate_type(0), GateType::Input);
        assert_eq!(circuit.gate_type(1), GateType::ConstTrue);
        assert_eq!(circuit.gate_type(2), GateType::ConstTrue);
        assert_eq!(circuit.gate_type(3), GateType::Mux);
    }

    #[test]
    fn output_before_definition() {
        let text = "INPUT(a)\n\
                    OUTPUT(z)\n\
                    z = NOT(a)\n";
        let (circuit, _) = parse_bench_str(text).unwrap();
        assert_eq!(circuit.outputs(), &[1]);
        assert_eq!(circuit.gate_type(1), GateType::Not);
        assert_eq!(circuit.operands(1), &[0]);
    }

    #[test]
    fn symmetric_operands_come_out_sorted() {
        let text = "INPUT(a)\nINPUT(b)\nOUTPUT(z)\nz = AND(b, a)\n";
        let (circuit, _) = parse_bench_str(text).unwrap();
        // `b` was first mentioned after `a`, and operand lists of symmetric
        // operators are stored ascending.
        assert_eq!(circuit.operands(2), &[0, 1]);
    }

    #[test]
    fn unknown_operator_is_rejected() {
        let err = parse_bench_str("INPUT(a)\nz = FROB(a)\nOUTPUT(z)\n").unwrap_err();
        assert!(err.to_string().contains("unknown operator"));
    }

    #[test]
    fn wrong_arity_is_rejected() {
        let err = parse_bench_str("INPUT(a)\nINPUT(b)\nz = NOT(a, b)\nOUTPUT(z)\n").unwrap_err();
        assert!(err.to_string().contains("does not take 2 operands"));
        let err = parse_bench_str("INPUT(a)\nz = MUX(a, a)\nOUTPUT(z)\n").unwrap_err();
        assert!(err.to_string().contains("does not take 2 operands"));
    }

    #[test]
    fn undefined_reference_is_rejected() {
        let err = parse_bench_str("INPUT(a)\nOUTPUT(z)\nz = AND(a, ghost)\n").unwrap_err();
        assert!(err.to_string().contains("never defined"));
    }

    #[test]
    fn double_definition_is_rejected() {
        let err = parse_bench_str("INPUT(a)\nz = NOT(a)\nz = IFF(a)\nOUTPUT(z)\n").unwrap_err();
        assert!(err.to_string().contains("defined twice"));
    }
}
