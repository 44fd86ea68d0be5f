//! Fact and edge emission
//!
//! The extractor writes through the [`FactSink`] trait so the same traversal
//! can feed a file, a buffer, or an in-memory [`FactGraph`](crate::graph::FactGraph).

use crate::Result;
use crate::schema::{EdgeKind, FactName};
use crate::vname::VName;
use serde::Serialize;
use std::io::Write;

/// Destination of emitted facts and edges.
///
/// Sinks do not validate anything; entries arrive in traversal order.
pub trait FactSink {
    /// Record `(source, name, value)`
    fn emit_fact(&mut self, source: &VName, name: FactName, value: &str) -> Result<()>;

    /// Record `(source, kind, target)`
    fn emit_edge(&mut self, source: &VName, kind: EdgeKind, target: &VName) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<S: FactSink + ?Sized> FactSink for &mut S {
    fn emit_fact(&mut self, source: &VName, name: FactName, value: &str) -> Result<()> {
        (**self).emit_fact(source, name, value)
    }

    fn emit_edge(&mut self, source: &VName, kind: EdgeKind, target: &VName) -> Result<()> {
        (**self).emit_edge(source, kind, target)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

#[derive(Serialize)]
struct FactRecord<'a> {
    source: &'a VName,
    fact_name: FactName,
    fact_value: &'a str,
}

#[derive(Serialize)]
struct EdgeRecord<'a> {
    source: &'a VName,
    edge_kind: EdgeKind,
    target: &'a VName,
    fact_name: &'static str,
}

/// Writes one Kythe entry per line as JSON.
///
/// ```text
/// {"source":{..},"fact_name":"/kythe/node/kind","fact_value":"record"}
/// {"source":{..},"edge_kind":"/kythe/edge/childof","target":{..},"fact_name":"/"}
/// ```
pub struct JsonLinesEmitter<W: Write> {
    writer: W,
    entries: usize,
}

impl<W: Write> JsonLinesEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, entries: 0 }
    }

    /// Number of entries written so far
    pub fn entries(&self) -> usize {
        self.entries
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_record<T: Serialize>(&mut self, record: &T) -> Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.entries += 1;
        Ok(())
    }
}

impl<W: Write> FactSink for JsonLinesEmitter<W> {
    fn emit_fact(&mut self, source: &VName, name: FactName, value: &str) -> Result<()> {
        self.write_record(&FactRecord {
            source,
            fact_name: name,
            fact_value: value,
        })
    }

    fn emit_edge(&mut self, source: &VName, kind: EdgeKind, target: &VName) -> Result<()> {
        self.write_record(&EdgeRecord {
            source,
            edge_kind: kind,
            target,
            fact_name: "/",
        })
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vname::{Signature, module_signature};

    fn sample_vname(signature: Signature) -> VName {
        VName::new(signature, "top.sv", "vxref", "", "verilog")
    }

    #[test]
    fn test_fact_line() {
        let mut emitter = JsonLinesEmitter::new(Vec::new());
        emitter
            .emit_fact(&sample_vname(module_signature("foo")), FactName::NodeKind, "record")
            .unwrap();
        assert_eq!(emitter.entries(), 1);

        let out = String::from_utf8(emitter.into_inner()).unwrap();
        assert_eq!(
            out,
            concat!(
                r#"{"source":{"signature":"foo#module","path":"top.sv","language":"verilog","root":"","corpus":"vxref"},"#,
                r#""fact_name":"/kythe/node/kind","fact_value":"record"}"#,
                "\n"
            )
        );
    }

    #[test]
    fn test_edge_line() {
        let mut emitter = JsonLinesEmitter::new(Vec::new());
        let anchor = sample_vname(Signature::Span { start: 7, end: 10 });
        let module = sample_vname(module_signature("foo"));
        emitter.emit_edge(&anchor, EdgeKind::DefinesBinding, &module).unwrap();

        let out = String::from_utf8(emitter.into_inner()).unwrap();
        let value: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
        assert_eq!(value["source"]["signature"], "@7:10");
        assert_eq!(value["edge_kind"], "/kythe/edge/defines/binding");
        assert_eq!(value["target"]["signature"], "foo#module");
        assert_eq!(value["fact_name"], "/");
    }

    #[test]
    fn test_fact_value_is_verbatim() {
        let mut emitter = JsonLinesEmitter::new(Vec::new());
        let text = "module foo(\"q\");\n\tendmodule";
        emitter
            .emit_fact(&sample_vname(Signature::file()), FactName::Text, text)
            .unwrap();

        let out = String::from_utf8(emitter.into_inner()).unwrap();
        let value: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
        assert_eq!(value["fact_value"], text);
    }

    #[test]
    fn test_write_through_mut_reference() {
        fn write_one<S: FactSink>(mut sink: S) {
            sink.emit_fact(&sample_vname(Signature::file()), FactName::NodeKind, "file")
                .unwrap();
            sink.flush().unwrap();
        }

        let mut emitter = JsonLinesEmitter::new(Vec::new());
        write_one(&mut emitter);
        assert_eq!(emitter.entries(), 1);
    }
}
