//! Output Parser: convierte un `ExecutionResult` exitoso en `ParsedValue`.
use ada_domain::{ParsedValue, ValueKind};

use crate::command::{CommandBuilder, CommandSpec};
use crate::config::OperationContext;
use crate::errors::{AdaError, AdaResult};
use crate::exec::{classify_failure, ExecutionResult};
use crate::parse::decode::decode;
use crate::parse::extract::{extract, key_material};
use crate::parse::shapes::ShapeTable;

#[derive(Debug, Clone, Default)]
pub struct OutputParser {
    table: ShapeTable,
}

impl OutputParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(table: ShapeTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &ShapeTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut ShapeTable {
        &mut self.table
    }

    /// Un resultado no-cero nunca llega a los extractores: se devuelve el
    /// error clasificado con su stderr.
    pub fn parse(&self, spec: &CommandSpec, ctx: &OperationContext, result: &ExecutionResult) -> AdaResult<ParsedValue> {
        if !result.success() {
            return Err(classify_failure(spec, ctx, result));
        }
        let op = spec.operation();
        let desc = op.descriptor();
        let raw = result.stdout_text();
        let unparseable = |reason: String| AdaError::UnparseableOutput { operation: op.name().to_string(),
                                                                         command: spec.command_line(),
                                                                         raw: raw.to_string(),
                                                                         reason };

        if desc.output == ValueKind::KeyMaterial {
            let (_, params) = CommandBuilder::decode(spec.tokens(), ctx)?;
            return key_material(op, &params, ctx).map(ParsedValue::KeyMaterial).map_err(unparseable);
        }

        let stamp = spec.stamp();
        let shapes = self.table.shapes_for(op, stamp.era, stamp.legacy);
        if shapes.is_empty() {
            return Err(unparseable(format!("no known output shape for {} in era {}", op.name(), stamp.era)));
        }
        let mut reasons = Vec::with_capacity(shapes.len());
        for shape in shapes {
            match decode(shape, &raw).and_then(|d| extract(desc.output, d)) {
                Ok(value) => {
                    log::trace!("{} parsed as {:?}", op.name(), shape);
                    return Ok(value);
                }
                Err(reason) => reasons.push(format!("{shape:?}: {reason}")),
            }
        }
        Err(unparseable(reasons.join("; ")))
    }
}
