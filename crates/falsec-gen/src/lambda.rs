//! Quotation hoisting and structural deduplication.
//!
//! A `Quote` body is compared, full child sequence and all, against
//! every previously hoisted body; a match reuses that `@lambda_K`
//! rather than emitting a duplicate definition. `AstNode`'s derived
//! `PartialEq` already recurses into every child of every nested
//! `Quote`, so there is no shortcut-after-the-first-child bug to
//! reproduce here — the bug the reference implementation had is simply
//! not expressible with a derived equality.

use falsec_par::AstNode;
use falsec_util::Result;
use inkwell::values::FunctionValue;

use crate::context::{CodeGenerator, Lambda};
use crate::error::OrInternal;

impl<'ctx> CodeGenerator<'ctx> {
    pub(crate) fn hoist_quote(&mut self, body: &[AstNode]) -> Result<FunctionValue<'ctx>> {
        if let Some(existing) = self.lambdas.iter().find(|l| l.body.as_slice() == body) {
            return Ok(existing.function);
        }

        let name = format!("lambda_{}", self.lambda_counter);
        self.lambda_counter += 1;

        let fn_ty = self.context.void_type().fn_type(&[], false);
        let function = self.module.add_function(&name, fn_ty, None);
        self.lambdas.push(Lambda { body: body.to_vec(), function });

        let saved_block = self.builder.get_insert_block();
        let saved_labels = self.label_counter;
        self.label_counter = 0;

        let entry = self.context.append_basic_block(function, "entry");
        self.builder.position_at_end(entry);
        self.lower_statements(function, body)?;
        self.builder.build_return(None).or_internal("return")?;

        self.label_counter = saved_labels;
        if let Some(block) = saved_block {
            self.builder.position_at_end(block);
        }

        Ok(function)
    }
}
