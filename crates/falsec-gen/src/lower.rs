//! Per-AST-kind lowering rules: the stack-machine instructions each
//! node expands to, built directly through inkwell's typed builder
//! rather than templated as text.

use falsec_par::AstNode;
use falsec_util::Result;
use inkwell::values::{BasicValueEnum, FunctionValue, IntValue, PointerValue};
use inkwell::IntPredicate;

use crate::context::CodeGenerator;
use crate::error::OrInternal;

impl<'ctx> CodeGenerator<'ctx> {
    pub(crate) fn lower_statements(&mut self, function: FunctionValue<'ctx>, nodes: &[AstNode]) -> Result<()> {
        for node in nodes {
            self.lower_node(function, node)?;
        }
        Ok(())
    }

    fn lower_node(&mut self, function: FunctionValue<'ctx>, node: &AstNode) -> Result<()> {
        match node {
            AstNode::Variable(name) => {
                let global = self.vars[(*name - b'a') as usize];
                self.push_ref(global.as_pointer_value())
            }
            AstNode::Integer(value) => {
                let v = self.i32_ty.const_int(*value as i64 as u64, true);
                self.push_int(v)
            }
            AstNode::String(text) => {
                let global = self.intern_string(text)?;
                let str_ptr = global.as_pointer_value();
                let fmt_ptr = self.fmt_str.as_pointer_value();
                self.call_void(self.externs.printf, &[fmt_ptr.into(), str_ptr.into()])
            }
            AstNode::Quote(body) => {
                let lambda = self.hoist_quote(body)?;
                let fn_ptr = lambda.as_global_value().as_pointer_value();
                self.push_quote(fn_ptr)
            }

            AstNode::GetVar => {
                let r = self.pop_ref()?;
                let loaded = self.builder.build_load(self.union_ty, r, "loaded").or_internal("load var")?;
                self.push_any(loaded)
            }
            AstNode::SetVar => {
                let r = self.pop_ref()?;
                let v = self.pop_any()?;
                self.builder.build_store(r, v).or_internal("store var")?;
                Ok(())
            }
            AstNode::Dup => {
                let v = self.peek_any(self.i64_ty.const_zero())?;
                self.push_any(v)
            }
            AstNode::Discard => {
                self.pop_any()?;
                Ok(())
            }
            AstNode::Swap => {
                let a = self.pop_any()?;
                let b = self.pop_any()?;
                self.push_any(a)?;
                self.push_any(b)
            }
            AstNode::Rotate => {
                let a = self.pop_any()?;
                let b = self.pop_any()?;
                let c = self.pop_any()?;
                self.push_any(b)?;
                self.push_any(a)?;
                self.push_any(c)
            }
            AstNode::Take => {
                let depth32 = self.pop_int()?;
                let depth64 = self
                    .builder
                    .build_int_s_extend(depth32, self.i64_ty, "depth")
                    .or_internal("sext")?;
                let v = self.peek_any(depth64)?;
                self.push_any(v)
            }

            AstNode::Plus => self.binary_int(|b, a, v, n| b.build_int_add(a, v, n)),
            AstNode::Minus => self.binary_int(|b, a, v, n| b.build_int_sub(a, v, n)),
            AstNode::Mul => self.binary_int(|b, a, v, n| b.build_int_mul(a, v, n)),
            AstNode::Div => self.binary_int(|b, a, v, n| b.build_int_signed_div(a, v, n)),
            AstNode::BitAnd => self.binary_int(|b, a, v, n| b.build_and(a, v, n)),
            AstNode::BitOr => self.binary_int(|b, a, v, n| b.build_or(a, v, n)),

            AstNode::Negate => {
                let a = self.pop_int()?;
                let zero = self.i32_ty.const_zero();
                let result = self.builder.build_int_sub(zero, a, "neg").or_internal("sub")?;
                self.push_int(result)
            }
            AstNode::BitInvert => {
                let a = self.pop_int()?;
                let all_ones = self.i32_ty.const_all_ones();
                let result = self.builder.build_xor(a, all_ones, "not").or_internal("xor")?;
                self.push_int(result)
            }
            AstNode::Equal => self.compare(IntPredicate::EQ),
            AstNode::GreaterThan => self.compare(IntPredicate::SGT),

            AstNode::Execute => {
                let quote = self.pop_quote()?;
                self.call_quote(quote)
            }
            AstNode::ExecuteIf => self.lower_execute_if(function),
            AstNode::While => self.lower_while(function),

            AstNode::Getc => {
                let v = self.call_value(self.externs.getchar, &[], "c")?.into_int_value();
                self.push_int(v)
            }
            AstNode::Putc => {
                let v = self.pop_int()?;
                self.call_void(self.externs.putchar, &[v.into()])
            }
            AstNode::PrintInt => {
                let v = self.pop_int()?;
                let num_ptr = self.num_str.as_pointer_value();
                self.call_void(self.externs.printf, &[num_ptr.into(), v.into()])
            }
        }
    }

    fn lower_execute_if(&mut self, function: FunctionValue<'ctx>) -> Result<()> {
        let quote = self.pop_quote()?;
        let cond = self.pop_int()?;
        let is_true = self
            .builder
            .build_int_compare(IntPredicate::NE, cond, self.i32_ty.const_zero(), "cond")
            .or_internal("compare")?;

        let then_block = self.context.append_basic_block(function, &self.next_label());
        let cont_block = self.context.append_basic_block(function, &self.next_label());

        self.builder.build_conditional_branch(is_true, then_block, cont_block).or_internal("branch")?;

        self.builder.position_at_end(then_block);
        self.call_quote(quote)?;
        self.builder.build_unconditional_branch(cont_block).or_internal("branch")?;

        self.builder.position_at_end(cont_block);
        Ok(())
    }

    fn lower_while(&mut self, function: FunctionValue<'ctx>) -> Result<()> {
        let body_quote = self.pop_quote()?;
        let cond_quote = self.pop_quote()?;

        let cond_block = self.context.append_basic_block(function, &self.next_label());
        let body_block = self.context.append_basic_block(function, &self.next_label());
        let end_block = self.context.append_basic_block(function, &self.next_label());

        self.builder.build_unconditional_branch(cond_block).or_internal("branch")?;

        self.builder.position_at_end(cond_block);
        self.call_quote(cond_quote)?;
        let cond_val = self.pop_int()?;
        let keep_going = self
            .builder
            .build_int_compare(IntPredicate::NE, cond_val, self.i32_ty.const_zero(), "keep_going")
            .or_internal("compare")?;
        self.builder.build_conditional_branch(keep_going, body_block, end_block).or_internal("branch")?;

        self.builder.position_at_end(body_block);
        self.call_quote(body_quote)?;
        self.builder.build_unconditional_branch(cond_block).or_internal("branch")?;

        self.builder.position_at_end(end_block);
        Ok(())
    }

    fn compare(&mut self, predicate: IntPredicate) -> Result<()> {
        let b = self.pop_int()?;
        let a = self.pop_int()?;
        let cmp = self.builder.build_int_compare(predicate, a, b, "cmp").or_internal("compare")?;
        let extended = self
            .builder
            .build_int_s_extend(cmp, self.i32_ty, "as_false_bool")
            .or_internal("sext")?;
        self.push_int(extended)
    }

    fn binary_int(
        &mut self,
        op: impl FnOnce(&inkwell::builder::Builder<'ctx>, IntValue<'ctx>, IntValue<'ctx>, &str) -> std::result::Result<IntValue<'ctx>, inkwell::builder::BuilderError>,
    ) -> Result<()> {
        let b = self.pop_int()?;
        let a = self.pop_int()?;
        let result = op(&self.builder, a, b, "result").or_internal("binary op")?;
        self.push_int(result)
    }

    fn next_label(&mut self) -> String {
        let label = format!("label_{}", self.label_counter);
        self.label_counter += 1;
        label
    }

    fn call_quote(&self, quote: PointerValue<'ctx>) -> Result<()> {
        let fn_ty = self.context.void_type().fn_type(&[], false);
        self.builder
            .build_indirect_call(fn_ty, quote, &[], "")
            .or_internal("indirect call")?;
        Ok(())
    }

    fn call_void(&self, f: FunctionValue<'ctx>, args: &[inkwell::values::BasicMetadataValueEnum<'ctx>]) -> Result<()> {
        self.builder.build_call(f, args, "").or_internal("call")?;
        Ok(())
    }

    fn call_value(&self, f: FunctionValue<'ctx>, args: &[inkwell::values::BasicMetadataValueEnum<'ctx>], name: &str) -> Result<BasicValueEnum<'ctx>> {
        let call = self.builder.build_call(f, args, name).or_internal("call")?;
        Ok(call.try_as_basic_value().left().expect("callee returns a value"))
    }

    fn push_int(&self, v: IntValue<'ctx>) -> Result<()> {
        self.call_void(self.ops.push_int, &[v.into()])
    }
    fn push_ref(&self, v: PointerValue<'ctx>) -> Result<()> {
        self.call_void(self.ops.push_ref, &[v.into()])
    }
    fn push_quote(&self, v: PointerValue<'ctx>) -> Result<()> {
        self.call_void(self.ops.push_quote, &[v.into()])
    }
    fn push_any(&self, v: BasicValueEnum<'ctx>) -> Result<()> {
        self.call_void(self.ops.push_any, &[v.into()])
    }
    fn pop_int(&self) -> Result<IntValue<'ctx>> {
        Ok(self.call_value(self.ops.pop_int, &[], "v")?.into_int_value())
    }
    fn pop_ref(&self) -> Result<PointerValue<'ctx>> {
        Ok(self.call_value(self.ops.pop_ref, &[], "v")?.into_pointer_value())
    }
    fn pop_quote(&self) -> Result<PointerValue<'ctx>> {
        Ok(self.call_value(self.ops.pop_quote, &[], "v")?.into_pointer_value())
    }
    fn pop_any(&self) -> Result<BasicValueEnum<'ctx>> {
        self.call_value(self.ops.pop_any, &[], "v")
    }
    fn peek_any(&self, depth: IntValue<'ctx>) -> Result<BasicValueEnum<'ctx>> {
        self.call_value(self.ops.peek_any, &[depth.into()], "v")
    }
}
