//! The fixed runtime stack: a growable buffer of 8-byte cells behind
//! `@stack`/`@stack_size`/`@stack_capacity`, and the twelve push/pop/peek
//! helpers monomorphized by operand kind (int, ref, quote, any) that
//! every lowering rule calls through rather than touching the buffer
//! directly.

use inkwell::builder::Builder;
use inkwell::context::Context;
use inkwell::module::Module;
use inkwell::types::{IntType, PointerType, StructType};
use inkwell::values::GlobalValue;
use inkwell::IntPredicate;

use falsec_util::Result;

use crate::context::{Externs, StackOps};
use crate::error::OrInternal;

#[allow(clippy::too_many_arguments)]
pub(crate) fn build_stack_ops<'ctx>(
    context: &'ctx Context,
    module: &Module<'ctx>,
    builder: &Builder<'ctx>,
    ptr_ty: PointerType<'ctx>,
    i32_ty: IntType<'ctx>,
    i64_ty: IntType<'ctx>,
    union_ty: StructType<'ctx>,
    stack: GlobalValue<'ctx>,
    stack_size: GlobalValue<'ctx>,
    stack_capacity: GlobalValue<'ctx>,
    externs: &Externs<'ctx>,
) -> Result<StackOps<'ctx>> {
    let void_ty = context.void_type();

    // `@stack_grow`: doubles the backing buffer once size reaches capacity.
    let grow = module.add_function("stack_grow", void_ty.fn_type(&[], false), None);
    {
        let entry = context.append_basic_block(grow, "entry");
        let grow_block = context.append_basic_block(grow, "grow");
        let done = context.append_basic_block(grow, "done");

        builder.position_at_end(entry);
        let size = builder.build_load(i64_ty, stack_size.as_pointer_value(), "size").or_internal("load size")?.into_int_value();
        let cap = builder.build_load(i64_ty, stack_capacity.as_pointer_value(), "cap").or_internal("load cap")?.into_int_value();
        let full = builder
            .build_int_compare(IntPredicate::EQ, size, cap, "full")
            .or_internal("compare")?;
        builder.build_conditional_branch(full, grow_block, done).or_internal("branch")?;

        builder.position_at_end(grow_block);
        let two = i64_ty.const_int(2, false);
        let new_cap = builder.build_int_mul(cap, two, "new_cap").or_internal("mul")?;
        let eight = i64_ty.const_int(8, false);
        let new_bytes = builder.build_int_mul(new_cap, eight, "new_bytes").or_internal("mul")?;
        let old = builder.build_load(ptr_ty, stack.as_pointer_value(), "old").or_internal("load old")?.into_pointer_value();
        let new_buf = builder
            .build_call(externs.realloc, &[old.into(), new_bytes.into()], "new_buf")
            .or_internal("call realloc")?
            .try_as_basic_value()
            .left()
            .expect("realloc returns a value");
        builder.build_store(stack.as_pointer_value(), new_buf).or_internal("store buf")?;
        builder.build_store(stack_capacity.as_pointer_value(), new_cap).or_internal("store cap")?;
        builder.build_unconditional_branch(done).or_internal("branch")?;

        builder.position_at_end(done);
        builder.build_return(None).or_internal("return")?;
    }

    let push_int = build_push(context, module, builder, "push_int", i32_ty.into(), union_ty, ptr_ty, i64_ty, stack, stack_size, grow)?;
    let push_ref = build_push(context, module, builder, "push_ref", ptr_ty.into(), union_ty, ptr_ty, i64_ty, stack, stack_size, grow)?;
    let push_quote = build_push(context, module, builder, "push_quote", ptr_ty.into(), union_ty, ptr_ty, i64_ty, stack, stack_size, grow)?;
    let push_any = build_push(context, module, builder, "push_any", union_ty.into(), union_ty, ptr_ty, i64_ty, stack, stack_size, grow)?;

    let pop_int = build_pop(context, module, builder, "pop_int", i32_ty.into(), union_ty, ptr_ty, i64_ty, stack, stack_size)?;
    let pop_ref = build_pop(context, module, builder, "pop_ref", ptr_ty.into(), union_ty, ptr_ty, i64_ty, stack, stack_size)?;
    let pop_quote = build_pop(context, module, builder, "pop_quote", ptr_ty.into(), union_ty, ptr_ty, i64_ty, stack, stack_size)?;
    let pop_any = build_pop(context, module, builder, "pop_any", union_ty.into(), union_ty, ptr_ty, i64_ty, stack, stack_size)?;

    // peek_int/peek_ref/peek_quote are emitted for the fixed module
    // contract but never called back into from this crate.
    build_peek(context, module, builder, "peek_int", i32_ty.into(), union_ty, ptr_ty, i64_ty, stack, stack_size)?;
    build_peek(context, module, builder, "peek_ref", ptr_ty.into(), union_ty, ptr_ty, i64_ty, stack, stack_size)?;
    build_peek(context, module, builder, "peek_quote", ptr_ty.into(), union_ty, ptr_ty, i64_ty, stack, stack_size)?;
    let peek_any = build_peek(context, module, builder, "peek_any", union_ty.into(), union_ty, ptr_ty, i64_ty, stack, stack_size)?;

    // `@stack_init`: allocates the initial 16-cell buffer.
    let init = module.add_function("stack_init", void_ty.fn_type(&[], false), None);
    {
        let entry = context.append_basic_block(init, "entry");
        builder.position_at_end(entry);
        let initial_capacity = i64_ty.const_int(16, false);
        let bytes = i64_ty.const_int(16 * 8, false);
        let buf = builder
            .build_call(externs.malloc, &[bytes.into()], "buf")
            .or_internal("call malloc")?
            .try_as_basic_value()
            .left()
            .expect("malloc returns a value");
        builder.build_store(stack.as_pointer_value(), buf).or_internal("store buf")?;
        builder.build_store(stack_capacity.as_pointer_value(), initial_capacity).or_internal("store cap")?;
        builder.build_store(stack_size.as_pointer_value(), i64_ty.const_zero()).or_internal("store size")?;
        builder.build_return(None).or_internal("return")?;
    }

    // `@stack_free`: releases the buffer. Size/capacity are left as-is;
    // the process exits immediately after, so there is nothing to reset.
    let free_stack = module.add_function("stack_free", void_ty.fn_type(&[], false), None);
    {
        let entry = context.append_basic_block(free_stack, "entry");
        builder.position_at_end(entry);
        let buf = builder.build_load(ptr_ty, stack.as_pointer_value(), "buf").or_internal("load buf")?.into_pointer_value();
        builder.build_call(externs.free, &[buf.into()], "").or_internal("call free")?;
        builder.build_return(None).or_internal("return")?;
    }

    Ok(StackOps {
        push_int,
        push_ref,
        push_quote,
        push_any,
        pop_int,
        pop_ref,
        pop_quote,
        pop_any,
        peek_any,
        init,
        free_stack,
    })
}

/// Computes the pointer to the top-of-stack-relative slot at `index`
/// (an i64 cell count) within the buffer's current layout.
fn slot_ptr<'ctx>(
    builder: &Builder<'ctx>,
    union_ty: StructType<'ctx>,
    ptr_ty: PointerType<'ctx>,
    stack: GlobalValue<'ctx>,
    index: inkwell::values::IntValue<'ctx>,
) -> Result<inkwell::values::PointerValue<'ctx>> {
    let base = builder.build_load(ptr_ty, stack.as_pointer_value(), "base").or_internal("load base")?.into_pointer_value();
    let slot = unsafe {
        builder
            .build_gep(union_ty, base, &[index], "slot")
            .or_internal("gep")?
    };
    Ok(slot)
}

#[allow(clippy::too_many_arguments)]
fn build_push<'ctx>(
    context: &'ctx Context,
    module: &Module<'ctx>,
    builder: &Builder<'ctx>,
    name: &str,
    param_ty: inkwell::types::BasicTypeEnum<'ctx>,
    union_ty: StructType<'ctx>,
    ptr_ty: PointerType<'ctx>,
    i64_ty: IntType<'ctx>,
    stack: GlobalValue<'ctx>,
    stack_size: GlobalValue<'ctx>,
    grow: inkwell::values::FunctionValue<'ctx>,
) -> Result<inkwell::values::FunctionValue<'ctx>> {
    let fn_ty = context.void_type().fn_type(&[param_ty.into()], false);
    let function = module.add_function(name, fn_ty, None);
    let entry = context.append_basic_block(function, "entry");
    builder.position_at_end(entry);

    builder.build_call(grow, &[], "").or_internal("call grow")?;
    let size = builder.build_load(i64_ty, stack_size.as_pointer_value(), "size").or_internal("load size")?.into_int_value();
    let slot = slot_ptr(builder, union_ty, ptr_ty, stack, size)?;
    let value = function.get_nth_param(0).expect("push takes one operand");
    builder.build_store(slot, value).or_internal("store value")?;
    let new_size = builder.build_int_add(size, i64_ty.const_int(1, false), "new_size").or_internal("add")?;
    builder.build_store(stack_size.as_pointer_value(), new_size).or_internal("store size")?;
    builder.build_return(None).or_internal("return")?;

    Ok(function)
}

#[allow(clippy::too_many_arguments)]
fn build_pop<'ctx>(
    context: &'ctx Context,
    module: &Module<'ctx>,
    builder: &Builder<'ctx>,
    name: &str,
    ret_ty: inkwell::types::BasicTypeEnum<'ctx>,
    union_ty: StructType<'ctx>,
    ptr_ty: PointerType<'ctx>,
    i64_ty: IntType<'ctx>,
    stack: GlobalValue<'ctx>,
    stack_size: GlobalValue<'ctx>,
) -> Result<inkwell::values::FunctionValue<'ctx>> {
    let fn_ty = ret_ty.fn_type(&[], false);
    let function = module.add_function(name, fn_ty, None);
    let entry = context.append_basic_block(function, "entry");
    builder.position_at_end(entry);

    let size = builder.build_load(i64_ty, stack_size.as_pointer_value(), "size").or_internal("load size")?.into_int_value();
    let new_size = builder.build_int_sub(size, i64_ty.const_int(1, false), "new_size").or_internal("sub")?;
    builder.build_store(stack_size.as_pointer_value(), new_size).or_internal("store size")?;
    let slot = slot_ptr(builder, union_ty, ptr_ty, stack, new_size)?;
    let value = builder.build_load(ret_ty, slot, "value").or_internal("load value")?;
    builder.build_return(Some(&value)).or_internal("return")?;

    Ok(function)
}

#[allow(clippy::too_many_arguments)]
fn build_peek<'ctx>(
    context: &'ctx Context,
    module: &Module<'ctx>,
    builder: &Builder<'ctx>,
    name: &str,
    ret_ty: inkwell::types::BasicTypeEnum<'ctx>,
    union_ty: StructType<'ctx>,
    ptr_ty: PointerType<'ctx>,
    i64_ty: IntType<'ctx>,
    stack: GlobalValue<'ctx>,
    stack_size: GlobalValue<'ctx>,
) -> Result<inkwell::values::FunctionValue<'ctx>> {
    let fn_ty = ret_ty.fn_type(&[i64_ty.into()], false);
    let function = module.add_function(name, fn_ty, None);
    let entry = context.append_basic_block(function, "entry");
    builder.position_at_end(entry);

    let depth = function.get_nth_param(0).expect("peek takes a depth").into_int_value();
    let size = builder.build_load(i64_ty, stack_size.as_pointer_value(), "size").or_internal("load size")?.into_int_value();
    let offset = builder.build_int_sub(size, depth, "offset").or_internal("sub")?;
    let index = builder.build_int_sub(offset, i64_ty.const_int(1, false), "index").or_internal("sub")?;
    let slot = slot_ptr(builder, union_ty, ptr_ty, stack, index)?;
    let value = builder.build_load(ret_ty, slot, "value").or_internal("load value")?;
    builder.build_return(Some(&value)).or_internal("return")?;

    Ok(function)
}
