//! Generator state: the LLVM handles, the fixed runtime-support
//! functions built once by the prologue, and the per-compilation
//! bookkeeping (hoisted lambdas, interned strings, name counters)
//! described as "Generator state" in the data model this crate lowers
//! against.

use inkwell::builder::Builder;
use inkwell::context::Context;
use inkwell::module::Module;
use inkwell::types::{IntType, PointerType, StructType};
use inkwell::values::{FunctionValue, GlobalValue};
use inkwell::AddressSpace;

use falsec_par::AstNode;
use falsec_util::Result;

/// The fixed external ABI the emitted module links against.
pub(crate) struct Externs<'ctx> {
    pub malloc: FunctionValue<'ctx>,
    pub realloc: FunctionValue<'ctx>,
    pub free: FunctionValue<'ctx>,
    pub getchar: FunctionValue<'ctx>,
    pub putchar: FunctionValue<'ctx>,
    pub printf: FunctionValue<'ctx>,
}

/// The handles lowering actually calls through. `peek_int`/`peek_ref`/
/// `peek_quote` and the growth helper are built by `prologue` like the
/// rest (the module contract requires all twelve push/pop/peek
/// helpers), but nothing outside `prologue` ever calls them back, so
/// only the ones `lower.rs` uses are kept here.
pub(crate) struct StackOps<'ctx> {
    pub push_int: FunctionValue<'ctx>,
    pub push_ref: FunctionValue<'ctx>,
    pub push_quote: FunctionValue<'ctx>,
    pub push_any: FunctionValue<'ctx>,
    pub pop_int: FunctionValue<'ctx>,
    pub pop_ref: FunctionValue<'ctx>,
    pub pop_quote: FunctionValue<'ctx>,
    pub pop_any: FunctionValue<'ctx>,
    pub peek_any: FunctionValue<'ctx>,
    pub init: FunctionValue<'ctx>,
    pub free_stack: FunctionValue<'ctx>,
}

/// A hoisted quotation: the body it was lowered from (kept around so
/// later quotes can be compared against it for dedup) and the function
/// it was lowered into.
pub(crate) struct Lambda<'ctx> {
    pub body: Vec<AstNode>,
    pub function: FunctionValue<'ctx>,
}

pub struct CodeGenerator<'ctx> {
    pub(crate) context: &'ctx Context,
    pub(crate) module: Module<'ctx>,
    pub(crate) builder: Builder<'ctx>,

    pub(crate) union_ty: StructType<'ctx>,
    pub(crate) ptr_ty: PointerType<'ctx>,
    pub(crate) i32_ty: IntType<'ctx>,
    pub(crate) i64_ty: IntType<'ctx>,

    pub(crate) stack: GlobalValue<'ctx>,
    pub(crate) stack_size: GlobalValue<'ctx>,
    pub(crate) stack_capacity: GlobalValue<'ctx>,
    pub(crate) vars: [GlobalValue<'ctx>; 26],

    pub(crate) externs: Externs<'ctx>,
    pub(crate) ops: StackOps<'ctx>,

    pub(crate) fmt_str: GlobalValue<'ctx>,
    pub(crate) num_str: GlobalValue<'ctx>,

    pub(crate) lambdas: Vec<Lambda<'ctx>>,
    pub(crate) strings: Vec<(Vec<u8>, GlobalValue<'ctx>)>,
    pub(crate) lambda_counter: u32,
    pub(crate) str_counter: u32,
    pub(crate) label_counter: u32,
}

impl<'ctx> CodeGenerator<'ctx> {
    pub fn new(context: &'ctx Context, module_name: &str) -> Result<Self> {
        let module = context.create_module(module_name);
        let builder = context.create_builder();

        let ptr_ty = context.ptr_type(AddressSpace::default());
        let i32_ty = context.i32_type();
        let i64_ty = context.i64_type();

        let union_ty = context.opaque_struct_type("union.FalseValue");
        union_ty.set_body(&[context.i8_type().array_type(8).into()], false);

        let stack = Self::declare_global_ptr(&module, ptr_ty, "stack");
        let stack_size = Self::declare_global_i64(&module, i64_ty, "stack_size");
        let stack_capacity = Self::declare_global_i64(&module, i64_ty, "stack_capacity");

        let mut vars = Vec::with_capacity(26);
        for letter in b'a'..=b'z' {
            let name = format!("var_{}", letter as char);
            let global = module.add_global(union_ty, Some(AddressSpace::default()), &name);
            global.set_initializer(&union_ty.const_zero());
            vars.push(global);
        }
        let vars: [GlobalValue<'ctx>; 26] = vars.try_into().unwrap_or_else(|_| unreachable!());

        let externs = Self::declare_externs(context, &module, ptr_ty, i32_ty, i64_ty);

        let fmt_str = Self::declare_format_string(&module, context, "fmt", b"%s");
        let num_str = Self::declare_format_string(&module, context, "num", b"%d");

        let ops = crate::prologue::build_stack_ops(
            context, &module, &builder, ptr_ty, i32_ty, i64_ty, union_ty, stack, stack_size,
            stack_capacity, &externs,
        )?;

        Ok(Self {
            context,
            module,
            builder,
            union_ty,
            ptr_ty,
            i32_ty,
            i64_ty,
            stack,
            stack_size,
            stack_capacity,
            vars,
            externs,
            ops,
            fmt_str,
            num_str,
            lambdas: Vec::new(),
            strings: Vec::new(),
            lambda_counter: 0,
            str_counter: 0,
            label_counter: 0,
        })
    }

    fn declare_global_ptr(module: &Module<'ctx>, ptr_ty: PointerType<'ctx>, name: &str) -> GlobalValue<'ctx> {
        let global = module.add_global(ptr_ty, Some(AddressSpace::default()), name);
        global.set_initializer(&ptr_ty.const_null());
        global
    }

    fn declare_global_i64(module: &Module<'ctx>, i64_ty: IntType<'ctx>, name: &str) -> GlobalValue<'ctx> {
        let global = module.add_global(i64_ty, Some(AddressSpace::default()), name);
        global.set_initializer(&i64_ty.const_zero());
        global
    }

    fn declare_externs(
        context: &'ctx Context,
        module: &Module<'ctx>,
        ptr_ty: PointerType<'ctx>,
        i32_ty: IntType<'ctx>,
        i64_ty: IntType<'ctx>,
    ) -> Externs<'ctx> {
        use inkwell::module::Linkage;

        let malloc = module.add_function(
            "malloc",
            ptr_ty.fn_type(&[i64_ty.into()], false),
            Some(Linkage::External),
        );
        let realloc = module.add_function(
            "realloc",
            ptr_ty.fn_type(&[ptr_ty.into(), i64_ty.into()], false),
            Some(Linkage::External),
        );
        let free = module.add_function(
            "free",
            context.void_type().fn_type(&[ptr_ty.into()], false),
            Some(Linkage::External),
        );
        let getchar = module.add_function("getchar", i32_ty.fn_type(&[], false), Some(Linkage::External));
        let putchar = module.add_function(
            "putchar",
            i32_ty.fn_type(&[i32_ty.into()], false),
            Some(Linkage::External),
        );
        let printf = module.add_function(
            "printf",
            i32_ty.fn_type(&[ptr_ty.into()], true),
            Some(Linkage::External),
        );

        Externs { malloc, realloc, free, getchar, putchar, printf }
    }

    /// Builds one of the two fixed-content format constants (`@.fmt`, `@.num`).
    fn declare_format_string(
        module: &Module<'ctx>,
        context: &'ctx Context,
        label: &str,
        text: &[u8],
    ) -> GlobalValue<'ctx> {
        let constant = context.const_string(text, true);
        let global = module.add_global(constant.get_type(), None, &format!(".{label}"));
        global.set_initializer(&constant);
        global.set_constant(true);
        global.set_linkage(inkwell::module::Linkage::Private);
        global.set_unnamed_addr(true);
        global
    }

    /// Serializes the completed module to LLVM textual IR.
    pub fn finish(self) -> String {
        self.module.print_to_string().to_string()
    }
}
