//! Lowers a FALSE AST ([`falsec_par::AstNode`]) to a complete LLVM
//! textual IR module: the fixed runtime-stack prologue, one hoisted
//! function per distinct quotation, interned string constants, and a
//! `main` that brackets the top-level statement sequence between
//! `stack_init`/`stack_free`.
//!
//! The module is built through inkwell's typed `Builder`/`Module` API
//! and serialized with [`inkwell::module::Module::print_to_string`]
//! rather than templated as text — see `DESIGN.md` for why.

mod context;
mod error;
mod lambda;
mod lower;
mod prologue;
mod strings;

use falsec_par::AstNode;
use falsec_util::Result;
use inkwell::context::Context;

use context::CodeGenerator;
use error::OrInternal;

/// Compiles a parsed FALSE program to LLVM textual IR.
pub fn compile(ast: &[AstNode]) -> Result<String> {
    let context = Context::create();
    let mut gen = CodeGenerator::new(&context, "false_module")?;

    let main_ty = gen.i32_ty.fn_type(&[], false);
    let main_fn = gen.module.add_function("main", main_ty, None);

    let entry = context.append_basic_block(main_fn, "entry");
    gen.builder.position_at_end(entry);

    gen.builder.build_call(gen.ops.init, &[], "").or_internal("call stack_init")?;
    gen.lower_statements(main_fn, ast)?;
    gen.builder.build_call(gen.ops.free_stack, &[], "").or_internal("call stack_free")?;

    let zero = gen.i32_ty.const_zero();
    gen.builder.build_return(Some(&zero)).or_internal("return main")?;

    Ok(gen.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use falsec_par::Parser;

    fn compile_source(source: &str) -> String {
        let ast = Parser::new(source).unwrap().parse_program().unwrap();
        compile(&ast).unwrap()
    }

    #[test]
    fn prologue_declares_the_fixed_runtime_surface() {
        let ir = compile_source("");
        assert!(ir.contains("%union.FalseValue = type { [8 x i8] }"));
        assert!(ir.contains("@stack"));
        assert!(ir.contains("@var_a"));
        assert!(ir.contains("@var_z"));
        assert!(ir.contains("declare"));
        assert!(ir.contains("define i32 @main()"));
    }

    #[test]
    fn identical_quotes_share_one_lambda() {
        let ir = compile_source("[ 1 . ] ! [ 1 . ] !");
        let lambda_defs = ir.matches("define void @lambda_").count();
        assert_eq!(lambda_defs, 1, "two structurally identical quotes must share one @lambda_*");
    }

    #[test]
    fn quotes_differing_in_second_child_are_not_shared() {
        let ir = compile_source("[ 1 . ] [ 2 . ] ! !");
        let lambda_defs = ir.matches("define void @lambda_").count();
        assert_eq!(lambda_defs, 2, "quotes with different bodies must not be deduplicated");
    }

    #[test]
    fn identical_string_literals_share_one_constant() {
        let ir = compile_source("\"hi\" \"hi\"");
        let str_defs = ir.matches("@str_").count();
        // each @str_K appears once in its definition and once per use site
        assert_eq!(ir.matches("str_0").count(), 3);
        assert!(str_defs >= 1);
    }

    #[test]
    fn distinct_string_literals_get_distinct_constants() {
        let ir = compile_source("\"hi\" \"bye\"");
        assert!(ir.contains("@str_0"));
        assert!(ir.contains("@str_1"));
    }
}
