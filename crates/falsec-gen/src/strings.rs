//! Constant-string interning: each distinct literal byte sequence is
//! assigned one `@str_K` global; duplicates reuse it (§ string-intern
//! soundness — same symbol iff byte-identical).

use inkwell::module::Linkage;
use inkwell::values::GlobalValue;
use inkwell::AddressSpace;

use falsec_util::Result;

use crate::context::CodeGenerator;

impl<'ctx> CodeGenerator<'ctx> {
    pub(crate) fn intern_string(&mut self, bytes: &[u8]) -> Result<GlobalValue<'ctx>> {
        if let Some((_, global)) = self.strings.iter().find(|(existing, _)| existing == bytes) {
            return Ok(*global);
        }

        let name = format!("str_{}", self.str_counter);
        self.str_counter += 1;

        let constant = self.context.const_string(bytes, true);
        let global = self.module.add_global(constant.get_type(), Some(AddressSpace::default()), &name);
        global.set_initializer(&constant);
        global.set_constant(true);
        global.set_linkage(Linkage::Private);
        global.set_unnamed_addr(true);

        self.strings.push((bytes.to_vec(), global));
        Ok(global)
    }
}
