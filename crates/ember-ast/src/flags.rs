//! Tag-scoped flag bits. Unlike `AstTag`, `AstFlag` bit values are reused
//! across unrelated tags (e.g. bit `0x01` means `Definition_IsPub` on a
//! `Definition` node but `If_HasWhere` on an `If` node) — the donor groups
//! them in a single enum for that reason, and this module mirrors that by
//! namespacing each tag's bits in its own submodule of plain `u8` consts.

pub mod definition {
    pub const IS_PUB: u8 = 0x01;
    pub const IS_MUT: u8 = 0x02;
    pub const IS_AUTO: u8 = 0x04;
    pub const HAS_TYPE: u8 = 0x08;
    pub const IS_GLOBAL: u8 = 0x10;
}

pub mod parameter {
    pub const IS_EVAL: u8 = 0x01;
    pub const IS_MUT: u8 = 0x02;
    pub const IS_AUTO: u8 = 0x04;
    pub const HAS_TYPE: u8 = 0x08;
}

pub mod if_ {
    pub const HAS_WHERE: u8 = 0x01;
    pub const HAS_ELSE: u8 = 0x02;
}

pub mod for_ {
    pub const HAS_WHERE: u8 = 0x01;
    pub const HAS_CONDITION: u8 = 0x02;
    pub const HAS_STEP: u8 = 0x04;
    pub const HAS_FINALLY: u8 = 0x08;
}

pub mod for_each {
    pub const HAS_WHERE: u8 = 0x01;
    pub const HAS_INDEX: u8 = 0x02;
    pub const HAS_FINALLY: u8 = 0x04;
}

pub mod switch {
    pub const HAS_WHERE: u8 = 0x20;
}

pub mod signature {
    pub const HAS_EXPECTS: u8 = 0x01;
    pub const HAS_ENSURES: u8 = 0x02;
    pub const IS_PROC: u8 = 0x04;
    pub const HAS_RETURN_TYPE: u8 = 0x08;
}

pub mod trait_ {
    pub const HAS_EXPECTS: u8 = 0x01;
}

pub mod impl_ {
    pub const HAS_EXPECTS: u8 = 0x01;
}

pub mod catch {
    pub const HAS_DEFINITION: u8 = 0x01;
}

pub mod op_slice_of {
    pub const HAS_BEGIN: u8 = 0x01;
    pub const HAS_END: u8 = 0x02;
}

pub mod type_ {
    pub const IS_MUT: u8 = 0x02;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_values_are_reused_across_unrelated_tags() {
        assert_eq!(definition::IS_PUB, if_::HAS_WHERE);
        assert_eq!(definition::IS_MUT, if_::HAS_ELSE);
    }
}
