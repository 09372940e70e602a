//! Symbolic operation identifiers.
//!
//! The numbering is dense: the four sentinels come first and never own an
//! encoding, followed by every A32 operation in alphabetical order. The
//! Opcode Index of a table set is an array indexed by these values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! operations {
    (
        sentinels { $($sname:ident => $sstr:literal,)* }
        ops { $($name:ident => $str:literal,)* }
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[repr(u16)]
        pub enum OperationId {
            $($sname,)*
            $($name,)*
        }

        impl OperationId {
            /// Every identifier, in numbering order.
            pub const ALL: &'static [Self] = &[$(Self::$sname,)* $(Self::$name,)*];

            /// Stable lowercase name.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$sname => $sstr,)*
                    $(Self::$name => $str,)*
                }
            }
        }
    };
}

operations! {
    sentinels {
    Invalid => "invalid",
    Undecoded => "undecoded",
    Contd => "contd",
    Label => "label",
    }
    ops {
    Adc => "adc",
    Adcs => "adcs",
    Add => "add",
    Adds => "adds",
    And => "and",
    Ands => "ands",
    Asr => "asr",
    Asrs => "asrs",
    Bfc => "bfc",
    Bfi => "bfi",
    Bic => "bic",
    Bics => "bics",
    Bkpt => "bkpt",
    B => "b",
    Bl => "bl",
    Blx => "blx",
    BlxInd => "blx_ind",
    Bx => "bx",
    Bxj => "bxj",
    Cdp => "cdp",
    Clrex => "clrex",
    Clz => "clz",
    Cmn => "cmn",
    Cmp => "cmp",
    Crc32 => "crc32",
    Crc32c => "crc32c",
    Dbg => "dbg",
    Dmb => "dmb",
    Dsb => "dsb",
    Eor => "eor",
    Eors => "eors",
    Eret => "eret",
    Hlt => "hlt",
    Hvc => "hvc",
    Isb => "isb",
    Lda => "lda",
    Ldab => "ldab",
    Ldaex => "ldaex",
    Ldaexb => "ldaexb",
    Ldaexd => "ldaexd",
    Ldaexh => "ldaexh",
    Ldah => "ldah",
    Ldc => "ldc",
    Ldcl => "ldcl",
    Ldm => "ldm",
    LdmPriv => "ldm_priv",
    Ldmda => "ldmda",
    LdmdaPriv => "ldmda_priv",
    Ldmdb => "ldmdb",
    LdmdbPriv => "ldmdb_priv",
    LdmiaPriv => "ldmia_priv",
    Ldmib => "ldmib",
    LdmibPriv => "ldmib_priv",
    Ldr => "ldr",
    Ldrb => "ldrb",
    Ldrbt => "ldrbt",
    Ldrd => "ldrd",
    Ldrex => "ldrex",
    Ldrexb => "ldrexb",
    Ldrexd => "ldrexd",
    Ldrexh => "ldrexh",
    Ldrh => "ldrh",
    Ldrht => "ldrht",
    Ldrsb => "ldrsb",
    Ldrsbt => "ldrsbt",
    Ldrsh => "ldrsh",
    Ldrsht => "ldrsht",
    Ldrt => "ldrt",
    Lsl => "lsl",
    Lsls => "lsls",
    Lsr => "lsr",
    Lsrs => "lsrs",
    Mcr => "mcr",
    Mcrr => "mcrr",
    Mla => "mla",
    Mlas => "mlas",
    Mls => "mls",
    Mov => "mov",
    Movs => "movs",
    Movt => "movt",
    Movw => "movw",
    Mrc => "mrc",
    Mrrc => "mrrc",
    Mrs => "mrs",
    Msr => "msr",
    Mul => "mul",
    Muls => "muls",
    Mvn => "mvn",
    Mvns => "mvns",
    Nop => "nop",
    Orr => "orr",
    Orrs => "orrs",
    Pkhbt => "pkhbt",
    Pkhtb => "pkhtb",
    Qadd => "qadd",
    Qadd16 => "qadd16",
    Qadd8 => "qadd8",
    Qasx => "qasx",
    Qdadd => "qdadd",
    Qdsub => "qdsub",
    Qsax => "qsax",
    Qsub => "qsub",
    Qsub16 => "qsub16",
    Qsub8 => "qsub8",
    Rbit => "rbit",
    Rev => "rev",
    Rev16 => "rev16",
    Revsh => "revsh",
    Ror => "ror",
    Rors => "rors",
    Rrx => "rrx",
    Rrxs => "rrxs",
    Rsb => "rsb",
    Rsbs => "rsbs",
    Rsc => "rsc",
    Rscs => "rscs",
    Sadd16 => "sadd16",
    Sadd8 => "sadd8",
    Sasx => "sasx",
    Sbc => "sbc",
    Sbcs => "sbcs",
    Sbfx => "sbfx",
    Sdiv => "sdiv",
    Sel => "sel",
    Sev => "sev",
    Sevl => "sevl",
    Shadd16 => "shadd16",
    Shadd8 => "shadd8",
    Shasx => "shasx",
    Shsax => "shsax",
    Shsub16 => "shsub16",
    Shsub8 => "shsub8",
    Smlabb => "smlabb",
    Smlabt => "smlabt",
    Smlad => "smlad",
    Smladx => "smladx",
    Smlal => "smlal",
    Smlalbb => "smlalbb",
    Smlalbt => "smlalbt",
    Smlald => "smlald",
    Smlaldx => "smlaldx",
    Smlals => "smlals",
    Smlaltb => "smlaltb",
    Smlaltt => "smlaltt",
    Smlatb => "smlatb",
    Smlatt => "smlatt",
    Smlawb => "smlawb",
    Smlawt => "smlawt",
    Smlsd => "smlsd",
    Smlsdx => "smlsdx",
    Smlsld => "smlsld",
    Smlsldx => "smlsldx",
    Smmla => "smmla",
    Smmlar => "smmlar",
    Smmls => "smmls",
    Smmlsr => "smmlsr",
    Smmul => "smmul",
    Smmulr => "smmulr",
    Smuad => "smuad",
    Smuadx => "smuadx",
    Smulbb => "smulbb",
    Smulbt => "smulbt",
    Smull => "smull",
    Smulls => "smulls",
    Smultb => "smultb",
    Smultt => "smultt",
    Smulwb => "smulwb",
    Smulwt => "smulwt",
    Smusd => "smusd",
    Smusdx => "smusdx",
    Ssat => "ssat",
    Ssat16 => "ssat16",
    Ssax => "ssax",
    Ssub16 => "ssub16",
    Ssub8 => "ssub8",
    Stc => "stc",
    Stcl => "stcl",
    Stl => "stl",
    Stlb => "stlb",
    Stlex => "stlex",
    Stlexb => "stlexb",
    Stlexd => "stlexd",
    Stlexh => "stlexh",
    Stlh => "stlh",
    Stm => "stm",
    StmPriv => "stm_priv",
    Stmda => "stmda",
    StmdaPriv => "stmda_priv",
    Stmdb => "stmdb",
    StmdbPriv => "stmdb_priv",
    Stmib => "stmib",
    StmibPriv => "stmib_priv",
    Str => "str",
    Strb => "strb",
    Strbt => "strbt",
    Strd => "strd",
    Strex => "strex",
    Strexb => "strexb",
    Strexd => "strexd",
    Strexh => "strexh",
    Strh => "strh",
    Strht => "strht",
    Strt => "strt",
    Sub => "sub",
    Subs => "subs",
    Svc => "svc",
    Swp => "swp",
    Swpb => "swpb",
    Sxtab => "sxtab",
    Sxtab16 => "sxtab16",
    Sxtah => "sxtah",
    Sxtb => "sxtb",
    Sxtb16 => "sxtb16",
    Sxth => "sxth",
    Teq => "teq",
    Tst => "tst",
    Uadd16 => "uadd16",
    Uadd8 => "uadd8",
    Uasx => "uasx",
    Ubfx => "ubfx",
    Udiv => "udiv",
    Uhadd16 => "uhadd16",
    Uhadd8 => "uhadd8",
    Uhasx => "uhasx",
    Uhsax => "uhsax",
    Uhsub16 => "uhsub16",
    Uhsub8 => "uhsub8",
    Umaal => "umaal",
    Umlal => "umlal",
    Umlals => "umlals",
    Umull => "umull",
    Umulls => "umulls",
    Uqadd16 => "uqadd16",
    Uqadd8 => "uqadd8",
    Uqasx => "uqasx",
    Uqsax => "uqsax",
    Uqsub16 => "uqsub16",
    Uqsub8 => "uqsub8",
    Usad8 => "usad8",
    Usada8 => "usada8",
    Usat => "usat",
    Usat16 => "usat16",
    Usax => "usax",
    Usub16 => "usub16",
    Usub8 => "usub8",
    Uxtab => "uxtab",
    Uxtab16 => "uxtab16",
    Uxtah => "uxtah",
    Uxtb => "uxtb",
    Uxtb16 => "uxtb16",
    Uxth => "uxth",
    VabsF32 => "vabs_f32",
    VabsF64 => "vabs_f64",
    VaddF32 => "vadd_f32",
    VaddF64 => "vadd_f64",
    VcmpeF32 => "vcmpe_f32",
    VcmpeF64 => "vcmpe_f64",
    VcmpF32 => "vcmp_f32",
    VcmpF64 => "vcmp_f64",
    VcvtF32F64 => "vcvt_f32_f64",
    VcvtF32S16 => "vcvt_f32_s16",
    VcvtF32S32 => "vcvt_f32_s32",
    VcvtF32U16 => "vcvt_f32_u16",
    VcvtF32U32 => "vcvt_f32_u32",
    VcvtF64F32 => "vcvt_f64_f32",
    VcvtF64S16 => "vcvt_f64_s16",
    VcvtF64S32 => "vcvt_f64_s32",
    VcvtF64U16 => "vcvt_f64_u16",
    VcvtF64U32 => "vcvt_f64_u32",
    VcvtrS32F32 => "vcvtr_s32_f32",
    VcvtrS32F64 => "vcvtr_s32_f64",
    VcvtrU32F32 => "vcvtr_u32_f32",
    VcvtrU32F64 => "vcvtr_u32_f64",
    VcvtS16F32 => "vcvt_s16_f32",
    VcvtS16F64 => "vcvt_s16_f64",
    VcvtS32F32 => "vcvt_s32_f32",
    VcvtS32F64 => "vcvt_s32_f64",
    VcvtU16F32 => "vcvt_u16_f32",
    VcvtU16F64 => "vcvt_u16_f64",
    VcvtU32F32 => "vcvt_u32_f32",
    VcvtU32F64 => "vcvt_u32_f64",
    VdivF32 => "vdiv_f32",
    VdivF64 => "vdiv_f64",
    Vdup16 => "vdup_16",
    Vdup32 => "vdup_32",
    Vdup8 => "vdup_8",
    VfmaF32 => "vfma_f32",
    VfmaF64 => "vfma_f64",
    VfmsF32 => "vfms_f32",
    VfmsF64 => "vfms_f64",
    VfnmaF32 => "vfnma_f32",
    VfnmaF64 => "vfnma_f64",
    VfnmsF32 => "vfnms_f32",
    VfnmsF64 => "vfnms_f64",
    Vldmdb => "vldmdb",
    Vldmia => "vldmia",
    Vldr => "vldr",
    VmlaF32 => "vmla_f32",
    VmlaF64 => "vmla_f64",
    VmlsF32 => "vmls_f32",
    VmlsF64 => "vmls_f64",
    Vmov => "vmov",
    Vmov16 => "vmov_16",
    Vmov32 => "vmov_32",
    Vmov8 => "vmov_8",
    VmovF32 => "vmov_f32",
    VmovF64 => "vmov_f64",
    VmovS16 => "vmov_s16",
    VmovS8 => "vmov_s8",
    VmovU16 => "vmov_u16",
    VmovU8 => "vmov_u8",
    Vmrs => "vmrs",
    VmrsApsr => "vmrs_apsr",
    Vmsr => "vmsr",
    VmulF32 => "vmul_f32",
    VmulF64 => "vmul_f64",
    VnegF32 => "vneg_f32",
    VnegF64 => "vneg_f64",
    VnmlaF32 => "vnmla_f32",
    VnmlaF64 => "vnmla_f64",
    VnmlsF32 => "vnmls_f32",
    VnmlsF64 => "vnmls_f64",
    VnmulF32 => "vnmul_f32",
    VnmulF64 => "vnmul_f64",
    VrintrF32 => "vrintr_f32",
    VrintrF64 => "vrintr_f64",
    VrintxF32 => "vrintx_f32",
    VrintxF64 => "vrintx_f64",
    VrintzF32 => "vrintz_f32",
    VrintzF64 => "vrintz_f64",
    VsqrtF32 => "vsqrt_f32",
    VsqrtF64 => "vsqrt_f64",
    Vstmdb => "vstmdb",
    Vstmia => "vstmia",
    Vstr => "vstr",
    VsubF32 => "vsub_f32",
    VsubF64 => "vsub_f64",
    Wfe => "wfe",
    Wfi => "wfi",
    Yield => "yield",
    }
}

impl OperationId {
    pub const COUNT: usize = Self::ALL.len();

    /// Number of leading identifiers that are not operations.
    pub const SENTINEL_COUNT: usize = 4;

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[must_use]
    pub const fn is_sentinel(self) -> bool {
        self.index() < Self::SENTINEL_COUNT
    }

    /// Iterates over the real operations, skipping the sentinels.
    pub fn operations() -> impl Iterator<Item = Self> {
        Self::ALL[Self::SENTINEL_COUNT..].iter().copied()
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OperationId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.name() == lower)
            .ok_or_else(|| format!("unknown operation `{s}`"))
    }
}
