//! Program IDs recognised by the classifier.
//!
//! New programs are added by extending `KnownProgram` and `ALL`; the
//! classifier only asks the table, it never compares identifiers itself.

/// Jupiter aggregator v4
pub const JUPITER_PROGRAM_ID: &str = "JUP4Fb2cqiRUcaTHdrPC8h2gNsA2ETXiPDD33WcGuJB";

/// Raydium
pub const RAYDIUM_PROGRAM_ID: &str = "FLhm1pC8v3ckG4FsKgpzyEBxXVqgKBZweFqgPvPMwjhSz";

/// SPL Token program, used to enumerate a wallet's token accounts
pub const SPL_TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

/// Label used for any program missing from the table.
pub const UNKNOWN_PROGRAM_NAME: &str = "Unknown Program";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownProgram {
    Jupiter,
    Raydium,
}

impl KnownProgram {
    pub const ALL: [KnownProgram; 2] = [KnownProgram::Jupiter, KnownProgram::Raydium];

    pub fn program_id(&self) -> &'static str {
        match self {
            KnownProgram::Jupiter => JUPITER_PROGRAM_ID,
            KnownProgram::Raydium => RAYDIUM_PROGRAM_ID,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            KnownProgram::Jupiter => "Jupiter",
            KnownProgram::Raydium => "Raydium",
        }
    }

    /// Whether a transaction led by this program exchanges tokens.
    pub fn is_swap(&self) -> bool {
        match self {
            KnownProgram::Jupiter | KnownProgram::Raydium => true,
        }
    }

    pub fn from_program_id(program_id: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|program| program.program_id() == program_id)
    }
}

/// Display name for a possibly absent program id.
pub fn program_name(program_id: Option<&str>) -> &'static str {
    program_id
        .and_then(KnownProgram::from_program_id)
        .map(|program| program.name())
        .unwrap_or(UNKNOWN_PROGRAM_NAME)
}

/// Whether a possibly absent program id belongs to a known swap program.
pub fn is_swap_program(program_id: Option<&str>) -> bool {
    program_id
        .and_then(KnownProgram::from_program_id)
        .map(|program| program.is_swap())
        .unwrap_or(false)
}
