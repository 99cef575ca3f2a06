#[cfg(all(feature = "es", feature = "en"))]
compile_error!("Cannot enable both 'es' and 'en' features at the same time");

#[cfg(feature = "es")]
pub mod strings {
    pub const MEMBER: &str = "Miembro";
    pub const THEY_OWE_ME: &str = "Me debe";
    pub const I_OWE_THEM: &str = "Le debo";
    pub const NET: &str = "Neto";
    pub const PAID: &str = "Pagado";
    pub const TOTAL_OWED_TO_ME: &str = "Me deben";
    pub const TOTAL_I_OWE: &str = "Debo";
    pub const GLOBAL_BALANCE: &str = "Balance global";
    pub const ALL_SETTLED: &str = "Todo saldado.";
    pub const SPENDING: &str = "Gastos compartidos";
    pub const TOTAL_SHARED: &str = "Total compartido";
    pub const WARNINGS: &str = "Avisos";
    pub const SKIPPED_ROWS: &str = "Filas omitidas";
    pub const FALLBACK_MEMBER: &str = "Compañero";
    pub const YOU: &str = "Tú";
}

#[cfg(feature = "en")]
pub mod strings {
    pub const MEMBER: &str = "Member";
    pub const THEY_OWE_ME: &str = "They owe me";
    pub const I_OWE_THEM: &str = "I owe them";
    pub const NET: &str = "Net";
    pub const PAID: &str = "Paid";
    pub const TOTAL_OWED_TO_ME: &str = "Owed to me";
    pub const TOTAL_I_OWE: &str = "I owe";
    pub const GLOBAL_BALANCE: &str = "Global balance";
    pub const ALL_SETTLED: &str = "All settled.";
    pub const SPENDING: &str = "Shared spending";
    pub const TOTAL_SHARED: &str = "Total shared";
    pub const WARNINGS: &str = "Warnings";
    pub const SKIPPED_ROWS: &str = "Skipped rows";
    pub const FALLBACK_MEMBER: &str = "Companion";
    pub const YOU: &str = "You";
}

#[cfg(not(any(feature = "es", feature = "en")))]
pub mod strings {
    pub const MEMBER: &str = "Member";
    pub const THEY_OWE_ME: &str = "They owe me";
    pub const I_OWE_THEM: &str = "I owe them";
    pub const NET: &str = "Net";
    pub const PAID: &str = "Paid";
    pub const TOTAL_OWED_TO_ME: &str = "Owed to me";
    pub const TOTAL_I_OWE: &str = "I owe";
    pub const GLOBAL_BALANCE: &str = "Global balance";
    pub const ALL_SETTLED: &str = "All settled.";
    pub const SPENDING: &str = "Shared spending";
    pub const TOTAL_SHARED: &str = "Total shared";
    pub const WARNINGS: &str = "Warnings";
    pub const SKIPPED_ROWS: &str = "Skipped rows";
    pub const FALLBACK_MEMBER: &str = "Companion";
    pub const YOU: &str = "You";
}

pub use strings::*;
