//! Sim subcommands.

mod formulas;
mod run;

pub use formulas::Formulas;
pub use run::Run;
