//! List registered formulas.

use ability_core::formula::FORMULA_TAG;
use ability_core::{FormulaRegistry, FormulaShape};
use anyhow::Result;
use clap::Parser;

/// List built-in formulas matching a tag and the timing shape
#[derive(Parser)]
pub struct Formulas {
    /// Tag to filter by (e.g., duration, cooldown, ticks)
    #[arg(short, long, value_name = "TAG", default_value = FORMULA_TAG)]
    tag: String,

    /// List every registered signature regardless of tag or shape
    #[arg(long)]
    all: bool,
}

impl Formulas {
    pub fn execute(self) -> Result<()> {
        let registry = FormulaRegistry::with_builtins();

        let signatures: Vec<String> = if self.all {
            registry.signatures().into_iter().map(str::to_owned).collect()
        } else {
            registry.enumerate(&self.tag, &FormulaShape::timing())
        };

        if signatures.is_empty() {
            println!("No formulas match tag {:?}", self.tag);
        }
        for signature in signatures {
            println!("{signature}");
        }
        Ok(())
    }
}
