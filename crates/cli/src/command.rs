//! Command-line interface for the `coopbill` binary.

use clap::{Args, Parser, Subcommand};

use coopbill_core::FamilyId;

/// coopbill - co-op invoice calculator
///
/// Reads the enrollment snapshot named by COOPBILL_SNAPSHOT and prints JSON.
#[derive(Parser, Debug)]
#[command(name = "coopbill")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Compute a family's invoice
    Invoice {
        /// Family id
        family_id: FamilyId,

        #[command(flatten)]
        surcharge: SurchargeArgs,
    },

    /// Print the public link token for a family
    Token {
        /// Family id
        family_id: FamilyId,
    },

    /// Compute the invoice behind a public link token
    Public {
        /// 8-character token
        token: String,

        #[command(flatten)]
        surcharge: SurchargeArgs,
    },

    /// Print a family's class schedule
    Schedule {
        /// Family id
        family_id: FamilyId,
    },
}

/// Per-request override of `COOPBILL_INCLUDE_SURCHARGE`.
#[derive(Args, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SurchargeArgs {
    /// Quote the online-payment surcharge
    #[arg(long, default_value_t = false, conflicts_with = "no_surcharge")]
    pub surcharge: bool,

    /// Never quote the surcharge
    #[arg(long, default_value_t = false, conflicts_with = "surcharge")]
    pub no_surcharge: bool,
}

impl SurchargeArgs {
    /// Flags win; otherwise the configured default.
    pub fn include(self, default: bool) -> bool {
        if self.surcharge {
            true
        } else if self.no_surcharge {
            false
        } else {
            default
        }
    }
}
