//! Claims command implementation.

use crate::error::Result;
use crate::output::Formatter;
use claimscope_domain::CLAIMS;

/// Execute the claims command.
pub fn execute_claims(formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.format_claims(&CLAIMS)?);
    Ok(())
}
