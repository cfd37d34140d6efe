//! Keygen command - prints one freshly generated key token

use crate::infrastructure::credential::KeyGenerator;
use crate::infrastructure::logging;

pub fn run() -> anyhow::Result<()> {
    logging::init_cli_logging()?;

    let token = KeyGenerator::new().generate()?;
    println!("{}", token);

    Ok(())
}
