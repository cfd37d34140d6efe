//! Session-token command - mints a session JWT for local testing

use clap::Args;

use crate::config::AppConfig;
use crate::domain::identity::OwnerId;
use crate::infrastructure::auth::MAX_EXPIRATION_HOURS;
use crate::infrastructure::logging;

#[derive(Args, Debug)]
pub struct SessionTokenArgs {
    /// Owner id placed in the `sub` claim
    #[arg(long)]
    pub owner: String,

    /// Token lifetime in hours
    #[arg(long, default_value_t = 24, value_parser = clap::value_parser!(u64).range(1..=MAX_EXPIRATION_HOURS))]
    pub hours: u64,
}

pub fn run(args: SessionTokenArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init_cli_logging()?;

    let config = AppConfig::load()?;
    let owner = OwnerId::new(args.owner)?;

    let verifier = crate::create_session_verifier(&config.session);
    let token = verifier.issue(&owner, args.hours)?;
    println!("{}", token);

    Ok(())
}
