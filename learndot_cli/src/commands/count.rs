use anyhow::Result;
use clap::Args;
use learndot_api::Client;

use crate::validation;

#[derive(Args)]
pub struct CountArgs {
    /// Entity collection (e.g. contacts, courses)
    pub entity: String,

    /// Search conditions as a JSON object
    #[arg(long, default_value = "{}")]
    pub conditions: String,
}

pub async fn run(args: &CountArgs, client: &Client) -> Result<()> {
    let entity = validation::validate_entity(&args.entity)?;
    let conditions = validation::parse_conditions(&args.conditions)?;
    let count = client.count(&entity, &conditions).await?;
    println!("{}", count);
    Ok(())
}
