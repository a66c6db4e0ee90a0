use anyhow::Result;
use clap::Args;
use learndot_api::Client;

use crate::output::{print_response, OutputFormat};
use crate::validation;

#[derive(Args)]
pub struct CreateArgs {
    /// Entity collection (e.g. contacts, courses)
    pub entity: String,

    /// Field values for the new record, as a JSON object
    #[arg(long)]
    pub conditions: String,
}

pub async fn run(args: &CreateArgs, client: &Client, format: &OutputFormat) -> Result<()> {
    let entity = validation::validate_entity(&args.entity)?;
    let conditions = validation::parse_conditions(&args.conditions)?;
    let resp = client.create(&entity, &conditions).await?;
    print_response(&resp, format)
}
