use anyhow::Result;
use clap::Args;
use learndot_api::Client;

use crate::output::{print_response, OutputFormat};
use crate::validation;

#[derive(Args)]
pub struct UpdateArgs {
    /// Entity collection (e.g. contacts, courses)
    pub entity: String,

    /// Id of the record to update
    pub id: String,

    /// Field values to change, as a JSON object
    #[arg(long)]
    pub conditions: String,
}

pub async fn run(args: &UpdateArgs, client: &Client, format: &OutputFormat) -> Result<()> {
    let entity = validation::validate_entity(&args.entity)?;
    let id = validation::parse_record_id(&args.id)?;
    let conditions = validation::parse_conditions(&args.conditions)?;
    let resp = client.update(&entity, &conditions, id).await?;
    print_response(&resp, format)
}
