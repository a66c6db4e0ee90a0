use anyhow::Result;
use clap::Args;
use learndot_api::{Client, SearchQuery, SearchResult};

use crate::output::{print_json, OutputFormat};
use crate::validation;

#[derive(Args)]
pub struct SearchArgs {
    /// Entity collection (e.g. contacts, courses)
    pub entity: String,

    /// Search conditions as a JSON object
    #[arg(long, default_value = "{}")]
    pub conditions: String,

    /// Return only this page, unaggregated, instead of every page
    #[arg(long)]
    pub page: Option<u32>,

    /// Sort ascending
    #[arg(long)]
    pub asc: bool,

    /// Match any condition instead of all of them
    #[arg(long)]
    pub or: bool,

    /// Extra query parameter as key=value (repeatable)
    #[arg(long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<String>,
}

pub async fn run(args: &SearchArgs, client: &Client, format: &OutputFormat) -> Result<()> {
    let entity = validation::validate_entity(&args.entity)?;
    let conditions = validation::parse_conditions(&args.conditions)?;

    let mut query = SearchQuery::default().with_asc(args.asc).with_or(args.or);
    for param in &args.params {
        let (key, value) = validation::parse_param(param)?;
        query = query.with_param(&key, &value)?;
    }
    if let Some(page) = args.page {
        query = query.with_page(validation::validate_page(page)?);
    }

    let result = client.search(&entity, &conditions, &query).await?;
    match &result {
        SearchResult::Aggregated(records) => eprintln!("{} {} found", records.len(), entity),
        SearchResult::Page(page) => eprintln!(
            "{} {} on this page{}",
            page.results.len(),
            entity,
            page.size
                .map(|size| format!(" ({} total)", size))
                .unwrap_or_default()
        ),
    }
    print_json(&result, format)
}
