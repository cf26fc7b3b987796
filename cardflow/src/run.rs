//! `run_template`: the single entry point that wires bind + execute +
//! dump into one call (spec.md §4.5 "bind / launch+await / dump").

use crate::card::{Card, CardContent};
use crate::config::Config;
use cardflow_actions::ActionRegistry;
use cardflow_core::{CardId, FlowError};
use cardflow_executor::FlowExecutor;
use cardflow_template::Template;
use std::collections::HashMap;
use std::sync::Arc;

/// Run every generation in `template` to completion and return the
/// resulting card.
///
/// `seeds` must cover every name in `template.seed_field_names()`; any
/// others are ignored. Runs concurrently, fails fast on the first
/// terminal error (cancelling every still-suspended generation), and
/// honors `config.run_timeout()` if set.
pub async fn run_template(
    template: &Template,
    actions: Arc<ActionRegistry>,
    config: &Config,
    seeds: HashMap<String, String>,
    card_id: CardId,
) -> Result<Card, FlowError> {
    tracing::debug!(template = %template.id(), card = %card_id, "running template");
    let context = Arc::new(FlowExecutor::bind(template, seeds)?);
    let executor = FlowExecutor::new(actions);
    executor.run(template, context.clone(), config.run_timeout()).await?;

    let content = context.dump(true);
    Ok(Card {
        id: card_id,
        template_id: template.id().clone(),
        content: CardContent(content),
    })
}
