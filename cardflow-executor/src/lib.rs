//! Flow Executor: a concurrent DAG scheduler that runs every generation
//! of a template against a run [`Context`] (spec.md §4.5, §5).
//!
//! Grounded on `neuron-orch-local::LocalOrch::dispatch_many`: one
//! `tokio::spawn`ed task per unit of work, `JoinHandle`s collected and
//! awaited afterwards, errors mapped rather than propagated through
//! `?` so a panicking task doesn't abort its siblings. This executor
//! adds the two things the orchestrator's fire-and-forget dispatch
//! doesn't need: a run-wide timeout and fail-fast cancellation of the
//! shared [`Context`] on the first terminal error.

#![deny(missing_docs)]

use cardflow_actions::{ActionRegistry, OutputSpec};
use cardflow_context::Context;
use cardflow_core::{FieldValue, FlowError};
use cardflow_template::Template;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Runs templates against contexts.
pub struct FlowExecutor {
    actions: Arc<ActionRegistry>,
}

impl FlowExecutor {
    /// Build an executor dispatching through `actions`.
    pub fn new(actions: Arc<ActionRegistry>) -> Self {
        Self { actions }
    }

    /// Bind step: build a context seeded with `seeds` and declare an
    /// unresolved cell for every non-seed field in `template` (spec.md
    /// §4.4, §4.5 "bind"). Must run before [`FlowExecutor::run`].
    pub fn bind(
        template: &Template,
        seeds: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Context, FlowError> {
        let mut context = Context::new(seeds);
        for field in template.fields() {
            if context.seed_names().contains(field.name()) {
                continue;
            }
            context.declare(field.name(), field.kind())?;
        }
        Ok(context)
    }

    /// Launch + await step: run every generation concurrently, honoring
    /// an optional run-wide timeout (spec.md §5). Returns the first
    /// terminal error, if any; every other error is logged and
    /// suppressed. The context's resolved cells are left exactly as of
    /// the moment execution stopped — callers read them with
    /// `context.dump(..)`.
    pub async fn run(
        &self,
        template: &Template,
        context: Arc<Context>,
        timeout: Option<Duration>,
    ) -> Result<(), FlowError> {
        let drive = self.drive(template, context.clone());
        match timeout {
            Some(budget) => match tokio::time::timeout(budget, drive).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!("run exceeded its timeout budget, cancelling");
                    context.cancel_all();
                    Err(FlowError::Timeout)
                }
            },
            None => drive.await,
        }
    }

    async fn drive(&self, template: &Template, context: Arc<Context>) -> Result<(), FlowError> {
        // A `JoinSet` (rather than a plain `Vec<JoinHandle>` awaited in
        // spawn order) so "first error" means first-to-complete, not
        // first-registered — the two differ once generations run at
        // different speeds.
        let mut set = tokio::task::JoinSet::new();
        for gen in template.generations() {
            let name = gen.name().to_string();
            let method = gen.method().to_string();
            let prompt = gen.prompt().map(str::to_string);
            let inputs: Vec<String> = gen.inputs().to_vec();
            let outputs: Vec<OutputSpec> = gen
                .outputs()
                .iter()
                .filter_map(|id| template.field(id))
                .map(|f| OutputSpec {
                    name: f.name().to_string(),
                    kind: f.kind(),
                    description: f.description().to_string(),
                })
                .collect();
            let context = context.clone();
            let actions = self.actions.clone();
            set.spawn(async move {
                let result = Self::execute_generation(
                    &actions, &context, &name, &method, prompt.as_deref(), &inputs, &outputs,
                )
                .await;
                (name, result)
            });
        }

        let mut first_error: Option<FlowError> = None;
        while let Some(joined) = set.join_next().await {
            let (name, result) = match joined {
                Ok(outcome) => outcome,
                Err(join_err) => (
                    "<unknown>".to_string(),
                    Err(FlowError::InvariantViolation(format!(
                        "generation task panicked: {join_err}"
                    ))),
                ),
            };
            if let Err(err) = result {
                if first_error.is_none() {
                    tracing::debug!(generation = %name, error = %err, "generation failed, cancelling run");
                    context.cancel_all();
                    first_error = Some(err);
                } else {
                    tracing::warn!(generation = %name, error = %err, "suppressed error after first failure");
                }
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn execute_generation(
        actions: &ActionRegistry,
        context: &Context,
        name: &str,
        method: &str,
        prompt: Option<&str>,
        input_names: &[String],
        outputs: &[OutputSpec],
    ) -> Result<(), FlowError> {
        let mut inputs: HashMap<String, FieldValue> = HashMap::with_capacity(input_names.len());
        // Seeds are always visible to a generation's prompt, whether or not
        // they're listed in its declared inputs (spec.md §4.5's
        // `inputs ∪ seed_names` union) — resolved at construction, so this
        // never suspends.
        for seed_name in context.seed_names() {
            let value = context.get(seed_name).await?;
            inputs.insert(seed_name.clone(), value);
        }
        for input_name in input_names {
            let value = context.get(input_name).await?;
            inputs.insert(input_name.clone(), value);
        }

        tracing::debug!(generation = %name, method = %method, "dispatching generation");
        let produced = actions.dispatch(method, prompt, inputs, outputs).await?;
        for output in outputs {
            let value = produced.get(&output.name).cloned().ok_or_else(|| {
                FlowError::Parse(format!(
                    "handler for `{method}` did not produce declared output `{}`",
                    output.name
                ))
            })?;
            context.put(&output.name, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cardflow_core::{BackendError, BlobStore, CompletionBackend, FieldKind, ImageBackend, SpeechBackend};
    use cardflow_template::{NewField, Template};
    use cardflow_core::{FieldId, GenerationId, TemplateId};
    use std::time::Duration as StdDuration;

    struct EchoCompletion;
    #[async_trait]
    impl CompletionBackend for EchoCompletion {
        async fn complete(&self, prompt: &str) -> Result<String, BackendError> {
            // Echo the rendered instruction back under every plausible output
            // name this test fixture is used for, so the same backend serves
            // any generation in `linear_template` regardless of which one
            // called it.
            let instruction = prompt
                .split("# Instruction\n")
                .nth(1)
                .and_then(|rest| rest.split("\n\n").next())
                .unwrap_or("")
                .to_string();
            Ok(serde_json::json!({ "word": instruction.clone(), "lemma": instruction }).to_string())
        }
    }

    struct StuckCompletion;
    #[async_trait]
    impl CompletionBackend for StuckCompletion {
        async fn complete(&self, _prompt: &str) -> Result<String, BackendError> {
            tokio::time::sleep(StdDuration::from_secs(3600)).await;
            unreachable!()
        }
    }

    struct FailingCompletion;
    #[async_trait]
    impl CompletionBackend for FailingCompletion {
        async fn complete(&self, _prompt: &str) -> Result<String, BackendError> {
            Err(BackendError::RequestFailed("simulated outage".to_string()))
        }
    }

    struct NoopSpeech;
    #[async_trait]
    impl SpeechBackend for NoopSpeech {
        async fn synthesize(&self, _text: &str, _voice: &str) -> Result<Vec<u8>, BackendError> {
            Ok(vec![])
        }
    }
    struct NoopImage;
    #[async_trait]
    impl ImageBackend for NoopImage {
        async fn generate(&self, _prompt: &str) -> Result<Vec<u8>, BackendError> {
            Ok(vec![])
        }
    }
    struct NoopBlobs;
    #[async_trait]
    impl BlobStore for NoopBlobs {
        async fn upload(&self, _b: &str, _k: &str, _bytes: Vec<u8>) -> Result<(), BackendError> {
            Ok(())
        }
        async fn download(&self, _b: &str, _k: &str) -> Result<Vec<u8>, BackendError> {
            Ok(vec![])
        }
    }

    fn linear_template(completion: Arc<dyn CompletionBackend>) -> (Template, Arc<ActionRegistry>) {
        let mut template = Template::new(
            TemplateId::new("t1"),
            "vocab",
            "de",
            ["paragraph".to_string()],
        );
        let actions = Arc::new(ActionRegistry::with_defaults(
            completion,
            Arc::new(NoopSpeech),
            Arc::new(NoopImage),
            Arc::new(NoopBlobs),
        ));
        template
            .add_generation(
                GenerationId::new("g1"),
                "extract",
                "completion",
                Some("Find the word in {{paragraph}}".to_string()),
                vec!["paragraph".to_string()],
                vec![NewField {
                    name: "word".to_string(),
                    kind: FieldKind::Text,
                    description: "d".to_string(),
                }],
                vec![FieldId::new("f_word")],
                actions.as_ref(),
            )
            .unwrap();
        template
            .add_generation(
                GenerationId::new("g2"),
                "lemmatize",
                "completion",
                Some("Lemmatize {{word}}".to_string()),
                vec!["word".to_string()],
                vec![NewField {
                    name: "lemma".to_string(),
                    kind: FieldKind::Text,
                    description: "d".to_string(),
                }],
                vec![FieldId::new("f_lemma")],
                actions.as_ref(),
            )
            .unwrap();
        (template, actions)
    }

    #[tokio::test]
    async fn linear_chain_resolves_downstream_generation() {
        let (template, actions) = linear_template(Arc::new(EchoCompletion));
        let context =
            Arc::new(FlowExecutor::bind(&template, [("paragraph".to_string(), "Titan orbits Saturn.".to_string())]).unwrap());
        let executor = FlowExecutor::new(actions);
        executor.run(&template, context.clone(), None).await.unwrap();
        let dump = context.dump(true);
        assert!(dump.contains_key("word"));
        assert!(dump.contains_key("lemma"));
    }

    #[tokio::test]
    async fn generation_can_reference_a_seed_not_listed_in_its_inputs() {
        let mut template = Template::new(
            TemplateId::new("t2"),
            "vocab",
            "de",
            ["paragraph".to_string()],
        );
        let actions = Arc::new(ActionRegistry::with_defaults(
            Arc::new(EchoCompletion),
            Arc::new(NoopSpeech),
            Arc::new(NoopImage),
            Arc::new(NoopBlobs),
        ));
        // `inputs` is empty -- the prompt references the seed directly,
        // which the template editor allows (spec.md §4.5's inputs ∪ seeds
        // union), so the runtime has to resolve it without it being listed.
        template
            .add_generation(
                GenerationId::new("g1"),
                "extract",
                "completion",
                Some("Find the word in {{paragraph}}".to_string()),
                vec![],
                vec![NewField {
                    name: "word".to_string(),
                    kind: FieldKind::Text,
                    description: "d".to_string(),
                }],
                vec![FieldId::new("f_word")],
                actions.as_ref(),
            )
            .unwrap();

        let context = Arc::new(
            FlowExecutor::bind(&template, [("paragraph".to_string(), "Titan orbits Saturn.".to_string())])
                .unwrap(),
        );
        let executor = FlowExecutor::new(actions);
        executor.run(&template, context.clone(), None).await.unwrap();
        let dump = context.dump(true);
        assert_eq!(dump["word"].value, "Find the word in Titan orbits Saturn.");
    }

    #[tokio::test]
    async fn backend_failure_becomes_terminal_error() {
        let (template, actions) = linear_template(Arc::new(FailingCompletion));
        let context =
            Arc::new(FlowExecutor::bind(&template, [("paragraph".to_string(), "x".to_string())]).unwrap());
        let executor = FlowExecutor::new(actions);
        let err = executor.run(&template, context, None).await.unwrap_err();
        assert!(matches!(err, FlowError::Backend(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_cancels_suspended_generations() {
        let (template, actions) = linear_template(Arc::new(StuckCompletion));
        let context =
            Arc::new(FlowExecutor::bind(&template, [("paragraph".to_string(), "x".to_string())]).unwrap());
        let executor = FlowExecutor::new(actions);
        let err = executor
            .run(&template, context, Some(StdDuration::from_millis(50)))
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::Timeout));
    }
}
