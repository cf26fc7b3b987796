//! The Template container: binds a field registry and a generation
//! catalog under one identifier, enforcing the cross-entity invariants
//! from spec.md §3-§4.1.

use crate::error::TemplateError;
use crate::field::Field;
use crate::generation::Generation;
use crate::placeholder::extract_placeholders;
use cardflow_core::{FieldId, FieldKind, GenerationId, MethodCatalog, TemplateId};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Declaration of a new output field, supplied inline when adding a
/// generation (spec.md §4.1 "Creates new output fields atomically with
/// the generation").
#[derive(Debug, Clone)]
pub struct NewField {
    /// The output field's name.
    pub name: String,
    /// The output field's kind.
    pub kind: FieldKind,
    /// Human-readable description, used in the rendered JSON-schema hint.
    pub description: String,
}

/// A container binding a field registry and a generation catalog under
/// one identifier and natural-language code (spec.md §3 "Template").
pub struct Template {
    id: TemplateId,
    name: String,
    lang: String,
    seed_field_names: HashSet<String>,
    fields: HashMap<FieldId, Field>,
    generations: HashMap<GenerationId, Generation>,
    field_name_index: HashMap<String, FieldId>,
    generation_name_index: HashMap<String, GenerationId>,
}

impl Template {
    /// Create an empty template.
    pub fn new(
        id: TemplateId,
        name: impl Into<String>,
        lang: impl Into<String>,
        seed_field_names: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            lang: lang.into(),
            seed_field_names: seed_field_names.into_iter().collect(),
            fields: HashMap::new(),
            generations: HashMap::new(),
            field_name_index: HashMap::new(),
            generation_name_index: HashMap::new(),
        }
    }

    /// The template's identifier.
    pub fn id(&self) -> &TemplateId {
        &self.id
    }

    /// The template's human name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The template's language code.
    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// The reserved seed field names usable as inputs without an
    /// explicit field entry.
    pub fn seed_field_names(&self) -> &HashSet<String> {
        &self.seed_field_names
    }

    /// All fields currently registered.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    /// All generations currently in the catalog.
    pub fn generations(&self) -> impl Iterator<Item = &Generation> {
        self.generations.values()
    }

    /// Look up a field by name.
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.field_name_index.get(name).and_then(|id| self.fields.get(id))
    }

    /// Look up a field by id.
    pub fn field(&self, id: &FieldId) -> Option<&Field> {
        self.fields.get(id)
    }

    /// Look up a generation by name.
    pub fn generation_by_name(&self, name: &str) -> Option<&Generation> {
        self.generation_name_index
            .get(name)
            .and_then(|id| self.generations.get(id))
    }

    fn is_known_name(&self, name: &str) -> bool {
        self.seed_field_names.contains(name) || self.field_name_index.contains_key(name)
    }

    /// `add_field` (spec.md §4.1): register a standalone field with no
    /// producing generation yet.
    pub fn add_field(
        &mut self,
        id: FieldId,
        name: impl Into<String>,
        kind: FieldKind,
        description: impl Into<String>,
    ) -> Result<FieldId, TemplateError> {
        let name = name.into();
        if self.is_known_name(&name) {
            return Err(TemplateError::Conflict(format!(
                "field name `{name}` already in use"
            )));
        }
        self.field_name_index.insert(name.clone(), id.clone());
        self.fields.insert(
            id.clone(),
            Field {
                id: id.clone(),
                name,
                kind,
                description: description.into(),
                source: None,
                referenced_by: BTreeSet::new(),
            },
        );
        Ok(id)
    }

    /// `update_field` (spec.md §4.1): update description freely; kind
    /// only if the field is not yet referenced by any generation.
    pub fn update_field(
        &mut self,
        field_id: &FieldId,
        description: Option<String>,
        kind: Option<FieldKind>,
    ) -> Result<(), TemplateError> {
        let field = self
            .fields
            .get_mut(field_id)
            .ok_or_else(|| TemplateError::NotFound(format!("field {field_id}")))?;
        if let Some(new_kind) = kind {
            if new_kind != field.kind && !field.referenced_by.is_empty() {
                return Err(TemplateError::Conflict(
                    "field kind is immutable once referenced".to_string(),
                ));
            }
            field.kind = new_kind;
        }
        if let Some(desc) = description {
            field.description = desc;
        }
        Ok(())
    }

    /// `delete_field` (spec.md §4.1): refused while `referenced_by` is
    /// non-empty.
    pub fn delete_field(&mut self, field_id: &FieldId) -> Result<(), TemplateError> {
        let field = self
            .fields
            .get(field_id)
            .ok_or_else(|| TemplateError::NotFound(format!("field {field_id}")))?;
        if field.is_referenced() {
            return Err(TemplateError::Conflict(format!(
                "field `{}` is referenced by {} generation(s)",
                field.name,
                field.referenced_by.len()
            )));
        }
        let name = field.name.clone();
        self.fields.remove(field_id);
        self.field_name_index.remove(&name);
        Ok(())
    }

    fn validate_inputs(&self, inputs: &[String]) -> Result<(), TemplateError> {
        let missing: Vec<String> = inputs
            .iter()
            .filter(|name| !self.is_known_name(name))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(TemplateError::Validation { missing });
        }
        Ok(())
    }

    fn validate_prompt_placeholders(
        &self,
        prompt: &str,
        inputs: &[String],
    ) -> Result<(), TemplateError> {
        let allowed: HashSet<&str> = inputs.iter().map(String::as_str).collect();
        let missing: Vec<String> = extract_placeholders(prompt)
            .into_iter()
            .filter(|name| !allowed.contains(name.as_str()) && !self.seed_field_names.contains(name))
            .collect();
        if !missing.is_empty() {
            return Err(TemplateError::Validation { missing });
        }
        Ok(())
    }

    /// Direct dependency set of a candidate generation: the source
    /// generations of its (non-seed) input fields.
    fn direct_dependencies(&self, inputs: &[String]) -> BTreeSet<GenerationId> {
        inputs
            .iter()
            .filter_map(|name| self.field_name_index.get(name))
            .filter_map(|field_id| self.fields.get(field_id))
            .filter_map(|field| field.source.clone())
            .collect()
    }

    /// `true` if `target` is reachable from `start` by following the
    /// "depends on" edges — i.e. adding an edge `target -> (one of
    /// start)` would close a cycle back to `target` (spec.md §3
    /// invariant "the induced graph is acyclic", §8 invariant 4).
    fn reaches(&self, start: &BTreeSet<GenerationId>, target: &GenerationId) -> bool {
        let mut stack: Vec<GenerationId> = start.iter().cloned().collect();
        let mut seen: HashSet<GenerationId> = HashSet::new();
        while let Some(node) = stack.pop() {
            if &node == target {
                return true;
            }
            if !seen.insert(node.clone()) {
                continue;
            }
            if let Some(gen) = self.generations.get(&node) {
                stack.extend(self.direct_dependencies(&gen.inputs));
            }
        }
        false
    }

    /// `add_generation` (spec.md §4.1).
    #[allow(clippy::too_many_arguments)]
    pub fn add_generation(
        &mut self,
        id: GenerationId,
        name: impl Into<String>,
        method: &str,
        prompt: Option<String>,
        inputs: Vec<String>,
        outputs: Vec<NewField>,
        output_ids: Vec<FieldId>,
        catalog: &dyn MethodCatalog,
    ) -> Result<GenerationId, TemplateError> {
        let name = name.into();
        if self.generation_name_index.contains_key(&name) {
            return Err(TemplateError::Conflict(format!(
                "generation name `{name}` already in use"
            )));
        }
        if !catalog.is_registered(method) {
            return Err(TemplateError::Validation {
                missing: vec![format!("method `{method}`")],
            });
        }
        self.validate_inputs(&inputs)?;
        if catalog.requires_prompt(method) {
            let prompt_text = prompt.as_deref().ok_or_else(|| TemplateError::Validation {
                missing: vec!["prompt".to_string()],
            })?;
            self.validate_prompt_placeholders(prompt_text, &inputs)?;
        }
        if outputs.is_empty() {
            return Err(TemplateError::Validation {
                missing: vec!["at least one output".to_string()],
            });
        }
        if output_ids.len() != outputs.len() {
            return Err(TemplateError::Validation {
                missing: vec!["output id for every declared output".to_string()],
            });
        }
        let colliding: Vec<String> = outputs
            .iter()
            .filter(|f| self.is_known_name(&f.name))
            .map(|f| f.name.clone())
            .collect();
        if !colliding.is_empty() {
            return Err(TemplateError::Conflict(format!(
                "output name(s) already in use: {colliding:?}"
            )));
        }
        let output_kinds: Vec<FieldKind> = outputs.iter().map(|f| f.kind).collect();
        catalog
            .validate_outputs(method, &output_kinds)
            .map_err(TemplateError::Conflict)?;

        // Cycle check: this new generation has no existing referencers,
        // so it can only ever close a cycle through its own inputs —
        // which is structurally impossible since its outputs are fresh.
        // Checked anyway for symmetry with update_generation and to keep
        // the invariant enforced at the single choke point below.
        let deps = self.direct_dependencies(&inputs);
        if self.reaches(&deps, &id) {
            return Err(TemplateError::Validation {
                missing: vec!["dependency cycle".to_string()],
            });
        }

        // Register fields referenced as inputs as being referenced by this generation.
        for input_name in &inputs {
            if let Some(field_id) = self.field_name_index.get(input_name).cloned() {
                self.fields.get_mut(&field_id).unwrap().referenced_by.insert(id.clone());
            }
        }

        for (new_field, field_id) in outputs.iter().zip(output_ids.iter()) {
            self.field_name_index.insert(new_field.name.clone(), field_id.clone());
            self.fields.insert(
                field_id.clone(),
                Field {
                    id: field_id.clone(),
                    name: new_field.name.clone(),
                    kind: new_field.kind,
                    description: new_field.description.clone(),
                    source: Some(id.clone()),
                    referenced_by: BTreeSet::new(),
                },
            );
        }

        self.generation_name_index.insert(name.clone(), id.clone());
        self.generations.insert(
            id.clone(),
            Generation {
                id: id.clone(),
                name,
                method: method.to_string(),
                prompt,
                inputs,
                outputs: output_ids,
            },
        );
        Ok(id)
    }

    /// `update_generation` (spec.md §4.1): replace `inputs` and/or
    /// `prompt` and/or `method`, re-validating exactly as `add_generation`
    /// does. Output fields are never changed by an update.
    pub fn update_generation(
        &mut self,
        generation_id: &GenerationId,
        new_inputs: Option<Vec<String>>,
        new_prompt: Option<Option<String>>,
        new_method: Option<String>,
        catalog: &dyn MethodCatalog,
    ) -> Result<(), TemplateError> {
        let existing = self
            .generations
            .get(generation_id)
            .ok_or_else(|| TemplateError::NotFound(format!("generation {generation_id}")))?
            .clone();

        let method = new_method.as_deref().unwrap_or(&existing.method);
        if !catalog.is_registered(method) {
            return Err(TemplateError::Validation {
                missing: vec![format!("method `{method}`")],
            });
        }
        if new_method.is_some() {
            let current_kinds: Vec<FieldKind> = existing
                .outputs
                .iter()
                .filter_map(|fid| self.fields.get(fid))
                .map(|f| f.kind)
                .collect();
            catalog
                .validate_outputs(method, &current_kinds)
                .map_err(TemplateError::Conflict)?;
        }

        let inputs = new_inputs.clone().unwrap_or_else(|| existing.inputs.clone());
        self.validate_inputs(&inputs)?;

        let prompt = match &new_prompt {
            Some(p) => p.clone(),
            None => existing.prompt.clone(),
        };
        if catalog.requires_prompt(method) {
            let prompt_text = prompt.as_deref().ok_or_else(|| TemplateError::Validation {
                missing: vec!["prompt".to_string()],
            })?;
            self.validate_prompt_placeholders(prompt_text, &inputs)?;
        }

        if new_inputs.is_some() {
            let deps = self.direct_dependencies(&inputs);
            if self.reaches(&deps, generation_id) {
                return Err(TemplateError::Validation {
                    missing: vec!["dependency cycle".to_string()],
                });
            }
            // Drop old referenced_by edges, install new ones.
            for old_input in &existing.inputs {
                if let Some(field_id) = self.field_name_index.get(old_input).cloned() {
                    if let Some(f) = self.fields.get_mut(&field_id) {
                        f.referenced_by.remove(generation_id);
                    }
                }
            }
            for input_name in &inputs {
                if let Some(field_id) = self.field_name_index.get(input_name).cloned() {
                    if let Some(f) = self.fields.get_mut(&field_id) {
                        f.referenced_by.insert(generation_id.clone());
                    }
                }
            }
        }

        let gen = self.generations.get_mut(generation_id).unwrap();
        gen.inputs = inputs;
        gen.prompt = prompt;
        gen.method = method.to_string();
        Ok(())
    }

    /// `delete_generation` (spec.md §4.1): refused if any output has
    /// non-empty `referenced_by`.
    pub fn delete_generation(&mut self, generation_id: &GenerationId) -> Result<(), TemplateError> {
        let gen = self
            .generations
            .get(generation_id)
            .ok_or_else(|| TemplateError::NotFound(format!("generation {generation_id}")))?
            .clone();

        for output_id in &gen.outputs {
            if let Some(field) = self.fields.get(output_id) {
                if field.is_referenced() {
                    return Err(TemplateError::Conflict(format!(
                        "output `{}` is still referenced",
                        field.name
                    )));
                }
            }
        }

        for input_name in &gen.inputs {
            if let Some(field_id) = self.field_name_index.get(input_name).cloned() {
                if let Some(f) = self.fields.get_mut(&field_id) {
                    f.referenced_by.remove(generation_id);
                }
            }
        }
        for output_id in &gen.outputs {
            if let Some(field) = self.fields.remove(output_id) {
                self.field_name_index.remove(&field.name);
            }
        }
        self.generation_name_index.remove(&gen.name);
        self.generations.remove(generation_id);
        Ok(())
    }

    /// Gate for template deletion (spec.md §4.1 "Delete template"). The
    /// card-existence check itself is a caller concern (cards are an
    /// external collaborator, spec.md §1) — pass whether any card
    /// references this template.
    pub fn check_deletable(&self, referenced_by_any_card: bool) -> Result<(), TemplateError> {
        if referenced_by_any_card {
            return Err(TemplateError::Conflict(format!(
                "template `{}` is referenced by one or more cards",
                self.name
            )));
        }
        Ok(())
    }
}
