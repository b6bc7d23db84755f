//! In-memory knowledge base of the target schema.
//!
//! [`KnowledgeBase::load`] resolves a raw [`Catalog`] into canonical model
//! and field definitions, builds the relationship graph, then builds the
//! lookup indexes. Catalog rows that cannot be resolved are dropped and
//! listed in the returned [`LoadReport`]; loading itself never fails.

mod graph;
mod index;
mod trie;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use fieldmatch_model::{
    CaseInsensitiveMap, Catalog, CatalogSelection, ConstraintDefinition, ConstraintKind,
    FieldDefinition, FieldKey, FieldType, IntegrityIssue, IntegrityReport, IssueSeverity,
    ModelDefinition, RelationDefinition, SelectionOption,
};
use serde::Serialize;
use tracing::{debug, error, info, warn};

pub use graph::RelationshipGraph;
pub use index::FieldIndex;
pub use trie::PrefixTrie;

/// Kind of catalog row mentioned in a [`DroppedItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogItemKind {
    Model,
    Field,
    Selection,
    Constraint,
    Relation,
}

impl CatalogItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Field => "field",
            Self::Selection => "selection",
            Self::Constraint => "constraint",
            Self::Relation => "relation",
        }
    }
}

impl fmt::Display for CatalogItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog row that could not be resolved during load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedItem {
    pub kind: CatalogItemKind,
    pub name: String,
    pub reason: String,
}

/// Outcome of a knowledge base load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub models: usize,
    pub fields: usize,
    pub selection_options: usize,
    pub constraints: usize,
    pub relations: usize,
    pub dropped: Vec<DroppedItem>,
}

impl LoadReport {
    fn drop_item(&mut self, kind: CatalogItemKind, name: impl Into<String>, reason: impl Into<String>) {
        let item = DroppedItem {
            kind,
            name: name.into(),
            reason: reason.into(),
        };
        debug!(kind = %item.kind, name = %item.name, reason = %item.reason, "dropped catalog row");
        self.dropped.push(item);
    }

    pub fn dropped_count(&self, kind: CatalogItemKind) -> usize {
        self.dropped.iter().filter(|item| item.kind == kind).count()
    }
}

/// Counts describing a loaded knowledge base.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KnowledgeBaseStats {
    pub models: usize,
    pub fields: usize,
    pub relational_fields: usize,
    pub selection_fields: usize,
    pub required_fields: usize,
    pub graph_edges: usize,
    pub constraints: usize,
    pub relations: usize,
}

/// Immutable snapshot of the target schema with its indexes.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    models: BTreeMap<String, ModelDefinition>,
    fields: BTreeMap<FieldKey, FieldDefinition>,
    model_by_description: CaseInsensitiveMap<String>,
    constraints: BTreeMap<String, Vec<ConstraintDefinition>>,
    relations: BTreeMap<String, Vec<RelationDefinition>>,
    graph: RelationshipGraph,
    index: FieldIndex,
}

impl KnowledgeBase {
    /// Resolve a catalog into a knowledge base.
    ///
    /// Models are keyed by technical id and resolved from their description;
    /// the first model with a given id or description wins. Fields,
    /// constraints and relations whose model description does not resolve are
    /// dropped, as are duplicate fields. Selection options attach to the field
    /// named by their `"<Field Label> (<Model Description>)"` key and are
    /// ordered by sequence.
    pub fn load(catalog: &Catalog) -> (Self, LoadReport) {
        let mut kb = Self::default();
        let mut report = LoadReport::default();

        kb.load_models(catalog, &mut report);
        kb.load_fields(catalog, &mut report);
        kb.load_selections(&catalog.selections, &mut report);
        kb.load_tables(catalog, &mut report);

        kb.graph = RelationshipGraph::build(kb.fields.values());
        kb.index = FieldIndex::build(kb.fields.values());

        report.models = kb.models.len();
        report.fields = kb.fields.len();
        report.constraints = kb.constraints.values().map(Vec::len).sum();
        report.relations = kb.relations.values().map(Vec::len).sum();
        if !report.dropped.is_empty() {
            warn!(
                dropped = report.dropped.len(),
                fields = report.dropped_count(CatalogItemKind::Field),
                selections = report.dropped_count(CatalogItemKind::Selection),
                "some catalog rows could not be resolved"
            );
        }
        info!(
            models = report.models,
            fields = report.fields,
            selection_options = report.selection_options,
            graph_edges = kb.graph.edge_count(),
            "knowledge base loaded"
        );
        (kb, report)
    }

    fn load_models(&mut self, catalog: &Catalog, report: &mut LoadReport) {
        for model in &catalog.models {
            if self.models.contains_key(&model.id) {
                report.drop_item(CatalogItemKind::Model, &model.id, "duplicate model id");
                continue;
            }
            if !self.model_by_description.insert(&model.description, model.id.clone()) {
                debug!(model = %model.id, description = %model.description, "model description already taken");
            }
            self.models.insert(
                model.id.clone(),
                ModelDefinition {
                    name: model.id.clone(),
                    description: model.description.clone(),
                    kind: model.kind.clone(),
                    transient: model.transient,
                },
            );
        }
    }

    fn load_fields(&mut self, catalog: &Catalog, report: &mut LoadReport) {
        for field in &catalog.fields {
            let Some(model) = self.model_by_description.get(&field.model_description).cloned()
            else {
                report.drop_item(
                    CatalogItemKind::Field,
                    &field.name,
                    format!("unknown model description '{}'", field.model_description),
                );
                continue;
            };
            let key = FieldKey::new(model.clone(), field.name.clone());
            if self.fields.contains_key(&key) {
                report.drop_item(CatalogItemKind::Field, key.to_string(), "duplicate field");
                continue;
            }
            self.fields.insert(
                key,
                FieldDefinition {
                    model,
                    name: field.name.clone(),
                    label: field.label.clone(),
                    field_type: field.field_type,
                    base_type: field.base_type.clone(),
                    indexed: field.indexed,
                    stored: field.stored,
                    readonly: field.readonly,
                    required: field.required,
                    related_model: field.related_model.clone(),
                    selection_options: Vec::new(),
                },
            );
        }
    }

    fn load_selections(&mut self, selections: &[CatalogSelection], report: &mut LoadReport) {
        let mut by_label: HashMap<(String, String), Vec<FieldKey>> = HashMap::new();
        for field in self.fields.values() {
            by_label
                .entry((field.model.clone(), field.label.trim().to_lowercase()))
                .or_default()
                .push(field.key());
        }

        let mut touched = BTreeSet::new();
        for selection in selections {
            let Some(key) = self.resolve_selection_field(selection, &by_label) else {
                report.drop_item(
                    CatalogItemKind::Selection,
                    format!("{} = {}", selection.field_key, selection.value),
                    "field key does not resolve to a loaded field",
                );
                continue;
            };
            if let Some(field) = self.fields.get_mut(&key) {
                if field
                    .selection_options
                    .iter()
                    .any(|option| option.value == selection.value)
                {
                    continue;
                }
                field.selection_options.push(SelectionOption {
                    value: selection.value.clone(),
                    display_name: selection.display_name.clone(),
                    sequence: selection.sequence,
                });
                report.selection_options += 1;
                touched.insert(key);
            }
        }
        for key in touched {
            if let Some(field) = self.fields.get_mut(&key) {
                field
                    .selection_options
                    .sort_by(|a, b| a.sequence.cmp(&b.sequence).then_with(|| a.value.cmp(&b.value)));
            }
        }
    }

    fn resolve_selection_field(
        &self,
        selection: &CatalogSelection,
        by_label: &HashMap<(String, String), Vec<FieldKey>>,
    ) -> Option<FieldKey> {
        for (label, description) in selection.field_key_splits() {
            let Some(model) = self.model_by_description.get(description) else {
                continue;
            };
            let Some(keys) = by_label.get(&(model.clone(), label.trim().to_lowercase())) else {
                continue;
            };
            let preferred = keys
                .iter()
                .find(|key| {
                    self.fields
                        .get(*key)
                        .is_some_and(|field| field.field_type == FieldType::Selection)
                })
                .or_else(|| keys.first());
            if let Some(key) = preferred {
                return Some(key.clone());
            }
        }
        None
    }

    fn load_tables(&mut self, catalog: &Catalog, report: &mut LoadReport) {
        for constraint in &catalog.constraints {
            let Some(model) = self.model_by_description.get(&constraint.model_description) else {
                report.drop_item(
                    CatalogItemKind::Constraint,
                    &constraint.name,
                    format!("unknown model description '{}'", constraint.model_description),
                );
                continue;
            };
            self.constraints
                .entry(model.clone())
                .or_default()
                .push(ConstraintDefinition {
                    model: model.clone(),
                    kind: ConstraintKind::parse(&constraint.kind),
                    name: constraint.name.clone(),
                    module: constraint.module.clone(),
                });
        }
        for relation in &catalog.relations {
            let Some(model) = self.model_by_description.get(&relation.model_description) else {
                report.drop_item(
                    CatalogItemKind::Relation,
                    &relation.name,
                    format!("unknown model description '{}'", relation.model_description),
                );
                continue;
            };
            self.relations
                .entry(model.clone())
                .or_default()
                .push(RelationDefinition {
                    model: model.clone(),
                    name: relation.name.clone(),
                    module: relation.module.clone(),
                });
        }
    }

    /// True when no model or no field resolved; such a snapshot cannot match.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty() || self.fields.is_empty()
    }

    /// Number of resolved models.
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Number of resolved fields across all models.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Counts of models, fields, edges and auxiliary rows.
    pub fn stats(&self) -> KnowledgeBaseStats {
        let mut stats = KnowledgeBaseStats {
            models: self.models.len(),
            fields: self.fields.len(),
            graph_edges: self.graph.edge_count(),
            constraints: self.constraints.values().map(Vec::len).sum(),
            relations: self.relations.values().map(Vec::len).sum(),
            ..KnowledgeBaseStats::default()
        };
        for field in self.fields.values() {
            if field.field_type.is_relational() {
                stats.relational_fields += 1;
            }
            if field.field_type == FieldType::Selection {
                stats.selection_fields += 1;
            }
            if field.required {
                stats.required_fields += 1;
            }
        }
        stats
    }

    /// Model by canonical identifier, e.g. `res.partner`.
    pub fn model(&self, name: &str) -> Option<&ModelDefinition> {
        self.models.get(name)
    }

    /// Returns true if `name` is a loaded canonical model identifier.
    pub fn has_model(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Model by its human description, case-insensitively.
    ///
    /// Catalog rows reference owning models this way.
    pub fn model_by_description(&self, description: &str) -> Option<&ModelDefinition> {
        self.model_by_description
            .get(description)
            .and_then(|name| self.models.get(name))
    }

    /// Every model in identifier order.
    pub fn models(&self) -> impl Iterator<Item = &ModelDefinition> {
        self.models.values()
    }

    /// Field by (model, name) key.
    pub fn field(&self, key: &FieldKey) -> Option<&FieldDefinition> {
        self.fields.get(key)
    }

    /// Field by model identifier and technical field name.
    pub fn field_by_name(&self, model: &str, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(&FieldKey::new(model, name))
    }

    /// Every field in (model, field) order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.values()
    }

    /// Fields of one model in field-name order.
    pub fn fields_of_model<'a>(&'a self, model: &'a str) -> impl Iterator<Item = &'a FieldDefinition> {
        self.fields
            .range(FieldKey::new(model, "")..)
            .take_while(move |(key, _)| key.model == model)
            .map(|(_, field)| field)
    }

    /// Fields of `model` whose required flag is set.
    ///
    /// Constraints are not consulted.
    pub fn required_fields<'a>(&'a self, model: &'a str) -> Vec<&'a FieldDefinition> {
        self.fields_of_model(model)
            .filter(|field| field.required)
            .collect()
    }

    /// Constraints attached to `model`; empty when it has none.
    pub fn constraints_of(&self, model: &str) -> &[ConstraintDefinition] {
        self.constraints
            .get(model)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Many-to-many relation tables owned by `model`.
    pub fn relation_tables_of(&self, model: &str) -> &[RelationDefinition] {
        self.relations
            .get(model)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Model-to-model graph built from relational fields.
    pub fn graph(&self) -> &RelationshipGraph {
        &self.graph
    }

    /// Models reachable from `model` within `max_depth` hops, ignoring edge direction.
    pub fn related_models(&self, model: &str, max_depth: usize) -> BTreeSet<String> {
        self.graph.related_models(model, max_depth)
    }

    /// Shortest model path from `from` to `to`, both ends included.
    pub fn path_between(&self, from: &str, to: &str) -> Option<Vec<String>> {
        self.graph.path_between(from, to)
    }

    /// Fields whose technical name equals `name`, case-insensitively.
    pub fn by_field_name(&self, name: &str) -> &[FieldKey] {
        self.index.by_name(name)
    }

    /// Fields whose label equals `label` after label normalization.
    pub fn by_label(&self, label: &str) -> &[FieldKey] {
        self.index.by_label(label)
    }

    /// Fields of one type.
    pub fn by_type(&self, field_type: FieldType) -> &[FieldKey] {
        self.index.by_type(field_type)
    }

    /// Relational fields pointing at `model`.
    pub fn by_related_model(&self, model: &str) -> &[FieldKey] {
        self.index.by_related_model(model)
    }

    /// Selection fields with an option whose value or display name equals `value`.
    pub fn by_selection_value(&self, value: &str) -> &[FieldKey] {
        self.index.by_selection_value(value)
    }

    /// Up to `limit` fields whose technical name starts with `prefix`, shortest first.
    pub fn prefix_match_name(&self, prefix: &str, limit: usize) -> Vec<FieldKey> {
        self.index.prefix_match_name(prefix, limit)
    }

    /// Up to `limit` fields whose normalized label starts with `prefix`, shortest first.
    pub fn prefix_match_label(&self, prefix: &str, limit: usize) -> Vec<FieldKey> {
        self.index.prefix_match_label(prefix, limit)
    }

    /// Sweep the loaded schema for integrity problems.
    ///
    /// Fields on unknown models are errors. Relational fields whose target is
    /// missing and selection fields without options are warnings. Nothing is
    /// removed; the sweep only reports.
    pub fn validate(&self) -> IntegrityReport {
        let mut report = IntegrityReport::default();
        for field in self.fields.values() {
            if !self.models.contains_key(&field.model) {
                push_issue(&mut report, IssueSeverity::Error, field, "field belongs to an unknown model".to_string());
            }
            if field.field_type.is_relational() {
                match &field.related_model {
                    None => push_issue(
                        &mut report,
                        IssueSeverity::Warning,
                        field,
                        "relational field has no related model".to_string(),
                    ),
                    Some(target) if !self.models.contains_key(target) => push_issue(
                        &mut report,
                        IssueSeverity::Warning,
                        field,
                        format!("related model '{target}' is not loaded"),
                    ),
                    Some(_) => {}
                }
            }
            if field.field_type == FieldType::Selection && field.selection_options.is_empty() {
                push_issue(
                    &mut report,
                    IssueSeverity::Warning,
                    field,
                    "selection field has no options".to_string(),
                );
            }
        }
        info!(
            errors = report.error_count(),
            warnings = report.warning_count(),
            "knowledge base integrity sweep finished"
        );
        report
    }
}

fn push_issue(
    report: &mut IntegrityReport,
    severity: IssueSeverity,
    field: &FieldDefinition,
    message: String,
) {
    match severity {
        IssueSeverity::Error => error!(model = %field.model, field = %field.name, "{message}"),
        IssueSeverity::Warning => warn!(model = %field.model, field = %field.name, "{message}"),
    }
    report.issues.push(IntegrityIssue {
        severity,
        model: field.model.clone(),
        field: Some(field.name.clone()),
        message,
    });
}
