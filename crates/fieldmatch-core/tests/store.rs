mod common;

use std::sync::Arc;
use std::thread;

use fieldmatch_core::{KnowledgeBaseError, MatchError, SchemaStore};
use fieldmatch_model::{Catalog, CatalogField, CatalogModel, FieldType};

use common::sample_catalog;

fn tiny_catalog() -> Catalog {
    Catalog {
        models: vec![CatalogModel {
            id: "res.partner".to_string(),
            description: "Contact".to_string(),
            kind: None,
            transient: false,
        }],
        fields: vec![CatalogField {
            name: "name".to_string(),
            label: "Name".to_string(),
            model_description: "Contact".to_string(),
            field_type: FieldType::Char,
            base_type: None,
            indexed: false,
            stored: true,
            readonly: false,
            required: true,
            related_model: None,
        }],
        ..Catalog::default()
    }
}

#[test]
fn unloaded_store_refuses_snapshots() {
    let store = SchemaStore::new();
    assert!(!store.is_loaded());
    assert!(matches!(store.snapshot(), Err(MatchError::NotLoaded)));
}

#[test]
fn empty_reload_leaves_unloaded_state_intact() {
    let store = SchemaStore::new();
    let error = store.reload(&Catalog::default()).unwrap_err();
    assert_eq!(error, KnowledgeBaseError::EmptyCatalog { models: 0, fields: 0 });
    assert!(!store.is_loaded());
}

#[test]
fn failed_reload_keeps_previous_snapshot() {
    let store = SchemaStore::new();
    let report = store.reload(&sample_catalog()).expect("sample loads");
    assert_eq!(report.models, 11);

    // Models resolve but every field points at an unknown description.
    let mut orphaned = tiny_catalog();
    orphaned.fields[0].model_description = "Nowhere".to_string();
    let error = store.reload(&orphaned).unwrap_err();
    assert_eq!(error, KnowledgeBaseError::EmptyCatalog { models: 1, fields: 0 });

    let snapshot = store.snapshot().expect("still loaded");
    assert_eq!(snapshot.model_count(), 11);
}

#[test]
fn readers_keep_their_snapshot_across_reload() {
    let store = SchemaStore::new();
    store.reload(&sample_catalog()).expect("sample loads");
    let before = store.snapshot().expect("loaded");

    store.reload(&tiny_catalog()).expect("tiny loads");
    let after = store.snapshot().expect("loaded");

    assert_eq!(before.model_count(), 11);
    assert_eq!(after.model_count(), 1);
    assert!(!Arc::ptr_eq(&before, &after));
}

#[test]
fn concurrent_readers_see_whole_snapshots() {
    let store = SchemaStore::new();
    store.reload(&sample_catalog()).expect("sample loads");
    let sample = sample_catalog();
    let tiny = tiny_catalog();

    thread::scope(|scope| {
        scope.spawn(|| {
            for round in 0..20 {
                let catalog = if round % 2 == 0 { &tiny } else { &sample };
                store.reload(catalog).expect("reload");
            }
        });
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..200 {
                    let kb = store.snapshot().expect("loaded");
                    let models = kb.model_count();
                    assert!(models == 1 || models == 11, "saw {models} models");
                    assert_eq!(kb.field_count() == 1, models == 1);
                }
            });
        }
    });
}
