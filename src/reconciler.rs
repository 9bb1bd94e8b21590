//! Reconciles translation collections against the configured locale list.

use std::any::Any;
use std::collections::HashMap;

use serde_json::Value;

use crate::collection::TranslationCollection;
use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::path::PropertyPath;
use crate::persistence::Persistence;
use crate::schema::{
    EntitySchema,
    FieldAccess,
    FieldSpec,
};

/// Aligns a collection of per-locale translation items with the configured
/// locale list.
///
/// [`reconcile`](Reconciler::reconcile) rewrites the collection so that every
/// configured locale has exactly one item, in configuration order: existing
/// items are reused, missing ones are created through the schema factory, and
/// items for unknown locales are dropped. After the surrounding editor has
/// submitted its data, [`prune_empty`](Reconciler::prune_empty) removes items
/// whose entire payload ended up empty.
pub struct Reconciler<T> {
    /// Validated editor configuration.
    config: EditorConfig,
    /// Item type description.
    schema: EntitySchema<T>,
}

impl<T> Reconciler<T> {
    /// Creates a reconciler over typed items.
    ///
    /// # Errors
    /// Returns [`EditorError::Config`] when the configuration is invalid; an
    /// editor without locales cannot manage anything, so this surfaces at
    /// setup time rather than on first use.
    pub fn new(config: EditorConfig, schema: EntitySchema<T>) -> Result<Self, EditorError> {
        config.validate().map_err(EditorError::Config)?;
        Ok(Self { config, schema })
    }

    /// The configuration this reconciler was created with.
    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Rewrites `collection` so its items match the configured locales, in
    /// order.
    ///
    /// Existing items keep their identity; a missing locale gets a fresh item
    /// with its locale assigned, and — when `parent` is given and the schema
    /// knows the parent's type — a back-reference to the parent. When two
    /// existing items carry the same locale, the later one wins and the
    /// earlier one is dropped. Dropped items are not deleted from storage;
    /// deciding that is [`prune_empty`](Reconciler::prune_empty)'s job.
    ///
    /// # Errors
    /// Collaborator failures propagate as-is. A locale read failure leaves
    /// the collection untouched; a failure while building the new content
    /// commits the items built so far before returning.
    pub fn reconcile(
        &self,
        collection: &mut impl TranslationCollection<T>,
        parent: Option<&dyn Any>,
    ) -> Result<(), EditorError> {
        let existing = collection.take_items();
        tracing::debug!(
            existing = existing.len(),
            locales = self.config.locales.len(),
            null_locale = self.config.null_locale_enabled,
            "Reconciling translation collection"
        );

        // 既存アイテムをロケールで索引する（同一ロケールは後勝ち）
        let read_locales: Result<Vec<_>, EditorError> =
            existing.iter().map(|item| self.schema.locale_of(item)).collect();
        let read_locales = match read_locales {
            Ok(locales) => locales,
            Err(error) => {
                collection.rebuild(existing);
                return Err(error);
            }
        };
        let mut by_locale: HashMap<Option<String>, T> =
            read_locales.into_iter().zip(existing).collect();

        let mut output = Vec::new();
        for locale in self.editing_locales() {
            if let Some(item) = by_locale.remove(&locale.map(String::from)) {
                output.push(item);
                continue;
            }

            // 不足しているロケールのアイテムを新規作成する
            match self.create_item(locale, parent) {
                Ok(item) => output.push(item),
                Err(error) => {
                    collection.rebuild(output);
                    return Err(error);
                }
            }
        }

        collection.rebuild(output);
        Ok(())
    }

    /// Builds a blank item for `locale`, attaching `parent` when a link for
    /// its type is registered.
    fn create_item(
        &self,
        locale: Option<&str>,
        parent: Option<&dyn Any>,
    ) -> Result<T, EditorError> {
        let mut item = self.schema.create()?;
        if let Some(parent) = parent {
            // ロケールより先に親を割り当てる
            self.schema.assign_parent(&mut item, parent);
        }
        self.schema.assign_locale(&mut item, locale)?;
        tracing::debug!(locale = locale.unwrap_or("<null>"), "Created missing translation item");
        Ok(item)
    }

    /// Removes items whose entire payload is empty and reports them.
    ///
    /// Nullable text fields holding only whitespace are normalized to `None`
    /// on every item, kept or removed. An item is removed when all of its
    /// non-identifier, non-ignored fields are empty; removed items that the
    /// persistence collaborator recognizes as managed get a deletion request.
    ///
    /// Does nothing when `autoRemoveEmptyTranslations` is off or the schema
    /// carries no field metadata (untyped records).
    pub fn prune_empty(
        &self,
        collection: &mut impl TranslationCollection<T>,
        mut persistence: Option<&mut dyn Persistence<T>>,
    ) -> Result<Vec<T>, EditorError> {
        if !self.config.auto_remove_empty_translations {
            return Ok(Vec::new());
        }
        let Some(fields) = self.schema.field_metadata() else {
            return Ok(Vec::new());
        };

        let considered: Vec<&FieldSpec<T>> = fields
            .iter()
            .filter(|spec| {
                !spec.identifier && !self.config.auto_remove_ignore_fields.contains(&spec.name)
            })
            .collect();

        let items = collection.take_items();
        let mut kept = Vec::with_capacity(items.len());
        let mut removed = Vec::new();

        for mut item in items {
            if Self::normalize_and_check_empty(&mut item, &considered) {
                if let Some(persistence) = persistence.as_deref_mut()
                    && persistence.is_managed(&item)
                {
                    persistence.request_delete(&item);
                }
                removed.push(item);
            } else {
                kept.push(item);
            }
        }

        tracing::debug!(removed = removed.len(), kept = kept.len(), "Pruned empty translations");
        collection.rebuild(kept);
        Ok(removed)
    }

    /// Normalizes blank text fields on one item and reports whether every
    /// considered field is empty.
    fn normalize_and_check_empty(item: &mut T, considered: &[&FieldSpec<T>]) -> bool {
        let mut empty = true;
        for spec in considered {
            match &spec.access {
                FieldAccess::OptionalText { get, set } => match get(item) {
                    Some(value) if !value.trim().is_empty() => empty = false,
                    // 空白のみの値は None に正規化する
                    Some(_) => set(item, None),
                    None => {}
                },
                FieldAccess::Text { get } => {
                    if !get(item).trim().is_empty() {
                        empty = false;
                    }
                }
                FieldAccess::Other { has_value } => {
                    if has_value(item) {
                        empty = false;
                    }
                }
            }
        }
        empty
    }

    /// The effective locale list: the null locale first when enabled, then
    /// the configured locales in order.
    fn editing_locales(&self) -> impl Iterator<Item = Option<&str>> {
        let sentinel = self.config.null_locale_enabled.then_some(None);
        sentinel.into_iter().chain(self.config.locales.iter().map(|locale| Some(locale.as_str())))
    }
}

impl Reconciler<Value> {
    /// Creates a reconciler over plain JSON records.
    ///
    /// Blank items are empty objects and the locale lives at the configured
    /// `localeFieldName` property path. Records carry no field metadata, so
    /// [`prune_empty`](Reconciler::prune_empty) is a no-op for them.
    pub fn for_records(config: EditorConfig) -> Result<Self, EditorError> {
        config.validate().map_err(EditorError::Config)?;
        let locale_path = PropertyPath::parse(&config.locale_field_name)?;
        Ok(Self { config, schema: EntitySchema::for_records(locale_path) })
    }
}

impl<T> std::fmt::Debug for Reconciler<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("config", &self.config)
            .field("schema", &self.schema)
            .finish()
    }
}
