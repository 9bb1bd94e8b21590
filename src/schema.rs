//! Typed translation item schemas.
//!
//! An [`EntitySchema`] describes one translation item type to the reconciler:
//! how to construct a blank item, how to read and write its locale, which
//! payload fields it carries (for empty-item removal), and how to attach a
//! parent object to a freshly created item. It is the typed replacement for
//! runtime reflection: every accessor is a closure registered once per item
//! type by the embedding application.

use std::any::{
    Any,
    TypeId,
};
use std::collections::HashMap;
use std::fmt;

use serde_json::{
    Map,
    Value,
};
use thiserror::Error;

use crate::error::EditorError;
use crate::path::PropertyPath;

#[derive(Debug, Error)]
#[error("Failed to construct a new translation item: {message}")]
pub struct FactoryError {
    /// Reason reported by the item factory.
    message: String,
}

impl FactoryError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("The item schema declares no locale accessor")]
    MissingLocaleAccessor,
}

/// Constructs a blank item.
type Factory<T> = Box<dyn Fn() -> Result<T, FactoryError>>;
/// Reads the locale of an item; `None` is the null locale.
type LocaleReader<T> = Box<dyn Fn(&T) -> Result<Option<String>, EditorError>>;
/// Writes the locale of an item.
type LocaleWriter<T> = Box<dyn Fn(&mut T, Option<&str>) -> Result<(), EditorError>>;
/// Assigns a type-erased parent object to an item.
type ParentAssign<T> = Box<dyn Fn(&mut T, &dyn Any)>;

/// Accessors of a single payload field, bucketed the way the removal pass
/// consumes them.
pub(crate) enum FieldAccess<T> {
    /// A nullable text field. Blank values are normalized to `None`.
    OptionalText {
        /// Reads the current value.
        get: Box<dyn Fn(&T) -> Option<String>>,
        /// Replaces the current value.
        set: Box<dyn Fn(&mut T, Option<String>)>,
    },
    /// A non-nullable text field. Only blankness is ever checked, so no
    /// setter is needed.
    Text {
        /// Reads the current value.
        get: Box<dyn Fn(&T) -> String>,
    },
    /// Any other field. Counts as content whenever it holds a value.
    Other {
        /// Reports whether the field currently holds a value.
        has_value: Box<dyn Fn(&T) -> bool>,
    },
}

/// One declared payload field.
pub(crate) struct FieldSpec<T> {
    /// Logical field name, matched against the configured ignore list.
    pub(crate) name: String,
    /// Identifier fields never count as content.
    pub(crate) identifier: bool,
    /// Field accessors.
    pub(crate) access: FieldAccess<T>,
}

/// Describes a translation item type to the reconciler.
pub struct EntitySchema<T> {
    /// Blank item factory.
    factory: Factory<T>,
    /// Locale read accessor.
    read_locale: LocaleReader<T>,
    /// Locale write accessor.
    write_locale: LocaleWriter<T>,
    /// Declared payload fields; `None` for untyped records, which carry no
    /// field metadata and are therefore never pruned.
    field_metadata: Option<Vec<FieldSpec<T>>>,
    /// Parent assignment closures, keyed by the parent's concrete type.
    parent_links: HashMap<TypeId, ParentAssign<T>>,
}

impl<T> EntitySchema<T> {
    /// Starts a schema for items constructed by an infallible factory.
    pub fn builder(factory: impl Fn() -> T + 'static) -> EntitySchemaBuilder<T> {
        EntitySchemaBuilder::new(Box::new(move || Ok(factory())))
    }

    /// Starts a schema for items whose construction can fail.
    pub fn try_builder(
        factory: impl Fn() -> Result<T, FactoryError> + 'static,
    ) -> EntitySchemaBuilder<T> {
        EntitySchemaBuilder::new(Box::new(factory))
    }

    /// Constructs a blank item.
    pub(crate) fn create(&self) -> Result<T, FactoryError> {
        (self.factory)()
    }

    /// Reads the locale of an item.
    pub(crate) fn locale_of(&self, item: &T) -> Result<Option<String>, EditorError> {
        (self.read_locale)(item)
    }

    /// Writes the locale of an item.
    pub(crate) fn assign_locale(
        &self,
        item: &mut T,
        locale: Option<&str>,
    ) -> Result<(), EditorError> {
        (self.write_locale)(item, locale)
    }

    /// Attaches a parent object to an item if an assignment was registered
    /// for the parent's concrete type. Returns whether a link matched.
    pub(crate) fn assign_parent(&self, item: &mut T, parent: &dyn Any) -> bool {
        // 親の型に対応するリンクが無ければ何もしない
        match self.parent_links.get(&parent.type_id()) {
            Some(assign) => {
                assign(item, parent);
                true
            }
            None => false,
        }
    }

    /// Declared payload fields, when the item type carries field metadata.
    pub(crate) fn field_metadata(&self) -> Option<&[FieldSpec<T>]> {
        self.field_metadata.as_deref()
    }
}

impl EntitySchema<Value> {
    /// Schema over plain JSON records: blank items are empty objects and the
    /// locale lives at a property path. Records carry no field metadata.
    pub(crate) fn for_records(locale_path: PropertyPath) -> Self {
        let read_path = locale_path.clone();
        let read_locale: LocaleReader<Value> = Box::new(move |item| {
            match read_path.get(item)? {
                Value::Null => Ok(None),
                Value::String(locale) => Ok(Some(locale.clone())),
                _ => Err(EditorError::LocaleType { path: read_path.raw().to_string() }),
            }
        });

        let write_locale: LocaleWriter<Value> = Box::new(move |item, locale| {
            let value = locale.map_or(Value::Null, |locale| Value::String(locale.to_string()));
            locale_path.set(item, value)?;
            Ok(())
        });

        Self {
            factory: Box::new(|| Ok(Value::Object(Map::new()))),
            read_locale,
            write_locale,
            field_metadata: None,
            parent_links: HashMap::new(),
        }
    }
}

impl<T> fmt::Debug for EntitySchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntitySchema")
            .field(
                "fields",
                &self
                    .field_metadata
                    .as_ref()
                    .map(|fields| fields.iter().map(|spec| spec.name.as_str()).collect::<Vec<_>>()),
            )
            .field("parent_links", &self.parent_links.len())
            .finish_non_exhaustive()
    }
}

/// Builds an [`EntitySchema`].
pub struct EntitySchemaBuilder<T> {
    /// Blank item factory.
    factory: Factory<T>,
    /// Locale accessors, once registered.
    locale: Option<(LocaleReader<T>, LocaleWriter<T>)>,
    /// Declared payload fields, in registration order.
    fields: Vec<FieldSpec<T>>,
    /// Parent assignment closures, keyed by the parent's concrete type.
    parent_links: HashMap<TypeId, ParentAssign<T>>,
}

impl<T> EntitySchemaBuilder<T> {
    /// Starts an empty builder around a factory.
    fn new(factory: Factory<T>) -> Self {
        Self { factory, locale: None, fields: Vec::new(), parent_links: HashMap::new() }
    }

    /// Registers the locale accessors. `None` is the null locale.
    #[must_use]
    pub fn locale(
        mut self,
        get: impl Fn(&T) -> Option<String> + 'static,
        set: impl Fn(&mut T, Option<String>) + 'static,
    ) -> Self {
        let read: LocaleReader<T> = Box::new(move |item| Ok(get(item)));
        let write: LocaleWriter<T> =
            Box::new(move |item, locale| {
                set(item, locale.map(ToString::to_string));
                Ok(())
            });
        self.locale = Some((read, write));
        self
    }

    /// Registers a nullable text field.
    #[must_use]
    pub fn optional_text(
        mut self,
        name: impl Into<String>,
        get: impl Fn(&T) -> Option<String> + 'static,
        set: impl Fn(&mut T, Option<String>) + 'static,
    ) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            identifier: false,
            access: FieldAccess::OptionalText { get: Box::new(get), set: Box::new(set) },
        });
        self
    }

    /// Registers a non-nullable text field.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, get: impl Fn(&T) -> String + 'static) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            identifier: false,
            access: FieldAccess::Text { get: Box::new(get) },
        });
        self
    }

    /// Registers a non-text field. The closure reports whether the field
    /// currently holds a value.
    #[must_use]
    pub fn other(
        mut self,
        name: impl Into<String>,
        has_value: impl Fn(&T) -> bool + 'static,
    ) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            identifier: false,
            access: FieldAccess::Other { has_value: Box::new(has_value) },
        });
        self
    }

    /// Registers the identifier field. Identifiers never count as content
    /// when deciding whether an item is empty.
    #[must_use]
    pub fn identifier(
        mut self,
        name: impl Into<String>,
        has_value: impl Fn(&T) -> bool + 'static,
    ) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            identifier: true,
            access: FieldAccess::Other { has_value: Box::new(has_value) },
        });
        self
    }

    /// Registers how to attach a parent of type `P` to a new item.
    ///
    /// The reconciler picks the assignment matching the concrete type of the
    /// parent it is handed; an unregistered parent type means new items get
    /// no back-reference, silently.
    #[must_use]
    pub fn parent_link<P: 'static>(mut self, assign: impl Fn(&mut T, &P) + 'static) -> Self {
        self.parent_links.insert(
            TypeId::of::<P>(),
            Box::new(move |item, parent| {
                if let Some(parent) = parent.downcast_ref::<P>() {
                    assign(item, parent);
                }
            }),
        );
        self
    }

    /// Finishes the schema.
    pub fn build(self) -> Result<EntitySchema<T>, SchemaError> {
        let Some((read_locale, write_locale)) = self.locale else {
            return Err(SchemaError::MissingLocaleAccessor);
        };

        Ok(EntitySchema {
            factory: self.factory,
            read_locale,
            write_locale,
            field_metadata: Some(self.fields),
            parent_links: self.parent_links,
        })
    }
}

impl<T> fmt::Debug for EntitySchemaBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntitySchemaBuilder")
            .field("fields", &self.fields.iter().map(|spec| spec.name.as_str()).collect::<Vec<_>>())
            .field("has_locale", &self.locale.is_some())
            .finish_non_exhaustive()
    }
}
