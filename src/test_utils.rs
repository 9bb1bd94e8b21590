//! テスト用ユーティリティ
//!
//! 複数のテストモジュールで使用される共通のヘルパーを提供します。
#![cfg(test)]
#![allow(clippy::unwrap_used)]

use crate::config::EditorConfig;
use crate::persistence::Persistence;
use crate::reconciler::Reconciler;
use crate::schema::EntitySchema;

/// ページ翻訳を模したテスト用エンティティ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PageTranslation {
    pub(crate) id: Option<u64>,
    pub(crate) page_id: Option<u64>,
    pub(crate) lang: Option<String>,
    pub(crate) title: Option<String>,
    pub(crate) body: Option<String>,
    pub(crate) slug: String,
    pub(crate) views: Option<u32>,
    pub(crate) created_at: Option<String>,
}

/// テスト用の翻訳アイテムを作成する
pub(crate) fn page(lang: &str, title: Option<&str>) -> PageTranslation {
    PageTranslation {
        lang: Some(lang.to_string()),
        title: title.map(ToString::to_string),
        ..PageTranslation::default()
    }
}

/// [`PageTranslation`] のスキーマを作成する
pub(crate) fn page_schema() -> EntitySchema<PageTranslation> {
    EntitySchema::builder(PageTranslation::default)
        .locale(|item: &PageTranslation| item.lang.clone(), |item, lang| item.lang = lang)
        .identifier("id", |item| item.id.is_some())
        .optional_text("title", |item| item.title.clone(), |item, title| item.title = title)
        .optional_text("body", |item| item.body.clone(), |item, body| item.body = body)
        .text("slug", |item| item.slug.clone())
        .other("views", |item| item.views.is_some())
        .other("created_at", |item| item.created_at.is_some())
        .build()
        .unwrap()
}

/// 指定ロケールの [`Reconciler`] を作成する
pub(crate) fn page_reconciler<const N: usize>(locales: [&str; N]) -> Reconciler<PageTranslation> {
    Reconciler::new(EditorConfig::with_locales(locales), page_schema()).unwrap()
}

/// 削除要求を記録する [`Persistence`] 実装
#[derive(Debug, Default)]
pub(crate) struct RecordingPersistence {
    /// 削除要求されたアイテムの id
    pub(crate) deleted: Vec<Option<u64>>,
}

impl Persistence<PageTranslation> for RecordingPersistence {
    fn is_managed(&self, item: &PageTranslation) -> bool {
        item.id.is_some()
    }

    fn request_delete(&mut self, item: &PageTranslation) {
        self.deleted.push(item.id);
    }
}
