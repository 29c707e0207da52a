//! In-memory key → entry → variant graph with dirty tracking.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::charset::Charset;
use crate::model::entry::{EntryId, TranslationEntry, Variant, VariantId};
use crate::model::language::Language;
use crate::model::source::Source;
use crate::model::translation_type::TranslationType;

/// Change notifications for the host, drained with
/// [`TranslationCorpus::drain_events`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CorpusEvent {
    EntryCreated { entry: EntryId, key: String },
    VariantAdded { entry: EntryId, variant: VariantId },
    VariantChanged { variant: VariantId },
    DirtyChanged { variant: VariantId, dirty: bool },
    VariantSaved { variant: VariantId },
    VariantDeleted { entry: EntryId, variant: VariantId },
    /// Every previously issued handle is gone; re-list the corpus.
    Reloaded { entries: usize, variants: usize },
}

#[derive(Debug, Default)]
pub struct TranslationCorpus {
    entries: Vec<TranslationEntry>,
    by_key: HashMap<String, EntryId>,
    // deleted variants stay as `None` so ids are never reused
    variants: Vec<Option<Variant>>,
    // handles issued before the last `clear` sit below these
    entry_base: usize,
    variant_base: usize,
    dirty: BTreeSet<VariantId>,
    events: Vec<CorpusEvent>,
    muted: bool,
}

impl TranslationCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every entry and variant along with pending events. Handles
    /// issued so far stay invalid; new ones continue past them.
    pub fn clear(&mut self) {
        self.entry_base += self.entries.len();
        self.variant_base += self.variants.len();
        self.entries.clear();
        self.by_key.clear();
        self.variants.clear();
        self.dirty.clear();
        self.events.clear();
    }

    /// Silences per-item events until [`end_bulk`](Self::end_bulk).
    pub fn begin_bulk(&mut self) {
        self.muted = true;
    }

    /// Re-enables events and announces the bulk change as one
    /// [`CorpusEvent::Reloaded`].
    pub fn end_bulk(&mut self) {
        self.muted = false;
        self.events.clear();
        self.events.push(CorpusEvent::Reloaded {
            entries: self.entry_count(),
            variants: self.variant_count(),
        });
    }

    fn emit(&mut self, event: CorpusEvent) {
        if !self.muted {
            self.events.push(event);
        }
    }

    fn entry_slot(&self, id: EntryId) -> Option<usize> {
        id.0.checked_sub(self.entry_base)
    }

    fn variant_slot(&self, id: VariantId) -> Option<usize> {
        id.0.checked_sub(self.variant_base)
    }

    pub fn get_or_create_entry(&mut self, key: &str) -> EntryId {
        if let Some(&id) = self.by_key.get(key) {
            return id;
        }

        let id = EntryId(self.entry_base + self.entries.len());
        self.entries.push(TranslationEntry::new(id, key.to_string()));
        self.by_key.insert(key.to_string(), id);
        self.emit(CorpusEvent::EntryCreated {
            entry: id,
            key: key.to_string(),
        });
        id
    }

    pub fn entry(&self, id: EntryId) -> Option<&TranslationEntry> {
        self.entry_slot(id).and_then(|i| self.entries.get(i))
    }

    pub fn entry_by_key(&self, key: &str) -> Option<&TranslationEntry> {
        self.by_key.get(key).and_then(|&id| self.entry(id))
    }

    pub fn entries(&self) -> impl Iterator<Item = &TranslationEntry> {
        self.entries.iter()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn variant(&self, id: VariantId) -> Option<&Variant> {
        self.variant_slot(id)
            .and_then(|i| self.variants.get(i))
            .and_then(Option::as_ref)
    }

    fn variant_mut(&mut self, id: VariantId) -> Result<&mut Variant> {
        let slot = self.variant_slot(id).ok_or(Error::UnknownVariant(id))?;
        self.variants
            .get_mut(slot)
            .and_then(Option::as_mut)
            .ok_or(Error::UnknownVariant(id))
    }

    /// Live variants in creation order.
    pub fn variants(&self) -> impl Iterator<Item = &Variant> {
        self.variants.iter().flatten()
    }

    pub fn variant_count(&self) -> usize {
        self.variants().count()
    }

    /// Variants of `entry`, skipping any that were deleted.
    pub fn entry_variants(&self, entry: EntryId) -> Vec<&Variant> {
        self.entry(entry)
            .map(|e| e.variants.iter().filter_map(|&v| self.variant(v)).collect())
            .unwrap_or_default()
    }

    pub fn changed_variants(&self, entry: EntryId) -> Vec<&Variant> {
        self.entry_variants(entry)
            .into_iter()
            .filter(|v| v.is_changed())
            .collect()
    }

    /// Type of the entry's first live variant.
    pub fn translation_type(&self, entry: EntryId) -> Option<TranslationType> {
        self.entry_variants(entry)
            .first()
            .map(|v| v.translation_type)
    }

    /// Adds a variant read from (or destined for) `source`'s file.
    ///
    /// The supposed charset is the one `language` binds to exactly the
    /// source's version.
    pub fn add_variant(
        &mut self,
        entry: EntryId,
        source: Arc<Source>,
        language: &Language,
        translation_type: TranslationType,
        text: &str,
        used_charset: Option<Charset>,
    ) -> Result<VariantId> {
        let slot = self
            .entry_slot(entry)
            .filter(|&i| i < self.entries.len())
            .ok_or(Error::UnknownEntry(entry))?;
        let key = self.entries[slot].key.clone();

        let supposed = language.charset(&source.version);
        let id = VariantId(self.variant_base + self.variants.len());
        self.variants.push(Some(Variant::new(
            id,
            entry,
            key,
            source,
            language.code().to_string(),
            translation_type,
            text.to_string(),
            supposed,
            used_charset,
        )));
        self.entries[slot].variants.push(id);
        self.emit(CorpusEvent::VariantAdded { entry, variant: id });
        Ok(id)
    }

    /// Replaces the edited text and brings dirty-set membership in line with
    /// `is_changed()` in the same step.
    pub fn set_edited_text(&mut self, id: VariantId, text: &str) -> Result<()> {
        let variant = self.variant_mut(id)?;
        variant.set_edited_text(text.to_string());
        let changed = variant.is_changed();
        self.emit(CorpusEvent::VariantChanged { variant: id });
        self.sync_dirty(id, changed);
        Ok(())
    }

    /// Restores the original text.
    pub fn reset(&mut self, id: VariantId) -> Result<()> {
        let original = self
            .variant(id)
            .map(|v| v.original_text().to_string())
            .ok_or(Error::UnknownVariant(id))?;
        self.set_edited_text(id, &original)
    }

    /// Takes the edited text as the new original.
    pub fn mark_saved(&mut self, id: VariantId) -> Result<()> {
        self.variant_mut(id)?.mark_saved();
        self.emit(CorpusEvent::VariantSaved { variant: id });
        self.sync_dirty(id, false);
        Ok(())
    }

    /// Drops the variant from the corpus and the dirty set. The entry stays.
    pub fn remove_variant(&mut self, id: VariantId) -> Result<Variant> {
        let slot = self.variant_slot(id).ok_or(Error::UnknownVariant(id))?;
        let variant = self
            .variants
            .get_mut(slot)
            .and_then(Option::take)
            .ok_or(Error::UnknownVariant(id))?;

        if let Some(i) = self.entry_slot(variant.entry) {
            if let Some(entry) = self.entries.get_mut(i) {
                entry.variants.retain(|&v| v != id);
            }
        }
        self.sync_dirty(id, false);
        self.emit(CorpusEvent::VariantDeleted {
            entry: variant.entry,
            variant: id,
        });
        Ok(variant)
    }

    fn sync_dirty(&mut self, id: VariantId, dirty: bool) {
        let membership_changed = if dirty {
            self.dirty.insert(id)
        } else {
            self.dirty.remove(&id)
        };
        if membership_changed {
            self.emit(CorpusEvent::DirtyChanged { variant: id, dirty });
        }
    }

    pub fn is_dirty(&self, id: VariantId) -> bool {
        self.dirty.contains(&id)
    }

    /// Snapshot of the dirty set, safe to iterate while saving.
    pub fn dirty_variants(&self) -> Vec<VariantId> {
        self.dirty.iter().copied().collect()
    }

    pub fn drain_events(&mut self) -> Vec<CorpusEvent> {
        std::mem::take(&mut self.events)
    }
}
