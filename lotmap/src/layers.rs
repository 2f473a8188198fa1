use crate::geometry::coords::Geometry;
use crate::model::{LotAttributes, LotId, ShapeKey, ShapeRecord};
use std::collections::{BTreeMap, BTreeSet};

/// Side table of every shape the editor knows about.
///
/// Persisted lots live in the display layer keyed by their lot id; the
/// single unsaved draft lives beside them. The editable layer group is a
/// membership set over those keys, so a shape keeps its identity no matter
/// how often its on-screen renderable is regenerated.
#[derive(Clone, Debug, Default)]
pub struct ShapeStore {
    lots: BTreeMap<LotId, ShapeRecord>,
    draft: Option<ShapeRecord>,
    editable: BTreeSet<ShapeKey>,
}

impl ShapeStore {
    pub fn new() -> Self {
        ShapeStore::default()
    }

    pub fn get(&self, key: ShapeKey) -> Option<&ShapeRecord> {
        match key {
            ShapeKey::Lot(id) => self.lots.get(&id),
            ShapeKey::Draft => self.draft.as_ref(),
        }
    }

    pub fn get_mut(&mut self, key: ShapeKey) -> Option<&mut ShapeRecord> {
        match key {
            ShapeKey::Lot(id) => self.lots.get_mut(&id),
            ShapeKey::Draft => self.draft.as_mut(),
        }
    }

    pub fn lot(&self, id: LotId) -> Option<&ShapeRecord> {
        self.lots.get(&id)
    }

    pub fn lots(&self) -> impl Iterator<Item = &ShapeRecord> {
        self.lots.values()
    }

    pub fn lot_count(&self) -> usize {
        self.lots.len()
    }

    pub fn draft(&self) -> Option<&ShapeRecord> {
        self.draft.as_ref()
    }

    /// Replaces the display layer and empties the editable group of lots.
    /// The draft is left alone. Returns the ids that were dropped.
    pub fn replace_lots<I: IntoIterator<Item = ShapeRecord>>(&mut self, records: I) -> Vec<LotId> {
        let removed: Vec<LotId> = self.lots.keys().copied().collect();
        self.lots.clear();
        self.editable.retain(|k| *k == ShapeKey::Draft);
        for rec in records {
            if let ShapeKey::Lot(id) = rec.key {
                self.lots.insert(id, rec);
            }
        }
        removed
    }

    pub fn remove_lot(&mut self, id: LotId) -> Option<ShapeRecord> {
        self.editable.remove(&ShapeKey::Lot(id));
        self.lots.remove(&id)
    }

    /// Installs `record` as the draft, evicting (and returning) the
    /// previous one. The new draft joins the editable group.
    pub fn install_draft(&mut self, mut record: ShapeRecord) -> Option<ShapeRecord> {
        record.key = ShapeKey::Draft;
        let evicted = self.draft.replace(record);
        self.editable.insert(ShapeKey::Draft);
        evicted
    }

    pub fn take_draft(&mut self) -> Option<ShapeRecord> {
        self.editable.remove(&ShapeKey::Draft);
        self.draft.take()
    }

    /// Adds `key` to the editable group. Returns true if it was not there.
    pub fn make_editable(&mut self, key: ShapeKey) -> bool {
        if self.get(key).is_none() {
            return false;
        }
        self.editable.insert(key)
    }

    pub fn is_editable(&self, key: ShapeKey) -> bool {
        self.editable.contains(&key)
    }

    pub fn editable_keys(&self) -> impl Iterator<Item = ShapeKey> + '_ {
        self.editable.iter().copied()
    }

    pub fn editable_len(&self) -> usize {
        self.editable.len()
    }

    pub fn set_geometry(&mut self, key: ShapeKey, geometry: Geometry) -> bool {
        match self.get_mut(key) {
            Some(rec) => {
                rec.geometry = geometry;
                true
            }
            None => false,
        }
    }

    pub fn set_attributes(&mut self, key: ShapeKey, attributes: LotAttributes) -> bool {
        match self.get_mut(key) {
            Some(rec) => {
                rec.attributes = attributes;
                true
            }
            None => false,
        }
    }
}
