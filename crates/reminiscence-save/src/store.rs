//! Save-data store over a pluggable storage medium.

use crate::config::SaveConfig;
use crate::error::{Error, Result};
use crate::slot::{GameSlot, SettingsRoot, SlotSummary, SLOT_COUNT};
use crate::storage::Storage;
use reminiscence_core::{reconcile, Path, Value};
use tracing::{debug, info};

/// Path-addressed store for the whole save document.
///
/// The document lives in memory after `load`; every write persists the whole
/// document synchronously and only touches memory once storage accepted it.
/// Writes on a store that was never loaded load it first. Independent stores
/// over the same medium are not coordinated: the last one to write wins.
pub struct SaveStore<S: Storage> {
    storage: S,
    config: SaveConfig,
    document: Value,
    loaded: bool,
}

impl<S: Storage> SaveStore<S> {
    /// Create a store with default configuration.
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, SaveConfig::default())
    }

    /// Create an unloaded store.
    pub fn with_config(storage: S, config: SaveConfig) -> Self {
        let document = Self::template_for(&config);
        Self {
            storage,
            config,
            document,
            loaded: false,
        }
    }

    fn template_for(config: &SaveConfig) -> Value {
        let root = SettingsRoot::with_language(config.default_language.clone());
        // A map of empty placeholders and a string always converts.
        Value::from_typed(&root).unwrap_or_else(|_| Value::map())
    }

    /// The default document template.
    pub fn template(&self) -> Value {
        Self::template_for(&self.config)
    }

    /// The configuration this store was created with.
    pub fn config(&self) -> &SaveConfig {
        &self.config
    }

    /// Whether `load` (or a whole-document `save`) has run.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Load the persisted document.
    ///
    /// Returns `Ok(None)` when nothing was persisted yet; a fresh default
    /// document is written in that case. Otherwise the stored document is
    /// reconciled against the default template, occupied slots against the
    /// default slot, and the result returned.
    pub fn load(&mut self) -> Result<Option<SettingsRoot>> {
        let Some(bytes) = self.storage.load()? else {
            self.commit(self.template())?;
            self.loaded = true;
            info!(key = %self.config.key, "No prior save, wrote default settings");
            return Ok(None);
        };

        let candidate: Value =
            serde_json::from_slice(&bytes).map_err(|e| Error::CorruptData(e.to_string()))?;
        let (document, root) = self.reconcile_document(candidate)?;
        self.document = document;
        self.loaded = true;
        debug!(bytes = bytes.len(), "Loaded save document");
        Ok(Some(root))
    }

    /// Reconcile a candidate document and check that it converts.
    fn reconcile_document(&self, candidate: Value) -> Result<(Value, SettingsRoot)> {
        if candidate.as_map().is_none() {
            return Err(Error::CorruptData(format!(
                "document root is {}, expected map",
                candidate.type_name()
            )));
        }

        let mut document = reconcile(&self.template(), candidate);
        let slot_template = slot_template()?;
        if let Some(saves) = document
            .as_map_mut()
            .and_then(|root| root.get_mut("saves"))
            .and_then(Value::as_map_mut)
        {
            for entry in saves.values_mut() {
                if entry.as_map().is_some_and(|m| !m.is_empty()) {
                    *entry = reconcile(&slot_template, std::mem::take(entry));
                }
            }
        }

        let root = document
            .to_typed()
            .map_err(|e| Error::CorruptData(e.to_string()))?;
        Ok((document, root))
    }

    fn ensure_loaded(&mut self) -> Result<()> {
        if !self.loaded {
            self.load()?;
        }
        Ok(())
    }

    /// Persist `root` as the whole document, replacing the prior snapshot.
    ///
    /// Top-level keys the typed root does not model are carried over from the
    /// current document.
    pub fn save(&mut self, root: &SettingsRoot) -> Result<()> {
        let mut next = Value::from_typed(root)?;
        if let (Some(next_map), Some(current)) = (next.as_map_mut(), self.document.as_map()) {
            for (key, value) in current {
                if !SettingsRoot::FIELDS.contains(&key.as_str()) && !next_map.contains_key(key) {
                    next_map.insert(key.clone(), value.clone());
                }
            }
        }
        self.commit(next)?;
        self.loaded = true;
        Ok(())
    }

    /// Write `next` to storage, then adopt it as the in-memory document.
    fn commit(&mut self, next: Value) -> Result<()> {
        let bytes = if self.config.pretty {
            serde_json::to_vec_pretty(&next)
        } else {
            serde_json::to_vec(&next)
        }
        .map_err(|e| Error::CorruptData(e.to_string()))?;
        self.storage.save(&bytes)?;
        self.document = next;
        debug!(bytes = bytes.len(), "Persisted save document");
        Ok(())
    }

    fn loaded_document(&self) -> Result<&Value> {
        if self.loaded {
            Ok(&self.document)
        } else {
            Err(Error::NotLoaded)
        }
    }

    /// Resolve a dotted path; `None` when any segment is absent or nothing
    /// has been loaded.
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.loaded_document()
            .ok()
            .and_then(|document| document.get_path(&Path::parse(path)))
    }

    /// Assign a value at a dotted path, creating missing maps, then persist.
    ///
    /// A value that would leave the document unloadable (e.g. a fractional
    /// inventory count) is rejected and nothing changes.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<()> {
        let path = Path::parse(path);
        check_saves_path(&path)?;
        self.ensure_loaded()?;

        let mut next = self.document.clone();
        next.set_path(&path, value.into())?;
        self.reconcile_document(next.clone())
            .map_err(|e| Error::InvalidValue {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        self.commit(next)?;
        debug!(%path, "Set save value");
        Ok(())
    }

    /// The whole in-memory document.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Typed view of the document, slots reconciled as on `load`.
    pub fn root(&self) -> Result<SettingsRoot> {
        let document = self.loaded_document()?.clone();
        Ok(self.reconcile_document(document)?.1)
    }

    /// Game state of a slot, reconciled against the default slot.
    ///
    /// An empty or never-written slot yields the default game; nothing is
    /// persisted until the slot is written.
    pub fn slot(&self, index: usize) -> Result<GameSlot> {
        check_index(index)?;
        let raw = match self.loaded_document()?.get_path(&slot_path(index)) {
            Some(Value::Null) | None => Value::map(),
            Some(value) => value.clone(),
        };
        reconcile(&slot_template()?, raw)
            .to_typed()
            .map_err(|e| Error::CorruptData(format!("slot {}: {}", index, e)))
    }

    /// Overwrite a slot's game state and persist.
    pub fn put_slot(&mut self, index: usize, slot: &GameSlot) -> Result<()> {
        check_index(index)?;
        self.ensure_loaded()?;
        let mut next = self.document.clone();
        next.set_path(&slot_path(index), Value::from_typed(slot)?)?;
        self.commit(next)?;
        debug!(index, day = slot.day, "Wrote slot");
        Ok(())
    }

    /// Whether a slot still holds the empty placeholder.
    pub fn is_slot_empty(&self, index: usize) -> Result<bool> {
        check_index(index)?;
        Ok(match self.loaded_document()?.get_path(&slot_path(index)) {
            Some(Value::Map(map)) => map.is_empty(),
            Some(Value::Null) | None => true,
            Some(_) => false,
        })
    }

    /// Overview of every slot.
    pub fn summaries(&self) -> Result<Vec<SlotSummary>> {
        (0..SLOT_COUNT)
            .map(|index| {
                if self.is_slot_empty(index)? {
                    Ok(SlotSummary::from_entry(index, None))
                } else {
                    let slot = self.slot(index)?;
                    Ok(SlotSummary::from_entry(index, Some(&slot)))
                }
            })
            .collect()
    }

    /// Slot to open on start-up.
    pub fn auto_load(&self) -> Option<usize> {
        self.get("autoLoad")
            .and_then(Value::as_int)
            .and_then(|i| usize::try_from(i).ok())
            .filter(|i| *i < SLOT_COUNT)
    }

    /// Set or clear the start-up slot and persist.
    pub fn set_auto_load(&mut self, index: Option<usize>) -> Result<()> {
        match index {
            Some(index) => {
                check_index(index)?;
                self.set("autoLoad", Value::Int(index as i64))
            }
            None => {
                self.ensure_loaded()?;
                let mut next = self.document.clone();
                if let Some(root) = next.as_map_mut() {
                    root.shift_remove("autoLoad");
                }
                self.commit(next)
            }
        }
    }

    /// Configured language, falling back to the configured default.
    pub fn language(&self) -> &str {
        self.get("settings.language")
            .and_then(Value::as_str)
            .unwrap_or(self.config.default_language.as_str())
    }

    /// Change the language and persist.
    pub fn set_language(&mut self, language: impl Into<String>) -> Result<()> {
        self.set("settings.language", Value::String(language.into()))
    }

    /// The underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

fn slot_template() -> Result<Value> {
    Ok(Value::from_typed(&GameSlot::default())?)
}

fn slot_path(index: usize) -> Path {
    Path::from_segments(["saves"]).join(index)
}

fn check_index(index: usize) -> Result<()> {
    if index < SLOT_COUNT {
        Ok(())
    } else {
        Err(Error::InvalidSlotIndex(index))
    }
}

fn check_saves_path(path: &Path) -> Result<()> {
    match path.segments() {
        [first, index, ..] if first == "saves" => match index.parse::<usize>() {
            Ok(index) => check_index(index),
            Err(_) => Ok(()),
        },
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::storage::MemoryStorage;
    use crate::{FileStorage, NativeDbStorage};

    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn load(&self) -> std::result::Result<Option<Vec<u8>>, StorageError> {
            Err(StorageError::Unavailable("medium offline".into()))
        }

        fn save(&mut self, _bytes: &[u8]) -> std::result::Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".into()))
        }
    }

    fn stored_json(storage: &MemoryStorage) -> serde_json::Value {
        serde_json::from_slice(&storage.contents().unwrap()).unwrap()
    }

    #[test]
    fn test_first_load_writes_defaults() {
        let storage = MemoryStorage::new();
        let mut store = SaveStore::new(storage.clone());

        assert!(store.load().unwrap().is_none());
        let json = stored_json(&storage);
        assert_eq!(json["settings"]["language"], "zh_CN");
        for i in 0..SLOT_COUNT {
            assert_eq!(json["saves"][i.to_string()], serde_json::json!({}));
        }
        assert!(!json.as_object().unwrap().contains_key("autoLoad"));
    }

    #[test]
    fn test_second_load_returns_reconciled_root() {
        let storage = MemoryStorage::new();
        SaveStore::new(storage.clone()).load().unwrap();

        let root = SaveStore::new(storage).load().unwrap().unwrap();
        assert_eq!(root.saves.len(), SLOT_COUNT);
        assert!(root.saves.values().all(|entry| entry.is_empty()));
        assert_eq!(root.language(), Some("zh_CN"));
    }

    #[test]
    fn test_load_backfills_old_documents() {
        let old = r#"{
            "saves": {"0": {}, "1": {"day": 7, "money": 12, "oven": "brick"}},
            "legacy": true
        }"#;
        let mut store = SaveStore::new(MemoryStorage::with_contents(old));
        let root = store.load().unwrap().unwrap();

        // Present keys are kept as-is, so slots 2..4 stay absent.
        assert_eq!(root.saves.len(), 2);
        assert_eq!(root.language(), Some("zh_CN"));

        let slot = root.saves[&1].game().unwrap().clone();
        assert_eq!(slot.day, 7);
        assert_eq!(slot.money, 12.0);
        assert_eq!(slot.time, 2);
        assert_eq!(slot.count("flour"), 20);
        assert_eq!(slot.shelf, Value::Null);
        assert_eq!(slot.extra.get("oven"), Some(&Value::from("brick")));

        assert_eq!(store.get("legacy"), Some(&Value::Bool(true)));
        assert_eq!(store.slot(3).unwrap(), GameSlot::default());
    }

    #[test]
    fn test_corrupt_documents_are_reported() {
        for bad in ["{not json", "[1, 2]", r#"{"saves": {"0": {"day": "monday"}}}"#] {
            let mut store = SaveStore::new(MemoryStorage::with_contents(bad));
            assert!(
                matches!(store.load(), Err(Error::CorruptData(_))),
                "expected corrupt data for {}",
                bad
            );
        }
    }

    #[test]
    fn test_storage_errors_propagate() {
        let mut store = SaveStore::new(BrokenStorage);
        assert!(matches!(store.load(), Err(Error::Storage(_))));
        assert!(matches!(store.set("settings.volume", 3i64), Err(Error::Storage(_))));
    }

    #[test]
    fn test_set_then_get_round_trips() {
        let storage = MemoryStorage::new();
        let mut store = SaveStore::new(storage.clone());
        store.load().unwrap();

        let cases: [(&str, Value); 5] = [
            ("volume", Value::Float(0.5)),
            ("settings.theme", Value::from("dark")),
            ("saves.1.day", Value::Int(3)),
            ("saves.2.inventory.flour", Value::Int(9)),
            ("mods.a.b.c", Value::Null),
        ];
        for (path, value) in cases {
            store.set(path, value.clone()).unwrap();
            assert_eq!(store.get(path), Some(&value), "round trip of {}", path);
        }

        let json = stored_json(&storage);
        assert_eq!(json["saves"]["2"]["inventory"]["flour"], 9);
        assert_eq!(json["mods"]["a"]["b"]["c"], serde_json::Value::Null);
    }

    #[test]
    fn test_write_before_load_keeps_persisted_slots() {
        let storage = MemoryStorage::new();
        let mut first = SaveStore::new(storage.clone());
        first.load().unwrap();
        first.set("saves.0.day", 9i64).unwrap();

        let mut second = SaveStore::new(storage.clone());
        assert!(!second.is_loaded());
        second.set("settings.volume", 3i64).unwrap();
        assert!(second.is_loaded());

        let json = stored_json(&storage);
        assert_eq!(json["saves"]["0"]["day"], 9);
        assert_eq!(json["settings"]["volume"], 3);

        let mut third = SaveStore::new(storage.clone());
        third.put_slot(1, &GameSlot::default()).unwrap();
        assert_eq!(stored_json(&storage)["saves"]["0"]["day"], 9);
    }

    #[test]
    fn test_reads_before_load() {
        let storage = MemoryStorage::new();
        SaveStore::new(storage.clone()).load().unwrap();

        let store = SaveStore::new(storage);
        assert_eq!(store.get("settings.language"), None);
        assert!(matches!(store.slot(0), Err(Error::NotLoaded)));
        assert!(matches!(store.root(), Err(Error::NotLoaded)));
        assert_eq!(store.language(), "zh_CN");
    }

    #[test]
    fn test_set_rejects_values_that_would_not_load() {
        let storage = MemoryStorage::new();
        let mut store = SaveStore::new(storage.clone());
        store.load().unwrap();
        store.set("saves.1.inventory.flour", 2i64).unwrap();
        let writes = storage.writes();

        for (path, value) in [
            ("saves.1.inventory.flour", Value::Float(2.5)),
            ("saves.1.day", Value::from("monday")),
            ("saves.2", Value::Int(3)),
            ("settings", Value::Bool(true)),
        ] {
            assert!(
                matches!(store.set(path, value), Err(Error::InvalidValue { .. })),
                "{} should be rejected",
                path
            );
        }
        assert_eq!(storage.writes(), writes);
        assert_eq!(store.get("saves.1.inventory.flour"), Some(&Value::Int(2)));

        let mut reopened = SaveStore::new(storage);
        assert!(reopened.load().unwrap().is_some());
        assert_eq!(reopened.slot(1).unwrap().count("flour"), 2);
    }

    #[test]
    fn test_failed_write_changes_nothing() {
        let mut store = SaveStore::new(BrokenStorage);
        store.save(&SettingsRoot::with_language("en_US")).unwrap_err();
        assert!(!store.is_loaded());
        assert!(matches!(store.put_slot(0, &GameSlot::default()), Err(Error::Storage(_))));
        assert_eq!(store.document(), &store.template());
    }

    #[test]
    fn test_get_missing_path() {
        let mut store = SaveStore::new(MemoryStorage::new());
        store.load().unwrap();

        assert_eq!(store.get("saves.1.inventory.flour"), None);
        assert_eq!(store.get("settings.language.first"), None);
        assert_eq!(store.get("nothing"), None);
    }

    #[test]
    fn test_set_rejects_out_of_range_slots() {
        let mut store = SaveStore::new(MemoryStorage::new());
        assert!(matches!(
            store.set("saves.5.day", 1i64),
            Err(Error::InvalidSlotIndex(5))
        ));
        assert!(matches!(store.slot(9), Err(Error::InvalidSlotIndex(9))));
        assert!(matches!(
            store.put_slot(5, &GameSlot::default()),
            Err(Error::InvalidSlotIndex(5))
        ));
        assert!(matches!(
            store.set_auto_load(Some(5)),
            Err(Error::InvalidSlotIndex(5))
        ));
    }

    #[test]
    fn test_slots_are_created_lazily() {
        let storage = MemoryStorage::new();
        let mut store = SaveStore::new(storage.clone());
        store.load().unwrap();
        let writes = storage.writes();

        let mut slot = store.slot(2).unwrap();
        assert_eq!(slot, GameSlot::default());
        assert!(store.is_slot_empty(2).unwrap());
        assert_eq!(storage.writes(), writes);

        slot.day = 4;
        slot.record_completion("opening_day".into());
        store.put_slot(2, &slot).unwrap();
        assert!(!store.is_slot_empty(2).unwrap());
        assert_eq!(store.slot(2).unwrap(), slot);
        assert_eq!(storage.writes(), writes + 1);

        let summaries = store.summaries().unwrap();
        assert_eq!(summaries.len(), SLOT_COUNT);
        assert!(summaries[2].occupied);
        assert_eq!(summaries[2].day, 4);
        assert!(!summaries[0].occupied);
    }

    #[test]
    fn test_save_overwrites_but_keeps_unmodelled_keys() {
        let storage = MemoryStorage::with_contents(r#"{"saves": {}, "settings": {}, "legacy": 1}"#);
        let mut store = SaveStore::new(storage.clone());
        let mut root = store.load().unwrap().unwrap();

        root.settings.insert("language".into(), "en_US".into());
        root.auto_load = Some(1);
        store.save(&root).unwrap();

        let json = stored_json(&storage);
        assert_eq!(json["settings"]["language"], "en_US");
        assert_eq!(json["autoLoad"], 1);
        assert_eq!(json["legacy"], 1);
        assert_eq!(store.root().unwrap(), root);
    }

    #[test]
    fn test_auto_load_and_language() {
        let storage = MemoryStorage::new();
        let mut store = SaveStore::new(storage.clone());
        store.load().unwrap();

        assert_eq!(store.auto_load(), None);
        store.set_auto_load(Some(3)).unwrap();
        assert_eq!(store.auto_load(), Some(3));
        store.set_auto_load(None).unwrap();
        assert_eq!(store.auto_load(), None);
        assert!(!stored_json(&storage).as_object().unwrap().contains_key("autoLoad"));

        assert_eq!(store.language(), "zh_CN");
        store.set_language("en_US").unwrap();
        assert_eq!(store.language(), "en_US");
    }

    #[test]
    fn test_last_writer_wins() {
        let storage = MemoryStorage::new();
        let mut first = SaveStore::new(storage.clone());
        let mut second = SaveStore::new(storage.clone());
        first.load().unwrap();
        second.load().unwrap();

        second.set("saves.0.day", 5i64).unwrap();
        first.set("saves.1.day", 8i64).unwrap();

        let json = stored_json(&storage);
        assert_eq!(json["saves"]["1"]["day"], 8);
        assert!(json["saves"]["0"].get("day").is_none());
    }

    #[test]
    fn test_store_over_file_and_native_db() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");
        {
            let mut store = SaveStore::new(FileStorage::new(&path));
            store.load().unwrap();
            store.set("saves.0.money", 42i64).unwrap();
        }
        let mut store = SaveStore::new(FileStorage::new(&path));
        store.load().unwrap().unwrap();
        assert_eq!(store.slot(0).unwrap().money, 42.0);

        let mut store = SaveStore::new(NativeDbStorage::in_memory("game").unwrap());
        assert!(store.load().unwrap().is_none());
        store.set("saves.4.fame", 2.5).unwrap();
        assert_eq!(store.slot(4).unwrap().fame, 2.5);
    }

    #[test]
    fn test_pretty_config() {
        let storage = MemoryStorage::new();
        let config = SaveConfig {
            pretty: true,
            default_language: "en_US".into(),
            ..SaveConfig::default()
        };
        let mut store = SaveStore::with_config(storage.clone(), config);
        store.load().unwrap();

        let text = String::from_utf8(storage.contents().unwrap()).unwrap();
        assert!(text.contains('\n'));
        assert_eq!(store.language(), "en_US");
    }
}
