use crate::model::structures::gameplay_record::GameplayRecord;

/// Append-only gameplay history. Records are created exactly once per
/// successful rating update and never mutated or deleted.
#[derive(Debug, Default, Clone)]
pub struct GameplayLog {
    records: Vec<GameplayRecord>,
    next_id: u64
}

impl GameplayLog {
    pub fn new() -> GameplayLog {
        GameplayLog::default()
    }

    /// Appends a record, replacing whatever id it carries with the next
    /// sequential one.
    pub fn append(&mut self, mut record: GameplayRecord) -> &GameplayRecord {
        record.id = self.next_id;
        self.next_id += 1;

        self.records.push(record);
        self.records.last().expect("record was just pushed")
    }

    pub fn records(&self) -> &[GameplayRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Exports the full history as a JSON document.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.records)
    }
}
