use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Одна строка таблицы: поле → скалярное значение, порядок ключей сохраняется
pub type Record = Map<String, Value>;

/// Табличный набор записей с явным порядком колонок
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
}

impl RecordSet {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Колонки собираются в порядке первого появления ключа
    pub fn from_rows(rows: Vec<Record>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for key in row.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Значение ячейки; отсутствующий ключ равен `null`
    pub fn get<'a>(row: &'a Record, column: &str) -> &'a Value {
        row.get(column).unwrap_or(&Value::Null)
    }

    /// Переименование колонки в заголовке и во всех строках.
    /// Если `to` уже существует, она заменяется.
    pub fn rename_column(&mut self, from: &str, to: &str) {
        if from == to || !self.has_column(from) {
            return;
        }
        if self.has_column(to) {
            self.drop_column(to);
        }
        for column in self.columns.iter_mut() {
            if column == from {
                *column = to.to_string();
            }
        }
        for row in self.rows.iter_mut() {
            let value = row.remove(from).unwrap_or(Value::Null);
            row.insert(to.to_string(), value);
        }
    }

    pub fn drop_column(&mut self, name: &str) {
        self.columns.retain(|c| c != name);
        for row in self.rows.iter_mut() {
            row.remove(name);
        }
    }

    /// Добавляет колонку со значением `null`, если её нет
    pub fn ensure_column(&mut self, name: &str) {
        if self.has_column(name) {
            return;
        }
        self.columns.push(name.to_string());
        for row in self.rows.iter_mut() {
            row.entry(name.to_string()).or_insert(Value::Null);
        }
    }

    pub fn retain_rows<F>(&mut self, keep: F)
    where
        F: FnMut(&Record) -> bool,
    {
        self.rows.retain(keep);
    }

    /// Оставляет ровно перечисленные колонки в заданном порядке.
    /// Недостающие создаются со значением `null`.
    pub fn select_columns(&self, columns: &[&str]) -> RecordSet {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|c| (c.to_string(), Self::get(row, c).clone()))
                    .collect::<Record>()
            })
            .collect();
        RecordSet {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    /// Строки в порядке колонок (для записи в лист)
    pub fn ordered_rows(&self) -> impl Iterator<Item = Vec<&Value>> + '_ {
        self.rows.iter().map(move |row| {
            self.columns
                .iter()
                .map(|c| Self::get(row, c))
                .collect::<Vec<_>>()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("object expected"),
        }
    }

    #[test]
    fn test_columns_follow_first_seen_order() {
        let set = RecordSet::from_rows(vec![
            record(json!({"b": 1, "a": 2})),
            record(json!({"a": 3, "c": 4})),
        ]);
        assert_eq!(set.columns, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_rename_and_select() {
        let mut set = RecordSet::from_rows(vec![record(json!({"Артикул": "A1", "x": 1}))]);
        set.rename_column("Артикул", "Artikul");
        assert_eq!(set.columns, vec!["Artikul", "x"]);

        let selected = set.select_columns(&["Mesto", "Artikul"]);
        assert_eq!(selected.columns, vec!["Mesto", "Artikul"]);
        assert_eq!(selected.rows[0]["Mesto"], Value::Null);
        assert_eq!(selected.rows[0]["Artikul"], json!("A1"));
    }
}
