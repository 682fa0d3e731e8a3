use serde::{Deserialize, Serialize};

/// Вид отчёта, возвращаемого `/download`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Два набора: краткий (dataSet1) и полный (dataSet2)
    Compound,
    /// Один набор, лист «Отчет»
    Flat,
}

impl ReportKind {
    /// Определение вида отчёта.
    ///
    /// Явное поле ответа важнее всего, затем наличие второго набора,
    /// и только в конце старое правило «WB в названии задания».
    pub fn resolve(explicit: Option<ReportKind>, has_second_set: bool, task_name: &str) -> Self {
        if let Some(kind) = explicit {
            return kind;
        }
        if has_second_set || task_name.contains("WB") {
            ReportKind::Compound
        } else {
            ReportKind::Flat
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_order() {
        assert_eq!(
            ReportKind::resolve(Some(ReportKind::Flat), true, "WB 12"),
            ReportKind::Flat
        );
        assert_eq!(ReportKind::resolve(None, true, "1001"), ReportKind::Compound);
        assert_eq!(ReportKind::resolve(None, false, "WB 12"), ReportKind::Compound);
        assert_eq!(ReportKind::resolve(None, false, "1001 Ozon"), ReportKind::Flat);
    }
}
