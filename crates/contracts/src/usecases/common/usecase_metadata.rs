/// Метаданные UseCase для идентификации в логах и CLI
pub trait UseCaseMetadata {
    /// Индекс UseCase (например, "u501")
    fn usecase_index() -> &'static str;

    /// Техническое имя (например, "upload_task")
    fn usecase_name() -> &'static str;

    /// Отображаемое имя (например, "Выгрузка задания на сервер")
    fn display_name() -> &'static str;

    fn description() -> &'static str {
        ""
    }

    /// Полное имя вида "u501_upload_task"
    fn full_name() -> String {
        format!("{}_{}", Self::usecase_index(), Self::usecase_name())
    }
}
