/// Форматирует число с разделителями тысяч (точками)
///
/// # Примеры
/// ```
/// use packer::shared::format::format_number;
/// assert_eq!(format_number(1234567), "1.234.567");
/// assert_eq!(format_number(42), "42");
/// ```
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push('.');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Длительность в виде `H:MM:SS`, часы не ограничены сутками
///
/// # Примеры
/// ```
/// use packer::shared::format::format_duration;
/// assert_eq!(format_duration(3725), "1:02:05");
/// ```
pub fn format_duration(total_secs: i64) -> String {
    let secs = total_secs.max(0);
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
