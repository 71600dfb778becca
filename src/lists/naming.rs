use time::Date;

/// Collision-free display name for a new entry, given the names already
/// taken in the relevant scope.
///
/// Appends a parenthesized live count of the names starting with `base`:
/// the first duplicate becomes `base(1)`, the next `base(2)`, and so on.
/// The count is recomputed from the current candidates each time, so a
/// suffix can recur after an intermediate entry is deleted. That matches
/// the historical behavior and is deliberately left as-is.
pub fn disambiguate(base: &str, existing: &[String]) -> String {
    let matches = existing.iter().filter(|name| name.starts_with(base)).count();
    if matches == 0 {
        base.to_string()
    } else {
        format!("{}({})", base, matches)
    }
}

/// Default name for a list created on `date`,
/// e.g. `To-do list :  2024-05-29 (Wed)`.
pub fn default_list_name(date: Date) -> String {
    format!(
        "To-do list :  {} ({})",
        date_label(date),
        &date.weekday().to_string()[..3]
    )
}

/// `YYYY-MM-DD` label used in the default list name and its same-day scope.
pub fn date_label(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Name for a copied list. No collision search; copies of copies stack
/// the suffix.
pub fn copy_name(original: &str) -> String {
    format!("{} (copy)", original)
}
