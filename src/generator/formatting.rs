/// Trim and uppercase the first character; everything else is left alone.
pub fn sentence_case(value: &str) -> String {
    let trimmed = value.trim();
    let mut chars = trimmed.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
