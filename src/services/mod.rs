pub mod analytics_service;
pub mod auth_service;
pub mod car_service;
pub mod client_service;
pub mod penalty_service;
pub mod rental_service;
pub mod report_service;
pub mod search_service;
pub mod upload_service;
pub mod user_service;

/// `ILIKE` pattern matching `term` anywhere, with `%`, `_` and `\` taken literally.
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
