/// Returns the plural form of an English noun, preserving its casing.
pub fn pluralize(word: &str) -> String {
    pluralizer::pluralize(word, 2, false)
}
