//! URL to file name mapping for persisted pages.

pub const PAGE_FILE_EXT: &str = ".html";

/// Maps a URL to a file name by replacing `/` with `_` and `:` with `^`.
/// No other characters are touched.
pub fn file_name_for_url(url: &str) -> String {
    let mut name = String::with_capacity(url.len() + PAGE_FILE_EXT.len());
    for ch in url.chars() {
        match ch {
            '/' => name.push('_'),
            ':' => name.push('^'),
            other => name.push(other),
        }
    }
    name.push_str(PAGE_FILE_EXT);
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_slashes_and_colons() {
        assert_eq!(file_name_for_url("http://a.com/x:y"), "http^__a.com_x^y.html");
    }

    #[test]
    fn test_keeps_other_characters() {
        assert_eq!(
            file_name_for_url("https://a.com/p?q=1&r=2#frag"),
            "https^__a.com_p?q=1&r=2#frag.html"
        );
    }

    #[test]
    fn test_empty_url() {
        assert_eq!(file_name_for_url(""), ".html");
    }
}
