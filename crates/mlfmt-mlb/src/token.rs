//! Whitespace/quote tokenizing and `$(NAME)` substitution for manifest text.

use std::collections::HashMap;

use crate::error::MlbError;

/// Splits manifest text into words, treating a `"..."` run (with `\"`
/// escapes) as a single word even if it contains whitespace.
pub fn words(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut chars = text.char_indices().peekable();
    while let Some(&(i, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == '"' {
            chars.next();
            let mut word = String::new();
            while let Some((_, c)) = chars.next() {
                if c == '\\' {
                    if let Some((_, escaped)) = chars.next() {
                        word.push(escaped);
                    }
                    continue;
                }
                if c == '"' {
                    break;
                }
                word.push(c);
            }
            out.push(word);
            continue;
        }
        let start = i;
        let mut end = i;
        while let Some(&(j, c)) = chars.peek() {
            if c.is_whitespace() || c == '"' {
                break;
            }
            end = j + c.len_utf8();
            chars.next();
        }
        out.push(text[start..end].to_string());
    }
    out
}

/// Replaces every `$(NAME)` reference in `word` with its value from `vars`.
pub fn expand_path_vars(word: &str, vars: &HashMap<String, String>) -> Result<String, MlbError> {
    let mut result = String::new();
    let mut rest = word;
    while let Some(start) = rest.find("$(") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let close = after.find(')').ok_or_else(|| MlbError::UnterminatedPathVar(word.to_string()))?;
        let name = &after[..close];
        let value = vars.get(name).ok_or_else(|| MlbError::UndefinedPathVar(name.to_string()))?;
        result.push_str(value);
        rest = &after[close + 1..];
    }
    result.push_str(rest);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(words("a.sml   b.sig\nc.fun"), vec!["a.sml", "b.sig", "c.fun"]);
    }

    #[test]
    fn keeps_a_quoted_word_with_embedded_spaces_together() {
        assert_eq!(words(r#""my file.sml" next"#), vec!["my file.sml", "next"]);
    }

    #[test]
    fn expands_a_single_variable() {
        let mut vars = HashMap::new();
        vars.insert("ROOT".to_string(), "/srv/lib".to_string());
        assert_eq!(expand_path_vars("$(ROOT)/a.sml", &vars).unwrap(), "/srv/lib/a.sml");
    }

    #[test]
    fn reports_an_unterminated_reference() {
        assert!(expand_path_vars("$(ROOT/a.sml", &HashMap::new()).is_err());
    }
}
