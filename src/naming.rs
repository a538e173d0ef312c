//! Identifier derivation shared by the extractor and the generators.
//!
//! Word splitting follows the usual JavaScript tooling conventions so that
//! identifiers in generated TypeScript match what hand-written code would use:
//! `listUsers`, `get_user_by_id` and `GET /users/{id}` all split into words the
//! same way regardless of the separator style in the source document.

use once_cell::sync::Lazy;
use regex::Regex;

/// `{param}` placeholders in an OpenAPI path template. Lazy so that adjacent
/// placeholders like `{a}{b}` are matched separately.
static PATH_PARAM: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"\{(.+?)\}").expect("path parameter regex is valid")
});

#[derive(Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Upper,
    Lower,
    Digit,
    Other,
}

fn classify(c: char) -> CharClass {
    if c.is_uppercase() {
        CharClass::Upper
    } else if c.is_alphabetic() {
        CharClass::Lower
    } else if c.is_numeric() {
        CharClass::Digit
    } else {
        CharClass::Other
    }
}

/// Split a string into words.
///
/// Boundaries are non-alphanumeric characters, a lowercase letter followed by an
/// uppercase one, letter/digit transitions, and the end of an acronym
/// (`HTTPServer` → `HTTP`, `Server`).
pub fn split_words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        let class = classify(c);
        if class == CharClass::Other {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if let Some(&prev) = current.chars().last().as_ref() {
            let prev_class = classify(prev);
            let next_class = chars.get(i + 1).map(|n| classify(*n));
            let boundary = match (prev_class, class) {
                (CharClass::Lower, CharClass::Upper) => true,
                (CharClass::Digit, CharClass::Upper | CharClass::Lower) => true,
                (CharClass::Upper | CharClass::Lower, CharClass::Digit) => true,
                (CharClass::Upper, CharClass::Upper) => next_class == Some(CharClass::Lower),
                _ => false,
            };
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// `get /users/{user_id}` → `getUsersUserId`
#[must_use]
pub fn camel_case(input: &str) -> String {
    let words = split_words(input);
    let mut out = String::with_capacity(input.len());
    for (i, word) in words.iter().enumerate() {
        if i == 0 {
            out.push_str(&word.to_lowercase());
        } else {
            out.push_str(&capitalize(word));
        }
    }
    out
}

/// `t_users_controllers` → `TUsersControllers`
#[must_use]
pub fn pascal_case(input: &str) -> String {
    split_words(input).iter().map(|w| capitalize(w)).collect()
}

/// Convert an OpenAPI path template into the colon form used by MSW routes.
///
/// `/users/{user_id}/posts/{postId}` → `/users/:userId/posts/:postId`
#[must_use]
pub fn to_express_path(path: &str) -> String {
    PATH_PARAM
        .replace_all(path, |caps: &regex::Captures<'_>| {
            format!(":{}", camel_case(&caps[1]))
        })
        .into_owned()
}

/// Name of the generated function that produces the body for one response.
#[must_use]
pub fn response_identifier(operation_id: &str, code: &str) -> String {
    camel_case(&format!("get_{operation_id}_{code}_response"))
}

/// Scenario ids become part of exported identifiers; keep only `[A-Za-z0-9]`.
#[must_use]
pub fn scenario_identifier(scenario_id: &str) -> String {
    scenario_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_words() {
        assert_eq!(split_words("listUsers"), vec!["list", "Users"]);
        assert_eq!(split_words("get_user_by_id"), vec!["get", "user", "by", "id"]);
        assert_eq!(split_words("HTTPServer"), vec!["HTTP", "Server"]);
        assert_eq!(split_words("v2Items"), vec!["v", "2", "Items"]);
        assert!(split_words("--").is_empty());
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("get/users/{id}"), "getUsersId");
        assert_eq!(camel_case("listUsers"), "listUsers");
        assert_eq!(camel_case("get_user_by_id"), "getUserById");
        assert_eq!(camel_case("Get Pet"), "getPet");
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("T_users_Controllers"), "TUsersControllers");
        assert_eq!(pascal_case("pet-store"), "PetStore");
    }

    #[test]
    fn test_to_express_path_lazy_match() {
        assert_eq!(to_express_path("/users/{user_id}"), "/users/:userId");
        assert_eq!(to_express_path("/a/{x}{y}"), "/a/:x:y");
        assert_eq!(to_express_path("/plain"), "/plain");
    }

    #[test]
    fn test_response_identifier() {
        assert_eq!(response_identifier("listUsers", "200"), "getListUsers200Response");
    }

    #[test]
    fn test_scenario_identifier() {
        assert_eq!(scenario_identifier("login-success"), "loginsuccess");
        assert_eq!(scenario_identifier("TC-1.1"), "TC11");
    }
}
