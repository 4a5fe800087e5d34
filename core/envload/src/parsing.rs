/*
 * Licensed to the Apache Software Foundation (ASF) under one
 * or more contributor license agreements.  See the NOTICE file
 * distributed with this work for additional information
 * regarding copyright ownership.  The ASF licenses this file
 * to you under the Apache License, Version 2.0 (the
 * "License"); you may not use this file except in compliance
 * with the License.  You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing,
 * software distributed under the License is distributed on an
 * "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
 * KIND, either express or implied.  See the License for the
 * specific language governing permissions and limitations
 * under the License.
 */

//! Line and value processing for `.env` files.
//!
//! A file is consumed in a single forward pass:
//! - surrounding whitespace is trimmed from every physical line
//! - blank lines and `#` comments are skipped
//! - a trailing `\` joins the line with the next one
//! - each logical line is split on the first `=`; lines without one are ignored
//! - values are unescaped, unquoted and then `${NAME}` references are expanded
//!
//! References resolve against keys defined earlier in the same load and then the
//! process environment. Unresolved references are kept verbatim.

use crate::env_map::EnvMap;
use crate::error::EnvError;
use regex::{Captures, Regex};
use std::env;
use std::io::{BufRead, Cursor};
use std::path::PathBuf;
use std::sync::LazyLock;
use tracing::{debug, warn};

static VALID_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").expect("variable name pattern must compile")
});

static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([a-zA-Z_][a-zA-Z0-9_]*)\}").expect("reference pattern must compile")
});

/// Returns true if `name` is a valid environment variable identifier.
pub fn is_valid_name(name: &str) -> bool {
    VALID_NAME.is_match(name)
}

/// Parses env file content held in memory.
///
/// `loaded` holds the variables produced by earlier files of the same load and is
/// only consulted for `${NAME}` expansion.
pub fn parse_str(content: &str, loaded: &EnvMap) -> Result<EnvMap, EnvError> {
    parse_reader(Cursor::new(content), "<string>", loaded)
}

/// Parses env file content from a buffered reader.
///
/// `origin` names the source in errors and log messages.
pub fn parse_reader<R: BufRead>(
    reader: R,
    origin: &str,
    loaded: &EnvMap,
) -> Result<EnvMap, EnvError> {
    let mut vars = EnvMap::new();
    let mut buffer = String::new();
    let mut continued_from: Option<usize> = None;

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.map_err(|source| EnvError::Io {
            path: PathBuf::from(origin),
            source,
        })?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(head) = line.strip_suffix('\\') {
            buffer.push_str(head);
            continued_from.get_or_insert(line_number);
            continue;
        }

        let (logical, start_line) = match continued_from.take() {
            Some(start) => {
                buffer.push_str(line);
                (std::mem::take(&mut buffer), start)
            }
            None => (line.to_owned(), line_number),
        };

        let Some((key, raw_value)) = logical.split_once('=') else {
            debug!("Skipping line {start_line} of '{origin}' without '=' separator.");
            continue;
        };

        let key = key.trim();
        if !is_valid_name(key) {
            return Err(EnvError::InvalidVariableName {
                name: key.to_owned(),
                origin: origin.to_owned(),
                line: start_line,
            });
        }

        let value = expand_references(&process_value(raw_value.trim()), |name| {
            vars.get(name)
                .or_else(|| loaded.get(name))
                .map(str::to_owned)
                .or_else(|| env::var(name).ok())
        });
        vars.insert(key, value);
    }

    if let Some(start) = continued_from {
        warn!(
            "Discarding unterminated line continuation starting at line {start} of '{origin}'."
        );
    }

    Ok(vars)
}

/// Applies escape sequences and strips one matching pair of outer quotes.
pub(crate) fn process_value(value: &str) -> String {
    let unescaped = unescape(value);
    strip_matching_quotes(&unescaped).to_owned()
}

/// Replaces `\n`, `\t`, `\r` and `\\` in a single left-to-right pass.
/// Any other backslash is kept as is.
fn unescape(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        let replacement = match chars.peek() {
            Some('n') => '\n',
            Some('t') => '\t',
            Some('r') => '\r',
            Some('\\') => '\\',
            _ => {
                result.push('\\');
                continue;
            }
        };
        chars.next();
        result.push(replacement);
    }
    result
}

fn strip_matching_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() < 2 {
        return value;
    }
    let first = bytes[0];
    if (first == b'"' || first == b'\'') && bytes[bytes.len() - 1] == first {
        return &value[1..value.len() - 1];
    }
    value
}

/// Expands every `${NAME}` reference using `lookup`, leaving unknown ones untouched.
pub(crate) fn expand_references<F>(value: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    REFERENCE
        .replace_all(value, |caps: &Captures| {
            lookup(&caps[1]).unwrap_or_else(|| caps[0].to_owned())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn parse(content: &str) -> EnvMap {
        parse_str(content, &EnvMap::new()).expect("content should parse")
    }

    #[test]
    fn process_value_handles_quotes_and_escapes() {
        let cases = [
            (r#""quoted value""#, "quoted value"),
            ("'another quoted value'", "another quoted value"),
            (r"escaped\nvalue", "escaped\nvalue"),
            (r"escaped\tvalue", "escaped\tvalue"),
            (r"carriage\rreturn", "carriage\rreturn"),
            (r"back\\slash", r"back\slash"),
            (r"keep\xunknown", r"keep\xunknown"),
            (r"\\n", r"\n"),
            ("", ""),
        ];
        for (input, expected) in cases {
            assert_eq!(process_value(input), expected, "input: {input:?}");
        }
    }

    #[test]
    fn process_value_leaves_mismatched_quotes() {
        assert_eq!(process_value(r#""mixed'"#), r#""mixed'"#);
        assert_eq!(process_value(r#""open"#), r#""open"#);
        assert_eq!(process_value("\""), "\"");
        assert_eq!(process_value("''"), "");
    }

    #[test]
    fn process_value_strips_only_outer_pair() {
        assert_eq!(process_value(r#""say "hi"""#), r#"say "hi""#);
    }

    #[serial]
    #[test]
    fn expand_references_resolves_map_then_environment() {
        unsafe {
            env::set_var("ENVLOAD_TEST_EXISTING_ENV_VAR", "existing_env_value");
        }
        let vars: EnvMap = [("EXISTING_VAR", "existing_value")].into_iter().collect();
        let lookup = |name: &str| {
            vars.get(name)
                .map(str::to_owned)
                .or_else(|| env::var(name).ok())
        };

        assert_eq!(
            expand_references("${EXISTING_VAR}", lookup),
            "existing_value"
        );
        assert_eq!(
            expand_references("${ENVLOAD_TEST_EXISTING_ENV_VAR}", lookup),
            "existing_env_value"
        );
        assert_eq!(
            expand_references("${ENVLOAD_TEST_NON_EXISTENT}", lookup),
            "${ENVLOAD_TEST_NON_EXISTENT}"
        );
        assert_eq!(expand_references("no vars", lookup), "no vars");
        assert_eq!(
            expand_references("${EXISTING_VAR}-${EXISTING_VAR}", lookup),
            "existing_value-existing_value"
        );

        unsafe {
            env::remove_var("ENVLOAD_TEST_EXISTING_ENV_VAR");
        }
    }

    #[test]
    fn expand_references_ignores_malformed_references() {
        let lookup = |_: &str| Some("x".to_owned());
        assert_eq!(expand_references("$NAME", lookup), "$NAME");
        assert_eq!(expand_references("${1BAD}", lookup), "${1BAD}");
        assert_eq!(expand_references("${OPEN", lookup), "${OPEN");
    }

    #[test]
    fn parse_reads_simple_pairs() {
        let vars = parse("TEST_KEY=test_value\nANOTHER_KEY=another_value");
        let expected: EnvMap = [("TEST_KEY", "test_value"), ("ANOTHER_KEY", "another_value")]
            .into_iter()
            .collect();
        assert_eq!(vars, expected);
    }

    #[test]
    fn parse_trims_and_skips_comments_and_blank_lines() {
        let vars = parse("# comment\n\n   \n  KEY  =   value with spaces   \n  # indented comment\n");
        assert_eq!(vars.len(), 1);
        assert_eq!(vars.get("KEY"), Some("value with spaces"));
    }

    #[test]
    fn parse_splits_on_first_equals_only() {
        let vars = parse("URL=postgres://host/db?sslmode=disable");
        assert_eq!(vars.get("URL"), Some("postgres://host/db?sslmode=disable"));
    }

    #[test]
    fn parse_ignores_lines_without_separator() {
        let vars = parse("JUST_A_WORD\nKEY=value");
        assert_eq!(vars.len(), 1);
        assert_eq!(vars.get("KEY"), Some("value"));
    }

    #[test]
    fn parse_allows_empty_values() {
        let vars = parse("EMPTY=\nQUOTED_EMPTY=\"\"");
        assert_eq!(vars.get("EMPTY"), Some(""));
        assert_eq!(vars.get("QUOTED_EMPTY"), Some(""));
    }

    #[test]
    fn parse_joins_continued_lines() {
        let vars = parse("MULTI=first \\\n  second \\\n  third\nNEXT=1");
        assert_eq!(vars.get("MULTI"), Some("first second third"));
        assert_eq!(vars.get("NEXT"), Some("1"));
    }

    #[test]
    fn parse_skips_comments_and_blank_lines_inside_continuation() {
        let vars = parse("MULTI=first \\\n# not part of the value\n\n   \n  second\nNEXT=1");
        assert_eq!(vars.get("MULTI"), Some("first second"));
        assert_eq!(vars.get("NEXT"), Some("1"));
        assert_eq!(vars.len(), 2);
    }

    #[test]
    fn parse_continuation_can_carry_the_key() {
        let vars = parse("SPLIT_\\\nKEY=value");
        assert_eq!(vars.get("SPLIT_KEY"), Some("value"));
    }

    #[test]
    fn parse_discards_unterminated_continuation() {
        let vars = parse("KEY=value\nDANGLING=start \\");
        assert_eq!(vars.len(), 1);
        assert!(!vars.contains_key("DANGLING"));
    }

    #[test]
    fn parse_rejects_invalid_names() {
        let error = parse_str("GOOD=1\n1BAD=2", &EnvMap::new()).unwrap_err();
        match error {
            EnvError::InvalidVariableName { name, line, .. } => {
                assert_eq!(name, "1BAD");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(parse_str("MY-KEY=1", &EnvMap::new()).is_err());
        assert!(parse_str("=value", &EnvMap::new()).is_err());
    }

    #[serial]
    #[test]
    fn parse_expands_earlier_keys_only() {
        unsafe {
            env::remove_var("LATER");
        }
        let vars = parse("X=foo\nY=${X}bar\nZ=${LATER}\nLATER=late");
        assert_eq!(vars.get("Y"), Some("foobar"));
        assert_eq!(vars.get("Z"), Some("${LATER}"));
    }

    #[test]
    fn parse_expands_keys_from_previous_files() {
        let loaded: EnvMap = [("BASE_URL", "http://localhost")].into_iter().collect();
        let vars = parse_str("API_URL=${BASE_URL}/api", &loaded).expect("content should parse");
        assert_eq!(vars.get("API_URL"), Some("http://localhost/api"));
        assert!(!vars.contains_key("BASE_URL"));
    }

    #[test]
    fn parse_expands_inside_quotes() {
        let vars = parse("NAME=world\nGREETING='hello ${NAME}'");
        assert_eq!(vars.get("GREETING"), Some("hello world"));
    }

    #[test]
    fn parse_applies_escapes_before_unquoting() {
        let vars = parse(r#"MSG="line1\nline2""#);
        assert_eq!(vars.get("MSG"), Some("line1\nline2"));
    }

    #[test]
    fn parse_later_duplicates_override_earlier() {
        let vars = parse("K=first\nK=second");
        assert_eq!(vars.get("K"), Some("second"));
    }
}
