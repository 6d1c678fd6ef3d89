//! YAML front matter detection.

use serde_yaml::Value;

/// A document split into its front matter block and body.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter<'a> {
    /// Whether a non-empty YAML mapping was found.
    pub present: bool,
    /// Content after the closing delimiter, or the whole input.
    pub body: &'a str,
}

/// Split a leading `---` delimited YAML block from `content`.
///
/// Malformed or non-mapping blocks are treated as ordinary body text.
pub fn split(content: &str) -> FrontMatter<'_> {
    let whole = FrontMatter {
        present: false,
        body: content,
    };

    let Some(rest) = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
    else {
        return whole;
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return match serde_yaml::from_str::<Value>(yaml) {
                Ok(Value::Mapping(map)) => FrontMatter {
                    present: !map.is_empty(),
                    body,
                },
                Ok(Value::Null) => FrontMatter {
                    present: false,
                    body,
                },
                _ => whole,
            };
        }
        offset += line.len();
    }

    whole
}
