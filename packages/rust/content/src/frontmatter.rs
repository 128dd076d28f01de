//! YAML front matter extraction.

use docsteps_shared::{DocStepsError, Result};

/// Split a Markdown document into its front matter and body.
///
/// Front matter is a leading `---` fenced YAML mapping. A document without
/// one yields an empty map and the whole text as body. The YAML is converted
/// to JSON values so downstream code deals with a single value model.
pub fn split_front_matter(
    content: &str,
) -> Result<(serde_json::Map<String, serde_json::Value>, &str)> {
    let trimmed = content.trim_start_matches('\u{feff}').trim_start();
    let Some(after_open) = trimmed.strip_prefix("---") else {
        return Ok((serde_json::Map::new(), content));
    };

    // The opening fence must be on its own line.
    let Some(after_open) = after_open
        .strip_prefix("\r\n")
        .or_else(|| after_open.strip_prefix('\n'))
    else {
        return Ok((serde_json::Map::new(), content));
    };

    let (yaml_str, body) = match find_closing_fence(after_open) {
        Some((end, rest)) => (&after_open[..end], rest),
        None => {
            return Err(DocStepsError::parse(
                "front matter is not closed by a `---` line",
            ));
        }
    };

    if yaml_str.trim().is_empty() {
        return Ok((serde_json::Map::new(), body));
    }

    let yaml: serde_yaml::Value = serde_yaml::from_str(yaml_str)
        .map_err(|e| DocStepsError::parse(format!("invalid front matter YAML: {e}")))?;

    match serde_json::to_value(yaml) {
        Ok(serde_json::Value::Object(map)) => Ok((map, body)),
        Ok(serde_json::Value::Null) => Ok((serde_json::Map::new(), body)),
        Ok(_) => Err(DocStepsError::parse("front matter must be a YAML mapping")),
        Err(e) => Err(DocStepsError::parse(format!(
            "front matter cannot be represented as JSON: {e}"
        ))),
    }
}

/// Locate the closing `---` line. Returns the YAML length and the body after it.
fn find_closing_fence(s: &str) -> Option<(usize, &str)> {
    let mut offset = 0;
    for line in s.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((offset, &s[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}
