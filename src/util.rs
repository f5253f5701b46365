//! Small utility helpers used across modules.

/// Trimmed prompt, or `None` if nothing but whitespace remains.
pub fn normalize_prompt(prompt: &str) -> Option<&str> {
  let p = prompt.trim();
  if p.is_empty() { None } else { Some(p) }
}

/// Log-safe truncation for prompt text.
/// Keeps at most `max` characters so player prompts don't flood the logs.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  match s.char_indices().nth(max) {
    None => s.to_string(),
    Some((cut, _)) => format!("{}… ({} bytes total)", &s[..cut], s.len()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn whitespace_only_prompt_is_empty() {
    assert_eq!(normalize_prompt("  \n\t "), None);
    assert_eq!(normalize_prompt(""), None);
    assert_eq!(normalize_prompt("  a red apple "), Some("a red apple"));
  }

  #[test]
  fn truncation_respects_char_boundaries() {
    assert_eq!(trunc_for_log("short", 10), "short");
    let t = trunc_for_log("ééééé", 2);
    assert!(t.starts_with("éé…"));
    assert!(t.contains("10 bytes total"));
  }
}
