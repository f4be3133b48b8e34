#![forbid(unsafe_code)]

use regex::Regex;
use tracing::debug;

/// Errors from cleaning a play script.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// `]` with no open `[`.
    #[error("improper bracket closure on line {line}")]
    UnbalancedBracket {
        /// 1-based line of the stray `]`
        line: usize,
    },
    /// `[` never closed.
    #[error("{count} unclosed opening bracket(s)")]
    UnclosedBrackets {
        /// brackets still open at the end
        count: usize,
    },
    /// Speaker pattern failed to compile.
    #[error(transparent)]
    Pattern(#[from] regex::Error),
}

/// Turn a raw play script into tagged dialogue.
///
/// Stage directions in `[...]` (nesting allowed) are removed, a speaker name
/// sharing its line with dialogue is moved onto its own line, every line
/// starting with two capitals gets a `>` tag, and blank lines are dropped.
pub fn clean(raw: &str) -> Result<String, ScriptError> {
    let stripped = strip_directions(raw)?;

    let mut reflowed = String::with_capacity(stripped.len());
    for line in stripped.lines() {
        match split_speaker_line(line) {
            Some((name, dialogue)) => {
                reflowed.push_str(name);
                reflowed.push('\n');
                reflowed.push_str(dialogue);
            }
            None => reflowed.push_str(line),
        }
        reflowed.push('\n');
    }

    let speaker = Regex::new(r"(?m)^([A-Z]{2})")?;
    let tagged = speaker.replace_all(&reflowed, ">$1");

    let mut out = String::with_capacity(tagged.len());
    for line in tagged.lines().filter(|l| !l.trim().is_empty()) {
        out.push_str(line);
        out.push('\n');
    }
    Ok(out)
}

fn strip_directions(raw: &str) -> Result<String, ScriptError> {
    let mut out = String::with_capacity(raw.len());
    let mut depth = 0usize;
    let mut max_depth = 0usize;
    let mut line = 1usize;
    for c in raw.chars() {
        match c {
            '[' => {
                depth += 1;
                max_depth = max_depth.max(depth);
            }
            ']' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(ScriptError::UnbalancedBracket { line })?;
            }
            _ if depth == 0 => out.push(c),
            _ => {}
        }
        if c == '\n' {
            line += 1;
        }
    }
    if depth > 0 {
        return Err(ScriptError::UnclosedBrackets { count: depth });
    }
    debug!(lines = line, max_depth, "stage directions removed");
    Ok(out)
}

/// Split `"ROMEO Is the day so young?"` into `("ROMEO", "Is the day so young?")`.
///
/// The name is the leading run of capitals and spaces; the split happens at
/// its last space once a non-name character shows up. A space right after a
/// lone `I` or `A` ends the name, since those are words, not names.
fn split_speaker_line(line: &str) -> Option<(&str, &str)> {
    let mut chars = line.char_indices();
    let (_, first) = chars.next()?;
    if !first.is_ascii_uppercase() {
        return None;
    }
    let mut capitals = 1usize;
    let mut last_space: Option<usize> = None;
    let mut prev = first;
    for (at, c) in chars {
        if c.is_ascii_uppercase() {
            capitals += 1;
        } else if c == ' ' && prev != 'I' && prev != 'A' {
            last_space = Some(at);
        } else {
            let space = last_space.filter(|_| capitals > 1)?;
            let (name, rest) = line.split_at(space);
            return Some((name, rest.strip_prefix(' ').unwrap_or(rest)));
        }
        prev = c;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_stage_directions() {
        let out = clean("ROMEO\nHe jests at scars [Aside] that never felt a wound.\n").unwrap();
        assert_eq!(out, ">ROMEO\nHe jests at scars  that never felt a wound.\n");
    }

    #[test]
    fn nested_directions_are_removed_whole() {
        assert_eq!(strip_directions("a[b[c]d]e").unwrap(), "ae");
    }

    #[test]
    fn bracket_errors() {
        assert!(matches!(
            strip_directions("ok\nbad]"),
            Err(ScriptError::UnbalancedBracket { line: 2 })
        ));
        assert!(matches!(
            strip_directions("[[open"),
            Err(ScriptError::UnclosedBrackets { count: 2 })
        ));
    }

    #[test]
    fn name_sharing_a_line_is_split() {
        let out = clean("JULIET Ay me!\n").unwrap();
        assert_eq!(out, ">JULIET\nAy me!\n");
        let out = clean("FRIAR LAURENCE I will.\n").unwrap();
        assert_eq!(out, ">FRIAR LAURENCE\nI will.\n");
    }

    #[test]
    fn plain_lines_are_left_alone() {
        assert_eq!(split_speaker_line("Romeo speaks"), None);
        assert_eq!(split_speaker_line("ROMEO"), None);
        assert_eq!(split_speaker_line("ACT I"), None);
        assert_eq!(split_speaker_line("ROMEO."), None);
        assert_eq!(split_speaker_line(""), None);
    }

    #[test]
    fn blank_lines_are_dropped() {
        let out = clean("NURSE\n\n\n   \nAnon, anon!\n\n").unwrap();
        assert_eq!(out, ">NURSE\nAnon, anon!\n");
    }
}
